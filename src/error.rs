use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

/// Every way a single plan generation can fail.
///
/// All variants are terminal for the call; nothing here is retried.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No API key supplied")]
    MissingCredential,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider answered with a non-success status or could not be reached.
    /// `message` is the provider's own text when it supplied one.
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid response format from API: {0}")]
    MalformedUpstreamResponse(String),

    #[error("Upstream did not respond within {}s", .0.as_secs())]
    UpstreamTimeout(Duration),
}

impl RelayError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        RelayError::InvalidRequest(reason.into())
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        RelayError::MalformedUpstreamResponse(reason.into())
    }

    /// Short machine-readable name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MissingCredential => "missing_credential",
            RelayError::InvalidRequest(_) => "invalid_request",
            RelayError::Upstream { .. } => "upstream_error",
            RelayError::MalformedUpstreamResponse(_) => "malformed_upstream_response",
            RelayError::UpstreamTimeout(_) => "upstream_timeout",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingCredential => StatusCode::UNAUTHORIZED,
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { .. } | RelayError::MalformedUpstreamResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            RelayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}
