use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{AuthMode, ProviderSettings};
use crate::error::RelayError;

pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.8;
pub const TOP_K: u32 = 40;
pub const MAX_OUTPUT_TOKENS: u32 = 2048;
pub const HARASSMENT_CATEGORY: &str = "HARM_CATEGORY_HARASSMENT";
pub const BLOCK_MEDIUM_AND_ABOVE: &str = "BLOCK_MEDIUM_AND_ABOVE";

/// One outbound generation call. Implementations must not retry.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, RelayError>;
}

pub type DynGenerationClient = Arc<dyn GenerationClient>;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    auth_mode: AuthMode,
    timeout: Duration,
    user_agent: String,
}

impl GeminiClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let sanitized_base = settings.base_url.trim_end_matches('/').to_string();
        if sanitized_base.is_empty() {
            return Err(anyhow!("Base URL cannot be empty"));
        }

        let timeout = Duration::from_secs(settings.timeout_secs);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self {
            http,
            base_url: sanitized_base,
            model: settings.model.clone(),
            auth_mode: settings.auth_mode,
            timeout,
            user_agent: settings.user_agent.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Rendered without the request URL, which may carry the key.
    fn transport_error(&self, err: reqwest::Error) -> RelayError {
        let err = err.without_url();
        if err.is_timeout() {
            RelayError::UpstreamTimeout(self.timeout)
        } else {
            RelayError::Upstream {
                status: err.status().map(|status| status.as_u16()),
                message: format!("Failed to reach generation endpoint: {err}"),
            }
        }
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, RelayError> {
        let mut builder = self
            .http
            .post(self.endpoint())
            .header("User-Agent", &self.user_agent)
            .json(request);

        builder = match self.auth_mode {
            AuthMode::QueryParam => builder.query(&[("key", api_key)]),
            AuthMode::Bearer => builder.bearer_auth(api_key),
        };

        let response = builder
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|error| error.message)
                .or_else(|| Some(body.trim().to_string()).filter(|text| !text.is_empty()))
                .unwrap_or_else(|| {
                    format!(
                        "Error: {}",
                        status.canonical_reason().unwrap_or(status.as_str())
                    )
                });
            return Err(RelayError::Upstream {
                status: Some(status.as_u16()),
                message,
            });
        }

        serde_json::from_str::<GenerateContentResponse>(&body)
            .map_err(|err| RelayError::malformed(format!("response body is not valid JSON: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    /// Single-prompt request with the fixed generation parameters.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.into()),
                }],
            }],
            generation_config: GenerationConfig::default(),
            safety_settings: vec![SafetySetting {
                category: HARASSMENT_CATEGORY.to_string(),
                threshold: BLOCK_MEDIUM_AND_ABOVE.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            top_k: TOP_K,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
