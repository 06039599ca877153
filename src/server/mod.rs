use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::client::GeminiClient;
use crate::config::Config;
use crate::error::RelayError;
use crate::plan::{GeneratedPlan, PlanRelay, StudyPlanRequest, resolve_credential};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        Self {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State & router
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    relay: PlanRelay,
    fallback_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(relay: PlanRelay, fallback_key: Option<String>) -> Self {
        Self {
            relay,
            fallback_key: fallback_key.map(Arc::from),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(generate_study_plan).options(preflight))
        .route(
            "/generate-study-plan",
            post(generate_study_plan).options(preflight),
        )
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(config: &Config) -> Result<()> {
    let client = GeminiClient::new(&config.provider)?;
    let relay = PlanRelay::new(Arc::new(client), config.prompt.markdown);
    let app = build_router(AppState::new(relay, config.provider.api_key.clone()));

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.bind, config.server.port
            )
        })?;
    info!(
        model = %config.provider.model,
        auth_mode = %config.provider.auth_mode,
        "studyplan relay listening on http://{addr}"
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("studyplan relay shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl+C; shutting down");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn generate_study_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<StudyPlanRequest>, JsonRejection>,
) -> Result<Json<GeneratedPlan>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| RelayError::invalid(rejection.body_text()))?;

    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let credential = resolve_credential(
        request.api_key.as_deref(),
        header,
        state.fallback_key.as_deref(),
    )
    .unwrap_or_default();

    match state.relay.generate_plan(&request, credential).await {
        Ok(plan) => Ok(Json(plan)),
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "study plan request failed");
            Err(err.into())
        }
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
