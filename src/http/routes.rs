use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::classifier::ScorerKind;
use crate::error::{ErrorCode, IngestionError};
use crate::language::{Language, LanguageHint};
use crate::pipeline::{DetectionPipeline, DetectionReport};

/// Headroom for the JSON envelope around the base64 payload
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Error code reported when the blocking worker fails
const INTERNAL_ERROR_CODE: i32 = 500;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DetectionPipeline>,
}

impl AppState {
    pub fn new(pipeline: DetectionPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// HTTP error variants mapped to JSON responses.
#[derive(Debug)]
pub enum HttpServerError {
    InvalidBase64(String),
    Ingestion(IngestionError),
    Internal(String),
}

impl HttpServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBase64(_) => StatusCode::BAD_REQUEST,
            Self::Ingestion(IngestionError::Decode { .. }) => StatusCode::BAD_REQUEST,
            Self::Ingestion(IngestionError::SizeLimit { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Ingestion(IngestionError::UnsupportedFormat { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IngestionError> for HttpServerError {
    fn from(err: IngestionError) -> Self {
        Self::Ingestion(err)
    }
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, code) = match self {
            Self::InvalidBase64(details) => (
                format!("Invalid base64 encoding: {}", details),
                crate::error::IngestionErrorCodes::DECODE,
            ),
            Self::Ingestion(err) => (err.message(), err.code()),
            Self::Internal(msg) => (msg, INTERNAL_ERROR_CODE),
        };

        (
            status,
            Json(serde_json::json!({ "error": message, "code": code })),
        )
            .into_response()
    }
}

/// Detection request body.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectRequest {
    pub audio_base64: String,
    #[serde(default = "default_language_hint")]
    pub language: String,
    /// Declared container, as an extension or MIME type
    #[serde(default)]
    pub format: Option<String>,
}

fn default_language_hint() -> String {
    "auto".to_string()
}

/// Root endpoint response payload.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub supported_languages: Vec<&'static str>,
    pub endpoints: serde_json::Value,
}

/// Health endpoint response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub scorer: ScorerKind,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
}

/// Build the Axum router with all handlers.
pub fn build_router(state: AppState) -> Router {
    // base64 inflates by 4/3; allow the largest accepted payload plus envelope
    let body_limit = state.pipeline.max_encoded_bytes() / 3 * 4 + 4 + BODY_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/detect-voice", post(detect_voice))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the HTTP server loop.
pub async fn run_http_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding HTTP listener")?;
    tracing::info!("[HTTP] Listening on {}", addr);
    let router = build_router(state);
    axum::serve(listener, router)
        .await
        .context("serving HTTP router")?;
    Ok(())
}

pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "VoiceVerify",
        version: env!("CARGO_PKG_VERSION"),
        description: "AI-generated voice detection",
        supported_languages: Language::ALL.iter().map(|l| l.name()).collect(),
        endpoints: serde_json::json!({
            "detect": "POST /detect-voice",
            "health": "GET /health",
        }),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0);

    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.pipeline.classifier().model_loaded(),
        scorer: state.pipeline.classifier().scorer_kind(),
        timestamp,
    })
}

pub async fn detect_voice(
    State(state): State<AppState>,
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectionReport>, HttpServerError> {
    let payload = STANDARD
        .decode(request.audio_base64.trim())
        .map_err(|err| HttpServerError::InvalidBase64(err.to_string()))?;
    let hint = LanguageHint::parse(&request.language);
    let format = request.format;

    tracing::debug!(
        "[HTTP] detect-voice: {} bytes, hint={:?}, format={:?}",
        payload.len(),
        hint,
        format
    );

    let pipeline = Arc::clone(&state.pipeline);
    let report = tokio::task::spawn_blocking(move || {
        pipeline.detect(&payload, format.as_deref(), hint)
    })
    .await
    .map_err(|err| {
        tracing::error!("[HTTP] Detection worker failed: {}", err);
        HttpServerError::Internal(format!("Processing error: {}", err))
    })??;

    Ok(Json(report))
}
