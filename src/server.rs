//! HTTP routes for the page, the generate action and the download action.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::{Html, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::gateway::{ContentGenerator, Gateway};
use crate::input;
use crate::page;
use crate::presenter::{self, Outcome, Presentation, DOWNLOAD_FILENAME, DOWNLOAD_MIME};
use crate::task::{build_prompt, Task};

pub struct AppState {
    pub config: Config,
    pub gateway: Gateway,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            config,
            gateway: Gateway::new(generator),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DownloadInfo {
    pub filename: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub output: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    pub task: Task,
    pub prompt: String,
    pub model: String,
    pub processing_time_ms: u128,
    pub download: DownloadInfo,
}

/// Body of `POST /download`. Sent as JSON so line endings survive the trip.
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub text: String,
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page::render(state.gateway.model()))
}

async fn health() -> &'static str {
    "ok"
}

async fn generate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let start = Instant::now();
    let form = input::collect(multipart).await?;

    if let Some(image) = &form.image {
        info!(
            filename = %image.filename,
            mime_type = image.kind.mime_type(),
            bytes = image.bytes.len(),
            dimensions = ?image.dimensions(),
            "📷 Image attached"
        );
    }

    let prompt = build_prompt(form.task, &form.topic);
    let result = state
        .gateway
        .generate(Some(&prompt), form.image.as_ref())
        .await;
    let presentation = Presentation::from_result(&result);

    let elapsed = start.elapsed().as_millis();
    info!(
        task = form.task.slug(),
        outcome = ?presentation.outcome,
        elapsed_ms = %elapsed,
        "Generate finished"
    );

    Ok(Json(GenerateResponse {
        output: presentation.text,
        outcome: presentation.outcome,
        error_kind: presentation.error_kind,
        task: form.task,
        prompt,
        model: state.gateway.model().to_string(),
        processing_time_ms: elapsed,
        download: DownloadInfo {
            filename: DOWNLOAD_FILENAME.to_string(),
            mime_type: DOWNLOAD_MIME.to_string(),
        },
    }))
}

async fn download(Json(request): Json<DownloadRequest>) -> Response {
    presenter::download(request.text)
}

pub fn app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/generate", post(generate))
        .route("/download", post(download))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
