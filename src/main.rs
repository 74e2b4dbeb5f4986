use anyhow::{Context, Result};
use genai_blog::{app, AppState, Config, GeminiClient};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("genai_blog=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    if !config.has_api_key() {
        warn!("GOOGLE_API_KEY is not set, every generate request will fail until it is");
    }
    info!(?config, "Loaded configuration");

    let generator = Arc::new(GeminiClient::new(&config));
    let bind_addr = config.bind_addr;
    let state = Arc::new(AppState::new(config, generator));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    info!("🚀 Server running on http://{bind_addr}");
    info!("🧠 Open in your browser to start generating!");

    axum::serve(listener, app(state))
        .await
        .context("server exited with an error")?;

    Ok(())
}
