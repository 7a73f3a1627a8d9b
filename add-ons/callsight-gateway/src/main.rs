//! Axum-based API gateway: send a public audio file URL (e.g. a Salesforce file
//! link) for analysis, get back the flat and typed report forms, or export a
//! finished analysis as a Word document.
//!
//! POST /api/v1/analyze   — download audio from `file_url`, run the pipeline.
//! POST /api/v1/export    — render analysis markdown as a .docx download.
//! GET  /                 — liveness message.

mod analyze;

use axum::{
    routing::{get, post},
    Router,
};
use callsight_core::{GeminiBridge, UserConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Shared per-process state. The bridge and HTTP client are reused across
/// requests; each analysis runs its own pipeline instance with no shared
/// mutable state, so concurrent requests cannot interfere.
#[derive(Clone)]
pub struct AppState {
    pub bridge: Option<Arc<GeminiBridge>>,
    pub http: reqwest::Client,
    pub config: Arc<UserConfig>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(UserConfig::load().unwrap_or_default());

    let bridge = GeminiBridge::from_env().map(|b| {
        let b = match config.get_model() {
            Some(model) => b.with_model(&model),
            None => b,
        };
        info!(model = b.model(), "Gemini bridge ready");
        Arc::new(b)
    });
    if bridge.is_none() {
        warn!("no Gemini API key configured; /api/v1/analyze will return 503");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;

    let state = AppState {
        bridge,
        http,
        config,
    };

    let app = Router::new()
        .route("/", get(analyze::root_get))
        .route("/api/v1/analyze", post(analyze::analyze_post))
        .route("/api/v1/export", post(analyze::export_post))
        .with_state(state);

    let addr =
        std::env::var("CALLSIGHT_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    info!("callsight gateway listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
