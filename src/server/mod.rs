//! HTTP surface

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::extractor::MetadataExtractor;

/// Shared handler context.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn MetadataExtractor>,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(extractor: Arc<dyn MetadataExtractor>) -> Self {
        Self {
            extractor,
            client: reqwest::Client::new(),
        }
    }
}

/// Assemble the router. CORS stays wide open: the API is consumed from
/// browser frontends on arbitrary origins.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/platforms", get(handlers::platforms))
        .route("/api/video/info", post(handlers::video_info))
        .route("/api/video/download", post(handlers::video_download))
        .route("/api/video/proxy/{video_id}", get(handlers::proxy_download))
        .with_state(state)
        .layer(cors)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, bind_addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on http://{bind_addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
