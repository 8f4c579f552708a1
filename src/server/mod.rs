pub mod api;

use axum::{http::Method, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::constants::DEFAULT_MAX_ATTEMPTS;
use crate::error::Result;
use crate::services::HistoryProvider;

/// State shared across all handlers: the provider plus the fetch retry
/// bound. Each request runs the shared fetch/clean/enrich core on its own
/// data; nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn HistoryProvider>,
    pub max_attempts: u32,
}

/// Start the chart-data server.
pub async fn serve(provider: Arc<dyn HistoryProvider>, port: u16) -> Result<()> {
    let state = AppState {
        provider,
        max_attempts: DEFAULT_MAX_ATTEMPTS,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/api/chart", get(api::chart))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("chart-data server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
