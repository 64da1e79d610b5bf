//! HTTP routes — the chat relay under `/api` plus the frontend bundle.

pub mod chat;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new().nest("/api", api_routes());

    let index = state.config.index_file();
    if index.is_file() {
        info!("Serving frontend from {}", state.config.static_dir.display());
        // Unknown paths get the single-page entry point.
        let assets = ServeDir::new(&state.config.static_dir).fallback(ServeFile::new(index));
        router = router.fallback_service(assets);
    } else {
        warn!(
            "No frontend bundle at {}; serving API only",
            index.display()
        );
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new().merge(chat::routes())
}
