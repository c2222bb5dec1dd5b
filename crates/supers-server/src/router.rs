//! Axum router construction.
//!
//! Assembles all routes into a single [`Router`] with CORS enabled so
//! browser overlays served from another origin can open the stream.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, ingest, stream};

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /api/status` -- JSON status
/// - `GET /super/stream` -- push stream of the watched file
/// - `POST /super` -- replace the watched file's content
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status
        .route("/", get(handlers::index))
        .route("/api/status", get(handlers::status))
        // Super text
        .route("/super", post(ingest::post_super))
        .route("/super/stream", get(stream::stream_super))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
