//! Route definitions for the numera API.

pub mod health;
pub mod pattern_configs;
pub mod running_codes;
pub mod sequences;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router. Shared by `main` and the integration
/// tests so both serve the same surface.
pub fn api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = Router::new()
        .route(
            "/pattern-configs",
            get(pattern_configs::list).post(pattern_configs::create),
        )
        .route(
            "/pattern-configs/{id}",
            get(pattern_configs::get_by_id)
                .put(pattern_configs::update)
                .delete(pattern_configs::delete),
        )
        .route(
            "/pattern-configs/type/{document_type}",
            get(pattern_configs::get_by_type),
        )
        .route("/sequences/allocate", post(sequences::allocate))
        .route("/running-codes/generate", post(running_codes::generate));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
