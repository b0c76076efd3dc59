//! Route definitions for the NexusScan API.

pub mod analysis;
pub mod auth;
pub mod cli;
pub mod dashboard;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router with CORS and trace layers. Shared
/// between `main` and the integration tests.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/session", get(auth::session))
        .route("/analysis/upload", post(analysis::upload))
        .route("/analysis/history", get(analysis::history))
        .route(
            "/analysis/{id}",
            get(analysis::get_by_id).delete(analysis::delete),
        )
        .route("/analysis/{id}/action", post(analysis::apply_action))
        .route("/files/by-status/{status}", get(analysis::by_status))
        .route("/cli/execute", post(cli::execute))
        .route("/cli/history", get(cli::history))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/health", get(health::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
