//! Contains all the routes that this application can handle.

mod api;
mod pages;

// re-export errors
pub use api::subscribe::{SubscribeError, SubscribeOutcome};

use crate::AppState;
use pages::{home, thanks};

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/thanks", get(thanks))
        .nest("/api", api_routes())
        .route("/health-check", get(health_check))
        .with_state(app_state)
}

/// API - Routes nested under "/api" path
fn api_routes() -> Router<AppState> {
    Router::new().route("/subscribe", post(api::subscribe))
}
