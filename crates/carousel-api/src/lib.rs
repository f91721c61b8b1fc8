//! Tarot carousel — HTTP API.
//!
//! Hosts carousel sessions in memory and exposes them over JSON: create a
//! session from a document, read the current frame, send inputs and advance
//! time.

use axum::Router;

pub mod error;
pub mod notifications;
pub mod routes;
pub mod state;

/// Builds the application router with every route mounted.
pub fn app(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/carousels", routes::carousel::router())
        .with_state(state)
}
