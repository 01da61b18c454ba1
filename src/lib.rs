pub mod client_id;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod metrics;
pub mod models;
pub mod motion;
pub mod rate_limit;
pub mod state;
pub mod validation;
pub mod worker;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{contact_handler, health_handler, metrics_handler};
use crate::state::AppState;

// Form posts come from the static site's origin
fn contact_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// creating the router with routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let contact_routes = Router::new()
        .route("/api/contact", post(contact_handler))
        .route("/contact", post(contact_handler)) // legacy path
        .layer(contact_cors());

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(contact_routes)
        .with_state(state)
}
