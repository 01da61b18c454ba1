use axum::{http::StatusCode, response::IntoResponse};

pub async fn metrics_handler() -> impl IntoResponse {
    match crate::metrics::render() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => {
            log::error!("Metrics error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}
