use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::{ErrorResponse, FieldErrors};

// Retry-After when the limiter gives no hint
const DEFAULT_RETRY_AFTER: u64 = 3600;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Invalid form data")]
    MalformedPayload,

    #[error("Invalid submission")]
    Honeypot,

    #[error("Submission too fast. Please try again.")]
    TooFast,

    #[error("Too many requests. Please try again in {} seconds.", .retry_after.unwrap_or(DEFAULT_RETRY_AFTER))]
    RateLimited { retry_after: Option<u64>, remaining: u32 },

    #[error("Invalid form data")]
    Validation(FieldErrors),

    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email. Please try again later.")]
    Delivery,
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::MalformedPayload
            | ContactError::Honeypot
            | ContactError::TooFast
            | ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ContactError::NotConfigured | ContactError::Delivery => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            errors: match &self {
                ContactError::Validation(errors) => Some(errors.clone()),
                _ => None,
            },
        };

        let mut response = (status, Json(body)).into_response();

        if let ContactError::RateLimited { retry_after, remaining } = self {
            let headers = response.headers_mut();
            headers.insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_after.unwrap_or(DEFAULT_RETRY_AFTER)),
            );
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
        }

        response
    }
}
