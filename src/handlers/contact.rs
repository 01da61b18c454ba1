use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::client_id::{client_identifier, fingerprint};
use crate::error::ContactError;
use crate::mailer::{MailError, compose};
use crate::metrics::{CONTACT_REQUESTS, RATE_LIMITED, RATE_LIMIT_KEYS, REJECTED};
use crate::models::{ContactRequest, ContactResponse, QueuedEmail};
use crate::state::AppState;
use crate::validation::validate;

fn with_remaining(mut response: Response, remaining: u32) -> Response {
    response
        .headers_mut()
        .insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    response
}

// POST /api/contact
pub async fn contact_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Response, ContactError> {
    CONTACT_REQUESTS.inc();

    let Json(body) = payload.map_err(|e| {
        REJECTED.inc();
        log::warn!("Malformed contact payload: {}", e);
        ContactError::MalformedPayload
    })?;

    // bots fill every field, people never see this one
    if body.honeypot.as_deref().is_some_and(|h| !h.is_empty()) {
        REJECTED.inc();
        log::warn!("Honeypot triggered");
        return Err(ContactError::Honeypot);
    }

    // zero means the form didn't report timing; negative is forged
    if let Some(elapsed) = body.timestamp {
        if elapsed != 0.0 && elapsed < state.min_submission.as_millis() as f64 {
            REJECTED.inc();
            log::warn!("Submission too fast ({} ms)", elapsed);
            return Err(ContactError::TooFast);
        }
    }

    let client_id = client_identifier(&headers);
    let limit = state.rate_limiter.check(&client_id);
    RATE_LIMIT_KEYS.set(state.rate_limiter.len() as f64);

    if !limit.allowed {
        RATE_LIMITED.inc();
        log::warn!(
            "Rate limit exceeded (client: {}, retry after: {:?}s)",
            fingerprint(&client_id),
            limit.retry_after
        );
        return Err(ContactError::RateLimited {
            retry_after: limit.retry_after,
            remaining: limit.remaining,
        });
    }

    let submission = validate(&body).map_err(|errors| {
        REJECTED.inc();
        log::warn!("Validation failed for fields: {:?}", errors.keys().collect::<Vec<_>>());
        ContactError::Validation(errors)
    })?;

    let Some(mail_tx) = &state.mail_tx else {
        if state.dev_mode {
            log::info!(
                "Contact submission (dev mode, not sent): {} <{}>: {}",
                submission.name,
                submission.email,
                submission.message
            );
            let body = ContactResponse {
                success: true,
                message: "Message received (development mode - email not sent)".to_string(),
                message_id: None,
            };
            return Ok(with_remaining(Json(body).into_response(), limit.remaining));
        }
        log::error!("Mail provider not configured - API key missing");
        return Err(ContactError::NotConfigured);
    };

    let email = compose(
        &submission,
        &state.contact_email,
        &state.from_address,
        chrono::Utc::now(),
    );

    // Create oneshot channel for the delivery result
    let (response_tx, response_rx) = oneshot::channel();
    let queued = QueuedEmail { email, response_tx };

    let delivered = match mail_tx.send(queued).await {
        Ok(()) => response_rx.await.unwrap_or(Err(MailError::WorkerGone)),
        Err(_) => Err(MailError::WorkerGone),
    };

    let message_id = delivered.map_err(|e| {
        log::error!("Failed to send email: {}", e);
        ContactError::Delivery
    })?;

    log::info!(
        "Contact form submitted (client: {}, message id: {})",
        fingerprint(&client_id),
        message_id.as_deref().unwrap_or("-")
    );

    let body = ContactResponse {
        success: true,
        message: "Message sent successfully!".to_string(),
        message_id,
    };
    Ok(with_remaining(Json(body).into_response(), limit.remaining))
}
