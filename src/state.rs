use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use crate::models::QueuedEmail;
use crate::rate_limit::RateLimiter;
// app's shared state

pub struct AppState {
    pub rate_limiter: Arc<RateLimiter>,
    pub min_submission: Duration, // faster than this is a bot
    pub contact_email: String,    // delivery address
    pub from_address: String,
    pub mail_tx: Option<mpsc::Sender<QueuedEmail>>, // None: no provider configured
    pub dev_mode: bool,
}
