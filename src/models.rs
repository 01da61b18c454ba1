use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::oneshot;

use crate::mailer::{MailError, OutgoingEmail};

// Contact form request body. Fields are optional so missing ones surface as
// field errors instead of a blanket parse failure.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub honeypot: Option<String>,
    // ms the visitor spent on the form before submitting
    #[serde(default)]
    pub timestamp: Option<f64>,
}

// Validated, trimmed submission
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String, // lowercased
    pub message: String,
}

pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

// Queued email - holds the message + response channel
pub struct QueuedEmail {
    pub email: OutgoingEmail,
    pub response_tx: oneshot::Sender<Result<Option<String>, MailError>>, // provider message id
}
