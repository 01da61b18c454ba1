use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::ContactSubmission;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider rejected email ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("delivery worker unavailable")]
    WorkerGone,
}

// Provider-agnostic email ready to hand off
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    fn name(&self) -> &str;

    // Ok carries the provider's message id when it returns one
    async fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, MailError>;
}

// Resend HTTP API
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: Option<String>,
}

impl ResendMailer {
    pub fn new(client: reqwest::Client, api_key: String, base_url: &str) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    fn name(&self) -> &str {
        "resend"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, MailError> {
        let res = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(10))
            .json(email)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: ResendResponse = res.json().await?;
        Ok(body.id)
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the notification email for a validated submission.
///
/// Replies go straight to the visitor. User-supplied text is escaped in the
/// HTML body.
pub fn compose(sub: &ContactSubmission, to: &str, from: &str, sent_at: DateTime<Utc>) -> OutgoingEmail {
    let stamp = sent_at.format("%Y-%m-%d %H:%M:%S UTC");
    let name = escape_html(&sub.name);
    let email = escape_html(&sub.email);
    let message = escape_html(&sub.message).replace('\n', "<br>");

    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"></head>
  <body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h1 style="margin: 0; font-size: 24px;">New Contact Form Submission</h1>
      <p><strong>From</strong><br>{name}</p>
      <p><strong>Email</strong><br><a href="mailto:{email}">{email}</a></p>
      <p><strong>Message</strong><br>{message}</p>
      <hr>
      <p style="font-size: 12px; color: #999;">Sent from your portfolio contact form at {stamp}</p>
      <p style="font-size: 12px; color: #999;">Reply directly to this email to respond to {name}</p>
    </div>
  </body>
</html>"#
    );

    let text = format!(
        "New Contact Form Submission\n\nFrom: {}\nEmail: {}\n\nMessage:\n{}\n\n---\nSent from your portfolio contact form at {}",
        sub.name, sub.email, sub.message, stamp
    );

    OutgoingEmail {
        from: from.to_string(),
        to: vec![to.to_string()],
        reply_to: sub.email.clone(),
        subject: format!("Portfolio Contact from {}", sub.name),
        html,
        text,
    }
}
