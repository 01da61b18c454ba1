use clap::Parser;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rate limit max requests must be at least 1")]
    ZeroMaxRequests,
    #[error("rate limit window must be at least 1 ms")]
    ZeroWindow,
    #[error("cleanup interval must be at least 1 second")]
    ZeroCleanupInterval,
    #[error("contact email is empty")]
    EmptyContactEmail,
}

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "folio-contact")]
#[command(about = "Contact form backend for the portfolio site")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Rate limit max requests per window
    #[arg(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = 3)]
    pub rate_limit_max_requests: u32,

    // Rate limit window in milliseconds (1 hour)
    #[arg(long, env = "RATE_LIMIT_WINDOW_MS", default_value_t = 3_600_000)]
    pub rate_limit_window_ms: u64,

    // How often stale rate limit keys are swept, in seconds
    #[arg(long, env = "RATE_LIMIT_CLEANUP_SECS", default_value_t = 600)]
    pub cleanup_interval_secs: u64,

    // Submissions faster than this (ms on the form) are treated as bots
    #[arg(long, env = "MIN_SUBMISSION_MS", default_value_t = 3000)]
    pub min_submission_ms: u64,

    // Resend API key, no key means no delivery
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: Option<String>,

    #[arg(long, env = "RESEND_URL", default_value = "https://api.resend.com")]
    pub resend_url: String,

    // Where submissions are delivered
    #[arg(long, env = "CONTACT_EMAIL", default_value = "your@email.com")]
    pub contact_email: String,

    #[arg(long, env = "CONTACT_FROM", default_value = "Portfolio Contact <onboarding@resend.dev>")]
    pub from_address: String,

    // Accept submissions without a mail provider (logs them instead)
    #[arg(long, env = "DEV_MODE", default_value_t = false)]
    pub dev_mode: bool,
}

impl Args {
    // Checked once at startup so the limiter never sees nonsense limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit_max_requests == 0 {
            return Err(ConfigError::ZeroMaxRequests);
        }
        if self.rate_limit_window_ms == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::ZeroCleanupInterval);
        }
        if self.contact_email.trim().is_empty() {
            return Err(ConfigError::EmptyContactEmail);
        }
        Ok(())
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    // NODE_ENV=development keeps working for existing deployments
    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode
            || std::env::var("NODE_ENV").is_ok_and(|v| v == "development")
    }
}
