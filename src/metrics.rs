use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref CONTACT_REQUESTS: Counter =
        register_counter!("contact_requests_total", "Total contact form submissions").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("contact_rate_limited_total", "Submissions rejected by the rate limiter").unwrap();
    pub static ref REJECTED: Counter =
        register_counter!("contact_rejected_total", "Submissions rejected as bots or invalid").unwrap();
    pub static ref EMAILS_SENT: Counter =
        register_counter!("contact_emails_sent_total", "Emails delivered").unwrap();
    pub static ref EMAIL_FAILURES: Counter =
        register_counter!("contact_email_failures_total", "Email deliveries that failed").unwrap();
    pub static ref DELIVERY_LATENCY: Histogram = register_histogram!(
        "contact_delivery_latency_seconds",
        "Email delivery latency in seconds"
    )
    .unwrap();
    pub static ref RATE_LIMIT_KEYS: Gauge =
        register_gauge!("contact_rate_limit_keys", "Identifiers currently tracked by the rate limiter").unwrap();
}

// Prometheus text exposition of everything registered above
pub fn render() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("Encode error: {}", e))?;
    String::from_utf8(buffer).map_err(|e| format!("Encode error: {}", e))
}
