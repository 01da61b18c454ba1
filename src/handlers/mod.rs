mod health;
mod metrics;
mod contact;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use contact::contact_handler;
