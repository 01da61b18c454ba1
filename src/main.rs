use clap::Parser; // for cli
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use folio_contact::config::Args;
use folio_contact::create_router;
use folio_contact::mailer::{Mailer, ResendMailer};
use folio_contact::models::QueuedEmail;
use folio_contact::rate_limit::{RateLimiter, spawn_cleanup_task};
use folio_contact::state::AppState;
use folio_contact::worker::delivery_worker;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

// this is main async function with tokio
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // parse cli arguments
    let args = Args::parse();
    args.validate()?;
    let dev_mode = args.is_dev_mode();

    let rate_limiter = Arc::new(RateLimiter::new(
        args.rate_limit_max_requests,
        args.rate_limit_window_ms,
    ));
    let cleanup = spawn_cleanup_task(Arc::clone(&rate_limiter), args.cleanup_interval());

    // spawn the delivery worker only when a provider is configured
    let mail_tx = match args.resend_api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => {
            let (mail_tx, mail_rx) = mpsc::channel::<QueuedEmail>(100);
            let client = reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(5))
                .build()?;
            let mailer: Arc<dyn Mailer> =
                Arc::new(ResendMailer::new(client, key.to_string(), &args.resend_url));
            tokio::spawn(delivery_worker(mail_rx, mailer));
            Some(mail_tx)
        }
        None => {
            log::warn!("RESEND_API_KEY not set - emails will not be delivered");
            None
        }
    };

    // creating shared state
    let state = Arc::new(AppState {
        rate_limiter,
        min_submission: Duration::from_millis(args.min_submission_ms),
        contact_email: args.contact_email.clone(),
        from_address: args.from_address.clone(),
        mail_tx,
        dev_mode,
    });

    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("Contact service running on http://localhost:{}", args.port);
    log::info!("Delivering to {}", args.contact_email);
    log::info!(
        "Rate limit: {} requests per {} ms",
        args.rate_limit_max_requests, args.rate_limit_window_ms
    );
    if dev_mode {
        log::info!("Development mode: submissions without a provider are accepted");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.shutdown().await;
    Ok(())
}
