use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use crate::mailer::Mailer;
use crate::metrics::{DELIVERY_LATENCY, EMAILS_SENT, EMAIL_FAILURES};
use crate::models::QueuedEmail;


// Background worker -> sends queued emails one at a time
pub async fn delivery_worker(mut rx: mpsc::Receiver<QueuedEmail>, mailer: Arc<dyn Mailer>) {
    log::info!("Delivery worker started (provider: {})", mailer.name());

    // keep receiving emails from the queue
    while let Some(queued) = rx.recv().await {
        let start = Instant::now();
        let result = mailer.send(&queued.email).await;
        DELIVERY_LATENCY.observe(start.elapsed().as_secs_f64());

        match &result {
            Ok(id) => {
                EMAILS_SENT.inc();
                log::info!(
                    "[Worker] Email sent (id: {})",
                    id.as_deref().unwrap_or("-")
                );
            }
            Err(e) => {
                EMAIL_FAILURES.inc();
                log::error!("[Worker] Email delivery failed: {}", e);
            }
        }

        // handler may have gone away, nothing to do then
        let _ = queued.response_tx.send(result);
    }

    log::info!("Delivery worker stopped");
}
