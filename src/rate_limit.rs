use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::metrics::RATE_LIMIT_KEYS;

// Rate limit entry - request timestamps (ms since epoch) per IP/key
#[derive(Debug, Clone, Default)]
pub struct RateLimitEntry {
    pub timestamps: Vec<u64>,
}

// Outcome of a single check, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub allowed: bool,
    pub remaining: u32,
    pub retry_after: Option<u64>, // seconds
}

impl RateLimitInfo {
    fn denied(retry_after: Option<u64>) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after,
        }
    }
}

/// Sliding-window-by-log limiter.
///
/// Every accepted call appends its timestamp to the identifier's log, and a
/// call is accepted only while fewer than `max_requests` timestamps fall
/// inside the trailing `window_ms`. Rejected calls are not recorded.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u32,
    window_ms: u64,
}

pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window_ms,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    // Check with the configured limits
    pub fn check(&self, identifier: &str) -> RateLimitInfo {
        self.check_rate_limit(identifier, self.max_requests, self.window_ms)
    }

    pub fn check_rate_limit(&self, identifier: &str, max_requests: u32, window_ms: u64) -> RateLimitInfo {
        self.check_at(identifier, max_requests, window_ms, now_ms())
    }

    /// Same as [`check_rate_limit`](Self::check_rate_limit) with an explicit clock.
    ///
    /// The whole read-filter-append runs while `entry()` holds the shard
    /// lock, so two concurrent calls for one key can't both take the last slot.
    pub fn check_at(&self, identifier: &str, max_requests: u32, window_ms: u64, now: u64) -> RateLimitInfo {
        // nonsense limits deny everything and record nothing
        if max_requests == 0 || window_ms == 0 {
            return RateLimitInfo::denied(None);
        }

        let mut entry = self.entries.entry(identifier.to_string()).or_default();
        entry
            .timestamps
            .retain(|&t| now.saturating_sub(t) < window_ms);

        let count = entry.timestamps.len() as u64;
        if count >= u64::from(max_requests) {
            // oldest kept satisfies now - oldest < window, so this is > 0
            let oldest = entry.timestamps.first().copied().unwrap_or(now);
            let wait_ms = oldest.saturating_add(window_ms).saturating_sub(now);
            return RateLimitInfo::denied(Some(wait_ms.div_ceil(1000)));
        }

        entry.timestamps.push(now);
        RateLimitInfo {
            allowed: true,
            remaining: max_requests - entry.timestamps.len() as u32,
            retry_after: None,
        }
    }

    pub fn clear_rate_limit(&self, identifier: &str) {
        self.entries.remove(identifier);
    }

    pub fn clear_all_rate_limits(&self) {
        self.entries.clear();
    }

    // Drop stale timestamps, forget keys with none left. Returns keys removed.
    pub fn cleanup_old_entries(&self, window_ms: u64) -> usize {
        self.cleanup_at(window_ms, now_ms())
    }

    pub fn cleanup_at(&self, window_ms: u64, now: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            entry
                .timestamps
                .retain(|&t| now.saturating_sub(t) < window_ms);
            !entry.timestamps.is_empty()
        });
        RATE_LIMIT_KEYS.set(self.entries.len() as f64);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn timestamps(&self, identifier: &str) -> Option<Vec<u64>> {
        self.entries.get(identifier).map(|e| e.timestamps.clone())
    }
}

// Handle for the periodic sweep. Dropping it stops the task too.
pub struct CleanupTask {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl CleanupTask {
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

impl Drop for CleanupTask {
    fn drop(&mut self) {
        if self.shutdown_tx.is_some() {
            self.handle.abort();
        }
    }
}

// Sweep the limiter every `every` (10 minutes by default)
pub fn spawn_cleanup_task(limiter: Arc<RateLimiter>, every: Duration) -> CleanupTask {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick fires immediately, nothing to sweep yet
        ticker.tick().await;

        log::info!("Rate limit cleanup started (interval: {:?})", every);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    let removed = limiter.cleanup_old_entries(limiter.window_ms());
                    if removed > 0 {
                        log::debug!(
                            "Rate limit cleanup removed {} key(s), {} left",
                            removed,
                            limiter.len()
                        );
                    }
                }
            }
        }

        log::info!("Rate limit cleanup stopped");
    });

    CleanupTask {
        shutdown_tx: Some(shutdown_tx),
        handle,
    }
}
