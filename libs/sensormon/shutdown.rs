//! Graceful shutdown management
//!
//! The running flag here is the same flag the link manager polls: handing
//! it to the builder means one Ctrl+C stops the read loop, the retry
//! driver and the operator loop together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::sleep;
use tracing::info;

/// Coordinates shutdown of every long-running loop in the process
pub struct ShutdownManager {
    running: Arc<AtomicBool>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Spawn a Ctrl+C handler that clears the running flag
    pub fn spawn_signal_handler(&self) {
        let running = Arc::clone(&self.running);
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal, stopping");
                running.store(false, Ordering::Release);
            }
        });
    }

    /// Check if the process should continue running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Request shutdown programmatically
    pub fn trigger(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Get a clone of the running flag for sharing with other components
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Sleep for a duration, waking early if shutdown is triggered
    pub async fn interruptible_sleep(&self, duration: Duration) {
        let check_interval = Duration::from_millis(50);
        let mut elapsed = Duration::ZERO;

        while elapsed < duration && self.is_running() {
            sleep(check_interval).await;
            elapsed += check_interval;
        }
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_clears_the_flag() {
        let shutdown = ShutdownManager::new();
        assert!(shutdown.is_running());

        shutdown.trigger();
        assert!(!shutdown.is_running());
        assert!(!shutdown.flag().load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn interruptible_sleep_wakes_early() {
        let shutdown = ShutdownManager::new();
        shutdown.trigger();

        let start = std::time::Instant::now();
        shutdown.interruptible_sleep(Duration::from_secs(10)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
