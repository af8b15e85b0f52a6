//! Periodic health checks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::BackendApi;
use crate::defaults::health::MIN_POLL_INTERVAL;
use crate::types::HealthReport;

/// Background task checking provider health immediately and then every
/// `interval`.
///
/// Successful reports are sent on the channel returned by [`spawn`]. A failed
/// check is logged and polling continues. The task stops when the receiver
/// is dropped, on [`stop`], or when the poller is dropped.
///
/// [`spawn`]: HealthPoller::spawn
/// [`stop`]: HealthPoller::stop
#[derive(Debug)]
pub struct HealthPoller {
    handle: JoinHandle<()>,
}

impl HealthPoller {
    /// Start polling. Must be called within a tokio runtime.
    ///
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn spawn<B>(backend: Arc<B>, interval: Duration) -> (Self, mpsc::Receiver<HealthReport>)
    where
        B: BackendApi + ?Sized + 'static,
    {
        if interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                requested = ?interval,
                minimum = ?MIN_POLL_INTERVAL,
                "health poll interval too short, using minimum"
            );
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // first tick completes immediately
                ticker.tick().await;
                match backend.health().await {
                    Ok(report) => {
                        if tx.send(report).await.is_err() {
                            tracing::debug!("health receiver dropped, stopping poller");
                            break;
                        }
                    }
                    Err(e) => tracing::error!("Health check failed: {e}"),
                }
            }
        });
        (Self { handle }, rx)
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for HealthPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
