//! Recurring removal of expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::cache::ResponseCache;

/// Handle to a running sweep task. Dropping it cancels the task; call
/// [`SweepHandle::stop`] to also wait for it to finish.
#[derive(Debug)]
pub struct SweepHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SweepHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Cache sweep task ended abnormally: {}", e);
            }
        }
        tracing::debug!("Cache sweep stopped");
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Start sweeping `cache` every `every`. Must be called inside a tokio
/// runtime.
pub fn spawn_sweeper(cache: Arc<ResponseCache>, every: Duration) -> SweepHandle {
    // tokio's interval rejects a zero period
    let every = every.max(Duration::from_millis(1));
    let token = CancellationToken::new();
    let cancelled = token.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancelled.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = cache.sweep();
                    if removed > 0 {
                        tracing::debug!(removed, remaining = cache.len(), "Swept expired cache entries");
                    }
                }
            }
        }
    });

    tracing::debug!(interval_ms = every.as_millis() as u64, "Cache sweep started");
    SweepHandle {
        token,
        task: Some(task),
    }
}
