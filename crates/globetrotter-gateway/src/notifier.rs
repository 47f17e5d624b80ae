//! Failure reporting seam. The gateway reports each failed call exactly once
//! through a [`Notifier`] and never returns the error itself.

use tokio::sync::mpsc;

use crate::types::Failure;

pub trait Notifier: Send + Sync {
    fn report_failure(&self, failure: &Failure);
}

/// Writes failures to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn report_failure(&self, failure: &Failure) {
        tracing::error!(title = %failure.title, hint = failure.hint, "{}", failure.description);
    }
}

/// Forwards failures to whoever owns the receiver, typically the UI thread
/// that shows toasts.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Failure>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Failure>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn report_failure(&self, failure: &Failure) {
        if self.tx.send(failure.clone()).is_err() {
            tracing::debug!("Failure receiver dropped; notification discarded: {}", failure.title);
        }
    }
}
