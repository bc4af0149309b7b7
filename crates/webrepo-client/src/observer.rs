//! Observer implementations for repository side-channel events.

use webrepo_core::traits::observer::Observer;

/// Default observer forwarding repository events to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn info(&self, message: &str) {
        tracing::info!(target: "webrepo", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "webrepo", "{message}");
    }
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn info(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}
}
