//! Injectable request observability collaborator.
//!
//! # Responsibility
//! - Give the service a seam for per-operation instrumentation without
//!   process-wide mutable middleware state.
//!
//! # Invariants
//! - Observers are side-effect-only; they can never fail an operation.

use std::time::Duration;

/// One completed service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEvent {
    /// Operation name: `list`, `create`, `replace`, `update_sub_items`,
    /// `remove`.
    pub operation: &'static str,
    /// `ok` on success, otherwise the failure classification label.
    pub outcome: &'static str,
    pub duration: Duration,
}

/// Observer seam consumed by the service for every operation.
pub trait ServiceObserver {
    fn record(&self, event: &ServiceEvent);
}

/// Lets callers keep ownership of an observer and inspect it after the
/// service is done with it.
impl<T: ServiceObserver> ServiceObserver for &T {
    fn record(&self, event: &ServiceEvent) {
        (*self).record(event);
    }
}

/// Default observer forwarding events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ServiceObserver for LogObserver {
    fn record(&self, event: &ServiceEvent) {
        log::info!(
            "event=competence_{} module=service status={} duration_ms={}",
            event.operation,
            event.outcome,
            event.duration.as_millis()
        );
    }
}

/// Observer that drops every event; for callers that bring their own
/// instrumentation at the transport layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ServiceObserver for NoopObserver {
    fn record(&self, _event: &ServiceEvent) {}
}
