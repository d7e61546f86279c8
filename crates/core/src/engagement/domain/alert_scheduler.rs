use std::sync::Arc;
use std::time::Duration;

/// Caller-supplied action run when sustained disengagement is detected.
pub type AlertCallback = Arc<dyn Fn() + Send + Sync>;

/// Handle to one scheduled deferred alert.
pub trait PendingAlert: Send {
    /// True until the alert has fired or been cancelled.
    fn is_pending(&self) -> bool;

    /// Cancels the alert. Safe to call repeatedly, after firing, or on an
    /// alert that never started. A cancel that lands while the alert is
    /// still pending guarantees the callback never starts; one that lands
    /// after the fire was claimed is a no-op.
    fn cancel(&mut self);
}

/// Domain interface for scheduling a one-shot deferred alert.
///
/// Implementations decide what "time" means (wall clock, virtual clock).
/// Each scheduled alert fires at most once.
pub trait AlertScheduler: Send {
    fn schedule(&self, delay: Duration, on_fire: AlertCallback) -> Box<dyn PendingAlert>;
}
