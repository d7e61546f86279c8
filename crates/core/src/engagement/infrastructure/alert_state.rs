use std::sync::{Arc, Mutex, MutexGuard};

use crate::engagement::domain::alert_scheduler::AlertCallback;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertPhase {
    Pending,
    Fired,
    Cancelled,
}

/// Fire/cancel arbitration shared between a scheduler and its handle.
///
/// Whichever of `fire` and `cancel` takes the lock first decides the
/// outcome. The callback itself runs after the lock is released, so it may
/// block on the caller's own locks without stalling `is_pending`.
#[derive(Clone, Debug)]
pub struct SharedAlertState {
    phase: Arc<Mutex<AlertPhase>>,
}

impl SharedAlertState {
    pub fn new() -> Self {
        Self {
            phase: Arc::new(Mutex::new(AlertPhase::Pending)),
        }
    }

    pub fn phase(&self) -> AlertPhase {
        *self.lock()
    }

    pub fn is_pending(&self) -> bool {
        self.phase() == AlertPhase::Pending
    }

    /// Returns true if this call moved the alert out of `Pending`.
    pub fn cancel(&self) -> bool {
        let mut phase = self.lock();
        if *phase == AlertPhase::Pending {
            *phase = AlertPhase::Cancelled;
            true
        } else {
            false
        }
    }

    /// Runs `callback` if still pending. Returns whether it ran.
    pub fn fire(&self, callback: &AlertCallback) -> bool {
        {
            let mut phase = self.lock();
            if *phase != AlertPhase::Pending {
                return false;
            }
            *phase = AlertPhase::Fired;
        }
        callback();
        true
    }

    // A panicking callback poisons the lock; the phase is still meaningful.
    fn lock(&self) -> MutexGuard<'_, AlertPhase> {
        self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SharedAlertState {
    fn default() -> Self {
        Self::new()
    }
}
