use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::alert_state::SharedAlertState;
use crate::engagement::domain::alert_scheduler::{AlertCallback, AlertScheduler, PendingAlert};

struct ScheduledAlert {
    deadline: Duration,
    seq: u64,
    state: SharedAlertState,
    callback: AlertCallback,
}

#[derive(Default)]
struct ClockInner {
    now: Duration,
    next_seq: u64,
    queue: Vec<ScheduledAlert>,
}

/// Virtual-time scheduler driven explicitly by the caller.
///
/// Time only moves through [`advance_to`](Self::advance_to) and
/// [`advance_by`](Self::advance_by). Due alerts fire in deadline order
/// (ties in scheduling order), and the clock reads each alert's deadline
/// while its callback runs. Clones share the same timeline.
#[derive(Clone, Default)]
pub struct ManualClock {
    inner: Arc<Mutex<ClockInner>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Alerts scheduled and neither fired nor cancelled.
    pub fn pending_count(&self) -> usize {
        self.lock()
            .queue
            .iter()
            .filter(|a| a.state.is_pending())
            .count()
    }

    /// Moves time forward to `target`, firing every alert due on the way.
    /// Returns the number of callbacks run. Targets in the past are ignored.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        while let Some(alert) = self.pop_due(target) {
            // Lock released: callbacks may read the clock.
            if alert.state.fire(&alert.callback) {
                fired += 1;
            }
        }
        let mut inner = self.lock();
        if target > inner.now {
            inner.now = target;
        }
        fired
    }

    pub fn advance_by(&self, delta: Duration) -> usize {
        let target = self.now() + delta;
        self.advance_to(target)
    }

    fn pop_due(&self, target: Duration) -> Option<ScheduledAlert> {
        let mut inner = self.lock();
        inner.queue.retain(|a| a.state.is_pending());
        let index = inner
            .queue
            .iter()
            .enumerate()
            .filter(|(_, a)| a.deadline <= target)
            .min_by_key(|(_, a)| (a.deadline, a.seq))
            .map(|(i, _)| i)?;
        let alert = inner.queue.swap_remove(index);
        if alert.deadline > inner.now {
            inner.now = alert.deadline;
        }
        Some(alert)
    }

    fn lock(&self) -> MutexGuard<'_, ClockInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AlertScheduler for ManualClock {
    fn schedule(&self, delay: Duration, on_fire: AlertCallback) -> Box<dyn PendingAlert> {
        let state = SharedAlertState::new();
        let mut inner = self.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let deadline = inner.now + delay;
        inner.queue.push(ScheduledAlert {
            deadline,
            seq,
            state: state.clone(),
            callback: on_fire,
        });
        Box::new(ManualPendingAlert { state })
    }
}

struct ManualPendingAlert {
    state: SharedAlertState,
}

impl PendingAlert for ManualPendingAlert {
    fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    fn cancel(&mut self) {
        self.state.cancel();
    }
}
