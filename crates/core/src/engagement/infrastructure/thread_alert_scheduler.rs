use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};

use super::alert_state::SharedAlertState;
use crate::engagement::domain::alert_scheduler::{AlertCallback, AlertScheduler, PendingAlert};

/// Wall-clock scheduler: each alert waits on its own worker thread.
///
/// The worker blocks on a cancel channel with the debounce as timeout.
/// Cancelling flips the shared phase first and then hangs up the channel,
/// so the worker exits early instead of sleeping out the full delay.
pub struct ThreadAlertScheduler;

impl ThreadAlertScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ThreadAlertScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertScheduler for ThreadAlertScheduler {
    fn schedule(&self, delay: Duration, on_fire: AlertCallback) -> Box<dyn PendingAlert> {
        let state = SharedAlertState::new();
        let (cancel_tx, cancel_rx) = crossbeam_channel::bounded::<()>(1);

        let worker_state = state.clone();
        std::thread::spawn(move || match cancel_rx.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {
                if worker_state.fire(&on_fire) {
                    log::info!("Disengagement alert fired after {}ms", delay.as_millis());
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
        });

        Box::new(ThreadPendingAlert {
            state,
            cancel_tx: Some(cancel_tx),
        })
    }
}

struct ThreadPendingAlert {
    state: SharedAlertState,
    cancel_tx: Option<Sender<()>>,
}

impl PendingAlert for ThreadPendingAlert {
    fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    fn cancel(&mut self) {
        self.state.cancel();
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.try_send(());
        }
    }
}

impl Drop for ThreadPendingAlert {
    fn drop(&mut self) {
        self.cancel();
    }
}
