use std::sync::Arc;
use std::time::Duration;

use super::alert_scheduler::{AlertCallback, AlertScheduler, PendingAlert};
use super::engagement_config::EngagementConfig;
use super::focus_zone::FocusZone;
use super::gaze_sample::GazeSample;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngagementState {
    Engaged,
    Disengaged,
}

/// Classifies gaze samples against a focus zone and raises a debounced
/// disengagement alert.
///
/// State follows the latest sample immediately; only the alert is
/// debounced. At most one alert is pending at a time: a sample inside the
/// zone cancels it, a sample outside (or absent) starts one only if none
/// is pending. Outstanding alerts are cancelled on [`reset`](Self::reset)
/// and on drop.
pub struct GazeEngagementEvaluator {
    scheduler: Box<dyn AlertScheduler>,
    on_disengaged: AlertCallback,
    debounce: Duration,
    pending: Option<Box<dyn PendingAlert>>,
    state: Option<EngagementState>,
    tracking: bool,
}

impl GazeEngagementEvaluator {
    pub fn new(
        scheduler: Box<dyn AlertScheduler>,
        debounce: Duration,
        on_disengaged: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            scheduler,
            on_disengaged: Arc::new(on_disengaged),
            debounce,
            pending: None,
            state: None,
            tracking: true,
        }
    }

    pub fn from_config(
        scheduler: Box<dyn AlertScheduler>,
        config: &EngagementConfig,
        on_disengaged: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self::new(scheduler, config.debounce(), on_disengaged)
    }

    pub fn on_sample(&mut self, sample: GazeSample, zone: &FocusZone) {
        let inside = sample.point().is_some_and(|p| zone.contains(p));
        if inside {
            self.state = Some(EngagementState::Engaged);
            self.cancel_pending();
        } else {
            self.state = Some(EngagementState::Disengaged);
            self.start_alert_timer();
        }
    }

    /// Cancels any pending alert and forgets the last classification.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.state = None;
    }

    /// Resumes alerting. Any stale pending alert is cleared first.
    pub fn start_tracking(&mut self) {
        self.tracking = true;
        self.cancel_pending();
    }

    /// Pauses alerting: pending alerts are cancelled and outside samples
    /// schedule nothing until tracking resumes.
    pub fn stop_tracking(&mut self) {
        self.tracking = false;
        self.cancel_pending();
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Classification of the most recent sample, `None` before the first
    /// sample or after a reset.
    pub fn state(&self) -> Option<EngagementState> {
        self.state
    }

    pub fn has_pending_alert(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.is_pending())
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    fn start_alert_timer(&mut self) {
        if !self.tracking || self.has_pending_alert() {
            return;
        }
        log::debug!(
            "Gaze left focus zone, alert in {}ms",
            self.debounce.as_millis()
        );
        let alert = self
            .scheduler
            .schedule(self.debounce, Arc::clone(&self.on_disengaged));
        self.pending = Some(alert);
    }

    fn cancel_pending(&mut self) {
        if let Some(mut alert) = self.pending.take() {
            if alert.is_pending() {
                log::debug!("Cancelling pending disengagement alert");
            }
            alert.cancel();
        }
    }
}

impl Drop for GazeEngagementEvaluator {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::domain::focus_zone::compute_focus_zone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum FakeState {
        Pending,
        Fired,
        Cancelled,
    }

    struct FakeAlert {
        state: Arc<Mutex<FakeState>>,
    }

    impl PendingAlert for FakeAlert {
        fn is_pending(&self) -> bool {
            *self.state.lock().unwrap() == FakeState::Pending
        }

        fn cancel(&mut self) {
            let mut state = self.state.lock().unwrap();
            if *state == FakeState::Pending {
                *state = FakeState::Cancelled;
            }
        }
    }

    /// Records every scheduled alert so tests can fire them by hand.
    #[derive(Clone, Default)]
    struct FakeScheduler {
        scheduled: Arc<Mutex<Vec<(Duration, Arc<Mutex<FakeState>>, AlertCallback)>>>,
    }

    impl FakeScheduler {
        fn count(&self) -> usize {
            self.scheduled.lock().unwrap().len()
        }

        fn state_of(&self, index: usize) -> FakeState {
            *self.scheduled.lock().unwrap()[index].1.lock().unwrap()
        }

        fn fire(&self, index: usize) {
            let (state, callback) = {
                let scheduled = self.scheduled.lock().unwrap();
                (
                    Arc::clone(&scheduled[index].1),
                    Arc::clone(&scheduled[index].2),
                )
            };
            let mut state = state.lock().unwrap();
            if *state == FakeState::Pending {
                *state = FakeState::Fired;
                callback();
            }
        }
    }

    impl AlertScheduler for FakeScheduler {
        fn schedule(&self, delay: Duration, on_fire: AlertCallback) -> Box<dyn PendingAlert> {
            let state = Arc::new(Mutex::new(FakeState::Pending));
            self.scheduled
                .lock()
                .unwrap()
                .push((delay, Arc::clone(&state), on_fire));
            Box::new(FakeAlert { state })
        }
    }

    fn evaluator() -> (GazeEngagementEvaluator, FakeScheduler, Arc<AtomicUsize>) {
        let scheduler = FakeScheduler::default();
        let alerts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&alerts);
        let evaluator = GazeEngagementEvaluator::new(
            Box::new(scheduler.clone()),
            Duration::from_millis(2000),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );
        (evaluator, scheduler, alerts)
    }

    fn zone() -> FocusZone {
        compute_focus_zone(800.0, 600.0, 0.5)
    }

    const INSIDE: GazeSample = GazeSample::At(crate::shared::point::Point::new(400.0, 300.0));
    const OUTSIDE: GazeSample = GazeSample::At(crate::shared::point::Point::new(10.0, 10.0));

    #[test]
    fn test_initial_state() {
        let (ev, scheduler, _) = evaluator();
        assert_eq!(ev.state(), None);
        assert!(ev.is_tracking());
        assert!(!ev.has_pending_alert());
        assert_eq!(scheduler.count(), 0);
    }

    #[test]
    fn test_inside_sample_schedules_nothing() {
        let (mut ev, scheduler, _) = evaluator();
        ev.on_sample(INSIDE, &zone());
        assert_eq!(ev.state(), Some(EngagementState::Engaged));
        assert_eq!(scheduler.count(), 0);
        assert!(!ev.has_pending_alert());
    }

    #[test]
    fn test_outside_sample_schedules_one_alert_with_debounce() {
        let (mut ev, scheduler, _) = evaluator();
        ev.on_sample(OUTSIDE, &zone());
        assert_eq!(ev.state(), Some(EngagementState::Disengaged));
        assert_eq!(scheduler.count(), 1);
        assert_eq!(
            scheduler.scheduled.lock().unwrap()[0].0,
            Duration::from_millis(2000)
        );
        assert!(ev.has_pending_alert());
    }

    #[test]
    fn test_absent_sample_counts_as_outside() {
        let (mut ev, scheduler, _) = evaluator();
        ev.on_sample(GazeSample::Absent, &zone());
        assert_eq!(ev.state(), Some(EngagementState::Disengaged));
        assert_eq!(scheduler.count(), 1);
    }

    #[test]
    fn test_boundary_sample_counts_as_outside() {
        let (mut ev, scheduler, _) = evaluator();
        ev.on_sample(GazeSample::at(200.0, 300.0), &zone());
        assert_eq!(ev.state(), Some(EngagementState::Disengaged));
        assert_eq!(scheduler.count(), 1);
    }

    #[test]
    fn test_repeated_outside_samples_do_not_stack() {
        let (mut ev, scheduler, _) = evaluator();
        ev.on_sample(OUTSIDE, &zone());
        ev.on_sample(OUTSIDE, &zone());
        ev.on_sample(GazeSample::Absent, &zone());
        assert_eq!(scheduler.count(), 1);
        assert_eq!(scheduler.state_of(0), FakeState::Pending);
    }

    #[test]
    fn test_inside_sample_cancels_pending_alert() {
        let (mut ev, scheduler, alerts) = evaluator();
        ev.on_sample(OUTSIDE, &zone());
        ev.on_sample(INSIDE, &zone());
        assert_eq!(scheduler.state_of(0), FakeState::Cancelled);
        assert!(!ev.has_pending_alert());

        scheduler.fire(0);
        assert_eq!(alerts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fired_alert_allows_a_new_one() {
        let (mut ev, scheduler, alerts) = evaluator();
        ev.on_sample(OUTSIDE, &zone());
        scheduler.fire(0);
        assert_eq!(alerts.load(Ordering::SeqCst), 1);
        assert!(!ev.has_pending_alert());

        ev.on_sample(OUTSIDE, &zone());
        assert_eq!(scheduler.count(), 2);
        assert!(ev.has_pending_alert());
    }

    #[test]
    fn test_alert_fires_once() {
        let (mut ev, scheduler, alerts) = evaluator();
        ev.on_sample(OUTSIDE, &zone());
        scheduler.fire(0);
        scheduler.fire(0);
        assert_eq!(alerts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reset_cancels_and_clears_state() {
        let (mut ev, scheduler, alerts) = evaluator();
        ev.on_sample(OUTSIDE, &zone());
        ev.reset();
        assert_eq!(ev.state(), None);
        assert!(!ev.has_pending_alert());
        assert_eq!(scheduler.state_of(0), FakeState::Cancelled);

        scheduler.fire(0);
        assert_eq!(alerts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reset_without_pending_is_safe() {
        let (mut ev, _, _) = evaluator();
        ev.reset();
        ev.reset();
        assert!(!ev.has_pending_alert());
    }

    #[test]
    fn test_stop_tracking_cancels_and_suppresses_alerts() {
        let (mut ev, scheduler, _) = evaluator();
        ev.on_sample(OUTSIDE, &zone());
        ev.stop_tracking();
        assert!(!ev.is_tracking());
        assert_eq!(scheduler.state_of(0), FakeState::Cancelled);

        ev.on_sample(OUTSIDE, &zone());
        ev.on_sample(GazeSample::Absent, &zone());
        assert_eq!(scheduler.count(), 1);
        assert_eq!(ev.state(), Some(EngagementState::Disengaged));
    }

    #[test]
    fn test_start_tracking_clears_pending_and_resumes() {
        let (mut ev, scheduler, _) = evaluator();
        ev.on_sample(OUTSIDE, &zone());
        ev.start_tracking();
        assert_eq!(scheduler.state_of(0), FakeState::Cancelled);

        ev.on_sample(OUTSIDE, &zone());
        assert_eq!(scheduler.count(), 2);
    }

    #[test]
    fn test_drop_cancels_pending_alert() {
        let (mut ev, scheduler, alerts) = evaluator();
        ev.on_sample(OUTSIDE, &zone());
        drop(ev);
        assert_eq!(scheduler.state_of(0), FakeState::Cancelled);
        scheduler.fire(0);
        assert_eq!(alerts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_config_uses_configured_debounce() {
        let config = EngagementConfig {
            debounce_ms: 750,
            ..Default::default()
        };
        let ev = GazeEngagementEvaluator::from_config(
            Box::new(FakeScheduler::default()),
            &config,
            || {},
        );
        assert_eq!(ev.debounce(), Duration::from_millis(750));
    }
}
