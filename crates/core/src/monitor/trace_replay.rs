use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use super::infrastructure::gaze_trace::{TraceError, TraceEvent};
use crate::engagement::domain::engagement_config::EngagementConfig;
use crate::engagement::domain::engagement_evaluator::{EngagementState, GazeEngagementEvaluator};
use crate::engagement::domain::focus_zone::{compute_focus_zone, FocusZone};
use crate::engagement::infrastructure::manual_clock::ManualClock;

/// Outcome of replaying a trace through the evaluator.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReplayReport {
    pub samples: usize,
    pub engaged_samples: usize,
    pub disengaged_samples: usize,
    /// Virtual time of every disengagement alert, in milliseconds.
    pub alerts_ms: Vec<u64>,
    pub end_ms: u64,
}

/// Replays recorded trace events in virtual time.
///
/// The clock is advanced to each event's timestamp before the event is
/// applied, so an alert due at exactly that instant fires first. After
/// the last event the clock runs on for `settle`, letting a trailing
/// alert fire. Without `viewport`, the trace must set one before its
/// first sample.
pub fn replay_trace(
    events: &[TraceEvent],
    config: &EngagementConfig,
    viewport: Option<(f64, f64)>,
    settle: Duration,
) -> Result<ReplayReport, TraceError> {
    let clock = ManualClock::new();
    let alerts = Arc::new(Mutex::new(Vec::new()));

    let alert_log = Arc::clone(&alerts);
    let alert_clock = clock.clone();
    let mut evaluator = GazeEngagementEvaluator::from_config(Box::new(clock.clone()), config, move || {
        let at = alert_clock.now().as_millis() as u64;
        log::info!("Disengaged: alert at {at}ms");
        alert_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(at);
    });

    let fraction = config.focus_fraction;
    let mut zone: Option<FocusZone> = viewport.map(|(w, h)| compute_focus_zone(w, h, fraction));
    let mut report = ReplayReport::default();

    for event in events {
        clock.advance_to(Duration::from_millis(event.t_ms));

        if let Some([w, h]) = event.viewport {
            zone = Some(compute_focus_zone(w, h, fraction));
        }
        let Some(sample) = event.sample() else {
            continue;
        };
        let zone = zone.as_ref().ok_or(TraceError::MissingViewport)?;

        evaluator.on_sample(sample, zone);
        report.samples += 1;
        match evaluator.state() {
            Some(EngagementState::Engaged) => report.engaged_samples += 1,
            Some(EngagementState::Disengaged) => report.disengaged_samples += 1,
            None => {}
        }
    }

    clock.advance_by(settle);
    report.end_ms = clock.now().as_millis() as u64;
    drop(evaluator);

    report.alerts_ms = alerts.lock().unwrap_or_else(|e| e.into_inner()).clone();
    Ok(report)
}
