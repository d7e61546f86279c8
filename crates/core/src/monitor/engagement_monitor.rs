use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;

use super::gaze_source::{GazeSource, SourceEvent};
use crate::engagement::domain::engagement_evaluator::{EngagementState, GazeEngagementEvaluator};
use crate::engagement::domain::focus_zone::{compute_focus_zone, FocusZone};

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("monitor used before initialize()")]
    NotInitialized,
    #[error("gaze source failed: {0}")]
    Source(String),
}

/// Drives a [`GazeEngagementEvaluator`] from a [`GazeSource`].
///
/// Owns the viewport and recomputes the focus zone whenever it changes.
/// The evaluator itself never sees a cadence: polling lives here.
pub struct EngagementMonitor {
    source: Box<dyn GazeSource>,
    evaluator: GazeEngagementEvaluator,
    focus_fraction: f64,
    zone: FocusZone,
    initialized: bool,
}

impl EngagementMonitor {
    pub fn new(
        source: Box<dyn GazeSource>,
        evaluator: GazeEngagementEvaluator,
        viewport: (f64, f64),
        focus_fraction: f64,
    ) -> Self {
        Self {
            source,
            evaluator,
            focus_fraction,
            zone: compute_focus_zone(viewport.0, viewport.1, focus_fraction),
            initialized: false,
        }
    }

    /// Begins the source on the first call; later calls are no-ops.
    /// Returns whether this call did the initialization.
    pub fn initialize(&mut self) -> Result<bool, MonitorError> {
        if self.initialized {
            return Ok(false);
        }
        self.source
            .begin()
            .map_err(|e| MonitorError::Source(e.to_string()))?;
        self.initialized = true;
        log::info!("Gaze monitor initialized");
        Ok(true)
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.zone = compute_focus_zone(width, height, self.focus_fraction);
        log::debug!(
            "Viewport {width}x{height}, focus zone {}x{}",
            self.zone.width,
            self.zone.height
        );
    }

    pub fn zone(&self) -> &FocusZone {
        &self.zone
    }

    pub fn evaluator(&self) -> &GazeEngagementEvaluator {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut GazeEngagementEvaluator {
        &mut self.evaluator
    }

    /// Pulls events until one sample has been evaluated, applying any
    /// viewport changes on the way. `Ok(None)` once the source is exhausted.
    pub fn tick(&mut self) -> Result<Option<EngagementState>, MonitorError> {
        if !self.initialized {
            return Err(MonitorError::NotInitialized);
        }
        loop {
            let event = self
                .source
                .next_event()
                .map_err(|e| MonitorError::Source(e.to_string()))?;
            match event {
                Some(SourceEvent::Viewport { width, height }) => self.set_viewport(width, height),
                Some(SourceEvent::Sample(sample)) => {
                    self.evaluator.on_sample(sample, &self.zone);
                    return Ok(self.evaluator.state());
                }
                None => return Ok(None),
            }
        }
    }

    /// Polls at a fixed rate until the source runs dry or `cancelled` is
    /// set, then resets the evaluator so no alert outlives the run.
    /// Returns the number of samples evaluated.
    pub fn run(&mut self, interval: Duration, cancelled: &AtomicBool) -> Result<usize, MonitorError> {
        self.initialize()?;
        let ticker = crossbeam_channel::tick(interval);
        let mut evaluated = 0;

        let outcome = loop {
            if cancelled.load(Ordering::Relaxed) {
                break Ok(());
            }
            match self.tick() {
                Ok(Some(_)) => evaluated += 1,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
            if ticker.recv().is_err() {
                break Ok(());
            }
        };

        self.evaluator.reset();
        log::info!("Gaze monitor stopped after {evaluated} samples");
        outcome.map(|()| evaluated)
    }
}
