use std::collections::VecDeque;

use super::gaze_trace::TraceEvent;
use crate::monitor::gaze_source::{GazeSource, SourceEvent};

/// Plays back a recorded trace, one event per pull.
///
/// Timestamps are ignored; cadence comes from whoever pulls. A trace line
/// carrying both a viewport and a sample yields the viewport first.
pub struct TraceGazeSource {
    events: VecDeque<SourceEvent>,
    begun: bool,
}

impl TraceGazeSource {
    pub fn new(events: &[TraceEvent]) -> Self {
        let mut queue = VecDeque::with_capacity(events.len());
        for event in events {
            if let Some([width, height]) = event.viewport {
                queue.push_back(SourceEvent::Viewport { width, height });
            }
            if let Some(sample) = event.sample() {
                queue.push_back(SourceEvent::Sample(sample));
            }
        }
        Self {
            events: queue,
            begun: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl GazeSource for TraceGazeSource {
    fn begin(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.begun = true;
        Ok(())
    }

    fn next_event(&mut self) -> Result<Option<SourceEvent>, Box<dyn std::error::Error>> {
        if !self.begun {
            return Err("trace source read before begin".into());
        }
        Ok(self.events.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::domain::gaze_sample::GazeSample;

    #[test]
    fn test_keeps_viewport_changes_in_order() {
        let events = vec![
            TraceEvent::viewport(0, 800.0, 600.0),
            TraceEvent::point(10, 1.0, 2.0),
            TraceEvent::viewport(15, 200.0, 100.0),
            TraceEvent::absent(20),
        ];
        let mut source = TraceGazeSource::new(&events);
        assert_eq!(source.remaining(), 4);

        source.begin().unwrap();
        assert_eq!(
            source.next_event().unwrap(),
            Some(SourceEvent::Viewport {
                width: 800.0,
                height: 600.0
            })
        );
        assert_eq!(
            source.next_event().unwrap(),
            Some(SourceEvent::Sample(GazeSample::at(1.0, 2.0)))
        );
        assert_eq!(
            source.next_event().unwrap(),
            Some(SourceEvent::Viewport {
                width: 200.0,
                height: 100.0
            })
        );
        assert_eq!(
            source.next_event().unwrap(),
            Some(SourceEvent::Sample(GazeSample::Absent))
        );
        assert_eq!(source.next_event().unwrap(), None);
    }

    #[test]
    fn test_combined_line_yields_viewport_then_sample() {
        let mut combined = TraceEvent::point(0, 5.0, 5.0);
        combined.viewport = Some([640.0, 480.0]);
        let mut source = TraceGazeSource::new(&[combined]);
        source.begin().unwrap();

        assert!(matches!(
            source.next_event().unwrap(),
            Some(SourceEvent::Viewport { .. })
        ));
        assert_eq!(
            source.next_event().unwrap(),
            Some(SourceEvent::Sample(GazeSample::at(5.0, 5.0)))
        );
    }

    #[test]
    fn test_read_before_begin_fails() {
        let mut source = TraceGazeSource::new(&[TraceEvent::absent(0)]);
        assert!(source.next_event().is_err());
    }
}
