use crate::engagement::domain::gaze_sample::GazeSample;

/// One item pulled from a [`GazeSource`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SourceEvent {
    Sample(GazeSample),
    /// The rendering surface was resized.
    Viewport { width: f64, height: f64 },
}

/// Inbound collaborator delivering gaze estimates one at a time.
///
/// Implementations wrap a tracker, a recorded trace, or a test script.
/// Events are pulled serially, never concurrently.
pub trait GazeSource: Send {
    /// Starts the underlying tracker. Called once per monitor.
    fn begin(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Next event, or `None` once the source is exhausted.
    fn next_event(&mut self) -> Result<Option<SourceEvent>, Box<dyn std::error::Error>>;
}
