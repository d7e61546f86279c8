use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engagement::domain::gaze_sample::GazeSample;
use crate::shared::point::Point;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("failed to read trace {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: x and y must be given together")]
    IncompletePoint { line: usize },
    #[error("line {line}: timestamp {t_ms}ms is before previous {previous}ms")]
    OutOfOrder { line: usize, t_ms: u64, previous: u64 },
    #[error("no viewport: pass one explicitly or start the trace with a viewport event")]
    MissingViewport,
}

/// One line of a recorded gaze trace (JSON lines).
///
/// `{"t_ms":0,"viewport":[800,600]}` resizes the viewport,
/// `{"t_ms":40,"x":410.0,"y":290.0}` is a gaze point and `{"t_ms":80}` is a
/// tick with no detection. A viewport and a point may share a line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub t_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<[f64; 2]>,
}

impl TraceEvent {
    pub fn point(t_ms: u64, x: f64, y: f64) -> Self {
        Self {
            t_ms,
            x: Some(x),
            y: Some(y),
            viewport: None,
        }
    }

    pub fn absent(t_ms: u64) -> Self {
        Self {
            t_ms,
            x: None,
            y: None,
            viewport: None,
        }
    }

    pub fn viewport(t_ms: u64, width: f64, height: f64) -> Self {
        Self {
            t_ms,
            x: None,
            y: None,
            viewport: Some([width, height]),
        }
    }

    /// The gaze sample carried by this event, if any. A pure viewport
    /// event carries none.
    pub fn sample(&self) -> Option<GazeSample> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(GazeSample::At(Point::new(x, y))),
            _ if self.viewport.is_some() => None,
            _ => Some(GazeSample::Absent),
        }
    }
}

pub fn read_trace(path: &Path) -> Result<Vec<TraceEvent>, TraceError> {
    let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&text)
}

/// Parses JSON-lines trace text. Blank lines and lines starting with `#`
/// are skipped; timestamps must not decrease.
pub fn parse_trace(text: &str) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events = Vec::new();
    let mut previous = 0;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let event: TraceEvent =
            serde_json::from_str(trimmed).map_err(|source| TraceError::Parse { line, source })?;
        if event.x.is_some() != event.y.is_some() {
            return Err(TraceError::IncompletePoint { line });
        }
        if event.t_ms < previous {
            return Err(TraceError::OutOfOrder {
                line,
                t_ms: event.t_ms,
                previous,
            });
        }
        previous = event.t_ms;
        events.push(event);
    }

    Ok(events)
}
