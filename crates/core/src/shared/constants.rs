/// Fraction of viewport width and height covered by the focus zone.
pub const DEFAULT_FOCUS_FRACTION: f64 = 0.5;

/// Sustained-outside time before a disengagement alert fires.
pub const DEFAULT_DEBOUNCE_MS: u64 = 2000;

/// Cadence of the polling monitor (~5 checks per second).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Distance threshold for 128-d face recognition descriptors.
pub const DESCRIPTOR_MATCH_THRESHOLD: f64 = 0.45;

/// Distance threshold for flattened face-mesh keypoint embeddings.
pub const KEYPOINT_MATCH_THRESHOLD: f64 = 100.0;

/// Jaw-to-eyes angle above which the face counts as focused.
pub const FOCUSED_MIN_ANGLE_DEG: f64 = -10.0;

/// Left/right face width difference beyond which the face counts as rotated.
pub const ROTATION_TOLERANCE_PX: f64 = 5.0;

pub const TRACE_EXTENSIONS: &[&str] = &["jsonl", "ndjson"];
