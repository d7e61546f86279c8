pub mod gaze_trace;
pub mod trace_gaze_source;
