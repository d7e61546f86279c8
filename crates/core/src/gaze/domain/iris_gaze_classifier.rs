use serde::Serialize;

use super::face_annotations::FaceAnnotations;

/// Normalized mirrored iris x above which the gaze reads as right.
pub const RIGHT_THRESHOLD: f64 = 0.355;
/// Normalized mirrored iris x below which the gaze reads as left.
pub const LEFT_THRESHOLD: f64 = 0.315;
/// Normalized iris height (from the box bottom) above which gaze reads as up.
pub const TOP_THRESHOLD: f64 = 0.62;
/// Consecutive centered frames required before reporting `Straight`.
pub const STRAIGHT_RUN_FRAMES: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GazeEvent {
    Left,
    Right,
    Straight,
    Top,
}

impl std::fmt::Display for GazeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GazeEvent::Left => write!(f, "LEFT"),
            GazeEvent::Right => write!(f, "RIGHT"),
            GazeEvent::Straight => write!(f, "STRAIGHT"),
            GazeEvent::Top => write!(f, "TOP"),
        }
    }
}

/// Clamps `(value - min) / (max - min)` into `[0, 1]`.
///
/// Returns `None` when `max == min`, where the ratio is undefined.
pub fn normalize(value: f64, max: f64, min: f64) -> Option<f64> {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return None;
    }
    Some(((value - min) / span).clamp(0.0, 1.0))
}

/// Coarse gaze direction from the left iris position inside the face box.
///
/// Works in a horizontally mirrored frame. Frames where the face box has
/// slid off the left edge, or the face is rotated, are skipped and the
/// previous event stands. Centered frames only report `Straight` after a
/// run of more than [`STRAIGHT_RUN_FRAMES`]; a raised iris reports `Top`
/// regardless of the horizontal reading.
pub struct IrisGazeClassifier {
    frame_width: f64,
    straight_run: u32,
    last_event: Option<GazeEvent>,
}

impl IrisGazeClassifier {
    pub fn new(frame_width: f64) -> Self {
        Self {
            frame_width,
            straight_run: 0,
            last_event: None,
        }
    }

    /// Processes every face detected in one frame and returns the latest
    /// event, which persists across frames with no new reading.
    pub fn observe_frame(&mut self, faces: &[FaceAnnotations]) -> Option<GazeEvent> {
        for face in faces {
            self.observe_face(face);
        }
        self.last_event
    }

    pub fn last_event(&self) -> Option<GazeEvent> {
        self.last_event
    }

    fn observe_face(&mut self, face: &FaceAnnotations) {
        let mirrored = face.mirrored_box(self.frame_width);
        if mirrored.bottom_left.x <= 0.0 || face.rotation(self.frame_width).is_rotated() {
            return;
        }

        let iris_x = face.left_iris.mirrored_x(self.frame_width);
        let Some(nx) = normalize(iris_x, mirrored.top_right.x, mirrored.bottom_left.x) else {
            log::debug!("Skipping face with zero-width box");
            return;
        };

        if nx > RIGHT_THRESHOLD {
            self.last_event = Some(GazeEvent::Right);
        } else if nx < LEFT_THRESHOLD {
            self.last_event = Some(GazeEvent::Left);
        } else {
            self.straight_run += 1;
            if self.straight_run > STRAIGHT_RUN_FRAMES {
                self.last_event = Some(GazeEvent::Straight);
                self.straight_run = 0;
            }
        }

        let ny = normalize(face.left_iris.y, mirrored.top_right.y, mirrored.bottom_left.y);
        if ny.is_some_and(|ny| ny > TOP_THRESHOLD) {
            self.last_event = Some(GazeEvent::Top);
        }
    }
}
