//! Two independent "is the face turned toward the screen" heuristics.
//!
//! The angle heuristic works on 68-point landmark layouts (jaw outline and
//! eye contours); the width heuristic works on sparse face-mesh annotations
//! (cheeks and the point midway between the eyes) in a horizontally
//! mirrored frame. They are not interchangeable and are kept separate.

use thiserror::Error;

use crate::shared::constants::{FOCUSED_MIN_ANGLE_DEG, ROTATION_TOLERANCE_PX};
use crate::shared::point::Point;

/// Index of the outer corner on the right eye contour.
const RIGHT_EYE_OUTER: usize = 3;

#[derive(Error, Debug, PartialEq)]
pub enum OrientationError {
    #[error("jaw outline needs at least 2 points, got {0}")]
    JawOutline(usize),
    #[error("left eye contour is empty")]
    LeftEye,
    #[error("right eye contour needs at least 4 points, got {0}")]
    RightEye(usize),
}

/// Angle in degrees of the jaw-midpoint to eyes-midpoint vector.
pub fn facing_angle_degrees(jaw_midpoint: Point, eyes_midpoint: Point) -> f64 {
    (eyes_midpoint.y - jaw_midpoint.y)
        .atan2(eyes_midpoint.x - jaw_midpoint.x)
        .to_degrees()
}

/// Focused when the facing angle is strictly above -10 degrees.
pub fn is_focused_by_angle(jaw_midpoint: Point, eyes_midpoint: Point) -> bool {
    facing_angle_degrees(jaw_midpoint, eyes_midpoint) > FOCUSED_MIN_ANGLE_DEG
}

/// Midpoints derived from 68-point landmark groups.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceMidpoints {
    pub jaw: Point,
    pub eyes: Point,
}

impl FaceMidpoints {
    /// Jaw midpoint from the first and last jaw-outline points; eye midpoint
    /// from the first left-eye point and the outer right-eye corner.
    pub fn from_landmarks(
        jaw_outline: &[Point],
        left_eye: &[Point],
        right_eye: &[Point],
    ) -> Result<Self, OrientationError> {
        if jaw_outline.len() < 2 {
            return Err(OrientationError::JawOutline(jaw_outline.len()));
        }
        let left = *left_eye.first().ok_or(OrientationError::LeftEye)?;
        let right = *right_eye
            .get(RIGHT_EYE_OUTER)
            .ok_or(OrientationError::RightEye(right_eye.len()))?;

        Ok(Self {
            jaw: Point::midpoint(jaw_outline[0], jaw_outline[jaw_outline.len() - 1]),
            eyes: Point::midpoint(left, right),
        })
    }

    pub fn angle_degrees(&self) -> f64 {
        facing_angle_degrees(self.jaw, self.eyes)
    }

    pub fn is_focused(&self) -> bool {
        is_focused_by_angle(self.jaw, self.eyes)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceRotation {
    Forward,
    /// The left half of the face appears wider.
    TowardLeft,
    /// The right half of the face appears wider.
    TowardRight,
}

impl FaceRotation {
    pub fn is_rotated(&self) -> bool {
        *self != FaceRotation::Forward
    }
}

/// Width-asymmetry rotation check.
///
/// All x coordinates are mirrored (`frame_width - x`) before measuring the
/// left and right half-widths around the midway-between-eyes point. A
/// difference above 5 px counts as rotated toward the wider side.
pub fn rotation_by_width(
    left_cheek: Point,
    right_cheek: Point,
    midway_between_eyes: Point,
    frame_width: f64,
) -> FaceRotation {
    let left_x = left_cheek.mirrored_x(frame_width);
    let right_x = right_cheek.mirrored_x(frame_width);
    let mid_x = midway_between_eyes.mirrored_x(frame_width);

    let left_width = mid_x - left_x;
    let right_width = right_x - mid_x;
    let difference = right_width - left_width;

    if difference.abs() <= ROTATION_TOLERANCE_PX {
        FaceRotation::Forward
    } else if left_width < right_width {
        FaceRotation::TowardRight
    } else {
        FaceRotation::TowardLeft
    }
}
