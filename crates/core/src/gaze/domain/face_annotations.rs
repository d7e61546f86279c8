use serde::{Deserialize, Serialize};

use crate::orientation::domain::face_orientation::{rotation_by_width, FaceRotation};
use crate::shared::point::Point;

/// Sparse face-mesh annotations for one detected face, in raw (unmirrored)
/// frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceAnnotations {
    pub left_iris: Point,
    pub box_top_left: Point,
    pub box_bottom_right: Point,
    pub left_cheek: Point,
    pub right_cheek: Point,
    pub midway_between_eyes: Point,
}

/// Face box corners after horizontal mirroring.
///
/// Mirroring swaps sides: the raw bottom-right corner becomes the
/// bottom-left one and the raw top-left becomes the top-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MirroredBox {
    pub bottom_left: Point,
    pub top_right: Point,
}

impl FaceAnnotations {
    pub fn mirrored_box(&self, frame_width: f64) -> MirroredBox {
        MirroredBox {
            bottom_left: Point::new(
                self.box_bottom_right.mirrored_x(frame_width),
                self.box_bottom_right.y,
            ),
            top_right: Point::new(self.box_top_left.mirrored_x(frame_width), self.box_top_left.y),
        }
    }

    pub fn rotation(&self, frame_width: f64) -> FaceRotation {
        rotation_by_width(
            self.left_cheek,
            self.right_cheek,
            self.midway_between_eyes,
            frame_width,
        )
    }
}
