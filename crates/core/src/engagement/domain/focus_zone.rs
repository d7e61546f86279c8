use serde::{Deserialize, Serialize};

use crate::shared::constants::DEFAULT_FOCUS_FRACTION;
use crate::shared::point::Point;

/// Axis-aligned rectangle of the viewport that counts as on-screen attention.
///
/// Membership is strict on every edge: a point lying exactly on the
/// boundary is outside. A zero-area zone therefore contains nothing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FocusZone {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl FocusZone {
    pub fn left(&self) -> f64 {
        self.center_x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center_x + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.center_y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center_y + self.height / 2.0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x > self.left()
            && point.x < self.right()
            && point.y > self.top()
            && point.y < self.bottom()
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Focus zone of `fraction * width` by `fraction * height`, centered on
/// the viewport.
///
/// Non-positive dimensions are clamped to zero, giving a zero-area zone
/// that every sample falls outside of.
pub fn compute_focus_zone(viewport_width: f64, viewport_height: f64, fraction: f64) -> FocusZone {
    let w = viewport_width.max(0.0);
    let h = viewport_height.max(0.0);
    let fraction = fraction.max(0.0);
    FocusZone {
        center_x: w / 2.0,
        center_y: h / 2.0,
        width: w * fraction,
        height: h * fraction,
    }
}

/// [`compute_focus_zone`] with the default half-viewport fraction.
pub fn default_focus_zone(viewport_width: f64, viewport_height: f64) -> FocusZone {
    compute_focus_zone(viewport_width, viewport_height, DEFAULT_FOCUS_FRACTION)
}
