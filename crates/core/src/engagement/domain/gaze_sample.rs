use crate::shared::point::Point;

/// One gaze estimate from the tracker, or an explicit absence of one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GazeSample {
    At(Point),
    /// No face or gaze was detected this tick.
    Absent,
}

impl GazeSample {
    pub fn at(x: f64, y: f64) -> Self {
        GazeSample::At(Point::new(x, y))
    }

    pub fn point(&self) -> Option<Point> {
        match self {
            GazeSample::At(p) => Some(*p),
            GazeSample::Absent => None,
        }
    }
}

impl From<Option<Point>> for GazeSample {
    fn from(point: Option<Point>) -> Self {
        point.map_or(GazeSample::Absent, GazeSample::At)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_none_is_absent() {
        assert_eq!(GazeSample::from(None), GazeSample::Absent);
    }

    #[test]
    fn test_from_some_keeps_point() {
        let sample = GazeSample::from(Some(Point::new(3.0, 4.0)));
        assert_eq!(sample, GazeSample::at(3.0, 4.0));
        assert_eq!(sample.point(), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_absent_has_no_point() {
        assert!(GazeSample::Absent.point().is_none());
    }
}
