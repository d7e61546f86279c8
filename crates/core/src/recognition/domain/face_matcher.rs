//! Identity check by thresholding the distance between two face
//! embeddings. The embeddings themselves come from an external model.

use serde::Serialize;
use thiserror::Error;

use crate::shared::constants::{DESCRIPTOR_MATCH_THRESHOLD, KEYPOINT_MATCH_THRESHOLD};
use crate::shared::point::Point;

#[derive(Error, Debug, PartialEq)]
pub enum MatchError {
    #[error("embedding length mismatch: reference has {reference}, probe has {probe}")]
    LengthMismatch { reference: usize, probe: usize },
    #[error("embeddings are empty")]
    Empty,
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64, MatchError> {
    if a.len() != b.len() {
        return Err(MatchError::LengthMismatch {
            reference: a.len(),
            probe: b.len(),
        });
    }
    if a.is_empty() {
        return Err(MatchError::Empty);
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt())
}

/// Naive landmark embedding: keypoints flattened to `[x0, y0, x1, y1, ...]`.
pub fn flatten_keypoints(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MatchVerdict {
    pub distance: f64,
    pub verified: bool,
}

/// Holds a reference embedding and verifies probes against it.
///
/// A probe matches when its distance is strictly below the threshold.
pub struct FaceMatcher {
    reference: Vec<f64>,
    threshold: f64,
}

impl FaceMatcher {
    pub fn new(reference: Vec<f64>, threshold: f64) -> Self {
        Self {
            reference,
            threshold,
        }
    }

    /// Matcher for 128-d recognition descriptors.
    pub fn for_descriptors(reference: Vec<f64>) -> Self {
        Self::new(reference, DESCRIPTOR_MATCH_THRESHOLD)
    }

    /// Matcher for flattened face-mesh keypoints.
    pub fn for_keypoints(reference: &[Point]) -> Self {
        Self::new(flatten_keypoints(reference), KEYPOINT_MATCH_THRESHOLD)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn verify(&self, probe: &[f64]) -> Result<MatchVerdict, MatchError> {
        let distance = euclidean_distance(&self.reference, probe)?;
        let verdict = MatchVerdict {
            distance,
            verified: distance < self.threshold,
        };
        log::debug!(
            "Face distance {distance:.4} (threshold {}): {}",
            self.threshold,
            if verdict.verified { "verified" } else { "not recognized" }
        );
        Ok(verdict)
    }

    pub fn verify_keypoints(&self, probe: &[Point]) -> Result<MatchVerdict, MatchError> {
        self.verify(&flatten_keypoints(probe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_distance_3_4_5() {
        assert_relative_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let v = [0.1, -0.2, 0.3];
        assert_relative_eq!(euclidean_distance(&v, &v).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_length_mismatch() {
        assert_eq!(
            euclidean_distance(&[1.0], &[1.0, 2.0]),
            Err(MatchError::LengthMismatch {
                reference: 1,
                probe: 2
            })
        );
    }

    #[test]
    fn test_distance_empty() {
        assert_eq!(euclidean_distance(&[], &[]), Err(MatchError::Empty));
    }

    #[test]
    fn test_flatten_keypoints() {
        let flat = flatten_keypoints(&[Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[rstest]
    #[case::well_below(0.1, true)]
    #[case::just_below(0.449, true)]
    #[case::at_threshold(0.45, false)]
    #[case::above(0.6, false)]
    fn test_descriptor_verdict(#[case] offset: f64, #[case] verified: bool) {
        let matcher = FaceMatcher::for_descriptors(vec![0.0, 0.0]);
        let verdict = matcher.verify(&[offset, 0.0]).unwrap();
        assert_relative_eq!(verdict.distance, offset);
        assert_eq!(verdict.verified, verified);
    }

    #[test]
    fn test_keypoint_matcher_uses_keypoint_threshold() {
        let reference = [Point::new(0.0, 0.0), Point::new(100.0, 100.0)];
        let matcher = FaceMatcher::for_keypoints(&reference);
        assert_relative_eq!(matcher.threshold(), 100.0);

        let near = [Point::new(30.0, 40.0), Point::new(100.0, 100.0)];
        assert!(matcher.verify_keypoints(&near).unwrap().verified);

        let far = [Point::new(60.0, 80.0), Point::new(100.0, 100.0)];
        assert!(!matcher.verify_keypoints(&far).unwrap().verified);
    }

    #[test]
    fn test_verify_propagates_length_mismatch() {
        let matcher = FaceMatcher::for_descriptors(vec![0.0; 128]);
        assert!(matches!(
            matcher.verify(&[0.0; 64]),
            Err(MatchError::LengthMismatch { .. })
        ));
    }
}
