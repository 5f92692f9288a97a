//! Per-segment lane-plane calibration.
//!
//! Each camera segment is calibrated from four pixel points: the near and far
//! lane edge at two marker lines of known along-track distance. The matching
//! world points follow from the lane width and the marker distances, the
//! homography is solved from the four correspondences, and the result is
//! self-validated by mapping the calibration pixels back onto the plane.

use crate::error::CalibrationError;
use crate::homography::{Homography, PointPair};
use log::debug;
use serde::{Deserialize, Serialize};

/// World-space tolerance for the round-trip self-check, metres.
const ROUND_TRIP_TOL_M: f64 = 1e-6;

/// Raw calibration marks supplied by the calibration UI collaborator.
/// Pixel coordinates are in native video resolution, distances in metres
/// from the segment start.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationInput {
    /// Along-track distance of the first marker line.
    pub marker_a_m: f64,
    /// Along-track distance of the second marker line.
    pub marker_b_m: f64,
    /// Across-track lane width spanned by the near/far points.
    pub lane_width_m: f64,
    /// Near lane edge at marker A.
    pub near_a_px: [f64; 2],
    /// Far lane edge at marker A.
    pub far_a_px: [f64; 2],
    /// Near lane edge at marker B.
    pub near_b_px: [f64; 2],
    /// Far lane edge at marker B.
    pub far_b_px: [f64; 2],
}

impl CalibrationInput {
    /// Pixel/world correspondences implied by the marks.
    pub fn point_pairs(&self) -> [PointPair; 4] {
        [
            PointPair {
                pixel: self.near_a_px,
                world: [self.marker_a_m, 0.0],
            },
            PointPair {
                pixel: self.far_a_px,
                world: [self.marker_a_m, self.lane_width_m],
            },
            PointPair {
                pixel: self.near_b_px,
                world: [self.marker_b_m, 0.0],
            },
            PointPair {
                pixel: self.far_b_px,
                world: [self.marker_b_m, self.lane_width_m],
            },
        ]
    }
}

/// Solved and self-validated segment calibration.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Calibration {
    homography: Homography,
    pub round_trip_rmse_m: f64,
    /// Geometric quality in `[0, 1]`, used to arbitrate duplicate steps at
    /// segment boundaries.
    pub confidence: f64,
}

impl Calibration {
    /// Solve a calibration and validate it against its own marks.
    pub fn solve(input: &CalibrationInput) -> Result<Self, CalibrationError> {
        if input.lane_width_m <= 0.0 {
            return Err(CalibrationError::Degenerate {
                reason: "non-positive lane width",
            });
        }
        if (input.marker_b_m - input.marker_a_m).abs() < f64::EPSILON {
            return Err(CalibrationError::Degenerate {
                reason: "marker distances coincide",
            });
        }
        let pairs = input.point_pairs();
        let homography = Homography::solve(&pairs)?;
        let rmse = homography.round_trip_rmse(&pairs)?;
        if rmse > ROUND_TRIP_TOL_M {
            return Err(CalibrationError::RoundTrip {
                rmse_m: rmse,
                tol_m: ROUND_TRIP_TOL_M,
            });
        }
        let confidence = quad_confidence(&pairs, rmse);
        debug!(
            "Calibration::solve markers=({:.2}, {:.2}) rmse_m={:.2e} confidence={:.3}",
            input.marker_a_m, input.marker_b_m, rmse, confidence
        );
        Ok(Self {
            homography,
            round_trip_rmse_m: rmse,
            confidence,
        })
    }

    /// World position of a pixel on the lane plane, metres from segment start.
    pub fn world_position(&self, pixel: [f64; 2]) -> Result<[f64; 2], CalibrationError> {
        self.homography.apply(pixel)
    }

    pub fn homography(&self) -> &Homography {
        &self.homography
    }
}

/// Quality heuristic for the calibration quad: a well-placed quad fills its
/// pixel bounding box, while thin or strongly skewed quads approach zero
/// fill. The round-trip residual contributes a second factor so that a
/// numerically marginal solve can never score high.
fn quad_confidence(pairs: &[PointPair; 4], rmse_m: f64) -> f64 {
    let xs: Vec<f64> = pairs.iter().map(|p| p.pixel[0]).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| p.pixel[1]).collect();
    let width = xs.iter().cloned().fold(f64::MIN, f64::max)
        - xs.iter().cloned().fold(f64::MAX, f64::min);
    let height = ys.iter().cloned().fold(f64::MIN, f64::max)
        - ys.iter().cloned().fold(f64::MAX, f64::min);
    let bbox = width * height;
    if bbox <= f64::EPSILON {
        return 0.0;
    }
    // Shoelace area with the quad ordered near-A, far-A, far-B, near-B.
    let ordered = [
        pairs[0].pixel,
        pairs[1].pixel,
        pairs[3].pixel,
        pairs[2].pixel,
    ];
    let mut area = 0.0;
    for i in 0..4 {
        let [x0, y0] = ordered[i];
        let [x1, y1] = ordered[(i + 1) % 4];
        area += x0 * y1 - x1 * y0;
    }
    let fill = (area.abs() * 0.5 / bbox).clamp(0.0, 1.0);
    let residual_term = 1.0 / (1.0 + rmse_m / ROUND_TRIP_TOL_M);
    (fill.sqrt() * residual_term).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lane_input() -> CalibrationInput {
        CalibrationInput {
            marker_a_m: 1.0,
            marker_b_m: 4.0,
            lane_width_m: 1.22,
            near_a_px: [212.0, 642.0],
            far_a_px: [418.0, 598.0],
            near_b_px: [1489.0, 455.0],
            far_b_px: [1301.0, 421.0],
        }
    }

    #[test]
    fn solve_produces_positive_confidence() {
        let cal = Calibration::solve(&lane_input()).expect("valid");
        assert!(cal.confidence > 0.0 && cal.confidence <= 1.0);
        assert!(cal.round_trip_rmse_m < 1e-6);
    }

    #[test]
    fn world_position_matches_marks() {
        let input = lane_input();
        let cal = Calibration::solve(&input).expect("valid");
        let near_b = cal.world_position(input.near_b_px).expect("finite");
        assert!((near_b[0] - 4.0).abs() < 1e-6);
        assert!(near_b[1].abs() < 1e-6);
    }

    #[test]
    fn zero_lane_width_is_degenerate() {
        let mut input = lane_input();
        input.lane_width_m = 0.0;
        assert!(matches!(
            Calibration::solve(&input),
            Err(CalibrationError::Degenerate { .. })
        ));
    }

    #[test]
    fn coincident_markers_are_degenerate() {
        let mut input = lane_input();
        input.marker_b_m = input.marker_a_m;
        assert!(matches!(
            Calibration::solve(&input),
            Err(CalibrationError::Degenerate { .. })
        ));
    }

    #[test]
    fn skewed_quad_scores_lower_than_rectangular_quad() {
        let rect = Calibration::solve(&CalibrationInput {
            marker_a_m: 1.0,
            marker_b_m: 4.0,
            lane_width_m: 1.22,
            near_a_px: [200.0, 600.0],
            far_a_px: [200.0, 300.0],
            near_b_px: [1400.0, 600.0],
            far_b_px: [1400.0, 300.0],
        })
        .expect("valid");
        // Same lane seen as a 45-degree diamond: half the bounding-box fill.
        let diamond = Calibration::solve(&CalibrationInput {
            marker_a_m: 1.0,
            marker_b_m: 4.0,
            lane_width_m: 1.22,
            near_a_px: [300.0, 400.0],
            far_a_px: [600.0, 100.0],
            near_b_px: [600.0, 700.0],
            far_b_px: [900.0, 400.0],
        })
        .expect("valid");
        assert!(
            diamond.confidence < rect.confidence,
            "diamond={} rect={}",
            diamond.confidence,
            rect.confidence
        );
    }
}
