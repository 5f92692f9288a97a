//! Error taxonomy and non-fatal validation warnings.
//!
//! Fatal errors abort their stage and surface explicitly; warnings are
//! collected and returned alongside a still-valid result. A run can finish
//! with a complete merged analysis plus warnings while the F-V-P profile is
//! absent, without being an overall failure.

use serde::Serialize;
use thiserror::Error;

/// Degenerate or numerically invalid calibration geometry. Fatal to the
/// owning segment.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CalibrationError {
    /// The DLT system is near-singular: collinear or duplicate points.
    #[error("degenerate calibration points: {reason}")]
    Degenerate { reason: &'static str },
    /// A mapped point lies on the plane at infinity (|w| below epsilon).
    #[error("pixel ({x:.1}, {y:.1}) maps to infinity")]
    PointAtInfinity { x: f64, y: f64 },
    /// The solved homography does not reproduce its own calibration points.
    #[error("round-trip residual {rmse_m:.6} m exceeds tolerance {tol_m:.6} m")]
    RoundTrip { rmse_m: f64, tol_m: f64 },
}

/// Missing or insufficient input data. Fatal to the run's merge.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataError {
    #[error("segment {segment}: calibration missing or invalid")]
    MissingCalibration { segment: usize },
    #[error("segment {segment}: no completed analysis")]
    MissingAnalysis { segment: usize },
    #[error("segment {segment}: {usable} usable steps, at least {required} required")]
    InsufficientSteps {
        segment: usize,
        usable: usize,
        required: usize,
    },
    #[error("segment {segment}: frames per second must be positive, got {fps}")]
    InvalidFps { segment: usize, fps: f64 },
    #[error("no pose landmarks available for frame {frame}")]
    MissingPose { frame: u32 },
    #[error("segment {segment}: {source}")]
    Calibration {
        segment: usize,
        source: CalibrationError,
    },
    #[error("invalid lifecycle transition {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// Insufficient or numerically invalid force-velocity data. Fatal only to
/// the F-V-P stage; the merged result remains valid and usable.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RegressionError {
    #[error("force-velocity regression is singular")]
    Singular,
    #[error("invalid regression: F0={f0:.1} N, V0={v0:.2} m/s")]
    InvalidProfile { f0: f64, v0: f64 },
}

/// Non-fatal finding reported alongside a valid result, never blocking it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationWarning {
    /// A stride falls outside the configured multiple of the median stride.
    #[serde(rename_all = "camelCase")]
    StrideOutlier {
        segment: Option<usize>,
        step_index: usize,
        stride_m: f64,
        median_m: f64,
    },
    /// A gap between accepted steps exceeded the threshold and one step was
    /// synthesized to fill it.
    #[serde(rename_all = "camelCase")]
    GapInterpolated {
        after_index: usize,
        gap_m: f64,
        position_m: f64,
    },
    /// Segment calibration confidence fell below the configured floor.
    #[serde(rename_all = "camelCase")]
    LowCalibrationQuality { segment: usize, confidence: f64 },
    /// More than two candidate steps competed for one segment boundary.
    #[serde(rename_all = "camelCase")]
    AmbiguousBoundary { boundary_m: f64, candidates: usize },
}
