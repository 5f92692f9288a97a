//! Merged-run data types: globally placed steps, boundary audit records and
//! run-level aggregates.

use serde::Serialize;

/// Quality tag carried by every merged step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepQuality {
    Measured,
    LowConfidence,
    Interpolated,
}

/// One step of the stitched run. Immutable once its global index is
/// assigned.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedStep {
    /// Zero-based position in increasing-distance order.
    pub global_index: usize,
    /// Distance from the run start, metres.
    pub global_distance_m: f64,
    /// Source segment in resolved order; absent for interpolated steps.
    pub segment: Option<usize>,
    pub contact_frame: Option<u32>,
    pub toe_off_frame: Option<u32>,
    pub contact_time_s: f64,
    pub flight_time_s: Option<f64>,
    pub stride_m: Option<f64>,
    pub speed_mps: Option<f64>,
    pub cadence_spm: Option<f64>,
    pub confidence: f64,
    pub is_interpolated: bool,
    pub quality: StepQuality,
}

/// A duplicate candidate excluded at a segment boundary. Recorded, never
/// silently dropped.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateStep {
    pub segment: usize,
    pub global_distance_m: f64,
    pub confidence: f64,
}

/// Resolution record for one segment boundary.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryAudit {
    pub boundary_m: f64,
    pub candidates: usize,
    pub accepted_segment: usize,
    pub accepted_distance_m: f64,
    pub duplicates: Vec<DuplicateStep>,
}

/// Run-level aggregates over the merged stream.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_steps: usize,
    /// Measured steps; interpolated ones are excluded from this count.
    pub real_steps: usize,
    pub interpolated_steps: usize,
    pub duplicate_steps: usize,
    /// Sum of contact plus flight time over the merged stream, seconds.
    pub total_time_s: f64,
    /// First to last merged contact, metres.
    pub distance_covered_m: f64,
    /// The run's declared total distance.
    pub declared_distance_m: f64,
    pub avg_speed_mps: f64,
    pub max_speed_mps: f64,
    pub mean_stride_m: f64,
    /// Median is reported alongside the mean because it stays robust to
    /// residual duplicate and interpolation artifacts.
    pub median_stride_m: f64,
    pub mean_cadence_spm: f64,
}
