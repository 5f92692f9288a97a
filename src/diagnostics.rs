//! Report types returned by the pipeline: the merged result, the optional
//! F-V-P profile, and a per-stage trace with timings.

use crate::analyzer::SegmentSummary;
use crate::error::{DataError, RegressionError};
use crate::fvp::{HfvpResult, InsufficientReason, ProfileQuality};
use crate::merge::MergedAnalysis;
use crate::run::Run;
use serde::Serialize;

/// Timing entry for a single pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one pipeline run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }
}

/// Outcome of analyzing one segment, in resolved run order.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentStage {
    pub segment: usize,
    pub id: u32,
    pub start_m: f64,
    pub end_m: f64,
    pub calibration_confidence: Option<f64>,
    pub summary: Option<SegmentSummary>,
    pub error: Option<DataError>,
    pub elapsed_ms: f64,
}

/// Outcome of the merge barrier.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStage {
    pub elapsed_ms: f64,
    pub boundaries: usize,
    pub duplicates: usize,
    pub interpolated: usize,
    pub warnings: usize,
}

/// Outcome of the F-V-P stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FvpStage {
    pub elapsed_ms: f64,
    pub samples: Option<usize>,
    pub quality: Option<ProfileQuality>,
    pub insufficient: Option<InsufficientReason>,
    pub error: Option<RegressionError>,
}

/// Stage-by-stage trace of everything the pipeline executed.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub timings: TimingBreakdown,
    pub segments: Vec<SegmentStage>,
    pub merge: Option<MergeStage>,
    pub fvp: Option<FvpStage>,
}

/// Everything a pipeline run produces.
///
/// `profile` can be absent while `merged` is complete; that is a valid,
/// warned outcome rather than a failure. `error` is set only when the run
/// itself aborted.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run: Run,
    pub merged: Option<MergedAnalysis>,
    pub profile: Option<HfvpResult>,
    pub insufficient: Option<InsufficientReason>,
    pub error: Option<DataError>,
    pub regression_error: Option<RegressionError>,
    pub trace: PipelineTrace,
}
