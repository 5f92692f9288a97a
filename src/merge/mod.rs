//! Cross-segment merging.
//!
//! Combines every segment's analyzed step list into one continuous run:
//! global placement, boundary deduplication with an audit trail, gap
//! interpolation, global indexing and run-level aggregates. The merge is
//! all-or-nothing: any segment without a calibration or a completed
//! analysis aborts the whole run, because a partially stitched distance
//! series would be misleading.

mod boundary;
mod gap;
mod options;
mod summary;
mod types;

pub use options::MergeOptions;
pub use types::{BoundaryAudit, DuplicateStep, MergedStep, RunSummary, StepQuality};

use crate::analyzer::{median, SegmentAnalysis, Step};
use crate::error::{DataError, ValidationWarning};
use crate::run::{Run, RunSegment};
use log::{debug, warn};
use serde::Serialize;

/// A step placed on the global distance axis, still segment-attributed.
pub(crate) struct Placed {
    pub segment: usize,
    pub step: Step,
    pub global_distance_m: f64,
}

/// Complete merged result for one run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedAnalysis {
    pub steps: Vec<MergedStep>,
    pub summary: RunSummary,
    /// One record per boundary that attracted candidates.
    pub boundaries: Vec<BoundaryAudit>,
    pub warnings: Vec<ValidationWarning>,
}

/// Merge all analyzed segments of a run.
///
/// `segments` and `analyses` are parallel slices in resolved run order
/// (see [`crate::run::sort_segments`]). An absent analysis is fatal.
pub fn merge_run(
    run: &Run,
    segments: &[RunSegment],
    analyses: &[Option<SegmentAnalysis>],
    options: &MergeOptions,
) -> Result<MergedAnalysis, DataError> {
    debug_assert_eq!(segments.len(), analyses.len());
    let mut warnings = Vec::new();

    // Fatal preconditions first: the merge never works from a partial set.
    for (index, segment) in segments.iter().enumerate() {
        let calibration = segment
            .calibration
            .as_ref()
            .ok_or(DataError::MissingCalibration { segment: index })?;
        if analyses.get(index).map_or(true, |a| a.is_none()) {
            return Err(DataError::MissingAnalysis { segment: index });
        }
        if calibration.confidence < options.min_calibration_confidence {
            warn!(
                "SegmentMerger::merge segment={} calibration confidence {:.3} below {:.3}",
                index, calibration.confidence, options.min_calibration_confidence
            );
            warnings.push(ValidationWarning::LowCalibrationQuality {
                segment: index,
                confidence: calibration.confidence,
            });
        }
    }

    // 1. Global placement.
    let mut placed = Vec::new();
    for (index, (segment, analysis)) in segments.iter().zip(analyses.iter()).enumerate() {
        let analysis = analysis.as_ref().expect("checked above");
        warnings.extend(analysis.warnings.iter().cloned());
        for step in &analysis.steps {
            placed.push(Placed {
                segment: index,
                step: *step,
                global_distance_m: segment.start_m + step.local_distance_m,
            });
        }
    }

    // 2. Boundary deduplication between consecutive segments.
    let boundaries: Vec<f64> = segments
        .windows(2)
        .map(|pair| 0.5 * (pair[0].end_m + pair[1].start_m))
        .collect();
    let resolution = boundary::resolve_boundaries(&placed, &boundaries, options.overlap_window_m);
    warnings.extend(resolution.warnings);
    let duplicate_steps = resolution.excluded.len();

    let mut steps: Vec<MergedStep> = placed
        .iter()
        .enumerate()
        .filter(|(i, _)| !resolution.excluded.contains(i))
        .map(|(_, p)| to_merged(p))
        .collect();
    steps.sort_by(|a, b| {
        a.global_distance_m
            .partial_cmp(&b.global_distance_m)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // 3. Gap interpolation against the run-wide median stride.
    let strides: Vec<f64> = steps.iter().filter_map(|s| s.stride_m).collect();
    let median_stride = median(&strides).unwrap_or(0.0);
    warnings.extend(gap::interpolate_gaps(
        &mut steps,
        median_stride,
        options.gap_stride_factor,
    ));

    // 4. Global indexing in increasing-distance order.
    for (index, step) in steps.iter_mut().enumerate() {
        step.global_index = index;
    }

    // 5. Aggregates.
    let summary = summary::summarize(&steps, duplicate_steps, run.total_distance_m);
    debug!(
        "SegmentMerger::merge run={} segments={} steps={} duplicates={} interpolated={} median_stride_m={:.3}",
        run.id,
        segments.len(),
        summary.total_steps,
        summary.duplicate_steps,
        summary.interpolated_steps,
        summary.median_stride_m
    );

    Ok(MergedAnalysis {
        steps,
        summary,
        boundaries: resolution.audits,
        warnings,
    })
}

fn to_merged(p: &Placed) -> MergedStep {
    let quality = if p.step.confidence < 0.5 {
        StepQuality::LowConfidence
    } else {
        StepQuality::Measured
    };
    MergedStep {
        global_index: 0, // assigned after sorting
        global_distance_m: p.global_distance_m,
        segment: Some(p.segment),
        contact_frame: Some(p.step.contact_frame),
        toe_off_frame: Some(p.step.toe_off_frame),
        contact_time_s: p.step.contact_time_s,
        flight_time_s: p.step.flight_time_s,
        stride_m: p.step.stride_m,
        speed_mps: p.step.speed_mps,
        cadence_spm: p.step.cadence_spm,
        confidence: p.step.confidence,
        is_interpolated: false,
        quality,
    }
}
