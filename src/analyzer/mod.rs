//! Per-segment step metric derivation.
//!
//! Turns one camera segment's marked contact events and calibrated foot
//! positions into an ordered list of [`Step`] records plus summary
//! statistics. Timing comes from frame indices and the segment fps; distance
//! comes from the calibration homography applied to each contact's foot
//! pixel. Strides far from the segment median are flagged as warnings, and
//! segments with too few completed strides fail with a [`DataError`].

mod options;
mod step;

pub use options::AnalyzerOptions;
pub use step::{ContactEvent, Step};

use crate::error::{DataError, ValidationWarning};
use crate::run::RunSegment;
use log::{debug, warn};
use serde::Serialize;

/// Summary statistics over one analyzed segment.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    pub steps: usize,
    /// Steps that completed a stride with positive length and speed.
    pub usable_steps: usize,
    pub mean_contact_s: f64,
    pub mean_flight_s: f64,
    pub mean_stride_m: f64,
    pub mean_speed_mps: f64,
    pub mean_cadence_spm: f64,
}

/// Write-once result of analyzing one segment.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentAnalysis {
    pub steps: Vec<Step>,
    pub summary: SegmentSummary,
    pub warnings: Vec<ValidationWarning>,
}

/// Analyze one segment's contact events against its calibration.
///
/// `segment_index` is the segment's position in resolved run order; it only
/// labels errors and warnings.
pub fn analyze_segment(
    segment: &RunSegment,
    segment_index: usize,
    options: &AnalyzerOptions,
) -> Result<SegmentAnalysis, DataError> {
    let calibration = segment
        .calibration
        .as_ref()
        .ok_or(DataError::MissingCalibration {
            segment: segment_index,
        })?;
    if segment.fps <= 0.0 {
        return Err(DataError::InvalidFps {
            segment: segment_index,
            fps: segment.fps,
        });
    }

    let mut events = segment.events.clone();
    events.sort_by_key(|e| e.contact_frame);

    let mut steps: Vec<Step> = Vec::with_capacity(events.len());
    for (i, event) in events.iter().enumerate() {
        let world =
            calibration
                .world_position(event.foot_px)
                .map_err(|source| DataError::Calibration {
                    segment: segment_index,
                    source,
                })?;
        let contact_time_s =
            (event.toe_off_frame.saturating_sub(event.contact_frame)) as f64 / segment.fps;
        let flight_time_s = events.get(i + 1).map(|next| {
            (next.contact_frame.saturating_sub(event.toe_off_frame)) as f64 / segment.fps
        });

        let mut step = Step {
            contact_frame: event.contact_frame,
            toe_off_frame: event.toe_off_frame,
            contact_time_s,
            flight_time_s,
            local_distance_m: world[0],
            stride_m: None,
            speed_mps: None,
            cadence_spm: None,
            confidence: calibration.confidence * event.confidence.unwrap_or(1.0),
        };

        if let Some(prev) = steps.last() {
            let stride = step.local_distance_m - prev.local_distance_m;
            step.stride_m = Some(stride);
            // Duration of the completed stride: previous contact plus the
            // flight that ended at this contact.
            if let Some(prev_flight) = prev.flight_time_s {
                let duration = prev.contact_time_s + prev_flight;
                if duration > 0.0 {
                    step.speed_mps = Some(stride / duration);
                    step.cadence_spm = Some(60.0 / duration);
                }
            }
        }
        steps.push(step);
    }

    let usable = steps.iter().filter(|s| s.is_usable()).count();
    if usable < options.min_usable_steps {
        warn!(
            "SegmentAnalyzer::analyze segment={} usable={} required={}",
            segment_index, usable, options.min_usable_steps
        );
        return Err(DataError::InsufficientSteps {
            segment: segment_index,
            usable,
            required: options.min_usable_steps,
        });
    }

    let warnings = stride_warnings(&steps, segment_index, options.stride_outlier_factor);
    let summary = summarize(&steps, usable);
    debug!(
        "SegmentAnalyzer::analyze segment={} steps={} usable={} mean_stride_m={:.3} mean_speed_mps={:.2}",
        segment_index,
        steps.len(),
        usable,
        summary.mean_stride_m,
        summary.mean_speed_mps
    );
    Ok(SegmentAnalysis {
        steps,
        summary,
        warnings,
    })
}

/// Flag strides outside `[median / factor, median * factor]`.
fn stride_warnings(steps: &[Step], segment_index: usize, factor: f64) -> Vec<ValidationWarning> {
    let strides: Vec<f64> = steps.iter().filter_map(|s| s.stride_m).collect();
    let Some(median) = median(&strides) else {
        return Vec::new();
    };
    if median <= 0.0 || factor <= 1.0 {
        return Vec::new();
    }
    let mut warnings = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        let Some(stride) = step.stride_m else { continue };
        if stride > median * factor || stride < median / factor {
            warn!(
                "SegmentAnalyzer::analyze segment={} step={} stride_m={:.3} median_m={:.3}",
                segment_index, index, stride, median
            );
            warnings.push(ValidationWarning::StrideOutlier {
                segment: Some(segment_index),
                step_index: index,
                stride_m: stride,
                median_m: median,
            });
        }
    }
    warnings
}

fn summarize(steps: &[Step], usable: usize) -> SegmentSummary {
    SegmentSummary {
        steps: steps.len(),
        usable_steps: usable,
        mean_contact_s: mean(steps.iter().map(|s| s.contact_time_s)),
        mean_flight_s: mean(steps.iter().filter_map(|s| s.flight_time_s)),
        mean_stride_m: mean(steps.iter().filter_map(|s| s.stride_m)),
        mean_speed_mps: mean(steps.iter().filter_map(|s| s.speed_mps)),
        mean_cadence_spm: mean(steps.iter().filter_map(|s| s.cadence_spm)),
    }
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Median of a slice; `None` when empty.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(0.5 * (sorted[mid - 1] + sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}
