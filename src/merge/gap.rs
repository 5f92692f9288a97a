//! Gap interpolation over the deduplicated stream.
//!
//! A gap wider than the configured multiple of the run's median stride gets
//! exactly one synthesized step at the evenly spaced position, inheriting
//! its timing and speed from the surrounding neighbours. Interpolated steps
//! join the global index and the distance series but never the real-step
//! count.

use crate::error::ValidationWarning;
use crate::merge::types::{MergedStep, StepQuality};
use log::warn;

const GAP_EPS: f64 = 1e-9;

/// Insert interpolated steps into a distance-sorted stream. Returns the
/// warnings raised; `steps` is re-sorted with the insertions in place.
pub(super) fn interpolate_gaps(
    steps: &mut Vec<MergedStep>,
    median_stride_m: f64,
    gap_stride_factor: f64,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    if steps.len() < 2 || median_stride_m <= 0.0 || gap_stride_factor <= 0.0 {
        return warnings;
    }
    let threshold = gap_stride_factor * median_stride_m;

    let mut inserted = Vec::new();
    for (index, pair) in steps.windows(2).enumerate() {
        let gap = pair[1].global_distance_m - pair[0].global_distance_m;
        if gap + GAP_EPS < threshold {
            continue;
        }
        let position_m = pair[0].global_distance_m + gap * 0.5;
        warn!(
            "SegmentMerger::gap after_step={} gap_m={:.3} threshold_m={:.3} position_m={:.3}",
            index, gap, threshold, position_m
        );
        warnings.push(ValidationWarning::GapInterpolated {
            after_index: index,
            gap_m: gap,
            position_m,
        });
        inserted.push(synthesize(&pair[0], &pair[1], position_m, gap));
    }

    steps.extend(inserted);
    steps.sort_by(|a, b| {
        a.global_distance_m
            .partial_cmp(&b.global_distance_m)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    warnings
}

/// A stand-in step halfway across the gap, averaging its neighbours.
fn synthesize(prev: &MergedStep, next: &MergedStep, position_m: f64, gap_m: f64) -> MergedStep {
    MergedStep {
        global_index: 0, // assigned after the final sort
        global_distance_m: position_m,
        segment: None,
        contact_frame: None,
        toe_off_frame: None,
        contact_time_s: 0.5 * (prev.contact_time_s + next.contact_time_s),
        flight_time_s: mean_opt(prev.flight_time_s, next.flight_time_s),
        stride_m: Some(gap_m * 0.5),
        speed_mps: mean_opt(prev.speed_mps, next.speed_mps),
        cadence_spm: mean_opt(prev.cadence_spm, next.cadence_spm),
        confidence: 0.5 * (prev.confidence + next.confidence),
        is_interpolated: true,
        quality: StepQuality::Interpolated,
    }
}

fn mean_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(0.5 * (a + b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}
