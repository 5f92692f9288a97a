//! Run-level aggregates over the merged stream.

use crate::analyzer::{mean, median};
use crate::merge::types::{MergedStep, RunSummary};

pub(super) fn summarize(
    steps: &[MergedStep],
    duplicate_steps: usize,
    declared_distance_m: f64,
) -> RunSummary {
    let interpolated = steps.iter().filter(|s| s.is_interpolated).count();
    let real = steps.len() - interpolated;

    let total_time_s: f64 = steps
        .iter()
        .map(|s| s.contact_time_s + s.flight_time_s.unwrap_or(0.0))
        .sum();
    let distance_covered_m = match (steps.first(), steps.last()) {
        (Some(first), Some(last)) => last.global_distance_m - first.global_distance_m,
        _ => 0.0,
    };
    let avg_speed_mps = if total_time_s > 0.0 {
        distance_covered_m / total_time_s
    } else {
        0.0
    };
    let max_speed_mps = steps
        .iter()
        .filter_map(|s| s.speed_mps)
        .fold(0.0f64, f64::max);
    let strides: Vec<f64> = steps.iter().filter_map(|s| s.stride_m).collect();

    RunSummary {
        total_steps: steps.len(),
        real_steps: real,
        interpolated_steps: interpolated,
        duplicate_steps,
        total_time_s,
        distance_covered_m,
        declared_distance_m,
        avg_speed_mps,
        max_speed_mps,
        mean_stride_m: mean(strides.iter().copied()),
        median_stride_m: median(&strides).unwrap_or(0.0),
        mean_cadence_spm: mean(steps.iter().filter_map(|s| s.cadence_spm)),
    }
}
