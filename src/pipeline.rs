//! Orchestrator driving a run end-to-end.
//!
//! The pipeline walks the run and segment state machines over immutable
//! stage results: calibrate every segment, analyze all segments in parallel
//! (each result is write-once), merge behind a barrier that must observe
//! every segment's completed analysis, then model the F-V-P profile. Any
//! fatal segment error aborts the whole merge; a partially stitched
//! distance series is never produced.

use crate::analyzer::{analyze_segment, AnalyzerOptions, SegmentAnalysis};
use crate::diagnostics::{FvpStage, MergeStage, PipelineTrace, RunReport, SegmentStage};
use crate::error::DataError;
use crate::fvp::{model_profile, FvpOptions, FvpOutcome, VelocityModelKind};
use crate::merge::{merge_run, MergeOptions};
use crate::run::{sort_segments, Run, RunSegment, RunStatus, SegmentStatus};
use log::{debug, warn};
use rayon::prelude::*;
use serde::Deserialize;
use std::time::Instant;

/// Options for every stage of the pipeline.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub analyzer: AnalyzerOptions,
    pub merge: MergeOptions,
    pub fvp: FvpOptions,
    pub velocity_model: VelocityModelKind,
}

/// Drives setup -> analyzing -> merging -> complete over a run snapshot.
pub struct RunPipeline {
    options: PipelineOptions,
}

impl RunPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Process a run. Never panics on bad input; failures come back in the
    /// report with the run in the `Error` state.
    pub fn process(&self, mut run: Run, mut segments: Vec<RunSegment>) -> RunReport {
        let total_start = Instant::now();
        let mut trace = PipelineTrace::default();
        debug!(
            "RunPipeline::process run={} segments={}",
            run.id,
            segments.len()
        );

        sort_segments(&mut segments);
        if let Err(error) = run.advance(RunStatus::Analyzing) {
            return fail(run, error, trace, total_start);
        }

        // Calibration: solve pending marks before any analysis.
        let calibrate_start = Instant::now();
        for (index, segment) in segments.iter_mut().enumerate() {
            if segment.status == SegmentStatus::Uploaded {
                if let Some(marks) = segment.calibration_marks {
                    if let Err(error) = segment.calibrate(&marks) {
                        warn!(
                            "RunPipeline::process segment={} calibration failed: {}",
                            index, error
                        );
                        return fail(run, error, trace, total_start);
                    }
                }
            }
        }
        trace.timings.push(
            "calibrate",
            calibrate_start.elapsed().as_secs_f64() * 1000.0,
        );

        // Per-segment analysis is independent across segments and fans out
        // to worker threads; each result is write-once.
        let analyze_start = Instant::now();
        let analyzer_options = self.options.analyzer;
        let results: Vec<(Result<SegmentAnalysis, DataError>, f64)> = segments
            .par_iter()
            .enumerate()
            .map(|(index, segment)| {
                let start = Instant::now();
                let result = analyze_segment(segment, index, &analyzer_options);
                (result, start.elapsed().as_secs_f64() * 1000.0)
            })
            .collect();
        trace
            .timings
            .push("analyze", analyze_start.elapsed().as_secs_f64() * 1000.0);

        let mut analyses: Vec<Option<SegmentAnalysis>> = Vec::with_capacity(results.len());
        let mut first_error: Option<DataError> = None;
        for (index, ((result, elapsed_ms), segment)) in
            results.into_iter().zip(segments.iter_mut()).enumerate()
        {
            let stage = match &result {
                Ok(analysis) => SegmentStage {
                    segment: index,
                    id: segment.id,
                    start_m: segment.start_m,
                    end_m: segment.end_m,
                    calibration_confidence: segment.calibration.as_ref().map(|c| c.confidence),
                    summary: Some(analysis.summary),
                    error: None,
                    elapsed_ms,
                },
                Err(error) => SegmentStage {
                    segment: index,
                    id: segment.id,
                    start_m: segment.start_m,
                    end_m: segment.end_m,
                    calibration_confidence: segment.calibration.as_ref().map(|c| c.confidence),
                    summary: None,
                    error: Some(error.clone()),
                    elapsed_ms,
                },
            };
            trace.segments.push(stage);
            match result {
                Ok(analysis) => {
                    if let Err(error) = segment.advance(SegmentStatus::Analyzed) {
                        first_error.get_or_insert(error);
                        analyses.push(None);
                    } else {
                        analyses.push(Some(analysis));
                    }
                }
                Err(error) => {
                    first_error.get_or_insert(error);
                    analyses.push(None);
                }
            }
        }
        if let Some(error) = first_error {
            return fail(run, error, trace, total_start);
        }

        // Merge barrier: every segment is Analyzed, the run may advance.
        if let Err(error) = run.advance(RunStatus::Merging) {
            return fail(run, error, trace, total_start);
        }
        let merge_start = Instant::now();
        let merged = match merge_run(&run, &segments, &analyses, &self.options.merge) {
            Ok(merged) => merged,
            Err(error) => return fail(run, error, trace, total_start),
        };
        let merge_ms = merge_start.elapsed().as_secs_f64() * 1000.0;
        trace.timings.push("merge", merge_ms);
        trace.merge = Some(MergeStage {
            elapsed_ms: merge_ms,
            boundaries: merged.boundaries.len(),
            duplicates: merged.summary.duplicate_steps,
            interpolated: merged.summary.interpolated_steps,
            warnings: merged.warnings.len(),
        });
        for segment in segments.iter_mut() {
            if let Err(error) = segment.advance(SegmentStatus::Merged) {
                return fail(run, error, trace, total_start);
            }
        }
        if let Err(error) = run.advance(RunStatus::Complete) {
            return fail(run, error, trace, total_start);
        }

        // F-V-P is pure and synchronous; its failure leaves the merged
        // result untouched.
        let fvp_start = Instant::now();
        let outcome = model_profile(
            &merged.steps,
            &run.athlete,
            &self.options.fvp,
            self.options.velocity_model,
        );
        let fvp_ms = fvp_start.elapsed().as_secs_f64() * 1000.0;
        trace.timings.push("fvp", fvp_ms);

        let (profile, insufficient, regression_error) = match outcome {
            Ok(FvpOutcome::Profile(profile)) => (Some(profile), None, None),
            Ok(FvpOutcome::Insufficient(reason)) => {
                warn!("RunPipeline::process profile skipped: {:?}", reason);
                (None, Some(reason), None)
            }
            Err(error) => {
                warn!("RunPipeline::process profile failed: {}", error);
                (None, None, Some(error))
            }
        };
        trace.fvp = Some(FvpStage {
            elapsed_ms: fvp_ms,
            samples: profile.as_ref().map(|p| p.samples.len()),
            quality: profile.as_ref().map(|p| p.quality),
            insufficient,
            error: regression_error.clone(),
        });

        trace.timings.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "RunPipeline::process done run={} status={:?} steps={} profile={} total_ms={:.3}",
            run.id,
            run.status,
            merged.summary.total_steps,
            profile.is_some(),
            trace.timings.total_ms
        );
        RunReport {
            run,
            merged: Some(merged),
            profile,
            insufficient,
            error: None,
            regression_error,
            trace,
        }
    }
}

/// Abort the run: set the `Error` state and report the cause.
fn fail(mut run: Run, error: DataError, mut trace: PipelineTrace, total_start: Instant) -> RunReport {
    warn!("RunPipeline::process run={} aborted: {}", run.id, error);
    let _ = run.advance(RunStatus::Error);
    trace.timings.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
    RunReport {
        run,
        merged: None,
        profile: None,
        insufficient: None,
        error: Some(error),
        regression_error: None,
        trace,
    }
}
