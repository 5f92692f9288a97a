#![doc = include_str!("../README.md")]

// Core computation stages, leaf-first.
pub mod homography;
pub mod calibration;
pub mod analyzer;
pub mod merge;
pub mod fvp;

// Orchestration and shared plumbing.
pub mod diagnostics;
pub mod error;
pub mod pipeline;
pub mod pose;
pub mod run;

// Demo-facing configuration.
pub mod config;

// --- High-level re-exports -------------------------------------------------

pub use crate::diagnostics::RunReport;
pub use crate::fvp::{FvpOutcome, HfvpResult, ProfileQuality, VelocityModelKind};
pub use crate::merge::{MergedAnalysis, MergedStep, RunSummary};
pub use crate::pipeline::{PipelineOptions, RunPipeline};
pub use crate::run::{Athlete, Run, RunSegment};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use sprint_profiler::prelude::*;
///
/// # fn main() {
/// let athlete = Athlete { mass_kg: 78.0, height_m: 1.82 };
/// let run = Run::new(1, 30.0, athlete);
/// let pipeline = RunPipeline::new(PipelineOptions::default());
/// let report = pipeline.process(run, Vec::new());
/// println!("status={:?}", report.run.status);
/// # }
/// ```
pub mod prelude {
    pub use crate::analyzer::{AnalyzerOptions, ContactEvent};
    pub use crate::calibration::{Calibration, CalibrationInput};
    pub use crate::merge::MergeOptions;
    pub use crate::{
        Athlete, FvpOutcome, HfvpResult, MergedAnalysis, PipelineOptions, Run, RunPipeline,
        RunReport, RunSegment, VelocityModelKind,
    };
}
