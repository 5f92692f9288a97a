mod common;

use common::synthetic_run::segment_with_contacts;
use sprint_profiler::error::RegressionError;
use sprint_profiler::run::RunStatus;
use sprint_profiler::{Athlete, PipelineOptions, Run, RunPipeline};

fn athlete() -> Athlete {
    Athlete {
        mass_kg: 78.0,
        height_m: 1.82,
    }
}

/// Two cameras share the 5 m boundary: segment A sees a contact at exactly
/// 5.0 m, segment B sees the same footfall at 5.15 m. Both fall inside the
/// 0.3 m overlap window, so the merge must keep one and record one
/// duplicate.
#[test]
fn two_segment_run_deduplicates_the_shared_footfall() {
    let run = Run::new(1, 10.0, athlete());
    let segments = vec![
        segment_with_contacts(0, 0.0, 5.0, &[1.25, 2.5, 3.75, 5.0]),
        segment_with_contacts(1, 5.0, 10.0, &[0.15, 1.4, 2.65, 3.9]),
    ];

    let pipeline = RunPipeline::new(PipelineOptions::default());
    let report = pipeline.process(run, segments);

    assert_eq!(report.run.status, RunStatus::Complete);
    assert!(report.error.is_none());
    let merged = report.merged.as_ref().expect("merged result");

    assert_eq!(merged.steps.len(), 7);
    assert_eq!(merged.summary.total_steps, 7);
    assert_eq!(merged.summary.real_steps, 7);
    assert_eq!(merged.summary.interpolated_steps, 0);
    assert_eq!(merged.summary.duplicate_steps, 1);

    // Equal confidences: proximity to the boundary decides, so segment A's
    // contact at exactly 5.0 m wins.
    assert_eq!(merged.boundaries.len(), 1);
    let audit = &merged.boundaries[0];
    assert!((audit.boundary_m - 5.0).abs() < 1e-9);
    assert_eq!(audit.candidates, 2);
    assert_eq!(audit.accepted_segment, 0);
    assert!((audit.accepted_distance_m - 5.0).abs() < 1e-9);
    assert_eq!(audit.duplicates.len(), 1);
    assert!((audit.duplicates[0].global_distance_m - 5.15).abs() < 1e-9);
    assert_eq!(audit.duplicates[0].segment, 1);

    // Global placement and indexing.
    let distances: Vec<f64> = merged.steps.iter().map(|s| s.global_distance_m).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    let indices: Vec<usize> = merged.steps.iter().map(|s| s.global_index).collect();
    assert_eq!(indices, (0..7).collect::<Vec<_>>());
    assert!(merged.steps.iter().all(|s| !s.is_interpolated));

    // Every stride here runs at the same speed, so the force-velocity fit
    // is singular; the merged result stays valid with the profile absent.
    assert!(report.profile.is_none());
    assert_eq!(report.regression_error, Some(RegressionError::Singular));

    let trace = &report.trace;
    assert_eq!(trace.segments.len(), 2);
    assert!(trace.segments.iter().all(|s| s.error.is_none()));
    assert_eq!(trace.merge.as_ref().unwrap().duplicates, 1);
}

/// An accelerating run across two cameras produces a full profile.
#[test]
fn accelerating_run_produces_a_profile() {
    let run = Run::new(2, 12.0, athlete());
    let segments = vec![
        segment_with_contacts(0, 0.0, 6.0, &[0.5, 1.6, 2.9, 4.4]),
        segment_with_contacts(1, 6.0, 12.0, &[0.1, 2.0, 4.0, 6.1]),
    ];

    let pipeline = RunPipeline::new(PipelineOptions::default());
    let report = pipeline.process(run, segments);

    assert_eq!(report.run.status, RunStatus::Complete);
    let merged = report.merged.as_ref().expect("merged result");
    assert_eq!(merged.summary.duplicate_steps, 0);
    assert!(merged.summary.max_speed_mps > merged.summary.avg_speed_mps);

    let profile = report.profile.as_ref().expect("profile present");
    assert!(profile.f0_n > 0.0);
    assert!(profile.v0_mps > profile.peak_velocity_mps);
    assert!(profile.pmax_w > 0.0);
    assert!(profile.regression.slope < 0.0);
    assert!(!profile.samples.is_empty());
}

/// The config loader feeds the same pipeline.
#[test]
fn json_config_drives_the_pipeline() {
    let json = r#"{
        "total_distance_m": 10.0,
        "athlete": { "massKg": 78.0, "heightM": 1.82 },
        "segments": [
            {
                "start_m": 0.0,
                "end_m": 5.0,
                "fps": 240.0,
                "calibration": {
                    "markerAM": 1.0,
                    "markerBM": 4.0,
                    "laneWidthM": 1.22,
                    "nearAPx": [1.0, 0.0],
                    "farAPx": [1.0, 1.22],
                    "nearBPx": [4.0, 0.0],
                    "farBPx": [4.0, 1.22]
                },
                "events": [
                    { "contactFrame": 0, "toeOffFrame": 24, "footPx": [1.0, 0.6] },
                    { "contactFrame": 60, "toeOffFrame": 84, "footPx": [2.1, 0.6] },
                    { "contactFrame": 120, "toeOffFrame": 144, "footPx": [3.4, 0.6] },
                    { "contactFrame": 180, "toeOffFrame": 204, "footPx": [4.9, 0.6] }
                ]
            }
        ]
    }"#;
    let config: sprint_profiler::config::RunConfig = serde_json::from_str(json).expect("parse");
    let (run, segments) = config.build().expect("build");
    let report = RunPipeline::new(config.options).process(run, segments);

    assert_eq!(report.run.status, RunStatus::Complete);
    let merged = report.merged.expect("merged result");
    assert_eq!(merged.summary.total_steps, 4);
    assert_eq!(merged.summary.real_steps, 4);
}
