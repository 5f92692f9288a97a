use sprint_profiler::analyzer::ContactEvent;
use sprint_profiler::calibration::CalibrationInput;
use sprint_profiler::{Athlete, PipelineOptions, Run, RunPipeline, RunSegment};

fn main() {
    // Demo stub: one synthetic 0-5 m segment seen by a camera whose pixel
    // frame coincides with the lane plane.
    let marks = CalibrationInput {
        marker_a_m: 1.0,
        marker_b_m: 4.0,
        lane_width_m: 1.22,
        near_a_px: [1.0, 0.0],
        far_a_px: [1.0, 1.22],
        near_b_px: [4.0, 0.0],
        far_b_px: [4.0, 1.22],
    };
    let events: Vec<ContactEvent> = (0..5)
        .map(|i| ContactEvent {
            contact_frame: i * 60,
            toe_off_frame: i * 60 + 24,
            foot_px: [0.4 + 1.1 * i as f64, 0.6],
            confidence: None,
        })
        .collect();

    let mut segment = RunSegment::new(0, 0.0, 5.0, 240.0);
    segment.upload_events(events).expect("fresh segment");
    segment.calibration_marks = Some(marks);

    let athlete = Athlete {
        mass_kg: 78.0,
        height_m: 1.82,
    };
    let run = Run::new(1, 5.0, athlete);

    let pipeline = RunPipeline::new(PipelineOptions::default());
    let report = pipeline.process(run, vec![segment]);
    println!(
        "status={:?} steps={} total_ms={:.3}",
        report.run.status,
        report.merged.as_ref().map_or(0, |m| m.steps.len()),
        report.trace.timings.total_ms
    );
}
