//! Synthetic run builders shared by the integration tests.
//!
//! Segments use a calibration whose pixel frame coincides with the lane
//! plane, so a contact's foot pixel x is its local distance in metres.
//! Contacts follow a 0.25 s stride cycle at 240 fps: 24 frames of ground
//! contact, 36 frames of flight.

use sprint_profiler::analyzer::ContactEvent;
use sprint_profiler::calibration::CalibrationInput;
use sprint_profiler::run::RunSegment;

pub const FPS: f64 = 240.0;
pub const FRAMES_PER_CYCLE: u32 = 60;
pub const CONTACT_FRAMES: u32 = 24;

/// Marks whose pixel quad equals the world quad: identity homography.
pub fn identity_marks() -> CalibrationInput {
    CalibrationInput {
        marker_a_m: 1.0,
        marker_b_m: 4.0,
        lane_width_m: 1.22,
        near_a_px: [1.0, 0.0],
        far_a_px: [1.0, 1.22],
        near_b_px: [4.0, 0.0],
        far_b_px: [4.0, 1.22],
    }
}

/// One contact at the given local distance, `index` cycles into the video.
pub fn event_at(index: usize, local_m: f64, confidence: Option<f64>) -> ContactEvent {
    let contact_frame = index as u32 * FRAMES_PER_CYCLE;
    ContactEvent {
        contact_frame,
        toe_off_frame: contact_frame + CONTACT_FRAMES,
        foot_px: [local_m, 0.6],
        confidence,
    }
}

/// An uploaded, identity-calibrated segment with contacts at the given
/// local distances.
pub fn segment_with_contacts(id: u32, start_m: f64, end_m: f64, local_m: &[f64]) -> RunSegment {
    let events = local_m
        .iter()
        .enumerate()
        .map(|(i, &d)| event_at(i, d, None))
        .collect();
    segment_with_events(id, start_m, end_m, events)
}

/// Same, with caller-provided events (custom confidences or timing).
pub fn segment_with_events(
    id: u32,
    start_m: f64,
    end_m: f64,
    events: Vec<ContactEvent>,
) -> RunSegment {
    let mut segment = RunSegment::new(id, start_m, end_m, FPS);
    segment.upload_events(events).expect("fresh segment");
    segment.calibration_marks = Some(identity_marks());
    segment
}
