//! Step-level data types shared by the analyzer and the merger.

use serde::{Deserialize, Serialize};

/// One marked footfall supplied by the contact-marking / pose collaborators.
/// Frames index into the segment's own video.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactEvent {
    pub contact_frame: u32,
    pub toe_off_frame: u32,
    /// Foot pixel position at the contact frame, native video resolution.
    pub foot_px: [f64; 2],
    /// Pose-estimator confidence for the foot landmark, when available.
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// One footfall with derived metrics, local to its segment.
///
/// The first contact of a segment completes no stride, so its stride, speed
/// and cadence are absent; the last contact has no following flight phase.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub contact_frame: u32,
    pub toe_off_frame: u32,
    /// Ground contact duration, seconds.
    pub contact_time_s: f64,
    /// Airborne time until the next contact, absent on the segment's last step.
    pub flight_time_s: Option<f64>,
    /// Along-track distance from the segment start, metres.
    pub local_distance_m: f64,
    /// Distance covered since the previous contact.
    pub stride_m: Option<f64>,
    /// Stride length over the completed stride duration.
    pub speed_mps: Option<f64>,
    /// Instantaneous steps per minute over the completed stride.
    pub cadence_spm: Option<f64>,
    /// Calibration confidence scaled by the pose confidence, `[0, 1]`.
    pub confidence: f64,
}

impl Step {
    /// A step is usable for downstream modeling when it completed a stride
    /// with positive length and speed.
    pub fn is_usable(&self) -> bool {
        matches!((self.stride_m, self.speed_mps), (Some(s), Some(v)) if s > 0.0 && v > 0.0)
    }
}
