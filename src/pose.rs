//! Pose capability interface.
//!
//! The core never touches video. Any collaborator that can answer
//! "landmarks for frame N" implements [`PoseSource`], and marked contact
//! frames are resolved into [`ContactEvent`]s through it. During ground
//! contact the support foot is the lowest landmark in image space, which is
//! how the foot pixel is picked when the marker did not supply one.

use crate::analyzer::ContactEvent;
use crate::error::DataError;
use serde::{Deserialize, Serialize};

/// One pose landmark in native video resolution.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    pub px: [f64; 2],
    pub confidence: f64,
}

/// A marked footfall before its foot position is known.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMark {
    pub contact_frame: u32,
    pub toe_off_frame: u32,
}

/// Capability interface over an external pose estimator.
pub trait PoseSource {
    /// Landmarks for a frame, or `None` when the estimator produced nothing.
    fn pose_at(&self, frame: u32) -> Option<Vec<Landmark>>;
}

/// The support-foot landmark during contact: lowest in image space
/// (largest pixel y).
pub fn contact_foot(landmarks: &[Landmark]) -> Option<Landmark> {
    landmarks
        .iter()
        .copied()
        .max_by(|a, b| {
            a.px[1]
                .partial_cmp(&b.px[1])
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Resolve marked contact frames into full contact events via a pose source.
pub fn events_from_pose<S: PoseSource>(
    source: &S,
    marks: &[ContactMark],
) -> Result<Vec<ContactEvent>, DataError> {
    let mut events = Vec::with_capacity(marks.len());
    for mark in marks {
        let landmarks = source
            .pose_at(mark.contact_frame)
            .ok_or(DataError::MissingPose {
                frame: mark.contact_frame,
            })?;
        let foot = contact_foot(&landmarks).ok_or(DataError::MissingPose {
            frame: mark.contact_frame,
        })?;
        events.push(ContactEvent {
            contact_frame: mark.contact_frame,
            toe_off_frame: mark.toe_off_frame,
            foot_px: foot.px,
            confidence: Some(foot.confidence),
        });
    }
    Ok(events)
}
