//! Run and segment snapshots with guarded lifecycle state machines.
//!
//! A run progresses `Setup -> Analyzing -> Merging -> Complete`, with
//! `Error` reachable from any stage. Each segment progresses
//! `Pending -> Uploaded -> Calibrated -> Analyzed -> Merged`; a segment
//! cannot be analyzed before it is calibrated, and the run cannot enter
//! `Merging` until every segment is `Analyzed`. The orchestrator in
//! [`crate::pipeline`] drives both machines over immutable analysis results.

use crate::analyzer::ContactEvent;
use crate::calibration::{Calibration, CalibrationInput};
use crate::error::DataError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Athlete profile supplied by the profile collaborator.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub mass_kg: f64,
    pub height_m: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    Setup,
    Analyzing,
    Merging,
    Complete,
    Error,
}

impl RunStatus {
    fn name(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Analyzing => "analyzing",
            Self::Merging => "merging",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentStatus {
    Pending,
    Uploaded,
    Calibrated,
    Analyzed,
    Merged,
}

impl SegmentStatus {
    fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploaded => "uploaded",
            Self::Calibrated => "calibrated",
            Self::Analyzed => "analyzed",
            Self::Merged => "merged",
        }
    }
}

/// One physical sprint attempt. Immutable once merging completes.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: u32,
    pub total_distance_m: f64,
    pub athlete: Athlete,
    pub status: RunStatus,
}

impl Run {
    pub fn new(id: u32, total_distance_m: f64, athlete: Athlete) -> Self {
        Self {
            id,
            total_distance_m,
            athlete,
            status: RunStatus::Setup,
        }
    }

    /// Advance the run state machine. `Error` is reachable from any state;
    /// the forward path must be walked in order.
    pub fn advance(&mut self, next: RunStatus) -> Result<(), DataError> {
        use RunStatus::*;
        let allowed = matches!(
            (self.status, next),
            (Setup, Analyzing) | (Analyzing, Merging) | (Merging, Complete)
        ) || next == Error;
        if !allowed {
            return Err(DataError::InvalidTransition {
                from: self.status.name(),
                to: next.name(),
            });
        }
        debug!("Run::advance id={} {} -> {}", self.id, self.status.name(), next.name());
        self.status = next;
        Ok(())
    }
}

/// One camera's coverage of a sub-interval of the run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSegment {
    pub id: u32,
    /// Along-track interval covered by this camera, metres.
    pub start_m: f64,
    pub end_m: f64,
    pub fps: f64,
    /// Explicit ordering override; segments fall back to `start_m` order.
    pub order_index: Option<u32>,
    /// Raw calibration marks awaiting a solve.
    pub calibration_marks: Option<CalibrationInput>,
    pub calibration: Option<Calibration>,
    pub events: Vec<ContactEvent>,
    pub status: SegmentStatus,
}

impl RunSegment {
    pub fn new(id: u32, start_m: f64, end_m: f64, fps: f64) -> Self {
        Self {
            id,
            start_m,
            end_m,
            fps,
            order_index: None,
            calibration_marks: None,
            calibration: None,
            events: Vec::new(),
            status: SegmentStatus::Pending,
        }
    }

    /// Register the segment's marked events (the upload step).
    pub fn upload_events(&mut self, events: Vec<ContactEvent>) -> Result<(), DataError> {
        self.advance(SegmentStatus::Uploaded)?;
        self.events = events;
        Ok(())
    }

    /// Solve and attach the segment calibration.
    pub fn calibrate(&mut self, input: &CalibrationInput) -> Result<(), DataError> {
        if self.status != SegmentStatus::Uploaded {
            return Err(DataError::InvalidTransition {
                from: self.status.name(),
                to: SegmentStatus::Calibrated.name(),
            });
        }
        let calibration = Calibration::solve(input).map_err(|source| DataError::Calibration {
            segment: self.id as usize,
            source,
        })?;
        self.calibration = Some(calibration);
        self.status = SegmentStatus::Calibrated;
        Ok(())
    }

    /// Advance the segment state machine along its forward path.
    pub fn advance(&mut self, next: SegmentStatus) -> Result<(), DataError> {
        use SegmentStatus::*;
        let allowed = matches!(
            (self.status, next),
            (Pending, Uploaded) | (Uploaded, Calibrated) | (Calibrated, Analyzed) | (Analyzed, Merged)
        );
        if !allowed {
            return Err(DataError::InvalidTransition {
                from: self.status.name(),
                to: next.name(),
            });
        }
        self.status = next;
        Ok(())
    }
}

/// Order segments for merging: by explicit index when every segment declares
/// one, otherwise by start distance. A segment always has a start distance,
/// so the ordering is total.
pub fn sort_segments(segments: &mut [RunSegment]) {
    let all_indexed = segments.iter().all(|s| s.order_index.is_some());
    if all_indexed {
        segments.sort_by_key(|s| s.order_index.unwrap_or(u32::MAX));
    } else {
        segments.sort_by(|a, b| {
            a.start_m
                .partial_cmp(&b.start_m)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn athlete() -> Athlete {
        Athlete {
            mass_kg: 78.0,
            height_m: 1.82,
        }
    }

    #[test]
    fn run_walks_forward_path() {
        let mut run = Run::new(1, 30.0, athlete());
        run.advance(RunStatus::Analyzing).unwrap();
        run.advance(RunStatus::Merging).unwrap();
        run.advance(RunStatus::Complete).unwrap();
        assert_eq!(run.status, RunStatus::Complete);
    }

    #[test]
    fn run_rejects_skipped_stage() {
        let mut run = Run::new(1, 30.0, athlete());
        let err = run.advance(RunStatus::Merging).unwrap_err();
        assert_eq!(
            err,
            DataError::InvalidTransition {
                from: "setup",
                to: "merging"
            }
        );
    }

    #[test]
    fn run_can_fail_from_any_stage() {
        let mut run = Run::new(1, 30.0, athlete());
        run.advance(RunStatus::Analyzing).unwrap();
        run.advance(RunStatus::Error).unwrap();
        assert_eq!(run.status, RunStatus::Error);
    }

    #[test]
    fn segment_cannot_analyze_before_calibration() {
        let mut segment = RunSegment::new(0, 0.0, 5.0, 240.0);
        segment.upload_events(Vec::new()).unwrap();
        let err = segment.advance(SegmentStatus::Analyzed).unwrap_err();
        assert_eq!(
            err,
            DataError::InvalidTransition {
                from: "uploaded",
                to: "analyzed"
            }
        );
    }

    #[test]
    fn segments_sort_by_start_without_indices() {
        let mut segments = vec![
            RunSegment::new(0, 10.0, 15.0, 240.0),
            RunSegment::new(1, 0.0, 5.0, 240.0),
            RunSegment::new(2, 5.0, 10.0, 240.0),
        ];
        sort_segments(&mut segments);
        let ids: Vec<u32> = segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[test]
    fn explicit_indices_override_start_order() {
        let mut a = RunSegment::new(0, 0.0, 5.0, 240.0);
        a.order_index = Some(1);
        let mut b = RunSegment::new(1, 5.0, 10.0, 240.0);
        b.order_index = Some(0);
        let mut segments = vec![a, b];
        sort_segments(&mut segments);
        let ids: Vec<u32> = segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 0]);
    }
}
