//! Boundary deduplication.
//!
//! Adjacent cameras overlap around their shared boundary, so the same
//! physical footfall can be reported by both segments. All steps whose
//! global distance falls inside the overlap window of a boundary form one
//! group; the group resolves to exactly one accepted step, preferring
//! higher confidence and breaking ties by proximity to the boundary. The
//! losers are recorded in the audit trail, never silently dropped.

use super::Placed;
use crate::error::ValidationWarning;
use crate::merge::types::{BoundaryAudit, DuplicateStep};
use log::warn;
use std::cmp::Ordering;

const CONF_TIE_EPS: f64 = 1e-9;

pub(super) struct BoundaryResolution {
    /// Indices into the placed list that lost their group.
    pub excluded: Vec<usize>,
    pub audits: Vec<BoundaryAudit>,
    pub warnings: Vec<ValidationWarning>,
}

/// Resolve every boundary between consecutive segments.
///
/// `boundaries[i]` is the shared edge between segments `i` and `i + 1`;
/// only steps of those two segments compete at that boundary.
pub(super) fn resolve_boundaries(
    placed: &[Placed],
    boundaries: &[f64],
    overlap_window_m: f64,
) -> BoundaryResolution {
    let mut excluded = vec![false; placed.len()];
    let mut audits = Vec::new();
    let mut warnings = Vec::new();

    for (b_idx, &boundary_m) in boundaries.iter().enumerate() {
        let candidates: Vec<usize> = placed
            .iter()
            .enumerate()
            .filter(|(i, p)| {
                !excluded[*i]
                    && (p.segment == b_idx || p.segment == b_idx + 1)
                    && (p.global_distance_m - boundary_m).abs() <= overlap_window_m
            })
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            continue;
        }
        if candidates.len() > 2 {
            warnings.push(ValidationWarning::AmbiguousBoundary {
                boundary_m,
                candidates: candidates.len(),
            });
        }

        let winner = *candidates
            .iter()
            .max_by(|&&a, &&b| rank(&placed[a], &placed[b], boundary_m))
            .expect("non-empty candidate group");

        let mut duplicates = Vec::new();
        for &i in &candidates {
            if i == winner {
                continue;
            }
            excluded[i] = true;
            let p = &placed[i];
            warn!(
                "SegmentMerger::dedup boundary_m={:.2} duplicate segment={} distance_m={:.3} confidence={:.3}",
                boundary_m, p.segment, p.global_distance_m, p.step.confidence
            );
            duplicates.push(DuplicateStep {
                segment: p.segment,
                global_distance_m: p.global_distance_m,
                confidence: p.step.confidence,
            });
        }
        let accepted = &placed[winner];
        audits.push(BoundaryAudit {
            boundary_m,
            candidates: candidates.len(),
            accepted_segment: accepted.segment,
            accepted_distance_m: accepted.global_distance_m,
            duplicates,
        });
    }

    BoundaryResolution {
        excluded: excluded
            .iter()
            .enumerate()
            .filter(|(_, &e)| e)
            .map(|(i, _)| i)
            .collect(),
        audits,
        warnings,
    }
}

/// Ordering for boundary candidates: higher confidence wins; confidences
/// within epsilon fall back to proximity to the boundary.
fn rank(a: &Placed, b: &Placed, boundary_m: f64) -> Ordering {
    let conf_a = a.step.confidence;
    let conf_b = b.step.confidence;
    if (conf_a - conf_b).abs() > CONF_TIE_EPS {
        return conf_a.partial_cmp(&conf_b).unwrap_or(Ordering::Equal);
    }
    let dist_a = (a.global_distance_m - boundary_m).abs();
    let dist_b = (b.global_distance_m - boundary_m).abs();
    // Closer to the boundary ranks higher.
    dist_b.partial_cmp(&dist_a).unwrap_or(Ordering::Equal)
}
