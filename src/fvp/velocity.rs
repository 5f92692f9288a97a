//! Velocity-to-acceleration strategies.
//!
//! Two estimation heuristics coexist deliberately. The finite-difference
//! model treats each step's speed as an instantaneous sample; the constant-
//! acceleration model assumes one uniform acceleration across the whole
//! stream, which is how panning-camera captures are interpreted. They
//! disagree on the same data, and both remain available as independently
//! testable strategies rather than being unified behind one guess.

use crate::fvp::regression::linear_fit;
use serde::{Deserialize, Serialize};

/// Strategy selector carried in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VelocityModelKind {
    FiniteDifference,
    ConstantAcceleration,
}

impl Default for VelocityModelKind {
    fn default() -> Self {
        Self::FiniteDifference
    }
}

/// Per-step acceleration estimator over `(time, velocity)` samples.
pub trait VelocityModel {
    /// One acceleration per sample; inputs are parallel slices.
    fn accelerations(&self, time_s: &[f64], velocity_mps: &[f64]) -> Vec<f64>;
}

/// Central finite differences of velocity over elapsed time, adjusted to
/// one-sided differences at both edges.
pub struct FiniteDifferenceVelocityModel;

impl VelocityModel for FiniteDifferenceVelocityModel {
    fn accelerations(&self, time_s: &[f64], velocity_mps: &[f64]) -> Vec<f64> {
        let n = time_s.len().min(velocity_mps.len());
        let mut out = vec![0.0; n];
        if n < 2 {
            return out;
        }
        for i in 0..n {
            let (lo, hi) = if i == 0 {
                (0, 1)
            } else if i == n - 1 {
                (n - 2, n - 1)
            } else {
                (i - 1, i + 1)
            };
            let dt = time_s[hi] - time_s[lo];
            out[i] = if dt.abs() > f64::EPSILON {
                (velocity_mps[hi] - velocity_mps[lo]) / dt
            } else {
                0.0
            };
        }
        out
    }
}

/// Single least-squares acceleration over the whole stream, applied
/// uniformly to every sample.
pub struct ConstantAccelerationVelocityModel;

impl VelocityModel for ConstantAccelerationVelocityModel {
    fn accelerations(&self, time_s: &[f64], velocity_mps: &[f64]) -> Vec<f64> {
        let n = time_s.len().min(velocity_mps.len());
        let slope = linear_fit(&time_s[..n], &velocity_mps[..n])
            .map(|fit| fit.slope)
            .unwrap_or(0.0);
        vec![slope; n]
    }
}

/// Dispatch the configured strategy.
pub fn accelerations_for(kind: VelocityModelKind, time_s: &[f64], velocity_mps: &[f64]) -> Vec<f64> {
    match kind {
        VelocityModelKind::FiniteDifference => {
            FiniteDifferenceVelocityModel.accelerations(time_s, velocity_mps)
        }
        VelocityModelKind::ConstantAcceleration => {
            ConstantAccelerationVelocityModel.accelerations(time_s, velocity_mps)
        }
    }
}
