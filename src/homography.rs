//! Planar image-to-world homography solved from four point correspondences.
//!
//! Direct Linear Transform: fixing `h33 = 1` leaves eight unknowns, and each
//! correspondence contributes two linear equations. The 8x8 system is solved
//! by Gaussian elimination with partial pivoting. Near-singular systems
//! (collinear or duplicate points) surface as [`CalibrationError`] instead of
//! a degenerate matrix, and the checked [`Homography::apply`] never lets a
//! NaN escape downstream.

use crate::error::CalibrationError;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

const PIVOT_EPS: f64 = 1e-9;
const W_EPS: f64 = 1e-9;

/// One pixel ↔ world correspondence. World coordinates are metres:
/// x along the track, y across the lane in `[0, lane width]`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PointPair {
    pub pixel: [f64; 2],
    pub world: [f64; 2],
}

/// Solved 3x3 projective transform mapping pixels onto the lane plane.
#[derive(Clone, Debug, Serialize)]
pub struct Homography {
    mtx: Matrix3<f64>,
}

impl Homography {
    /// Solve the transform from exactly four correspondences.
    pub fn solve(pairs: &[PointPair; 4]) -> Result<Self, CalibrationError> {
        // Two equations per pair, unknowns h11..h32 with h33 = 1:
        //   [x y 1 0 0 0 -X*x -X*y] h = X
        //   [0 0 0 x y 1 -Y*x -Y*y] h = Y
        let mut system = [[0.0f64; 9]; 8];
        for (i, pair) in pairs.iter().enumerate() {
            let [x, y] = pair.pixel;
            let [wx, wy] = pair.world;
            system[2 * i] = [x, y, 1.0, 0.0, 0.0, 0.0, -wx * x, -wx * y, wx];
            system[2 * i + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -wy * x, -wy * y, wy];
        }
        let h = solve_linear(&mut system)?;
        let mtx = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
        Ok(Self { mtx })
    }

    /// Map a pixel onto the world plane.
    ///
    /// Signals [`CalibrationError::PointAtInfinity`] when the homogeneous
    /// scale collapses instead of returning NaN coordinates.
    pub fn apply(&self, pixel: [f64; 2]) -> Result<[f64; 2], CalibrationError> {
        let v = self.mtx * Vector3::new(pixel[0], pixel[1], 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() <= W_EPS || !v[0].is_finite() || !v[1].is_finite() {
            return Err(CalibrationError::PointAtInfinity {
                x: pixel[0],
                y: pixel[1],
            });
        }
        Ok([v[0] / w, v[1] / w])
    }

    /// Root-mean-square world-space residual of mapping each source pixel
    /// back to its world point. Used for calibration self-validation.
    pub fn round_trip_rmse(&self, pairs: &[PointPair; 4]) -> Result<f64, CalibrationError> {
        let mut sum_sq = 0.0;
        for pair in pairs {
            let mapped = self.apply(pair.pixel)?;
            let dx = mapped[0] - pair.world[0];
            let dy = mapped[1] - pair.world[1];
            sum_sq += dx * dx + dy * dy;
        }
        Ok((sum_sq / pairs.len() as f64).sqrt())
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.mtx
    }
}

/// Gaussian elimination with partial pivoting over the augmented 8x9 system.
fn solve_linear(system: &mut [[f64; 9]; 8]) -> Result<[f64; 8], CalibrationError> {
    for col in 0..8 {
        let mut pivot_row = col;
        let mut pivot_mag = system[col][col].abs();
        for (row, eq) in system.iter().enumerate().skip(col + 1) {
            let mag = eq[col].abs();
            if mag > pivot_mag {
                pivot_mag = mag;
                pivot_row = row;
            }
        }
        if pivot_mag <= PIVOT_EPS {
            return Err(CalibrationError::Degenerate {
                reason: "collinear or duplicate correspondences",
            });
        }
        system.swap(col, pivot_row);

        let pivot = system[col][col];
        for row in col + 1..8 {
            let factor = system[row][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..9 {
                system[row][k] -= factor * system[col][k];
            }
        }
    }

    let mut solution = [0.0f64; 8];
    for col in (0..8).rev() {
        let mut acc = system[col][8];
        for (k, value) in solution.iter().enumerate().skip(col + 1) {
            acc -= system[col][k] * value;
        }
        solution[col] = acc / system[col][col];
    }
    Ok(solution)
}
