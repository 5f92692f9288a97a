//! Ordinary least squares fit of horizontal force on velocity.

use crate::error::RegressionError;
use serde::Serialize;

const EPS: f64 = 1e-12;

/// Fitted line `y = slope * x + intercept` with its coefficient of
/// determination.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Least squares over paired samples. Singular when fewer than two points
/// or all x coincide.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<Regression, RegressionError> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(RegressionError::Singular);
    }
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    for i in 0..n {
        sum_x += x[i];
        sum_y += y[i];
        sum_xx += x[i] * x[i];
        sum_xy += x[i] * y[i];
    }
    let nf = n as f64;
    let denom = nf * sum_xx - sum_x * sum_x;
    if denom.abs() <= EPS || !denom.is_finite() {
        return Err(RegressionError::Singular);
    }
    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;

    let mean_y = sum_y / nf;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for i in 0..n {
        let predicted = slope * x[i] + intercept;
        ss_res += (y[i] - predicted) * (y[i] - predicted);
        ss_tot += (y[i] - mean_y) * (y[i] - mean_y);
    }
    let r_squared = if ss_tot <= EPS {
        if ss_res <= EPS {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(Regression {
        slope,
        intercept,
        r_squared,
    })
}
