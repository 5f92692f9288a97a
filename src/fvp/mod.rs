//! Force-velocity-power modeling of the merged step stream.
//!
//! Samozino-style sprint profile: per-step horizontal force is the sum of
//! the mass-acceleration term and air drag, an ordinary least squares fit of
//! force on velocity yields the athlete's theoretical maxima, and the
//! resulting profile is graded and annotated. Precondition violations return
//! an [`FvpOutcome::Insufficient`] value; a numerically invalid fit is a
//! [`RegressionError`], never a nonsensical profile.

mod options;
mod quality;
pub mod regression;
pub mod velocity;

pub use options::FvpOptions;
pub use quality::ProfileQuality;
pub use velocity::{
    ConstantAccelerationVelocityModel, FiniteDifferenceVelocityModel, VelocityModel,
    VelocityModelKind,
};

use crate::error::RegressionError;
use crate::merge::MergedStep;
use crate::run::Athlete;
use log::debug;
use regression::{linear_fit, Regression};
use serde::Serialize;

/// Reason a profile was not attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InsufficientReason {
    TooFewSteps,
    MassOutOfRange,
    HeightOutOfRange,
}

/// Value-level outcome of the modeling stage. Preconditions failing is not
/// an error; the merged analysis stays valid with the profile absent.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FvpOutcome {
    Profile(HfvpResult),
    Insufficient(InsufficientReason),
}

impl FvpOutcome {
    pub fn profile(&self) -> Option<&HfvpResult> {
        match self {
            Self::Profile(result) => Some(result),
            Self::Insufficient(_) => None,
        }
    }
}

/// One derived force-velocity point.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FvpSample {
    /// Elapsed run time at the step's contact, seconds.
    pub time_s: f64,
    pub velocity_mps: f64,
    pub acceleration_mps2: f64,
    pub drag_n: f64,
    pub horizontal_force_n: f64,
    pub vertical_force_n: f64,
    pub resultant_force_n: f64,
    pub power_w: f64,
    /// Horizontal share of the resultant force, percent.
    pub force_ratio_pct: f64,
}

/// Fitted sprint mechanical profile.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HfvpResult {
    /// Maximum horizontal force at zero velocity, newtons.
    pub f0_n: f64,
    /// Maximum theoretical velocity at zero force, m/s.
    pub v0_mps: f64,
    /// Maximum power, watts.
    pub pmax_w: f64,
    /// Force ratio of the lowest-velocity sample, percent.
    pub rfmax_pct: f64,
    /// Force-ratio decline rate.
    pub drf: f64,
    pub regression: Regression,
    /// The balanced optimum `sqrt(4 * Pmax)` both maxima are compared to.
    pub balanced_optimum: f64,
    pub f0_of_optimum_pct: f64,
    pub v0_of_optimum_pct: f64,
    pub peak_velocity_mps: f64,
    pub samples: Vec<FvpSample>,
    pub quality: ProfileQuality,
    pub warnings: Vec<String>,
}

/// Fit the profile over the merged stream.
pub fn model_profile(
    steps: &[MergedStep],
    athlete: &Athlete,
    options: &FvpOptions,
    model: VelocityModelKind,
) -> Result<FvpOutcome, RegressionError> {
    if !(athlete.mass_kg > 0.0 && athlete.mass_kg <= options.max_mass_kg) {
        return Ok(FvpOutcome::Insufficient(InsufficientReason::MassOutOfRange));
    }
    if !(athlete.height_m > 0.0 && athlete.height_m <= options.max_height_m) {
        return Ok(FvpOutcome::Insufficient(
            InsufficientReason::HeightOutOfRange,
        ));
    }

    // Cumulative time of each contact: every step advances the clock by its
    // own contact plus flight duration.
    let mut elapsed = 0.0;
    let mut time_s = Vec::with_capacity(steps.len());
    let mut velocity = Vec::with_capacity(steps.len());
    for step in steps {
        if let (Some(speed), Some(stride)) = (step.speed_mps, step.stride_m) {
            if speed > 0.0 && stride > 0.0 {
                time_s.push(elapsed);
                velocity.push(speed);
            }
        }
        elapsed += step.contact_time_s + step.flight_time_s.unwrap_or(0.0);
    }
    if velocity.len() < options.min_samples {
        debug!(
            "FvpModeler::model usable={} required={}",
            velocity.len(),
            options.min_samples
        );
        return Ok(FvpOutcome::Insufficient(InsufficientReason::TooFewSteps));
    }

    let acceleration = velocity::accelerations_for(model, &time_s, &velocity);
    let peak_velocity = velocity.iter().cloned().fold(0.0f64, f64::max);
    let frontal_area = options.frontal_area_coeff * athlete.height_m * athlete.height_m;

    let mut samples = Vec::with_capacity(velocity.len());
    for i in 0..velocity.len() {
        let v = velocity[i];
        let drag =
            0.5 * options.air_density * options.drag_coefficient * frontal_area * v * v;
        let horizontal = athlete.mass_kg * acceleration[i] + drag;
        let angle_deg = contact_angle_deg(
            v,
            peak_velocity,
            options.contact_angle_max_deg,
            options.contact_angle_min_deg,
        );
        let angle = angle_deg.to_radians();
        let resultant = horizontal / angle.cos();
        let vertical = horizontal * angle.tan();
        samples.push(FvpSample {
            time_s: time_s[i],
            velocity_mps: v,
            acceleration_mps2: acceleration[i],
            drag_n: drag,
            horizontal_force_n: horizontal,
            vertical_force_n: vertical,
            resultant_force_n: resultant,
            power_w: horizontal * v,
            force_ratio_pct: if resultant.abs() > f64::EPSILON {
                horizontal / resultant * 100.0
            } else {
                0.0
            },
        });
    }

    let forces: Vec<f64> = samples.iter().map(|s| s.horizontal_force_n).collect();
    let fit = linear_fit(&velocity, &forces)?;

    let f0 = fit.intercept;
    let v0 = if fit.slope < 0.0 {
        f0 / (-fit.slope)
    } else {
        f64::NAN
    };
    if !(f0.is_finite() && v0.is_finite()) || f0 <= 0.0 || v0 <= 0.0 {
        return Err(RegressionError::InvalidProfile { f0, v0 });
    }

    let pmax = f0 * v0 / 4.0;
    let rfmax = samples
        .iter()
        .min_by(|a, b| {
            a.velocity_mps
                .partial_cmp(&b.velocity_mps)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|s| s.force_ratio_pct)
        .unwrap_or(0.0);
    let drf = rfmax / v0;
    let balanced_optimum = (4.0 * pmax).sqrt();
    let negative_forces = samples
        .iter()
        .filter(|s| s.horizontal_force_n < 0.0)
        .count();

    let quality = quality::classify(fit.r_squared, samples.len(), negative_forces);
    let warnings = quality::profile_warnings(
        fit.r_squared,
        samples.len(),
        negative_forces,
        v0,
        peak_velocity,
    );
    debug!(
        "FvpModeler::model samples={} F0={:.1} V0={:.2} Pmax={:.1} r2={:.3} quality={:?}",
        samples.len(),
        f0,
        v0,
        pmax,
        fit.r_squared,
        quality
    );

    Ok(FvpOutcome::Profile(HfvpResult {
        f0_n: f0,
        v0_mps: v0,
        pmax_w: pmax,
        rfmax_pct: rfmax,
        drf,
        regression: fit,
        balanced_optimum,
        f0_of_optimum_pct: f0 / balanced_optimum * 100.0,
        v0_of_optimum_pct: v0 / balanced_optimum * 100.0,
        peak_velocity_mps: peak_velocity,
        samples,
        quality,
        warnings,
    }))
}

/// Empirical leg contact angle, linearly interpolated between the
/// configured bounds by the step's velocity fraction of the observed peak.
fn contact_angle_deg(v: f64, peak: f64, max_deg: f64, min_deg: f64) -> f64 {
    if peak <= 0.0 {
        return max_deg;
    }
    let fraction = (v / peak).clamp(0.0, 1.0);
    max_deg + (min_deg - max_deg) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{MergedStep, StepQuality};

    fn athlete() -> Athlete {
        Athlete {
            mass_kg: 78.0,
            height_m: 1.82,
        }
    }

    fn step(distance: f64, speed: f64, stride: f64) -> MergedStep {
        MergedStep {
            global_index: 0,
            global_distance_m: distance,
            segment: Some(0),
            contact_frame: None,
            toe_off_frame: None,
            contact_time_s: 0.11,
            flight_time_s: Some(0.13),
            stride_m: Some(stride),
            speed_mps: Some(speed),
            cadence_spm: Some(250.0),
            confidence: 1.0,
            is_interpolated: false,
            quality: StepQuality::Measured,
        }
    }

    /// A plausible acceleration phase: speeds rising toward a plateau.
    fn accelerating_steps() -> Vec<MergedStep> {
        let speeds = [3.2, 4.6, 5.7, 6.6, 7.3, 7.9, 8.3, 8.6];
        let mut distance = 0.0;
        speeds
            .iter()
            .map(|&v| {
                distance += v * 0.24;
                step(distance, v, v * 0.24)
            })
            .collect()
    }

    #[test]
    fn accelerating_run_yields_valid_profile() {
        let outcome = model_profile(
            &accelerating_steps(),
            &athlete(),
            &FvpOptions::default(),
            VelocityModelKind::FiniteDifference,
        )
        .expect("regression ok");
        let profile = outcome.profile().expect("profile present");
        assert!(profile.f0_n > 0.0);
        assert!(profile.v0_mps > profile.peak_velocity_mps);
        assert!((profile.pmax_w - profile.f0_n * profile.v0_mps / 4.0).abs() < 1e-9);
        assert!(profile.rfmax_pct > 0.0 && profile.rfmax_pct <= 100.0);
        assert!((profile.drf - profile.rfmax_pct / profile.v0_mps).abs() < 1e-12);
        assert_eq!(profile.samples.len(), 8);
    }

    #[test]
    fn rfmax_uses_lowest_velocity_sample() {
        let outcome = model_profile(
            &accelerating_steps(),
            &athlete(),
            &FvpOptions::default(),
            VelocityModelKind::FiniteDifference,
        )
        .expect("regression ok");
        let profile = outcome.profile().expect("profile present");
        let slowest = profile
            .samples
            .iter()
            .min_by(|a, b| a.velocity_mps.partial_cmp(&b.velocity_mps).unwrap())
            .unwrap();
        assert_eq!(profile.rfmax_pct, slowest.force_ratio_pct);
    }

    #[test]
    fn too_few_steps_is_a_value_not_an_error() {
        let steps: Vec<MergedStep> = accelerating_steps().into_iter().take(2).collect();
        let outcome = model_profile(
            &steps,
            &athlete(),
            &FvpOptions::default(),
            VelocityModelKind::FiniteDifference,
        )
        .expect("no regression attempted");
        assert!(matches!(
            outcome,
            FvpOutcome::Insufficient(InsufficientReason::TooFewSteps)
        ));
    }

    #[test]
    fn out_of_range_mass_and_height_are_rejected() {
        let steps = accelerating_steps();
        let heavy = Athlete {
            mass_kg: 250.0,
            height_m: 1.8,
        };
        let outcome = model_profile(
            &steps,
            &heavy,
            &FvpOptions::default(),
            VelocityModelKind::FiniteDifference,
        )
        .expect("no regression attempted");
        assert!(matches!(
            outcome,
            FvpOutcome::Insufficient(InsufficientReason::MassOutOfRange)
        ));

        let tall = Athlete {
            mass_kg: 80.0,
            height_m: 2.8,
        };
        let outcome = model_profile(
            &steps,
            &tall,
            &FvpOptions::default(),
            VelocityModelKind::FiniteDifference,
        )
        .expect("no regression attempted");
        assert!(matches!(
            outcome,
            FvpOutcome::Insufficient(InsufficientReason::HeightOutOfRange)
        ));
    }

    #[test]
    fn constant_velocity_stream_cannot_be_fitted() {
        // Every sample sits at the same velocity, so the force-velocity
        // system has no spread to fit.
        let steps: Vec<MergedStep> = (0..6).map(|i| step(1.5 * i as f64, 8.0, 1.5)).collect();
        let result = model_profile(
            &steps,
            &athlete(),
            &FvpOptions::default(),
            VelocityModelKind::FiniteDifference,
        );
        assert!(matches!(result, Err(RegressionError::Singular)));
    }

    #[test]
    fn contact_angle_interpolates_between_bounds() {
        assert!((contact_angle_deg(0.0, 9.0, 60.0, 45.0) - 60.0).abs() < 1e-12);
        assert!((contact_angle_deg(9.0, 9.0, 60.0, 45.0) - 45.0).abs() < 1e-12);
        assert!((contact_angle_deg(4.5, 9.0, 60.0, 45.0) - 52.5).abs() < 1e-12);
    }
}
