//! Profile quality classification and human-readable warnings.

use serde::Serialize;

/// Ordinal quality of a fitted profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ProfileQuality {
    fn downgrade(self) -> Self {
        match self {
            Self::Excellent => Self::Good,
            Self::Good => Self::Fair,
            _ => Self::Poor,
        }
    }
}

/// Combine fit strength, sample support and negative-force artifacts into
/// one ordinal grade.
pub fn classify(r_squared: f64, samples: usize, negative_force_points: usize) -> ProfileQuality {
    let mut quality = if r_squared >= 0.95 {
        ProfileQuality::Excellent
    } else if r_squared >= 0.85 {
        ProfileQuality::Good
    } else if r_squared >= 0.70 {
        ProfileQuality::Fair
    } else {
        ProfileQuality::Poor
    };
    if samples < 6 {
        quality = quality.downgrade();
    }
    if negative_force_points * 4 > samples {
        quality = quality.downgrade();
    }
    quality
}

/// Human-readable findings accompanying the quality grade.
pub fn profile_warnings(
    r_squared: f64,
    samples: usize,
    negative_force_points: usize,
    v0_mps: f64,
    peak_velocity_mps: f64,
) -> Vec<String> {
    let mut warnings = Vec::new();
    if r_squared < 0.70 {
        warnings.push(format!(
            "weak force-velocity fit (R2 = {r_squared:.2}); step speeds may be noisy"
        ));
    }
    if samples < 6 {
        warnings.push(format!(
            "only {samples} usable steps; the profile is sensitive to single outliers"
        ));
    }
    if negative_force_points > 0 {
        warnings.push(format!(
            "{negative_force_points} steps produced negative horizontal force; check contact marks"
        ));
    }
    if peak_velocity_mps > 0.0 && v0_mps <= peak_velocity_mps * 1.1 {
        warnings.push(
            "V0 close to observed peak velocity; acceleration phase may be incomplete".to_string(),
        );
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_fit_with_support_is_excellent() {
        assert_eq!(classify(0.98, 10, 0), ProfileQuality::Excellent);
    }

    #[test]
    fn few_samples_downgrade() {
        assert_eq!(classify(0.98, 4, 0), ProfileQuality::Good);
        assert_eq!(classify(0.88, 4, 0), ProfileQuality::Fair);
    }

    #[test]
    fn negative_forces_downgrade() {
        assert_eq!(classify(0.98, 12, 4), ProfileQuality::Good);
        assert_eq!(classify(0.60, 12, 4), ProfileQuality::Poor);
    }

    #[test]
    fn incomplete_acceleration_phase_is_flagged() {
        let warnings = profile_warnings(0.97, 8, 0, 9.3, 9.0);
        assert!(warnings.iter().any(|w| w.contains("acceleration phase")));
        let warnings = profile_warnings(0.97, 8, 0, 12.0, 9.0);
        assert!(!warnings.iter().any(|w| w.contains("acceleration phase")));
    }
}
