use serde::Deserialize;

/// Parameters of the force-velocity-power model.
///
/// The contact-angle bounds are empirical; the default pair matches fixed
/// cameras, [`FvpOptions::panning`] matches the panning capture mode.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct FvpOptions {
    /// Air density, kg/m^3.
    pub air_density: f64,
    /// Aerodynamic drag coefficient of a running human.
    pub drag_coefficient: f64,
    /// Frontal area model: `A = coeff * height^2`, m^2.
    pub frontal_area_coeff: f64,
    /// Leg contact angle at near-zero velocity, degrees.
    pub contact_angle_max_deg: f64,
    /// Leg contact angle at peak velocity, degrees.
    pub contact_angle_min_deg: f64,
    /// Minimum usable steps before a profile is attempted.
    pub min_samples: usize,
    /// Athlete mass must lie in `(0, max_mass_kg]`.
    pub max_mass_kg: f64,
    /// Athlete height must lie in `(0, max_height_m]`.
    pub max_height_m: f64,
}

impl Default for FvpOptions {
    fn default() -> Self {
        Self {
            air_density: 1.225,
            drag_coefficient: 0.9,
            frontal_area_coeff: 0.146,
            contact_angle_max_deg: 60.0,
            contact_angle_min_deg: 45.0,
            min_samples: 3,
            max_mass_kg: 200.0,
            max_height_m: 2.5,
        }
    }
}

impl FvpOptions {
    /// Preset for panning-camera captures, paired with the constant-
    /// acceleration velocity model.
    pub fn panning() -> Self {
        Self {
            contact_angle_max_deg: 65.0,
            contact_angle_min_deg: 48.0,
            ..Self::default()
        }
    }
}
