// talos_core/src/config.rs

use crate::error::SimError;
use serde::Deserialize;

/// Steps shorter than this are treated as a no-op by `Simulation::advance`
/// unless overridden in `SimConfig`.
pub const DEFAULT_MIN_STEP: f64 = 0.01;

// =========================================================================
// == Robot Physical Constants ==
// =========================================================================

/// Physical constants of one robot, fixed for the simulation's lifetime.
///
/// The defaults describe the reference robot the model was fit to; lengths
/// are in inches, time in seconds, commands in volts. Parsed from TOML with
/// every field optional, so a scenario file only has to name what it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
#[serde(default)]
pub struct RobotConfig {
    /// Constant motor-resistance term opposing any wheel motion (volts).
    pub static_friction_term: f64,
    /// Motor-resistance term proportional to wheel speed (volt-seconds per
    /// radian).
    pub viscous_coeff: f64,
    /// Lumped constant converting net voltage into wheel angular
    /// acceleration. Must be strictly positive; it is a divisor.
    pub effective_inertia: f64,
    /// Drive wheel radius in inches. Must be strictly positive.
    pub wheel_radius: f64,
    /// Lateral distance between the drive wheels in inches. Must be
    /// strictly positive; it is a divisor.
    pub track_width: f64,
    /// Magnitude of the kinetic-friction correction in inches per second
    /// squared, applied whenever the lateral slip exceeds the threshold.
    pub kinetic_friction_accel: f64,
    /// Lateral slip speed (inches per second) below which the wheels are
    /// treated as rolling without sliding. Must be non-negative.
    pub slip_threshold: f64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            static_friction_term: 0.5,
            viscous_coeff: 0.1527,
            effective_inertia: 0.286,
            wheel_radius: 1.625,
            track_width: 14.0,
            kinetic_friction_accel: 9.8 * 39.3701, // m/s^2 to in/s^2
            slip_threshold: 0.2,
        }
    }
}

impl RobotConfig {
    /// Checks the constraints the dynamics divide or threshold by.
    ///
    /// Called once at construction; the per-step math assumes these hold
    /// and never re-checks them.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.effective_inertia <= 0.0 {
            return Err(SimError::Configuration(format!(
                "effective_inertia must be strictly positive, got {}",
                self.effective_inertia
            )));
        }
        if self.wheel_radius <= 0.0 {
            return Err(SimError::Configuration(format!(
                "wheel_radius must be strictly positive, got {}",
                self.wheel_radius
            )));
        }
        if self.track_width <= 0.0 {
            return Err(SimError::Configuration(format!(
                "track_width must be strictly positive, got {}",
                self.track_width
            )));
        }
        if self.slip_threshold < 0.0 {
            return Err(SimError::Configuration(format!(
                "slip_threshold must be non-negative, got {}",
                self.slip_threshold
            )));
        }
        Ok(())
    }
}

// =========================================================================
// == Simulation Configuration ==
// =========================================================================

/// Which stepping scheme `Simulation` uses. Both integrate the same
/// derivative function; they differ in cost and accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub enum IntegrationMethod {
    /// One derivative evaluation per step. First order, cheap, and keeps
    /// the pose update in lockstep with the freshly integrated velocities.
    SemiImplicitEuler,
    /// Classical fourth-order Runge-Kutta: four derivative evaluations per
    /// step, much tighter error at the same step size.
    #[default]
    RungeKutta4,
}

/// Top-level configuration for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct SimConfig {
    /// Physical constants of the robot being simulated.
    pub robot: RobotConfig,
    /// Stepping scheme.
    pub integrator: IntegrationMethod,
    /// Elapsed times below this are ignored without touching the state.
    pub min_step: f64,
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        self.robot.validate()?;
        if !self.min_step.is_finite() || self.min_step < 0.0 {
            return Err(SimError::Configuration(format!(
                "min_step must be finite and non-negative, got {}",
                self.min_step
            )));
        }
        Ok(())
    }
}

// A derived Default would zero min_step and disable the degenerate-step
// policy, so spell the impl out.
impl Default for SimConfig {
    fn default() -> Self {
        Self {
            robot: RobotConfig::default(),
            integrator: IntegrationMethod::default(),
            min_step: DEFAULT_MIN_STEP,
        }
    }
}
