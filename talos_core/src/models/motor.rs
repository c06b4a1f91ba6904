// talos_core/src/models/motor.rs

use super::sign;
use crate::config::RobotConfig;

/// Voltage-driven DC motor with static (Coulomb) and viscous resistance
/// terms opposing wheel motion. One instance serves both wheels; the law is
/// stateless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcMotor {
    pub static_friction_term: f64,
    pub viscous_coeff: f64,
    pub effective_inertia: f64,
}

impl DcMotor {
    pub fn new(static_friction_term: f64, viscous_coeff: f64, effective_inertia: f64) -> Self {
        Self {
            static_friction_term,
            viscous_coeff,
            effective_inertia,
        }
    }

    pub fn from_config(config: &RobotConfig) -> Self {
        Self::new(
            config.static_friction_term,
            config.viscous_coeff,
            config.effective_inertia,
        )
    }

    /// Wheel angular acceleration for an applied voltage at the current
    /// wheel speed:
    ///
    /// `a = (v - (sign(omega) * static + omega * viscous)) / inertia`
    ///
    /// `sign(0)` is 0 (see `models::sign`), so a stopped wheel with no
    /// voltage applied produces exactly zero acceleration. The divisor is
    /// validated at configuration construction, never here.
    pub fn angular_acceleration(&self, omega: f64, voltage: f64) -> f64 {
        let resistance = sign(omega) * self.static_friction_term + omega * self.viscous_coeff;
        (voltage - resistance) / self.effective_inertia
    }
}
