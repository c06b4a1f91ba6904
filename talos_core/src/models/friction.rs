// talos_core/src/models/friction.rs

use super::sign;
use crate::config::RobotConfig;
use nalgebra::Vector2;

/// Coulomb-style correction that opposes lateral wheel slide.
///
/// The slip scalar is the component of world-frame velocity along
/// `(cos(theta), sin(theta))`, the axis perpendicular to the rolling
/// direction. At or below the threshold the wheels are treated as rolling
/// cleanly and no correction applies; strictly above it, a fixed-magnitude
/// deceleration opposes the slide. The transition is a step, not a ramp:
/// the magnitude does not grow with the overshoot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KineticFriction {
    /// Correction magnitude in in/s^2.
    pub accel: f64,
    /// Slip speed below which no correction applies, in in/s.
    pub slip_threshold: f64,
}

impl KineticFriction {
    pub fn new(accel: f64, slip_threshold: f64) -> Self {
        Self {
            accel,
            slip_threshold,
        }
    }

    pub fn from_config(config: &RobotConfig) -> Self {
        Self::new(config.kinetic_friction_accel, config.slip_threshold)
    }

    /// Signed lateral slip speed: the dot product of the world-frame
    /// velocity with the unit vector perpendicular to the rolling
    /// direction.
    pub fn slip(vx: f64, vy: f64, theta: f64) -> f64 {
        vx * theta.cos() + vy * theta.sin()
    }

    /// World-frame correction acceleration. Exactly zero at or below the
    /// threshold; `(-cos(theta), -sin(theta)) * sign(slip) * accel` above
    /// it.
    pub fn correction(&self, vx: f64, vy: f64, theta: f64) -> Vector2<f64> {
        let slip = Self::slip(vx, vy, theta);
        if slip.abs() > self.slip_threshold {
            -self.accel * sign(slip) * Vector2::new(theta.cos(), theta.sin())
        } else {
            Vector2::zeros()
        }
    }
}
