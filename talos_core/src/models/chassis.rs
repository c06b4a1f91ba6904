// talos_core/src/models/chassis.rs

use crate::config::RobotConfig;
use nalgebra::Vector2;

/// Combines per-wheel angular accelerations into chassis motion.
///
/// Sum and difference of the wheel terms give forward and yaw acceleration
/// in the heading frame; the forward component is then projected onto the
/// world axes. Both terms carry the wheel-radius factor so the units work
/// out to linear (in/s^2) and angular (rad/s^2) acceleration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChassisKinematics {
    pub wheel_radius: f64,
    pub track_width: f64,
}

/// World-frame chassis response for one evaluation of the kinematics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChassisAccel {
    /// World-frame linear acceleration of the chassis center.
    pub linear: Vector2<f64>,
    /// Angular acceleration about the chassis center.
    pub angular: f64,
}

impl ChassisKinematics {
    pub fn new(wheel_radius: f64, track_width: f64) -> Self {
        Self {
            wheel_radius,
            track_width,
        }
    }

    pub fn from_config(config: &RobotConfig) -> Self {
        Self::new(config.wheel_radius, config.track_width)
    }

    /// World-frame linear and angular acceleration for the given wheel
    /// angular accelerations at heading `theta`.
    ///
    /// The rolling direction is `(-sin(theta), cos(theta))`; equal wheel
    /// terms produce pure translation along it, opposite terms produce pure
    /// rotation.
    pub fn accelerations(&self, accel_left: f64, accel_right: f64, theta: f64) -> ChassisAccel {
        let forward = (accel_left + accel_right) * self.wheel_radius / 2.0;
        let angular = (accel_right - accel_left) * self.wheel_radius / self.track_width;

        ChassisAccel {
            linear: forward * Vector2::new(-theta.sin(), theta.cos()),
            angular,
        }
    }
}
