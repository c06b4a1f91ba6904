// talos_core/src/models/diff_drive.rs

use super::chassis::ChassisKinematics;
use super::friction::KineticFriction;
use super::motor::DcMotor;
use super::Dynamics;
use crate::config::RobotConfig;
use crate::error::SimError;
use crate::state::{StateVariable, CONTROL_DIM, STATE_DIM};
use crate::types::{Control, State};

/// The composed planar model: two voltage-driven wheels, differential-drive
/// chassis kinematics, and the kinetic-friction slip correction, all over
/// the 8-component augmented state.
#[derive(Debug, Clone)]
pub struct DifferentialDriveModel {
    motor: DcMotor,
    chassis: ChassisKinematics,
    friction: KineticFriction,
}

impl DifferentialDriveModel {
    /// Builds the model, validating the configuration once up front. The
    /// per-step math divides by `effective_inertia` and `track_width` and
    /// assumes this check already happened.
    pub fn new(config: &RobotConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            motor: DcMotor::from_config(config),
            chassis: ChassisKinematics::from_config(config),
            friction: KineticFriction::from_config(config),
        })
    }
}

impl Dynamics for DifferentialDriveModel {
    fn get_state_layout(&self) -> Vec<StateVariable> {
        vec![
            StateVariable::X,
            StateVariable::Y,
            StateVariable::Theta,
            StateVariable::Vx,
            StateVariable::Vy,
            StateVariable::Omega,
            StateVariable::OmegaLeft,
            StateVariable::OmegaRight,
        ]
    }

    fn get_control_dim(&self) -> usize {
        CONTROL_DIM // [v_left, v_right]
    }

    fn get_derivatives(&self, x: &State, u: &Control, _t: f64) -> State {
        let theta = x[2];

        // Per-wheel angular acceleration from the applied voltages.
        let accel_left = self.motor.angular_acceleration(x[6], u[0]);
        let accel_right = self.motor.angular_acceleration(x[7], u[1]);

        // Chassis response in the world frame, plus the slip correction.
        let chassis = self.chassis.accelerations(accel_left, accel_right, theta);
        let linear = chassis.linear + self.friction.correction(x[3], x[4], theta);

        let mut x_dot = State::zeros(STATE_DIM);
        // d(Pose)/dt = Velocity
        x_dot[0] = x[3]; // X_dot = Vx
        x_dot[1] = x[4]; // Y_dot = Vy
        x_dot[2] = x[5]; // Theta_dot = Omega
        // d(Velocity)/dt = chassis response + friction correction
        x_dot[3] = linear.x;
        x_dot[4] = linear.y;
        x_dot[5] = chassis.angular;
        // d(WheelSpeeds)/dt = motor law
        x_dot[6] = accel_left;
        x_dot[7] = accel_right;

        x_dot
    }
}
