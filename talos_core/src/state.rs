// talos_core/src/state.rs

use crate::types::{Control, State};

// --- State Layout ---

/// Number of components in the augmented state vector.
pub const STATE_DIM: usize = 8;
/// Number of leading pose components (x, y, theta). Their time derivatives
/// sit immediately after them (vx, vy, omega), an invariant the
/// semi-implicit integrator relies on.
pub const POSE_DIM: usize = 3;
/// Number of control components (left and right wheel voltages).
pub const CONTROL_DIM: usize = 2;

/// An enum naming every variable that can appear in a state vector.
/// This acts as a "dictionary" for state variables; the order returned by
/// `Dynamics::get_state_layout` defines the indices into the vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateVariable {
    // --- Pose (World Frame) ---
    X,
    Y,
    /// Heading in radians, measured counter-clockwise from the +Y axis so
    /// that the rolling direction is `(-sin(theta), cos(theta))`. Never
    /// wrapped to a bounded range.
    Theta,

    // --- Linear and Angular Velocity (World Frame) ---
    Vx,
    Vy,
    Omega,

    // --- Wheel Angular Velocity ---
    OmegaLeft,
    OmegaRight,
}

// --- Typed Views ---

/// World-frame position and heading of the chassis center.
///
/// `theta` follows the convention documented on [`StateVariable::Theta`]:
/// zero points along +Y and the value is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }
}

/// World-frame linear velocity components and angular velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
    pub omega: f64,
}

impl Velocity {
    pub fn new(vx: f64, vy: f64, omega: f64) -> Self {
        Self { vx, vy, omega }
    }
}

/// Angular velocities of the two drive wheels in rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    pub left: f64,
    pub right: f64,
}

impl WheelSpeeds {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }
}

/// Commanded wheel voltages for one tick.
///
/// Values are independently signed and are not clamped anywhere in the
/// core; bounding them is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveVoltages {
    pub left: f64,
    pub right: f64,
}

impl DriveVoltages {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Packs the pair into a control vector, `[v_left, v_right]`.
    pub fn to_vector(&self) -> Control {
        Control::from_vec(vec![self.left, self.right])
    }
}

/// The full typed view of the augmented state: pose, chassis velocity and
/// wheel speeds. This is the unit callers hand to `Simulation::new` and
/// `Simulation::reset`; internally it is flattened to a `State` vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RobotState {
    pub pose: Pose,
    pub velocity: Velocity,
    pub wheels: WheelSpeeds,
}

impl RobotState {
    /// A state at the given pose with zero velocity and stopped wheels,
    /// the usual starting point of a run.
    pub fn at_pose(x: f64, y: f64, theta: f64) -> Self {
        Self {
            pose: Pose::new(x, y, theta),
            ..Self::default()
        }
    }

    /// Flattens into the augmented state vector.
    pub fn to_vector(&self) -> State {
        State::from_vec(vec![
            self.pose.x,
            self.pose.y,
            self.pose.theta,
            self.velocity.vx,
            self.velocity.vy,
            self.velocity.omega,
            self.wheels.left,
            self.wheels.right,
        ])
    }

    /// Rebuilds the typed view from an augmented state vector.
    pub fn from_vector(x: &State) -> Self {
        assert_eq!(
            x.nrows(),
            STATE_DIM,
            "RobotState::from_vector: expected {} components, got {}",
            STATE_DIM,
            x.nrows()
        );
        Self {
            pose: Pose::new(x[0], x[1], x[2]),          // X, Y, Theta
            velocity: Velocity::new(x[3], x[4], x[5]),  // Vx, Vy, Omega
            wheels: WheelSpeeds::new(x[6], x[7]),       // OmegaLeft, OmegaRight
        }
    }
}
