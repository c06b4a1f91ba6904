// talos_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::models::Dynamics;
pub use crate::utils::integrators::{Integrator, SemiImplicitEuler, RK4};

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::state::{
    DriveVoltages, Pose, RobotState, StateVariable, Velocity, WheelSpeeds,
};
pub use crate::types::{Control, State};

// --- Configuration and Errors ---
pub use crate::config::{IntegrationMethod, RobotConfig, SimConfig};
pub use crate::error::SimError;

// --- Concrete Model Implementations (Export common ones for convenience) ---
pub use crate::models::diff_drive::DifferentialDriveModel;
pub use crate::sim::Simulation;
