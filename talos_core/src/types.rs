// talos_core/src/types.rs

use nalgebra::DVector;

// --- Core Type Aliases ---

/// The augmented state vector the integrators operate on.
/// For the differential-drive robot this is the 8-component layout
/// described by `state::StateVariable`.
pub type State = DVector<f64>;

/// The control input vector. For the differential-drive robot this is the
/// pair of commanded wheel voltages, `[v_left, v_right]`.
pub type Control = DVector<f64>;
