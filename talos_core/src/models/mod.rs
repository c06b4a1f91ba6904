// talos_core/src/models/mod.rs

pub mod chassis;
pub mod diff_drive;
pub mod friction;
pub mod motor;

use crate::state::StateVariable;
use crate::types::{Control, State};
use crate::utils::integrators::Integrator;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// # Dynamics Trait
///
/// Represents the physics model of a simulated vehicle. Defines how its
/// state evolves over time based on control inputs. Implementations must be
/// pure in `get_derivatives`: the integrators call it repeatedly at
/// perturbed, possibly physically implausible intermediate states.
pub trait Dynamics: DynClone + Debug + Send + Sync {
    /// Returns the complete layout of the state vector for this specific
    /// model. The order of this Vec defines the indices for the state
    /// vector `x`.
    fn get_state_layout(&self) -> Vec<StateVariable>;

    /// Returns the total number of states (the length of the state vector
    /// `x`). This is provided as a convenience.
    fn get_state_dim(&self) -> usize {
        self.get_state_layout().len()
    }

    /// Returns the number of dimensions in the control input vector `u`.
    fn get_control_dim(&self) -> usize;

    /// Computes the time derivative of the state vector: `x_dot = f(x, u, t)`.
    /// This is the core function describing the system's behavior.
    ///
    /// # Arguments
    /// * `x`: Current state vector (`State`, which is `DVector<f64>`).
    /// * `u`: Current control input vector (`Control`, which is `DVector<f64>`).
    /// * `t`: Current simulation time.
    ///
    /// # Returns
    /// The time derivative of the state vector (`State`).
    fn get_derivatives(&self, x: &State, u: &Control, t: f64) -> State;

    /// Propagates the state forward in time using a numerical integrator.
    /// This method provides a default implementation using the `Integrator`
    /// trait. Specific dynamics models *could* override this if they have
    /// an analytical solution or a specialized integration scheme.
    ///
    /// # Arguments
    /// * `x`: Current state vector (`State`).
    /// * `u`: Current control input vector (`Control`). Assumed constant over `dt`.
    /// * `t`: Current simulation time.
    /// * `dt`: Time step duration. Must be non-negative.
    /// * `integrator`: The stepping scheme to apply (e.g. `RK4`).
    ///
    /// # Returns
    /// The estimated state vector at time `t + dt` (`State`).
    fn propagate(
        &self,
        x: &State,
        u: &Control,
        t: f64,
        dt: f64,
        integrator: &dyn Integrator<f64>,
    ) -> State {
        assert!(dt >= 0.0, "Dynamics::propagate: dt cannot be negative");
        assert_eq!(
            u.nrows(),
            self.get_control_dim(),
            "Dynamics::propagate: control input dimension mismatch"
        );

        // Define the closure f(x, t) for the integrator, capturing the
        // current control input 'u'.
        let func =
            |func_x: &State, func_t: f64| -> State { self.get_derivatives(func_x, u, func_t) };

        // Perform the integration step.
        integrator.step(&func, x, t, t + dt)
    }
}

// Make the trait object cloneable.
dyn_clone::clone_trait_object!(Dynamics);

/// Sign with a dead zero: 1.0, -1.0, or 0.0 for exactly zero input.
///
/// `f64::signum` maps a zero to 1.0 (or -1.0 for negative zero), which
/// would have the static resistance
/// term push a wheel that is at rest with no voltage applied. The dead zero
/// is what makes the all-zero state a fixed point.
pub(crate) fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
