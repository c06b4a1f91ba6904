// talos_core/src/utils/integrators.rs

use dyn_clone::DynClone;
use nalgebra::DVector;
use std::fmt::Debug;

/// One fixed step of a numerical integration scheme.
///
/// `func` is the derivative function `x_dot = f(x, t)`; implementations
/// may evaluate it one or more times between `t0` and `tf`. There are no
/// error conditions inside the math; callers ensure `tf > t0`. The trait
/// object is clonable so a simulation holding a boxed scheme can itself be
/// cloned.
pub trait Integrator<T>: DynClone + Debug + Send + Sync {
    fn step(
        &self,
        func: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x0: &DVector<T>,
        t0: T,
        tf: T,
    ) -> DVector<T>;
}

dyn_clone::clone_trait_object!(<T> Integrator<T>);

/// Semi-implicit (symplectic) Euler.
///
/// A single derivative evaluation per step. Every component first advances
/// explicitly, then the leading `pose_dim` components are re-advanced with
/// the velocities that were just updated:
///
/// `velocity_(t+1) = velocity_t + accel(state_t) * dt`
/// `position_(t+1) = position_t + velocity_(t+1) * dt`
///
/// Relies on a layout invariant of the state vector: the derivative of
/// component `i` (for `i < pose_dim`) must be state component
/// `i + pose_dim`. First-order accurate; unlike explicit Euler it keeps
/// position and velocity in lockstep, which keeps oscillatory systems
/// bounded instead of spiraling outward.
#[derive(Debug, Clone)]
pub struct SemiImplicitEuler {
    /// How many leading components are positions paired with the velocity
    /// block that follows them. The scheme itself is layout-agnostic; the
    /// caller names the split (`state::POSE_DIM` for the planar robot).
    pub pose_dim: usize,
}

impl<T> Integrator<T> for SemiImplicitEuler
where
    T: Copy
        + std::ops::Sub<Output = T>
        + std::ops::Mul<DVector<T>, Output = DVector<T>>
        + num_traits::Float
        + nalgebra::Scalar,
    DVector<T>: std::ops::Add<Output = DVector<T>>,
{
    fn step(
        &self,
        func: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x0: &DVector<T>,
        t0: T,
        tf: T,
    ) -> DVector<T> {
        assert!(
            2 * self.pose_dim <= x0.nrows(),
            "SemiImplicitEuler: pose_dim {} does not fit a state of {} components",
            self.pose_dim,
            x0.nrows()
        );

        let dt: T = tf - t0; // Calculate the time step
        let k1: DVector<T> = func(x0, t0);

        // Explicit update for every component first.
        let mut x1 = x0.clone() + dt * k1;

        // Positions catch up using the velocities updated a moment ago.
        for i in 0..self.pose_dim {
            let updated_velocity = x1[i + self.pose_dim];
            x1[i] = x0[i] + dt * updated_velocity;
        }

        x1
    }
}

/// Classical fourth-order Runge-Kutta.
///
/// Four derivative evaluations per step, at `t0`, twice at the midpoint
/// and at `tf`, combined with the standard 1-2-2-1 weights. Works on any
/// state layout; the derivative function must be well-defined at the
/// perturbed intermediate states.
#[derive(Debug, Clone, Default)]
pub struct RK4;

impl<T> Integrator<T> for RK4
where
    T: Copy + num_traits::Float + std::ops::Mul<DVector<T>, Output = DVector<T>> + nalgebra::Scalar,
    DVector<T>: std::ops::Add<Output = DVector<T>>,
{
    fn step(
        &self,
        func: &dyn Fn(&DVector<T>, T) -> DVector<T>,
        x0: &DVector<T>,
        t0: T,
        tf: T,
    ) -> DVector<T> {
        let dt = tf - t0;
        let half = T::from(0.5).unwrap();
        let sixth = T::from(1.0 / 6.0).unwrap();
        let two = T::from(2.0).unwrap();

        let k1 = func(x0, t0);
        let k2 = func(&(x0.clone() + half * dt * k1.clone()), t0 + half * dt);
        let k3 = func(&(x0.clone() + half * dt * k2.clone()), t0 + half * dt);
        let k4 = func(&(x0.clone() + dt * k3.clone()), tf);

        x0.clone() + dt * sixth * (k1 + two * k2 + two * k3 + k4)
    }
}
