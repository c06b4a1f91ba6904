// talos_core/src/sim.rs

use crate::config::{IntegrationMethod, SimConfig};
use crate::error::SimError;
use crate::models::diff_drive::DifferentialDriveModel;
use crate::models::Dynamics;
use crate::state::{DriveVoltages, POSE_DIM, Pose, RobotState, Velocity, WheelSpeeds};
use crate::types::State;
use crate::utils::integrators::{Integrator, SemiImplicitEuler, RK4};
use tracing::{debug, warn};

/// Owns one robot's augmented state and advances it tick by tick.
///
/// The embedding loop hands in an elapsed time and a voltage command each
/// tick and gets the resulting pose back; everything else (drawing, input,
/// timing) lives outside. One instance owns exactly one state vector, so
/// parallel scenario sweeps use independent (or cloned) instances and
/// never share mutable state.
#[derive(Debug, Clone)]
pub struct Simulation {
    model: Box<dyn Dynamics>,
    integrator: Box<dyn Integrator<f64>>,
    state: State,
    time: f64,
    min_step: f64,
}

impl Simulation {
    /// Validates the configuration and builds the simulation at the given
    /// initial state, with simulated time at zero.
    pub fn new(config: SimConfig, initial: RobotState) -> Result<Self, SimError> {
        config.validate()?;
        let model = DifferentialDriveModel::new(&config.robot)?;
        let integrator: Box<dyn Integrator<f64>> = match config.integrator {
            // The augmented-state layout puts each pose derivative POSE_DIM
            // slots after the pose component, which is what the
            // semi-implicit update needs to know.
            IntegrationMethod::SemiImplicitEuler => {
                Box::new(SemiImplicitEuler { pose_dim: POSE_DIM })
            }
            IntegrationMethod::RungeKutta4 => Box::new(RK4),
        };
        debug!(
            integrator = ?config.integrator,
            min_step = config.min_step,
            "simulation constructed"
        );
        Ok(Self {
            model: Box::new(model),
            integrator,
            state: initial.to_vector(),
            time: 0.0,
            min_step: config.min_step,
        })
    }

    /// Advances the state by `elapsed` seconds under the given voltages
    /// and returns the pose after the step.
    ///
    /// An `elapsed` below the configured minimum is a defined no-op: the
    /// state and simulated time stay untouched and the previous pose is
    /// returned. That is a stepping policy, not an error, and it implies
    /// nothing about whether the caller should redraw. Negative or
    /// non-finite `elapsed` is an error, as is a step whose result contains
    /// a non-finite component; on every error path the state is left
    /// exactly as it was.
    pub fn advance(&mut self, elapsed: f64, voltages: &DriveVoltages) -> Result<Pose, SimError> {
        if !elapsed.is_finite() || elapsed < 0.0 {
            return Err(SimError::InvalidStep(elapsed));
        }
        if elapsed < self.min_step {
            debug!(
                elapsed,
                min_step = self.min_step,
                "step below minimum, state unchanged"
            );
            return Ok(self.pose());
        }

        let u = voltages.to_vector();
        let next = self
            .model
            .propagate(&self.state, &u, self.time, elapsed, self.integrator.as_ref());

        // Commit only a fully finite state; otherwise keep the last good one.
        if !next.iter().all(|v| v.is_finite()) {
            warn!(t = self.time, "integration produced a non-finite state");
            return Err(SimError::NumericalInstability { time: self.time });
        }

        self.state = next;
        self.time += elapsed;
        Ok(self.pose())
    }

    /// Replaces the state wholesale and rewinds simulated time to zero.
    pub fn reset(&mut self, initial: RobotState) {
        self.state = initial.to_vector();
        self.time = 0.0;
    }

    /// The typed view of the full augmented state.
    pub fn robot_state(&self) -> RobotState {
        RobotState::from_vector(&self.state)
    }

    pub fn pose(&self) -> Pose {
        self.robot_state().pose
    }

    pub fn velocity(&self) -> Velocity {
        self.robot_state().velocity
    }

    pub fn wheel_speeds(&self) -> WheelSpeeds {
        self.robot_state().wheels
    }

    /// The raw augmented state vector.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Simulated seconds accumulated by committed steps. No-op and error
    /// paths do not advance this, so it always equals the integral of the
    /// applied step durations.
    pub fn time(&self) -> f64 {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobotConfig;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    const STEP: f64 = 0.02;
    const BOTH_METHODS: [IntegrationMethod; 2] = [
        IntegrationMethod::SemiImplicitEuler,
        IntegrationMethod::RungeKutta4,
    ];

    fn sim_with(method: IntegrationMethod, initial: RobotState) -> Simulation {
        let config = SimConfig {
            integrator: method,
            ..SimConfig::default()
        };
        Simulation::new(config, initial).unwrap()
    }

    #[test]
    fn test_construction_rejects_invalid_configuration() {
        let config = SimConfig {
            robot: RobotConfig {
                track_width: 0.0,
                ..RobotConfig::default()
            },
            ..SimConfig::default()
        };
        assert!(matches!(
            Simulation::new(config, RobotState::default()),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn test_rest_with_no_voltage_is_a_fixed_point() {
        for method in BOTH_METHODS {
            let initial = RobotState::at_pose(-30.0, 30.0, std::f64::consts::PI / 12.0);
            let mut sim = sim_with(method, initial);
            let start = sim.state().clone();
            for _ in 0..50 {
                sim.advance(STEP, &DriveVoltages::default()).unwrap();
            }
            // Not just "close": every derivative is exactly zero at rest,
            // so the state never moves at all.
            assert_eq!(sim.state(), &start, "{method:?}");
            assert_eq!(sim.pose(), initial.pose, "{method:?}");
        }
    }

    #[test]
    fn test_symmetric_voltage_drives_straight() {
        let theta0 = std::f64::consts::PI / 12.0;
        for method in BOTH_METHODS {
            let mut sim = sim_with(method, RobotState::at_pose(0.0, 0.0, theta0));
            let forward = DriveVoltages::new(6.0, 6.0);
            for _ in 0..150 {
                sim.advance(0.01, &forward).unwrap();
            }

            // Equal voltages never produce a wheel imbalance, so the
            // angular terms cancel bitwise and the heading is untouched.
            let state = sim.robot_state();
            assert_eq!(state.pose.theta, theta0, "{method:?}");
            assert_eq!(state.velocity.omega, 0.0, "{method:?}");
            assert_eq!(state.wheels.left, state.wheels.right, "{method:?}");

            // Motion is purely along the initial rolling direction.
            let (dx, dy) = (state.pose.x, state.pose.y);
            let lateral = dx * theta0.cos() + dy * theta0.sin();
            let forward_dist = dx * -theta0.sin() + dy * theta0.cos();
            assert_abs_diff_eq!(lateral, 0.0, epsilon = 1e-9);
            assert!(forward_dist > 1.0, "{method:?}: moved {forward_dist}");
        }
    }

    #[test]
    fn test_antisymmetric_voltage_spins_in_place() {
        let theta0 = std::f64::consts::PI / 12.0;
        for method in BOTH_METHODS {
            let mut sim = sim_with(method, RobotState::at_pose(-30.0, 30.0, theta0));
            let spin_ccw = DriveVoltages::new(-6.0, 6.0);
            let mut previous_omega = 0.0;
            for _ in 0..150 {
                sim.advance(0.01, &spin_ccw).unwrap();
                let state = sim.robot_state();
                // Mirrored wheels cancel bitwise, so the center never
                // translates at all.
                assert_eq!(state.pose.x, -30.0, "{method:?}");
                assert_eq!(state.pose.y, 30.0, "{method:?}");
                assert!(
                    state.velocity.omega >= previous_omega,
                    "{method:?}: omega decreased"
                );
                previous_omega = state.velocity.omega;
            }
            assert!(previous_omega > 0.0, "{method:?}");
            assert!(sim.pose().theta > theta0, "{method:?}");

            // The mirrored command spins the other way.
            let mut sim = sim_with(method, RobotState::at_pose(-30.0, 30.0, theta0));
            for _ in 0..150 {
                sim.advance(0.01, &DriveVoltages::new(6.0, -6.0)).unwrap();
            }
            assert!(sim.velocity().omega < 0.0, "{method:?}");
        }
    }

    #[test]
    fn test_semi_implicit_moves_every_pose_component_on_the_first_step() {
        // From rest the pose derivative is zero, so a purely explicit
        // update would leave the pose untouched for one whole step. The
        // semi-implicit scheme re-advances x, y and theta with the freshly
        // updated velocities, so all three move immediately.
        let initial = RobotState::at_pose(-30.0, 30.0, 0.7);
        let mut sim = sim_with(IntegrationMethod::SemiImplicitEuler, initial);
        sim.advance(STEP, &DriveVoltages::new(3.0, 5.0)).unwrap();

        let after = sim.robot_state();
        assert_ne!(after.pose.x, initial.pose.x);
        assert_ne!(after.pose.y, initial.pose.y);
        assert_ne!(after.pose.theta, initial.pose.theta);

        // Component by component, the pose advanced with the new velocity.
        assert_eq!(after.pose.x, initial.pose.x + STEP * after.velocity.vx);
        assert_eq!(after.pose.y, initial.pose.y + STEP * after.velocity.vy);
        assert_eq!(
            after.pose.theta,
            initial.pose.theta + STEP * after.velocity.omega
        );
    }

    /// Runs `n` fixed steps of the given duration and returns the final
    /// augmented state.
    fn run_fixed(method: IntegrationMethod, initial: RobotState, dt: f64, n: usize) -> State {
        let config = SimConfig {
            robot: RobotConfig {
                // Keep the dynamics smooth so the measured orders are the
                // textbook ones.
                kinetic_friction_accel: 0.0,
                ..RobotConfig::default()
            },
            integrator: method,
            min_step: 0.0,
        };
        let mut sim = Simulation::new(config, initial).unwrap();
        let command = DriveVoltages::new(3.0, 5.0);
        for _ in 0..n {
            sim.advance(dt, &command).unwrap();
        }
        sim.state().clone()
    }

    #[test]
    fn test_integrators_converge_to_the_same_trajectory() {
        // A curving run with every state component active. Wheels start
        // spinning forward and stay there, so the motor law is smooth over
        // the whole horizon.
        let initial = RobotState {
            pose: Pose::new(0.0, 0.0, 0.7),
            velocity: Velocity::new(0.3, 0.4, 0.1),
            wheels: WheelSpeeds::new(1.0, 1.0),
        };
        let reference = run_fixed(IntegrationMethod::RungeKutta4, initial, 5e-4, 1280);

        let euler_coarse =
            (run_fixed(IntegrationMethod::SemiImplicitEuler, initial, 0.04, 16) - &reference).norm();
        let euler_fine =
            (run_fixed(IntegrationMethod::SemiImplicitEuler, initial, 0.02, 32) - &reference).norm();
        let rk4_coarse =
            (run_fixed(IntegrationMethod::RungeKutta4, initial, 0.04, 16) - &reference).norm();

        // First order: halving the step halves the defect.
        let ratio = euler_coarse / euler_fine;
        assert!(
            (1.6..2.6).contains(&ratio),
            "euler error ratio {ratio} is not consistent with first order"
        );
        // Fourth order buys orders of magnitude at the same step.
        assert!(
            rk4_coarse < euler_coarse * 1e-3,
            "rk4 defect {rk4_coarse} vs euler defect {euler_coarse}"
        );
        // And the cheap scheme approaches the same limit trajectory.
        let euler_tiny =
            (run_fixed(IntegrationMethod::SemiImplicitEuler, initial, 1e-3, 640) - &reference).norm();
        assert!(
            euler_tiny < 1e-2,
            "euler at a tiny step should land on the limit trajectory, defect {euler_tiny}"
        );
    }

    #[test]
    fn test_full_voltage_approaches_wheel_steady_state() {
        // Straight run from rest at heading zero: the rolling direction is
        // +Y, so x and the heading never move while y climbs.
        let mut sim = sim_with(
            IntegrationMethod::RungeKutta4,
            RobotState::at_pose(-30.0, 30.0, 0.0),
        );
        let forward = DriveVoltages::new(6.0, 6.0);
        let config = RobotConfig::default();
        let omega_ss = (6.0 - config.static_friction_term) / config.viscous_coeff;

        for _ in 0..100 {
            sim.advance(0.01, &forward).unwrap();
        }
        let after_one_second = sim.robot_state();
        assert_eq!(after_one_second.wheels.left, after_one_second.wheels.right);
        // Analytic value at t = 1.0 is about 14.9 rad/s.
        assert!(
            (14.5..15.3).contains(&after_one_second.wheels.left),
            "wheel speed {}",
            after_one_second.wheels.left
        );
        assert_eq!(after_one_second.pose.x, -30.0);
        assert_eq!(after_one_second.pose.theta, 0.0);
        assert_eq!(after_one_second.velocity.omega, 0.0);
        assert_eq!(after_one_second.velocity.vx, 0.0);
        assert!(after_one_second.pose.y > 30.0);
        assert!(after_one_second.velocity.vy > 0.0);

        // Four more seconds close most of the remaining gap; the speed
        // stays below the asymptote throughout.
        for _ in 0..400 {
            sim.advance(0.01, &forward).unwrap();
        }
        let after_five_seconds = sim.wheel_speeds().left;
        assert!(after_five_seconds > after_one_second.wheels.left);
        assert!(after_five_seconds < omega_ss);
        assert!(
            omega_ss - after_five_seconds < 3.0,
            "wheel speed {after_five_seconds} should be closing on {omega_ss}"
        );
    }

    #[test]
    fn test_short_step_is_a_bitwise_noop() {
        let mut sim = sim_with(
            IntegrationMethod::RungeKutta4,
            RobotState::at_pose(-30.0, 30.0, 0.0),
        );
        let forward = DriveVoltages::new(6.0, 6.0);
        sim.advance(STEP, &forward).unwrap();

        let state_before = sim.state().clone();
        let time_before = sim.time();
        let pose_before = sim.pose();

        let returned = sim.advance(0.005, &forward).unwrap();
        assert_eq!(returned, pose_before);
        assert_eq!(sim.state(), &state_before);
        assert_eq!(sim.time(), time_before);

        // The minimum itself is long enough to step.
        sim.advance(0.01, &forward).unwrap();
        assert_ne!(sim.state(), &state_before);
    }

    #[test]
    fn test_zero_elapsed_is_a_noop_not_an_error() {
        let mut sim = sim_with(IntegrationMethod::RungeKutta4, RobotState::default());
        let pose = sim.advance(0.0, &DriveVoltages::new(6.0, 6.0)).unwrap();
        assert_eq!(pose, Pose::default());
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn test_negative_or_non_finite_elapsed_is_rejected() {
        let mut sim = sim_with(IntegrationMethod::RungeKutta4, RobotState::default());
        let forward = DriveVoltages::new(6.0, 6.0);
        sim.advance(STEP, &forward).unwrap();
        let state_before = sim.state().clone();
        let time_before = sim.time();

        for bad in [-0.1, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = sim.advance(bad, &forward);
            assert!(
                matches!(result, Err(SimError::InvalidStep(_))),
                "elapsed {bad} should be rejected, got {result:?}"
            );
            assert_eq!(sim.state(), &state_before);
            assert_eq!(sim.time(), time_before);
        }
    }

    #[test]
    fn test_instability_keeps_the_last_good_state() {
        for method in BOTH_METHODS {
            // A vanishing inertia makes the very first derivative overflow.
            let config = SimConfig {
                robot: RobotConfig {
                    effective_inertia: 1e-308,
                    ..RobotConfig::default()
                },
                integrator: method,
                ..SimConfig::default()
            };
            let mut sim = Simulation::new(config, RobotState::default()).unwrap();
            let result = sim.advance(STEP, &DriveVoltages::new(6.0, 6.0));
            assert!(
                matches!(result, Err(SimError::NumericalInstability { time }) if time == 0.0),
                "{method:?}: got {result:?}"
            );
            // The poisoned candidate state was discarded.
            assert_eq!(sim.state(), &RobotState::default().to_vector(), "{method:?}");
            assert_eq!(sim.time(), 0.0, "{method:?}");
        }
    }

    #[test]
    fn test_reset_restores_a_fresh_run() {
        let mut sim = sim_with(IntegrationMethod::RungeKutta4, RobotState::default());
        let forward = DriveVoltages::new(6.0, 6.0);
        for _ in 0..25 {
            sim.advance(STEP, &forward).unwrap();
        }

        let restart = RobotState::at_pose(1.0, 2.0, FRAC_PI_2);
        sim.reset(restart);
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.robot_state(), restart);
    }

    #[test]
    fn test_time_accumulates_only_committed_steps() {
        let mut sim = sim_with(IntegrationMethod::RungeKutta4, RobotState::default());
        let forward = DriveVoltages::new(6.0, 6.0);

        sim.advance(0.02, &forward).unwrap();
        sim.advance(0.005, &forward).unwrap(); // below minimum, skipped
        sim.advance(0.03, &forward).unwrap();
        let _ = sim.advance(-1.0, &forward); // rejected
        sim.advance(0.011, &forward).unwrap();

        assert_eq!(sim.time(), 0.02 + 0.03 + 0.011);
    }

    #[test]
    fn test_cloned_simulations_run_independently() {
        let mut sim = sim_with(
            IntegrationMethod::SemiImplicitEuler,
            RobotState::at_pose(0.0, 0.0, 0.3),
        );
        let forward = DriveVoltages::new(6.0, 6.0);
        sim.advance(STEP, &forward).unwrap();

        let mut copy = sim.clone();
        assert_eq!(copy.state(), sim.state());

        // Stepping one does not touch the other, and identical inputs keep
        // producing identical trajectories.
        sim.advance(STEP, &forward).unwrap();
        assert_ne!(copy.state(), sim.state());
        copy.advance(STEP, &forward).unwrap();
        assert_eq!(copy.state(), sim.state());
        assert_eq!(copy.time(), sim.time());
    }
}
