//! Example driving a simulated differential-drive robot through a scripted
//! voltage schedule, the same commands a keyboard teleop layer would emit.
//!
//! Run with `cargo run --example scripted_drive`.

use std::f64::consts::PI;
use talos_core::prelude::*;

/// One leg of the script: a command held for a number of ticks.
struct Phase {
    label: &'static str,
    voltages: DriveVoltages,
    ticks: usize,
}

fn main() -> Result<(), SimError> {
    println!("=== Scripted Differential-Drive Simulation ===\n");

    // The reference robot with the default fourth-order integrator. A TOML
    // scenario file could override any of these fields instead.
    let config = SimConfig::default();
    let initial = RobotState::at_pose(-30.0, 30.0, PI / 12.0);
    let mut sim = Simulation::new(config, initial)?;

    // Full forward voltage is 6 V per wheel; opposing signs spin in place.
    let script = [
        Phase {
            label: "forward",
            voltages: DriveVoltages::new(6.0, 6.0),
            ticks: 100,
        },
        Phase {
            label: "spin left",
            voltages: DriveVoltages::new(-6.0, 6.0),
            ticks: 75,
        },
        Phase {
            label: "forward",
            voltages: DriveVoltages::new(6.0, 6.0),
            ticks: 100,
        },
        Phase {
            label: "reverse",
            voltages: DriveVoltages::new(-6.0, -6.0),
            ticks: 75,
        },
        Phase {
            label: "coast",
            voltages: DriveVoltages::default(),
            ticks: 50,
        },
    ];

    // A fixed 50 Hz tick, as if driven by a render loop.
    let dt = 0.02;
    for phase in &script {
        println!(
            "-- {} ({} V left, {} V right) --",
            phase.label, phase.voltages.left, phase.voltages.right
        );
        for tick in 0..phase.ticks {
            let pose = sim.advance(dt, &phase.voltages)?;
            if tick % 25 == 24 {
                println!(
                    "t = {:6.2} s  pose: x = {:8.2}, y = {:8.2}, theta = {:6.2} rad",
                    sim.time(),
                    pose.x,
                    pose.y,
                    pose.theta
                );
            }
        }
    }

    let final_state = sim.robot_state();
    println!(
        "\nFinal wheel speeds: {:.2} rad/s (left), {:.2} rad/s (right)",
        final_state.wheels.left, final_state.wheels.right
    );
    println!("Simulated {:.2} s in total", sim.time());
    Ok(())
}
