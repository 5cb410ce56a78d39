//! Feeds a simulated IMU on a slowly rocking platform through the filter
//!
//! The platform rolls ±20° at 0.25 Hz while turning at a constant yaw rate.
//! The simulated accelerometer sees only gravity, so linear acceleration
//! should stay near zero once the filter has settled.
//!
//! Run with: `cargo run --example stationary`

use madgwick_imu::{FilterError, Madgwick, MadgwickSettings};
use nalgebra::{UnitQuaternion, Vector3};
use std::f64::consts::PI;

const SAMPLE_RATE: f64 = 100.0; // Hz
const DURATION: f64 = 10.0; // seconds
const ROLL_AMPLITUDE: f64 = 20.0 * PI / 180.0;
const ROLL_FREQUENCY: f64 = 0.25; // Hz
const YAW_RATE: f64 = 0.1; // rad/s
const GRAVITY: f64 = 9.81;

fn main() -> Result<(), FilterError> {
    let settings = MadgwickSettings {
        beta: 0.1,
        gravity: GRAVITY,
    };
    let mut filter = Madgwick::with_settings(SAMPLE_RATE, settings)?;

    let samples = (DURATION * SAMPLE_RATE) as usize;
    for n in 0..samples {
        let time = n as f64 / SAMPLE_RATE;
        let omega = 2.0 * PI * ROLL_FREQUENCY;

        // True attitude, and its body-frame rates and gravity reading
        let roll = ROLL_AMPLITUDE * (omega * time).sin();
        let roll_rate = ROLL_AMPLITUDE * omega * (omega * time).cos();
        let yaw = YAW_RATE * time;
        let truth = UnitQuaternion::from_euler_angles(roll, 0.0, yaw);

        let gyroscope = Vector3::new(roll_rate, YAW_RATE * roll.sin(), YAW_RATE * roll.cos());
        let accelerometer = truth.inverse() * Vector3::new(0.0, 0.0, GRAVITY);

        filter.update(gyroscope, accelerometer);

        if n % 50 == 0 {
            let angles = filter.euler_angles();
            let linear = filter.linear_acceleration();
            println!(
                "t={:5.2}s  roll {:7.2} (true {:7.2})  pitch {:6.2}  yaw {:7.2} (true {:7.2})  |a_lin| {:.4}",
                time,
                angles.roll,
                roll.to_degrees(),
                angles.pitch,
                angles.yaw,
                yaw.to_degrees(),
                linear.norm()
            );
        }
    }

    let world = filter.world_acceleration();
    println!(
        "final world acceleration: ({:.4}, {:.4}, {:.4}) m/s²",
        world.x, world.y, world.z
    );

    Ok(())
}
