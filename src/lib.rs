#![no_std]

//! Madgwick IMU - gradient-descent orientation filter for gyroscope and accelerometer data
//!
//! Estimates the orientation of a rigid body as a unit quaternion. Each sample
//! the gyroscope rate is integrated and the estimate is pulled toward the
//! measured gravity direction by a single closed-form gradient-descent step
//! of fixed size β. Euler angles, gravity-free body acceleration and
//! reference-frame acceleration are read-only projections of that state.
//!
//! # Features
//!
//! - Fixed-size state, constant-time update, no allocation
//! - Per-instance configuration (sample rate, β, gravity magnitude)
//! - Gyroscope-only fallback for an exact zero accelerometer sample
//! - `#![no_std]` compatible for embedded systems
//! - Optional `defmt` formatting of the public value types
//!
//! Magnetometer fusion is not provided, so yaw drifts with gyroscope bias.
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use madgwick_imu::Madgwick;
//!
//! let mut filter = Madgwick::new(100.0).unwrap(); // 100 Hz
//!
//! // Sensor readings
//! let gyroscope = Vector3::new(0.01, -0.02, 0.05);    // rad/s
//! let accelerometer = Vector3::new(0.1, 0.2, 9.8);    // m/s²
//!
//! // Update once per sample period
//! filter.update(gyroscope, accelerometer);
//!
//! // Orientation in degrees
//! let angles = filter.euler_angles();
//! println!("roll {:.2} pitch {:.2} yaw {:.2}", angles.roll, angles.pitch, angles.yaw);
//!
//! // Acceleration with gravity removed, body and reference frames
//! let body = filter.linear_acceleration();
//! let world = filter.world_acceleration();
//! ```

mod error;
mod madgwick;
pub mod math;
mod types;

pub use error::FilterError;
pub use madgwick::Madgwick;
pub use math::{DEG_TO_RAD, QuaternionExt, RAD_TO_DEG, Vector3Ext};
pub use types::*;
