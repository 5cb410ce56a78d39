//! Configuration and value types for the Madgwick filter

/// Default gradient-descent gain β
pub const DEFAULT_BETA: f64 = 0.1;

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Madgwick filter settings
///
/// Per-instance tuning of the filter. The defaults reproduce the classic
/// fixed constants (β = 0.1, g = 9.81 m/s²).
///
/// # Example
/// ```
/// use madgwick_imu::{Madgwick, MadgwickSettings};
///
/// let settings = MadgwickSettings {
///     beta: 0.033,        // Trust the gyroscope more
///     ..Default::default()
/// };
/// let filter = Madgwick::with_settings(200.0, settings).unwrap();
/// assert_eq!(filter.settings().beta, 0.033);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MadgwickSettings {
    /// Filter gain β applied to the normalized gradient step
    ///
    /// Larger values pull the estimate toward the measured gravity direction
    /// faster but let accelerometer noise and linear acceleration leak into
    /// the orientation. Must be finite and non-negative; zero disables the
    /// correction entirely.
    pub beta: f64,
    /// Gravity magnitude in accelerometer units
    ///
    /// Only used by the acceleration projections. Set to 1.0 when the
    /// accelerometer reports in g.
    pub gravity: f64,
}

impl Default for MadgwickSettings {
    fn default() -> Self {
        Self {
            beta: DEFAULT_BETA,
            gravity: STANDARD_GRAVITY,
        }
    }
}

/// Orientation as Euler angles in degrees
///
/// Aerospace sequence: yaw about Z, then pitch about Y, then roll about X.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EulerAngles {
    /// Rotation about the body X axis, (-180, 180]
    pub roll: f64,
    /// Rotation about the body Y axis, [-90, 90]
    pub pitch: f64,
    /// Rotation about the body Z axis, (-180, 180]
    pub yaw: f64,
}

/// Madgwick filter flags
///
/// Status of the most recent update.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use madgwick_imu::Madgwick;
///
/// let mut filter = Madgwick::new(100.0).unwrap();
/// filter.update(Vector3::new(0.0, 0.0, 0.1), Vector3::zeros());
///
/// if filter.flags().accelerometer_ignored {
///     println!("Gyroscope-only integration this sample");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MadgwickFlags {
    /// Whether the last update skipped the accelerometer correction
    ///
    /// True when the accelerometer sample was exactly zero, or when the
    /// estimate already matched the measured gravity direction exactly so
    /// there was no gradient to follow.
    pub accelerometer_ignored: bool,
}
