//! Madgwick IMU filter implementation

use crate::error::FilterError;
use crate::math::{QuaternionExt, RAD_TO_DEG, Vector3Ext, inv_sqrt, rotate_vector};
use crate::types::{EulerAngles, MadgwickFlags, MadgwickSettings};
use nalgebra::{ComplexField, Quaternion, RealField, UnitQuaternion, Vector3};

/// Madgwick orientation filter (gyroscope + accelerometer)
///
/// Integrates the gyroscope rate into a unit quaternion and, every sample,
/// pulls the estimate toward the measured gravity direction with a single
/// normalized gradient-descent step of size β.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use madgwick_imu::Madgwick;
///
/// let mut filter = Madgwick::new(100.0)?;
///
/// let gyroscope = Vector3::new(0.0, 0.0, 0.1);      // rad/s
/// let accelerometer = Vector3::new(0.0, 0.0, 9.81); // m/s²
/// filter.update(gyroscope, accelerometer);
///
/// let angles = filter.euler_angles();
/// assert!(angles.yaw > 0.0);
/// # Ok::<(), madgwick_imu::FilterError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Madgwick {
    /// Filter settings
    settings: MadgwickSettings,
    /// Sample rate in Hz
    sample_rate: f64,
    /// Integration time step, 1 / sample_rate
    sample_period: f64,
    /// Current orientation, body to reference frame (unit norm between updates)
    quaternion: Quaternion<f64>,
    /// Last accelerometer reading for the acceleration projections
    accelerometer: Vector3<f64>,
    /// Whether the last update skipped the gradient step
    accelerometer_ignored: bool,
}

impl Madgwick {
    /// Create a filter running at `sample_rate` Hz with default settings
    pub fn new(sample_rate: f64) -> Result<Self, FilterError> {
        Self::with_settings(sample_rate, MadgwickSettings::default())
    }

    /// Create a filter running at `sample_rate` Hz with the given settings
    ///
    /// The orientation starts at identity. The sample period is derived once
    /// here; there is no way to change the rate of an existing filter.
    ///
    /// # Errors
    /// Returns [`FilterError`] when the sample rate is not finite and
    /// positive, β is not finite and non-negative, or gravity is not finite
    /// and positive.
    pub fn with_settings(sample_rate: f64, settings: MadgwickSettings) -> Result<Self, FilterError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(FilterError::InvalidSampleRate(sample_rate));
        }
        if !settings.beta.is_finite() || settings.beta < 0.0 {
            return Err(FilterError::InvalidGain(settings.beta));
        }
        if !settings.gravity.is_finite() || settings.gravity <= 0.0 {
            return Err(FilterError::InvalidGravity(settings.gravity));
        }

        log::debug!(
            "madgwick filter at {} Hz, beta {}, gravity {}",
            sample_rate,
            settings.beta,
            settings.gravity
        );

        Ok(Madgwick {
            settings,
            sample_rate,
            sample_period: 1.0 / sample_rate,
            quaternion: Quaternion::identity(),
            accelerometer: Vector3::zeros(),
            accelerometer_ignored: false,
        })
    }

    /// Reset orientation to identity, keeping sample rate and settings
    pub fn reset(&mut self) {
        self.quaternion = Quaternion::identity();
        self.accelerometer = Vector3::zeros();
        self.accelerometer_ignored = false;
    }

    /// Update the orientation with one gyroscope and accelerometer sample
    ///
    /// Call exactly once per sample period, in order.
    ///
    /// # Arguments
    /// * `gyroscope` - Angular rate in rad/s
    /// * `accelerometer` - Specific force in any consistent unit. An exact
    ///   zero vector skips the correction and integrates the gyroscope only.
    pub fn update(&mut self, gyroscope: Vector3<f64>, accelerometer: Vector3<f64>) {
        self.accelerometer = accelerometer;

        // Rate of change of quaternion from gyroscope: 0.5 * q ⊗ (0, ω)
        let mut q_dot = self.quaternion * Quaternion::from_imag(gyroscope) * 0.5;

        self.accelerometer_ignored = match self.gradient_step(accelerometer) {
            Some(step) => {
                q_dot -= step * self.settings.beta;
                false
            }
            None => {
                log::trace!("accelerometer correction skipped, integrating gyroscope only");
                true
            }
        };

        // Forward Euler, then renormalize against drift
        let integrated = self.quaternion + q_dot * self.sample_period;
        self.quaternion = integrated.inv_sqrt_normalize();
    }

    /// Normalized gradient of the gravity alignment error
    ///
    /// Closed-form gradient of `f(q) = q* ⊗ (0, 0, 0, 1) ⊗ q - â`. Returns
    /// `None` when there is nothing to correct: the accelerometer reading is
    /// exactly zero, or the gradient itself is exactly zero.
    fn gradient_step(&self, accelerometer: Vector3<f64>) -> Option<Quaternion<f64>> {
        if accelerometer.is_exact_zero() {
            return None;
        }

        let a = accelerometer.inv_sqrt_normalize();
        let (q0, q1, q2, q3) = self.components();

        let two_q0 = 2.0 * q0;
        let two_q1 = 2.0 * q1;
        let two_q2 = 2.0 * q2;
        let two_q3 = 2.0 * q3;
        let four_q0 = 4.0 * q0;
        let four_q1 = 4.0 * q1;
        let four_q2 = 4.0 * q2;
        let eight_q1 = 8.0 * q1;
        let eight_q2 = 8.0 * q2;
        let q0q0 = q0 * q0;
        let q1q1 = q1 * q1;
        let q2q2 = q2 * q2;
        let q3q3 = q3 * q3;

        let s0 = four_q0 * q2q2 + two_q2 * a.x + four_q0 * q1q1 - two_q1 * a.y;
        let s1 = four_q1 * q3q3 - two_q3 * a.x + 4.0 * q0q0 * q1 - two_q0 * a.y - four_q1
            + eight_q1 * q1q1
            + eight_q1 * q2q2
            + four_q1 * a.z;
        let s2 = 4.0 * q0q0 * q2 + two_q0 * a.x + four_q2 * q3q3 - two_q3 * a.y - four_q2
            + eight_q2 * q1q1
            + eight_q2 * q2q2
            + four_q2 * a.z;
        let s3 = 4.0 * q1q1 * q3 - two_q1 * a.x + 4.0 * q2q2 * q3 - two_q2 * a.y;

        let gradient = Quaternion::new(s0, s1, s2, s3);

        // Already at the minimum; normalizing would divide by zero
        if gradient.is_exact_zero() {
            return None;
        }

        Some(gradient * inv_sqrt(gradient.norm_squared()))
    }

    /// Get current orientation quaternion
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::new_unchecked(self.quaternion)
    }

    /// Set orientation quaternion directly
    pub fn set_quaternion(&mut self, quaternion: UnitQuaternion<f64>) {
        self.quaternion = quaternion.into_inner();
    }

    /// Get filter settings
    pub fn settings(&self) -> MadgwickSettings {
        self.settings
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Integration time step in seconds
    pub fn sample_period(&self) -> f64 {
        self.sample_period
    }

    /// Get status of the most recent update
    pub fn flags(&self) -> MadgwickFlags {
        MadgwickFlags {
            accelerometer_ignored: self.accelerometer_ignored,
        }
    }

    /// Roll in degrees
    pub fn roll(&self) -> f64 {
        let (q0, q1, q2, q3) = self.components();
        RealField::atan2(q0 * q1 + q2 * q3, 0.5 - q1 * q1 - q2 * q2) * RAD_TO_DEG
    }

    /// Pitch in degrees
    ///
    /// The `asin` argument is clamped to [-1, 1] so normalization drift near
    /// ±90° cannot produce NaN.
    pub fn pitch(&self) -> f64 {
        let (q0, q1, q2, q3) = self.components();
        let sine = 2.0 * (q0 * q2 - q1 * q3);
        ComplexField::asin(sine.clamp(-1.0, 1.0)) * RAD_TO_DEG
    }

    /// Yaw in degrees
    pub fn yaw(&self) -> f64 {
        let (q0, q1, q2, q3) = self.components();
        RealField::atan2(q1 * q2 + q0 * q3, 0.5 - q2 * q2 - q3 * q3) * RAD_TO_DEG
    }

    /// Roll, pitch and yaw in degrees
    pub fn euler_angles(&self) -> EulerAngles {
        EulerAngles {
            roll: self.roll(),
            pitch: self.pitch(),
            yaw: self.yaw(),
        }
    }

    /// Gravity in the body frame, scaled by the configured magnitude
    ///
    /// Third row of the rotation matrix, computed directly from q.
    pub fn gravity(&self) -> Vector3<f64> {
        let (q0, q1, q2, q3) = self.components();
        Vector3::new(
            2.0 * q1 * q3 - 2.0 * q0 * q2,
            2.0 * q2 * q3 + 2.0 * q0 * q1,
            q0 * q0 - q1 * q1 - q2 * q2 + q3 * q3,
        ) * self.settings.gravity
    }

    /// Remove the gravity component from an accelerometer reading
    pub fn remove_gravity(&self, accelerometer: Vector3<f64>) -> Vector3<f64> {
        accelerometer - self.gravity()
    }

    /// Get linear acceleration (last accelerometer reading minus gravity), body frame
    pub fn linear_acceleration(&self) -> Vector3<f64> {
        self.remove_gravity(self.accelerometer)
    }

    /// Rotate a body-frame vector into the reference frame
    pub fn rotate_to_world(&self, vector: Vector3<f64>) -> Vector3<f64> {
        rotate_vector(&self.quaternion, vector)
    }

    /// Get linear acceleration in the reference frame
    pub fn world_acceleration(&self) -> Vector3<f64> {
        self.rotate_to_world(self.linear_acceleration())
    }

    fn components(&self) -> (f64, f64, f64, f64) {
        let q = &self.quaternion;
        (q.w, q.i, q.j, q.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE_RATE: f64 = 100.0;

    #[test]
    fn test_new_filter() {
        let filter = Madgwick::new(SAMPLE_RATE).unwrap();
        assert_eq!(filter.quaternion(), UnitQuaternion::identity());
        assert_eq!(filter.sample_period(), 0.01);
        assert_eq!(filter.settings(), MadgwickSettings::default());
        assert!(!filter.flags().accelerometer_ignored);
    }

    #[test]
    fn test_invalid_configuration() {
        assert_eq!(Madgwick::new(0.0).unwrap_err(), FilterError::InvalidSampleRate(0.0));
        assert_eq!(Madgwick::new(-50.0).unwrap_err(), FilterError::InvalidSampleRate(-50.0));
        assert!(matches!(
            Madgwick::new(f64::NAN),
            Err(FilterError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            Madgwick::new(f64::INFINITY),
            Err(FilterError::InvalidSampleRate(_))
        ));

        let negative_gain = MadgwickSettings {
            beta: -0.1,
            ..Default::default()
        };
        assert_eq!(
            Madgwick::with_settings(SAMPLE_RATE, negative_gain).unwrap_err(),
            FilterError::InvalidGain(-0.1)
        );

        let no_gravity = MadgwickSettings {
            gravity: 0.0,
            ..Default::default()
        };
        assert_eq!(
            Madgwick::with_settings(SAMPLE_RATE, no_gravity).unwrap_err(),
            FilterError::InvalidGravity(0.0)
        );
    }

    #[test]
    fn test_zero_gain_is_allowed() {
        let settings = MadgwickSettings {
            beta: 0.0,
            ..Default::default()
        };
        assert!(Madgwick::with_settings(SAMPLE_RATE, settings).is_ok());
    }

    #[test]
    fn test_zero_accelerometer_integrates_gyroscope_only() {
        let mut filter = Madgwick::new(SAMPLE_RATE).unwrap();
        let half = 0.2f64;
        let start = UnitQuaternion::from_quaternion(Quaternion::new(half.cos(), half.sin(), 0.0, 0.0));
        filter.set_quaternion(start);

        let (gx, gy, gz) = (0.3, -0.2, 0.5);
        filter.update(Vector3::new(gx, gy, gz), Vector3::zeros());

        // Hand-expanded q += 0.5 * q ⊗ (0, ω) * dt, then normalize
        let q = start.into_inner();
        let dt = 1.0 / SAMPLE_RATE;
        let w = q.w + 0.5 * (-q.i * gx - q.j * gy - q.k * gz) * dt;
        let x = q.i + 0.5 * (q.w * gx + q.j * gz - q.k * gy) * dt;
        let y = q.j + 0.5 * (q.w * gy - q.i * gz + q.k * gx) * dt;
        let z = q.k + 0.5 * (q.w * gz + q.i * gy - q.j * gx) * dt;
        let expected = Quaternion::new(w, x, y, z).normalize();

        assert_relative_eq!(filter.quaternion().into_inner(), expected, epsilon = 1e-12);
        assert!(filter.flags().accelerometer_ignored);
    }

    #[test]
    fn test_perfect_gravity_has_no_gradient() {
        let mut filter = Madgwick::new(SAMPLE_RATE).unwrap();
        filter.update(Vector3::zeros(), Vector3::new(0.0, 0.0, 9.81));

        // Stays exactly at identity instead of dividing by a zero gradient
        assert_eq!(filter.quaternion(), UnitQuaternion::identity());
        assert!(filter.flags().accelerometer_ignored);
    }

    #[test]
    fn test_correction_clears_ignored_flag() {
        let mut filter = Madgwick::new(SAMPLE_RATE).unwrap();
        filter.update(Vector3::zeros(), Vector3::zeros());
        assert!(filter.flags().accelerometer_ignored);

        filter.update(Vector3::zeros(), Vector3::new(1.0, 0.0, 9.81));
        assert!(!filter.flags().accelerometer_ignored);
    }

    #[test]
    fn test_correction_step_size_is_beta() {
        // From identity the gyroscope contributes nothing, so the step is β·dt
        let mut filter = Madgwick::new(SAMPLE_RATE).unwrap();
        filter.update(Vector3::zeros(), Vector3::new(0.0, 9.81, 0.0));

        let q = filter.quaternion();
        let moved = (q.into_inner() - Quaternion::identity()).norm();
        assert_relative_eq!(moved, 0.1 / SAMPLE_RATE, epsilon = 1e-5);
    }

    #[test]
    fn test_euler_angles_at_identity() {
        let filter = Madgwick::new(SAMPLE_RATE).unwrap();
        assert_eq!(filter.euler_angles(), EulerAngles::default());
    }

    #[test]
    fn test_euler_angles_from_known_rotation() {
        let mut filter = Madgwick::new(SAMPLE_RATE).unwrap();
        let q = UnitQuaternion::from_euler_angles(
            10.0f64.to_radians(),
            -20.0f64.to_radians(),
            30.0f64.to_radians(),
        );
        filter.set_quaternion(q);

        let angles = filter.euler_angles();
        assert_relative_eq!(angles.roll, 10.0, epsilon = 1e-9);
        assert_relative_eq!(angles.pitch, -20.0, epsilon = 1e-9);
        assert_relative_eq!(angles.yaw, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pitch_clamps_drift_past_vertical() {
        let mut filter = Madgwick::new(SAMPLE_RATE).unwrap();
        // Slightly over-long quaternion at +90° pitch: asin argument > 1
        let h = core::f64::consts::FRAC_1_SQRT_2 * (1.0 + 1e-9);
        filter.quaternion = Quaternion::new(h, 0.0, h, 0.0);

        assert_eq!(filter.pitch(), 90.0);
    }

    #[test]
    fn test_gravity_calculation() {
        let filter = Madgwick::new(SAMPLE_RATE).unwrap();
        assert_eq!(filter.gravity(), Vector3::new(0.0, 0.0, 9.81));

        let settings = MadgwickSettings {
            gravity: 1.0,
            ..Default::default()
        };
        let filter = Madgwick::with_settings(SAMPLE_RATE, settings).unwrap();
        assert_eq!(filter.gravity(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_linear_acceleration_uses_last_sample() {
        let mut filter = Madgwick::new(SAMPLE_RATE).unwrap();
        let accelerometer = Vector3::new(1.0, -2.0, 9.81 + 0.5);
        filter.update(Vector3::zeros(), accelerometer);

        assert_eq!(filter.linear_acceleration(), filter.remove_gravity(accelerometer));
    }

    #[test]
    fn test_world_acceleration_at_identity() {
        let mut filter = Madgwick::new(SAMPLE_RATE).unwrap();
        filter.update(Vector3::zeros(), Vector3::zeros());

        // Zero accelerometer keeps q at identity; rotation is then a no-op
        assert_eq!(filter.quaternion(), UnitQuaternion::identity());
        assert_eq!(filter.world_acceleration(), filter.linear_acceleration());
        assert_eq!(filter.linear_acceleration(), Vector3::new(0.0, 0.0, -9.81));
    }

    #[test]
    fn test_rotate_to_world_matches_nalgebra() {
        let mut filter = Madgwick::new(SAMPLE_RATE).unwrap();
        let q = UnitQuaternion::from_euler_angles(0.4, -0.3, 1.2);
        filter.set_quaternion(q);

        let v = Vector3::new(0.5, -1.5, 2.0);
        assert_relative_eq!(filter.rotate_to_world(v), q * v, epsilon = 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut filter = Madgwick::new(SAMPLE_RATE).unwrap();
        for _ in 0..50 {
            filter.update(Vector3::new(0.5, 0.2, -0.1), Vector3::new(1.0, 2.0, 9.0));
        }
        assert_ne!(filter.quaternion(), UnitQuaternion::identity());

        filter.reset();
        assert_eq!(filter.quaternion(), UnitQuaternion::identity());
        assert_eq!(filter.linear_acceleration(), Vector3::new(0.0, 0.0, -9.81));
        assert_eq!(filter.sample_rate(), SAMPLE_RATE);
    }
}
