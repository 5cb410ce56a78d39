//! Quaternion algebra and numeric helpers for the Madgwick filter

use nalgebra::{ComplexField, Quaternion, Vector3};

/// Degrees to radians, for callers converting angles back into the filter's units
pub const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
/// Radians to degrees, applied to every Euler angle the filter reports
pub const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Reciprocal square root, `1 / sqrt(x)`
///
/// Used for every normalization in the filter. The input is always a sum of
/// squares, so it is finite and non-negative by construction. `inv_sqrt(0.0)`
/// is `f64::INFINITY` (plain IEEE division by zero); callers that can reach a
/// zero input must check for it before normalizing.
///
/// # Example
/// ```
/// use madgwick_imu::math::inv_sqrt;
///
/// assert_eq!(inv_sqrt(4.0), 0.5);
/// assert!(inv_sqrt(0.0).is_infinite());
/// ```
#[inline]
pub fn inv_sqrt(x: f64) -> f64 {
    1.0 / ComplexField::sqrt(x)
}

/// Hamilton product `a ⊗ b`
///
/// Component order (w, x, y, z):
///
/// ```text
/// w = a.w*b.w - a.x*b.x - a.y*b.y - a.z*b.z
/// x = a.w*b.x + a.x*b.w + a.y*b.z - a.z*b.y
/// y = a.w*b.y - a.x*b.z + a.y*b.w + a.z*b.x
/// z = a.w*b.z + a.x*b.y - a.y*b.x + a.z*b.w
/// ```
///
/// Not commutative. This fixes the composition direction of every rotation
/// in the crate.
#[inline]
pub fn multiply(a: &Quaternion<f64>, b: &Quaternion<f64>) -> Quaternion<f64> {
    a * b
}

/// Quaternion conjugate (w, -x, -y, -z)
#[inline]
pub fn conjugate(q: &Quaternion<f64>) -> Quaternion<f64> {
    q.conjugate()
}

/// Rotate `v` by `q` with the sandwich product `q ⊗ (0, v) ⊗ q*`
///
/// The scalar part of the result is discarded. For a unit quaternion it is
/// zero up to rounding.
///
/// # Example
/// ```
/// use nalgebra::{Quaternion, Vector3};
/// use madgwick_imu::math::rotate_vector;
///
/// let identity = Quaternion::new(1.0, 0.0, 0.0, 0.0);
/// let v = Vector3::new(1.0, 2.0, 3.0);
/// assert_eq!(rotate_vector(&identity, v), v);
/// ```
pub fn rotate_vector(q: &Quaternion<f64>, v: Vector3<f64>) -> Vector3<f64> {
    let p = Quaternion::from_imag(v);
    multiply(&multiply(q, &p), &conjugate(q)).imag()
}

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// True when every component is exactly zero
    fn is_exact_zero(&self) -> bool;

    /// Scale to unit length with [`inv_sqrt`]
    ///
    /// Unlike nalgebra's `normalize`, a zero vector is not guarded and
    /// produces non-finite components.
    fn inv_sqrt_normalize(&self) -> Vector3<f64>;
}

impl Vector3Ext for Vector3<f64> {
    fn is_exact_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    fn inv_sqrt_normalize(&self) -> Vector3<f64> {
        *self * inv_sqrt(self.norm_squared())
    }
}

/// Extension trait for raw (not necessarily unit) quaternions
pub trait QuaternionExt {
    /// Scale to unit norm with [`inv_sqrt`]
    fn inv_sqrt_normalize(&self) -> Quaternion<f64>;

    /// True when all four components are exactly zero
    fn is_exact_zero(&self) -> bool;
}

impl QuaternionExt for Quaternion<f64> {
    fn inv_sqrt_normalize(&self) -> Quaternion<f64> {
        *self * inv_sqrt(self.norm_squared())
    }

    fn is_exact_zero(&self) -> bool {
        self.w == 0.0 && self.i == 0.0 && self.j == 0.0 && self.k == 0.0
    }
}
