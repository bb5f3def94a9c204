//! Homogeneous 3D vector type

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::utils::{float_cmp, float_cmp_with, is_zero};
use crate::{MathError, MathResult};

/// Homogeneous vector with x, y, z, w components
///
/// Geometric operations (dot, cross, length) only look at x, y and z.
/// The w component is 1 for points and 0 for directions.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };
    pub const X: Self = Self { x: 1.0, y: 0.0, z: 0.0, w: 0.0 };
    pub const Y: Self = Self { x: 0.0, y: 1.0, z: 0.0, w: 0.0 };
    pub const Z: Self = Self { x: 0.0, y: 0.0, z: 1.0, w: 0.0 };

    /// Create a new Vector
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Create a Vector from three components, with w = 0
    #[inline]
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 0.0 }
    }

    /// Create a Vector from up to four leading components.
    ///
    /// Missing trailing components are 0; anything past the fourth is ignored.
    pub fn from_slice(components: &[f64]) -> Self {
        let mut c = [0.0; 4];
        for (dst, src) in c.iter_mut().zip(components) {
            *dst = *src;
        }
        Self::from(c)
    }

    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Dot product of the xyz parts
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product of the xyz parts; the result has w = 0
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self::xyz(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Length of the xyz part (w excluded)
    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Scale the xyz part to unit length, keeping w.
    ///
    /// Fails with [`MathError::ZeroLength`] when the length is zero within
    /// tolerance.
    pub fn normalize(self) -> MathResult<Self> {
        let len = self.length();
        if is_zero(len) {
            log::debug!("Refusing to normalize zero-length vector {:?}", self);
            return Err(MathError::ZeroLength);
        }
        Ok(Self::new(self.x / len, self.y / len, self.z / len, self.w))
    }

    /// Copy with w forced to 1, turning a 3D point into a homogeneous one
    #[inline]
    pub fn one_w(self) -> Self {
        Self { w: 1.0, ..self }
    }

    /// Copy with w forced to 0, turning the vector into a direction
    #[inline]
    pub fn zero_w(self) -> Self {
        Self { w: 0.0, ..self }
    }

    /// Linear interpolation between two vectors
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self * (1.0 - t) + other * t
    }

    /// Component-wise comparison with an explicit tolerance
    pub fn approx_eq_with(&self, other: &Self, epsilon: f64) -> bool {
        float_cmp_with(self.x, other.x, epsilon)
            && float_cmp_with(self.y, other.y, epsilon)
            && float_cmp_with(self.z, other.z, epsilon)
            && float_cmp_with(self.w, other.w, epsilon)
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        float_cmp(self.x, other.x)
            && float_cmp(self.y, other.y)
            && float_cmp(self.z, other.z)
            && float_cmp(self.w, other.w)
    }
}

impl From<[f64; 3]> for Vector {
    fn from(c: [f64; 3]) -> Self {
        Self::xyz(c[0], c[1], c[2])
    }
}

impl From<[f64; 4]> for Vector {
    fn from(c: [f64; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

// Operator overloads

impl std::ops::Add for Vector {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl std::ops::AddAssign for Vector {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl std::ops::Sub for Vector {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }
}

impl std::ops::SubAssign for Vector {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl std::ops::Mul<f64> for Vector {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self::new(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
            self.w * scalar,
        )
    }
}

impl std::ops::MulAssign<f64> for Vector {
    #[inline]
    fn mul_assign(&mut self, scalar: f64) {
        *self = *self * scalar;
    }
}

impl std::ops::Div<f64> for Vector {
    type Output = Self;
    #[inline]
    fn div(self, scalar: f64) -> Self {
        Self::new(
            self.x / scalar,
            self.y / scalar,
            self.z / scalar,
            self.w / scalar,
        )
    }
}

impl std::ops::Neg for Vector {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let v = Vector::default();
        assert_eq!(v.to_array(), [0.0; 4]);
    }

    #[test]
    fn test_from_slice_pads_with_zero() {
        let v = Vector::from_slice(&[1.0, 2.0]);
        assert_eq!(v.to_array(), [1.0, 2.0, 0.0, 0.0]);

        let v = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_dot_ignores_w() {
        let a = Vector::new(1.0, 2.0, 3.0, 100.0);
        let b = Vector::new(4.0, 5.0, 6.0, 100.0);
        // 4 + 10 + 18
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_cross() {
        assert_eq!(Vector::X.cross(Vector::Y), Vector::Z);
        assert_eq!(Vector::Y.cross(Vector::X), -Vector::Z);

        let a = Vector::xyz(1.0, 2.0, 3.0);
        let b = Vector::xyz(4.0, 5.0, 6.0);
        assert_eq!(a.cross(b), Vector::xyz(-3.0, 6.0, -3.0));
    }

    #[test]
    fn test_length_ignores_w() {
        let v = Vector::new(3.0, 4.0, 0.0, 12.0);
        assert_eq!(v.length(), 5.0);
    }

    #[test]
    fn test_normalize() {
        let n = Vector::new(0.0, 3.0, 4.0, 1.0).normalize().unwrap();
        assert_eq!(n, Vector::new(0.0, 0.6, 0.8, 1.0));
        assert!(float_cmp(n.length(), 1.0));
    }

    #[test]
    fn test_normalize_zero_length() {
        assert_eq!(Vector::ZERO.normalize(), Err(MathError::ZeroLength));
        assert_eq!(
            Vector::new(0.0, 0.0, 0.0, 1.0).normalize(),
            Err(MathError::ZeroLength)
        );
    }

    #[test]
    fn test_one_w_and_zero_w() {
        let v = Vector::new(1.0, 2.0, 3.0, 7.0);
        assert_eq!(v.one_w(), Vector::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(v.zero_w(), Vector::xyz(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Vector::new(1.0, 2.0, 3.0, 4.0);
        let b = Vector::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(a + b, Vector::new(6.0, 8.0, 10.0, 12.0));
        assert_eq!(b - a, Vector::new(4.0, 4.0, 4.0, 4.0));
        assert_eq!(a * 2.0, Vector::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(b / 2.0, Vector::new(2.5, 3.0, 3.5, 4.0));

        let mut c = a;
        c += b;
        c -= a;
        c *= 0.5;
        assert_eq!(c, b * 0.5);
    }

    #[test]
    fn test_tolerant_equality() {
        let a = Vector::xyz(1.0, 2.0, 3.0);
        assert_eq!(a, Vector::xyz(1.000001, 2.0, 3.0));
        assert_ne!(a, Vector::xyz(1.001, 2.0, 3.0));
        assert!(a.approx_eq_with(&Vector::xyz(1.001, 2.0, 3.0), 0.01));
    }

    #[test]
    fn test_lerp() {
        let a = Vector::ZERO;
        let b = Vector::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(a.lerp(b, 0.5), Vector::new(5.0, 5.0, 5.0, 5.0));
    }
}
