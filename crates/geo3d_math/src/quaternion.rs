//! Unit quaternion for representing 3D rotations
//!
//! Quaternions here follow the same row-vector convention as [`Matrix`]:
//! `q.to_matrix()` is the matrix that rotates a row vector `v` as `v * M`.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::utils::{float_cmp, float_cmp_with, is_zero};
use crate::{MathError, MathResult, Matrix, Vector};

/// Rotation quaternion (x, y, z) * sin(θ/2) + w = cos(θ/2)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Create a quaternion rotating by `angle` radians around `axis`.
    ///
    /// The axis does not need to be unit length; it is normalized here and
    /// only a zero-length axis is rejected.
    pub fn from_axis(axis: Vector, angle: f64) -> MathResult<Self> {
        let axis = axis.normalize()?;
        let half = angle * 0.5;
        let (sin_h, cos_h) = half.sin_cos();
        Ok(Self::new(axis.x * sin_h, axis.y * sin_h, axis.z * sin_h, cos_h))
    }

    /// Extract the rotation held in the upper-left 3x3 block of `m`.
    ///
    /// The block must be a pure rotation (orthonormal rows). Uses the trace
    /// when it is positive, otherwise pivots on the largest diagonal element
    /// so the divisor never approaches zero.
    pub fn from_rotation_matrix(m: &Matrix) -> Self {
        let (m00, m01, m02) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
        let (m10, m11, m12) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
        let (m20, m21, m22) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

        let trace = m00 + m11 + m22;
        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((m12 - m21) / s, (m20 - m02) / s, (m01 - m10) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m12 - m21) / s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m20 - m02) / s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m01 - m10) / s)
        }
    }

    /// Rotation matrix equivalent to this quaternion
    pub fn to_matrix(&self) -> Matrix {
        Matrix::rotation_quaternion(*self)
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Normalize to unit length
    pub fn normalize(&self) -> MathResult<Self> {
        let len = self.length();
        if is_zero(len) {
            log::debug!("Refusing to normalize zero-length quaternion {:?}", self);
            return Err(MathError::ZeroLength);
        }
        Ok(Self::new(self.x / len, self.y / len, self.z / len, self.w / len))
    }

    /// Negate the vector part. For unit quaternions this is the inverse rotation.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiplicative inverse, valid for any non-zero quaternion
    pub fn inverse(&self) -> MathResult<Self> {
        let len_sq = self.length_squared();
        if is_zero(len_sq) {
            return Err(MathError::ZeroLength);
        }
        let c = self.conjugate();
        Ok(Self::new(c.x / len_sq, c.y / len_sq, c.z / len_sq, c.w / len_sq))
    }

    /// Rotation angle in radians, in `[0, 2π]`
    pub fn angle(&self) -> f64 {
        2.0 * self.w.clamp(-1.0, 1.0).acos()
    }

    /// Unit rotation axis. The identity rotation has no axis.
    pub fn axis(&self) -> MathResult<Vector> {
        Vector::xyz(self.x, self.y, self.z).normalize()
    }

    /// Spherical linear interpolation along the shortest arc
    pub fn slerp(&self, other: &Self, t: f64) -> Self {
        let mut cos_theta = self.dot(other);
        let mut end = *other;
        if cos_theta < 0.0 {
            cos_theta = -cos_theta;
            end = -end;
        }

        // Nearly parallel: sin(θ) underflows, fall back to lerp
        let (k0, k1) = if cos_theta > 1.0 - 1e-9 {
            (1.0 - t, t)
        } else {
            let theta = cos_theta.acos();
            let sin_theta = theta.sin();
            (
                ((1.0 - t) * theta).sin() / sin_theta,
                (t * theta).sin() / sin_theta,
            )
        };

        Self::new(
            self.x * k0 + end.x * k1,
            self.y * k0 + end.y * k1,
            self.z * k0 + end.z * k1,
            self.w * k0 + end.w * k1,
        )
    }

    /// Component-wise comparison with an explicit tolerance
    pub fn approx_eq_with(&self, other: &Self, epsilon: f64) -> bool {
        float_cmp_with(self.x, other.x, epsilon)
            && float_cmp_with(self.y, other.y, epsilon)
            && float_cmp_with(self.z, other.z, epsilon)
            && float_cmp_with(self.w, other.w, epsilon)
    }

    /// True if both quaternions produce the same rotation.
    ///
    /// `q` and `-q` rotate identically, so this accepts either sign where
    /// `==` compares components.
    pub fn same_rotation(&self, other: &Self) -> bool {
        *self == *other || *self == -*other
    }
}

impl PartialEq for Quaternion {
    fn eq(&self, other: &Self) -> bool {
        float_cmp(self.x, other.x)
            && float_cmp(self.y, other.y)
            && float_cmp(self.z, other.z)
            && float_cmp(self.w, other.w)
    }
}

/// Compose rotations: `a * b` applies `a` first, then `b`,
/// matching `a.to_matrix() * b.to_matrix()`.
impl std::ops::Mul for Quaternion {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        // Hamilton product rhs ⊗ self
        let (p, q) = (rhs, self);
        Self::new(
            p.w * q.x + p.x * q.w + p.y * q.z - p.z * q.y,
            p.w * q.y - p.x * q.z + p.y * q.w + p.z * q.x,
            p.w * q.z + p.x * q.y - p.y * q.x + p.z * q.w,
            p.w * q.w - p.x * q.x - p.y * q.y - p.z * q.z,
        )
    }
}

impl std::ops::Neg for Quaternion {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}
