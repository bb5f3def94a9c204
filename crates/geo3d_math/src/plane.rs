//! Plane `a*x + b*y + c*z + d = 0`

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::utils::{float_cmp, is_zero};
use crate::{MathError, MathResult, Vector};

/// Plane equation coefficients. (a, b, c) is the normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Plane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Plane {
    #[inline]
    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Plane through `point` with the given normal
    pub fn from_point_normal(point: Vector, normal: Vector) -> Self {
        Self::new(normal.x, normal.y, normal.z, -point.dot(normal))
    }

    /// Plane through three points, normal following the right-hand winding
    /// `(p2 - p1) x (p3 - p1)`. Collinear points have no plane.
    pub fn from_points(p1: Vector, p2: Vector, p3: Vector) -> MathResult<Self> {
        let normal = (p2 - p1).cross(p3 - p1).normalize()?;
        Ok(Self::from_point_normal(p1, normal))
    }

    #[inline]
    pub fn normal(&self) -> Vector {
        Vector::xyz(self.a, self.b, self.c)
    }

    /// Scale all coefficients so the normal has unit length
    pub fn normalize(&self) -> MathResult<Self> {
        let len = self.normal().length();
        if is_zero(len) {
            log::debug!("Refusing to normalize plane with zero normal {:?}", self);
            return Err(MathError::ZeroLength);
        }
        Ok(Self::new(self.a / len, self.b / len, self.c / len, self.d / len))
    }

    /// Four-component dot product with a homogeneous vector
    #[inline]
    pub fn dot(&self, v: Vector) -> f64 {
        self.a * v.x + self.b * v.y + self.c * v.z + self.d * v.w
    }

    /// Dot product treating `v` as a point (w = 1).
    /// For a normalized plane this is the signed distance.
    #[inline]
    pub fn dot_coord(&self, v: Vector) -> f64 {
        self.dot(v.one_w())
    }

    /// Dot product treating `v` as a direction (w = 0)
    #[inline]
    pub fn dot_normal(&self, v: Vector) -> f64 {
        self.dot(v.zero_w())
    }

    /// Where the line through `start` and `end` crosses the plane.
    /// `None` when the line is parallel to it.
    pub fn line_intersection(&self, start: Vector, end: Vector) -> Option<Vector> {
        let direction = (end - start).zero_w();
        let denom = self.dot_normal(direction);
        if is_zero(denom) {
            return None;
        }
        let t = -self.dot_coord(start) / denom;
        Some((start + direction * t).one_w())
    }
}

impl PartialEq for Plane {
    fn eq(&self, other: &Self) -> bool {
        float_cmp(self.a, other.a)
            && float_cmp(self.b, other.b)
            && float_cmp(self.c, other.c)
            && float_cmp(self.d, other.d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let p = Plane::from_points(
            Vector::xyz(0.0, 2.0, 0.0),
            Vector::xyz(0.0, 2.0, 1.0),
            Vector::xyz(1.0, 2.0, 0.0),
        )
        .unwrap();
        assert_eq!(p, Plane::new(0.0, 1.0, 0.0, -2.0));
    }

    #[test]
    fn test_from_collinear_points() {
        let result = Plane::from_points(Vector::ZERO, Vector::X, Vector::X * 2.0);
        assert_eq!(result, Err(MathError::ZeroLength));
    }

    #[test]
    fn test_normalize() {
        let p = Plane::new(0.0, 4.0, 0.0, 8.0).normalize().unwrap();
        assert_eq!(p, Plane::new(0.0, 1.0, 0.0, 2.0));
        assert!(Plane::new(0.0, 0.0, 0.0, 1.0).normalize().is_err());
    }

    #[test]
    fn test_dot_variants() {
        let p = Plane::new(0.0, 1.0, 0.0, 1.0);
        let v = Vector::new(3.0, 5.0, 7.0, 2.0);
        assert_eq!(p.dot(v), 7.0);
        assert_eq!(p.dot_coord(v), 6.0);
        assert_eq!(p.dot_normal(v), 5.0);
    }

    #[test]
    fn test_line_intersection() {
        let p = Plane::new(0.0, 1.0, 0.0, 0.0);
        let hit = p
            .line_intersection(Vector::xyz(1.0, 4.0, 1.0), Vector::xyz(1.0, -4.0, 3.0))
            .unwrap();
        assert_eq!(hit, Vector::new(1.0, 0.0, 2.0, 1.0));

        let parallel = p.line_intersection(Vector::xyz(0.0, 1.0, 0.0), Vector::xyz(5.0, 1.0, 0.0));
        assert!(parallel.is_none());
    }
}
