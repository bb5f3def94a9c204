//! 4x4 transformation matrix
//!
//! Vectors are row vectors multiplied on the left (`v' = v * M`), so a
//! translation lives in row 3 and transforms compose left to right:
//! `a * b` applies `a` first, then `b`. Swapping the order silently
//! transposes every transform.
//!
//! Projection and view constructors come in right-handed (`_rh`) and
//! left-handed (`_lh`) variants; handedness is never a runtime flag.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::utils::{float_cmp, float_cmp_with, EPSILON};
use crate::{MathError, MathResult, Plane, Quaternion, Vector};

/// 4x4 matrix addressed as `(row, column)`.
///
/// `Matrix::default()` is all zeros, not the identity.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix {
    m: [[f64; 4]; 4],
}

impl Matrix {
    pub const ZERO: Self = Self { m: [[0.0; 4]; 4] };

    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create a matrix from 16 values in row-major order
    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub const fn new(
        m00: f64, m01: f64, m02: f64, m03: f64,
        m10: f64, m11: f64, m12: f64, m13: f64,
        m20: f64, m21: f64, m22: f64, m23: f64,
        m30: f64, m31: f64, m32: f64, m33: f64,
    ) -> Self {
        Self {
            m: [
                [m00, m01, m02, m03],
                [m10, m11, m12, m13],
                [m20, m21, m22, m23],
                [m30, m31, m32, m33],
            ],
        }
    }

    #[inline]
    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self { m: rows }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub fn rows(&self) -> [[f64; 4]; 4] {
        self.m
    }

    /// All 16 elements in row-major order
    pub fn to_array(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for (i, row) in self.m.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(row);
        }
        out
    }

    /// Checked element access
    pub fn get(&self, row: usize, col: usize) -> MathResult<f64> {
        self.m
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .ok_or(MathError::IndexOutOfRange { row, col })
    }

    /// Checked element mutation
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> MathResult<()> {
        let slot = self
            .m
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(MathError::IndexOutOfRange { row, col })?;
        *slot = value;
        Ok(())
    }

    /// Row `i` as a vector
    ///
    /// # Panics
    /// If `i > 3`
    #[inline]
    pub fn row(&self, i: usize) -> Vector {
        Vector::from(self.m[i])
    }

    /// Column `j` as a vector
    ///
    /// # Panics
    /// If `j > 3`
    #[inline]
    pub fn column(&self, j: usize) -> Vector {
        Vector::new(self.m[0][j], self.m[1][j], self.m[2][j], self.m[3][j])
    }

    pub fn transpose(&self) -> Self {
        let mut result = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result.m[j][i] = self.m[i][j];
            }
        }
        result
    }

    /// Transform a row vector: `v' = v * M`
    pub fn transform(&self, v: Vector) -> Vector {
        let v = v.to_array();
        let mut out = [0.0; 4];
        for (j, o) in out.iter_mut().enumerate() {
            *o = (0..4).map(|k| v[k] * self.m[k][j]).sum();
        }
        Vector::from(out)
    }

    /// Element-wise comparison with an explicit tolerance
    pub fn approx_eq_with(&self, other: &Self, epsilon: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| float_cmp_with(*a, *b, epsilon))
    }

    pub fn is_identity(&self) -> bool {
        self.is_identity_with(EPSILON)
    }

    /// [`Matrix::is_identity`] with an explicit tolerance
    pub fn is_identity_with(&self, epsilon: f64) -> bool {
        self.approx_eq_with(&Self::IDENTITY, epsilon)
    }

    /// True if the upper-left 3x3 block is orthonormal and the last row
    /// and column are those of the identity.
    pub fn is_rotation_transform(&self) -> bool {
        self.is_rotation_transform_with(EPSILON)
    }

    /// [`Matrix::is_rotation_transform`] with an explicit tolerance
    pub fn is_rotation_transform_with(&self, epsilon: f64) -> bool {
        let near = |a: f64, b: f64| float_cmp_with(a, b, epsilon);
        for i in 0..3 {
            if !near(self.m[i][3], 0.0) || !near(self.m[3][i], 0.0) {
                return false;
            }
        }
        if !near(self.m[3][3], 1.0) {
            return false;
        }

        let rows = [self.row(0), self.row(1), self.row(2)];
        for (i, a) in rows.iter().enumerate() {
            if !near(a.length_squared(), 1.0) {
                return false;
            }
            if rows[i + 1..].iter().any(|b| !near(a.dot(*b), 0.0)) {
                return false;
            }
        }
        true
    }

    // 2x2 sub-determinants of the top two rows (s) and bottom two rows (c).
    // Shared by the determinant and the adjugate.
    fn sub_factors(&self) -> ([f64; 6], [f64; 6]) {
        let a = &self.m;
        let s = [
            a[0][0] * a[1][1] - a[1][0] * a[0][1],
            a[0][0] * a[1][2] - a[1][0] * a[0][2],
            a[0][0] * a[1][3] - a[1][0] * a[0][3],
            a[0][1] * a[1][2] - a[1][1] * a[0][2],
            a[0][1] * a[1][3] - a[1][1] * a[0][3],
            a[0][2] * a[1][3] - a[1][2] * a[0][3],
        ];
        let c = [
            a[2][0] * a[3][1] - a[3][0] * a[2][1],
            a[2][0] * a[3][2] - a[3][0] * a[2][2],
            a[2][0] * a[3][3] - a[3][0] * a[2][3],
            a[2][1] * a[3][2] - a[3][1] * a[2][2],
            a[2][1] * a[3][3] - a[3][1] * a[2][3],
            a[2][2] * a[3][3] - a[3][2] * a[2][3],
        ];
        (s, c)
    }

    fn determinant_from(s: &[f64; 6], c: &[f64; 6]) -> f64 {
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// Determinant by Laplace expansion over the top two rows
    pub fn determinant(&self) -> f64 {
        let (s, c) = self.sub_factors();
        Self::determinant_from(&s, &c)
    }

    /// Inverse via the adjugate divided by the determinant.
    ///
    /// Fails with [`MathError::SingularMatrix`] when the determinant is zero
    /// within [`EPSILON`]. The test is absolute, not relative to the matrix
    /// scale: `scaling(0.01, 0.01, 0.01)` has determinant 1e-6 and is
    /// rejected although it is well conditioned. Use
    /// [`Matrix::inverse_with`] with a smaller tolerance for such scenes.
    pub fn inverse(&self) -> MathResult<Self> {
        self.inverse_with(EPSILON)
    }

    /// [`Matrix::inverse`] treating `|det| <= epsilon` as singular
    pub fn inverse_with(&self, epsilon: f64) -> MathResult<Self> {
        let (s, c) = self.sub_factors();
        let det = Self::determinant_from(&s, &c);
        if float_cmp_with(det, 0.0, epsilon) {
            log::debug!("Matrix is singular (determinant {}), no inverse", det);
            return Err(MathError::SingularMatrix { determinant: det });
        }

        let a = &self.m;
        let inv = 1.0 / det;
        let adj = [
            [
                a[1][1] * c[5] - a[1][2] * c[4] + a[1][3] * c[3],
                -a[0][1] * c[5] + a[0][2] * c[4] - a[0][3] * c[3],
                a[3][1] * s[5] - a[3][2] * s[4] + a[3][3] * s[3],
                -a[2][1] * s[5] + a[2][2] * s[4] - a[2][3] * s[3],
            ],
            [
                -a[1][0] * c[5] + a[1][2] * c[2] - a[1][3] * c[1],
                a[0][0] * c[5] - a[0][2] * c[2] + a[0][3] * c[1],
                -a[3][0] * s[5] + a[3][2] * s[2] - a[3][3] * s[1],
                a[2][0] * s[5] - a[2][2] * s[2] + a[2][3] * s[1],
            ],
            [
                a[1][0] * c[4] - a[1][1] * c[2] + a[1][3] * c[0],
                -a[0][0] * c[4] + a[0][1] * c[2] - a[0][3] * c[0],
                a[3][0] * s[4] - a[3][1] * s[2] + a[3][3] * s[0],
                -a[2][0] * s[4] + a[2][1] * s[2] - a[2][3] * s[0],
            ],
            [
                -a[1][0] * c[3] + a[1][1] * c[1] - a[1][2] * c[0],
                a[0][0] * c[3] - a[0][1] * c[1] + a[0][2] * c[0],
                -a[3][0] * s[3] + a[3][1] * s[1] - a[3][2] * s[0],
                a[2][0] * s[3] - a[2][1] * s[1] + a[2][2] * s[0],
            ],
        ];

        Ok(Self::from_rows(adj) * inv)
    }

    // Component extraction. Only meaningful for scale * rotation * translation
    // compositions.

    /// Translation held in row 3
    pub fn translation_component(&self) -> Vector {
        Vector::xyz(self.m[3][0], self.m[3][1], self.m[3][2])
    }

    /// Per-axis scale: the lengths of rows 0..2 of the upper-left block
    pub fn scaling_component(&self) -> Vector {
        Vector::xyz(self.row(0).length(), self.row(1).length(), self.row(2).length())
    }

    /// Rotation of the upper-left block once the scale is divided out.
    ///
    /// `q` and `-q` describe the same rotation and either may come back:
    /// the result always has a non-negative scalar or pivot component, so
    /// for angles between π and 2π it is the negation of
    /// [`Quaternion::from_axis`]. Compare with [`Quaternion::same_rotation`].
    pub fn rotation_component(&self) -> MathResult<Quaternion> {
        let mut rotation = Self::IDENTITY;
        for i in 0..3 {
            let axis = self.row(i).zero_w().normalize()?;
            rotation.m[i][..3].copy_from_slice(&axis.to_array()[..3]);
        }
        Ok(Quaternion::from_rotation_matrix(&rotation))
    }

    /// Split into `(scale, rotation, translation)`.
    ///
    /// Inverse of [`Matrix::transformation`] for positive scales, with the
    /// rotation only determined up to sign (see [`Matrix::rotation_component`]).
    pub fn decompose(&self) -> MathResult<(Vector, Quaternion, Vector)> {
        Ok((
            self.scaling_component(),
            self.rotation_component()?,
            self.translation_component(),
        ))
    }

    // Factory constructors. All angles are in radians.

    /// Translation by `(tx, ty, tz)`, stored in row 3
    ///
    /// # Example
    /// ```
    /// use geo3d_math::{Matrix, Vector};
    /// let p = Vector::new(1.0, 1.0, 1.0, 1.0) * Matrix::translation(2.0, 0.0, -1.0);
    /// assert_eq!(p, Vector::new(3.0, 1.0, 0.0, 1.0));
    /// ```
    #[rustfmt::skip]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            tx,  ty,  tz,  1.0,
        )
    }

    /// Per-axis scale along the diagonal; `w` is left untouched
    #[rustfmt::skip]
    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        Self::new(
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, sz,  0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_x(angle: f64) -> Self {
        let (sn, cs) = angle.sin_cos();
        Self::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, cs,  sn,  0.0,
            0.0, -sn, cs,  0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_y(angle: f64) -> Self {
        let (sn, cs) = angle.sin_cos();
        Self::new(
            cs,  0.0, -sn, 0.0,
            0.0, 1.0, 0.0, 0.0,
            sn,  0.0, cs,  0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn rotation_z(angle: f64) -> Self {
        let (sn, cs) = angle.sin_cos();
        Self::new(
            cs,  sn,  0.0, 0.0,
            -sn, cs,  0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around an arbitrary axis (Rodrigues' formula).
    /// The axis is normalized here.
    pub fn rotation(axis: Vector, angle: f64) -> MathResult<Self> {
        let Vector { x, y, z, .. } = axis.normalize()?;
        let (sn, cs) = angle.sin_cos();
        let t = 1.0 - cs;

        Ok(Self::new(
            t * x * x + cs,
            t * x * y + sn * z,
            t * x * z - sn * y,
            0.0,
            t * x * y - sn * z,
            t * y * y + cs,
            t * y * z + sn * x,
            0.0,
            t * x * z + sn * y,
            t * y * z - sn * x,
            t * z * z + cs,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ))
    }

    /// Rotation matrix of a unit quaternion
    pub fn rotation_quaternion(q: Quaternion) -> Self {
        let Quaternion { x, y, z, w } = q;
        Self::new(
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y + z * w),
            2.0 * (x * z - y * w),
            0.0,
            2.0 * (x * y - z * w),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z + x * w),
            0.0,
            2.0 * (x * z + y * w),
            2.0 * (y * z - x * w),
            1.0 - 2.0 * (x * x + y * y),
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        )
    }

    /// Scale, then rotate, then translate
    pub fn transformation(scale: Vector, rotation: Quaternion, translation: Vector) -> Self {
        Self::scaling(scale.x, scale.y, scale.z)
            * Self::rotation_quaternion(rotation)
            * Self::translation(translation.x, translation.y, translation.z)
    }

    /// Mirror across `plane`. The plane is normalized first.
    pub fn reflection(plane: &Plane) -> MathResult<Self> {
        let p = plane.normalize()?;
        let n = [p.a, p.b, p.c];

        let mut result = Self::IDENTITY;
        for i in 0..3 {
            for j in 0..3 {
                result.m[i][j] -= 2.0 * n[i] * n[j];
            }
            result.m[3][i] = -2.0 * p.d * n[i];
        }
        Ok(result)
    }

    /// Flatten geometry onto `plane` along rays from `light`.
    ///
    /// `light.w` is 1 for a point light and 0 for a directional light.
    pub fn shadow(light: Vector, plane: &Plane) -> MathResult<Self> {
        let p = plane.normalize()?;
        let d = p.dot(light);
        let pl = [p.a, p.b, p.c, p.d];
        let l = light.to_array();

        let mut result = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = -l[j] * pl[i];
            }
            result.m[i][i] += d;
        }
        Ok(result)
    }

    /// Right-handed perspective projection from a vertical field of view.
    ///
    /// View-space z in `[-zn, -zf]` maps to depth `[0, 1]` after the divide
    /// by w, which is `-z`.
    ///
    /// # Arguments
    /// * `fovy` - Vertical field of view in radians
    /// * `aspect` - Width divided by height
    /// * `zn`, `zf` - Distances to the near and far planes, both positive
    ///
    /// # Example
    /// ```
    /// use geo3d_math::Matrix;
    /// let proj = Matrix::perspective_fov_rh(std::f64::consts::FRAC_PI_2, 16.0 / 9.0, 0.1, 100.0);
    /// assert_eq!(proj[(2, 3)], -1.0);
    /// ```
    #[rustfmt::skip]
    pub fn perspective_fov_rh(fovy: f64, aspect: f64, zn: f64, zf: f64) -> Self {
        let y_scale = 1.0 / (fovy * 0.5).tan();
        let x_scale = y_scale / aspect;
        Self::new(
            x_scale, 0.0,     0.0,                  0.0,
            0.0,     y_scale, 0.0,                  0.0,
            0.0,     0.0,     zf / (zn - zf),       -1.0,
            0.0,     0.0,     zn * zf / (zn - zf),  0.0,
        )
    }

    /// Left-handed perspective projection from a vertical field of view.
    ///
    /// Same as [`Matrix::perspective_fov_rh`] except the camera looks down
    /// +z, so the `[2][2]` and `[2][3]` terms change sign.
    ///
    /// # Arguments
    /// * `fovy` - Vertical field of view in radians
    /// * `aspect` - Width divided by height
    /// * `zn`, `zf` - Distances to the near and far planes, both positive
    #[rustfmt::skip]
    pub fn perspective_fov_lh(fovy: f64, aspect: f64, zn: f64, zf: f64) -> Self {
        let y_scale = 1.0 / (fovy * 0.5).tan();
        let x_scale = y_scale / aspect;
        Self::new(
            x_scale, 0.0,     0.0,                   0.0,
            0.0,     y_scale, 0.0,                   0.0,
            0.0,     0.0,     zf / (zf - zn),        1.0,
            0.0,     0.0,     -zn * zf / (zf - zn),  0.0,
        )
    }

    /// Right-handed orthographic projection of an arbitrary view box.
    ///
    /// Maps x in `[l, r]` and y in `[b, t]` to `[-1, 1]`, and view-space z
    /// in `[-zn, -zf]` to depth `[0, 1]`.
    ///
    /// # Arguments
    /// * `l`, `r` - Left and right bounds of the view volume
    /// * `b`, `t` - Bottom and top bounds of the view volume
    /// * `zn`, `zf` - Near and far plane distances
    #[rustfmt::skip]
    pub fn ortho_off_center_rh(l: f64, r: f64, b: f64, t: f64, zn: f64, zf: f64) -> Self {
        Self::new(
            2.0 / (r - l),     0.0,               0.0,              0.0,
            0.0,               2.0 / (t - b),     0.0,              0.0,
            0.0,               0.0,               1.0 / (zn - zf),  0.0,
            (l + r) / (l - r), (t + b) / (b - t), zn / (zn - zf),   1.0,
        )
    }

    /// Left-handed orthographic projection of an arbitrary view box.
    ///
    /// Like [`Matrix::ortho_off_center_rh`] but z in `[zn, zf]` maps to
    /// depth `[0, 1]`.
    ///
    /// # Arguments
    /// * `l`, `r` - Left and right bounds of the view volume
    /// * `b`, `t` - Bottom and top bounds of the view volume
    /// * `zn`, `zf` - Near and far plane distances
    #[rustfmt::skip]
    pub fn ortho_off_center_lh(l: f64, r: f64, b: f64, t: f64, zn: f64, zf: f64) -> Self {
        Self::new(
            2.0 / (r - l),     0.0,               0.0,              0.0,
            0.0,               2.0 / (t - b),     0.0,              0.0,
            0.0,               0.0,               1.0 / (zf - zn),  0.0,
            (l + r) / (l - r), (t + b) / (b - t), zn / (zn - zf),   1.0,
        )
    }

    /// Centered right-handed orthographic projection of a `w` by `h` volume
    pub fn ortho_rh(w: f64, h: f64, zn: f64, zf: f64) -> Self {
        Self::ortho_off_center_rh(-w * 0.5, w * 0.5, -h * 0.5, h * 0.5, zn, zf)
    }

    /// Centered left-handed orthographic projection of a `w` by `h` volume
    pub fn ortho_lh(w: f64, h: f64, zn: f64, zf: f64) -> Self {
        Self::ortho_off_center_lh(-w * 0.5, w * 0.5, -h * 0.5, h * 0.5, zn, zf)
    }

    /// Right-handed view matrix; the camera looks down -z
    pub fn look_at_rh(eye: Vector, focus: Vector, up: Vector) -> MathResult<Self> {
        Self::view(eye, eye - focus, up)
    }

    /// Left-handed view matrix; the camera looks down +z
    pub fn look_at_lh(eye: Vector, focus: Vector, up: Vector) -> MathResult<Self> {
        Self::view(eye, focus - eye, up)
    }

    // Orthonormal basis around `z_axis`, with the eye position folded into row 3
    fn view(eye: Vector, z_axis: Vector, up: Vector) -> MathResult<Self> {
        let z = z_axis.zero_w().normalize()?;
        let x = up.cross(z).normalize()?;
        let y = z.cross(x);

        Ok(Self::new(
            x.x,
            y.x,
            z.x,
            0.0,
            x.y,
            y.y,
            z.y,
            0.0,
            x.z,
            y.z,
            z.z,
            0.0,
            -x.dot(eye),
            -y.dot(eye),
            -z.dot(eye),
            1.0,
        ))
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| float_cmp(*a, *b))
    }
}

impl From<[f64; 16]> for Matrix {
    fn from(values: [f64; 16]) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (row, chunk) in m.iter_mut().zip(values.chunks_exact(4)) {
            row.copy_from_slice(chunk);
        }
        Self { m }
    }
}

impl std::ops::Index<(usize, usize)> for Matrix {
    type Output = f64;
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.m[row][col]
    }
}

impl std::ops::IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.m[row][col]
    }
}

// Operator overloads

/// Matrix product `self * rhs`. Not commutative: `self` is applied first.
impl std::ops::Mul for Matrix {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut result = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result.m[i][j] = (0..4).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        result
    }
}

impl std::ops::MulAssign for Matrix {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl std::ops::Mul<f64> for Matrix {
    type Output = Self;
    fn mul(mut self, scalar: f64) -> Self {
        for row in self.m.iter_mut() {
            for e in row.iter_mut() {
                *e *= scalar;
            }
        }
        self
    }
}

/// Same as [`Matrix::transform`]: the vector is a row vector on the left
impl std::ops::Mul<Vector> for Matrix {
    type Output = Vector;
    #[inline]
    fn mul(self, v: Vector) -> Vector {
        self.transform(v)
    }
}

impl std::ops::Mul<Matrix> for Vector {
    type Output = Vector;
    #[inline]
    fn mul(self, m: Matrix) -> Vector {
        m.transform(self)
    }
}
