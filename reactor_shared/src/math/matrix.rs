//! 4x4 homogeneous transforms.
//!
//! Storage is column-major, `m[4 * col + row]`, so columns 0..2 of an affine
//! transform hold the local X/Y/Z axes and column 3 the translation.
//! Matrices multiply column vectors: `a * b` applies `b` first.

use std::f64::consts::FRAC_PI_2;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use super::{deg_to_rad, MathError, Quaternion, Vector3, Vector4, EPSILON, TOLERANCE};

/// Plane of points `p` with `normal.dot(p) + distance == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vector3,
    pub distance: f64,
}

impl Plane {
    pub const fn new(normal: Vector3, distance: f64) -> Self {
        Self { normal, distance }
    }

    /// Signed distance from the plane along its normal.
    pub fn distance_to(&self, point: Vector3) -> f64 {
        self.normal.dot(point) + self.distance
    }
}

/// 4x4 matrix (column-major).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub m: [f64; 16],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self::from_cols_array([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub const ZERO: Self = Self::from_cols_array([0.0; 16]);

    pub const fn from_cols_array(m: [f64; 16]) -> Self {
        Self { m }
    }

    /// Builds a matrix from entries given in reading (row-major) order.
    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub const fn from_rows(
        m11: f64, m12: f64, m13: f64, m14: f64,
        m21: f64, m22: f64, m23: f64, m24: f64,
        m31: f64, m32: f64, m33: f64, m34: f64,
        m41: f64, m42: f64, m43: f64, m44: f64,
    ) -> Self {
        Self::from_cols_array([
            m11, m21, m31, m41,
            m12, m22, m32, m42,
            m13, m23, m33, m43,
            m14, m24, m34, m44,
        ])
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[4 * col + row]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.m[4 * col + row] = value;
    }

    pub fn col(&self, col: usize) -> Vector4 {
        let c = 4 * col;
        Vector4::new(self.m[c], self.m[c + 1], self.m[c + 2], self.m[c + 3])
    }

    /// Writes `v` into rows 0..2 of column `col` and `w` into row 3.
    pub fn set_column(&mut self, col: usize, v: Vector3, w: f64) {
        let c = 4 * col;
        self.m[c] = v.x;
        self.m[c + 1] = v.y;
        self.m[c + 2] = v.z;
        self.m[c + 3] = w;
    }

    /// Single-precision copy for upload to a graphics API.
    pub fn to_cols_array_f32(&self) -> [f32; 16] {
        self.m.map(|v| v as f32)
    }

    /// View matrix for an eye at `eye` looking at `target`.
    ///
    /// The camera looks down its local `-Z`; the result is the inverse of the
    /// camera's world transform.
    pub fn create_look_at(eye: Vector3, target: Vector3, up: Vector3) -> Self {
        let up = up.normalize();
        let z_axis = (eye - target).normalize();
        let x_axis = up.cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis).normalize();

        Self::from_rows(
            x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(eye),
            y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(eye),
            z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(eye),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Right-handed perspective projection, `fov_degrees` vertical.
    pub fn create_perspective(
        fov_degrees: f64,
        aspect_ratio: f64,
        z_near: f64,
        z_far: f64,
    ) -> Result<Self, MathError> {
        let theta = deg_to_rad(fov_degrees) * 0.5;
        // Distance to the nearest multiple of pi/2, where tan is zero or infinite.
        let r = theta.rem_euclid(FRAC_PI_2);
        if r.min(FRAC_PI_2 - r) < EPSILON {
            return Err(MathError::InvalidFieldOfView { degrees: fov_degrees });
        }
        if z_far == z_near || aspect_ratio == 0.0 {
            return Err(MathError::DegenerateProjection);
        }

        let f_n = 1.0 / (z_far - z_near);
        let factor = 1.0 / theta.tan();

        let mut dst = Self::ZERO;
        dst.m[0] = (1.0 / aspect_ratio) * factor;
        dst.m[5] = factor;
        dst.m[10] = -(z_far + z_near) * f_n;
        dst.m[11] = -1.0;
        dst.m[14] = -2.0 * z_far * z_near * f_n;
        Ok(dst)
    }

    /// Orthographic projection centred on the view axis.
    pub fn create_orthographic(
        width: f64,
        height: f64,
        z_near: f64,
        z_far: f64,
    ) -> Result<Self, MathError> {
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        Self::create_orthographic_off_center(
            -half_width,
            half_width,
            -half_height,
            half_height,
            z_near,
            z_far,
        )
    }

    pub fn create_orthographic_off_center(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        z_near: f64,
        z_far: f64,
    ) -> Result<Self, MathError> {
        if left == right || bottom == top || z_near == z_far {
            return Err(MathError::DegenerateProjection);
        }

        let mut dst = Self::ZERO;
        dst.m[0] = 2.0 / (right - left);
        dst.m[5] = 2.0 / (top - bottom);
        dst.m[10] = 1.0 / (z_near - z_far);
        dst.m[12] = (left + right) / (left - right);
        dst.m[13] = (top + bottom) / (bottom - top);
        dst.m[14] = z_near / (z_near - z_far);
        dst.m[15] = 1.0;
        Ok(dst)
    }

    /// World transform for an object at `object_position` whose local `-Z`
    /// faces the camera.
    ///
    /// When the object and camera coincide the facing direction comes from
    /// `camera_forward`; with no forward vector either, the rotation stays
    /// identity.
    pub fn create_billboard(
        object_position: Vector3,
        camera_position: Vector3,
        camera_up: Vector3,
        camera_forward: Option<Vector3>,
    ) -> Self {
        let delta = object_position - camera_position;
        let sufficient_delta = delta.squared_length() > EPSILON;

        let mut dst = Self::IDENTITY;
        dst.set_column(3, object_position, 1.0);

        let target = if sufficient_delta {
            Some(camera_position)
        } else {
            camera_forward.map(|forward| object_position - forward)
        };

        if let Some(target) = target {
            // A billboard is the inverse of a look-at rotation: transpose the
            // upper 3x3 block.
            let look_at = Self::create_look_at(object_position, target, camera_up);
            for row in 0..3 {
                for col in 0..3 {
                    dst.set(row, col, look_at.get(col, row));
                }
            }
        }
        dst
    }

    /// Reflection through `plane`.
    pub fn create_reflection(plane: &Plane) -> Self {
        let n = plane.normal;
        let k = -2.0 * plane.distance;

        let mut dst = Self::IDENTITY;
        dst.m[0] -= 2.0 * n.x * n.x;
        dst.m[5] -= 2.0 * n.y * n.y;
        dst.m[10] -= 2.0 * n.z * n.z;
        dst.m[1] = -2.0 * n.x * n.y;
        dst.m[4] = dst.m[1];
        dst.m[2] = -2.0 * n.x * n.z;
        dst.m[8] = dst.m[2];
        dst.m[6] = -2.0 * n.y * n.z;
        dst.m[9] = dst.m[6];
        dst.set_column(3, n * k, 1.0);
        dst
    }

    pub fn create_scale(scale: Vector3) -> Self {
        let mut dst = Self::IDENTITY;
        dst.m[0] = scale.x;
        dst.m[5] = scale.y;
        dst.m[10] = scale.z;
        dst
    }

    pub fn create_translation(translation: Vector3) -> Self {
        let mut dst = Self::IDENTITY;
        dst.set_column(3, translation, 1.0);
        dst
    }

    pub fn create_from_quaternion(q: &Quaternion) -> Self {
        q.to_rotation_matrix()
    }

    /// Rotation of `angle` radians about `axis` (Rodrigues' formula).
    ///
    /// A non-unit axis is normalized first unless it is too short to do so.
    pub fn create_rotation(axis: Vector3, angle: f64) -> Self {
        let Vector3 { mut x, mut y, mut z } = axis;

        let n = x * x + y * y + z * z;
        if n != 1.0 {
            let n = n.sqrt();
            if n > EPSILON {
                let inv = 1.0 / n;
                x *= inv;
                y *= inv;
                z *= inv;
            }
        }

        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let tx = t * x;
        let ty = t * y;
        let tz = t * z;
        let txy = tx * y;
        let txz = tx * z;
        let tyz = ty * z;
        let sx = s * x;
        let sy = s * y;
        let sz = s * z;

        Self::from_rows(
            c + tx * x, txy - sz, txz + sy, 0.0,
            txy + sz, c + ty * y, tyz - sx, 0.0,
            txz - sy, tyz + sx, c + tz * z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn create_rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut dst = Self::IDENTITY;
        dst.m[5] = c;
        dst.m[6] = s;
        dst.m[9] = -s;
        dst.m[10] = c;
        dst
    }

    pub fn create_rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut dst = Self::IDENTITY;
        dst.m[0] = c;
        dst.m[2] = -s;
        dst.m[8] = s;
        dst.m[10] = c;
        dst
    }

    pub fn create_rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut dst = Self::IDENTITY;
        dst.m[0] = c;
        dst.m[1] = s;
        dst.m[4] = -s;
        dst.m[5] = c;
        dst
    }

    /// Adds `scalar` to every entry.
    pub fn add_scalar(&self, scalar: f64) -> Self {
        Self::from_cols_array(self.m.map(|v| v + scalar))
    }

    /// Cofactor pairs shared by `determinant` and `invert`.
    fn sub_determinants(&self) -> ([f64; 6], [f64; 6]) {
        let m = &self.m;
        let a = [
            m[0] * m[5] - m[1] * m[4],
            m[0] * m[6] - m[2] * m[4],
            m[0] * m[7] - m[3] * m[4],
            m[1] * m[6] - m[2] * m[5],
            m[1] * m[7] - m[3] * m[5],
            m[2] * m[7] - m[3] * m[6],
        ];
        let b = [
            m[8] * m[13] - m[9] * m[12],
            m[8] * m[14] - m[10] * m[12],
            m[8] * m[15] - m[11] * m[12],
            m[9] * m[14] - m[10] * m[13],
            m[9] * m[15] - m[11] * m[13],
            m[10] * m[15] - m[11] * m[14],
        ];
        (a, b)
    }

    fn determinant_from(a: &[f64; 6], b: &[f64; 6]) -> f64 {
        a[0] * b[5] - a[1] * b[4] + a[2] * b[3] + a[3] * b[2] - a[4] * b[1] + a[5] * b[0]
    }

    pub fn determinant(&self) -> f64 {
        let (a, b) = self.sub_determinants();
        Self::determinant_from(&a, &b)
    }

    /// Inverse via the adjugate; fails when `|det| <= TOLERANCE`.
    pub fn invert(&self) -> Result<Self, MathError> {
        let (a, b) = self.sub_determinants();
        let det = Self::determinant_from(&a, &b);
        if det.abs() <= TOLERANCE {
            return Err(MathError::SingularMatrix { determinant: det });
        }

        let m = &self.m;
        let adjugate = Self::from_cols_array([
            m[5] * b[5] - m[6] * b[4] + m[7] * b[3],
            -m[1] * b[5] + m[2] * b[4] - m[3] * b[3],
            m[13] * a[5] - m[14] * a[4] + m[15] * a[3],
            -m[9] * a[5] + m[10] * a[4] - m[11] * a[3],
            -m[4] * b[5] + m[6] * b[2] - m[7] * b[1],
            m[0] * b[5] - m[2] * b[2] + m[3] * b[1],
            -m[12] * a[5] + m[14] * a[2] - m[15] * a[1],
            m[8] * a[5] - m[10] * a[2] + m[11] * a[1],
            m[4] * b[4] - m[5] * b[2] + m[7] * b[0],
            -m[0] * b[4] + m[1] * b[2] - m[3] * b[0],
            m[12] * a[4] - m[13] * a[2] + m[15] * a[0],
            -m[8] * a[4] + m[9] * a[2] - m[11] * a[0],
            -m[4] * b[3] + m[5] * b[1] - m[6] * b[0],
            m[0] * b[3] - m[1] * b[1] + m[2] * b[0],
            -m[12] * a[3] + m[13] * a[1] - m[14] * a[0],
            m[8] * a[3] - m[9] * a[1] + m[10] * a[0],
        ]);
        Ok(adjugate * (1.0 / det))
    }

    pub fn transpose(&self) -> Self {
        let mut dst = Self::ZERO;
        for row in 0..4 {
            for col in 0..4 {
                dst.set(col, row, self.get(row, col));
            }
        }
        dst
    }

    /// Exact comparison against [`Matrix::IDENTITY`].
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Axis scales; the Z scale is negated when the determinant is negative
    /// so that handedness survives a decompose/recompose round trip.
    pub fn scale(&self) -> Vector3 {
        let (x_axis, y_axis, z_axis) = self.axes();
        let mut scale = Vector3::new(x_axis.length(), y_axis.length(), z_axis.length());
        if self.determinant() < 0.0 {
            scale.z = -scale.z;
        }
        scale
    }

    /// Rotation with scale factored out.
    ///
    /// Fails when any axis scale is below [`TOLERANCE`], since the rotation
    /// of a collapsed axis cannot be recovered.
    pub fn rotation(&self) -> Result<Quaternion, MathError> {
        let scale = self.scale();
        if scale.x < TOLERANCE || scale.y < TOLERANCE || scale.z.abs() < TOLERANCE {
            return Err(MathError::DegenerateScale);
        }
        let (x_axis, y_axis, z_axis) = self.axes();
        let rotation = Quaternion::from_axes(x_axis / scale.x, y_axis / scale.y, z_axis / scale.z);
        Ok(rotation.normalized())
    }

    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.m[12], self.m[13], self.m[14])
    }

    /// Splits an affine transform into `(scale, rotation, translation)`.
    pub fn decompose(&self) -> Result<(Vector3, Quaternion, Vector3), MathError> {
        Ok((self.scale(), self.rotation()?, self.translation()))
    }

    fn axes(&self) -> (Vector3, Vector3, Vector3) {
        (
            Vector3::new(self.m[0], self.m[1], self.m[2]),
            Vector3::new(self.m[4], self.m[5], self.m[6]),
            Vector3::new(self.m[8], self.m[9], self.m[10]),
        )
    }

    pub fn right(&self) -> Vector3 {
        Vector3::new(self.m[0], self.m[1], self.m[2])
    }

    pub fn left(&self) -> Vector3 {
        -self.right()
    }

    pub fn up(&self) -> Vector3 {
        Vector3::new(self.m[4], self.m[5], self.m[6])
    }

    pub fn down(&self) -> Vector3 {
        -self.up()
    }

    /// Local `-Z`, the direction a camera transform looks along.
    pub fn forward(&self) -> Vector3 {
        -self.back()
    }

    pub fn back(&self) -> Vector3 {
        Vector3::new(self.m[8], self.m[9], self.m[10])
    }

    /// Same as [`Matrix::translation`].
    pub fn position(&self) -> Vector3 {
        self.translation()
    }

    /// `self * rotation(q)`.
    pub fn rotate(&self, q: &Quaternion) -> Self {
        *self * Self::create_from_quaternion(q)
    }

    /// `self * rotation(axis, angle)`.
    pub fn rotate_axis(&self, axis: Vector3, angle: f64) -> Self {
        *self * Self::create_rotation(axis, angle)
    }

    pub fn rotate_x(&self, angle: f64) -> Self {
        *self * Self::create_rotation_x(angle)
    }

    pub fn rotate_y(&self, angle: f64) -> Self {
        *self * Self::create_rotation_y(angle)
    }

    pub fn rotate_z(&self, angle: f64) -> Self {
        *self * Self::create_rotation_z(angle)
    }

    /// `self * scale(s)`.
    pub fn scale_by(&self, s: Vector3) -> Self {
        *self * Self::create_scale(s)
    }

    /// `self * translation(t)`.
    pub fn translate(&self, t: Vector3) -> Self {
        *self * Self::create_translation(t)
    }

    /// Transforms a point (implicit `w = 1`, translation applies).
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        self.transform_vector4(Vector4::from_point(point)).xyz()
    }

    /// Transforms a direction (implicit `w = 0`, translation ignored).
    pub fn transform_vector(&self, vector: Vector3) -> Vector3 {
        self.transform_vector4(Vector4::from_direction(vector)).xyz()
    }

    pub fn transform_vector4(&self, v: Vector4) -> Vector4 {
        let m = &self.m;
        Vector4::new(
            v.x * m[0] + v.y * m[4] + v.z * m[8] + v.w * m[12],
            v.x * m[1] + v.y * m[5] + v.z * m[9] + v.w * m[13],
            v.x * m[2] + v.y * m[6] + v.z * m[10] + v.w * m[14],
            v.x * m[3] + v.y * m[7] + v.z * m[11] + v.w * m[15],
        )
    }
}

impl Add for Matrix {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let mut dst = self;
        dst += rhs;
        dst
    }
}

impl AddAssign for Matrix {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.m.iter_mut().zip(rhs.m) {
            *a += b;
        }
    }
}

impl Sub for Matrix {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        let mut dst = self;
        dst -= rhs;
        dst
    }
}

impl SubAssign for Matrix {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.m.iter_mut().zip(rhs.m) {
            *a -= b;
        }
    }
}

impl Neg for Matrix {
    type Output = Self;
    fn neg(self) -> Self {
        Self::from_cols_array(self.m.map(|v| -v))
    }
}

impl Mul for Matrix {
    type Output = Self;

    /// Matrix product; the result applies `rhs` first.
    fn mul(self, rhs: Self) -> Self {
        let mut dst = Self::ZERO;
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.get(row, k) * rhs.get(k, col);
                }
                dst.set(row, col, sum);
            }
        }
        dst
    }
}

impl MulAssign for Matrix {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<f64> for Matrix {
    type Output = Self;

    /// Scales every entry.
    fn mul(self, rhs: f64) -> Self {
        Self::from_cols_array(self.m.map(|v| v * rhs))
    }
}

impl Mul<Vector4> for Matrix {
    type Output = Vector4;
    fn mul(self, rhs: Vector4) -> Vector4 {
        self.transform_vector4(rhs)
    }
}

impl AbsDiffEq for Matrix {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}
