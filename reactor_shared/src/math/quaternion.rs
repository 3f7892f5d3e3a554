//! Rotation quaternions.
//!
//! `w + xi + yj + zk`. Products are Hamilton products and compose like the
//! column-vector matrices in [`super::matrix`]: `p * q` rotates by `q` first,
//! then by `p`, and `p.to_rotation_matrix() * q.to_rotation_matrix()` equals
//! `(p * q).to_rotation_matrix()`.
//!
//! Operations documented as "unit" assume a normalized quaternion. Addition
//! and scalar scaling denormalize, so call [`Quaternion::normalize`] before
//! relying on them.

use std::f64::consts::PI;
use std::ops::{Add, Mul, Neg, Sub};

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use super::{Matrix, Vector3, SLERP_EPSILON};

/// Rotation quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Extracts the rotation from the upper 3x3 block of `rot`.
    ///
    /// Shoemake's method: with a positive trace `w` is large and safe to
    /// divide by; otherwise the largest diagonal entry picks which of x/y/z
    /// to solve for first, which stays stable near 180 degree rotations.
    pub fn from_rotation_matrix(rot: &Matrix) -> Self {
        let k = |row: usize, col: usize| rot.get(row, col);
        let trace = k(0, 0) + k(1, 1) + k(2, 2);

        if trace > 0.0 {
            // |w| > 1/2
            let root = (trace + 1.0).sqrt();
            let w = 0.5 * root;
            let s = 0.5 / root;
            return Self::new(
                w,
                (k(2, 1) - k(1, 2)) * s,
                (k(0, 2) - k(2, 0)) * s,
                (k(1, 0) - k(0, 1)) * s,
            );
        }

        const NEXT: [usize; 3] = [1, 2, 0];
        let mut i = 0;
        if k(1, 1) > k(0, 0) {
            i = 1;
        }
        if k(2, 2) > k(i, i) {
            i = 2;
        }
        let j = NEXT[i];
        let l = NEXT[j];

        let root = (k(i, i) - k(j, j) - k(l, l) + 1.0).sqrt();
        let s = 0.5 / root;
        let mut xyz = [0.0; 3];
        xyz[i] = 0.5 * root;
        xyz[j] = (k(j, i) + k(i, j)) * s;
        xyz[l] = (k(l, i) + k(i, l)) * s;
        let w = (k(l, j) - k(j, l)) * s;
        Self::new(w, xyz[0], xyz[1], xyz[2])
    }

    /// Rotation matrix with zero translation.
    pub fn to_rotation_matrix(&self) -> Matrix {
        let tx = self.x + self.x;
        let ty = self.y + self.y;
        let tz = self.z + self.z;
        let twx = tx * self.w;
        let twy = ty * self.w;
        let twz = tz * self.w;
        let txx = tx * self.x;
        let txy = ty * self.x;
        let txz = tz * self.x;
        let tyy = ty * self.y;
        let tyz = tz * self.y;
        let tzz = tz * self.z;

        Matrix::from_rows(
            1.0 - (tyy + tzz), txy - twz, txz + twy, 0.0,
            txy + twz, 1.0 - (txx + tzz), tyz - twx, 0.0,
            txz - twy, tyz + twx, 1.0 - (txx + tyy), 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation of `angle` radians about the unit vector `axis`.
    pub fn from_angle_axis(angle: f64, axis: Vector3) -> Self {
        let (sin, cos) = (0.5 * angle).sin_cos();
        Self::new(cos, sin * axis.x, sin * axis.y, sin * axis.z)
    }

    /// Returns `(angle, axis)`. A zero rotation reports the X axis.
    pub fn to_angle_axis(&self) -> (f64, Vector3) {
        let sq_len = self.x * self.x + self.y * self.y + self.z * self.z;
        if sq_len > 0.0 {
            let angle = 2.0 * self.w.clamp(-1.0, 1.0).acos();
            let inv_len = 1.0 / sq_len.sqrt();
            (angle, Vector3::new(self.x, self.y, self.z) * inv_len)
        } else {
            (0.0, Vector3::UNIT_X)
        }
    }

    /// Builds the rotation whose local axes are the given orthonormal vectors.
    pub fn from_axes(x_axis: Vector3, y_axis: Vector3, z_axis: Vector3) -> Self {
        let mut rot = Matrix::IDENTITY;
        rot.set_column(0, x_axis, 0.0);
        rot.set_column(1, y_axis, 0.0);
        rot.set_column(2, z_axis, 0.0);
        Self::from_rotation_matrix(&rot)
    }

    pub fn to_axes(&self) -> (Vector3, Vector3, Vector3) {
        (self.x_axis(), self.y_axis(), self.z_axis())
    }

    /// Local X axis, equivalent to `self * Vector3::UNIT_X`.
    pub fn x_axis(&self) -> Vector3 {
        let ty = 2.0 * self.y;
        let tz = 2.0 * self.z;
        let twy = ty * self.w;
        let twz = tz * self.w;
        let txy = ty * self.x;
        let txz = tz * self.x;
        let tyy = ty * self.y;
        let tzz = tz * self.z;
        Vector3::new(1.0 - (tyy + tzz), txy + twz, txz - twy)
    }

    /// Local Y axis, equivalent to `self * Vector3::UNIT_Y`.
    pub fn y_axis(&self) -> Vector3 {
        let tx = 2.0 * self.x;
        let ty = 2.0 * self.y;
        let tz = 2.0 * self.z;
        let twx = tx * self.w;
        let twz = tz * self.w;
        let txx = tx * self.x;
        let txy = ty * self.x;
        let tyz = tz * self.y;
        let tzz = tz * self.z;
        Vector3::new(txy - twz, 1.0 - (txx + tzz), tyz + twx)
    }

    /// Local Z axis, equivalent to `self * Vector3::UNIT_Z`.
    pub fn z_axis(&self) -> Vector3 {
        let tx = 2.0 * self.x;
        let ty = 2.0 * self.y;
        let tz = 2.0 * self.z;
        let twx = tx * self.w;
        let twy = ty * self.w;
        let txx = tx * self.x;
        let txz = tz * self.x;
        let tyy = ty * self.y;
        let tyz = tz * self.y;
        Vector3::new(txz + twy, tyz - twx, 1.0 - (txx + tyy))
    }

    pub fn dot(&self, rhs: &Self) -> f64 {
        self.w * rhs.w + self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Squared norm.
    pub fn norm(&self) -> f64 {
        self.dot(self)
    }

    /// Normalizes in place and returns the previous squared norm.
    ///
    /// A zero quaternion is left untouched.
    pub fn normalize(&mut self) -> f64 {
        let len = self.norm();
        if len > 0.0 {
            *self = *self * (1.0 / len.sqrt());
        }
        len
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// General inverse; `None` when the quaternion has zero norm.
    pub fn inverse(&self) -> Option<Self> {
        let norm = self.norm();
        if norm > 0.0 {
            let inv = 1.0 / norm;
            Some(Self::new(self.w * inv, -self.x * inv, -self.y * inv, -self.z * inv))
        } else {
            None
        }
    }

    /// Inverse of a unit quaternion (its conjugate).
    pub fn unit_inverse(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Exponential of a pure quaternion `A * (x, y, z)` with unit `(x, y, z)`.
    pub fn exp(&self) -> Self {
        let angle = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        let (sin, cos) = angle.sin_cos();
        // A / sin(A) tends to 1 as sin(A) tends to 0.
        let coeff = if sin.abs() >= SLERP_EPSILON { sin / angle } else { 1.0 };
        Self::new(cos, coeff * self.x, coeff * self.y, coeff * self.z)
    }

    /// Logarithm of a unit quaternion; the result has `w = 0`.
    pub fn log(&self) -> Self {
        if self.w.abs() < 1.0 {
            let angle = self.w.acos();
            let sin = angle.sin();
            if sin.abs() >= SLERP_EPSILON {
                let coeff = angle / sin;
                return Self::new(0.0, coeff * self.x, coeff * self.y, coeff * self.z);
            }
        }
        Self::new(0.0, self.x, self.y, self.z)
    }

    /// Rotates `v` by this unit quaternion.
    pub fn rotate(&self, v: Vector3) -> Vector3 {
        let qvec = Vector3::new(self.x, self.y, self.z);
        let uv = qvec.cross(v);
        let uuv = qvec.cross(uv);
        v + uv * (2.0 * self.w) + uuv * 2.0
    }

    /// Rotation about the local Z axis, in radians.
    ///
    /// With `reproject_axis` the local X axis is projected onto the XY plane
    /// and its angle returned; otherwise the shortest-path internal roll.
    pub fn roll(&self, reproject_axis: bool) -> f64 {
        if reproject_axis {
            let ty = 2.0 * self.y;
            let tz = 2.0 * self.z;
            let twz = tz * self.w;
            let txy = ty * self.x;
            let tyy = ty * self.y;
            let tzz = tz * self.z;
            (txy + twz).atan2(1.0 - (tyy + tzz))
        } else {
            (2.0 * (self.x * self.y + self.w * self.z))
                .atan2(self.w * self.w + self.x * self.x - self.y * self.y - self.z * self.z)
        }
    }

    /// Rotation about the local X axis, in radians.
    pub fn pitch(&self, reproject_axis: bool) -> f64 {
        if reproject_axis {
            let tx = 2.0 * self.x;
            let tz = 2.0 * self.z;
            let twx = tx * self.w;
            let txx = tx * self.x;
            let tyz = tz * self.y;
            let tzz = tz * self.z;
            (tyz + twx).atan2(1.0 - (txx + tzz))
        } else {
            (2.0 * (self.y * self.z + self.w * self.x))
                .atan2(self.w * self.w - self.x * self.x - self.y * self.y + self.z * self.z)
        }
    }

    /// Rotation about the local Y axis, in radians.
    pub fn yaw(&self, reproject_axis: bool) -> f64 {
        if reproject_axis {
            let tx = 2.0 * self.x;
            let ty = 2.0 * self.y;
            let tz = 2.0 * self.z;
            let twy = ty * self.w;
            let txx = tx * self.x;
            let txz = tz * self.x;
            let tyy = ty * self.y;
            (txz + twy).atan2(1.0 - (txx + tyy))
        } else {
            (-2.0 * (self.x * self.z - self.w * self.y)).clamp(-1.0, 1.0).asin()
        }
    }

    /// True when the rotations differ by at most `tolerance` radians.
    pub fn equals(&self, rhs: &Self, tolerance: f64) -> bool {
        let d = self.dot(rhs);
        let angle = (2.0 * d * d - 1.0).clamp(-1.0, 1.0).acos();
        angle.abs() <= tolerance
    }

    /// Orientation comparison that treats `q` and `-q` as equal.
    pub fn orientation_equals(&self, other: &Self, tolerance: f64) -> bool {
        let d = self.dot(other);
        1.0 - d * d < tolerance
    }

    pub fn is_nan(&self) -> bool {
        self.w.is_nan() || self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Spherical linear interpolation: constant angular velocity,
    /// `slerp(0, p, q) == p` and `slerp(1, p, q) == q`.
    ///
    /// With `shortest_path` the arc through `-q` is used when it is shorter.
    pub fn slerp(t: f64, p: &Self, q: &Self, shortest_path: bool) -> Self {
        let mut cos = p.dot(q);
        let target = if cos < 0.0 && shortest_path {
            cos = -cos;
            -*q
        } else {
            *q
        };

        if cos >= 1.0 - SLERP_EPSILON {
            // Nearly parallel: lerp and renormalize instead of dividing by a
            // vanishing sine.
            (*p * (1.0 - t) + target * t).normalized()
        } else if cos <= -(1.0 - SLERP_EPSILON) {
            // Nearly opposite with no preferred arc: pass through a
            // quaternion perpendicular to `p`, a quarter turn each half.
            let perp = Self::new(-p.x, p.w, -p.z, p.y);
            if t < 0.5 {
                Self::slerp(2.0 * t, p, &perp, false)
            } else {
                Self::slerp(2.0 * t - 1.0, &perp, &target, false)
            }
        } else {
            let sin = (1.0 - cos * cos).sqrt();
            let angle = sin.atan2(cos);
            let inv_sin = 1.0 / sin;
            let coeff0 = ((1.0 - t) * angle).sin() * inv_sin;
            let coeff1 = (t * angle).sin() * inv_sin;
            *p * coeff0 + target * coeff1
        }
    }

    /// Slerp that spins `extra_spins` additional half turns on the way.
    pub fn slerp_extra_spins(t: f64, p: &Self, q: &Self, extra_spins: i32) -> Self {
        let angle = p.dot(q).clamp(-1.0, 1.0).acos();
        if angle.abs() < SLERP_EPSILON {
            return *p;
        }
        let inv_sin = 1.0 / angle.sin();
        let phase = PI * f64::from(extra_spins) * t;
        let coeff0 = ((1.0 - t) * angle - phase).sin() * inv_sin;
        let coeff1 = (t * angle + phase).sin() * inv_sin;
        *p * coeff0 + *q * coeff1
    }

    /// Control points `(a, b)` around `q1` for [`Quaternion::squad`].
    ///
    /// All three inputs must be unit quaternions.
    pub fn intermediate(q0: &Self, q1: &Self, q2: &Self) -> (Self, Self) {
        let p0 = q0.unit_inverse() * *q1;
        let p1 = q1.unit_inverse() * *q2;
        let arg = (p0.log() - p1.log()) * 0.25;
        let a = *q1 * arg.exp();
        let b = *q1 * (-arg).exp();
        (a, b)
    }

    /// Spherical quadratic interpolation between `p` and `q` with control
    /// points `a` and `b`.
    pub fn squad(t: f64, p: &Self, a: &Self, b: &Self, q: &Self, shortest_path: bool) -> Self {
        let slerp_t = 2.0 * t * (1.0 - t);
        let slerp_p = Self::slerp(t, p, q, shortest_path);
        let slerp_q = Self::slerp(t, a, b, false);
        Self::slerp(slerp_t, &slerp_p, &slerp_q, false)
    }

    /// Normalized linear interpolation.
    ///
    /// Cheaper than slerp and commutative, but the angular velocity is not
    /// constant across `t`.
    pub fn nlerp(t: f64, p: &Self, q: &Self, shortest_path: bool) -> Self {
        let target = if p.dot(q) < 0.0 && shortest_path { -*q } else { *q };
        (*p + (target - *p) * t).normalized()
    }
}

impl Add for Quaternion {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.w + rhs.w, self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Quaternion {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.w - rhs.w, self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product; `p * q != q * p` in general.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y + self.y * rhs.w + self.z * rhs.x - self.x * rhs.z,
            self.w * rhs.z + self.z * rhs.w + self.x * rhs.y - self.y * rhs.x,
        )
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.w * rhs, self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Quaternion> for f64 {
    type Output = Quaternion;
    fn mul(self, rhs: Quaternion) -> Quaternion {
        rhs * self
    }
}

impl Mul<Vector3> for Quaternion {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        self.rotate(rhs)
    }
}

impl Neg for Quaternion {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.w.abs_diff_eq(&other.w, epsilon)
            && self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}
