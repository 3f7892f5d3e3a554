//! Fixed-size vectors.
//!
//! Equality is exact component comparison. Use `approx::AbsDiffEq` when a
//! tolerance is needed.

use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use super::EPSILON;

macro_rules! impl_vector {
    ($ty:ident { $($field:ident => $idx:literal),+ }) => {
        impl $ty {
            /// Vector with every component set to `value`.
            pub const fn splat(value: f64) -> Self {
                Self { $($field: value),+ }
            }

            pub fn dot(self, rhs: Self) -> f64 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            pub fn length(self) -> f64 {
                self.dot(self).sqrt()
            }

            /// Squared length; prefer this for comparisons.
            pub fn squared_length(self) -> f64 {
                self.dot(self)
            }

            pub fn distance(self, rhs: Self) -> f64 {
                (self - rhs).length()
            }

            pub fn squared_distance(self, rhs: Self) -> f64 {
                (self - rhs).squared_length()
            }

            /// Returns the unit vector in the same direction.
            ///
            /// A zero-length vector normalizes to zero rather than NaN.
            pub fn normalize(self) -> Self {
                let len = self.length();
                if len == 0.0 {
                    return Self::default();
                }
                self / len
            }

            /// Normalizes in place and returns the previous length.
            pub fn normalize_in_place(&mut self) -> f64 {
                let len = self.length();
                if len > 0.0 {
                    *self = *self / len;
                }
                len
            }

            pub fn is_zero_length(self) -> bool {
                self.squared_length() < EPSILON * EPSILON
            }

            pub fn is_nan(self) -> bool {
                false $(|| self.$field.is_nan())+
            }

            pub fn mid_point(self, rhs: Self) -> Self {
                (self + rhs) * 0.5
            }

            /// Sets each component to the minimum of itself and `cmp`.
            pub fn make_floor(&mut self, cmp: Self) {
                $(self.$field = self.$field.min(cmp.$field);)+
            }

            /// Sets each component to the maximum of itself and `cmp`.
            pub fn make_ceil(&mut self, cmp: Self) {
                $(self.$field = self.$field.max(cmp.$field);)+
            }

            /// Linear interpolation with `t` clamped to `[0, 1]`.
            pub fn lerp(self, to: Self, t: f64) -> Self {
                let t = t.clamp(0.0, 1.0);
                self + (to - self) * t
            }

            /// Unsigned angle in radians, in `[0, PI]`.
            pub fn angle_between(self, other: Self) -> f64 {
                let len_product = (self.length() * other.length()).max(EPSILON);
                (self.dot(other) / len_product).clamp(-1.0, 1.0).acos()
            }

            /// Reflects about a plane with unit normal `normal`.
            pub fn reflect(self, normal: Self) -> Self {
                self - normal * (2.0 * self.dot(normal))
            }
        }

        impl Add for $ty {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Add<f64> for $ty {
            type Output = Self;
            fn add(self, rhs: f64) -> Self {
                Self { $($field: self.$field + rhs),+ }
            }
        }

        impl Add<$ty> for f64 {
            type Output = $ty;
            fn add(self, rhs: $ty) -> $ty {
                rhs + self
            }
        }

        impl Sub for $ty {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Sub<f64> for $ty {
            type Output = Self;
            fn sub(self, rhs: f64) -> Self {
                Self { $($field: self.$field - rhs),+ }
            }
        }

        impl Sub<$ty> for f64 {
            type Output = $ty;
            fn sub(self, rhs: $ty) -> $ty {
                $ty { $($field: self - rhs.$field),+ }
            }
        }

        impl Mul for $ty {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                Self { $($field: self.$field * rhs.$field),+ }
            }
        }

        impl Mul<f64> for $ty {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$ty> for f64 {
            type Output = $ty;
            fn mul(self, rhs: $ty) -> $ty {
                rhs * self
            }
        }

        impl Div for $ty {
            type Output = Self;
            fn div(self, rhs: Self) -> Self {
                Self { $($field: self.$field / rhs.$field),+ }
            }
        }

        impl Div<f64> for $ty {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                let inv = 1.0 / rhs;
                Self { $($field: self.$field * inv),+ }
            }
        }

        impl Div<$ty> for f64 {
            type Output = $ty;
            fn div(self, rhs: $ty) -> $ty {
                $ty { $($field: self / rhs.$field),+ }
            }
        }

        impl Neg for $ty {
            type Output = Self;
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl AddAssign<f64> for $ty {
            fn add_assign(&mut self, rhs: f64) {
                $(self.$field += rhs;)+
            }
        }

        impl SubAssign for $ty {
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl SubAssign<f64> for $ty {
            fn sub_assign(&mut self, rhs: f64) {
                $(self.$field -= rhs;)+
            }
        }

        impl MulAssign for $ty {
            fn mul_assign(&mut self, rhs: Self) {
                $(self.$field *= rhs.$field;)+
            }
        }

        impl MulAssign<f64> for $ty {
            fn mul_assign(&mut self, rhs: f64) {
                $(self.$field *= rhs;)+
            }
        }

        impl DivAssign for $ty {
            fn div_assign(&mut self, rhs: Self) {
                $(self.$field /= rhs.$field;)+
            }
        }

        impl DivAssign<f64> for $ty {
            fn div_assign(&mut self, rhs: f64) {
                let inv = 1.0 / rhs;
                $(self.$field *= inv;)+
            }
        }

        impl Index<usize> for $ty {
            type Output = f64;
            fn index(&self, i: usize) -> &f64 {
                match i {
                    $($idx => &self.$field,)+
                    _ => panic!("{} index out of range: {}", stringify!($ty), i),
                }
            }
        }

        impl IndexMut<usize> for $ty {
            fn index_mut(&mut self, i: usize) -> &mut f64 {
                match i {
                    $($idx => &mut self.$field,)+
                    _ => panic!("{} index out of range: {}", stringify!($ty), i),
                }
            }
        }

        impl AbsDiffEq for $ty {
            type Epsilon = f64;

            fn default_epsilon() -> f64 {
                f64::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
                true $(&& self.$field.abs_diff_eq(&other.$field, epsilon))+
            }
        }
    };
}

/// 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl_vector!(Vector2 { x => 0, y => 1 });

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0);
    pub const NEGATIVE_UNIT_X: Self = Self::new(-1.0, 0.0);
    pub const NEGATIVE_UNIT_Y: Self = Self::new(0.0, -1.0);
    pub const UNIT_SCALE: Self = Self::new(1.0, 1.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector rotated a quarter turn counter-clockwise.
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Z component of the 3D cross product of `(x, y, 0)` vectors.
    pub fn cross(self, rhs: Self) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Signed angle to `other`, counter-clockwise, in `[0, 2*PI)`.
    pub fn angle_to(self, other: Self) -> f64 {
        let angle = self.angle_between(other);
        if self.cross(other) < 0.0 {
            std::f64::consts::TAU - angle
        } else {
            angle
        }
    }
}

/// 3D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl_vector!(Vector3 { x => 0, y => 1, z => 2 });

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);
    pub const NEGATIVE_UNIT_X: Self = Self::new(-1.0, 0.0, 0.0);
    pub const NEGATIVE_UNIT_Y: Self = Self::new(0.0, -1.0, 0.0);
    pub const NEGATIVE_UNIT_Z: Self = Self::new(0.0, 0.0, -1.0);
    pub const UNIT_SCALE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Right-handed cross product.
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> Self {
        [v.x, v.y, v.z]
    }
}

/// 4D vector, mostly used as a homogeneous coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl_vector!(Vector4 { x => 0, y => 1, z => 2, w => 3 });

impl Vector4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Homogeneous point (`w = 1`).
    pub const fn from_point(p: Vector3) -> Self {
        Self::new(p.x, p.y, p.z, 1.0)
    }

    /// Homogeneous direction (`w = 0`).
    pub const fn from_direction(d: Vector3) -> Self {
        Self::new(d.x, d.y, d.z, 0.0)
    }

    pub const fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}
