//! Math types.
//!
//! Vectors, quaternions and 4x4 matrices used by the camera and by any
//! renderer sitting on top of it. Everything is a plain `Copy` value type
//! in double precision; there is no SIMD and no `unsafe`.
//!
//! Conventions shared by every type in here:
//! - Right-handed coordinates, cameras look down `-Z` by default.
//! - Matrices are stored column-major (`m[4 * col + row]`) and act on
//!   column vectors, so `a * b` applies `b` first.
//! - Quaternion products follow the same order: `p * q` applies `q` first.
//! - Angles are radians unless a function says degrees.

use std::fmt;

pub mod matrix;
pub mod quaternion;
pub mod vector;

pub use matrix::{Matrix, Plane};
pub use quaternion::Quaternion;
pub use vector::{Vector2, Vector3, Vector4};

/// Degeneracy guard for lengths, tangents and traces.
pub const EPSILON: f64 = 1e-6;

/// Singularity guard for determinants and axis scales.
pub const TOLERANCE: f64 = 1e-12;

/// Cutoff for sine near zero in quaternion slerp/exp/log.
pub const SLERP_EPSILON: f64 = 1e-3;

/// How far an externally supplied basis may stray from orthonormal.
pub const ORTHONORMAL_TOLERANCE: f64 = 1e-4;

/// Converts degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Converts radians to degrees.
#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Failures of math operations whose result is meaningless on bad input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// The matrix determinant is too close to zero to invert.
    SingularMatrix { determinant: f64 },
    /// `tan(fov / 2)` is undefined for this field of view.
    InvalidFieldOfView { degrees: f64 },
    /// Projection bounds collapse to a zero-width volume.
    DegenerateProjection,
    /// An axis scale is too close to zero to recover a rotation.
    DegenerateScale,
    /// A supplied basis is not orthonormal and right-handed.
    InvalidOrientation,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::SingularMatrix { determinant } => {
                write!(f, "matrix is singular (determinant {determinant})")
            }
            MathError::InvalidFieldOfView { degrees } => {
                write!(f, "invalid field of view {degrees} degrees")
            }
            MathError::DegenerateProjection => write!(f, "projection volume is degenerate"),
            MathError::DegenerateScale => write!(f, "axis scale too close to zero"),
            MathError::InvalidOrientation => write!(f, "basis is not orthonormal"),
        }
    }
}

impl std::error::Error for MathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_radian_conversion() {
        assert!((deg_to_rad(180.0) - std::f64::consts::PI).abs() < 1e-15);
        assert!((rad_to_deg(std::f64::consts::FRAC_PI_2) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn error_messages_are_lowercase() {
        let msg = MathError::InvalidFieldOfView { degrees: 180.0 }.to_string();
        assert_eq!(msg, "invalid field of view 180 degrees");
        assert_eq!(MathError::DegenerateScale.to_string(), "axis scale too close to zero");
    }
}
