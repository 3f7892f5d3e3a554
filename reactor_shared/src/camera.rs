//! Free-fly camera.
//!
//! The camera keeps an orthonormal basis (right, up, view direction) and a
//! position, plus a cached world transform that always mirrors them:
//! column 0 = right, column 1 = up, column 2 = back (`-view_dir`),
//! column 3 = position.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::math::{deg_to_rad, MathError, Matrix, Vector3, ORTHONORMAL_TOLERANCE};
use crate::render::RenderBackend;

/// Rotations between automatic re-orthonormalizations.
pub const DEFAULT_REORTHONORMALIZE_EVERY: u32 = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    position: Vector3,
    view_dir: Vector3,
    right: Vector3,
    up: Vector3,
    /// Accumulated rotate_x/y/z angles in degrees.
    rotated: Vector3,
    world_transform: Matrix,
    reorthonormalize_every: u32,
    rotations_since_orthonormalize: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Camera at the origin looking down `-Z` with `+Y` up.
    pub fn new() -> Self {
        let mut camera = Self {
            position: Vector3::ZERO,
            view_dir: Vector3::NEGATIVE_UNIT_Z,
            right: Vector3::UNIT_X,
            up: Vector3::UNIT_Y,
            rotated: Vector3::ZERO,
            world_transform: Matrix::IDENTITY,
            reorthonormalize_every: DEFAULT_REORTHONORMALIZE_EVERY,
            rotations_since_orthonormalize: 0,
        };
        camera.sync_world_transform();
        camera
    }

    /// Sets how many rotations may accumulate before the basis is
    /// re-orthonormalized. Zero disables the automatic pass.
    pub fn with_reorthonormalize_every(mut self, rotations: u32) -> Self {
        self.reorthonormalize_every = rotations;
        self
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn view_dir(&self) -> Vector3 {
        self.view_dir
    }

    pub fn right(&self) -> Vector3 {
        self.right
    }

    pub fn up(&self) -> Vector3 {
        self.up
    }

    pub fn rotated(&self) -> Vector3 {
        self.rotated
    }

    /// Point one unit ahead of the camera.
    pub fn look_at(&self) -> Vector3 {
        self.position + self.view_dir
    }

    /// Camera-to-world transform. The view matrix proper is its inverse,
    /// see [`Camera::world_to_view`].
    pub fn world_transform(&self) -> &Matrix {
        &self.world_transform
    }

    /// View matrix: the world-to-camera transform, the inverse of
    /// [`Camera::world_transform`].
    pub fn world_to_view(&self) -> Matrix {
        Matrix::create_look_at(self.position, self.look_at(), self.up)
    }

    /// Replaces the basis and position with those of `m`.
    ///
    /// `m` must hold a right-handed orthonormal basis in the camera column
    /// layout. Otherwise the camera is left untouched.
    pub fn set_world_transform(&mut self, m: &Matrix) -> Result<(), MathError> {
        let right = m.right();
        let up = m.up();
        let view_dir = m.forward();

        let unit = |v: Vector3| (v.length() - 1.0).abs() <= ORTHONORMAL_TOLERANCE;
        let orthonormal = unit(right)
            && unit(up)
            && unit(view_dir)
            && right.dot(up).abs() <= ORTHONORMAL_TOLERANCE
            && right.dot(view_dir).abs() <= ORTHONORMAL_TOLERANCE
            && up.dot(view_dir).abs() <= ORTHONORMAL_TOLERANCE;
        let right_handed = right.cross(up).dot(view_dir) < 0.0;

        if !orthonormal || !right_handed {
            warn!(
                ?right,
                ?up,
                ?view_dir,
                right_handed,
                "rejecting camera transform without an orthonormal basis"
            );
            return Err(MathError::InvalidOrientation);
        }

        self.right = right;
        self.up = up;
        self.view_dir = view_dir;
        self.position = m.position();
        self.rotations_since_orthonormalize = 0;
        self.sync_world_transform();
        Ok(())
    }

    /// Hands the current eye, target and up vector to `renderer`.
    pub fn set(&self, renderer: &mut dyn RenderBackend) {
        renderer.set_look_at(self.position, self.look_at(), self.up);
    }

    /// Translates by a world-space offset.
    pub fn move_by(&mut self, direction: Vector3) {
        self.position += direction;
        self.sync_world_transform();
    }

    /// Translates relative to the basis: `left` along `-right`, `front`
    /// along the view direction and `up` along the up vector.
    pub fn move_local(&mut self, left: f64, front: f64, up: f64) {
        self.move_by(self.right * -left + self.view_dir * front + self.up * up);
    }

    /// Moves towards what the camera is looking at.
    pub fn move_forward(&mut self, distance: f64) {
        self.move_by(self.view_dir * distance);
    }

    pub fn strafe_right(&mut self, distance: f64) {
        self.move_by(self.right * distance);
    }

    pub fn move_upward(&mut self, distance: f64) {
        self.move_by(self.up * distance);
    }

    /// Pitch: tilts the view direction towards up.
    pub fn rotate_x(&mut self, degrees: f64) {
        self.rotated.x += degrees;
        let (s, c) = deg_to_rad(degrees).sin_cos();

        self.view_dir = (self.view_dir * c + self.up * s).normalize();
        self.up = self.right.cross(self.view_dir);
        self.after_rotation();
    }

    /// Yaw: turns the view direction towards right.
    pub fn rotate_y(&mut self, degrees: f64) {
        self.rotated.y += degrees;
        let (s, c) = deg_to_rad(degrees).sin_cos();

        self.view_dir = (self.view_dir * c + self.right * s).normalize();
        self.right = self.view_dir.cross(self.up);
        self.after_rotation();
    }

    /// Roll: turns the right vector towards up.
    pub fn rotate_z(&mut self, degrees: f64) {
        self.rotated.z += degrees;
        let (s, c) = deg_to_rad(degrees).sin_cos();

        self.right = (self.right * c + self.up * s).normalize();
        self.up = self.right.cross(self.view_dir);
        self.after_rotation();
    }

    /// Gram-Schmidt pass that keeps the view direction and rebuilds right
    /// and up from it.
    pub fn orthonormalize(&mut self) {
        let view_dir = self.view_dir.normalize();
        let right = view_dir.cross(self.up).normalize();
        if right.is_zero_length() {
            // Up collapsed onto the view direction; nothing to rebuild from.
            warn!(view_dir = ?self.view_dir, up = ?self.up, "camera basis is degenerate");
            self.rotations_since_orthonormalize = 0;
            self.sync_world_transform();
            return;
        }
        self.view_dir = view_dir;
        self.right = right;
        self.up = right.cross(view_dir);
        self.rotations_since_orthonormalize = 0;
        debug!(
            view_dir = ?self.view_dir,
            up = ?self.up,
            "re-orthonormalized camera basis"
        );
        self.sync_world_transform();
    }

    fn after_rotation(&mut self) {
        self.rotations_since_orthonormalize += 1;
        if self.reorthonormalize_every != 0
            && self.rotations_since_orthonormalize >= self.reorthonormalize_every
        {
            self.orthonormalize();
        } else {
            self.sync_world_transform();
        }
    }

    fn sync_world_transform(&mut self) {
        self.world_transform.set_column(0, self.right, 0.0);
        self.world_transform.set_column(1, self.up, 0.0);
        self.world_transform.set_column(2, -self.view_dir, 0.0);
        self.world_transform.set_column(3, self.position, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn assert_orthonormal(camera: &Camera, epsilon: f64) {
        let (r, u, v) = (camera.right(), camera.up(), camera.view_dir());
        assert_abs_diff_eq!(r.length(), 1.0, epsilon = epsilon);
        assert_abs_diff_eq!(u.length(), 1.0, epsilon = epsilon);
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = epsilon);
        assert_abs_diff_eq!(r.dot(u), 0.0, epsilon = epsilon);
        assert_abs_diff_eq!(r.dot(v), 0.0, epsilon = epsilon);
        assert_abs_diff_eq!(u.dot(v), 0.0, epsilon = epsilon);
    }

    fn assert_matrix_matches_basis(camera: &Camera) {
        let m = camera.world_transform();
        assert_eq!(m.right(), camera.right());
        assert_eq!(m.up(), camera.up());
        assert_eq!(m.forward(), camera.view_dir());
        assert_eq!(m.position(), camera.position());
        assert_eq!([m.m[3], m.m[7], m.m[11], m.m[15]], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn starts_at_origin_looking_down_negative_z() {
        let camera = Camera::new();
        assert_eq!(camera.position(), Vector3::ZERO);
        assert_eq!(camera.view_dir(), Vector3::NEGATIVE_UNIT_Z);
        assert_eq!(camera.right(), Vector3::UNIT_X);
        assert_eq!(camera.up(), Vector3::UNIT_Y);
        assert!(camera.world_transform().is_identity());
    }

    #[test]
    fn move_forward_follows_view_dir() {
        let mut camera = Camera::new();
        camera.move_forward(5.0);
        assert_eq!(camera.position(), Vector3::new(0.0, 0.0, -5.0));
        assert_eq!(camera.world_transform().position(), Vector3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn strafe_and_climb() {
        let mut camera = Camera::new();
        camera.strafe_right(2.0);
        camera.move_upward(3.0);
        assert_eq!(camera.position(), Vector3::new(2.0, 3.0, 0.0));
        camera.move_by(Vector3::new(-2.0, 0.0, 1.0));
        assert_eq!(camera.position(), Vector3::new(0.0, 3.0, 1.0));
    }

    #[test]
    fn move_local_uses_basis() {
        let mut camera = Camera::new();
        camera.move_local(1.0, 2.0, 3.0);
        assert_eq!(camera.position(), Vector3::new(-1.0, 3.0, -2.0));
        assert_matrix_matches_basis(&camera);
    }

    #[test]
    fn yaw_turns_towards_right() {
        let mut camera = Camera::new();
        camera.rotate_y(90.0);
        assert_abs_diff_eq!(camera.view_dir(), Vector3::UNIT_X, epsilon = 1e-12);
        assert_abs_diff_eq!(camera.right(), Vector3::UNIT_Z, epsilon = 1e-12);
        assert_eq!(camera.up(), Vector3::UNIT_Y);
        assert_eq!(camera.rotated(), Vector3::new(0.0, 90.0, 0.0));
    }

    #[test]
    fn pitch_and_roll() {
        let mut camera = Camera::new();
        camera.rotate_x(90.0);
        assert_abs_diff_eq!(camera.view_dir(), Vector3::UNIT_Y, epsilon = 1e-12);
        assert_abs_diff_eq!(camera.up(), Vector3::UNIT_Z, epsilon = 1e-12);

        let mut camera = Camera::new();
        camera.rotate_z(90.0);
        assert_abs_diff_eq!(camera.right(), Vector3::UNIT_Y, epsilon = 1e-12);
        assert_abs_diff_eq!(camera.up(), Vector3::NEGATIVE_UNIT_X, epsilon = 1e-12);
        assert_eq!(camera.view_dir(), Vector3::NEGATIVE_UNIT_Z);
    }

    #[test]
    fn basis_stays_orthonormal_under_mixed_rotations() {
        let mut camera = Camera::new().with_reorthonormalize_every(0);
        for i in 0..2_000 {
            let angle = 0.37 + (i % 7) as f64;
            match i % 3 {
                0 => camera.rotate_x(angle),
                1 => camera.rotate_y(-angle),
                _ => camera.rotate_z(angle * 0.5),
            }
        }
        assert_orthonormal(&camera, 1e-6);
        assert_matrix_matches_basis(&camera);
    }

    #[test]
    fn orthonormalize_repairs_drift() {
        let mut camera = Camera::new();
        camera.up = Vector3::new(0.1, 1.2, 0.05);
        camera.orthonormalize();
        assert_orthonormal(&camera, 1e-12);
        assert_eq!(camera.view_dir(), Vector3::NEGATIVE_UNIT_Z);
        assert_matrix_matches_basis(&camera);
    }

    #[test]
    fn orthonormalize_with_collapsed_up_still_syncs() {
        let mut camera = Camera::new();
        camera.rotate_y(30.0);
        camera.up = camera.view_dir;
        camera.rotations_since_orthonormalize = 5;
        camera.orthonormalize();
        assert_eq!(camera.rotations_since_orthonormalize, 0);
        assert_matrix_matches_basis(&camera);
    }

    #[test]
    fn world_to_view_inverts_camera_transform() {
        let mut camera = Camera::new();
        camera.rotate_y(30.0);
        camera.rotate_x(-20.0);
        camera.move_local(1.0, 4.0, -2.0);
        let expected = camera.world_transform().invert().unwrap();
        assert_abs_diff_eq!(camera.world_to_view(), expected, epsilon = 1e-9);
        assert_abs_diff_eq!(
            camera.world_to_view().transform_point(camera.look_at()),
            Vector3::new(0.0, 0.0, -1.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn set_world_transform_accepts_rigid_transform() {
        let mut source = Camera::new();
        source.rotate_y(45.0);
        source.rotate_x(10.0);
        source.move_forward(3.0);

        let mut camera = Camera::new();
        camera.set_world_transform(source.world_transform()).unwrap();
        assert_eq!(camera.position(), source.position());
        assert_eq!(camera.view_dir(), source.view_dir());
        assert_eq!(camera.world_transform(), source.world_transform());
    }

    #[test]
    fn set_world_transform_rejects_skewed_or_mirrored_basis() {
        let mut camera = Camera::new();
        camera.move_forward(1.0);
        let before = camera.clone();

        let scaled = Matrix::create_scale(Vector3::new(2.0, 1.0, 1.0));
        assert_eq!(camera.set_world_transform(&scaled), Err(MathError::InvalidOrientation));

        let mirrored = Matrix::create_scale(Vector3::new(-1.0, 1.0, 1.0));
        assert_eq!(camera.set_world_transform(&mirrored), Err(MathError::InvalidOrientation));

        assert_eq!(camera, before);
    }
}
