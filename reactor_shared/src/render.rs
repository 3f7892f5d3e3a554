//! Rendering abstraction.
//!
//! This crate intentionally does not depend on a graphics backend.
//! The camera and engine talk to whatever implements [`RenderBackend`].

use crate::math::{Matrix, Vector3};

/// The calls the camera and frame loop make into a renderer.
pub trait RenderBackend: Send + Sync {
    /// Clears the colour buffer to `color` (RGBA) unless `depth_only`, and
    /// always clears depth.
    fn clear(&mut self, color: [f32; 4], depth_only: bool);
    fn set_projection(&mut self, projection: &Matrix);
    fn set_look_at(&mut self, eye: Vector3, target: Vector3, up: Vector3);
    fn present(&mut self);
}

/// A no-op renderer useful for headless tests.
#[derive(Default)]
pub struct NullRenderer;

impl RenderBackend for NullRenderer {
    fn clear(&mut self, _color: [f32; 4], _depth_only: bool) {}
    fn set_projection(&mut self, _projection: &Matrix) {}
    fn set_look_at(&mut self, _eye: Vector3, _target: Vector3, _up: Vector3) {}
    fn present(&mut self) {}
}
