//! Engine context.
//!
//! One `Engine` is built at startup and passed by `&mut` to the code that
//! needs it. It owns the configuration, the active camera, the projection
//! and the polled input.

use reactor_shared::{
    camera::Camera,
    config::EngineConfig,
    math::{MathError, Matrix},
    render::RenderBackend,
};
use tracing::debug;

use crate::input::InputState;

pub struct Engine {
    config: EngineConfig,
    pub camera: Camera,
    pub input: InputState,
    pub clear_color: [f32; 4],
    projection: Matrix,
    viewport: (u32, u32),
    frame: u64,
    exit_requested: bool,
}

impl Engine {
    /// Builds the context and its initial projection from the window size.
    pub fn new(config: EngineConfig) -> Result<Self, MathError> {
        let camera = Camera::new().with_reorthonormalize_every(config.camera.reorthonormalize_every);
        let mut engine = Self {
            clear_color: config.clear_color,
            camera,
            input: InputState::default(),
            projection: Matrix::IDENTITY,
            viewport: (0, 0),
            frame: 0,
            exit_requested: false,
            config,
        };
        engine.resize(engine.config.window.width, engine.config.window.height)?;
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn projection(&self) -> &Matrix {
        &self.projection
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Rebuilds the perspective for a new viewport. A zero height is
    /// treated as 1.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), MathError> {
        let height = height.max(1);
        let aspect = f64::from(width) / f64::from(height);
        let p = &self.config.projection;
        self.projection = Matrix::create_perspective(p.fov_degrees, aspect, p.near, p.far)?;
        self.viewport = (width, height);
        debug!(width, height, aspect, "viewport resized");
        Ok(())
    }

    /// Clears depth, and colour too unless `depth_only`.
    pub fn clear(&self, renderer: &mut dyn RenderBackend, depth_only: bool) {
        renderer.clear(self.clear_color, depth_only);
    }

    /// Loads the projection and camera into `renderer` and clears.
    pub fn begin_frame(&self, renderer: &mut dyn RenderBackend) {
        renderer.set_projection(&self.projection);
        self.clear(renderer, false);
        self.camera.set(renderer);
    }

    pub fn end_frame(&mut self, renderer: &mut dyn RenderBackend) {
        renderer.present();
        self.input.end_frame();
        self.frame += 1;
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

#[cfg(test)]
mod tests {
    use reactor_shared::config::ProjectionConfig;
    use reactor_shared::render::NullRenderer;

    use super::*;

    #[test]
    fn builds_projection_from_window_size() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.viewport(), (800, 600));
        let expected = Matrix::create_perspective(45.0, 800.0 / 600.0, 1.0, 1000.0).unwrap();
        assert_eq!(engine.projection(), &expected);
    }

    #[test]
    fn zero_height_is_clamped() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.resize(640, 0).unwrap();
        assert_eq!(engine.viewport(), (640, 1));
        let expected = Matrix::create_perspective(45.0, 640.0, 1.0, 1000.0).unwrap();
        assert_eq!(engine.projection(), &expected);
    }

    #[test]
    fn bad_field_of_view_is_reported() {
        let mut config = EngineConfig::default();
        config.projection = ProjectionConfig {
            fov_degrees: 180.0,
            ..ProjectionConfig::default()
        };
        assert!(matches!(
            Engine::new(config),
            Err(MathError::InvalidFieldOfView { .. })
        ));
    }

    #[test]
    fn frames_count_and_exit_flag() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut renderer = NullRenderer;
        engine.begin_frame(&mut renderer);
        engine.end_frame(&mut renderer);
        assert_eq!(engine.frame(), 1);
        assert!(!engine.exit_requested());
        engine.request_exit();
        assert!(engine.exit_requested());
    }
}
