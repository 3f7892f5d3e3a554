//! Headless runs of the engine loop against a recording renderer.

use approx::assert_abs_diff_eq;
use reactor_client::input::{keys, CameraController};
use reactor_client::{run_headless, Engine, Game};
use reactor_shared::config::EngineConfig;
use reactor_shared::math::{Matrix, Vector3};
use reactor_shared::render::RenderBackend;
use reactor_tests::{init_tracing, RecordingRenderer, RenderCall};

/// Holds `key` every frame and drives the camera from input.
struct HoldKey {
    key: u8,
    controller: CameraController,
    rendered: usize,
}

impl HoldKey {
    fn new(key: u8, engine: &Engine) -> Self {
        Self {
            key,
            controller: CameraController::new(engine.config().camera.clone()),
            rendered: 0,
        }
    }
}

impl Game for HoldKey {
    fn update(&mut self, engine: &mut Engine, dt: f64) -> anyhow::Result<()> {
        engine.input.key_down(self.key);
        self.controller.apply(&engine.input, &mut engine.camera, dt);
        if engine.input.is_key_down(keys::ESCAPE) {
            engine.request_exit();
        }
        Ok(())
    }

    fn render(&mut self, _engine: &mut Engine, _renderer: &mut dyn RenderBackend) -> anyhow::Result<()> {
        self.rendered += 1;
        Ok(())
    }
}

fn config() -> EngineConfig {
    EngineConfig::from_json_str(
        r#"{
            "window": { "width": 1024, "height": 768 },
            "camera": { "move_speed": 3.0 },
            "clear_color": [0.1, 0.2, 0.3, 1.0]
        }"#,
    )
    .unwrap()
}

#[test]
fn holding_forward_flies_along_view_dir() -> anyhow::Result<()> {
    init_tracing();
    let mut engine = Engine::new(config())?;
    let mut game = HoldKey::new(b'w', &engine);
    let mut renderer = RecordingRenderer::default();

    let summary = run_headless(&mut game, &mut engine, &mut renderer, 10, 0.1)?;
    assert_eq!(summary.frames, 10);
    assert!(!summary.exited_early);
    assert_eq!(game.rendered, 10);
    assert_eq!(renderer.presents(), 10);
    assert_abs_diff_eq!(engine.camera.position(), Vector3::new(0.0, 0.0, -3.0), epsilon = 1e-12);
    Ok(())
}

#[test]
fn frame_issues_projection_clear_look_at_present() -> anyhow::Result<()> {
    let mut engine = Engine::new(config())?;
    let mut game = HoldKey::new(b'd', &engine);
    let mut renderer = RecordingRenderer::default();
    run_headless(&mut game, &mut engine, &mut renderer, 1, 1.0)?;

    let projection = Matrix::create_perspective(45.0, 1024.0 / 768.0, 1.0, 1000.0)?;
    let eye = Vector3::new(10.0, 0.0, 0.0);
    assert_eq!(
        renderer.calls,
        vec![
            RenderCall::SetProjection(projection),
            RenderCall::Clear {
                color: [0.1, 0.2, 0.3, 1.0],
                depth_only: false,
            },
            RenderCall::SetLookAt {
                eye,
                target: eye + Vector3::NEGATIVE_UNIT_Z,
                up: Vector3::UNIT_Y,
            },
            RenderCall::Present,
        ]
    );
    Ok(())
}

#[test]
fn escape_requests_exit() -> anyhow::Result<()> {
    let mut engine = Engine::new(EngineConfig::default())?;
    let mut game = HoldKey::new(keys::ESCAPE, &engine);
    let mut renderer = RecordingRenderer::default();

    let summary = run_headless(&mut game, &mut engine, &mut renderer, 50, 0.016)?;
    assert!(summary.exited_early);
    assert_eq!(summary.frames, 0);
    assert!(renderer.calls.is_empty());
    Ok(())
}

#[test]
fn resize_rebuilds_projection() -> anyhow::Result<()> {
    let mut engine = Engine::new(EngineConfig::default())?;
    engine.resize(1920, 1080)?;
    let p = engine.projection();
    assert_abs_diff_eq!(p.m[5] / p.m[0], 1920.0 / 1080.0, epsilon = 1e-12);
    assert_eq!(p.m[11], -1.0);

    engine.resize(300, 0)?;
    assert_eq!(engine.viewport(), (300, 1));
    Ok(())
}
