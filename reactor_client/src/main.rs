//! Headless fly-through demo.
//!
//! Usage:
//!   cargo run -p reactor_client -- [--config reactor.json] [--frames 600] [--dt 0.016]
//!
//! Scripts a short camera path through the input layer (fly forward, mouse
//! look, strafe and climb), runs it against a null renderer and logs where
//! the camera ends up.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use reactor_client::{
    input::{keys, CameraController, MouseButton},
    run_headless, Engine, Game,
};
use reactor_shared::{config::EngineConfig, render::NullRenderer};
use tracing::info;

struct Args {
    config: Option<PathBuf>,
    frames: u64,
    dt: f64,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut parsed = Args {
        config: None,
        frames: 600,
        dt: 1.0 / 60.0,
    };
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                parsed.config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--frames" if i + 1 < args.len() => {
                parsed.frames = args[i + 1].parse().context("parse --frames")?;
                i += 2;
            }
            "--dt" if i + 1 < args.len() => {
                parsed.dt = args[i + 1].parse().context("parse --dt")?;
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(parsed)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    EngineConfig::from_json_str(&text).context("parse config")
}

/// Feeds scripted input into the engine, one phase per quarter of the run.
struct FlyThrough {
    controller: CameraController,
    total_frames: u64,
    frame: u64,
}

impl Game for FlyThrough {
    fn load(&mut self, engine: &mut Engine) -> anyhow::Result<()> {
        self.controller = CameraController::new(engine.config().camera.clone());
        info!(title = %engine.config().window.title, "fly-through loaded");
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, dt: f64) -> anyhow::Result<()> {
        let quarter = (self.total_frames / 4).max(1);
        let phase = self.frame / quarter;
        let input = &mut engine.input;

        for key in [b'w', b'd', b'r'] {
            input.key_up(key);
        }
        input.set_mouse_button(MouseButton::Right, false);

        match phase {
            0 => input.key_down(b'w'),
            1 => {
                input.set_mouse_button(MouseButton::Right, true);
                let mouse = input.mouse();
                input.set_mouse(mouse.x + 2.0, mouse.y);
            }
            2 => {
                input.key_down(b'd');
                input.key_down(b'r');
            }
            _ => input.key_down(b'w'),
        }
        if self.frame + 1 >= self.total_frames {
            input.key_down(keys::ESCAPE);
        }

        self.controller.apply(&engine.input, &mut engine.camera, dt);
        if engine.input.is_key_down(keys::ESCAPE) {
            engine.request_exit();
        }
        self.frame += 1;
        Ok(())
    }

    fn unload(&mut self, engine: &mut Engine) {
        let camera = &engine.camera;
        info!(
            position = ?camera.position(),
            view_dir = ?camera.view_dir(),
            up = ?camera.up(),
            rotated = ?camera.rotated(),
            "fly-through finished"
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_ref())?;
    info!(frames = args.frames, dt = args.dt, "Starting reactor");

    let mut engine = Engine::new(config).context("create engine")?;
    let mut game = FlyThrough {
        controller: CameraController::default(),
        total_frames: args.frames,
        frame: 0,
    };
    let summary = run_headless(&mut game, &mut engine, &mut NullRenderer, args.frames, args.dt)?;
    info!(frames = summary.frames, exited_early = summary.exited_early, "Done");
    Ok(())
}
