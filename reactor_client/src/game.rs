//! Game loop.
//!
//! A [`Game`] supplies the per-frame callbacks; [`run_headless`] drives them
//! against a [`RenderBackend`] without a window.

use reactor_shared::render::RenderBackend;
use tracing::{debug, info};

use crate::engine::Engine;

/// Frames between progress log lines.
const LOG_EVERY_FRAMES: u64 = 60;

pub trait Game {
    fn load(&mut self, _engine: &mut Engine) -> anyhow::Result<()> {
        Ok(())
    }

    /// Advances the simulation by `dt` seconds.
    fn update(&mut self, engine: &mut Engine, dt: f64) -> anyhow::Result<()>;

    /// Issues draw calls. The camera and projection are already loaded.
    fn render(&mut self, _engine: &mut Engine, _renderer: &mut dyn RenderBackend) -> anyhow::Result<()> {
        Ok(())
    }

    fn unload(&mut self, _engine: &mut Engine) {}
}

/// Outcome of a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    /// The game called `Engine::request_exit` before the frame budget ran out.
    pub exited_early: bool,
}

/// Runs `game` for at most `frames` frames of `dt` seconds each.
///
/// `unload` runs even when a callback fails; the first error is returned
/// afterwards.
pub fn run_headless(
    game: &mut dyn Game,
    engine: &mut Engine,
    renderer: &mut dyn RenderBackend,
    frames: u64,
    dt: f64,
) -> anyhow::Result<RunSummary> {
    game.load(engine)?;
    info!(frames, dt, "game loaded");

    let result = run_frames(game, engine, renderer, frames, dt);

    game.unload(engine);
    info!(frames = engine.frame(), "game unloaded");
    result
}

fn run_frames(
    game: &mut dyn Game,
    engine: &mut Engine,
    renderer: &mut dyn RenderBackend,
    frames: u64,
    dt: f64,
) -> anyhow::Result<RunSummary> {
    let mut run = 0;
    while run < frames {
        game.update(engine, dt)?;
        if engine.exit_requested() {
            return Ok(RunSummary {
                frames: run,
                exited_early: true,
            });
        }

        engine.begin_frame(renderer);
        game.render(engine, renderer)?;
        engine.end_frame(renderer);
        run += 1;

        if run % LOG_EVERY_FRAMES == 0 {
            debug!(
                frame = engine.frame(),
                position = ?engine.camera.position(),
                view_dir = ?engine.camera.view_dir(),
                "frame"
            );
        }
    }
    Ok(RunSummary {
        frames: run,
        exited_early: false,
    })
}

#[cfg(test)]
mod tests {
    use reactor_shared::config::EngineConfig;
    use reactor_shared::render::NullRenderer;

    use super::*;

    #[derive(Default)]
    struct Counting {
        loaded: bool,
        updates: u64,
        renders: u64,
        unloaded: bool,
        exit_after: Option<u64>,
        fail_at: Option<u64>,
    }

    impl Game for Counting {
        fn load(&mut self, _engine: &mut Engine) -> anyhow::Result<()> {
            self.loaded = true;
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, _dt: f64) -> anyhow::Result<()> {
            self.updates += 1;
            if self.fail_at == Some(self.updates) {
                anyhow::bail!("update {} failed", self.updates);
            }
            if self.exit_after == Some(self.updates) {
                engine.request_exit();
            }
            Ok(())
        }

        fn render(&mut self, _engine: &mut Engine, _renderer: &mut dyn RenderBackend) -> anyhow::Result<()> {
            self.renders += 1;
            Ok(())
        }

        fn unload(&mut self, _engine: &mut Engine) {
            self.unloaded = true;
        }
    }

    fn engine() -> Engine {
        Engine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn runs_full_frame_budget() {
        let mut game = Counting::default();
        let mut engine = engine();
        let summary = run_headless(&mut game, &mut engine, &mut NullRenderer, 5, 0.016).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                frames: 5,
                exited_early: false
            }
        );
        assert!(game.loaded && game.unloaded);
        assert_eq!((game.updates, game.renders), (5, 5));
        assert_eq!(engine.frame(), 5);
    }

    #[test]
    fn exit_request_stops_before_render() {
        let mut game = Counting {
            exit_after: Some(3),
            ..Counting::default()
        };
        let mut engine = engine();
        let summary = run_headless(&mut game, &mut engine, &mut NullRenderer, 100, 0.016).unwrap();
        assert!(summary.exited_early);
        assert_eq!(summary.frames, 2);
        assert_eq!(game.renders, 2);
        assert!(game.unloaded);
    }

    #[test]
    fn failing_update_still_unloads() {
        let mut game = Counting {
            fail_at: Some(2),
            ..Counting::default()
        };
        let mut engine = engine();
        let err = run_headless(&mut game, &mut engine, &mut NullRenderer, 10, 0.016).unwrap_err();
        assert_eq!(err.to_string(), "update 2 failed");
        assert!(game.unloaded);
    }
}
