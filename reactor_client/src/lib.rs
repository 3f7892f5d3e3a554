//! `reactor_client`
//!
//! Client-side systems:
//! - Input polling and the input-driven camera controller
//! - The engine context (camera, projection, frame counter)
//! - The game callback trait and a headless frame runner

pub mod engine;
pub mod game;
pub mod input;

pub use engine::Engine;
pub use game::{run_headless, Game, RunSummary};
