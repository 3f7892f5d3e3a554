//! `reactor_shared`
//!
//! Math core and camera shared by the client and the tests.
//!
//! Design goals:
//! - Plain value types, no global state.
//! - Fallible math returns `Result`/`Option` instead of sentinel values.
//! - Rendering behind a trait so everything runs headless.
//! - No `unsafe`.

pub mod camera;
pub mod config;
pub mod math;
pub mod render;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::camera::*;
    pub use crate::config::*;
    pub use crate::math::*;
    pub use crate::render::*;
}
