//! Shared fixtures for the integration tests.
//!
//! Random inputs come from a seeded `StdRng` so failures reproduce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reactor_shared::{
    math::{Matrix, Quaternion, Vector3},
    render::RenderBackend,
};

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Vector with components in `-extent..extent`.
pub fn random_vector(rng: &mut StdRng, extent: f64) -> Vector3 {
    Vector3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

/// Unit vector, rejecting near-zero samples.
pub fn random_unit_vector(rng: &mut StdRng) -> Vector3 {
    loop {
        let v = random_vector(rng, 1.0);
        let len = v.length();
        if len > 0.1 && len <= 1.0 {
            return v / len;
        }
    }
}

pub fn random_rotation(rng: &mut StdRng) -> Quaternion {
    let angle = rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI);
    Quaternion::from_angle_axis(angle, random_unit_vector(rng))
}

/// Scale with every component in `0.25..4` and a random sign on each axis.
pub fn random_scale(rng: &mut StdRng) -> Vector3 {
    let mut component = || {
        let s = rng.gen_range(0.25..4.0);
        if rng.gen_bool(0.5) {
            -s
        } else {
            s
        }
    };
    Vector3::new(component(), component(), component())
}

/// `T * R * S`.
pub fn compose(scale: Vector3, rotation: &Quaternion, translation: Vector3) -> Matrix {
    Matrix::create_translation(translation)
        * Matrix::create_from_quaternion(rotation)
        * Matrix::create_scale(scale)
}

/// One recorded [`RenderBackend`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Clear { color: [f32; 4], depth_only: bool },
    SetProjection(Matrix),
    SetLookAt { eye: Vector3, target: Vector3, up: Vector3 },
    Present,
}

/// Renderer that records every call for later inspection.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn presents(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::Present))
            .count()
    }

    pub fn last_look_at(&self) -> Option<(Vector3, Vector3, Vector3)> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::SetLookAt { eye, target, up } => Some((*eye, *target, *up)),
            _ => None,
        })
    }
}

impl RenderBackend for RecordingRenderer {
    fn clear(&mut self, color: [f32; 4], depth_only: bool) {
        self.calls.push(RenderCall::Clear { color, depth_only });
    }

    fn set_projection(&mut self, projection: &Matrix) {
        self.calls.push(RenderCall::SetProjection(*projection));
    }

    fn set_look_at(&mut self, eye: Vector3, target: Vector3, up: Vector3) {
        self.calls.push(RenderCall::SetLookAt { eye, target, up });
    }

    fn present(&mut self) {
        self.calls.push(RenderCall::Present);
    }
}
