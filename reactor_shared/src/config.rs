//! Configuration system.
//!
//! Loads engine configuration from JSON strings (file IO left to app).
//! Every field is optional; missing ones take the defaults below.

use serde::{Deserialize, Serialize};

use crate::camera::DEFAULT_REORTHONORMALIZE_EVERY;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// RGBA, each channel in `0.0..=1.0`.
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub fullscreen: bool,
}

/// Perspective parameters applied on every resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "default_fov_degrees")]
    pub fov_degrees: f64,
    #[serde(default = "default_near")]
    pub near: f64,
    #[serde(default = "default_far")]
    pub far: f64,
}

/// Speeds for the input-driven camera controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// World units per second along the view direction.
    #[serde(default = "default_move_speed")]
    pub move_speed: f64,
    #[serde(default = "default_move_speed")]
    pub strafe_speed: f64,
    #[serde(default = "default_climb_speed")]
    pub climb_speed: f64,
    /// Degrees per second for keyboard turning.
    #[serde(default = "default_turn_speed_degrees")]
    pub turn_speed_degrees: f64,
    /// Degrees per pixel of mouse movement.
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f64,
    /// Zero disables automatic re-orthonormalization.
    #[serde(default = "default_reorthonormalize_every")]
    pub reorthonormalize_every: u32,
}

fn default_clear_color() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_title() -> String {
    "Reactor".to_string()
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_fov_degrees() -> f64 {
    45.0
}

fn default_near() -> f64 {
    1.0
}

fn default_far() -> f64 {
    1000.0
}

fn default_move_speed() -> f64 {
    10.0
}

fn default_climb_speed() -> f64 {
    5.0
}

fn default_turn_speed_degrees() -> f64 {
    90.0
}

fn default_mouse_sensitivity() -> f64 {
    0.2
}

fn default_reorthonormalize_every() -> u32 {
    DEFAULT_REORTHONORMALIZE_EVERY
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            clear_color: default_clear_color(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            fullscreen: false,
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov_degrees(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_speed: default_move_speed(),
            strafe_speed: default_move_speed(),
            climb_speed: default_climb_speed(),
            turn_speed_degrees: default_turn_speed_degrees(),
            mouse_sensitivity: default_mouse_sensitivity(),
            reorthonormalize_every: default_reorthonormalize_every(),
        }
    }
}

impl EngineConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
