//! Input handling.
//!
//! The host (window layer, test, script) pushes key, mouse and joystick
//! events into an [`InputState`]; game code polls it once per frame.
//! [`CameraController`] turns the polled state into camera motion.

use bitflags::bitflags;
use reactor_shared::{
    camera::Camera,
    config::CameraConfig,
    math::{Vector2, Vector3},
};

pub const KEY_COUNT: usize = 256;
pub const JOY_BUTTON_COUNT: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left = 0,
    Middle = 1,
    Right = 2,
}

/// Polled input at a moment in time.
#[derive(Debug, Clone)]
pub struct InputState {
    keys: [bool; KEY_COUNT],
    mouse_buttons: [bool; 3],
    mouse: Vector2,
    /// Mouse position latched by the last `end_frame`.
    previous_mouse: Vector2,
    joystick: Vector3,
    /// Bit `i` set while joystick button `i` is held.
    joy_buttons: u32,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys: [false; KEY_COUNT],
            mouse_buttons: [false; 3],
            mouse: Vector2::ZERO,
            previous_mouse: Vector2::ZERO,
            joystick: Vector3::ZERO,
            joy_buttons: 0,
        }
    }
}

impl InputState {
    pub fn key_down(&mut self, key: u8) {
        self.keys[usize::from(key)] = true;
    }

    pub fn key_up(&mut self, key: u8) {
        self.keys[usize::from(key)] = false;
    }

    pub fn is_key_down(&self, key: u8) -> bool {
        self.keys[usize::from(key)]
    }

    pub fn is_key_up(&self, key: u8) -> bool {
        !self.is_key_down(key)
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        self.mouse_buttons[button as usize] = pressed;
    }

    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons[button as usize]
    }

    /// `(left, middle, right)` pressed states.
    pub fn mouse_button_state(&self) -> (bool, bool, bool) {
        let [left, middle, right] = self.mouse_buttons;
        (left, middle, right)
    }

    pub fn set_mouse(&mut self, x: f64, y: f64) {
        self.mouse = Vector2::new(x, y);
    }

    pub fn mouse(&self) -> Vector2 {
        self.mouse
    }

    /// Mouse movement since the last [`InputState::end_frame`].
    pub fn mouse_delta(&self) -> Vector2 {
        self.mouse - self.previous_mouse
    }

    /// Records the joystick button mask and axes in one event.
    pub fn set_joystick(&mut self, buttons: u32, x: f64, y: f64, z: f64) {
        self.joy_buttons = buttons;
        self.joystick = Vector3::new(x, y, z);
    }

    pub fn joystick(&self) -> Vector3 {
        self.joystick
    }

    pub fn is_joy_button_down(&self, button: usize) -> bool {
        button < JOY_BUTTON_COUNT && self.joy_buttons & (1 << button) != 0
    }

    /// Latches the mouse position so the next frame's delta starts at zero.
    pub fn end_frame(&mut self) {
        self.previous_mouse = self.mouse;
    }
}

bitflags! {
    /// Camera movement intents active this frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CameraBindings: u32 {
        const NONE = 0;
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const STRAFE_LEFT = 1 << 2;
        const STRAFE_RIGHT = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;
        const TURN_LEFT = 1 << 6;
        const TURN_RIGHT = 1 << 7;
        const LOOK_UP = 1 << 8;
        const LOOK_DOWN = 1 << 9;
        const ROLL_LEFT = 1 << 10;
        const ROLL_RIGHT = 1 << 11;
    }
}

impl Default for CameraBindings {
    fn default() -> Self {
        Self::NONE
    }
}

/// Key to intent table.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(u8, CameraBindings)>,
}

impl Default for KeyMap {
    /// WASD to move, R/F to climb, arrows to turn and look, Q/E to roll.
    fn default() -> Self {
        Self::new()
            .bind(b'w', CameraBindings::FORWARD)
            .bind(b's', CameraBindings::BACKWARD)
            .bind(b'a', CameraBindings::STRAFE_LEFT)
            .bind(b'd', CameraBindings::STRAFE_RIGHT)
            .bind(b'r', CameraBindings::UP)
            .bind(b'f', CameraBindings::DOWN)
            .bind(b'q', CameraBindings::ROLL_LEFT)
            .bind(b'e', CameraBindings::ROLL_RIGHT)
            .bind(keys::LEFT, CameraBindings::TURN_LEFT)
            .bind(keys::RIGHT, CameraBindings::TURN_RIGHT)
            .bind(keys::UP, CameraBindings::LOOK_UP)
            .bind(keys::DOWN, CameraBindings::LOOK_DOWN)
    }
}

impl KeyMap {
    /// An empty map.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn bind(mut self, key: u8, intent: CameraBindings) -> Self {
        self.bindings.push((key, intent));
        self
    }

    /// Union of the intents whose keys are held.
    pub fn active(&self, input: &InputState) -> CameraBindings {
        self.bindings
            .iter()
            .filter(|(key, _)| input.is_key_down(*key))
            .fold(CameraBindings::NONE, |acc, (_, intent)| acc | *intent)
    }
}

/// Special key codes, placed above the printable ASCII range.
pub mod keys {
    pub const ESCAPE: u8 = 27;
    pub const LEFT: u8 = 0x80 + 100;
    pub const UP: u8 = 0x80 + 101;
    pub const RIGHT: u8 = 0x80 + 102;
    pub const DOWN: u8 = 0x80 + 103;
}

/// Drives a [`Camera`] from polled input.
#[derive(Debug, Clone, Default)]
pub struct CameraController {
    pub config: CameraConfig,
    pub keymap: KeyMap,
}

impl CameraController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            keymap: KeyMap::default(),
        }
    }

    /// Applies one frame of input to `camera`. Returns the active intents.
    ///
    /// Opposing intents cancel. The mouse only turns the camera while the
    /// right button is held; screen `y` grows downwards.
    pub fn apply(&self, input: &InputState, camera: &mut Camera, dt: f64) -> CameraBindings {
        let intents = self.keymap.active(input);
        let axis = |pos: CameraBindings, neg: CameraBindings| -> f64 {
            f64::from(u8::from(intents.contains(pos))) - f64::from(u8::from(intents.contains(neg)))
        };

        let forward = axis(CameraBindings::FORWARD, CameraBindings::BACKWARD);
        let strafe = axis(CameraBindings::STRAFE_RIGHT, CameraBindings::STRAFE_LEFT);
        let climb = axis(CameraBindings::UP, CameraBindings::DOWN);
        if forward != 0.0 {
            camera.move_forward(forward * self.config.move_speed * dt);
        }
        if strafe != 0.0 {
            camera.strafe_right(strafe * self.config.strafe_speed * dt);
        }
        if climb != 0.0 {
            camera.move_upward(climb * self.config.climb_speed * dt);
        }

        let turn = self.config.turn_speed_degrees * dt;
        let yaw = axis(CameraBindings::TURN_RIGHT, CameraBindings::TURN_LEFT);
        let pitch = axis(CameraBindings::LOOK_UP, CameraBindings::LOOK_DOWN);
        let roll = axis(CameraBindings::ROLL_RIGHT, CameraBindings::ROLL_LEFT);
        if yaw != 0.0 {
            camera.rotate_y(yaw * turn);
        }
        if pitch != 0.0 {
            camera.rotate_x(pitch * turn);
        }
        if roll != 0.0 {
            camera.rotate_z(roll * turn);
        }

        if input.is_mouse_button_down(MouseButton::Right) {
            let delta = input.mouse_delta() * self.config.mouse_sensitivity;
            if delta.x != 0.0 {
                camera.rotate_y(delta.x);
            }
            if delta.y != 0.0 {
                camera.rotate_x(-delta.y);
            }
        }

        intents
    }
}
