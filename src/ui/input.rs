use crate::io::config::InputConfig;
use crate::scene::registry::SceneRegistry;
use log::debug;
use minifb::Key;
use nalgebra::Vector3;

/// What a recognised key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    CameraLeft,
    CameraRight,
    LightUp,
    LightDown,
}

/// Maps key presses to fixed camera and light nudges.
///
/// Each event applies one step; repeated events accumulate in arrival order.
#[derive(Debug, Clone, Copy)]
pub struct InputController {
    pub step: f32,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl InputController {
    pub fn new(step: f32) -> Self {
        Self { step }
    }

    pub fn from_config(config: &InputConfig) -> Self {
        Self::new(config.step)
    }

    /// Applies the effect bound to `key`. Unknown keys are ignored.
    pub fn handle_key(&self, key: &str, scene: &mut SceneRegistry) -> Option<KeyAction> {
        let action = match key {
            "a" => KeyAction::CameraLeft,
            "d" => KeyAction::CameraRight,
            "w" => KeyAction::LightUp,
            "s" => KeyAction::LightDown,
            _ => return None,
        };

        match action {
            KeyAction::CameraLeft => scene.camera_mut().translate(-Vector3::x() * self.step),
            KeyAction::CameraRight => scene.camera_mut().translate(Vector3::x() * self.step),
            KeyAction::LightUp => scene.light_source_mut().move_by(Vector3::y() * self.step),
            KeyAction::LightDown => scene.light_source_mut().move_by(-Vector3::y() * self.step),
        }
        debug!("Key '{}' -> {:?}", key, action);
        Some(action)
    }
}

/// String identifier for a window key, as understood by [`InputController::handle_key`].
pub fn key_identifier(key: Key) -> Option<&'static str> {
    match key {
        Key::A => Some("a"),
        Key::D => Some("d"),
        Key::W => Some("w"),
        Key::S => Some("s"),
        _ => None,
    }
}
