pub mod input;

use strum::EnumIter;
use winit::keyboard::KeyCode;

/// A user action, independent of the key it is bound to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Control {
    CameraLeft,
    CameraRight,
    ZoomIn,
    ZoomOut,
    CameraUp,
    CameraDown,
    LightLeft,
    LightRight,
    LightIn,
    LightOut,
    LightUp,
    LightDown,
    ToggleShading,
    ToggleProjection,
    Material1,
    Material2,
    Material3,
    Exit,
}

impl Control {
    /// Edge-triggered controls fire once per press, the rest act every frame while held.
    pub fn is_edge_triggered(self) -> bool {
        matches!(
            self,
            Control::ToggleShading
                | Control::ToggleProjection
                | Control::Material1
                | Control::Material2
                | Control::Material3
                | Control::Exit
        )
    }
}

pub const KEY_BINDINGS: &[(KeyCode, Control)] = &[
    (KeyCode::KeyA, Control::CameraLeft),
    (KeyCode::KeyD, Control::CameraRight),
    (KeyCode::KeyW, Control::ZoomIn),
    (KeyCode::KeyS, Control::ZoomOut),
    (KeyCode::KeyQ, Control::CameraUp),
    (KeyCode::KeyE, Control::CameraDown),
    (KeyCode::ArrowLeft, Control::LightLeft),
    (KeyCode::ArrowRight, Control::LightRight),
    (KeyCode::KeyI, Control::LightIn),
    (KeyCode::KeyK, Control::LightOut),
    (KeyCode::KeyU, Control::LightUp),
    (KeyCode::KeyO, Control::LightDown),
    (KeyCode::KeyG, Control::ToggleShading),
    (KeyCode::KeyP, Control::ToggleProjection),
    (KeyCode::Digit1, Control::Material1),
    (KeyCode::Digit2, Control::Material2),
    (KeyCode::Digit3, Control::Material3),
    (KeyCode::Escape, Control::Exit),
];

pub fn control_for_key(key: KeyCode) -> Option<Control> {
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, control)| *control)
}

pub const CONTROLS_HELP: &str = "Controls: A/D orbit camera, W/S zoom, Q/E camera height, \
    Left/Right orbit light, I/K light radius, U/O light height, G toggle shading, \
    P toggle projection, 1/2/3 material, Esc exit";

#[cfg(test)]
mod tests {
    use ahash::AHashSet;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_control_has_one_key() {
        for control in Control::iter() {
            let count = KEY_BINDINGS.iter().filter(|(_, bound)| *bound == control).count();
            assert_eq!(count, 1, "{control:?}");
        }
        let keys = KEY_BINDINGS.iter().map(|(key, _)| *key).collect::<AHashSet<_>>();
        assert_eq!(keys.len(), KEY_BINDINGS.len());
    }

    #[test]
    fn lookup() {
        assert_eq!(control_for_key(KeyCode::KeyG), Some(Control::ToggleShading));
        assert_eq!(control_for_key(KeyCode::ArrowRight), Some(Control::LightRight));
        assert_eq!(control_for_key(KeyCode::KeyZ), None);
        assert!(Control::Exit.is_edge_triggered());
        assert!(!Control::ZoomIn.is_edge_triggered());
    }
}
