use mapwalk::Key;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Physical key to logical key. Physical codes keep WASD in place on
/// non-QWERTY layouts.
pub fn logical_key(key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };

    let key = match code {
        KeyCode::KeyW => Key::MoveForward,
        KeyCode::KeyS => Key::MoveBack,
        KeyCode::KeyA => Key::MoveLeft,
        KeyCode::KeyD => Key::MoveRight,
        KeyCode::ArrowUp => Key::PanUp,
        KeyCode::ArrowDown => Key::PanDown,
        KeyCode::ArrowLeft => Key::PanLeft,
        KeyCode::ArrowRight => Key::PanRight,
        KeyCode::Space => Key::ToggleMode,
        KeyCode::Backspace => Key::ClearMarkers,
        KeyCode::Escape => Key::Quit,
        _ => return None,
    };

    Some(key)
}
