/// Keys the viewer reacts to. Anything else is ignored by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    AltLeft,
    KeyF,
    KeyS,
    Escape,
    F1,
}

/// Mouse buttons, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
}

/// A discrete input event delivered by the window collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(KeyCode),
    KeyReleased(KeyCode),
    ButtonPressed(MouseButton),
    ButtonReleased(MouseButton),
    /// Absolute cursor position in window pixels.
    CursorMoved { x: f32, y: f32 },
    /// Vertical scroll amount (positive = away from the user).
    Scrolled(f32),
    /// Cursor left the window; the next move re-seeds the cursor.
    CursorLeft,
    /// Window lost focus; held keys and buttons are released.
    FocusLost,
}

/// Cursor motion between two consecutive cursor events.
///
/// `y` is inverted relative to window coordinates: moving the cursor up
/// yields a positive `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorDelta {
    pub x: f32,
    pub y: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_delta_default_is_zero() {
        let d = CursorDelta::default();
        assert_eq!(d.x, 0.0);
        assert_eq!(d.y, 0.0);
    }

    #[test]
    fn events_compare_by_payload() {
        assert_eq!(
            InputEvent::CursorMoved { x: 1.0, y: 2.0 },
            InputEvent::CursorMoved { x: 1.0, y: 2.0 }
        );
        assert_ne!(
            InputEvent::KeyPressed(KeyCode::KeyF),
            InputEvent::KeyReleased(KeyCode::KeyF)
        );
    }
}
