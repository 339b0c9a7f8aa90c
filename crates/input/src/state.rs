use std::collections::HashSet;

use crate::event::{CursorDelta, InputEvent, KeyCode, MouseButton};

/// Cursor position assumed before any cursor event arrives (centre of 640x480).
pub const INITIAL_CURSOR: (f32, f32) = (320.0, 240.0);

/// Held keys and buttons plus the last known cursor position.
///
/// Booleans are state, not a queue: repeated presses collapse and the last
/// event for a key wins.
#[derive(Debug, Clone)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    cursor: (f32, f32),
    first_move: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys: HashSet::new(),
            buttons: HashSet::new(),
            cursor: INITIAL_CURSOR,
            first_move: true,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns the cursor delta for cursor moves, except for
    /// the seeding move after start or after input was lost.
    pub fn apply(&mut self, event: &InputEvent) -> Option<CursorDelta> {
        match *event {
            InputEvent::KeyPressed(key) => {
                self.keys.insert(key);
                None
            }
            InputEvent::KeyReleased(key) => {
                self.keys.remove(&key);
                None
            }
            InputEvent::ButtonPressed(button) => {
                self.buttons.insert(button);
                None
            }
            InputEvent::ButtonReleased(button) => {
                self.buttons.remove(&button);
                None
            }
            InputEvent::CursorMoved { x, y } => self.move_cursor(x, y),
            InputEvent::Scrolled(_) => None,
            InputEvent::CursorLeft => {
                self.first_move = true;
                None
            }
            InputEvent::FocusLost => {
                tracing::debug!("input focus lost, releasing held input");
                self.keys.clear();
                self.buttons.clear();
                self.first_move = true;
                None
            }
        }
    }

    fn move_cursor(&mut self, x: f32, y: f32) -> Option<CursorDelta> {
        let (last_x, last_y) = self.cursor;
        self.cursor = (x, y);
        if self.first_move {
            self.first_move = false;
            return None;
        }
        Some(CursorDelta {
            x: x - last_x,
            y: last_y - y,
        })
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_button_held(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Last cursor position in window pixels.
    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    #[test]
    fn first_move_seeds_without_delta() {
        let mut input = InputState::new();
        assert_eq!(input.cursor(), INITIAL_CURSOR);

        assert_eq!(input.apply(&moved(100.0, 50.0)), None);
        assert_eq!(input.cursor(), (100.0, 50.0));
        assert!(input.apply(&moved(101.0, 50.0)).is_some());
    }

    #[test]
    fn delta_inverts_y() {
        let mut input = InputState::new();
        input.apply(&moved(320.0, 240.0));

        let delta = input.apply(&moved(420.0, 200.0)).unwrap();
        assert_eq!(delta.x, 100.0);
        assert_eq!(delta.y, 40.0);
    }

    #[test]
    fn cursor_left_reseeds() {
        let mut input = InputState::new();
        input.apply(&moved(0.0, 0.0));
        input.apply(&InputEvent::CursorLeft);

        assert_eq!(input.apply(&moved(500.0, 500.0)), None);
        let delta = input.apply(&moved(501.0, 500.0)).unwrap();
        assert_eq!(delta, CursorDelta { x: 1.0, y: 0.0 });
    }

    #[test]
    fn keys_and_buttons_are_held_state() {
        let mut input = InputState::new();
        input.apply(&InputEvent::KeyPressed(KeyCode::AltLeft));
        input.apply(&InputEvent::KeyPressed(KeyCode::AltLeft));
        input.apply(&InputEvent::ButtonPressed(MouseButton::Left));
        assert!(input.is_key_held(KeyCode::AltLeft));
        assert!(input.is_button_held(MouseButton::Left));

        input.apply(&InputEvent::KeyReleased(KeyCode::AltLeft));
        assert!(!input.is_key_held(KeyCode::AltLeft));
        assert!(input.is_button_held(MouseButton::Left));
    }

    #[test]
    fn focus_lost_releases_everything() {
        let mut input = InputState::new();
        input.apply(&InputEvent::KeyPressed(KeyCode::KeyS));
        input.apply(&InputEvent::ButtonPressed(MouseButton::Left));
        input.apply(&moved(10.0, 10.0));

        input.apply(&InputEvent::FocusLost);
        assert!(!input.is_key_held(KeyCode::KeyS));
        assert!(!input.is_button_held(MouseButton::Left));
        assert_eq!(input.apply(&moved(60.0, 10.0)), None);
    }

    #[test]
    fn scroll_does_not_touch_cursor() {
        let mut input = InputState::new();
        assert_eq!(input.apply(&InputEvent::Scrolled(3.0)), None);
        assert_eq!(input.cursor(), INITIAL_CURSOR);
    }
}
