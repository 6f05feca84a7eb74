use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Current input state for a window.
///
/// Holds "is down" information; per-frame transitions are recorded into an
/// [`InputFrame`].
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to
    /// `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // On focus loss, clear the held set. Avoids stuck keys
                    // when focus changes mid-press.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(&key) {
                        frame.keys_released.insert(key);
                    }
                }
            },
        }
    }

    /// Returns true while `key` is held.
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut InputState, frame: &mut InputFrame, key: Key) {
        state.apply_event(frame, InputEvent::Key { key, state: KeyState::Pressed, repeat: false });
    }

    #[test]
    fn press_and_release_round_trip() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::ArrowUp);
        assert!(state.key_down(Key::ArrowUp));
        assert!(frame.keys_pressed.contains(&Key::ArrowUp));

        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::ArrowUp, state: KeyState::Released, repeat: false },
        );
        assert!(!state.key_down(Key::ArrowUp));
        assert!(frame.keys_released.contains(&Key::ArrowUp));
    }

    #[test]
    fn key_repeat_does_not_double_report() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::ArrowLeft);
        frame.clear();
        // OS key-repeat re-delivers Pressed while the key is already down.
        press(&mut state, &mut frame, Key::ArrowLeft);

        assert!(state.key_down(Key::ArrowLeft));
        assert!(frame.keys_pressed.is_empty());
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        press(&mut state, &mut frame, Key::ArrowDown);
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.key_down(Key::ArrowDown));
    }
}
