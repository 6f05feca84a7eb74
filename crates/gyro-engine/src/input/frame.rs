use std::collections::HashSet;

use super::types::Key;

/// Per-frame input deltas.
///
/// [`InputState`](super::InputState) provides the current held-key state;
/// `InputFrame` provides the transitions that happened during the current
/// frame. The runtime clears it after each frame is consumed.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys pressed this frame.
    pub keys_pressed: HashSet<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }
}
