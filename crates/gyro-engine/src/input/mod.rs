//! Platform-agnostic keyboard input.
//!
//! The window runtime translates winit events into [`InputEvent`]s and feeds
//! them through [`InputState::apply_event`]. Applications read held-key state
//! from [`InputState`] and per-frame transitions from [`InputFrame`].

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
