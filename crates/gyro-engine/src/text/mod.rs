//! Text-overlay subsystem: font-atlas baking and glyph layout.
//!
//! [`FontAtlas::bake`] rasterizes a contiguous codepoint range into a
//! single-channel bitmap once at startup; [`layout_line`] turns a string
//! into screen-space glyph quads against that atlas. The GPU side lives in
//! [`crate::render::TextRenderer`].

mod atlas;
mod layout;

pub use atlas::{AtlasTexture, BakeError, FontAtlas, Glyph};
pub use layout::{TextQuad, TextRun, layout_line};
