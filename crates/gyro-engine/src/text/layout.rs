use super::atlas::FontAtlas;

/// One screen-space textured quad for a single glyph.
///
/// Transient: generated per glyph per frame and consumed immediately by the
/// text renderer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextQuad {
    /// Screen-space rect, +Y down.
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,

    /// Texture-coordinate rect into the atlas.
    pub s0: f32,
    pub t0: f32,
    pub s1: f32,
    pub t1: f32,
}

/// Result of laying out one line: the quads plus the pen position after the
/// final glyph, so follow-up runs can continue where this one ended.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub quads: Vec<TextQuad>,
    pub pen_x: f32,
    pub pen_y: f32,
}

/// Lays out `text` along a single line starting at `(start_x, start_y)`,
/// with the pen on the baseline.
///
/// Per character, in order:
/// - codepoints outside the baked range are dropped entirely: no quad, no
///   pen advance;
/// - zero-coverage glyphs (space) advance the pen but emit no quad;
/// - every other glyph emits one quad placed by its baked offsets, then
///   advances the pen by its advance width.
///
/// The produced advance is deterministic and additive: laying out `"AB"`
/// places `B` exactly where laying out `"B"` from the end pen of `"A"`
/// would.
pub fn layout_line(atlas: &FontAtlas, text: &str, start_x: f32, start_y: f32) -> TextRun {
    let mut quads = Vec::with_capacity(text.len());
    let mut pen_x = start_x;
    let pen_y = start_y;

    for ch in text.chars() {
        let Some(glyph) = atlas.glyph(ch as u32) else {
            continue;
        };

        if !glyph.is_empty() {
            let x0 = pen_x + glyph.offset_x;
            let y0 = pen_y + glyph.offset_y;
            quads.push(TextQuad {
                x0,
                y0,
                x1: x0 + (glyph.x1 - glyph.x0) as f32,
                y1: y0 + (glyph.y1 - glyph.y0) as f32,
                s0: glyph.s0,
                t0: glyph.t0,
                s1: glyph.s1,
                t1: glyph.t1,
            });
        }

        pen_x += glyph.advance;
    }

    TextRun { quads, pen_x, pen_y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::atlas::Glyph;

    /// Builds a synthetic atlas for codepoints 32..32+count with simple,
    /// distinct metrics: glyph i is a (4+i)x8 box with advance 5+i.
    fn test_atlas(count: u32) -> FontAtlas {
        let mut glyphs = Vec::new();
        for i in 0..count {
            let w = 4 + i;
            let (x0, y0) = (i * 16, 0);
            if i == 0 {
                // Codepoint 32 is the space: advance only.
                glyphs.push(Glyph {
                    x0: 0,
                    y0: 0,
                    x1: 0,
                    y1: 0,
                    s0: 0.0,
                    t0: 0.0,
                    s1: 0.0,
                    t1: 0.0,
                    advance: 5.0,
                    offset_x: 0.0,
                    offset_y: 0.0,
                });
                continue;
            }
            glyphs.push(Glyph {
                x0,
                y0,
                x1: x0 + w,
                y1: y0 + 8,
                s0: x0 as f32 / 512.0,
                t0: 0.0,
                s1: (x0 + w) as f32 / 512.0,
                t1: 8.0 / 512.0,
                advance: (5 + i) as f32,
                offset_x: 1.0,
                offset_y: -8.0,
            });
        }

        FontAtlas {
            width: 512,
            height: 512,
            pixels: vec![0; 512 * 512],
            px_height: 8.0,
            first: 32,
            glyphs,
        }
    }

    #[test]
    fn empty_text_produces_no_quads_and_keeps_the_pen() {
        let atlas = test_atlas(96);
        let run = layout_line(&atlas, "", 25.0, 50.0);

        assert!(run.quads.is_empty());
        assert_eq!(run.pen_x, 25.0);
        assert_eq!(run.pen_y, 50.0);
    }

    #[test]
    fn out_of_range_codepoints_are_dropped_without_advance() {
        let atlas = test_atlas(96);
        // All outside [32, 128): control char, latin-1, euro sign.
        let run = layout_line(&atlas, "\u{07}\u{ff}\u{20ac}", 10.0, 20.0);

        assert!(run.quads.is_empty());
        assert_eq!(run.pen_x, 10.0);
        assert_eq!(run.pen_y, 20.0);
    }

    #[test]
    fn space_advances_the_pen_without_a_quad() {
        let atlas = test_atlas(96);
        let run = layout_line(&atlas, " ", 0.0, 0.0);

        assert!(run.quads.is_empty());
        assert_eq!(run.pen_x, 5.0);
    }

    #[test]
    fn glyph_quad_is_placed_by_its_offsets() {
        let atlas = test_atlas(96);
        let run = layout_line(&atlas, "!", 100.0, 40.0);

        assert_eq!(run.quads.len(), 1);
        let q = run.quads[0];
        // '!' is glyph index 1: 5x8 box, offsets (1, -8).
        assert_eq!(q.x0, 101.0);
        assert_eq!(q.y0, 32.0);
        assert_eq!(q.x1, 106.0);
        assert_eq!(q.y1, 40.0);
        assert_eq!(run.pen_x, 106.0);
    }

    #[test]
    fn pen_advance_is_additive() {
        let atlas = test_atlas(96);

        let ab = layout_line(&atlas, "AB", 25.0, 50.0);
        let a = layout_line(&atlas, "A", 25.0, 50.0);
        let b = layout_line(&atlas, "B", a.pen_x, a.pen_y);

        assert_eq!(ab.quads.len(), 2);
        assert_eq!(ab.quads[1], b.quads[0]);
        assert_eq!(ab.pen_x, b.pen_x);
    }

    #[test]
    fn in_range_glyphs_survive_surrounding_garbage() {
        let atlas = test_atlas(96);

        let clean = layout_line(&atlas, "AB", 0.0, 0.0);
        let noisy = layout_line(&atlas, "\u{ff}A\u{20ac}B\u{07}", 0.0, 0.0);

        assert_eq!(clean.quads, noisy.quads);
        assert_eq!(clean.pen_x, noisy.pen_x);
    }
}
