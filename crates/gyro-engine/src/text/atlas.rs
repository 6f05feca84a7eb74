use std::fmt;
use std::path::Path;

/// Default atlas dimensions in texels. 512x512 comfortably fits printable
/// ASCII at a 48 px pixel height.
pub const DEFAULT_ATLAS_SIZE: u32 = 512;

/// Padding between packed glyphs, in texels. Keeps linear filtering from
/// bleeding neighbors into a sampled glyph.
const GLYPH_PADDING: u32 = 1;

/// Error returned by [`FontAtlas::bake`].
#[derive(Debug, Clone)]
pub enum BakeError {
    /// The font file could not be read or parsed.
    FontLoad(String),
    /// The requested glyph range does not fit the atlas dimensions.
    Overflow { width: u32, height: u32 },
}

impl fmt::Display for BakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BakeError::FontLoad(msg) => write!(f, "font load error: {msg}"),
            BakeError::Overflow { width, height } => {
                write!(f, "glyph range does not fit a {width}x{height} atlas")
            }
        }
    }
}

impl std::error::Error for BakeError {}

/// A single baked glyph: its box in the atlas, the normalized texture
/// coordinates of that box, and its layout metrics.
///
/// Immutable once baked; lives as long as the atlas.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    /// Atlas box in texels.
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,

    /// Texture-coordinate box (normalized to the atlas dimensions).
    pub s0: f32,
    pub t0: f32,
    pub s1: f32,
    pub t1: f32,

    /// Horizontal pen advance in pixels.
    pub advance: f32,

    /// Offset from the pen position (on the baseline) to the quad's left
    /// edge.
    pub offset_x: f32,

    /// Offset from the pen position to the quad's top edge. Screen space is
    /// +Y down, so glyphs above the baseline have a negative offset.
    pub offset_y: f32,
}

impl Glyph {
    /// True for glyphs with no coverage (e.g. space): they advance the pen
    /// but produce no quad.
    pub fn is_empty(&self) -> bool {
        self.x1 == self.x0 || self.y1 == self.y0
    }
}

/// A baked font atlas: the single-channel bitmap plus the glyph table for
/// one contiguous codepoint range at one pixel height.
///
/// Created once at startup, read-only thereafter. Upload the bitmap with
/// [`AtlasTexture::upload`].
#[derive(Debug)]
pub struct FontAtlas {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixels: Vec<u8>,
    pub(crate) px_height: f32,
    pub(crate) first: u32,
    pub(crate) glyphs: Vec<Glyph>,
}

impl FontAtlas {
    /// Reads `path` fully into memory and bakes `count` glyphs starting at
    /// `first` into a [`DEFAULT_ATLAS_SIZE`]-squared bitmap.
    pub fn bake(
        path: &Path,
        px_height: f32,
        first: u32,
        count: u32,
    ) -> Result<Self, BakeError> {
        let bytes = std::fs::read(path)
            .map_err(|e| BakeError::FontLoad(format!("{}: {e}", path.display())))?;
        Self::bake_from_bytes(&bytes, px_height, first, count)
    }

    /// Like [`bake`](Self::bake) for callers that already own the font
    /// file's contents.
    pub fn bake_from_bytes(
        bytes: &[u8],
        px_height: f32,
        first: u32,
        count: u32,
    ) -> Result<Self, BakeError> {
        Self::bake_sized(
            bytes,
            px_height,
            first,
            count,
            DEFAULT_ATLAS_SIZE,
            DEFAULT_ATLAS_SIZE,
        )
    }

    /// Bakes into explicit atlas dimensions.
    ///
    /// Glyphs are rasterized with fontdue and packed left-to-right into
    /// shelf rows with [`GLYPH_PADDING`] texels between boxes. The capacity
    /// check runs before any row is written past the bitmap: a range that
    /// does not fit fails with [`BakeError::Overflow`] instead of producing
    /// a truncated atlas.
    pub fn bake_sized(
        bytes: &[u8],
        px_height: f32,
        first: u32,
        count: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, BakeError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| BakeError::FontLoad(e.to_string()))?;

        let mut pixels = vec![0u8; (width as usize) * (height as usize)];
        let mut glyphs = Vec::with_capacity(count as usize);

        // Shelf packer cursor.
        let mut cursor_x = GLYPH_PADDING;
        let mut cursor_y = GLYPH_PADDING;
        let mut row_height = 0u32;

        for cp in first..first.saturating_add(count) {
            let Some(ch) = char::from_u32(cp) else {
                // Unencodable scalar (surrogate range): keep the table dense
                // with a zero glyph.
                glyphs.push(empty_glyph(0.0));
                continue;
            };

            let (metrics, bitmap) = font.rasterize(ch, px_height);
            let gw = metrics.width as u32;
            let gh = metrics.height as u32;

            if gw == 0 || gh == 0 {
                glyphs.push(empty_glyph(metrics.advance_width));
                continue;
            }

            // Start a new shelf row when the glyph doesn't fit horizontally.
            if cursor_x + gw + GLYPH_PADDING > width {
                cursor_y += row_height + GLYPH_PADDING;
                cursor_x = GLYPH_PADDING;
                row_height = 0;
            }

            if cursor_x + gw + GLYPH_PADDING > width
                || cursor_y + gh + GLYPH_PADDING > height
            {
                return Err(BakeError::Overflow { width, height });
            }

            for row in 0..metrics.height {
                let src = row * metrics.width;
                let dst = (cursor_y as usize + row) * width as usize + cursor_x as usize;
                pixels[dst..dst + metrics.width]
                    .copy_from_slice(&bitmap[src..src + metrics.width]);
            }

            let (x0, y0) = (cursor_x, cursor_y);
            let (x1, y1) = (cursor_x + gw, cursor_y + gh);
            glyphs.push(Glyph {
                x0,
                y0,
                x1,
                y1,
                s0: x0 as f32 / width as f32,
                t0: y0 as f32 / height as f32,
                s1: x1 as f32 / width as f32,
                t1: y1 as f32 / height as f32,
                advance: metrics.advance_width,
                offset_x: metrics.xmin as f32,
                // fontdue metrics are y-up from the baseline; convert the
                // bitmap's top edge to +Y-down screen space.
                offset_y: -((metrics.height as i32 + metrics.ymin) as f32),
            });

            cursor_x += gw + GLYPH_PADDING;
            row_height = row_height.max(gh);
        }

        Ok(Self {
            width,
            height,
            pixels,
            px_height,
            first,
            glyphs,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The baked single-channel bitmap, row-major, `width * height` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel height the range was rasterized at.
    pub fn px_height(&self) -> f32 {
        self.px_height
    }

    /// Looks up the glyph for `codepoint`, or `None` when it lies outside
    /// the baked range.
    pub fn glyph(&self, codepoint: u32) -> Option<&Glyph> {
        let index = codepoint.checked_sub(self.first)? as usize;
        self.glyphs.get(index)
    }
}

fn empty_glyph(advance: f32) -> Glyph {
    Glyph {
        x0: 0,
        y0: 0,
        x1: 0,
        y1: 0,
        s0: 0.0,
        t0: 0.0,
        s1: 0.0,
        t1: 0.0,
        advance,
        offset_x: 0.0,
        offset_y: 0.0,
    }
}

/// GPU residence of a [`FontAtlas`]: an `R8Unorm` texture (glyph coverage in
/// the red channel) with linear filtering and clamp-to-edge addressing.
pub struct AtlasTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl AtlasTexture {
    /// Uploads the atlas bitmap in a single full-texture write.
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, atlas: &FontAtlas) -> Self {
        let extent = wgpu::Extent3d {
            width: atlas.width,
            height: atlas.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gyro font atlas"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &atlas.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(atlas.width),
                rows_per_image: Some(atlas.height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("gyro font atlas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Probes common system font locations; tests that need a real font
    /// bail out quietly when none is installed.
    fn system_font() -> Option<Vec<u8>> {
        [
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/noto/NotoSans-Regular.ttf",
            "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        ]
        .iter()
        .find_map(|p| std::fs::read(p).ok())
    }

    #[test]
    fn bake_is_deterministic() {
        let Some(bytes) = system_font() else { return };

        let a = FontAtlas::bake_from_bytes(&bytes, 48.0, 32, 96).unwrap();
        let b = FontAtlas::bake_from_bytes(&bytes, 48.0, 32, 96).unwrap();

        assert_eq!(a.glyphs, b.glyphs);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn baked_boxes_stay_inside_the_atlas_and_do_not_overlap() {
        let Some(bytes) = system_font() else { return };

        let atlas = FontAtlas::bake_from_bytes(&bytes, 48.0, 32, 96).unwrap();
        let boxes: Vec<&Glyph> = atlas.glyphs.iter().filter(|g| !g.is_empty()).collect();

        for g in &boxes {
            assert!(g.x1 <= atlas.width());
            assert!(g.y1 <= atlas.height());
        }

        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                let disjoint =
                    a.x1 <= b.x0 || b.x1 <= a.x0 || a.y1 <= b.y0 || b.y1 <= a.y0;
                assert!(disjoint, "glyph boxes overlap: {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn texture_box_matches_atlas_box() {
        let Some(bytes) = system_font() else { return };

        let atlas = FontAtlas::bake_from_bytes(&bytes, 48.0, 32, 96).unwrap();
        let w = atlas.width() as f32;
        let h = atlas.height() as f32;

        for g in atlas.glyphs.iter().filter(|g| !g.is_empty()) {
            assert_eq!(g.s0 * w, g.x0 as f32);
            assert_eq!(g.t0 * h, g.y0 as f32);
            assert_eq!(g.s1 * w, g.x1 as f32);
            assert_eq!(g.t1 * h, g.y1 as f32);
        }
    }

    #[test]
    fn space_advances_without_coverage() {
        let Some(bytes) = system_font() else { return };

        let atlas = FontAtlas::bake_from_bytes(&bytes, 48.0, 32, 96).unwrap();
        let space = atlas.glyph(' ' as u32).unwrap();

        assert!(space.is_empty());
        assert!(space.advance > 0.0);
    }

    #[test]
    fn range_that_cannot_fit_overflows() {
        let Some(bytes) = system_font() else { return };

        let err = FontAtlas::bake_sized(&bytes, 48.0, 32, 96, 64, 64).unwrap_err();
        assert!(matches!(err, BakeError::Overflow { width: 64, height: 64 }));
    }

    #[test]
    fn lookup_outside_the_baked_range_is_none() {
        let Some(bytes) = system_font() else { return };

        let atlas = FontAtlas::bake_from_bytes(&bytes, 48.0, 32, 96).unwrap();
        assert!(atlas.glyph(31).is_none());
        assert!(atlas.glyph(128).is_none());
        assert!(atlas.glyph('A' as u32).is_some());
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let err = FontAtlas::bake_from_bytes(&[0u8; 16], 48.0, 32, 96).unwrap_err();
        assert!(matches!(err, BakeError::FontLoad(_)));
    }
}
