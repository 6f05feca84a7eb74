//! Per-frame orchestration: advance the scene, draw the cube, overlay the
//! status line.

use anyhow::Context;
use glam::{Mat4, Vec3};

use gyro_engine::core::{App, AppControl, FrameCtx};
use gyro_engine::input::Key;
use gyro_engine::render::{RenderCtx, TextRenderer};
use gyro_engine::text::{AtlasTexture, FontAtlas, layout_line};

use crate::cube::CubeRenderer;
use crate::scene::{ArrowInput, CubeScene};

/// Fixed camera: vertical field of view and clip planes, with the eye pulled
/// back along -Z toward the origin.
const FOV_Y_DEG: f32 = 45.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;
const EYE_Z: f32 = -3.0;

/// Status line pen position (baseline), in pixels from the top-left corner.
const STATUS_POS: (f32, f32) = (25.0, 50.0);

const TEXT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// GPU-side state, built once in `on_init` after the device exists.
struct Gfx {
    cube: CubeRenderer,
    text: TextRenderer,
}

/// The viewer application: owns the scene, the baked atlas, and the
/// renderers.
pub struct ViewerApp {
    scene: CubeScene,
    atlas: FontAtlas,
    gfx: Option<Gfx>,
}

impl ViewerApp {
    pub fn new(scene: CubeScene, atlas: FontAtlas) -> Self {
        Self {
            scene,
            atlas,
            gfx: None,
        }
    }
}

impl App for ViewerApp {
    fn on_init(&mut self, ctx: &RenderCtx<'_>) -> anyhow::Result<()> {
        let cube = CubeRenderer::new(ctx).context("failed to build cube program")?;

        let atlas_texture = AtlasTexture::upload(ctx.device, ctx.queue, &self.atlas);
        let text =
            TextRenderer::new(ctx, atlas_texture).context("failed to build text program")?;

        self.gfx = Some(Gfx { cube, text });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input.key_down(Key::Escape) {
            return AppControl::Exit;
        }

        self.scene.advance(ArrowInput {
            up: ctx.input.key_down(Key::ArrowUp),
            down: ctx.input.key_down(Key::ArrowDown),
            left: ctx.input.key_down(Key::ArrowLeft),
            right: ctx.input.key_down(Key::ArrowRight),
        });

        let Some(gfx) = self.gfx.as_mut() else {
            return AppControl::Continue;
        };

        let (angle_x, angle_y) = self.scene.angles();
        let run = layout_line(
            &self.atlas,
            &format_status(angle_x, angle_y),
            STATUS_POS.0,
            STATUS_POS.1,
        );
        let scene = &self.scene;

        ctx.render(|rctx, target| {
            let width = rctx.size.width.max(1) as f32;
            let height = rctx.size.height.max(1) as f32;

            let projection =
                Mat4::perspective_rh(FOV_Y_DEG.to_radians(), width / height, Z_NEAR, Z_FAR);
            let view = Mat4::from_translation(Vec3::new(0.0, 0.0, EYE_Z));
            gfx.cube.draw(rctx, target, scene.composite(projection, view));

            // Screen-space ortho with +Y down, re-derived from the current
            // framebuffer size so resizes keep the overlay in pixels.
            let ortho = Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0);
            gfx.text.draw(rctx, target, &run, ortho, TEXT_COLOR);
        })
    }
}

/// Formats the live status line shown in the overlay.
fn format_status(angle_x: f32, angle_y: f32) -> String {
    format!("Arrow keys control the rotation ({angle_x:.1}, {angle_y:.1})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_uses_one_decimal_place() {
        assert_eq!(
            format_status(10.0, 15.26),
            "Arrow keys control the rotation (10.0, 15.3)"
        );
    }

    #[test]
    fn status_line_keeps_sign() {
        assert_eq!(
            format_status(-2.0, 0.5),
            "Arrow keys control the rotation (-2.0, 0.5)"
        );
    }
}
