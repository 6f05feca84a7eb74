use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks: the loop either keeps
/// running or stops. There are no other states.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the viewer.
pub trait App {
    /// Called once after the window and GPU device exist, before the first
    /// frame. Build programs and upload static resources here; returning an
    /// error refuses the frame loop and aborts startup.
    fn on_init(&mut self, ctx: &RenderCtx<'_>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
