//! Entry point: bake the atlas, draw the rotation speeds, hand the app to
//! the runtime.

mod app;
mod cube;
mod scene;

use anyhow::{Context, Result};
use rand::Rng;
use winit::dpi::LogicalSize;

use gyro_engine::device::GpuInit;
use gyro_engine::logging::{LoggingConfig, init_logging};
use gyro_engine::text::FontAtlas;
use gyro_engine::window::{Runtime, RuntimeConfig};

use app::ViewerApp;
use scene::{CubeScene, SPEED_RANGE};

const WINDOW_TITLE: &str = "gyro";
const WINDOW_SIZE: (f64, f64) = (900.0, 700.0);

const FONT_PX_HEIGHT: f32 = 48.0;
/// Printable ASCII: 96 codepoints starting at space.
const FIRST_CODEPOINT: u32 = 32;
const CODEPOINT_COUNT: u32 = 96;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let font_bytes = load_font().context("no usable font file found")?;
    let atlas =
        FontAtlas::bake_from_bytes(&font_bytes, FONT_PX_HEIGHT, FIRST_CODEPOINT, CODEPOINT_COUNT)
            .context("font atlas bake failed")?;

    let mut rng = rand::thread_rng();
    let speed_x = rng.gen_range(SPEED_RANGE);
    let speed_y = rng.gen_range(SPEED_RANGE);
    log::info!("rotation speeds: {speed_x:.2}, {speed_y:.2} deg/frame");

    let app = ViewerApp::new(CubeScene::new(speed_x, speed_y), atlas);

    Runtime::run(
        RuntimeConfig {
            title: WINDOW_TITLE.to_string(),
            initial_size: LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1),
        },
        GpuInit::default(),
        app,
    )
}

/// Reads the first readable font from a fixed list of common system
/// locations.
fn load_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}
