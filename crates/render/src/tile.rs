use olimu_common::FrameSize;

use crate::buffer::{FrameBuffer, FrontBuffer};
use crate::renderer::{RenderError, RenderView, Renderer};

/// Side of one tile in pixels.
const TILE_SIZE: i64 = 8;
/// Side of the tiled field in tiles.
const FIELD_TILES: i64 = 32;

const BACKGROUND: u32 = 0x000000;
const LIGHT: u32 = 0xffffff;
const DARK: u32 = 0xaa0000;

/// Draws a static 32x32 checkerboard of 8px tiles scrolled by the view.
///
/// The field is redrawn in full every frame; the only per-frame input is the
/// interpolated scroll offset.
pub struct TileRenderer {
    back: FrameBuffer,
    front: FrontBuffer,
    frames: u64,
}

impl TileRenderer {
    pub fn new(front: FrontBuffer) -> Result<Self, RenderError> {
        let size = front.size();
        let back = FrameBuffer::new(size)?;
        tracing::debug!(width = size.width, height = size.height, "tile renderer ready");
        Ok(Self {
            back,
            front,
            frames: 0,
        })
    }

    pub fn size(&self) -> FrameSize {
        self.back.size()
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn draw(&mut self, ox: i64, oy: i64) {
        let FrameSize { width, height } = self.back.size();
        for y in 0..height {
            let ty = (i64::from(y) + oy).div_euclid(TILE_SIZE);
            let Some(row) = self.back.row_mut(y) else {
                break;
            };
            for (x, px) in (0..width).zip(row.iter_mut()) {
                let tx = (i64::from(x) + ox).div_euclid(TILE_SIZE);
                *px = tile_color(tx, ty);
            }
        }
    }
}

fn tile_color(tx: i64, ty: i64) -> u32 {
    let inside = (0..FIELD_TILES).contains(&tx) && (0..FIELD_TILES).contains(&ty);
    match (inside, (tx + ty) & 1 == 0) {
        (false, _) => BACKGROUND,
        (true, true) => LIGHT,
        (true, false) => DARK,
    }
}

impl Renderer for TileRenderer {
    fn render_frame(&mut self, view: &RenderView, interpolation: f32) -> Result<(), RenderError> {
        let offset = view.interpolated(interpolation).round();
        self.draw(offset.x as i64, offset.y as i64);
        self.front
            .present(&self.back)
            .inspect_err(|err| tracing::warn!(error = %err, frame = self.frames, "present failed"))?;
        self.frames += 1;
        Ok(())
    }
}
