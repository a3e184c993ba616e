use glam::Vec2;

/// Scroll state handed to the renderer: the offsets before and after the most
/// recent update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderView {
    pub previous: Vec2,
    pub current: Vec2,
}

impl RenderView {
    pub fn new(previous: Vec2, current: Vec2) -> Self {
        Self { previous, current }
    }

    /// A view that is not moving.
    pub fn at(offset: Vec2) -> Self {
        Self::new(offset, offset)
    }

    /// Offset `alpha` of the way from `previous` to `current`.
    pub fn interpolated(&self, alpha: f32) -> Vec2 {
        self.previous.lerp(self.current, alpha.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("frame has zero area ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
    #[error("frame size mismatch: back buffer {back:?}, front buffer {front:?}")]
    SizeMismatch { back: (u32, u32), front: (u32, u32) },
}

/// Renderer interface. Implementations own their back buffer.
///
/// Called once per loop cycle on the loop thread; should finish well within
/// one render period. A slow renderer delays the whole loop.
pub trait Renderer: Send {
    /// Composite one frame for `view` at `interpolation` and present it.
    fn render_frame(&mut self, view: &RenderView, interpolation: f32) -> Result<(), RenderError>;
}
