use glam::Vec2;
use olimu_common::Button;
use olimu_input::InputSource;
use olimu_kernel::Simulation;
use olimu_render::{RenderView, Renderer};
use std::sync::Arc;

/// Pixels scrolled per tick per held button.
const SCROLL_STEP: f32 = 1.0;

/// Scrolls the view while direction buttons are held.
pub struct ScrollGame<R> {
    input: Arc<dyn InputSource>,
    renderer: R,
    previous: Vec2,
    offset: Vec2,
}

impl<R: Renderer> ScrollGame<R> {
    pub fn new(input: Arc<dyn InputSource>, renderer: R) -> Self {
        Self {
            input,
            renderer,
            previous: Vec2::ZERO,
            offset: Vec2::ZERO,
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.input.is_pressed(Button::Up) {
            dir.y -= 1.0;
        }
        if self.input.is_pressed(Button::Down) {
            dir.y += 1.0;
        }
        if self.input.is_pressed(Button::Left) {
            dir.x -= 1.0;
        }
        if self.input.is_pressed(Button::Right) {
            dir.x += 1.0;
        }
        dir
    }
}

impl<R: Renderer + 'static> Simulation for ScrollGame<R> {
    fn init(&mut self) -> anyhow::Result<()> {
        tracing::debug!("scroll game ready");
        Ok(())
    }

    fn update(&mut self, tick: u64) -> anyhow::Result<()> {
        self.previous = self.offset;
        self.offset += self.direction() * SCROLL_STEP;
        if tick % 60 == 0 {
            tracing::trace!(tick, x = self.offset.x, y = self.offset.y, "scroll");
        }
        Ok(())
    }

    fn render(&mut self, interpolation: f32) -> anyhow::Result<()> {
        let view = RenderView::new(self.previous, self.offset);
        self.renderer.render_frame(&view, interpolation)?;
        Ok(())
    }
}
