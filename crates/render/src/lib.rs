//! Render collaborator: turns scroll state plus an interpolation fraction into
//! a presentable frame.
//!
//! # Invariants
//! - The back buffer belongs to the renderer and is only touched on the loop thread.
//! - The front buffer is replaced whole on `present`; readers never see a half-drawn frame.

mod buffer;
mod renderer;
mod tile;

pub use buffer::{FrameBuffer, FrontBuffer};
pub use renderer::{RenderError, RenderView, Renderer};
pub use tile::TileRenderer;

pub fn crate_info() -> &'static str {
    "olimu-render v0.1.0"
}
