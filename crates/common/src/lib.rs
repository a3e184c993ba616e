//! Shared vocabulary for the olimu presentation loop.

pub mod types;

pub use types::{Button, FrameSize, ParseButtonError};
