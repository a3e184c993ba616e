//! Input collaborator: logical button state polled by the simulation.
//!
//! # Invariants
//! - Polling never mutates state; any number of reads per update is allowed.
//! - Writers (the window/input thread) and the loop thread never block each other.

pub mod keymap;
pub mod source;

pub use keymap::KeyMap;
pub use source::{ButtonState, InputSource};

pub fn crate_info() -> &'static str {
    "olimu-input v0.1.0"
}
