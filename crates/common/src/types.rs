use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A logical button the simulation can poll.
///
/// The set is fixed; physical keys are mapped onto it by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    /// Every logical button, in index order.
    pub const ALL: [Button; 4] = [Button::Up, Button::Down, Button::Left, Button::Right];

    /// Dense index for per-button tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown button `{0}` (expected up, down, left or right)")]
pub struct ParseButtonError(pub String);

impl FromStr for Button {
    type Err = ParseButtonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Button::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseButtonError(s.to_string()))
    }
}

/// Pixel dimensions of a presentable frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for FrameSize {
    /// 850 wide at a 4:3 aspect.
    fn default() -> Self {
        Self::new(850, 850 * 3 / 4)
    }
}
