use olimu_common::Button;
use std::sync::atomic::{AtomicBool, Ordering};

/// Read-only view of the logical buttons, polled from `update`.
pub trait InputSource: Send + Sync {
    fn is_pressed(&self, button: Button) -> bool;
}

/// Pressed/released state for every [`Button`], one atomic per button.
///
/// Share it behind an `Arc`: the input thread writes, the loop thread reads.
#[derive(Debug, Default)]
pub struct ButtonState {
    pressed: [AtomicBool; Button::ALL.len()],
}

impl ButtonState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, button: Button, pressed: bool) {
        self.pressed[button.index()].store(pressed, Ordering::Relaxed);
    }

    pub fn press(&self, button: Button) {
        self.set(button, true);
    }

    pub fn release(&self, button: Button) {
        self.set(button, false);
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn release_all(&self) {
        for b in Button::ALL {
            self.release(b);
        }
    }

    /// Buttons currently held, in index order.
    pub fn held(&self) -> Vec<Button> {
        Button::ALL
            .into_iter()
            .filter(|b| self.is_pressed(*b))
            .collect()
    }
}

impl InputSource for ButtonState {
    fn is_pressed(&self, button: Button) -> bool {
        self.pressed[button.index()].load(Ordering::Relaxed)
    }
}
