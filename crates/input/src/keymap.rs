use olimu_common::Button;
use std::collections::HashMap;

use crate::source::ButtonState;

/// Maps physical key names onto logical buttons.
///
/// Key names are whatever the windowing layer reports (`"ArrowUp"`, `"KeyW"`);
/// matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<String, Button>,
}

impl Default for KeyMap {
    /// Arrow keys plus WASD.
    fn default() -> Self {
        let mut map = Self::empty();
        map.bind("ArrowUp", Button::Up);
        map.bind("ArrowDown", Button::Down);
        map.bind("ArrowLeft", Button::Left);
        map.bind("ArrowRight", Button::Right);
        map.bind("KeyW", Button::Up);
        map.bind("KeyS", Button::Down);
        map.bind("KeyA", Button::Left);
        map.bind("KeyD", Button::Right);
        map
    }
}

impl KeyMap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key` to `button`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: &str, button: Button) {
        self.bindings.insert(key.to_ascii_lowercase(), button);
    }

    pub fn unbind(&mut self, key: &str) -> Option<Button> {
        self.bindings.remove(&key.to_ascii_lowercase())
    }

    pub fn lookup(&self, key: &str) -> Option<Button> {
        self.bindings.get(&key.to_ascii_lowercase()).copied()
    }

    /// Apply a key event to `state`. Returns false for unbound keys.
    pub fn handle_key(&self, key: &str, pressed: bool, state: &ButtonState) -> bool {
        match self.lookup(key) {
            Some(button) => {
                state.set(button, pressed);
                true
            }
            None => {
                tracing::trace!(key, "unbound key ignored");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
