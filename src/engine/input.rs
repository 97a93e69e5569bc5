use std::collections::HashSet;

/// Cursor-style keys the controllers read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
}

/// Key state fed by the host's event loop.
///
/// `begin_frame` must run once per tick before the tick's key events so that
/// `just_pressed` reports only presses that happened during this tick.
pub struct InputState {
    pub keys: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
            pressed: HashSet::new(),
        }
    }

    pub fn begin_frame(&mut self) {
        self.pressed.clear();
    }

    pub fn key_down(&mut self, key: Key) {
        // Auto-repeat of a held key is not a new press.
        if self.keys.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    pub fn is_key_held(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.is_key_held(Key::Left),
            right: self.is_key_held(Key::Right),
            jump_pressed: self.just_pressed(Key::Up),
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a controller sees of the keyboard during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump_pressed: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_left(mut self, held: bool) -> Self {
        self.left = held;
        self
    }

    pub fn with_right(mut self, held: bool) -> Self {
        self.right = held;
        self
    }

    pub fn with_jump_pressed(mut self, pressed: bool) -> Self {
        self.jump_pressed = pressed;
        self
    }

    pub fn any_direction(&self) -> bool {
        self.left || self.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_for_one_frame_only() {
        let mut input = InputState::new();
        input.begin_frame();
        input.key_down(Key::Up);
        assert!(input.just_pressed(Key::Up));
        assert!(input.snapshot().jump_pressed);

        input.begin_frame();
        assert!(input.is_key_held(Key::Up));
        assert!(!input.just_pressed(Key::Up));
    }

    #[test]
    fn repeated_key_down_is_not_a_new_press() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.begin_frame();
        input.key_down(Key::Up);
        assert!(!input.just_pressed(Key::Up));

        input.key_up(Key::Up);
        input.key_down(Key::Up);
        assert!(input.just_pressed(Key::Up));
    }

    #[test]
    fn snapshot_reflects_held_directions() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        let snap = input.snapshot();
        assert!(snap.left && !snap.right);
        assert!(snap.any_direction());
    }
}
