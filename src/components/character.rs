/// Marker: this body is driven by the player controller.
pub struct Player;

/// Marker: this body is driven by a wanderer controller.
pub struct Wanderer;

pub const MAX_HEALTH: u8 = 100;

/// Hit points, always within `0..=MAX_HEALTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Health(u8);

impl Health {
    pub fn new(value: i32) -> Self {
        Self(value.clamp(0, i32::from(MAX_HEALTH)) as u8)
    }

    pub fn full() -> Self {
        Self(MAX_HEALTH)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Add `delta` (negative for damage), clamping to the valid range.
    pub fn apply(&mut self, delta: i32) -> u8 {
        *self = Self::new(i32::from(self.0).saturating_add(delta));
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Sprites are drawn facing right.
    pub fn flip_x(self) -> bool {
        self == Self::Left
    }
}

/// What a pickup body gives when the player touches it. Resolved at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pickup {
    Star,
    Health { gain: i32 },
}
