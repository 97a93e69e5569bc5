use glam::Vec2;
use hecs::Entity;

/// Body center in world pixels (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Linear velocity in world pixels per physics step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

/// Axis-aligned extent of a rectangle body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size(pub Vec2);

/// Marker: body never rotates on contact.
pub struct FixedRotation;

/// Marker: entity is immovable (infinite mass for collision response).
pub struct Static;

/// Marker: reports contacts without blocking movement.
pub struct Sensor;

/// Marker: static level geometry (tilemap ground).
pub struct Terrain;

/// One contact reported by the physics step.
///
/// `terrain` is set when either body is static level geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub body_a: Entity,
    pub body_b: Entity,
    pub terrain: bool,
}

impl CollisionPair {
    pub fn new(body_a: Entity, body_b: Entity) -> Self {
        Self {
            body_a,
            body_b,
            terrain: false,
        }
    }

    pub fn with_terrain(mut self, terrain: bool) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn involves(&self, body: Entity) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// The body on the far side of the contact from `body`.
    pub fn other(&self, body: Entity) -> Option<Entity> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}
