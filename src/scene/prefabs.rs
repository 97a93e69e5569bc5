use glam::Vec2;
use hecs::{Entity, World};

use crate::components::*;

// ---------------------------------------------------------------------------
// Body prefabs. Each returns the spawned body; controllers are attached by the
// level, which also owns the obstacle registry.
// ---------------------------------------------------------------------------

pub fn spawn_player_body(world: &mut World, position: Vec2) -> Entity {
    world.spawn((
        Player,
        Position(position),
        Velocity::default(),
        FixedRotation,
        Sprite::new("penguin"),
    ))
}

pub fn spawn_wanderer_body(world: &mut World, position: Vec2) -> Entity {
    world.spawn((
        Wanderer,
        Position(position),
        Velocity::default(),
        FixedRotation,
        Sprite::new("snowman"),
    ))
}

pub fn spawn_star(world: &mut World, position: Vec2) -> Entity {
    world.spawn((
        Position(position),
        Static,
        Sensor,
        Pickup::Star,
        Sprite::new("star"),
    ))
}

pub fn spawn_health(world: &mut World, position: Vec2, gain: i32) -> Entity {
    world.spawn((
        Position(position),
        Static,
        Sensor,
        Pickup::Health { gain },
        Sprite::new("health"),
    ))
}

/// Invisible static rectangle; the caller registers it as an obstacle.
pub fn spawn_spikes(world: &mut World, center: Vec2, size: Vec2) -> Entity {
    world.spawn((Position(center), Size(size), Static))
}

pub fn spawn_ground(world: &mut World, center: Vec2, size: Vec2) -> Entity {
    world.spawn((Position(center), Size(size), Static, Terrain))
}
