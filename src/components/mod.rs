pub mod character;
pub mod physics;
pub mod render;

pub use character::{Facing, Health, Pickup, Player, Wanderer, MAX_HEALTH};
pub use physics::{
    CollisionPair, FixedRotation, Position, Sensor, Size, Static, Terrain, Velocity,
};
pub use render::Sprite;
