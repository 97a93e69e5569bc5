pub mod level;
pub mod prefabs;

pub use level::{Level, LevelError, SpawnObject, Spawned};
