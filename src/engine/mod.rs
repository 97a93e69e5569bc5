pub mod animation;
pub mod events;
pub mod input;
pub mod registry;
pub mod time;
pub mod tween;
