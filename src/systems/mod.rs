pub mod commands;
pub mod player;
pub mod wanderer;

pub use commands::{BodyCommand, BodyCommands};
pub use player::PlayerControl;
pub use wanderer::WandererControl;
