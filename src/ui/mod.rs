pub mod hud;

pub use hud::{HealthBar, Hud};
