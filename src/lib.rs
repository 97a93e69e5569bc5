//! Entity behavior driver for a side-scrolling platformer: a named-state
//! machine per controlled entity, collision-driven transitions and a
//! synchronous event bus between gameplay and the HUD.

pub mod components;
pub mod config;
pub mod engine;
pub mod fsm;
pub mod scene;
pub mod systems;
pub mod ui;
