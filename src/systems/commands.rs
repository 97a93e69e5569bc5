use hecs::{Entity, World};
use tracing::warn;

use crate::components::{Sprite, Velocity};
use crate::engine::animation::AnimationLibrary;

/// A change a controller wants made to its own body.
///
/// State callbacks only see the controller's data, so body writes are queued
/// here and applied once the machine call returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyCommand {
    SetVelocityX(f32),
    SetVelocityY(f32),
    SetFlipX(bool),
    SetTint(u32),
    ClearTint,
    Play(&'static str),
}

#[derive(Debug, Default)]
pub struct BodyCommands(Vec<BodyCommand>);

impl BodyCommands {
    pub fn push(&mut self, command: BodyCommand) {
        self.0.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply and clear every queued command. A despawned body drops them.
    pub fn apply(&mut self, world: &mut World, body: Entity, animations: &AnimationLibrary) {
        if self.0.is_empty() {
            return;
        }
        if !world.contains(body) {
            warn!(?body, dropped = self.0.len(), "body commands for missing body");
            self.0.clear();
            return;
        }
        for command in self.0.drain(..) {
            match command {
                BodyCommand::SetVelocityX(x) => {
                    if let Ok(mut vel) = world.get::<&mut Velocity>(body) {
                        vel.0.x = x;
                    }
                }
                BodyCommand::SetVelocityY(y) => {
                    if let Ok(mut vel) = world.get::<&mut Velocity>(body) {
                        vel.0.y = y;
                    }
                }
                BodyCommand::SetFlipX(flip) => {
                    if let Ok(mut sprite) = world.get::<&mut Sprite>(body) {
                        sprite.flip_x = flip;
                    }
                }
                BodyCommand::SetTint(tint) => {
                    if let Ok(mut sprite) = world.get::<&mut Sprite>(body) {
                        sprite.tint = Some(tint);
                    }
                }
                BodyCommand::ClearTint => {
                    if let Ok(mut sprite) = world.get::<&mut Sprite>(body) {
                        sprite.tint = None;
                    }
                }
                BodyCommand::Play(key) => {
                    if !animations.contains(key) {
                        warn!(animation = key, "play requested for unregistered animation");
                    }
                    if let Ok(mut sprite) = world.get::<&mut Sprite>(body) {
                        sprite.animation = Some(key);
                    }
                }
            }
        }
    }
}
