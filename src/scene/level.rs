use std::rc::Rc;

use glam::Vec2;
use hecs::{Entity, World};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::components::CollisionPair;
use crate::config::GameConfig;
use crate::engine::animation::AnimationLibrary;
use crate::engine::events::EventBus;
use crate::engine::input::InputSnapshot;
use crate::engine::registry::{ObstacleRegistry, SNOWMAN, SPIKES};
use crate::fsm::FsmError;
use crate::scene::prefabs;
use crate::systems::{player, wanderer, PlayerControl, WandererControl};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error(transparent)]
    Fsm(#[from] FsmError),
    #[error("level already has a player spawn")]
    DuplicatePlayer,
}

/// One object from the map's object layer. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnObject {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SpawnObject {
    pub fn new(name: &str, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(name: &str, x: f32, y: f32) -> Self {
        Self::new(name, x, y, 0.0, 0.0)
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// What a spawned object turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawned {
    Player(Entity),
    Wanderer(Entity),
    Star(Entity),
    Health(Entity),
    Spikes(Entity),
    Skipped,
}

/// Everything alive in one level: bodies, controllers and the shared
/// registry/bus they talk through.
pub struct Level {
    pub world: World,
    pub obstacles: ObstacleRegistry,
    pub animations: AnimationLibrary,
    bus: Rc<EventBus>,
    config: GameConfig,
    rng: ChaCha8Rng,
    player: Option<PlayerControl>,
    wanderers: Vec<WandererControl>,
}

impl Level {
    pub fn new(config: GameConfig, bus: Rc<EventBus>, seed: u64) -> Self {
        let mut animations = AnimationLibrary::new();
        player::register_animations(&mut animations);
        wanderer::register_animations(&mut animations);
        Self {
            world: World::new(),
            obstacles: ObstacleRegistry::new(),
            animations,
            bus,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            player: None,
            wanderers: Vec::new(),
        }
    }

    pub fn player(&self) -> Option<&PlayerControl> {
        self.player.as_ref()
    }

    pub fn wanderers(&self) -> &[WandererControl] {
        &self.wanderers
    }

    pub fn spawn_all(&mut self, objects: &[SpawnObject]) -> Result<Vec<Spawned>, LevelError> {
        objects.iter().map(|object| self.spawn(object)).collect()
    }

    pub fn spawn(&mut self, object: &SpawnObject) -> Result<Spawned, LevelError> {
        let spawned = match object.name.as_str() {
            "spawn" => {
                if self.player.is_some() {
                    return Err(LevelError::DuplicatePlayer);
                }
                let position = Vec2::new(object.x + object.width * 0.5, object.y);
                let body = prefabs::spawn_player_body(&mut self.world, position);
                self.player = Some(PlayerControl::new(
                    body,
                    self.config.player.clone(),
                    Rc::clone(&self.bus),
                    &mut self.world,
                    &self.animations,
                )?);
                Spawned::Player(body)
            }
            "snowman" => {
                let body =
                    prefabs::spawn_wanderer_body(&mut self.world, Vec2::new(object.x, object.y));
                let rng = ChaCha8Rng::seed_from_u64(self.rng.next_u64());
                self.wanderers.push(WandererControl::new(
                    body,
                    self.config.wanderer.clone(),
                    rng,
                    &mut self.world,
                    &self.animations,
                )?);
                self.obstacles.add(SNOWMAN, body);
                Spawned::Wanderer(body)
            }
            "star" => Spawned::Star(prefabs::spawn_star(
                &mut self.world,
                Vec2::new(object.x, object.y + 10.0),
            )),
            "health" => Spawned::Health(prefabs::spawn_health(
                &mut self.world,
                object.center(),
                self.config.health_gain,
            )),
            "spikes" => {
                let body = prefabs::spawn_spikes(
                    &mut self.world,
                    object.center(),
                    Vec2::new(object.width, object.height),
                );
                self.obstacles.add(SPIKES, body);
                Spawned::Spikes(body)
            }
            other => {
                warn!(name = other, "skipping unknown map object");
                Spawned::Skipped
            }
        };
        debug!(name = %object.name, ?spawned, "spawned");
        Ok(spawned)
    }

    /// Add a piece of static ground covering `min..min + size`.
    pub fn spawn_ground(&mut self, min: Vec2, size: Vec2) -> Entity {
        prefabs::spawn_ground(&mut self.world, min + size * 0.5, size)
    }

    /// Advance every controller by one tick of `dt` ms.
    pub fn tick(&mut self, dt: f32, input: InputSnapshot) -> Result<(), FsmError> {
        if let Some(player) = self.player.as_mut() {
            player.update(dt, input, &mut self.world, &self.animations)?;
        }
        for wanderer in &mut self.wanderers {
            wanderer.update(dt, &mut self.world, &self.animations)?;
        }
        Ok(())
    }

    /// Route one contact from the physics step to the player.
    pub fn handle_collision(&mut self, pair: CollisionPair) -> Result<(), FsmError> {
        let Some(player) = self.player.as_mut() else {
            return Ok(());
        };
        if !pair.involves(player.body()) {
            return Ok(());
        }
        player.handle_collision(&pair, &mut self.world, &self.obstacles, &self.animations)
    }

    /// Put the wanderer on `body` into its terminal state.
    pub fn kill_wanderer(&mut self, body: Entity) -> Result<bool, FsmError> {
        match self.wanderers.iter_mut().find(|w| w.body() == body) {
            Some(wanderer) => {
                wanderer.kill()?;
                info!(?body, "wanderer killed");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Pickup, Position, Sensor, Static};

    fn level() -> Level {
        Level::new(GameConfig::default(), Rc::new(EventBus::new()), 11)
    }

    #[test]
    fn map_objects_become_tagged_bodies() {
        let mut level = level();
        let spawned = level
            .spawn_all(&[
                SpawnObject::new("spawn", 100.0, 50.0, 32.0, 32.0),
                SpawnObject::at("snowman", 300.0, 50.0),
                SpawnObject::at("star", 200.0, 40.0),
                SpawnObject::new("health", 240.0, 40.0, 20.0, 20.0),
                SpawnObject::new("spikes", 400.0, 90.0, 64.0, 10.0),
                SpawnObject::at("sign", 0.0, 0.0),
            ])
            .expect("spawn");

        let Spawned::Player(player) = spawned[0] else { panic!("player") };
        assert_eq!(level.world.get::<&Position>(player).unwrap().0, Vec2::new(116.0, 50.0));

        let Spawned::Wanderer(snowman) = spawned[1] else { panic!("wanderer") };
        assert!(level.obstacles.is(SNOWMAN, snowman));

        let Spawned::Star(star) = spawned[2] else { panic!("star") };
        assert_eq!(level.world.get::<&Position>(star).unwrap().0, Vec2::new(200.0, 50.0));
        assert!(level.world.get::<&Sensor>(star).is_ok());

        let Spawned::Health(health) = spawned[3] else { panic!("health") };
        assert_eq!(*level.world.get::<&Pickup>(health).unwrap(), Pickup::Health { gain: 25 });
        assert_eq!(level.world.get::<&Position>(health).unwrap().0, Vec2::new(250.0, 50.0));

        let Spawned::Spikes(spikes) = spawned[4] else { panic!("spikes") };
        assert!(level.obstacles.is(SPIKES, spikes));
        assert!(level.world.get::<&Static>(spikes).is_ok());

        assert_eq!(spawned[5], Spawned::Skipped);
        assert_eq!(level.wanderers().len(), 1);
    }

    #[test]
    fn second_player_spawn_is_rejected() {
        let mut level = level();
        level.spawn(&SpawnObject::at("spawn", 0.0, 0.0)).unwrap();
        assert!(matches!(
            level.spawn(&SpawnObject::at("spawn", 5.0, 0.0)),
            Err(LevelError::DuplicatePlayer)
        ));
    }

    #[test]
    fn contacts_without_the_player_are_ignored() {
        let mut level = level();
        level.spawn(&SpawnObject::at("spawn", 0.0, 0.0)).unwrap();
        let Spawned::Star(star) = level.spawn(&SpawnObject::at("star", 0.0, 0.0)).unwrap() else {
            panic!("star")
        };
        let ground = level.spawn_ground(Vec2::ZERO, Vec2::new(100.0, 10.0));
        level
            .handle_collision(CollisionPair::new(star, ground).with_terrain(true))
            .unwrap();
        assert!(level.world.contains(star));
    }

    #[test]
    fn kill_wanderer_by_body() {
        let mut level = level();
        let Spawned::Wanderer(snowman) = level.spawn(&SpawnObject::at("snowman", 0.0, 0.0)).unwrap()
        else {
            panic!("wanderer")
        };
        assert!(level.kill_wanderer(snowman).unwrap());
        level.tick(16.0, InputSnapshot::empty()).unwrap();
        assert!(level.wanderers()[0].is_dead());

        let stray = level.world.spawn(());
        assert!(!level.kill_wanderer(stray).unwrap());
    }
}
