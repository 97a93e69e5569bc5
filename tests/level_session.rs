use std::rc::Rc;

use glam::Vec2;
use snowdrift::components::{CollisionPair, Sprite, Velocity};
use snowdrift::config::GameConfig;
use snowdrift::engine::events::{EventBus, EventKind};
use snowdrift::engine::input::{InputSnapshot, InputState, Key};
use snowdrift::scene::{Level, SpawnObject, Spawned};
use snowdrift::systems::{player, wanderer};
use snowdrift::ui::Hud;

const DT: f32 = 1000.0 / 60.0;

struct Session {
    level: Level,
    bus: Rc<EventBus>,
    player: hecs::Entity,
    star: hecs::Entity,
    health: hecs::Entity,
    spikes: hecs::Entity,
    snowman: hecs::Entity,
    ground: hecs::Entity,
}

fn session() -> Session {
    let bus = Rc::new(EventBus::new());
    let mut level = Level::new(GameConfig::default(), Rc::clone(&bus), 42);
    let spawned = level
        .spawn_all(&[
            SpawnObject::new("spawn", 100.0, 300.0, 32.0, 32.0),
            SpawnObject::at("snowman", 420.0, 300.0),
            SpawnObject::at("star", 180.0, 290.0),
            SpawnObject::new("health", 220.0, 280.0, 20.0, 20.0),
            SpawnObject::new("spikes", 260.0, 320.0, 64.0, 10.0),
        ])
        .expect("spawn");
    let ground = level.spawn_ground(Vec2::new(0.0, 332.0), Vec2::new(1024.0, 32.0));

    let pick = |index: usize| match spawned[index] {
        Spawned::Player(e)
        | Spawned::Wanderer(e)
        | Spawned::Star(e)
        | Spawned::Health(e)
        | Spawned::Spikes(e) => e,
        Spawned::Skipped => panic!("object {index} skipped"),
    };

    Session {
        player: pick(0),
        snowman: pick(1),
        star: pick(2),
        health: pick(3),
        spikes: pick(4),
        ground,
        level,
        bus,
    }
}

impl Session {
    fn tick(&mut self, input: InputSnapshot) {
        self.level.tick(DT, input).expect("tick");
    }

    fn touch(&mut self, other: hecs::Entity) {
        self.level
            .handle_collision(CollisionPair::new(self.player, other))
            .expect("collision");
    }

    fn player_state(&self) -> Option<&str> {
        self.level.player().and_then(|p| p.state())
    }

    fn health(&self) -> u8 {
        self.level.player().map(|p| p.health()).unwrap_or_default()
    }
}

#[test]
fn hud_follows_pickups_and_hazards() {
    let mut s = session();
    let hud = Hud::attach(&s.bus);

    s.touch(s.star);
    assert_eq!(hud.borrow().stars_label(), "Stars: 1");
    assert!(!s.level.world.contains(s.star));

    s.touch(s.spikes);
    assert_eq!(s.player_state(), Some(player::SPIKE_HIT));
    assert_eq!(s.health(), 90);
    s.tick(InputSnapshot::empty());
    assert_eq!(s.player_state(), Some(player::IDLE));

    for _ in 0..15 {
        s.tick(InputSnapshot::empty());
        hud.borrow_mut().update(DT);
    }
    assert_eq!(hud.borrow().health_bar().displayed(), 90.0);

    s.touch(s.health);
    assert_eq!(s.health(), 100);
    for _ in 0..15 {
        hud.borrow_mut().update(DT);
    }
    assert_eq!(hud.borrow().health_bar().displayed(), 100.0);

    hud.borrow_mut().detach();
    assert_eq!(s.bus.listener_count(EventKind::StarCollected), 0);
    assert_eq!(s.bus.listener_count(EventKind::HealthChanged), 0);
}

#[test]
fn keyboard_driven_walk_jump_and_land() {
    let mut s = session();
    let mut input = InputState::new();

    input.begin_frame();
    input.key_down(Key::Right);
    s.tick(input.snapshot());
    assert_eq!(s.player_state(), Some(player::WALK));

    input.begin_frame();
    s.tick(input.snapshot());
    assert_eq!(s.level.world.get::<&Velocity>(s.player).unwrap().0.x, 5.0);

    input.begin_frame();
    input.key_down(Key::Up);
    s.tick(input.snapshot());
    assert_eq!(s.player_state(), Some(player::JUMP));
    assert_eq!(s.level.world.get::<&Velocity>(s.player).unwrap().0.y, -9.0);

    // Holding the key is not another jump.
    input.begin_frame();
    s.tick(input.snapshot());
    assert_eq!(s.player_state(), Some(player::JUMP));

    s.level
        .handle_collision(CollisionPair::new(s.ground, s.player).with_terrain(true))
        .expect("land");
    assert_eq!(s.player_state(), Some(player::IDLE));
    let sprite = s.level.world.get::<&Sprite>(s.player).unwrap();
    assert_eq!(sprite.animation, Some(player::ANIM_IDLE));
}

#[test]
fn spikes_win_over_simultaneous_terrain_contact() {
    let mut s = session();
    s.tick(InputSnapshot::empty().with_jump_pressed(true));
    assert_eq!(s.player_state(), Some(player::JUMP));

    s.level
        .handle_collision(CollisionPair::new(s.player, s.spikes).with_terrain(true))
        .expect("spikes");
    assert_eq!(s.player_state(), Some(player::SPIKE_HIT));
}

#[test]
fn health_never_leaves_range() {
    let mut s = session();
    for _ in 0..15 {
        s.touch(s.spikes);
        s.tick(InputSnapshot::empty());
        assert!(s.health() <= 100);
    }
    assert_eq!(s.health(), 0);

    s.touch(s.health);
    assert_eq!(s.health(), 25);
}

#[test]
fn snowman_patrols_until_killed() {
    let mut s = session();
    s.tick(InputSnapshot::empty());
    let first = s.level.wanderers()[0].state().map(str::to_owned);
    assert!(matches!(
        first.as_deref(),
        Some(wanderer::MOVE_LEFT) | Some(wanderer::MOVE_RIGHT)
    ));

    // 2000 ms plus one tick later it has turned around.
    for _ in 0..122 {
        s.tick(InputSnapshot::empty());
    }
    let turned = s.level.wanderers()[0].state().map(str::to_owned);
    assert_ne!(turned, first);

    assert!(s.level.kill_wanderer(s.snowman).expect("kill"));
    for _ in 0..300 {
        s.tick(InputSnapshot::empty());
    }
    assert!(s.level.wanderers()[0].is_dead());
}
