use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use hecs::Entity;
use snowdrift::components::CollisionPair;
use snowdrift::config::GameConfig;
use snowdrift::engine::events::EventBus;
use snowdrift::engine::input::{InputState, Key};
use snowdrift::engine::time::StepClock;
use snowdrift::scene::{Level, SpawnObject, Spawned};
use snowdrift::ui::Hud;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snowdrift", about = "Headless run of the penguin level")]
struct Args {
    /// RON file overriding the default tunables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulation ticks to run
    #[arg(long, default_value_t = 360)]
    ticks: u64,
    /// Seed for the wanderers' direction choices
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Simulated frame time in milliseconds
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    frame_ms: f32,
}

/// Scripted stand-ins for keyboard and physics callbacks.
#[derive(Clone, Copy)]
enum Step {
    Press(Key),
    Release(Key),
    Land,
    Touch(Target),
    KillWanderers,
}

#[derive(Clone, Copy)]
enum Target {
    Star,
    Health,
    Spikes,
}

const SCRIPT: &[(u64, Step)] = &[
    (10, Step::Press(Key::Right)),
    (40, Step::Release(Key::Right)),
    (50, Step::Press(Key::Up)),
    (51, Step::Release(Key::Up)),
    (80, Step::Land),
    (100, Step::Touch(Target::Star)),
    (120, Step::Touch(Target::Spikes)),
    (160, Step::Touch(Target::Spikes)),
    (200, Step::Touch(Target::Health)),
    (300, Step::KillWanderers),
];

fn map_objects() -> Vec<SpawnObject> {
    vec![
        SpawnObject::new("spawn", 100.0, 300.0, 32.0, 32.0),
        SpawnObject::at("snowman", 420.0, 300.0),
        SpawnObject::at("snowman", 640.0, 300.0),
        SpawnObject::at("star", 180.0, 290.0),
        SpawnObject::new("health", 220.0, 280.0, 20.0, 20.0),
        SpawnObject::new("spikes", 260.0, 320.0, 64.0, 10.0),
    ]
}

struct Bodies {
    player: Entity,
    star: Option<Entity>,
    health: Option<Entity>,
    spikes: Option<Entity>,
    ground: Entity,
    wanderers: Vec<Entity>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let bus = Rc::new(EventBus::new());
    let hud = Hud::attach(&bus);
    let mut level = Level::new(config, Rc::clone(&bus), args.seed);

    let spawned = level.spawn_all(&map_objects())?;
    let ground = level.spawn_ground(Vec2::new(0.0, 332.0), Vec2::new(1024.0, 32.0));
    let bodies = collect_bodies(&spawned, ground).context("map has no player spawn")?;
    info!(objects = spawned.len(), "level loaded");

    anyhow::ensure!(
        args.frame_ms.is_finite() && args.frame_ms > 0.0,
        "--frame-ms must be a positive finite number"
    );
    let mut input = InputState::new();
    let mut clock = StepClock::default();
    let mut tick: u64 = 0;

    while tick < args.ticks {
        for _ in 0..steps_to_run(clock.advance(args.frame_ms), tick, args.ticks) {
            tick += 1;
            input.begin_frame();
            for (_, step) in SCRIPT.iter().filter(|(at, _)| *at == tick) {
                run_step(*step, &mut level, &mut input, &bodies)?;
            }
            level.tick(clock.step_ms(), input.snapshot())?;
            hud.borrow_mut().update(clock.step_ms());
        }
    }

    let player = level.player().context("player missing after run")?;
    let hud = hud.borrow();
    info!(
        ticks = tick,
        state = player.state().unwrap_or("<none>"),
        health = player.health(),
        bar = hud.health_bar().displayed(),
        "{}",
        hud.stars_label()
    );
    for wanderer in level.wanderers() {
        info!(
            body = ?wanderer.body(),
            state = wanderer.state().unwrap_or("<none>"),
            "wanderer"
        );
    }
    Ok(())
}

fn run_step(step: Step, level: &mut Level, input: &mut InputState, bodies: &Bodies) -> Result<()> {
    match step {
        Step::Press(key) => input.key_down(key),
        Step::Release(key) => input.key_up(key),
        Step::Land => {
            let pair = CollisionPair::new(bodies.player, bodies.ground).with_terrain(true);
            level.handle_collision(pair)?;
        }
        Step::Touch(target) => {
            let body = match target {
                Target::Star => bodies.star,
                Target::Health => bodies.health,
                Target::Spikes => bodies.spikes,
            };
            if let Some(body) = body {
                level.handle_collision(CollisionPair::new(bodies.player, body))?;
            }
        }
        Step::KillWanderers => {
            for body in &bodies.wanderers {
                level.kill_wanderer(*body)?;
            }
        }
    }
    Ok(())
}

fn collect_bodies(spawned: &[Spawned], ground: Entity) -> Option<Bodies> {
    let mut player = None;
    let mut bodies = Bodies {
        player: ground,
        star: None,
        health: None,
        spikes: None,
        ground,
        wanderers: Vec::new(),
    };
    for item in spawned {
        match *item {
            Spawned::Player(body) => player = Some(body),
            Spawned::Wanderer(body) => bodies.wanderers.push(body),
            Spawned::Star(body) => bodies.star = Some(body),
            Spawned::Health(body) => bodies.health = Some(body),
            Spawned::Spikes(body) => bodies.spikes = Some(body),
            Spawned::Skipped => {}
        }
    }
    bodies.player = player?;
    Some(bodies)
}

/// Ticks due this frame, without running past `limit`.
fn steps_to_run(due: u32, done: u64, limit: u64) -> u64 {
    u64::from(due).min(limit.saturating_sub(done))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_frame_stops_at_tick_limit() {
        assert_eq!(steps_to_run(8, 0, 360), 8);
        assert_eq!(steps_to_run(8, 357, 360), 3);
        assert_eq!(steps_to_run(8, 360, 360), 0);
    }
}
