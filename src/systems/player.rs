use std::rc::Rc;

use hecs::{Entity, World};
use tracing::debug;

use crate::components::{CollisionPair, Facing, Health, Pickup, Terrain};
use crate::config::PlayerConfig;
use crate::engine::animation::{AnimationDef, AnimationLibrary};
use crate::engine::events::{EventBus, GameEvent};
use crate::engine::input::InputSnapshot;
use crate::engine::registry::{ObstacleRegistry, SPIKES};
use crate::engine::tween::ColorFlash;
use crate::fsm::{FsmError, State, StateMachine, Transitions};
use crate::systems::commands::{BodyCommand, BodyCommands};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const IDLE: &str = "idle";
pub const WALK: &str = "walk";
pub const JUMP: &str = "jump";
pub const SPIKE_HIT: &str = "spike-hit";

pub const ANIM_IDLE: &str = "penguin-idle";
pub const ANIM_WALK: &str = "penguin-walk";
pub const ANIM_JUMP: &str = "penguin-jump";

/// Register the penguin animations the player states play.
pub fn register_animations(library: &mut AnimationLibrary) {
    library.register(AnimationDef::still(ANIM_IDLE, "penguin_walk01.png"));
    library.register(AnimationDef::numbered(
        ANIM_WALK,
        "penguin_walk0",
        1,
        4,
        ".png",
        10.0,
    ));
    library.register(AnimationDef::still(ANIM_JUMP, "penguin_jump02.png"));
}

// ---------------------------------------------------------------------------
// Machine context
// ---------------------------------------------------------------------------

/// Everything the player's state callbacks may read or change.
pub struct PlayerContext {
    pub config: PlayerConfig,
    pub health: Health,
    pub facing: Facing,
    /// Input for the tick being processed.
    pub input: InputSnapshot,
    pub flash: Option<ColorFlash>,
    pub commands: BodyCommands,
    /// Events raised during the current machine call, emitted once it returns.
    pub outbox: Vec<GameEvent>,
}

impl PlayerContext {
    fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            health: Health::full(),
            facing: Facing::Right,
            input: InputSnapshot::empty(),
            flash: None,
            commands: BodyCommands::default(),
            outbox: Vec::new(),
        }
    }

    /// Turn and move by the held direction. Returns false when none is held.
    fn steer(&mut self) -> bool {
        let speed = self.config.walk_speed;
        let velocity = if self.input.left {
            self.facing = Facing::Left;
            -speed
        } else if self.input.right {
            self.facing = Facing::Right;
            speed
        } else {
            return false;
        };
        self.commands.push(BodyCommand::SetFlipX(self.facing.flip_x()));
        self.commands.push(BodyCommand::SetVelocityX(velocity));
        true
    }
}

// ---------------------------------------------------------------------------
// State callbacks
// ---------------------------------------------------------------------------

fn idle_on_enter(ctx: &mut PlayerContext, _: (), _: &mut Transitions) {
    ctx.commands.push(BodyCommand::Play(ANIM_IDLE));
}

fn idle_on_update(ctx: &mut PlayerContext, _dt: f32, t: &mut Transitions) {
    if ctx.input.any_direction() {
        t.go(WALK);
    }
    if ctx.input.jump_pressed {
        t.go(JUMP);
    }
}

fn walk_on_enter(ctx: &mut PlayerContext, _: (), _: &mut Transitions) {
    ctx.commands.push(BodyCommand::Play(ANIM_WALK));
}

fn walk_on_update(ctx: &mut PlayerContext, _dt: f32, t: &mut Transitions) {
    if !ctx.steer() {
        ctx.commands.push(BodyCommand::SetVelocityX(0.0));
        t.go(IDLE);
    }
    if ctx.input.jump_pressed {
        t.go(JUMP);
    }
}

fn jump_on_enter(ctx: &mut PlayerContext, _: (), _: &mut Transitions) {
    ctx.commands.push(BodyCommand::Play(ANIM_JUMP));
    ctx.commands
        .push(BodyCommand::SetVelocityY(-ctx.config.jump_impulse));
}

// Air control only; landing is driven by terrain contacts.
fn jump_on_update(ctx: &mut PlayerContext, _dt: f32, _: &mut Transitions) {
    ctx.steer();
}

fn spike_hit_on_enter(ctx: &mut PlayerContext, _: (), _: &mut Transitions) {
    ctx.commands
        .push(BodyCommand::SetVelocityY(-ctx.config.spike_knockback));
    let health = ctx.health.apply(ctx.config.spike_damage.saturating_neg());
    ctx.outbox.push(GameEvent::HealthChanged(health));
    ctx.flash = Some(ColorFlash::hit());
}

fn spike_hit_on_update(_: &mut PlayerContext, _dt: f32, t: &mut Transitions) {
    t.go(IDLE);
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Drives the player body from input, contacts and its state machine.
pub struct PlayerControl {
    body: Entity,
    fsm: StateMachine<PlayerContext>,
    ctx: PlayerContext,
    bus: Rc<EventBus>,
}

impl PlayerControl {
    /// Build the machine and enter `idle`.
    pub fn new(
        body: Entity,
        config: PlayerConfig,
        bus: Rc<EventBus>,
        world: &mut World,
        animations: &AnimationLibrary,
    ) -> Result<Self, FsmError> {
        let mut fsm = StateMachine::new("penguin");
        fsm.add_state(
            IDLE,
            State::new()
                .on_enter(idle_on_enter)
                .on_update(idle_on_update),
        )?
        .add_state(
            WALK,
            State::new()
                .on_enter(walk_on_enter)
                .on_update(walk_on_update),
        )?
        .add_state(
            JUMP,
            State::new()
                .on_enter(jump_on_enter)
                .on_update(jump_on_update),
        )?
        .add_state(
            SPIKE_HIT,
            State::new()
                .on_enter(spike_hit_on_enter)
                .on_update(spike_hit_on_update),
        )?;

        let mut control = Self {
            body,
            fsm,
            ctx: PlayerContext::new(config),
            bus,
        };
        control.fsm.set_state(&mut control.ctx, IDLE)?;
        control.flush(world, animations);
        Ok(control)
    }

    pub fn body(&self) -> Entity {
        self.body
    }

    pub fn health(&self) -> u8 {
        self.ctx.health.value()
    }

    pub fn facing(&self) -> Facing {
        self.ctx.facing
    }

    pub fn state(&self) -> Option<&str> {
        self.fsm.current_state()
    }

    pub fn is_state(&self, name: &str) -> Result<bool, FsmError> {
        self.fsm.is_current_state(name)
    }

    pub fn is_flashing(&self) -> bool {
        self.ctx.flash.is_some()
    }

    /// Run one tick: state update, then the hit flash.
    pub fn update(
        &mut self,
        dt: f32,
        input: InputSnapshot,
        world: &mut World,
        animations: &AnimationLibrary,
    ) -> Result<(), FsmError> {
        self.ctx.input = input;
        let result = self.fsm.update(&mut self.ctx, dt);
        self.advance_flash(dt);
        self.flush(world, animations);
        result
    }

    /// React to one contact involving the player body.
    ///
    /// Spikes win over everything else in the same contact. Terrain only
    /// matters for landing out of a jump. Pickups are consumed and despawned.
    pub fn handle_collision(
        &mut self,
        pair: &CollisionPair,
        world: &mut World,
        obstacles: &ObstacleRegistry,
        animations: &AnimationLibrary,
    ) -> Result<(), FsmError> {
        let Some(other) = pair.other(self.body) else {
            return Ok(());
        };

        if obstacles.is(SPIKES, pair.body_a) || obstacles.is(SPIKES, pair.body_b) {
            let result = self.fsm.set_state(&mut self.ctx, SPIKE_HIT);
            self.flush(world, animations);
            return result;
        }

        if pair.terrain || world.get::<&Terrain>(other).is_ok() {
            if self.fsm.is_current_state(JUMP)? {
                let result = self.fsm.set_state(&mut self.ctx, IDLE);
                self.flush(world, animations);
                return result;
            }
            return Ok(());
        }

        let pickup = world.get::<&Pickup>(other).map(|p| *p).ok();
        match pickup {
            Some(Pickup::Star) => {
                self.ctx.outbox.push(GameEvent::StarCollected);
            }
            Some(Pickup::Health { gain }) => {
                let health = self.ctx.health.apply(gain);
                self.ctx.outbox.push(GameEvent::HealthChanged(health));
            }
            None => return Ok(()),
        }
        debug!(?other, ?pickup, "pickup consumed");
        let _ = world.despawn(other);
        self.flush(world, animations);
        Ok(())
    }

    fn advance_flash(&mut self, dt: f32) {
        let Some(flash) = self.ctx.flash.as_mut() else {
            return;
        };
        let tint = flash.advance(dt);
        if flash.is_finished() {
            self.ctx.flash = None;
            self.ctx.commands.push(BodyCommand::ClearTint);
        } else {
            self.ctx.commands.push(BodyCommand::SetTint(tint));
        }
    }

    /// Push queued body writes to the world and queued events to the bus.
    fn flush(&mut self, world: &mut World, animations: &AnimationLibrary) {
        self.ctx.commands.apply(world, self.body, animations);
        for event in self.ctx.outbox.drain(..) {
            self.bus.emit(&event);
        }
    }
}
