use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::WandererConfig;
use crate::engine::animation::{AnimationDef, AnimationLibrary};
use crate::fsm::{FsmError, State, StateMachine, Transitions};
use crate::systems::commands::{BodyCommand, BodyCommands};

pub const IDLE: &str = "idle";
pub const MOVE_LEFT: &str = "move-left";
pub const MOVE_RIGHT: &str = "move-right";
pub const DEAD: &str = "dead";

pub const ANIM_IDLE: &str = "idle";
pub const ANIM_WALK_LEFT: &str = "walk-left";
pub const ANIM_WALK_RIGHT: &str = "walk-right";

pub fn register_animations(library: &mut AnimationLibrary) {
    library.register(AnimationDef::still(ANIM_IDLE, "snowman_left_1.png"));
    library.register(AnimationDef::numbered(
        ANIM_WALK_LEFT,
        "snowman_left_",
        1,
        2,
        ".png",
        5.0,
    ));
    library.register(AnimationDef::numbered(
        ANIM_WALK_RIGHT,
        "snowman_right_",
        1,
        2,
        ".png",
        5.0,
    ));
}

pub struct WandererContext {
    pub config: WandererConfig,
    /// Time spent walking in the current direction, ms.
    pub move_timer: f32,
    pub rng: ChaCha8Rng,
    pub commands: BodyCommands,
}

fn idle_on_enter(ctx: &mut WandererContext, _: (), _: &mut Transitions) {
    ctx.commands.push(BodyCommand::Play(ANIM_IDLE));
}

fn idle_on_update(ctx: &mut WandererContext, _dt: f32, t: &mut Transitions) {
    let bias = match ctx.config.left_bias {
        b if b.is_nan() => 0.5,
        b => b.clamp(0.0, 1.0),
    };
    if ctx.rng.gen_bool(bias) {
        t.go(MOVE_LEFT);
    } else {
        t.go(MOVE_RIGHT);
    }
}

fn walk(
    ctx: &mut WandererContext,
    dt: f32,
    t: &mut Transitions,
    direction: f32,
    turn_to: &'static str,
) {
    ctx.move_timer += dt;
    ctx.commands
        .push(BodyCommand::SetVelocityX(direction * ctx.config.speed));
    if ctx.move_timer > ctx.config.move_duration_ms {
        t.go(turn_to);
    }
}

fn move_left_on_enter(ctx: &mut WandererContext, _: (), _: &mut Transitions) {
    ctx.move_timer = 0.0;
    ctx.commands.push(BodyCommand::Play(ANIM_WALK_LEFT));
}

fn move_left_on_update(ctx: &mut WandererContext, dt: f32, t: &mut Transitions) {
    walk(ctx, dt, t, -1.0, MOVE_RIGHT);
}

fn move_right_on_enter(ctx: &mut WandererContext, _: (), _: &mut Transitions) {
    ctx.move_timer = 0.0;
    ctx.commands.push(BodyCommand::Play(ANIM_WALK_RIGHT));
}

fn move_right_on_update(ctx: &mut WandererContext, dt: f32, t: &mut Transitions) {
    walk(ctx, dt, t, 1.0, MOVE_LEFT);
}

/// Patrols left and right on a timer; stops for good once killed.
pub struct WandererControl {
    body: Entity,
    fsm: StateMachine<WandererContext>,
    ctx: WandererContext,
}

impl WandererControl {
    pub fn new(
        body: Entity,
        config: WandererConfig,
        rng: ChaCha8Rng,
        world: &mut World,
        animations: &AnimationLibrary,
    ) -> Result<Self, FsmError> {
        let mut fsm = StateMachine::new("snowman");
        fsm.add_state(
            IDLE,
            State::new()
                .on_enter(idle_on_enter)
                .on_update(idle_on_update),
        )?
        .add_state(
            MOVE_LEFT,
            State::new()
                .on_enter(move_left_on_enter)
                .on_update(move_left_on_update),
        )?
        .add_state(
            MOVE_RIGHT,
            State::new()
                .on_enter(move_right_on_enter)
                .on_update(move_right_on_update),
        )?
        .add_state(DEAD, State::new())?;

        let mut control = Self {
            body,
            fsm,
            ctx: WandererContext {
                config,
                move_timer: 0.0,
                rng,
                commands: BodyCommands::default(),
            },
        };
        control.fsm.set_state(&mut control.ctx, IDLE)?;
        control.ctx.commands.apply(world, body, animations);
        Ok(control)
    }

    pub fn body(&self) -> Entity {
        self.body
    }

    pub fn state(&self) -> Option<&str> {
        self.fsm.current_state()
    }

    pub fn move_timer(&self) -> f32 {
        self.ctx.move_timer
    }

    pub fn is_dead(&self) -> bool {
        self.fsm.current_state() == Some(DEAD)
    }

    pub fn update(
        &mut self,
        dt: f32,
        world: &mut World,
        animations: &AnimationLibrary,
    ) -> Result<(), FsmError> {
        let result = self.fsm.update(&mut self.ctx, dt);
        self.ctx.commands.apply(world, self.body, animations);
        result
    }

    pub fn kill(&mut self) -> Result<(), FsmError> {
        self.fsm.set_state(&mut self.ctx, DEAD)
    }
}
