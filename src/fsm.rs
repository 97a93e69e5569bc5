use std::collections::{HashMap, VecDeque};

use thiserror::Error;
use tracing::debug;

/// Upper bound on transitions processed by a single `set_state`/`update` call.
/// A callback chain that keeps requesting new states past this is a loop.
pub const MAX_CHAINED_TRANSITIONS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("state machine '{machine}' has no state named '{state}'")]
    UnknownState { machine: String, state: String },
    #[error("state machine '{machine}' already has a state named '{state}'")]
    DuplicateState { machine: String, state: String },
    #[error("state machine '{machine}' exceeded {limit} chained transitions (last target '{state}')")]
    TransitionLoop {
        machine: String,
        state: String,
        limit: usize,
    },
}

pub type EnterFn<C, A> = Box<dyn FnMut(&mut C, A, &mut Transitions<A>)>;
pub type UpdateFn<C, A> = Box<dyn FnMut(&mut C, f32, &mut Transitions<A>)>;
pub type ExitFn<C> = Box<dyn FnMut(&mut C)>;

/// Callbacks for one named state. Any of them may be missing.
pub struct State<C, A = ()> {
    on_enter: Option<EnterFn<C, A>>,
    on_update: Option<UpdateFn<C, A>>,
    on_exit: Option<ExitFn<C>>,
}

impl<C, A> State<C, A> {
    pub fn new() -> Self {
        Self {
            on_enter: None,
            on_update: None,
            on_exit: None,
        }
    }

    pub fn on_enter(mut self, f: impl FnMut(&mut C, A, &mut Transitions<A>) + 'static) -> Self {
        self.on_enter = Some(Box::new(f));
        self
    }

    /// `f` receives the tick delta in milliseconds.
    pub fn on_update(mut self, f: impl FnMut(&mut C, f32, &mut Transitions<A>) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn on_exit(mut self, f: impl FnMut(&mut C) + 'static) -> Self {
        self.on_exit = Some(Box::new(f));
        self
    }
}

impl<C, A> Default for State<C, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Transition requests made from inside a callback.
///
/// The machine drains them in FIFO order right after the callback returns,
/// before the outer `set_state`/`update` call completes.
pub struct Transitions<A = ()> {
    queue: VecDeque<(String, A)>,
}

impl<A> Transitions<A> {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn go_with(&mut self, name: impl Into<String>, args: A) {
        self.queue.push_back((name.into(), args));
    }
}

impl<A: Default> Transitions<A> {
    pub fn go(&mut self, name: impl Into<String>) {
        self.go_with(name, A::default());
    }
}

/// Named-state machine driving one entity.
///
/// `C` is the context the callbacks run against (the controller's data) and
/// `A` the argument type forwarded to `on_enter`. The machine does not own the
/// context: every call that may run callbacks takes it as `&mut C`.
///
/// # Usage
/// ```
/// use snowdrift::fsm::{State, StateMachine};
///
/// let mut fsm: StateMachine<u32> = StateMachine::new("counter");
/// fsm.add_state("idle", State::new())
///     .unwrap()
///     .add_state("busy", State::new().on_update(|n: &mut u32, _dt, _| *n += 1))
///     .unwrap();
///
/// let mut count = 0;
/// fsm.set_state(&mut count, "busy").unwrap();
/// fsm.update(&mut count, 16.0).unwrap();
/// assert_eq!(count, 1);
/// ```
pub struct StateMachine<C, A = ()> {
    id: String,
    states: HashMap<String, State<C, A>>,
    active: Option<String>,
    previous: Option<String>,
    /// Milliseconds spent in the active state. Reset on each transition.
    elapsed: f32,
}

impl<C, A> StateMachine<C, A> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            states: HashMap::new(),
            active: None,
            previous: None,
            elapsed: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Register `state` under `name`. Names are unique per machine.
    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        state: State<C, A>,
    ) -> Result<&mut Self, FsmError> {
        let name = name.into();
        if self.states.contains_key(&name) {
            return Err(FsmError::DuplicateState {
                machine: self.id.clone(),
                state: name,
            });
        }
        self.states.insert(name, state);
        Ok(self)
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn current_state(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn previous_state(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_current_state(&self, name: &str) -> Result<bool, FsmError> {
        if !self.states.contains_key(name) {
            return Err(self.unknown(name));
        }
        Ok(self.active.as_deref() == Some(name))
    }

    pub fn set_state_with(&mut self, ctx: &mut C, name: &str, args: A) -> Result<(), FsmError> {
        let mut pending = Transitions::new();
        pending.go_with(name, args);
        self.drain(ctx, pending)
    }

    /// Run the active state's `on_update`, then any transitions it requested.
    pub fn update(&mut self, ctx: &mut C, dt: f32) -> Result<(), FsmError> {
        let mut pending = Transitions::new();
        if let Some(active) = self.active.as_deref() {
            self.elapsed += dt;
            if let Some(on_update) = self
                .states
                .get_mut(active)
                .and_then(|state| state.on_update.as_mut())
            {
                on_update(ctx, dt, &mut pending);
            }
        }
        self.drain(ctx, pending)
    }

    fn drain(&mut self, ctx: &mut C, mut pending: Transitions<A>) -> Result<(), FsmError> {
        let mut processed = 0;
        while let Some((name, args)) = pending.queue.pop_front() {
            processed += 1;
            if processed > MAX_CHAINED_TRANSITIONS {
                return Err(FsmError::TransitionLoop {
                    machine: self.id.clone(),
                    state: name,
                    limit: MAX_CHAINED_TRANSITIONS,
                });
            }
            self.transition(ctx, name, args, &mut pending)?;
        }
        Ok(())
    }

    fn transition(
        &mut self,
        ctx: &mut C,
        name: String,
        args: A,
        pending: &mut Transitions<A>,
    ) -> Result<(), FsmError> {
        if !self.states.contains_key(&name) {
            return Err(self.unknown(&name));
        }
        if self.active.as_deref() == Some(name.as_str()) {
            return Ok(());
        }

        if let Some(current) = self.active.take() {
            if let Some(on_exit) = self
                .states
                .get_mut(&current)
                .and_then(|state| state.on_exit.as_mut())
            {
                on_exit(ctx);
            }
            self.previous = Some(current);
        }

        debug!(
            machine = %self.id,
            from = self.previous.as_deref().unwrap_or("<none>"),
            to = %name,
            "state change"
        );

        self.elapsed = 0.0;
        if let Some(on_enter) = self
            .states
            .get_mut(&name)
            .and_then(|state| state.on_enter.as_mut())
        {
            on_enter(ctx, args, pending);
        }
        self.active = Some(name);
        Ok(())
    }

    fn unknown(&self, name: &str) -> FsmError {
        FsmError::UnknownState {
            machine: self.id.clone(),
            state: name.to_string(),
        }
    }
}

impl<C, A: Default> StateMachine<C, A> {
    /// Switch to `name`. Switching to the active state is a no-op.
    pub fn set_state(&mut self, ctx: &mut C, name: &str) -> Result<(), FsmError> {
        self.set_state_with(ctx, name, A::default())
    }
}
