use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

/// Gameplay notifications that cross entity boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    StarCollected,
    /// New player health, 0..=100.
    HealthChanged(u8),
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::StarCollected => EventKind::StarCollected,
            Self::HealthChanged(_) => EventKind::HealthChanged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StarCollected,
    HealthChanged,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StarCollected => "star-collected",
            Self::HealthChanged => "health-changed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Identifies the component a group of listeners belongs to, so they can be
/// removed together on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

pub type Listener = Rc<dyn Fn(&GameEvent)>;

struct Registration {
    id: ListenerId,
    owner: OwnerId,
    listener: Listener,
}

/// Synchronous publish/subscribe channel, one per game session.
///
/// Shared as `Rc<EventBus>`; all methods take `&self`. `emit` calls listeners
/// from a snapshot of the list taken when the emit starts: listeners added
/// during an emit first fire on the next one, and a listener removed during an
/// emit still receives the event in flight. A panicking listener is not caught.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<HashMap<EventKind, Vec<Registration>>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_owner(&self) -> OwnerId {
        OwnerId(self.bump())
    }

    /// Registering the same closure twice makes it fire twice.
    pub fn on(
        &self,
        kind: EventKind,
        owner: OwnerId,
        listener: impl Fn(&GameEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.bump());
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Registration {
                id,
                owner,
                listener: Rc::new(listener),
            });
        id
    }

    /// Returns false when nothing matched.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(&kind) else {
            return false;
        };
        match list.iter().position(|reg| reg.id == id) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every listener registered by `owner`. Returns how many went.
    pub fn off_owner(&self, owner: OwnerId) -> usize {
        let mut removed = 0;
        for list in self.listeners.borrow_mut().values_mut() {
            let before = list.len();
            list.retain(|reg| reg.owner != owner);
            removed += before - list.len();
        }
        removed
    }

    pub fn emit(&self, event: &GameEvent) {
        let snapshot: Vec<Listener> = match self.listeners.borrow().get(&event.kind()) {
            Some(list) => list.iter().map(|reg| Rc::clone(&reg.listener)).collect(),
            None => return,
        };
        debug!(event = event.kind().as_str(), listeners = snapshot.len(), "emit");
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    fn bump(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}
