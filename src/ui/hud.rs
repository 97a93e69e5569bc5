use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::components::MAX_HEALTH;
use crate::engine::events::{EventBus, EventKind, GameEvent, OwnerId};
use crate::engine::tween::ValueTween;

pub const BAR_WIDTH: f32 = 200.0;
pub const BAR_TWEEN_MS: f32 = 200.0;
/// At or below this fraction of full health the bar turns red.
pub const LOW_HEALTH: f32 = 0.2;

pub const BAR_LOW: u32 = 0xff0000;
pub const BAR_OK: u32 = 0x00ff00;

/// Eased health bar. Draw state only; the renderer reads `fill`.
pub struct HealthBar {
    last_target: f32,
    displayed: f32,
    tween: Option<ValueTween>,
}

impl HealthBar {
    pub fn new(value: f32) -> Self {
        Self {
            last_target: value,
            displayed: value,
            tween: None,
        }
    }

    /// Start easing from the previous target toward `value`.
    pub fn set_target(&mut self, value: f32) {
        self.tween = Some(ValueTween::new(self.last_target, value, BAR_TWEEN_MS));
        self.last_target = value;
    }

    pub fn advance(&mut self, dt: f32) {
        if let Some(tween) = self.tween.as_mut() {
            self.displayed = tween.advance(dt);
            if tween.is_finished() {
                self.tween = None;
            }
        }
    }

    pub fn displayed(&self) -> f32 {
        self.displayed
    }

    pub fn percent(&self) -> f32 {
        self.displayed.clamp(0.0, f32::from(MAX_HEALTH)) / f32::from(MAX_HEALTH)
    }

    /// Width and color of the foreground rect, or `None` when empty.
    pub fn fill(&self) -> Option<(f32, u32)> {
        let percent = self.percent();
        if percent <= 0.0 {
            None
        } else if percent <= LOW_HEALTH {
            Some((BAR_WIDTH * percent, BAR_LOW))
        } else {
            Some((BAR_WIDTH * percent, BAR_OK))
        }
    }
}

/// Score label and health bar, fed by the event bus.
pub struct Hud {
    stars: u32,
    health_bar: HealthBar,
    owner: Option<OwnerId>,
    bus: Weak<EventBus>,
}

impl Hud {
    /// Create the HUD and subscribe it to star and health events.
    pub fn attach(bus: &Rc<EventBus>) -> Rc<RefCell<Hud>> {
        let owner = bus.new_owner();
        let hud = Rc::new(RefCell::new(Hud {
            stars: 0,
            health_bar: HealthBar::new(f32::from(MAX_HEALTH)),
            owner: Some(owner),
            bus: Rc::downgrade(bus),
        }));

        for kind in [EventKind::StarCollected, EventKind::HealthChanged] {
            let weak = Rc::downgrade(&hud);
            bus.on(kind, owner, move |event| {
                if let Some(hud) = weak.upgrade() {
                    hud.borrow_mut().handle(event);
                }
            });
        }
        hud
    }

    /// Unsubscribe every listener this HUD registered. Safe to call twice.
    pub fn detach(&mut self) {
        if let (Some(owner), Some(bus)) = (self.owner.take(), self.bus.upgrade()) {
            bus.off_owner(owner);
        }
    }

    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::StarCollected => self.stars += 1,
            GameEvent::HealthChanged(value) => self.health_bar.set_target(f32::from(*value)),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.health_bar.advance(dt);
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    pub fn stars_label(&self) -> String {
        format!("Stars: {}", self.stars)
    }

    pub fn health_bar(&self) -> &HealthBar {
        &self.health_bar
    }
}

impl Drop for Hud {
    fn drop(&mut self) {
        self.detach();
    }
}
