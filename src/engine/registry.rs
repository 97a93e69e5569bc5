use std::collections::{HashMap, HashSet};

use hecs::Entity;

pub const SPIKES: &str = "spikes";
pub const SNOWMAN: &str = "snowman";

/// Semantic categories for physics bodies, queried while resolving collisions.
#[derive(Default)]
pub struct ObstacleRegistry {
    categories: HashMap<String, HashSet<Entity>>,
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering the same pair twice has no further effect.
    pub fn add(&mut self, category: &str, body: Entity) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(body);
    }

    pub fn is(&self, category: &str, body: Entity) -> bool {
        self.categories
            .get(category)
            .is_some_and(|bodies| bodies.contains(&body))
    }

    pub fn remove(&mut self, category: &str, body: Entity) -> bool {
        self.categories
            .get_mut(category)
            .is_some_and(|bodies| bodies.remove(&body))
    }

    /// Drop `body` from every category, e.g. when it is despawned.
    pub fn remove_body(&mut self, body: Entity) {
        for bodies in self.categories.values_mut() {
            bodies.remove(&body);
        }
    }

    pub fn len(&self, category: &str) -> usize {
        self.categories.get(category).map_or(0, HashSet::len)
    }
}
