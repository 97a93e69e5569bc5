use std::collections::HashMap;

/// A named sprite animation. Playback itself belongs to the renderer; the
/// controllers only ask for an animation by key.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDef {
    pub key: &'static str,
    pub frames: Vec<String>,
    pub frame_rate: f32,
    pub looping: bool,
}

impl AnimationDef {
    /// A one-frame animation.
    pub fn still(key: &'static str, frame: &str) -> Self {
        Self {
            key,
            frames: vec![frame.to_string()],
            frame_rate: 0.0,
            looping: false,
        }
    }

    /// Frames `{prefix}{start}{suffix}` through `{prefix}{end}{suffix}`, looped.
    pub fn numbered(
        key: &'static str,
        prefix: &str,
        start: u32,
        end: u32,
        suffix: &str,
        frame_rate: f32,
    ) -> Self {
        Self {
            key,
            frames: (start..=end)
                .map(|n| format!("{prefix}{n}{suffix}"))
                .collect(),
            frame_rate,
            looping: true,
        }
    }
}

#[derive(Default)]
pub struct AnimationLibrary {
    defs: HashMap<&'static str, AnimationDef>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later definitions with the same key replace earlier ones.
    pub fn register(&mut self, def: AnimationDef) {
        self.defs.insert(def.key, def);
    }

    pub fn get(&self, key: &str) -> Option<&AnimationDef> {
        self.defs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.defs.contains_key(key)
    }
}
