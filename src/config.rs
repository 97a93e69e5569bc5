use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid value for {field} in {path}: {reason}")]
    Invalid {
        path: PathBuf,
        field: &'static str,
        reason: String,
    },
}

/// Tunables for one game session. Every field has a default, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub wanderer: WandererConfig,
    /// Health restored by a health pickup.
    pub health_gain: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            wanderer: WandererConfig::default(),
            health_gain: 25,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config
            .validate()
            .map_err(|(field, reason)| ConfigError::Invalid {
                path: path.to_path_buf(),
                field,
                reason,
            })?;
        Ok(config)
    }

    /// Reject values the controllers cannot run with.
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        let player = &self.player;
        finite("player.walk_speed", player.walk_speed)?;
        finite("player.jump_impulse", player.jump_impulse)?;
        finite("player.spike_knockback", player.spike_knockback)?;
        non_negative("player.spike_damage", player.spike_damage)?;
        non_negative("health_gain", self.health_gain)?;

        let wanderer = &self.wanderer;
        finite("wanderer.speed", wanderer.speed)?;
        finite("wanderer.move_duration_ms", wanderer.move_duration_ms)?;
        if !(0.0..=1.0).contains(&wanderer.left_bias) {
            return Err((
                "wanderer.left_bias",
                format!("{} is not within 0..=1", wanderer.left_bias),
            ));
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), (&'static str, String)> {
    if value.is_finite() {
        Ok(())
    } else {
        Err((field, format!("{value} is not a finite number")))
    }
}

fn non_negative(field: &'static str, value: i32) -> Result<(), (&'static str, String)> {
    if value >= 0 {
        Ok(())
    } else {
        Err((field, format!("{value} is negative")))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal speed while walking or steering in the air.
    pub walk_speed: f32,
    /// Upward velocity applied on jump.
    pub jump_impulse: f32,
    /// Upward velocity applied when hitting spikes.
    pub spike_knockback: f32,
    pub spike_damage: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            jump_impulse: 9.0,
            spike_knockback: 10.0,
            spike_damage: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WandererConfig {
    pub speed: f32,
    /// Time spent walking one way before turning around, ms.
    pub move_duration_ms: f32,
    /// Chance of heading left when leaving idle.
    pub left_bias: f64,
}

impl Default for WandererConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            move_duration_ms: 2000.0,
            left_bias: 0.5,
        }
    }
}
