//! Game tuning and presets
//!
//! Every balance knob lives in [`GameConfig`]. The three historical tunings of
//! the game are kept as [`Preset`]s rather than separate loops.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Fast 60 Hz movement, tight caps, difficulty ramp
    #[default]
    Arcade,
    /// 10 Hz movement, no dead cap, no ramp
    Classic,
    /// Slow spawning, loose alive cap
    Prototype,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Arcade => "Arcade",
            Preset::Classic => "Classic",
            Preset::Prototype => "Prototype",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arcade" => Some(Preset::Arcade),
            "classic" => Some(Preset::Classic),
            "prototype" | "proto" => Some(Preset::Prototype),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be greater than 0")]
    NotPositive { field: &'static str },
    #[error("hit_threshold must be positive and finite")]
    InvalidHitThreshold,
    #[error("{field} must be finite and at least {min}")]
    OutOfRange { field: &'static str, min: f32 },
    #[error("min_spawn_interval_factor must be within (0, 1]")]
    InvalidSpawnFactor,
    #[error("{band} speed band is inverted or negative ({min}..{max})")]
    InvalidSpeedBand {
        band: &'static str,
        min: f32,
        max: f32,
    },
}

/// Full game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Population caps ===
    /// Spawning stops while this many roaches are alive
    pub max_alive: usize,
    /// Spawning stops while this many corpses are on screen
    pub max_dead: usize,

    // === Tick intervals (ms) ===
    /// Base spawn interval before the difficulty ramp shortens it
    pub spawn_interval_ms: u64,
    pub move_interval_ms: u64,
    pub reap_interval_ms: u64,
    /// Game clock (one difficulty second per tick)
    pub clock_interval_ms: u64,
    /// Accelerometer sampling interval requested from the host
    pub motion_interval_ms: u64,

    // === Gameplay ===
    /// Minimum z-axis jump between samples that counts as a stomp
    pub hit_threshold: f32,
    /// Corpses older than this (since spawn) are evicted
    pub retention_ms: u64,
    pub points_per_level: u32,
    pub max_level: u32,

    // === Difficulty ===
    /// Seconds for the speed multiplier to gain +1x
    pub difficulty_ramp_secs: f32,
    pub max_speed_multiplier: f32,
    /// Seconds for the spawn interval to shrink to zero before the floor applies
    pub spawn_ramp_secs: f32,
    pub min_spawn_interval_factor: f32,

    // === Motion ===
    /// Initial per-axis speed band at spawn (px per move tick)
    pub spawn_speed_min: f32,
    pub spawn_speed_max: f32,
    /// Homing speed band (px per move tick, before the multiplier)
    pub steer_speed_min: f32,
    pub steer_speed_max: f32,
    /// Per-axis noise added to the homing velocity
    pub steer_jitter: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Arcade)
    }
}

impl GameConfig {
    /// Build the config for a tuning preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Arcade => Self {
                max_alive: 12,
                max_dead: 8,
                spawn_interval_ms: 600,
                move_interval_ms: 16,
                reap_interval_ms: 2000,
                clock_interval_ms: 1000,
                motion_interval_ms: 16,
                hit_threshold: 1.2,
                retention_ms: 5000,
                points_per_level: 20,
                max_level: 50,
                difficulty_ramp_secs: 30.0,
                max_speed_multiplier: 3.0,
                spawn_ramp_secs: 60.0,
                min_spawn_interval_factor: 0.3,
                spawn_speed_min: 4.0,
                spawn_speed_max: 10.0,
                steer_speed_min: 4.0,
                steer_speed_max: 8.0,
                steer_jitter: 0.15,
            },
            Preset::Classic => Self {
                max_alive: 15,
                max_dead: usize::MAX,
                spawn_interval_ms: 800,
                move_interval_ms: 100,
                motion_interval_ms: 50,
                hit_threshold: 1.5,
                max_speed_multiplier: 1.0,
                min_spawn_interval_factor: 1.0,
                steer_speed_min: 4.0,
                steer_speed_max: 12.0,
                steer_jitter: 0.25,
                spawn_speed_max: 12.0,
                ..Self::from_preset(Preset::Arcade)
            },
            Preset::Prototype => Self {
                // Uncapped in play; validate() needs a positive bound
                max_alive: 30,
                spawn_interval_ms: 2000,
                ..Self::from_preset(Preset::Classic)
            },
        }
    }

    /// Parse a config from JSON. Missing fields fall back to the Arcade preset.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_alive", self.max_alive as u64),
            ("max_dead", self.max_dead as u64),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("move_interval_ms", self.move_interval_ms),
            ("reap_interval_ms", self.reap_interval_ms),
            ("clock_interval_ms", self.clock_interval_ms),
            ("motion_interval_ms", self.motion_interval_ms),
            ("points_per_level", u64::from(self.points_per_level)),
            ("max_level", u64::from(self.max_level)),
        ];
        if let Some(&(field, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::NotPositive { field });
        }

        if !self.hit_threshold.is_finite() || self.hit_threshold <= 0.0 {
            return Err(ConfigError::InvalidHitThreshold);
        }

        let ranged = [
            ("difficulty_ramp_secs", self.difficulty_ramp_secs, f32::MIN_POSITIVE),
            ("spawn_ramp_secs", self.spawn_ramp_secs, f32::MIN_POSITIVE),
            ("max_speed_multiplier", self.max_speed_multiplier, 1.0),
            ("steer_jitter", self.steer_jitter, 0.0),
        ];
        for (field, value, min) in ranged {
            if !value.is_finite() || value < min {
                return Err(ConfigError::OutOfRange { field, min });
            }
        }

        let factor = self.min_spawn_interval_factor;
        if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
            return Err(ConfigError::InvalidSpawnFactor);
        }

        for (band, min, max) in [
            ("spawn", self.spawn_speed_min, self.spawn_speed_max),
            ("steer", self.steer_speed_min, self.steer_speed_max),
        ] {
            if !min.is_finite() || !max.is_finite() || min < 0.0 || min >= max {
                return Err(ConfigError::InvalidSpeedBand { band, min, max });
            }
        }

        Ok(())
    }
}
