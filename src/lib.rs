//! Roach Stomp - shake the phone, flatten the cockroaches
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, steering, hit detection, reaping)
//! - `session`: Score, best score and level progression
//! - `scheduler`: Fixed-interval tick timers
//! - `game`: One running session wiring the simulation to its collaborators
//! - `motion`: Accelerometer samples and shake trigger derivation
//! - `persistence`: Best-score storage backends
//! - `audio`: Sound cue sinks
//! - `render`: Frame snapshots handed to the renderer
//! - `config`: Tuning presets and validation
//! - `platform`: Wall clock and frame deltas
//! - `web`: Browser bindings (wasm32 only)

pub mod audio;
pub mod config;
pub mod game;
pub mod motion;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, GameConfig, Preset};
pub use game::{Collaborators, Game};
pub use session::Session;

/// Game constants that are not part of the tunable config
pub mod consts {
    /// Width of a large cockroach sprite (1 point)
    pub const LARGE_ROACH_PX: f32 = 80.0;
    /// Width of a small cockroach sprite (2 points)
    pub const SMALL_ROACH_PX: f32 = 50.0;
    /// Sprite height as a fraction of its width
    pub const ROACH_ASPECT: f32 = 0.6;

    /// Shoe hitbox, anchored at its top-left corner
    pub const SHOE_X: f32 = 0.0;
    pub const SHOE_WIDTH: f32 = 340.0;
    pub const SHOE_HEIGHT: f32 = 640.0 * 0.6;
    /// Visual centre of the shoe relative to its anchor (what roaches steer at)
    pub const SHOE_CENTER_X: f32 = 170.0;
    pub const SHOE_CENTER_Y: f32 = 320.0;
    /// Shoe rest position, measured up from the bottom of the screen
    pub const SHOE_REST_FROM_BOTTOM: f32 = 550.0;

    /// Stomp animation: down by 200 px, then back up by 100 px, 50 ms each
    pub const STOMP_DEPTH: f32 = 200.0;
    pub const STOMP_RETURN_DEPTH: f32 = 100.0;
    pub const STOMP_PHASE_MS: u64 = 50;

    /// Squashed roaches drop by this much and fade to half opacity
    pub const DEATH_DROP_PX: f32 = 20.0;
    pub const DEATH_OPACITY: f32 = 0.5;

    /// How long the level-up and new-record badges stay up
    pub const CELEBRATION_MS: u64 = 3000;

    /// Longest slice of simulated time a single advance may cover
    pub const MAX_FRAME_MS: u64 = 250;

    /// Persistence key for the best score
    pub const BEST_SCORE_KEY: &str = "bestScore";
}

/// Axis-aligned rectangle in screen pixels, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Standard AABB overlap. Touching edges count as overlapping; the
    /// rectangles only miss when fully separated on one axis.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() < other.x
            || self.x > other.right()
            || self.bottom() < other.y
            || self.y > other.bottom())
    }
}

/// Playfield size in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Bounds {
    /// A typical portrait phone viewport
    fn default() -> Self {
        Self::new(390.0, 844.0)
    }
}
