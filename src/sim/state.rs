//! Game state and core simulation types
//!
//! The swarm is the only owner of roach records. Everything else refers to
//! roaches by [`RoachId`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::shoe::Shoe;
use crate::consts::*;
use crate::{Bounds, Rect};

/// Roach identity, unique for the lifetime of a swarm
pub type RoachId = u32;

/// Size class, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoachSize {
    Large,
    /// Harder to hit, worth double
    Small,
}

impl RoachSize {
    /// Sprite width in pixels
    pub fn px(&self) -> f32 {
        match self {
            RoachSize::Large => LARGE_ROACH_PX,
            RoachSize::Small => SMALL_ROACH_PX,
        }
    }

    /// Points awarded for squashing one
    pub fn points(&self) -> u32 {
        match self {
            RoachSize::Large => 1,
            RoachSize::Small => 2,
        }
    }
}

/// Roach lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoachState {
    /// Steering toward the shoe and eligible for hits
    Alive,
    /// Flattened at the given simulation time; frozen until reaped
    Squashed { at_ms: u64 },
}

/// A cockroach
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roach {
    pub id: RoachId,
    pub pos: Vec2,
    /// Pixels per move tick
    pub vel: Vec2,
    pub size: RoachSize,
    pub state: RoachState,
    /// Render-only fade value
    pub opacity: f32,
    /// Simulation time at spawn
    pub created_at_ms: u64,
}

impl Roach {
    pub fn new(id: RoachId, pos: Vec2, vel: Vec2, size: RoachSize, created_at_ms: u64) -> Self {
        Self {
            id,
            pos,
            vel,
            size,
            state: RoachState::Alive,
            opacity: 1.0,
            created_at_ms,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self.state, RoachState::Alive)
    }

    /// Bounding box: full width, 0.6 of it tall
    pub fn bounds(&self) -> Rect {
        let w = self.size.px();
        Rect::new(self.pos.x, self.pos.y, w, w * ROACH_ASPECT)
    }

    /// Milliseconds since spawn
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at_ms)
    }

    /// Alive -> Squashed. Applies the one-time death drop and fade.
    /// Returns false (and changes nothing) if already squashed.
    pub fn squash(&mut self, now_ms: u64) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.state = RoachState::Squashed { at_ms: now_ms };
        self.pos.y += DEATH_DROP_PX;
        self.opacity = DEATH_OPACITY;
        true
    }
}

/// Entity store for all roaches, in spawn order
#[derive(Debug, Clone, Default)]
pub struct Swarm {
    roaches: Vec<Roach>,
    next_id: RoachId,
}

impl Swarm {
    pub fn new() -> Self {
        Self {
            roaches: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new roach ID
    pub fn next_id(&mut self) -> RoachId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Append a roach. IDs must come from [`Swarm::next_id`].
    pub fn insert(&mut self, roach: Roach) {
        debug_assert!(
            self.roaches.iter().all(|r| r.id != roach.id),
            "duplicate roach id {}",
            roach.id
        );
        debug_assert!(roach.id < self.next_id, "roach id {} was not allocated", roach.id);
        self.roaches.push(roach);
    }

    /// All roaches in insertion order
    pub fn all(&self) -> &[Roach] {
        &self.roaches
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Roach> {
        self.roaches.iter_mut()
    }

    pub fn get(&self, id: RoachId) -> Option<&Roach> {
        self.roaches.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: RoachId) -> Option<&mut Roach> {
        self.roaches.iter_mut().find(|r| r.id == id)
    }

    /// Evict every roach matching the predicate, preserving the order of the
    /// rest. The removed roaches are returned so their resources can be freed.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Roach) -> bool) -> Vec<Roach> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.roaches.len());
        for roach in self.roaches.drain(..) {
            if pred(&roach) {
                removed.push(roach);
            } else {
                kept.push(roach);
            }
        }
        self.roaches = kept;
        removed
    }

    pub fn alive_count(&self) -> usize {
        self.roaches.iter().filter(|r| r.is_alive()).count()
    }

    pub fn dead_count(&self) -> usize {
        self.roaches.len() - self.alive_count()
    }

    pub fn len(&self) -> usize {
        self.roaches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roaches.is_empty()
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub bounds: Bounds,
    pub swarm: Swarm,
    pub shoe: Shoe,
    /// Difficulty clock, whole seconds
    pub elapsed_secs: u32,
    /// Simulation time in milliseconds
    pub now_ms: u64,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, bounds: Bounds) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bounds,
            swarm: Swarm::new(),
            shoe: Shoe::at_rest(bounds),
            elapsed_secs: 0,
            now_ms: 0,
        }
    }
}
