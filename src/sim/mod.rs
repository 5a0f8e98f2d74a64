//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulation time only (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order (swarm insertion order)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod shoe;
pub mod spawn;
pub mod state;
pub mod steer;
pub mod tick;

pub use collision::{Squash, find_hit, squash_under};
pub use shoe::{Shoe, StompPhase};
pub use spawn::{Edge, can_spawn, spawn_interval_ms, speed_multiplier, try_spawn};
pub use state::{GameState, Roach, RoachId, RoachSize, RoachState, Swarm};
pub use steer::{steer_roach, steer_swarm};
pub use tick::{
    GameEvent, clock_tick, evict_excess_corpses, move_tick, reap_tick, spawn_tick, stomp,
};
