//! Per-subsystem ticks
//!
//! Each function advances one periodic subsystem against the state. They are
//! called by the scheduler in timer order and never overlap.

use serde::Serialize;

use super::collision::{Squash, squash_under};
use super::spawn::{speed_multiplier, try_spawn};
use super::state::{GameState, Roach, RoachId};
use super::steer::steer_swarm;
use crate::config::GameConfig;

/// Things the host may want to react to (sounds, HUD flashes, cleanup)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Spawned { id: RoachId },
    Squashed { id: RoachId, points: u32 },
    /// Corpses evicted by the reaper
    Reaped { ids: Vec<RoachId> },
    LevelUp { level: u32 },
    NewRecord { best: u32 },
}

/// Spawn tick: maybe add one roach
pub fn spawn_tick(state: &mut GameState, config: &GameConfig) -> Option<RoachId> {
    try_spawn(state, config)
}

/// Move tick: steer every live roach at the shoe and advance the stomp animation
pub fn move_tick(state: &mut GameState, config: &GameConfig) -> usize {
    // Sampled once so the whole tick aims at the same point
    let target = state.shoe.center();
    let multiplier = speed_multiplier(config, state.elapsed_secs);
    let moved = steer_swarm(&mut state.swarm, target, multiplier, config, &mut state.rng);
    state.shoe.update(state.now_ms);
    moved
}

/// Reap tick: evict corpses older than the retention threshold
pub fn reap_tick(state: &mut GameState, config: &GameConfig) -> Vec<Roach> {
    let now = state.now_ms;
    let removed = state
        .swarm
        .remove_where(|r| !r.is_alive() && r.age_ms(now) > config.retention_ms);
    if !removed.is_empty() {
        log::debug!("Reaped {} corpses, {} roaches left", removed.len(), state.swarm.len());
    }
    removed
}

/// Keep at most `max_dead` corpses by evicting the oldest extras. Squashes
/// are not capped, so this runs after every successful stomp.
pub fn evict_excess_corpses(state: &mut GameState, config: &GameConfig) -> Vec<Roach> {
    let mut excess = state.swarm.dead_count().saturating_sub(config.max_dead);
    if excess == 0 {
        return Vec::new();
    }
    // Swarm order is spawn order, so the first corpses found are the oldest
    state.swarm.remove_where(|r| {
        if excess > 0 && !r.is_alive() {
            excess -= 1;
            true
        } else {
            false
        }
    })
}

/// Clock tick: one more second of difficulty
pub fn clock_tick(state: &mut GameState) {
    state.elapsed_secs = state.elapsed_secs.saturating_add(1);
}

/// Stomp: squash the first live roach under the shoe and start the stomp
/// animation. Uses the hitbox as it is before the animation starts.
pub fn stomp(state: &mut GameState) -> Option<Squash> {
    let hitbox = state.shoe.hitbox();
    let squash = squash_under(&mut state.swarm, &hitbox, state.now_ms)?;
    state.shoe.trigger_stomp(state.now_ms);
    log::debug!("Squashed roach {} (+{})", squash.id, squash.points);
    Some(squash)
}
