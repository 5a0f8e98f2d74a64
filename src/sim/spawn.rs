//! Roach spawning and the difficulty curve
//!
//! Roaches enter from the top, left or right edge, just off screen, already
//! moving inward. Spawning is refused while either population cap is hit.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Roach, RoachId, RoachSize, Swarm};
use crate::Bounds;
use crate::config::GameConfig;

/// Screen edge a roach enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 3] = [Edge::Top, Edge::Left, Edge::Right];
}

/// Speed multiplier after `elapsed_secs` of play: +1x per ramp period, capped
pub fn speed_multiplier(config: &GameConfig, elapsed_secs: u32) -> f32 {
    let t = elapsed_secs as f32;
    (1.0 + t / config.difficulty_ramp_secs).min(config.max_speed_multiplier)
}

/// Spawn interval after `elapsed_secs`: shrinks linearly down to a floor
pub fn spawn_interval_ms(config: &GameConfig, elapsed_secs: u32) -> u64 {
    let t = elapsed_secs as f32;
    let factor = (1.0 - t / config.spawn_ramp_secs).max(config.min_spawn_interval_factor);
    ((config.spawn_interval_ms as f32 * factor).round() as u64).max(1)
}

/// True if the caps leave room for another roach
pub fn can_spawn(swarm: &Swarm, config: &GameConfig) -> bool {
    swarm.alive_count() < config.max_alive && swarm.dead_count() < config.max_dead
}

/// Start position and velocity for a roach of `size` entering from `edge`
pub fn entry_for(
    rng: &mut impl Rng,
    edge: Edge,
    size: RoachSize,
    bounds: Bounds,
    config: &GameConfig,
) -> (Vec2, Vec2) {
    let s = size.px();
    let max_x = (bounds.width - s).max(0.0);
    let max_y = (bounds.height - s).max(0.0);

    let base_x = rng.random_range(config.spawn_speed_min..config.spawn_speed_max);
    let base_y = rng.random_range(config.spawn_speed_min..config.spawn_speed_max);

    match edge {
        Edge::Top => {
            let pos = Vec2::new(rng.random::<f32>() * max_x, -s);
            let vel = Vec2::new(lateral(rng, base_x), inward(rng, base_y));
            (pos, vel)
        }
        Edge::Left => {
            let pos = Vec2::new(-s, rng.random::<f32>() * max_y);
            let vel = Vec2::new(inward(rng, base_x), lateral(rng, base_y));
            (pos, vel)
        }
        Edge::Right => {
            let pos = Vec2::new(bounds.width + s, rng.random::<f32>() * max_y);
            let vel = Vec2::new(-inward(rng, base_x), lateral(rng, base_y));
            (pos, vel)
        }
    }
}

/// Inward speed component: the base plus a small extra push
fn inward<R: Rng + ?Sized>(rng: &mut R, base: f32) -> f32 {
    base + rng.random::<f32>() * 2.0
}

/// Lateral speed component: wanders either way
fn lateral<R: Rng + ?Sized>(rng: &mut R, base: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * base
}

/// Spawn one roach if the caps allow it
pub fn try_spawn(state: &mut GameState, config: &GameConfig) -> Option<RoachId> {
    if !can_spawn(&state.swarm, config) {
        return None;
    }

    let size = if state.rng.random_bool(0.5) {
        RoachSize::Large
    } else {
        RoachSize::Small
    };
    let edge = Edge::ALL[state.rng.random_range(0..Edge::ALL.len())];
    let (pos, vel) = entry_for(&mut state.rng, edge, size, state.bounds, config);

    let id = state.swarm.next_id();
    state.swarm.insert(Roach::new(id, pos, vel, size, state.now_ms));
    log::debug!(
        "Spawned roach {id} ({size:?}) from {edge:?} at ({:.0}, {:.0})",
        pos.x,
        pos.y
    );
    Some(id)
}
