//! Homing with noise
//!
//! Every move tick each live roach re-aims at the shoe with a fresh random
//! speed plus a little per-axis jitter, then takes one step.

use glam::Vec2;
use rand::Rng;

use super::state::{Roach, Swarm};
use crate::config::GameConfig;

/// Re-aim one live roach at `target` and step it.
/// Returns false when the roach was skipped (dead, or already on target).
pub fn steer_roach(
    roach: &mut Roach,
    target: Vec2,
    multiplier: f32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> bool {
    if !roach.is_alive() {
        return false;
    }

    let delta = target - roach.pos;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return false;
    }

    let speed = rng.random_range(config.steer_speed_min..config.steer_speed_max) * multiplier;
    let noise = Vec2::new(
        jitter(rng, config.steer_jitter),
        jitter(rng, config.steer_jitter),
    );

    roach.vel = delta / distance * speed + noise;
    roach.pos += roach.vel;
    true
}

/// Steer the whole swarm at one target. The target is read once by the
/// caller so every roach in a tick aims at the same point.
pub fn steer_swarm(
    swarm: &mut Swarm,
    target: Vec2,
    multiplier: f32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> usize {
    let mut moved = 0;
    for roach in swarm.iter_mut() {
        if steer_roach(roach, target, multiplier, config, rng) {
            moved += 1;
        }
    }
    moved
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    if amount <= 0.0 {
        return 0.0;
    }
    rng.random_range(-amount..amount)
}
