//! Stomp hit detection
//!
//! A stomp squashes at most one roach: the first live one, in swarm order,
//! whose box overlaps the shoe. Not the nearest, not all of them.

use super::state::{RoachId, RoachSize, Swarm};
use crate::Rect;

/// A successful stomp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Squash {
    pub id: RoachId,
    pub size: RoachSize,
    pub points: u32,
}

/// Index of the first live roach under the hitbox
pub fn find_hit(swarm: &Swarm, hitbox: &Rect) -> Option<usize> {
    swarm
        .all()
        .iter()
        .position(|r| r.is_alive() && r.bounds().overlaps(hitbox))
}

/// Squash the first live roach under the hitbox, if any
pub fn squash_under(swarm: &mut Swarm, hitbox: &Rect, now_ms: u64) -> Option<Squash> {
    let index = find_hit(swarm, hitbox)?;
    let roach = swarm.iter_mut().nth(index)?;
    if !roach.squash(now_ms) {
        return None;
    }
    Some(Squash {
        id: roach.id,
        size: roach.size,
        points: roach.size.points(),
    })
}
