//! The shoe: the one target every roach heads for

use glam::Vec2;

use crate::consts::*;
use crate::{Bounds, Rect};

/// Cosmetic stomp animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StompPhase {
    #[default]
    Idle,
    /// Slammed down, until the given time
    Down { until_ms: u64 },
    /// Coming back up, until the given time
    Return { until_ms: u64 },
}

/// The shoe sprite. Only `y` moves; `x` is pinned to the left edge.
#[derive(Debug, Clone)]
pub struct Shoe {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub stomp: StompPhase,
}

impl Shoe {
    pub fn new(y: f32) -> Self {
        Self {
            x: SHOE_X,
            y,
            width: SHOE_WIDTH,
            height: SHOE_HEIGHT,
            stomp: StompPhase::Idle,
        }
    }

    /// Shoe at its resting height for the given screen
    pub fn at_rest(bounds: Bounds) -> Self {
        Self::new(bounds.height - SHOE_REST_FROM_BOTTOM)
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Hitbox at the shoe's simulation position (never the animated one)
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Point the roaches steer toward
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + SHOE_CENTER_X, self.y + SHOE_CENTER_Y)
    }

    /// Kick off the stomp animation. Restarts it if one is running.
    pub fn trigger_stomp(&mut self, now_ms: u64) {
        self.stomp = StompPhase::Down {
            until_ms: now_ms + STOMP_PHASE_MS,
        };
    }

    /// Advance the stomp animation
    pub fn update(&mut self, now_ms: u64) {
        self.stomp = match self.stomp {
            StompPhase::Down { until_ms } if now_ms >= until_ms => StompPhase::Return {
                until_ms: until_ms + STOMP_PHASE_MS,
            },
            StompPhase::Return { until_ms } if now_ms >= until_ms => StompPhase::Idle,
            phase => phase,
        };
    }

    /// Where the renderer should draw the shoe
    pub fn visual_y(&self) -> f32 {
        match self.stomp {
            StompPhase::Idle => self.y,
            StompPhase::Down { .. } => self.y + STOMP_DEPTH,
            StompPhase::Return { .. } => self.y + STOMP_RETURN_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_position_and_hitbox() {
        let shoe = Shoe::at_rest(Bounds::new(400.0, 900.0));
        assert_eq!(shoe.y, 350.0);
        assert_eq!(shoe.hitbox(), Rect::new(0.0, 350.0, 340.0, 384.0));
        assert_eq!(shoe.center(), Vec2::new(170.0, 670.0));
    }

    #[test]
    fn test_hitbox_follows_y() {
        let mut shoe = Shoe::new(100.0);
        shoe.set_y(250.0);
        assert_eq!(shoe.hitbox().y, 250.0);
        assert_eq!(shoe.center().y, 570.0);
    }

    #[test]
    fn test_stomp_phases() {
        let mut shoe = Shoe::new(100.0);
        shoe.trigger_stomp(1000);
        assert_eq!(shoe.visual_y(), 100.0 + STOMP_DEPTH);
        // Hitbox ignores the animation
        assert_eq!(shoe.hitbox().y, 100.0);

        shoe.update(1049);
        assert!(matches!(shoe.stomp, StompPhase::Down { .. }));

        shoe.update(1050);
        assert!(matches!(shoe.stomp, StompPhase::Return { .. }));
        assert_eq!(shoe.visual_y(), 100.0 + STOMP_RETURN_DEPTH);

        shoe.update(1100);
        assert_eq!(shoe.stomp, StompPhase::Idle);
        assert_eq!(shoe.visual_y(), 100.0);
    }
}
