//! Frame snapshots
//!
//! The core never draws. After each advance it hands the renderer a plain
//! snapshot of what is on screen and tells it when a sprite's resources can
//! go.

use serde::Serialize;

use crate::config::GameConfig;
use crate::session::Session;
use crate::sim::{GameState, RoachId, speed_multiplier};

/// One roach as drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub id: RoachId,
    pub x: f32,
    pub y: f32,
    pub alive: bool,
    pub size_px: f32,
    pub opacity: f32,
}

/// Heads-up display values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub best: u32,
    pub level: u32,
    pub points_into_level: u32,
    pub points_per_level: u32,
    pub level_progress: f32,
    /// Current roach speed as a percentage of the base speed
    pub speed_percent: u32,
    pub level_up: bool,
    pub new_record: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub now_ms: u64,
    /// Roaches in spawn order, oldest first
    pub sprites: Vec<Sprite>,
    pub shoe_x: f32,
    /// Drawn shoe position, including the stomp animation
    pub shoe_y: f32,
    pub hud: Hud,
}

impl Frame {
    pub fn capture(state: &GameState, session: &Session, config: &GameConfig) -> Self {
        let sprites = state
            .swarm
            .all()
            .iter()
            .map(|r| Sprite {
                id: r.id,
                x: r.pos.x,
                y: r.pos.y,
                alive: r.is_alive(),
                size_px: r.size.px(),
                opacity: r.opacity,
            })
            .collect();

        let multiplier = speed_multiplier(config, state.elapsed_secs);
        let now = state.now_ms;
        Self {
            now_ms: now,
            sprites,
            shoe_x: state.shoe.x,
            shoe_y: state.shoe.visual_y(),
            hud: Hud {
                score: session.score(),
                best: session.best(),
                level: session.level(),
                points_into_level: session.points_into_level(),
                points_per_level: session.points_per_level(),
                level_progress: session.level_progress(),
                speed_percent: (multiplier * 100.0).round() as u32,
                level_up: session.level_up_active(now),
                new_record: session.new_record_active(now),
            },
        }
    }

    pub fn alive_count(&self) -> usize {
        self.sprites.iter().filter(|s| s.alive).count()
    }
}

/// Draws frames. Implementations own whatever GPU/DOM resources sprites need.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame);

    /// Sprite `id` is gone for good; free anything held for it
    fn release(&mut self, _id: RoachId) {}
}

/// Draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _frame: &Frame) {}
}

/// Logs a one-line summary every `every` frames (headless runs)
#[derive(Debug, Clone)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
    released: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            released: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn released(&self) -> u64 {
        self.released
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &Frame) {
        self.frames += 1;
        if self.frames % self.every != 0 {
            return;
        }
        let hud = &frame.hud;
        log::info!(
            "t={:.1}s score={} best={} level={} ({}/{}) speed={}% roaches={} alive={}",
            frame.now_ms as f32 / 1000.0,
            hud.score,
            hud.best,
            hud.level,
            hud.points_into_level,
            hud.points_per_level,
            hud.speed_percent,
            frame.sprites.len(),
            frame.alive_count(),
        );
    }

    fn release(&mut self, id: RoachId) {
        self.released += 1;
        log::trace!("Released sprite {id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;
    use crate::persistence::MemoryStore;
    use crate::sim::{Roach, RoachSize};
    use glam::Vec2;

    #[test]
    fn test_capture_snapshot() {
        let config = GameConfig::default();
        let mut state = GameState::new(1, Bounds::default());
        let session = Session::new(&config, Box::new(MemoryStore::new()));

        let a = state.swarm.next_id();
        state.swarm.insert(Roach::new(a, Vec2::new(10.0, 20.0), Vec2::ZERO, RoachSize::Large, 0));
        let b = state.swarm.next_id();
        state.swarm.insert(Roach::new(b, Vec2::new(30.0, 40.0), Vec2::ZERO, RoachSize::Small, 0));
        state.swarm.get_mut(b).unwrap().squash(0);

        let frame = Frame::capture(&state, &session, &config);
        assert_eq!(frame.sprites.len(), 2);
        assert_eq!(frame.sprites[0].id, a);
        assert!(frame.sprites[0].alive);
        assert_eq!(frame.sprites[0].size_px, 80.0);
        assert!(!frame.sprites[1].alive);
        assert_eq!(frame.sprites[1].opacity, 0.5);
        assert_eq!(frame.alive_count(), 1);
        assert_eq!(frame.shoe_y, state.shoe.visual_y());
        assert_eq!(frame.hud.level, 1);
        assert_eq!(frame.hud.speed_percent, 100);
    }

    #[test]
    fn test_frame_serializes() {
        let config = GameConfig::default();
        let state = GameState::new(1, Bounds::default());
        let session = Session::new(&config, Box::new(MemoryStore::new()));
        let json = serde_json::to_string(&Frame::capture(&state, &session, &config)).unwrap();
        assert!(json.contains("\"sprites\":[]"));
        assert!(json.contains("\"speed_percent\":100"));
    }

    #[test]
    fn test_log_renderer_counts() {
        let mut renderer = LogRenderer::new(10);
        let config = GameConfig::default();
        let state = GameState::new(1, Bounds::default());
        let session = Session::new(&config, Box::new(MemoryStore::new()));
        let frame = Frame::capture(&state, &session, &config);
        for _ in 0..25 {
            renderer.draw(&frame);
        }
        renderer.release(3);
        assert_eq!(renderer.frames(), 25);
        assert_eq!(renderer.released(), 1);
    }
}
