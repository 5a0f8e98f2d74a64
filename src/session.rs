//! Score, best score and level progression
//!
//! The best score is read from the injected store when the session starts and
//! written back every time it is beaten. Storage failures are logged and
//! otherwise ignored.

use crate::config::GameConfig;
use crate::consts::{BEST_SCORE_KEY, CELEBRATION_MS};
use crate::persistence::ScoreStore;
use crate::sim::GameEvent;

/// Level for a cumulative score: one level per `points_per_level`, capped
pub fn level_for_score(score: u32, points_per_level: u32, max_level: u32) -> u32 {
    (score / points_per_level.max(1) + 1).min(max_level)
}

/// One player's run
pub struct Session {
    score: u32,
    best: u32,
    level: u32,
    points_per_level: u32,
    max_level: u32,
    store: Box<dyn ScoreStore>,
    level_up_at: Option<u64>,
    new_record_at: Option<u64>,
}

impl Session {
    /// Start a session, loading the best score from the store
    pub fn new(config: &GameConfig, store: Box<dyn ScoreStore>) -> Self {
        let best = match store.get(BEST_SCORE_KEY) {
            Ok(Some(best)) => {
                log::info!("Loaded best score {best}");
                u32::try_from(best).unwrap_or(u32::MAX)
            }
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Error loading best score: {e}");
                0
            }
        };

        Self {
            score: 0,
            best,
            level: 1,
            points_per_level: config.points_per_level,
            max_level: config.max_level,
            store,
            level_up_at: None,
            new_record_at: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Points earned since the last level boundary
    pub fn points_into_level(&self) -> u32 {
        self.score % self.points_per_level.max(1)
    }

    /// Fraction of the way to the next level, 0.0..1.0
    pub fn level_progress(&self) -> f32 {
        self.points_into_level() as f32 / self.points_per_level.max(1) as f32
    }

    pub fn points_per_level(&self) -> u32 {
        self.points_per_level
    }

    /// Level-up badge is showing
    pub fn level_up_active(&self, now_ms: u64) -> bool {
        self.level_up_at
            .is_some_and(|at| now_ms.saturating_sub(at) < CELEBRATION_MS)
    }

    /// New-record badge is showing
    pub fn new_record_active(&self, now_ms: u64) -> bool {
        self.new_record_at
            .is_some_and(|at| now_ms.saturating_sub(at) < CELEBRATION_MS)
    }

    /// Add points for a kill and react to the new score
    pub fn award(&mut self, points: u32, now_ms: u64, events: &mut Vec<GameEvent>) {
        debug_assert!(points > 0, "kills are always worth points");
        self.score = self.score.saturating_add(points);

        let level = level_for_score(self.score, self.points_per_level, self.max_level);
        if level > self.level {
            self.level = level;
            self.level_up_at = Some(now_ms);
            log::info!("Level up! Now level {level}");
            events.push(GameEvent::LevelUp { level });
        }

        if self.score > self.best {
            let first = self.new_record_at.is_none();
            self.best = self.score;
            self.new_record_at = Some(now_ms);
            if first {
                log::info!("New record: {}", self.best);
            }
            events.push(GameEvent::NewRecord { best: self.best });
            self.persist_best();
        }
    }

    fn persist_best(&mut self) {
        if let Err(e) = self.store.set(BEST_SCORE_KEY, u64::from(self.best)) {
            log::warn!("Error saving best score: {e}");
        }
    }
}
