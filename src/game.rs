//! One running game
//!
//! `Game` owns the simulation state, the session and the timers, and talks to
//! the outside world only through its collaborators. Hosts call
//! [`Game::advance`] with wall-clock deltas and feed accelerometer samples
//! either directly ([`Game::on_motion`]) or through an attached
//! [`MotionSource`].

use crate::audio::{AudioSink, SilentAudio, SoundEffect};
use crate::config::{ConfigError, GameConfig};
use crate::consts::MAX_FRAME_MS;
use crate::motion::{AccelSample, MotionSource, ShakeDetector};
use crate::persistence::{MemoryStore, ScoreStore};
use crate::render::{Frame, NullRenderer, Renderer};
use crate::scheduler::{Scheduler, TickKind};
use crate::session::Session;
use crate::sim::{
    GameEvent, GameState, Roach, Squash, clock_tick, evict_excess_corpses, move_tick, reap_tick,
    spawn_interval_ms, spawn_tick, stomp,
};
use crate::Bounds;

/// The outside world, as the game sees it
pub struct Collaborators {
    pub store: Box<dyn ScoreStore>,
    pub audio: Box<dyn AudioSink>,
    pub renderer: Box<dyn Renderer>,
}

impl Collaborators {
    /// In-memory store, no sound, no drawing
    pub fn headless() -> Self {
        Self {
            store: Box::new(MemoryStore::new()),
            audio: Box::new(SilentAudio),
            renderer: Box::new(NullRenderer),
        }
    }
}

pub struct Game {
    config: GameConfig,
    state: GameState,
    session: Session,
    scheduler: Scheduler,
    detector: ShakeDetector,
    motion: Option<Box<dyn MotionSource>>,
    audio: Box<dyn AudioSink>,
    renderer: Box<dyn Renderer>,
    events: Vec<GameEvent>,
    samples: Vec<AccelSample>,
    record_cued: bool,
}

impl Game {
    pub fn new(
        config: GameConfig,
        bounds: Bounds,
        seed: u64,
        collaborators: Collaborators,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let Collaborators {
            store,
            audio,
            renderer,
        } = collaborators;
        let state = GameState::new(seed, bounds);
        let session = Session::new(&config, store);
        let scheduler = Scheduler::new(&config, state.now_ms);
        let detector = ShakeDetector::new(config.hit_threshold);

        log::info!(
            "Game started: seed={seed} screen={}x{} best={}",
            bounds.width,
            bounds.height,
            session.best()
        );

        Ok(Self {
            config,
            state,
            session,
            scheduler,
            detector,
            motion: None,
            audio,
            renderer,
            events: Vec::new(),
            samples: Vec::new(),
            record_cued: false,
        })
    }

    /// Subscribe to a sample stream, replacing any previous one
    pub fn attach_motion(&mut self, source: Box<dyn MotionSource>) {
        if self.is_running() {
            self.motion = Some(source);
        }
    }

    /// Run the simulation forward by `dt_ms` (at most [`MAX_FRAME_MS`]).
    /// Queued motion samples are applied first, then every tick that falls
    /// due, then the frame is drawn.
    pub fn advance(&mut self, dt_ms: u64) {
        if !self.is_running() {
            return;
        }

        self.apply_queued_motion();

        let until = self.state.now_ms + dt_ms.min(MAX_FRAME_MS);
        while let Some((kind, at)) = self.scheduler.pop_due(until) {
            self.state.now_ms = at;
            self.run_tick(kind, at);
        }
        self.state.now_ms = until;

        self.render();
    }

    fn apply_queued_motion(&mut self) {
        let Some(source) = self.motion.as_mut() else {
            return;
        };
        let mut samples = std::mem::take(&mut self.samples);
        let open = source.drain(&mut samples);
        if !open {
            log::info!("Motion source finished");
            self.motion = None;
        }
        for sample in samples.drain(..) {
            self.on_motion(sample);
        }
        self.samples = samples;
    }

    fn run_tick(&mut self, kind: TickKind, at: u64) {
        match kind {
            TickKind::Clock => clock_tick(&mut self.state),
            TickKind::Spawn => {
                if let Some(id) = spawn_tick(&mut self.state, &self.config) {
                    self.events.push(GameEvent::Spawned { id });
                }
                let interval = spawn_interval_ms(&self.config, self.state.elapsed_secs);
                self.scheduler.rearm(TickKind::Spawn, at, interval);
            }
            TickKind::Move => {
                move_tick(&mut self.state, &self.config);
            }
            TickKind::Reap => {
                let removed = reap_tick(&mut self.state, &self.config);
                self.release(removed);
            }
        }
    }

    /// Free renderer resources for evicted roaches, right away
    fn release(&mut self, removed: Vec<Roach>) {
        if removed.is_empty() {
            return;
        }
        let ids: Vec<_> = removed.iter().map(|r| r.id).collect();
        for &id in &ids {
            self.renderer.release(id);
        }
        self.events.push(GameEvent::Reaped { ids });
    }

    /// Feed one accelerometer sample. Returns true if it squashed a roach.
    pub fn on_motion(&mut self, sample: AccelSample) -> bool {
        if !self.is_running() {
            return false;
        }
        self.detector.sample(sample) && self.trigger_stomp().is_some()
    }

    /// Stomp now, whatever the sensor says
    pub fn trigger_stomp(&mut self) -> Option<Squash> {
        if !self.is_running() {
            return None;
        }
        let squash = stomp(&mut self.state)?;
        self.events.push(GameEvent::Squashed {
            id: squash.id,
            points: squash.points,
        });
        self.play(SoundEffect::Squish);
        let evicted = evict_excess_corpses(&mut self.state, &self.config);
        self.release(evicted);

        let before = self.events.len();
        self.session.award(squash.points, self.state.now_ms, &mut self.events);
        let mut cues = Vec::new();
        for event in &self.events[before..] {
            match event {
                GameEvent::LevelUp { .. } => cues.push(SoundEffect::LevelUp),
                GameEvent::NewRecord { .. } if !self.record_cued => {
                    self.record_cued = true;
                    cues.push(SoundEffect::NewRecord);
                }
                _ => {}
            }
        }
        for cue in cues {
            self.play(cue);
        }
        Some(squash)
    }

    fn play(&mut self, effect: SoundEffect) {
        if let Err(e) = self.audio.play(effect) {
            log::warn!("Audio error: {e}");
        }
    }

    /// Move the shoe vertically. Roaches re-aim at it on the next move tick
    /// and stomps use the new hitbox. Ignored once stopped.
    pub fn set_shoe_y(&mut self, y: f32) {
        if !self.is_running() {
            return;
        }
        self.state.shoe.set_y(y);
    }

    /// Cancel the timers and drop the motion source. Later calls do nothing.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.scheduler.cancel_all();
        self.motion = None;
        log::info!(
            "Game stopped at {:.1}s: score={} best={} level={}",
            self.state.now_ms as f32 / 1000.0,
            self.session.score(),
            self.session.best(),
            self.session.level()
        );
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn frame(&self) -> Frame {
        Frame::capture(&self.state, &self.session, &self.config)
    }

    /// Hand the current frame to the renderer
    pub fn render(&mut self) {
        let frame = self.frame();
        self.renderer.draw(&frame);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn now_ms(&self) -> u64 {
        self.state.now_ms
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn best(&self) -> u32 {
        self.session.best()
    }

    pub fn level(&self) -> u32 {
        self.session.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioError;
    use crate::config::Preset;
    use crate::motion::ChannelMotionSource;
    use crate::sim::{Roach, RoachId, RoachSize, RoachState};
    use glam::Vec2;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc;

    #[derive(Default)]
    struct Log {
        frames: usize,
        released: Vec<RoachId>,
        cues: Vec<SoundEffect>,
    }

    struct SpyRenderer(Rc<RefCell<Log>>);

    impl Renderer for SpyRenderer {
        fn draw(&mut self, _frame: &Frame) {
            self.0.borrow_mut().frames += 1;
        }

        fn release(&mut self, id: RoachId) {
            self.0.borrow_mut().released.push(id);
        }
    }

    struct SpyAudio(Rc<RefCell<Log>>);

    impl AudioSink for SpyAudio {
        fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
            self.0.borrow_mut().cues.push(effect);
            Ok(())
        }
    }

    struct BrokenAudio;

    impl AudioSink for BrokenAudio {
        fn play(&mut self, _effect: SoundEffect) -> Result<(), AudioError> {
            Err(AudioError::Unavailable)
        }
    }

    fn spied(config: GameConfig) -> (Game, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let collaborators = Collaborators {
            store: Box::new(MemoryStore::new()),
            audio: Box::new(SpyAudio(Rc::clone(&log))),
            renderer: Box::new(SpyRenderer(Rc::clone(&log))),
        };
        let game = Game::new(config, Bounds::default(), 7, collaborators).unwrap();
        (game, log)
    }

    /// Put a live roach in the middle of the shoe's hitbox
    fn plant_under_shoe(game: &mut Game, size: RoachSize) -> RoachId {
        let shoe = game.state.shoe.hitbox();
        let pos = Vec2::new(shoe.x + 100.0, shoe.y + 100.0);
        let id = game.state.swarm.next_id();
        let roach = Roach::new(id, pos, Vec2::ZERO, size, game.state.now_ms);
        game.state.swarm.insert(roach);
        id
    }

    const SHAKE: AccelSample = AccelSample::z(3.0);

    #[test]
    fn test_rejects_invalid_config() {
        let config = GameConfig {
            max_alive: 0,
            ..GameConfig::default()
        };
        let result = Game::new(config, Bounds::default(), 1, Collaborators::headless());
        assert!(result.is_err());
    }

    #[test]
    fn test_spawns_over_time_within_caps() {
        let (mut game, log) = spied(GameConfig::from_preset(Preset::Arcade));
        for _ in 0..200 {
            game.advance(50);
        }
        assert_eq!(game.now_ms(), 10_000);
        let swarm = &game.state().swarm;
        assert!(swarm.alive_count() > 0);
        assert!(swarm.alive_count() <= game.config().max_alive);
        assert_eq!(log.borrow().frames, 200);
        assert!(
            game.drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Spawned { .. }))
        );
    }

    #[test]
    fn test_advance_is_clamped() {
        let mut game = Game::new(
            GameConfig::default(),
            Bounds::default(),
            1,
            Collaborators::headless(),
        )
        .unwrap();
        game.advance(10_000);
        assert_eq!(game.now_ms(), MAX_FRAME_MS);
    }

    #[test]
    fn test_shake_squashes_and_scores() {
        let (mut game, log) = spied(GameConfig::default());
        let id = plant_under_shoe(&mut game, RoachSize::Small);

        assert!(game.on_motion(SHAKE));
        assert_eq!(game.score(), 2);
        assert!(!game.state().swarm.get(id).unwrap().is_alive());
        assert_eq!(log.borrow().cues, vec![SoundEffect::Squish, SoundEffect::NewRecord]);

        let events = game.drain_events();
        assert_eq!(events[0], GameEvent::Squashed { id, points: 2 });
        assert!(events.contains(&GameEvent::NewRecord { best: 2 }));
    }

    #[test]
    fn test_shake_with_nothing_under_shoe_is_noop() {
        let (mut game, log) = spied(GameConfig::default());
        assert!(!game.on_motion(SHAKE));
        assert_eq!(game.score(), 0);
        assert!(log.borrow().cues.is_empty());
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_small_jitter_is_not_a_stomp() {
        let (mut game, _) = spied(GameConfig::default());
        plant_under_shoe(&mut game, RoachSize::Large);
        assert!(!game.on_motion(AccelSample::z(1.0)));
        assert!(!game.on_motion(AccelSample::z(1.1)));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_record_cue_plays_once() {
        let (mut game, log) = spied(GameConfig::default());
        for _ in 0..3 {
            plant_under_shoe(&mut game, RoachSize::Large);
            game.trigger_stomp();
        }
        let cues = &log.borrow().cues;
        assert_eq!(cues.iter().filter(|c| **c == SoundEffect::NewRecord).count(), 1);
        assert_eq!(cues.iter().filter(|c| **c == SoundEffect::Squish).count(), 3);
    }

    #[test]
    fn test_level_up_cue() {
        let (mut game, log) = spied(GameConfig::default());
        for _ in 0..10 {
            plant_under_shoe(&mut game, RoachSize::Small);
            game.trigger_stomp();
        }
        assert_eq!(game.level(), 2);
        assert!(log.borrow().cues.contains(&SoundEffect::LevelUp));
    }

    #[test]
    fn test_audio_failure_does_not_stop_play() {
        let collaborators = Collaborators {
            audio: Box::new(BrokenAudio),
            ..Collaborators::headless()
        };
        let mut game =
            Game::new(GameConfig::default(), Bounds::default(), 3, collaborators).unwrap();
        plant_under_shoe(&mut game, RoachSize::Large);
        assert!(game.on_motion(SHAKE));
        assert_eq!(game.score(), 1);
        game.advance(100);
        assert!(game.is_running());
    }

    #[test]
    fn test_corpses_reaped_and_released() {
        let config = GameConfig {
            // Keep spawns out of the way
            spawn_interval_ms: 1_000_000,
            ..GameConfig::default()
        };
        let (mut game, log) = spied(config);
        let id = plant_under_shoe(&mut game, RoachSize::Large);
        game.trigger_stomp();

        // Reap ticks at 2000 and 4000 find it too young
        for _ in 0..20 {
            game.advance(250);
        }
        assert_eq!(game.now_ms(), 5000);
        assert!(game.state().swarm.get(id).is_some());

        // The 6000 ms tick evicts it
        for _ in 0..4 {
            game.advance(250);
        }
        assert!(game.state().swarm.get(id).is_none());
        assert_eq!(log.borrow().released, vec![id]);
        assert!(game.drain_events().contains(&GameEvent::Reaped { ids: vec![id] }));
    }

    #[test]
    fn test_corpse_overflow_evicts_oldest() {
        let config = GameConfig {
            max_dead: 2,
            spawn_interval_ms: 1_000_000,
            ..GameConfig::default()
        };
        let (mut game, log) = spied(config);
        let ids: Vec<RoachId> = (0..3)
            .map(|_| {
                let id = plant_under_shoe(&mut game, RoachSize::Large);
                game.trigger_stomp();
                id
            })
            .collect();

        assert_eq!(game.state().swarm.dead_count(), 2);
        assert!(game.state().swarm.get(ids[0]).is_none());
        assert_eq!(log.borrow().released, vec![ids[0]]);
        assert_eq!(game.score(), 3);
    }

    #[test]
    fn test_motion_applied_before_ticks() {
        let (mut game, _) = spied(GameConfig::default());
        let id = plant_under_shoe(&mut game, RoachSize::Large);

        let (tx, rx) = mpsc::channel();
        game.attach_motion(Box::new(ChannelMotionSource::new(rx)));
        tx.send(SHAKE).unwrap();
        game.advance(16);

        let events = game.drain_events();
        assert_eq!(events[0], GameEvent::Squashed { id, points: 1 });
        // Squashed at the start of the slice, before any tick moved time
        assert_eq!(
            game.state().swarm.get(id).unwrap().state,
            RoachState::Squashed { at_ms: 0 }
        );
    }

    #[test]
    fn test_moved_shoe_redirects_steering_and_hits() {
        let (mut game, _) = spied(GameConfig::default());
        let old_center = game.state().shoe.center();
        game.set_shoe_y(0.0);
        let shoe = game.state().shoe.hitbox();
        let target = game.state().shoe.center();
        assert!(target.y < old_center.y);

        // Between the new aim point and the old one, below the moved hitbox
        let pos = Vec2::new(shoe.x + 100.0, 450.0);
        let runner = game.state.swarm.next_id();
        let roach = Roach::new(runner, pos, Vec2::ZERO, RoachSize::Large, 0);
        game.state.swarm.insert(roach);

        game.advance(16);
        let moved = game.state().swarm.get(runner).unwrap();
        assert!(moved.vel.y < 0.0, "should head up toward the moved shoe");
        assert!(moved.pos.distance(target) < pos.distance(target));

        let under = plant_under_shoe(&mut game, RoachSize::Large);
        assert_eq!(game.trigger_stomp().map(|s| s.id), Some(under));
        assert!(game.state().swarm.get(runner).unwrap().is_alive());
    }

    #[test]
    fn test_set_shoe_y_ignored_after_stop() {
        let (mut game, _) = spied(GameConfig::default());
        let rest = game.state().shoe.y;
        game.stop();
        game.set_shoe_y(10.0);
        assert_eq!(game.state().shoe.y, rest);
    }

    #[test]
    fn test_finished_source_is_detached() {
        let (mut game, _) = spied(GameConfig::default());
        let (tx, rx) = mpsc::channel::<AccelSample>();
        game.attach_motion(Box::new(ChannelMotionSource::new(rx)));
        drop(tx);
        game.advance(16);
        assert!(game.motion.is_none());
        assert!(game.is_running());
    }

    #[test]
    fn test_stop_freezes_everything() {
        let (mut game, log) = spied(GameConfig::default());
        game.advance(1000);
        let (tx, rx) = mpsc::channel();
        game.attach_motion(Box::new(ChannelMotionSource::new(rx)));

        game.stop();
        assert!(!game.is_running());
        assert!(game.motion.is_none());
        // The channel's receiving end is gone
        assert!(tx.send(SHAKE).is_err());

        let frames = log.borrow().frames;
        let now = game.now_ms();
        let count = game.state().swarm.len();
        plant_under_shoe(&mut game, RoachSize::Large);
        game.advance(1000);
        assert!(!game.on_motion(SHAKE));
        assert_eq!(game.now_ms(), now);
        assert_eq!(game.state().swarm.len(), count + 1);
        assert_eq!(game.score(), 0);
        assert_eq!(log.borrow().frames, frames);
    }

    #[test]
    fn test_same_seed_same_game() {
        let run = || {
            let mut game = Game::new(
                GameConfig::default(),
                Bounds::default(),
                99,
                Collaborators::headless(),
            )
            .unwrap();
            for step in 0..120u64 {
                if step % 7 == 0 {
                    game.on_motion(SHAKE);
                    game.on_motion(AccelSample::z(0.0));
                }
                game.advance(33);
            }
            game.frame()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_best_score_persists_between_games() {
        let store = Rc::new(RefCell::new(MemoryStore::new()));

        struct Shared(Rc<RefCell<MemoryStore>>);
        impl ScoreStore for Shared {
            fn get(&self, key: &str) -> Result<Option<u64>, crate::persistence::StoreError> {
                self.0.borrow().get(key)
            }
            fn set(&mut self, key: &str, value: u64) -> Result<(), crate::persistence::StoreError> {
                self.0.borrow_mut().set(key, value)
            }
        }

        let collaborators = || Collaborators {
            store: Box::new(Shared(Rc::clone(&store))),
            ..Collaborators::headless()
        };

        let mut first =
            Game::new(GameConfig::default(), Bounds::default(), 1, collaborators()).unwrap();
        plant_under_shoe(&mut first, RoachSize::Small);
        first.trigger_stomp();
        first.stop();

        let second =
            Game::new(GameConfig::default(), Bounds::default(), 2, collaborators()).unwrap();
        assert_eq!(second.best(), 2);
        assert_eq!(second.score(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn proptest_caps_hold_and_score_is_monotone(
            seed in any::<u64>(),
            steps in proptest::collection::vec((0u64..400, any::<bool>()), 1..200),
        ) {
            let mut game = Game::new(
                GameConfig::default(),
                Bounds::default(),
                seed,
                Collaborators::headless(),
            )
            .unwrap();
            let mut last_score = 0;
            let mut high = false;

            for (dt, shake) in steps {
                if shake {
                    high = !high;
                    game.on_motion(AccelSample::z(if high { 3.0 } else { 0.0 }));
                }
                game.advance(dt);

                let swarm = &game.state().swarm;
                prop_assert!(swarm.alive_count() <= game.config().max_alive);
                prop_assert!(swarm.dead_count() <= game.config().max_dead);
                prop_assert!(game.score() >= last_score);
                last_score = game.score();
            }

            let earned: u32 = game
                .drain_events()
                .iter()
                .filter_map(|e| match e {
                    GameEvent::Squashed { points, .. } => Some(*points),
                    _ => None,
                })
                .sum();
            prop_assert_eq!(earned, game.score());
        }
    }
}
