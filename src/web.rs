//! Browser surface
//!
//! The page owns the canvas, the DeviceMotion listener and the animation
//! loop. It feeds samples and timestamps in and pulls JSON snapshots out.

use wasm_bindgen::prelude::*;

use crate::audio::AudioManager;
use crate::config::{GameConfig, Preset};
use crate::game::{Collaborators, Game};
use crate::motion::AccelSample;
use crate::persistence::LocalStorageStore;
use crate::platform::{FrameClock, time_seed};
use crate::render::NullRenderer;
use crate::Bounds;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    clock: FrameClock,
}

#[wasm_bindgen]
impl WebGame {
    /// `preset` is "arcade", "classic" or "prototype"; unknown names fall back
    /// to arcade. A missing seed uses the clock.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f32,
        height: f32,
        preset: Option<String>,
        seed: Option<f64>,
    ) -> Result<WebGame, JsValue> {
        let preset = preset
            .as_deref()
            .and_then(Preset::from_str)
            .unwrap_or_default();
        let seed = seed.map_or_else(time_seed, |s| s as u64);
        let collaborators = Collaborators {
            store: Box::new(LocalStorageStore::new()),
            audio: Box::new(AudioManager::new()),
            renderer: Box::new(NullRenderer),
        };
        log::info!("Preset: {}", preset.as_str());
        let game = Game::new(
            GameConfig::from_preset(preset),
            Bounds::new(width, height),
            seed,
            collaborators,
        )
        .map_err(to_js)?;
        Ok(Self {
            game,
            clock: FrameClock::new(),
        })
    }

    /// One DeviceMotion reading, in g. Returns true if it squashed a roach.
    pub fn on_motion(&mut self, x: f32, y: f32, z: f32) -> bool {
        self.game.on_motion(AccelSample { x, y, z })
    }

    /// Move the shoe, e.g. from a drag gesture
    pub fn set_shoe_y(&mut self, y: f32) {
        self.game.set_shoe_y(y);
    }

    /// Stomp without a shake (tap fallback)
    pub fn stomp(&mut self) -> bool {
        self.game.trigger_stomp().is_some()
    }

    /// Advance to the `requestAnimationFrame` timestamp
    pub fn frame(&mut self, timestamp_ms: f64) {
        let dt = self.clock.delta(timestamp_ms);
        self.game.advance(dt);
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.game.advance(dt_ms.max(0.0) as u64);
    }

    /// Current snapshot as JSON
    pub fn frame_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.frame()).map_err(to_js)
    }

    /// Events since the last call as a JSON array. The page should drop
    /// sprites listed in `reaped` events.
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.drain_events()).map_err(to_js)
    }

    /// The motion interval the page should throttle DeviceMotion to
    pub fn motion_interval_ms(&self) -> u32 {
        self.game.config().motion_interval_ms as u32
    }

    pub fn stop(&mut self) {
        self.game.stop();
    }

    pub fn is_running(&self) -> bool {
        self.game.is_running()
    }

    pub fn score(&self) -> u32 {
        self.game.score()
    }

    pub fn best(&self) -> u32 {
        self.game.best()
    }

    pub fn level(&self) -> u32 {
        self.game.level()
    }
}
