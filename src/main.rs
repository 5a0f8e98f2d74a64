//! Roach Stomp headless runner
//!
//! Plays a session against a synthetic accelerometer and logs what happens.
//! The browser build lives in the library (`web` module); this binary is
//! native only.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;
    use std::sync::mpsc::{self, Sender};
    use std::thread::{self, JoinHandle};
    use std::time::{Duration, Instant};

    use clap::Parser;

    use roach_stomp::audio::LogAudio;
    use roach_stomp::motion::{AccelSample, ChannelMotionSource, ShakeScript};
    use roach_stomp::persistence::{JsonFileStore, ThreadedStore};
    use roach_stomp::platform::time_seed;
    use roach_stomp::render::LogRenderer;
    use roach_stomp::sim::GameEvent;
    use roach_stomp::{Bounds, Collaborators, Game, GameConfig, Preset};

    #[derive(Parser, Debug)]
    #[command(name = "roach-stomp")]
    #[command(about = "Shake-to-stomp cockroach game, played by a synthetic sensor")]
    struct Args {
        /// Tuning preset: arcade, classic or prototype
        #[arg(short, long, default_value = "arcade")]
        preset: String,

        /// JSON config file (overrides the preset)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// How long to play, in seconds of game time
        #[arg(short, long, default_value_t = 30)]
        seconds: u64,

        /// RNG seed (defaults to the clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Where the best score is kept
        #[arg(long, default_value = "roach-stomp-scores.json")]
        store: PathBuf,

        #[arg(long, default_value_t = 390.0)]
        width: f32,

        #[arg(long, default_value_t = 844.0)]
        height: f32,

        /// Sensor readings between synthetic shakes
        #[arg(long, default_value_t = 6)]
        shake_every: u32,

        /// Run as fast as possible instead of in real time
        #[arg(long)]
        fast: bool,
    }

    /// Frame step for the host loop, roughly 60 Hz
    const FRAME_MS: u64 = 16;

    pub fn run() -> ExitCode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let args = Args::parse();
        match play(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        }
    }

    fn load_config(args: &Args) -> Result<GameConfig, Box<dyn std::error::Error>> {
        if let Some(path) = &args.config {
            log::info!("Loading config from {}", path.display());
            return Ok(GameConfig::load(path)?);
        }
        let preset = Preset::from_str(&args.preset)
            .ok_or_else(|| format!("unknown preset {:?}", args.preset))?;
        log::info!("Preset: {}", preset.as_str());
        Ok(GameConfig::from_preset(preset))
    }

    fn play(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
        let config = load_config(args)?;
        let seed = args.seed.unwrap_or_else(time_seed);
        let motion_interval = config.motion_interval_ms;

        let store = ThreadedStore::new(JsonFileStore::new(&args.store))?;
        let collaborators = Collaborators {
            store: Box::new(store),
            audio: Box::new(LogAudio::new()),
            renderer: Box::new(LogRenderer::new(60)),
        };
        let bounds = Bounds::new(args.width, args.height);
        let mut game = Game::new(config, bounds, seed, collaborators)?;

        let total_ms = args.seconds * 1000;
        let sensor = if args.fast {
            // One synthetic reading per frame, on the game's thread
            game.attach_motion(Box::new(ShakeScript::new(seed, args.shake_every, 2.5)));
            None
        } else {
            let (tx, rx) = mpsc::channel();
            game.attach_motion(Box::new(ChannelMotionSource::new(rx)));
            Some(spawn_sensor(tx, seed, args.shake_every, motion_interval)?)
        };

        let start = Instant::now();
        let mut kills = 0usize;
        while game.now_ms() < total_ms {
            game.advance(FRAME_MS);
            for event in game.drain_events() {
                match event {
                    GameEvent::Squashed { .. } => kills += 1,
                    GameEvent::LevelUp { level } => log::info!("Reached level {level}"),
                    GameEvent::Reaped { ids } => log::debug!("Cleaned up {} corpses", ids.len()),
                    _ => {}
                }
            }
            if !args.fast {
                let target = Duration::from_millis(game.now_ms());
                if let Some(wait) = target.checked_sub(start.elapsed()) {
                    thread::sleep(wait);
                }
            }
        }

        game.stop();
        if let Some(handle) = sensor {
            if handle.join().is_err() {
                log::warn!("Sensor thread panicked");
            }
        }

        log::info!(
            "Final score {} ({} kills), best {}, level {}",
            game.score(),
            kills,
            game.best(),
            game.level()
        );
        Ok(())
    }

    /// Pushes synthetic readings at the sensor rate until the game hangs up
    fn spawn_sensor(
        tx: Sender<AccelSample>,
        seed: u64,
        shake_every: u32,
        interval_ms: u64,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("sensor".to_string())
            .spawn(move || {
                let mut script = ShakeScript::new(seed, shake_every, 2.5);
                while tx.send(script.next_sample()).is_ok() {
                    thread::sleep(Duration::from_millis(interval_ms));
                }
                log::debug!("Sensor stopped");
            })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm entry point is `web::start` in the library
}
