//! Sound cues
//!
//! The game fires a cue and moves on. Sinks report failures, the game logs
//! them and keeps ticking. On the web the cues are synthesised with the Web
//! Audio API, no sample files needed.

use thiserror::Error;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SoundEffect {
    /// A roach got flattened
    Squish,
    /// Reached a new level
    LevelUp,
    /// Beat the best score
    NewRecord,
}

impl SoundEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Squish => "squish",
            Self::LevelUp => "level_up",
            Self::NewRecord => "new_record",
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable")]
    Unavailable,
    #[error("failed to play {effect:?}: {reason}")]
    Playback { effect: SoundEffect, reason: String },
}

/// Fire-and-forget sound output
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError>;
}

/// Plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _effect: SoundEffect) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Writes each cue to the log instead of a speaker (headless runs)
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    played: usize,
    muted: bool,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Cues played so far
    pub fn played(&self) -> usize {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
        if self.muted {
            return Ok(());
        }
        self.played += 1;
        log::debug!("♪ {}", effect.as_str());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioError, AudioSink, SoundEffect};

    /// Procedural cues through an `AudioContext`
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        /// Browsers keep the context suspended until a user gesture
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Wet crunch: a noisy sawtooth sweep down plus a low thud
        fn play_squish(ctx: &AudioContext, vol: f32) -> Option<()> {
            let t = ctx.current_time();

            let (osc, gain) = Self::create_osc(ctx, 900.0, OscillatorType::Sawtooth)?;
            gain.gain().set_value_at_time(vol * 0.35, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok()?;
            osc.frequency().set_value_at_time(900.0, t).ok()?;
            osc.frequency().set_value_at_time(300.0, t + 0.02).ok()?;
            osc.frequency().set_value_at_time(700.0, t + 0.04).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(80.0, t + 0.12)
                .ok()?;
            osc.start().ok()?;
            osc.stop_with_when(t + 0.15).ok()?;

            let (thud, thud_gain) = Self::create_osc(ctx, 90.0, OscillatorType::Sine)?;
            thud_gain.gain().set_value_at_time(vol * 0.5, t).ok()?;
            thud_gain
                .gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok()?;
            thud.start().ok()?;
            thud.stop_with_when(t + 0.12).ok()?;
            Some(())
        }

        /// Rising arpeggio
        fn play_arpeggio(ctx: &AudioContext, vol: f32, notes: &[f32], step: f64) -> Option<()> {
            for (i, freq) in notes.iter().enumerate() {
                let (osc, gain) = Self::create_osc(ctx, *freq, OscillatorType::Triangle)?;
                let t = ctx.current_time() + i as f64 * step;
                gain.gain().set_value_at_time(vol * 0.25, t).ok()?;
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok()?;
                osc.start_with_when(t).ok()?;
                osc.stop_with_when(t + 0.3).ok()?;
            }
            Some(())
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
            if self.muted || self.volume <= 0.0 {
                return Ok(());
            }
            let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let vol = self.volume;
            let played = match effect {
                SoundEffect::Squish => Self::play_squish(ctx, vol),
                SoundEffect::LevelUp => {
                    Self::play_arpeggio(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1)
                }
                SoundEffect::NewRecord => {
                    Self::play_arpeggio(ctx, vol, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08)
                }
            };
            played.ok_or_else(|| AudioError::Playback {
                effect,
                reason: "web audio node setup failed".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_audio_counts_unless_muted() {
        let mut audio = LogAudio::new();
        audio.play(SoundEffect::Squish).unwrap();
        audio.play(SoundEffect::LevelUp).unwrap();
        assert_eq!(audio.played(), 2);

        audio.set_muted(true);
        audio.play(SoundEffect::NewRecord).unwrap();
        assert_eq!(audio.played(), 2);
    }

    #[test]
    fn test_effect_names() {
        assert_eq!(SoundEffect::Squish.as_str(), "squish");
        assert_eq!(SoundEffect::NewRecord.as_str(), "new_record");
    }
}
