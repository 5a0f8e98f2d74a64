//! Accelerometer input
//!
//! A stomp is a sudden jump in the z axis between two consecutive samples.
//! Sensors may live on another thread; their samples reach the game through
//! a [`MotionSource`] that the game drains between ticks.

use std::sync::mpsc::{Receiver, TryRecvError};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// One accelerometer reading, in g
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub const fn z(z: f32) -> Self {
        Self { x: 0.0, y: 0.0, z }
    }
}

/// Turns a stream of samples into discrete stomp triggers
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    threshold: f32,
    last_z: f32,
}

impl ShakeDetector {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last_z: 0.0,
        }
    }

    /// Feed one sample. Returns true if it is a stomp. The previous z is
    /// updated either way.
    pub fn sample(&mut self, sample: AccelSample) -> bool {
        let triggered = (sample.z - self.last_z).abs() > self.threshold;
        self.last_z = sample.z;
        triggered
    }

    pub fn last_z(&self) -> f32 {
        self.last_z
    }
}

/// Push-style sample source, drained by the game
pub trait MotionSource {
    /// Move every sample received since the last call into `out`.
    /// Returns false once the source is finished for good.
    fn drain(&mut self, out: &mut Vec<AccelSample>) -> bool;
}

/// Samples pushed from another thread over a channel
pub struct ChannelMotionSource {
    rx: Receiver<AccelSample>,
}

impl ChannelMotionSource {
    pub fn new(rx: Receiver<AccelSample>) -> Self {
        Self { rx }
    }
}

impl MotionSource for ChannelMotionSource {
    fn drain(&mut self, out: &mut Vec<AccelSample>) -> bool {
        loop {
            match self.rx.try_recv() {
                Ok(sample) => out.push(sample),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }
}

/// Synthetic sensor: resting at 1 g with a little noise, and every
/// `period` samples a sharp spike that reads as a stomp.
#[derive(Debug, Clone)]
pub struct ShakeScript {
    rng: Pcg32,
    period: u32,
    spike: f32,
    count: u32,
}

impl ShakeScript {
    pub fn new(seed: u64, period: u32, spike: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            period: period.max(1),
            spike,
            count: 0,
        }
    }

    /// Next reading
    pub fn next_sample(&mut self) -> AccelSample {
        self.count = self.count.wrapping_add(1);
        let noise = |rng: &mut Pcg32| -> f32 { rng.random_range(-0.05..0.05) };
        let z = if self.count % self.period == 0 {
            1.0 + self.spike
        } else {
            1.0 + noise(&mut self.rng)
        };
        AccelSample {
            x: noise(&mut self.rng),
            y: noise(&mut self.rng),
            z,
        }
    }
}

impl MotionSource for ShakeScript {
    /// Produces exactly one reading per call
    fn drain(&mut self, out: &mut Vec<AccelSample>) -> bool {
        out.push(self.next_sample());
        true
    }
}
