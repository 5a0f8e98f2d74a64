//! Platform abstraction layer
//!
//! Handles browser/native differences for wall-clock time and run seeds.
//! The simulation itself never reads the clock; hosts do, and pass deltas in.

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Seed for a fresh run when none was asked for
pub fn time_seed() -> u64 {
    now_ms() as u64
}

/// Tracks wall-clock deltas between host frames
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole milliseconds elapsed since the previous call at `now_ms`.
    /// The first call returns 0. Time running backwards also counts as 0.
    pub fn delta(&mut self, now_ms: f64) -> u64 {
        let dt = match self.last_ms {
            Some(last) if now_ms > last => (now_ms - last).floor(),
            _ => 0.0,
        };
        // Keep the fractional part so rounding doesn't drift
        self.last_ms = Some(match self.last_ms {
            Some(last) if now_ms > last => last + dt,
            _ => now_ms,
        });
        dt as u64
    }
}
