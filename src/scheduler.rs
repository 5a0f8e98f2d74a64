//! Periodic tick timers on a simulated clock
//!
//! Four timers drive the game. The host advances time in slices and the
//! scheduler hands back every tick that fell due inside the slice, earliest
//! first. Timers due at the same millisecond fire in [`TickKind`] order.

use serde::Serialize;

use crate::config::GameConfig;

/// Timer identity. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TickKind {
    /// Once a second: difficulty clock
    Clock,
    Spawn,
    Move,
    /// Corpse eviction
    Reap,
}

impl TickKind {
    pub const ALL: [TickKind; 4] = [
        TickKind::Clock,
        TickKind::Spawn,
        TickKind::Move,
        TickKind::Reap,
    ];
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    kind: TickKind,
    interval_ms: u64,
    next_ms: u64,
}

impl Timer {
    fn new(kind: TickKind, interval_ms: u64, start_ms: u64) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            kind,
            interval_ms,
            next_ms: start_ms + interval_ms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    timers: [Timer; 4],
    running: bool,
}

impl Scheduler {
    /// Arm all four timers; each first fires one interval after `start_ms`
    pub fn new(config: &GameConfig, start_ms: u64) -> Self {
        let interval = |kind| match kind {
            TickKind::Clock => config.clock_interval_ms,
            TickKind::Spawn => config.spawn_interval_ms,
            TickKind::Move => config.move_interval_ms,
            TickKind::Reap => config.reap_interval_ms,
        };
        Self {
            timers: TickKind::ALL.map(|kind| Timer::new(kind, interval(kind), start_ms)),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Earliest pending fire time
    pub fn next_due(&self) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.timers.iter().map(|t| t.next_ms).min()
    }

    /// Take the earliest tick due at or before `until_ms` and re-arm its timer.
    /// Returns the tick and the time it was due.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TickKind, u64)> {
        if !self.running {
            return None;
        }
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.next_ms <= until_ms)
            .min_by_key(|t| (t.next_ms, t.kind))?;
        let due = timer.next_ms;
        timer.next_ms = due + timer.interval_ms;
        Some((timer.kind, due))
    }

    /// Change a timer's interval and fire it next at `from_ms + interval_ms`
    pub fn rearm(&mut self, kind: TickKind, from_ms: u64, interval_ms: u64) {
        let timer = &mut self.timers[kind as usize];
        timer.interval_ms = interval_ms.max(1);
        timer.next_ms = from_ms + timer.interval_ms;
    }

    pub fn interval_ms(&self, kind: TickKind) -> u64 {
        self.timers[kind as usize].interval_ms
    }

    /// Cancel every timer. Nothing fires afterwards.
    pub fn cancel_all(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(clock: u64, spawn: u64, mv: u64, reap: u64) -> GameConfig {
        GameConfig {
            clock_interval_ms: clock,
            spawn_interval_ms: spawn,
            move_interval_ms: mv,
            reap_interval_ms: reap,
            ..GameConfig::default()
        }
    }

    fn drain(scheduler: &mut Scheduler, until: u64) -> Vec<(TickKind, u64)> {
        std::iter::from_fn(|| scheduler.pop_due(until)).collect()
    }

    #[test]
    fn test_ticks_in_time_order() {
        let mut scheduler = Scheduler::new(&config(1000, 600, 250, 2000), 0);
        let ticks = drain(&mut scheduler, 1000);
        assert_eq!(
            ticks,
            vec![
                (TickKind::Move, 250),
                (TickKind::Move, 500),
                (TickKind::Spawn, 600),
                (TickKind::Move, 750),
                (TickKind::Clock, 1000),
                (TickKind::Move, 1000),
            ]
        );
        assert_eq!(scheduler.next_due(), Some(1200));
    }

    #[test]
    fn test_same_millisecond_tie_order() {
        let mut scheduler = Scheduler::new(&config(100, 100, 100, 100), 0);
        let kinds: Vec<TickKind> = drain(&mut scheduler, 100).into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, TickKind::ALL.to_vec());
    }

    #[test]
    fn test_nothing_due_before_first_interval() {
        let mut scheduler = Scheduler::new(&config(1000, 600, 16, 2000), 50);
        assert_eq!(scheduler.pop_due(65), None);
        assert_eq!(scheduler.pop_due(66), Some((TickKind::Move, 66)));
    }

    #[test]
    fn test_rearm_changes_spacing() {
        let mut scheduler = Scheduler::new(&config(10_000, 600, 10_000, 10_000), 0);
        assert_eq!(scheduler.pop_due(600), Some((TickKind::Spawn, 600)));
        scheduler.rearm(TickKind::Spawn, 600, 300);
        assert_eq!(scheduler.interval_ms(TickKind::Spawn), 300);
        assert_eq!(scheduler.pop_due(899), None);
        assert_eq!(scheduler.pop_due(900), Some((TickKind::Spawn, 900)));
        // Re-arms with the new interval
        assert_eq!(scheduler.pop_due(1200), Some((TickKind::Spawn, 1200)));
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new(&config(100, 100, 100, 100), 0);
        scheduler.cancel_all();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.pop_due(u64::MAX / 2), None);
        assert_eq!(scheduler.next_due(), None);
    }
}
