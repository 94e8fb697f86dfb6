//! The countdown primitive.

use tracing::trace;

use super::ticker::{Tick, TickSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// The remainder went from 1 to 0. Emitted once per run.
    ReachedZero,
}

/// Remaining seconds plus the tick source that drives them down.
///
/// The clock owns its tick source exclusively: starting a run always stops
/// the previous one first, and dropping the clock stops it for good.
pub struct SessionClock {
    remaining_secs: u64,
    running: bool,
    generation: u64,
    ticker: Box<dyn TickSource>,
}

impl std::fmt::Debug for SessionClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClock")
            .field("remaining_secs", &self.remaining_secs)
            .field("running", &self.running)
            .field("generation", &self.generation)
            .field("ticker_active", &self.ticker.is_active())
            .finish()
    }
}

impl SessionClock {
    pub fn new(ticker: Box<dyn TickSource>) -> Self {
        Self {
            remaining_secs: 0,
            running: false,
            generation: 0,
            ticker,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Generation of the current (or last) run.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ticker_active(&self) -> bool {
        self.ticker.is_active()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new run of `total_secs`. A zero-length run does not start.
    pub fn start(&mut self, total_secs: u64) {
        self.stop();
        self.remaining_secs = total_secs;
        if total_secs > 0 {
            self.spin_up();
        }
    }

    /// Returns `false` if the clock was not running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.stop();
        true
    }

    /// Continue from the current remainder with a fresh interval.
    pub fn resume(&mut self) -> bool {
        if self.running || self.remaining_secs == 0 {
            return false;
        }
        self.spin_up();
        true
    }

    /// Stop ticking and keep the remainder. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.running = false;
        self.ticker.stop();
    }

    /// Set the remainder without starting. Ignored while running.
    pub fn preset(&mut self, secs: u64) {
        if !self.running {
            self.remaining_secs = secs;
        }
    }

    /// Advance one time unit.
    pub fn tick(&mut self) -> Option<ClockEvent> {
        if !self.running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.stop();
            return Some(ClockEvent::ReachedZero);
        }
        None
    }

    /// Like [`tick`](Self::tick), but drops ticks from an earlier run.
    pub fn handle_tick(&mut self, tick: Tick) -> Option<ClockEvent> {
        if tick.generation != self.generation {
            trace!(
                stale = tick.generation,
                current = self.generation,
                "dropping stale tick"
            );
            return None;
        }
        self.tick()
    }

    fn spin_up(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.running = true;
        self.ticker.start(self.generation);
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.ticker.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ticker::ManualTicker;

    fn clock() -> (SessionClock, ManualTicker) {
        let source = ManualTicker::new();
        (SessionClock::new(Box::new(source.clone())), source)
    }

    #[test]
    fn counts_down_and_fires_once() {
        let (mut clock, source) = clock();
        clock.start(3);
        assert!(source.is_active());

        assert_eq!(clock.tick(), None);
        assert_eq!(clock.tick(), None);
        assert_eq!(clock.tick(), Some(ClockEvent::ReachedZero));
        assert_eq!(clock.remaining_secs(), 0);
        assert!(!source.is_active());

        assert_eq!(clock.tick(), None);
        assert_eq!(clock.remaining_secs(), 0);
    }

    #[test]
    fn pause_keeps_remainder_and_stops_source() {
        let (mut clock, source) = clock();
        clock.start(10);
        clock.tick();
        assert!(clock.pause());
        assert!(!source.is_active());

        assert_eq!(clock.tick(), None);
        assert_eq!(clock.remaining_secs(), 9);

        assert!(clock.resume());
        assert!(source.is_active());
        assert_eq!(source.starts(), 2);
        clock.tick();
        assert_eq!(clock.remaining_secs(), 8);
    }

    #[test]
    fn zero_length_run_does_not_start() {
        let (mut clock, source) = clock();
        clock.start(0);
        assert!(!clock.is_running());
        assert!(!source.is_active());
        assert!(!clock.resume());
    }

    #[test]
    fn restart_replaces_previous_run() {
        let (mut clock, source) = clock();
        clock.start(5);
        let first = clock.generation();
        clock.start(8);
        assert_ne!(clock.generation(), first);
        assert_eq!(clock.remaining_secs(), 8);
        assert_eq!(source.starts(), 2);
        assert!(source.is_active());
    }

    #[test]
    fn stale_ticks_are_ignored() {
        let (mut clock, _probe) = clock();
        clock.start(5);
        let stale = Tick { generation: clock.generation() };
        clock.pause();
        clock.resume();

        assert_eq!(clock.handle_tick(stale), None);
        assert_eq!(clock.remaining_secs(), 5);

        let fresh = Tick { generation: clock.generation() };
        clock.handle_tick(fresh);
        assert_eq!(clock.remaining_secs(), 4);
    }

    #[test]
    fn preset_is_ignored_while_running() {
        let (mut clock, _probe) = clock();
        clock.preset(30);
        assert_eq!(clock.remaining_secs(), 30);
        clock.start(10);
        clock.preset(99);
        assert_eq!(clock.remaining_secs(), 10);
    }

    #[test]
    fn drop_stops_source() {
        let (mut clock, source) = clock();
        clock.start(10);
        drop(clock);
        assert!(!source.is_active());
    }
}
