//! Focus session state machine.
//!
//! Wraps a [`SessionClock`] with session semantics: a short pre-roll before a
//! fresh focus run, the focus run itself, and an optional break afterwards.
//! The machine never ticks on its own; whoever owns it feeds it ticks from
//! the clock's tick source (or calls `tick()` directly in tests).
//!
//! ## State Transitions
//!
//! ```text
//! idle(focus) -> counting-down -> running(focus) <-> paused(focus)
//!                                       |
//!                       (planned >= threshold) -> idle(break) -> running(break) <-> paused(break)
//!                       (otherwise)            -> idle(focus)          |
//!                                                                      -> idle(focus)
//! reset: any -> idle(focus)
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clock::{ClockEvent, SessionClock};
use super::ticker::{Tick, TickSource};
use crate::error::Rejection;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Focus,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    CountingDown,
    Running,
    Paused,
}

/// Timing knobs for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Length of the pre-roll before a fresh focus run, in ticks.
    pub preroll_secs: u64,
    pub break_secs: u64,
    /// A finished focus run at least this long earns a break.
    pub break_threshold_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            preroll_secs: 3,
            break_secs: 5 * 60,
            break_threshold_secs: 25 * 60,
        }
    }
}

#[derive(Debug)]
pub struct FocusMachine {
    settings: SessionSettings,
    clock: SessionClock,
    mode: Mode,
    phase: Phase,
    /// Current sum of pending task durations.
    planned_secs: u64,
    /// Planned total captured when the current focus run began.
    run_planned_secs: u64,
    active_task: Option<String>,
    deep_mode: bool,
}

impl FocusMachine {
    /// Starts in `idle(focus)` with nothing planned.
    pub fn new(settings: SessionSettings, ticker: Box<dyn TickSource>) -> Self {
        Self {
            settings,
            clock: SessionClock::new(ticker),
            mode: Mode::Focus,
            phase: Phase::Idle,
            planned_secs: 0,
            run_planned_secs: 0,
            active_task: None,
            deep_mode: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Session time left. During the pre-roll this is the full plan.
    pub fn seconds_remaining(&self) -> u64 {
        match self.phase {
            Phase::CountingDown => self.planned_secs,
            _ => self.clock.remaining_secs(),
        }
    }

    /// Pre-roll value to display, only while counting down.
    pub fn preroll_remaining(&self) -> Option<u64> {
        (self.phase == Phase::CountingDown).then(|| self.clock.remaining_secs())
    }

    pub fn planned_secs(&self) -> u64 {
        self.planned_secs
    }

    pub fn active_task(&self) -> Option<&str> {
        self.active_task.as_deref()
    }

    pub fn is_deep_mode(&self) -> bool {
        self.deep_mode
    }

    /// Whether the underlying tick source is currently producing ticks.
    pub fn is_ticking(&self) -> bool {
        self.clock.ticker_active()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            phase: self.phase,
            seconds_remaining: self.seconds_remaining(),
            planned_secs: self.planned_secs,
            preroll: self.preroll_remaining(),
            is_deep_mode: self.deep_mode,
            at: Utc::now(),
        }
    }

    // ── Plan ─────────────────────────────────────────────────────────

    /// Record the current plan. While idle in focus mode the displayed
    /// remainder follows it; other states keep their own remainder.
    pub fn sync_plan(&mut self, planned_secs: u64, active_task: Option<String>) {
        self.planned_secs = planned_secs;
        self.active_task = active_task;
        if self.phase == Phase::Idle && self.mode == Mode::Focus {
            self.clock.preset(planned_secs);
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh run, start a pending break, or resume a paused one.
    pub fn start(&mut self) -> Option<Event> {
        match (self.phase, self.mode) {
            (Phase::Idle, Mode::Focus) => {
                if self.planned_secs == 0 {
                    debug!("start rejected: nothing planned");
                    return Some(Event::TasksRequired { at: Utc::now() });
                }
                if self.settings.preroll_secs == 0 {
                    return Some(self.begin_focus());
                }
                self.phase = Phase::CountingDown;
                self.clock.start(self.settings.preroll_secs);
                debug!(from = self.settings.preroll_secs, "pre-roll started");
                Some(Event::PrerollStarted {
                    from: self.settings.preroll_secs,
                    at: Utc::now(),
                })
            }
            (Phase::Idle, Mode::Break) => {
                let break_secs = self.clock.remaining_secs();
                if break_secs == 0 {
                    return Some(self.finish_break());
                }
                self.clock.start(break_secs);
                self.phase = Phase::Running;
                debug!(break_secs, "break started");
                Some(Event::BreakStarted {
                    break_secs,
                    at: Utc::now(),
                })
            }
            (Phase::Paused, _) => self.resume(),
            (Phase::CountingDown | Phase::Running, _) => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.phase != Phase::Running {
            return None;
        }
        self.clock.pause();
        self.phase = Phase::Paused;
        debug!(mode = ?self.mode, remaining = self.clock.remaining_secs(), "paused");
        Some(Event::Paused {
            mode: self.mode,
            remaining_secs: self.clock.remaining_secs(),
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.phase != Phase::Paused || !self.clock.resume() {
            return None;
        }
        self.phase = Phase::Running;
        debug!(mode = ?self.mode, remaining = self.clock.remaining_secs(), "resumed");
        Some(Event::Resumed {
            mode: self.mode,
            remaining_secs: self.clock.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Pause when running, otherwise start.
    pub fn toggle(&mut self) -> Option<Event> {
        match self.phase {
            Phase::Running => self.pause(),
            _ => self.start(),
        }
    }

    /// Back to `idle(focus)` from anywhere, cancelling any run or pre-roll.
    pub fn reset(&mut self) -> Option<Event> {
        self.clock.stop();
        self.mode = Mode::Focus;
        self.phase = Phase::Idle;
        self.run_planned_secs = 0;
        self.clock.preset(self.planned_secs);
        debug!(planned = self.planned_secs, "reset");
        Some(Event::Reset { at: Utc::now() })
    }

    pub fn enter_deep_mode(&mut self) -> Option<Event> {
        if self.planned_secs == 0 {
            return Some(Event::rejected(Rejection::NoPlannedTime));
        }
        if self.deep_mode {
            return None;
        }
        self.deep_mode = true;
        Some(Event::DeepModeEntered { at: Utc::now() })
    }

    pub fn exit_deep_mode(&mut self) -> Option<Event> {
        if !self.deep_mode {
            return None;
        }
        self.deep_mode = false;
        Some(Event::DeepModeExited { at: Utc::now() })
    }

    /// Advance one time unit.
    pub fn tick(&mut self) -> Option<Event> {
        let reached_zero = self.clock.tick();
        self.after_tick(reached_zero)
    }

    /// Advance on a tick from the tick source, ignoring stale ones.
    pub fn on_tick(&mut self, tick: Tick) -> Option<Event> {
        let reached_zero = self.clock.handle_tick(tick);
        self.after_tick(reached_zero)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn after_tick(&mut self, clock_event: Option<ClockEvent>) -> Option<Event> {
        match (clock_event, self.phase, self.mode) {
            (None, Phase::CountingDown, _) => Some(Event::PrerollTick {
                remaining: self.clock.remaining_secs(),
                at: Utc::now(),
            }),
            (None, _, _) => None,
            (Some(ClockEvent::ReachedZero), Phase::CountingDown, _) => Some(self.begin_focus()),
            (Some(ClockEvent::ReachedZero), Phase::Running, Mode::Focus) => {
                Some(self.finish_focus())
            }
            (Some(ClockEvent::ReachedZero), Phase::Running, Mode::Break) => {
                Some(self.finish_break())
            }
            (Some(ClockEvent::ReachedZero), _, _) => None,
        }
    }

    fn begin_focus(&mut self) -> Event {
        self.mode = Mode::Focus;
        if self.planned_secs == 0 {
            // Plan emptied during the pre-roll.
            self.phase = Phase::Idle;
            self.clock.stop();
            self.clock.preset(0);
            return Event::TasksRequired { at: Utc::now() };
        }
        self.run_planned_secs = self.planned_secs;
        self.clock.start(self.run_planned_secs);
        self.phase = Phase::Running;
        info!(planned_secs = self.run_planned_secs, "focus started");
        Event::FocusStarted {
            planned_secs: self.run_planned_secs,
            at: Utc::now(),
        }
    }

    fn finish_focus(&mut self) -> Event {
        let finished = self.run_planned_secs;
        self.run_planned_secs = 0;
        self.phase = Phase::Idle;

        let next_mode = if finished >= self.settings.break_threshold_secs {
            self.mode = Mode::Break;
            self.clock.preset(self.settings.break_secs);
            Mode::Break
        } else {
            self.mode = Mode::Focus;
            self.clock.preset(self.planned_secs);
            Mode::Focus
        };
        info!(planned_secs = finished, next = ?next_mode, "focus time up");
        Event::FocusTimeUp {
            task_id: self.active_task.clone(),
            planned_secs: finished,
            next_mode,
            at: Utc::now(),
        }
    }

    fn finish_break(&mut self) -> Event {
        self.mode = Mode::Focus;
        self.phase = Phase::Idle;
        self.clock.preset(self.planned_secs);
        info!("break finished");
        Event::BreakFinished { at: Utc::now() }
    }
}
