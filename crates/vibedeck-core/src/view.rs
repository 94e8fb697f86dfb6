//! Presentation adapter.
//!
//! [`Dashboard`] glues the deck and the focus machine together. It turns
//! user [`Intent`]s into calls on them, keeps the machine's plan in step with
//! the task list, completes the active task when a focus run times up, and
//! exposes a flat [`ViewState`] for whatever is drawing the screen.
//!
//! Every event produced along the way is published on the deck's channel and
//! also returned to the caller, in publication order.

use rand::thread_rng;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use crate::deck::Deck;
use crate::events::Event;
use crate::quotes;
use crate::task::Task;
use crate::timer::{FocusMachine, Mode, Phase, Tick};

/// A discrete user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Start,
    Pause,
    /// Pause when running, start or resume otherwise.
    Toggle,
    Reset,
    EnterDeep,
    ExitDeep,
    AddTask { title: String, minutes: f64 },
    CompleteTask { id: String },
}

/// Everything a display needs for one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub mode: Mode,
    pub phase: Phase,
    pub seconds_remaining: u64,
    /// `MM:SS` of `seconds_remaining`.
    pub display: String,
    pub preroll: Option<u64>,
    pub is_deep_mode: bool,
    pub planned_seconds: u64,
    pub active_task: Option<Task>,
    pub title: &'static str,
    pub primary_action: &'static str,
    pub quote: Option<&'static str>,
}

/// `MM:SS`, with minutes allowed past 99.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub struct Dashboard {
    deck: Deck,
    machine: FocusMachine,
    echo: broadcast::Receiver<Event>,
    quote: Option<&'static str>,
    deep_beats: u64,
}

impl Dashboard {
    pub fn new(deck: Deck, machine: FocusMachine) -> Self {
        let echo = deck.subscribe();
        let mut dashboard = Self {
            deck,
            machine,
            echo,
            quote: None,
            deep_beats: 0,
        };
        dashboard.sync_plan();
        dashboard
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn machine(&self) -> &FocusMachine {
        &self.machine
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.deck.subscribe()
    }

    pub fn view(&self) -> ViewState {
        let m = &self.machine;
        let seconds_remaining = m.seconds_remaining();
        ViewState {
            mode: m.mode(),
            phase: m.phase(),
            seconds_remaining,
            display: format_clock(seconds_remaining),
            preroll: m.preroll_remaining(),
            is_deep_mode: m.is_deep_mode(),
            planned_seconds: m.planned_secs(),
            active_task: self.deck.active_task().cloned(),
            title: match m.mode() {
                Mode::Focus => "FOCUS VIBE",
                Mode::Break => "BREAK VIBE",
            },
            primary_action: match (m.phase(), m.mode()) {
                (Phase::Running, _) => "PAUSE VIBE",
                (Phase::CountingDown, _) => "GET READY",
                (Phase::Paused, _) => "RESUME VIBE",
                (Phase::Idle, Mode::Focus) => "START FOCUS",
                (Phase::Idle, Mode::Break) => "START BREAK",
            },
            quote: self.quote,
        }
    }

    pub fn dispatch(&mut self, intent: Intent) -> Vec<Event> {
        match intent {
            Intent::Start => self.emit(|m| m.start()),
            Intent::Pause => self.emit(|m| m.pause()),
            Intent::Toggle => self.emit(|m| m.toggle()),
            Intent::Reset => self.emit(|m| m.reset()),
            Intent::EnterDeep => {
                let event = self.machine.enter_deep_mode();
                if matches!(event, Some(Event::DeepModeEntered { .. })) {
                    self.quote = Some(quotes::pick(&mut thread_rng()));
                    self.deep_beats = 0;
                }
                self.publish(event);
            }
            Intent::ExitDeep => {
                let event = self.machine.exit_deep_mode();
                if event.is_some() {
                    self.quote = None;
                }
                self.publish(event);
            }
            Intent::AddTask { title, minutes } => {
                match self.deck.add_task(&title, minutes) {
                    Ok(_) => self.sync_plan(),
                    Err(reason) => self.publish(Some(Event::rejected(reason))),
                }
            }
            Intent::CompleteTask { id } => match self.deck.complete_task(&id) {
                Ok(_) => self.sync_plan(),
                Err(reason) => self.publish(Some(Event::rejected(reason))),
            },
        }
        self.drain_echo()
    }

    /// Advance on a tick from the tick source.
    pub fn on_tick(&mut self, tick: Tick) -> Vec<Event> {
        let event = self.machine.on_tick(tick);
        self.after_tick(event)
    }

    /// Advance one unit without a tick source.
    pub fn tick(&mut self) -> Vec<Event> {
        let event = self.machine.tick();
        self.after_tick(event)
    }

    fn after_tick(&mut self, event: Option<Event>) -> Vec<Event> {
        let finished_task = match &event {
            Some(Event::FocusTimeUp { task_id, .. }) => task_id.clone(),
            _ => None,
        };
        self.publish(event);

        if let Some(id) = finished_task {
            if let Err(reason) = self.deck.complete_task(&id) {
                // Task was completed by hand during the run.
                warn!(task_id = %id, %reason, "active task already gone at time-up");
            }
            self.sync_plan();
        }
        self.drain_echo()
    }

    /// One beat of the deep-mode quote rotation. Beats come from their own
    /// interval, independent of the session clock, so the quote keeps
    /// rotating while idle or paused.
    pub fn beat(&mut self) {
        if !self.machine.is_deep_mode() {
            return;
        }
        self.deep_beats += 1;
        if self.deep_beats % quotes::ROTATE_EVERY_BEATS == 0 {
            self.quote = Some(quotes::pick(&mut thread_rng()));
        }
    }

    fn emit(&mut self, f: impl FnOnce(&mut FocusMachine) -> Option<Event>) {
        let event = f(&mut self.machine);
        self.publish(event);
    }

    fn publish(&self, event: Option<Event>) {
        if let Some(event) = event {
            self.deck.publish(event);
        }
    }

    fn sync_plan(&mut self) {
        let planned = self.deck.planned_seconds();
        let active = self.deck.active_task().map(|t| t.id.clone());
        self.machine.sync_plan(planned, active);
    }

    fn drain_echo(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            match self.echo.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "event echo lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        events
    }
}
