use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Rejection;
use crate::profile::Profile;
use crate::task::Task;
use crate::timer::{Mode, Phase};

/// Every state change in the system produces an Event.
/// The presentation layer subscribes to them through the deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Pre-roll before a fresh focus run began.
    PrerollStarted {
        from: u64,
        at: DateTime<Utc>,
    },
    PrerollTick {
        remaining: u64,
        at: DateTime<Utc>,
    },
    FocusStarted {
        planned_secs: u64,
        at: DateTime<Utc>,
    },
    BreakStarted {
        break_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A focus run reached zero. `task_id` is the task that was active at
    /// that moment, if any; `next_mode` is where the machine now idles.
    FocusTimeUp {
        task_id: Option<String>,
        planned_secs: u64,
        next_mode: Mode,
        at: DateTime<Utc>,
    },
    BreakFinished {
        at: DateTime<Utc>,
    },
    Reset {
        at: DateTime<Utc>,
    },
    DeepModeEntered {
        at: DateTime<Utc>,
    },
    DeepModeExited {
        at: DateTime<Utc>,
    },
    /// Start was requested with nothing planned. The caller should point the
    /// user at the task list.
    TasksRequired {
        at: DateTime<Utc>,
    },
    TaskAdded {
        task: Task,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        task: Task,
        profile: Profile,
        at: DateTime<Utc>,
    },
    Rejected {
        reason: Rejection,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        phase: Phase,
        seconds_remaining: u64,
        planned_secs: u64,
        preroll: Option<u64>,
        is_deep_mode: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn rejected(reason: Rejection) -> Self {
        Event::Rejected {
            reason,
            at: Utc::now(),
        }
    }

    /// Events that deserve a celebratory or attention-grabbing effect.
    pub fn is_notice(&self) -> bool {
        matches!(
            self,
            Event::TaskCompleted { .. }
                | Event::FocusTimeUp { .. }
                | Event::BreakFinished { .. }
                | Event::TasksRequired { .. }
        )
    }
}
