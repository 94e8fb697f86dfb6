//! The deck: process-wide state store.
//!
//! One deck is built at startup. It owns the pending tasks, the history and
//! the profile, writes each of them back after every change, and fans events
//! out to subscribers over a broadcast channel.
//!
//! Persistence is best effort. A failed read falls back to the default value
//! and a failed write is logged; neither ever reaches the caller.

use chrono::Utc;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::error::Rejection;
use crate::events::Event;
use crate::profile::Profile;
use crate::storage::{Database, HISTORY_KEY, PENDING_TASKS_KEY, PROFILE_KEY};
use crate::task::{Task, TaskStore};

const EVENT_CAPACITY: usize = 64;

pub struct Deck {
    tasks: TaskStore,
    profile: Profile,
    db: Option<Database>,
    events: broadcast::Sender<Event>,
}

impl Deck {
    /// Load every persisted key from `db`, falling back to `default_profile`
    /// when no profile has been stored yet.
    pub fn load(db: Database, default_profile: Profile) -> Self {
        let pending: Vec<Task> = read_or_default(&db, PENDING_TASKS_KEY);
        let history: Vec<Task> = read_or_default(&db, HISTORY_KEY);
        let profile = match db.load_json::<Profile>(PROFILE_KEY) {
            Ok(Some(profile)) => profile,
            Ok(None) => default_profile,
            Err(e) => {
                warn!(key = PROFILE_KEY, error = %e, "failed to read profile, using default");
                default_profile
            }
        };
        info!(pending = pending.len(), history = history.len(), "deck loaded");
        Self::from_parts(TaskStore::with_parts(pending, history), profile, Some(db))
    }

    /// A deck that persists nothing.
    pub fn in_memory() -> Self {
        Self::from_parts(TaskStore::new(), Profile::default(), None)
    }

    fn from_parts(tasks: TaskStore, profile: Profile, db: Option<Database>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tasks,
            profile,
            db,
            events,
        }
    }

    /// Cap task length below the built-in maximum.
    pub fn with_max_minutes(mut self, max_minutes: u64) -> Self {
        self.tasks = self.tasks.with_max_minutes(max_minutes);
        self
    }

    // ── Get ──────────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        self.tasks.pending()
    }

    pub fn history(&self) -> &[Task] {
        self.tasks.history()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn planned_seconds(&self) -> u64 {
        self.tasks.total_planned_seconds()
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.tasks.active_task()
    }

    // ── Set ──────────────────────────────────────────────────────────

    pub fn add_task(&mut self, title: &str, minutes: f64) -> Result<Task, Rejection> {
        let task = self.tasks.add(title, minutes)?.clone();
        self.persist(PENDING_TASKS_KEY, self.tasks.pending());
        self.publish(Event::TaskAdded {
            task: task.clone(),
            at: Utc::now(),
        });
        Ok(task)
    }

    /// Move a task to history and credit the profile.
    pub fn complete_task(&mut self, id: &str) -> Result<Task, Rejection> {
        let task = self.tasks.complete(id)?;
        self.profile.record_completion();

        self.persist(PROFILE_KEY, &self.profile);
        self.persist(HISTORY_KEY, self.tasks.history());
        self.persist(PENDING_TASKS_KEY, self.tasks.pending());

        info!(
            task_id = %task.id,
            vibes_completed = self.profile.vibes_completed,
            "vibe check"
        );
        self.publish(Event::TaskCompleted {
            task: task.clone(),
            profile: self.profile.clone(),
            at: Utc::now(),
        });
        Ok(task)
    }

    // ── Subscribe ────────────────────────────────────────────────────

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Fan an event out to subscribers. Nobody listening is fine.
    pub fn publish(&self, event: Event) {
        let _ = self.events.send(event);
    }

    fn persist<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) {
        let Some(db) = &self.db else {
            return;
        };
        if let Err(e) = db.save_json(key, value) {
            warn!(key, error = %e, "failed to persist state");
        }
    }
}

fn read_or_default<T: DeserializeOwned + Default>(db: &Database, key: &str) -> T {
    match db.load_json(key) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            warn!(key, error = %e, "failed to read persisted state, using default");
            T::default()
        }
    }
}
