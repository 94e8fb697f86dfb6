//! Pending tasks and the completion history.
//!
//! Tasks are kept newest-first. The first pending task is the *active* task:
//! the one a finished focus run marks as done.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::Rejection;

/// Upper bound on a single task's duration, in minutes.
pub const MAX_TASK_MINUTES: u64 = 240;

/// A unit of planned work.
///
/// Field names are camelCase on the wire so persisted records keep the same
/// shape the dashboard has always written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub duration_seconds: u64,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Fields this version does not know about, written back untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Task {
    /// Whole minutes, rounded, for display.
    pub fn duration_minutes(&self) -> u64 {
        (self.duration_seconds + 30) / 60
    }
}

/// Ordered pending tasks plus the append-only history of completed ones.
#[derive(Debug, Clone)]
pub struct TaskStore {
    pending: Vec<Task>,
    history: Vec<Task>,
    max_minutes: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::with_parts(Vec::new(), Vec::new())
    }

    /// Rebuild a store from previously persisted collections.
    pub fn with_parts(pending: Vec<Task>, history: Vec<Task>) -> Self {
        Self {
            pending,
            history,
            max_minutes: MAX_TASK_MINUTES,
        }
    }

    /// Lower the per-task minute cap. Values above [`MAX_TASK_MINUTES`] are clamped.
    pub fn with_max_minutes(mut self, max_minutes: u64) -> Self {
        self.max_minutes = max_minutes.clamp(1, MAX_TASK_MINUTES);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pending(&self) -> &[Task] {
        &self.pending
    }

    pub fn history(&self) -> &[Task] {
        &self.history
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.pending.iter().find(|t| t.id == id)
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.pending.first()
    }

    /// Sum of all pending durations. Recomputed on every call.
    pub fn total_planned_seconds(&self) -> u64 {
        self.pending.iter().map(|t| t.duration_seconds).sum()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Create a task and put it at the front of the pending list.
    ///
    /// Fractional minutes are rounded; anything that rounds below one minute
    /// counts as one minute.
    pub fn add(&mut self, title: &str, minutes: f64) -> Result<&Task, Rejection> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Rejection::EmptyTitle);
        }
        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(Rejection::InvalidMinutes { minutes });
        }
        let rounded = minutes.round();
        if rounded > self.max_minutes as f64 {
            return Err(Rejection::MinutesOutOfRange {
                minutes,
                max: self.max_minutes,
            });
        }
        let whole_minutes = (rounded as u64).max(1);

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            duration_seconds: whole_minutes * 60,
            is_completed: false,
            created_at: Utc::now(),
            completed_at: None,
            extra: serde_json::Map::new(),
        };
        debug!(task_id = %task.id, minutes = whole_minutes, "task added");
        self.pending.insert(0, task);
        Ok(&self.pending[0])
    }

    /// Move a pending task into history and return the completed copy.
    pub fn complete(&mut self, id: &str) -> Result<Task, Rejection> {
        let index = self
            .pending
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Rejection::UnknownTask { id: id.to_string() })?;

        let mut task = self.pending.remove(index);
        task.is_completed = true;
        task.completed_at = Some(Utc::now());
        self.history.insert(0, task.clone());
        debug!(task_id = %task.id, "task completed");
        Ok(task)
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}
