//! # VibeDeck Core Library
//!
//! Business logic for VibeDeck, a focus timer coupled to a task list. The CLI
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Task Store**: pending tasks (newest first) and the completion history
//! - **Session Clock**: countdown primitive owning a cancellable tick source
//! - **Focus Machine**: pre-roll, focus and break periods around the clock
//! - **Deck**: the process-wide state store with persistence and events
//! - **Dashboard**: presentation adapter relaying intents and exposing a view
//! - **Storage**: SQLite key-value documents and TOML configuration
//!
//! ## Key Components
//!
//! - [`FocusMachine`]: session state machine
//! - [`Deck`]: state store (get / set / subscribe)
//! - [`Dashboard`]: intent dispatch and view state
//! - [`Database`]: persisted key-value documents
//! - [`Config`]: application configuration

pub mod deck;
pub mod error;
pub mod events;
pub mod profile;
pub mod quotes;
pub mod storage;
pub mod task;
pub mod timer;
pub mod view;

pub use deck::Deck;
pub use error::{ConfigError, CoreError, DatabaseError, Rejection};
pub use events::Event;
pub use profile::Profile;
pub use storage::{Config, Database};
pub use task::{Task, TaskStore};
pub use timer::{
    FocusMachine, IntervalTicker, ManualTicker, Mode, Phase, SessionSettings, Tick, TickSource,
};
pub use view::{format_clock, Dashboard, Intent, ViewState};
