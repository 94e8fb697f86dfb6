//! Tick sources for the session clock.
//!
//! A tick source is the only recurring background activity in the system.
//! Every run of the clock gets a new generation number and every tick carries
//! the generation it was produced for, so a tick that was already queued when
//! its run was stopped can be recognised and dropped.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

/// One elapsed time unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Something that can be told to start or stop producing ticks.
///
/// `stop` must be safe to call on a source that is not running.
pub trait TickSource: Send {
    fn start(&mut self, generation: u64);
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

/// Tokio-backed ticker: one task per run, pushing ticks into a channel.
///
/// Must be started from inside a tokio runtime.
pub struct IntervalTicker {
    period: Duration,
    tx: UnboundedSender<Tick>,
    handle: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    pub fn new(period: Duration, tx: UnboundedSender<Tick>) -> Self {
        Self {
            period,
            tx,
            handle: None,
        }
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self, generation: u64) {
        self.stop();

        let tx = self.tx.clone();
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            // First tick one full period from now, not immediately.
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
        trace!(generation, "ticker started");
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            trace!("ticker stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A tick source that never ticks on its own.
///
/// Clones share state, so a test can keep one clone to observe what the
/// clock did with the other.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    active: Arc<AtomicBool>,
    starts: Arc<AtomicUsize>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the source has been started.
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self, _generation: u64) {
        self.active.store(true, Ordering::SeqCst);
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
