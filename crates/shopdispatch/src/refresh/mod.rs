//! Refresh coordination — atomic snapshot publication plus the periodic
//! scheduler.
//!
//! The store holds one immutable snapshot behind an `RwLock`; a refresh
//! builds its output completely and then swaps it in whole. A failed
//! refresh keeps the previous snapshot and flags it stale, so the dashboard
//! shows known-good data with an error indicator instead of a blank or
//! half-built table.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use crate::pipeline::{DashboardSnapshot, Pipeline};

/// Publicly visible store state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    pub has_snapshot: bool,
    pub stale: bool,
    pub last_error: Option<String>,
}

#[derive(Default)]
struct StoreState {
    current: Option<Arc<DashboardSnapshot>>,
    stale: bool,
    last_error: Option<String>,
}

/// Holds the currently displayed snapshot.
#[derive(Default)]
pub struct SnapshotStore {
    state: RwLock<StoreState>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot, if any refresh has ever succeeded.
    pub fn current(&self) -> Option<Arc<DashboardSnapshot>> {
        let state = self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.current.clone()
    }

    pub fn status(&self) -> StoreStatus {
        let state = self
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        StoreStatus {
            has_snapshot: state.current.is_some(),
            stale: state.stale,
            last_error: state.last_error.clone(),
        }
    }

    /// Atomically replaces the displayed snapshot and clears staleness.
    pub fn publish(&self, snapshot: DashboardSnapshot) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.current = Some(Arc::new(snapshot));
        state.stale = false;
        state.last_error = None;
    }

    /// Records a failed refresh. The previous snapshot, if any, stays up.
    pub fn mark_failed(&self, error: &str) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.stale = state.current.is_some();
        state.last_error = Some(error.to_string());
    }
}

/// Runs one refresh and publishes the outcome.
pub fn run_refresh(pipeline: &Pipeline, store: &SnapshotStore) {
    match pipeline.refresh() {
        Ok(snapshot) => store.publish(snapshot),
        Err(e) => {
            log::error!("Refresh failed: {}", e);
            store.mark_failed(&e.to_string());
        }
    }
}

/// Periodic refresh scheduler with a manual trigger.
///
/// A single background thread serializes runs, so a refresh is never
/// re-entrant; triggers that arrive while a run is in flight coalesce into
/// at most one follow-up run.
pub struct RefreshScheduler {
    pipeline: Arc<Pipeline>,
    store: Arc<SnapshotStore>,
    interval: Duration,
    shutdown: Arc<AtomicBool>,
    trigger_tx: Sender<()>,
    trigger_rx: Receiver<()>,
}

impl RefreshScheduler {
    pub fn new(pipeline: Arc<Pipeline>, store: Arc<SnapshotStore>, interval: Duration) -> Self {
        let (trigger_tx, trigger_rx) = bounded(16);
        Self {
            pipeline,
            store,
            interval,
            shutdown: Arc::new(AtomicBool::new(false)),
            trigger_tx,
            trigger_rx,
        }
    }

    /// Requests a refresh. Safe to call from any thread; requests made
    /// while a run is in flight are coalesced.
    pub fn trigger(&self) {
        let _ = self.trigger_tx.try_send(());
    }

    /// Starts the refresh loop in a background thread. The first periodic
    /// run happens one interval after start; call `trigger` for an
    /// immediate one.
    pub fn start(&self) -> JoinHandle<()> {
        let pipeline = Arc::clone(&self.pipeline);
        let store = Arc::clone(&self.store);
        let shutdown = Arc::clone(&self.shutdown);
        let interval = self.interval;
        let trigger_rx = self.trigger_rx.clone();

        std::thread::spawn(move || loop {
            match trigger_rx.recv_timeout(interval) {
                Ok(()) => log::info!("Manual refresh triggered"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if shutdown.load(Ordering::Acquire) {
                break;
            }

            // Drain pending triggers so a burst becomes one run.
            while trigger_rx.try_recv().is_ok() {}

            run_refresh(&pipeline, &store);
        })
    }

    /// Signals the scheduler to stop.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
        let _ = self.trigger_tx.try_send(());
    }
}
