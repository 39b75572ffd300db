//! Sync cycle: fetch, reconcile, notify
//!
//! Each cycle moves through `Idle → Fetching → Reconciling → Idle`. Only the
//! fetch suspends; reconciliation and the save that follows run under one
//! store lock, so a cycle is atomic with respect to the store.
//!
//! Merging is additive. A remote quote whose text already exists locally is
//! left alone, whatever its category; every other remote quote is appended.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::source::RemoteSource;
use crate::models::Quote;
use crate::notice::NoticeBoard;
use crate::store::{QuoteStore, StoreEvent};

/// Where a sync cycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
    Reconciling,
}

/// Result of asking for a sync cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Another cycle was still running, nothing was done
    Skipped,
    /// The cycle ran to the end
    Completed {
        /// Quotes received from the server (0 when the fetch failed)
        fetched: usize,
        /// Quotes appended to the store
        added: usize,
    },
}

impl SyncOutcome {
    /// Number of quotes appended, 0 for skipped cycles
    pub fn added(&self) -> usize {
        match self {
            SyncOutcome::Skipped => 0,
            SyncOutcome::Completed { added, .. } => *added,
        }
    }
}

/// Append remote quotes whose text is not in the store yet
///
/// A quote appended earlier in the same pass counts as local for the ones
/// after it. When anything was appended the store is saved and a
/// [`StoreEvent::Synced`] event is emitted. Returns the number appended.
pub fn reconcile(store: &mut QuoteStore, remote: &[Quote]) -> usize {
    let mut added = 0;
    let mut new_categories = Vec::new();

    for quote in remote {
        if store.contains_text(&quote.text) {
            continue;
        }
        if let Some(category) = store.append(quote.clone()) {
            new_categories.push(category);
        }
        added += 1;
    }

    if added > 0 {
        store.save();
        store.emit(StoreEvent::Synced {
            added,
            new_categories,
        });
    }
    added
}

/// Runs sync cycles against one remote source and one store
pub struct SyncEngine<S> {
    source: S,
    store: Arc<Mutex<QuoteStore>>,
    notices: NoticeBoard,
    phase: watch::Sender<SyncPhase>,
    busy: AtomicBool,
}

impl<S: RemoteSource> SyncEngine<S> {
    pub fn new(source: S, store: Arc<Mutex<QuoteStore>>, notices: NoticeBoard) -> Self {
        let (phase, _) = watch::channel(SyncPhase::Idle);
        Self {
            source,
            store,
            notices,
            phase,
            busy: AtomicBool::new(false),
        }
    }

    /// Current phase
    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    /// Check whether a cycle is in progress
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run one sync cycle
    ///
    /// Returns [`SyncOutcome::Skipped`] without doing anything if a cycle is
    /// already in progress.
    pub async fn run_cycle(&self) -> SyncOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sync cycle already running, skipping");
            return SyncOutcome::Skipped;
        }
        let _busy = BusyGuard {
            busy: &self.busy,
            phase: &self.phase,
        };

        self.phase.send_replace(SyncPhase::Fetching);
        let remote = self.fetch().await;

        self.phase.send_replace(SyncPhase::Reconciling);
        let added = {
            let mut store = self.store.lock().await;
            reconcile(&mut store, &remote)
        };

        if added > 0 {
            info!("Synced {} new quote(s) from server", added);
            self.notices
                .post(format!("{} new quote(s) synced from server", added));
        } else {
            debug!("Sync complete, nothing new");
        }

        SyncOutcome::Completed {
            fetched: remote.len(),
            added,
        }
    }

    /// Fetch the remote set; failures become an empty set
    async fn fetch(&self) -> Vec<Quote> {
        match self.source.fetch().await {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("Sync fetch failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Clears the busy flag and returns to idle when a cycle ends
struct BusyGuard<'a> {
    busy: &'a AtomicBool,
    phase: &'a watch::Sender<SyncPhase>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.phase.send_replace(SyncPhase::Idle);
        self.busy.store(false, Ordering::Release);
    }
}
