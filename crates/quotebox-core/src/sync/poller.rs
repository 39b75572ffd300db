//! Background sync poller
//!
//! Runs a sync cycle every interval, plus on demand. Cycles run inline in
//! the poller task and the engine refuses to start a cycle while another is
//! running, so cycles never overlap even if ticks bunch up.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::engine::{SyncEngine, SyncOutcome};
use super::source::RemoteSource;

/// Default time between sync cycles
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(15);

/// Commands sent to the poller task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    /// Run a cycle now
    SyncNow,
    /// Stop polling
    Shutdown,
}

/// Events emitted by the poller task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// A cycle finished (or was skipped)
    CycleFinished(SyncOutcome),
    /// The poller stopped
    Stopped,
}

/// Handle for controlling the poller task
pub struct SyncHandle {
    pub command_tx: mpsc::Sender<SyncCommand>,
    pub event_rx: mpsc::Receiver<SyncEvent>,
}

impl SyncHandle {
    /// Ask for an immediate cycle
    pub async fn sync_now(&self) {
        let _ = self.command_tx.send(SyncCommand::SyncNow).await;
    }

    /// Stop the poller
    pub async fn shutdown(&self) {
        let _ = self.command_tx.send(SyncCommand::Shutdown).await;
    }
}

/// Spawn a task that runs a sync cycle every `interval`
///
/// The first cycle runs one full interval after spawning.
pub fn spawn_sync_poller<S>(engine: Arc<SyncEngine<S>>, interval: Duration) -> SyncHandle
where
    S: RemoteSource + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(64);

    tokio::spawn(sync_poller_task(engine, interval, command_rx, event_tx));

    SyncHandle {
        command_tx,
        event_rx,
    }
}

async fn sync_poller_task<S: RemoteSource>(
    engine: Arc<SyncEngine<S>>,
    interval: Duration,
    mut command_rx: mpsc::Receiver<SyncCommand>,
    event_tx: mpsc::Sender<SyncEvent>,
) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let outcome = engine.run_cycle().await;
                let _ = event_tx.send(SyncEvent::CycleFinished(outcome)).await;
            }
            cmd = command_rx.recv() => {
                match cmd {
                    Some(SyncCommand::SyncNow) => {
                        let outcome = engine.run_cycle().await;
                        let _ = event_tx.send(SyncEvent::CycleFinished(outcome)).await;
                    }
                    Some(SyncCommand::Shutdown) | None => break,
                }
            }
        }
    }

    debug!("Sync poller stopped");
    let _ = event_tx.send(SyncEvent::Stopped).await;
}
