use crate::lookup::FallbackLookup;
use crate::resolver::resolve_chain;
use crate::shard::ShardReader;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use txtrail_core::{ChainVerdict, LiveStatus, ShardId, TrackError};

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    pub depth_limit: usize,
    pub shard_priority: Vec<ShardId>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: txtrail_config::DEFAULT_POLL_INTERVAL,
            depth_limit: txtrail_config::DEFAULT_CHAIN_DEPTH_LIMIT,
            shard_priority: txtrail_config::default_shard_priority(),
        }
    }
}

/// Handle to a running per-transaction poller.
///
/// The poller task owns its status and publishes a fresh snapshot per tick;
/// the handle only reads. Dropping the handle cancels the task, so a poller
/// never outlives the request that started it.
pub struct PollerHandle {
    identifier: String,
    status: watch::Receiver<LiveStatus>,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl PollerHandle {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Latest published snapshot.
    pub fn status(&self) -> LiveStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveStatus> {
        self.status.clone()
    }

    /// Stop polling. Idempotent; a tick already in flight is discarded
    /// rather than applied.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the poller publishes a terminal snapshot. If the poller
    /// is cancelled first, the last (non-terminal) snapshot is returned.
    pub async fn wait_terminal(&self) -> LiveStatus {
        let mut rx = self.status.clone();
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if snapshot.is_terminal() {
                return snapshot;
            }
            if rx.changed().await.is_err() {
                return rx.borrow().clone();
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start polling `identifier` until its event chain settles or fails.
pub fn spawn_poller(
    reader: Arc<dyn ShardReader>,
    identifier: impl Into<String>,
    config: PollerConfig,
) -> PollerHandle {
    let identifier = identifier.into();
    let (tx, rx) = watch::channel(LiveStatus::default());
    let cancel = CancellationToken::new();
    let lookup = FallbackLookup::new(reader, config.shard_priority.clone());

    let task = tokio::spawn(poll_loop(
        lookup,
        identifier.clone(),
        config,
        tx,
        cancel.clone(),
    ));

    PollerHandle {
        identifier,
        status: rx,
        cancel,
        task,
    }
}

async fn poll_loop(
    lookup: FallbackLookup,
    identifier: String,
    config: PollerConfig,
    tx: watch::Sender<LiveStatus>,
    cancel: CancellationToken,
) {
    let mut ticker = interval(config.interval);
    // The loop awaits each tick's fetch before asking for the next one, so
    // two fetches for the same identifier never overlap; a tick that would
    // have fired mid-fetch is dropped, not queued.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(%identifier, "polling cancelled");
                return;
            }
            _ = ticker.tick() => {}
        }

        // Cancellation races the in-flight tick; a result that arrives
        // after cancel is dropped without touching the published status.
        let status = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(%identifier, "polling cancelled mid-flight");
                return;
            }
            status = poll_once(&lookup, &identifier, config.depth_limit) => status,
        };

        let terminal = status.is_terminal();
        if tx.send(status).is_err() {
            // Every handle is gone; nothing left to report to.
            return;
        }
        if terminal {
            info!(%identifier, "transaction reached a terminal state");
            return;
        }
    }
}

/// One polling tick: root lookup, root-failure short-circuit, chain walk.
pub async fn poll_once(
    lookup: &FallbackLookup,
    identifier: &str,
    depth_limit: usize,
) -> LiveStatus {
    let Some(root) = lookup.lookup(identifier).await else {
        return LiveStatus::polling(Vec::new());
    };

    if !root.outcome.finalized {
        return LiveStatus::polling(Vec::new());
    }

    if let Some(failure) = &root.outcome.failure {
        // The root itself failed; there is no chain to walk.
        let err = TrackError::from_failure(failure);
        return LiveStatus::failed(err, vec![root]);
    }

    let resolution = resolve_chain(lookup, root, depth_limit).await;
    match resolution.verdict {
        ChainVerdict::Open => LiveStatus::polling(resolution.records),
        ChainVerdict::Settled => LiveStatus::settled(resolution.records),
        ChainVerdict::Failed(err) => LiveStatus::failed(err, resolution.records),
    }
}
