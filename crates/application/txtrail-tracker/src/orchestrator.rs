use crate::poller::{spawn_poller, PollerConfig, PollerHandle};
use crate::shard::ShardReader;
use futures::future::join_all;
use std::sync::Arc;
use tracing::info;
use txtrail_core::{
    apply_step_tick, derive_action_status, ActionStatus, LiveStatus, StepDefinition,
    TransactionPointer,
};

/// Tracks one logical user action made of several dependent transactions.
///
/// The tracker only observes. Submitting step N+1 once step N succeeds is
/// the caller's job, driven by `status()` and `step_status()`; steps are
/// dependency-ordered, so pointers are accepted strictly front to back via
/// `submit_next`.
pub struct ActionTracker {
    reader: Arc<dyn ShardReader>,
    config: PollerConfig,
    steps: Vec<StepDefinition>,
    // One poller per submitted step; submission order means pollers[i]
    // belongs to steps[i].
    pollers: Vec<PollerHandle>,
}

impl ActionTracker {
    pub fn new<L, S>(reader: Arc<dyn ShardReader>, config: PollerConfig, labels: L) -> Self
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reader,
            config,
            steps: labels.into_iter().map(StepDefinition::pending).collect(),
            pollers: Vec::new(),
        }
    }

    /// Record that the first still-pending step was accepted for broadcast
    /// and begin polling it. Returns the step's index, or `None` when every
    /// step already has a pointer.
    pub fn submit_next(&mut self, pointer: TransactionPointer) -> Option<usize> {
        let index = self.pollers.len();
        let step = self.steps.get_mut(index)?;

        info!(step = %step.label, identifier = %pointer.identifier, "step submitted");
        *step = StepDefinition::submitted(step.label.clone(), pointer.clone());
        self.pollers.push(spawn_poller(
            self.reader.clone(),
            pointer.identifier,
            self.config.clone(),
        ));
        Some(index)
    }

    /// Latest snapshot for one submitted step.
    pub fn step_status(&self, index: usize) -> Option<LiveStatus> {
        self.pollers.get(index).map(|p| p.status())
    }

    /// Aggregate status over the whole action, derived from the current
    /// poller snapshots.
    pub fn status(&self) -> ActionStatus {
        let live: Vec<LiveStatus> = self.pollers.iter().map(|p| p.status()).collect();
        derive_action_status(&self.steps, &live)
    }

    /// Fold the latest poller snapshots into the step list, then return it.
    pub fn steps(&mut self) -> &[StepDefinition] {
        for (index, poller) in self.pollers.iter().enumerate() {
            let snapshot = poller.status();
            self.steps = apply_step_tick(std::mem::take(&mut self.steps), index, &snapshot);
        }
        &self.steps
    }

    /// Wait until every step submitted so far reaches a terminal state,
    /// then return the aggregate. Steps submitted afterwards need another
    /// call; steps never submitted keep the aggregate out of success.
    pub async fn wait_terminal(&mut self) -> ActionStatus {
        join_all(self.pollers.iter().map(|p| p.wait_terminal())).await;
        self.steps();
        self.status()
    }

    /// Stop polling every step. Dropping the tracker does the same.
    pub fn cancel(&self) {
        for poller in &self.pollers {
            poller.cancel();
        }
    }
}
