//! Step bookkeeping for multi-transaction actions.
//!
//! A logical user action (approve a token spend, then submit the secret
//! input) is an ordered list of steps; sequence index is the dependency
//! order. The functions here are pure: the orchestrator feeds poller
//! snapshots through them, and tests exercise them without timers or
//! network.

use crate::{LiveStatus, TrackError, TransactionPointer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    /// No transaction pointer yet; a predecessor has not confirmed.
    Pending,
    /// Pointer exists, poller not yet terminal.
    Submitted,
    Succeeded,
    Failed,
}

/// One named unit of a multi-step action.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    pub label: String,
    pub state: StepState,
    pub pointer: Option<TransactionPointer>,
    pub error: Option<TrackError>,
}

impl StepDefinition {
    pub fn pending(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: StepState::Pending,
            pointer: None,
            error: None,
        }
    }

    pub fn submitted(label: impl Into<String>, pointer: TransactionPointer) -> Self {
        Self {
            label: label.into(),
            state: StepState::Submitted,
            pointer: Some(pointer),
            error: None,
        }
    }
}

/// Aggregate status over all steps of one logical action.
///
/// `is_pending` is distinct from `is_loading`: pending means nothing has
/// been submitted yet, loading means work is underway somewhere in the
/// sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionStatus {
    pub is_loading: bool,
    pub is_error: bool,
    pub is_success: bool,
    pub is_pending: bool,
    pub error: Option<TrackError>,
}

impl ActionStatus {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn pending() -> Self {
        Self {
            is_pending: true,
            ..Self::default()
        }
    }

    pub fn success() -> Self {
        Self {
            is_success: true,
            ..Self::default()
        }
    }

    pub fn failed(error: TrackError) -> Self {
        Self {
            is_error: true,
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.is_success || self.is_error
    }
}

/// Pure reducer: fold one poller snapshot into the step list.
///
/// `index` addresses the step the snapshot belongs to; an out-of-range
/// index leaves the list untouched.
pub fn apply_step_tick(
    mut steps: Vec<StepDefinition>,
    index: usize,
    tick: &LiveStatus,
) -> Vec<StepDefinition> {
    if let Some(step) = steps.get_mut(index) {
        if tick.is_error {
            step.state = StepState::Failed;
            step.error = tick.error.clone();
        } else if tick.is_success {
            step.state = StepState::Succeeded;
            step.error = None;
        } else if step.pointer.is_some() {
            step.state = StepState::Submitted;
        }
    }
    steps
}

/// Derive one aggregate status from the step list and the live snapshots
/// of the steps that have a pointer (in step order, one snapshot each).
///
/// Rules, in priority order:
/// - a snapshot count that does not match the submitted-step count forces
///   loading; never judge on incomplete information
/// - the first erroring step in sequence order wins, regardless of later
///   successes
/// - success only when every step was submitted and every snapshot settled
/// - an action where nothing has been submitted yet is pending
/// - anything else is loading
pub fn derive_action_status(steps: &[StepDefinition], live: &[LiveStatus]) -> ActionStatus {
    let submitted = steps.iter().filter(|s| s.pointer.is_some()).count();
    if live.len() != submitted {
        return ActionStatus::loading();
    }

    for status in live {
        if status.is_error {
            let error = status.error.clone().unwrap_or_else(|| {
                TrackError::MalformedChain("error status without an error".into())
            });
            return ActionStatus::failed(error);
        }
    }

    if submitted == steps.len() && live.iter().all(|s| s.is_success) {
        return ActionStatus::success();
    }

    if submitted == 0 {
        return ActionStatus::pending();
    }

    ActionStatus::loading()
}
