use serde::{Deserialize, Serialize};

pub mod error;
pub mod formats;
pub mod steps;

pub use error::{TrackError, TrackErrorKind};
pub use steps::{
    apply_step_tick, derive_action_status, ActionStatus, StepDefinition, StepState,
};

/// Shard identifier as reported by the node, e.g. "Shard0".
pub type ShardId = String;

/// Immutable reference to a submitted transaction. Produced by the
/// submission layer once a signed transaction has been accepted for
/// broadcast; everything in this workspace only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPointer {
    pub identifier: String,
    pub destination_shard: ShardId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionFailure {
    pub message: String,
    pub stack_trace: Option<String>,
}

/// Per-transaction result as fetched from a shard. `finalized = false`
/// means "still executing" regardless of `success`; `failure` is only
/// present on a concluded, unsuccessful execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub finalized: bool,
    pub failure: Option<ExecutionFailure>,
    pub spawned_events: Vec<TransactionPointer>,
}

/// One node visited while resolving an event chain: the record itself plus
/// the shard it was actually found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRecord {
    pub identifier: String,
    pub shard: ShardId,
    pub outcome: ExecutionOutcome,
}

/// Verdict over a whole event chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainVerdict {
    /// At least one node is missing from every shard or not yet finalized.
    /// Not a failure; the chain is still propagating.
    Open,
    /// Every node finalized successfully.
    Settled,
    /// First failure in traversal order.
    Failed(TrackError),
}

/// Result of walking an event chain: every node visited, in depth-first
/// order, up to and including a failing node if one was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainResolution {
    pub records: Vec<ChainRecord>,
    pub verdict: ChainVerdict,
}

impl ChainResolution {
    pub fn terminal_error(&self) -> Option<&TrackError> {
        match &self.verdict {
            ChainVerdict::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.verdict, ChainVerdict::Open)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.verdict, ChainVerdict::Settled)
    }
}

/// Live snapshot published by a transaction poller on every tick.
///
/// The flags are mutually exclusive except `is_loading`, which holds
/// exactly while the transaction is neither finalized nor errored.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveStatus {
    pub is_loading: bool,
    pub is_success: bool,
    pub is_error: bool,
    pub is_finalized: bool,
    pub error: Option<TrackError>,
    pub chain: Vec<ChainRecord>,
}

impl LiveStatus {
    /// Still waiting: root not visible, not finalized, or chain still open.
    /// `chain` holds whatever partial resolution exists (possibly empty).
    pub fn polling(chain: Vec<ChainRecord>) -> Self {
        Self {
            is_loading: true,
            is_success: false,
            is_error: false,
            is_finalized: false,
            error: None,
            chain,
        }
    }

    /// The whole chain finalized successfully.
    pub fn settled(chain: Vec<ChainRecord>) -> Self {
        Self {
            is_loading: false,
            is_success: true,
            is_error: false,
            is_finalized: true,
            error: None,
            chain,
        }
    }

    /// Terminal failure, on-chain or resolver-internal.
    pub fn failed(error: TrackError, chain: Vec<ChainRecord>) -> Self {
        Self {
            is_loading: false,
            is_success: false,
            is_error: true,
            is_finalized: true,
            error: Some(error),
            chain,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.is_finalized
    }
}

impl Default for LiveStatus {
    fn default() -> Self {
        Self::polling(Vec::new())
    }
}
