use crate::ExecutionFailure;

/// Terminal tracking failures.
///
/// Transient conditions (a shard miss, a network error, a record that has
/// not propagated yet) are not represented here at all; they surface as
/// `None` / `ChainVerdict::Open` and keep the poller polling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackError {
    /// Execution concluded unsuccessfully somewhere in the event chain.
    /// Carries the original on-chain failure message.
    #[error("{message}")]
    ExecutionFailed {
        message: String,
        stack_trace: Option<String>,
    },
    /// The event chain nests deeper than the configured bound.
    #[error("event chain exceeds depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },
    /// The chain shape is invalid, e.g. an event points back at a node
    /// already visited.
    #[error("malformed event chain: {0}")]
    MalformedChain(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackErrorKind {
    /// The submitted action itself failed on chain.
    Execution,
    /// The resolver gave up; diagnostic, distinct from an on-chain failure.
    Resolver,
}

impl TrackError {
    pub fn kind(&self) -> TrackErrorKind {
        match self {
            TrackError::ExecutionFailed { .. } => TrackErrorKind::Execution,
            TrackError::DepthLimitExceeded { .. } | TrackError::MalformedChain(_) => {
                TrackErrorKind::Resolver
            }
        }
    }

    pub fn from_failure(failure: &ExecutionFailure) -> Self {
        TrackError::ExecutionFailed {
            message: failure.message.clone(),
            stack_trace: failure.stack_trace.clone(),
        }
    }
}
