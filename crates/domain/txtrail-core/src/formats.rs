//! External wire shape of a shard's transaction record.
//!
//! Nodes serve these as JSON with camelCase keys; optional fields are
//! frequently absent while a transaction is still executing, so everything
//! beyond the identifier defaults.

use crate::{ChainRecord, ExecutionFailure, ExecutionOutcome, TransactionPointer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecordExternal {
    pub identifier: String,
    pub execution_status: ExecutionStatusExternal,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStatusExternal {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub finalized: bool,
    #[serde(default)]
    pub failure: Option<FailureExternal>,
    #[serde(default)]
    pub events: Vec<EventPointerExternal>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FailureExternal {
    pub error_message: String,
    #[serde(default)]
    pub stack_trace: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventPointerExternal {
    pub identifier: String,
    pub destination_shard_id: String,
}

impl From<FailureExternal> for ExecutionFailure {
    fn from(f: FailureExternal) -> ExecutionFailure {
        ExecutionFailure {
            message: f.error_message,
            stack_trace: f.stack_trace,
        }
    }
}

impl From<EventPointerExternal> for TransactionPointer {
    fn from(e: EventPointerExternal) -> TransactionPointer {
        TransactionPointer {
            identifier: e.identifier,
            destination_shard: e.destination_shard_id,
        }
    }
}

impl From<ExecutionStatusExternal> for ExecutionOutcome {
    fn from(s: ExecutionStatusExternal) -> ExecutionOutcome {
        ExecutionOutcome {
            success: s.success,
            finalized: s.finalized,
            failure: s.failure.map(|f| f.into()),
            spawned_events: s.events.into_iter().map(|e| e.into()).collect(),
        }
    }
}

impl TransactionRecordExternal {
    /// Convert into a domain record, tagging it with the shard that
    /// actually served it.
    pub fn into_record(self, shard: &str) -> ChainRecord {
        ChainRecord {
            identifier: self.identifier,
            shard: shard.to_string(),
            outcome: self.execution_status.into(),
        }
    }
}
