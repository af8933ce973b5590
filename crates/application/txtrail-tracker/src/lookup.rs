use crate::shard::ShardReader;
use std::sync::Arc;
use tracing::debug;
use txtrail_core::{ChainRecord, ShardId, TransactionPointer};

/// Looks a record up across shards in strict priority order.
///
/// A shard that errors, answers with a different record, or does not hold
/// the identifier yet means "try the next shard". Exhausting every shard
/// yields `None`, which callers read as "not yet visible, keep polling",
/// never as a terminal failure.
#[derive(Clone)]
pub struct FallbackLookup {
    reader: Arc<dyn ShardReader>,
    priority: Vec<ShardId>,
}

impl FallbackLookup {
    pub fn new(reader: Arc<dyn ShardReader>, priority: Vec<ShardId>) -> Self {
        Self { reader, priority }
    }

    pub fn shard_priority(&self) -> &[ShardId] {
        &self.priority
    }

    /// Find `identifier` on the first shard that has it.
    pub async fn lookup(&self, identifier: &str) -> Option<ChainRecord> {
        for shard in &self.priority {
            if let Some(record) = self.query(shard, identifier).await {
                return Some(record);
            }
        }
        None
    }

    /// Find the record behind an event pointer. The pointer carries its
    /// destination shard, so that one is tried first; propagation delay can
    /// mean the record is not visible there yet, so the full priority list
    /// is scanned afterwards.
    pub async fn lookup_event(&self, pointer: &TransactionPointer) -> Option<ChainRecord> {
        if let Some(record) = self
            .query(&pointer.destination_shard, &pointer.identifier)
            .await
        {
            return Some(record);
        }
        for shard in &self.priority {
            if *shard == pointer.destination_shard {
                continue;
            }
            if let Some(record) = self.query(shard, &pointer.identifier).await {
                return Some(record);
            }
        }
        None
    }

    async fn query(&self, shard: &str, identifier: &str) -> Option<ChainRecord> {
        match self.reader.transaction(shard, identifier).await {
            Ok(Some(record)) if record.identifier == identifier => Some(record),
            Ok(Some(record)) => {
                debug!(
                    shard,
                    identifier,
                    answered = %record.identifier,
                    "shard answered with a different record"
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                debug!(shard, identifier, error = %e, "shard query failed, trying next");
                None
            }
        }
    }
}
