#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use txtrail_core::{ChainRecord, ExecutionFailure, ExecutionOutcome, TransactionPointer};
use txtrail_tracker::{ShardError, ShardReader};

/// In-memory shard double. Records live behind a mutex so tests can make a
/// transaction "propagate" while a poller is already running; counters
/// track how often and how concurrently the reader is hit.
pub struct MemoryShardReader {
    records: Mutex<HashMap<(String, String), ChainRecord>>,
    failing_shards: HashSet<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemoryShardReader {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            failing_shards: HashSet::new(),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_record(self, shard: &str, record: ChainRecord) -> Self {
        let key = (shard.to_string(), record.identifier.clone());
        self.records.lock().unwrap().insert(key, record);
        self
    }

    /// Store a record under a different identifier than the one it carries,
    /// imitating a shard that answers with the wrong record.
    pub fn with_aliased_record(self, shard: &str, queried: &str, record: ChainRecord) -> Self {
        let key = (shard.to_string(), queried.to_string());
        self.records.lock().unwrap().insert(key, record);
        self
    }

    pub fn with_failing_shard(mut self, shard: &str) -> Self {
        self.failing_shards.insert(shard.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make a record visible after the fact, as propagation would.
    pub fn insert(&self, shard: &str, record: ChainRecord) {
        let key = (shard.to_string(), record.identifier.clone());
        self.records.lock().unwrap().insert(key, record);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShardReader for MemoryShardReader {
    async fn transaction(
        &self,
        shard: &str,
        identifier: &str,
    ) -> Result<Option<ChainRecord>, ShardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.failing_shards.contains(shard) {
            Err(ShardError::Query(format!("shard {shard} unreachable")))
        } else {
            Ok(self
                .records
                .lock()
                .unwrap()
                .get(&(shard.to_string(), identifier.to_string()))
                .cloned())
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn shards(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn settled(id: &str, shard: &str, events: &[(&str, &str)]) -> ChainRecord {
    ChainRecord {
        identifier: id.to_string(),
        shard: shard.to_string(),
        outcome: ExecutionOutcome {
            success: true,
            finalized: true,
            failure: None,
            spawned_events: events
                .iter()
                .map(|(id, dest)| TransactionPointer {
                    identifier: id.to_string(),
                    destination_shard: dest.to_string(),
                })
                .collect(),
        },
    }
}

pub fn failed(id: &str, shard: &str, message: &str) -> ChainRecord {
    ChainRecord {
        identifier: id.to_string(),
        shard: shard.to_string(),
        outcome: ExecutionOutcome {
            success: false,
            finalized: true,
            failure: Some(ExecutionFailure {
                message: message.to_string(),
                stack_trace: None,
            }),
            spawned_events: Vec::new(),
        },
    }
}

pub fn executing(id: &str, shard: &str) -> ChainRecord {
    ChainRecord {
        identifier: id.to_string(),
        shard: shard.to_string(),
        outcome: ExecutionOutcome {
            success: false,
            finalized: false,
            failure: None,
            spawned_events: Vec::new(),
        },
    }
}
