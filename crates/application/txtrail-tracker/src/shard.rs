use async_trait::async_trait;
use reqwest::{Client, Url};
use txtrail_core::formats::TransactionRecordExternal;
use txtrail_core::ChainRecord;
use txtrail_infra::net;

/// Error from a single shard query. Callers treat it as "this shard did
/// not answer"; the fallback lookup swallows it and tries the next shard.
#[derive(Debug, thiserror::Error)]
pub enum ShardError {
    #[error("shard query failed: {0}")]
    Query(String),
}

/// Read access to per-shard transaction records.
#[async_trait]
pub trait ShardReader: Send + Sync {
    /// Fetch the record for `identifier` from one shard. `Ok(None)` means
    /// the shard answered but does not (yet) hold the record.
    async fn transaction(
        &self,
        shard: &str,
        identifier: &str,
    ) -> Result<Option<ChainRecord>, ShardError>;
}

/// HTTP-based reader querying a node's per-shard transaction endpoint.
pub struct HttpShardReader {
    client: Client,
    base: Url,
}

impl HttpShardReader {
    pub fn new(client: Client, node_url: &str) -> Result<Self, ShardError> {
        let base = net::normalize_node_base(node_url).map_err(|e| ShardError::Query(e.to_string()))?;
        Ok(Self { client, base })
    }
}

#[async_trait]
impl ShardReader for HttpShardReader {
    async fn transaction(
        &self,
        shard: &str,
        identifier: &str,
    ) -> Result<Option<ChainRecord>, ShardError> {
        let url = net::shard_transaction_url(&self.base, shard, identifier)
            .map_err(|e| ShardError::Query(e.to_string()))?;

        let found: Option<TransactionRecordExternal> =
            net::get_optional_json(&self.client, url)
                .await
                .map_err(|e| ShardError::Query(e.to_string()))?;

        Ok(found.map(|record| record.into_record(shard)))
    }
}
