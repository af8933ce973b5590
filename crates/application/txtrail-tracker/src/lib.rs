pub mod lookup;
pub mod orchestrator;
pub mod poller;
pub mod resolver;
pub mod shard;

pub use lookup::FallbackLookup;
pub use orchestrator::ActionTracker;
pub use poller::{spawn_poller, PollerConfig, PollerHandle};
pub use resolver::resolve_chain;
pub use shard::{HttpShardReader, ShardError, ShardReader};

use std::sync::Arc;
use txtrail_core::LiveStatus;

/// One-shot status check: look the root up and walk its event chain once,
/// without starting a poller. The snapshot is a point-in-time view; a
/// loading result only means the chain has not settled *yet*.
pub async fn resolve_once(
    reader: Arc<dyn ShardReader>,
    identifier: &str,
    config: &PollerConfig,
) -> LiveStatus {
    let lookup = FallbackLookup::new(reader, config.shard_priority.clone());
    poller::poll_once(&lookup, identifier, config.depth_limit).await
}
