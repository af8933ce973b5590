//! Central configuration constants for polling and chain traversal.

use std::time::Duration;

/// Default delay between polling ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);

/// Minimum allowed polling interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Maximum allowed polling interval.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Maximum nesting depth of an event chain before resolution is abandoned.
pub const DEFAULT_CHAIN_DEPTH_LIMIT: usize = 32;

/// Shards queried, in priority order, when a record's location is unknown.
pub const DEFAULT_SHARD_PRIORITY: [&str; 3] = ["Shard0", "Shard1", "Shard2"];

/// Convenience function to clamp a polling interval into the allowed range.
pub fn clamp_interval(v: Duration) -> Duration {
    v.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL)
}

/// Default shard priority as owned identifiers.
pub fn default_shard_priority() -> Vec<String> {
    DEFAULT_SHARD_PRIORITY.iter().map(|s| s.to_string()).collect()
}
