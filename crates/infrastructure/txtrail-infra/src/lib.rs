pub mod net;

// Re-exports for convenience
pub use net::{default_http_client, normalize_node_base, shard_transaction_url, NetError};
