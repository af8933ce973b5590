use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Errors from the node HTTP layer.
///
/// A miss is not an error: requests that reach a shard but find nothing
/// (404, or a body that does not parse as the expected record shape)
/// come back as `Ok(None)` from [`get_optional_json`].
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("invalid node url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("http client build failed: {0}")]
    Client(reqwest::Error),
}

pub fn default_http_client() -> Result<Client, NetError> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(NetError::Client)
}

/// Normalize a node base URL so shard paths can be joined onto it.
/// Supports inputs with or without a trailing slash.
///
/// Without the trailing slash, `Url::join("shards/...")` would replace the
/// last path segment (`https://host/chain` -> `https://host/shards/...`)
/// rather than append to it.
pub fn normalize_node_base(node_url: &str) -> Result<Url, NetError> {
    let mut url = Url::parse(node_url).map_err(|e| NetError::InvalidUrl {
        url: node_url.to_string(),
        reason: e.to_string(),
    })?;

    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }

    Ok(url)
}

/// Build the per-shard transaction endpoint:
/// `{base}shards/{shard}/transactions/{identifier}`.
/// Segments are pushed, not formatted, so identifiers with reserved
/// characters stay intact on the wire.
pub fn shard_transaction_url(base: &Url, shard: &str, identifier: &str) -> Result<Url, NetError> {
    let mut url = base.clone();
    {
        let mut segs = url.path_segments_mut().map_err(|_| NetError::InvalidUrl {
            url: base.to_string(),
            reason: "cannot be a base".into(),
        })?;
        segs.pop_if_empty();
        segs.push("shards");
        segs.push(shard);
        segs.push("transactions");
        segs.push(identifier);
    }
    Ok(url)
}

/// GET a JSON document. 404 and other non-success statuses mean "not found
/// here"; so does a body that fails to parse as `T`. Only transport-level
/// failures surface as errors.
pub async fn get_optional_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
) -> Result<Option<T>, NetError> {
    let resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| NetError::Transport {
            url: url.to_string(),
            source: e,
        })?;

    if !resp.status().is_success() {
        return Ok(None);
    }

    let bytes = resp.bytes().await.map_err(|e| NetError::Transport {
        url: url.to_string(),
        source: e,
    })?;

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            debug!(%url, error = %e, "response body did not match the expected shape");
            Ok(None)
        }
    }
}
