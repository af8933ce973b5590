use axum::response::IntoResponse;
use axum::{body::Body, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use txtrail_tracker::{
    spawn_poller, FallbackLookup, HttpShardReader, PollerConfig, ShardReader,
};

fn settled_with_event(id: &str, event_id: &str, event_shard: &str) -> String {
    format!(
        r#"{{"identifier":"{id}","executionStatus":{{"success":true,"finalized":true,"events":[{{"identifier":"{event_id}","destinationShardId":"{event_shard}"}}]}}}}"#
    )
}

fn settled_leaf(id: &str) -> String {
    format!(r#"{{"identifier":"{id}","executionStatus":{{"success":true,"finalized":true}}}}"#)
}

fn failed_leaf(id: &str, message: &str) -> String {
    format!(
        r#"{{"identifier":"{id}","executionStatus":{{"success":false,"finalized":true,"failure":{{"errorMessage":"{message}"}}}}}}"#
    )
}

async fn serve_static(body: String) -> impl IntoResponse {
    Body::from(body)
}

async fn start_server(routes: Vec<(&'static str, String)>) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let mut app = Router::new();
    for (path, body) in routes {
        app = app.route(
            path,
            get(move || {
                let body = body.clone();
                serve_static(body)
            }),
        );
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

fn reader_for(addr: SocketAddr) -> Arc<dyn ShardReader> {
    let client = txtrail_infra::net::default_http_client().unwrap();
    Arc::new(HttpShardReader::new(client, &format!("http://{addr}")).unwrap())
}

fn priority(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn lookup_falls_back_across_shards_over_http() {
    // Shard0 404s for everything; the record is served by Shard1.
    let (addr, handle) = start_server(vec![(
        "/shards/Shard1/transactions/tx_A",
        settled_leaf("tx_A"),
    )])
    .await;

    let lookup = FallbackLookup::new(reader_for(addr), priority(&["Shard0", "Shard1"]));
    let record = lookup.lookup("tx_A").await.expect("record on Shard1");
    assert_eq!(record.shard, "Shard1");
    assert!(record.outcome.finalized);

    handle.abort();
}

#[tokio::test]
async fn unparseable_body_counts_as_not_found() {
    let (addr, handle) = start_server(vec![(
        "/shards/Shard0/transactions/tx_bad",
        "this is not a transaction record".to_string(),
    )])
    .await;

    let reader = reader_for(addr);
    let found = reader.transaction("Shard0", "tx_bad").await.unwrap();
    assert!(found.is_none());

    handle.abort();
}

#[tokio::test]
async fn mismatched_identifier_is_treated_as_a_miss() {
    let (addr, handle) = start_server(vec![(
        "/shards/Shard0/transactions/tx_A",
        settled_leaf("tx_other"),
    )])
    .await;

    let lookup = FallbackLookup::new(reader_for(addr), priority(&["Shard0"]));
    assert!(lookup.lookup("tx_A").await.is_none());

    handle.abort();
}

#[tokio::test]
async fn poller_resolves_a_failed_chain_over_http() {
    // tx_A lives on Shard2 and spawns tx_B, which failed on Shard0.
    let (addr, handle) = start_server(vec![
        (
            "/shards/Shard2/transactions/tx_A",
            settled_with_event("tx_A", "tx_B", "Shard0"),
        ),
        (
            "/shards/Shard0/transactions/tx_B",
            failed_leaf("tx_B", "insufficient funds"),
        ),
    ])
    .await;

    let config = PollerConfig {
        interval: Duration::from_millis(10),
        depth_limit: 32,
        shard_priority: priority(&["Shard0", "Shard1", "Shard2"]),
    };
    let poller = spawn_poller(reader_for(addr), "tx_A", config);
    let status = poller.wait_terminal().await;

    assert!(status.is_error);
    assert_eq!(
        status.error.as_ref().map(|e| e.to_string()),
        Some("insufficient funds".to_string())
    );
    assert_eq!(status.chain.len(), 2);

    handle.abort();
}
