use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use txtrail_core::{ChainRecord, LiveStatus, TransactionPointer};
use txtrail_tracker::{
    resolve_once, spawn_poller, ActionTracker, HttpShardReader, PollerConfig, ShardReader,
};

fn build_reader(node: &str) -> Result<Arc<dyn ShardReader>> {
    let client =
        txtrail_infra::net::default_http_client().context("Failed to build HTTP client")?;
    let reader = HttpShardReader::new(client, node)?;
    Ok(Arc::new(reader))
}

fn build_config(shards: Option<Vec<String>>, interval_secs: u64) -> PollerConfig {
    PollerConfig {
        interval: txtrail_config::clamp_interval(Duration::from_secs(interval_secs)),
        depth_limit: txtrail_config::DEFAULT_CHAIN_DEPTH_LIMIT,
        shard_priority: shards.unwrap_or_else(txtrail_config::default_shard_priority),
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub async fn cmd_watch(
    id: String,
    node: String,
    shards: Option<Vec<String>>,
    interval_secs: u64,
) -> Result<()> {
    println!(":: Watching transaction {id}");
    println!("   Node: {node}");

    let reader = build_reader(&node)?;
    let config = build_config(shards, interval_secs);

    let pb = spinner();
    let handle = spawn_poller(reader, id.clone(), config);
    let mut rx = handle.subscribe();

    let last = loop {
        let snapshot = rx.borrow_and_update().clone();
        if snapshot.is_terminal() {
            break snapshot;
        }
        pb.set_message(format!(
            "Polling... {} transaction(s) observed in chain",
            snapshot.chain.len()
        ));
        if rx.changed().await.is_err() {
            break handle.status();
        }
    };

    pb.finish_and_clear();
    print_outcome(&id, &last);
    Ok(())
}

pub async fn cmd_resolve(id: String, node: String, shards: Option<Vec<String>>) -> Result<()> {
    println!(":: Resolving transaction {id}");
    println!("   Node: {node}");

    let reader = build_reader(&node)?;
    let config = build_config(shards, txtrail_config::DEFAULT_POLL_INTERVAL.as_secs());

    let status = resolve_once(reader, &id, &config).await;
    print_outcome(&id, &status);
    Ok(())
}

pub async fn cmd_action(
    specs: Vec<String>,
    node: String,
    shards: Option<Vec<String>>,
    interval_secs: u64,
) -> Result<()> {
    let reader = build_reader(&node)?;
    let config = build_config(shards, interval_secs);
    let first_shard = config
        .shard_priority
        .first()
        .cloned()
        .unwrap_or_else(|| "Shard0".to_string());

    let mut labels = Vec::new();
    let mut identifiers = Vec::new();
    for spec in &specs {
        match spec.split_once('=') {
            Some((label, id)) => {
                labels.push(label.to_string());
                identifiers.push(Some(id.to_string()));
            }
            None => {
                labels.push(spec.clone());
                identifiers.push(None);
            }
        }
    }

    // Steps are dependency-ordered: an unsubmitted step cannot be followed
    // by a submitted one.
    if let Some(gap) = identifiers.iter().position(Option::is_none) {
        if let Some(later) = identifiers[gap..].iter().position(Option::is_some) {
            bail!(
                "step '{}' has no identifier but later step '{}' does",
                labels[gap],
                labels[gap + later]
            );
        }
    }

    println!(":: Tracking action with {} step(s)", labels.len());
    let mut tracker = ActionTracker::new(reader, config, labels);
    for id in identifiers.into_iter().flatten() {
        tracker.submit_next(TransactionPointer {
            identifier: id,
            destination_shard: first_shard.clone(),
        });
    }

    let pb = spinner();
    pb.set_message("Waiting for submitted steps to settle...");
    let aggregate = tracker.wait_terminal().await;
    pb.finish_and_clear();

    println!("\n:: Steps");
    for step in tracker.steps() {
        let state = format!("{:?}", step.state);
        match &step.error {
            Some(err) => println!("   {:<12} {:<10} {}", step.label, state, err),
            None => println!("   {:<12} {}", step.label, state),
        }
    }

    println!("\n:: Action Result");
    if aggregate.is_success {
        println!("   All steps settled successfully");
    } else if let Some(err) = &aggregate.error {
        println!("   Failed: {err}");
    } else if aggregate.is_pending {
        println!("   Not started: no step has been submitted yet");
    } else {
        println!("   In progress: waiting on unsubmitted or unsettled steps");
    }

    Ok(())
}

fn print_outcome(identifier: &str, status: &LiveStatus) {
    println!("\n:: Outcome for {identifier}");
    if status.is_success {
        println!(
            "   Settled successfully ({} transaction(s) in chain)",
            status.chain.len()
        );
    } else if let Some(err) = &status.error {
        println!("   Failed: {err}");
    } else {
        println!(
            "   Still open ({} transaction(s) observed so far)",
            status.chain.len()
        );
    }
    for record in &status.chain {
        println!(
            "   - {} on {} [{}]",
            record.identifier,
            record.shard,
            describe(record)
        );
    }
}

fn describe(record: &ChainRecord) -> &'static str {
    if record.outcome.failure.is_some() {
        "failed"
    } else if !record.outcome.finalized {
        "executing"
    } else {
        "ok"
    }
}
