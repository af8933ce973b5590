use crate::lookup::FallbackLookup;
use std::collections::HashSet;
use txtrail_core::{
    ChainRecord, ChainResolution, ChainVerdict, TrackError, TransactionPointer,
};

/// Walk the tree of events spawned by an already-fetched root record,
/// depth-first in spawned order, and reduce it to a single verdict.
///
/// Traversal is an explicit stack with a visited-identifier set and a depth
/// bound, since event graphs arrive from the network in whatever shape the
/// shard serves. First failure wins: resolution stops at the failing node
/// and `records` holds everything visited up to and including it. A node
/// missing from every shard, or not yet finalized, leaves the verdict
/// `Open`; the ledger changes between calls, so callers re-resolve until
/// the chain settles.
pub async fn resolve_chain(
    lookup: &FallbackLookup,
    root: ChainRecord,
    depth_limit: usize,
) -> ChainResolution {
    let mut records: Vec<ChainRecord> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    // Children are pushed in reverse so the first spawned event pops first.
    let mut stack: Vec<(TransactionPointer, usize)> = Vec::new();
    let mut open = false;

    visited.insert(root.identifier.clone());
    if let Some(failure) = &root.outcome.failure {
        let err = TrackError::from_failure(failure);
        records.push(root);
        return ChainResolution {
            records,
            verdict: ChainVerdict::Failed(err),
        };
    }
    if !root.outcome.finalized {
        open = true;
    }
    for event in root.outcome.spawned_events.iter().rev() {
        stack.push((event.clone(), 1));
    }
    records.push(root);

    while let Some((pointer, depth)) = stack.pop() {
        if depth > depth_limit {
            return ChainResolution {
                records,
                verdict: ChainVerdict::Failed(TrackError::DepthLimitExceeded {
                    limit: depth_limit,
                }),
            };
        }

        if !visited.insert(pointer.identifier.clone()) {
            return ChainResolution {
                records,
                verdict: ChainVerdict::Failed(TrackError::MalformedChain(format!(
                    "event {} appears twice in the chain",
                    pointer.identifier
                ))),
            };
        }

        let Some(record) = lookup.lookup_event(&pointer).await else {
            // Not visible on any shard yet; the chain is still propagating.
            open = true;
            continue;
        };

        if let Some(failure) = &record.outcome.failure {
            let err = TrackError::from_failure(failure);
            records.push(record);
            return ChainResolution {
                records,
                verdict: ChainVerdict::Failed(err),
            };
        }

        if !record.outcome.finalized {
            open = true;
        }
        for event in record.outcome.spawned_events.iter().rev() {
            stack.push((event.clone(), depth + 1));
        }
        records.push(record);
    }

    let verdict = if open {
        ChainVerdict::Open
    } else {
        ChainVerdict::Settled
    };
    ChainResolution { records, verdict }
}
