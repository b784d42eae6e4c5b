//! Dependency graph traversal over bundler manifests

use anyhow::Result;
use std::collections::BTreeSet;

use crate::error::SizewatchError;

use super::manifest::Manifest;

/// Resolve the closed set of chunk keys reachable from `start` via static
/// or dynamic import edges, including `start` itself.
///
/// Depth-first with a visited set; dynamic imports may re-import chunks that
/// were already visited, so revisits are skipped rather than re-expanded. A
/// manifest edge pointing at a chunk the manifest does not contain is fatal
/// for the entry, never silently skipped. The result is a sorted set, so
/// it is deterministic regardless of edge visitation order.
pub fn reachable_chunks(
    manifest: &Manifest,
    start: &str,
    entry_id: &str,
) -> Result<BTreeSet<String>> {
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut stack: Vec<String> = vec![start.to_string()];

    while let Some(key) = stack.pop() {
        if visited.contains(&key) {
            continue;
        }

        let record = manifest.get(&key).ok_or_else(|| SizewatchError::MissingChunk {
            entry: entry_id.to_string(),
            chunk: key.clone(),
        })?;

        for edge in record.imports.iter().chain(record.dynamic_imports.iter()) {
            if !visited.contains(edge) {
                stack.push(edge.clone());
            }
        }

        visited.insert(key);
    }

    Ok(visited)
}
