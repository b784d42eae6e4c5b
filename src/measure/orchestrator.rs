//! Parallel entry-build orchestration
//!
//! Fans entry builds out across a bounded rayon pool. Every worker runs
//! build → graph walk → measurement for one entry and hands back
//! `(bundle id, sizes)` tuples; the orchestrator merges them into a single
//! snapshot only after every entry succeeded. Any single failure aborts the
//! whole run; there is no partial snapshot.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use rayon::prelude::*;

use crate::bundler::BundleBuilder;
use crate::config::EntryDescriptor;
use crate::infra::{CommandExecutor, FileSystem};

use super::size::{measure_entry, SizeEntry};
use super::snapshot::SizeSnapshot;

/// Hard cap on parallel bundler processes.
pub const MAX_CONCURRENCY: usize = 32;

/// Default worker count: available cores, capped.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_CONCURRENCY)
}

/// Build every entry on a bounded pool and merge the results into one
/// snapshot, ordered lexicographically by bundle id.
///
/// # Errors
/// The first entry failure fails the run; in-flight workers finish their
/// current build but nothing is merged or persisted.
pub fn build_snapshot<FS, CE>(
    builder: &BundleBuilder<FS, CE>,
    fs: &FS,
    entries: &[EntryDescriptor],
    concurrency: usize,
) -> Result<SizeSnapshot>
where
    FS: FileSystem + Sync,
    CE: CommandExecutor + Sync,
{
    let workers = concurrency.clamp(1, MAX_CONCURRENCY);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Failed to create build worker pool")?;

    let progress = ProgressBar::new(entries.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.set_message("building entries");

    let results: Result<Vec<Vec<(String, SizeEntry)>>> = pool.install(|| {
        entries
            .par_iter()
            .map(|entry| {
                let tuples = build_and_measure(builder, fs, entry);
                progress.inc(1);
                tuples
            })
            .collect()
    });
    progress.finish_and_clear();

    // Merge in config order: colliding chunk names are last-writer-wins
    let mut snapshot = SizeSnapshot::new();
    for tuples in results? {
        snapshot.extend(tuples);
    }
    Ok(snapshot)
}

fn build_and_measure<FS, CE>(
    builder: &BundleBuilder<FS, CE>,
    fs: &FS,
    entry: &EntryDescriptor,
) -> Result<Vec<(String, SizeEntry)>>
where
    FS: FileSystem,
    CE: CommandExecutor,
{
    let output = builder.build(entry)?;
    let tuples = measure_entry(&output, &entry.id, fs)?;
    debug!("entry '{}' produced {} chunk(s)", entry.id, tuples.len());

    if let Err(e) = builder.cleanup(&output) {
        warn!("failed to clean scratch dir for '{}': {:#}", entry.id, e);
    }

    Ok(tuples)
}
