//! Per-chunk size measurement
//!
//! `parsed` is the raw byte length of the emitted (minified) file; `gzip`
//! is the byte length after maximal gzip compression, a proxy for network
//! transfer cost. Both are computed deterministically so identical input
//! always measures identically; diffs against old snapshots must not
//! drift.

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::bundler::BuildOutput;
use crate::error::SizewatchError;
use crate::infra::FileSystem;

/// Bundler scaffolding chunks excluded from every measurement. Not
/// user-configurable.
const SCAFFOLDING_CHUNKS: &[&str] = &[
    "vite/preload-helper",
    "vite/modulepreload-polyfill",
];

/// Raw and compressed byte sizes for one bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeEntry {
    /// Raw byte size of emitted code, pre-compression
    pub parsed: u64,
    /// Byte size after maximal gzip compression
    pub gzip: u64,
}

/// Gzip length of `bytes` at maximum compression.
///
/// The encoder writes a zeroed mtime header, so output length depends only
/// on the input bytes.
pub fn gzip_size(bytes: &[u8]) -> Result<u64> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes).context("gzip write failed")?;
    let compressed = encoder.finish().context("gzip finish failed")?;
    Ok(compressed.len() as u64)
}

/// Measure every chunk reachable from an entry's main chunk.
///
/// The entry's own chunk is reported under `entry_id`; other chunks keep
/// their manifest name (falling back to the chunk key). Scaffolding chunks
/// are skipped unconditionally.
pub fn measure_entry<FS: FileSystem>(
    output: &BuildOutput,
    entry_id: &str,
    fs: &FS,
) -> Result<Vec<(String, SizeEntry)>> {
    let (entry_key, _) = output
        .manifest
        .entry_chunk()
        .ok_or_else(|| SizewatchError::BuildFailed {
            entry: entry_id.to_string(),
            stderr: "bundler manifest contains no entry chunk".to_string(),
        })?;
    let entry_key = entry_key.clone();

    let reachable = crate::bundler::reachable_chunks(&output.manifest, &entry_key, entry_id)?;

    let mut sizes = Vec::with_capacity(reachable.len());
    for key in &reachable {
        if SCAFFOLDING_CHUNKS.contains(&key.as_str()) {
            continue;
        }

        // reachable_chunks already proved the key exists
        let record = output
            .manifest
            .get(key)
            .ok_or_else(|| SizewatchError::MissingChunk {
                entry: entry_id.to_string(),
                chunk: key.clone(),
            })?;

        let path = output.chunk_path(&record.file);
        let bytes = fs.read(&path).map_err(|e| SizewatchError::Io {
            context: format!("reading chunk {}", path.display()),
            source: e,
        })?;

        let name = if *key == entry_key {
            entry_id.to_string()
        } else {
            record.display_name(key).to_string()
        };

        sizes.push((
            name,
            SizeEntry {
                parsed: bytes.len() as u64,
                gzip: gzip_size(&bytes)?,
            },
        ));
    }

    Ok(sizes)
}
