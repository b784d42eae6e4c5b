//! Test fixture helpers for snapshot and config files

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write a snapshot file with the given `(id, parsed, gzip)` entries.
/// Entries are written sorted by id, matching the on-disk format.
pub fn write_snapshot(
    dir: &TempDir,
    name: &str,
    entries: &[(&str, u64, u64)],
) -> anyhow::Result<PathBuf> {
    let mut sorted: Vec<_> = entries.to_vec();
    sorted.sort_by_key(|(id, _, _)| id.to_string());

    let body: Vec<String> = sorted
        .iter()
        .map(|(id, parsed, gzip)| {
            format!(
                "  \"{}\": {{\n    \"parsed\": {},\n    \"gzip\": {}\n  }}",
                id, parsed, gzip
            )
        })
        .collect();

    let path = dir.path().join(name);
    fs::write(&path, format!("{{\n{}\n}}\n", body.join(",\n")))?;
    Ok(path)
}

/// Write a minimal `sizewatch.json` with the given raw JSON body.
pub fn write_config(dir: &TempDir, body: &str) -> anyhow::Result<PathBuf> {
    let path = dir.path().join("sizewatch.json");
    fs::write(&path, body)?;
    Ok(path)
}
