//! Size snapshots: per-bundle sizes at one source revision
//!
//! A snapshot is an ordered map of bundle id → sizes, serialized as a JSON
//! object with sorted keys. Snapshots are append-only per commit: once
//! written they are never mutated.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::infra::{FileSystem, RealFileSystem};

use super::size::SizeEntry;

/// Canonical file name a snapshot is stored under.
pub const SNAPSHOT_FILE: &str = "size-snapshot.json";

/// Ordered map of bundle id → measured sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeSnapshot {
    entries: BTreeMap<String, SizeEntry>,
}

impl SizeSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one bundle's sizes. Existing ids are overwritten
    /// (last-writer-wins on merge collisions).
    pub fn insert(&mut self, id: impl Into<String>, entry: SizeEntry) {
        self.entries.insert(id.into(), entry);
    }

    /// Look up a bundle by id.
    pub fn get(&self, id: &str) -> Option<&SizeEntry> {
        self.entries.get(id)
    }

    /// Number of bundles in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot has no bundles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate bundles in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SizeEntry)> {
        self.entries.iter()
    }

    /// Bundle ids in lexicographic order.
    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Absorb `tuples` in order; colliding ids take the later value.
    pub fn extend(&mut self, tuples: impl IntoIterator<Item = (String, SizeEntry)>) {
        self.entries.extend(tuples);
    }

    /// Parse a snapshot from JSON text.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse size snapshot")
    }

    /// Serialize to JSON. BTreeMap iteration gives sorted keys.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize size snapshot")
    }

    /// Load a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_fs(path, &RealFileSystem)
    }

    /// Load with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(path: &Path, fs: &FS) -> Result<Self> {
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::parse(&contents)
    }

    /// Write the snapshot file. Called exactly once per run, after full
    /// aggregation.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.save_with_fs(path, &RealFileSystem)
    }

    /// Save with a custom filesystem implementation
    pub fn save_with_fs<FS: FileSystem>(&self, path: &Path, fs: &FS) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs.create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        fs.write(path, self.to_json()?)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))
    }
}

impl FromIterator<(String, SizeEntry)> for SizeSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, SizeEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
