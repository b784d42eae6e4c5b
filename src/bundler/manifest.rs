//! Bundler manifest parsing
//!
//! The manifest maps chunk keys to emitted files plus their static and
//! dynamic import edges (vite `manifest.json` field names). Only the
//! chunk/size/edge abstraction matters; anything else the bundler writes is
//! ignored.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// One emitted chunk and its outgoing import edges.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRecord {
    /// Emitted file path, relative to the bundler output directory
    pub file: String,
    /// Logical chunk name, when the bundler assigned one
    #[serde(default)]
    pub name: Option<String>,
    /// Whether this chunk is a build entrypoint
    #[serde(default)]
    pub is_entry: bool,
    /// Statically imported chunk keys
    #[serde(default)]
    pub imports: Vec<String>,
    /// Dynamically imported chunk keys
    #[serde(default)]
    pub dynamic_imports: Vec<String>,
}

impl ChunkRecord {
    /// The display name for this chunk: its logical name when present,
    /// otherwise the provided chunk key.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(key)
    }
}

/// A parsed build manifest: chunk key → record. Read-only after parse.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Manifest {
    /// Chunk records by manifest key
    pub chunks: BTreeMap<String, ChunkRecord>,
}

impl Manifest {
    /// Parse a manifest from its JSON text.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse bundler manifest")
    }

    /// Look up a chunk by key.
    pub fn get(&self, key: &str) -> Option<&ChunkRecord> {
        self.chunks.get(key)
    }

    /// The single entry chunk of this build.
    ///
    /// Each virtual build has exactly one entrypoint; `None` means the
    /// bundler emitted a manifest with no entry chunk, which callers treat
    /// as a build failure.
    pub fn entry_chunk(&self) -> Option<(&String, &ChunkRecord)> {
        self.chunks.iter().find(|(_, record)| record.is_entry)
    }
}
