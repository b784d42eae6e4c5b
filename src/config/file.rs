//! Configuration file schema and loading

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::SizewatchError;
use crate::infra::{FileSystem, RealFileSystem};

use super::entry::RawEntry;

/// Default number of ancestor commits tried when a baseline is missing
pub const DEFAULT_FALLBACK_DEPTH: usize = 5;

/// Default cap on lines inside the collapsed report details block
pub const DEFAULT_MAX_DETAILS_LINES: usize = 50;

fn default_fallback_depth() -> usize {
    DEFAULT_FALLBACK_DEPTH
}

fn default_max_details_lines() -> usize {
    DEFAULT_MAX_DETAILS_LINES
}

fn default_bundler() -> Vec<String> {
    vec!["npx".to_string(), "vite".to_string(), "build".to_string()]
}

/// Parsed `sizewatch.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    /// Repository slug, e.g. `acme/widgets`; required for upload and PR flows
    #[serde(default)]
    pub repo: Option<String>,
    /// Object-storage root the snapshots live under
    #[serde(default)]
    pub snapshot_root: Option<String>,
    /// Bundle entrypoints to build and measure
    pub entries: Vec<RawEntry>,
    /// Bundle ids shown prominently in reports regardless of change rank
    #[serde(default)]
    pub track: Vec<String>,
    /// Maximum ancestor commits tried when the primary baseline is missing
    #[serde(default = "default_fallback_depth")]
    pub fallback_depth: usize,
    /// Cap on changed-bundle lines inside the collapsed details block
    #[serde(default = "default_max_details_lines")]
    pub max_details_lines: usize,
    /// Bundler command; first element is the program, the rest are args
    #[serde(default = "default_bundler")]
    pub bundler: Vec<String>,
}

impl ConfigFile {
    /// Load and parse the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_fs(path, &RealFileSystem)
    }

    /// Load with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(path: &Path, fs: &FS) -> Result<Self> {
        let contents = fs.read_to_string(path).map_err(|e| {
            anyhow::Error::from(SizewatchError::ConfigNotFound {
                path: path.to_path_buf(),
                source: e,
            })
        })?;

        let config: ConfigFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Repository slug, or a config error naming the missing field.
    pub fn require_repo(&self) -> Result<&str> {
        self.repo.as_deref().ok_or_else(|| {
            SizewatchError::MissingUploadField {
                field: "repo".to_string(),
            }
            .into()
        })
    }
}
