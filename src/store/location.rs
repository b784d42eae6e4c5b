//! Snapshot URI parsing
//!
//! Diff inputs are addressed by URI: `file:` for local snapshots, `http:`
//! or `https:` for stored ones. Bare paths are treated as `file:` for
//! convenience.

use anyhow::Result;
use std::path::PathBuf;

use crate::error::SizewatchError;
use crate::infra::RealFileSystem;
use crate::measure::snapshot::SizeSnapshot;

/// A parsed snapshot address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLocation {
    /// Local snapshot file
    File(PathBuf),
    /// Remote snapshot reachable over HTTP(S)
    Http(String),
}

impl std::str::FromStr for SnapshotLocation {
    type Err = anyhow::Error;

    fn from_str(uri: &str) -> Result<Self> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Ok(Self::Http(uri.to_string()));
        }
        if let Some(path) = uri.strip_prefix("file://") {
            return Ok(Self::File(PathBuf::from(path)));
        }
        if let Some(path) = uri.strip_prefix("file:") {
            return Ok(Self::File(PathBuf::from(path)));
        }
        if uri.contains("://") {
            return Err(SizewatchError::InvalidSnapshotUri {
                uri: uri.to_string(),
            }
            .into());
        }
        Ok(Self::File(PathBuf::from(uri)))
    }
}

impl SnapshotLocation {
    /// Fetch and parse the snapshot at this location.
    pub fn fetch(&self, agent: &ureq::Agent) -> Result<SizeSnapshot> {
        match self {
            Self::File(path) => SizeSnapshot::load_with_fs(path, &RealFileSystem),
            Self::Http(url) => {
                let body = agent
                    .get(url)
                    .call()
                    .map_err(|e| anyhow::anyhow!("Failed to fetch {}: {}", url, e))?
                    .into_string()
                    .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", url, e))?;
                SizeSnapshot::parse(&body)
            }
        }
    }
}
