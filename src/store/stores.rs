//! Snapshot store implementations
//!
//! A [`SnapshotStore`] maps a commit sha to its stored snapshot. The HTTP
//! implementation talks to the object-storage endpoint; the file
//! implementation serves local directories laid out the same way, which is
//! what the resolver tests and offline use run against.

use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::measure::snapshot::{SizeSnapshot, SNAPSHOT_FILE};

/// Per-attempt timeout for snapshot fetches. A timeout is treated exactly
/// like any other fetch failure, so the fallback chain keeps moving.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Fetches the snapshot stored for a commit.
///
/// Every error (network, non-200, malformed payload) means "no snapshot
/// here" to the caller; the resolver is the layer that decides what to do
/// about it.
pub trait SnapshotStore {
    /// Fetch and parse the snapshot for `commit`.
    fn fetch(&self, commit: &str) -> Result<SizeSnapshot>;
}

/// HTTP-backed store addressing `{root}/{repo}/{commit}/size-snapshot.json`.
pub struct HttpSnapshotStore {
    root: String,
    repo: String,
    agent: ureq::Agent,
}

impl HttpSnapshotStore {
    /// Create a store under `root` for `repo` (an `owner/name` slug).
    pub fn new(root: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            repo: repo.into(),
            agent: ureq::AgentBuilder::new()
                .timeout(FETCH_TIMEOUT)
                .build(),
        }
    }

    /// Storage URL for a commit's snapshot.
    pub fn url_for(&self, commit: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.root.trim_end_matches('/'),
            self.repo,
            commit,
            SNAPSHOT_FILE
        )
    }

    /// Upload a snapshot for `commit` via HTTP PUT.
    pub fn upload(&self, commit: &str, snapshot: &SizeSnapshot) -> Result<()> {
        let url = self.url_for(commit);
        let body = snapshot.to_json()?;
        self.agent
            .put(&url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .with_context(|| format!("Failed to upload snapshot to {}", url))?;
        Ok(())
    }
}

impl SnapshotStore for HttpSnapshotStore {
    fn fetch(&self, commit: &str) -> Result<SizeSnapshot> {
        let url = self.url_for(commit);
        debug!("fetching snapshot {}", url);

        let body = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| anyhow::anyhow!("snapshot fetch failed for {}: {}", url, e))?
            .into_string()
            .with_context(|| format!("Failed to read snapshot body from {}", url))?;

        SizeSnapshot::parse(&body)
    }
}

/// Directory-backed store with the same `{repo}/{commit}/size-snapshot.json`
/// layout as the HTTP store.
pub struct FileSnapshotStore {
    root: PathBuf,
    repo: String,
}

impl FileSnapshotStore {
    /// Create a store rooted at a local directory.
    pub fn new(root: impl Into<PathBuf>, repo: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            repo: repo.into(),
        }
    }

    fn path_for(&self, commit: &str) -> PathBuf {
        self.root.join(&self.repo).join(commit).join(SNAPSHOT_FILE)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn fetch(&self, commit: &str) -> Result<SizeSnapshot> {
        SizeSnapshot::load(&self.path_for(commit))
    }
}
