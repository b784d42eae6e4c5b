//! Snapshot storage access and baseline resolution
//!
//! Snapshots live under an object-storage root at
//! `{repo}/{commit}/size-snapshot.json`. Fetching is plain HTTP; any
//! non-200 or network-level failure is "not found" as far as baseline
//! resolution is concerned. The resolver walks ancestor commits to find a
//! usable baseline when the exact commit has none.

pub mod location;
pub mod resolver;
pub mod stores;

pub use location::SnapshotLocation;
pub use resolver::{AncestorLookup, Resolved, SnapshotResolver};
pub use stores::{FileSnapshotStore, HttpSnapshotStore, SnapshotStore};
