//! Baseline resolution with ancestor fallback
//!
//! The baseline commit of a pull request may not have a stored snapshot:
//! its CI run could still be in flight, have failed, or predate snapshot
//! collection. Resolution tries the exact commit first, then walks its
//! first-parent ancestors in order until a snapshot is found or the
//! configured depth is exhausted. Exhaustion is not an error; the report
//! simply has no baseline.

use anyhow::Result;
use log::{debug, info, warn};

use crate::measure::snapshot::SizeSnapshot;
use crate::store::stores::SnapshotStore;

/// Lists ancestor commits of a starting commit, excluding the commit
/// itself; index 0 is the immediate parent.
pub trait AncestorLookup {
    /// Up to `depth` first-parent ancestors of `commit`, nearest first.
    fn ancestors(&self, commit: &str, depth: usize) -> Result<Vec<String>>;
}

/// Outcome of baseline resolution. Both fields are `None` when no commit in
/// the fallback chain had a stored snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The snapshot that was found, if any
    pub snapshot: Option<SizeSnapshot>,
    /// The commit the snapshot came from, which may be an ancestor of the
    /// requested commit
    pub commit: Option<String>,
}

impl Resolved {
    fn not_found() -> Self {
        Self {
            snapshot: None,
            commit: None,
        }
    }
}

/// Resolves the snapshot for a commit, falling back to ancestors.
pub struct SnapshotResolver<'a, S: SnapshotStore, A: AncestorLookup> {
    store: &'a S,
    ancestors: &'a A,
}

impl<'a, S: SnapshotStore, A: AncestorLookup> SnapshotResolver<'a, S, A> {
    /// Create a resolver over a snapshot store and an ancestry source.
    pub fn new(store: &'a S, ancestors: &'a A) -> Self {
        Self { store, ancestors }
    }

    /// Resolve the snapshot for `commit`, trying up to `fallback_depth`
    /// ancestors after the commit itself. Fetch failures are treated as
    /// "no snapshot at this commit" and the walk continues. A failed
    /// ancestor enumeration ends the walk the same way: resolution
    /// degrades to "no baseline" rather than erroring.
    pub fn resolve(&self, commit: &str, fallback_depth: usize) -> Result<Resolved> {
        if let Ok(snapshot) = self.store.fetch(commit) {
            return Ok(Resolved {
                snapshot: Some(snapshot),
                commit: Some(commit.to_string()),
            });
        }
        debug!("no snapshot at {}, walking ancestors", commit);

        if fallback_depth == 0 {
            return Ok(Resolved::not_found());
        }

        let ancestors = match self.ancestors.ancestors(commit, fallback_depth) {
            Ok(ancestors) => ancestors,
            Err(e) => {
                warn!("ancestor lookup for {} failed: {:#}", commit, e);
                return Ok(Resolved::not_found());
            }
        };

        for ancestor in ancestors {
            match self.store.fetch(&ancestor) {
                Ok(snapshot) => {
                    info!("using ancestor {} as baseline for {}", ancestor, commit);
                    return Ok(Resolved {
                        snapshot: Some(snapshot),
                        commit: Some(ancestor),
                    });
                }
                Err(e) => debug!("no snapshot at ancestor {}: {}", ancestor, e),
            }
        }

        Ok(Resolved::not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::size::SizeEntry;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    struct FakeStore {
        snapshots: BTreeMap<String, SizeSnapshot>,
        fetches: RefCell<Vec<String>>,
    }

    impl FakeStore {
        fn new(commits: &[&str]) -> Self {
            let snapshots = commits
                .iter()
                .map(|c| {
                    let mut s = SizeSnapshot::new();
                    s.insert(
                        "core",
                        SizeEntry {
                            parsed: 100,
                            gzip: 40,
                        },
                    );
                    (c.to_string(), s)
                })
                .collect();
            Self {
                snapshots,
                fetches: RefCell::new(Vec::new()),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.borrow().len()
        }
    }

    impl SnapshotStore for FakeStore {
        fn fetch(&self, commit: &str) -> Result<SizeSnapshot> {
            self.fetches.borrow_mut().push(commit.to_string());
            self.snapshots
                .get(commit)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no snapshot for {}", commit))
        }
    }

    struct FakeAncestors {
        chain: Vec<String>,
    }

    impl FakeAncestors {
        fn new(chain: &[&str]) -> Self {
            Self {
                chain: chain.iter().map(|c| c.to_string()).collect(),
            }
        }
    }

    impl AncestorLookup for FakeAncestors {
        fn ancestors(&self, _commit: &str, depth: usize) -> Result<Vec<String>> {
            Ok(self.chain.iter().take(depth).cloned().collect())
        }
    }

    #[test]
    fn test_exact_commit_hit_skips_ancestor_walk() {
        let store = FakeStore::new(&["head"]);
        let ancestors = FakeAncestors::new(&["p1", "p2"]);
        let resolver = SnapshotResolver::new(&store, &ancestors);

        let resolved = resolver.resolve("head", 5).unwrap();
        assert_eq!(resolved.commit.as_deref(), Some("head"));
        assert!(resolved.snapshot.is_some());
        assert_eq!(store.fetch_count(), 1);
    }

    #[test]
    fn test_falls_back_to_nearest_ancestor_with_snapshot() {
        let store = FakeStore::new(&["p2"]);
        let ancestors = FakeAncestors::new(&["p1", "p2", "p3"]);
        let resolver = SnapshotResolver::new(&store, &ancestors);

        let resolved = resolver.resolve("head", 5).unwrap();
        assert_eq!(resolved.commit.as_deref(), Some("p2"));
        assert!(resolved.snapshot.is_some());
        // head and p1 missed before p2 hit
        assert_eq!(store.fetch_count(), 3);
    }

    #[test]
    fn test_exhaustion_makes_depth_plus_one_attempts_and_yields_nothing() {
        let store = FakeStore::new(&[]);
        let ancestors = FakeAncestors::new(&["p1", "p2", "p3", "p4", "p5", "p6", "p7"]);
        let resolver = SnapshotResolver::new(&store, &ancestors);

        let resolved = resolver.resolve("head", 5).unwrap();
        assert_eq!(resolved, Resolved::not_found());
        assert_eq!(store.fetch_count(), 6);
    }

    #[test]
    fn test_zero_depth_only_tries_the_commit_itself() {
        let store = FakeStore::new(&[]);
        let ancestors = FakeAncestors::new(&["p1"]);
        let resolver = SnapshotResolver::new(&store, &ancestors);

        let resolved = resolver.resolve("head", 0).unwrap();
        assert_eq!(resolved, Resolved::not_found());
        assert_eq!(store.fetch_count(), 1);
    }

    #[test]
    fn test_ancestor_lookup_failure_degrades_to_no_baseline() {
        // A history API timeout or 500 must not crash resolution; the
        // report just has no baseline
        struct BrokenAncestors;

        impl AncestorLookup for BrokenAncestors {
            fn ancestors(&self, _commit: &str, _depth: usize) -> Result<Vec<String>> {
                Err(anyhow::anyhow!("history API timed out"))
            }
        }

        let store = FakeStore::new(&[]);
        let resolver = SnapshotResolver::new(&store, &BrokenAncestors);

        let resolved = resolver.resolve("head", 5).unwrap();
        assert_eq!(resolved, Resolved::not_found());
        // Only the exact-commit fetch happened before the walk gave up
        assert_eq!(store.fetch_count(), 1);
    }

    #[test]
    fn test_shallow_history_ends_walk_early() {
        // Only two ancestors exist even though depth allows five
        let store = FakeStore::new(&[]);
        let ancestors = FakeAncestors::new(&["p1", "p2"]);
        let resolver = SnapshotResolver::new(&store, &ancestors);

        let resolved = resolver.resolve("head", 5).unwrap();
        assert_eq!(resolved, Resolved::not_found());
        assert_eq!(store.fetch_count(), 3);
    }
}
