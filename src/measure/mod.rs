//! Size measurement and snapshot aggregation
//!
//! One entry build produces `(bundle id, SizeEntry)` tuples; the
//! orchestrator fans builds out across a bounded pool and merges the tuples
//! into a single [`snapshot::SizeSnapshot`].

pub mod orchestrator;
pub mod size;
pub mod snapshot;

pub use orchestrator::{build_snapshot, default_concurrency, MAX_CONCURRENCY};
pub use size::SizeEntry;
pub use snapshot::SizeSnapshot;
