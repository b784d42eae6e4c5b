//! Bundler boundary: virtual entry builds, manifest parsing, and chunk
//! reachability
//!
//! The bundler itself (vite by default) is an opaque child process. This
//! module owns everything on our side of that boundary: writing the virtual
//! entry module, invoking the bundler in an isolated scratch directory,
//! reading the emitted manifest, and walking its import edges.

pub mod builder;
pub mod graph;
pub mod manifest;

pub use builder::{BuildOutput, BundleBuilder};
pub use graph::reachable_chunks;
pub use manifest::{ChunkRecord, Manifest};
