#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! sizewatch library
//!
//! This library provides the core functionality for bundle-size regression
//! detection. It can be used programmatically in addition to the CLI
//! interface.
//!
//! # Basic Example
//!
//! Diffing two size snapshots:
//!
//! ```
//! use sizewatch::diff::diff_snapshots;
//! use sizewatch::measure::snapshot::SizeSnapshot;
//! use sizewatch::measure::size::SizeEntry;
//!
//! let mut base = SizeSnapshot::new();
//! base.insert("core", SizeEntry { parsed: 15000, gzip: 4500 });
//!
//! let mut head = SizeSnapshot::new();
//! head.insert("core", SizeEntry { parsed: 15400, gzip: 4600 });
//!
//! let result = diff_snapshots(&base, &head);
//! assert_eq!(result.totals.total_parsed, 400);
//! assert_eq!(result.file_counts.changed, 1);
//! ```
//!
//! # Advanced Example: Rendering a Report
//!
//! ```
//! use sizewatch::diff::diff_snapshots;
//! use sizewatch::measure::snapshot::SizeSnapshot;
//! use sizewatch::report::{render_markdown, RenderOptions};
//!
//! let result = diff_snapshots(&SizeSnapshot::new(), &SizeSnapshot::new());
//! let markdown = render_markdown(&result, &RenderOptions::default());
//! assert!(markdown.contains("No bundle size changes"));
//! ```

/// Bundler invocation, manifest parsing, and dependency graph traversal
pub mod bundler;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file, entry descriptors, and validation
pub mod config;
/// Snapshot comparison engine
pub mod diff;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Git metadata and local ancestor enumeration
pub mod git;
/// GitHub REST client and PR comment notifier
pub mod github;
/// Infrastructure traits for filesystem and command execution
pub mod infra;
/// Size measurement and snapshot aggregation
pub mod measure;
/// Report rendering (Markdown and JSON)
pub mod report;
/// Snapshot storage access and baseline resolution
pub mod store;
