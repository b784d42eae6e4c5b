//! Command handlers for the sizewatch CLI
//!
//! This module contains all command implementations, organized by
//! functionality. Each submodule handles a specific CLI command.

pub mod build;
pub mod completions;
pub mod diff;
pub mod pr;

pub use build::cmd_build;
pub use completions::cmd_completions;
pub use diff::cmd_diff;
pub use pr::cmd_pr;
