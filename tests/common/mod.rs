//! Common test utilities and helpers
//!
//! Shared fixture creation for integration tests: snapshot files and
//! configuration files laid out the way the CLI expects them.

pub mod fixtures;

/// Check if running in CI environment
#[allow(dead_code)]
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok()
}
