//! Configuration file handling and entry normalization
//!
//! The configuration is a `sizewatch.json` file consumed read-only by the
//! rest of the tool. Raw entries are normalized into [`EntryDescriptor`]s
//! with a tagged source variant before any build work starts; invalid
//! configurations are rejected up front.

pub mod entry;
pub mod file;
pub mod validator;

pub use entry::{EntryDescriptor, EntrySource};
pub use file::{ConfigFile, DEFAULT_FALLBACK_DEPTH, DEFAULT_MAX_DETAILS_LINES};
pub use validator::validate;
