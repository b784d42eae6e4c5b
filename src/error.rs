//! Enhanced error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes and recovery actions
//! - Proper exit codes for CI/CD

use std::path::PathBuf;
use thiserror::Error;

/// Enhanced sizewatch errors with contextual suggestions
#[derive(Error, Debug)]
pub enum SizewatchError {
    /// Required tool is not installed
    #[error("Tool not installed: {tool}")]
    ToolMissing {
        /// Tool name
        tool: String,
        /// Installation command
        install_cmd: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to config file
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Two entries in the configuration share the same id
    #[error("Duplicate entry id in configuration: '{id}'")]
    DuplicateEntryId {
        /// The duplicated id
        id: String,
    },

    /// An entry defines neither inline code nor an import specifier
    #[error("Entry '{id}' has neither inline code nor an import specifier")]
    EntryMissingSource {
        /// Entry id
        id: String,
    },

    /// An entry defines both inline code and an import specifier
    #[error("Entry '{id}' defines both inline code and an import specifier")]
    EntryAmbiguousSource {
        /// Entry id
        id: String,
    },

    /// A required field for snapshot upload is missing
    #[error("Missing required field for snapshot upload: {field}")]
    MissingUploadField {
        /// Field name
        field: String,
    },

    /// Bundler invocation failed for one entry
    #[error("Bundle build failed for entry '{entry}'")]
    BuildFailed {
        /// Entry id that failed
        entry: String,
        /// Bundler error output
        stderr: String,
    },

    /// The bundler produced no manifest
    #[error("Bundler manifest not found: {path}")]
    ManifestMissing {
        /// Expected manifest path
        path: PathBuf,
    },

    /// A manifest edge points at a chunk that does not exist
    #[error("Entry '{entry}' references missing chunk '{chunk}'")]
    MissingChunk {
        /// Entry id being walked
        entry: String,
        /// The missing chunk key
        chunk: String,
    },

    /// A snapshot URI used an unsupported scheme
    #[error("Unsupported snapshot URI: '{uri}'")]
    InvalidSnapshotUri {
        /// The offending URI
        uri: String,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl SizewatchError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sizewatch::error::SizewatchError;
    ///
    /// let error = SizewatchError::ToolMissing {
    ///     tool: "node".to_string(),
    ///     install_cmd: "https://nodejs.org".to_string(),
    /// };
    ///
    /// assert!(error.suggestion().is_some());
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ToolMissing { install_cmd, .. } => Some(format!("Install with: {}", install_cmd)),
            Self::ConfigNotFound { .. } => {
                Some("Create a sizewatch.json with a 'repo' slug and an 'entries' list".to_string())
            }
            Self::DuplicateEntryId { id } => Some(format!(
                "Rename one of the entries so that '{}' appears only once",
                id
            )),
            Self::EntryMissingSource { id } => Some(format!(
                "Give entry '{}' either a 'code' string or an 'import' specifier",
                id
            )),
            Self::EntryAmbiguousSource { id } => Some(format!(
                "Remove either 'code' or 'import' from entry '{}'",
                id
            )),
            Self::MissingUploadField { field } => Some(format!(
                "Set '{}' in sizewatch.json or pass it on the command line",
                field
            )),
            Self::BuildFailed { .. } => {
                Some("Check the bundler output above and fix the failing entry".to_string())
            }
            Self::ManifestMissing { .. } => Some(
                "Ensure the bundler is configured to emit a manifest (vite: build.manifest = true)"
                    .to_string(),
            ),
            Self::MissingChunk { chunk, .. } => Some(format!(
                "The manifest references '{}' but the bundler did not emit it; re-run the build",
                chunk
            )),
            Self::InvalidSnapshotUri { .. } => {
                Some("Supported schemes are file:, http: and https:".to_string())
            }
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Returns Unix-style exit codes based on the error type, following
    /// sysexits.h conventions.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolMissing { .. } => 127, // Command not found (Unix convention)
            Self::ConfigNotFound { .. } => 66, // EX_NOINPUT (sysexits.h)
            Self::DuplicateEntryId { .. } => 65, // EX_DATAERR
            Self::EntryMissingSource { .. } => 65, // EX_DATAERR
            Self::EntryAmbiguousSource { .. } => 65, // EX_DATAERR
            Self::MissingUploadField { .. } => 64, // EX_USAGE
            Self::BuildFailed { .. } => 1,   // Generic error (CI should fail)
            Self::ManifestMissing { .. } => 1,
            Self::MissingChunk { .. } => 1,
            Self::InvalidSnapshotUri { .. } => 64, // EX_USAGE
            Self::Io { .. } => 74,                 // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        // Main error message
        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        // Try to downcast to SizewatchError for suggestions
        if let Some(sw_error) = error.downcast_ref::<SizewatchError>() {
            if let Some(suggestion) = sw_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(sw_error) = error.downcast_ref::<SizewatchError>() {
            sw_error.exit_code()
        } else {
            1 // Generic error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_missing_has_suggestion_and_exit_code() {
        let err = SizewatchError::ToolMissing {
            tool: "npx".to_string(),
            install_cmd: "npm install -g npx".to_string(),
        };

        let suggestion = err.suggestion().unwrap();
        assert!(suggestion.contains("npm install"));
        assert_eq!(err.exit_code(), 127);
    }

    #[test]
    fn test_config_errors_use_data_exit_codes() {
        let dup = SizewatchError::DuplicateEntryId {
            id: "core".to_string(),
        };
        assert_eq!(dup.exit_code(), 65);
        assert!(dup.to_string().contains("core"));

        let missing = SizewatchError::EntryMissingSource {
            id: "icons".to_string(),
        };
        assert_eq!(missing.exit_code(), 65);
        assert!(missing.suggestion().unwrap().contains("icons"));
    }

    #[test]
    fn test_build_failed_exits_nonzero() {
        let err = SizewatchError::BuildFailed {
            entry: "core".to_string(),
            stderr: "SyntaxError".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_error_formatter_includes_suggestion() {
        let err: anyhow::Error = SizewatchError::MissingUploadField {
            field: "repo".to_string(),
        }
        .into();

        let formatted = ErrorFormatter::format(&err);
        assert!(formatted.contains("error:"));
        assert!(formatted.contains("help:"));
        assert_eq!(ErrorFormatter::exit_code(&err), 64);
    }

    #[test]
    fn test_error_formatter_generic_error_exits_one() {
        let err = anyhow::anyhow!("something went wrong");
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
    }

    #[test]
    fn test_error_formatter_shows_cause_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: anyhow::Error = SizewatchError::Io {
            context: "reading snapshot".to_string(),
            source: io,
        }
        .into();

        let formatted = ErrorFormatter::format(&err);
        assert!(formatted.contains("caused by:"));
        assert!(formatted.contains("gone"));
    }
}
