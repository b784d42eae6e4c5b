//! Normalized entrypoint descriptors
//!
//! Raw config entries are an id plus either an inline code string or a
//! module specifier with an optional named-import list. Normalization turns
//! that shape into a tagged [`EntrySource`] variant so downstream code never
//! has to re-check which fields are present.

use serde::Deserialize;

/// What an entrypoint is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySource {
    /// A literal module body, bundled as-is.
    Inline {
        /// The module source code
        code: String,
    },
    /// An import of a published (or workspace) module.
    Import {
        /// Module specifier, e.g. `@acme/core`
        specifier: String,
        /// Named imports to pull; `None` imports the whole namespace
        imports: Option<Vec<String>>,
    },
}

/// A validated, normalized entrypoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// Unique bundle id; becomes the snapshot key for the entry chunk
    pub id: String,
    /// Source of the virtual entry module
    pub source: EntrySource,
    /// Package names excluded from the bundle
    pub externals: Vec<String>,
}

impl EntryDescriptor {
    /// Render the virtual entry module for this descriptor.
    ///
    /// Imported values are referenced after import so the bundler cannot
    /// tree-shake the entry away.
    pub fn entry_module(&self) -> String {
        match &self.source {
            EntrySource::Inline { code } => code.clone(),
            EntrySource::Import {
                specifier,
                imports: Some(names),
            } => {
                let list = names.join(", ");
                format!(
                    "import {{ {list} }} from {spec:?};\nconsole.log({list});\n",
                    list = list,
                    spec = specifier
                )
            }
            EntrySource::Import {
                specifier,
                imports: None,
            } => format!(
                "import * as entry from {spec:?};\nconsole.log(entry);\n",
                spec = specifier
            ),
        }
    }
}

/// Raw entry as written in `sizewatch.json`, before normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEntry {
    /// Unique bundle id
    pub id: String,
    /// Inline module code (mutually exclusive with `import`)
    #[serde(default)]
    pub code: Option<String>,
    /// Module specifier to import (mutually exclusive with `code`)
    #[serde(default)]
    pub import: Option<String>,
    /// Named imports for the specifier; omit to import the namespace
    #[serde(default)]
    pub imports: Option<Vec<String>>,
    /// Package names excluded from the bundle
    #[serde(default)]
    pub externals: Vec<String>,
}
