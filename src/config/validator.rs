//! Entry validation and normalization
//!
//! All configuration errors are surfaced here, before any build work
//! starts. Duplicate ids are rejected rather than merged.

use anyhow::Result;
use std::collections::HashSet;

use crate::error::SizewatchError;

use super::entry::{EntryDescriptor, EntrySource, RawEntry};

/// Validate raw entries and normalize them into [`EntryDescriptor`]s.
///
/// Rejects duplicate ids, entries with neither `code` nor `import`, and
/// entries with both.
pub fn validate(raw: &[RawEntry]) -> Result<Vec<EntryDescriptor>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries = Vec::with_capacity(raw.len());

    for entry in raw {
        if !seen.insert(entry.id.as_str()) {
            return Err(SizewatchError::DuplicateEntryId {
                id: entry.id.clone(),
            }
            .into());
        }

        let source = match (&entry.code, &entry.import) {
            (Some(_), Some(_)) => {
                return Err(SizewatchError::EntryAmbiguousSource {
                    id: entry.id.clone(),
                }
                .into())
            }
            (Some(code), None) => EntrySource::Inline { code: code.clone() },
            (None, Some(specifier)) => EntrySource::Import {
                specifier: specifier.clone(),
                imports: entry.imports.clone(),
            },
            (None, None) => {
                return Err(SizewatchError::EntryMissingSource {
                    id: entry.id.clone(),
                }
                .into())
            }
        };

        entries.push(EntryDescriptor {
            id: entry.id.clone(),
            source,
            externals: entry.externals.clone(),
        });
    }

    Ok(entries)
}
