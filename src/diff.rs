//! Snapshot comparison engine
//!
//! Compares two size snapshots into per-bundle diffs, aggregate totals, and
//! file counts. Absence of a bundle id is meaningful state, not an error:
//! ids missing from the base are "new", ids missing from the head are
//! "removed". Diffing well-formed snapshots cannot fail.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::measure::size::SizeEntry;
use crate::measure::snapshot::SizeSnapshot;

/// Diff of one metric (parsed or gzip) for one bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDiff {
    /// Base value; implicit 0 when the bundle is absent from the base
    pub previous: u64,
    /// Head value; implicit 0 when the bundle is absent from the head
    pub current: u64,
    /// `current - previous`, exact integer arithmetic
    pub absolute_diff: i64,
    /// `None` when absent from base ("new"); exactly `-1` when absent from
    /// head ("removed"); `current/previous - 1` when `previous > 0`; `0`
    /// when previous was zero but the bundle exists on both sides
    pub relative_diff: Option<f64>,
}

/// Diff of one bundle across both metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonEntry {
    /// Bundle id
    pub id: String,
    /// Raw byte size diff
    pub parsed: MetricDiff,
    /// Gzip byte size diff
    pub gzip: MetricDiff,
}

/// Display category of a comparison entry.
///
/// Ordered by display rank: increases sort before new bundles, which sort
/// before decreases, removals, and unchanged bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeCategory {
    /// Grew in size
    Increase,
    /// Absent from the base snapshot
    New,
    /// Shrank in size
    Decrease,
    /// Absent from the head snapshot
    Removed,
    /// Present in both with identical sizes
    Unchanged,
}

impl ComparisonEntry {
    /// Whether this bundle is absent from the base snapshot.
    pub fn is_new(&self) -> bool {
        self.parsed.relative_diff.is_none()
    }

    /// Whether this bundle is absent from the head snapshot.
    pub fn is_removed(&self) -> bool {
        self.parsed.relative_diff == Some(-1.0)
    }

    /// Whether either metric changed (and the bundle is neither new nor
    /// removed).
    pub fn is_changed(&self) -> bool {
        !self.is_new()
            && !self.is_removed()
            && (self.parsed.absolute_diff != 0 || self.gzip.absolute_diff != 0)
    }

    /// Display category. Decided on parsed bytes, falling back to gzip
    /// when parsed is unchanged.
    pub fn category(&self) -> ChangeCategory {
        if self.is_new() {
            return ChangeCategory::New;
        }
        if self.is_removed() {
            return ChangeCategory::Removed;
        }
        let signal = if self.parsed.absolute_diff != 0 {
            self.parsed.absolute_diff
        } else {
            self.gzip.absolute_diff
        };
        match signal.cmp(&0) {
            std::cmp::Ordering::Greater => ChangeCategory::Increase,
            std::cmp::Ordering::Less => ChangeCategory::Decrease,
            std::cmp::Ordering::Equal => ChangeCategory::Unchanged,
        }
    }
}

/// Aggregate byte and percent totals across all entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of parsed `absolute_diff` across all entries
    pub total_parsed: i64,
    /// Sum of gzip `absolute_diff` across all entries
    pub total_gzip: i64,
    /// `total_parsed / sum(previous parsed)` when the denominator is
    /// positive, else 0; not an average of per-bundle percentages
    pub total_parsed_percent: f64,
    /// Gzip counterpart of `total_parsed_percent`
    pub total_gzip_percent: f64,
}

/// Bundle counts by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCounts {
    /// All compared bundle ids, including unchanged ones
    pub total: usize,
    /// Bundles absent from the base
    pub added: usize,
    /// Bundles absent from the head
    pub removed: usize,
    /// Bundles present in both with a nonzero diff in either metric
    pub changed: usize,
}

/// Full comparison of two snapshots. Ephemeral; recomputed per diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Per-bundle diffs in display order
    pub entries: Vec<ComparisonEntry>,
    /// Aggregate totals
    pub totals: Totals,
    /// Classification counts
    pub file_counts: FileCounts,
}

fn metric_diff(previous: Option<u64>, current: Option<u64>) -> MetricDiff {
    let prev_value = previous.unwrap_or(0);
    let curr_value = current.unwrap_or(0);
    let absolute_diff = curr_value as i64 - prev_value as i64;

    let relative_diff = match (previous, current) {
        (None, _) => None,
        (Some(_), None) => Some(-1.0),
        (Some(p), Some(c)) if p > 0 => Some(c as f64 / p as f64 - 1.0),
        (Some(_), Some(_)) => Some(0.0),
    };

    MetricDiff {
        previous: prev_value,
        current: curr_value,
        absolute_diff,
        relative_diff,
    }
}

/// Compare two snapshots over the union of their bundle ids.
pub fn diff_snapshots(base: &SizeSnapshot, head: &SizeSnapshot) -> ComparisonResult {
    let ids: BTreeSet<&String> = base.ids().chain(head.ids()).collect();

    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        let before: Option<&SizeEntry> = base.get(id);
        let after: Option<&SizeEntry> = head.get(id);

        entries.push(ComparisonEntry {
            id: id.clone(),
            parsed: metric_diff(before.map(|e| e.parsed), after.map(|e| e.parsed)),
            gzip: metric_diff(before.map(|e| e.gzip), after.map(|e| e.gzip)),
        });
    }

    let total_parsed: i64 = entries.iter().map(|e| e.parsed.absolute_diff).sum();
    let total_gzip: i64 = entries.iter().map(|e| e.gzip.absolute_diff).sum();
    let prev_parsed: u64 = entries.iter().map(|e| e.parsed.previous).sum();
    let prev_gzip: u64 = entries.iter().map(|e| e.gzip.previous).sum();

    let totals = Totals {
        total_parsed,
        total_gzip,
        total_parsed_percent: percent_of(total_parsed, prev_parsed),
        total_gzip_percent: percent_of(total_gzip, prev_gzip),
    };

    let file_counts = FileCounts {
        total: entries.len(),
        added: entries.iter().filter(|e| e.is_new()).count(),
        removed: entries.iter().filter(|e| e.is_removed()).count(),
        changed: entries.iter().filter(|e| e.is_changed()).count(),
    };

    // Display order: category rank, then |parsed diff| descending, then id
    entries.sort_by(|a, b| {
        a.category()
            .cmp(&b.category())
            .then_with(|| {
                b.parsed
                    .absolute_diff
                    .abs()
                    .cmp(&a.parsed.absolute_diff.abs())
            })
            .then_with(|| a.id.cmp(&b.id))
    });

    ComparisonResult {
        entries,
        totals,
        file_counts,
    }
}

fn percent_of(diff: i64, previous_sum: u64) -> f64 {
    if previous_sum > 0 {
        diff as f64 / previous_sum as f64
    } else {
        0.0
    }
}
