//! Report rendering
//!
//! Pure functions of a [`ComparisonResult`] plus options, with no network
//! or filesystem access. JSON output is the comparison result serialized
//! verbatim; Markdown output is shaped for a PR comment: a summary line, a
//! file-count line, an optional table of tracked bundles, and the remaining
//! changes collapsed inside one disclosure block.

use anyhow::{Context, Result};

use crate::diff::{ComparisonEntry, ComparisonResult};
use crate::fmt::{ByteFormatter, PercentFormatter};

/// Output format for a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// GitHub-flavored Markdown
    #[default]
    Markdown,
    /// The comparison result as JSON
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown output format '{}' (expected json or markdown)", other),
        }
    }
}

/// Rendering options, taken read-only from config and CLI flags.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Bundle ids rendered unconditionally, regardless of change rank
    pub track: Vec<String>,
    /// Cap on lines inside the collapsed details block; 0 means unlimited
    pub max_details_lines: usize,
    /// Optional deep link appended to the report
    pub details_url: Option<String>,
}

/// Render the comparison result as JSON, verbatim.
pub fn render_json(result: &ComparisonResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize comparison result")
}

/// Render the comparison result as Markdown.
pub fn render_markdown(result: &ComparisonResult, options: &RenderOptions) -> String {
    let bytes = ByteFormatter;
    let percent = PercentFormatter;
    let mut out = String::new();

    out.push_str(&summary_line(result, &bytes, &percent));
    out.push('\n');
    out.push_str(&counts_line(result));
    out.push('\n');

    let (tracked, rest): (Vec<&ComparisonEntry>, Vec<&ComparisonEntry>) = result
        .entries
        .iter()
        .partition(|e| options.track.contains(&e.id));

    if !tracked.is_empty() {
        out.push('\n');
        out.push_str(&tracked_table(&tracked, &bytes, &percent));
    }

    let noteworthy: Vec<&ComparisonEntry> = rest
        .into_iter()
        .filter(|e| e.is_changed() || e.is_new() || e.is_removed())
        .collect();

    if !noteworthy.is_empty() {
        out.push('\n');
        out.push_str(&details_block(
            &noteworthy,
            options.max_details_lines,
            &bytes,
            &percent,
        ));
    }

    if let Some(url) = &options.details_url {
        out.push('\n');
        out.push_str(&format!("[View full report]({})\n", url));
    }

    out
}

fn summary_line(
    result: &ComparisonResult,
    bytes: &ByteFormatter,
    percent: &PercentFormatter,
) -> String {
    let counts = &result.file_counts;
    if counts.added == 0 && counts.removed == 0 && counts.changed == 0 {
        return format!(
            "**No bundle size changes** ({} bundles)\n",
            counts.total
        );
    }

    let prev_parsed: u64 = result.entries.iter().map(|e| e.parsed.previous).sum();
    let prev_gzip: u64 = result.entries.iter().map(|e| e.gzip.previous).sum();

    format!(
        "**Total size change:** {} ({}) parsed, {} ({}) gzip\n",
        bytes.signed(result.totals.total_parsed),
        percent_or_label(result.totals.total_parsed, prev_parsed, result.totals.total_parsed_percent, percent),
        bytes.signed(result.totals.total_gzip),
        percent_or_label(result.totals.total_gzip, prev_gzip, result.totals.total_gzip_percent, percent),
    )
}

/// Signed percent, or a "new"/"removed" label when a percentage is
/// inapplicable (no baseline bytes to divide by).
fn percent_or_label(
    diff: i64,
    previous_sum: u64,
    ratio: f64,
    percent: &PercentFormatter,
) -> String {
    if previous_sum > 0 {
        percent.signed(ratio)
    } else if diff < 0 {
        "removed".to_string()
    } else {
        "new".to_string()
    }
}

fn counts_line(result: &ComparisonResult) -> String {
    let c = &result.file_counts;
    format!(
        "{} bundles compared: {} added, {} removed, {} changed\n",
        c.total, c.added, c.removed, c.changed
    )
}

fn tracked_table(
    entries: &[&ComparisonEntry],
    bytes: &ByteFormatter,
    percent: &PercentFormatter,
) -> String {
    let mut out = String::from("| Bundle | Parsed | Gzip |\n|---|---|---|\n");
    for entry in entries {
        out.push_str(&format!(
            "| `{}` | {} | {} |\n",
            entry.id,
            metric_cell(entry, true, bytes, percent),
            metric_cell(entry, false, bytes, percent),
        ));
    }
    out
}

fn metric_cell(
    entry: &ComparisonEntry,
    parsed: bool,
    bytes: &ByteFormatter,
    percent: &PercentFormatter,
) -> String {
    let metric = if parsed { &entry.parsed } else { &entry.gzip };
    if entry.is_new() {
        format!("{} (new)", bytes.absolute(metric.current))
    } else if entry.is_removed() {
        format!("{} (removed)", bytes.signed(metric.absolute_diff))
    } else {
        match metric.relative_diff {
            Some(ratio) => format!(
                "{} ({})",
                bytes.signed(metric.absolute_diff),
                percent.signed(ratio)
            ),
            None => bytes.signed(metric.absolute_diff),
        }
    }
}

fn details_block(
    entries: &[&ComparisonEntry],
    max_lines: usize,
    bytes: &ByteFormatter,
    percent: &PercentFormatter,
) -> String {
    let shown = if max_lines > 0 {
        entries.len().min(max_lines)
    } else {
        entries.len()
    };
    let elided = entries.len() - shown;

    let mut out = format!(
        "<details>\n<summary>Show {} changed bundle{}</summary>\n\n",
        entries.len(),
        if entries.len() == 1 { "" } else { "s" }
    );
    for entry in &entries[..shown] {
        out.push_str(&format!(
            "- `{}`: {}, {} gzip\n",
            entry.id,
            metric_cell(entry, true, bytes, percent),
            metric_cell(entry, false, bytes, percent),
        ));
    }
    if elided > 0 {
        out.push_str(&format!("- … and {} more\n", elided));
    }
    out.push_str("</details>\n");
    out
}
