//! Diff command implementation
//!
//! Fetches two snapshots addressed by URI, diffs them, and prints the
//! rendered report. The two fetches are independent and run concurrently.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::ConfigFile;
use crate::diff::diff_snapshots;
use crate::error::SizewatchError;
use crate::measure::SizeSnapshot;
use crate::report::{render_json, render_markdown, RenderOptions, ReportFormat};
use crate::store::stores::FETCH_TIMEOUT;
use crate::store::SnapshotLocation;

/// Diff command handler: fetch base and head, diff, render to stdout.
pub fn cmd_diff(
    base: &str,
    head: &str,
    format: ReportFormat,
    config_path: Option<&Path>,
) -> Result<()> {
    let base_location: SnapshotLocation = base.parse()?;
    let head_location: SnapshotLocation = head.parse()?;

    let (base_snapshot, head_snapshot) = fetch_pair(&base_location, &head_location)?;
    let result = diff_snapshots(&base_snapshot, &head_snapshot);

    let rendered = match format {
        ReportFormat::Json => render_json(&result)?,
        ReportFormat::Markdown => render_markdown(&result, &render_options(config_path)?),
    };
    println!("{}", rendered);
    Ok(())
}

/// Fetch both snapshots concurrently, then join.
fn fetch_pair(
    base: &SnapshotLocation,
    head: &SnapshotLocation,
) -> Result<(SizeSnapshot, SizeSnapshot)> {
    let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();

    std::thread::scope(|scope| {
        let base_handle = scope.spawn(|| base.fetch(&agent));
        let head_handle = scope.spawn(|| head.fetch(&agent));

        let base_snapshot = base_handle
            .join()
            .map_err(|_| anyhow::anyhow!("Base snapshot fetch panicked"))?
            .context("Failed to fetch base snapshot")?;
        let head_snapshot = head_handle
            .join()
            .map_err(|_| anyhow::anyhow!("Head snapshot fetch panicked"))?
            .context("Failed to fetch head snapshot")?;
        Ok((base_snapshot, head_snapshot))
    })
}

/// Markdown rendering options from the config file when one is present,
/// defaults otherwise. Diffing two snapshot files does not require a
/// project config, so a missing file is not an error here.
fn render_options(config_path: Option<&Path>) -> Result<RenderOptions> {
    let defaults = RenderOptions {
        max_details_lines: crate::config::DEFAULT_MAX_DETAILS_LINES,
        ..RenderOptions::default()
    };

    match config_path {
        Some(path) => match ConfigFile::load(path) {
            Ok(config) => Ok(RenderOptions {
                track: config.track,
                max_details_lines: config.max_details_lines,
                details_url: None,
            }),
            Err(e) if is_config_not_found(&e) => Ok(defaults),
            Err(e) => Err(e),
        },
        None => Ok(defaults),
    }
}

fn is_config_not_found(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<SizewatchError>(),
        Some(SizewatchError::ConfigNotFound { .. })
    )
}
