//! Build command implementation
//!
//! Thin presentation layer for the default command: load and validate the
//! config, build every entry on the worker pool, write the snapshot, and
//! optionally upload it or emit a visual size breakdown.

use anyhow::{Context, Result};
use console::style;
use std::env;
use std::path::Path;

use crate::bundler::BundleBuilder;
use crate::config::{validate, ConfigFile};
use crate::error::SizewatchError;
use crate::fmt::{format_bytes, CHART, CHECKMARK, HAMMER};
use crate::git::GitRepository;
use crate::infra::RealFileSystem;
use crate::measure::{build_snapshot, default_concurrency, SizeSnapshot};
use crate::store::HttpSnapshotStore;

/// Default snapshot output path.
pub const DEFAULT_OUTPUT: &str = "size-snapshot.json";

/// Main build command handler (presentation layer)
pub fn cmd_build(
    config_path: &Path,
    output: &Path,
    concurrency: Option<usize>,
    analyze: bool,
    upload: bool,
) -> Result<()> {
    println!("{} {} build", HAMMER, style("sizewatch").bold());
    println!();

    let config = ConfigFile::load(config_path)?;
    let entries = validate(&config.entries)?;
    preflight_bundler(&config.bundler)?;

    let project_root = env::current_dir().context("Failed to resolve current directory")?;
    let builder = BundleBuilder::new(&project_root, config.bundler.clone());

    let workers = concurrency.unwrap_or_else(default_concurrency);
    let snapshot = build_snapshot(&builder, &RealFileSystem, &entries, workers)?;

    snapshot.save(output)?;
    present_snapshot(&snapshot, output);

    if analyze {
        let artifact = output.with_extension("html");
        std::fs::write(&artifact, render_analysis(&snapshot)).map_err(|e| SizewatchError::Io {
            context: format!("writing analysis artifact {}", artifact.display()),
            source: e,
        })?;
        println!("   {} Size breakdown: {}", CHART, artifact.display());
    }

    if upload {
        upload_snapshot(&config, &snapshot)?;
    }

    Ok(())
}

/// Fail fast when the bundler program is not installed.
fn preflight_bundler(bundler_cmd: &[String]) -> Result<()> {
    let program = bundler_cmd
        .first()
        .ok_or_else(|| anyhow::anyhow!("Bundler command is empty"))?;
    which::which(program).map_err(|_| SizewatchError::ToolMissing {
        tool: program.clone(),
        install_cmd: format!("npm install -g {}", program),
    })?;
    Ok(())
}

fn present_snapshot(snapshot: &SizeSnapshot, output: &Path) {
    println!(
        "{} Measured {} bundle(s) → {}",
        CHECKMARK,
        snapshot.len(),
        output.display()
    );
    for (id, entry) in snapshot.iter() {
        println!(
            "   {} {} ({} gzip)",
            style(id).bold(),
            format_bytes(entry.parsed),
            format_bytes(entry.gzip)
        );
    }
    println!();
}

fn upload_snapshot(config: &ConfigFile, snapshot: &SizeSnapshot) -> Result<()> {
    let repo = config.require_repo()?;
    let root = config
        .snapshot_root
        .as_deref()
        .ok_or_else(|| SizewatchError::MissingUploadField {
            field: "snapshotRoot".to_string(),
        })?;
    let commit = GitRepository::new()
        .head_commit()?
        .ok_or_else(|| anyhow::anyhow!("Cannot upload: not inside a git repository"))?;

    let store = HttpSnapshotStore::new(root, repo);
    store.upload(&commit, snapshot)?;
    println!("{} Uploaded snapshot for {}", CHECKMARK, &commit[..12.min(commit.len())]);
    Ok(())
}

/// A self-contained HTML bar chart of per-bundle parsed sizes.
fn render_analysis(snapshot: &SizeSnapshot) -> String {
    let max_parsed = snapshot.iter().map(|(_, e)| e.parsed).max().unwrap_or(1).max(1);

    let mut rows = String::new();
    for (id, entry) in snapshot.iter() {
        let width = (entry.parsed as f64 / max_parsed as f64 * 100.0).max(1.0);
        rows.push_str(&format!(
            "<div class=\"row\"><span class=\"id\">{}</span>\
             <span class=\"bar\" style=\"width:{:.1}%\"></span>\
             <span class=\"size\">{} ({} gzip)</span></div>\n",
            id,
            width,
            format_bytes(entry.parsed),
            format_bytes(entry.gzip)
        ));
    }

    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\">\
         <title>Bundle sizes</title>\
         <style>body{{font:14px monospace;margin:2em}}\
         .row{{display:flex;align-items:center;margin:4px 0}}\
         .id{{width:16em}}\
         .bar{{background:#4a90d9;height:14px;display:inline-block}}\
         .size{{margin-left:1em;color:#555}}</style>\
         </head><body><h1>Bundle sizes</h1>\n{}</body></html>\n",
        rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::SizeEntry;

    #[test]
    fn test_preflight_missing_bundler_is_tool_missing() {
        let result = preflight_bundler(&["definitely-not-a-real-bundler-xyz".to_string()]);
        let err = result.unwrap_err();
        let sw = err.downcast_ref::<SizewatchError>().unwrap();
        assert!(matches!(sw, SizewatchError::ToolMissing { .. }));
    }

    #[test]
    fn test_preflight_empty_bundler_command_is_error() {
        assert!(preflight_bundler(&[]).is_err());
    }

    #[test]
    fn test_analysis_artifact_lists_every_bundle() {
        let mut snapshot = SizeSnapshot::new();
        snapshot.insert("core", SizeEntry { parsed: 15000, gzip: 4500 });
        snapshot.insert("icons", SizeEntry { parsed: 3000, gzip: 900 });

        let html = render_analysis(&snapshot);
        assert!(html.contains("core"));
        assert!(html.contains("icons"));
        assert!(html.contains("15.00 kB"));
    }

    #[test]
    fn test_analysis_artifact_handles_empty_snapshot() {
        let html = render_analysis(&SizeSnapshot::new());
        assert!(html.contains("<html>"));
    }
}
