//! PR command implementation
//!
//! Derives base and head commits from pull-request metadata, resolves both
//! snapshots (the base with ancestor fallback), and posts the rendered
//! report as a single deduplicated PR comment.

use anyhow::Result;
use console::style;
use std::path::Path;

use crate::config::ConfigFile;
use crate::diff::diff_snapshots;
use crate::error::SizewatchError;
use crate::fmt::{CHECKMARK, INFO};
use crate::github::{notify, GithubClient, PullRequest};
use crate::measure::SizeSnapshot;
use crate::report::{render_markdown, RenderOptions};
use crate::store::{AncestorLookup, HttpSnapshotStore, Resolved, SnapshotResolver, SnapshotStore};

/// Marker id that ties the report comment to this tool across runs.
const DEDUPE_ID: &str = "bundle-report";

/// PR command handler: resolve snapshots for a pull request and post the
/// comparison as a comment.
pub fn cmd_pr(pr_number: u64, build_number: Option<u64>, config_path: &Path) -> Result<()> {
    let config = ConfigFile::load(config_path)?;
    let repo = config.require_repo()?;
    let snapshot_root =
        config
            .snapshot_root
            .as_deref()
            .ok_or_else(|| SizewatchError::MissingUploadField {
                field: "snapshotRoot".to_string(),
            })?;

    let client = GithubClient::new(repo);
    let pull_request = client.pull_request(pr_number)?;
    let store = HttpSnapshotStore::new(snapshot_root, repo);

    let (base, head) = resolve_pair(&store, &client, &pull_request, config.fallback_depth)?;

    let head_snapshot = head.snapshot.ok_or_else(|| {
        anyhow::anyhow!(
            "No snapshot found for head commit {}; did the build step run?",
            pull_request.head_sha
        )
    })?;

    let body = report_body(
        &base,
        &head_snapshot,
        &config,
        &store,
        &pull_request,
        build_number,
    );

    notify(&client, pr_number, DEDUPE_ID, &body)?;
    println!("{} Posted report on #{}", CHECKMARK, pr_number);
    Ok(())
}

/// Resolve base and head snapshots concurrently; only the base walks the
/// ancestor fallback chain.
fn resolve_pair<S, A>(
    store: &S,
    ancestors: &A,
    pull_request: &PullRequest,
    fallback_depth: usize,
) -> Result<(Resolved, Resolved)>
where
    S: SnapshotStore + Sync,
    A: AncestorLookup + Sync,
{
    let resolver = SnapshotResolver::new(store, ancestors);

    std::thread::scope(|scope| {
        let base_handle = scope.spawn(|| resolver.resolve(&pull_request.base_sha, fallback_depth));
        let head_handle = scope.spawn(|| resolver.resolve(&pull_request.head_sha, 0));

        let base = base_handle
            .join()
            .map_err(|_| anyhow::anyhow!("Base snapshot resolution panicked"))??;
        let head = head_handle
            .join()
            .map_err(|_| anyhow::anyhow!("Head snapshot resolution panicked"))??;
        Ok((base, head))
    })
}

fn report_body(
    base: &Resolved,
    head_snapshot: &SizeSnapshot,
    config: &ConfigFile,
    store: &HttpSnapshotStore,
    pull_request: &PullRequest,
    build_number: Option<u64>,
) -> String {
    let empty = SizeSnapshot::new();
    let base_snapshot = base.snapshot.as_ref().unwrap_or(&empty);
    let result = diff_snapshots(base_snapshot, head_snapshot);

    let options = RenderOptions {
        track: config.track.clone(),
        max_details_lines: config.max_details_lines,
        details_url: Some(details_url(store, &pull_request.head_sha, build_number)),
    };

    let mut body = render_markdown(&result, &options);
    match &base.commit {
        None => {
            println!(
                "{} No baseline snapshot within {} ancestor commits",
                INFO, config.fallback_depth
            );
            body.push_str("\n> No baseline snapshot was found; all bundles are reported as new.\n");
        }
        Some(commit) if *commit != pull_request.base_sha => {
            println!(
                "{} Baseline fell back to ancestor {}",
                INFO,
                style(commit).dim()
            );
            body.push_str(&format!(
                "\n> Baseline taken from ancestor commit `{}`.\n",
                commit
            ));
        }
        Some(_) => {}
    }
    body
}

/// Deep link to the stored head artifacts, with the CI build number
/// appended when one was given.
fn details_url(store: &HttpSnapshotStore, head_sha: &str, build_number: Option<u64>) -> String {
    let url = store.url_for(head_sha);
    match build_number {
        Some(n) => format!("{}?build={}", url, n),
        None => url,
    }
}
