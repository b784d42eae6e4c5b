//! Idempotent PR comment posting
//!
//! A hidden HTML marker ties a comment to a dedupe id. Posting scans the
//! PR's comment pages newest-first for that marker and updates the match
//! instead of creating a second comment. The scan is bounded: it stops at
//! the first match, the first empty page, or after a fixed page budget.

use anyhow::Result;
use log::{debug, info};

use crate::github::client::CommentApi;

/// Hard cap on pages scanned when looking for an existing comment.
const MAX_SCAN_PAGES: usize = 10;

/// The hidden marker embedded in posted comments.
pub fn comment_marker(dedupe_id: &str) -> String {
    format!("<!-- sizewatch:{} -->", dedupe_id)
}

/// Post `body_markdown` on a PR, updating the existing comment carrying the
/// same dedupe marker if one exists. At most one report comment per
/// (PR, dedupe id) survives.
pub fn notify(
    api: &dyn CommentApi,
    pr_number: u64,
    dedupe_id: &str,
    body_markdown: &str,
) -> Result<()> {
    let marker = comment_marker(dedupe_id);
    let body = format!("{}\n{}", marker, body_markdown);

    match find_existing(api, pr_number, &marker)? {
        Some(comment_id) => {
            info!("updating existing report comment {} on #{}", comment_id, pr_number);
            api.update_comment(comment_id, &body)
        }
        None => {
            info!("creating report comment on #{}", pr_number);
            api.create_comment(pr_number, &body)
        }
    }
}

/// Newest-page-first scan for the most recent comment containing `marker`.
fn find_existing(api: &dyn CommentApi, pr_number: u64, marker: &str) -> Result<Option<u64>> {
    let last = api.last_page(pr_number)?.max(1);
    let first = last.saturating_sub(MAX_SCAN_PAGES - 1).max(1);

    for page in (first..=last).rev() {
        let comments = api.comments_page(pr_number, page)?;
        if comments.is_empty() {
            debug!("comment page {} empty, stopping scan", page);
            return Ok(None);
        }
        // Pages come back oldest-first; walk each page backwards so the
        // most recent match wins
        if let Some(comment) = comments.iter().rev().find(|c| c.body.contains(marker)) {
            return Ok(Some(comment.id));
        }
    }
    Ok(None)
}
