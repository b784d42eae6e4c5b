//! GitHub REST API client

use anyhow::{Context, Result};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

use crate::store::AncestorLookup;

const DEFAULT_API_ROOT: &str = "https://api.github.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Comments per page when listing; GitHub's maximum.
pub const COMMENTS_PER_PAGE: usize = 100;

/// Pull-request metadata needed for snapshot resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Sha of the merge-base side (the branch the PR targets)
    pub base_sha: String,
    /// Sha of the PR's latest commit
    pub head_sha: String,
}

/// One issue comment, reduced to what the notifier needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// GitHub's comment id, used for updates
    pub id: u64,
    /// Raw Markdown body
    pub body: String,
}

/// Issue-comment operations, injected into the notifier so its dedupe logic
/// is testable against a fake.
pub trait CommentApi {
    /// Index of the last comment page for a PR (1-based; 1 when empty).
    fn last_page(&self, pr_number: u64) -> Result<usize>;
    /// One page of comments, oldest-first as GitHub returns them.
    fn comments_page(&self, pr_number: u64, page: usize) -> Result<Vec<Comment>>;
    /// Create a new comment on a PR.
    fn create_comment(&self, pr_number: u64, body: &str) -> Result<()>;
    /// Replace the body of an existing comment.
    fn update_comment(&self, comment_id: u64, body: &str) -> Result<()>;
}

#[derive(Deserialize)]
struct RawPullRequest {
    number: u64,
    base: RawRef,
    head: RawRef,
}

#[derive(Deserialize)]
struct RawRef {
    sha: String,
}

#[derive(Deserialize)]
struct RawComment {
    id: u64,
    #[serde(default)]
    body: String,
}

#[derive(Deserialize)]
struct RawCommit {
    sha: String,
}

/// REST client for one repository.
pub struct GithubClient {
    repo: String,
    api_root: String,
    token: Option<String>,
    agent: ureq::Agent,
}

impl GithubClient {
    /// Create a client for `repo` (an `owner/name` slug). Reads the token
    /// from `GITHUB_TOKEN` and the API root from `GITHUB_API_URL`, matching
    /// the variables GitHub Actions injects.
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            api_root: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_ROOT.to_string()),
            token: std::env::var("GITHUB_TOKEN").ok(),
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }

    /// Override the API root, used by tests pointing at a local server.
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_root.trim_end_matches('/'),
            self.repo,
            path
        )
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let mut req = self
            .agent
            .request(method, url)
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", concat!("sizewatch/", env!("CARGO_PKG_VERSION")));
        if let Some(token) = &self.token {
            req = req.set("Authorization", &format!("Bearer {}", token));
        }
        req
    }

    /// Fetch the base and head shas of a pull request.
    pub fn pull_request(&self, number: u64) -> Result<PullRequest> {
        let url = self.url(&format!("pulls/{}", number));
        debug!("GET {}", url);
        let raw: RawPullRequest = self
            .request("GET", &url)
            .call()
            .with_context(|| format!("Failed to fetch pull request #{}", number))?
            .into_json()
            .with_context(|| format!("Malformed pull request payload for #{}", number))?;
        Ok(PullRequest {
            number: raw.number,
            base_sha: raw.base.sha,
            head_sha: raw.head.sha,
        })
    }
}

impl CommentApi for GithubClient {
    fn last_page(&self, pr_number: u64) -> Result<usize> {
        let url = self.url(&format!(
            "issues/{}/comments?per_page={}&page=1",
            pr_number, COMMENTS_PER_PAGE
        ));
        let response = self
            .request("GET", &url)
            .call()
            .with_context(|| format!("Failed to list comments on #{}", pr_number))?;

        match response.header("link") {
            Some(link) => Ok(parse_last_page(link).unwrap_or(1)),
            None => Ok(1),
        }
    }

    fn comments_page(&self, pr_number: u64, page: usize) -> Result<Vec<Comment>> {
        let url = self.url(&format!(
            "issues/{}/comments?per_page={}&page={}",
            pr_number, COMMENTS_PER_PAGE, page
        ));
        debug!("GET {}", url);
        let raw: Vec<RawComment> = self
            .request("GET", &url)
            .call()
            .with_context(|| format!("Failed to list comments on #{}", pr_number))?
            .into_json()
            .context("Malformed comment list payload")?;
        Ok(raw
            .into_iter()
            .map(|c| Comment {
                id: c.id,
                body: c.body,
            })
            .collect())
    }

    fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        let url = self.url(&format!("issues/{}/comments", pr_number));
        self.request("POST", &url)
            .send_json(ureq::json!({ "body": body }))
            .with_context(|| format!("Failed to create comment on #{}", pr_number))?;
        Ok(())
    }

    fn update_comment(&self, comment_id: u64, body: &str) -> Result<()> {
        let url = self.url(&format!("issues/comments/{}", comment_id));
        self.request("PATCH", &url)
            .send_json(ureq::json!({ "body": body }))
            .with_context(|| format!("Failed to update comment {}", comment_id))?;
        Ok(())
    }
}

impl AncestorLookup for GithubClient {
    /// First-parent-ish ancestry via the commits listing API: the first
    /// item is the commit itself and is skipped.
    fn ancestors(&self, commit: &str, depth: usize) -> Result<Vec<String>> {
        let url = self.url(&format!("commits?sha={}&per_page={}", commit, depth + 1));
        debug!("GET {}", url);
        let raw: Vec<RawCommit> = self
            .request("GET", &url)
            .call()
            .with_context(|| format!("Failed to list ancestors of {}", commit))?
            .into_json()
            .context("Malformed commit list payload")?;
        Ok(raw
            .into_iter()
            .map(|c| c.sha)
            .filter(|sha| sha != commit)
            .take(depth)
            .collect())
    }
}

/// Extract the page number from the `rel="last"` entry of a Link header.
fn parse_last_page(link_header: &str) -> Option<usize> {
    static LAST_PAGE_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = LAST_PAGE_RE
        .get_or_init(|| Regex::new(r#"[?&]page=(\d+)[^>]*>;\s*rel="last""#).ok())
        .as_ref()?;
    re.captures(link_header)?
        .get(1)?
        .as_str()
        .parse::<usize>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_last_page_from_link_header() {
        let header = "<https://api.github.com/repos/acme/widgets/issues/7/comments?per_page=100&page=2>; rel=\"next\", <https://api.github.com/repos/acme/widgets/issues/7/comments?per_page=100&page=9>; rel=\"last\"";
        assert_eq!(parse_last_page(header), Some(9));
    }

    #[test]
    fn test_parse_last_page_is_reusable_across_headers() {
        // The compiled pattern is shared; each call still matches its own
        // input
        assert_eq!(parse_last_page("<https://x?page=3>; rel=\"last\""), Some(3));
        assert_eq!(parse_last_page("<https://x?page=12>; rel=\"last\""), Some(12));
    }

    #[test]
    fn test_parse_last_page_without_last_rel() {
        let header = "<https://api.github.com/x?page=3>; rel=\"prev\"";
        assert_eq!(parse_last_page(header), None);
    }

    #[test]
    fn test_url_layout() {
        let client = GithubClient::new("acme/widgets").with_api_root("https://api.example.com/");
        assert_eq!(
            client.url("pulls/42"),
            "https://api.example.com/repos/acme/widgets/pulls/42"
        );
    }
}
