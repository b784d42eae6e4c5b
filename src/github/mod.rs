//! GitHub REST access and PR comment notification
//!
//! The client covers the three things CI runs need: pull-request metadata
//! (base/head shas), commit ancestry for baseline fallback, and issue
//! comments. The notifier sits on top of the comment API and keeps exactly
//! one report comment per (PR, dedupe id).

pub mod client;
pub mod notifier;

pub use client::{Comment, CommentApi, GithubClient, PullRequest};
pub use notifier::{comment_marker, notify};
