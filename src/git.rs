//! Git metadata for snapshot keying and baseline fallback

use crate::infra::{CommandExecutor, RealCommandExecutor};
use crate::store::AncestorLookup;
use thiserror::Error;

/// Git operation errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command failed with an error message
    #[error("Git command failed: {0}")]
    CommandFailed(String),

    /// Git output contained invalid UTF-8
    #[error("Invalid UTF-8 in git output")]
    InvalidUtf8,

    /// IO error occurred while executing git command
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Git repository interface with dependency injection for testability
pub struct GitRepository<CE: CommandExecutor = RealCommandExecutor> {
    cmd_executor: CE,
}

impl GitRepository<RealCommandExecutor> {
    /// Create a new GitRepository with real command execution
    pub fn new() -> Self {
        Self {
            cmd_executor: RealCommandExecutor,
        }
    }
}

impl Default for GitRepository<RealCommandExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<CE: CommandExecutor> GitRepository<CE> {
    /// Create a GitRepository with a custom command executor (for testing)
    pub fn with_executor(cmd_executor: CE) -> Self {
        Self { cmd_executor }
    }

    /// Get the full commit hash of HEAD.
    ///
    /// Returns `Ok(Some(hash))` if in a git repository,
    /// `Ok(None)` if not in a git repository or git is not installed,
    /// `Err(GitError)` if git fails unexpectedly.
    pub fn head_commit(&self) -> Result<Option<String>, GitError> {
        let output = match self
            .cmd_executor
            .execute(|cmd| cmd.args(["rev-parse", "HEAD"]), "git")
        {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None);
            }
            Err(e) => return Err(GitError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("not a git repository") {
                return Ok(None);
            }
            return Err(GitError::CommandFailed(stderr.to_string()));
        }

        let hash = String::from_utf8(output.stdout)
            .map_err(|_| GitError::InvalidUtf8)?
            .trim()
            .to_string();

        Ok(Some(hash))
    }

    /// First-parent ancestors of `commit`, nearest first, excluding the
    /// commit itself. Shallow clones may return fewer than `depth` entries.
    pub fn first_parent_ancestors(
        &self,
        commit: &str,
        depth: usize,
    ) -> Result<Vec<String>, GitError> {
        let max_count = depth.to_string();
        let output = self.cmd_executor.execute(
            |cmd| {
                cmd.args([
                    "rev-list",
                    "--first-parent",
                    "--skip=1",
                    "--max-count",
                    &max_count,
                    commit,
                ])
            },
            "git",
        )?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed(stderr.to_string()));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| GitError::InvalidUtf8)?;
        Ok(stdout.lines().map(|l| l.trim().to_string()).collect())
    }
}

impl<CE: CommandExecutor> AncestorLookup for GitRepository<CE> {
    fn ancestors(&self, commit: &str, depth: usize) -> anyhow::Result<Vec<String>> {
        Ok(self.first_parent_ancestors(commit, depth)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::CommandExecutor;
    use std::process::{Command, ExitStatus, Output};

    struct MockCommandExecutor {
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    }

    impl CommandExecutor for MockCommandExecutor {
        fn status(&self, _cmd: &mut Command) -> std::io::Result<ExitStatus> {
            unimplemented!()
        }

        fn output(&self, _cmd: &mut Command) -> std::io::Result<Output> {
            Ok(Output {
                status: ExitStatus::default(),
                stdout: self.stdout.clone(),
                stderr: self.stderr.clone(),
            })
        }
    }

    #[test]
    fn test_head_commit_success() {
        let mock = MockCommandExecutor {
            stdout: b"a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4e5f6a1b2\n".to_vec(),
            stderr: vec![],
        };
        let repo = GitRepository::with_executor(mock);

        let result = repo.head_commit().unwrap();
        assert_eq!(
            result,
            Some("a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4e5f6a1b2".to_string())
        );
    }

    #[test]
    fn test_ancestors_parses_rev_list_lines() {
        let mock = MockCommandExecutor {
            stdout: b"aaa111\nbbb222\nccc333\n".to_vec(),
            stderr: vec![],
        };
        let repo = GitRepository::with_executor(mock);

        let ancestors = repo.first_parent_ancestors("head", 3).unwrap();
        assert_eq!(ancestors, vec!["aaa111", "bbb222", "ccc333"]);
    }

    #[test]
    fn test_ancestors_empty_history() {
        let mock = MockCommandExecutor {
            stdout: vec![],
            stderr: vec![],
        };
        let repo = GitRepository::with_executor(mock);

        let ancestors = repo.first_parent_ancestors("head", 5).unwrap();
        assert!(ancestors.is_empty());
    }

    // Integration tests with real git
    #[test]
    fn test_head_commit_returns_option() {
        let repo = GitRepository::new();
        let _ = repo.head_commit();
    }

    #[test]
    fn test_head_commit_format_validation() {
        let repo = GitRepository::new();
        if let Ok(Some(hash)) = repo.head_commit() {
            assert_eq!(hash.len(), 40, "Full hash should be 40 chars: {}", hash);
            assert!(
                hash.chars().all(|c| c.is_ascii_hexdigit()),
                "Hash contains non-hex characters: {}",
                hash
            );
        }
    }
}
