//! Local git commit source
//!
//! Reads commit detail from a local checkout instead of the hosting API. The
//! checkout must already contain the release's commits (e.g. a CI workspace).

use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use git2::{DiffStats, Repository};
use tracing::{debug, instrument};

use deploynotes_core::{CommitDetail, CommitStats, FileChange, RepoRef, UNKNOWN_AUTHOR};

use crate::error::{Result, SourceError};
use crate::traits::CommitSource;

/// Commit source backed by a local git repository
pub struct LocalGitSource {
    path: PathBuf,
    include_files: bool,
}

impl LocalGitSource {
    /// Create a source for the repository containing `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            include_files: true,
        }
    }

    /// Set whether per-file statistics are collected
    pub fn with_files(mut self, include_files: bool) -> Self {
        self.include_files = include_files;
        self
    }
}

#[async_trait::async_trait]
impl CommitSource for LocalGitSource {
    fn name(&self) -> &str {
        "local git"
    }

    fn is_available(&self) -> bool {
        self.path.exists()
    }

    fn requires_repository(&self) -> bool {
        false
    }

    #[instrument(skip(self, _repo), fields(path = %self.path.display()))]
    async fn get_commit(&self, _repo: Option<&RepoRef>, sha: &str) -> Result<CommitDetail> {
        let path = self.path.clone();
        let sha = sha.to_string();
        let include_files = self.include_files;

        tokio::task::spawn_blocking(move || read_commit(&path, &sha, include_files))
            .await
            .map_err(|e| SourceError::Other(format!("git lookup task failed: {}", e)))?
    }
}

fn read_commit(path: &Path, sha: &str, include_files: bool) -> Result<CommitDetail> {
    let repo = Repository::discover(path)?;
    let commit = repo
        .revparse_single(sha)
        .and_then(|object| object.peel_to_commit())
        .map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                SourceError::NotFound(format!("commit {} in {}", sha, path.display()))
            } else {
                SourceError::Git(e)
            }
        })?;

    let tree = commit.tree()?;
    let parent_tree = match commit.parent(0) {
        Ok(parent) => Some(parent.tree()?),
        Err(_) => None,
    };
    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    let diff_stats: DiffStats = diff.stats()?;

    let mut files = Vec::new();
    if include_files {
        for idx in 0..diff.deltas().len() {
            let Some(patch) = git2::Patch::from_diff(&diff, idx)? else {
                continue;
            };
            let (_, additions, deletions) = patch.line_stats()?;
            let delta = patch.delta();
            let filename = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            files.push(FileChange {
                filename,
                additions: additions as u64,
                deletions: deletions as u64,
            });
        }
    }

    let author = commit
        .author()
        .name()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string();
    let committed_at = Utc.timestamp_opt(commit.time().seconds(), 0).single();

    debug!(sha, files = diff_stats.files_changed(), "read local commit");

    Ok(CommitDetail {
        sha: commit.id().to_string(),
        author,
        committed_at,
        message: commit.message().unwrap_or_default().to_string(),
        stats: Some(CommitStats {
            additions: diff_stats.insertions() as u64,
            deletions: diff_stats.deletions() as u64,
            files_changed: diff_stats.files_changed(),
            files,
        }),
        html_url: None,
    })
}
