//! GitHub REST resources

use serde::Deserialize;

use deploynotes_core::{parse_timestamp, CommitDetail, CommitStats, FileChange, UNKNOWN_AUTHOR};

/// Response of `GET /repos/{owner}/{repo}/commits/{sha}`
#[derive(Debug, Deserialize)]
pub(crate) struct CommitResponse {
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub commit: GitCommit,
    #[serde(default)]
    pub author: Option<UserAccount>,
    #[serde(default)]
    pub stats: Option<Stats>,
    #[serde(default)]
    pub files: Option<Vec<FileEntry>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitCommit {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Option<GitActor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitActor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserAccount {
    #[serde(default)]
    pub login: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Stats {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileEntry {
    pub filename: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

impl CommitResponse {
    /// Convert into a [`CommitDetail`], keeping per-file entries if asked
    pub fn into_detail(self, include_files: bool) -> CommitDetail {
        let actor = self.commit.author;
        let author = actor
            .as_ref()
            .and_then(|a| a.name.clone())
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.author.and_then(|u| u.login))
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        let committed_at = actor
            .as_ref()
            .and_then(|a| a.date.as_deref())
            .and_then(parse_timestamp);

        let files = self.files.unwrap_or_default();
        let stats = self.stats.map(|s| CommitStats {
            additions: s.additions,
            deletions: s.deletions,
            files_changed: files.len(),
            files: if include_files {
                files
                    .iter()
                    .map(|f| FileChange {
                        filename: f.filename.clone(),
                        additions: f.additions,
                        deletions: f.deletions,
                    })
                    .collect()
            } else {
                Vec::new()
            },
        });

        CommitDetail {
            sha: self.sha,
            author,
            committed_at,
            message: self.commit.message,
            stats,
            html_url: self.html_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMIT_JSON: &str = r#"{
        "sha": "7bc3c67b83d8124fbaf4c5adfae805592fb0385b",
        "html_url": "https://github.com/Org/Repo/commit/7bc3c67b83d8124fbaf4c5adfae805592fb0385b",
        "commit": {
            "message": "Fix authentication token refresh logic\n\nTokens now refresh early.",
            "author": {"name": "Bob Smith", "email": "bob@example.com", "date": "2025-10-21T09:15:00Z"}
        },
        "author": {"login": "bsmith"},
        "stats": {"total": 12, "additions": 10, "deletions": 2},
        "files": [
            {"filename": "src/auth.rs", "additions": 8, "deletions": 2, "status": "modified"},
            {"filename": "tests/auth.rs", "additions": 2, "deletions": 0, "status": "added"}
        ]
    }"#;

    #[test]
    fn test_into_detail() {
        let response: CommitResponse = serde_json::from_str(COMMIT_JSON).unwrap();
        let detail = response.into_detail(true);

        assert_eq!(detail.author, "Bob Smith");
        assert!(detail.committed_at.is_some());
        let stats = detail.stats.unwrap();
        assert_eq!(stats.additions, 10);
        assert_eq!(stats.files_changed, 2);
        assert_eq!(stats.files[0].filename, "src/auth.rs");
    }

    #[test]
    fn test_into_detail_without_files() {
        let response: CommitResponse = serde_json::from_str(COMMIT_JSON).unwrap();
        let stats = response.into_detail(false).stats.unwrap();
        assert_eq!(stats.files_changed, 2);
        assert!(stats.files.is_empty());
    }

    #[test]
    fn test_author_falls_back_to_login() {
        let json = r#"{"sha": "abc1234", "commit": {"message": "x", "author": {"name": ""}}, "author": {"login": "octocat"}}"#;
        let response: CommitResponse = serde_json::from_str(json).unwrap();
        let detail = response.into_detail(false);
        assert_eq!(detail.author, "octocat");
        assert!(detail.stats.is_none());
    }
}
