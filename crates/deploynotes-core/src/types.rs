//! Release notes data model

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author shown when commit details could not be fetched
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Kind of named entity in the deployment system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Top-level space
    Space,
    /// Project within a space
    Project,
    /// Environment within a space
    Environment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space => write!(f, "space"),
            Self::Project => write!(f, "project"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// An entity returned by a listing query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Opaque identifier (e.g. `Spaces-1`)
    pub id: String,
    /// Human-readable name
    pub name: String,
}

impl NamedEntity {
    /// Create a new named entity
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Human-readable coordinates of a deployment target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedScope {
    /// Space name
    pub space: String,
    /// Project name
    pub project: String,
    /// Environment name
    pub environment: String,
}

impl NamedScope {
    /// Create a new named scope
    pub fn new(
        space: impl Into<String>,
        project: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            space: space.into(),
            project: project.into(),
            environment: environment.into(),
        }
    }

    /// Name for the given entity kind
    pub fn name_of(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Space => &self.space,
            EntityKind::Project => &self.project,
            EntityKind::Environment => &self.environment,
        }
    }
}

/// Identifiers resolved from a [`NamedScope`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedScope {
    /// Space identifier
    pub space_id: String,
    /// Project identifier
    pub project_id: String,
    /// Environment identifier
    pub environment_id: String,
}

/// A deployment of a release to an environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Deployment identifier
    pub id: String,
    /// Release that was deployed
    pub release_id: String,
}

/// Reference to one package's build information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfoRef {
    /// Build information record identifier
    pub id: String,
    /// Package the record belongs to, when the release lists it
    pub package_id: Option<String>,
    /// Package version, when the release lists it
    pub version: Option<String>,
}

impl BuildInfoRef {
    /// Create a reference from an identifier alone
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            package_id: None,
            version: None,
        }
    }
}

/// A release record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Release identifier
    pub id: String,
    /// Free-form version string
    pub version: String,
    /// Parsed assembly time
    pub assembled_at: Option<DateTime<Utc>>,
    /// Assembly time exactly as reported upstream
    pub assembled_raw: Option<String>,
    /// Build information references in declaration order
    pub build_information: Vec<BuildInfoRef>,
}

impl Release {
    /// Create a release with no build information
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            assembled_at: None,
            assembled_raw: None,
            build_information: Vec::new(),
        }
    }

    /// Set the assembly timestamp from its upstream text form
    pub fn with_assembled(mut self, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        self.assembled_at = parse_timestamp(&raw);
        self.assembled_raw = Some(raw);
        self
    }

    /// Add a build information reference
    pub fn with_build_info(mut self, build_ref: BuildInfoRef) -> Self {
        self.build_information.push(build_ref);
        self
    }
}

/// A minimal commit reference attached to build information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommit {
    /// Full commit hash
    pub id: String,
    /// Short comment (usually the commit title)
    pub comment: String,
    /// Link to the commit on the source-control host
    pub link_url: Option<String>,
}

impl RawCommit {
    /// Create a new raw commit
    pub fn new(id: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            comment: comment.into(),
            link_url: None,
        }
    }

    /// Set the link URL
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link_url = Some(url.into());
        self
    }

    /// First seven characters of the id, or the whole id if shorter
    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }
}

/// Package metadata carried by a build information record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    /// Package identifier
    pub package_id: Option<String>,
    /// Package version
    pub version: Option<String>,
    /// CI build number
    pub build_number: Option<String>,
    /// CI build URL
    pub build_url: Option<String>,
    /// Source branch
    pub branch: Option<String>,
    /// Repository root URL
    pub vcs_root: Option<String>,
}

/// A fetched build information record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfoRecord {
    /// Record identifier
    pub id: String,
    /// Package metadata
    pub package: PackageSummary,
    /// Commits in the order the record lists them
    pub commits: Vec<RawCommit>,
}

/// Per-file change statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path of the file
    pub filename: String,
    /// Lines added
    pub additions: u64,
    /// Lines removed
    pub deletions: u64,
}

/// Change statistics for a commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
    /// Lines added
    pub additions: u64,
    /// Lines removed
    pub deletions: u64,
    /// Number of files touched
    pub files_changed: usize,
    /// Per-file breakdown, when requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileChange>,
}

/// Full commit detail fetched from a source-control host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetail {
    /// Commit hash
    pub sha: String,
    /// Author name
    pub author: String,
    /// Commit time
    pub committed_at: Option<DateTime<Utc>>,
    /// Full commit message
    pub message: String,
    /// Change statistics
    pub stats: Option<CommitStats>,
    /// Web URL of the commit
    pub html_url: Option<String>,
}

/// A commit with as much detail as could be gathered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedCommit {
    /// Full commit hash
    pub id: String,
    /// Comment from the build information record
    pub comment: String,
    /// Link to the commit
    pub link_url: Option<String>,
    /// Author name, `Unknown` when not enriched
    pub author: String,
    /// Commit time, unset when not enriched
    pub committed_at: Option<DateTime<Utc>>,
    /// Full message; first line is the title
    pub full_message: String,
    /// Change statistics
    pub stats: Option<CommitStats>,
    /// Whether details came from the source-control host
    pub enriched: bool,
}

impl EnrichedCommit {
    /// Fallback used when enrichment is skipped or fails
    pub fn from_raw(raw: RawCommit) -> Self {
        Self {
            full_message: raw.comment.clone(),
            id: raw.id,
            comment: raw.comment,
            link_url: raw.link_url,
            author: UNKNOWN_AUTHOR.to_string(),
            committed_at: None,
            stats: None,
            enriched: false,
        }
    }

    /// Combine a raw reference with fetched detail
    pub fn with_detail(raw: RawCommit, detail: CommitDetail) -> Self {
        let author = if detail.author.trim().is_empty() {
            UNKNOWN_AUTHOR.to_string()
        } else {
            detail.author
        };
        let full_message = if detail.message.trim().is_empty() {
            raw.comment.clone()
        } else {
            detail.message
        };

        Self {
            id: raw.id,
            comment: raw.comment,
            link_url: raw.link_url.or(detail.html_url),
            author,
            committed_at: detail.committed_at,
            full_message,
            stats: detail.stats,
            enriched: true,
        }
    }

    /// First line of the message
    pub fn title(&self) -> &str {
        self.full_message.lines().next().unwrap_or("").trim()
    }

    /// Message after the title, if any
    pub fn body(&self) -> Option<&str> {
        let (_, rest) = self.full_message.split_once('\n')?;
        let rest = rest.trim();
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }

    /// First seven characters of the id, or the whole id if shorter
    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }
}

/// Change category of a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// New feature
    Feature,
    /// Bug fix
    Fix,
    /// Performance, refactoring or other improvement
    Improvement,
    /// Anything else
    Other,
}

impl Classification {
    /// All categories in rendering order
    pub const ALL: [Classification; 4] = [
        Classification::Feature,
        Classification::Fix,
        Classification::Improvement,
        Classification::Other,
    ];

    /// Section heading for this category
    pub fn section_title(&self) -> &'static str {
        match self {
            Self::Feature => "Features",
            Self::Fix => "Bug Fixes",
            Self::Improvement => "Improvements",
            Self::Other => "Other Changes",
        }
    }

    /// Singular and plural noun used in summaries
    pub fn noun(&self) -> (&'static str, &'static str) {
        match self {
            Self::Feature => ("feature", "features"),
            Self::Fix => ("bug fix", "bug fixes"),
            Self::Improvement => ("improvement", "improvements"),
            Self::Other => ("other change", "other changes"),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feature => write!(f, "feature"),
            Self::Fix => write!(f, "fix"),
            Self::Improvement => write!(f, "improvement"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// An `owner/repo` pair on the source-control host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Repository owner or organization
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoRef {
    /// Create a new repository reference
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse an `owner/repo` string
    pub fn parse(value: &str) -> Option<Self> {
        let (owner, repo) = value.trim().split_once('/')?;
        if !is_path_segment(owner) || !is_path_segment(repo) {
            return None;
        }
        Some(Self::new(owner, repo))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Check that a value is usable as a single owner or repository segment
pub fn is_path_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Parse an ISO-8601 timestamp into UTC.
///
/// Accepts a trailing `Z`, an explicit offset, or no offset at all (taken as
/// UTC). `2025-10-19T20:38:50Z` and `2025-10-19T20:38:50+00:00` yield the same
/// instant.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    // git-style "2025-10-19 20:38:50 +0000"
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn short_id(id: &str) -> String {
    id.chars().take(7).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_zulu_and_offset_agree() {
        let zulu = parse_timestamp("2025-10-19T20:38:50.111Z").unwrap();
        let offset = parse_timestamp("2025-10-19T20:38:50.111+00:00").unwrap();
        assert_eq!(zulu, offset);
    }

    #[test]
    fn test_parse_timestamp_non_utc_offset() {
        let parsed = parse_timestamp("2025-10-19T22:38:50+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 10, 19, 20, 38, 50).unwrap());
    }

    #[test]
    fn test_parse_timestamp_without_offset() {
        let parsed = parse_timestamp("2025-10-19T20:38:50").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 10, 19, 20, 38, 50).unwrap());
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_short_id() {
        let commit = RawCommit::new("7bc3c67b83d8124fbaf4c5adfae805592fb0385b", "Updated context");
        assert_eq!(commit.short_id(), "7bc3c67");

        let short = RawCommit::new("abc12", "tiny");
        assert_eq!(short.short_id(), "abc12");
    }

    #[test]
    fn test_from_raw_fallback() {
        let raw = RawCommit::new("abc1234567", "Updated context")
            .with_link("https://github.com/Org/Repo/commit/abc1234567");
        let commit = EnrichedCommit::from_raw(raw);

        assert_eq!(commit.author, UNKNOWN_AUTHOR);
        assert!(commit.committed_at.is_none());
        assert_eq!(commit.title(), "Updated context");
        assert!(!commit.enriched);
        assert!(commit.link_url.is_some());
    }

    #[test]
    fn test_with_detail_splits_title_and_body() {
        let raw = RawCommit::new("abc1234567", "short");
        let detail = CommitDetail {
            sha: "abc1234567".to_string(),
            author: "Alice".to_string(),
            committed_at: parse_timestamp("2025-10-22T14:20:00Z"),
            message: "feat: add thing\n\nLonger explanation".to_string(),
            stats: Some(CommitStats {
                additions: 10,
                deletions: 2,
                files_changed: 1,
                files: Vec::new(),
            }),
            html_url: Some("https://github.com/o/r/commit/abc1234567".to_string()),
        };

        let commit = EnrichedCommit::with_detail(raw, detail);
        assert_eq!(commit.title(), "feat: add thing");
        assert_eq!(commit.body(), Some("Longer explanation"));
        assert_eq!(commit.author, "Alice");
        assert_eq!(
            commit.link_url.as_deref(),
            Some("https://github.com/o/r/commit/abc1234567")
        );
        assert!(commit.enriched);
    }

    #[test]
    fn test_with_detail_blank_author_defaults() {
        let detail = CommitDetail {
            sha: "abc1234".to_string(),
            author: "  ".to_string(),
            committed_at: None,
            message: String::new(),
            stats: None,
            html_url: None,
        };
        let commit = EnrichedCommit::with_detail(RawCommit::new("abc1234", "comment"), detail);
        assert_eq!(commit.author, UNKNOWN_AUTHOR);
        assert_eq!(commit.title(), "comment");
    }

    #[test]
    fn test_repo_ref_parse() {
        assert_eq!(RepoRef::parse("Org/Repo"), Some(RepoRef::new("Org", "Repo")));
        assert!(RepoRef::parse("no-slash").is_none());
        assert!(RepoRef::parse("a/b/c").is_none());
        assert!(RepoRef::parse("../repo").is_none());
    }

    #[test]
    fn test_release_with_assembled() {
        let release = Release::new("Releases-1", "1.2.3").with_assembled("2025-10-23T10:30:00.000Z");
        assert!(release.assembled_at.is_some());
        assert_eq!(release.assembled_raw.as_deref(), Some("2025-10-23T10:30:00.000Z"));
    }
}
