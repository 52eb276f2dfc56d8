//! Release notes document model
//!
//! A [`ReleaseNotesDocument`] is assembled fresh for every run from the
//! release, the packages it was built from and the classified commits. It
//! carries no generation timestamp, so building it twice from the same input
//! yields equal documents.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use deploynotes_core::{Classification, EnrichedCommit, NamedScope, PackageSummary, Release};

use crate::classifier::ClassifiedCommit;

/// Header information for the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotesMetadata {
    /// Document title
    pub title: String,
    /// Project name
    pub project: String,
    /// Environment name
    pub environment: String,
    /// Space name
    pub space: String,
    /// Release identifier
    pub release_id: String,
    /// Release version
    pub version: String,
    /// Parsed assembly time of the release
    pub released_at: Option<DateTime<Utc>>,
    /// Assembly time as reported upstream
    pub released_raw: Option<String>,
}

/// Commits of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteSection {
    /// Category of every commit in this section
    pub classification: Classification,
    /// Heading text
    pub title: String,
    /// Commits in aggregation order
    pub commits: Vec<EnrichedCommit>,
}

/// A complete set of release notes, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseNotesDocument {
    /// Header information
    pub metadata: NotesMetadata,
    /// Packages whose build information was read
    pub packages: Vec<PackageSummary>,
    /// Non-empty sections in fixed category order
    pub sections: Vec<NoteSection>,
    /// Number of aggregated commits, excluded ones included
    pub total_commits: usize,
    /// Number of commits filtered out
    pub skipped_commits: usize,
    /// Included commits in aggregation order
    pub details: Vec<EnrichedCommit>,
    /// Authors of included commits, sorted and deduplicated
    pub contributors: Vec<String>,
}

impl ReleaseNotesDocument {
    /// Assemble a document.
    ///
    /// `title` overrides the default title, which is the project name.
    #[instrument(skip_all, fields(release = %release.id, commit_count = commits.len()))]
    pub fn build(
        release: &Release,
        scope: &NamedScope,
        packages: Vec<PackageSummary>,
        commits: Vec<ClassifiedCommit>,
        title: Option<&str>,
    ) -> Self {
        let total_commits = commits.len();
        let (included, skipped): (Vec<_>, Vec<_>) = commits.into_iter().partition(|c| c.included);

        let sections: Vec<NoteSection> = Classification::ALL
            .iter()
            .filter_map(|category| {
                let members: Vec<EnrichedCommit> = included
                    .iter()
                    .filter(|c| c.classification == *category)
                    .map(|c| c.commit.clone())
                    .collect();
                (!members.is_empty()).then(|| NoteSection {
                    classification: *category,
                    title: category.section_title().to_string(),
                    commits: members,
                })
            })
            .collect();

        let contributors: Vec<String> = included
            .iter()
            .map(|c| c.commit.author.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let details: Vec<EnrichedCommit> = included.into_iter().map(|c| c.commit).collect();

        debug!(
            sections = sections.len(),
            included = details.len(),
            skipped = skipped.len(),
            "release notes document built"
        );

        Self {
            metadata: NotesMetadata {
                title: title.unwrap_or(&scope.project).to_string(),
                project: scope.project.clone(),
                environment: scope.environment.clone(),
                space: scope.space.clone(),
                release_id: release.id.clone(),
                version: release.version.clone(),
                released_at: release.assembled_at,
                released_raw: release.assembled_raw.clone(),
            },
            packages,
            sections,
            total_commits,
            skipped_commits: skipped.len(),
            details,
            contributors,
        }
    }

    /// Number of commits that appear in the sections
    pub fn included_commits(&self) -> usize {
        self.total_commits - self.skipped_commits
    }

    /// Section for a category, if it has members
    pub fn section(&self, classification: Classification) -> Option<&NoteSection> {
        self.sections
            .iter()
            .find(|s| s.classification == classification)
    }

    /// True when the release carried no commits at all
    pub fn is_empty(&self) -> bool {
        self.total_commits == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{CommitClassifier, PolicyClassifier};
    use deploynotes_core::{CommitDetail, RawCommit};

    fn scope() -> NamedScope {
        NamedScope::new("Default", "Web", "Production")
    }

    fn enriched(id: &str, message: &str, author: &str) -> EnrichedCommit {
        EnrichedCommit::with_detail(
            RawCommit::new(id, message),
            CommitDetail {
                sha: id.to_string(),
                author: author.to_string(),
                committed_at: None,
                message: message.to_string(),
                stats: None,
                html_url: None,
            },
        )
    }

    fn build(commits: Vec<EnrichedCommit>) -> ReleaseNotesDocument {
        let classified = PolicyClassifier::default().classify(commits);
        let release = Release::new("Releases-1", "1.2.3").with_assembled("2025-10-23T10:30:00Z");
        ReleaseNotesDocument::build(&release, &scope(), Vec::new(), classified, None)
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let doc = build(vec![
            enriched("a000001", "Update dependencies", "Carol"),
            enriched("a000002", "fix: crash on start", "Bob"),
            enriched("a000003", "feat: new dashboard", "Alice"),
        ]);

        let order: Vec<Classification> = doc.sections.iter().map(|s| s.classification).collect();
        assert_eq!(
            order,
            vec![
                Classification::Feature,
                Classification::Fix,
                Classification::Other
            ]
        );
        assert!(doc.section(Classification::Improvement).is_none());
    }

    #[test]
    fn test_skipped_commits_counted_not_listed() {
        let doc = build(vec![
            enriched("a000001", "Merge pull request #3 from org/feature", "Alice"),
            enriched("a000002", "feat: search", "Bob"),
        ]);

        assert_eq!(doc.total_commits, 2);
        assert_eq!(doc.skipped_commits, 1);
        assert_eq!(doc.included_commits(), 1);
        assert_eq!(doc.details.len(), 1);
        assert_eq!(doc.contributors, vec!["Bob".to_string()]);
    }

    #[test]
    fn test_contributors_sorted_and_deduplicated() {
        let doc = build(vec![
            enriched("a000001", "feat: one", "Zed"),
            enriched("a000002", "feat: two", "Alice"),
            enriched("a000003", "fix: three", "Zed"),
        ]);
        assert_eq!(doc.contributors, vec!["Alice".to_string(), "Zed".to_string()]);
    }

    #[test]
    fn test_metadata() {
        let doc = build(Vec::new());
        assert!(doc.is_empty());
        assert!(doc.sections.is_empty());
        assert_eq!(doc.metadata.title, "Web");
        assert_eq!(doc.metadata.version, "1.2.3");
        assert!(doc.metadata.released_at.is_some());

        let release = Release::new("Releases-1", "1.2.3");
        let doc = ReleaseNotesDocument::build(&release, &scope(), Vec::new(), Vec::new(), Some("Web App"));
        assert_eq!(doc.metadata.title, "Web App");
        assert!(doc.metadata.released_raw.is_none());
    }

    #[test]
    fn test_document_serializes() {
        let doc = build(vec![enriched("a000001", "feat: one", "Alice")]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["metadata"]["version"], "1.2.3");
        assert_eq!(json["sections"][0]["classification"], "feature");
    }
}
