//! Commit enrichment
//!
//! Each raw commit is looked up on the commit source. Lookups that are
//! skipped, fail or time out fall back to the build information fields; none
//! of them abort the run.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use deploynotes_core::{CommitDetail, Config, EnrichedCommit, RawCommit, RepoRef};
use deploynotes_sources::{parse_commit_link, CommitSource, SourceError};

/// Commit ids worth sending to the commit source
static COMMIT_SHA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{7,40}$").expect("Invalid regex"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Adds author, date, message and statistics to raw commits
pub struct CommitEnricher {
    source: Option<Arc<dyn CommitSource>>,
    expected_host: String,
    default_repository: Option<RepoRef>,
    concurrency: usize,
    timeout: Duration,
}

impl CommitEnricher {
    /// Create an enricher trusting commit links on `expected_host`
    pub fn new(source: Option<Arc<dyn CommitSource>>, expected_host: impl Into<String>) -> Self {
        Self {
            source,
            expected_host: expected_host.into(),
            default_repository: None,
            concurrency: 1,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create an enricher from the `github` and `pipeline` config sections
    pub fn from_config(source: Option<Arc<dyn CommitSource>>, config: &Config) -> Self {
        let default_repository = config
            .github
            .default_repository
            .as_deref()
            .and_then(RepoRef::parse);

        Self::new(source, config.github.host.clone())
            .with_default_repository(default_repository)
            .with_concurrency(config.pipeline.enrichment_concurrency)
            .with_timeout(Duration::from_millis(config.pipeline.enrichment_timeout_ms))
    }

    /// Repository used for commits that carry no link
    pub fn with_default_repository(mut self, repo: Option<RepoRef>) -> Self {
        self.default_repository = repo;
        self
    }

    /// Maximum lookups in flight; 1 is sequential
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Time budget for a single lookup
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Repository a commit belongs to.
    ///
    /// A link on any host other than the expected one yields `None` rather
    /// than falling back to the default repository.
    pub fn repo_hint(&self, commit: &RawCommit) -> Option<RepoRef> {
        match commit.link_url.as_deref() {
            Some(link) => {
                let hint = parse_commit_link(link, &self.expected_host);
                if hint.is_none() {
                    warn!(
                        commit = %commit.short_id(),
                        link,
                        expected_host = %self.expected_host,
                        "commit link is not a recognized commit URL, not enriching"
                    );
                }
                hint
            }
            None => self.default_repository.clone(),
        }
    }

    /// Enrich commits one-to-one, preserving order
    #[instrument(skip(self, commits), fields(commit_count = commits.len(), concurrency = self.concurrency))]
    pub async fn enrich(&self, commits: Vec<RawCommit>) -> Vec<EnrichedCommit> {
        let Some(source) = self.source.as_deref().filter(|s| s.is_available()) else {
            info!("no commit source available, using build information only");
            return commits.into_iter().map(EnrichedCommit::from_raw).collect();
        };

        // `buffered` yields in input order regardless of completion order
        let enriched: Vec<EnrichedCommit> = stream::iter(commits)
            .map(|raw| self.enrich_one(source, raw))
            .buffered(self.concurrency)
            .collect()
            .await;

        info!(
            source = source.name(),
            enriched = enriched.iter().filter(|c| c.enriched).count(),
            total = enriched.len(),
            "commit enrichment finished"
        );
        enriched
    }

    async fn enrich_one(&self, source: &dyn CommitSource, raw: RawCommit) -> EnrichedCommit {
        if !COMMIT_SHA_REGEX.is_match(&raw.id) {
            debug!(commit = %raw.id, "id is not a commit hash, not enriching");
            return EnrichedCommit::from_raw(raw);
        }

        let repo = if source.requires_repository() {
            match self.repo_hint(&raw) {
                Some(repo) => Some(repo),
                None => {
                    debug!(commit = %raw.short_id(), "no repository for commit, not enriching");
                    return EnrichedCommit::from_raw(raw);
                }
            }
        } else {
            None
        };

        match self.lookup(source, repo.as_ref(), &raw.id).await {
            Ok(detail) => EnrichedCommit::with_detail(raw, detail),
            Err(e) => {
                warn!(
                    commit = %raw.short_id(),
                    error = %e,
                    "commit enrichment failed, using build information"
                );
                EnrichedCommit::from_raw(raw)
            }
        }
    }

    /// One lookup bounded by the per-call timeout
    async fn lookup(
        &self,
        source: &dyn CommitSource,
        repo: Option<&RepoRef>,
        sha: &str,
    ) -> deploynotes_sources::Result<CommitDetail> {
        tokio::time::timeout(self.timeout, source.get_commit(repo, sha))
            .await
            .unwrap_or_else(|_| {
                Err(SourceError::Timeout(format!(
                    "commit {} after {}ms",
                    sha,
                    self.timeout.as_millis()
                )))
            })
    }
}
