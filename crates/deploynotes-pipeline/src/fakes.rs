//! In-memory sources for pipeline tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use deploynotes_core::{
    BuildInfoRecord, CommitDetail, Deployment, NamedEntity, PackageSummary, RawCommit, Release,
    RepoRef, ResolvedScope,
};
use deploynotes_sources::{CommitSource, DeploymentSource, Result, SourceError};

/// Deployment system backed by maps
#[derive(Default)]
pub struct FakeDeployments {
    pub spaces: Vec<NamedEntity>,
    pub projects: Vec<NamedEntity>,
    pub environments: Vec<NamedEntity>,
    pub deployment: Option<Deployment>,
    pub releases: HashMap<String, Release>,
    pub build_info: HashMap<String, BuildInfoRecord>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeDeployments {
    /// One space, project and environment with a single deployed release
    pub fn standard(release: Release) -> Self {
        let mut fake = Self {
            spaces: vec![NamedEntity::new("Spaces-1", "Default")],
            projects: vec![
                NamedEntity::new("Projects-1", "Web"),
                NamedEntity::new("Projects-2", "Api"),
            ],
            environments: vec![
                NamedEntity::new("Environments-1", "Staging"),
                NamedEntity::new("Environments-2", "Production"),
            ],
            deployment: Some(Deployment {
                id: "Deployments-1".to_string(),
                release_id: release.id.clone(),
            }),
            ..Self::default()
        };
        fake.releases.insert(release.id.clone(), release);
        fake
    }

    pub fn with_build_info(mut self, id: &str, package: &str, commits: Vec<RawCommit>) -> Self {
        self.build_info.insert(
            id.to_string(),
            BuildInfoRecord {
                id: id.to_string(),
                package: PackageSummary {
                    package_id: Some(package.to_string()),
                    ..PackageSummary::default()
                },
                commits,
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait::async_trait]
impl DeploymentSource for FakeDeployments {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_spaces(&self) -> Result<Vec<NamedEntity>> {
        self.record("spaces");
        Ok(self.spaces.clone())
    }

    async fn list_projects(&self, space_id: &str) -> Result<Vec<NamedEntity>> {
        self.record(format!("projects:{}", space_id));
        Ok(self.projects.clone())
    }

    async fn list_environments(&self, space_id: &str) -> Result<Vec<NamedEntity>> {
        self.record(format!("environments:{}", space_id));
        Ok(self.environments.clone())
    }

    async fn latest_deployment(&self, scope: &ResolvedScope) -> Result<Option<Deployment>> {
        self.record(format!("deployments:{}:{}", scope.project_id, scope.environment_id));
        Ok(self.deployment.clone())
    }

    async fn get_release(&self, _space_id: &str, release_id: &str) -> Result<Release> {
        self.releases
            .get(release_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("release {}", release_id)))
    }

    async fn get_build_information(
        &self,
        _space_id: &str,
        build_info_id: &str,
    ) -> Result<BuildInfoRecord> {
        self.build_info
            .get(build_info_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("build information {}", build_info_id)))
    }
}

/// Commit host backed by a map, with optional per-sha failures and delays
#[derive(Default)]
pub struct FakeCommits {
    pub available: bool,
    pub requires_repository: bool,
    pub details: HashMap<String, CommitDetail>,
    pub failing: Vec<String>,
    pub slow: Vec<String>,
    pub delay: Option<Duration>,
    pub lookups: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub repos: Mutex<Vec<Option<RepoRef>>>,
}

impl FakeCommits {
    pub fn new() -> Self {
        Self {
            available: true,
            requires_repository: true,
            ..Self::default()
        }
    }

    pub fn with_commit(mut self, sha: &str, author: &str, message: &str) -> Self {
        self.details.insert(
            sha.to_string(),
            CommitDetail {
                sha: sha.to_string(),
                author: author.to_string(),
                committed_at: None,
                message: message.to_string(),
                stats: None,
                html_url: None,
            },
        );
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Most lookups that were ever running at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Decrements the in-flight count when a lookup ends or is cancelled
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl CommitSource for FakeCommits {
    fn name(&self) -> &str {
        "fake commits"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn requires_repository(&self) -> bool {
        self.requires_repository
    }

    async fn get_commit(&self, repo: Option<&RepoRef>, sha: &str) -> Result<CommitDetail> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.repos.lock().unwrap().push(repo.cloned());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.slow.iter().any(|s| s == sha) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        if self.failing.iter().any(|s| s == sha) {
            return Err(SourceError::AuthenticationFailed("bad credentials".to_string()));
        }
        self.details
            .get(sha)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("commit {}", sha)))
    }
}
