//! Collaborator traits

use deploynotes_core::{
    BuildInfoRecord, CommitDetail, Deployment, NamedEntity, Release, RepoRef, ResolvedScope,
};

use crate::error::Result;

/// Read-only access to a deployment-tracking system
///
/// Listings return every entity of one kind; name matching is left to the
/// caller.
#[async_trait::async_trait]
pub trait DeploymentSource: Send + Sync {
    /// Get the source name
    fn name(&self) -> &str;

    /// List all spaces
    async fn list_spaces(&self) -> Result<Vec<NamedEntity>>;

    /// List all projects in a space
    async fn list_projects(&self, space_id: &str) -> Result<Vec<NamedEntity>>;

    /// List all environments in a space
    async fn list_environments(&self, space_id: &str) -> Result<Vec<NamedEntity>>;

    /// Most recent deployment of the project to the environment.
    ///
    /// Ordering is the upstream system's; `None` when nothing matches.
    async fn latest_deployment(&self, scope: &ResolvedScope) -> Result<Option<Deployment>>;

    /// Get a release by id
    async fn get_release(&self, space_id: &str, release_id: &str) -> Result<Release>;

    /// Get one build information record by id
    async fn get_build_information(
        &self,
        space_id: &str,
        build_info_id: &str,
    ) -> Result<BuildInfoRecord>;
}

/// Read-only access to commit detail on a source-control host
#[async_trait::async_trait]
pub trait CommitSource: Send + Sync {
    /// Get the source name
    fn name(&self) -> &str;

    /// Check if the source has what it needs (e.g. a token) to be queried
    fn is_available(&self) -> bool;

    /// Whether lookups need an owner/repo pair
    fn requires_repository(&self) -> bool {
        true
    }

    /// Fetch full detail for a commit
    async fn get_commit(&self, repo: Option<&RepoRef>, sha: &str) -> Result<CommitDetail>;
}
