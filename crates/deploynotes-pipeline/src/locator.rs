//! Release lookup

use std::sync::Arc;

use deploynotes_core::{Release, ResolvedScope};
use deploynotes_sources::DeploymentSource;
use tracing::{debug, info, instrument};

use crate::error::{PipelineError, Result};

/// Finds the release most recently deployed to a scope
pub struct ReleaseLocator {
    source: Arc<dyn DeploymentSource>,
}

impl ReleaseLocator {
    /// Create a new locator
    pub fn new(source: Arc<dyn DeploymentSource>) -> Self {
        Self { source }
    }

    /// Locate the release of the latest deployment.
    ///
    /// Recency ordering is left to the deployment system.
    #[instrument(skip(self, scope), fields(project = %scope.project_id, environment = %scope.environment_id))]
    pub async fn locate(&self, scope: &ResolvedScope) -> Result<Release> {
        let deployment = self
            .source
            .latest_deployment(scope)
            .await?
            .ok_or_else(|| PipelineError::no_deployment(scope))?;
        debug!(deployment = %deployment.id, release = %deployment.release_id, "found deployment");

        let release = self
            .source
            .get_release(&scope.space_id, &deployment.release_id)
            .await?;
        info!(
            release = %release.id,
            version = %release.version,
            build_info_count = release.build_information.len(),
            "located release"
        );
        Ok(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeDeployments;

    fn scope() -> ResolvedScope {
        ResolvedScope {
            space_id: "Spaces-1".to_string(),
            project_id: "Projects-1".to_string(),
            environment_id: "Environments-2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_locate_release() {
        let source = Arc::new(FakeDeployments::standard(Release::new("Releases-7", "1.2.3")));
        let release = ReleaseLocator::new(source.clone()).locate(&scope()).await.unwrap();

        assert_eq!(release.version, "1.2.3");
        assert!(source
            .calls()
            .contains(&"deployments:Projects-1:Environments-2".to_string()));
    }

    #[tokio::test]
    async fn test_no_deployment() {
        let mut fake = FakeDeployments::standard(Release::new("Releases-7", "1.2.3"));
        fake.deployment = None;

        let err = ReleaseLocator::new(Arc::new(fake))
            .locate(&scope())
            .await
            .unwrap_err();
        match err {
            PipelineError::NoDeployment {
                project_id,
                environment_id,
                ..
            } => {
                assert_eq!(project_id, "Projects-1");
                assert_eq!(environment_id, "Environments-2");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_release_is_source_error() {
        let mut fake = FakeDeployments::standard(Release::new("Releases-7", "1.2.3"));
        fake.releases.clear();

        let err = ReleaseLocator::new(Arc::new(fake))
            .locate(&scope())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Source(ref e) if e.is_not_found()));
    }
}
