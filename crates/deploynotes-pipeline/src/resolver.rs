//! Name resolution
//!
//! Maps a [`NamedScope`] onto opaque identifiers. Each lookup lists every
//! entity of one kind and matches the name exactly, case-sensitively.

use std::sync::Arc;

use deploynotes_core::{EntityKind, NamedEntity, NamedScope, ResolvedScope};
use deploynotes_sources::DeploymentSource;
use tracing::{debug, info, instrument};

use crate::error::{PipelineError, Result};

/// Resolves space, project and environment names to identifiers
pub struct NameResolver {
    source: Arc<dyn DeploymentSource>,
    concurrent: bool,
}

impl NameResolver {
    /// Create a resolver that looks names up one at a time
    pub fn new(source: Arc<dyn DeploymentSource>) -> Self {
        Self {
            source,
            concurrent: false,
        }
    }

    /// Look up project and environment concurrently once the space is known
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Resolve all three names, failing on the first one without a match
    #[instrument(skip(self, scope), fields(space = %scope.space, project = %scope.project, environment = %scope.environment))]
    pub async fn resolve(&self, scope: &NamedScope) -> Result<ResolvedScope> {
        let space_id = self.lookup(EntityKind::Space, None, &scope.space).await?;

        let (project_id, environment_id) = if self.concurrent {
            tokio::try_join!(
                self.lookup(EntityKind::Project, Some(space_id.as_str()), &scope.project),
                self.lookup(EntityKind::Environment, Some(space_id.as_str()), &scope.environment),
            )?
        } else {
            let project_id = self
                .lookup(EntityKind::Project, Some(space_id.as_str()), &scope.project)
                .await?;
            let environment_id = self
                .lookup(EntityKind::Environment, Some(space_id.as_str()), &scope.environment)
                .await?;
            (project_id, environment_id)
        };

        info!(%space_id, %project_id, %environment_id, "resolved scope");
        Ok(ResolvedScope {
            space_id,
            project_id,
            environment_id,
        })
    }

    async fn lookup(&self, kind: EntityKind, space_id: Option<&str>, name: &str) -> Result<String> {
        let entities = match (kind, space_id) {
            (EntityKind::Project, Some(space_id)) => self.source.list_projects(space_id).await?,
            (EntityKind::Environment, Some(space_id)) => {
                self.source.list_environments(space_id).await?
            }
            _ => self.source.list_spaces().await?,
        };
        debug!(%kind, count = entities.len(), "listed entities");
        find_id(&entities, kind, name)
    }
}

/// Exact, case-sensitive name match
fn find_id(entities: &[NamedEntity], kind: EntityKind, name: &str) -> Result<String> {
    entities
        .iter()
        .find(|entity| entity.name == name)
        .map(|entity| entity.id.clone())
        .ok_or_else(|| PipelineError::NotFound {
            kind,
            name: name.to_string(),
        })
}
