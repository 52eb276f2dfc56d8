//! Pipeline error types

use deploynotes_core::{EntityKind, ResolvedScope};
use deploynotes_sources::SourceError;
use thiserror::Error;

/// Fatal pipeline errors. Any of these aborts the run without producing a
/// document.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A name had no exact match in its listing
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    /// The scope has no matching deployment
    #[error(
        "No deployments found for project {project_id} in environment {environment_id} (space {space_id})"
    )]
    NoDeployment {
        space_id: String,
        project_id: String,
        environment_id: String,
    },

    /// Upstream source error
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl PipelineError {
    /// Build a [`PipelineError::NoDeployment`] for a scope
    pub fn no_deployment(scope: &ResolvedScope) -> Self {
        Self::NoDeployment {
            space_id: scope.space_id.clone(),
            project_id: scope.project_id.clone(),
            environment_id: scope.environment_id.clone(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
