//! Exit codes for the CLI

use deploynotes_core::ConfigError;
use deploynotes_pipeline::PipelineError;
use deploynotes_sources::SourceError;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Space, project or environment name not found
pub const NOT_FOUND: i32 = 3;

/// No deployment for the project and environment
pub const NO_DEPLOYMENT: i32 = 4;

/// Pick the exit code for a failed command
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<PipelineError>() {
        return match err {
            PipelineError::NotFound { .. } => NOT_FOUND,
            PipelineError::NoDeployment { .. } => NO_DEPLOYMENT,
            PipelineError::Source(source) => source_code(source),
        };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return CONFIG_ERROR;
    }
    if let Some(source) = err.downcast_ref::<SourceError>() {
        return source_code(source);
    }
    ERROR
}

fn source_code(err: &SourceError) -> i32 {
    match err {
        SourceError::ConfigurationError(_) => CONFIG_ERROR,
        _ => ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploynotes_core::EntityKind;

    #[test]
    fn test_pipeline_errors() {
        let err = anyhow::Error::from(PipelineError::NotFound {
            kind: EntityKind::Project,
            name: "Web".to_string(),
        });
        assert_eq!(for_error(&err), NOT_FOUND);

        let err = anyhow::Error::from(PipelineError::NoDeployment {
            space_id: "Spaces-1".to_string(),
            project_id: "Projects-1".to_string(),
            environment_id: "Environments-1".to_string(),
        });
        assert_eq!(for_error(&err), NO_DEPLOYMENT);
    }

    #[test]
    fn test_config_errors() {
        let err = anyhow::Error::from(ConfigError::invalid("octopus.server_url", "bad"));
        assert_eq!(for_error(&err), CONFIG_ERROR);

        let err = anyhow::Error::from(SourceError::ConfigurationError("no key".to_string()));
        assert_eq!(for_error(&err), CONFIG_ERROR);
    }

    #[test]
    fn test_context_is_preserved() {
        let err = anyhow::Error::from(PipelineError::NotFound {
            kind: EntityKind::Space,
            name: "Default".to_string(),
        })
        .context("generating release notes");
        assert_eq!(for_error(&err), NOT_FOUND);
    }

    #[test]
    fn test_other_errors() {
        assert_eq!(for_error(&anyhow::anyhow!("boom")), ERROR);
    }
}
