//! Configuration validation

use tracing::debug;
use url::Url;

use crate::error::{ConfigError, Result};
use crate::types::RepoRef;

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_octopus(config)?;
    validate_github(config)?;
    validate_classification(config)?;
    validate_pipeline(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| ConfigError::invalid(field, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(field, "must be an http(s) URL"));
    }
    Ok(())
}

fn validate_octopus(config: &Config) -> Result<()> {
    validate_url("octopus.server_url", &config.octopus.server_url)
}

fn validate_github(config: &Config) -> Result<()> {
    validate_url("github.api_url", &config.github.api_url)?;

    let host = &config.github.host;
    if host.is_empty() || host.contains('/') || host.contains(':') {
        return Err(ConfigError::invalid(
            "github.host",
            "must be a bare host name such as github.com",
        ));
    }

    if let Some(repo) = &config.github.default_repository {
        if RepoRef::parse(repo).is_none() {
            return Err(ConfigError::invalid(
                "github.default_repository",
                "must have the form owner/repo",
            ));
        }
    }

    Ok(())
}

fn validate_classification(config: &Config) -> Result<()> {
    let classification = &config.classification;

    for (i, rule) in classification.rules.iter().enumerate() {
        if rule.prefixes.is_empty() && rule.keywords.is_empty() {
            return Err(ConfigError::invalid(
                format!("classification.rules[{}]", i),
                "rule needs at least one prefix or keyword",
            ));
        }
        if rule
            .prefixes
            .iter()
            .chain(rule.keywords.iter())
            .any(|p| p.trim().is_empty())
        {
            return Err(ConfigError::invalid(
                format!("classification.rules[{}]", i),
                "patterns cannot be empty",
            ));
        }
    }

    if classification
        .exclude_prefixes
        .iter()
        .chain(classification.exclude_keywords.iter())
        .any(|p| p.trim().is_empty())
    {
        return Err(ConfigError::invalid(
            "classification.exclude_keywords",
            "patterns cannot be empty",
        ));
    }

    Ok(())
}

fn validate_pipeline(config: &Config) -> Result<()> {
    if config.pipeline.enrichment_concurrency == 0 {
        return Err(ConfigError::invalid(
            "pipeline.enrichment_concurrency",
            "must be at least 1",
        ));
    }

    if config.pipeline.enrichment_timeout_ms == 0 {
        return Err(ConfigError::invalid(
            "pipeline.enrichment_timeout_ms",
            "must be greater than zero",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_server_url() {
        let mut config = Config::default();
        config.octopus.server_url = "ftp://octopus.test".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_host_with_scheme() {
        let mut config = Config::default();
        config.github.host = "https://github.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_default_repository() {
        let mut config = Config::default();
        config.github.default_repository = Some("owner".to_string());
        assert!(validate_config(&config).is_err());

        config.github.default_repository = Some("owner/repo".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_rule() {
        let mut config = Config::default();
        config.classification.rules[0].prefixes.clear();
        config.classification.rules[0].keywords.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let mut config = Config::default();
        config.pipeline.enrichment_concurrency = 0;
        assert!(validate_config(&config).is_err());
    }
}
