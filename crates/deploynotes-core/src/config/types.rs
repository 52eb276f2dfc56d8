//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::{Classification, NamedScope};

/// Main configuration for deploynotes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deployment server (Octopus Deploy) configuration
    pub octopus: OctopusConfig,

    /// Source-control host (GitHub) configuration
    pub github: GitHubConfig,

    /// Local git checkout used for enrichment instead of the host API
    pub local_git: LocalGitConfig,

    /// Default space/project/environment names
    pub scope: ScopeConfig,

    /// Commit inclusion and categorization policy
    pub classification: ClassificationConfig,

    /// Document rendering options
    pub render: RenderConfig,

    /// Concurrency and timeout settings
    pub pipeline: PipelineConfig,
}

/// Octopus Deploy server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OctopusConfig {
    /// Server base URL
    pub server_url: String,

    /// API key sent as `X-Octopus-ApiKey`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Only consider deployments whose task succeeded
    pub only_successful: bool,
}

impl Default for OctopusConfig {
    fn default() -> Self {
        Self {
            server_url: "https://octopus.example.com".to_string(),
            api_key: None,
            only_successful: true,
        }
    }
}

/// GitHub configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL
    pub api_url: String,

    /// Web host whose commit links are trusted
    pub host: String,

    /// Access token; enrichment is skipped without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// `owner/repo` used for commits that carry no link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_repository: Option<String>,

    /// Keep per-file change statistics
    pub include_files: bool,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            host: "github.com".to_string(),
            token: None,
            default_repository: None,
            include_files: true,
        }
    }
}

/// Local git enrichment configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalGitConfig {
    /// Path of a local checkout containing the release's commits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Default scope names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Space name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,

    /// Project name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Environment name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl ScopeConfig {
    /// Build a [`NamedScope`] when all three names are known
    pub fn to_named_scope(&self) -> Option<NamedScope> {
        Some(NamedScope::new(
            self.space.clone()?,
            self.project.clone()?,
            self.environment.clone()?,
        ))
    }
}

/// One categorization rule. Matching is case-insensitive on the commit title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category assigned when the rule matches
    pub category: Classification,

    /// Title prefixes (e.g. `feat:`)
    #[serde(default)]
    pub prefixes: Vec<String>,

    /// Substrings anywhere in the title
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryRule {
    /// Create a new rule
    pub fn new(category: Classification, prefixes: &[&str], keywords: &[&str]) -> Self {
        Self {
            category,
            prefixes: prefixes.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Commit inclusion and categorization policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Titles starting with any of these are excluded
    pub exclude_prefixes: Vec<String>,

    /// Titles containing any of these are excluded
    pub exclude_keywords: Vec<String>,

    /// Categorization rules in priority order; the first match wins
    pub rules: Vec<CategoryRule>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            exclude_prefixes: vec!["merge".to_string()],
            exclude_keywords: [
                "typo",
                "formatting",
                "whitespace",
                "comment",
                "readme update",
                "minor fix",
                "wip",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            rules: vec![
                CategoryRule::new(Classification::Feature, &["feat:"], &["feature"]),
                CategoryRule::new(Classification::Fix, &["fix:"], &["bug", "fix"]),
                CategoryRule::new(
                    Classification::Improvement,
                    &["perf:", "refactor:"],
                    &["improve"],
                ),
            ],
        }
    }
}

/// Document rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Document title; defaults to the project name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Include the per-commit appendix
    pub include_details: bool,

    /// Include the contributor list
    pub include_contributors: bool,

    /// Include the "generated on" footer
    pub include_footer: bool,

    /// Maximum files listed per commit in the appendix
    pub max_files: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: None,
            include_details: true,
            include_contributors: true,
            include_footer: true,
            max_files: 50,
        }
    }
}

/// Concurrency and timeout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Resolve project and environment concurrently
    pub concurrent_lookups: bool,

    /// Maximum in-flight enrichment calls (1 = sequential)
    pub enrichment_concurrency: usize,

    /// Per-commit enrichment timeout in milliseconds
    pub enrichment_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrent_lookups: false,
            enrichment_concurrency: 1,
            enrichment_timeout_ms: 10_000,
        }
    }
}
