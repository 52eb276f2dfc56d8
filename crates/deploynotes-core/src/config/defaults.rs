//! Default configuration values

use super::types::Config;

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "deploynotes.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "deploynotes.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".deploynotes.toml",
        ".deploynotes.yaml",
    ]
}

/// Generate default configuration YAML
pub fn default_config_yaml() -> String {
    let config = Config::default();
    serde_yaml::to_string(&config).unwrap_or_else(|_| DEFAULT_CONFIG_TEMPLATE.to_string())
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# deploynotes configuration
# Credentials are best supplied through OCTOPUS_API_KEY and GITHUB_TOKEN.

[octopus]
server_url = "https://octopus.example.com"
only_successful = true

[github]
api_url = "https://api.github.com"
host = "github.com"
include_files = true
# default_repository = "owner/repo"

# [local_git]
# path = "."

[scope]
# space = "Default"
# project = "My Project"
# environment = "Production"

[classification]
exclude_prefixes = ["merge"]
exclude_keywords = ["typo", "formatting", "whitespace", "comment", "readme update", "minor fix", "wip"]

[[classification.rules]]
category = "feature"
prefixes = ["feat:"]
keywords = ["feature"]

[[classification.rules]]
category = "fix"
prefixes = ["fix:"]
keywords = ["bug", "fix"]

[[classification.rules]]
category = "improvement"
prefixes = ["perf:", "refactor:"]
keywords = ["improve"]

[render]
include_details = true
include_contributors = true
include_footer = true
max_files = 50

[pipeline]
concurrent_lookups = false
enrichment_concurrency = 1
enrichment_timeout_ms = 10000
"#;
