//! Generate command

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use tracing::{info, warn};

use deploynotes_core::config::validate_config;
use deploynotes_core::{Config, NamedScope};
use deploynotes_pipeline::ReleaseNotesPipeline;
use deploynotes_sources::{
    CommitSource, DeploymentSource, GitHubClient, LocalGitSource, OctopusClient,
};

use crate::cli::{output, Cli, OutputFormat};

/// Generate release notes for the latest deployment
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Space name
    #[arg(long, env = "OCTOPUS_SPACE")]
    pub space: Option<String>,

    /// Project name
    #[arg(long, env = "OCTOPUS_PROJECT")]
    pub project: Option<String>,

    /// Environment name
    #[arg(long, env = "OCTOPUS_ENVIRONMENT")]
    pub environment: Option<String>,

    /// Octopus Deploy server URL
    #[arg(long, env = "OCTOPUS_SERVER_URL")]
    pub octopus_url: Option<String>,

    /// Octopus Deploy API key
    #[arg(long, env = "OCTOPUS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// GitHub token used to enrich commits
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository (owner/repo) for commits without a link
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Read commit details from a local checkout instead of GitHub
    #[arg(long, value_name = "PATH")]
    pub local_git: Option<PathBuf>,

    /// Output file (default: print to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Leave out the detailed commit appendix
    #[arg(long)]
    pub no_details: bool,

    /// Leave out the "generated on" footer
    #[arg(long)]
    pub no_footer: bool,

    /// Resolve project and environment concurrently
    #[arg(long)]
    pub concurrent: bool,
}

impl GenerateCommand {
    /// Execute the generate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let (mut config, config_path) = cli.load_config(&cwd)?;
        self.apply_overrides(&mut config);
        validate_config(&config)?;

        let scope = self.scope(&config)?;
        info!(
            config = ?config_path,
            space = %scope.space,
            project = %scope.project,
            environment = %scope.environment,
            "executing generate command"
        );

        let deployments: Arc<dyn DeploymentSource> = Arc::new(OctopusClient::new(&config.octopus)?);
        let commits = commit_source(&config)?;
        let pipeline = ReleaseNotesPipeline::new(config, deployments, Some(commits));

        let document = pipeline.run_document(&scope).await?;
        let content = match cli.format {
            OutputFormat::Json => serde_json::to_string_pretty(&document)? + "\n",
            OutputFormat::Text => pipeline.renderer().render_with_footer(&document, Utc::now()),
        };

        match &self.output {
            Some(path) => {
                std::fs::write(path, &content)?;
                if !cli.quiet {
                    output::success(&format!(
                        "Wrote release notes for {} {} to {}",
                        scope.project,
                        document.metadata.version,
                        path.display()
                    ));
                }
            }
            None => print!("{}", content),
        }

        Ok(())
    }

    /// Layer command-line and environment values over the loaded config
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.octopus_url {
            config.octopus.server_url = url.clone();
        }
        if let Some(key) = &self.api_key {
            config.octopus.api_key = Some(key.clone());
        }
        if let Some(token) = &self.github_token {
            config.github.token = Some(token.clone());
        }
        if let Some(repository) = &self.repository {
            config.github.default_repository = Some(repository.clone());
        }
        if let Some(path) = &self.local_git {
            config.local_git.path = Some(path.clone());
        }
        if self.no_details {
            config.render.include_details = false;
        }
        if self.no_footer {
            config.render.include_footer = false;
        }
        if self.concurrent {
            config.pipeline.concurrent_lookups = true;
        }
    }

    fn scope(&self, config: &Config) -> anyhow::Result<NamedScope> {
        let pick = |arg: &Option<String>, configured: &Option<String>, name: &str| {
            arg.clone()
                .or_else(|| configured.clone())
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    anyhow::anyhow!("No {name} given. Pass --{name} or set scope.{name} in the config")
                })
        };

        Ok(NamedScope::new(
            pick(&self.space, &config.scope.space, "space")?,
            pick(&self.project, &config.scope.project, "project")?,
            pick(&self.environment, &config.scope.environment, "environment")?,
        ))
    }
}

/// Local checkout when configured, otherwise GitHub
fn commit_source(config: &Config) -> anyhow::Result<Arc<dyn CommitSource>> {
    if let Some(path) = &config.local_git.path {
        info!(path = %path.display(), "enriching commits from local git");
        return Ok(Arc::new(
            LocalGitSource::new(path).with_files(config.github.include_files),
        ));
    }

    let client = GitHubClient::new(&config.github)?;
    if !client.is_available() {
        warn!("no GitHub token configured, commits will not be enriched");
    }
    Ok(Arc::new(client))
}
