//! Validate command

use clap::Args;
use console::style;
use tracing::info;

use deploynotes_core::config::validate_config;
use deploynotes_core::{Config, ConfigError};

use crate::cli::{output, Cli, OutputFormat};

/// Validate the configuration
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(strict = self.strict, "executing validate command");
        let cwd = std::env::current_dir()?;

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        let (config, config_path) = match cli.load_config(&cwd) {
            Ok((config, path)) => (Some(config), path),
            Err(e) => {
                errors.push(format!("Configuration: {:#}", e));
                (None, None)
            }
        };

        if let Some(config) = &config {
            if config_path.is_none() {
                warnings.push("No configuration file found, using defaults".to_string());
            }
            if let Err(e) = validate_config(config) {
                errors.push(format!("Configuration validation: {}", e));
            }
            check_setup(config, &mut errors, &mut warnings);
        }

        if self.strict {
            errors.append(&mut warnings);
        }

        let passed = errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let report = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.as_ref().map(|p| p.to_string_lossy().to_string()),
                    "errors": errors,
                    "warnings": warnings
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header("Validation Results"));
                    println!();

                    if let Some(path) = &config_path {
                        let shown = style(path.display()).cyan().to_string();
                        println!("{}", output::key_value("Config", &shown));
                        println!();
                    }

                    if !errors.is_empty() {
                        println!("{}", style("Errors:").red().bold());
                        for error in &errors {
                            println!("  {} {}", style("✗").red(), error);
                        }
                        println!();
                    }

                    for warning in &warnings {
                        output::warning(warning);
                    }

                    if passed {
                        output::success("Configuration is valid");
                    }
                }
            }
        }

        if !passed {
            return Err(ConfigError::invalid(
                "config",
                format!("validation failed with {} error(s)", errors.len()),
            )
            .into());
        }

        Ok(())
    }
}

/// Checks beyond the config schema: credentials and local paths
fn check_setup(config: &Config, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let has_api_key =
        config.octopus.api_key.is_some() || std::env::var_os("OCTOPUS_API_KEY").is_some();
    if !has_api_key {
        warnings.push("No Octopus API key configured (set OCTOPUS_API_KEY)".to_string());
    }

    match &config.local_git.path {
        Some(path) if !path.exists() => {
            errors.push(format!("Local git path does not exist: {}", path.display()));
        }
        Some(_) => {}
        None => {
            let has_token =
                config.github.token.is_some() || std::env::var_os("GITHUB_TOKEN").is_some();
            if !has_token {
                warnings.push(
                    "No GitHub token configured (set GITHUB_TOKEN); commits will not be enriched"
                        .to_string(),
                );
            }
        }
    }

    if config.scope.to_named_scope().is_none() {
        warnings.push(
            "Scope is incomplete; pass --space, --project and --environment to generate".to_string(),
        );
    }
}
