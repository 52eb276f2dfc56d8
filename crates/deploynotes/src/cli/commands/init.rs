//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use deploynotes_core::config::defaults::{
    default_config_yaml, DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_YAML,
};

use crate::cli::{output, Cli};

/// Write a default configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write YAML instead of TOML
    #[arg(long)]
    pub yaml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yaml = self.yaml, "executing init command");
        let cwd = std::env::current_dir()?;
        let default_name = if self.yaml {
            DEFAULT_CONFIG_YAML
        } else {
            DEFAULT_CONFIG_TOML
        };
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(default_name));

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let content = if self.yaml {
            default_config_yaml()
        } else {
            DEFAULT_CONFIG_TEMPLATE.to_string()
        };
        std::fs::write(&config_path, content)?;

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                style(config_path.display()).cyan()
            ));
            eprintln!();
            eprintln!("Next steps:");
            eprintln!("  1. Set the scope and server URL in {}", config_path.display());
            eprintln!(
                "  2. Export {} and {}",
                style("OCTOPUS_API_KEY").cyan(),
                style("GITHUB_TOKEN").cyan()
            );
            eprintln!("  3. Run {} to check the setup", style("deploynotes validate").cyan());
            eprintln!("  4. Run {} to write release notes", style("deploynotes generate").cyan());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use deploynotes_core::config::load_config;
    use tempfile::TempDir;

    fn run(args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["deploynotes", "--quiet", "init"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        match &cli.command {
            crate::cli::Commands::Init(cmd) => cmd.execute(&cli),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_writes_loadable_toml_and_yaml() {
        let temp = TempDir::new().unwrap();

        let toml_path = temp.path().join("deploynotes.toml");
        run(&["--output", toml_path.to_str().unwrap()]).unwrap();
        let config = load_config(&toml_path).unwrap();
        assert_eq!(config.pipeline.enrichment_concurrency, 1);

        let yaml_path = temp.path().join("deploynotes.yaml");
        run(&["--yaml", "--output", yaml_path.to_str().unwrap()]).unwrap();
        let config = load_config(&yaml_path).unwrap();
        assert_eq!(config.github.host, "github.com");
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("deploynotes.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(run(&["--output", path.to_str().unwrap()]).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        run(&["--force", "--output", path.to_str().unwrap()]).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[octopus]"));
    }
}
