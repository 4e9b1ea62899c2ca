//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tapahtumat - Jyväskylä events as a subscribable calendar
#[derive(Debug, Parser)]
#[command(name = "tapahtumat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "TAPAHTUMAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory (overrides output.dir)
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// Hosting repository as owner/repo, used for the calendar URL
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log as JSON lines
    #[arg(long, conflicts_with = "debug")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the configuration path, explicit or default.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::AppConfig::default_path)
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch all sources and write the calendar, page and snapshot (default)
    Generate,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["tapahtumat"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "tapahtumat",
            "--config",
            "/tmp/c.toml",
            "--output-dir",
            "site",
            "--repository",
            "matti/kalenteri",
            "generate",
        ])
        .unwrap();

        assert_eq!(cli.config_path(), PathBuf::from("/tmp/c.toml"));
        assert_eq!(cli.output_dir, Some(PathBuf::from("site")));
        assert_eq!(cli.repository.as_deref(), Some("matti/kalenteri"));
        assert!(matches!(cli.command, Some(Command::Generate)));
    }

    #[test]
    fn parses_config_actions() {
        let cli = Cli::try_parse_from(["tapahtumat", "config", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Validate
            })
        ));
    }

    #[test]
    fn debug_and_json_logs_conflict() {
        assert!(Cli::try_parse_from(["tapahtumat", "--debug", "--json-logs"]).is_err());
    }
}
