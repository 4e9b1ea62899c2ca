//! tapahtumat CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use tapahtumat_cli::cli::{Cli, Command, ConfigAction};
use tapahtumat_cli::commands;
use tapahtumat_cli::config::AppConfig;
use tapahtumat_cli::error::CliResult;
use tapahtumat_core::{TracingConfig, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    init_tracing(TracingConfig::from_flags(cli.debug, cli.json_logs))?;

    let config_path = cli.config_path();

    match cli.command {
        Some(Command::Config { action }) => {
            let config = AppConfig::load_or_default(&config_path)?;
            match action {
                ConfigAction::Dump => commands::config::dump(&config, &config_path),
                ConfigAction::Validate => commands::config::validate(&config),
                ConfigAction::Path => commands::config::path(&config_path),
            }
        }
        Some(Command::Generate) | None => {
            let config = AppConfig::load_or_create(&config_path)?;
            let output_dir = cli.output_dir.unwrap_or_else(|| config.output.dir.clone());
            let summary =
                commands::generate::run(&config, &output_dir, cli.repository.as_deref()).await?;
            commands::generate::print_summary(&summary);
            Ok(())
        }
    }
}
