//! Configuration commands.

use std::path::Path;

use crate::config::AppConfig;
use crate::error::CliResult;

/// Dump the effective configuration to stdout.
pub fn dump(config: &AppConfig, path: &Path) -> CliResult<()> {
    println!("# config.toml ({})", path.display());
    println!("{}", config.to_toml()?);
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &AppConfig) -> CliResult<()> {
    config.validate()?;
    println!(
        "Configuration is valid: {} API endpoint(s), {} feed(s), {} page(s).",
        config.api_endpoints.len(),
        config.rss_feeds.len(),
        config.scrape_urls.len()
    );
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> CliResult<()> {
    println!("config: {}", path.display());
    Ok(())
}
