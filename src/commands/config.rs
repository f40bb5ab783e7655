//! Config command handler: print the effective configuration.

use anyhow::Result;
use clap::ArgMatches;

use crate::core::config::Config;

/// Execute the config command
pub fn execute(_matches: &ArgMatches) -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load()?;

    println!("Config file: {}", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
