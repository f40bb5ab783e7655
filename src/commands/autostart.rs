//! Autostart command handler.
//!
//! Toggles OS-level auto-launch registration. Exit code 0 on success,
//! non-zero on failure (the error propagates out of `main`).

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::platform;

/// Execute the autostart command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    if matches.get_flag("enable") {
        platform::enable().context("Failed to enable autostart")?;
        println!("{} autostart enabled", "✓".green());
        return Ok(());
    }

    if matches.get_flag("disable") {
        platform::disable().context("Failed to disable autostart")?;
        println!("{} autostart disabled", "✓".green());
        return Ok(());
    }

    // No flag: report the current registration.
    let enabled = platform::is_enabled().context("Failed to query autostart state")?;
    if enabled {
        println!("autostart is {}", "enabled".green());
    } else {
        println!("autostart is {}", "disabled".yellow());
    }
    Ok(())
}
