use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use sysvitals::commands;
use sysvitals::commands::monitor::MonitorOptions;

fn main() -> Result<()> {
    sysvitals::init_logging();

    let matches = Command::new("sysvitals")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lightweight system health monitor")
        .subcommand(
            Command::new("monitor")
                .about("Run the monitoring loop (default when no command is given)")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit one JSON object per update (for scripting)")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("once")
                        .long("once")
                        .help("Print a single evaluation and exit")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("autostart")
                .about("Manage launch-at-login registration")
                .arg(
                    Arg::new("enable")
                        .long("enable")
                        .help("Register the monitor to start at login")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("disable"),
                )
                .arg(
                    Arg::new("disable")
                        .long("disable")
                        .help("Remove the login registration")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("config").about("Show the effective configuration"))
        .get_matches();

    match matches.subcommand() {
        Some(("monitor", sub_matches)) => commands::monitor::execute(sub_matches),
        Some(("autostart", sub_matches)) => commands::autostart::execute(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        _ => commands::monitor::run(MonitorOptions::default()),
    }
}
