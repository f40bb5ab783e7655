//! Monitor command handler.
//!
//! Drives the polling runtime and feeds every snapshot change through the
//! health evaluator and recommendation engine into the selected sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::Config;
use crate::core::monitor::{health, recommend, MonitorRuntime};
use crate::ui::{ConsoleSink, JsonSink, PresentationSink};

// How long `--once` lets the first round of polls land.
const ONCE_SETTLE: Duration = Duration::from_secs(2);
const TICK_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
pub struct MonitorOptions {
    pub json: bool,
    pub once: bool,
}

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    run(MonitorOptions {
        json: matches.get_flag("json"),
        once: matches.get_flag("once"),
    })
}

pub fn run(options: MonitorOptions) -> Result<()> {
    let config = Config::load()?;
    let runtime = MonitorRuntime::new(&config).context("Failed to start monitor runtime")?;

    let mut sink: Box<dyn PresentationSink> = if options.json {
        Box::new(JsonSink)
    } else {
        Box::new(ConsoleSink::new(runtime.totals()))
    };

    let mut rx = runtime.subscribe();

    if options.once {
        let deadline = Instant::now() + ONCE_SETTLE;
        let mut latest = None;
        while Instant::now() < deadline {
            if let Some(snapshot) = runtime.next_snapshot(&mut rx, Duration::from_millis(250)) {
                latest = Some(snapshot);
            }
        }
        let snapshot = latest.context("no metrics collected")?;
        let score = health::evaluate(&snapshot);
        let recommendations = recommend(&snapshot, score);
        sink.present(&snapshot, score, &recommendations);
        runtime.shutdown();
        return Ok(());
    }

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("Failed to install Ctrl-C handler")?;
    }

    while running.load(Ordering::SeqCst) {
        if let Some(snapshot) = runtime.next_snapshot(&mut rx, TICK_TIMEOUT) {
            let score = health::evaluate(&snapshot);
            let recommendations = recommend(&snapshot, score);
            sink.present(&snapshot, score, &recommendations);
        }
    }

    runtime.shutdown();
    Ok(())
}
