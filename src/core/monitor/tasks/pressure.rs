//! Memory-pressure watcher.
//!
//! Samples this process's resident set and flips the shared pace channel
//! to backoff while it exceeds the configured limit. Freshness is traded
//! for footprint; intervals revert as soon as memory drops back under.

use std::time::Duration;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, MissedTickBehavior};

use super::PollPace;

pub async fn pressure_task(
    limit_bytes: u64,
    sample_interval: Duration,
    pace_tx: watch::Sender<PollPace>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(e) => {
            log::warn!("memory pressure watcher disabled: {}", e);
            return;
        }
    };

    let mut system = System::new();
    let refresh = ProcessRefreshKind::nothing().with_memory();

    let mut ticker = interval(sample_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                system.refresh_processes_specifics(
                    ProcessesToUpdate::Some(&[pid]),
                    true,
                    refresh,
                );
                let Some(rss) = system.process(pid).map(|p| p.memory()) else {
                    continue;
                };

                let pace = if rss > limit_bytes {
                    PollPace::Backoff
                } else {
                    PollPace::Normal
                };

                let switched = pace_tx.send_if_modified(|current| {
                    if *current != pace {
                        *current = pace;
                        true
                    } else {
                        false
                    }
                });
                if switched {
                    match pace {
                        PollPace::Backoff => log::info!(
                            "memory pressure: {} MB resident, widening poll intervals",
                            rss / (1024 * 1024)
                        ),
                        PollPace::Normal => log::info!(
                            "memory pressure cleared, restoring poll intervals"
                        ),
                    }
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}
