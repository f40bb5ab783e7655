//! Generic poll loop, one instance per metric.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

use crate::core::monitor::cache::{MetricCache, PollState};
use crate::core::monitor::reader::MetricSource;
use crate::core::monitor::MetricKind;
use crate::error::VitalsError;

use super::{MetricUpdate, PollPace, ReadRequest};

/// Per-task scheduling knobs.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub base_interval: Duration,
    pub cache_ttl: Duration,
    /// Delay before the first poll. CPU usage needs one refresh interval
    /// of history before the numbers mean anything.
    pub warmup: Option<Duration>,
    pub backoff_factor: f64,
}

/// Task that polls one metric on its own cadence.
///
/// The timer fires, the source is read, the value lands in the shared
/// cache and is published to the merge task, and the timer is rearmed.
/// On-demand reads arriving while the cached value is younger than the
/// TTL are served from cache without touching the source. Pace changes
/// rearm the timer at the scaled interval. Shutdown cancels the loop; an
/// in-flight read completes and is discarded with the task.
pub async fn poll_task<S: MetricSource + 'static>(
    mut source: S,
    policy: PollPolicy,
    cache: Arc<MetricCache>,
    update_tx: mpsc::Sender<MetricUpdate>,
    mut request_rx: mpsc::Receiver<ReadRequest>,
    mut pace_rx: watch::Receiver<PollPace>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let kind = source.kind();

    if let Some(delay) = policy.warmup {
        tokio::time::sleep(delay).await;
        // Prime the source; the first scheduled tick reads real deltas.
        let _ = source.read();
    }

    let mut pace = *pace_rx.borrow();
    let mut ticker = interval(pace.scaled(policy.base_interval, policy.backoff_factor));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    cache.set_state(kind, PollState::Scheduled);

    log::debug!("{} poll task started ({:?})", kind, policy.base_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let value = poll_once(kind, &mut source, &cache);
                if update_tx.send(MetricUpdate::new(kind, value)).await.is_err() {
                    break;
                }
            }
            Some(request) = request_rx.recv() => {
                let value = match cache.fresh(kind, policy.cache_ttl) {
                    Some(reading) => reading.value,
                    None => {
                        let value = poll_once(kind, &mut source, &cache);
                        // Keep the published snapshot in step with what the
                        // caller saw.
                        let _ = update_tx.send(MetricUpdate::new(kind, value)).await;
                        value
                    }
                };
                let _ = request.reply.send(value);
            }
            changed = pace_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                pace = *pace_rx.borrow_and_update();
                let period = pace.scaled(policy.base_interval, policy.backoff_factor);
                // Rearm without an immediate tick.
                ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                log::info!("{} polling interval now {:?}", kind, period);
            }
            _ = shutdown.recv() => {
                log::debug!("{} poll task shutting down", kind);
                break;
            }
        }
    }

    cache.set_state(kind, PollState::Idle);
}

fn poll_once<S: MetricSource>(
    kind: MetricKind,
    source: &mut S,
    cache: &MetricCache,
) -> Option<f32> {
    cache.set_state(kind, PollState::Polling);
    let value = match source.read() {
        Ok(value) => Some(value),
        Err(VitalsError::MetricUnavailable(_)) => None,
        Err(e) => {
            log::warn!("{} read failed: {}", kind, e);
            None
        }
    };
    cache.store(kind, value);
    cache.set_state(kind, PollState::Scheduled);
    value
}
