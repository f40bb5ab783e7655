//! Tokio runtime owning the polling tasks.
//!
//! [`MonitorRuntime`] is the single owner of all monitoring state. It is
//! constructed once at startup, handed by reference to consumers, and torn
//! down explicitly, cancelling every timer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::core::config::Config;
use crate::error::{Result, VitalsError};

use super::cache::MetricCache;
use super::metrics::{MetricKind, MetricSnapshot, SystemTotals};
use super::reader::{self, CpuSource, DiskSource, RamSource, TemperatureSource};
use super::tasks::{poll_task, pressure_task, MetricUpdate, PollPace, PollPolicy, ReadRequest};

const UPDATE_CHANNEL_CAPACITY: usize = 32;
const REQUEST_CHANNEL_CAPACITY: usize = 8;
const PRESSURE_SAMPLE_INTERVAL: Duration = Duration::from_secs(5);

/// Handle to the background metric collection.
pub struct MonitorRuntime {
    snapshot_rx: watch::Receiver<Arc<MetricSnapshot>>,
    request_txs: HashMap<MetricKind, mpsc::Sender<ReadRequest>>,
    cache: Arc<MetricCache>,
    totals: SystemTotals,
    cache_ttl: Duration,
    shutdown_tx: broadcast::Sender<()>,
    runtime: tokio::runtime::Runtime,
}

impl MonitorRuntime {
    /// Spawn the merge task, one poll task per metric, and the
    /// memory-pressure watcher.
    pub fn new(config: &Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("vitals-worker")
            .build()?;

        let cache = Arc::new(MetricCache::new());
        let totals = reader::read_totals();

        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(MetricSnapshot::default()));
        let (update_tx, update_rx) = mpsc::channel::<MetricUpdate>(UPDATE_CHANNEL_CAPACITY);
        let (pace_tx, pace_rx) = watch::channel(PollPace::Normal);
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        runtime.spawn(merge_task(
            update_rx,
            snapshot_tx,
            shutdown_tx.subscribe(),
        ));

        runtime.spawn(pressure_task(
            config.memory_limit_mb * 1024 * 1024,
            PRESSURE_SAMPLE_INTERVAL,
            pace_tx,
            shutdown_tx.subscribe(),
        ));

        let mut request_txs = HashMap::new();
        let cache_ttl = config.cache_ttl();

        let mut spawn = |kind: MetricKind, policy: PollPolicy| {
            let (request_tx, request_rx) = mpsc::channel::<ReadRequest>(REQUEST_CHANNEL_CAPACITY);
            request_txs.insert(kind, request_tx);
            let cache = Arc::clone(&cache);
            let update_tx = update_tx.clone();
            let pace_rx = pace_rx.clone();
            let shutdown = shutdown_tx.subscribe();
            match kind {
                MetricKind::Cpu => runtime.spawn(poll_task(
                    CpuSource::new(),
                    policy,
                    cache,
                    update_tx,
                    request_rx,
                    pace_rx,
                    shutdown,
                )),
                MetricKind::Ram => runtime.spawn(poll_task(
                    RamSource::new(),
                    policy,
                    cache,
                    update_tx,
                    request_rx,
                    pace_rx,
                    shutdown,
                )),
                MetricKind::Disk => runtime.spawn(poll_task(
                    DiskSource::new(),
                    policy,
                    cache,
                    update_tx,
                    request_rx,
                    pace_rx,
                    shutdown,
                )),
                MetricKind::Temperature => runtime.spawn(poll_task(
                    TemperatureSource::new(),
                    policy,
                    cache,
                    update_tx,
                    request_rx,
                    pace_rx,
                    shutdown,
                )),
            }
        };

        spawn(
            MetricKind::Cpu,
            PollPolicy {
                base_interval: config.cpu_interval(),
                cache_ttl,
                warmup: Some(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
                backoff_factor: config.backoff_factor,
            },
        );
        spawn(
            MetricKind::Ram,
            PollPolicy {
                base_interval: config.ram_interval(),
                cache_ttl,
                warmup: None,
                backoff_factor: config.backoff_factor,
            },
        );
        spawn(
            MetricKind::Disk,
            PollPolicy {
                base_interval: config.disk_interval(),
                cache_ttl,
                warmup: None,
                backoff_factor: config.backoff_factor,
            },
        );
        spawn(
            MetricKind::Temperature,
            PollPolicy {
                base_interval: config.temperature_interval(),
                cache_ttl,
                warmup: None,
                backoff_factor: config.backoff_factor,
            },
        );

        log::info!("monitor runtime started");

        Ok(Self {
            snapshot_rx,
            request_txs,
            cache,
            totals,
            cache_ttl,
            shutdown_tx,
            runtime,
        })
    }

    /// Subscribe to published snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Arc<MetricSnapshot>> {
        self.snapshot_rx.clone()
    }

    /// Capacity totals read once at startup.
    pub fn totals(&self) -> SystemTotals {
        self.totals
    }

    /// Read one metric, honoring the cache TTL.
    ///
    /// A cached value younger than the TTL is returned without a poll;
    /// otherwise the metric's task polls before replying. `Ok(None)` means
    /// the metric is unavailable on this host.
    pub fn read(&self, kind: MetricKind) -> Result<Option<f32>> {
        if let Some(reading) = self.cache.fresh(kind, self.cache_ttl) {
            return Ok(reading.value);
        }

        let request_tx = self
            .request_txs
            .get(&kind)
            .ok_or_else(|| VitalsError::monitor(format!("no poll task for {}", kind)))?
            .clone();

        self.runtime.block_on(async move {
            let (reply, response) = oneshot::channel();
            request_tx
                .send(ReadRequest { reply })
                .await
                .map_err(|_| VitalsError::monitor(format!("{} poll task stopped", kind)))?;
            response
                .await
                .map_err(|_| VitalsError::monitor(format!("{} poll task dropped request", kind)))
        })
    }

    /// Block until the published snapshot changes, up to `timeout`.
    pub fn next_snapshot(
        &self,
        rx: &mut watch::Receiver<Arc<MetricSnapshot>>,
        timeout: Duration,
    ) -> Option<Arc<MetricSnapshot>> {
        self.runtime.block_on(async {
            match tokio::time::timeout(timeout, rx.changed()).await {
                Ok(Ok(())) => Some(Arc::clone(&rx.borrow_and_update())),
                _ => None,
            }
        })
    }

    /// Drop all cached readings.
    ///
    /// Hook for the presentation layer's visibility change: hidden UI
    /// keeps no derived data around.
    pub fn clear_caches(&self) {
        self.cache.clear();
        log::debug!("metric caches cleared");
    }

    /// Cancel all timers and stop the runtime. In-flight polls complete
    /// on the worker threads and are discarded.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        self.runtime.shutdown_timeout(Duration::from_secs(2));
        log::info!("monitor runtime stopped");
    }
}

/// Fold per-metric updates into the current snapshot and publish it.
///
/// A failed percentage read keeps the last known value on screen; only
/// temperature toggles to unavailable, since N/A is its meaningful state.
pub async fn merge_task(
    mut update_rx: mpsc::Receiver<MetricUpdate>,
    snapshot_tx: watch::Sender<Arc<MetricSnapshot>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut current = MetricSnapshot::default();

    loop {
        tokio::select! {
            Some(update) = update_rx.recv() => {
                match update {
                    MetricUpdate::Cpu(Some(value)) => current.cpu_percent = value,
                    MetricUpdate::Ram(Some(value)) => current.ram_percent = value,
                    MetricUpdate::Disk(Some(value)) => current.disk_percent = value,
                    MetricUpdate::Temperature(value) => current.temperature_celsius = value,
                    MetricUpdate::Cpu(None)
                    | MetricUpdate::Ram(None)
                    | MetricUpdate::Disk(None) => {}
                }

                current.timestamp = chrono::Utc::now().timestamp();
                // send() only fails with no receivers, which is fine.
                let _ = snapshot_tx.send(Arc::new(current.clone()));
            }
            _ = shutdown.recv() => break,
        }
    }
}
