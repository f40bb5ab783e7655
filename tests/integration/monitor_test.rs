use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use sysvitals::core::config::Config;
use sysvitals::core::monitor::{
    health, merge_task, poll_task, pressure_task, MetricCache, MetricKind, MetricSnapshot,
    MetricSource, MetricUpdate, MonitorRuntime, PollPace, PollPolicy, ReadRequest,
};
use sysvitals::error::{Result, VitalsError};

/// Source that counts underlying reads.
struct MockSource {
    kind: MetricKind,
    value: f32,
    calls: Arc<AtomicUsize>,
}

impl MetricSource for MockSource {
    fn kind(&self) -> MetricKind {
        self.kind
    }

    fn read(&mut self) -> Result<f32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value)
    }
}

/// Source for a host without the sensor.
struct UnavailableSource(MetricKind);

impl MetricSource for UnavailableSource {
    fn kind(&self) -> MetricKind {
        self.0
    }

    fn read(&mut self) -> Result<f32> {
        Err(VitalsError::MetricUnavailable(self.0))
    }
}

struct PollHarness {
    update_rx: mpsc::Receiver<MetricUpdate>,
    request_tx: mpsc::Sender<ReadRequest>,
    pace_tx: watch::Sender<PollPace>,
    shutdown_tx: broadcast::Sender<()>,
}

fn spawn_poll<S: MetricSource + 'static>(
    source: S,
    policy: PollPolicy,
    cache: Arc<MetricCache>,
) -> PollHarness {
    let (update_tx, update_rx) = mpsc::channel(8);
    let (request_tx, request_rx) = mpsc::channel(8);
    let (pace_tx, pace_rx) = watch::channel(PollPace::Normal);
    let (shutdown_tx, _) = broadcast::channel(1);

    tokio::spawn(poll_task(
        source,
        policy,
        cache,
        update_tx,
        request_rx,
        pace_rx,
        shutdown_tx.subscribe(),
    ));

    PollHarness {
        update_rx,
        request_tx,
        pace_tx,
        shutdown_tx,
    }
}

async fn request(harness: &PollHarness) -> Option<f32> {
    let (reply, response) = oneshot::channel();
    harness.request_tx.send(ReadRequest { reply }).await.unwrap();
    response.await.unwrap()
}

#[tokio::test]
async fn test_reads_within_ttl_hit_source_once() {
    let cache = Arc::new(MetricCache::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let mut harness = spawn_poll(
        MockSource {
            kind: MetricKind::Disk,
            value: 42.0,
            calls: Arc::clone(&calls),
        },
        PollPolicy {
            // Timer effectively never fires again after the startup tick.
            base_interval: Duration::from_secs(3600),
            cache_ttl: Duration::from_secs(1),
            warmup: None,
            backoff_factor: 3.0,
        },
        Arc::clone(&cache),
    );

    // The startup tick populates the cache with one read.
    let update = harness.update_rx.recv().await.unwrap();
    assert!(matches!(update, MetricUpdate::Disk(Some(v)) if v == 42.0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Two reads within the TTL are served from cache.
    assert_eq!(request(&harness).await, Some(42.0));
    assert_eq!(request(&harness).await, Some(42.0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // After the TTL elapses, the next read polls again.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(request(&harness).await, Some(42.0));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    harness.shutdown_tx.send(()).unwrap();
}

#[tokio::test]
async fn test_cleared_cache_forces_fresh_poll() {
    let cache = Arc::new(MetricCache::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let mut harness = spawn_poll(
        MockSource {
            kind: MetricKind::Ram,
            value: 55.0,
            calls: Arc::clone(&calls),
        },
        PollPolicy {
            base_interval: Duration::from_secs(3600),
            cache_ttl: Duration::from_secs(60),
            warmup: None,
            backoff_factor: 3.0,
        },
        Arc::clone(&cache),
    );

    harness.update_rx.recv().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(request(&harness).await, Some(55.0));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    cache.clear();
    assert_eq!(request(&harness).await, Some(55.0));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    harness.shutdown_tx.send(()).unwrap();
}

#[tokio::test]
async fn test_pace_change_rearms_timer_and_keeps_serving() {
    let cache = Arc::new(MetricCache::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let mut harness = spawn_poll(
        MockSource {
            kind: MetricKind::Cpu,
            value: 12.0,
            calls: Arc::clone(&calls),
        },
        PollPolicy {
            base_interval: Duration::from_secs(3600),
            cache_ttl: Duration::from_millis(1),
            warmup: None,
            backoff_factor: 3.0,
        },
        Arc::clone(&cache),
    );

    harness.update_rx.recv().await.unwrap();
    harness.pace_tx.send(PollPace::Backoff).unwrap();

    // The widened timer must not break on-demand reads; the tiny TTL
    // forces a fresh poll here.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(request(&harness).await, Some(12.0));
    assert!(calls.load(Ordering::SeqCst) >= 2);

    harness.shutdown_tx.send(()).unwrap();
}

#[tokio::test]
async fn test_unavailable_metric_degrades_to_none() {
    let cache = Arc::new(MetricCache::new());
    let mut harness = spawn_poll(
        UnavailableSource(MetricKind::Temperature),
        PollPolicy {
            base_interval: Duration::from_secs(3600),
            cache_ttl: Duration::from_secs(1),
            warmup: None,
            backoff_factor: 3.0,
        },
        Arc::clone(&cache),
    );

    let update = harness.update_rx.recv().await.unwrap();
    assert!(matches!(update, MetricUpdate::Temperature(None)));

    harness.shutdown_tx.send(()).unwrap();
}

#[tokio::test]
async fn test_merge_folds_updates_and_keeps_last_known_values() {
    let (update_tx, update_rx) = mpsc::channel(8);
    let (snapshot_tx, mut snapshot_rx) = watch::channel(Arc::new(MetricSnapshot::default()));
    let (shutdown_tx, _) = broadcast::channel(1);

    tokio::spawn(merge_task(update_rx, snapshot_tx, shutdown_tx.subscribe()));

    update_tx.send(MetricUpdate::Cpu(Some(40.0))).await.unwrap();
    update_tx.send(MetricUpdate::Ram(Some(60.0))).await.unwrap();
    update_tx.send(MetricUpdate::Disk(Some(20.0))).await.unwrap();
    update_tx
        .send(MetricUpdate::Temperature(None))
        .await
        .unwrap();
    // A failed percentage read must not wipe the last known value.
    update_tx.send(MetricUpdate::Cpu(None)).await.unwrap();

    let snapshot = loop {
        tokio::time::timeout(Duration::from_secs(2), snapshot_rx.changed())
            .await
            .expect("merge task stalled")
            .unwrap();
        let current = Arc::clone(&snapshot_rx.borrow_and_update());
        if current.cpu_percent == 40.0 && current.ram_percent == 60.0 && current.disk_percent == 20.0
        {
            break current;
        }
    };

    assert_eq!(snapshot.temperature_celsius, None);
    assert!(snapshot.timestamp > 0);

    // Once the trailing Cpu(None) is processed, the last known value is
    // still on display.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(snapshot_rx.borrow().cpu_percent, 40.0);

    // Missing temperature never changes the score.
    let with_temp = MetricSnapshot {
        temperature_celsius: Some(71.0),
        ..(*snapshot).clone()
    };
    assert_eq!(health::evaluate(&snapshot), health::evaluate(&with_temp));

    shutdown_tx.send(()).unwrap();
}

#[tokio::test]
async fn test_pressure_backs_off_above_limit() {
    let (pace_tx, mut pace_rx) = watch::channel(PollPace::Normal);
    let (shutdown_tx, _) = broadcast::channel(1);

    // Limit of zero bytes: any resident set trips the backoff.
    tokio::spawn(pressure_task(
        0,
        Duration::from_millis(50),
        pace_tx,
        shutdown_tx.subscribe(),
    ));

    tokio::time::timeout(Duration::from_secs(5), pace_rx.changed())
        .await
        .expect("pace never changed")
        .unwrap();
    assert_eq!(*pace_rx.borrow(), PollPace::Backoff);

    shutdown_tx.send(()).unwrap();
}

#[tokio::test]
async fn test_pressure_stays_normal_below_limit() {
    let (pace_tx, pace_rx) = watch::channel(PollPace::Normal);
    let (shutdown_tx, _) = broadcast::channel(1);

    tokio::spawn(pressure_task(
        u64::MAX,
        Duration::from_millis(50),
        pace_tx,
        shutdown_tx.subscribe(),
    ));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(*pace_rx.borrow(), PollPace::Normal);
    assert!(!pace_rx.has_changed().unwrap());

    shutdown_tx.send(()).unwrap();
}

#[test]
fn test_runtime_collects_and_shuts_down() {
    let config = Config::default();
    let runtime = MonitorRuntime::new(&config).expect("runtime start");
    let mut rx = runtime.subscribe();

    let mut snapshot = None;
    for _ in 0..20 {
        if let Some(s) = runtime.next_snapshot(&mut rx, Duration::from_millis(500)) {
            snapshot = Some(s);
            break;
        }
    }
    let snapshot = snapshot.expect("no snapshot published");

    let score = health::evaluate(&snapshot);
    assert!((0.0..=100.0).contains(&score));

    // RAM is readable on any host; the TTL path must yield a value.
    let ram = runtime.read(MetricKind::Ram).expect("read ram");
    assert!(ram.is_some());

    runtime.clear_caches();
    runtime.shutdown();
}
