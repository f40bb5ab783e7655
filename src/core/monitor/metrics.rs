use std::fmt;

use serde::{Deserialize, Serialize};

/// The metrics tracked by the monitor.
///
/// Each kind is polled on its own cadence and cached independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    Cpu,
    Ram,
    Disk,
    Temperature,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Cpu,
        MetricKind::Ram,
        MetricKind::Disk,
        MetricKind::Temperature,
    ];
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Cpu => write!(f, "cpu"),
            MetricKind::Ram => write!(f, "ram"),
            MetricKind::Disk => write!(f, "disk"),
            MetricKind::Temperature => write!(f, "temperature"),
        }
    }
}

/// One consistent set of metric readings.
///
/// Percentages are always in `[0, 100]`. Temperature is `None` when the
/// host exposes no sensor. Snapshots are immutable once published; a new
/// poll produces a new snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub timestamp: i64, // Unix timestamp
    pub cpu_percent: f32,
    pub ram_percent: f32,
    pub disk_percent: f32,
    pub temperature_celsius: Option<f32>,
}

/// Capacity totals read once at startup, for display only.
///
/// Totals effectively never change at runtime, so they are not part of the
/// per-poll snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SystemTotals {
    pub ram_total_bytes: u64,
    pub disk_total_bytes: u64,
}

impl SystemTotals {
    /// Bytes currently used, derived from a percentage reading.
    pub fn ram_used_bytes(&self, ram_percent: f32) -> u64 {
        ((ram_percent as f64 / 100.0) * self.ram_total_bytes as f64) as u64
    }

    pub fn disk_used_bytes(&self, disk_percent: f32) -> u64 {
        ((disk_percent as f64 / 100.0) * self.disk_total_bytes as f64) as u64
    }
}
