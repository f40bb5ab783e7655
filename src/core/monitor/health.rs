//! Health score derivation.
//!
//! A single number in `[0, 100]` summarizing system load: 100 is idle,
//! 0 is saturated. Pure function of the latest snapshot.

use super::metrics::MetricSnapshot;

/// Weight of CPU usage in the health formula.
pub const CPU_WEIGHT: f32 = 0.3;
/// Weight of RAM usage. RAM is weighted highest: memory exhaustion hurts
/// responsiveness more than a busy CPU.
pub const RAM_WEIGHT: f32 = 0.4;
/// Weight of disk usage.
pub const DISK_WEIGHT: f32 = 0.3;

/// Compute the health score for a snapshot.
///
/// `health = 100 - (cpu*0.3 + ram*0.4 + disk*0.3)`, clamped to `[0, 100]`.
/// Temperature is informational only and never enters the formula.
pub fn evaluate(snapshot: &MetricSnapshot) -> f32 {
    let weighted = snapshot.cpu_percent * CPU_WEIGHT
        + snapshot.ram_percent * RAM_WEIGHT
        + snapshot.disk_percent * DISK_WEIGHT;
    (100.0 - weighted).clamp(0.0, 100.0)
}
