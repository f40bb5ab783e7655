//! Metric sources wrapping `sysinfo`.
//!
//! Each poll task owns its own source so no task can stall another on a
//! slow sensor call. Sources do not cache; caching belongs to the
//! orchestrator.

use std::path::{Path, PathBuf};

use sysinfo::{Components, CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};

use crate::error::{Result, VitalsError};

use super::metrics::{MetricKind, SystemTotals};

/// A single pollable metric.
///
/// `read` performs one bounded system call and returns the current value.
/// `MetricUnavailable` means the OS exposes no sensor for this metric;
/// callers must treat that as "omit from display", never as fatal.
pub trait MetricSource: Send {
    fn kind(&self) -> MetricKind;
    fn read(&mut self) -> Result<f32>;
}

/// CPU usage source. Values are meaningless until
/// `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL` has elapsed since the previous
/// refresh, so the poll task warms this source up before its first tick.
pub struct CpuSource {
    system: System,
}

impl CpuSource {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
        );
        Self { system }
    }
}

impl Default for CpuSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for CpuSource {
    fn kind(&self) -> MetricKind {
        MetricKind::Cpu
    }

    fn read(&mut self) -> Result<f32> {
        self.system.refresh_cpu_usage();
        Ok(self.system.global_cpu_usage().clamp(0.0, 100.0))
    }
}

/// RAM usage source.
pub struct RamSource {
    system: System,
}

impl RamSource {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        Self { system }
    }
}

impl Default for RamSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for RamSource {
    fn kind(&self) -> MetricKind {
        MetricKind::Ram
    }

    fn read(&mut self) -> Result<f32> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(VitalsError::MetricUnavailable(MetricKind::Ram));
        }
        let used = self.system.used_memory();
        Ok(((used as f64 / total as f64) * 100.0).clamp(0.0, 100.0) as f32)
    }
}

/// Disk usage source for the system root filesystem.
pub struct DiskSource {
    disks: Disks,
    root: PathBuf,
}

impl DiskSource {
    pub fn new() -> Self {
        Self {
            disks: Disks::new_with_refreshed_list(),
            root: system_root(),
        }
    }

    fn root_disk(&self) -> Option<&sysinfo::Disk> {
        self.disks
            .iter()
            .find(|d| d.mount_point() == self.root.as_path())
            .or_else(|| self.disks.iter().next())
    }
}

impl Default for DiskSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for DiskSource {
    fn kind(&self) -> MetricKind {
        MetricKind::Disk
    }

    fn read(&mut self) -> Result<f32> {
        self.disks.refresh(true);
        let disk = self
            .root_disk()
            .ok_or(VitalsError::MetricUnavailable(MetricKind::Disk))?;
        let total = disk.total_space();
        if total == 0 {
            return Err(VitalsError::MetricUnavailable(MetricKind::Disk));
        }
        let used = total.saturating_sub(disk.available_space());
        Ok(((used as f64 / total as f64) * 100.0).clamp(0.0, 100.0) as f32)
    }
}

/// Temperature source. Reports the first component with a reading; many
/// machines (VMs in particular) expose none.
pub struct TemperatureSource {
    components: Components,
}

impl TemperatureSource {
    pub fn new() -> Self {
        Self {
            components: Components::new_with_refreshed_list(),
        }
    }
}

impl Default for TemperatureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for TemperatureSource {
    fn kind(&self) -> MetricKind {
        MetricKind::Temperature
    }

    fn read(&mut self) -> Result<f32> {
        self.components.refresh(true);
        self.components
            .iter()
            .find_map(|c| c.temperature())
            .ok_or(VitalsError::MetricUnavailable(MetricKind::Temperature))
    }
}

/// Read RAM and root-disk capacity totals once, for display.
pub fn read_totals() -> SystemTotals {
    let mut system = System::new_with_specifics(
        RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
    );
    system.refresh_memory();

    let root = system_root();
    let disks = Disks::new_with_refreshed_list();
    let disk_total = disks
        .iter()
        .find(|d| d.mount_point() == root.as_path())
        .or_else(|| disks.iter().next())
        .map(|d| d.total_space())
        .unwrap_or(0);

    SystemTotals {
        ram_total_bytes: system.total_memory(),
        disk_total_bytes: disk_total,
    }
}

fn system_root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:\\")
    } else {
        Path::new("/").to_path_buf()
    }
}
