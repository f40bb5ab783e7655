//! Monitoring engine.
//!
//! Splits into the metric sources (thin `sysinfo` wrappers), the pure
//! health/recommendation logic, the per-metric cache, and the async
//! runtime that drives polling at independent cadences.

pub mod cache;
pub mod health;
mod metrics;
pub mod reader;
pub mod recommend;
mod runtime;
pub mod tasks;

pub use cache::{MetricCache, PollState, Reading};
pub use metrics::{MetricKind, MetricSnapshot, SystemTotals};
pub use reader::{CpuSource, DiskSource, MetricSource, RamSource, TemperatureSource};
pub use recommend::{recommend, recommend_with, Recommendation, Severity, Thresholds};
pub use runtime::{merge_task, MonitorRuntime};
pub use tasks::{poll_task, pressure_task, MetricUpdate, PollPace, PollPolicy, ReadRequest};
