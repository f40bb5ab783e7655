//! Output sinks for evaluation ticks.

use colored::Colorize;

use crate::core::monitor::{MetricSnapshot, Recommendation, Severity, SystemTotals};

use super::formatters::{colorize_percent, format_gb, format_temperature, health_label};

/// Consumer of one evaluation tick: the latest snapshot, its health
/// score, and the recommendation sequence.
pub trait PresentationSink {
    fn present(&mut self, snapshot: &MetricSnapshot, score: f32, recommendations: &[Recommendation]);
}

/// Human-readable colored output.
pub struct ConsoleSink {
    totals: SystemTotals,
}

impl ConsoleSink {
    pub fn new(totals: SystemTotals) -> Self {
        Self { totals }
    }
}

impl PresentationSink for ConsoleSink {
    fn present(
        &mut self,
        snapshot: &MetricSnapshot,
        score: f32,
        recommendations: &[Recommendation],
    ) {
        println!(
            "CPU {}  RAM {} ({} / {})  Disk {} ({} / {})  Temp {}",
            colorize_percent(snapshot.cpu_percent, 60.0, 80.0),
            colorize_percent(snapshot.ram_percent, 70.0, 85.0),
            format_gb(self.totals.ram_used_bytes(snapshot.ram_percent)),
            format_gb(self.totals.ram_total_bytes),
            colorize_percent(snapshot.disk_percent, 80.0, 90.0),
            format_gb(self.totals.disk_used_bytes(snapshot.disk_percent)),
            format_gb(self.totals.disk_total_bytes),
            format_temperature(snapshot.temperature_celsius),
        );
        println!("Health {:>5.1} ({})", score, health_label(score));
        for rec in recommendations {
            let tag = match rec.severity {
                Severity::Info => "info".cyan(),
                Severity::Warning => "warning".yellow(),
                Severity::Critical => "critical".red().bold(),
            };
            println!("  [{}] {}", tag, rec.message);
        }
        println!();
    }
}

/// One JSON object per tick, for scripting.
pub struct JsonSink;

impl PresentationSink for JsonSink {
    fn present(
        &mut self,
        snapshot: &MetricSnapshot,
        score: f32,
        recommendations: &[Recommendation],
    ) {
        let line = serde_json::json!({
            "snapshot": snapshot,
            "health": score,
            "recommendations": recommendations,
        });
        println!("{}", line);
    }
}
