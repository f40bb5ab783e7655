//! Advisory recommendations derived from a snapshot.
//!
//! Threshold rules are evaluated independently per metric; every matching
//! rule is emitted, then the list is ordered by severity. The sequence is
//! rebuilt fresh on every evaluation and never persisted.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::metrics::MetricSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// A single advisory message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub message: String,
}

/// Rule thresholds, in percent (score threshold on the 0-100 scale).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    pub cpu_warning: f32,
    pub ram_warning: f32,
    pub disk_critical: f32,
    pub score_critical: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_warning: 80.0,
            ram_warning: 85.0,
            disk_critical: 90.0,
            score_critical: 50.0,
        }
    }
}

/// Evaluate the rule table against a snapshot and its health score.
pub fn recommend(snapshot: &MetricSnapshot, score: f32) -> Vec<Recommendation> {
    recommend_with(snapshot, score, &Thresholds::default())
}

/// Same as [`recommend`] with explicit thresholds.
///
/// Ordering: descending severity, then metric order cpu, ram, disk,
/// overall. When nothing triggers, a single info entry is returned.
pub fn recommend_with(
    snapshot: &MetricSnapshot,
    score: f32,
    thresholds: &Thresholds,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if snapshot.cpu_percent > thresholds.cpu_warning {
        recs.push(Recommendation {
            severity: Severity::Warning,
            message: format!(
                "High CPU usage: {:.1}% (threshold {:.0}%)",
                snapshot.cpu_percent, thresholds.cpu_warning
            ),
        });
    }

    if snapshot.ram_percent > thresholds.ram_warning {
        recs.push(Recommendation {
            severity: Severity::Warning,
            message: format!(
                "High memory usage: {:.1}% (threshold {:.0}%)",
                snapshot.ram_percent, thresholds.ram_warning
            ),
        });
    }

    if snapshot.disk_percent > thresholds.disk_critical {
        recs.push(Recommendation {
            severity: Severity::Critical,
            message: format!(
                "Low disk space: {:.1}% used (threshold {:.0}%)",
                snapshot.disk_percent, thresholds.disk_critical
            ),
        });
    }

    if score < thresholds.score_critical {
        recs.push(Recommendation {
            severity: Severity::Critical,
            message: format!("Overall system health poor (score {:.1})", score),
        });
    }

    if recs.is_empty() {
        recs.push(Recommendation {
            severity: Severity::Info,
            message: "System running optimally".to_string(),
        });
    }

    // Stable sort keeps the cpu, ram, disk, overall order within a severity.
    recs.sort_by_key(|r| Reverse(r.severity));
    recs
}
