use colored::{ColoredString, Colorize};

/// Format a byte count as gigabytes with one decimal.
pub fn format_gb(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

/// Color a percentage by load: green under `warn`, yellow under `crit`,
/// red above.
pub fn colorize_percent(value: f32, warn: f32, crit: f32) -> ColoredString {
    let text = format!("{:>5.1}%", value);
    if value >= crit {
        text.red()
    } else if value >= warn {
        text.yellow()
    } else {
        text.green()
    }
}

/// Temperature display; hosts without a sensor show N/A.
pub fn format_temperature(celsius: Option<f32>) -> String {
    match celsius {
        Some(value) => format!("{:.1}°C", value),
        None => "N/A".to_string(),
    }
}

/// Qualitative label for a health score.
pub fn health_label(score: f32) -> ColoredString {
    if score >= 75.0 {
        "good".green()
    } else if score >= 50.0 {
        "fair".yellow()
    } else {
        "poor".red()
    }
}
