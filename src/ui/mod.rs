//! Presentation layer.
//!
//! Sinks consume snapshots, scores, and recommendations; no monitoring
//! logic lives here.

pub mod formatters;
pub mod sink;

pub use formatters::{colorize_percent, format_gb, format_temperature, health_label};
pub use sink::{ConsoleSink, JsonSink, PresentationSink};
