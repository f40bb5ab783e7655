// SysVitals Library - Public API

// Re-export error types
pub mod error;
pub use error::{Result, VitalsError};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::monitor::{MetricSnapshot, MonitorRuntime};

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
