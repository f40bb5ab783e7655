use std::io;
use thiserror::Error;

use crate::core::monitor::MetricKind;

/// Custom error type for the sysvitals application
#[derive(Error, Debug)]
pub enum VitalsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metric unavailable: {0}")]
    MetricUnavailable(MetricKind),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Monitor error: {0}")]
    Monitor(String),

    #[error("Autostart error: {0}")]
    Autostart(String),
}

/// Result type alias for the sysvitals application
pub type Result<T> = std::result::Result<T, VitalsError>;

impl VitalsError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        VitalsError::Config(msg.into())
    }

    /// Create a permission denied error
    pub fn permission_denied<S: Into<String>>(msg: S) -> Self {
        VitalsError::PermissionDenied(msg.into())
    }

    /// Create a monitor error
    pub fn monitor<S: Into<String>>(msg: S) -> Self {
        VitalsError::Monitor(msg.into())
    }

    /// Create an autostart error
    pub fn autostart<S: Into<String>>(msg: S) -> Self {
        VitalsError::Autostart(msg.into())
    }
}
