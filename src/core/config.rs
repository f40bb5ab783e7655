use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// Documented defaults; every missing or invalid key falls back to these.
const DEFAULT_CPU_INTERVAL_SECS: u64 = 3;
const DEFAULT_RAM_INTERVAL_SECS: u64 = 5;
const DEFAULT_DISK_INTERVAL_SECS: u64 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 1;
const DEFAULT_MEMORY_LIMIT_MB: u64 = 25;
const DEFAULT_BACKOFF_FACTOR: f64 = 3.0;

// Temperature cadence is not user-facing; sensors update slowly.
const TEMPERATURE_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub poll_intervals: PollIntervals,
    /// Maximum age, in seconds, for which a polled value is reused
    /// without re-polling.
    pub cache_ttl: u64,
    pub window: WindowConfig,
    /// Resident-set limit above which polling backs off.
    pub memory_limit_mb: u64,
    /// Multiplier applied to every poll interval under memory pressure.
    pub backoff_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollIntervals {
    pub cpu: u64,
    pub ram: u64,
    pub disk: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            cpu: DEFAULT_CPU_INTERVAL_SECS,
            ram: DEFAULT_RAM_INTERVAL_SECS,
            disk: DEFAULT_DISK_INTERVAL_SECS,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 420,
            height: 340,
            resizable: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_intervals: PollIntervals::default(),
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            window: WindowConfig::default(),
            memory_limit_mb: DEFAULT_MEMORY_LIMIT_MB,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl Config {
    /// Load the configuration from the default location.
    ///
    /// A missing file yields defaults; a corrupt file or invalid values
    /// log a warning and fall back field by field. Configuration problems
    /// are never fatal to the monitor.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Ok(Self::load_from(&path))
    }

    pub fn load_from(path: &Path) -> Self {
        let mut config = if !path.exists() {
            Config::default()
        } else {
            match fs::read_to_string(path) {
                Ok(data) if data.trim().is_empty() => Config::default(),
                Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                    log::warn!("invalid config {:?}: {}; using defaults", path, e);
                    Config::default()
                }),
                Err(e) => {
                    log::warn!("failed to read config {:?}: {}; using defaults", path, e);
                    Config::default()
                }
            }
        };

        config.sanitize();
        config
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("sysvitals").join("config.json"))
    }

    /// Replace out-of-range values with their defaults, logging each one.
    fn sanitize(&mut self) {
        let defaults = PollIntervals::default();
        for (name, value, default) in [
            ("poll_intervals.cpu", &mut self.poll_intervals.cpu, defaults.cpu),
            ("poll_intervals.ram", &mut self.poll_intervals.ram, defaults.ram),
            ("poll_intervals.disk", &mut self.poll_intervals.disk, defaults.disk),
        ] {
            if *value == 0 {
                log::warn!("{} must be positive; using default {}s", name, default);
                *value = default;
            }
        }

        if self.backoff_factor < 1.0 {
            log::warn!(
                "backoff_factor {} must be >= 1.0; using default {}",
                self.backoff_factor,
                DEFAULT_BACKOFF_FACTOR
            );
            self.backoff_factor = DEFAULT_BACKOFF_FACTOR;
        }

        if self.memory_limit_mb == 0 {
            log::warn!(
                "memory_limit_mb must be positive; using default {}",
                DEFAULT_MEMORY_LIMIT_MB
            );
            self.memory_limit_mb = DEFAULT_MEMORY_LIMIT_MB;
        }
    }

    pub fn cpu_interval(&self) -> Duration {
        Duration::from_secs(self.poll_intervals.cpu)
    }

    pub fn ram_interval(&self) -> Duration {
        Duration::from_secs(self.poll_intervals.ram)
    }

    pub fn disk_interval(&self) -> Duration {
        Duration::from_secs(self.poll_intervals.disk)
    }

    pub fn temperature_interval(&self) -> Duration {
        Duration::from_secs(TEMPERATURE_INTERVAL_SECS)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}
