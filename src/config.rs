//! Stage configuration using Figment
//!
//! Configuration is loaded from:
//! 1. `config/ell14.toml` (base configuration, optional)
//! 2. Environment variables prefixed with `ELL14_`, nested keys separated by `__`
//!
//! Every field has a default, so an absent file yields a usable configuration.
//!
//! # Example
//! ```no_run
//! use ell14_stage::config::StageConfig;
//!
//! let config = StageConfig::load()?;
//! config.validate()?;
//! println!("Port: {}", config.port);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ```toml
//! port = "/dev/ttyUSB0"
//! address = "0"
//! timeout = "1s"
//! poll_interval = "50ms"
//! ready_timeout = "30s"   # "0s" waits forever
//!
//! [scan]
//! start_deg = 0.0
//! stop_deg = 180.0
//! step_deg = 5.0
//! dwell = "5s"
//! ```

use crate::address::Address;
use crate::driver::DriverSettings;
use crate::error::{Ell14Error, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/ell14.toml";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "ELL14_";

/// Upper bound on the number of points in one scan.
const MAX_SCAN_POINTS: f64 = 100_000.0;

/// Top-level stage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Serial port path (e.g., "/dev/ttyUSB0", "COM11")
    #[serde(default = "default_port")]
    pub port: String,
    /// Device address on the bus (0-9)
    #[serde(default)]
    pub address: Address,
    /// Initial software offset in encoder counts
    #[serde(default)]
    pub offset: i64,
    /// Budget for one complete response frame
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    /// Timeout of a single serial read
    #[serde(default = "default_read_timeout", with = "humantime_serde")]
    pub read_timeout: Duration,
    /// Interval between status polls while busy
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Limit on busy polling, zero disables the limit
    #[serde(default = "default_ready_timeout", with = "humantime_serde")]
    pub ready_timeout: Duration,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Angle sweep settings
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Angle sweep settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// First angle in degrees
    #[serde(default)]
    pub start_deg: f64,
    /// Last angle in degrees, included when hit exactly
    #[serde(default = "default_stop_deg")]
    pub stop_deg: f64,
    /// Increment between angles in degrees
    #[serde(default = "default_step_deg")]
    pub step_deg: f64,
    /// Settling time at each angle before reading back
    #[serde(default = "default_dwell", with = "humantime_serde")]
    pub dwell: Duration,
}

// Default value functions
fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(1)
}

fn default_read_timeout() -> Duration {
    Duration::from_millis(50)
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(50)
}

fn default_ready_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_stop_deg() -> f64 {
    180.0
}

fn default_step_deg() -> f64 {
    5.0
}

fn default_dwell() -> Duration {
    Duration::from_secs(5)
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            address: Address::default(),
            offset: 0,
            timeout: default_timeout(),
            read_timeout: default_read_timeout(),
            poll_interval: default_poll_interval(),
            ready_timeout: default_ready_timeout(),
            log_level: default_log_level(),
            scan: ScanConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start_deg: 0.0,
            stop_deg: default_stop_deg(),
            step_deg: default_step_deg(),
            dwell: default_dwell(),
        }
    }
}

impl StageConfig {
    /// Load configuration from `config/ell14.toml` and environment variables
    ///
    /// Example override: `ELL14_SCAN__STEP_DEG=10`
    pub fn load() -> std::result::Result<Self, figment::Error> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path
    pub fn load_from<P: AsRef<Path>>(path: P) -> std::result::Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Ell14Error::Configuration(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        if self.port.trim().is_empty() {
            return Err(Ell14Error::Configuration("port must not be empty".into()));
        }

        let max_offset = i64::from(u32::MAX);
        if !(-max_offset..=max_offset).contains(&self.offset) {
            return Err(Ell14Error::Configuration(format!(
                "offset {} is outside the 32-bit position range",
                self.offset
            )));
        }

        for (name, value) in [
            ("timeout", self.timeout),
            ("read_timeout", self.read_timeout),
            ("poll_interval", self.poll_interval),
        ] {
            if value.is_zero() {
                return Err(Ell14Error::Configuration(format!("{} must be non-zero", name)));
            }
        }

        self.scan.validate()
    }

    /// Driver timing settings derived from this configuration
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            timeout: self.timeout,
            poll_interval: self.poll_interval,
            ready_timeout: (!self.ready_timeout.is_zero()).then_some(self.ready_timeout),
        }
    }
}

impl ScanConfig {
    /// Check the sweep is finite and reaches `stop_deg` from `start_deg`
    pub fn validate(&self) -> Result<()> {
        if !(self.start_deg.is_finite() && self.stop_deg.is_finite() && self.step_deg.is_finite()) {
            return Err(Ell14Error::Configuration(
                "scan angles must be finite".into(),
            ));
        }
        if self.step_deg == 0.0 {
            return Err(Ell14Error::Configuration("scan.step_deg must be non-zero".into()));
        }

        let steps = (self.stop_deg - self.start_deg) / self.step_deg;
        if steps < 0.0 {
            return Err(Ell14Error::Configuration(format!(
                "scan.step_deg {} moves away from stop_deg {}",
                self.step_deg, self.stop_deg
            )));
        }
        if steps > MAX_SCAN_POINTS {
            return Err(Ell14Error::Configuration(format!(
                "scan would visit more than {} angles",
                MAX_SCAN_POINTS
            )));
        }
        Ok(())
    }
}
