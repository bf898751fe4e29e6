//! Dashboard configuration.
//!
//! Everything tunable lives in [`DashboardConfig`]. Defaults match a
//! typical home sensor setup; the freshness window can be overridden from
//! the environment, the rest from the command line.

use crate::error::{Error, Result};
use std::time::Duration;

/// Environment variable holding the freshness window override, in seconds.
pub const STALE_SECS_ENV: &str = "SB_STALE_SECS";

/// Default freshness window, in seconds.
pub const DEFAULT_FRESHNESS_SECS: i64 = 900;

/// Freshness windows must lie strictly inside `(0, MAX_FRESHNESS_SECS)`.
pub const MAX_FRESHNESS_SECS: i64 = 86_400;

/// Configuration for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// A reading younger than this many seconds is fresh.
    pub freshness_window: i64,
    /// Target time between two frames.
    pub frame_interval: Duration,
    /// Lines buffered between the reader and the frame loop.
    pub queue_capacity: usize,
    /// Distinct devices tracked before new ones are dropped.
    pub store_capacity: usize,
    /// Devices in this location are never stored or shown (case-insensitive).
    pub excluded_location: String,
    /// Location that forms the garden partition (case-insensitive).
    pub garden_location: String,
    /// Comfortable indoor humidity, percent, both ends inclusive.
    pub humidity_band: (f64, f64),
    /// Reader sleep after a transient "nothing available".
    pub reader_backoff: Duration,
    /// How long shutdown waits for a reader blocked in a read.
    pub shutdown_grace: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            freshness_window: DEFAULT_FRESHNESS_SECS,
            frame_interval: Duration::from_millis(25),
            queue_capacity: 1024,
            store_capacity: 1024,
            excluded_location: "attic".to_string(),
            garden_location: "garden".to_string(),
            humidity_band: (30.0, 60.0),
            reader_backoff: Duration::from_millis(30),
            shutdown_grace: Duration::from_millis(250),
        }
    }
}

impl DashboardConfig {
    /// Default configuration with the freshness window taken from
    /// [`STALE_SECS_ENV`] when it holds a valid value.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(window) = std::env::var(STALE_SECS_ENV).ok().as_deref().and_then(parse_freshness_window) {
            config.freshness_window = window;
        }
        config
    }
}

/// Parse a freshness window override.
///
/// Returns `None` for anything that is not an integer strictly between
/// 0 and 86400; callers keep their current value in that case.
pub fn parse_freshness_window(raw: &str) -> Option<i64> {
    let value: i64 = raw.trim().parse().ok()?;
    (value > 0 && value < MAX_FRESHNESS_SECS).then_some(value)
}

/// Command-line values, each replacing the configured one when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Freshness window in seconds.
    pub stale_secs: Option<i64>,
    /// Frame interval in milliseconds.
    pub frame_ms: Option<u64>,
    /// Line queue capacity.
    pub queue_capacity: Option<usize>,
    /// Device store capacity.
    pub max_devices: Option<usize>,
    /// Location whose devices are ignored.
    pub exclude: Option<String>,
}

impl DashboardConfig {
    /// Apply command-line overrides.
    ///
    /// Unlike the environment override, an out-of-range value here is an
    /// error: the user asked for it explicitly.
    pub fn apply(mut self, overrides: &Overrides) -> Result<Self> {
        if let Some(secs) = overrides.stale_secs {
            if secs <= 0 || secs >= MAX_FRESHNESS_SECS {
                return Err(Error::Config(format!(
                    "--stale-secs must be between 1 and {}, got {secs}",
                    MAX_FRESHNESS_SECS - 1
                )));
            }
            self.freshness_window = secs;
        }
        if let Some(ms) = overrides.frame_ms {
            if ms == 0 {
                return Err(Error::Config("--frame-ms must be at least 1".to_string()));
            }
            self.frame_interval = Duration::from_millis(ms);
        }
        if let Some(capacity) = overrides.queue_capacity {
            if capacity == 0 {
                return Err(Error::Config("--queue-capacity must be at least 1".to_string()));
            }
            self.queue_capacity = capacity;
        }
        if let Some(capacity) = overrides.max_devices {
            if capacity == 0 {
                return Err(Error::Config("--max-devices must be at least 1".to_string()));
            }
            self.store_capacity = capacity;
        }
        if let Some(location) = &overrides.exclude {
            self.excluded_location = location.trim().to_string();
        }
        Ok(self)
    }
}
