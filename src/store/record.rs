//! Device records and the readings that update them.

/// Identity of a device: the same id in two locations is two devices.
///
/// Ordering is by id, then location, which is the table's display order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceKey {
    /// Device identifier, trimmed.
    pub id: String,
    /// Location name, trimmed.
    pub location: String,
}

impl DeviceKey {
    /// Create a new key.
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
        }
    }
}

/// One normalized input line.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Which device sent it.
    pub key: DeviceKey,
    /// Unix timestamp, seconds.
    pub timestamp: i64,
    /// Temperature in °C, if the line carried one.
    pub temperature: Option<f64>,
    /// Relative humidity in percent, if the line carried one.
    pub humidity: Option<f64>,
}

/// Latest known state of one device.
///
/// A record with neither value is legal: the device has been seen but
/// has not reported anything yet.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    /// Device identity.
    pub key: DeviceKey,
    /// Timestamp of the most recent line, seconds.
    pub last_seen: i64,
    /// Last reported temperature, °C.
    pub temperature: Option<f64>,
    /// Last reported relative humidity, percent.
    pub humidity: Option<f64>,
}

impl DeviceRecord {
    /// A freshly sighted device with no values yet.
    pub const fn new(key: DeviceKey) -> Self {
        Self {
            key,
            last_seen: 0,
            temperature: None,
            humidity: None,
        }
    }

    /// Device id.
    pub fn id(&self) -> &str {
        &self.key.id
    }

    /// Device location.
    pub fn location(&self) -> &str {
        &self.key.location
    }

    /// Apply a reading: the timestamp always moves, each value only when
    /// the reading carries it.
    pub fn apply(&mut self, reading: &Reading) {
        self.last_seen = reading.timestamp;
        if let Some(t) = reading.temperature {
            self.temperature = Some(t);
        }
        if let Some(h) = reading.humidity {
            self.humidity = Some(h);
        }
    }

    /// Seconds since the last reading, never negative.
    pub fn age(&self, now: i64) -> i64 {
        now.saturating_sub(self.last_seen).max(0)
    }

    /// Whether the record reports at least one value.
    pub const fn has_values(&self) -> bool {
        self.temperature.is_some() || self.humidity.is_some()
    }
}
