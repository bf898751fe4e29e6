//! Device store: the latest state of every device seen on the stream.
//!
//! Owned by the frame loop. Ingestion writes to it, the aggregator and
//! the table read from it, all on the same thread, so no locking.

mod record;

pub use record::{DeviceKey, DeviceRecord, Reading};

use std::collections::BTreeMap;

/// What an [`DeviceStore::upsert`] did with a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new device was added.
    Created,
    /// An existing device was updated.
    Updated,
    /// The reading came from the excluded location and was dropped.
    Excluded,
    /// The device is new but the store is full; the reading was dropped.
    CapacityExhausted,
}

/// In-memory table of devices keyed by (id, location).
///
/// Records are never removed. Once `capacity` distinct devices are known,
/// readings from further new devices are dropped while known devices keep
/// updating.
#[derive(Debug, Clone)]
pub struct DeviceStore {
    records: BTreeMap<DeviceKey, DeviceRecord>,
    capacity: usize,
    excluded_location: String,
    /// Set once the first device has been turned away.
    overflowed: bool,
}

impl DeviceStore {
    /// Create an empty store.
    pub fn new(capacity: usize, excluded_location: impl Into<String>) -> Self {
        Self {
            records: BTreeMap::new(),
            capacity,
            excluded_location: excluded_location.into(),
            overflowed: false,
        }
    }

    /// Whether `location` is the excluded one (case-insensitive).
    pub fn is_excluded(&self, location: &str) -> bool {
        location.eq_ignore_ascii_case(&self.excluded_location)
    }

    /// Insert or update the device a reading belongs to.
    pub fn upsert(&mut self, reading: &Reading) -> Upsert {
        if self.is_excluded(&reading.key.location) {
            return Upsert::Excluded;
        }

        if let Some(record) = self.records.get_mut(&reading.key) {
            record.apply(reading);
            return Upsert::Updated;
        }

        if self.records.len() >= self.capacity {
            if self.overflowed {
                log::debug!("device store full, dropping {:?}", reading.key);
            } else {
                self.overflowed = true;
                log::warn!(
                    "device store full ({} devices), new devices are dropped from now on; first was {:?}",
                    self.capacity,
                    reading.key
                );
            }
            return Upsert::CapacityExhausted;
        }

        let mut record = DeviceRecord::new(reading.key.clone());
        record.apply(reading);
        self.records.insert(reading.key.clone(), record);
        Upsert::Created
    }

    /// Look up a device.
    pub fn get(&self, key: &DeviceKey) -> Option<&DeviceRecord> {
        self.records.get(key)
    }

    /// All visible records, sorted by id then location.
    ///
    /// Excluded devices are never stored, but the filter is repeated here
    /// so the view stays correct even if exclusion rules change.
    pub fn records(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.records.values().filter(|r| !self.is_excluded(r.location()))
    }

    /// Number of devices stored.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no device has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of devices.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
