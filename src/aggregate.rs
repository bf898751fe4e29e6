//! Aggregation: freshness, partition averages, and dew point.
//!
//! Freshness is a pure function of `now`, so nothing here is cached on the
//! records; every frame recomputes it.

use crate::store::DeviceRecord;

/// Magnus-Tetens coefficient `a` (dimensionless).
const MAGNUS_A: f64 = 17.62;
/// Magnus-Tetens coefficient `b` (°C).
const MAGNUS_B: f64 = 243.12;

/// Whether a reading taken at `last_seen` is fresh at `now`.
#[inline]
pub const fn is_fresh(last_seen: i64, now: i64, window: i64) -> bool {
    now.saturating_sub(last_seen) < window
}

/// Dew point in °C for temperature `t_c` (°C) and relative humidity
/// `rh_pct` (%), using the Magnus-Tetens approximation.
///
/// Returns `None` when humidity is outside `(0, 100]` or the result is
/// not finite.
pub fn dew_point(t_c: f64, rh_pct: f64) -> Option<f64> {
    if !t_c.is_finite() || !rh_pct.is_finite() || rh_pct <= 0.0 || rh_pct > 100.0 {
        return None;
    }
    let gamma = (rh_pct / 100.0).ln() + (MAGNUS_A * t_c) / (MAGNUS_B + t_c);
    let dp = (MAGNUS_B * gamma) / (MAGNUS_A - gamma);
    dp.is_finite().then_some(dp)
}

/// Dew point for a record, if it has both values.
pub fn record_dew_point(record: &DeviceRecord) -> Option<f64> {
    dew_point(record.temperature?, record.humidity?)
}

/// The two averaging groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Every location except the garden.
    Inside,
    /// The garden location.
    Garden,
}

impl Partition {
    /// Partition of a location, given the garden's name (case-insensitive).
    pub fn of(location: &str, garden: &str) -> Self {
        if location.eq_ignore_ascii_case(garden) {
            Self::Garden
        } else {
            Self::Inside
        }
    }
}

/// Running mean that knows the difference between "zero" and "no data".
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Averages for one partition. `None` means no fresh record had the field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartitionSummary {
    /// Mean temperature, °C.
    pub temperature: Option<f64>,
    /// Mean relative humidity, percent.
    pub humidity: Option<f64>,
    /// Fresh records contributing either value.
    pub devices: usize,
}

/// Averages for both partitions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// Everything but the garden.
    pub inside: PartitionSummary,
    /// The garden.
    pub garden: PartitionSummary,
}

impl Summary {
    /// Summary for one partition.
    pub const fn partition(&self, partition: Partition) -> &PartitionSummary {
        match partition {
            Partition::Inside => &self.inside,
            Partition::Garden => &self.garden,
        }
    }
}

/// Computes per-partition averages over fresh records.
#[derive(Debug, Clone)]
pub struct Aggregator {
    window: i64,
    garden: String,
}

impl Aggregator {
    /// Create an aggregator for a freshness window and garden location.
    pub fn new(window: i64, garden: impl Into<String>) -> Self {
        Self {
            window,
            garden: garden.into(),
        }
    }

    /// Average the fresh records among `records` at time `now`.
    pub fn summarize<'a>(&self, records: impl IntoIterator<Item = &'a DeviceRecord>, now: i64) -> Summary {
        #[derive(Default)]
        struct Acc {
            temperature: Mean,
            humidity: Mean,
            devices: usize,
        }

        let mut inside = Acc::default();
        let mut garden = Acc::default();

        for record in records {
            if !is_fresh(record.last_seen, now, self.window) {
                continue;
            }
            let acc = match Partition::of(record.location(), &self.garden) {
                Partition::Inside => &mut inside,
                Partition::Garden => &mut garden,
            };
            acc.temperature.add(record.temperature);
            acc.humidity.add(record.humidity);
            if record.has_values() {
                acc.devices += 1;
            }
        }

        let finish = |acc: Acc| PartitionSummary {
            temperature: acc.temperature.value(),
            humidity: acc.humidity.value(),
            devices: acc.devices,
        };
        Summary {
            inside: finish(inside),
            garden: finish(garden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DeviceKey, DeviceStore, Reading};

    fn record(location: &str, last_seen: i64, temperature: Option<f64>, humidity: Option<f64>) -> DeviceRecord {
        DeviceRecord {
            key: DeviceKey::new("dev", location),
            last_seen,
            temperature,
            humidity,
        }
    }

    #[test]
    fn test_freshness_boundaries() {
        let now = 10_000;
        for window in [1, 60, 900, 86_399] {
            assert!(is_fresh(now, now, window));
            assert!(!is_fresh(now - window - 1, now, window));
            assert!(!is_fresh(now - window, now, window));
            assert!(is_fresh(now - window + 1, now, window));
        }
    }

    #[test]
    fn test_dew_point_reference_value() {
        let dp = dew_point(20.0, 50.0).unwrap();
        assert!((dp - 9.3).abs() < 0.1, "dew point was {dp}");
    }

    #[test]
    fn test_dew_point_saturated_equals_temperature() {
        for t in [-10.0, 0.0, 14.0, 35.5] {
            let dp = dew_point(t, 100.0).unwrap();
            assert!((dp - t).abs() < 1e-9, "t={t} dp={dp}");
        }
    }

    #[test]
    fn test_dew_point_out_of_range() {
        assert_eq!(dew_point(20.0, 0.0), None);
        assert_eq!(dew_point(20.0, -3.0), None);
        assert_eq!(dew_point(20.0, 100.1), None);
        assert_eq!(dew_point(f64::NAN, 50.0), None);
        // b + T == 0 blows up
        assert_eq!(dew_point(-243.12, 50.0), None);
    }

    #[test]
    fn test_record_dew_point_needs_both_values() {
        assert!(record_dew_point(&record("k", 0, Some(20.0), Some(50.0))).is_some());
        assert_eq!(record_dew_point(&record("k", 0, Some(20.0), None)), None);
        assert_eq!(record_dew_point(&record("k", 0, None, Some(50.0))), None);
    }

    #[test]
    fn test_partition_case_insensitive() {
        assert_eq!(Partition::of("Garden", "garden"), Partition::Garden);
        assert_eq!(Partition::of("garden shed", "garden"), Partition::Inside);
        assert_eq!(Partition::of("kitchen", "garden"), Partition::Inside);
    }

    #[test]
    fn test_no_data_is_not_zero() {
        let aggregator = Aggregator::new(900, "garden");
        let records = [record("kitchen", 1_000, None, Some(40.0))];
        let summary = aggregator.summarize(&records, 1_000);

        assert_eq!(summary.inside.temperature, None);
        assert_eq!(summary.inside.humidity, Some(40.0));
        assert_eq!(summary.inside.devices, 1);
        assert_eq!(summary.garden, PartitionSummary::default());
    }

    #[test]
    fn test_means_count_fields_independently() {
        let aggregator = Aggregator::new(900, "garden");
        let records = [
            record("kitchen", 1_000, Some(20.0), Some(40.0)),
            record("office", 1_000, Some(22.0), None),
            record("bedroom", 1_000, None, Some(50.0)),
            record("hall", 1_000, None, None),
        ];
        let summary = aggregator.summarize(&records, 1_000);

        assert_eq!(summary.inside.temperature, Some(21.0));
        assert_eq!(summary.inside.humidity, Some(45.0));
        // The valueless hall sensor does not count
        assert_eq!(summary.inside.devices, 3);
    }

    #[test]
    fn test_stale_records_excluded_from_means() {
        let aggregator = Aggregator::new(900, "garden");
        let records = [
            record("kitchen", 10_000, Some(20.0), None),
            record("office", 10_000 - 901, Some(30.0), None),
        ];
        let summary = aggregator.summarize(&records, 10_000);
        assert_eq!(summary.inside.temperature, Some(20.0));
        assert_eq!(summary.inside.devices, 1);
    }

    #[test]
    fn test_garden_scenario_latest_value_wins() {
        let mut store = DeviceStore::new(16, "attic");
        let key = DeviceKey::new("s1", "garden");
        store.upsert(&Reading {
            key: key.clone(),
            timestamp: 1000,
            temperature: Some(14.0),
            humidity: Some(82.0),
        });
        store.upsert(&Reading {
            key,
            timestamp: 1100,
            temperature: None,
            humidity: Some(80.0),
        });

        let summary = Aggregator::new(900, "garden").summarize(store.records(), 1100);
        assert_eq!(summary.garden.temperature, Some(14.0));
        assert_eq!(summary.garden.humidity, Some(80.0));
        assert_eq!(summary.garden.devices, 1);
        assert_eq!(summary.partition(Partition::Inside).devices, 0);
    }
}
