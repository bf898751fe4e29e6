//! Ingestion: turn raw input lines into store updates.
//!
//! Each line is expected to hold one JSON object. Several field spellings
//! are accepted because upstream emitters disagree on naming:
//!
//! | Field       | Keys, first present wins                   |
//! |-------------|--------------------------------------------|
//! | id          | `id`, `device_id` (strings)                |
//! | location    | `location`, `room` (strings), else `unknown` |
//! | timestamp   | `ts`, `time` (numbers), else wall clock    |
//! | temperature | `temp`, `temperature`, `temperature_c`     |
//! | humidity    | `humidity`, `humidity_pct`                 |
//!
//! Lines that cannot be used are dropped. A live stream always carries
//! some noise, and it must never stall or crash the display.

use crate::queue::LineQueue;
use crate::store::{DeviceKey, DeviceStore, Reading, Upsert};
use serde_json::{Map, Value};
use thiserror::Error;

/// Location used when a line names none.
pub const UNKNOWN_LOCATION: &str = "unknown";

/// Why a line was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Discard {
    /// The line does not start with valid JSON.
    #[error("malformed JSON: {0}")]
    Malformed(String),
    /// The JSON value is not an object.
    #[error("not a JSON object")]
    NotAnObject,
    /// Neither `id` nor `device_id` holds a string.
    #[error("no device id")]
    MissingId,
}

/// Counters for one or more drains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Lines taken off the queue.
    pub lines: u64,
    /// Lines that updated or created a device.
    pub applied: u64,
    /// Lines dropped as unusable.
    pub discarded: u64,
    /// Lines from the excluded location.
    pub excluded: u64,
    /// Lines from new devices the full store turned away.
    pub rejected: u64,
}

impl IngestStats {
    /// Add another batch's counters to these.
    pub fn merge(&mut self, other: Self) {
        self.lines += other.lines;
        self.applied += other.applied;
        self.discarded += other.discarded;
        self.excluded += other.excluded;
        self.rejected += other.rejected;
    }
}

/// Parse one input line into a normalized [`Reading`].
///
/// `now` stands in for a missing or zero timestamp. Anything after the
/// first JSON value on the line is ignored.
pub fn parse_line(line: &str, now: i64) -> Result<Reading, Discard> {
    let value = serde_json::Deserializer::from_str(line)
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| Discard::Malformed("empty line".to_string()))?
        .map_err(|e| Discard::Malformed(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(Discard::NotAnObject);
    };

    let id = first_str(&fields, &["id", "device_id"]).ok_or(Discard::MissingId)?;
    let location = first_str(&fields, &["location", "room"]).unwrap_or(UNKNOWN_LOCATION);

    let timestamp = ["ts", "time"]
        .iter()
        .map(|k| timestamp_of(fields.get(*k)))
        .find(|&ts| ts != 0)
        .unwrap_or(now);

    Ok(Reading {
        key: DeviceKey::new(id.trim(), location.trim()),
        timestamp,
        temperature: first_number(&fields, &["temp", "temperature", "temperature_c"]),
        humidity: first_number(&fields, &["humidity", "humidity_pct"]),
    })
}

/// First of `keys` that holds a string.
fn first_str<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| fields.get(*k).and_then(Value::as_str))
}

/// First of `keys` that holds a number.
fn first_number(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| fields.get(*k).and_then(Value::as_f64))
}

/// Whole seconds from a timestamp field; 0 when absent or not numeric.
#[allow(clippy::cast_possible_truncation)]
fn timestamp_of(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Moves lines from the queue into the store.
#[derive(Debug, Default)]
pub struct IngestionPipeline {
    totals: IngestStats,
}

impl IngestionPipeline {
    /// Create a pipeline with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one line to the store.
    pub fn ingest_line(&mut self, store: &mut DeviceStore, line: &str, now: i64) -> IngestStats {
        let mut stats = IngestStats {
            lines: 1,
            ..IngestStats::default()
        };
        match parse_line(line, now) {
            Ok(reading) => match store.upsert(&reading) {
                Upsert::Created | Upsert::Updated => stats.applied += 1,
                Upsert::Excluded => stats.excluded += 1,
                Upsert::CapacityExhausted => stats.rejected += 1,
            },
            Err(reason) => {
                log::trace!("discarding line ({reason}): {}", line.trim_end());
                stats.discarded += 1;
            }
        }
        self.totals.merge(stats);
        stats
    }

    /// Drain every line currently queued into the store.
    ///
    /// Never waits: an empty queue is an empty batch.
    pub fn drain(&mut self, queue: &LineQueue, store: &mut DeviceStore, now: i64) -> IngestStats {
        let mut batch = IngestStats::default();
        for line in queue.drain() {
            batch.merge(self.ingest_line(store, &line, now));
        }
        batch
    }

    /// Counters since the pipeline was created.
    pub const fn totals(&self) -> IngestStats {
        self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_parse_full_line() {
        let reading = parse_line(
            r#"{"id":"s1","location":"garden","temp":14.0,"humidity":82,"time":1000}"#,
            NOW,
        )
        .unwrap();
        assert_eq!(reading.key, DeviceKey::new("s1", "garden"));
        assert_eq!(reading.timestamp, 1000);
        assert_eq!(reading.temperature, Some(14.0));
        assert_eq!(reading.humidity, Some(82.0));
    }

    #[test]
    fn test_parse_alternate_keys() {
        let reading = parse_line(
            r#"{"device_id":"d7","room":"Office","temperature_c":21.25,"humidity_pct":44.5,"ts":1234.9}"#,
            NOW,
        )
        .unwrap();
        assert_eq!(reading.key, DeviceKey::new("d7", "Office"));
        assert_eq!(reading.timestamp, 1234);
        assert_eq!(reading.temperature, Some(21.25));
        assert_eq!(reading.humidity, Some(44.5));
    }

    #[test]
    fn test_parse_first_present_wins() {
        let reading = parse_line(
            r#"{"id":"a","device_id":"b","location":"x","room":"y","temp":1,"temperature":2,"humidity":3,"humidity_pct":4}"#,
            NOW,
        )
        .unwrap();
        assert_eq!(reading.key, DeviceKey::new("a", "x"));
        assert_eq!(reading.temperature, Some(1.0));
        assert_eq!(reading.humidity, Some(3.0));
    }

    #[test]
    fn test_parse_non_string_id_falls_through() {
        let reading = parse_line(r#"{"id":42,"device_id":"real"}"#, NOW).unwrap();
        assert_eq!(reading.key.id, "real");
    }

    #[test]
    fn test_parse_defaults() {
        let reading = parse_line(r#"{"id":"s1"}"#, NOW).unwrap();
        assert_eq!(reading.key.location, UNKNOWN_LOCATION);
        assert_eq!(reading.timestamp, NOW);
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.humidity, None);
    }

    #[test]
    fn test_parse_zero_ts_falls_back_to_time() {
        let reading = parse_line(r#"{"id":"s1","ts":0,"time":55}"#, NOW).unwrap();
        assert_eq!(reading.timestamp, 55);
    }

    #[test]
    fn test_parse_non_numeric_timestamp_uses_now() {
        let reading = parse_line(r#"{"id":"s1","ts":"yesterday"}"#, NOW).unwrap();
        assert_eq!(reading.timestamp, NOW);
    }

    #[test]
    fn test_parse_non_numeric_values_ignored() {
        let reading = parse_line(r#"{"id":"s1","temp":"warm","temperature":19.5,"humidity":null}"#, NOW).unwrap();
        assert_eq!(reading.temperature, Some(19.5));
        assert_eq!(reading.humidity, None);
    }

    #[test]
    fn test_parse_trims_id_and_location() {
        let reading = parse_line(r#"{"id":"  s1 ","location":" attic\t"}"#, NOW).unwrap();
        assert_eq!(reading.key, DeviceKey::new("s1", "attic"));
    }

    #[test]
    fn test_parse_ignores_trailing_content() {
        let reading = parse_line(r#"{"id":"s1","temp":3} trailing garbage"#, NOW).unwrap();
        assert_eq!(reading.temperature, Some(3.0));
    }

    #[test]
    fn test_parse_discards() {
        assert!(matches!(parse_line("not json", NOW), Err(Discard::Malformed(_))));
        assert!(matches!(parse_line("", NOW), Err(Discard::Malformed(_))));
        assert!(matches!(parse_line("{\"id\":", NOW), Err(Discard::Malformed(_))));
        assert_eq!(parse_line("[1,2,3]", NOW), Err(Discard::NotAnObject));
        assert_eq!(parse_line("17", NOW), Err(Discard::NotAnObject));
        assert_eq!(parse_line(r#"{"location":"garden","temp":3}"#, NOW), Err(Discard::MissingId));
    }

    #[test]
    fn test_ingest_excluded_after_trim() {
        let mut store = DeviceStore::new(16, "attic");
        let mut pipeline = IngestionPipeline::new();
        let stats = pipeline.ingest_line(&mut store, r#"{"id":"s1","location":"  Attic "}"#, NOW);
        assert_eq!(stats.excluded, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_drain_applies_and_counts() {
        let queue = LineQueue::new(16);
        queue.push(r#"{"id":"s1","location":"garden","temp":14.0,"humidity":82,"time":1000}"#.to_string());
        queue.push("garbage".to_string());
        queue.push(r#"{"id":"s1","location":"garden","humidity":80,"time":1100}"#.to_string());
        queue.push(r#"{"id":"s2","location":"attic","temp":40}"#.to_string());

        let mut store = DeviceStore::new(16, "attic");
        let mut pipeline = IngestionPipeline::new();
        let stats = pipeline.drain(&queue, &mut store, NOW);

        assert_eq!(stats.lines, 4);
        assert_eq!(stats.applied, 2);
        assert_eq!(stats.discarded, 1);
        assert_eq!(stats.excluded, 1);
        assert!(queue.is_empty());

        let record = store.get(&DeviceKey::new("s1", "garden")).unwrap();
        assert_eq!(record.temperature, Some(14.0));
        assert_eq!(record.humidity, Some(80.0));
        assert_eq!(record.last_seen, 1100);

        assert_eq!(pipeline.totals(), stats);
    }

    #[test]
    fn test_drain_empty_queue() {
        let queue = LineQueue::new(4);
        let mut store = DeviceStore::new(16, "attic");
        let stats = IngestionPipeline::new().drain(&queue, &mut store, NOW);
        assert_eq!(stats, IngestStats::default());
    }
}
