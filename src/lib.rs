//! # Sensordash
//!
//! A live terminal dashboard for newline-delimited JSON sensor readings.
//!
//! One thread reads lines from stdin; the frame loop drains them, keeps the
//! latest state of every device, and redraws summary panels and a sorted,
//! scrollable table at a fixed cadence.
//!
//! ## Core Concepts
//!
//! - **Lossy line queue**: the reader never waits; when the queue is full
//!   the oldest line is dropped
//! - **Last write wins per field**: a line with only humidity keeps the
//!   known temperature
//! - **Freshness window**: only recent readings count toward averages, and
//!   older rows are dimmed
//! - **Double-buffered rendering**: frames are drawn into a cell buffer and
//!   only changed cells reach the terminal
//!
//! ## Example
//!
//! ```rust
//! use sensordash::{Buffer, Dashboard, DashboardConfig};
//!
//! let mut dashboard = Dashboard::new(DashboardConfig::default());
//! dashboard.ingest_line(r#"{"id":"s1","location":"garden","temp":14.0,"humidity":80}"#, 1_000);
//!
//! let mut frame = Buffer::new(80, 24);
//! dashboard.render(&mut frame, 1_000);
//! assert!(frame.row_text(0).starts_with("Sensors"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod aggregate;
pub mod app;
pub mod buffer;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod ingest;
pub mod layout;
pub mod queue;
pub mod store;
pub mod terminal;
pub mod widget;

// Re-exports for convenience
pub use aggregate::{Aggregator, PartitionSummary, Summary};
pub use app::{App, RunState, ShutdownReport};
pub use buffer::{Buffer, Cell, Modifiers, Rgb, Style};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use ingest::IngestionPipeline;
pub use layout::Rect;
pub use queue::LineQueue;
pub use store::{DeviceKey, DeviceRecord, DeviceStore};
