//! Dashboard: everything the frame loop owns apart from the terminal.
//!
//! Holds the device store, the ingestion pipeline and the scroll offset,
//! and knows how to draw one complete frame into a [`Buffer`]. Nothing
//! here touches a terminal, so a frame can be rendered and inspected in
//! tests or benchmarks.

use crate::actor::Command;
use crate::aggregate::{Aggregator, Summary};
use crate::buffer::{Buffer, Style};
use crate::config::DashboardConfig;
use crate::ingest::{IngestStats, IngestionPipeline};
use crate::layout::DashboardLayout;
use crate::queue::LineQueue;
use crate::store::DeviceStore;
use crate::widget::{clamp_scroll, SensorTable, SummaryPanel, TableRow, Widget};

/// Key help shown on the last row.
pub const HELP: &str = "q quit • ↑/↓ or j/k to scroll • PgUp/PgDn page • Averages include only fresh readings";

/// Per-frame state of the dashboard.
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    store: DeviceStore,
    pipeline: IngestionPipeline,
    aggregator: Aggregator,
    scroll: usize,
    /// Table rows visible in the last rendered frame.
    visible: usize,
}

impl Dashboard {
    /// Create an empty dashboard.
    pub fn new(config: DashboardConfig) -> Self {
        let store = DeviceStore::new(config.store_capacity, config.excluded_location.clone());
        let aggregator = Aggregator::new(config.freshness_window, config.garden_location.clone());
        Self {
            config,
            store,
            pipeline: IngestionPipeline::new(),
            aggregator,
            scroll: 0,
            visible: 0,
        }
    }

    /// Drain every queued line into the store.
    pub fn ingest(&mut self, queue: &LineQueue, now: i64) -> IngestStats {
        self.pipeline.drain(queue, &mut self.store, now)
    }

    /// Apply a single line to the store.
    pub fn ingest_line(&mut self, line: &str, now: i64) -> IngestStats {
        self.pipeline.ingest_line(&mut self.store, line, now)
    }

    /// Current averages.
    pub fn summary(&self, now: i64) -> Summary {
        self.aggregator.summarize(self.store.records(), now)
    }

    /// Table rows in display order.
    pub fn rows(&self, now: i64) -> Vec<TableRow> {
        self.store
            .records()
            .map(|record| TableRow::from_record(record, now, &self.config))
            .collect()
    }

    /// React to a command. Only scrolling changes dashboard state.
    pub fn apply(&mut self, command: Command) {
        if let Command::Scroll(delta) = command {
            self.scroll_by(delta);
        }
    }

    /// Move the table by `delta` rows, clamped to the last frame's page.
    pub fn scroll_by(&mut self, delta: i32) {
        let magnitude = delta.unsigned_abs() as usize;
        let offset = if delta < 0 {
            self.scroll.saturating_sub(magnitude)
        } else {
            self.scroll.saturating_add(magnitude)
        };
        self.scroll = clamp_scroll(offset, self.store.len(), self.visible);
    }

    /// Draw a complete frame into `buffer`, which is cleared first.
    pub fn render(&mut self, buffer: &mut Buffer, now: i64) {
        buffer.clear();
        let layout = DashboardLayout::compute(buffer.width(), buffer.height());

        let title = format!("Sensors — excluding '{}'", self.config.excluded_location);
        buffer.put_str_clipped(layout.title.x, layout.title.y, &title, layout.title.width, Style::bold());

        let summary = self.summary(now);
        let window = self.config.freshness_window;
        let inside_title = format!("Inside (location != '{}')", self.config.garden_location);
        let garden_title = format!("Garden (location == '{}')", self.config.garden_location);
        SummaryPanel::new(&inside_title, summary.inside, window).render(layout.inside_panel, buffer);
        SummaryPanel::new(&garden_title, summary.garden, window).render(layout.garden_panel, buffer);

        let rows = self.rows(now);
        self.visible = SensorTable::visible_rows(layout.table);
        self.scroll = clamp_scroll(self.scroll, rows.len(), self.visible);
        SensorTable::new(&rows, self.scroll, self.config.humidity_band).render(layout.table, buffer);

        buffer.put_str_clipped(layout.footer.x, layout.footer.y, HELP, layout.footer.width, Style::dim());
    }

    /// Current scroll offset.
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    /// The device store.
    pub const fn store(&self) -> &DeviceStore {
        &self.store
    }

    /// Ingestion counters since start.
    pub const fn totals(&self) -> IngestStats {
        self.pipeline.totals()
    }

    /// The configuration in use.
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }
}
