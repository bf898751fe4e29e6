//! Sensor table: one row per device, sorted, scrollable.
//!
//! # Column negotiation
//!
//! Every column has a target width. When the targets (plus one-column
//! gaps) do not fit, width is taken from Room and Device first, half of
//! the overflow each, down to their minimums. Whatever still does not fit
//! is clipped at the box border, so narrow terminals truncate the wide
//! text columns instead of dropping numbers.
//!
//! # Row styling
//!
//! - Stale rows (outside the freshness window) are dimmed.
//! - An indoor device's humidity outside the comfort band is drawn white
//!   on red. Garden devices are never highlighted.
//!
//! Both can apply to the same row.

use super::block::Block;
use super::traits::Widget;
use crate::aggregate::{is_fresh, record_dew_point, Partition};
use crate::buffer::{Buffer, Modifiers, Rgb, Style};
use crate::config::DashboardConfig;
use crate::layout::Rect;
use crate::store::DeviceRecord;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Placeholder for a missing value in a cell.
pub const MISSING: &str = "-";

/// Number of table columns.
pub const COLUMN_COUNT: usize = 6;

const ROOM: usize = 0;
const DEVICE: usize = 1;
const HUMIDITY: usize = 3;

/// Column headers, left to right.
pub const HEADERS: [&str; COLUMN_COUNT] = ["Room", "Device", "Temp(°C)", "RH(%)", "DewPt(°C)", "Age(s)"];

/// Preferred column widths.
pub const TARGET_WIDTHS: [u16; COLUMN_COUNT] = [14, 18, 10, 7, 11, 8];

/// Room is never shrunk below this.
const ROOM_MIN: u16 = 8;
/// Device is never shrunk below this.
const DEVICE_MIN: u16 = 10;
/// Negotiation assumes at least this much room even on tinier terminals.
const MIN_NEGOTIATED_WIDTH: u16 = 20;

/// Rows inside the box not available for data: header and footer.
const CHROME_ROWS: u16 = 2;

/// Total width of `widths` including the one-column gaps.
pub fn total_width(widths: &[u16; COLUMN_COUNT]) -> u16 {
    widths.iter().sum::<u16>() + (COLUMN_COUNT as u16 - 1)
}

/// Fit the column targets into `available` columns.
pub fn negotiate_widths(available: u16) -> [u16; COLUMN_COUNT] {
    let available = available.max(MIN_NEGOTIATED_WIDTH);
    let mut widths = TARGET_WIDTHS;
    let total = total_width(&widths);
    if total <= available {
        return widths;
    }

    let over = total - available;
    let take_room = (over / 2).min(widths[ROOM] - ROOM_MIN);
    let take_device = (over - take_room).min(widths[DEVICE] - DEVICE_MIN);
    widths[ROOM] -= take_room;
    widths[DEVICE] -= take_device;
    widths
}

/// Clamp a scroll offset so the last page is never scrolled past.
pub fn clamp_scroll(offset: usize, rows: usize, visible: usize) -> usize {
    offset.min(rows.saturating_sub(visible))
}

/// Left-align `text` in `width` columns, truncating if needed.
pub fn fit_left(text: &str, width: u16) -> String {
    let width = usize::from(width);
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for g in text.graphemes(true) {
        let w = g.width();
        if used + w > width {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

/// Right-align `text` in `width` columns, truncating if needed.
pub fn fit_right(text: &str, width: u16) -> String {
    let used = text.width();
    if used >= usize::from(width) {
        return fit_left(text, width);
    }
    format!("{}{text}", " ".repeat(usize::from(width) - used))
}

/// One formatted table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Unpadded cell texts, in column order.
    pub cells: [String; COLUMN_COUNT],
    /// Outside the freshness window.
    pub stale: bool,
    /// Humidity cell needs the alert style.
    pub alert: bool,
}

impl TableRow {
    /// Format `record` as seen at `now`.
    pub fn from_record(record: &DeviceRecord, now: i64, config: &DashboardConfig) -> Self {
        let number = |value: Option<f64>, decimals: usize| {
            value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.decimals$}"))
        };

        let garden = Partition::of(record.location(), &config.garden_location) == Partition::Garden;
        let (low, high) = config.humidity_band;
        let alert = !garden && record.humidity.is_some_and(|h| h < low || h > high);

        Self {
            cells: [
                record.location().to_string(),
                record.id().to_string(),
                number(record.temperature, 1),
                number(record.humidity, 0),
                number(record_dew_point(record), 1),
                record.age(now).to_string(),
            ],
            stale: !is_fresh(record.last_seen, now, config.freshness_window),
            alert,
        }
    }

    /// Padded cell text for column `col` at `width`.
    fn cell_text(&self, col: usize, width: u16) -> String {
        match col {
            ROOM | DEVICE => fit_left(&self.cells[col], width),
            _ => fit_right(&self.cells[col], width),
        }
    }
}

/// The boxed sensor table.
#[derive(Debug, Clone)]
pub struct SensorTable<'a> {
    rows: &'a [TableRow],
    scroll: usize,
    humidity_band: (f64, f64),
}

impl<'a> SensorTable<'a> {
    /// Box title.
    pub const TITLE: &'static str = "Sensors (dew point shown per row)";

    /// Create a table showing `rows` from `scroll` on. `scroll` is
    /// expected to be clamped already (see [`clamp_scroll`]).
    pub const fn new(rows: &'a [TableRow], scroll: usize, humidity_band: (f64, f64)) -> Self {
        Self {
            rows,
            scroll,
            humidity_band,
        }
    }

    /// Number of data rows visible in a table drawn into `area`.
    pub fn visible_rows(area: Rect) -> usize {
        usize::from(Block::inner(area).height.saturating_sub(CHROME_ROWS))
    }

    /// Style for a cell of a row.
    pub fn cell_style(row: &TableRow, col: usize) -> Style {
        let base = if row.stale { Style::dim() } else { Style::PLAIN };
        if col == HUMIDITY && row.alert {
            base.fg(Rgb::WHITE).bg(Rgb::ALERT_RED).add(Modifiers::BOLD)
        } else {
            base
        }
    }

    /// The status line under the rows.
    pub fn footer(&self, visible: usize) -> String {
        let count = self.rows.len();
        let first = if count == 0 { 0 } else { self.scroll + 1 };
        let last = (self.scroll + visible).min(count);
        let (low, high) = self.humidity_band;
        format!(" {count} sensors • showing {first}–{last} • Indoor RH <{low:.0}% or >{high:.0}% highlighted ")
    }
}

impl Widget for SensorTable<'_> {
    fn render(&self, area: Rect, buffer: &mut Buffer) {
        Block::new(Self::TITLE).render(area, buffer);
        let inner = Block::inner(area);
        if inner.is_empty() {
            return;
        }

        let widths = negotiate_widths(inner.width);
        let right = inner.right();
        let draw = |buffer: &mut Buffer, x: u16, y: u16, text: &str, style: Style| {
            if x < right {
                buffer.put_str_clipped(x, y, text, right - x, style);
            }
        };

        // Header
        let mut x = inner.x;
        for (header, &w) in HEADERS.iter().zip(&widths) {
            draw(buffer, x, inner.y, &fit_left(header, w), Style::bold());
            x = x.saturating_add(w + 1);
        }

        // Rows
        let visible = Self::visible_rows(area);
        let mut y = inner.y + 1;
        for row in self.rows.iter().skip(self.scroll).take(visible) {
            let mut x = inner.x;
            for (col, &w) in widths.iter().enumerate() {
                draw(buffer, x, y, &row.cell_text(col, w), Self::cell_style(row, col));
                x = x.saturating_add(w + 1);
            }
            y += 1;
        }

        // Footer, right-aligned on the last inner row
        if inner.height > 1 {
            let footer = self.footer(visible);
            #[allow(clippy::cast_possible_truncation)]
            let width = footer.width().min(usize::from(u16::MAX)) as u16;
            let x = inner.x.max(right.saturating_sub(width));
            draw(buffer, x, inner.bottom() - 1, &footer, Style::dim());
        }
    }
}
