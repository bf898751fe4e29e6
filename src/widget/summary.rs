//! Summary panel: one partition's fresh averages in a small box.

use super::block::Block;
use super::traits::Widget;
use crate::aggregate::PartitionSummary;
use crate::buffer::{Buffer, Style};
use crate::layout::Rect;

/// Placeholder for an average with no contributing readings.
pub const NO_DATA: &str = "--";

/// Boxed one-line summary of a partition.
#[derive(Debug, Clone)]
pub struct SummaryPanel<'a> {
    title: &'a str,
    summary: PartitionSummary,
    window: i64,
}

impl<'a> SummaryPanel<'a> {
    /// Create a panel for `summary` computed with a `window`-second
    /// freshness window.
    pub const fn new(title: &'a str, summary: PartitionSummary, window: i64) -> Self {
        Self {
            title,
            summary,
            window,
        }
    }

    /// The text shown inside the box.
    pub fn body(&self) -> String {
        let temperature = self
            .summary
            .temperature
            .map_or_else(|| NO_DATA.to_string(), |t| format!("{t:.1}°C"));
        let humidity = self
            .summary
            .humidity
            .map_or_else(|| NO_DATA.to_string(), |h| format!("{h:.0}%"));
        format!(
            " Temp: {temperature}   RH: {humidity}   Devices: {} (fresh ≤{}s) ",
            self.summary.devices, self.window
        )
    }
}

impl Widget for SummaryPanel<'_> {
    fn render(&self, area: Rect, buffer: &mut Buffer) {
        Block::new(self.title).render(area, buffer);
        let inner = Block::inner(area);
        if inner.is_empty() {
            return;
        }
        // One column of padding after the left border
        let x = inner.x + 1;
        let max_width = inner.right().saturating_sub(x);
        buffer.put_str_clipped(x, inner.y, &self.body(), max_width, Style::PLAIN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_with_values() {
        let summary = PartitionSummary {
            temperature: Some(14.04),
            humidity: Some(80.4),
            devices: 1,
        };
        let panel = SummaryPanel::new("Garden", summary, 900);
        assert_eq!(panel.body(), " Temp: 14.0°C   RH: 80%   Devices: 1 (fresh ≤900s) ");
    }

    #[test]
    fn test_body_no_data() {
        let panel = SummaryPanel::new("Inside", PartitionSummary::default(), 600);
        assert_eq!(panel.body(), " Temp: --   RH: --   Devices: 0 (fresh ≤600s) ");
    }

    #[test]
    fn test_render_clips_inside_border() {
        let mut buffer = Buffer::new(20, 3);
        let panel = SummaryPanel::new("Inside", PartitionSummary::default(), 900);
        panel.render(Rect::new(0, 0, 20, 3), &mut buffer);

        let row = buffer.row_text(1);
        assert!(row.starts_with("│  Temp: --"));
        assert!(row.ends_with('│'));
    }
}
