//! The dashboard's fixed screen split.
//!
//! ```text
//! row 0      title
//! rows 1..4  [ Inside panel ]  [ Garden panel ]
//! row 4      gap
//! rows 5..   [ Sensor table                   ]
//! last row   key help
//! ```

use super::Rect;

/// Height of each summary panel, borders included.
pub const PANEL_HEIGHT: u16 = 3;
/// Narrowest a summary panel is laid out, before clipping to the screen.
pub const PANEL_MIN_WIDTH: u16 = 24;
/// Shortest the table box is laid out, before clipping to the screen.
pub const TABLE_MIN_HEIGHT: u16 = 8;
/// First row of the table box.
const TABLE_TOP: u16 = 1 + PANEL_HEIGHT + 1;

/// Regions of one frame, already clipped to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    /// Title line.
    pub title: Rect,
    /// Summary panel for the inside partition.
    pub inside_panel: Rect,
    /// Summary panel for the garden partition.
    pub garden_panel: Rect,
    /// Sensor table box.
    pub table: Rect,
    /// Key help line.
    pub footer: Rect,
}

impl DashboardLayout {
    /// Compute the layout for a `width` x `height` screen.
    pub fn compute(width: u16, height: u16) -> Self {
        let screen = Rect::from_size(width, height);

        let panel_w = PANEL_MIN_WIDTH.max(width.saturating_sub(3) / 2);
        let garden_x = panel_w + 2;
        let inside_panel = Rect::new(0, 1, panel_w, PANEL_HEIGHT);
        let garden_panel = Rect::new(garden_x, 1, width.saturating_sub(garden_x), PANEL_HEIGHT);

        let table_h = TABLE_MIN_HEIGHT.max(height.saturating_sub(TABLE_TOP + 1));
        let table = Rect::new(0, TABLE_TOP, width, table_h);

        let footer = if height == 0 {
            Rect::ZERO
        } else {
            Rect::new(0, height - 1, width, 1)
        };

        Self {
            title: Rect::new(0, 0, width, 1).intersection(screen),
            inside_panel: inside_panel.intersection(screen),
            garden_panel: garden_panel.intersection(screen),
            table: table.intersection(screen),
            footer,
        }
    }
}
