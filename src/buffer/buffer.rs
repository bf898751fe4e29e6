//! Buffer: A grid of cells the dashboard is drawn into.
//!
//! The buffer uses contiguous memory allocation in row-major order.
//! Every write is clipped to the grid, so drawing code never has to
//! check the terminal size itself: off-screen text is simply dropped.

use super::cell::{Cell, Style};
use unicode_segmentation::UnicodeSegmentation;

/// A grid of cells representing one frame of the terminal screen.
///
/// Access is in row-major order: `index = y * width + x`. A zero-sized
/// buffer is legal (a terminal can report 0 columns while being resized)
/// and turns every write into a no-op.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// All cells are initialized to empty.
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            cells: vec![Cell::EMPTY; size],
            width,
            height,
        }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Draw `text` starting at (x, y) in `style`, clipped to the buffer.
    ///
    /// Returns the number of columns written.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        self.put_str_clipped(x, y, text, u16::MAX, style)
    }

    /// Draw `text` at (x, y), writing at most `max_width` columns.
    ///
    /// A wide character that would straddle the limit is not drawn.
    /// Returns the number of columns written.
    pub fn put_str_clipped(&mut self, x: u16, y: u16, text: &str, max_width: u16, style: Style) -> u16 {
        if y >= self.height || x >= self.width {
            return 0;
        }
        let limit = x.saturating_add(max_width).min(self.width);
        let mut col = x;

        for grapheme in text.graphemes(true) {
            let Some(c) = grapheme.chars().next() else {
                continue;
            };
            let cell = Cell::new(c).with_style(style);
            let w = u16::from(cell.display_width());
            if col + w > limit {
                break;
            }
            self.set(col, y, cell);
            if w == 2 {
                self.set(col + 1, y, Cell::wide_continuation(style));
            }
            col += w;
        }

        col - x
    }

    /// Fill a horizontal run of `width` cells starting at (x, y).
    pub fn fill_row(&mut self, x: u16, y: u16, width: u16, cell: Cell) {
        if y >= self.height {
            return;
        }
        let end = x.saturating_add(width).min(self.width);
        for col in x..end {
            self.set(col, y, cell);
        }
    }

    /// Clear the entire buffer (fill with empty cells).
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize the buffer, discarding its content.
    ///
    /// The dashboard redraws every frame, so nothing needs preserving.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            self.clear();
            return;
        }
        *self = Self::new(width, height);
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks() panics on 0, and a zero-width buffer has no cells anyway
        self.cells.chunks(usize::from(self.width.max(1)))
    }

    /// Render row `y` as plain text (continuation cells are skipped).
    ///
    /// Returns an empty string for rows outside the buffer.
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(usize::from(y))
            .map(|row| {
                row.iter()
                    .filter(|cell| !cell.is_wide_continuation())
                    .map(Cell::symbol)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
