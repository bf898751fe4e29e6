//! Block: a titled box drawn with line characters.

use super::traits::Widget;
use crate::buffer::{Buffer, Cell, Style};
use crate::layout::Rect;

/// Smallest box worth drawing; anything smaller is skipped.
const MIN_WIDTH: u16 = 4;
const MIN_HEIGHT: u16 = 3;

/// A bordered box with a bold title in the top edge.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    title: &'a str,
}

impl<'a> Block<'a> {
    /// Create a block with the given title.
    pub const fn new(title: &'a str) -> Self {
        Self { title }
    }

    /// The area inside the border, or an empty rect if the box is too
    /// small to draw.
    pub const fn inner(area: Rect) -> Rect {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            return Rect::ZERO;
        }
        area.shrink(1)
    }
}

impl Widget for Block<'_> {
    fn render(&self, area: Rect, buffer: &mut Buffer) {
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            return;
        }
        let (left, top) = (area.x, area.y);
        let (right, bottom) = (area.right() - 1, area.bottom() - 1);

        buffer.fill_row(left + 1, top, area.width - 2, Cell::new('─'));
        buffer.fill_row(left + 1, bottom, area.width - 2, Cell::new('─'));
        for y in top + 1..bottom {
            buffer.set(left, y, Cell::new('│'));
            buffer.set(right, y, Cell::new('│'));
        }
        buffer.set(left, top, Cell::new('┌'));
        buffer.set(right, top, Cell::new('┐'));
        buffer.set(left, bottom, Cell::new('└'));
        buffer.set(right, bottom, Cell::new('┘'));

        // Title sits on the top edge and never overwrites the right corner
        let title = format!(" {} ", self.title);
        let room = right.saturating_sub(left + 2);
        buffer.put_str_clipped(left + 2, top, &title, room, Style::bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_draws_border_and_title() {
        let mut buffer = Buffer::new(12, 3);
        Block::new("Hi").render(Rect::new(0, 0, 12, 3), &mut buffer);
        assert_eq!(buffer.row_text(0), "┌─ Hi ─────┐");
        assert_eq!(buffer.row_text(1), "│          │");
        assert_eq!(buffer.row_text(2), "└──────────┘");
    }

    #[test]
    fn test_block_long_title_keeps_corner() {
        let mut buffer = Buffer::new(8, 3);
        Block::new("A very long title").render(Rect::new(0, 0, 8, 3), &mut buffer);
        assert_eq!(buffer.row_text(0), "┌─ A ve┐");
    }

    #[test]
    fn test_block_too_small_draws_nothing() {
        let mut buffer = Buffer::new(10, 10);
        Block::new("x").render(Rect::new(0, 0, 3, 3), &mut buffer);
        assert_eq!(buffer.row_text(0).trim_end(), "");
        assert_eq!(Block::inner(Rect::new(0, 0, 3, 3)), Rect::ZERO);
        assert_eq!(Block::inner(Rect::new(2, 2, 10, 5)), Rect::new(3, 3, 8, 3));
    }
}
