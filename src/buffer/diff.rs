//! Diffing Engine: Emit only the cells that changed between two frames.
//!
//! 1. Compare the previously shown frame with the next one
//! 2. Queue crossterm commands for changed cells only
//! 3. Skip cursor moves when writing adjacent cells
//! 4. Track the active style to avoid redundant SGR sequences
//!
//! Commands are queued into a writer; the caller flushes once per frame.

use super::{Buffer, Cell, Modifiers, Style};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor::MoveTo, queue};
use std::io::{self, Write};

/// State tracker for the diffing algorithm.
///
/// Tracks the cursor position and the style last sent to the terminal.
#[derive(Debug, Clone, Default)]
pub struct DiffState {
    /// Last known cursor position, `None` if unknown.
    cursor: Option<(u16, u16)>,
    /// Last emitted style, `None` if unknown.
    style: Option<Style>,
}

impl DiffState {
    /// Create a new diff state with unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor: None,
            style: None,
        }
    }

    /// Forget everything (e.g., after a full screen clear).
    pub const fn reset(&mut self) {
        self.cursor = None;
        self.style = None;
    }
}

/// Result of a diff operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Number of cells that were different.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of style change sequences emitted.
    pub style_changes: usize,
}

/// Queue the difference between two equally sized buffers.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn render_diff<W: Write>(
    current: &Buffer,
    next: &Buffer,
    out: &mut W,
    state: &mut DiffState,
) -> io::Result<DiffResult> {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());

    let mut result = DiffResult::default();
    let width = next.width();

    for (idx, (old, new)) in current.cells().iter().zip(next.cells()).enumerate() {
        if old == new || new.is_wide_continuation() {
            continue;
        }
        result.cells_changed += 1;

        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = ((idx % usize::from(width)) as u16, (idx / usize::from(width)) as u16);
        emit_cell(out, x, y, new, state, &mut result)?;
    }

    Ok(result)
}

/// Queue a complete redraw of `buffer` (no diffing).
///
/// Used for the first frame and after a resize, when the terminal
/// content is unknown.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn render_full<W: Write>(buffer: &Buffer, out: &mut W, state: &mut DiffState) -> io::Result<DiffResult> {
    state.reset();
    let mut result = DiffResult::default();
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
    )?;

    for (y, row) in (0u16..).zip(buffer.rows()) {
        for (x, cell) in (0u16..).zip(row) {
            if cell.is_wide_continuation() {
                continue;
            }
            result.cells_changed += 1;
            emit_cell(out, x, y, cell, state, &mut result)?;
        }
    }

    Ok(result)
}

fn emit_cell<W: Write>(
    out: &mut W,
    x: u16,
    y: u16,
    cell: &Cell,
    state: &mut DiffState,
    result: &mut DiffResult,
) -> io::Result<()> {
    if state.cursor != Some((x, y)) {
        queue!(out, MoveTo(x, y))?;
        result.cursor_moves += 1;
    }

    let style = cell.style();
    if state.style != Some(style) {
        emit_style(out, style)?;
        state.style = Some(style);
        result.style_changes += 1;
    }

    queue!(out, Print(cell.symbol()))?;
    state.cursor = Some((x + u16::from(cell.display_width().max(1)), y));
    Ok(())
}

/// Reset attributes, then apply `style` from scratch.
///
/// Going through a reset keeps the logic simple: SGR has no portable
/// way to turn off DIM without also turning off BOLD.
fn emit_style<W: Write>(out: &mut W, style: Style) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;
    if let Some(fg) = style.fg {
        queue!(out, SetForegroundColor(to_color(fg)))?;
    }
    if let Some(bg) = style.bg {
        queue!(out, SetBackgroundColor(to_color(bg)))?;
    }

    let mods = style.modifiers;
    if mods.contains(Modifiers::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if mods.contains(Modifiers::DIM) {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

const fn to_color(rgb: super::Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_identical_buffers() {
        let a = Buffer::new(10, 5);
        let b = Buffer::new(10, 5);
        let mut output = Vec::new();
        let mut state = DiffState::new();

        let result = render_diff(&a, &b, &mut output, &mut state).unwrap();

        assert_eq!(result.cells_changed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        b.set(5, 2, Cell::new('X'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &mut output, &mut state).unwrap();

        assert_eq!(result.cells_changed, 1);
        let output_str = String::from_utf8_lossy(&output);
        // 1-indexed row;col
        assert!(output_str.contains("\x1b[3;6H"));
        assert!(output_str.contains('X'));
    }

    #[test]
    fn test_diff_adjacent_cells_single_cursor_move() {
        let a = Buffer::new(10, 5);
        let mut b = Buffer::new(10, 5);
        b.put_str(2, 1, "ABC", Style::PLAIN);

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &mut output, &mut state).unwrap();

        assert_eq!(result.cells_changed, 3);
        assert_eq!(result.cursor_moves, 1);
        assert_eq!(result.style_changes, 1);
    }

    #[test]
    fn test_diff_style_change_only() {
        let mut a = Buffer::new(4, 1);
        let mut b = Buffer::new(4, 1);
        a.put_str(0, 0, "ab", Style::PLAIN);
        b.put_str(0, 0, "ab", Style::dim());

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &mut output, &mut state).unwrap();

        assert_eq!(result.cells_changed, 2);
        assert!(String::from_utf8_lossy(&output).contains("\x1b[2m"));
    }

    #[test]
    fn test_render_full_touches_every_cell() {
        let mut buffer = Buffer::new(3, 2);
        buffer.put_str(0, 0, "ABC", Style::PLAIN);

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_full(&buffer, &mut output, &mut state).unwrap();

        assert_eq!(result.cells_changed, 6);
        let output_str = String::from_utf8_lossy(&output);
        assert!(output_str.contains("ABC"));
        // Start of the second row needs an explicit move
        assert_eq!(result.cursor_moves, 2);
    }
}
