//! Renderer: turns successive frames into minimal terminal output.
//!
//! Keeps a copy of the frame currently on screen. Each new frame is
//! diffed against it and only changed cells are written; the first frame,
//! and any frame after [`Renderer::invalidate`] or a size change, is drawn
//! in full.

use crate::buffer::diff::{render_diff, render_full, DiffResult, DiffState};
use crate::buffer::Buffer;
use std::io::{self, Write};

/// Render statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames presented.
    pub frames: u64,
    /// Frames drawn in full rather than diffed.
    pub full_redraws: u64,
    /// Cells written across all frames.
    pub cells_changed: u64,
    /// Bytes written to the output.
    pub bytes_written: u64,
}

/// Double-buffered frame writer over any [`Write`].
pub struct Renderer<W: Write> {
    /// Where escape sequences go.
    out: W,
    /// What the output currently shows.
    current: Buffer,
    /// Cursor and style tracking between frames.
    diff_state: DiffState,
    /// Per-frame scratch, flushed in one write.
    output: Vec<u8>,
    /// Whether the next frame must be drawn in full.
    needs_full_redraw: bool,
    stats: RenderStats,
}

impl<W: Write> Renderer<W> {
    /// Create a renderer writing to `out`. The first frame is drawn in full.
    pub fn new(out: W) -> Self {
        Self {
            out,
            current: Buffer::new(0, 0),
            diff_state: DiffState::new(),
            output: Vec::with_capacity(65536),
            needs_full_redraw: true,
            stats: RenderStats::default(),
        }
    }

    /// Forget what is on screen so the next frame is drawn in full.
    pub fn invalidate(&mut self) {
        self.needs_full_redraw = true;
        self.diff_state.reset();
    }

    /// Show `next`, writing only what changed since the previous frame.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails. The next frame is
    /// then drawn in full, since the screen state is unknown.
    pub fn present(&mut self, next: &Buffer) -> io::Result<DiffResult> {
        self.output.clear();

        let resized = next.width() != self.current.width() || next.height() != self.current.height();
        let full = self.needs_full_redraw || resized;
        let result = if full {
            render_full(next, &mut self.output, &mut self.diff_state)?
        } else {
            render_diff(&self.current, next, &mut self.output, &mut self.diff_state)?
        };

        if !self.output.is_empty() {
            if let Err(e) = self.out.write_all(&self.output).and_then(|()| self.out.flush()) {
                self.invalidate();
                return Err(e);
            }
        }

        self.current.clone_from(next);
        self.needs_full_redraw = false;

        self.stats.frames += 1;
        self.stats.full_redraws += u64::from(full);
        self.stats.cells_changed += result.cells_changed as u64;
        self.stats.bytes_written += self.output.len() as u64;
        Ok(result)
    }

    /// Statistics since creation.
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// The underlying writer.
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    /// Mutable access to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }
}
