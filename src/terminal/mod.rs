//! Terminal I/O behind a small capability trait.
//!
//! The frame loop only needs four things from a terminal: its size, a way
//! to show a finished frame, a way to force the next frame to be drawn in
//! full, and a non-blocking poll for one input event. [`Backend`] is that
//! interface; [`CrosstermBackend`] is the real implementation, and tests
//! drive the loop with an in-memory one.

mod backend;
mod input;
mod renderer;

pub use backend::CrosstermBackend;
pub use input::convert_event;
pub use renderer::{RenderStats, Renderer};

use crate::actor::InputEvent;
use crate::buffer::Buffer;
use std::io;

/// What the frame loop needs from a terminal.
pub trait Backend {
    /// Current size as (columns, rows).
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Show a finished frame.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn present(&mut self, frame: &Buffer) -> io::Result<()>;

    /// Forget what is on screen; the next frame is drawn in full.
    fn invalidate(&mut self);

    /// Take one pending input event, if any, without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if reading terminal input fails.
    fn poll_event(&mut self) -> io::Result<Option<InputEvent>>;
}
