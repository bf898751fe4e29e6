//! Crossterm backend: the real terminal.

use super::input::convert_event;
use super::renderer::{RenderStats, Renderer};
use super::Backend;
use crate::actor::InputEvent;
use crate::buffer::Buffer;
use crossterm::{
    cursor, event, execute,
    style::ResetColor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout};
use std::time::Duration;

/// Full-screen terminal in raw mode on the alternate screen.
///
/// The terminal is restored when the backend is dropped, on every exit
/// path including errors.
pub struct CrosstermBackend {
    renderer: Renderer<Stdout>,
    /// Whether the terminal is still in raw mode / alternate screen.
    active: bool,
}

impl CrosstermBackend {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails (raw mode, alternate screen, etc.).
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on Drop undoes whatever part of the setup succeeded
        let mut backend = Self {
            renderer: Renderer::new(io::stdout()),
            active: true,
        };
        execute!(backend.renderer.get_mut(), EnterAlternateScreen, cursor::Hide)?;
        Ok(backend)
    }

    /// Give the terminal back. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal could not be restored.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let shown = execute!(self.renderer.get_mut(), ResetColor, cursor::Show, LeaveAlternateScreen);
        terminal::disable_raw_mode()?;
        shown
    }

    /// Render statistics since setup.
    pub const fn stats(&self) -> &RenderStats {
        self.renderer.stats()
    }
}

impl Backend for CrosstermBackend {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn present(&mut self, frame: &Buffer) -> io::Result<()> {
        self.renderer.present(frame).map(|_| ())
    }

    fn invalidate(&mut self) {
        self.renderer.invalidate();
    }

    fn poll_event(&mut self) -> io::Result<Option<InputEvent>> {
        if event::poll(Duration::ZERO)? {
            Ok(convert_event(event::read()?))
        } else {
            Ok(None)
        }
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
