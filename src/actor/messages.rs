//! Input events and the dashboard commands they map to.

/// Key codes for keyboard input.
///
/// This is the subset of crossterm's `KeyCode` the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Escape key.
    Esc,
}

/// Key modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        control: false,
        alt: false,
    };

    /// Only Control held.
    pub const CONTROL: Self = Self {
        control: true,
        alt: false,
    };
}

/// Events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key {
        /// The key code.
        code: KeyCode,
        /// Modifiers held during keypress.
        modifiers: KeyModifiers,
    },

    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
}

impl InputEvent {
    /// Key press without modifiers.
    pub const fn key(code: KeyCode) -> Self {
        Self::Key {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

/// Rows moved by Page Up / Page Down.
pub const PAGE_ROWS: i32 = 10;

/// What the frame loop should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Shut down gracefully.
    Quit,
    /// Move the table by this many rows (negative = up).
    Scroll(i32),
    /// Repaint everything on the next frame.
    Redraw,
}

impl Command {
    /// Map an input event to a command; `None` for keys with no binding.
    ///
    /// Arrow keys scroll with or without Alt held.
    pub const fn from_event(event: &InputEvent) -> Option<Self> {
        match *event {
            InputEvent::Resize { .. } => Some(Self::Redraw),
            InputEvent::Key { code, modifiers } => match code {
                KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Self::Quit),
                KeyCode::Char('c') if modifiers.control => Some(Self::Quit),
                KeyCode::Up | KeyCode::Char('k') => Some(Self::Scroll(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Self::Scroll(1)),
                KeyCode::PageUp => Some(Self::Scroll(-PAGE_ROWS)),
                KeyCode::PageDown => Some(Self::Scroll(PAGE_ROWS)),
                KeyCode::Char(_) => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        for event in [
            InputEvent::key(KeyCode::Char('q')),
            InputEvent::key(KeyCode::Char('Q')),
            InputEvent::key(KeyCode::Esc),
            InputEvent::Key {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
            },
        ] {
            assert_eq!(Command::from_event(&event), Some(Command::Quit));
        }
    }

    #[test]
    fn test_scroll_keys() {
        assert_eq!(Command::from_event(&InputEvent::key(KeyCode::Up)), Some(Command::Scroll(-1)));
        assert_eq!(Command::from_event(&InputEvent::key(KeyCode::Char('j'))), Some(Command::Scroll(1)));
        assert_eq!(Command::from_event(&InputEvent::key(KeyCode::PageDown)), Some(Command::Scroll(10)));
        assert_eq!(Command::from_event(&InputEvent::key(KeyCode::PageUp)), Some(Command::Scroll(-10)));
    }

    #[test]
    fn test_alt_arrows_scroll() {
        let alt = KeyModifiers {
            alt: true,
            ..KeyModifiers::NONE
        };
        let event = InputEvent::Key {
            code: KeyCode::Down,
            modifiers: alt,
        };
        assert_eq!(Command::from_event(&event), Some(Command::Scroll(1)));
    }

    #[test]
    fn test_unbound_keys_ignored() {
        assert_eq!(Command::from_event(&InputEvent::key(KeyCode::Char('x'))), None);
        assert_eq!(Command::from_event(&InputEvent::key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_resize_redraws() {
        let event = InputEvent::Resize { width: 100, height: 30 };
        assert_eq!(Command::from_event(&event), Some(Command::Redraw));
    }
}
