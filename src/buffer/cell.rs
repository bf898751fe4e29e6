//! Cell: The atomic unit of the dashboard canvas.
//!
//! A cell holds one displayable character plus the style it is drawn with.
//! Wide characters (CJK, some symbols) occupy two columns: the leading cell
//! carries the character and the following cell is a continuation marker.

use bitflags::bitflags;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White (255, 255, 255)
    pub const WHITE: Self = Self::from_u32(0xFF_FFFF);
    /// Alert red used behind out-of-band humidity values.
    pub const ALERT_RED: Self = Self::from_u32(0xAA_1414);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use sensordash::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::DIM;
    /// assert!(style.contains(Modifiers::DIM));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// How a run of cells is drawn.
///
/// `None` colors mean "terminal default", so the dashboard blends in with
/// whatever theme the user's terminal has.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct Style {
    /// Foreground color (`None` = terminal default).
    pub fg: Option<Rgb>,
    /// Background color (`None` = terminal default).
    pub bg: Option<Rgb>,
    /// Text modifiers.
    pub modifiers: Modifiers,
}

impl Style {
    /// Plain text in the terminal's default colors.
    pub const PLAIN: Self = Self {
        fg: None,
        bg: None,
        modifiers: Modifiers::empty(),
    };

    /// Plain text with the given modifiers.
    #[inline]
    pub const fn with_modifiers(modifiers: Modifiers) -> Self {
        Self {
            fg: None,
            bg: None,
            modifiers,
        }
    }

    /// Bold text.
    #[inline]
    pub const fn bold() -> Self {
        Self::with_modifiers(Modifiers::BOLD)
    }

    /// Dim text.
    #[inline]
    pub const fn dim() -> Self {
        Self::with_modifiers(Modifiers::DIM)
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn fg(mut self, fg: Rgb) -> Self {
        self.fg = Some(fg);
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn bg(mut self, bg: Rgb) -> Self {
        self.bg = Some(bg);
        self
    }

    /// Add modifiers on top of the existing ones (builder pattern).
    #[inline]
    #[must_use]
    pub fn add(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }
}

/// A single canvas cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// The character shown in this cell.
    symbol: char,
    /// Display width (0 = continuation of a wide character, 1 or 2 otherwise).
    width: u8,
    /// Style the symbol is drawn with.
    style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell (space in the default style).
    pub const EMPTY: Self = Self {
        symbol: ' ',
        width: 1,
        style: Style::PLAIN,
    };

    /// Create a cell from any character.
    ///
    /// Control characters and other zero-width characters are stored as a
    /// space so that a cell always advances the cursor by at least one column.
    #[inline]
    pub fn new(c: char) -> Self {
        let width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        match width {
            0 => Self::EMPTY,
            1 => Self {
                symbol: c,
                width: 1,
                style: Style::PLAIN,
            },
            _ => Self {
                symbol: c,
                width: 2,
                style: Style::PLAIN,
            },
        }
    }

    /// Create a wide-character continuation cell.
    ///
    /// This is placed after a wide character that takes 2 columns.
    #[inline]
    pub const fn wide_continuation(style: Style) -> Self {
        Self {
            symbol: ' ',
            width: 0,
            style,
        }
    }

    /// Check if this is a wide-character continuation.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.width == 0
    }

    /// Get the symbol.
    #[inline]
    pub const fn symbol(&self) -> char {
        self.symbol
    }

    /// Get the display width (0, 1, or 2).
    #[inline]
    pub const fn display_width(&self) -> u8 {
        self.width
    }

    /// Get the style.
    #[inline]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Set the style (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("symbol", &self.symbol)
            .field("width", &self.width)
            .field("style", &self.style)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        let rgb = Rgb::from_u32(0xFF8000);
        assert_eq!(rgb, Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_cell_ascii() {
        let cell = Cell::new('A');
        assert_eq!(cell.symbol(), 'A');
        assert_eq!(cell.display_width(), 1);
    }

    #[test]
    fn test_cell_wide_char() {
        let cell = Cell::new('日');
        assert_eq!(cell.display_width(), 2);
    }

    #[test]
    fn test_cell_control_char_is_blank() {
        let cell = Cell::new('\t');
        assert_eq!(cell, Cell::EMPTY);
    }

    #[test]
    fn test_degree_sign_is_narrow() {
        assert_eq!(Cell::new('°').display_width(), 1);
    }

    #[test]
    fn test_style_builder() {
        let style = Style::dim().fg(Rgb::WHITE).bg(Rgb::ALERT_RED).add(Modifiers::BOLD);
        assert_eq!(style.fg, Some(Rgb::WHITE));
        assert_eq!(style.bg, Some(Rgb::ALERT_RED));
        assert!(style.modifiers.contains(Modifiers::DIM | Modifiers::BOLD));
    }

    #[test]
    fn test_wide_continuation() {
        let cont = Cell::wide_continuation(Style::PLAIN);
        assert!(cont.is_wide_continuation());
        assert_eq!(cont.display_width(), 0);
    }
}
