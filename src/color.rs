use std::fmt;
use std::io::{self, Write};

// ======================================================
// COLOR CODES
// ======================================================

/// Foreground colors understood by the markup compiler.
///
/// `NoColor` is the pass-through sentinel: painting with it emits no marker
/// at all. `Default` resets the foreground to the terminal's own color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    NoColor,
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    LightGray,
    DarkGray,
    LightRed,
    LightGreen,
    LightYellow,
    LightBlue,
    LightMagenta,
    LightCyan,
    White,
}

impl Color {
    /// The sixteen fixed colors, indexed by their numeric code.
    pub const FIXED: [Color; 16] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::LightGray,
        Color::DarkGray,
        Color::LightRed,
        Color::LightGreen,
        Color::LightYellow,
        Color::LightBlue,
        Color::LightMagenta,
        Color::LightCyan,
        Color::White,
    ];

    /// Numeric marker code (0..=15) for fixed colors.
    pub fn code(self) -> Option<u8> {
        Self::FIXED
            .iter()
            .position(|c| *c == self)
            .map(|i| i as u8)
    }

    pub fn from_code(code: u8) -> Option<Color> {
        Self::FIXED.get(code as usize).copied()
    }
}

// ======================================================
// MARKER DELIMITERS
// ======================================================

/// Characters that open and close an inline color marker.
///
/// Painter and compiler must share one value; nothing about it is global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub left: char,
    pub right: char,
}

impl Delimiters {
    pub const fn new(left: char, right: char) -> Self {
        Self { left, right }
    }
}

impl Default for Delimiters {
    // STX / ETX never show up in container metadata, unlike `<` and `>`
    // which are common in shell commands.
    fn default() -> Self {
        Self::new('\u{2}', '\u{3}')
    }
}

// ======================================================
// PAINTER
// ======================================================

#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
    delimiters: Delimiters,
}

impl Painter {
    pub fn new(enabled: bool, delimiters: Delimiters) -> Self {
        Self { enabled, delimiters }
    }

    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    /// Color actually used for a call: everything degrades to `NoColor`
    /// while colorization is off.
    fn effective(&self, color: Color) -> Color {
        if self.enabled {
            color
        } else {
            Color::NoColor
        }
    }

    /// Marks `text` with `color`. Delimiter characters inside `text` are
    /// replaced with U+FFFD so they can never open or close a marker.
    pub fn paint(&self, color: Color, text: &str) -> String {
        let Delimiters { left, right } = self.delimiters;
        let text = text.replace([left, right], "\u{FFFD}");

        match self.effective(color) {
            Color::NoColor => text,
            Color::Default => format!("{left}nofg{right}{text}{left}reset{right}"),
            fixed => {
                // Every other variant lives in FIXED.
                let code = fixed.code().unwrap_or_default();
                format!("{left}fg {code}{right}{text}{left}reset{right}")
            }
        }
    }

    /// `paint` applied after interpolating `args`, e.g.
    /// `painter.paint_fmt(Color::LightGreen, format_args!(":{}", tag))`.
    pub fn paint_fmt(&self, color: Color, args: fmt::Arguments<'_>) -> String {
        match args.as_str() {
            Some(literal) => self.paint(color, literal),
            None => self.paint(color, &args.to_string()),
        }
    }

    /// Paints `text` and writes the marked bytes to `w`.
    pub fn write<W: Write + ?Sized>(&self, w: &mut W, color: Color, text: &str) -> io::Result<usize> {
        let painted = self.paint(color, text);
        w.write_all(painted.as_bytes())?;
        Ok(painted.len())
    }
}
