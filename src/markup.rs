//! Compiles inline color markers into terminal escape sequences.
//!
//! Three markers exist: `fg N` (N in 0..=15), `nofg` and `reset`, each
//! wrapped in the caller's [`Delimiters`]. Markers nest; `reset` restores
//! the enclosing color.

use colored::Color as Ansi;
use thiserror::Error;

use crate::color::{Color, Delimiters};

const RESET: &str = "\x1b[0m";
const DEFAULT_FG: &str = "\x1b[39m";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed color marker at byte {offset}: {reason}")]
pub struct MarkupError {
    pub offset: usize,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Replace markers with ANSI escape sequences.
    Ansi,
    /// Validate markers, then drop them.
    Strip,
}

// ======================================================
// LEXER
// ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Open(Color),
    Reset,
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    delimiters: Delimiters,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, delimiters: Delimiters) -> Self {
        Self { input, pos: 0, delimiters }
    }

    fn marker(&self, offset: usize, body: &str) -> Result<Token<'a>, MarkupError> {
        match body {
            "reset" => Ok(Token::Reset),
            "nofg" => Ok(Token::Open(Color::Default)),
            _ => {
                let code = body
                    .strip_prefix("fg ")
                    .ok_or(MarkupError { offset, reason: "unknown marker" })?;
                code.trim()
                    .parse::<u8>()
                    .ok()
                    .and_then(Color::from_code)
                    .map(Token::Open)
                    .ok_or(MarkupError { offset, reason: "color code out of range" })
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<(usize, Token<'a>), MarkupError>;

    fn next(&mut self) -> Option<Self::Item> {
        let input = self.input;
        let start = self.pos;
        let rest = &input[start..];
        if rest.is_empty() {
            return None;
        }

        let Delimiters { left, right } = self.delimiters;

        if let Some(after_left) = rest.strip_prefix(left) {
            let Some(end) = after_left.find(right) else {
                self.pos = self.input.len();
                return Some(Err(MarkupError { offset: start, reason: "unterminated marker" }));
            };
            let body = &after_left[..end];
            self.pos = start + left.len_utf8() + end + right.len_utf8();
            return Some(self.marker(start, body).map(|t| (start, t)));
        }

        if rest.starts_with(right) {
            self.pos = self.input.len();
            return Some(Err(MarkupError { offset: start, reason: "stray closing delimiter" }));
        }

        let len = rest
            .find(|c: char| c == left || c == right)
            .unwrap_or(rest.len());
        self.pos = start + len;
        Some(Ok((start, Token::Text(&rest[..len]))))
    }
}

// ======================================================
// COMPILE
// ======================================================

fn escape(color: Color) -> String {
    let ansi = match color {
        Color::NoColor | Color::Default => return DEFAULT_FG.to_string(),
        Color::Black => Ansi::Black,
        Color::Red => Ansi::Red,
        Color::Green => Ansi::Green,
        Color::Yellow => Ansi::Yellow,
        Color::Blue => Ansi::Blue,
        Color::Magenta => Ansi::Magenta,
        Color::Cyan => Ansi::Cyan,
        Color::LightGray => Ansi::White,
        Color::DarkGray => Ansi::BrightBlack,
        Color::LightRed => Ansi::BrightRed,
        Color::LightGreen => Ansi::BrightGreen,
        Color::LightYellow => Ansi::BrightYellow,
        Color::LightBlue => Ansi::BrightBlue,
        Color::LightMagenta => Ansi::BrightMagenta,
        Color::LightCyan => Ansi::BrightCyan,
        Color::White => Ansi::BrightWhite,
    };
    format!("\x1b[{}m", ansi.to_fg_str())
}

pub fn compile(input: &str, delimiters: Delimiters, mode: Mode) -> Result<String, MarkupError> {
    let mut out = String::with_capacity(input.len());
    let mut stack: Vec<Color> = Vec::new();
    let mut last_open = 0;

    for token in Lexer::new(input, delimiters) {
        let (offset, token) = token?;
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Open(color) => {
                stack.push(color);
                last_open = offset;
                if mode == Mode::Ansi {
                    out.push_str(&escape(color));
                }
            }
            Token::Reset => {
                if stack.pop().is_none() {
                    return Err(MarkupError { offset, reason: "reset without an open marker" });
                }
                if mode == Mode::Ansi {
                    out.push_str(RESET);
                    if let Some(outer) = stack.last() {
                        out.push_str(&escape(*outer));
                    }
                }
            }
        }
    }

    if !stack.is_empty() {
        return Err(MarkupError { offset: last_open, reason: "marker never reset" });
    }

    Ok(out)
}
