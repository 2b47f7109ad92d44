//! Terminal device contract.
//!
//! The dialog engine never talks to a terminal directly. Everything it needs
//! from the device goes through [`Backend`]: raw-mode acquisition, reading the
//! next input, querying the window size and drawing text at a position.
//!
//! Every drawing call returns the cursor position it leaves behind. The session
//! stores that value as its authoritative `(y, x)` instead of reading it back
//! from the device afterwards.

use std::io;
use std::time::Duration;

/// A screen position (zero-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub row: u16,
    pub col: u16,
}

impl Pos {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// Text attribute for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attr {
    #[default]
    Normal,
    Bold,
}

/// Named (non-printable) keys the editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKey {
    Enter,
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    /// Anything else: control characters, function keys, releases.
    Other,
}

/// Result of a single read from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A printable single-byte character.
    Char(char),
    Key(NamedKey),
    /// The window changed size since the last read.
    Resize,
    /// Nothing arrived within the read timeout.
    Timeout,
}

/// Operations the dialog engine requires from a terminal device.
pub trait Backend {
    /// Take the device: raw mode, no echo, special keys as single events.
    fn acquire(&mut self) -> io::Result<()>;

    /// Give the device back in the state it was found.
    fn release(&mut self) -> io::Result<()>;

    /// Wait for the next input. `None` blocks until something arrives.
    fn read_input(&mut self, timeout: Option<Duration>) -> io::Result<Input>;

    /// Current window size as `(cols, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    fn clear(&mut self) -> io::Result<()>;

    /// Clear from `at` to the end of its row. The cursor ends up at `at`.
    fn clear_to_eol(&mut self, at: Pos) -> io::Result<Pos>;

    fn move_to(&mut self, at: Pos) -> io::Result<Pos>;

    /// Draw `text` starting at `at` and return the position after it.
    fn put_str(&mut self, at: Pos, text: &str, attr: Attr) -> io::Result<Pos>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Position after writing `text` at `at`, measured in display columns.
///
/// Not clamped to the window: content past the right edge is the caller's
/// problem, and both backends agree on the arithmetic.
pub fn advance(at: Pos, text: &str) -> Pos {
    let width = unicode_width::UnicodeWidthStr::width(text);
    let width = u16::try_from(width).unwrap_or(u16::MAX);
    Pos::new(at.row, at.col.saturating_add(width))
}

/// Whether `ch` is accepted into an edit buffer.
pub fn is_printable(ch: char) -> bool {
    ch.is_ascii() && !ch.is_ascii_control()
}
