//! Single-line input editing.
//!
//! [`EditBuffer`] holds the text and the logical cursor and knows nothing
//! about the screen. The session's input loop maps keys onto buffer edits and
//! keeps the screen cursor at `beg + buffer.cursor()`, where `beg` is the
//! column right after the prompt.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::core::backend::is_printable;
use crate::core::{Attr, Backend, DialogError, Input, NamedKey, Pos, Result, Session};

/// Default glyph drawn in place of masked characters.
pub const DEFAULT_MASK: char = '*';

/// How typed characters are echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    /// Characters are shown as typed.
    #[default]
    Plain,
    /// Each character is shown as the mask glyph.
    Masked(char),
}

impl EchoMode {
    pub fn masked() -> Self {
        Self::Masked(DEFAULT_MASK)
    }

    /// Whether `mask` can stand in for a typed character. Only printable
    /// ASCII qualifies: the field assumes one screen column per character.
    pub fn is_valid_mask(mask: char) -> bool {
        is_printable(mask)
    }

    /// Same mode, with an unusable mask glyph replaced by [`DEFAULT_MASK`].
    pub fn normalized(self) -> Self {
        match self {
            Self::Masked(mask) if !Self::is_valid_mask(mask) => Self::masked(),
            other => other,
        }
    }

    /// Glyph drawn for `ch`.
    pub fn glyph(self, ch: char) -> char {
        match self {
            Self::Plain => ch,
            Self::Masked(mask) => mask,
        }
    }
}

impl FromStr for EchoMode {
    type Err = DialogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "On" | "on" | "plain" => Ok(Self::Plain),
            "*" | "masked" => Ok(Self::masked()),
            other => Err(DialogError::InvalidEchoMode(other.to_string())),
        }
    }
}

impl fmt::Display for EchoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "On"),
            Self::Masked(mask) => write!(f, "{}", mask),
        }
    }
}

/// Text being entered plus the logical cursor.
///
/// The cursor is always in `0..=len`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    cursor: usize,
    echo: EchoMode,
}

impl EditBuffer {
    pub fn new(echo: EchoMode) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            echo: echo.normalized(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn echo(&self) -> EchoMode {
        self.echo
    }

    /// Accept a typed character. Returns `false` for anything that is not
    /// printable ASCII.
    ///
    /// Characters are always appended, even when the cursor sits before the
    /// end; the cursor moves one step right either way.
    pub fn push(&mut self, ch: char) -> bool {
        if !is_printable(ch) {
            return false;
        }
        self.text.push(ch);
        self.cursor += 1;
        true
    }

    pub fn left(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn right(&mut self) -> bool {
        if self.cursor < self.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    /// Remove the character before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.text.remove(self.cursor);
        true
    }

    /// Remove the character under the cursor.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.text.remove(self.cursor);
        true
    }

    /// Place the cursor at `index` if it is within the text.
    pub fn seek(&mut self, index: usize) -> bool {
        if index <= self.len() {
            self.cursor = index;
            true
        } else {
            false
        }
    }

    /// What the field shows: the text, or one mask glyph per character.
    pub fn rendered(&self) -> Cow<'_, str> {
        match self.echo {
            EchoMode::Plain => Cow::Borrowed(&self.text),
            EchoMode::Masked(mask) => Cow::Owned(std::iter::repeat(mask).take(self.len()).collect()),
        }
    }
}

/// How the input loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Enter was pressed.
    Done,
    /// The window changed size; the panel must be redrawn before resuming.
    Resized,
    /// No key arrived within the read timeout.
    TimedOut,
}

impl<B: Backend> Session<B> {
    /// Run the input loop for the field starting at the current cursor.
    ///
    /// `buffer` may already hold text (after a resize); it is repainted first.
    /// `resume_col` is the screen column the cursor was on before the resize;
    /// it is restored when it still falls inside the field.
    pub fn get_input(&mut self, buffer: &mut EditBuffer, resume_col: Option<u16>) -> Result<EditOutcome> {
        let beg = self.x;
        let row = self.y;

        let resume = resume_col
            .filter(|&col| col >= beg)
            .map(|col| usize::from(col - beg));
        if !resume.map(|index| buffer.seek(index)).unwrap_or(false) {
            buffer.home();
        }
        self.print_response(beg, buffer)?;

        let timeout = self.timeout();
        loop {
            let input = self.backend.read_input(timeout)?;
            match input {
                Input::Timeout => {
                    debug!(len = buffer.len(), "input timed out");
                    return Ok(EditOutcome::TimedOut);
                }
                Input::Resize => {
                    debug!("window resized during input");
                    return Ok(EditOutcome::Resized);
                }
                Input::Key(NamedKey::Enter) => return Ok(EditOutcome::Done),

                Input::Key(NamedKey::Left) => {
                    if buffer.left() {
                        self.move_cursor(row, field_col(beg, buffer))?;
                    }
                }
                Input::Key(NamedKey::Right) => {
                    if buffer.right() {
                        self.move_cursor(row, field_col(beg, buffer))?;
                    }
                }
                Input::Key(NamedKey::Home) => {
                    buffer.home();
                    self.move_cursor(row, beg)?;
                }
                Input::Key(NamedKey::End) => {
                    buffer.end();
                    self.move_cursor(row, field_col(beg, buffer))?;
                }

                Input::Key(NamedKey::Backspace) => {
                    if buffer.backspace() {
                        self.print_response(beg, buffer)?;
                    }
                }
                Input::Key(NamedKey::Delete) => {
                    if buffer.delete() {
                        self.print_response(beg, buffer)?;
                    }
                }

                Input::Char(ch) => {
                    if buffer.push(ch) {
                        let glyph = buffer.echo().glyph(ch).to_string();
                        let end = self.backend.put_str(Pos::new(row, self.x), &glyph, Attr::Normal)?;
                        self.sync_cursor(end);
                        self.backend.flush()?;
                    }
                }

                Input::Key(NamedKey::Other) => {}
            }
        }
    }

    /// Repaint the field from `beg` and put the cursor back on its logical
    /// column.
    fn print_response(&mut self, beg: u16, buffer: &EditBuffer) -> Result<()> {
        let row = self.y;
        self.backend.clear_to_eol(Pos::new(row, beg))?;
        self.restore_right_border(row)?;
        let end = self.backend.put_str(Pos::new(row, beg), &buffer.rendered(), Attr::Normal)?;
        self.sync_cursor(end);
        self.move_cursor(row, field_col(beg, buffer))
    }
}

/// Screen column of the buffer cursor in a field starting at `beg`.
fn field_col(beg: u16, buffer: &EditBuffer) -> u16 {
    let offset = u16::try_from(buffer.cursor()).unwrap_or(u16::MAX);
    beg.saturating_add(offset)
}
