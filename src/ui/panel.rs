//! Panel rendering.
//!
//! A panel fills the whole window:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │     ZoneMinder Control       │  row 1: bold, centered title
//! ├──────────────────────────────┤  row 2: divider
//! │Status: running               │  row 3..: informational lines
//! │                              │
//! │Choice: _                     │  prompt (or pinned to rows - 2)
//! └──────────────────────────────┘
//! ```

use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::core::{Attr, Backend, Pos, Result, Session};

/// Row of the title.
const TITLE_ROW: u16 = 1;
/// Row of the divider under the title.
const DIVIDER_ROW: u16 = 2;
/// First row of informational lines.
const FIRST_LINE_ROW: u16 = 3;
/// Column where lines and the prompt start.
const LEFT_COL: u16 = 1;

/// Where the prompt goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptPlacement {
    /// On the row right after the last informational line.
    BelowLines,
    /// On the second-to-last row, however many lines there are.
    #[default]
    Bottom,
}

impl PromptPlacement {
    pub fn from_bottom(at_bottom: bool) -> Self {
        if at_bottom {
            Self::Bottom
        } else {
            Self::BelowLines
        }
    }
}

/// Everything needed to paint a panel. Kept by the caller so the panel can
/// be repainted identically after a resize.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub lines: Vec<String>,
    pub prompt: String,
    pub placement: PromptPlacement,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn placement(mut self, placement: PromptPlacement) -> Self {
        self.placement = placement;
        self
    }
}

/// Border characters
pub(crate) struct BorderChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
    pub t_left: char,
    pub t_right: char,
}

impl BorderChars {
    pub fn single() -> Self {
        Self {
            top_left: '┌',
            top_right: '┐',
            bottom_left: '└',
            bottom_right: '┘',
            horizontal: '─',
            vertical: '│',
            t_left: '┤',
            t_right: '├',
        }
    }
}

/// Column that centers `text` in `cols`: `(cols - width) / 2`, with an odd
/// gap's half column rounded to the even neighbour. Saturates at 0 for
/// titles wider than the window.
pub fn centered_col(cols: u16, text: &str) -> u16 {
    let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
    let gap = cols.saturating_sub(width);
    let half = gap / 2;
    if gap % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    }
}

/// Row the prompt lands on.
pub fn prompt_row(panel: &Panel, rows: u16) -> u16 {
    match panel.placement {
        PromptPlacement::Bottom => rows.saturating_sub(2),
        PromptPlacement::BelowLines => {
            let count = u16::try_from(panel.lines.len()).unwrap_or(u16::MAX);
            FIRST_LINE_ROW.saturating_add(count)
        }
    }
}

impl<B: Backend> Session<B> {
    /// Repaint the whole window with `panel`.
    ///
    /// Returns the position after the prompt, which is also stored as the
    /// session cursor. That column is the left edge of the input field.
    pub fn draw(&mut self, panel: &Panel) -> Result<Pos> {
        let (cols, rows) = self.backend.size()?;
        self.cols = cols;
        self.rows = rows;
        self.backend.clear()?;

        self.draw_border()?;

        self.backend.put_str(
            Pos::new(TITLE_ROW, centered_col(cols, &panel.title)),
            &panel.title,
            Attr::Bold,
        )?;

        let mut row = FIRST_LINE_ROW;
        for line in &panel.lines {
            self.backend.put_str(Pos::new(row, LEFT_COL), line, Attr::Normal)?;
            row = row.saturating_add(1);
        }

        let row = prompt_row(panel, rows);
        let prompt = format!("{} ", panel.prompt);
        let end = self.backend.put_str(Pos::new(row, LEFT_COL), &prompt, Attr::Normal)?;
        self.sync_cursor(end);
        self.backend.flush()?;

        debug!(cols, rows, anchor_row = end.row, anchor_col = end.col, "panel drawn");
        Ok(end)
    }

    /// Border around the window plus the divider under the title.
    fn draw_border(&mut self) -> Result<()> {
        let (cols, rows) = (self.cols, self.rows);
        if cols < 2 || rows < 2 {
            return Ok(());
        }
        let chars = BorderChars::single();
        let inner = (cols - 2) as usize;
        let horizontal: String = std::iter::repeat(chars.horizontal).take(inner).collect();

        // Top border
        let top = format!("{}{}{}", chars.top_left, horizontal, chars.top_right);
        self.backend.put_str(Pos::new(0, 0), &top, Attr::Normal)?;

        // Side borders
        let vertical = chars.vertical.to_string();
        for row in 1..rows - 1 {
            self.backend.put_str(Pos::new(row, 0), &vertical, Attr::Normal)?;
            self.backend.put_str(Pos::new(row, cols - 1), &vertical, Attr::Normal)?;
        }

        // Bottom border
        let bottom = format!("{}{}{}", chars.bottom_left, horizontal, chars.bottom_right);
        self.backend.put_str(Pos::new(rows - 1, 0), &bottom, Attr::Normal)?;

        // Divider with tees meeting the sides
        if DIVIDER_ROW < rows - 1 {
            let divider = format!("{}{}{}", chars.t_right, horizontal, chars.t_left);
            self.backend.put_str(Pos::new(DIVIDER_ROW, 0), &divider, Attr::Normal)?;
        }
        Ok(())
    }

    /// Put the right border back on `row` after a clear-to-end-of-line.
    pub(crate) fn restore_right_border(&mut self, row: u16) -> Result<()> {
        if self.cols == 0 || row == 0 || row + 1 >= self.rows {
            return Ok(());
        }
        let vertical = BorderChars::single().vertical.to_string();
        self.backend.put_str(Pos::new(row, self.cols - 1), &vertical, Attr::Normal)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryBackend;

    fn open(cols: u16, rows: u16) -> Session<MemoryBackend> {
        Session::open(MemoryBackend::new(cols, rows), None).unwrap()
    }

    fn menu_panel() -> Panel {
        Panel::new("Menu")
            .lines(["Status: OK", "", "1: home"])
            .prompt("Choice:")
            .placement(PromptPlacement::BelowLines)
    }

    #[test]
    fn test_border_and_divider() {
        let mut session = open(12, 6);
        session.draw(&Panel::new("T").prompt(">")).unwrap();
        let backend = session.backend();

        assert_eq!(backend.row_text(0), "┌──────────┐");
        assert_eq!(backend.row_text(2), "├──────────┤");
        assert_eq!(backend.row_text(5), "└──────────┘");
        assert_eq!(backend.char_at(3, 0), Some('│'));
        assert_eq!(backend.char_at(3, 11), Some('│'));
    }

    #[test]
    fn test_title_centered_and_bold() {
        let mut session = open(20, 8);
        session.draw(&menu_panel()).unwrap();
        let backend = session.backend();

        // (20 - 4) / 2 = 8
        assert_eq!(backend.row_text(1), "│       Menu       │");
        assert!(backend.is_bold(1, 8));
        assert!(backend.is_bold(1, 11));
        assert!(!backend.is_bold(1, 12));
        assert!(!backend.is_bold(3, 1));
    }

    #[test]
    fn test_overlong_title_starts_at_zero() {
        assert_eq!(centered_col(10, "a very long title"), 0);
        assert_eq!(centered_col(11, "abc"), 4);
    }

    #[test]
    fn test_odd_gap_rounds_to_even_column() {
        // 7.5 -> 8
        assert_eq!(centered_col(20, "Title"), 8);
        // 8.5 -> 8
        assert_eq!(centered_col(20, "abc"), 8);
        // 0.5 -> 0
        assert_eq!(centered_col(4, "abc"), 0);
        // 1.5 -> 2
        assert_eq!(centered_col(4, "a"), 2);
    }

    #[test]
    fn test_prompt_below_lines() {
        let mut session = open(30, 12);
        let anchor = session.draw(&menu_panel()).unwrap();
        let backend = session.backend();

        assert!(backend.row_text(3).starts_with("│Status: OK"));
        assert!(backend.row_text(5).starts_with("│1: home"));
        assert!(backend.row_text(6).starts_with("│Choice: "));
        // "Choice: " is 8 columns starting at column 1
        assert_eq!(anchor, Pos::new(6, 9));
        assert_eq!(session.cursor(), anchor);
    }

    #[test]
    fn test_prompt_pinned_to_bottom() {
        let mut session = open(30, 12);
        let panel = menu_panel().placement(PromptPlacement::Bottom);
        let anchor = session.draw(&panel).unwrap();

        assert_eq!(anchor, Pos::new(10, 9));
        assert!(session.backend().row_text(10).starts_with("│Choice: "));
        assert_eq!(session.window(), (30, 12));
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let mut session = open(40, 10);
        let panel = menu_panel();

        let first_anchor = session.draw(&panel).unwrap();
        let first_screen = session.backend().screen();
        let second_anchor = session.draw(&panel).unwrap();

        assert_eq!(first_anchor, second_anchor);
        assert_eq!(first_screen, session.backend().screen());
    }

    #[test]
    fn test_tiny_window_does_not_panic() {
        let mut session = open(1, 1);
        let anchor = session.draw(&menu_panel().placement(PromptPlacement::Bottom)).unwrap();
        assert_eq!(anchor.row, 0);
    }

    #[test]
    fn test_restore_right_border() {
        let mut session = open(10, 6);
        session.draw(&Panel::new("T").prompt(">")).unwrap();
        session.backend_mut().clear_to_eol(Pos::new(3, 1)).unwrap();
        assert_eq!(session.backend().char_at(3, 9), Some(' '));

        session.restore_right_border(3).unwrap();
        assert_eq!(session.backend().char_at(3, 9), Some('│'));
    }
}
