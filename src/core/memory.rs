//! In-memory terminal backend.
//!
//! Keeps a cell grid instead of talking to a device and replays a scripted
//! queue of inputs. An exhausted script reads as [`Input::Timeout`], so a
//! dialog driven by it always terminates.

use std::cell::Cell as Counter;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use super::backend::{advance, Attr, Backend, Input, NamedKey, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self { ch: ' ', bold: false }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Input(Input),
    /// Change the window size, then report [`Input::Resize`]
    ResizeTo(u16, u16),
}

/// Terminal emulated in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    cols: u16,
    rows: u16,
    grid: Vec<Vec<Cell>>,
    cursor: Pos,
    script: VecDeque<Step>,
    /// Every character ever drawn, in order
    drawn: String,
    acquired: bool,
    acquisitions: Rc<Counter<usize>>,
    releases: Rc<Counter<usize>>,
    /// Timeouts handed to `read_input`, newest last
    timeouts: Vec<Option<Duration>>,
}

impl MemoryBackend {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            grid: blank_grid(cols, rows),
            cursor: Pos::default(),
            script: VecDeque::new(),
            drawn: String::new(),
            acquired: false,
            acquisitions: Rc::new(Counter::new(0)),
            releases: Rc::new(Counter::new(0)),
            timeouts: Vec::new(),
        }
    }

    /// Queue one input.
    pub fn push(&mut self, input: Input) -> &mut Self {
        self.script.push_back(Step::Input(input));
        self
    }

    pub fn push_key(&mut self, key: NamedKey) -> &mut Self {
        self.push(Input::Key(key))
    }

    /// Queue every character of `text` as a keystroke.
    pub fn type_str(&mut self, text: &str) -> &mut Self {
        for ch in text.chars() {
            self.push(Input::Char(ch));
        }
        self
    }

    /// Queue a window size change.
    pub fn push_resize(&mut self, cols: u16, rows: u16) -> &mut Self {
        self.script.push_back(Step::ResizeTo(cols, rows));
        self
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired
    }

    /// Shared counter of `release` calls that did something.
    pub fn release_counter(&self) -> Rc<Counter<usize>> {
        Rc::clone(&self.releases)
    }

    pub fn acquire_counter(&self) -> Rc<Counter<usize>> {
        Rc::clone(&self.acquisitions)
    }

    pub fn timeouts(&self) -> &[Option<Duration>] {
        &self.timeouts
    }

    /// Everything drawn since construction, in draw order.
    pub fn drawn(&self) -> &str {
        &self.drawn
    }

    pub fn char_at(&self, row: u16, col: u16) -> Option<char> {
        self.cell(row, col).map(|c| c.ch)
    }

    pub fn is_bold(&self, row: u16, col: u16) -> bool {
        self.cell(row, col).map(|c| c.bold).unwrap_or(false)
    }

    /// Contents of a row, trailing blanks included.
    pub fn row_text(&self, row: u16) -> String {
        self.grid
            .get(row as usize)
            .map(|cells| cells.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    /// The whole screen, one line per row.
    pub fn screen(&self) -> String {
        (0..self.rows)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        self.grid.get(row as usize)?.get(col as usize)
    }
}

fn blank_grid(cols: u16, rows: u16) -> Vec<Vec<Cell>> {
    vec![vec![Cell::default(); cols as usize]; rows as usize]
}

impl Backend for MemoryBackend {
    fn acquire(&mut self) -> io::Result<()> {
        if !self.acquired {
            self.acquired = true;
            self.acquisitions.set(self.acquisitions.get() + 1);
        }
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        if self.acquired {
            self.acquired = false;
            self.releases.set(self.releases.get() + 1);
        }
        Ok(())
    }

    fn read_input(&mut self, timeout: Option<Duration>) -> io::Result<Input> {
        self.timeouts.push(timeout);
        let input = match self.script.pop_front() {
            Some(Step::Input(input)) => input,
            Some(Step::ResizeTo(cols, rows)) => {
                self.cols = cols;
                self.rows = rows;
                self.grid = blank_grid(cols, rows);
                Input::Resize
            }
            None => Input::Timeout,
        };
        Ok(input)
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.cols, self.rows))
    }

    fn clear(&mut self) -> io::Result<()> {
        self.grid = blank_grid(self.cols, self.rows);
        self.cursor = Pos::default();
        Ok(())
    }

    fn clear_to_eol(&mut self, at: Pos) -> io::Result<Pos> {
        if let Some(cells) = self.grid.get_mut(at.row as usize) {
            for cell in cells.iter_mut().skip(at.col as usize) {
                *cell = Cell::default();
            }
        }
        self.cursor = at;
        Ok(at)
    }

    fn move_to(&mut self, at: Pos) -> io::Result<Pos> {
        self.cursor = at;
        Ok(at)
    }

    fn put_str(&mut self, at: Pos, text: &str, attr: Attr) -> io::Result<Pos> {
        let bold = attr == Attr::Bold;
        if let Some(cells) = self.grid.get_mut(at.row as usize) {
            for (offset, ch) in text.chars().enumerate() {
                // Off-screen characters are dropped
                if let Some(cell) = cells.get_mut(at.col as usize + offset) {
                    *cell = Cell { ch, bold };
                }
            }
        }
        self.drawn.push_str(text);
        self.cursor = advance(at, text);
        Ok(self.cursor)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
