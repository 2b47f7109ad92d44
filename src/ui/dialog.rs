//! Caller-facing dialog operations.

use tracing::{debug, info};

use crate::core::{Attr, Backend, Pos, Result, Session};

use super::editor::{EchoMode, EditBuffer, EditOutcome};
use super::panel::Panel;

/// What a dialog produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Enter was pressed; the text as typed, possibly empty.
    Text(String),
    /// No key arrived within the session's read timeout. Any partial input
    /// is discarded.
    Timeout,
}

impl Response {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Timeout => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl<B: Backend> Session<B> {
    /// Paint `panel` and read one line of input.
    ///
    /// A resize mid-entry repaints the panel and carries the typed text over.
    pub fn execute(&mut self, panel: &Panel, echo: EchoMode) -> Result<Response> {
        self.draw(panel)?;
        let mut buffer = EditBuffer::new(echo);
        let mut resume_col = None;

        loop {
            match self.get_input(&mut buffer, resume_col)? {
                EditOutcome::Resized => {
                    resume_col = Some(self.x);
                    self.draw(panel)?;
                    debug!(len = buffer.len(), "panel redrawn after resize");
                }
                EditOutcome::TimedOut => {
                    info!(title = %panel.title, "dialog timed out");
                    return Ok(Response::Timeout);
                }
                EditOutcome::Done => {
                    info!(title = %panel.title, len = buffer.len(), "dialog answered");
                    return Ok(Response::Text(buffer.into_text()));
                }
            }
        }
    }

    /// Clear the window and show `message` in the top-left corner.
    pub fn write_message(&mut self, message: &str) -> Result<()> {
        self.backend.clear()?;
        let end = self.backend.put_str(Pos::new(0, 0), message, Attr::Normal)?;
        self.sync_cursor(end);
        self.backend.flush()?;
        Ok(())
    }
}
