//! ttydialog - single-line prompt dialogs on a raw terminal
//!
//! A dialog takes over the terminal, paints a bordered panel with a bold
//! title, a few lines of information and a prompt, then reads one line of
//! input character by character. Typed text can be echoed as-is or masked
//! for PIN entry. Reads can time out, and resizing the window mid-entry
//! repaints the panel without losing what was typed.
//!
//! # Example
//!
//! ```no_run
//! use ttydialog::{CrosstermBackend, EchoMode, Panel, PromptPlacement, Response, Session};
//!
//! # fn main() -> ttydialog::Result<()> {
//! let mut session = Session::open(CrosstermBackend::stdout()?, Some(250))?;
//! let panel = Panel::new("PIN Entry")
//!     .lines(["PIN is required to change run state.", ""])
//!     .prompt("Enter PIN:")
//!     .placement(PromptPlacement::BelowLines);
//!
//! match session.execute(&panel, EchoMode::masked())? {
//!     Response::Text(pin) => session.write_message(&format!("Got {} digits", pin.len()))?,
//!     Response::Timeout => session.write_message("No answer")?,
//! }
//! session.close()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod ui;

pub use crate::config::Config;
pub use crate::core::{
    Backend, CrosstermBackend, DialogError, Input, MemoryBackend, NamedKey, Pos, Result, Session,
};
pub use crate::ui::{EchoMode, EditBuffer, Panel, PromptPlacement, Response};
