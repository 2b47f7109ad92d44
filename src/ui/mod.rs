//! Dialog drawing and input handling.
//!
//! - **panel**: bordered panel with title, info lines and prompt
//! - **editor**: single-line edit buffer and the key loop
//! - **dialog**: `execute` / `write_message`, the caller-facing operations
//!
//! # Flow
//!
//! ```text
//! execute(panel, echo)
//!     ↓
//! draw(panel)            → anchor column after the prompt
//!     ↓
//! get_input(buffer)      → Done | TimedOut | Resized ─┐
//!     ↑                                               │
//!     └──────────── draw(panel) again ←───────────────┘
//! ```

pub mod dialog;
pub mod editor;
pub mod panel;

pub use dialog::Response;
pub use editor::{EchoMode, EditBuffer, EditOutcome};
pub use panel::{Panel, PromptPlacement};
