//! Terminal access and session lifecycle.
//!
//! - **backend**: the terminal device contract (`Backend`, `Input`, `Pos`)
//! - **crossterm_backend**: the real terminal, via crossterm
//! - **memory**: an in-memory terminal with scripted input
//! - **session**: exclusive ownership of a terminal for one dialog
//! - **error**: `DialogError`
//!
//! # Architecture
//!
//! ```text
//! Session<B: Backend>
//! ├── B (CrosstermBackend | MemoryBackend)
//! ├── cursor (y, x)  <- returned by every draw
//! └── window (rows, cols), read timeout
//! ```

pub mod backend;
pub mod crossterm_backend;
pub mod error;
pub mod memory;
pub mod session;

pub use backend::{Attr, Backend, Input, NamedKey, Pos};
pub use crossterm_backend::CrosstermBackend;
pub use error::{DialogError, Result};
pub use memory::MemoryBackend;
pub use session::Session;
