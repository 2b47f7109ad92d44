//! Error types for the dialog engine.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialogError {
    #[error("echo mode must be 'On' or '*' (got {0:?})")]
    InvalidEchoMode(String),

    #[error("terminal is already owned by another dialog session")]
    TerminalBusy,

    #[error("Failed to acquire terminal: {0}")]
    Acquire(#[source] io::Error),

    #[error("Failed to release terminal: {0}")]
    Release(#[source] io::Error),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DialogError>;
