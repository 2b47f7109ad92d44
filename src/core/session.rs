//! Dialog session management
//!
//! A [`Session`] owns the terminal for the lifetime of one dialog: it is
//! acquired in [`Session::open`] and given back exactly once, either by
//! [`Session::close`] or when the session is dropped on an error path.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::backend::{Backend, Pos};
use super::error::{DialogError, Result};

/// Longest read timeout the terminal layer supports, in tenths of a second.
pub const MAX_TIMEOUT_TENTHS: u8 = 255;

/// Shortest non-blocking read timeout, in tenths of a second.
pub const MIN_TIMEOUT_TENTHS: u8 = 1;

/// Exclusive hold on a terminal plus the drawing state of the dialog on it.
pub struct Session<B: Backend> {
    pub(crate) backend: B,
    /// Cursor row, as returned by the last draw or move
    pub(crate) y: u16,
    /// Cursor column, as returned by the last draw or move
    pub(crate) x: u16,
    /// Window rows seen by the last panel draw
    pub(crate) rows: u16,
    /// Window columns seen by the last panel draw
    pub(crate) cols: u16,
    /// Read timeout in tenths of a second, `None` blocks
    timeout_tenths: Option<u8>,
    released: bool,
}

impl<B: Backend> Session<B> {
    /// Acquire `backend` and configure the read timeout.
    ///
    /// `timeout_tenths` of `None` makes every read block. Any other value is
    /// clamped to what the terminal layer supports.
    pub fn open(mut backend: B, timeout_tenths: Option<u8>) -> Result<Self> {
        let timeout_tenths = timeout_tenths.map(|t| t.clamp(MIN_TIMEOUT_TENTHS, MAX_TIMEOUT_TENTHS));
        backend.acquire().map_err(DialogError::Acquire)?;
        info!(timeout_tenths = ?timeout_tenths, "dialog session opened");

        Ok(Self {
            backend,
            y: 0,
            x: 0,
            rows: 0,
            cols: 0,
            timeout_tenths,
            released: false,
        })
    }

    /// Give the terminal back.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.backend.release().map_err(DialogError::Release)?;
        info!("dialog session closed");
        Ok(())
    }

    pub fn timeout_tenths(&self) -> Option<u8> {
        self.timeout_tenths
    }

    /// Read timeout as a duration, `None` when reads block.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_tenths
            .map(|t| Duration::from_millis(u64::from(t) * 100))
    }

    /// Cursor position after the last draw or move.
    pub fn cursor(&self) -> Pos {
        Pos::new(self.y, self.x)
    }

    /// Window size `(cols, rows)` as of the last panel draw.
    pub fn window(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Record a position returned by the backend as the current cursor.
    pub(crate) fn sync_cursor(&mut self, pos: Pos) {
        self.y = pos.row;
        self.x = pos.col;
    }

    /// Move the cursor and record where it went.
    pub(crate) fn move_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        let pos = self.backend.move_to(Pos::new(row, col))?;
        self.sync_cursor(pos);
        self.backend.flush()?;
        debug!(row = pos.row, col = pos.col, "cursor moved");
        Ok(())
    }
}

impl<B: Backend> Drop for Session<B> {
    fn drop(&mut self) {
        if !self.released {
            warn!("dialog session dropped without close, releasing terminal");
            let _ = self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::MemoryBackend;

    #[test]
    fn test_open_acquires_and_close_releases() {
        let backend = MemoryBackend::new(40, 12);
        let acquires = backend.acquire_counter();
        let releases = backend.release_counter();

        let session = Session::open(backend, Some(50)).unwrap();
        assert!(session.backend().is_acquired());
        assert_eq!(acquires.get(), 1);

        session.close().unwrap();
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_drop_releases_once() {
        let backend = MemoryBackend::new(40, 12);
        let releases = backend.release_counter();
        {
            let _session = Session::open(backend, None).unwrap();
        }
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_release_on_error_path() {
        fn failing(backend: MemoryBackend) -> Result<()> {
            let _session = Session::open(backend, Some(100))?;
            Err(DialogError::InvalidEchoMode("x".into()))
        }

        let backend = MemoryBackend::new(40, 12);
        let releases = backend.release_counter();
        assert!(failing(backend).is_err());
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_timeout_clamping() {
        let session = Session::open(MemoryBackend::new(10, 10), None).unwrap();
        assert_eq!(session.timeout(), None);

        let session = Session::open(MemoryBackend::new(10, 10), Some(0)).unwrap();
        assert_eq!(session.timeout_tenths(), Some(MIN_TIMEOUT_TENTHS));

        let session = Session::open(MemoryBackend::new(10, 10), Some(250)).unwrap();
        assert_eq!(session.timeout(), Some(Duration::from_secs(25)));
    }
}
