//! Real terminal backend using crossterm.
//!
//! Raw mode on the controlling terminal gives us single keystrokes without
//! echo or line buffering, and clears ISIG so Ctrl-C arrives as an ordinary
//! key instead of a signal. On Unix a SIGINT sent from elsewhere (`kill -INT`)
//! is also swallowed while the terminal is held; once it is released SIGINT
//! terminates the process again. A handler the host application installed
//! for SIGINT before the first acquire is not reinstated.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(unix)]
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Print, ResetColor, SetAttribute},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use tracing::{debug, warn};

use super::backend::{advance, is_printable, Attr, Backend, Input, NamedKey, Pos};
use super::error::{DialogError, Result};

/// Set while some backend holds the process's terminal.
static TERMINAL_CLAIMED: AtomicBool = AtomicBool::new(false);

/// While true, SIGINT takes its default action (terminate). Backed by a
/// single process-wide hook, registered on first use and never removed.
#[cfg(unix)]
static SIGINT_DEFAULT: OnceLock<Arc<AtomicBool>> = OnceLock::new();

#[cfg(unix)]
fn sigint_default() -> io::Result<&'static Arc<AtomicBool>> {
    if let Some(flag) = SIGINT_DEFAULT.get() {
        return Ok(flag);
    }
    let flag = Arc::new(AtomicBool::new(true));
    signal_hook::flag::register_conditional_default(
        signal_hook::consts::SIGINT,
        Arc::clone(&flag),
    )?;
    Ok(SIGINT_DEFAULT.get_or_init(|| flag))
}

/// Exclusive claim on the controlling terminal. Released on drop.
#[derive(Debug)]
pub struct TerminalClaim(());

impl TerminalClaim {
    /// Returns `None` if another claim is alive.
    pub fn try_claim() -> Option<Self> {
        TERMINAL_CLAIMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(()))
    }
}

impl Drop for TerminalClaim {
    fn drop(&mut self) {
        TERMINAL_CLAIMED.store(false, Ordering::Release);
    }
}

/// Terminal backend writing escape sequences to `W` (stdout by default).
pub struct CrosstermBackend<W: Write> {
    out: W,
    /// Held for the controlling terminal, `None` for other writers
    #[allow(dead_code)]
    claim: Option<TerminalClaim>,
    /// Whether raw mode etc. are currently in effect
    acquired: bool,
    #[cfg(unix)]
    suppressing_sigint: bool,
}

impl CrosstermBackend<io::Stdout> {
    /// Backend drawing on stdout. Only one claimed backend may exist at a time.
    pub fn stdout() -> Result<Self> {
        Self::claimed(io::stdout())
    }
}

impl CrosstermBackend<io::Stderr> {
    /// Backend drawing on stderr, leaving stdout free for the answer.
    /// Only one claimed backend may exist at a time.
    pub fn stderr() -> Result<Self> {
        Self::claimed(io::stderr())
    }
}

impl<W: Write> CrosstermBackend<W> {
    /// Backend for the process's terminal drawing on `out`. Fails with
    /// [`DialogError::TerminalBusy`] while another claimed backend is alive.
    pub fn claimed(out: W) -> Result<Self> {
        let claim = TerminalClaim::try_claim().ok_or(DialogError::TerminalBusy)?;
        let mut backend = Self::new(out);
        backend.claim = Some(claim);
        Ok(backend)
    }

    /// Backend writing to an arbitrary sink. Input is still read from the
    /// process's terminal.
    pub fn new(out: W) -> Self {
        Self {
            out,
            claim: None,
            acquired: false,
            #[cfg(unix)]
            suppressing_sigint: false,
        }
    }

    #[cfg(unix)]
    fn suppress_interrupt(&mut self) -> io::Result<()> {
        sigint_default()?.store(false, Ordering::SeqCst);
        self.suppressing_sigint = true;
        Ok(())
    }

    #[cfg(not(unix))]
    fn suppress_interrupt(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn restore_interrupt(&mut self) {
        if std::mem::take(&mut self.suppressing_sigint) {
            if let Some(flag) = SIGINT_DEFAULT.get() {
                flag.store(true, Ordering::SeqCst);
            }
        }
    }

    #[cfg(not(unix))]
    fn restore_interrupt(&mut self) {}
}

impl<W: Write> Backend for CrosstermBackend<W> {
    fn acquire(&mut self) -> io::Result<()> {
        if self.acquired {
            return Ok(());
        }

        terminal::enable_raw_mode()?;
        self.acquired = true;

        execute!(
            self.out,
            EnterAlternateScreen,
            DisableLineWrap,
            Clear(ClearType::All),
            MoveTo(0, 0),
            Show
        )?;
        self.suppress_interrupt()?;
        debug!("terminal acquired");
        Ok(())
    }

    fn release(&mut self) -> io::Result<()> {
        if !self.acquired {
            return Ok(());
        }
        self.acquired = false;
        self.restore_interrupt();

        // Reset attributes first
        let _ = execute!(self.out, ResetColor, SetAttribute(Attribute::Reset));
        let _ = execute!(self.out, EnableLineWrap, Show, LeaveAlternateScreen);
        let _ = self.out.flush();

        // Disable raw mode - this is the most important part
        terminal::disable_raw_mode()?;
        debug!("terminal released");
        Ok(())
    }

    fn read_input(&mut self, timeout: Option<Duration>) -> io::Result<Input> {
        if let Some(timeout) = timeout {
            if !event::poll(timeout)? {
                return Ok(Input::Timeout);
            }
        }
        Ok(map_event(&event::read()?))
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn clear_to_eol(&mut self, at: Pos) -> io::Result<Pos> {
        queue!(self.out, MoveTo(at.col, at.row), Clear(ClearType::UntilNewLine))?;
        Ok(at)
    }

    fn move_to(&mut self, at: Pos) -> io::Result<Pos> {
        queue!(self.out, MoveTo(at.col, at.row))?;
        Ok(at)
    }

    fn put_str(&mut self, at: Pos, text: &str, attr: Attr) -> io::Result<Pos> {
        queue!(self.out, Hide, MoveTo(at.col, at.row))?;
        match attr {
            Attr::Normal => queue!(self.out, Print(text))?,
            Attr::Bold => queue!(
                self.out,
                SetAttribute(Attribute::Bold),
                Print(text),
                SetAttribute(Attribute::Reset)
            )?,
        }
        queue!(self.out, Show)?;
        Ok(advance(at, text))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        if self.acquired {
            warn!("terminal backend dropped while still acquired");
            let _ = self.release();
        }
    }
}

/// Map a crossterm event to dialog input.
pub fn map_event(event: &Event) -> Input {
    match event {
        Event::Key(key) => map_key(key),
        Event::Resize(_, _) => Input::Resize,
        _ => Input::Key(NamedKey::Other),
    }
}

/// Map a key event to dialog input.
///
/// Only plain printable ASCII is returned as [`Input::Char`]. Control and
/// Alt chords are ignored, except the classic Ctrl-J / Ctrl-M (Enter) and
/// Ctrl-H (Backspace) that some terminals send in raw mode.
pub fn map_key(event: &KeyEvent) -> Input {
    if event.kind == KeyEventKind::Release {
        return Input::Key(NamedKey::Other);
    }
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);

    let key = match event.code {
        KeyCode::Char(ch) if !ctrl && !alt && is_printable(ch) => return Input::Char(ch),
        KeyCode::Char('j') | KeyCode::Char('m') if ctrl => NamedKey::Enter,
        KeyCode::Char('h') if ctrl => NamedKey::Backspace,
        KeyCode::Enter => NamedKey::Enter,
        KeyCode::Left => NamedKey::Left,
        KeyCode::Right => NamedKey::Right,
        KeyCode::Home => NamedKey::Home,
        KeyCode::End => NamedKey::End,
        KeyCode::Backspace => NamedKey::Backspace,
        KeyCode::Delete => NamedKey::Delete,
        _ => NamedKey::Other,
    };
    Input::Key(key)
}
