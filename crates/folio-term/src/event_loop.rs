// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — input, resize, and repaint in one place.
//
// Stdin bytes arrive on a channel from the background reader, get
// parsed into key events, the application handles them, and a dirty
// flag decides whether to compose and flush a frame. The loop blocks
// on `recv_timeout`, so an idle editor costs no CPU.
//
// # SIGWINCH
//
// Terminal resize raises SIGWINCH. The handler sets an `AtomicBool`
// (the only thing safe to do in a signal handler); the loop checks the
// flag each iteration, re-queries the size, and triggers a full
// repaint.
//
// # Escape timeout
//
// A lone ESC byte might be the Escape key or the start of a CSI
// sequence, so the parser holds it as pending. When `recv_timeout`
// fires with nothing new, pending bytes are flushed as literal keys.
// The timeout is the worst-case lag on a bare Escape press.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::ansi;
use crate::input::{KeyEvent, Parser};
use crate::output::OutputBuffer;
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

/// Channel timeout. Doubles as the escape-sequence timeout and as the
/// resize-detection latency bound.
const TICK_TIMEOUT: Duration = Duration::from_millis(25);

// ─── SIGWINCH ───────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler, drained by the loop.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App trait ──────────────────────────────────────────────────────────────

/// What the application wants the loop to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Leave the loop cleanly.
    Quit,
}

/// Application interface driven by the event loop.
///
/// Per iteration the loop calls [`on_key`](App::on_key) for each parsed
/// key, [`on_resize`](App::on_resize) if the terminal changed size, and
/// then — when anything happened — [`paint`](App::paint) followed by
/// [`cursor`](App::cursor) to place or hide the hardware cursor.
pub trait App {
    /// Handle one key event. Return [`Action::Quit`] to exit.
    fn on_key(&mut self, key: KeyEvent) -> Action;

    /// The terminal was resized.
    fn on_resize(&mut self, _size: Size) {}

    /// Compose the visible frame into `out`. The loop flushes it in a
    /// single write afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    fn paint(&mut self, out: &mut OutputBuffer, size: Size) -> io::Result<()>;

    /// Where to show the hardware cursor after painting, as 0-indexed
    /// `(x, y)`. `None` keeps it hidden.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

// ─── EventLoop ──────────────────────────────────────────────────────────────

/// Owns the terminal, input parser, and frame buffer; drives an [`App`]
/// until it quits.
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    out: OutputBuffer,
}

impl EventLoop {
    /// Set up the terminal (raw mode stays off until [`run`](Self::run)).
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            parser: Parser::new(),
            out: OutputBuffer::new(),
        })
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the application returns [`Action::Quit`].
    ///
    /// Enters raw mode and the alternate screen, installs the resize
    /// handler, spawns the stdin reader, and restores the terminal on
    /// the way out — even when the loop body errors.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, painting, or output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let (mut reader, rx) = StdinReader::spawn();
        let result = self.run_inner(app, &rx);

        reader.stop();
        self.terminal.leave()?;

        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        app.on_resize(self.terminal.size());
        let mut dirty = true; // First frame always paints.

        loop {
            match rx.recv_timeout(TICK_TIMEOUT) {
                Ok(bytes) => {
                    let events = self.parser.advance(&bytes);
                    if !events.is_empty() {
                        dirty = true;
                    }
                    for key in events {
                        if app.on_key(key) == Action::Quit {
                            return Ok(());
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.parser.has_pending() {
                        let events = self.parser.flush();
                        if !events.is_empty() {
                            dirty = true;
                        }
                        for key in events {
                            if app.on_key(key) == Action::Quit {
                                return Ok(());
                            }
                        }
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    // Stdin reader died (EOF). Nothing more will arrive.
                    return Ok(());
                }
            }

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                app.on_resize(size);
                dirty = true;
            }

            if dirty {
                self.paint_frame(app)?;
                dirty = false;
            }
        }
    }

    /// Compose one frame, append the cursor command, flush in one write.
    fn paint_frame(&mut self, app: &mut impl App) -> io::Result<()> {
        self.out.clear();
        app.paint(&mut self.out, self.terminal.size())?;

        if let Some((x, y)) = app.cursor() {
            ansi::cursor_to(&mut self.out, x, y)?;
            ansi::cursor_show(&mut self.out)?;
        } else {
            ansi::cursor_hide(&mut self.out)?;
        }

        self.out.flush_stdout()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
