// SPDX-License-Identifier: MIT
//
// Frame output buffering.
//
// A frame is composed entirely in memory and then written to stdout
// with a single `write_all`. One syscall per frame keeps the terminal's
// own parser from ever seeing a half-emitted escape sequence, and makes
// partial repaints flicker-free.

use std::io::{self, Write};

/// A byte buffer that accumulates one frame of ANSI output.
///
/// Implements [`io::Write`], so the `ansi` helpers and `write!` both
/// compose into it directly. Flush with [`flush_stdout`](Self::flush_stdout)
/// at frame end.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

/// Enough for a full repaint of a typical terminal without reallocation.
const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer holds no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Discard the frame without writing it. Keeps the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write the accumulated frame to stdout in one call and clear the
    /// buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&self.buf)?;
            stdout.flush()?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Write the accumulated frame to an arbitrary writer and clear the
    /// buffer. Used by tests to inspect frame content.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op; real flushing goes through flush_stdout.
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
