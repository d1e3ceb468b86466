// SPDX-License-Identifier: MIT
//
// folio-term — Terminal backend for folio.
//
// Direct terminal control via ANSI escape sequences and raw termios,
// with no TUI framework in between. The editor owns every byte it
// sends: frames are composed in memory and written in one syscall,
// input bytes are parsed incrementally into key events, and the
// terminal is always restored on exit — even on panic.
//
// Module map:
//
//   ansi       → escape sequence emission helpers
//   output     → in-memory frame buffer, one write per frame
//   terminal   → raw mode, alternate screen, RAII restore, size query
//   input      → byte stream → KeyEvent parser
//   reader     → background stdin reader thread
//   event_loop → App trait + the input/resize/paint loop

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
