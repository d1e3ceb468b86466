// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader.
//
// Raw-mode `read()` on stdin blocks, but the event loop must stay free
// to handle resize signals and escape-sequence timeouts. A dedicated
// thread does the blocking reads and forwards byte chunks over a
// standard channel; the main loop drives itself with `recv_timeout`.
//
// Shutdown: the thread polls stdin with a short timeout and checks an
// `AtomicBool` stop flag between polls, so `stop()` never has to
// interrupt a blocked `read()`.

#[cfg(unix)]
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// Read chunk size. A keypress is 1-6 bytes; a paste can be kilobytes.
const READ_BUF_SIZE: usize = 4096;

/// Poll timeout between stop-flag checks, in milliseconds. Bounds the
/// shutdown latency.
const POLL_TIMEOUT_MS: i32 = 50;

/// Handle to the stdin reader thread.
///
/// [`spawn`](Self::spawn) starts the thread and returns a channel of
/// raw byte chunks. The thread runs until [`stop`](Self::stop) is
/// called or the handle is dropped.
pub struct StdinReader {
    /// Thread handle, taken by `stop()` when joining.
    handle: Option<JoinHandle<()>>,
    /// Shared exit flag.
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the reader thread.
    ///
    /// Each received `Vec<u8>` is a non-empty chunk of stdin bytes. The
    /// channel closes when the reader stops or stdin hits EOF.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to spawn a thread.
    #[must_use]
    pub fn spawn() -> (Self, Receiver<Vec<u8>>) {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || read_loop(&tx, &stop_flag))
            .expect("failed to spawn stdin reader thread");

        (
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        )
    }

    /// Signal the thread to exit and join it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Poll stdin, read available bytes, send them on. Exits on the stop
/// flag, EOF, or a dropped receiver.
#[cfg(unix)]
fn read_loop(tx: &mpsc::Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::os::unix::io::AsRawFd;

    let fd = io::stdin().as_raw_fd();
    let mut buf = [0u8; READ_BUF_SIZE];

    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
        };

        // Timeout or EINTR: recheck the stop flag.
        if ready <= 0 {
            continue;
        }

        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n <= 0 {
            break;
        }

        #[allow(clippy::cast_sign_loss)] // n > 0 checked above.
        let chunk = buf[..n as usize].to_vec();

        if tx.send(chunk).is_err() {
            break;
        }
    }
}

/// Non-unix fallback: plain blocking reads. Shutdown may lag until the
/// next byte arrives.
#[cfg(not(unix))]
fn read_loop(tx: &mpsc::Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::io::Read;

    let stdin = std::io::stdin();
    let mut buf = [0u8; READ_BUF_SIZE];

    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        match stdin.lock().read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
