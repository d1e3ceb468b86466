// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. The editor enables no optional
// terminal protocols, so the parser handles exactly what a plain
// terminal sends:
//
// - Control bytes (Ctrl+letter chords, Enter, Tab, Backspace)
// - Legacy CSI sequences (arrows, editing keys, xterm modifier params)
// - SS3 sequences (Home/End/arrows from application-keypad terminals)
// - Alt+key (ESC followed by a printable character)
// - UTF-8 multi-byte characters
//
// # Design
//
// Escape sequences can span multiple `read()` calls, so the parser
// keeps a small internal byte buffer. Feed bytes with
// [`Parser::advance`] and collect the returned events; after a timeout
// with no new bytes, call [`Parser::flush`] to emit a pending lone ESC
// as a real Escape keypress.

use bitflags::bitflags;

// ─── Event types ────────────────────────────────────────────────────────────

/// A keyboard event: key identity plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A plain, unmodified key press.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key press with modifiers.
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

/// Identity of a key. Printable characters use [`Char`](KeyCode::Char);
/// everything the editor binds has a named variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags, matching the xterm CSI modifier
    /// encoding (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental input parser.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte could be a standalone Escape keypress or the start
/// of a multi-byte sequence. The parser holds a lone ESC as pending;
/// the caller waits a short timeout and then calls
/// [`flush`](Parser::flush) to emit it as a real Escape key.
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes from stdin and return every complete key event.
    ///
    /// Bytes that form an incomplete sequence stay in the internal
    /// buffer and combine with future calls.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Flush pending bytes as literal key events. Called after a
    /// timeout to resolve the ESC ambiguity: a lone ESC becomes an
    /// Escape key event, any other leftovers become their literal keys.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for &byte in &self.buf {
            let event = match byte {
                0x1B => KeyEvent::plain(KeyCode::Escape),
                0x0D => KeyEvent::plain(KeyCode::Enter),
                0x09 => KeyEvent::plain(KeyCode::Tab),
                0x08 | 0x7F => KeyEvent::plain(KeyCode::Backspace),
                b @ 0x01..=0x1A => {
                    KeyEvent::with(KeyCode::Char((b + b'a' - 1) as char), Modifiers::CTRL)
                }
                b @ 0x20..=0x7E => KeyEvent::plain(KeyCode::Char(b as char)),
                _ => continue,
            };
            events.push(event);
        }
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless parsing functions ────────────────────────────────────────────
//
// All parse functions are pure: they read from the front of a slice and
// report what they found plus how many bytes to consume.

/// Result of trying to parse one event.
enum Parsed {
    /// Parsed an event, consuming `usize` bytes.
    Event(KeyEvent, usize),
    /// Sequence incomplete — need more bytes.
    Incomplete,
    /// Unrecognized byte(s), skip `usize` bytes.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        // ESC — escape sequence or standalone Escape key.
        0x1B => parse_escape(buf),
        // Enter is CR in raw mode. LF arrives only as Ctrl+J.
        0x0D => Parsed::Event(KeyEvent::plain(KeyCode::Enter), 1),
        0x09 => Parsed::Event(KeyEvent::plain(KeyCode::Tab), 1),
        0x08 | 0x7F => Parsed::Event(KeyEvent::plain(KeyCode::Backspace), 1),
        // Remaining control bytes are Ctrl+letter chords (Ctrl+J included).
        b @ 0x01..=0x1A => Parsed::Event(
            KeyEvent::with(KeyCode::Char((b + b'a' - 1) as char), Modifiers::CTRL),
            1,
        ),
        // ASCII printable.
        b @ 0x20..=0x7E => Parsed::Event(KeyEvent::plain(KeyCode::Char(b as char)), 1),
        // UTF-8 multi-byte lead.
        0xC0..=0xFF => parse_utf8(buf),
        // NUL or a bare continuation byte — not a key.
        _ => Parsed::Skip(1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        // CSI: ESC [
        b'[' => parse_csi(buf),
        // SS3: ESC O
        b'O' => parse_ss3(buf),
        // Alt+printable character.
        b @ 0x20..=0x7E => Parsed::Event(
            KeyEvent::with(KeyCode::Char(b as char), Modifiers::ALT),
            2,
        ),
        // Anything else after ESC: emit a standalone Escape.
        _ => Parsed::Event(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'[');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    // Scan for the final byte (0x40..=0x7E); parameter bytes are
    // 0x30..=0x3F, intermediates 0x20..=0x2F.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            // Invalid byte inside a CSI sequence — abort it.
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_csi_params(&buf[2..end]);
    let consumed = end + 1;

    // Tilde-terminated editing keys: CSI n [; mod] ~
    if final_byte == b'~' {
        let first = params.first().copied().unwrap_or(0);
        let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

        let code = match first {
            // Home/End arrive as 1/4 on xterm-likes and 7/8 on rxvt.
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => return Parsed::Skip(consumed),
        };
        return Parsed::Event(KeyEvent::with(code, modifiers), consumed);
    }

    // Letter finals: CSI [1; mod] letter. Shifted arrows arrive as
    // `CSI 1;2A` and friends.
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let event = match final_byte {
        b'A' => KeyEvent::with(KeyCode::Up, modifiers),
        b'B' => KeyEvent::with(KeyCode::Down, modifiers),
        b'C' => KeyEvent::with(KeyCode::Right, modifiers),
        b'D' => KeyEvent::with(KeyCode::Left, modifiers),
        b'H' => KeyEvent::with(KeyCode::Home, modifiers),
        b'F' => KeyEvent::with(KeyCode::End, modifiers),
        b'Z' => KeyEvent::with(KeyCode::Tab, Modifiers::SHIFT),
        _ => return Parsed::Skip(consumed),
    };

    Parsed::Event(event, consumed)
}

// ── SS3 (Single Shift 3) ────────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'O');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };

    Parsed::Event(KeyEvent::plain(code), 3)
}

// ── UTF-8 ───────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);

    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    // Continuation bytes must be 0b10xxxxxx.
    for &b in &buf[1..expected] {
        if b & 0xC0 != 0x80 {
            return Parsed::Skip(1);
        }
    }

    std::str::from_utf8(&buf[..expected]).map_or(Parsed::Skip(1), |s| {
        s.chars().next().map_or(Parsed::Skip(expected), |ch| {
            Parsed::Event(KeyEvent::plain(KeyCode::Char(ch)), expected)
        })
    })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Parse semicolon-separated numeric CSI parameters.
fn parse_csi_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }

    let mut params = Vec::with_capacity(2);
    let mut val: u16 = 0;
    for &b in raw {
        if b == b';' {
            params.push(val);
            val = 0;
        } else if b.is_ascii_digit() {
            val = val.saturating_mul(10).saturating_add(u16::from(b - b'0'));
        }
    }
    params.push(val);
    params
}

/// Decode an xterm CSI modifier parameter (`1 + bitmask`; 0 or 1 means
/// no modifiers). Only the low bits carry Shift/Alt/Ctrl.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Expected byte length of a UTF-8 character from its lead byte;
/// 0 for invalid leads.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8]) -> Vec<KeyEvent> {
        Parser::new().advance(data)
    }

    fn parse_one(data: &[u8]) -> KeyEvent {
        let events = parse(data);
        assert_eq!(events.len(), 1, "expected 1 event, got {events:?}");
        events[0]
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn key_mod(code: KeyCode, modifiers: Modifiers) -> KeyEvent {
        KeyEvent::with(code, modifiers)
    }

    // ── ASCII printable ─────────────────────────────────────────────────

    #[test]
    fn ascii_single_char() {
        assert_eq!(parse_one(b"a"), key(KeyCode::Char('a')));
    }

    #[test]
    fn ascii_run() {
        let events = parse(b"hi!");
        assert_eq!(
            events,
            vec![
                key(KeyCode::Char('h')),
                key(KeyCode::Char('i')),
                key(KeyCode::Char('!')),
            ]
        );
    }

    #[test]
    fn ascii_space_and_tilde() {
        assert_eq!(parse_one(b" "), key(KeyCode::Char(' ')));
        assert_eq!(parse_one(b"~"), key(KeyCode::Char('~')));
    }

    // ── Control bytes ───────────────────────────────────────────────────

    #[test]
    fn ctrl_letters() {
        assert_eq!(
            parse_one(b"\x13"),
            key_mod(KeyCode::Char('s'), Modifiers::CTRL)
        );
        assert_eq!(
            parse_one(b"\x18"),
            key_mod(KeyCode::Char('x'), Modifiers::CTRL)
        );
        assert_eq!(
            parse_one(b"\x06"),
            key_mod(KeyCode::Char('f'), Modifiers::CTRL)
        );
    }

    #[test]
    fn lf_is_ctrl_j_not_enter() {
        assert_eq!(
            parse_one(b"\x0a"),
            key_mod(KeyCode::Char('j'), Modifiers::CTRL)
        );
    }

    #[test]
    fn enter_is_cr() {
        assert_eq!(parse_one(b"\r"), key(KeyCode::Enter));
    }

    #[test]
    fn tab_byte() {
        assert_eq!(parse_one(b"\t"), key(KeyCode::Tab));
    }

    #[test]
    fn backspace_both_encodings() {
        assert_eq!(parse_one(b"\x08"), key(KeyCode::Backspace));
        assert_eq!(parse_one(b"\x7f"), key(KeyCode::Backspace));
    }

    // ── Arrows (CSI) ────────────────────────────────────────────────────

    #[test]
    fn plain_arrows() {
        assert_eq!(parse_one(b"\x1b[A"), key(KeyCode::Up));
        assert_eq!(parse_one(b"\x1b[B"), key(KeyCode::Down));
        assert_eq!(parse_one(b"\x1b[C"), key(KeyCode::Right));
        assert_eq!(parse_one(b"\x1b[D"), key(KeyCode::Left));
    }

    #[test]
    fn shifted_arrows() {
        assert_eq!(
            parse_one(b"\x1b[1;2A"),
            key_mod(KeyCode::Up, Modifiers::SHIFT)
        );
        assert_eq!(
            parse_one(b"\x1b[1;2B"),
            key_mod(KeyCode::Down, Modifiers::SHIFT)
        );
        assert_eq!(
            parse_one(b"\x1b[1;2C"),
            key_mod(KeyCode::Right, Modifiers::SHIFT)
        );
        assert_eq!(
            parse_one(b"\x1b[1;2D"),
            key_mod(KeyCode::Left, Modifiers::SHIFT)
        );
    }

    #[test]
    fn ctrl_and_alt_arrows() {
        assert_eq!(
            parse_one(b"\x1b[1;5C"),
            key_mod(KeyCode::Right, Modifiers::CTRL)
        );
        assert_eq!(
            parse_one(b"\x1b[1;3B"),
            key_mod(KeyCode::Down, Modifiers::ALT)
        );
        assert_eq!(
            parse_one(b"\x1b[1;4D"),
            key_mod(KeyCode::Left, Modifiers::SHIFT | Modifiers::ALT)
        );
    }

    // ── Home / End variants ─────────────────────────────────────────────

    #[test]
    fn home_end_letter_finals() {
        assert_eq!(parse_one(b"\x1b[H"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1b[F"), key(KeyCode::End));
    }

    #[test]
    fn home_end_tilde_variants() {
        assert_eq!(parse_one(b"\x1b[1~"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1b[7~"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1b[4~"), key(KeyCode::End));
        assert_eq!(parse_one(b"\x1b[8~"), key(KeyCode::End));
    }

    // ── Editing keys ────────────────────────────────────────────────────

    #[test]
    fn insert_delete() {
        assert_eq!(parse_one(b"\x1b[2~"), key(KeyCode::Insert));
        assert_eq!(parse_one(b"\x1b[3~"), key(KeyCode::Delete));
    }

    #[test]
    fn page_keys() {
        assert_eq!(parse_one(b"\x1b[5~"), key(KeyCode::PageUp));
        assert_eq!(parse_one(b"\x1b[6~"), key(KeyCode::PageDown));
    }

    #[test]
    fn modified_tilde_key() {
        assert_eq!(
            parse_one(b"\x1b[3;5~"),
            key_mod(KeyCode::Delete, Modifiers::CTRL)
        );
    }

    #[test]
    fn shift_tab() {
        assert_eq!(
            parse_one(b"\x1b[Z"),
            key_mod(KeyCode::Tab, Modifiers::SHIFT)
        );
    }

    // ── SS3 ─────────────────────────────────────────────────────────────

    #[test]
    fn ss3_arrows_and_home_end() {
        assert_eq!(parse_one(b"\x1bOA"), key(KeyCode::Up));
        assert_eq!(parse_one(b"\x1bOD"), key(KeyCode::Left));
        assert_eq!(parse_one(b"\x1bOH"), key(KeyCode::Home));
        assert_eq!(parse_one(b"\x1bOF"), key(KeyCode::End));
    }

    // ── Alt+char ────────────────────────────────────────────────────────

    #[test]
    fn alt_char() {
        assert_eq!(
            parse_one(b"\x1bx"),
            key_mod(KeyCode::Char('x'), Modifiers::ALT)
        );
    }

    // ── UTF-8 ───────────────────────────────────────────────────────────

    #[test]
    fn utf8_two_byte() {
        assert_eq!(parse_one("é".as_bytes()), key(KeyCode::Char('é')));
    }

    #[test]
    fn utf8_three_byte() {
        assert_eq!(parse_one("€".as_bytes()), key(KeyCode::Char('€')));
    }

    #[test]
    fn utf8_four_byte() {
        assert_eq!(parse_one("𝄞".as_bytes()), key(KeyCode::Char('𝄞')));
    }

    #[test]
    fn utf8_split_across_reads() {
        let bytes = "é".as_bytes();
        let mut parser = Parser::new();
        assert!(parser.advance(&bytes[..1]).is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.advance(&bytes[1..]), vec![key(KeyCode::Char('é'))]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn invalid_continuation_is_skipped() {
        // Lead byte followed by a non-continuation byte: drop the lead,
        // keep the following printable.
        let events = parse(b"\xC3a");
        assert_eq!(events, vec![key(KeyCode::Char('a'))]);
    }

    // ── Split sequences & the ESC ambiguity ─────────────────────────────

    #[test]
    fn csi_split_across_reads() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[").is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.advance(b"A"), vec![key(KeyCode::Up)]);
    }

    #[test]
    fn lone_esc_is_held_until_flush() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b").is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.flush(), vec![key(KeyCode::Escape)]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn esc_followed_by_text_is_alt() {
        // The bytes arrived together, so this is Alt+f, not Escape then f.
        assert_eq!(
            parse_one(b"\x1bf"),
            key_mod(KeyCode::Char('f'), Modifiers::ALT)
        );
    }

    #[test]
    fn flush_emits_leftover_control_bytes() {
        let mut parser = Parser::new();
        parser.advance(b"\x1b");
        parser.buf.push(0x13);
        let events = parser.flush();
        assert_eq!(
            events,
            vec![
                key(KeyCode::Escape),
                key_mod(KeyCode::Char('s'), Modifiers::CTRL),
            ]
        );
    }

    #[test]
    fn mixed_text_and_sequences() {
        let events = parse(b"ab\x1b[C!\r");
        assert_eq!(
            events,
            vec![
                key(KeyCode::Char('a')),
                key(KeyCode::Char('b')),
                key(KeyCode::Right),
                key(KeyCode::Char('!')),
                key(KeyCode::Enter),
            ]
        );
    }

    #[test]
    fn unknown_csi_is_skipped() {
        // CSI with an unhandled final byte parses to nothing but
        // consumes the whole sequence.
        let events = parse(b"\x1b[5Xq");
        assert_eq!(events, vec![key(KeyCode::Char('q'))]);
    }
}
