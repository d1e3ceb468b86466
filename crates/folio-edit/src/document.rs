//! The document: a line arena plus everything that edits it.
//!
//! Storage is a plain `Vec<Line>`, one entry per logical line, never empty
//! (a blank document holds one empty line). Line numbers are the vector
//! indices, so inserting or removing a line renumbers everything below it;
//! callers that cache line numbers re-clamp through [`Document::clamp`] or
//! hear about the shift via the returned [`Location`]s. This trades
//! worst-case asymptotics for simplicity; typical source files are far too
//! small for the difference to matter.
//!
//! Out-of-range locations are legal inputs everywhere and clamp to real
//! content. The only operation that can fail is [`Document::write`], and a
//! failed write leaves both the text and the modified flag exactly as they
//! were.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::line::Line;
use crate::location::Location;
use crate::selection::Selection;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An in-memory text document.
#[derive(Debug)]
pub struct Document {
    lines: Vec<Line>,
    path: Option<PathBuf>,
    modified: bool,
    /// Did the file end with a newline? Captured at load, reapplied on
    /// write, so saving an untouched file is byte-identical.
    trailing_newline: bool,
}

impl Document {
    /// An untitled document: one empty line, nothing modified.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![Line::default()],
            path: None,
            modified: false,
            trailing_newline: true,
        }
    }

    /// Build a document from raw text. Accepts `\n` and `\r\n` breaks;
    /// content is stored without them.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<Line> = text
            .split('\n')
            .map(|l| Line::new(l.strip_suffix('\r').unwrap_or(l)))
            .collect();
        // split() yields one trailing empty slice when the text ends with a
        // break; that slice is the newline convention, not a content line.
        if text.ends_with('\n') {
            lines.pop();
        }
        if lines.is_empty() {
            lines.push(Line::default());
        }
        Self {
            lines,
            path: None,
            modified: false,
            trailing_newline: text.is_empty() || text.ends_with('\n'),
        }
    }

    /// Load a document from disk. A file that does not exist yet yields an
    /// empty document already bound to that path, so editing a new file
    /// works without ceremony. Any other I/O failure propagates.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the file exists but cannot be read.
    pub fn load(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(text) => {
                let mut doc = Self::from_text(&text);
                doc.path = Some(path);
                Ok(doc)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let mut doc = Self::new();
                doc.path = Some(path);
                Ok(doc)
            }
            Err(err) => Err(err),
        }
    }

    // -- accessors -----------------------------------------------------------

    /// The path this document was loaded from or last written to.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Has the document changed since it was loaded or last written?
    #[inline]
    #[must_use]
    pub const fn modified(&self) -> bool {
        self.modified
    }

    /// Index of the last line. At least one line always exists, so this is
    /// the line count minus one.
    #[inline]
    #[must_use]
    pub fn maxline(&self) -> usize {
        self.lines.len() - 1
    }

    /// The line at `index`, or `None` past the end of the document.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Human-readable summary for the title bar: line count plus a
    /// modification marker.
    #[must_use]
    pub fn status(&self) -> String {
        let count = self.lines.len();
        let mut status = if count == 1 {
            String::from("1 line")
        } else {
            format!("{count} lines")
        };
        if self.modified {
            status.push_str(" (modified)");
        }
        status
    }

    // -- coordinates ---------------------------------------------------------

    /// Pull an arbitrary location onto real content: line clamps to the last
    /// line, offset clamps to that line's length.
    #[must_use]
    pub fn clamp(&self, loc: Location) -> Location {
        let line = loc.line.min(self.maxline());
        let offset = loc.offset.min(self.lines[line].len());
        Location::new(line, offset)
    }

    /// Start of the given line, clamped to the document.
    #[must_use]
    pub fn home(&self, line: usize) -> Location {
        Location::new(line.min(self.maxline()), 0)
    }

    /// One past the last character of the document. Also serves as the
    /// "no such location" sentinel returned by [`Document::find`].
    #[must_use]
    pub fn end(&self) -> Location {
        Location::new(self.maxline(), self.lines[self.maxline()].len())
    }

    /// One past the last character of the given line, clamped.
    #[must_use]
    pub fn end_of_line(&self, line: usize) -> Location {
        let line = line.min(self.maxline());
        Location::new(line, self.lines[line].len())
    }

    /// The location one character after `loc`, crossing line boundaries.
    /// Saturates at [`Document::end`].
    #[must_use]
    pub fn next(&self, loc: Location) -> Location {
        let at = self.clamp(loc);
        if at.offset < self.lines[at.line].len() {
            Location::new(at.line, at.offset + 1)
        } else if at.line < self.maxline() {
            Location::new(at.line + 1, 0)
        } else {
            at
        }
    }

    // -- queries -------------------------------------------------------------

    /// First occurrence of `needle` at or after `from`, scanning line by
    /// line. Returns [`Document::end`] when there is no match at all; the
    /// wraparound policy lives with the caller. Empty needles never match.
    #[must_use]
    pub fn find(&self, needle: &str, from: Location) -> Location {
        if needle.is_empty() {
            return self.end();
        }
        let from = self.clamp(from);
        if let Some(offset) = self.lines[from.line].find(needle, from.offset) {
            return Location::new(from.line, offset);
        }
        for (index, line) in self.lines.iter().enumerate().skip(from.line + 1) {
            if let Some(offset) = line.find(needle, 0) {
                return Location::new(index, offset);
            }
        }
        self.end()
    }

    /// The text covered by a selection, with `'\n'` at each line boundary.
    #[must_use]
    pub fn text(&self, sel: &Selection) -> String {
        let begin = self.clamp(sel.begin());
        let end = self.clamp(sel.end());
        if begin.line == end.line {
            return self.lines[begin.line].span(begin.offset, end.offset).to_string();
        }
        let mut out = String::from(self.lines[begin.line].span(begin.offset, usize::MAX));
        for line in &self.lines[begin.line + 1..end.line] {
            out.push('\n');
            out.push_str(line.text());
        }
        out.push('\n');
        out.push_str(self.lines[end.line].span(0, end.offset));
        out
    }

    // -- edits ---------------------------------------------------------------

    /// Insert text at a location, splitting across new lines wherever the
    /// text contains `'\n'`. Returns the location just past the insertion,
    /// which is where the cursor belongs afterwards. Inserting nothing
    /// changes nothing, including the modified flag.
    pub fn insert(&mut self, loc: Location, text: &str) -> Location {
        let at = self.clamp(loc);
        if text.is_empty() {
            return at;
        }
        if !text.contains('\n') {
            self.lines[at.line].insert(at.offset, text);
            self.modified = true;
            return Location::new(at.line, at.offset + text.chars().count());
        }
        let tail = self.lines[at.line].split_off(at.offset);
        let mut line = at.line;
        for (i, part) in text.split('\n').enumerate() {
            if i == 0 {
                self.lines[line].insert(at.offset, part);
            } else {
                line += 1;
                self.lines.insert(line, Line::new(part));
            }
        }
        let end = Location::new(line, self.lines[line].len());
        self.lines[line].append(&tail);
        self.modified = true;
        end
    }

    /// Single-character insert, the keystroke fast path. A `'\n'` routes
    /// through [`Document::split`].
    pub fn insert_char(&mut self, loc: Location, ch: char) -> Location {
        if ch == '\n' {
            return self.split(loc);
        }
        let at = self.clamp(loc);
        let mut buf = [0u8; 4];
        self.lines[at.line].insert(at.offset, ch.encode_utf8(&mut buf));
        self.modified = true;
        Location::new(at.line, at.offset + 1)
    }

    /// Break the line at `loc`. The text after the cursor moves onto a new
    /// line below; returns the start of that new line. Whether the cursor
    /// follows is the caller's decision.
    pub fn split(&mut self, loc: Location) -> Location {
        let at = self.clamp(loc);
        let tail = self.lines[at.line].split_off(at.offset);
        self.lines.insert(at.line + 1, tail);
        self.modified = true;
        Location::new(at.line + 1, 0)
    }

    /// Remove the selected span, merging the boundary lines when the span
    /// crosses line breaks. Returns the span's begin location, where the
    /// cursor belongs afterwards. An empty selection is a no-op and leaves
    /// the modified flag alone.
    pub fn erase(&mut self, sel: &Selection) -> Location {
        let begin = self.clamp(sel.begin());
        let end = self.clamp(sel.end());
        if begin == end {
            return begin;
        }
        if begin.line == end.line {
            self.lines[begin.line].erase(begin.offset, end.offset);
        } else {
            let tail = self.lines.drain(begin.line + 1..=end.line).next_back();
            let first = &mut self.lines[begin.line];
            let len = first.len();
            first.erase(begin.offset, len);
            if let Some(mut tail) = tail {
                tail.erase(0, end.offset);
                first.append(&tail);
            }
        }
        self.modified = true;
        begin
    }

    // -- persistence ---------------------------------------------------------

    /// Write the document to `path`: lines joined with `'\n'`, the trailing
    /// newline following the loaded convention. On success the document
    /// remembers the path and clears its modified flag. On failure nothing
    /// in memory changes and [`Document::modified`] still reports true.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the file cannot be written.
    pub fn write(&mut self, path: &Path) -> io::Result<()> {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line.text());
        }
        if self.trailing_newline {
            out.push('\n');
        }
        fs::write(path, out)?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn loc(line: usize, offset: usize) -> Location {
        Location::new(line, offset)
    }

    fn sel(a: (usize, usize), b: (usize, usize)) -> Selection {
        Selection::ordered(loc(a.0, a.1), loc(b.0, b.1))
    }

    fn lines(doc: &Document) -> Vec<&str> {
        (0..=doc.maxline())
            .map(|i| doc.line(i).map_or("", Line::text))
            .collect()
    }

    fn tmp(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("folio_edit_doc_{name}"))
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_document_has_one_empty_line() {
        let doc = Document::new();
        assert_eq!(doc.maxline(), 0);
        assert!(!doc.modified());
        assert!(doc.path().is_none());
        assert_eq!(doc.line(0).map(Line::text), Some(""));
        assert!(doc.line(1).is_none());
    }

    #[test]
    fn from_text_splits_lines() {
        let doc = Document::from_text("alpha\nbeta\ngamma\n");
        assert_eq!(lines(&doc), vec!["alpha", "beta", "gamma"]);
        assert_eq!(doc.maxline(), 2);
    }

    #[test]
    fn from_text_without_trailing_newline() {
        let doc = Document::from_text("alpha\nbeta");
        assert_eq!(lines(&doc), vec!["alpha", "beta"]);
    }

    #[test]
    fn from_text_strips_carriage_returns() {
        let doc = Document::from_text("alpha\r\nbeta\r\n");
        assert_eq!(lines(&doc), vec!["alpha", "beta"]);
    }

    #[test]
    fn from_text_empty_is_one_blank_line() {
        let doc = Document::from_text("");
        assert_eq!(lines(&doc), vec![""]);
    }

    // -- coordinates ---------------------------------------------------------

    #[test]
    fn home_clamps_line() {
        let doc = Document::from_text("ab\ncd\n");
        assert_eq!(doc.home(1), loc(1, 0));
        assert_eq!(doc.home(99), loc(1, 0));
    }

    #[test]
    fn end_is_past_last_char() {
        let doc = Document::from_text("ab\ncde\n");
        assert_eq!(doc.end(), loc(1, 3));
    }

    #[test]
    fn end_of_line_clamps() {
        let doc = Document::from_text("ab\ncde\n");
        assert_eq!(doc.end_of_line(0), loc(0, 2));
        assert_eq!(doc.end_of_line(42), loc(1, 3));
    }

    #[test]
    fn clamp_pulls_into_content() {
        let doc = Document::from_text("ab\ncde\n");
        assert_eq!(doc.clamp(loc(0, 99)), loc(0, 2));
        assert_eq!(doc.clamp(loc(99, 99)), loc(1, 3));
        assert_eq!(doc.clamp(loc(1, 1)), loc(1, 1));
    }

    #[test]
    fn next_steps_through_and_across_lines() {
        let doc = Document::from_text("ab\nc\n");
        assert_eq!(doc.next(loc(0, 0)), loc(0, 1));
        assert_eq!(doc.next(loc(0, 2)), loc(1, 0));
        assert_eq!(doc.next(loc(1, 1)), loc(1, 1)); // saturates at end
        assert_eq!(doc.next(doc.end()), doc.end());
    }

    // -- insert --------------------------------------------------------------

    #[test]
    fn insert_within_line() {
        let mut doc = Document::from_text("helo\n");
        let after = doc.insert(loc(0, 3), "l");
        assert_eq!(lines(&doc), vec!["hello"]);
        assert_eq!(after, loc(0, 4));
        assert!(doc.modified());
    }

    #[test]
    fn insert_empty_is_a_no_op() {
        let mut doc = Document::from_text("ab\n");
        let after = doc.insert(loc(0, 1), "");
        assert_eq!(after, loc(0, 1));
        assert!(!doc.modified());
    }

    #[test]
    fn insert_clamps_location() {
        let mut doc = Document::from_text("ab\n");
        let after = doc.insert(loc(9, 9), "!");
        assert_eq!(lines(&doc), vec!["ab!"]);
        assert_eq!(after, loc(0, 3));
    }

    #[test]
    fn insert_multiline_splits() {
        let mut doc = Document::from_text("one two\n");
        let after = doc.insert(loc(0, 4), "X\nY\nZ");
        assert_eq!(lines(&doc), vec!["one X", "Y", "Ztwo"]);
        assert_eq!(after, loc(2, 1));
    }

    #[test]
    fn insert_newline_only() {
        let mut doc = Document::from_text("abcd\n");
        let after = doc.insert(loc(0, 2), "\n");
        assert_eq!(lines(&doc), vec!["ab", "cd"]);
        assert_eq!(after, loc(1, 0));
    }

    #[test]
    fn insert_multibyte_counts_chars() {
        let mut doc = Document::from_text("ab\n");
        let after = doc.insert(loc(0, 1), "éé");
        assert_eq!(lines(&doc), vec!["aééb"]);
        assert_eq!(after, loc(0, 3));
    }

    #[test]
    fn insert_char_advances_one() {
        let mut doc = Document::new();
        let after = doc.insert_char(loc(0, 0), 'x');
        assert_eq!(after, loc(0, 1));
        assert_eq!(lines(&doc), vec!["x"]);
        assert!(doc.modified());
    }

    #[test]
    fn insert_char_newline_splits() {
        let mut doc = Document::from_text("ab\n");
        let after = doc.insert_char(loc(0, 1), '\n');
        assert_eq!(lines(&doc), vec!["a", "b"]);
        assert_eq!(after, loc(1, 0));
    }

    // -- split ---------------------------------------------------------------

    #[test]
    fn split_breaks_line() {
        let mut doc = Document::from_text("hello\n");
        let new_line = doc.split(loc(0, 2));
        assert_eq!(lines(&doc), vec!["he", "llo"]);
        assert_eq!(new_line, loc(1, 0));
        assert!(doc.modified());
    }

    #[test]
    fn split_at_line_end_makes_empty_line() {
        let mut doc = Document::from_text("ab\n");
        doc.split(loc(0, 2));
        assert_eq!(lines(&doc), vec!["ab", ""]);
    }

    // -- erase ---------------------------------------------------------------

    #[test]
    fn erase_within_line() {
        let mut doc = Document::from_text("hello\n");
        let after = doc.erase(&sel((0, 1), (0, 4)));
        assert_eq!(lines(&doc), vec!["ho"]);
        assert_eq!(after, loc(0, 1));
        assert!(doc.modified());
    }

    #[test]
    fn erase_across_lines_merges() {
        let mut doc = Document::from_text("one\ntwo\nthree\n");
        let after = doc.erase(&sel((0, 2), (2, 3)));
        assert_eq!(lines(&doc), vec!["onee"]);
        assert_eq!(after, loc(0, 2));
    }

    #[test]
    fn erase_joins_adjacent_lines() {
        let mut doc = Document::from_text("ab\ncd\n");
        doc.erase(&sel((0, 2), (1, 0)));
        assert_eq!(lines(&doc), vec!["abcd"]);
    }

    #[test]
    fn erase_empty_preserves_clean_flag() {
        let mut doc = Document::from_text("ab\n");
        let after = doc.erase(&Selection::point(loc(0, 1)));
        assert_eq!(after, loc(0, 1));
        assert!(!doc.modified());
    }

    #[test]
    fn erase_empty_preserves_modified_flag() {
        let mut doc = Document::from_text("ab\n");
        doc.insert_char(loc(0, 0), 'x');
        assert!(doc.modified());
        doc.erase(&Selection::point(loc(0, 1)));
        assert!(doc.modified());
    }

    #[test]
    fn insert_then_erase_restores_text() {
        let mut doc = Document::from_text("hello world\n");
        let before = loc(0, 5);
        let after = doc.insert(before, "XYZ");
        doc.erase(&Selection::ordered(before, after));
        assert_eq!(lines(&doc), vec!["hello world"]);
    }

    // -- text ----------------------------------------------------------------

    #[test]
    fn text_single_line() {
        let doc = Document::from_text("hello\n");
        assert_eq!(doc.text(&sel((0, 1), (0, 4))), "ell");
    }

    #[test]
    fn text_multi_line() {
        let doc = Document::from_text("one\ntwo\nthree\n");
        assert_eq!(doc.text(&sel((0, 2), (2, 3))), "e\ntwo\nthr");
    }

    #[test]
    fn text_across_boundary_only() {
        let doc = Document::from_text("ab\ncd\n");
        assert_eq!(doc.text(&sel((0, 2), (1, 0))), "\n");
    }

    #[test]
    fn text_empty_selection() {
        let doc = Document::from_text("ab\n");
        assert_eq!(doc.text(&Selection::point(loc(0, 1))), "");
    }

    // -- find ----------------------------------------------------------------

    #[test]
    fn find_scans_forward_from_location() {
        let doc = Document::from_text("abcabc\n");
        assert_eq!(doc.find("abc", loc(0, 0)), loc(0, 0));
        assert_eq!(doc.find("abc", loc(0, 1)), loc(0, 3));
        assert_eq!(doc.find("abc", loc(0, 4)), doc.end());
    }

    #[test]
    fn find_crosses_lines() {
        let doc = Document::from_text("one\ntwo\nthree\n");
        assert_eq!(doc.find("th", loc(0, 0)), loc(2, 0));
        assert_eq!(doc.find("e", loc(0, 3)), loc(2, 3));
    }

    #[test]
    fn find_miss_returns_end() {
        let doc = Document::from_text("abc\n");
        assert_eq!(doc.find("zzz", loc(0, 0)), doc.end());
    }

    #[test]
    fn find_empty_needle_returns_end() {
        let doc = Document::from_text("abc\n");
        assert_eq!(doc.find("", loc(0, 0)), doc.end());
    }

    // -- status --------------------------------------------------------------

    #[test]
    fn status_counts_lines() {
        assert_eq!(Document::new().status(), "1 line");
        assert_eq!(Document::from_text("a\nb\nc\n").status(), "3 lines");
    }

    #[test]
    fn status_reports_modification() {
        let mut doc = Document::from_text("a\nb\n");
        doc.insert_char(loc(0, 0), 'x');
        assert_eq!(doc.status(), "2 lines (modified)");
    }

    // -- persistence ---------------------------------------------------------

    #[test]
    fn load_missing_file_yields_empty_document() {
        let path = tmp("load_missing");
        let _ = fs::remove_file(&path);
        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.maxline(), 0);
        assert_eq!(doc.path(), Some(path.as_path()));
        assert!(!doc.modified());
    }

    #[test]
    fn write_then_load_round_trips() {
        let path = tmp("round_trip");
        let mut doc = Document::from_text("alpha\nbeta\n");
        doc.insert(loc(1, 4), "!");
        doc.write(&path).unwrap();
        assert!(!doc.modified());
        assert_eq!(doc.path(), Some(path.as_path()));

        let loaded = Document::load(&path).unwrap();
        assert_eq!(lines(&loaded), lines(&doc));
        assert!(!loaded.modified());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn write_preserves_trailing_newline_convention() {
        let path = tmp("no_trailing");
        let mut doc = Document::from_text("alpha\nbeta");
        doc.write(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "alpha\nbeta");

        let mut doc = Document::from_text("alpha\nbeta\n");
        doc.write(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "alpha\nbeta\n");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn failed_write_keeps_document_modified() {
        let path = tmp("missing_dir").join("nested").join("f.txt");
        let mut doc = Document::from_text("ab\n");
        doc.insert_char(loc(0, 0), 'x');
        assert!(doc.write(&path).is_err());
        assert!(doc.modified());
        assert!(doc.path().is_none());
    }
}
