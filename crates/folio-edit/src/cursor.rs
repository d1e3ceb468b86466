//! Cursor: a document location plus a remembered display column.
//!
//! Lightweight value type. Does not own or reference the document; every
//! movement method takes `&Document` as a parameter and clamps itself to
//! real content, so a cursor left stale by an edit heals on its next move.
//!
//! # Remembered column
//!
//! Vertical movement keeps the column the user was at, as a *display*
//! column. Moving down through a short line and onward to a long one snaps
//! the cursor back out to the remembered column; because the memory is in
//! display space, a line indented with tabs and a line indented with spaces
//! put the cursor in the same screen place. Horizontal movement and direct
//! repositioning reset the memory to wherever the cursor lands.

use crate::document::Document;
use crate::location::{Location, Position};

/// A cursor in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Current location.
    loc: Location,

    /// Remembered display column for vertical movement. Horizontal movement
    /// resets it to the column of the new location.
    sticky_col: usize,
}

impl Cursor {
    /// Create a cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            loc: Location::ZERO,
            sticky_col: 0,
        }
    }

    // -- accessors -----------------------------------------------------------

    /// Current location.
    #[inline]
    #[must_use]
    pub const fn location(&self) -> Location {
        self.loc
    }

    /// The remembered display column vertical movement steers toward.
    #[inline]
    #[must_use]
    pub const fn sticky_col(&self) -> usize {
        self.sticky_col
    }

    /// Where the cursor renders: its line as the row, its display column
    /// after tab expansion. The view subtracts its scroll offset from `row`.
    #[must_use]
    pub fn position(&self, doc: &Document) -> Position {
        let at = doc.clamp(self.loc);
        let col = doc.line(at.line).map_or(0, |line| line.column(at.offset));
        Position::new(at.line, col)
    }

    // -- movement ------------------------------------------------------------

    /// Jump to an exact location, clamped to the document. Resets the
    /// remembered column.
    pub fn move_to(&mut self, loc: Location, doc: &Document) {
        self.loc = doc.clamp(loc);
        self.reset_sticky(doc);
    }

    /// Move up `count` lines, steering toward the remembered column.
    pub fn up(&mut self, count: usize, doc: &Document) {
        let at = doc.clamp(self.loc);
        self.vertical(at.line.saturating_sub(count), doc);
    }

    /// Move down `count` lines, steering toward the remembered column.
    pub fn down(&mut self, count: usize, doc: &Document) {
        let at = doc.clamp(self.loc);
        self.vertical((at.line + count).min(doc.maxline()), doc);
    }

    /// Move one character left, wrapping to the end of the previous line.
    /// No-op at the very start of the document. Resets the remembered column.
    pub fn left(&mut self, doc: &Document) {
        let at = doc.clamp(self.loc);
        self.loc = if at.offset > 0 {
            Location::new(at.line, at.offset - 1)
        } else if at.line > 0 {
            doc.end_of_line(at.line - 1)
        } else {
            at
        };
        self.reset_sticky(doc);
    }

    /// Move one character right, wrapping to the start of the next line.
    /// No-op at the very end of the document. Resets the remembered column.
    pub fn right(&mut self, doc: &Document) {
        let at = doc.clamp(self.loc);
        self.loc = doc.next(at);
        self.reset_sticky(doc);
    }

    /// Move to the start of the current line.
    pub const fn home(&mut self) {
        self.loc.offset = 0;
        self.sticky_col = 0;
    }

    /// Move past the last character of the current line.
    pub fn end_of_line(&mut self, doc: &Document) {
        let at = doc.clamp(self.loc);
        self.loc = doc.end_of_line(at.line);
        self.reset_sticky(doc);
    }

    // -- helpers -------------------------------------------------------------

    /// Land on `line`, resolving the offset from the remembered display
    /// column. The memory itself is preserved so a run of vertical moves
    /// keeps steering toward the same screen column.
    fn vertical(&mut self, line: usize, doc: &Document) {
        let offset = doc
            .line(line)
            .map_or(0, |l| l.offset_at(self.sticky_col));
        self.loc = Location::new(line, offset);
    }

    fn reset_sticky(&mut self, doc: &Document) {
        self.sticky_col = doc
            .line(self.loc.line)
            .map_or(0, |line| line.column(self.loc.offset));
    }
}

impl Default for Cursor {
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

    fn loc(line: usize, offset: usize) -> Location {
        Location::new(line, offset)
    }

    // Lines of varying length; line 3 is empty.
    fn sample() -> Document {
        Document::from_text("alpha beta\nhi\ngamma delta\n\nomega\n")
    }

    fn cursor_at(line: usize, offset: usize, doc: &Document) -> Cursor {
        let mut c = Cursor::new();
        c.move_to(loc(line, offset), doc);
        c
    }

    // -- construction & position ---------------------------------------------

    #[test]
    fn new_at_origin() {
        let c = Cursor::new();
        assert_eq!(c.location(), Location::ZERO);
        assert_eq!(c.sticky_col(), 0);
    }

    #[test]
    fn move_to_clamps() {
        let doc = sample();
        let mut c = Cursor::new();
        c.move_to(loc(99, 99), &doc);
        assert_eq!(c.location(), loc(4, 5));
    }

    #[test]
    fn move_to_resets_sticky() {
        let doc = sample();
        let mut c = cursor_at(0, 8, &doc);
        assert_eq!(c.sticky_col(), 8);
        c.move_to(loc(2, 3), &doc);
        assert_eq!(c.sticky_col(), 3);
    }

    #[test]
    fn position_matches_offset_without_tabs() {
        let doc = sample();
        let c = cursor_at(2, 4, &doc);
        assert_eq!(c.position(&doc), Position::new(2, 4));
    }

    #[test]
    fn position_expands_tabs() {
        let doc = Document::from_text("a\tb\n");
        let c = cursor_at(0, 2, &doc);
        assert_eq!(c.position(&doc), Position::new(0, 8));
    }

    // -- vertical movement ---------------------------------------------------

    #[test]
    fn down_steps_one_line() {
        let doc = sample();
        let mut c = cursor_at(0, 1, &doc);
        c.down(1, &doc);
        assert_eq!(c.location(), loc(1, 1));
    }

    #[test]
    fn up_stops_at_first_line() {
        let doc = sample();
        let mut c = cursor_at(1, 0, &doc);
        c.up(99, &doc);
        assert_eq!(c.location().line, 0);
    }

    #[test]
    fn down_stops_at_last_line() {
        let doc = sample();
        let mut c = cursor_at(0, 0, &doc);
        c.down(99, &doc);
        assert_eq!(c.location().line, 4);
    }

    #[test]
    fn sticky_col_survives_short_line() {
        let doc = sample();
        let mut c = cursor_at(0, 8, &doc);

        c.down(1, &doc); // "hi" only reaches offset 2
        assert_eq!(c.location(), loc(1, 2));
        assert_eq!(c.sticky_col(), 8);

        c.down(1, &doc); // "gamma delta" is long enough again
        assert_eq!(c.location(), loc(2, 8));
    }

    #[test]
    fn sticky_col_survives_empty_line() {
        let doc = sample();
        let mut c = cursor_at(2, 5, &doc);
        c.down(1, &doc);
        assert_eq!(c.location(), loc(3, 0));
        c.down(1, &doc);
        assert_eq!(c.location(), loc(4, 5));
    }

    #[test]
    fn sticky_col_is_a_display_column() {
        // Offset 2 on "a\tb" renders at column 8; the plain line below
        // should receive the cursor at offset 8, not offset 2.
        let doc = Document::from_text("a\tb\nabcdefghij\n");
        let mut c = cursor_at(0, 2, &doc);
        assert_eq!(c.sticky_col(), 8);

        c.down(1, &doc);
        assert_eq!(c.location(), loc(1, 8));

        c.up(1, &doc);
        assert_eq!(c.location(), loc(0, 2));
    }

    #[test]
    fn vertical_inside_tab_lands_on_the_tab() {
        let doc = Document::from_text("abcdefghij\nx\ty\n");
        let mut c = cursor_at(0, 4, &doc);
        c.down(1, &doc);
        // Column 4 falls inside the tab's expansion.
        assert_eq!(c.location(), loc(1, 1));
    }

    #[test]
    fn horizontal_movement_resets_sticky() {
        let doc = sample();
        let mut c = cursor_at(0, 8, &doc);
        c.left(&doc);
        assert_eq!(c.sticky_col(), 7);
        c.down(1, &doc);
        assert_eq!(c.location(), loc(1, 2)); // "hi" clamps
        c.down(1, &doc);
        assert_eq!(c.location(), loc(2, 7));
    }

    // -- horizontal movement -------------------------------------------------

    #[test]
    fn left_within_line() {
        let doc = sample();
        let mut c = cursor_at(0, 3, &doc);
        c.left(&doc);
        assert_eq!(c.location(), loc(0, 2));
    }

    #[test]
    fn left_wraps_to_previous_line_end() {
        let doc = sample();
        let mut c = cursor_at(1, 0, &doc);
        c.left(&doc);
        assert_eq!(c.location(), loc(0, 10));
    }

    #[test]
    fn left_at_document_start_stays() {
        let doc = sample();
        let mut c = cursor_at(0, 0, &doc);
        c.left(&doc);
        assert_eq!(c.location(), loc(0, 0));
    }

    #[test]
    fn right_within_line() {
        let doc = sample();
        let mut c = cursor_at(0, 3, &doc);
        c.right(&doc);
        assert_eq!(c.location(), loc(0, 4));
    }

    #[test]
    fn right_wraps_to_next_line_start() {
        let doc = sample();
        let mut c = cursor_at(0, 10, &doc);
        c.right(&doc);
        assert_eq!(c.location(), loc(1, 0));
    }

    #[test]
    fn right_at_document_end_stays() {
        let doc = sample();
        let mut c = cursor_at(4, 5, &doc);
        c.right(&doc);
        assert_eq!(c.location(), loc(4, 5));
    }

    // -- line start/end ------------------------------------------------------

    #[test]
    fn home_goes_to_offset_zero() {
        let doc = sample();
        let mut c = cursor_at(2, 6, &doc);
        c.home();
        assert_eq!(c.location(), loc(2, 0));
        assert_eq!(c.sticky_col(), 0);
    }

    #[test]
    fn end_of_line_goes_past_last_char() {
        let doc = sample();
        let mut c = cursor_at(2, 1, &doc);
        c.end_of_line(&doc);
        assert_eq!(c.location(), loc(2, 11));
        assert_eq!(c.sticky_col(), 11);
    }

    // -- stale cursor healing ------------------------------------------------

    #[test]
    fn movement_heals_a_stale_location() {
        let mut doc = Document::from_text("one\ntwo\nthree\n");
        let mut c = cursor_at(2, 3, &doc);
        // Erase the last two lines out from under the cursor.
        doc.erase(&crate::selection::Selection::ordered(loc(0, 3), loc(2, 5)));
        c.right(&doc);
        assert_eq!(c.location(), doc.clamp(c.location()));
    }
}
