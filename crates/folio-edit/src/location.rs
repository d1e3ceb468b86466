//! Logical and display coordinates.
//!
//! All coordinates are **0-indexed**. A [`Location`] addresses a character in
//! the document: line number plus character offset within that line. Offsets
//! count Unicode scalar values (chars), not bytes, so a `Location` survives
//! multi-byte text unchanged.
//!
//! A [`Position`] is a screen-space coordinate: row plus display column after
//! tab expansion. Positions are derived from Locations on demand (see
//! [`Line::column`](crate::line::Line::column)) and never stored, so the
//! cursor's logical place is unaffected by how wide its line happens to
//! render.
//!
//! Dialogs and the status line convert to 1-indexed for the user; that
//! conversion never belongs here.

use std::fmt;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A logical place in a document: (line, offset), both 0-indexed.
///
/// `offset` is the char offset from the start of the line, **not** a byte
/// offset and **not** a display column. For the line `"a\tb"`, offset 2 is
/// `'b'` even though it renders at column 8. Offset `len` (one past the last
/// character) is valid: it is where an append lands.
///
/// # Ordering
///
/// Locations are ordered lexicographically: line first, then offset. This is
/// what makes selections normalizable with a single comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: usize,
    pub offset: usize,
}

impl Location {
    /// The origin: line 0, offset 0.
    pub const ZERO: Self = Self { line: 0, offset: 0 };

    /// Create a new location.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }

    /// True when both line and offset are zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.line == 0 && self.offset == 0
    }
}

// Natural ordering: line first, then offset.
impl Ord for Location {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.offset.cmp(&other.offset))
    }
}

impl PartialOrd for Location {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loc({}:{})", self.line, self.offset)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for human display.
        write!(f, "{}:{}", self.line + 1, self.offset + 1)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A display-space coordinate: (row, col), both 0-indexed.
///
/// `col` is a screen column after tab expansion, so it generally differs from
/// the character offset on lines containing tabs. The view subtracts its
/// scroll offset from `row` to find the terminal row.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// The origin: row 0, column 0.
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
