//! A single document line and its display-column cache.
//!
//! A [`Line`] owns its content (never containing a line break) plus a column
//! table mapping each character offset to the display column where that
//! character starts. The table makes offset-to-column lookup O(1) and
//! column-to-offset lookup a binary search, which is what cursor motion and
//! painting lean on. It is rebuilt after every mutation; lines are short
//! enough that recomputing beats patching.
//!
//! Column rule: a tab advances to the next multiple of [`TAB_STOP`], every
//! other character advances by one column.

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// Width of a tab stop, in columns.
pub const TAB_STOP: usize = 8;

/// One line of document text plus its column table.
///
/// `columns[i]` is the display column of character `i`; `columns[len]` is the
/// total display width. The table is strictly increasing, so every display
/// column maps back to exactly one character cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    text: String,
    columns: Vec<usize>,
}

impl Line {
    /// Create a line from content. The content must not contain `'\n'`;
    /// callers split text into lines before constructing.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        debug_assert!(!text.contains('\n'), "Line content must not contain a line break");
        let mut line = Self {
            text,
            columns: Vec::new(),
        };
        line.rebuild_columns();
        line
    }

    /// The line's content, without any line break.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters (Unicode scalar values) in the line.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len() - 1
    }

    /// True when the line holds no characters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Total display width of the line after tab expansion.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns[self.len()]
    }

    /// Display column where the character at `offset` starts. `offset == len`
    /// yields the line's total width (the append column). Out-of-range
    /// offsets clamp to the end.
    #[must_use]
    pub fn column(&self, offset: usize) -> usize {
        self.columns[offset.min(self.len())]
    }

    /// Character offset of the cell containing display column `col`.
    ///
    /// Columns inside a tab's expansion map to the tab itself. Columns at or
    /// past the line's width clamp to `len` (the append offset). This is the
    /// inverse cursor motion needs when carrying a remembered column onto a
    /// line with different tabbing.
    #[must_use]
    pub fn offset_at(&self, col: usize) -> usize {
        // The table is strictly increasing, so the last entry <= col names
        // the cell that covers col.
        self.columns.partition_point(|&c| c <= col) - 1
    }

    /// Content between two character offsets, as a string slice.
    #[must_use]
    pub fn span(&self, from: usize, to: usize) -> &str {
        let from = from.min(self.len());
        let to = to.clamp(from, self.len());
        &self.text[self.byte_index(from)..self.byte_index(to)]
    }

    /// First match of `needle` at or after character offset `from`, as a
    /// character offset. Empty needles never match.
    #[must_use]
    pub fn find(&self, needle: &str, from: usize) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let start = self.byte_index(from.min(self.len()));
        let hit = self.text[start..].find(needle)?;
        Some(self.text[..start + hit].chars().count())
    }

    /// Insert text (no line breaks) at a character offset. Out-of-range
    /// offsets clamp to the end.
    pub fn insert(&mut self, offset: usize, text: &str) {
        debug_assert!(!text.contains('\n'), "Line content must not contain a line break");
        let at = self.byte_index(offset.min(self.len()));
        self.text.insert_str(at, text);
        self.rebuild_columns();
    }

    /// Remove the characters in `[from, to)`.
    pub fn erase(&mut self, from: usize, to: usize) {
        let from = from.min(self.len());
        let to = to.clamp(from, self.len());
        let range = self.byte_index(from)..self.byte_index(to);
        self.text.drain(range);
        self.rebuild_columns();
    }

    /// Split at a character offset: this line keeps `[0, offset)`, the
    /// returned line takes the rest.
    #[must_use]
    pub fn split_off(&mut self, offset: usize) -> Self {
        let at = self.byte_index(offset.min(self.len()));
        let tail = self.text.split_off(at);
        self.rebuild_columns();
        Self::new(tail)
    }

    /// Append another line's content to this one (a line merge).
    pub fn append(&mut self, other: &Self) {
        self.text.push_str(&other.text);
        self.rebuild_columns();
    }

    fn rebuild_columns(&mut self) {
        self.columns.clear();
        self.columns.push(0);
        let mut col = 0;
        for ch in self.text.chars() {
            col = if ch == '\t' {
                (col / TAB_STOP + 1) * TAB_STOP
            } else {
                col + 1
            };
            self.columns.push(col);
        }
    }

    /// Byte index of the character at `offset`; `offset == len` maps to the
    /// end of the string.
    fn byte_index(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new(String::new())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
