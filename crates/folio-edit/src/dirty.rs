//! Dirty-line tracking for the repaint path.
//!
//! The editor never repaints the whole screen on a keystroke. Every mutation
//! reports the document lines it touched here, the painter asks
//! [`DirtyLines::is_dirty`] per visible row, and [`DirtyLines::reset`] runs
//! once after a completed paint. Between resets the tracked region only ever
//! widens, so overlapping edits within one cycle cannot lose rows.
//!
//! Three shapes cover every mutation cheaply: a contiguous line range for
//! edits that stay within existing lines, "this line and everything below"
//! for edits that renumber subsequent lines, and "everything" for scrolling
//! and resizes.

use crate::location::Location;
use crate::selection::Selection;

// ---------------------------------------------------------------------------
// DirtyLines
// ---------------------------------------------------------------------------

/// Accumulated repaint region, in document line numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirtyLines {
    /// Nothing to repaint.
    #[default]
    Clean,
    /// Repaint every visible row.
    All,
    /// Repaint this line and every line below it. Used when an edit shifts
    /// subsequent line numbers (split, multi-line insert or erase).
    Forward(usize),
    /// Repaint the inclusive line range. Used for edits and selection
    /// changes confined to known lines.
    Range(usize, usize),
}

impl DirtyLines {
    /// Mark every row dirty.
    pub const fn all(&mut self) {
        *self = Self::All;
    }

    /// Forget all dirt. Call exactly once per completed paint.
    pub const fn reset(&mut self) {
        *self = Self::Clean;
    }

    /// Mark `loc`'s line and everything below it dirty.
    pub fn forward(&mut self, loc: Location) {
        *self = match *self {
            Self::Clean => Self::Forward(loc.line),
            Self::All => Self::All,
            Self::Forward(from) => Self::Forward(from.min(loc.line)),
            // A forward mark swallows any bounded range above it.
            Self::Range(lo, _) => Self::Forward(lo.min(loc.line)),
        };
    }

    /// Mark every line the selection touches dirty. An empty selection
    /// still marks its own line, which is how single-line edits and cursor
    /// churn get their row repainted.
    pub fn range(&mut self, sel: &Selection) {
        let (begin, end) = sel.line_span();
        *self = match *self {
            Self::Clean => Self::Range(begin, end),
            Self::All => Self::All,
            Self::Forward(from) => Self::Forward(from.min(begin)),
            Self::Range(lo, hi) => Self::Range(lo.min(begin), hi.max(end)),
        };
    }

    /// Does this document line need repainting?
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self, line: usize) -> bool {
        match *self {
            Self::Clean => false,
            Self::All => true,
            Self::Forward(from) => line >= from,
            Self::Range(lo, hi) => lo <= line && line <= hi,
        }
    }

    /// Is there anything to repaint at all?
    #[inline]
    #[must_use]
    pub fn has_dirty(&self) -> bool {
        *self != Self::Clean
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
