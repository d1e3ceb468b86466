//! Selection: a normalized half-open span of document text.
//!
//! A selection is the pair `[begin, end)` with `begin <= end` always; an
//! empty selection has `begin == end`. Callers never hand in a pre-sorted
//! pair: [`Selection::extend`] takes the anchor and the cursor in whatever
//! order the user dragged them and normalizes from scratch, so the
//! highlighted span stays correct when the cursor crosses back over the
//! anchor.

use crate::location::Location;

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A normalized text span `[begin, end)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    begin: Location,
    end: Location,
}

impl Selection {
    /// A zero-width selection at [`Location::ZERO`].
    pub const ZERO: Self = Self {
        begin: Location::ZERO,
        end: Location::ZERO,
    };

    /// A zero-width selection at the given location.
    #[inline]
    #[must_use]
    pub const fn point(loc: Location) -> Self {
        Self {
            begin: loc,
            end: loc,
        }
    }

    /// Build a selection from two arbitrary endpoints, swapping if needed so
    /// that `begin <= end`.
    #[inline]
    #[must_use]
    pub fn ordered(a: Location, b: Location) -> Self {
        if a <= b {
            Self { begin: a, end: b }
        } else {
            Self { begin: b, end: a }
        }
    }

    /// Inclusive start of the span.
    #[inline]
    #[must_use]
    pub const fn begin(&self) -> Location {
        self.begin
    }

    /// Exclusive end of the span.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Location {
        self.end
    }

    /// True when the selection covers no characters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Collapse to a zero-width selection at `loc`.
    #[inline]
    pub const fn reset(&mut self, loc: Location) {
        self.begin = loc;
        self.end = loc;
    }

    /// Recompute the span from an anchor and the current cursor location.
    /// Order does not matter; the result is normalized either way.
    #[inline]
    pub fn extend(&mut self, anchor: Location, cursor: Location) {
        *self = Self::ordered(anchor, cursor);
    }

    /// True when `loc` falls within `[begin, end)`.
    #[inline]
    #[must_use]
    pub fn contains(&self, loc: Location) -> bool {
        loc >= self.begin && loc < self.end
    }

    /// First and last document line the span touches. An empty selection
    /// still names its own line.
    #[inline]
    #[must_use]
    pub const fn line_span(&self) -> (usize, usize) {
        (self.begin.line, self.end.line)
    }
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sel({}:{} .. {}:{})",
            self.begin.line, self.begin.offset, self.end.line, self.end.offset
        )
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

    // -- construction --------------------------------------------------------

    #[test]
    fn point_is_empty() {
        let sel = Selection::point(loc(3, 7));
        assert!(sel.is_empty());
        assert_eq!(sel.begin(), loc(3, 7));
        assert_eq!(sel.end(), loc(3, 7));
    }

    #[test]
    fn ordered_sorts_endpoints() {
        let sel = Selection::ordered(loc(5, 0), loc(2, 3));
        assert_eq!(sel.begin(), loc(2, 3));
        assert_eq!(sel.end(), loc(5, 0));
    }

    // -- extend --------------------------------------------------------------

    #[test]
    fn extend_is_order_insensitive() {
        let p = loc(1, 4);
        let q = loc(0, 9);
        let mut forward = Selection::ZERO;
        let mut backward = Selection::ZERO;
        forward.extend(p, q);
        backward.extend(q, p);
        assert_eq!(forward, backward);
        assert_eq!(forward.begin(), q);
        assert_eq!(forward.end(), p);
    }

    #[test]
    fn extend_renormalizes_when_cursor_crosses_anchor() {
        let anchor = loc(2, 5);
        let mut sel = Selection::point(anchor);
        sel.extend(anchor, loc(2, 9));
        assert_eq!(sel.begin(), anchor);
        sel.extend(anchor, loc(2, 1));
        assert_eq!(sel.begin(), loc(2, 1));
        assert_eq!(sel.end(), anchor);
    }

    #[test]
    fn reset_collapses() {
        let mut sel = Selection::ordered(loc(0, 0), loc(4, 2));
        sel.reset(loc(1, 1));
        assert!(sel.is_empty());
        assert_eq!(sel.begin(), loc(1, 1));
    }

    // -- queries -------------------------------------------------------------

    #[test]
    fn contains_is_half_open() {
        let sel = Selection::ordered(loc(1, 2), loc(1, 5));
        assert!(sel.contains(loc(1, 2)));
        assert!(sel.contains(loc(1, 4)));
        assert!(!sel.contains(loc(1, 5)));
        assert!(!sel.contains(loc(1, 1)));
    }

    #[test]
    fn contains_across_lines() {
        let sel = Selection::ordered(loc(1, 3), loc(3, 0));
        assert!(sel.contains(loc(2, 99)));
        assert!(!sel.contains(loc(3, 0)));
    }

    #[test]
    fn empty_selection_contains_nothing() {
        let sel = Selection::point(loc(5, 5));
        assert!(!sel.contains(loc(5, 5)));
    }

    #[test]
    fn line_span_covers_both_endpoints() {
        let sel = Selection::ordered(loc(2, 4), loc(6, 0));
        assert_eq!(sel.line_span(), (2, 6));
        assert_eq!(Selection::point(loc(3, 1)).line_span(), (3, 3));
    }
}
