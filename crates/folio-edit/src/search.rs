//! Wraparound search over a document.
//!
//! [`Document::find`](crate::document::Document::find) is a plain forward scan that
//! stops at the end of the document. Interactive "find next" wants more:
//! continue from just past the cursor, wrap to the top on a miss, and tell
//! the user whether the search wrapped, found nothing, or came back to the
//! very place it started. That policy lives here, so the document stays a
//! dumb store and the view layer only has to map outcomes to messages.
//!
//! Searches are literal string matches against single lines; a pattern never
//! matches across a line break.

use crate::document::Document;
use crate::location::Location;

// ---------------------------------------------------------------------------
// Found
// ---------------------------------------------------------------------------

/// Outcome of a wraparound search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Found {
    /// A match strictly after the starting point, no wrap needed.
    Ahead(Location),
    /// No match below the starting point; this one comes from the top.
    Wrapped(Location),
    /// The wrap came back to the starting location itself: the pattern
    /// occurs exactly once, right where the search began.
    Only(Location),
    /// The pattern does not occur anywhere.
    Missing,
}

impl Found {
    /// The matched location, when there is one.
    #[must_use]
    pub const fn location(self) -> Option<Location> {
        match self {
            Self::Ahead(loc) | Self::Wrapped(loc) | Self::Only(loc) => Some(loc),
            Self::Missing => None,
        }
    }
}

// ---------------------------------------------------------------------------
// find_wrapped
// ---------------------------------------------------------------------------

/// Find the next occurrence of `needle` after `after`, wrapping to the top
/// of the document when the bottom half has none.
///
/// The scan starts one character past `after`, so repeating a search from a
/// match steps to the following occurrence instead of rediscovering the same
/// one. Empty needles are [`Found::Missing`].
#[must_use]
pub fn find_wrapped(doc: &Document, needle: &str, after: Location) -> Found {
    if needle.is_empty() {
        return Found::Missing;
    }
    let from = doc.next(after);
    let hit = doc.find(needle, from);
    if hit != doc.end() {
        return Found::Ahead(hit);
    }
    let wrapped = doc.find(needle, doc.home(0));
    if wrapped == doc.end() {
        Found::Missing
    } else if wrapped == doc.clamp(after) {
        Found::Only(wrapped)
    } else {
        Found::Wrapped(wrapped)
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

    #[test]
    fn finds_next_occurrence_ahead() {
        let doc = Document::from_text("abcabc\n");
        assert_eq!(find_wrapped(&doc, "abc", loc(0, 0)), Found::Ahead(loc(0, 3)));
    }

    #[test]
    fn steps_past_the_starting_match() {
        // Sitting on a match must not rediscover it when another exists.
        let doc = Document::from_text("abc abc\n");
        assert_eq!(find_wrapped(&doc, "abc", loc(0, 4)), Found::Wrapped(loc(0, 0)));
    }

    #[test]
    fn wraps_to_top() {
        let doc = Document::from_text("needle\nhay\nhay\n");
        assert_eq!(
            find_wrapped(&doc, "needle", loc(2, 0)),
            Found::Wrapped(loc(0, 0))
        );
    }

    #[test]
    fn single_occurrence_reports_only() {
        let doc = Document::from_text("abc\n");
        assert_eq!(find_wrapped(&doc, "abc", loc(0, 0)), Found::Only(loc(0, 0)));
    }

    #[test]
    fn missing_pattern() {
        let doc = Document::from_text("hay\nhay\n");
        assert_eq!(find_wrapped(&doc, "needle", loc(0, 0)), Found::Missing);
    }

    #[test]
    fn empty_needle_is_missing() {
        let doc = Document::from_text("anything\n");
        assert_eq!(find_wrapped(&doc, "", loc(0, 0)), Found::Missing);
    }

    #[test]
    fn repeated_search_cycles_between_two_matches() {
        let doc = Document::from_text("abc\nxyz\nabc\n");
        let first = find_wrapped(&doc, "abc", loc(0, 0));
        assert_eq!(first, Found::Ahead(loc(2, 0)));
        let second = find_wrapped(&doc, "abc", loc(2, 0));
        assert_eq!(second, Found::Wrapped(loc(0, 0)));
    }

    #[test]
    fn location_accessor() {
        assert_eq!(Found::Ahead(loc(1, 2)).location(), Some(loc(1, 2)));
        assert_eq!(Found::Missing.location(), None);
    }
}
