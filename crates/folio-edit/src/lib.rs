//! # folio-edit — Editor engine for folio
//!
//! This crate contains the text engine: everything that models a document
//! and a user's place in it, with no knowledge of terminals or keys.
//!
//! - **[`location`]** — `Location` (line, offset) and `Position` (row, col),
//!   0-indexed; logical coordinates vs display coordinates
//! - **[`line`]** — `Line` storage with a cached offset-to-column table
//! - **[`document`]** — `Document`: the line arena, edits, search, file I/O
//! - **[`selection`]** — normalized `[begin, end)` spans
//! - **[`cursor`]** — cursor movement with a remembered display column
//! - **[`dirty`]** — which document lines the next paint must redraw
//! - **[`search`]** — wraparound find-next policy over `Document::find`
//!
//! The view layer that feeds keystrokes in and paints lines out lives in
//! the application crate; this one stays headless and fully testable.

pub mod cursor;
pub mod dirty;
pub mod document;
pub mod line;
pub mod location;
pub mod search;
pub mod selection;
