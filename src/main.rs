// SPDX-License-Identifier: MIT
//
// folio — a small modal terminal text editor.
//
// This binary wires together the two library crates:
//
//   folio-term → terminal control, input parsing, event loop
//   folio-edit → document, cursor, selection, dirty tracking, search
//
// The Folio struct implements folio-term's App trait. Each keypress
// flows through:
//
//   stdin → parser → on_key → dialog or editor dispatch → engine mutation
//   paint → dirty-gated row repaint → one write to the terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ title bar (INVERSE)          │  ← row 0: path + document status
//   │ document viewport            │  ← rows 1..h-3
//   │ help bar (INVERSE)           │  ← row h-2: control key labels
//   │ message line / dialog field  │  ← row h-1
//   └──────────────────────────────┘
//
// Handlers never touch the screen directly. They talk to a Frame — the
// collaborator context carrying the title, status, result message,
// clipboard, and dialog requests — and the shell applies whatever the
// Frame collected after the handler returns.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use folio_edit::cursor::Cursor;
use folio_edit::dirty::DirtyLines;
use folio_edit::document::Document;
use folio_edit::line::Line;
use folio_edit::location::Location;
use folio_edit::search::{self, Found};
use folio_edit::selection::Selection;

use folio_term::ansi;
use folio_term::event_loop::{Action, App, EventLoop};
use folio_term::input::{KeyCode, KeyEvent, Modifiers};
use folio_term::output::OutputBuffer;
use folio_term::terminal::Size;

/// Display columns per tab stop. Must agree with the engine's column
/// arithmetic or the hardware cursor drifts off the glyph it sits on.
const TAB_STOP: usize = 8;

/// Help bar labels, mirroring the control-key bindings.
const HELP_TEXT: &str = " ^X Cut  ^C Copy  ^V Paste  ^L To Line  ^F Find  ^W Close  ^S Save";

// ─── Dialog actions ─────────────────────────────────────────────────────────

/// What a committed dialog means. Carried inside the dialog from the
/// moment it opens until commit, so the editor's dispatch never has to
/// guess which prompt the value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DialogAction {
    /// Go-to-line prompt: value is a 1-indexed line number.
    GoLine,
    /// Find prompt: value is the literal search pattern.
    Find,
    /// Save prompt: value is the target path.
    SavePath,
    /// "Save changes before closing?" confirmation.
    SaveBeforeClose,
    /// "Save file under a different name?" confirmation; `path` is the
    /// name the user typed into the save prompt.
    ConfirmRename { path: String },
}

// ─── Dialog engine ──────────────────────────────────────────────────────────

/// A modal prompt on the message line. While one is open it captures
/// every keystroke; the document underneath does not move.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Dialog {
    prompt: String,
    kind: DialogKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DialogKind {
    /// A line-edit field. `cursor` is a char index into `value`.
    Input {
        value: String,
        cursor: usize,
        action: DialogAction,
    },
    /// A yes/no question.
    Confirm { action: DialogAction },
}

/// What one keystroke did to a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DialogOutcome {
    /// Still open.
    Pending,
    /// Escape — closed without committing.
    Cancelled,
    /// Enter on an input field.
    Committed { action: DialogAction, value: String },
    /// `y` or `n` on a confirmation.
    Answered { action: DialogAction, yes: bool },
}

impl Dialog {
    /// An input dialog with the field pre-filled and the cursor at its end.
    fn input(prompt: impl Into<String>, value: impl Into<String>, action: DialogAction) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self {
            prompt: prompt.into(),
            kind: DialogKind::Input {
                value,
                cursor,
                action,
            },
        }
    }

    /// A yes/no confirmation dialog.
    fn confirm(prompt: impl Into<String>, action: DialogAction) -> Self {
        Self {
            prompt: prompt.into(),
            kind: DialogKind::Confirm { action },
        }
    }

    /// Route one keystroke. A commit or cancel consumes the dialog; the
    /// shell drops it as soon as the outcome is not [`DialogOutcome::Pending`].
    fn handle(&mut self, key: KeyEvent) -> DialogOutcome {
        match &mut self.kind {
            DialogKind::Input {
                value,
                cursor,
                action,
            } => match key.code {
                KeyCode::Enter => DialogOutcome::Committed {
                    action: action.clone(),
                    value: value.clone(),
                },
                KeyCode::Escape => DialogOutcome::Cancelled,
                KeyCode::Backspace => {
                    if *cursor > 0 {
                        *cursor -= 1;
                        let at = byte_index(value, *cursor);
                        value.remove(at);
                    }
                    DialogOutcome::Pending
                }
                KeyCode::Delete => {
                    if *cursor < value.chars().count() {
                        let at = byte_index(value, *cursor);
                        value.remove(at);
                    }
                    DialogOutcome::Pending
                }
                KeyCode::Left => {
                    *cursor = cursor.saturating_sub(1);
                    DialogOutcome::Pending
                }
                KeyCode::Right => {
                    *cursor = (*cursor + 1).min(value.chars().count());
                    DialogOutcome::Pending
                }
                KeyCode::Home => {
                    *cursor = 0;
                    DialogOutcome::Pending
                }
                KeyCode::End => {
                    *cursor = value.chars().count();
                    DialogOutcome::Pending
                }
                KeyCode::Char(ch)
                    if !key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) =>
                {
                    let at = byte_index(value, *cursor);
                    value.insert(at, ch);
                    *cursor += 1;
                    DialogOutcome::Pending
                }
                _ => DialogOutcome::Pending,
            },
            DialogKind::Confirm { action } => match key.code {
                KeyCode::Char('y' | 'Y') => DialogOutcome::Answered {
                    action: action.clone(),
                    yes: true,
                },
                KeyCode::Char('n' | 'N') => DialogOutcome::Answered {
                    action: action.clone(),
                    yes: false,
                },
                KeyCode::Escape => DialogOutcome::Cancelled,
                _ => DialogOutcome::Pending,
            },
        }
    }

    /// The message-line rendition of this dialog.
    fn display(&self) -> String {
        match &self.kind {
            DialogKind::Input { value, .. } => format!("{}: {value}", self.prompt),
            DialogKind::Confirm { .. } => format!("{} [y/n]", self.prompt),
        }
    }

    /// Column of the field cursor within the rendered message line.
    /// Confirmations have no field, hence no cursor.
    fn cursor_col(&self) -> Option<usize> {
        match &self.kind {
            DialogKind::Input { cursor, .. } => {
                Some(self.prompt.chars().count() + 2 + *cursor)
            }
            DialogKind::Confirm { .. } => None,
        }
    }
}

/// Byte offset of the `char_idx`-th character of `s` (or its length).
fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// ─── Frame ──────────────────────────────────────────────────────────────────

/// The collaborator context handed into every editor handler. Handlers
/// write intentions here; the shell reads them back out afterwards.
#[derive(Debug, Default)]
struct Frame {
    /// Title bar text, usually the file path.
    title: String,
    /// Title bar status, e.g. "12 lines (modified)".
    status: String,
    /// Transient message, shown until the next keystroke.
    result: Option<String>,
    /// App-internal clipboard for cut/copy/paste.
    clipboard: String,
    /// Modal prompt requested by the handler, collected by the shell.
    dialog: Option<Dialog>,
    /// The file was closed; with a single file that means quit.
    closed: bool,
    /// The file was written under a new name.
    renamed: Option<(PathBuf, PathBuf)>,
}

impl Frame {
    fn set_title(&mut self, title: String) {
        self.title = title;
    }

    fn set_status(&mut self, status: String) {
        self.status = status;
    }

    fn clipboard(&self) -> &str {
        &self.clipboard
    }

    fn set_clipboard(&mut self, text: String) {
        self.clipboard = text;
    }

    fn show_result(&mut self, message: String) {
        self.result = Some(message);
    }

    fn show_dialog(&mut self, dialog: Dialog) {
        self.dialog = Some(dialog);
    }

    fn close_file(&mut self) {
        self.closed = true;
    }

    fn rename_file(&mut self, old: &Path, new: &Path) {
        self.renamed = Some((old.to_path_buf(), new.to_path_buf()));
    }
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// View/controller over one document: routes keystrokes into engine
/// operations, tracks the viewport, and paints dirty rows.
struct Editor {
    doc: Document,
    cursor: Cursor,
    /// Highlighted span, always normalized. Empty means no selection.
    selection: Selection,
    /// The fixed endpoint while Shift+movement extends the selection.
    anchor: Location,
    /// Rows the next paint must redraw.
    update: DirtyLines,
    /// Last committed search pattern, reused by an empty Find commit.
    find_text: String,

    // Viewport geometry, recomputed from the terminal size every paint.
    width: usize,
    /// Text rows: terminal rows minus title, help, and message lines.
    height: usize,
    halfheight: usize,
    /// Greatest allowed scrollpos; scrolling past it would reveal
    /// nothing but empty space.
    maxscroll: usize,
    /// Document line shown on the first viewport row.
    scrollpos: usize,
}

impl Editor {
    fn new(doc: Document) -> Self {
        Self {
            doc,
            cursor: Cursor::new(),
            selection: Selection::ZERO,
            anchor: Location::ZERO,
            update: DirtyLines::All,
            find_text: String::new(),
            width: 0,
            height: 0,
            halfheight: 0,
            maxscroll: 0,
            scrollpos: 0,
        }
    }

    /// Populate the chrome for the first paint.
    fn activate(&self, frame: &mut Frame) {
        frame.set_title(self.display_title());
        frame.set_status(self.doc.status());
    }

    fn display_title(&self) -> String {
        self.doc
            .path()
            .map_or_else(|| String::from("Untitled"), |p| p.display().to_string())
    }

    // ── Keystroke routing ───────────────────────────────────────────

    fn on_key(&mut self, key: KeyEvent, frame: &mut Frame) {
        let shift = key.modifiers.contains(Modifiers::SHIFT);

        if key.modifiers.contains(Modifiers::CTRL) {
            if let KeyCode::Char(c) = key.code {
                match c {
                    'x' => self.cut(frame),
                    'c' => self.copy(frame),
                    'v' => self.paste(frame),
                    'w' => self.close(frame),
                    's' => self.save(frame),
                    'l' => self.go_to_line(frame),
                    'f' => self.find(frame),
                    'j' => self.split_line(false),
                    _ => {}
                }
            }
            self.postprocess(frame);
            return;
        }

        match key.code {
            KeyCode::Up => self.move_cursor(shift, |c, d| c.up(1, d)),
            KeyCode::Down => self.move_cursor(shift, |c, d| c.down(1, d)),
            KeyCode::Left => self.move_cursor(shift, Cursor::left),
            KeyCode::Right => self.move_cursor(shift, Cursor::right),
            KeyCode::Home => self.move_cursor(shift, |c, _| c.home()),
            KeyCode::End => self.move_cursor(shift, Cursor::end_of_line),
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::Tab if shift => {} // accepted, unbound
            KeyCode::Tab => self.insert('\t'),
            KeyCode::Enter => self.split_line(true),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Char(ch) if !key.modifiers.contains(Modifiers::ALT) => self.insert(ch),
            _ => {}
        }

        self.postprocess(frame);
    }

    /// Runs after every keystroke and dialog commit: bring the cursor
    /// on screen and refresh the status readout.
    fn postprocess(&mut self, frame: &mut Frame) {
        self.reveal_cursor();
        frame.set_status(self.doc.status());
    }

    // ── Movement & selection ────────────────────────────────────────

    /// Apply a cursor motion. Without `extend` the selection collapses
    /// first; with it, the span from the anchor follows the cursor.
    fn move_cursor(&mut self, extend: bool, step: impl FnOnce(&mut Cursor, &Document)) {
        if extend {
            let old = self.selection;
            step(&mut self.cursor, &self.doc);
            self.selection.extend(self.anchor, self.cursor.location());
            self.update.range(&old);
            self.update.range(&self.selection);
        } else {
            self.drop_selection();
            step(&mut self.cursor, &self.doc);
            self.anchor = self.cursor.location();
            self.selection.reset(self.anchor);
        }
    }

    /// Collapse the selection to the cursor, repainting its old span.
    fn drop_selection(&mut self) {
        if !self.selection.is_empty() {
            self.update.range(&self.selection);
        }
        self.anchor = self.cursor.location();
        self.selection.reset(self.anchor);
    }

    fn page_up(&mut self) {
        self.drop_selection();
        let loc = self.doc.home(self.scrollpos.saturating_sub(1));
        self.jump_to(loc);
    }

    fn page_down(&mut self) {
        self.drop_selection();
        let loc = self.doc.home(self.scrollpos + self.height);
        self.jump_to(loc);
    }

    /// Move the cursor and both selection endpoints to `loc`.
    fn jump_to(&mut self, loc: Location) {
        self.cursor.move_to(loc, &self.doc);
        self.anchor = self.cursor.location();
        self.selection.reset(self.anchor);
    }

    // ── Edits ───────────────────────────────────────────────────────

    /// Erase the selected span, land the cursor at its begin. A span
    /// that crossed line breaks renumbered everything below, so the
    /// repaint runs forward; otherwise only its own rows repaint.
    fn erase_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let (first, last) = self.selection.line_span();
        let loc = self.doc.erase(&self.selection);
        if first == last {
            self.update.range(&self.selection);
        } else {
            self.update.forward(loc);
        }
        self.jump_to(loc);
    }

    /// Insert one printable character, replacing the selection if any.
    fn insert(&mut self, ch: char) {
        self.erase_selection();
        let at = self.cursor.location();
        let after = self.doc.insert_char(at, ch);
        self.update.range(&Selection::point(at));
        self.jump_to(after);
    }

    /// Break the current line at the cursor. Enter follows the cursor
    /// onto the new line; Ctrl+J leaves it where it was.
    fn split_line(&mut self, follow: bool) {
        self.erase_selection();
        let at = self.cursor.location();
        let new_line = self.doc.split(at);
        self.update.forward(at);
        if follow {
            self.jump_to(new_line);
        } else {
            self.jump_to(at);
        }
    }

    /// Empty selection grows one char left, then the selection erases.
    /// At the very start of the document this is a no-op.
    fn backspace(&mut self) {
        if self.selection.is_empty() {
            self.anchor = self.cursor.location();
            self.cursor.left(&self.doc);
            self.selection.extend(self.anchor, self.cursor.location());
        }
        self.erase_selection();
    }

    /// Empty selection grows one char right, then the selection erases.
    fn delete_forward(&mut self) {
        if self.selection.is_empty() {
            self.anchor = self.cursor.location();
            self.cursor.right(&self.doc);
            self.selection.extend(self.anchor, self.cursor.location());
        }
        self.erase_selection();
    }

    // ── Clipboard ───────────────────────────────────────────────────

    fn copy(&self, frame: &mut Frame) {
        if self.selection.is_empty() {
            return;
        }
        frame.set_clipboard(self.doc.text(&self.selection));
    }

    fn cut(&mut self, frame: &mut Frame) {
        self.copy(frame);
        self.erase_selection();
    }

    /// Replace the selection with the clipboard contents.
    fn paste(&mut self, frame: &mut Frame) {
        self.erase_selection();
        let text = frame.clipboard().to_string();
        if text.is_empty() {
            return;
        }
        let at = self.cursor.location();
        let after = self.doc.insert(at, &text);
        if text.contains('\n') {
            self.update.forward(at);
        } else {
            self.update.range(&Selection::ordered(at, after));
        }
        self.jump_to(after);
    }

    // ── Dialog openers ──────────────────────────────────────────────

    fn go_to_line(&self, frame: &mut Frame) {
        let prompt = format!("Go to line ({})", self.cursor.location().line + 1);
        frame.show_dialog(Dialog::input(prompt, "", DialogAction::GoLine));
    }

    fn find(&self, frame: &mut Frame) {
        let prompt = if self.find_text.is_empty() {
            String::from("Find")
        } else {
            format!("Find ({})", self.find_text)
        };
        frame.show_dialog(Dialog::input(prompt, "", DialogAction::Find));
    }

    fn save(&self, frame: &mut Frame) {
        let value = self
            .doc
            .path()
            .map_or_else(String::new, |p| p.display().to_string());
        frame.show_dialog(Dialog::input("Save File", value, DialogAction::SavePath));
    }

    fn close(&self, frame: &mut Frame) {
        if self.doc.modified() {
            frame.show_dialog(Dialog::confirm(
                "You have modified this file. Save changes before closing?",
                DialogAction::SaveBeforeClose,
            ));
        } else {
            frame.close_file();
        }
    }

    // ── Dialog commit dispatch ──────────────────────────────────────

    /// An input dialog committed with Enter.
    fn commit(&mut self, action: DialogAction, value: &str, frame: &mut Frame) {
        match action {
            DialogAction::GoLine => self.commit_go_line(value),
            DialogAction::Find => self.commit_find(value, frame),
            DialogAction::SavePath => self.commit_save_path(value, frame),
            // Confirmations never commit through an input field.
            DialogAction::SaveBeforeClose | DialogAction::ConfirmRename { .. } => {}
        }
        self.postprocess(frame);
    }

    /// A confirmation dialog answered with `y` or `n`.
    fn answer(&mut self, action: DialogAction, yes: bool, frame: &mut Frame) {
        match action {
            DialogAction::SaveBeforeClose => {
                if !yes {
                    frame.close_file();
                } else if let Some(path) = self.doc.path().map(Path::to_path_buf) {
                    // A failed write aborts the close; the message line
                    // says why and the file stays open.
                    if self.write_to(&path, frame) {
                        frame.close_file();
                    }
                } else {
                    // Untitled: pick a name first.
                    self.save(frame);
                }
            }
            DialogAction::ConfirmRename { path } => {
                if yes {
                    let old = self.doc.path().map(Path::to_path_buf);
                    let new = PathBuf::from(&path);
                    if self.write_to(&new, frame) {
                        if let Some(old) = old {
                            frame.rename_file(&old, &new);
                        }
                        frame.set_title(self.display_title());
                    }
                } else {
                    // Back to the save prompt, pre-filled with the name
                    // the user just declined.
                    frame.show_dialog(Dialog::input("Save File", path, DialogAction::SavePath));
                }
            }
            DialogAction::GoLine | DialogAction::Find | DialogAction::SavePath => {}
        }
        self.postprocess(frame);
    }

    /// Go to a 1-indexed line. Non-numeric input is ignored; numbers
    /// clamp to the document.
    fn commit_go_line(&mut self, value: &str) {
        let Ok(number) = value.trim().parse::<i64>() else {
            return;
        };
        let line = usize::try_from(number).map_or(0, |n| n.saturating_sub(1));
        self.drop_selection();
        self.jump_to(self.doc.home(line));
    }

    /// Run a wraparound search. An empty commit reuses the previous
    /// pattern; the cursor lands on the hit for every outcome but a miss.
    fn commit_find(&mut self, value: &str, frame: &mut Frame) {
        if !value.is_empty() {
            self.find_text = value.to_string();
        }
        if self.find_text.is_empty() {
            return;
        }
        let found = search::find_wrapped(&self.doc, &self.find_text, self.cursor.location());
        match found {
            Found::Ahead(_) => {}
            Found::Wrapped(_) => frame.show_result(String::from("Search wrapped")),
            Found::Only(_) => frame.show_result(String::from("This is the only occurrence")),
            Found::Missing => frame.show_result(String::from("Not found")),
        }
        if let Some(loc) = found.location() {
            self.drop_selection();
            self.jump_to(loc);
        }
    }

    /// The save prompt committed. Saving under the current name writes
    /// immediately; a new name asks for confirmation first.
    fn commit_save_path(&mut self, value: &str, frame: &mut Frame) {
        if value.is_empty() {
            frame.show_result(String::from("Cancelled"));
            return;
        }
        let current = self
            .doc
            .path()
            .map_or_else(String::new, |p| p.display().to_string());
        if current.is_empty() || value == current {
            if self.write_to(Path::new(value), frame) {
                frame.set_title(self.display_title());
            }
        } else {
            frame.show_dialog(Dialog::confirm(
                "Save file under a different name?",
                DialogAction::ConfirmRename {
                    path: value.to_string(),
                },
            ));
        }
    }

    /// Write the document, reporting the outcome on the message line.
    /// On failure the document keeps its modified flag.
    fn write_to(&mut self, path: &Path, frame: &mut Frame) -> bool {
        match self.doc.write(path) {
            Ok(()) => {
                let count = self.doc.maxline() + 1;
                let message = if count == 1 {
                    String::from("Wrote 1 line")
                } else {
                    format!("Wrote {count} lines")
                };
                frame.show_result(message);
                true
            }
            Err(err) => {
                frame.show_result(format!("Could not write {}: {err}", path.display()));
                false
            }
        }
    }

    // ── Viewport ────────────────────────────────────────────────────

    /// Recompute geometry from the terminal size. Any change invalidates
    /// every visible row.
    fn update_dimensions(&mut self, size: Size) {
        let width = size.cols as usize;
        let height = (size.rows as usize).saturating_sub(3);
        if width != self.width {
            self.width = width;
            self.update.all();
        }
        if height != self.height {
            self.height = height;
            self.halfheight = height / 2;
            self.update.all();
        }
        let maxscroll = self
            .doc
            .maxline()
            .max(self.height)
            .saturating_sub(self.halfheight);
        if maxscroll != self.maxscroll {
            self.maxscroll = maxscroll;
            self.scrollpos = self.scrollpos.min(maxscroll);
            self.update.all();
        }
    }

    /// Scroll only when the cursor line is off screen; then center the
    /// viewport on it, clamped so no empty space scrolls into view.
    fn reveal_cursor(&mut self) {
        let line = self.doc.clamp(self.cursor.location()).line;
        if line >= self.scrollpos && line < self.scrollpos + self.height {
            return;
        }
        self.scrollpos = line.saturating_sub(self.halfheight).min(self.maxscroll);
        self.update.all();
    }

    // ── Painting ────────────────────────────────────────────────────

    /// Compose the frame: chrome rows always, viewport rows only where
    /// the update tracker says the document changed underneath them.
    fn paint(
        &mut self,
        out: &mut OutputBuffer,
        size: Size,
        frame: &Frame,
        dialog: Option<&Dialog>,
    ) -> io::Result<()> {
        self.update_dimensions(size);

        paint_bar(out, 0, &title_bar_text(&frame.title, &frame.status, self.width))?;

        for row in 0..self.height {
            let docline = self.scrollpos + row;
            if self.update.is_dirty(docline) {
                self.paint_row(out, row, docline)?;
            }
        }

        paint_bar(out, size.rows.saturating_sub(2), &fit(HELP_TEXT, self.width))?;

        let message = dialog.map_or_else(
            || frame.result.clone().unwrap_or_default(),
            Dialog::display,
        );
        ansi::cursor_to(out, 0, size.rows.saturating_sub(1))?;
        ansi::clear_line(out)?;
        write_clipped(out, &message, self.width)?;

        self.update.reset();
        Ok(())
    }

    /// Repaint one viewport row: clear, tab-expanded text, selection
    /// overlay in reverse video.
    fn paint_row(&self, out: &mut OutputBuffer, row: usize, docline: usize) -> io::Result<()> {
        #[allow(clippy::cast_possible_truncation)] // row < height <= u16 rows
        ansi::cursor_to(out, 0, (row + 1) as u16)?;
        ansi::clear_line(out)?;

        let Some(line) = self.doc.line(docline) else {
            // Rows past the last line stay blank.
            return Ok(());
        };
        let text = expand_tabs(line.text());

        match self.selection_span(docline, line) {
            None => write_clipped(out, &text, self.width),
            Some((from, to)) => self.paint_selected_row(out, &text, from, to),
        }
    }

    /// The highlighted display-column span on a given row, or `None`.
    /// `usize::MAX` as the end means the highlight runs to the screen
    /// edge, visualizing the selected line break.
    fn selection_span(&self, docline: usize, line: &Line) -> Option<(usize, usize)> {
        if self.selection.is_empty() {
            return None;
        }
        let begin = self.selection.begin();
        let end = self.selection.end();
        if docline < begin.line || docline > end.line {
            return None;
        }
        let from = if docline == begin.line {
            line.column(begin.offset)
        } else {
            0
        };
        let to = if docline == end.line {
            line.column(end.offset)
        } else {
            usize::MAX
        };
        if from == to {
            return None;
        }
        Some((from, to))
    }

    fn paint_selected_row(
        &self,
        out: &mut OutputBuffer,
        text: &str,
        from: usize,
        to: usize,
    ) -> io::Result<()> {
        let chars: Vec<char> = text.chars().take(self.width).collect();
        let total = chars.len();
        let hi_end = if to == usize::MAX {
            self.width
        } else {
            to.min(self.width)
        };
        let hi_start = from.min(hi_end);

        let head: String = chars[..hi_start.min(total)].iter().collect();
        out.write_all(head.as_bytes())?;

        ansi::reverse(out)?;
        let body: String = chars[hi_start.min(total)..hi_end.min(total)].iter().collect();
        out.write_all(body.as_bytes())?;
        // Highlight past the end of the text shows as reversed blanks.
        for _ in total.max(hi_start)..hi_end {
            out.write_all(b" ")?;
        }
        ansi::reset(out)?;

        if hi_end < total {
            let tail: String = chars[hi_end..].iter().collect();
            out.write_all(tail.as_bytes())?;
        }
        Ok(())
    }

    /// Screen coordinates of the document cursor, if it is on screen.
    fn screen_cursor(&self) -> Option<(u16, u16)> {
        let pos = self.cursor.position(&self.doc);
        if pos.row < self.scrollpos {
            return None;
        }
        let row = pos.row - self.scrollpos;
        if row >= self.height || pos.col >= self.width {
            return None;
        }
        let x = u16::try_from(pos.col).ok()?;
        let y = u16::try_from(row + 1).ok()?;
        Some((x, y))
    }
}

// ─── Render helpers ─────────────────────────────────────────────────────────

/// Expand tabs to spaces at fixed tab stops.
fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut col = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let next = (col / TAB_STOP + 1) * TAB_STOP;
            while col < next {
                out.push(' ');
                col += 1;
            }
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

/// Pad or truncate to exactly `width` display cells.
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let used = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

/// Title on the left, status on the right, padded to the full width.
fn title_bar_text(title: &str, status: &str, width: usize) -> String {
    let left = format!(" {title}");
    let right = format!("{status} ");
    let used = left.chars().count() + right.chars().count();
    if used < width {
        format!("{left}{}{right}", " ".repeat(width - used))
    } else {
        fit(&left, width)
    }
}

/// Write text truncated to `width` characters.
fn write_clipped(out: &mut OutputBuffer, text: &str, width: usize) -> io::Result<()> {
    let clipped: String = text.chars().take(width).collect();
    out.write_all(clipped.as_bytes())
}

/// A full-width reverse-video chrome row.
fn paint_bar(out: &mut OutputBuffer, row: u16, text: &str) -> io::Result<()> {
    ansi::cursor_to(out, 0, row)?;
    ansi::reverse(out)?;
    out.write_all(text.as_bytes())?;
    ansi::reset(out)
}

// ─── Shell ──────────────────────────────────────────────────────────────────

/// The application shell: owns the editor, the frame, and the currently
/// open dialog, and implements the event loop's App trait.
struct Folio {
    editor: Editor,
    frame: Frame,
    dialog: Option<Dialog>,
    /// Last known terminal rows, for placing the dialog cursor.
    rows: u16,
}

impl Folio {
    fn new(doc: Document) -> Self {
        let mut frame = Frame::default();
        let editor = Editor::new(doc);
        editor.activate(&mut frame);
        Self {
            editor,
            frame,
            dialog: None,
            rows: 0,
        }
    }
}

impl App for Folio {
    fn on_key(&mut self, key: KeyEvent) -> Action {
        // Result messages are transient: any keystroke clears them.
        self.frame.result = None;

        if let Some(mut dialog) = self.dialog.take() {
            match dialog.handle(key) {
                DialogOutcome::Pending => self.dialog = Some(dialog),
                DialogOutcome::Cancelled => {}
                DialogOutcome::Committed { action, value } => {
                    self.editor.commit(action, &value, &mut self.frame);
                }
                DialogOutcome::Answered { action, yes } => {
                    self.editor.answer(action, yes, &mut self.frame);
                }
            }
        } else {
            self.editor.on_key(key, &mut self.frame);
        }

        // Handlers request dialogs through the frame; the new dialog
        // takes over starting with the next keystroke.
        if let Some(dialog) = self.frame.dialog.take() {
            self.dialog = Some(dialog);
        }

        if self.frame.closed {
            Action::Quit
        } else {
            Action::Continue
        }
    }

    fn on_resize(&mut self, size: Size) {
        self.rows = size.rows;
        self.editor.update.all();
    }

    fn paint(&mut self, out: &mut OutputBuffer, size: Size) -> io::Result<()> {
        self.rows = size.rows;
        self.editor
            .paint(out, size, &self.frame, self.dialog.as_ref())
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        if let Some(dialog) = &self.dialog {
            let col = dialog.cursor_col()?;
            let x = u16::try_from(col).ok()?;
            return Some((x, self.rows.saturating_sub(1)));
        }
        // The block cursor and the reverse-video highlight fight over
        // the same cell; hide the cursor while a selection is active.
        if !self.editor.selection.is_empty() {
            return None;
        }
        self.editor.screen_cursor()
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let args: Vec<String> = env::args().collect();

    let doc = match args.get(1) {
        Some(path) => match Document::load(path.as_str()) {
            Ok(doc) => doc,
            Err(err) => {
                eprintln!("folio: {path}: {err}");
                process::exit(1);
            }
        },
        None => Document::new(),
    };

    let mut app = Folio::new(doc);

    let mut event_loop = EventLoop::new().unwrap_or_else(|err| {
        eprintln!("folio: failed to initialize terminal: {err}");
        process::exit(1);
    });

    if let Err(err) = event_loop.run(&mut app) {
        eprintln!("folio: {err}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
