//! Single-line edit buffer plus the text utilities the editor builds on:
//! display widths, word motion and the continuation scanner.

pub mod motion;
pub mod scan;
pub mod width;

// Re-export the primary entry points for callers that already depend on core-text.
pub use scan::{BracketKind, Nesting, ScanState, bracket_delta};
pub use width::{display_offset, display_width};

/// Default indent inserted by Tab when no positive width is known.
pub const DEFAULT_INDENT: usize = 2;

/// An editable line: chars plus a cursor offset measured in chars.
///
/// Invariant: `0 <= cursor <= chars.len()`. Every mutator clamps to keep it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl EditBuffer {
    /// Buffer holding `text` with the cursor at its end.
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Column of the cursor relative to the start of the line.
    pub fn cursor_column(&self) -> usize {
        width::chars_offset(&self.chars, self.cursor)
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.chars.len());
    }

    pub fn insert_char(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    /// Delete the char before the cursor. Returns false at offset 0.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Delete the char under the cursor. Returns false at the end.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn word_left(&mut self) {
        self.cursor = motion::word_left(&self.chars, self.cursor);
    }

    pub fn word_right(&mut self) {
        self.cursor = motion::word_right(&self.chars, self.cursor);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Insert `width` spaces at the cursor (`DEFAULT_INDENT` when zero).
    pub fn indent(&mut self, width: usize) {
        let width = effective_indent(width);
        for _ in 0..width {
            self.insert_char(' ');
        }
    }

    /// Remove `width` leading whitespace chars when the line starts with at
    /// least that many and the cursor sits at or past them. Returns whether
    /// anything was removed.
    pub fn dedent(&mut self, width: usize) -> bool {
        let width = effective_indent(width);
        if self.chars.len() < width || self.cursor < width {
            return false;
        }
        if !self.chars[..width].iter().all(|c| c.is_whitespace()) {
            return false;
        }
        self.chars.drain(..width);
        self.cursor -= width;
        true
    }
}

/// Indent width actually applied for a requested width.
#[inline]
pub fn effective_indent(width: usize) -> usize {
    if width == 0 { DEFAULT_INDENT } else { width }
}

/// Count of leading space characters in `line`.
pub fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|&c| c == ' ').count()
}
