//! Single-line editor.
//!
//! Owns one `EditBuffer` for the duration of an `edit_line` call, applies one
//! key at a time and redraws the line in place after every change. Control
//! returns to the caller only on Enter, Up or Down (Shift+Down reported as
//! `NewLine`); every other key either edits the buffer or is ignored.
//!
//! Redraw invariants:
//! * Only the columns from the start column to the right edge are touched.
//! * Text that would run past the right edge is clipped, never wrapped.
//! * The cursor column is `start + display offset of the cursor`, clamped to
//!   the last terminal column.

use anyhow::Result;
use core_events::{KeyCode, KeyEvent};
use core_input::KeySource;
use core_terminal::TerminalHandle;
use core_text::EditBuffer;
use core_text::width::clip_to_width;
use tracing::{debug, trace};

/// Why `edit_line` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitReason {
    Enter,
    Up,
    Down,
    /// Shift+Down: force a new line even when brackets are balanced.
    NewLine,
}

/// Effect of a single key on the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Buffer text or cursor changed; the line must be redrawn.
    Changed,
    /// Nothing happened (bound key at a boundary, or an unbound key).
    Ignored,
    Exit(ExitReason),
}

#[inline]
fn changed_if(did: bool) -> KeyOutcome {
    if did {
        KeyOutcome::Changed
    } else {
        KeyOutcome::Ignored
    }
}

/// Apply `key` to `buf`. Pure; the editor loop and tests share it.
pub fn apply_key(buf: &mut EditBuffer, key: &KeyEvent, indent_width: usize) -> KeyOutcome {
    match key.code {
        KeyCode::Enter => KeyOutcome::Exit(ExitReason::Enter),
        KeyCode::Up => KeyOutcome::Exit(ExitReason::Up),
        KeyCode::Down if key.is_shift() => KeyOutcome::Exit(ExitReason::NewLine),
        KeyCode::Down => KeyOutcome::Exit(ExitReason::Down),
        KeyCode::Backspace => changed_if(buf.backspace()),
        KeyCode::Delete => changed_if(buf.delete()),
        KeyCode::Left if key.is_alt() => {
            let before = buf.cursor();
            buf.word_left();
            changed_if(buf.cursor() != before)
        }
        KeyCode::Right if key.is_alt() => {
            let before = buf.cursor();
            buf.word_right();
            changed_if(buf.cursor() != before)
        }
        KeyCode::Left => changed_if(buf.move_left()),
        KeyCode::Right => changed_if(buf.move_right()),
        KeyCode::Home => {
            let before = buf.cursor();
            buf.home();
            changed_if(buf.cursor() != before)
        }
        KeyCode::End => {
            let before = buf.cursor();
            buf.end();
            changed_if(buf.cursor() != before)
        }
        KeyCode::BackTab => changed_if(buf.dedent(indent_width)),
        KeyCode::Tab if key.is_shift() => changed_if(buf.dedent(indent_width)),
        KeyCode::Tab => {
            buf.indent(indent_width);
            KeyOutcome::Changed
        }
        KeyCode::Char(_) => match key.printable() {
            Some(c) => {
                buf.insert_char(c);
                KeyOutcome::Changed
            }
            None => KeyOutcome::Ignored,
        },
        KeyCode::Esc => KeyOutcome::Ignored,
    }
}

pub struct LineEditor<'a, T: TerminalHandle, K: KeySource> {
    term: &'a mut T,
    keys: &'a mut K,
}

impl<'a, T: TerminalHandle, K: KeySource> LineEditor<'a, T, K> {
    pub fn new(term: &'a mut T, keys: &'a mut K) -> Self {
        Self { term, keys }
    }

    /// Edit `initial` on the current row, starting at the current cursor
    /// column, until Enter / Up / Down.
    ///
    /// # Errors
    /// Terminal write failures and key source errors (including
    /// `core_input::InputError` for interrupts) are propagated unchanged.
    pub fn edit_line(&mut self, initial: &str, indent_width: usize) -> Result<(String, ExitReason)> {
        let start = self.term.cursor_column()?;
        let mut buf = EditBuffer::new(initial);
        self.redraw(start, &buf)?;
        loop {
            let key = self.keys.next_key()?;
            match apply_key(&mut buf, &key, indent_width) {
                KeyOutcome::Exit(reason) => {
                    debug!(target: "editor.line", ?reason, len = buf.len(), "line_exit");
                    return Ok((buf.text(), reason));
                }
                KeyOutcome::Changed => {
                    trace!(target: "editor.line", key = key.code.kind(), cursor = buf.cursor(), "key_applied");
                    self.redraw(start, &buf)?;
                }
                KeyOutcome::Ignored => {
                    trace!(target: "editor.line", key = key.code.kind(), "key_ignored");
                }
            }
        }
    }

    fn redraw(&mut self, start: u16, buf: &EditBuffer) -> Result<()> {
        let max_col = self.term.max_column();
        let start = start.min(max_col);
        let available = usize::from(max_col - start) + 1;
        let visible: String = clip_to_width(buf.chars(), available).iter().collect();

        self.term.move_to_column(start)?;
        self.term.clear_to_end_of_line()?;
        self.term.write_str(&visible)?;

        let col = usize::from(start) + buf.cursor_column();
        let col = u16::try_from(col).unwrap_or(u16::MAX).min(max_col);
        self.term.move_to_column(col)?;
        self.term.flush()
    }
}
