//! Terminal handle abstraction and crossterm implementation.
//!
//! The editor never touches stdout directly: every cursor move, clear and
//! write goes through a `TerminalHandle`. Only row-local primitives exist
//! (no full-screen clears, no alternate screen) so the editor can live inline
//! in a scrolling console.

use anyhow::Result;
use crossterm::{
    cursor::{MoveDown, MoveToColumn, MoveUp},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use std::io::{Stdout, Write, stdout};

pub mod recording;
pub use recording::{RecordingTerminal, TermOp};

/// Width assumed when the terminal size cannot be queried.
pub const FALLBACK_WIDTH: u16 = 80;

pub trait TerminalHandle {
    /// Current 0-based cursor column.
    fn cursor_column(&mut self) -> Result<u16>;
    /// Terminal width in columns.
    fn width(&mut self) -> u16;
    fn move_to_column(&mut self, col: u16) -> Result<()>;
    fn move_up(&mut self, rows: u16) -> Result<()>;
    fn move_down(&mut self, rows: u16) -> Result<()>;
    /// Clear from the cursor to the end of the current row.
    fn clear_to_end_of_line(&mut self) -> Result<()>;
    fn write_str(&mut self, text: &str) -> Result<()>;
    /// Start a fresh row below the current one (scrolling if needed), cursor at column 0.
    fn new_line(&mut self) -> Result<()>;
    fn flush(&mut self) -> Result<()>;

    /// Write `text` and end the row. Embedded newlines start new rows.
    fn write_line(&mut self, text: &str) -> Result<()> {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.new_line()?;
            }
            self.write_str(part)?;
        }
        self.new_line()
    }

    /// Largest usable column index (width clamped to at least one column).
    fn max_column(&mut self) -> u16 {
        self.width().max(1) - 1
    }
}

/// Terminal handle writing to stdout through crossterm.
pub struct CrosstermTerminal {
    out: Stdout,
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self { out: stdout() }
    }
}

impl TerminalHandle for CrosstermTerminal {
    fn cursor_column(&mut self) -> Result<u16> {
        // Pending output must reach the terminal before its position is queried.
        self.out.flush()?;
        let (col, _row) = crossterm::cursor::position()?;
        Ok(col)
    }

    fn width(&mut self) -> u16 {
        match terminal::size() {
            Ok((cols, _rows)) if cols > 0 => cols,
            _ => FALLBACK_WIDTH,
        }
    }

    fn move_to_column(&mut self, col: u16) -> Result<()> {
        queue!(self.out, MoveToColumn(col))?;
        Ok(())
    }

    fn move_up(&mut self, rows: u16) -> Result<()> {
        if rows > 0 {
            queue!(self.out, MoveUp(rows))?;
        }
        Ok(())
    }

    fn move_down(&mut self, rows: u16) -> Result<()> {
        if rows > 0 {
            queue!(self.out, MoveDown(rows))?;
        }
        Ok(())
    }

    fn clear_to_end_of_line(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        if !text.is_empty() {
            queue!(self.out, Print(text))?;
        }
        Ok(())
    }

    fn new_line(&mut self) -> Result<()> {
        // Raw mode disables output post-processing, so emit CR explicitly.
        queue!(self.out, Print("\r\n"))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// RAII guard enabling raw mode (and bracketed paste) for an interactive
/// session, restoring the terminal on drop even if the caller early-returns or panics.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnableBracketedPaste)?;
        tracing::debug!(target: "terminal", "raw_mode_enter");
        Ok(Self { active: true })
    }

    pub fn leave(&mut self) -> Result<()> {
        if self.active {
            execute!(stdout(), DisableBracketedPaste)?;
            disable_raw_mode()?;
            self.active = false;
            tracing::debug!(target: "terminal", "raw_mode_leave");
        }
        Ok(())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
