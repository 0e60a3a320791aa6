//! In-memory terminal that records every operation and keeps a simple screen
//! model (rows of cells plus a cursor).
//!
//! Used by editor tests in place of a real console. Wide characters occupy two
//! cells; writes past the right edge are dropped, mirroring the clipping the
//! editor performs before writing.

use crate::TerminalHandle;
use anyhow::Result;
use core_text::width::char_width;

/// Continuation marker for the second cell of a wide character.
const WIDE_TAIL: char = '\0';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermOp {
    MoveToColumn(u16),
    MoveUp(u16),
    MoveDown(u16),
    ClearToEnd,
    Write(String),
    NewLine,
    Flush,
}

#[derive(Debug, Clone)]
pub struct RecordingTerminal {
    width: u16,
    row: usize,
    col: usize,
    rows: Vec<Vec<char>>,
    ops: Vec<TermOp>,
}

impl Default for RecordingTerminal {
    fn default() -> Self {
        Self::new(crate::FALLBACK_WIDTH)
    }
}

impl RecordingTerminal {
    pub fn new(width: u16) -> Self {
        Self {
            width: width.max(1),
            row: 0,
            col: 0,
            rows: vec![Vec::new()],
            ops: Vec::new(),
        }
    }

    /// Cursor as (row, column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn ops(&self) -> &[TermOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<TermOp> {
        std::mem::take(&mut self.ops)
    }

    /// Visible text of `row` with trailing blanks removed.
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|cells| {
                let s: String = cells.iter().filter(|&&c| c != WIDE_TAIL).collect();
                s.trim_end().to_string()
            })
            .unwrap_or_default()
    }

    /// Every row's visible text, top to bottom.
    pub fn screen(&self) -> Vec<String> {
        (0..self.rows.len()).map(|r| self.row_text(r)).collect()
    }

    fn ensure_row(&mut self) {
        while self.rows.len() <= self.row {
            self.rows.push(Vec::new());
        }
    }

    fn put(&mut self, c: char) {
        let w = char_width(c);
        if self.col + w > usize::from(self.width) {
            return;
        }
        let col = self.col;
        let cells = &mut self.rows[self.row];
        while cells.len() < col + w {
            cells.push(' ');
        }
        cells[col] = c;
        if w == 2 {
            cells[col + 1] = WIDE_TAIL;
        }
        self.col += w;
    }
}

impl TerminalHandle for RecordingTerminal {
    fn cursor_column(&mut self) -> Result<u16> {
        Ok(u16::try_from(self.col).unwrap_or(u16::MAX))
    }

    fn width(&mut self) -> u16 {
        self.width
    }

    fn move_to_column(&mut self, col: u16) -> Result<()> {
        self.ops.push(TermOp::MoveToColumn(col));
        self.col = usize::from(col.min(self.width - 1));
        Ok(())
    }

    fn move_up(&mut self, rows: u16) -> Result<()> {
        self.ops.push(TermOp::MoveUp(rows));
        self.row = self.row.saturating_sub(usize::from(rows));
        Ok(())
    }

    fn move_down(&mut self, rows: u16) -> Result<()> {
        self.ops.push(TermOp::MoveDown(rows));
        self.row += usize::from(rows);
        self.ensure_row();
        Ok(())
    }

    fn clear_to_end_of_line(&mut self) -> Result<()> {
        self.ops.push(TermOp::ClearToEnd);
        let col = self.col;
        self.rows[self.row].truncate(col);
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.ops.push(TermOp::Write(text.to_string()));
        for c in text.chars() {
            self.put(c);
        }
        Ok(())
    }

    fn new_line(&mut self) -> Result<()> {
        self.ops.push(TermOp::NewLine);
        self.row += 1;
        self.col = 0;
        self.ensure_row();
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.ops.push(TermOp::Flush);
        Ok(())
    }
}
