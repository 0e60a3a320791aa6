//! Multi-line statement accumulator.
//!
//! `Statement` is the pure state machine: it owns the line list, the nesting
//! counters and the index of the line being edited, and turns each
//! `(text, ExitReason)` pair returned by the line editor into a `Step`.
//! `Accumulator` drives it against a terminal and a key source, translating
//! each step into row movement on screen.
//!
//! Counter bookkeeping: every line records the contribution it last added to
//! the counters. Entering a line for editing withdraws that contribution;
//! committing it adds the freshly scanned one. So at any time the counters
//! equal the sum of the recorded contributions of all lines not currently
//! being edited, and a commit of unchanged text restores them exactly.

use anyhow::Result;
use core_config::Config;
use core_input::KeySource;
use core_terminal::TerminalHandle;
use core_text::scan::{Nesting, ScanState};
use core_text::width::clip_to_width;
use core_text::{DEFAULT_INDENT, leading_spaces};
use tracing::debug;

use crate::line_editor::{ExitReason, LineEditor};

/// How each row's prompt is rendered (`01>` by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptStyle {
    pub line_numbers: bool,
    pub marker: String,
}

impl Default for PromptStyle {
    fn default() -> Self {
        Self {
            line_numbers: true,
            marker: ">".to_string(),
        }
    }
}

impl PromptStyle {
    /// Prompt for the 0-based line `index`.
    pub fn render(&self, index: usize) -> String {
        if self.line_numbers {
            format!("{:02}{}", index + 1, self.marker)
        } else {
            self.marker.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementOptions {
    pub prompt: PromptStyle,
    /// Tab width until a step is learned from committed lines.
    pub indent_width: usize,
    /// Complete only on an empty line (the line itself is not part of the text).
    pub require_blank_line: bool,
    /// Carry string / block-comment state from one line into the next.
    pub carry_scan_state: bool,
}

impl Default for StatementOptions {
    fn default() -> Self {
        Self {
            prompt: PromptStyle::default(),
            indent_width: DEFAULT_INDENT,
            require_blank_line: false,
            carry_scan_state: false,
        }
    }
}

impl StatementOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            prompt: PromptStyle {
                line_numbers: cfg.file.prompt.line_numbers,
                marker: cfg.file.prompt.marker.clone(),
            },
            indent_width: cfg.indent_width(),
            require_blank_line: cfg.file.editor.require_blank_line,
            carry_scan_state: cfg.file.scanner.carry_state,
        }
    }
}

/// Indentation learned from committed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentContext {
    leading: usize,
    step: usize,
}

impl IndentContext {
    pub fn new(step: usize) -> Self {
        Self { leading: 0, step }
    }

    /// Record a committed line. A deeper indent than the previous line
    /// becomes the new step; shallower or equal indents keep the old one.
    pub fn observe(&mut self, line: &str) {
        let leading = leading_spaces(line);
        if leading > self.leading {
            self.step = leading - self.leading;
        }
        self.leading = leading;
    }

    pub fn leading(&self) -> usize {
        self.leading
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Initial text of a freshly created line.
    pub fn prefix(&self) -> String {
        " ".repeat(self.leading)
    }
}

/// Committed lines plus the contribution each currently adds to the counters
/// (`None` while the line is being edited).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineList {
    lines: Vec<String>,
    counted: Vec<Option<Nesting>>,
}

impl LineList {
    fn with_first_line() -> Self {
        Self {
            lines: vec![String::new()],
            counted: vec![None],
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    pub fn contribution(&self, index: usize) -> Option<Nesting> {
        self.counted.get(index).copied().flatten()
    }

    fn push(&mut self, text: String) {
        self.lines.push(text);
        self.counted.push(None);
    }

    fn insert(&mut self, index: usize, text: String) {
        self.lines.insert(index, text);
        self.counted.insert(index, None);
    }
}

/// Where the edit cursor goes after a line is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMove {
    /// Keep editing the same row.
    Stay,
    Up,
    /// Move to the existing row below.
    Down,
    /// A new row was added after the last one.
    Append,
    /// A new row was inserted below the current one; rows underneath shift down.
    Insert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Edit(RowMove),
    Complete(String),
}

/// State of one statement being entered.
#[derive(Debug, Clone)]
pub struct Statement {
    lines: LineList,
    counters: Nesting,
    index: usize,
    indent: IndentContext,
    require_blank_line: bool,
    carry_scan_state: bool,
    trailing_state: ScanState,
}

impl Statement {
    pub fn new(options: &StatementOptions) -> Self {
        Self {
            lines: LineList::with_first_line(),
            counters: Nesting::ZERO,
            index: 0,
            indent: IndentContext::new(options.indent_width),
            require_blank_line: options.require_blank_line,
            carry_scan_state: options.carry_scan_state,
            trailing_state: ScanState::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn counters(&self) -> Nesting {
        self.counters
    }

    pub fn lines(&self) -> &LineList {
        &self.lines
    }

    pub fn indent(&self) -> IndentContext {
        self.indent
    }

    /// Text the line editor should start from for the current line.
    pub fn current_text(&self) -> &str {
        self.lines.get(self.index).unwrap_or_default()
    }

    /// Tab width for the current line.
    pub fn indent_step(&self) -> usize {
        self.indent.step()
    }

    /// Start editing the current line: its contribution leaves the counters
    /// until it is submitted again.
    pub fn begin_edit(&mut self) {
        self.withdraw(self.index);
    }

    /// Commit `text` at the current line and advance the state machine.
    pub fn submit(&mut self, text: String, reason: ExitReason) -> Step {
        let index = self.index;
        let is_last = index + 1 == self.lines.len();
        self.indent.observe(&text);
        self.commit(index, text);

        let step = match reason {
            ExitReason::Up if index == 0 => Step::Edit(RowMove::Stay),
            ExitReason::Up => {
                self.index -= 1;
                Step::Edit(RowMove::Up)
            }
            ExitReason::Enter | ExitReason::Down if !is_last => {
                self.index += 1;
                Step::Edit(RowMove::Down)
            }
            ExitReason::Down => Step::Edit(RowMove::Stay),
            ExitReason::Enter if self.is_complete() => Step::Complete(self.joined()),
            ExitReason::Enter | ExitReason::NewLine => {
                let fresh = self.indent.prefix();
                self.index += 1;
                if is_last {
                    self.lines.push(fresh);
                    Step::Edit(RowMove::Append)
                } else {
                    self.lines.insert(self.index, fresh);
                    Step::Edit(RowMove::Insert)
                }
            }
        };

        debug!(
            target: "editor.statement",
            ?reason,
            line = index,
            next = self.index,
            lines = self.lines.len(),
            curly = self.counters.curly,
            square = self.counters.square,
            round = self.counters.round,
            complete = matches!(step, Step::Complete(_)),
            "line_submitted"
        );
        step
    }

    fn withdraw(&mut self, index: usize) {
        if let Some(prev) = self.lines.counted.get_mut(index).and_then(Option::take) {
            self.counters -= prev;
        }
    }

    fn commit(&mut self, index: usize, text: String) {
        self.withdraw(index);
        self.lines.lines[index] = text;
        if self.carry_scan_state {
            self.rescan_all();
        } else {
            let contribution = Nesting::of_line(&self.lines.lines[index]);
            self.counters += contribution;
            self.lines.counted[index] = Some(contribution);
        }
    }

    /// Carried-state mode: a line's contribution depends on every line above
    /// it, so all contributions are recomputed from the top.
    fn rescan_all(&mut self) {
        let mut state = ScanState::new();
        let mut total = Nesting::ZERO;
        for (i, line) in self.lines.lines.iter().enumerate() {
            let contribution = Nesting::of_line_from(line, &mut state);
            state = state.at_next_line();
            if i == self.index || self.lines.counted[i].is_some() {
                self.lines.counted[i] = Some(contribution);
                total += contribution;
            }
        }
        self.counters = total;
        self.trailing_state = state;
    }

    fn is_complete(&self) -> bool {
        if !self.counters.is_balanced() {
            return false;
        }
        if self.carry_scan_state
            && (self.trailing_state.in_string || self.trailing_state.in_block_comment)
        {
            return false;
        }
        !self.require_blank_line || self.current_text().trim().is_empty()
    }

    fn joined(&self) -> String {
        let mut lines = self.lines.as_slice();
        if self.require_blank_line
            && let Some((last, rest)) = lines.split_last()
            && last.trim().is_empty()
        {
            lines = rest;
        }
        lines.join("\n")
    }
}

/// Drives a `Statement` with a line editor on a terminal.
pub struct Accumulator<'a, T: TerminalHandle, K: KeySource> {
    term: &'a mut T,
    keys: &'a mut K,
    options: &'a StatementOptions,
}

impl<'a, T: TerminalHandle, K: KeySource> Accumulator<'a, T, K> {
    pub fn new(term: &'a mut T, keys: &'a mut K, options: &'a StatementOptions) -> Self {
        Self {
            term,
            keys,
            options,
        }
    }

    /// Read one complete statement, starting on the current terminal row.
    /// The cursor is left at column 0 of the row below the statement.
    ///
    /// # Errors
    /// Terminal and key source errors are propagated, with the cursor moved
    /// to the last row of the abandoned statement.
    pub fn read_statement(&mut self) -> Result<String> {
        let mut statement = Statement::new(self.options);
        loop {
            statement.begin_edit();
            self.draw_prompt(statement.index())?;
            let initial = statement.current_text().to_string();
            let edited = LineEditor::new(&mut *self.term, &mut *self.keys)
                .edit_line(&initial, statement.indent_step());
            let (text, reason) = match edited {
                Ok(edited) => edited,
                Err(err) => {
                    self.leave_statement(&statement)?;
                    return Err(err);
                }
            };
            match statement.submit(text, reason) {
                Step::Complete(text) => {
                    self.term.new_line()?;
                    self.term.flush()?;
                    debug!(target: "editor.statement", len = text.len(), "statement_complete");
                    return Ok(text);
                }
                Step::Edit(RowMove::Stay) => {}
                Step::Edit(RowMove::Up) => self.term.move_up(1)?,
                Step::Edit(RowMove::Down) => self.term.move_down(1)?,
                Step::Edit(RowMove::Append) => self.term.new_line()?,
                Step::Edit(RowMove::Insert) => self.redraw_shifted_rows(&statement)?,
            }
        }
    }

    /// Abandoned statement: park the cursor on its last row so whatever the
    /// caller prints next lands below every row already drawn.
    fn leave_statement(&mut self, statement: &Statement) -> Result<()> {
        let below = statement.lines().len() - 1 - statement.index();
        if below > 0 {
            self.term.move_down(u16::try_from(below).unwrap_or(u16::MAX))?;
        }
        self.term.flush()
    }

    fn draw_prompt(&mut self, index: usize) -> Result<()> {
        self.term.move_to_column(0)?;
        self.term.clear_to_end_of_line()?;
        let prompt = self.options.prompt.render(index);
        self.write_clipped(&prompt)
    }

    fn write_clipped(&mut self, text: &str) -> Result<()> {
        let width = usize::from(self.term.width().max(1));
        let chars: Vec<char> = text.chars().collect();
        let visible: String = clip_to_width(&chars, width).iter().collect();
        self.term.write_str(&visible)
    }

    /// After an insertion at `statement.index()`, repaint every row from the
    /// inserted one down (the last needs a fresh row), then return the cursor
    /// to the inserted row.
    fn redraw_shifted_rows(&mut self, statement: &Statement) -> Result<()> {
        let inserted = statement.index();
        let total = statement.lines().len();
        for row in inserted..total {
            if row + 1 < total {
                self.term.move_down(1)?;
            } else {
                self.term.new_line()?;
            }
            self.term.move_to_column(0)?;
            self.term.clear_to_end_of_line()?;
            let text = statement.lines().get(row).unwrap_or_default();
            let rendered = format!("{}{}", self.options.prompt.render(row), text);
            self.write_clipped(&rendered)?;
        }
        let back = total - 1 - inserted;
        self.term.move_up(u16::try_from(back).unwrap_or(u16::MAX))?;
        self.term.flush()
    }
}
