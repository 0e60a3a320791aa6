//! Session driver: reads statements, hands them to the evaluator and prints
//! what comes back.
//!
//! Line numbers handed to the evaluator keep increasing across statements so
//! diagnostics from different submissions never share a number. Evaluation
//! failures are printed and the session goes on prompting; only terminal and
//! key source failures end `run_interactive` with an error.

use anyhow::Result;
use core_config::Config;
use core_editor::{Accumulator, StatementOptions};
use core_events::KeyCode;
use core_input::{InputError, KeySource};
use core_terminal::TerminalHandle;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::diagnostic::{Diagnostic, render_diagnostic};
use crate::evaluator::{BreakpointAction, Evaluator};

pub const BREAKPOINT_PROMPT: &str = "[c] continue  [s] step  [a] abort: ";

pub struct Session<E: Evaluator> {
    evaluator: E,
    options: StatementOptions,
    banner: bool,
    next_line: usize,
}

impl<E: Evaluator> Session<E> {
    pub fn new(evaluator: E, options: StatementOptions) -> Self {
        Self {
            evaluator,
            options,
            banner: false,
            next_line: 1,
        }
    }

    pub fn from_config(evaluator: E, cfg: &Config) -> Self {
        Self::new(evaluator, StatementOptions::from_config(cfg)).with_banner(cfg.file.prompt.banner)
    }

    pub fn with_banner(mut self, banner: bool) -> Self {
        self.banner = banner;
        self
    }

    /// Line number the next statement will start at.
    pub fn next_line(&self) -> usize {
        self.next_line
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn banner_rows(&self) -> [&'static str; 3] {
        let submit = if self.options.require_blank_line {
            "Enter a statement, then an empty line to run it."
        } else {
            "Enter a statement; it runs once every bracket is closed."
        };
        [
            "harp interactive shell",
            submit,
            "Shift+Down adds a line, Up/Down move between lines, Ctrl+D exits.",
        ]
    }

    /// Prompt for statements until the key source reports end of input.
    /// Ctrl+C abandons the statement being entered and starts a new one.
    ///
    /// # Errors
    /// Terminal failures and key source failures other than `InputError`.
    pub fn run_interactive<T, K>(&mut self, term: &mut T, keys: &mut K) -> Result<()>
    where
        T: TerminalHandle,
        K: KeySource,
    {
        if self.banner {
            for row in self.banner_rows() {
                term.write_line(row)?;
            }
            term.flush()?;
        }
        info!(target: "repl", "session_start");

        loop {
            let read = Accumulator::new(&mut *term, &mut *keys, &self.options).read_statement();
            let text = match read {
                Ok(text) => text,
                Err(err) => match InputError::find(&err) {
                    Some(InputError::Interrupted) => {
                        debug!(target: "repl", "statement_abandoned");
                        term.new_line()?;
                        continue;
                    }
                    Some(InputError::EndOfInput) => {
                        term.new_line()?;
                        term.flush()?;
                        info!(target: "repl", next_line = self.next_line, "session_end");
                        return Ok(());
                    }
                    None => return Err(err),
                },
            };
            if text.trim().is_empty() {
                continue;
            }
            let first_line = self.claim_lines(&text);
            let outcome = self.evaluator.evaluate(&text, first_line);
            self.report(outcome, term, keys)?;
        }
    }

    /// Evaluate all of `source` as one statement and write the result to `out`.
    /// Breakpoints cannot be answered without a terminal, so they abort.
    pub fn run_batch<W: Write>(&mut self, source: &str, out: &mut W) -> Result<()> {
        if source.trim().is_empty() {
            debug!(target: "repl", "batch_empty");
            return Ok(());
        }
        let first_line = self.claim_lines(source);
        info!(target: "repl", len = source.len(), first_line, "batch_evaluate");
        match self.evaluator.evaluate(source, first_line) {
            Ok(output) => {
                if !output.is_empty() {
                    writeln!(out, "{output}")?;
                }
            }
            Err(diag) => {
                for row in render_diagnostic(&diag) {
                    writeln!(out, "{row}")?;
                }
                if diag.is_breakpoint() {
                    let aborted = self.evaluator.resume(BreakpointAction::Abort);
                    writeln!(out, "aborted: breakpoints need an interactive terminal")?;
                    for row in abort_rows(aborted) {
                        writeln!(out, "{row}")?;
                    }
                } else {
                    log_failure(&diag);
                }
            }
        }
        out.flush()?;
        Ok(())
    }

    fn claim_lines(&mut self, text: &str) -> usize {
        let first = self.next_line;
        let count = text.lines().count().max(1);
        self.next_line += count;
        debug!(target: "repl", first_line = first, lines = count, "statement_submitted");
        first
    }

    fn report<T, K>(
        &mut self,
        mut outcome: Result<String, Diagnostic>,
        term: &mut T,
        keys: &mut K,
    ) -> Result<()>
    where
        T: TerminalHandle,
        K: KeySource,
    {
        loop {
            match outcome {
                Ok(output) => {
                    if !output.is_empty() {
                        term.write_line(&output)?;
                    }
                    break;
                }
                Err(diag) if diag.is_breakpoint() => {
                    write_rows(term, &render_diagnostic(&diag))?;
                    let action = ask_breakpoint_action(term, keys)?;
                    info!(target: "repl", ?action, line = diag.line_number, "breakpoint_resumed");
                    if action == BreakpointAction::Abort {
                        let aborted = self.evaluator.resume(action);
                        term.write_line("aborted")?;
                        write_rows(term, &abort_rows(aborted))?;
                        break;
                    }
                    outcome = self.evaluator.resume(action);
                }
                Err(diag) => {
                    log_failure(&diag);
                    write_rows(term, &render_diagnostic(&diag))?;
                    break;
                }
            }
        }
        term.flush()
    }
}

fn log_failure(diag: &Diagnostic) {
    warn!(
        target: "repl",
        code = diag.code.as_str(),
        line = diag.line_number,
        frames = diag.stack.len(),
        "evaluation_failed"
    );
}

/// Whatever the evaluator reports while discarding a suspended execution.
/// A further breakpoint is meaningless here and only logged.
fn abort_rows(outcome: Result<String, Diagnostic>) -> Vec<String> {
    match outcome {
        Ok(output) if output.is_empty() => Vec::new(),
        Ok(output) => vec![output],
        Err(diag) => {
            log_failure(&diag);
            if diag.is_breakpoint() {
                Vec::new()
            } else {
                render_diagnostic(&diag)
            }
        }
    }
}

fn write_rows<T: TerminalHandle>(term: &mut T, rows: &[String]) -> Result<()> {
    for row in rows {
        term.write_line(row)?;
    }
    Ok(())
}

/// Read keys until one names an action. Esc, Ctrl+C and end of input abort.
fn ask_breakpoint_action<T, K>(term: &mut T, keys: &mut K) -> Result<BreakpointAction>
where
    T: TerminalHandle,
    K: KeySource,
{
    term.write_str(BREAKPOINT_PROMPT)?;
    term.flush()?;
    let action = loop {
        let key = match keys.next_key() {
            Ok(key) => key,
            Err(err) if InputError::find(&err).is_some() => break BreakpointAction::Abort,
            Err(err) => return Err(err),
        };
        match key.code {
            KeyCode::Char(c) => {
                if let Some(action) = BreakpointAction::from_char(c) {
                    term.write_str(c.encode_utf8(&mut [0; 4]))?;
                    break action;
                }
            }
            KeyCode::Esc => break BreakpointAction::Abort,
            _ => {}
        }
    };
    term.new_line()?;
    Ok(action)
}
