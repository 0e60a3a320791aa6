//! Evaluator seam consumed by the session.

use crate::diagnostic::Diagnostic;

/// User choice after a breakpoint suspended execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakpointAction {
    /// Run to the next breakpoint or to the end.
    Continue,
    /// Stop again after the next statement of the suspended unit.
    Step,
    /// Discard the suspended execution.
    Abort,
}

impl BreakpointAction {
    /// Key binding used by the breakpoint prompt.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'c' => Some(Self::Continue),
            's' => Some(Self::Step),
            'a' => Some(Self::Abort),
            _ => None,
        }
    }
}

pub trait Evaluator {
    /// Evaluate one complete statement. `first_line` is the session line
    /// number of the statement's first line, for diagnostics.
    fn evaluate(&mut self, source: &str, first_line: usize) -> Result<String, Diagnostic>;

    /// Resume after a breakpoint diagnostic. Another breakpoint diagnostic
    /// means execution is suspended again.
    fn resume(&mut self, _action: BreakpointAction) -> Result<String, Diagnostic> {
        Ok(String::new())
    }
}

/// Prints back what was entered.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoEvaluator;

impl Evaluator for EchoEvaluator {
    fn evaluate(&mut self, source: &str, _first_line: usize) -> Result<String, Diagnostic> {
        Ok(format!("entered script:\n{source}"))
    }
}
