//! Evaluator diagnostics and their console rendering.

use thiserror::Error;

/// One enclosing call frame of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub name: String,
    pub line: usize,
}

impl StackFrame {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

/// Error reported by an evaluator for a submitted statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub help_link: Option<String>,
    /// Text of the offending source line.
    pub source_line: String,
    /// 1-based line number in session numbering.
    pub line_number: usize,
    /// Innermost frame first.
    pub stack: Vec<StackFrame>,
}

impl Diagnostic {
    /// Code reserved for an intentional breakpoint.
    pub const BREAKPOINT: &'static str = "BREAKPOINT";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            help_link: None,
            source_line: String::new(),
            line_number: 0,
            stack: Vec::new(),
        }
    }

    pub fn breakpoint(line_number: usize, source_line: impl Into<String>) -> Self {
        Self::new(Self::BREAKPOINT, "breakpoint reached").at(line_number, source_line)
    }

    pub fn at(mut self, line_number: usize, source_line: impl Into<String>) -> Self {
        self.line_number = line_number;
        self.source_line = source_line.into();
        self
    }

    pub fn with_help(mut self, link: impl Into<String>) -> Self {
        self.help_link = Some(link.into());
        self
    }

    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.stack.push(frame);
        self
    }

    pub fn is_breakpoint(&self) -> bool {
        self.code == Self::BREAKPOINT
    }
}

/// Rows printed for a diagnostic, in display order.
pub fn render_diagnostic(diag: &Diagnostic) -> Vec<String> {
    let mut rows = Vec::new();
    if diag.is_breakpoint() {
        rows.push(format!("breakpoint at line {}", diag.line_number));
    } else {
        rows.push(format!("error[{}]: {}", diag.code, diag.message));
    }
    if !diag.source_line.is_empty() || diag.line_number > 0 {
        rows.push(format!("{:>4} | {}", diag.line_number, diag.source_line));
    }
    if let Some(link) = &diag.help_link {
        rows.push(format!("help: {link}"));
    }
    for frame in &diag.stack {
        rows.push(format!("  at {} (line {})", frame.name, frame.line));
    }
    rows
}
