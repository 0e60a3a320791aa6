//! Shell around the statement editor: evaluator seam, diagnostics and the
//! interactive / batch session drivers.

pub mod diagnostic;
pub mod evaluator;
pub mod session;

pub use diagnostic::{Diagnostic, StackFrame, render_diagnostic};
pub use evaluator::{BreakpointAction, EchoEvaluator, Evaluator};
pub use session::{BREAKPOINT_PROMPT, Session};
