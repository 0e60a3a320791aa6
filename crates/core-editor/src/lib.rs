//! Line editing engine and multi-line continuation detection.

pub mod accumulator;
pub mod line_editor;

pub use accumulator::{
    Accumulator, IndentContext, LineList, PromptStyle, RowMove, Statement, StatementOptions, Step,
};
pub use line_editor::{ExitReason, KeyOutcome, LineEditor, apply_key};
