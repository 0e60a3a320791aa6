//! Session behavior with scripted keys, a recording terminal and a fake evaluator.

use anyhow::Result;
use core_config::Config;
use core_editor::StatementOptions;
use core_events::{KeyCode, KeyEvent};
use core_input::{InputError, KeySource, ScriptedKeys};
use core_repl::{
    BREAKPOINT_PROMPT, BreakpointAction, Diagnostic, EchoEvaluator, Evaluator, Session, StackFrame,
};
use core_terminal::RecordingTerminal;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;

#[derive(Default)]
struct FakeEvaluator {
    calls: Vec<(String, usize)>,
    replies: VecDeque<Result<String, Diagnostic>>,
    resumes: Vec<BreakpointAction>,
    resume_replies: VecDeque<Result<String, Diagnostic>>,
}

impl FakeEvaluator {
    fn replying(replies: Vec<Result<String, Diagnostic>>) -> Self {
        Self {
            replies: replies.into(),
            ..Self::default()
        }
    }

    fn then_resume(mut self, replies: Vec<Result<String, Diagnostic>>) -> Self {
        self.resume_replies = replies.into();
        self
    }
}

impl Evaluator for FakeEvaluator {
    fn evaluate(&mut self, source: &str, first_line: usize) -> Result<String, Diagnostic> {
        self.calls.push((source.to_string(), first_line));
        self.replies.pop_front().unwrap_or_else(|| Ok(String::new()))
    }

    fn resume(&mut self, action: BreakpointAction) -> Result<String, Diagnostic> {
        self.resumes.push(action);
        self.resume_replies
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Reports Ctrl+C after `after` keys, then keeps replaying.
struct InterruptingKeys {
    keys: ScriptedKeys,
    after: Option<usize>,
}

impl KeySource for InterruptingKeys {
    fn next_key(&mut self) -> Result<KeyEvent> {
        match self.after {
            Some(0) => {
                self.after = None;
                Err(InputError::Interrupted.into())
            }
            Some(n) => {
                self.after = Some(n - 1);
                self.keys.next_key()
            }
            None => self.keys.next_key(),
        }
    }
}

fn run<E: Evaluator>(session: &mut Session<E>, keys: &mut impl KeySource) -> RecordingTerminal {
    let mut term = RecordingTerminal::new(60);
    session
        .run_interactive(&mut term, keys)
        .expect("session ends cleanly at end of input");
    term
}

#[test]
fn echo_session_prints_entered_script() {
    let mut session = Session::new(EchoEvaluator, StatementOptions::default());
    let mut keys = ScriptedKeys::default();
    keys.line("x = 1");

    let term = run(&mut session, &mut keys);

    assert_eq!(
        term.screen(),
        vec!["01>x = 1", "entered script:", "x = 1", "01>", ""]
    );
}

#[test]
fn first_line_numbers_keep_increasing() {
    let mut session = Session::new(FakeEvaluator::default(), StatementOptions::default());
    let mut keys = ScriptedKeys::default();
    keys.line("a(").line("1)").line("b");

    run(&mut session, &mut keys);

    assert_eq!(
        session.evaluator().calls,
        vec![("a(\n1)".to_string(), 1), ("b".to_string(), 3)]
    );
    assert_eq!(session.next_line(), 4);
}

#[test]
fn empty_statements_are_not_evaluated() {
    let mut session = Session::new(FakeEvaluator::default(), StatementOptions::default());
    let mut keys = ScriptedKeys::default();
    keys.press(KeyCode::Enter).line("   ").line("go");

    run(&mut session, &mut keys);

    assert_eq!(session.evaluator().calls, vec![("go".to_string(), 1)]);
}

#[test]
fn diagnostics_are_printed_and_prompting_resumes() {
    let failure = Diagnostic::new("E1", "failed")
        .at(1, "boom()")
        .with_help("https://example.invalid/E1")
        .with_frame(StackFrame::new("boom", 1));
    let evaluator = FakeEvaluator::replying(vec![Err(failure), Ok("fine".into())]);
    let mut session = Session::new(evaluator, StatementOptions::default());
    let mut keys = ScriptedKeys::default();
    keys.line("boom()").line("ok()");

    let term = run(&mut session, &mut keys);

    assert_eq!(
        term.screen(),
        vec![
            "01>boom()",
            "error[E1]: failed",
            "   1 | boom()",
            "help: https://example.invalid/E1",
            "  at boom (line 1)",
            "01>ok()",
            "fine",
            "01>",
            "",
        ]
    );
    assert_eq!(session.evaluator().calls.len(), 2);
}

#[test]
fn breakpoint_continue() {
    let evaluator = FakeEvaluator::replying(vec![Err(Diagnostic::breakpoint(1, "stop()"))])
        .then_resume(vec![Ok("done".into())]);
    let mut session = Session::new(evaluator, StatementOptions::default());
    let mut keys = ScriptedKeys::default();
    // 'x' is not an action and is ignored
    keys.line("stop()").type_text("xc");

    let term = run(&mut session, &mut keys);

    let prompt_row = format!("{BREAKPOINT_PROMPT}c");
    assert_eq!(session.evaluator().resumes, vec![BreakpointAction::Continue]);
    assert_eq!(
        term.screen(),
        vec![
            "01>stop()",
            "breakpoint at line 1",
            "   1 | stop()",
            prompt_row.as_str(),
            "done",
            "01>",
            "",
        ]
    );
}

#[test]
fn breakpoint_step_then_abort() {
    let evaluator = FakeEvaluator::replying(vec![Err(Diagnostic::breakpoint(1, "stop()"))])
        .then_resume(vec![Err(Diagnostic::breakpoint(2, "next()"))]);
    let mut session = Session::new(evaluator, StatementOptions::default());
    let mut keys = ScriptedKeys::default();
    keys.line("stop()").type_text("sa");

    let term = run(&mut session, &mut keys);

    assert_eq!(
        session.evaluator().resumes,
        vec![BreakpointAction::Step, BreakpointAction::Abort]
    );
    let screen = term.screen();
    assert!(screen.iter().any(|row| row == "breakpoint at line 2"));
    assert!(screen.iter().any(|row| row == "aborted"));
}

#[test]
fn abort_reports_evaluator_failure() {
    let evaluator = FakeEvaluator::replying(vec![Err(Diagnostic::breakpoint(1, "stop()"))])
        .then_resume(vec![Err(Diagnostic::new("E9", "cleanup failed"))]);
    let mut session = Session::new(evaluator, StatementOptions::default());
    let mut keys = ScriptedKeys::default();
    keys.line("stop()").type_text("a");

    let term = run(&mut session, &mut keys);

    let screen = term.screen();
    let aborted = screen.iter().position(|row| row == "aborted").unwrap();
    assert_eq!(screen[aborted + 1], "error[E9]: cleanup failed");
}

#[test]
fn end_of_input_at_breakpoint_aborts() {
    let evaluator = FakeEvaluator::replying(vec![Err(Diagnostic::breakpoint(1, "stop()"))]);
    let mut session = Session::new(evaluator, StatementOptions::default());
    let mut keys = ScriptedKeys::default();
    keys.line("stop()");

    run(&mut session, &mut keys);

    assert_eq!(session.evaluator().resumes, vec![BreakpointAction::Abort]);
}

#[test]
fn interrupt_abandons_current_statement() {
    let mut scripted = ScriptedKeys::default();
    scripted.type_text("abc(").line("d");
    let mut keys = InterruptingKeys {
        keys: scripted,
        after: Some(4),
    };
    let mut session = Session::new(FakeEvaluator::default(), StatementOptions::default());

    let term = run(&mut session, &mut keys);

    assert_eq!(session.evaluator().calls, vec![("d".to_string(), 1)]);
    assert_eq!(term.screen()[..2], ["01>abc(", "01>d"]);
}

#[test]
fn interrupt_after_moving_up_keeps_rows_below() {
    let mut scripted = ScriptedKeys::default();
    scripted
        .line("f(")
        .line("a,")
        .type_text("b")
        .press(KeyCode::Up)
        .press(KeyCode::Up)
        .line("go");
    let mut keys = InterruptingKeys {
        keys: scripted,
        after: Some(9),
    };
    let mut session = Session::new(EchoEvaluator, StatementOptions::default());

    let term = run(&mut session, &mut keys);

    assert_eq!(
        term.screen(),
        vec![
            "01>f(",
            "02>a,",
            "03>b",
            "01>go",
            "entered script:",
            "go",
            "01>",
            "",
        ]
    );
}

#[test]
fn banner_comes_from_config() {
    let mut session = Session::from_config(FakeEvaluator::default(), &Config::default());
    let mut keys = ScriptedKeys::default();

    let term = run(&mut session, &mut keys);

    let banner = session.banner_rows();
    assert_eq!(term.screen()[..3], banner);
    assert_eq!(term.row_text(3), "01>");
}

#[test]
fn batch_evaluates_whole_input_once() {
    let mut session = Session::new(EchoEvaluator, StatementOptions::default());
    let mut out = Vec::new();

    session.run_batch("a {\nb", &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "entered script:\na {\nb\n");
    assert_eq!(session.next_line(), 3);
}

#[test]
fn batch_breakpoint_aborts_and_reports() {
    let evaluator = FakeEvaluator::replying(vec![Err(Diagnostic::breakpoint(1, "stop()"))]);
    let mut session = Session::new(evaluator, StatementOptions::default());
    let mut out = Vec::new();

    session.run_batch("stop()\n", &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("breakpoint at line 1\n   1 | stop()\n"));
    assert!(text.ends_with("aborted: breakpoints need an interactive terminal\n"));
    assert_eq!(session.evaluator().resumes, vec![BreakpointAction::Abort]);
}

#[test]
fn batch_abort_output_is_printed() {
    let evaluator = FakeEvaluator::replying(vec![Err(Diagnostic::breakpoint(1, "stop()"))])
        .then_resume(vec![Ok("partial result".into())]);
    let mut session = Session::new(evaluator, StatementOptions::default());
    let mut out = Vec::new();

    session.run_batch("stop()", &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("aborted: breakpoints need an interactive terminal\npartial result\n"));
}

#[test]
fn batch_skips_blank_input() {
    let mut session = Session::new(FakeEvaluator::default(), StatementOptions::default());
    let mut out = Vec::new();
    session.run_batch(" \n\n", &mut out).unwrap();
    assert!(out.is_empty());
    assert!(session.evaluator().calls.is_empty());
}
