//! Line editor rendering against the recording terminal.

use core_editor::{ExitReason, LineEditor};
use core_events::{KeyCode, KeyModifiers};
use core_input::{InputError, ScriptedKeys};
use core_terminal::{RecordingTerminal, TermOp, TerminalHandle};
use pretty_assertions::assert_eq;

fn term_with_prompt(width: u16) -> RecordingTerminal {
    let mut term = RecordingTerminal::new(width);
    term.write_str("01>").unwrap();
    term
}

#[test]
fn typed_text_is_rendered_after_prompt() {
    let mut term = term_with_prompt(40);
    let mut keys = ScriptedKeys::default();
    keys.type_text("abc")
        .press(KeyCode::Left)
        .press(KeyCode::Left)
        .type_text("X")
        .press(KeyCode::Enter);

    let (text, reason) = LineEditor::new(&mut term, &mut keys)
        .edit_line("", 2)
        .unwrap();

    assert_eq!(text, "aXbc");
    assert_eq!(reason, ExitReason::Enter);
    assert_eq!(term.row_text(0), "01>aXbc");
    assert_eq!(term.cursor(), (0, 5));
}

#[test]
fn initial_text_is_drawn_with_cursor_at_end() {
    let mut term = term_with_prompt(40);
    let mut keys = ScriptedKeys::default();
    keys.press(KeyCode::Up);

    let (text, reason) = LineEditor::new(&mut term, &mut keys)
        .edit_line("  hi", 2)
        .unwrap();

    assert_eq!((text.as_str(), reason), ("  hi", ExitReason::Up));
    assert_eq!(term.row_text(0), "01>  hi");
    assert_eq!(term.cursor(), (0, 7));
}

#[test]
fn each_redraw_clears_then_writes_then_places_cursor() {
    let mut term = term_with_prompt(40);
    term.take_ops();
    let mut keys = ScriptedKeys::default();
    keys.type_text("a").press(KeyCode::Enter);

    LineEditor::new(&mut term, &mut keys)
        .edit_line("", 2)
        .unwrap();

    assert_eq!(
        term.ops(),
        &[
            // initial draw of the empty buffer
            TermOp::MoveToColumn(3),
            TermOp::ClearToEnd,
            TermOp::MoveToColumn(3),
            TermOp::Flush,
            // after typing 'a'
            TermOp::MoveToColumn(3),
            TermOp::ClearToEnd,
            TermOp::Write("a".into()),
            TermOp::MoveToColumn(4),
            TermOp::Flush,
        ]
    );
}

#[test]
fn wide_characters_move_cursor_two_columns() {
    let mut term = term_with_prompt(40);
    let mut keys = ScriptedKeys::default();
    keys.type_text("漢字").press(KeyCode::Left).press(KeyCode::Enter);

    LineEditor::new(&mut term, &mut keys)
        .edit_line("", 2)
        .unwrap();

    assert_eq!(term.row_text(0), "01>漢字");
    assert_eq!(term.cursor(), (0, 5));
}

#[test]
fn long_lines_are_clipped_and_cursor_clamped() {
    let mut term = term_with_prompt(10);
    let mut keys = ScriptedKeys::default();
    keys.type_text("abcdefghij").press(KeyCode::Enter);

    let (text, _) = LineEditor::new(&mut term, &mut keys)
        .edit_line("", 2)
        .unwrap();

    assert_eq!(text, "abcdefghij");
    assert_eq!(term.row_text(0), "01>abcdefg");
    assert_eq!(term.cursor(), (0, 9));
}

#[test]
fn shift_down_reports_new_line() {
    let mut term = term_with_prompt(40);
    let mut keys = ScriptedKeys::default();
    keys.type_text("x")
        .press_with(KeyCode::Down, KeyModifiers::SHIFT);

    let (_, reason) = LineEditor::new(&mut term, &mut keys)
        .edit_line("", 2)
        .unwrap();
    assert_eq!(reason, ExitReason::NewLine);
}

#[test]
fn editing_keys_compose() {
    let mut term = term_with_prompt(40);
    let mut keys = ScriptedKeys::default();
    keys.type_text("value")
        .press(KeyCode::Home)
        .press(KeyCode::Delete)
        .type_text("V")
        .press(KeyCode::End)
        .press(KeyCode::Backspace)
        .press_with(KeyCode::Left, KeyModifiers::ALT)
        .press(KeyCode::Tab)
        .press(KeyCode::Enter);

    let (text, _) = LineEditor::new(&mut term, &mut keys)
        .edit_line("", 3)
        .unwrap();
    assert_eq!(text, "   Valu");
    assert_eq!(term.row_text(0), "01>   Valu");
    assert_eq!(term.cursor(), (0, 6));
}

#[test]
fn exhausted_input_surfaces_as_error() {
    let mut term = term_with_prompt(40);
    let mut keys = ScriptedKeys::default();
    keys.type_text("partial");

    let err = LineEditor::new(&mut term, &mut keys)
        .edit_line("", 2)
        .unwrap_err();
    assert_eq!(InputError::find(&err), Some(InputError::EndOfInput));
    assert_eq!(term.row_text(0), "01>partial");
}
