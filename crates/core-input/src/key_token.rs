use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event into a normalized `KeyEvent`.
///
/// Returns `None` for key releases and for key codes the editor has no use
/// for (function keys, media keys, lone modifiers).
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if matches!(event.kind, CKeyEventKind::Release) {
        return None;
    }
    let code = map_key_code(&event.code)?;
    let mut mods = map_mods(event.modifiers);
    // Terminals report Shift+Tab as BackTab, usually with SHIFT set as well;
    // the code alone carries the meaning.
    if code == KeyCode::BackTab {
        mods.remove(KeyModifiers::SHIFT);
    }
    Some(KeyEvent { code, mods })
}

/// Convert a crossterm key code into a normalized key code.
pub(crate) fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let code = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::BackTab => KeyCode::BackTab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        _ => return None,
    };
    Some(code)
}

/// Convert crossterm modifier flags into `KeyModifiers` bits.
pub(crate) fn map_mods(m: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    // Some terminals report Option/Meta instead of Alt for word motions.
    if m.intersects(CKeyModifiers::ALT | CKeyModifiers::META) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// Expand bracketed-paste text into the key events typing it would produce.
/// Newlines become Enter so a pasted script flows through line continuation.
pub(crate) fn paste_to_keys(text: &str) -> Vec<KeyEvent> {
    text.chars()
        .filter_map(|c| match c {
            '\r' => None,
            '\n' => Some(KeyEvent::plain(KeyCode::Enter)),
            '\t' => Some(KeyEvent::plain(KeyCode::Tab)),
            c if c.is_control() => None,
            c => Some(KeyEvent::plain(KeyCode::Char(c))),
        })
        .collect()
}
