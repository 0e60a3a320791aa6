//! Core key event types for harp.
//!
//! Input backends translate their native events into these normalized forms;
//! the line editor only ever sees `KeyEvent`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Key without modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn is_shift(&self) -> bool {
        self.mods.contains(KeyModifiers::SHIFT)
    }

    pub fn is_alt(&self) -> bool {
        self.mods.contains(KeyModifiers::ALT)
    }

    pub fn is_ctrl(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }

    /// Printable character this key inserts, if any. Control and Alt chords
    /// never insert text; Shift is already folded into the char.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !c.is_control() && !self.is_ctrl() && !self.is_alt() => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// KeyCode enumerates normalized logical key representations consumed by the editor.
/// Shift+Tab arrives as `BackTab` (terminals report it as a distinct key).
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

impl KeyCode {
    /// Discriminant name safe for logging (never includes the typed char).
    pub fn kind(&self) -> &'static str {
        match self {
            KeyCode::Char(_) => "char",
            KeyCode::Enter => "enter",
            KeyCode::Esc => "esc",
            KeyCode::Backspace => "backspace",
            KeyCode::Delete => "delete",
            KeyCode::Tab => "tab",
            KeyCode::BackTab => "backtab",
            KeyCode::Up => "up",
            KeyCode::Down => "down",
            KeyCode::Left => "left",
            KeyCode::Right => "right",
            KeyCode::Home => "home",
            KeyCode::End => "end",
        }
    }
}
