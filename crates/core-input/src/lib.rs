//! Blocking key input sources.
//!
//! The editor pulls one key at a time through the `KeySource` trait. The
//! crossterm implementation blocks on the terminal; `ScriptedKeys` replays a
//! fixed sequence and is what tests drive the editor with.

mod key_token;

use anyhow::Result;
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{self, Event as CEvent};
use std::collections::VecDeque;
use thiserror::Error;

/// Conditions that end input instead of producing a key.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// Ctrl+C in the terminal.
    #[error("input interrupted")]
    Interrupted,
    /// Ctrl+D in the terminal, or a scripted source ran dry.
    #[error("end of input")]
    EndOfInput,
}

impl InputError {
    /// Find an `InputError` anywhere in an `anyhow` chain.
    pub fn find(err: &anyhow::Error) -> Option<InputError> {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<InputError>().copied())
    }
}

/// A source of key presses. `next_key` blocks until a key is available.
pub trait KeySource {
    fn next_key(&mut self) -> Result<KeyEvent>;
}

#[inline]
pub(crate) fn log_paste(text: &str) {
    tracing::trace!(target: "input.paste", size_bytes = text.len(), "paste_expand");
}

/// Key source reading the controlling terminal through crossterm.
///
/// Expects raw mode to be enabled by the caller.
#[derive(Debug, Default)]
pub struct CrosstermKeys {
    pending: VecDeque<KeyEvent>,
}

impl CrosstermKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for CrosstermKeys {
    fn next_key(&mut self) -> Result<KeyEvent> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Ok(key);
            }
            match event::read()? {
                CEvent::Key(raw) => {
                    let Some(key) = key_token::map_key_event(&raw) else {
                        continue;
                    };
                    if key.mods.contains(KeyModifiers::CTRL) {
                        match key.code {
                            KeyCode::Char('c') | KeyCode::Char('C') => {
                                tracing::debug!(target: "input", "interrupt");
                                return Err(InputError::Interrupted.into());
                            }
                            KeyCode::Char('d') | KeyCode::Char('D') => {
                                tracing::debug!(target: "input", "end_of_input");
                                return Err(InputError::EndOfInput.into());
                            }
                            _ => {}
                        }
                    }
                    tracing::trace!(target: "input", key = key.code.kind(), "key");
                    return Ok(key);
                }
                CEvent::Paste(text) => {
                    log_paste(&text);
                    self.pending.extend(key_token::paste_to_keys(&text));
                }
                // Resize, focus and mouse events do not affect the line being edited.
                _ => {}
            }
        }
    }
}

/// Replays a fixed key sequence, then reports `EndOfInput`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<KeyEvent>,
}

impl ScriptedKeys {
    pub fn new<I: IntoIterator<Item = KeyEvent>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Queue the chars of `text` as plain key presses.
    pub fn type_text(&mut self, text: &str) -> &mut Self {
        self.keys
            .extend(text.chars().map(|c| KeyEvent::plain(KeyCode::Char(c))));
        self
    }

    pub fn press(&mut self, code: KeyCode) -> &mut Self {
        self.keys.push_back(KeyEvent::plain(code));
        self
    }

    pub fn press_with(&mut self, code: KeyCode, mods: KeyModifiers) -> &mut Self {
        self.keys.push_back(KeyEvent::new(code, mods));
        self
    }

    /// Type `text` followed by Enter.
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.type_text(text).press(KeyCode::Enter)
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Result<KeyEvent> {
        self.keys
            .pop_front()
            .ok_or_else(|| InputError::EndOfInput.into())
    }
}
