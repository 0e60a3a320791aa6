//! Word-wise cursor motion helpers.
//!
//! These operate purely on a char slice + cursor offset pair and are free of
//! editor state, so the line editor and tests can share them.

/// Characters treated as token separators by word-wise motion.
pub const TOKEN_SEPARATORS: &[char] = &[
    ' ', '\t', '.', ',', ';', ':', '(', ')', '{', '}', '[', ']', '<', '>', '+', '-', '*', '/',
    '=', '!', '&', '|', '^', '%', '~', '?', '"', '\'', '`', '@', '#', '$', '\\',
];

#[inline]
pub fn is_separator(c: char) -> bool {
    TOKEN_SEPARATORS.contains(&c)
}

/// Cursor after jumping left to the start of the previous token: one past the
/// nearest separator strictly before the character left of the cursor, or 0.
pub fn word_left(chars: &[char], cursor: usize) -> usize {
    let cursor = cursor.min(chars.len());
    if cursor <= 1 {
        return 0;
    }
    match chars[..cursor - 1].iter().rposition(|&c| is_separator(c)) {
        Some(idx) => idx + 1,
        None => 0,
    }
}

/// Cursor after jumping right onto the next separator after the cursor, or to
/// the end of the buffer when none follows.
pub fn word_right(chars: &[char], cursor: usize) -> usize {
    let len = chars.len();
    if cursor >= len {
        return len;
    }
    match chars[cursor + 1..].iter().position(|&c| is_separator(c)) {
        Some(idx) => cursor + 1 + idx,
        None => len,
    }
}
