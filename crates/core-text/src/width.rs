//! Display width engine.
//!
//! Every column decision made by the line editor flows through this module:
//! a character is either single width (1 column) or double width (2 columns)
//! when its code point falls in one of the fullwidth / CJK / Hangul ranges
//! listed in `WIDE_RANGES`.
//!
//! Invariants:
//! - Widths are per `char`; the editor buffer is a sequence of chars and the
//!   cursor is a char offset, so no grapheme segmentation happens here.
//! - `WIDE_RANGES` stays sorted and non-overlapping (checked by a test) so the
//!   lookup can binary search.
//! - Over-estimation is preferred: a cell too many leaves a blank, a cell too
//!   few makes the cursor drift.

/// Inclusive code point ranges rendered at double width.
const WIDE_RANGES: &[(char, char)] = &[
    // Hangul Jamo (leading consonants)
    ('\u{1100}', '\u{115F}'),
    // CJK Radicals Supplement .. CJK Symbols and Punctuation
    ('\u{2E80}', '\u{303E}'),
    // Hiragana, Katakana, Bopomofo, Hangul Compatibility Jamo .. CJK Compatibility
    ('\u{3041}', '\u{33FF}'),
    // CJK Unified Ideographs Extension A
    ('\u{3400}', '\u{4DBF}'),
    // CJK Unified Ideographs, Yi Syllables and Radicals
    ('\u{4E00}', '\u{A4CF}'),
    // Hangul Jamo Extended-A
    ('\u{A960}', '\u{A97C}'),
    // Hangul Syllables
    ('\u{AC00}', '\u{D7A3}'),
    // CJK Compatibility Ideographs
    ('\u{F900}', '\u{FAFF}'),
    // Vertical Forms
    ('\u{FE10}', '\u{FE19}'),
    // CJK Compatibility Forms, Small Form Variants
    ('\u{FE30}', '\u{FE6F}'),
    // Fullwidth ASCII variants and punctuation
    ('\u{FF00}', '\u{FF60}'),
    // Fullwidth signs
    ('\u{FFE0}', '\u{FFE6}'),
    // CJK Unified Ideographs Extension B and later (SIP)
    ('\u{20000}', '\u{2FFFD}'),
    // Tertiary Ideographic Plane
    ('\u{30000}', '\u{3FFFD}'),
];

/// True when `c` renders at double width.
pub fn is_wide(c: char) -> bool {
    WIDE_RANGES
        .binary_search_by(|&(lo, hi)| {
            if hi < c {
                core::cmp::Ordering::Less
            } else if lo > c {
                core::cmp::Ordering::Greater
            } else {
                core::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Column width of a single character (1 or 2).
#[inline]
pub fn char_width(c: char) -> usize {
    if is_wide(c) { 2 } else { 1 }
}

/// Total column width of `text`.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Column offset of the character at `char_index` within `text`.
///
/// Indices past the end saturate at the full width of `text`.
pub fn display_offset(text: &str, char_index: usize) -> usize {
    text.chars().take(char_index).map(char_width).sum()
}

/// Column offset for a char slice (the editor buffer representation).
pub fn chars_offset(chars: &[char], char_index: usize) -> usize {
    chars
        .iter()
        .take(char_index)
        .copied()
        .map(char_width)
        .sum()
}

/// Longest prefix of `chars` fitting in `max_cols` columns.
///
/// A wide character straddling the boundary is dropped entirely rather than
/// split.
pub fn clip_to_width(chars: &[char], max_cols: usize) -> &[char] {
    let mut used = 0usize;
    for (i, &c) in chars.iter().enumerate() {
        let w = char_width(c);
        if used + w > max_cols {
            return &chars[..i];
        }
        used += w;
    }
    chars
}
