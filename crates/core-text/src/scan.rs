//! Continuation scanner.
//!
//! Computes the net bracket nesting change a single line contributes while
//! ignoring bracket characters that appear inside string literals, line
//! comments (`// ...`) or block comments (`/* ... */`).
//!
//! The scanner is a small left-to-right state machine with one character of
//! lookahead. It never fails: an unterminated string or comment simply leaves
//! the state as it was at the end of the line. Callers that want string and
//! block-comment state to flow into the next line pass the same `ScanState`
//! to `bracket_delta_from`; `bracket_delta` always starts from a fresh state.

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Transient lexical state of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    pub in_string: bool,
    pub in_block_comment: bool,
    pub in_line_comment: bool,
    /// Previous character inside a string was an unescaped backslash.
    pub escaped: bool,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State to carry into the following line: line comments and pending
    /// escapes end at the newline, strings and block comments do not.
    pub fn at_next_line(self) -> Self {
        Self {
            in_line_comment: false,
            escaped: false,
            ..self
        }
    }

    /// Inside any construct that suppresses bracket counting.
    pub fn is_suppressed(&self) -> bool {
        self.in_string || self.in_block_comment || self.in_line_comment
    }
}

/// Net nesting change of `line` for the `open`/`close` pair, from a fresh state.
pub fn bracket_delta(line: &str, open: char, close: char) -> i32 {
    let mut state = ScanState::new();
    bracket_delta_from(line, open, close, &mut state)
}

/// Net nesting change of `line` starting from (and updating) `state`.
pub fn bracket_delta_from(line: &str, open: char, close: char, state: &mut ScanState) -> i32 {
    let chars: Vec<char> = line.chars().collect();
    let mut delta = 0i32;
    let mut i = 0usize;
    while i < chars.len() {
        if state.in_line_comment {
            break;
        }
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if state.in_block_comment {
            if c == '*' && next == Some('/') {
                state.in_block_comment = false;
                i += 2;
                continue;
            }
            i += 1;
            continue;
        }

        if state.in_string {
            if state.escaped {
                state.escaped = false;
            } else if c == '\\' {
                state.escaped = true;
            } else if c == '"' {
                state.in_string = false;
            }
            i += 1;
            continue;
        }

        if c == '"' {
            state.in_string = true;
            i += 1;
            continue;
        }

        if c == '/' && next == Some('*') {
            state.in_block_comment = true;
            i += 2;
            continue;
        }
        if c == '/' && next == Some('/') {
            state.in_line_comment = true;
            break;
        }

        if c == open {
            delta += 1;
        } else if c == close {
            delta -= 1;
        }
        i += 1;
    }
    delta
}

/// The three bracket kinds tracked for continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Curly,
    Square,
    Round,
}

impl BracketKind {
    pub const ALL: [BracketKind; 3] = [BracketKind::Curly, BracketKind::Square, BracketKind::Round];

    pub const fn pair(self) -> (char, char) {
        match self {
            BracketKind::Curly => ('{', '}'),
            BracketKind::Square => ('[', ']'),
            BracketKind::Round => ('(', ')'),
        }
    }
}

/// Per-kind nesting depth (or delta) for curly, square and round brackets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nesting {
    pub curly: i32,
    pub square: i32,
    pub round: i32,
}

impl Nesting {
    pub const ZERO: Nesting = Nesting {
        curly: 0,
        square: 0,
        round: 0,
    };

    pub const fn new(curly: i32, square: i32, round: i32) -> Self {
        Self {
            curly,
            square,
            round,
        }
    }

    /// Deltas of one line, each kind scanned from a fresh state.
    pub fn of_line(line: &str) -> Self {
        let mut state = ScanState::new();
        Self::of_line_from(line, &mut state)
    }

    /// Deltas of one line starting from `state`; `state` is left at the
    /// end-of-line state (identical for every kind).
    pub fn of_line_from(line: &str, state: &mut ScanState) -> Self {
        let start = *state;
        let mut out = Nesting::ZERO;
        let mut end = start;
        for kind in BracketKind::ALL {
            let (open, close) = kind.pair();
            let mut s = start;
            let d = bracket_delta_from(line, open, close, &mut s);
            *out.get_mut(kind) = d;
            end = s;
        }
        *state = end;
        out
    }

    pub fn get(&self, kind: BracketKind) -> i32 {
        match kind {
            BracketKind::Curly => self.curly,
            BracketKind::Square => self.square,
            BracketKind::Round => self.round,
        }
    }

    fn get_mut(&mut self, kind: BracketKind) -> &mut i32 {
        match kind {
            BracketKind::Curly => &mut self.curly,
            BracketKind::Square => &mut self.square,
            BracketKind::Round => &mut self.round,
        }
    }

    /// All three kinds are exactly zero.
    pub fn is_balanced(&self) -> bool {
        *self == Nesting::ZERO
    }
}

impl Add for Nesting {
    type Output = Nesting;
    fn add(self, rhs: Nesting) -> Nesting {
        Nesting::new(
            self.curly + rhs.curly,
            self.square + rhs.square,
            self.round + rhs.round,
        )
    }
}

impl Sub for Nesting {
    type Output = Nesting;
    fn sub(self, rhs: Nesting) -> Nesting {
        self + -rhs
    }
}

impl Neg for Nesting {
    type Output = Nesting;
    fn neg(self) -> Nesting {
        Nesting::new(-self.curly, -self.square, -self.round)
    }
}

impl AddAssign for Nesting {
    fn add_assign(&mut self, rhs: Nesting) {
        *self = *self + rhs;
    }
}

impl SubAssign for Nesting {
    fn sub_assign(&mut self, rhs: Nesting) {
        *self = *self - rhs;
    }
}

impl core::iter::Sum for Nesting {
    fn sum<I: Iterator<Item = Nesting>>(iter: I) -> Nesting {
        iter.fold(Nesting::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_pairs_on_one_line_balance() {
        let n = Nesting::of_line("{ a[ (1,2) ] }");
        assert_eq!(n, Nesting::ZERO);
    }

    #[test]
    fn opening_block_counts() {
        let n = Nesting::of_line("if (x > 1) {");
        assert_eq!(n, Nesting::new(1, 0, 0));
    }

    #[test]
    fn line_comment_suppresses_rest() {
        assert_eq!(Nesting::of_line("// { [ ("), Nesting::ZERO);
        assert_eq!(Nesting::of_line("f( // )"), Nesting::new(0, 0, 1));
    }

    #[test]
    fn brace_inside_string_ignored() {
        assert_eq!(bracket_delta(r#""he said \"{\" ""#, '{', '}'), 0);
        assert_eq!(bracket_delta(r#"print("}")"#, '{', '}'), 0);
    }

    #[test]
    fn escaped_backslash_does_not_escape_quote() {
        // "\\" closes the string, so the brace after it counts.
        assert_eq!(bracket_delta(r#""\\" {"#, '{', '}'), 1);
    }

    #[test]
    fn backslash_outside_string_is_plain_text() {
        assert_eq!(bracket_delta(r"path = a \(", '(', ')'), 1);
        assert_eq!(bracket_delta(r"\{ \}", '{', '}'), 0);
        let mut state = ScanState::new();
        bracket_delta_from(r"x \", '(', ')', &mut state);
        assert!(!state.escaped);
    }

    #[test]
    fn block_comment_hides_brackets() {
        assert_eq!(bracket_delta("a /* { */ {", '{', '}'), 1);
        assert_eq!(bracket_delta("/* ( ( */ )", '(', ')'), -1);
    }

    #[test]
    fn comment_markers_inside_string_are_text() {
        assert_eq!(bracket_delta(r#"s = "//" + ("#, '(', ')'), 1);
        assert_eq!(bracket_delta(r#"s = "/*" + ("#, '(', ')'), 1);
    }

    #[test]
    fn string_delimiter_inside_comment_is_text() {
        assert_eq!(bracket_delta(r#"/* " */ {"#, '{', '}'), 1);
    }

    #[test]
    fn delta_may_go_negative() {
        assert_eq!(Nesting::of_line("}))"), Nesting::new(-1, 0, -2));
    }

    #[test]
    fn unterminated_string_just_ends() {
        assert_eq!(bracket_delta(r#"x = "{"#, '{', '}'), 0);
    }

    #[test]
    fn fresh_scan_forgets_open_block_comment() {
        assert_eq!(Nesting::of_line("/* {"), Nesting::ZERO);
        assert_eq!(Nesting::of_line("} */"), Nesting::new(-1, 0, 0));
    }

    #[test]
    fn carried_state_tracks_block_comment_across_lines() {
        let mut state = ScanState::new();
        assert_eq!(Nesting::of_line_from("/* {", &mut state), Nesting::ZERO);
        assert!(state.in_block_comment);
        state = state.at_next_line();
        assert_eq!(Nesting::of_line_from("} */ (", &mut state), Nesting::new(0, 0, 1));
        assert!(!state.in_block_comment);
    }

    #[test]
    fn next_line_drops_line_comment_and_escape() {
        let mut state = ScanState::new();
        Nesting::of_line_from("x // note", &mut state);
        assert!(state.in_line_comment);
        let next = state.at_next_line();
        assert!(!next.is_suppressed());
    }

    #[test]
    fn nesting_arithmetic() {
        let a = Nesting::new(1, 2, 3);
        let b = Nesting::new(1, 1, 1);
        assert_eq!(a - b, Nesting::new(0, 1, 2));
        let mut c = a;
        c -= a;
        assert!(c.is_balanced());
        let total: Nesting = [a, b, -a].into_iter().sum();
        assert_eq!(total, b);
    }
}
