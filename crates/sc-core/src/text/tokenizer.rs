//! Whitespace- and quote-aware splitting of a single configuration line.
//!
//! # How a line is split (for beginners)
//!
//! ```text
//! macro  A  LCTRL -SHIFT   # comment
//! └───┘  └┘ └───┘ └────┘   └────────── stripped before splitting
//! ```
//!
//! 1. Everything from the first `#` onward is a comment and is dropped, even
//!    when the `#` appears inside quotes.
//! 2. Tokens are separated by runs of whitespace.
//! 3. A token that starts with `"` runs to the next `"`; the returned token is
//!    the text between the quotes, so `include "my file.sc"` yields
//!    `my file.sc`.
//!
//! An unterminated quote is not an error: the token simply runs to the end of
//! the line.  Existing configuration files rely on this.
//!
//! The tokenizer borrows the line and hands out `&str` slices of it, so
//! splitting never allocates.

/// Character that starts a comment.
pub const COMMENT_CHAR: char = '#';

const QUOTE: char = '"';

/// Cursor over the tokens of one line.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over `line` with any trailing comment removed.
    pub fn new(line: &'a str) -> Self {
        let body = match line.find(COMMENT_CHAR) {
            Some(pos) => &line[..pos],
            None => line,
        };
        Tokenizer { rest: body }
    }

    /// Returns the next token without consuming it.
    pub fn peek(&self) -> Option<&'a str> {
        split_token(self.rest).map(|(token, _)| token)
    }

    /// Consumes and returns the next token.
    pub fn advance(&mut self) -> Option<&'a str> {
        let (token, rest) = split_token(self.rest)?;
        self.rest = rest;
        Some(token)
    }

    /// `true` when no tokens remain.
    pub fn is_empty(&self) -> bool {
        self.rest.trim_start().is_empty()
    }

    /// The unconsumed part of the line, leading whitespace removed.
    pub fn remainder(&self) -> &'a str {
        self.rest.trim_start()
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.advance()
    }
}

/// Splits the first token off `input`, returning `(token, rest)`.
fn split_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }

    if let Some(quoted) = input.strip_prefix(QUOTE) {
        return Some(match quoted.find(QUOTE) {
            Some(end) => (&quoted[..end], &quoted[end + QUOTE.len_utf8()..]),
            None => (quoted, ""),
        });
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Some((&input[..end], &input[end..]))
}
