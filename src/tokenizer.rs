//! The internal, byte-based tokenizer (lexer) for PHP array literals.
//!
//! It consumes the raw input `&str` (as `&[u8]`) and produces a stream of
//! `Token`s. Whitespace and comments (`#`, `//`, `/* */`) are skipped.
//! It is *not* part of the public API.

use crate::error::ParseError;
use crate::token::{Token, TokenType};
use memchr::{memchr, memchr2, memchr_iter, memmem, memrchr};
use tracing::trace;

// --- The Lookup Table (LUT) ---
// One lookup classifies any byte.
pub(crate) const W: u8 = 1; // Whitespace
pub(crate) const S: u8 = 2; // Structural
pub(crate) const I: u8 = 3; // Identifier start
pub(crate) const D: u8 = 4; // Digit (and '-')
pub(crate) const Q: u8 = 5; // Quote
pub(crate) const C: u8 = 6; // Comment start ('#' or '/')
pub(crate) const E: u8 = 7; // '=' (start of '=>')

static BYTE_PROPERTIES: [u8; 256] = {
    let mut table = [0; 256];
    // 1: Whitespace
    table[b' ' as usize] = W;
    table[b'\n' as usize] = W;
    table[b'\r' as usize] = W;
    table[b'\t' as usize] = W;
    table[0x0B] = W;
    table[0x0C] = W;

    // 2: Structural
    table[b'[' as usize] = S;
    table[b']' as usize] = S;
    table[b'(' as usize] = S;
    table[b')' as usize] = S;
    table[b',' as usize] = S;
    table[b';' as usize] = S;

    // 3: Identifier start
    let mut b = b'a';
    while b <= b'z' {
        table[b as usize] = I;
        table[(b - 32) as usize] = I;
        b += 1;
    }
    table[b'_' as usize] = I;

    // 4: Digit (and '-')
    let mut d = b'0';
    while d <= b'9' {
        table[d as usize] = D;
        d += 1;
    }
    table[b'-' as usize] = D;

    // 5: Quote
    table[b'\'' as usize] = Q;
    table[b'"' as usize] = Q;

    // 6: Comment
    table[b'#' as usize] = C;
    table[b'/' as usize] = C;

    // 7: Arrow
    table[b'=' as usize] = E;

    // 0: Everything else is unrecognized
    table
};

/// The 1-indexed line and column of byte `offset` in `text`.
pub(crate) fn position_of(text: &str, offset: usize) -> (usize, usize) {
    let before = &text.as_bytes()[..offset];
    match memrchr(b'\n', before) {
        Some(last) => (
            1 + memchr_iter(b'\n', before).count(),
            1 + count_chars(&before[last + 1..]),
        ),
        None => (1, 1 + count_chars(before)),
    }
}

/// Number of characters (not bytes) in a UTF-8 byte slice.
#[inline]
fn count_chars(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b & 0xC0 != 0x80).count()
}

#[inline]
fn is_identifier_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'\\'
}

// --- Tokenizer ---

/// The internal tokenizer (lexer).
///
/// In permissive mode (the default) an unrecognized character, including a
/// bare `=`, is skipped one character at a time. In strict mode it is an
/// error.
pub(crate) struct Tokenizer<'a> {
    /// The input, kept as `&str` to decode skipped characters.
    input: &'a str,
    /// The raw byte view of `input`.
    bytes: &'a [u8],
    /// The current position (index) in the `bytes` slice.
    cursor: usize,
    /// The current line number (1-indexed) for error reporting.
    line: usize,
    /// The current column number (1-indexed, in characters).
    column: usize,
    /// Reject unrecognized characters instead of skipping them.
    strict: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new `Tokenizer` whose first character sits at `start`
    /// (line, column) of the caller's source.
    pub(crate) fn starting_at(input: &'a str, strict: bool, start: (usize, usize)) -> Self {
        Tokenizer {
            input,
            bytes: input.as_bytes(),
            cursor: 0,
            line: start.0,
            column: start.1,
            strict,
        }
    }

    /// The current line and column. Once the iterator is exhausted this is
    /// the end-of-input position.
    pub(crate) fn location(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Moves the cursor to `target`, updating line/col for everything skipped.
    #[inline]
    fn advance_to(&mut self, target: usize) {
        let skipped = &self.bytes[self.cursor..target];
        match memrchr(b'\n', skipped) {
            Some(last) => {
                self.line += memchr_iter(b'\n', skipped).count();
                self.column = 1 + count_chars(&skipped[last + 1..]);
            }
            None => self.column += count_chars(skipped),
        }
        self.cursor = target;
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.cursor + offset).copied()
    }

    /// Skips whitespace and comments until the next significant byte.
    fn skip_trivia(&mut self) {
        while let Some(byte) = self.peek_at(0) {
            match BYTE_PROPERTIES[byte as usize] {
                W => self.advance_to(self.cursor + 1),
                C if byte == b'#' || self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                C if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    /// Skips to the end of the line; the newline itself is left as whitespace.
    fn skip_line_comment(&mut self) {
        let end = match memchr(b'\n', &self.bytes[self.cursor..]) {
            Some(i) => self.cursor + i,
            None => self.bytes.len(),
        };
        self.advance_to(end);
    }

    /// Skips a `/* */` comment. An unterminated one runs to end of input.
    fn skip_block_comment(&mut self) {
        let body = self.cursor + 2;
        let end = match memmem::find(&self.bytes[body..], b"*/") {
            Some(i) => body + i + 2,
            None => self.bytes.len(),
        };
        self.advance_to(end);
    }

    /// Lexes a quoted string, keeping escape sequences as written.
    /// Uses `memchr2` to jump between the closing quote and backslashes.
    fn lex_string(&mut self, quote: u8) -> Result<TokenType, ParseError> {
        let (line, column) = (self.line, self.column);
        let start = self.cursor + 1;
        let mut pos = start;

        let close = loop {
            match memchr2(quote, b'\\', &self.bytes[pos..]) {
                Some(i) if self.bytes[pos + i] == quote => break pos + i,
                // A backslash: the next byte is escaped, whatever it is.
                Some(i) => pos += i + 2,
                None => pos = self.bytes.len(),
            }
            if pos >= self.bytes.len() {
                return Err(ParseError::new("Unterminated string", line, column));
            }
        };

        // Both ends sit on ASCII quotes, so this slice is on char boundaries.
        let raw = self.input[start..close].to_string();
        self.advance_to(close + 1);
        Ok(TokenType::String(raw))
    }

    /// Lexes a number as raw text: `-?` digit, then digits, `.`, `e`/`E`
    /// with an optional sign right after the exponent marker.
    fn lex_number(&mut self) -> TokenType {
        let start = self.cursor;
        let mut pos = start + 1;
        while let Some(&byte) = self.bytes.get(pos) {
            match byte {
                b'0'..=b'9' | b'.' => pos += 1,
                b'e' | b'E' => {
                    pos += 1;
                    if matches!(self.bytes.get(pos), Some(b'+') | Some(b'-')) {
                        pos += 1;
                    }
                }
                _ => break,
            }
        }
        let raw = self.input[start..pos].to_string();
        self.advance_to(pos);
        TokenType::Number(raw)
    }

    fn lex_identifier(&mut self) -> TokenType {
        let start = self.cursor;
        let len = self.bytes[start + 1..]
            .iter()
            .take_while(|&&b| is_identifier_continue(b))
            .count();
        let end = start + 1 + len;
        let ident = self.input[start..end].to_string();
        self.advance_to(end);
        TokenType::Identifier(ident)
    }

    /// Handles a character no rule matches: an error in strict mode,
    /// otherwise it is skipped.
    fn unrecognized(&mut self) -> Result<(), ParseError> {
        let c = self.input[self.cursor..]
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        if self.strict {
            return Err(ParseError::new(
                format!("Unexpected character '{}'", c),
                self.line,
                self.column,
            ));
        }
        trace!(
            character = %c,
            line = self.line,
            column = self.column,
            "skipping unrecognized character"
        );
        self.advance_to(self.cursor + c.len_utf8());
        Ok(())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, ParseError>;

    /// Gets the next `Token` from the input stream.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // 1. Skip whitespace and comments.
            self.skip_trivia();

            // 2. Peek at the next byte to see what to do.
            let byte = self.peek_at(0)?;

            // 3. Record position *after* skipping trivia.
            let (line, column) = (self.line, self.column);

            let kind = match BYTE_PROPERTIES[byte as usize] {
                S => {
                    self.advance_to(self.cursor + 1);
                    match byte {
                        b'[' => TokenType::LeftBracket,
                        b']' => TokenType::RightBracket,
                        b'(' => TokenType::LeftParen,
                        b')' => TokenType::RightParen,
                        b',' => TokenType::Comma,
                        b';' => TokenType::Semicolon,
                        _ => unreachable!(), // LUT guarantees this
                    }
                }
                Q => match self.lex_string(byte) {
                    Ok(kind) => kind,
                    Err(e) => return Some(Err(e)),
                },
                D if byte != b'-' || self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => {
                    self.lex_number()
                }
                I => self.lex_identifier(),
                E if self.peek_at(1) == Some(b'>') => {
                    self.advance_to(self.cursor + 2);
                    TokenType::Arrow
                }
                // A lone '-', '/', '=' or any other byte.
                _ => match self.unrecognized() {
                    Ok(()) => continue,
                    Err(e) => return Some(Err(e)),
                },
            };

            return Some(Ok(Token { kind, line, column }));
        }
    }
}

// --- Unit Tests for Tokenizer ---
#[cfg(test)]
mod tests {
    use super::*;

    // Helper to collect tokens into just their types for easy comparison
    fn collect_token_types(input: &str) -> Result<Vec<TokenType>, ParseError> {
        Tokenizer::starting_at(input, false, (1, 1))
            .map(|res| res.map(|token| token.kind))
            .collect()
    }

    fn strict_token_types(input: &str) -> Result<Vec<TokenType>, ParseError> {
        Tokenizer::starting_at(input, true, (1, 1))
            .map(|res| res.map(|token| token.kind))
            .collect()
    }

    fn ident(s: &str) -> TokenType {
        TokenType::Identifier(s.to_string())
    }

    fn string(s: &str) -> TokenType {
        TokenType::String(s.to_string())
    }

    fn number(s: &str) -> TokenType {
        TokenType::Number(s.to_string())
    }

    #[test]
    fn test_tokenizer_structurals() {
        let input = "[](),;=>";
        let expected = vec![
            TokenType::LeftBracket,
            TokenType::RightBracket,
            TokenType::LeftParen,
            TokenType::RightParen,
            TokenType::Comma,
            TokenType::Semicolon,
            TokenType::Arrow,
        ];
        assert_eq!(collect_token_types(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenizer_identifiers() {
        let input = "array TRUE null App\\Models\\User _private";
        let expected = vec![
            ident("array"),
            ident("TRUE"),
            ident("null"),
            ident("App\\Models\\User"),
            ident("_private"),
        ];
        assert_eq!(collect_token_types(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenizer_numbers() {
        let input = "123 -0.5 1e10 2.5E-3 7e+2";
        let expected = vec![
            number("123"),
            number("-0.5"),
            number("1e10"),
            number("2.5E-3"),
            number("7e+2"),
        ];
        assert_eq!(collect_token_types(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenizer_strings_keep_escapes() {
        let input = r#" 'hello' "a\nb" 'it\'s' "say \"hi\"" 'c:\\' "#;
        let expected = vec![
            string("hello"),
            string("a\\nb"),
            string("it\\'s"),
            string("say \\\"hi\\\""),
            string("c:\\\\"),
        ];
        assert_eq!(collect_token_types(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenizer_other_quote_inside_string() {
        let input = r#"'say "hi"' "it's""#;
        let expected = vec![string("say \"hi\""), string("it's")];
        assert_eq!(collect_token_types(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenizer_unicode_string() {
        let input = "'héllo wörld ✓'";
        assert_eq!(
            collect_token_types(input).unwrap(),
            vec![string("héllo wörld ✓")]
        );
    }

    #[test]
    fn test_tokenizer_comments() {
        let input = "[\n  // line\n  1, # hash\n  /* block\n spanning */ 2\n]";
        let expected = vec![
            TokenType::LeftBracket,
            number("1"),
            TokenType::Comma,
            number("2"),
            TokenType::RightBracket,
        ];
        assert_eq!(collect_token_types(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenizer_unterminated_block_comment() {
        let input = "[1 /* never closed";
        let expected = vec![TokenType::LeftBracket, number("1")];
        assert_eq!(collect_token_types(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenizer_skips_unrecognized() {
        // `$x = ` is dropped character by character.
        let input = "$x = [1, - 2]";
        let expected = vec![
            ident("x"),
            TokenType::LeftBracket,
            number("1"),
            TokenType::Comma,
            number("2"),
            TokenType::RightBracket,
        ];
        assert_eq!(collect_token_types(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenizer_skips_multibyte_unrecognized() {
        let input = "[€1]";
        let expected = vec![
            TokenType::LeftBracket,
            number("1"),
            TokenType::RightBracket,
        ];
        assert_eq!(collect_token_types(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenizer_strict_rejects_unrecognized() {
        let err = strict_token_types("[1, $x]").unwrap_err();
        assert_eq!(err.message, "Unexpected character '$'");
        assert_eq!((err.line, err.column), (1, 5));

        let err = strict_token_types("['a' = 1]").unwrap_err();
        assert_eq!(err.message, "Unexpected character '='");

        // Comments are still fine in strict mode.
        assert!(strict_token_types("[1, # ok\n 2]").is_ok());
    }

    #[test]
    fn test_tokenizer_string_errors() {
        let err = collect_token_types("[1, 'hello").unwrap_err();
        assert_eq!(err.message, "Unterminated string");
        assert_eq!((err.line, err.column), (1, 5));

        // An escaped closing quote does not close the string.
        let err = collect_token_types(r#"'abc\'"#).unwrap_err();
        assert_eq!(err.message, "Unterminated string");

        // A trailing backslash escapes nothing.
        let err = collect_token_types("'abc\\").unwrap_err();
        assert_eq!(err.message, "Unterminated string");
    }

    #[test]
    fn test_tokenizer_positions() {
        let tokens: Vec<Token> = Tokenizer::starting_at("[\n  'é' => 1,\n]", false, (1, 1))
            .collect::<Result<_, _>>()
            .unwrap();
        let positions: Vec<(usize, usize)> =
            tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(
            positions,
            vec![(1, 1), (2, 3), (2, 7), (2, 10), (2, 11), (3, 1)]
        );
    }

    #[test]
    fn test_position_of() {
        let text = "<?php\nreturn [1];";
        assert_eq!(position_of(text, 0), (1, 1));
        assert_eq!(position_of(text, 5), (1, 6));
        assert_eq!(position_of(text, 13), (2, 8));
        assert_eq!(position_of("é[", 2), (1, 2));
    }

    #[test]
    fn test_tokenizer_end_position() {
        let mut tokenizer = Tokenizer::starting_at("[1,\n 2", false, (1, 1));
        let count = tokenizer.by_ref().count();
        assert_eq!(count, 4);
        assert_eq!(tokenizer.location(), (2, 3));
    }
}
