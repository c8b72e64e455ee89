//! Contains the recursive-descent `Parser`.
//!
//! The parser owns the full token list produced by the `Tokenizer` and
//! walks it with a forward-only cursor. The grammar is LL(1) apart from a
//! single extra token of lookahead used to spot `key =>` entries.

use crate::error::ParseError;
use crate::options::ConvertOptions;
use crate::token::{Token, TokenType};
use crate::tokenizer::Tokenizer;
use crate::value::{JsonNumber, JsonValue};
use indexmap::IndexMap;
use memchr::memchr;
use tracing::{debug, trace};

/// One entry of an array literal, before we know whether the array is a
/// list or a map.
struct Entry {
    key: Option<String>,
    value: JsonValue,
    line: usize,
    column: usize,
}

/// The recursive-descent parser for a single array literal.
pub(crate) struct Parser {
    /// Every token of the input, in source order.
    tokens: Vec<Token>,
    /// Index of the next unconsumed token. Never moves backwards.
    cursor: usize,
    /// Where the input ends, for "Unexpected end of input" errors.
    end_line: usize,
    end_column: usize,
    /// The maximum allowed nesting depth.
    max_depth: usize,
    /// The *current* nesting depth of the parser.
    depth: usize,
}

impl Parser {
    /// Tokenizes `input` and prepares a parser over the result.
    ///
    /// `start` is the line and column `input` begins at in the caller's
    /// source, so reported locations point into the original text.
    pub(crate) fn new(
        input: &str,
        start: (usize, usize),
        options: &ConvertOptions,
    ) -> Result<Self, ParseError> {
        let mut tokenizer = Tokenizer::starting_at(input, options.strict, start);
        let tokens = tokenizer.by_ref().collect::<Result<Vec<_>, _>>()?;
        let (end_line, end_column) = tokenizer.location();
        debug!(tokens = tokens.len(), "tokenized array literal");

        Ok(Parser {
            tokens,
            cursor: 0,
            end_line,
            end_column,
            max_depth: options.max_depth,
            depth: 0,
        })
    }

    /// Parses one value and checks nothing but `,`/`;` follows it.
    pub(crate) fn parse(mut self) -> Result<JsonValue, ParseError> {
        let value = self.parse_value()?;

        // Tolerate the `;` closing a `return [...];` statement.
        while matches!(
            self.peek().map(|t| &t.kind),
            Some(TokenType::Comma) | Some(TokenType::Semicolon)
        ) {
            self.cursor += 1;
        }

        match self.peek() {
            None => Ok(value),
            Some(token) => Err(Self::error_from_token(
                "Unexpected tokens after parsing ends",
                token,
            )),
        }
    }

    // --- Cursor helpers ---

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + offset)
    }

    /// Consumes and returns the next token.
    fn next_token(&mut self) -> Result<Token, ParseError> {
        let token = self
            .tokens
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| self.unexpected_end())?;
        self.cursor += 1;
        Ok(token)
    }

    /// Consumes a token of the same kind as `expected`.
    fn expect(&mut self, expected: TokenType) -> Result<(), ParseError> {
        match self.peek() {
            None => Err(self.unexpected_end()),
            Some(token) if token.kind.same_kind(&expected) => {
                self.cursor += 1;
                Ok(())
            }
            Some(token) => Err(Self::error_from_token(
                format!("Expected {} but found {}", expected, token.kind),
                token,
            )),
        }
    }

    fn unexpected_end(&self) -> ParseError {
        ParseError::new("Unexpected end of input", self.end_line, self.end_column)
    }

    /// A helper function to create a `ParseError` from a token's location.
    fn error_from_token(message: impl Into<String>, token: &Token) -> ParseError {
        ParseError::new(message, token.line, token.column)
    }

    // --- Grammar ---

    /// value := string | number | identifier | 'array' '(' items ')' | '[' items ']'
    fn parse_value(&mut self) -> Result<JsonValue, ParseError> {
        let token = self.next_token()?;
        match token.kind {
            TokenType::String(raw) => Ok(JsonValue::String(unescape(&raw))),
            TokenType::Number(raw) => Ok(match JsonNumber::from_literal(&raw) {
                Some(n) => JsonValue::Number(n),
                None => JsonValue::String(raw),
            }),
            TokenType::Identifier(ident) => {
                if ident.eq_ignore_ascii_case("array") {
                    self.expect(TokenType::LeftParen)?;
                    self.parse_nested(TokenType::RightParen, token.line, token.column)
                } else if ident.eq_ignore_ascii_case("true") {
                    Ok(JsonValue::Boolean(true))
                } else if ident.eq_ignore_ascii_case("false") {
                    Ok(JsonValue::Boolean(false))
                } else if ident.eq_ignore_ascii_case("null") {
                    Ok(JsonValue::Null)
                } else {
                    // A bareword, e.g. a constant name.
                    Ok(JsonValue::String(ident))
                }
            }
            TokenType::LeftBracket => {
                self.parse_nested(TokenType::RightBracket, token.line, token.column)
            }
            other => Err(ParseError::new(
                format!("Unexpected token {}", other),
                token.line,
                token.column,
            )),
        }
    }

    /// Parses the items of an array whose opening token was already
    /// consumed, then its `terminator`, enforcing the depth limit.
    fn parse_nested(
        &mut self,
        terminator: TokenType,
        line: usize,
        column: usize,
    ) -> Result<JsonValue, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::new(
                "Maximum nesting depth exceeded",
                line,
                column,
            ));
        }
        self.depth += 1;
        let array = self.parse_array(&terminator)?;
        self.expect(terminator)?;
        self.depth -= 1;
        Ok(array)
    }

    /// items := ( entry ','? )*   up to (not including) `terminator`
    /// entry := key '=>' value | value
    fn parse_array(&mut self, terminator: &TokenType) -> Result<JsonValue, ParseError> {
        let mut entries = Vec::new();
        let mut associative = false;

        loop {
            let (line, column) = match self.peek() {
                None => return Err(self.unexpected_end()),
                Some(token) if token.kind.same_kind(terminator) => break,
                Some(token) if token.kind == TokenType::Comma => {
                    self.cursor += 1;
                    continue;
                }
                Some(token) => (token.line, token.column),
            };

            let keyed = matches!(self.peek_at(1).map(|t| &t.kind), Some(TokenType::Arrow));
            let key = if keyed {
                let key = self.parse_key()?;
                self.expect(TokenType::Arrow)?;
                associative = true;
                Some(key)
            } else {
                None
            };
            let value = self.parse_value()?;
            entries.push(Entry {
                key,
                value,
                line,
                column,
            });
        }

        trace!(entries = entries.len(), associative, "parsed array");

        if !associative {
            return Ok(JsonValue::Array(
                entries.into_iter().map(|entry| entry.value).collect(),
            ));
        }

        let mut map = IndexMap::with_capacity(entries.len());
        for entry in entries {
            let Some(key) = entry.key else {
                return Err(ParseError::new(
                    "Item without key in associative array",
                    entry.line,
                    entry.column,
                ));
            };
            // A repeated key overwrites the value but keeps its first position.
            map.insert(key, entry.value);
        }
        Ok(JsonValue::Object(map))
    }

    /// key := string | identifier | number
    ///
    /// String keys go through `unescape` like string values do, so
    /// `"a\tb" =>` and a value `"a\tb"` spell the same text. Identifier
    /// keys are taken verbatim. Numeric keys are stored via
    /// `JsonNumber::to_key`, so `0`, `-0.0` and `'0'` name the same entry.
    fn parse_key(&mut self) -> Result<String, ParseError> {
        let token = self.next_token()?;
        match token.kind {
            TokenType::String(raw) => Ok(unescape(&raw)),
            TokenType::Identifier(ident) => Ok(ident),
            TokenType::Number(raw) => Ok(match JsonNumber::from_literal(&raw) {
                Some(n) => n.to_key(),
                None => raw,
            }),
            other => Err(ParseError::new(
                format!("Invalid array key {}", other),
                token.line,
                token.column,
            )),
        }
    }
}

/// Resolves the escape sequences of a raw string literal.
///
/// `\n`, `\r` and `\t` become control characters; any other escaped
/// character (including `\\`, `\'` and `\"`) stands for itself. A lone
/// trailing backslash is kept.
pub(crate) fn unescape(raw: &str) -> String {
    if memchr(b'\\', raw.as_bytes()).is_none() {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
