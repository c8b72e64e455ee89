//! Defines the `Token` and `TokenType` enums.
//!
//! These are the intermediate representation between the `Tokenizer`
//! (lexer) and the recursive-descent `Parser`.

use std::fmt;

/// The specific type of a `Token`.
///
/// String and number payloads hold the raw source text. Escape
/// sequences and numeric coercion are resolved by the parser.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenType {
    /// A quoted string, e.g. `'hello'`, holding the text between the quotes.
    String(String),
    /// A numeric literal, e.g. `-1.5e3`.
    Number(String),
    /// A bare word, e.g. `array`, `true` or `App\Models\User`.
    Identifier(String),
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `=>`
    Arrow,
    /// `;`
    Semicolon,
}

impl TokenType {
    /// Returns `true` when `other` is the same kind of token, ignoring payloads.
    pub fn same_kind(&self, other: &TokenType) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Renders the token the way error messages refer to it.
impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::String(s) => write!(f, "string '{}'", s),
            TokenType::Number(n) => write!(f, "number {}", n),
            TokenType::Identifier(i) => write!(f, "identifier {}", i),
            TokenType::LeftBracket => f.write_str("'['"),
            TokenType::RightBracket => f.write_str("']'"),
            TokenType::LeftParen => f.write_str("'('"),
            TokenType::RightParen => f.write_str("')'"),
            TokenType::Comma => f.write_str("','"),
            TokenType::Arrow => f.write_str("'=>'"),
            TokenType::Semicolon => f.write_str("';'"),
        }
    }
}

/// A single token produced by the `Tokenizer`.
///
/// It contains the `TokenType` and the location (line and column) of its
/// first character, which the parser uses for error reporting.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    /// The type of the token.
    pub(crate) kind: TokenType,
    /// The 1-indexed line number where the token starts.
    pub(crate) line: usize,
    /// The 1-indexed column number where the token starts.
    pub(crate) column: usize,
}
