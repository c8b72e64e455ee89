//! Contains the primary `ParseError` type for the library.
use std::fmt;

/// The error type for every stage of a conversion.
///
/// Locating the literal, tokenizing, parsing and size checks all fail with
/// this struct. It carries a human-readable message and the location
/// (line and column) where the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// A description of what went wrong.
    pub message: String,
    /// The line number (1-indexed) where the error was detected.
    pub line: usize,
    /// The column number (1-indexed) where the error was detected.
    pub column: usize,
}

impl ParseError {
    /// Creates an error at the given location.
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    /// Creates an error reported at the very start of the input.
    pub(crate) fn at_start(message: impl Into<String>) -> Self {
        Self::new(message, 1, 1)
    }
}

// --- Error Formatting ---
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error: {} at line {}, column {}.",
            self.message, self.line, self.column
        )
    }
}

impl std::error::Error for ParseError {}
