//! # php-array-json
//!
//! `php-array-json` converts PHP array literals, both the short `[...]` form
//! and the legacy `array(...)` form, into JSON.
//!
//! ## Key Features
//!
//! * **Snippet friendly:** a leading `<?php return` (or any other preamble)
//!   is skipped; conversion starts at the first `[` or `array(`.
//! * **Lists and maps:** an array with any `key => value` entry becomes a JSON
//!   object, everything else a JSON array.
//! * **Comments:** `//`, `#` and `/* */` comments are ignored.
//! * **Strict mode:** optionally reject syntax the converter does not
//!   understand instead of skipping it.
//!
//! ## Quick Start
//!
//! ```
//! use php_array_json::convert;
//!
//! let json = convert("<?php return ['name' => 'Ada', 'langs' => array('en', 'fr')];").unwrap();
//! assert_eq!(
//!     json,
//!     "{\n  \"name\": \"Ada\",\n  \"langs\": [\n    \"en\",\n    \"fr\"\n  ]\n}"
//! );
//! ```
//!
//! Working with the value tree instead of text:
//!
//! ```
//! use php_array_json::{parse, JsonValue};
//!
//! let value = parse("[1 => 'one', 'two' => 2]").unwrap();
//! assert_eq!(value.get("1"), Some(&JsonValue::String("one".to_string())));
//! ```

/// Contains the primary `ParseError` type for the library.
pub mod error;
/// Contains `ConvertOptions`.
pub mod options;
/// Contains the `Token` and `TokenType` enums.
pub mod token;
/// Contains the `JsonValue` enum and the serialization (stringify) logic.
pub mod value;

/// The recursive-descent parser. Private to the crate.
mod parser;
/// The byte-based tokenizer (lexer). Private to the crate.
mod tokenizer;

pub use error::ParseError;
pub use options::ConvertOptions;
pub use value::{JsonNumber, JsonValue};

use memchr::memchr;
use parser::Parser;
use tracing::debug;

const NO_LITERAL: &str = "Paste a PHP array literal to convert";

/// An array literal found inside a larger PHP snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal<'a> {
    /// The source from the start of the literal to the end of the input.
    pub text: &'a str,
    /// Byte offset of `text` within the searched source.
    pub offset: usize,
}

/// Finds where the array literal starts in `source`.
///
/// The earliest `[` or `array(` (case-insensitive, whitespace allowed
/// before the parenthesis) wins. Anything before it, such as
/// `<?php return`, is ignored.
///
/// # Errors
/// Fails before any tokenization if neither form appears.
///
/// ```
/// use php_array_json::locate_literal;
///
/// let literal = locate_literal("<?php\nreturn array(1, 2);").unwrap();
/// assert_eq!(literal.text, "array(1, 2);");
/// assert!(locate_literal("<?php echo 'hi';").is_err());
/// ```
pub fn locate_literal(source: &str) -> Result<Literal<'_>, ParseError> {
    let lead = source.len() - source.trim_start().len();
    let trimmed = source.trim();

    let bracket = memchr(b'[', trimmed.as_bytes());
    let call = find_array_call(trimmed);
    let start = match (bracket, call) {
        (Some(a), Some(b)) => a.min(b),
        (Some(i), None) | (None, Some(i)) => i,
        (None, None) => return Err(ParseError::at_start(NO_LITERAL)),
    };

    let offset = lead + start;
    Ok(Literal {
        text: &trimmed[start..],
        offset,
    })
}

/// Byte offset of the first standalone `array` keyword followed by `(`.
fn find_array_call(text: &str) -> Option<usize> {
    const KEYWORD: &[u8] = b"array";
    let bytes = text.as_bytes();
    bytes
        .windows(KEYWORD.len())
        .enumerate()
        .find_map(|(at, window)| {
            if !window.eq_ignore_ascii_case(KEYWORD) {
                return None;
            }
            let standalone = at == 0 || !is_word_byte(bytes[at - 1]);
            let paren = bytes[at + KEYWORD.len()..]
                .iter()
                .find(|b| !b.is_ascii_whitespace())
                == Some(&b'(');
            (standalone && paren).then_some(at)
        })
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$' || byte == b'\\'
}

/// Parses the PHP array literal in `source` into a `JsonValue`, using the
/// default options.
///
/// # Errors
/// Returns a `ParseError` if no literal is found or the literal is malformed.
pub fn parse(source: &str) -> Result<JsonValue, ParseError> {
    parse_with(source, &ConvertOptions::default())
}

/// Parses the PHP array literal in `source` with explicit options.
///
/// # Errors
/// Returns a `ParseError` if the input exceeds `options.max_input_bytes`,
/// no literal is found, or the literal is malformed.
pub fn parse_with(source: &str, options: &ConvertOptions) -> Result<JsonValue, ParseError> {
    check_size(source, options)?;

    let literal = locate_literal(source)?;
    let start = tokenizer::position_of(source, literal.offset);
    debug!(
        offset = literal.offset,
        line = start.0,
        column = start.1,
        strict = options.strict,
        "located array literal"
    );

    Parser::new(literal.text, start, options)?.parse()
}

/// Parses `text` as a single PHP value, without searching for an array
/// literal first. Any value is accepted at the top level, so `42` or
/// `'hello'` parse as scalars.
///
/// ```
/// use php_array_json::{parse_literal, ConvertOptions, JsonNumber, JsonValue};
///
/// let value = parse_literal("42", &ConvertOptions::default()).unwrap();
/// assert_eq!(value, JsonValue::Number(JsonNumber::I64(42)));
/// ```
///
/// # Errors
/// Returns a `ParseError` if the input is too large or malformed.
pub fn parse_literal(text: &str, options: &ConvertOptions) -> Result<JsonValue, ParseError> {
    check_size(text, options)?;
    Parser::new(text, (1, 1), options)?.parse()
}

fn check_size(input: &str, options: &ConvertOptions) -> Result<(), ParseError> {
    if input.len() > options.max_input_bytes {
        return Err(ParseError::at_start("Input exceeds maximum size limit"));
    }
    Ok(())
}

/// Converts the PHP array literal in `source` into pretty-printed JSON
/// (two-space indentation).
///
/// # Errors
/// Returns a `ParseError` describing the first problem found.
pub fn convert(source: &str) -> Result<String, ParseError> {
    convert_with(source, &ConvertOptions::default())
}

/// Converts the PHP array literal in `source` into JSON with explicit options.
///
/// # Errors
/// Returns a `ParseError` describing the first problem found.
pub fn convert_with(source: &str, options: &ConvertOptions) -> Result<String, ParseError> {
    let value = parse_with(source, options)?;
    let rendered = if options.pretty {
        value.stringify_pretty()
    } else {
        value.stringify()
    };
    let json =
        rendered.map_err(|_| ParseError::at_start("Value has no JSON representation"))?;
    debug!(bytes = json.len(), pretty = options.pretty, "converted to JSON");
    Ok(json)
}
