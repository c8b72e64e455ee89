//! Contains the `JsonValue` enum, the tree a PHP array literal is
//! converted into.
//!
//! This module also includes the "stringify" (serialization) logic
//! for writing a `JsonValue` out as JSON text.
use indexmap::IndexMap;
use std::fmt;

/// A native Rust representation of a JSON number.
///
/// Integer literals are kept as integers so large values such as
/// `9007199254740993` survive without precision loss.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum JsonNumber {
    /// Represents a signed 64-bit integer.
    I64(i64),
    /// Represents an unsigned 64-bit integer (only used above `i64::MAX`).
    U64(u64),
    /// Represents a 64-bit floating-point number.
    F64(f64),
}

impl JsonNumber {
    /// Coerces the raw text of a PHP numeric literal.
    ///
    /// Text without `.`, `e` or `E` is read as an integer first. Returns
    /// `None` when the text is not a number or the result is not finite.
    pub fn from_literal(raw: &str) -> Option<JsonNumber> {
        if !raw.contains(['.', 'e', 'E']) {
            if let Ok(n) = raw.parse::<i64>() {
                return Some(JsonNumber::I64(n));
            }
            if let Ok(n) = raw.parse::<u64>() {
                return Some(JsonNumber::U64(n));
            }
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(JsonNumber::F64(f)),
            _ => None,
        }
    }
}

impl JsonNumber {
    /// The string a numeric array key is stored under.
    ///
    /// Matches JavaScript's `String(n)`: `1.0` and `-0.0` give `"1"` and
    /// `"0"`, and magnitudes from `1e21` up (or below `1e-6`) use exponent
    /// form such as `"1e+21"`. So `1.0 => 'a'` and `'1' => 'a'` land on the
    /// same key.
    pub fn to_key(&self) -> String {
        match *self {
            JsonNumber::F64(f) if f == 0.0 => "0".to_string(),
            JsonNumber::F64(f) if f.abs() >= 1e21 || f.abs() < 1e-6 => {
                let exp = format!("{:e}", f);
                match exp.split_once('e') {
                    Some((mantissa, power)) if !power.starts_with('-') => {
                        format!("{}e+{}", mantissa, power)
                    }
                    _ => exp,
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Implement Display to allow `write!(w, "{}", ...)`.
impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonNumber::I64(n) => write!(f, "{}", n),
            JsonNumber::U64(n) => write!(f, "{}", n),
            JsonNumber::F64(n) => write!(f, "{}", n),
        }
    }
}

/// A JSON-compatible value produced by the parser.
///
/// A PHP list becomes an `Array`; an associative array becomes an
/// `Object` whose keys keep their first-insertion order.
#[derive(Debug, PartialEq, Clone)]
pub enum JsonValue {
    /// Represents a JSON `null`.
    Null,
    /// Represents a JSON `true` or `false`.
    Boolean(bool),
    /// Represents a JSON number.
    Number(JsonNumber),
    /// Represents a JSON string.
    String(String),
    /// Represents a JSON array (list).
    Array(Vec<JsonValue>),
    /// Represents a JSON object (map).
    Object(IndexMap<String, JsonValue>),
}

impl JsonValue {
    /// Returns the value under `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl JsonValue {
    /// Serializes the `JsonValue` into a compact, minified JSON string.
    ///
    /// # Errors
    /// Returns `fmt::Error` if the value contains `f64::NAN` or `f64::INFINITY`.
    pub fn stringify(&self) -> Result<String, fmt::Error> {
        let mut output = String::new();
        Self::write_value(self, &mut output)?;
        Ok(output)
    }

    /// Recursive helper function to write any `JsonValue` to a string buffer.
    fn write_value<W: fmt::Write>(value: &JsonValue, w: &mut W) -> fmt::Result {
        match value {
            JsonValue::Null => w.write_str("null"),
            JsonValue::Boolean(b) => w.write_str(if *b { "true" } else { "false" }),
            JsonValue::Number(n) => Self::write_number(n, w),
            JsonValue::String(s) => Self::write_string(s, w),
            JsonValue::Array(a) => Self::write_array(a, w),
            JsonValue::Object(o) => Self::write_object(o, w),
        }
    }

    /// NaN and infinity have no JSON form.
    fn write_number<W: fmt::Write>(n: &JsonNumber, w: &mut W) -> fmt::Result {
        match n {
            JsonNumber::F64(f) if !f.is_finite() => Err(fmt::Error),
            _ => write!(w, "{}", n),
        }
    }

    /// Helper to write a JSON array (compact).
    fn write_array<W: fmt::Write>(arr: &[JsonValue], w: &mut W) -> fmt::Result {
        w.write_char('[')?;
        for (i, val) in arr.iter().enumerate() {
            if i > 0 {
                w.write_char(',')?;
            }
            Self::write_value(val, w)?;
        }
        w.write_char(']')
    }

    /// Helper to write a JSON object (compact), in insertion order.
    fn write_object<W: fmt::Write>(obj: &IndexMap<String, JsonValue>, w: &mut W) -> fmt::Result {
        w.write_char('{')?;
        for (i, (key, val)) in obj.iter().enumerate() {
            if i > 0 {
                w.write_char(',')?;
            }
            Self::write_string(key, w)?;
            w.write_char(':')?;
            Self::write_value(val, w)?;
        }
        w.write_char('}')
    }

    /// Helper to write an escaped JSON string.
    fn write_string<W: fmt::Write>(s: &str, w: &mut W) -> fmt::Result {
        w.write_char('"')?;
        for c in s.chars() {
            match c {
                '"' => w.write_str("\\\""),
                '\\' => w.write_str("\\\\"),
                '\u{0008}' => w.write_str("\\b"),
                '\u{000C}' => w.write_str("\\f"),
                '\n' => w.write_str("\\n"),
                '\r' => w.write_str("\\r"),
                '\t' => w.write_str("\\t"),
                // Remaining control characters must be escaped as \uXXXX
                '\u{0000}'..='\u{001F}' => write!(w, "\\u{:04x}", c as u32),
                _ => w.write_char(c),
            }?;
        }
        w.write_char('"')
    }

    // --- Pretty-Printing Logic ---
    /// The indentation string to use for pretty-printing (two spaces).
    const INDENT: &'static str = "  ";

    /// Serializes the `JsonValue` into a human-readable,
    /// indented JSON string ("pretty-print").
    ///
    /// # Errors
    /// Returns `fmt::Error` if the value contains `f64::NAN` or `f64::INFINITY`.
    pub fn stringify_pretty(&self) -> Result<String, fmt::Error> {
        let mut output = String::new();
        Self::write_value_pretty(self, &mut output, 0)?;
        Ok(output)
    }

    /// Recursive helper for pretty-printing a value.
    fn write_value_pretty<W: fmt::Write>(
        value: &JsonValue,
        w: &mut W,
        depth: usize,
    ) -> fmt::Result {
        match value {
            JsonValue::Array(a) => Self::write_array_pretty(a, w, depth),
            JsonValue::Object(o) => Self::write_object_pretty(o, w, depth),
            // Scalars print the same either way.
            scalar => Self::write_value(scalar, w),
        }
    }

    /// Helper to pretty-print a JSON array.
    fn write_array_pretty<W: fmt::Write>(
        arr: &[JsonValue],
        w: &mut W,
        depth: usize,
    ) -> fmt::Result {
        if arr.is_empty() {
            return w.write_str("[]");
        }

        let new_depth = depth + 1;
        let indent = Self::INDENT.repeat(new_depth);
        let closing_indent = Self::INDENT.repeat(depth);

        w.write_str("[\n")?;
        for (i, val) in arr.iter().enumerate() {
            if i > 0 {
                w.write_str(",\n")?;
            }
            w.write_str(&indent)?;
            Self::write_value_pretty(val, w, new_depth)?;
        }
        write!(w, "\n{}", closing_indent)?;
        w.write_char(']')
    }

    /// Helper to pretty-print a JSON object.
    fn write_object_pretty<W: fmt::Write>(
        obj: &IndexMap<String, JsonValue>,
        w: &mut W,
        depth: usize,
    ) -> fmt::Result {
        if obj.is_empty() {
            return w.write_str("{}");
        }

        let new_depth = depth + 1;
        let indent = Self::INDENT.repeat(new_depth);
        let closing_indent = Self::INDENT.repeat(depth);

        w.write_str("{\n")?;
        for (i, (key, val)) in obj.iter().enumerate() {
            if i > 0 {
                w.write_str(",\n")?;
            }
            w.write_str(&indent)?;
            Self::write_string(key, w)?;
            w.write_str(": ")?;
            Self::write_value_pretty(val, w, new_depth)?;
        }
        write!(w, "\n{}", closing_indent)?;
        w.write_char('}')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value as SerdeValue;

    fn object(entries: Vec<(&str, JsonValue)>) -> JsonValue {
        JsonValue::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_number_from_literal() {
        assert_eq!(JsonNumber::from_literal("42"), Some(JsonNumber::I64(42)));
        assert_eq!(JsonNumber::from_literal("-7"), Some(JsonNumber::I64(-7)));
        assert_eq!(
            JsonNumber::from_literal("18446744073709551615"),
            Some(JsonNumber::U64(u64::MAX))
        );
        assert_eq!(JsonNumber::from_literal("2.5"), Some(JsonNumber::F64(2.5)));
        assert_eq!(JsonNumber::from_literal("1e3"), Some(JsonNumber::F64(1000.0)));
        // Wider than u64 still parses, as a float.
        assert_eq!(
            JsonNumber::from_literal("99999999999999999999"),
            Some(JsonNumber::F64(1e20))
        );
    }

    #[test]
    fn test_number_from_literal_rejects() {
        assert_eq!(JsonNumber::from_literal("1e"), None);
        assert_eq!(JsonNumber::from_literal("1.2.3"), None);
        assert_eq!(JsonNumber::from_literal("1e999"), None);
    }

    #[test]
    fn test_number_to_key() {
        assert_eq!(JsonNumber::F64(1.0).to_key(), "1");
        assert_eq!(JsonNumber::F64(1.5).to_key(), "1.5");
        assert_eq!(JsonNumber::I64(-3).to_key(), "-3");
        assert_eq!(JsonNumber::U64(u64::MAX).to_key(), "18446744073709551615");
        assert_eq!(JsonNumber::F64(-0.0).to_key(), "0");
        assert_eq!(JsonNumber::F64(0.0).to_key(), "0");
        assert_eq!(JsonNumber::F64(1e21).to_key(), "1e+21");
        assert_eq!(JsonNumber::F64(-2.5e30).to_key(), "-2.5e+30");
        assert_eq!(JsonNumber::F64(1.5e-7).to_key(), "1.5e-7");
        assert_eq!(JsonNumber::F64(1e20).to_key(), "100000000000000000000");
    }

    #[test]
    fn test_stringify_all_types() {
        assert_eq!(JsonValue::Null.stringify().unwrap(), "null");
        assert_eq!(JsonValue::Boolean(true).stringify().unwrap(), "true");
        assert_eq!(JsonValue::Boolean(false).stringify().unwrap(), "false");
        assert_eq!(
            JsonValue::Number(JsonNumber::F64(123.45)).stringify().unwrap(),
            "123.45"
        );
        assert_eq!(
            JsonValue::Number(JsonNumber::I64(2025)).stringify().unwrap(),
            "2025"
        );
        assert_eq!(JsonValue::Array(vec![]).stringify().unwrap(), "[]");
        assert_eq!(
            JsonValue::Object(IndexMap::new()).stringify().unwrap(),
            "{}"
        );

        let arr = JsonValue::Array(vec![
            JsonValue::Number(JsonNumber::I64(1)),
            JsonValue::String("test".to_string()),
            JsonValue::Boolean(true),
            JsonValue::Null,
            JsonValue::Object(IndexMap::new()),
        ]);
        assert_eq!(arr.stringify().unwrap(), r#"[1,"test",true,null,{}]"#);
    }

    #[test]
    fn test_stringify_keeps_insertion_order() {
        let obj = object(vec![
            ("zeta", JsonValue::Number(JsonNumber::I64(1))),
            ("alpha", JsonValue::Number(JsonNumber::I64(2))),
            ("10", JsonValue::Null),
        ]);
        assert_eq!(obj.stringify().unwrap(), r#"{"zeta":1,"alpha":2,"10":null}"#);
    }

    #[test]
    fn test_stringify_string_escapes() {
        let s = JsonValue::String("\" \\ / \u{0008} \u{000C} \n \r \t".to_string());
        assert_eq!(s.stringify().unwrap(), r#""\" \\ / \b \f \n \r \t""#);

        let s_control = JsonValue::String("hello\u{0001}world".to_string());
        assert_eq!(s_control.stringify().unwrap(), r#""hello\u0001world""#);
    }

    #[test]
    fn test_stringify_rejects_non_finite() {
        let nan = JsonValue::Array(vec![JsonValue::Number(JsonNumber::F64(f64::NAN))]);
        assert!(nan.stringify().is_err());
        assert!(nan.stringify_pretty().is_err());
    }

    #[test]
    fn test_stringify_pretty_print() {
        let obj = object(vec![
            ("key", JsonValue::String("value".to_string())),
            (
                "items",
                JsonValue::Array(vec![
                    JsonValue::Number(JsonNumber::I64(1)),
                    JsonValue::Null,
                    object(vec![("sub_key", JsonValue::Number(JsonNumber::I64(2)))]),
                ]),
            ),
        ]);

        let pretty = obj.stringify_pretty().unwrap();
        assert_eq!(
            pretty,
            "{\n  \"key\": \"value\",\n  \"items\": [\n    1,\n    null,\n    {\n      \"sub_key\": 2\n    }\n  ]\n}"
        );

        // And serde_json agrees it is the same document.
        let parsed: SerdeValue = serde_json::from_str(&pretty).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!({"key": "value", "items": [1, null, {"sub_key": 2}]})
        );
    }

    #[test]
    fn test_stringify_pretty_empty() {
        assert_eq!(
            JsonValue::Object(IndexMap::new()).stringify_pretty().unwrap(),
            "{}"
        );
        assert_eq!(JsonValue::Array(vec![]).stringify_pretty().unwrap(), "[]");
    }

    #[test]
    fn test_accessors() {
        let obj = object(vec![("name", JsonValue::String("x".to_string()))]);
        assert_eq!(obj.get("name").and_then(JsonValue::as_str), Some("x"));
        assert_eq!(obj.get("missing"), None);
        assert_eq!(JsonValue::Null.get("name"), None);
    }
}
