//! Tunables for a conversion.

/// The default maximum nesting depth (e.g., `[[[]]]`) to prevent stack overflows.
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// The default maximum input size (10MB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Options accepted by [`convert_with`](crate::convert_with) and
/// [`parse_with`](crate::parse_with).
///
/// ```
/// use php_array_json::ConvertOptions;
///
/// let options = ConvertOptions::default().strict(true).pretty(false);
/// assert!(options.strict);
/// assert_eq!(options.max_depth, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Reject unrecognized characters (`$`, a bare `=`, ...) instead of
    /// silently skipping them.
    pub strict: bool,
    /// Maximum array nesting depth.
    pub max_depth: usize,
    /// Inputs larger than this many bytes are refused before scanning.
    pub max_input_bytes: usize,
    /// Indent the output with two spaces. Compact output otherwise.
    pub pretty: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            pretty: true,
        }
    }
}

impl ConvertOptions {
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
