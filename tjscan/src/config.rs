//! Parse-time knobs passed by value to the entry points.

/// Configuration accepted by [`crate::parse`]/[`crate::parse_str`] and
/// [`crate::Parser::new`].
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    /// Bounds how many container frames may be open at once. `None` means
    /// unbounded (subject only to available memory); `Some(n)` rejects
    /// input that would open an `(n+1)`-th frame with
    /// [`crate::ErrorKind::MaxDepthExceeded`], before the offending
    /// container is even materialised.
    pub max_depth: Option<usize>,
    /// Sizing hint for the growable lexeme buffer.
    pub initial_buffer_capacity: usize,
    /// When `true` (the conformant-JSON default), only `"` opens and
    /// closes a string lexeme. When `false`, `'` and `` ` `` are also
    /// accepted as opening quote characters, and a string closes on the
    /// same character that opened it.
    pub strict_quote_chars: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            initial_buffer_capacity: 128,
            strict_quote_chars: true,
        }
    }
}
