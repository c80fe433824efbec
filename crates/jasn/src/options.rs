/// Default for [`ParserOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Default for [`ParserOptions::max_values`], also the hard ceiling imposed
/// by `u32` value indices.
pub const DEFAULT_MAX_VALUES: usize = u32::MAX as usize;

/// Configuration options for the parser.
///
/// # Examples
///
/// ```rust
/// use jasn::{ParserOptions, parse_with_options};
///
/// let options = ParserOptions {
///     allow_trailing_content: true,
///     ..Default::default()
/// };
/// let doc = parse_with_options(b"{\"a\":1} garbage", options).unwrap();
/// assert_eq!(doc.end_offset(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub struct ParserOptions {
    /// Maximum number of simultaneously open arrays and objects.
    ///
    /// Opening one more container than this fails with
    /// [`ErrorKind::DepthExceeded`](crate::ErrorKind::DepthExceeded) at the
    /// offset of the opening bracket.
    ///
    /// # Default
    ///
    /// `100`
    pub max_depth: usize,

    /// Maximum number of values (scalars and containers) a document may hold.
    ///
    /// Values beyond `u32::MAX` cannot be addressed, so larger settings are
    /// clamped.
    ///
    /// # Default
    ///
    /// `u32::MAX`
    pub max_values: usize,

    /// Whether bytes after the first complete value are ignored.
    ///
    /// When `false`, anything but whitespace after the root value fails with
    /// [`ErrorKind::TrailingContent`](crate::ErrorKind::TrailingContent). When
    /// `true`, parsing stops after the root value and
    /// [`Document::end_offset`](crate::Document::end_offset) reports where it
    /// ended, which suits NDJSON readers consuming one value at a time.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_content: bool,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on parse errors instead of returning them.
    ///
    /// Enabled only in test builds to produce backtraces on parse failures.
    pub panic_on_error: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_values: DEFAULT_MAX_VALUES,
            allow_trailing_content: false,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}

impl ParserOptions {
    pub(crate) fn value_limit(&self) -> usize {
        self.max_values.min(DEFAULT_MAX_VALUES)
    }
}
