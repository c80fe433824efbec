use thiserror::Error;

/// A parse failure: what went wrong and the byte offset of the offending
/// input.
///
/// Errors at end of input carry `offset == input.len()`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    pub(crate) kind: ErrorKind,
    pub(crate) offset: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// The category of the failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Byte offset of the offending byte.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns `true` if this error reports a defect in the parser rather than
    /// malformed input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self.kind, ErrorKind::Internal(_))
    }

    /// Converts the byte offset into a 1-based `(line, column)` pair against
    /// the input that produced this error.
    ///
    /// Columns count bytes. Offsets past the end of `input` are clamped.
    #[must_use]
    pub fn line_column(&self, input: &[u8]) -> (usize, usize) {
        let end = self.offset.min(input.len());
        let before = &input[..end];
        let line = 1 + before.iter().filter(|&&b| b == b'\n').count();
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |nl| nl + 1);
        (line, end - line_start + 1)
    }
}

/// Every way a parse can fail.
///
/// Lexical and structural kinds describe malformed input, resource kinds
/// describe configured limits, and [`ErrorKind::Internal`] describes a defect.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // lexical
    /// A backslash followed by a byte that starts no JSON escape.
    #[error("invalid escape sequence")]
    InvalidEscape,
    /// A `\u` escape with bad hex digits or an unpaired surrogate.
    #[error("invalid unicode escape sequence")]
    InvalidUnicodeEscape,
    /// Input ended inside a string.
    #[error("unterminated string")]
    UnterminatedString,
    /// A raw byte below `0x20` inside a string.
    #[error("unescaped control character in string")]
    ControlCharacterInString,
    /// String bytes that are not UTF-8.
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    /// A number that breaks the JSON grammar, e.g. `01` or `1.`.
    #[error("malformed number")]
    MalformedNumber,
    /// A misspelled or truncated `true`, `false` or `null`.
    #[error("invalid literal")]
    InvalidLiteral,

    // structural
    /// A byte that cannot start a value.
    #[error("unexpected token")]
    UnexpectedToken,
    /// Something other than a string where an object key belongs.
    #[error("expected string key")]
    ExpectedStringKey,
    /// A key not followed by `:`.
    #[error("expected ':'")]
    ExpectedColon,
    /// A value not followed by `,` or a closing bracket.
    #[error("expected ',' or closing bracket")]
    ExpectedCommaOrClose,
    /// `]` closing an object, or `}` closing an array.
    #[error("mismatched closing bracket")]
    MismatchedBracket,
    /// Non-whitespace after the root value.
    #[error("trailing content after document")]
    TrailingContent,

    // resource
    /// More open containers than [`ParserOptions::max_depth`](crate::ParserOptions::max_depth).
    #[error("maximum nesting depth exceeded")]
    DepthExceeded,
    /// More values than [`ParserOptions::max_values`](crate::ParserOptions::max_values).
    #[error("maximum value count exceeded")]
    TooManyValues,
    /// Input longer than `u32::MAX` bytes.
    #[error("input too large")]
    InputTooLarge,

    // input
    /// Nothing but whitespace.
    #[error("empty input")]
    EmptyInput,

    /// A parser defect; see [`ParseError::is_internal`].
    #[error("internal error: {0}")]
    Internal(#[from] InternalError),
}

/// Invariant violations inside the parser. Seeing one of these is a bug.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InternalError {
    /// A close with no open container recorded.
    #[error("depth stack underflow")]
    DepthUnderflow,
    /// The builder stack disagrees with the depth stack.
    #[error("builder stack out of step with depth stack")]
    BuilderMismatch,
}
