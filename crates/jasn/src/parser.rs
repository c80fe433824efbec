//! The parsing state machine.
//!
//! The parser never recurses. Open containers live on a [`DepthStack`] and a
//! parallel stack of builders, so nesting costs heap space bounded by
//! [`ParserOptions::max_depth`] rather than call-stack frames.
//!
//! # Examples
//!
//! ```rust
//! use jasn::{ErrorKind, parse};
//!
//! let doc = parse(b"[1, 2, 3]").unwrap();
//! assert_eq!(doc.root().as_array().unwrap().len(), 3);
//!
//! let err = parse(b"[1, 2,]").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::UnexpectedToken);
//! assert_eq!(err.offset(), 6);
//! ```
#![allow(clippy::enum_glob_use)]

use alloc::vec::Vec;
use core::iter::FusedIterator;

use crate::{
    arena::StringArena,
    cursor::ByteCursor,
    depth_stack::{CollectionKind, DepthExceeded, DepthStack},
    document::Document,
    error::{ErrorKind, InternalError, ParseError},
    literal_buffer::{ExpectedLiteralBuffer, Step},
    number::{NumberRef, scan_number},
    options::ParserOptions,
    store::{ArrayBuilder, ObjectBuilder, Scalar, TooManyValues, ValueIndex, ValueStore},
};

/// What a finished string becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    /// A scalar value; parsing resumes at `AfterValue`.
    Value,
    /// An object key; parsing resumes at `ExpectColon`.
    Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// `allow_close` is set right after `[`, when `]` may close an empty
    /// array.
    ExpectValue { allow_close: bool },
    /// `allow_close` is set right after `{`, when `}` may close an empty
    /// object.
    ExpectKey { allow_close: bool },
    ExpectColon,
    AfterValue,
    /// The opening quote has been consumed.
    InString(Continuation),
    InNumber,
    Done,
}

#[derive(Debug)]
enum Builder {
    Array(ArrayBuilder),
    Object(ObjectBuilder),
}

/// A single-use parser over one fully buffered input.
///
/// Most callers want [`parse`] or [`parse_with_options`]; `Parser` is the
/// same machine with the construction step exposed.
#[derive(Debug)]
pub struct Parser<'src> {
    cursor: ByteCursor<'src>,
    options: ParserOptions,
    state: State,
    depth: DepthStack,
    builders: Vec<Builder>,
    strings: StringArena,
    store: ValueStore,
    root: Option<ValueIndex>,
    /// Offset of the first byte of the value being scanned.
    token_start: usize,
}

/// Parses one JSON document with default options.
///
/// # Errors
///
/// Returns the first error encountered, with the byte offset where it was
/// detected.
pub fn parse(input: &[u8]) -> Result<Document, ParseError> {
    Parser::new(input, ParserOptions::default()).parse()
}

/// Parses one JSON document.
///
/// # Errors
///
/// Returns the first error encountered, with the byte offset where it was
/// detected.
pub fn parse_with_options(input: &[u8], options: ParserOptions) -> Result<Document, ParseError> {
    Parser::new(input, options).parse()
}

/// Parses a sequence of top-level values, such as newline-delimited JSON.
///
/// Each item is one [`Document`]. Iteration ends at end of input, or right
/// after the first error.
///
/// ```rust
/// let values: Vec<_> = jasn::parse_many(b"{\"id\":1}\n{\"id\":2}\n", Default::default())
///     .map(|doc| doc.unwrap().root().to_owned_value().to_string())
///     .collect();
/// assert_eq!(values, [r#"{"id":1}"#, r#"{"id":2}"#]);
/// ```
pub fn parse_many(input: &[u8], options: ParserOptions) -> Documents<'_> {
    Documents {
        input,
        pos: 0,
        options,
        finished: false,
    }
}

impl<'src> Parser<'src> {
    /// Creates a parser positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'src [u8], options: ParserOptions) -> Self {
        Self::starting_at(input, 0, options)
    }

    fn starting_at(input: &'src [u8], pos: usize, options: ParserOptions) -> Self {
        Self {
            cursor: ByteCursor::new_at(input, pos),
            options,
            state: State::ExpectValue { allow_close: false },
            depth: DepthStack::new(options.max_depth),
            builders: Vec::new(),
            strings: StringArena::new(),
            store: ValueStore::new(options.value_limit()),
            root: None,
            token_start: pos,
        }
    }

    /// Runs the machine to completion.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered. No partial tree is produced.
    pub fn parse(mut self) -> Result<Document, ParseError> {
        log::trace!(
            "parsing {} bytes from offset {}",
            self.cursor.input_len(),
            self.cursor.offset()
        );
        match self.run() {
            Ok(root) => {
                let end_offset = self.token_start;
                log::trace!(
                    "parsed {} values and {} strings, root value ends at byte {end_offset}",
                    self.store.len(),
                    self.strings.len(),
                );
                Ok(Document::new(self.strings, self.store, root, end_offset))
            }
            Err(err) => {
                log::debug!("parse failed: {err}");
                #[cfg(any(test, feature = "fuzzing"))]
                assert!(!self.options.panic_on_error, "{err}");
                Err(err)
            }
        }
    }

    /// Drives the states until the root value is committed, then checks what
    /// follows it. On success `token_start` holds the offset just past the
    /// root value.
    fn run(&mut self) -> Result<ValueIndex, ParseError> {
        use State::*;

        if u32::try_from(self.cursor.input_len()).is_err() {
            return Err(ParseError::new(
                ErrorKind::InputTooLarge,
                u32::MAX as usize,
            ));
        }

        self.cursor.skip_insignificant_whitespace();
        if self.cursor.is_at_end() {
            return Err(ParseError::new(ErrorKind::EmptyInput, self.cursor.offset()));
        }

        let root = loop {
            match self.state {
                ExpectValue { allow_close } => self.expect_value(allow_close)?,
                ExpectKey { allow_close } => self.expect_key(allow_close)?,
                ExpectColon => self.expect_colon()?,
                AfterValue => self.after_value()?,
                InString(continuation) => self.in_string(continuation)?,
                InNumber => self.in_number()?,
                Done => {
                    break self
                        .root
                        .ok_or_else(|| internal(InternalError::BuilderMismatch, self.cursor.offset()))?;
                }
            }
        };

        let end_offset = self.cursor.offset();
        if !self.options.allow_trailing_content {
            self.cursor.skip_insignificant_whitespace();
            if !self.cursor.is_at_end() {
                return Err(ParseError::new(
                    ErrorKind::TrailingContent,
                    self.cursor.offset(),
                ));
            }
        }
        self.token_start = end_offset;
        Ok(root)
    }

    fn expect_value(&mut self, allow_close: bool) -> Result<(), ParseError> {
        self.cursor.skip_insignificant_whitespace();
        let at = self.cursor.offset();
        self.token_start = at;
        match self.cursor.peek() {
            Some(b'"') => {
                self.cursor.advance();
                self.state = State::InString(Continuation::Value);
                Ok(())
            }
            Some(b'-' | b'.' | b'0'..=b'9') => {
                self.state = State::InNumber;
                Ok(())
            }
            Some(b't' | b'f' | b'n') => {
                let scalar = self.scan_literal()?;
                self.commit_scalar(scalar)
            }
            Some(b'[') => self.open(CollectionKind::Array),
            Some(b'{') => self.open(CollectionKind::Object),
            Some(b @ (b']' | b'}')) if allow_close => self.close(b),
            Some(_) | None => Err(ParseError::new(ErrorKind::UnexpectedToken, at)),
        }
    }

    fn expect_key(&mut self, allow_close: bool) -> Result<(), ParseError> {
        self.cursor.skip_insignificant_whitespace();
        let at = self.cursor.offset();
        match self.cursor.peek() {
            Some(b'"') => {
                self.cursor.advance();
                self.state = State::InString(Continuation::Key);
                Ok(())
            }
            Some(b'}') if allow_close => self.close(b'}'),
            Some(_) | None => Err(ParseError::new(ErrorKind::ExpectedStringKey, at)),
        }
    }

    fn expect_colon(&mut self) -> Result<(), ParseError> {
        self.cursor.skip_insignificant_whitespace();
        let at = self.cursor.offset();
        match self.cursor.peek() {
            Some(b':') => {
                self.cursor.advance();
                self.state = State::ExpectValue { allow_close: false };
                Ok(())
            }
            Some(_) | None => Err(ParseError::new(ErrorKind::ExpectedColon, at)),
        }
    }

    fn after_value(&mut self) -> Result<(), ParseError> {
        self.cursor.skip_insignificant_whitespace();
        let at = self.cursor.offset();
        match self.cursor.peek() {
            Some(b',') => {
                self.cursor.advance();
                self.state = match self.depth.current() {
                    Some(CollectionKind::Array) => State::ExpectValue { allow_close: false },
                    Some(CollectionKind::Object) => State::ExpectKey { allow_close: false },
                    None => return Err(internal(InternalError::DepthUnderflow, at)),
                };
                Ok(())
            }
            Some(b @ (b']' | b'}')) => self.close(b),
            Some(_) | None => Err(ParseError::new(ErrorKind::ExpectedCommaOrClose, at)),
        }
    }

    fn in_string(&mut self, continuation: Continuation) -> Result<(), ParseError> {
        let handle = self.strings.begin_string();
        loop {
            let run_start = self.cursor.offset();
            let run = self.cursor.take_string_run();
            if !run.is_empty() {
                self.strings
                    .push_raw(handle, run, run_start, self.cursor.is_at_end())?;
            }

            let at = self.cursor.offset();
            match self.cursor.advance() {
                Some(b'"') => break,
                Some(b'\\') => self.strings.push_escaped(handle, &mut self.cursor)?,
                Some(_) => {
                    return Err(ParseError::new(ErrorKind::ControlCharacterInString, at));
                }
                None => return Err(ParseError::new(ErrorKind::UnterminatedString, at)),
            }
        }
        let string = self.strings.end_string(handle);

        match continuation {
            Continuation::Value => self.commit_scalar(Scalar::String(string)),
            Continuation::Key => match self.builders.last_mut() {
                Some(Builder::Object(object)) => {
                    object.set_key(string);
                    self.state = State::ExpectColon;
                    Ok(())
                }
                _ => Err(internal(InternalError::BuilderMismatch, self.cursor.offset())),
            },
        }
    }

    fn in_number(&mut self) -> Result<(), ParseError> {
        let (lexeme, kind) = scan_number(&mut self.cursor)?;
        let lexeme = self.strings.intern(lexeme);
        self.commit_scalar(Scalar::Number(NumberRef { lexeme, kind }))
    }

    /// Matches `true`, `false` or `null`, failing at the first byte that
    /// deviates.
    fn scan_literal(&mut self) -> Result<Scalar, ParseError> {
        let first = self.cursor.advance().unwrap_or_default();
        let mut literal = ExpectedLiteralBuffer::new(first);
        loop {
            let at = self.cursor.offset();
            let step = match self.cursor.peek() {
                Some(b) => literal.step(b),
                None => Step::Reject,
            };
            match step {
                Step::NeedMore => {
                    self.cursor.advance();
                }
                Step::Done(scalar) => {
                    self.cursor.advance();
                    return Ok(scalar);
                }
                Step::Reject => return Err(ParseError::new(ErrorKind::InvalidLiteral, at)),
            }
        }
    }

    fn open(&mut self, kind: CollectionKind) -> Result<(), ParseError> {
        let at = self.cursor.offset();
        self.depth
            .push(kind)
            .map_err(|DepthExceeded| ParseError::new(ErrorKind::DepthExceeded, at))?;
        let too_many = |TooManyValues| ParseError::new(ErrorKind::TooManyValues, at);
        let (builder, state) = match kind {
            CollectionKind::Array => (
                Builder::Array(self.store.begin_array().map_err(too_many)?),
                State::ExpectValue { allow_close: true },
            ),
            CollectionKind::Object => (
                Builder::Object(self.store.begin_object().map_err(too_many)?),
                State::ExpectKey { allow_close: true },
            ),
        };
        self.cursor.advance();
        self.builders.push(builder);
        self.state = state;
        Ok(())
    }

    /// Closes the innermost container with the bracket `close` and commits it
    /// to its parent.
    fn close(&mut self, close: u8) -> Result<(), ParseError> {
        let at = self.cursor.offset();
        let kind = CollectionKind::from_close(close)
            .ok_or_else(|| ParseError::new(ErrorKind::UnexpectedToken, at))?;
        match self.depth.current() {
            Some(open) if open == kind => {}
            Some(_) => return Err(ParseError::new(ErrorKind::MismatchedBracket, at)),
            None => return Err(internal(InternalError::DepthUnderflow, at)),
        }
        self.cursor.advance();
        self.depth.pop().map_err(|e| internal(e, at))?;

        let index = match (self.builders.pop(), kind) {
            (Some(Builder::Array(array)), CollectionKind::Array) => array.finish(&mut self.store),
            (Some(Builder::Object(object)), CollectionKind::Object) => object
                .finish(&mut self.store)
                .map_err(|e| internal(e, at))?,
            _ => return Err(internal(InternalError::BuilderMismatch, at)),
        };
        self.commit(index)
    }

    fn commit_scalar(&mut self, scalar: Scalar) -> Result<(), ParseError> {
        let index = self
            .store
            .put_scalar(scalar)
            .map_err(|TooManyValues| ParseError::new(ErrorKind::TooManyValues, self.token_start))?;
        self.commit(index)
    }

    /// Hands a finished value to the enclosing container, or makes it the
    /// root when nothing is open.
    fn commit(&mut self, index: ValueIndex) -> Result<(), ParseError> {
        match self.builders.last_mut() {
            None => {
                if !self.depth.is_empty() {
                    return Err(internal(InternalError::BuilderMismatch, self.cursor.offset()));
                }
                self.root = Some(index);
                self.state = State::Done;
            }
            Some(Builder::Array(array)) => {
                array.push(&mut self.store, index);
                self.state = State::AfterValue;
            }
            Some(Builder::Object(object)) => {
                object
                    .push(&mut self.store, index)
                    .map_err(|e| internal(e, self.cursor.offset()))?;
                self.state = State::AfterValue;
            }
        }
        Ok(())
    }
}

fn internal(err: InternalError, at: usize) -> ParseError {
    ParseError::new(ErrorKind::Internal(err), at)
}

/// Iterator returned by [`parse_many`].
#[derive(Debug, Clone)]
pub struct Documents<'src> {
    input: &'src [u8],
    pos: usize,
    options: ParserOptions,
    finished: bool,
}

impl Documents<'_> {
    /// Offset where the next document will be looked for.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }
}

impl Iterator for Documents<'_> {
    type Item = Result<Document, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let mut cursor = ByteCursor::new_at(self.input, self.pos);
        cursor.skip_insignificant_whitespace();
        if cursor.is_at_end() {
            self.pos = cursor.offset();
            self.finished = true;
            return None;
        }

        let options = ParserOptions {
            allow_trailing_content: true,
            ..self.options
        };
        let result = Parser::starting_at(self.input, cursor.offset(), options).parse();
        match &result {
            Ok(doc) => self.pos = doc.end_offset(),
            Err(_) => self.finished = true,
        }
        Some(result)
    }
}

impl FusedIterator for Documents<'_> {}
