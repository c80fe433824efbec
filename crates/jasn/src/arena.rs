//! Append-only storage for string and number text.
//!
//! Every piece of text a document holds lives in one contiguous `String` and
//! is addressed by a [`StringRef`] byte range. Text only ever enters the arena
//! as validated UTF-8 (raw runs are checked, escapes decode to `char`s), so
//! ranges can be sliced back out without re-validation.

use alloc::{string::String, vec::Vec};

use bstr::ByteSlice;

use crate::{
    cursor::ByteCursor,
    error::{ErrorKind, ParseError},
    escape_buffer::{self, CodeUnit, UnicodeEscapeBuffer},
};

/// Byte range of one string inside the document's string arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringRef {
    start: u32,
    end: u32,
}

impl StringRef {
    /// Offset of the first byte.
    #[must_use]
    pub fn start(self) -> u32 {
        self.start
    }

    /// Offset one past the last byte.
    #[must_use]
    pub fn end(self) -> u32 {
        self.end
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(self) -> usize {
        (self.end - self.start) as usize
    }

    /// Returns `true` for the empty string.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Token proving a string is open; returned by [`StringArena::begin_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StringHandle {
    start: u32,
}

// Inputs are capped at `u32::MAX` bytes before parsing starts, and the arena
// never holds more bytes than the input did.
#[allow(clippy::cast_possible_truncation)]
fn arena_offset(len: usize) -> u32 {
    debug_assert!(u32::try_from(len).is_ok());
    len as u32
}

#[derive(Debug, Default)]
pub(crate) struct StringArena {
    text: String,
    ranges: Vec<StringRef>,
}

impl StringArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin_string(&self) -> StringHandle {
        StringHandle {
            start: arena_offset(self.text.len()),
        }
    }

    #[inline]
    pub(crate) fn push_char(&mut self, handle: StringHandle, c: char) {
        debug_assert!(handle.start as usize <= self.text.len());
        self.text.push(c);
    }

    #[inline]
    pub(crate) fn push_str(&mut self, handle: StringHandle, s: &str) {
        debug_assert!(handle.start as usize <= self.text.len());
        self.text.push_str(s);
    }

    /// Copies a run of raw string bytes, validating them as UTF-8.
    ///
    /// `run_start` is the input offset of `run[0]`, used for error reporting.
    /// A multi-byte sequence cut off by the end of input counts as an
    /// unterminated string rather than bad UTF-8.
    pub(crate) fn push_raw(
        &mut self,
        handle: StringHandle,
        run: &[u8],
        run_start: usize,
        at_end_of_input: bool,
    ) -> Result<(), ParseError> {
        match run.to_str() {
            Ok(s) => {
                self.push_str(handle, s);
                Ok(())
            }
            Err(err) if err.error_len().is_none() && at_end_of_input => Err(ParseError::new(
                ErrorKind::UnterminatedString,
                run_start + run.len(),
            )),
            Err(err) => Err(ParseError::new(
                ErrorKind::InvalidUtf8,
                run_start + err.valid_up_to(),
            )),
        }
    }

    /// Interprets one escape sequence. The cursor must sit just past the
    /// backslash.
    pub(crate) fn push_escaped(
        &mut self,
        handle: StringHandle,
        cursor: &mut ByteCursor<'_>,
    ) -> Result<(), ParseError> {
        let escape_at = cursor.offset();
        let Some(b) = cursor.advance() else {
            return Err(ParseError::new(
                ErrorKind::UnterminatedString,
                cursor.offset(),
            ));
        };
        let c = match b {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{0008}',
            b'f' => '\u{000C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => decode_unicode_escape(cursor, escape_at - 1)?,
            _ => return Err(ParseError::new(ErrorKind::InvalidEscape, escape_at)),
        };
        self.push_char(handle, c);
        Ok(())
    }

    pub(crate) fn end_string(&mut self, handle: StringHandle) -> StringRef {
        let r = StringRef {
            start: handle.start,
            end: arena_offset(self.text.len()),
        };
        self.ranges.push(r);
        r
    }

    /// Interns text that is already known to be valid, e.g. a number lexeme.
    pub(crate) fn intern(&mut self, s: &str) -> StringRef {
        let handle = self.begin_string();
        self.push_str(handle, s);
        self.end_string(handle)
    }

    /// `None` when `r` does not describe text held by this arena.
    pub(crate) fn get(&self, r: StringRef) -> Option<&str> {
        self.text.get(r.start as usize..r.end as usize)
    }

    /// Number of strings committed so far.
    pub(crate) fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Total bytes of text held.
    pub(crate) fn byte_len(&self) -> usize {
        self.text.len()
    }
}

/// Reads the four hex digits after `\u`, plus a second `\uXXXX` when the first
/// one is a high surrogate. `backslash_at` is the offset of the escape's
/// backslash.
fn decode_unicode_escape(
    cursor: &mut ByteCursor<'_>,
    backslash_at: usize,
) -> Result<char, ParseError> {
    let unit = read_code_unit(cursor)?;
    match escape_buffer::classify(unit) {
        CodeUnit::Scalar(c) => Ok(c),
        CodeUnit::LoneLowSurrogate => Err(ParseError::new(
            ErrorKind::InvalidUnicodeEscape,
            backslash_at,
        )),
        CodeUnit::HighSurrogate(high) => {
            let low_at = cursor.offset();
            match (cursor.advance(), cursor.advance()) {
                (Some(b'\\'), Some(b'u')) => {}
                (None, _) | (Some(b'\\'), None) => {
                    return Err(ParseError::new(
                        ErrorKind::UnterminatedString,
                        cursor.offset(),
                    ));
                }
                _ => {
                    return Err(ParseError::new(ErrorKind::InvalidUnicodeEscape, low_at));
                }
            }
            let low = read_code_unit(cursor)?;
            escape_buffer::combine_surrogates(high, low)
                .ok_or(ParseError::new(ErrorKind::InvalidUnicodeEscape, low_at))
        }
    }
}

fn read_code_unit(cursor: &mut ByteCursor<'_>) -> Result<u16, ParseError> {
    let mut buf = UnicodeEscapeBuffer::new();
    loop {
        let at = cursor.offset();
        let Some(b) = cursor.advance() else {
            return Err(ParseError::new(ErrorKind::UnterminatedString, at));
        };
        match buf.feed(b) {
            Ok(Some(unit)) => return Ok(unit),
            Ok(None) => {}
            Err(_) => return Err(ParseError::new(ErrorKind::InvalidUnicodeEscape, at)),
        }
    }
}
