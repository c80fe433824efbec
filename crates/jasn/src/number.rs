//! Number lexemes.
//!
//! The scanner follows the JSON grammar exactly and reports the first byte
//! that cannot continue a number. The validated lexeme is kept verbatim so
//! consumers can pick exact-decimal or floating interpretation.

use crate::{
    arena::StringRef,
    cursor::ByteCursor,
    error::{ErrorKind, ParseError},
};

/// Lexical hint so consumers can distinguish ints vs floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NumberKind {
    /// No `.` and no exponent.
    Integer,
    /// Has `.` or an exponent.
    Float,
}

/// A number committed to the value store: its lexeme in the string arena plus
/// a kind hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NumberRef {
    pub(crate) lexeme: StringRef,
    pub(crate) kind: NumberKind,
}

impl NumberRef {
    /// Where the lexeme lives in the string arena.
    #[must_use]
    pub fn lexeme(self) -> StringRef {
        self.lexeme
    }

    /// Integer or float, as written.
    #[must_use]
    pub fn kind(self) -> NumberKind {
        self.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Start,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
}

/// Consumes one number starting at the cursor and returns its lexeme.
///
/// Stops before the first byte that cannot extend the number; that byte is
/// left for the structural parser to judge.
pub(crate) fn scan_number<'src>(
    cursor: &mut ByteCursor<'src>,
) -> Result<(&'src str, NumberKind), ParseError> {
    use NumberState::*;

    let start = cursor.offset();
    let mut state = Start;
    loop {
        state = match (state, cursor.peek()) {
            (Start, Some(b'-')) => Sign,
            (Start | Sign, Some(b'0')) => Zero,
            (Start | Sign | DecimalInteger, Some(b'1'..=b'9'))
            | (DecimalInteger, Some(b'0')) => DecimalInteger,
            (Zero | DecimalInteger, Some(b'.')) => DecimalPoint,
            (DecimalPoint | DecimalFraction, Some(b'0'..=b'9')) => DecimalFraction,
            (Zero | DecimalInteger | DecimalFraction, Some(b'e' | b'E')) => DecimalExponent,
            (DecimalExponent, Some(b'+' | b'-')) => DecimalExponentSign,
            (DecimalExponent | DecimalExponentSign | DecimalExponentInteger, Some(b'0'..=b'9')) => {
                DecimalExponentInteger
            }
            // Leading zeros are not allowed.
            (Zero, Some(b'0'..=b'9')) => {
                return Err(ParseError::new(ErrorKind::MalformedNumber, cursor.offset()));
            }
            (Zero | DecimalInteger | DecimalFraction | DecimalExponentInteger, _) => break,
            _ => return Err(ParseError::new(ErrorKind::MalformedNumber, cursor.offset())),
        };
        cursor.advance();

        if matches!(
            state,
            DecimalInteger | DecimalFraction | DecimalExponentInteger
        ) {
            cursor.take_while(|b| b.is_ascii_digit());
        }
    }

    let kind = match state {
        DecimalFraction | DecimalExponentInteger => NumberKind::Float,
        _ => NumberKind::Integer,
    };
    // Every accepted byte is ASCII.
    let lexeme = core::str::from_utf8(cursor.slice_from(start))
        .map_err(|_| ParseError::new(ErrorKind::MalformedNumber, start))?;
    Ok((lexeme, kind))
}
