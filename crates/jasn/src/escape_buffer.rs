//! Decoding of `\uXXXX` escapes.
//!
//! [`UnicodeEscapeBuffer`] accumulates exactly four ASCII hexadecimal digits
//! (`0-9`, `A-F`, `a-f`) into a UTF-16 code unit. Pairing surrogates is left
//! to [`combine_surrogates`], since a single escape may legitimately produce
//! half of a pair.

/// A byte that is not an ASCII hex digit was fed to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InvalidHexDigit(pub(crate) u8);

/// Accumulates up to four hexadecimal digits into one UTF-16 code unit.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self { acc: 0, len: 0 }
    }

    pub(crate) fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    #[inline]
    fn hex_val(b: u8) -> Option<u16> {
        match b {
            b'0'..=b'9' => Some(u16::from(b - b'0')),
            b'a'..=b'f' => Some(u16::from(b - b'a' + 10)),
            b'A'..=b'F' => Some(u16::from(b - b'A' + 10)),
            _ => None,
        }
    }

    /// Feeds one digit.
    ///
    /// - `Ok(None)` while fewer than four digits have been seen.
    /// - `Ok(Some(unit))` on the fourth digit; the buffer resets itself.
    /// - `Err` if `b` is not a hex digit.
    pub(crate) fn feed(&mut self, b: u8) -> Result<Option<u16>, InvalidHexDigit> {
        let d = Self::hex_val(b).ok_or(InvalidHexDigit(b))?;

        debug_assert!(self.len < 4);
        self.acc = (self.acc << 4) | d;
        self.len += 1;

        if self.len < 4 {
            return Ok(None);
        }

        let unit = self.acc;
        self.reset();
        Ok(Some(unit))
    }
}

/// What a single code unit contributes on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CodeUnit {
    /// A complete scalar value from the Basic Multilingual Plane.
    Scalar(char),
    /// First half of a surrogate pair; a low surrogate must follow.
    HighSurrogate(u16),
    /// A low surrogate with no preceding high surrogate.
    LoneLowSurrogate,
}

pub(crate) fn classify(unit: u16) -> CodeUnit {
    match unit {
        0xD800..=0xDBFF => CodeUnit::HighSurrogate(unit),
        0xDC00..=0xDFFF => CodeUnit::LoneLowSurrogate,
        // Every non-surrogate BMP code point is a valid scalar.
        _ => char::from_u32(u32::from(unit)).map_or(CodeUnit::LoneLowSurrogate, CodeUnit::Scalar),
    }
}

/// Joins a high and a low surrogate into one scalar, or `None` if `low` is not
/// a low surrogate.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    if !(0xDC00..=0xDFFF).contains(&low) {
        return None;
    }
    let code = 0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(buf: &mut UnicodeEscapeBuffer, digits: &[u8]) -> Option<u16> {
        let mut out = None;
        for &d in digits {
            out = buf.feed(d).unwrap();
        }
        out
    }

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'0').unwrap(), None);
        assert_eq!(buf.feed(b'0').unwrap(), None);
        assert_eq!(buf.feed(b'4').unwrap(), None);
        assert_eq!(buf.feed(b'1').unwrap(), Some(0x41));
    }

    #[test]
    fn mixed_case_hex() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(feed_all(&mut buf, b"AbCd"), Some(0xABCD));
    }

    #[test]
    fn resets_after_four_digits() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(feed_all(&mut buf, b"00e9"), Some(0xE9));
        assert_eq!(feed_all(&mut buf, b"0041"), Some(0x41));
    }

    #[test]
    fn reset_clears_buffer() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert!(buf.feed(b'F').unwrap().is_none());
        buf.reset();
        assert_eq!(feed_all(&mut buf, b"0062"), Some(0x62));
    }

    #[test]
    fn invalid_hex_error() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'G'), Err(InvalidHexDigit(b'G')));
    }

    #[test]
    fn classifies_units() {
        assert_eq!(classify(0x00E9), CodeUnit::Scalar('é'));
        assert_eq!(classify(0xD83D), CodeUnit::HighSurrogate(0xD83D));
        assert_eq!(classify(0xDE00), CodeUnit::LoneLowSurrogate);
    }

    #[test]
    fn combines_pairs() {
        assert_eq!(combine_surrogates(0xD83D, 0xDE00), Some('😀'));
        assert_eq!(combine_surrogates(0xD83D, 0x0041), None);
        assert_eq!(combine_surrogates(0xDBFF, 0xDFFF), Some('\u{10FFFF}'));
    }
}
