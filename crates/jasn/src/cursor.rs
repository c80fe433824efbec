//! Read position over a fully buffered input.

use bstr::ByteSlice;

/// Wraps the input bytes and a read position.
///
/// End of input is reported as `None`, never as a sentinel byte.
pub(crate) struct ByteCursor<'src> {
    input: &'src [u8],
    pos: usize,
}

impl<'src> ByteCursor<'src> {
    #[cfg(test)]
    pub(crate) fn new(input: &'src [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Starts reading at `pos`, which must not exceed the input length.
    pub(crate) fn new_at(input: &'src [u8], pos: usize) -> Self {
        debug_assert!(pos <= input.len());
        Self { input, pos }
    }

    /// Length of the whole input, independent of the position.
    #[inline]
    pub(crate) fn input_len(&self) -> usize {
        self.input.len()
    }

    /// Current byte offset into the input.
    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    pub(crate) fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    #[inline]
    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Skips space, tab, line feed and carriage return.
    ///
    /// Callers must not invoke this inside a string literal.
    #[inline]
    pub(crate) fn skip_insignificant_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Bytes from `start` up to the current position.
    #[inline]
    pub(crate) fn slice_from(&self, start: usize) -> &'src [u8] {
        &self.input[start..self.pos]
    }

    /// Consumes bytes while `pred` holds and returns them.
    #[inline]
    pub(crate) fn take_while<F: Fn(u8) -> bool>(&mut self, pred: F) -> &'src [u8] {
        let rest = &self.input[self.pos..];
        let len = rest.iter().position(|&b| !pred(b)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Consumes the run of bytes that can be copied verbatim into a string:
    /// everything up to the next quote, backslash, or control byte.
    #[inline]
    pub(crate) fn take_string_run(&mut self) -> &'src [u8] {
        let rest = &self.input[self.pos..];
        let stop = rest
            .find_byteset(b"\"\\")
            .unwrap_or(rest.len());
        let len = rest[..stop]
            .iter()
            .position(|&b| b < 0x20)
            .unwrap_or(stop);
        self.pos += len;
        &rest[..len]
    }
}

impl core::fmt::Debug for ByteCursor<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteCursor")
            .field("pos", &self.pos)
            .field("rest", &self.input[self.pos..].as_bstr())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ByteCursor;

    #[test]
    fn peek_and_advance() {
        let mut c = ByteCursor::new(b"ab");
        assert_eq!(c.peek(), Some(b'a'));
        assert_eq!(c.peek(), Some(b'a'));
        assert_eq!(c.advance(), Some(b'a'));
        assert_eq!(c.advance(), Some(b'b'));
        assert_eq!(c.offset(), 2);
        assert!(c.is_at_end());
        assert_eq!(c.peek(), None);
        assert_eq!(c.advance(), None);
        assert_eq!(c.offset(), 2);
    }

    #[test]
    fn starts_mid_input() {
        let mut c = ByteCursor::new_at(b"[1] 2", 3);
        assert_eq!(c.offset(), 3);
        assert_eq!(c.input_len(), 5);
        c.skip_insignificant_whitespace();
        assert_eq!(c.advance(), Some(b'2'));
        assert!(c.is_at_end());
    }

    #[test]
    fn nul_byte_is_not_end_of_input() {
        let mut c = ByteCursor::new(b"\0");
        assert_eq!(c.advance(), Some(0));
        assert_eq!(c.advance(), None);
    }

    #[test]
    fn skips_only_json_whitespace() {
        let mut c = ByteCursor::new(b" \t\r\n\x0Bx");
        c.skip_insignificant_whitespace();
        assert_eq!(c.offset(), 4);
        assert_eq!(c.peek(), Some(0x0B));
    }

    #[test]
    fn take_while_digits() {
        let mut c = ByteCursor::new(b"123,");
        assert_eq!(c.take_while(|b| b.is_ascii_digit()), b"123");
        assert_eq!(c.peek(), Some(b','));
        assert_eq!(c.take_while(|b| b.is_ascii_digit()), b"");
    }

    #[test]
    fn string_run_stops_at_specials() {
        let mut c = ByteCursor::new(b"hello\\n\"");
        assert_eq!(c.take_string_run(), b"hello");
        assert_eq!(c.peek(), Some(b'\\'));

        let mut c = ByteCursor::new(b"ab\ncd\"");
        assert_eq!(c.take_string_run(), b"ab");
        assert_eq!(c.peek(), Some(b'\n'));

        let mut c = ByteCursor::new("é!".as_bytes());
        assert_eq!(c.take_string_run(), "é!".as_bytes());
        assert!(c.is_at_end());
    }
}
