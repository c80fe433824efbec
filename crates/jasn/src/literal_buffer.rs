use crate::store::Scalar;

/// What happened after feeding one more byte into the literal matcher?
#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    /// Byte matched, but the literal is not finished yet.
    NeedMore,
    /// Byte matched *and* it was the last byte of the literal.
    Done(Scalar),
    /// Byte did **not** match the expected byte.
    Reject,
}

/// `None`  ➜  we are **not** in the middle of a literal
/// `Some`  ➜  `(remaining_bytes, value)` while matching
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct ExpectedLiteralBuffer(Option<(&'static [u8], Scalar)>);

impl ExpectedLiteralBuffer {
    /// Start matching after the *first* byte (`n`, `t`, or `f`).
    pub(crate) fn new(first: u8) -> Self {
        match first {
            b'n' => ExpectedLiteralBuffer(Some((b"ull", Scalar::Null))),
            b't' => ExpectedLiteralBuffer(Some((b"rue", Scalar::Bool(true)))),
            b'f' => ExpectedLiteralBuffer(Some((b"alse", Scalar::Bool(false)))),
            _ => ExpectedLiteralBuffer(None),
        }
    }

    /// Give the matcher the next input byte and learn what to do next.
    pub(crate) fn step(&mut self, b: u8) -> Step {
        let Some((bytes, value)) = self.0.take() else {
            return Step::Reject;
        };

        match bytes.split_first() {
            Some((&expected, rest)) if expected == b => {
                if rest.is_empty() {
                    Step::Done(value)
                } else {
                    self.0 = Some((rest, value));
                    Step::NeedMore
                }
            }
            _ => {
                self.0 = Some((bytes, value));
                Step::Reject
            }
        }
    }
}
