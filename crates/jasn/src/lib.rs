//! A non-recursive JSON parser that builds an index-addressed value tree.
//!
//! The input is a byte slice already resident in memory. [`parse`] walks it
//! once with an explicit state machine, committing every value into flat
//! tables as soon as it is complete; containers refer to their children by
//! [`ValueIndex`], never by pointer. Nesting depth and value count are bounded
//! by [`ParserOptions`], so hostile input fails with an error instead of
//! exhausting the stack or the heap.
//!
//! ```rust
//! use jasn::{ErrorKind, ValueKind, parse};
//!
//! let doc = parse(br#"{"name": "jasn", "tags": ["json", "arena"]}"#).unwrap();
//! let root = doc.root();
//! assert_eq!(root.kind(), ValueKind::Object);
//!
//! let tags = root.as_object().unwrap().get("tags").unwrap();
//! assert_eq!(tags.as_array().unwrap().get(1).unwrap().as_str(), Some("arena"));
//!
//! let err = parse(br#"{"name" "jasn"}"#).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ExpectedColon);
//! assert_eq!(err.offset(), 8);
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "fuzzing"))]
extern crate std;

mod arena;
mod cursor;
mod depth_stack;
mod document;
mod error;
mod escape_buffer;
mod literal_buffer;
mod number;
mod options;
mod parser;
#[cfg(feature = "serde")]
mod ser;
mod store;
mod value;

#[cfg(test)]
mod tests;

pub use arena::StringRef;
pub use depth_stack::CollectionKind;
pub use document::{ArrayView, Document, Number, ObjectView, ValueKind, ValueRef};
pub use error::{ErrorKind, InternalError, ParseError};
pub use number::{NumberKind, NumberRef};
pub use options::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_VALUES, ParserOptions};
pub use parser::{Documents, Parser, parse, parse_many, parse_with_options};
pub use store::{ArrayRef, ObjectRef, Value, ValueIndex};
pub use value::{Array, Members, OwnedNumber, OwnedValue};
