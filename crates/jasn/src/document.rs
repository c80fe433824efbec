//! The parsed tree, and borrowing views for walking it.
//!
//! # Example
//!
//! ```
//! use jasn::parse;
//!
//! let doc = parse(br#"{"a":1,"b":[2,3,{"c":null}]}"#).unwrap();
//! let root = doc.root().as_object().unwrap();
//!
//! let keys: Vec<&str> = root.iter().map(|(k, _)| k).collect();
//! assert_eq!(keys, ["a", "b"]);
//! assert_eq!(root.get("a").unwrap().as_number().unwrap().as_i64(), Some(1));
//! assert_eq!(root.get("b").unwrap().as_array().unwrap().len(), 3);
//! ```

use alloc::vec::Vec;
use core::{
    fmt::{self, Write as _},
    slice,
};

use crate::{
    arena::{StringArena, StringRef},
    number::{NumberKind, NumberRef},
    store::{ArrayRef, Member, ObjectRef, Value, ValueIndex, ValueStore},
    value::{OwnedNumber, OwnedValue, write_escaped_string},
};

/// A successfully parsed document.
///
/// Owns every table the parse populated. Values are addressed by
/// [`ValueIndex`]; [`Document::root`] is the usual entry point.
pub struct Document {
    strings: StringArena,
    store: ValueStore,
    root: ValueIndex,
    end_offset: usize,
}

impl Document {
    pub(crate) fn new(
        strings: StringArena,
        mut store: ValueStore,
        root: ValueIndex,
        end_offset: usize,
    ) -> Self {
        store.seal();
        Self {
            strings,
            store,
            root,
            end_offset,
        }
    }

    /// The root value.
    #[must_use]
    pub fn root(&self) -> ValueRef<'_> {
        ValueRef {
            doc: self,
            index: self.root,
        }
    }

    /// Index of the root value.
    #[must_use]
    pub fn root_index(&self) -> ValueIndex {
        self.root
    }

    /// A view of the value at `index`, if it exists.
    #[must_use]
    pub fn get(&self, index: ValueIndex) -> Option<ValueRef<'_>> {
        self.store
            .get(index)
            .map(|_| ValueRef { doc: self, index })
    }

    /// The raw record at `index`.
    #[must_use]
    pub fn value(&self, index: ValueIndex) -> Option<Value> {
        self.store.get(index)
    }

    /// Total number of values, containers included.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.store.len()
    }

    /// Number of strings held, keys and number lexemes included.
    #[must_use]
    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    /// Byte offset just past the root value.
    ///
    /// With [`ParserOptions::allow_trailing_content`](crate::ParserOptions),
    /// this is where a reader should resume.
    #[must_use]
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    /// Contents of a string, or `None` if `s` belongs to another document.
    #[must_use]
    pub fn str(&self, s: StringRef) -> Option<&str> {
        self.strings.get(s)
    }

    /// Elements of an array, in source order.
    #[must_use]
    pub fn elements(&self, array: ArrayRef) -> &[ValueIndex] {
        self.store.elements(array)
    }

    /// Number of elements in an array.
    #[must_use]
    pub fn array_len(&self, array: ArrayRef) -> usize {
        self.elements(array).len()
    }

    /// The `i`-th element of an array.
    #[must_use]
    pub fn array_element(&self, array: ArrayRef, i: usize) -> Option<ValueIndex> {
        self.elements(array).get(i).copied()
    }

    /// Number of members in an object, duplicates included.
    #[must_use]
    pub fn object_len(&self, object: ObjectRef) -> usize {
        self.store.members(object).len()
    }

    /// Key of the `i`-th member of an object.
    #[must_use]
    pub fn object_key(&self, object: ObjectRef, i: usize) -> Option<&str> {
        self.store
            .members(object)
            .get(i)
            .map(|m| self.text(m.key))
    }

    /// Value of the `i`-th member of an object.
    #[must_use]
    pub fn object_value(&self, object: ObjectRef, i: usize) -> Option<ValueIndex> {
        self.store.members(object).get(i).map(|m| m.value)
    }

    /// A number's lexeme together with its kind.
    ///
    /// A `NumberRef` from another document yields an empty lexeme.
    #[must_use]
    pub fn number(&self, n: NumberRef) -> Number<'_> {
        Number {
            lexeme: self.text(n.lexeme),
            kind: n.kind,
        }
    }

    // Refs reached through this document's own tables always resolve.
    fn text(&self, s: StringRef) -> &str {
        self.strings.get(s).unwrap_or_default()
    }

    fn members(&self, object: ObjectRef) -> &[Member] {
        self.store.members(object)
    }

    fn record(&self, index: ValueIndex) -> Value {
        // Views are only ever built for indices that exist.
        self.store.get(index).unwrap_or(Value::Null)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root)
            .field("root_kind", &self.root().kind())
            .field("values", &self.store.len())
            .field("string_bytes", &self.strings.byte_len())
            .field("end_offset", &self.end_offset)
            .finish()
    }
}

fn write_quoted(s: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_char('"')?;
    write_escaped_string(s, f)?;
    f.write_char('"')
}

enum Frame<'doc> {
    Array {
        rest: slice::Iter<'doc, ValueIndex>,
        first: bool,
    },
    Object {
        rest: slice::Iter<'doc, Member>,
        first: bool,
    },
}

/// Compact canonical JSON, the same text [`OwnedValue`]'s `Display` writes.
///
/// Unlike converting to an [`OwnedValue`] first, this walks the tree with an
/// explicit stack, so any document the parser accepted can be rendered.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<Frame<'_>> = Vec::new();
        let mut next = Some(self.root);
        loop {
            if let Some(index) = next.take() {
                match self.record(index) {
                    Value::Null => f.write_str("null")?,
                    Value::Bool(b) => f.write_str(if b { "true" } else { "false" })?,
                    Value::Number(n) => f.write_str(self.number(n).lexeme())?,
                    Value::String(s) => write_quoted(self.text(s), f)?,
                    Value::Array(array) => {
                        f.write_char('[')?;
                        stack.push(Frame::Array {
                            rest: self.elements(array).iter(),
                            first: true,
                        });
                    }
                    Value::Object(object) => {
                        f.write_char('{')?;
                        stack.push(Frame::Object {
                            rest: self.members(object).iter(),
                            first: true,
                        });
                    }
                }
            }

            let Some(frame) = stack.last_mut() else {
                return Ok(());
            };
            match frame {
                Frame::Array { rest, first } => match rest.next() {
                    Some(&index) => {
                        if !*first {
                            f.write_char(',')?;
                        }
                        *first = false;
                        next = Some(index);
                    }
                    None => {
                        f.write_char(']')?;
                        stack.pop();
                    }
                },
                Frame::Object { rest, first } => match rest.next() {
                    Some(member) => {
                        if !*first {
                            f.write_char(',')?;
                        }
                        *first = false;
                        write_quoted(self.text(member.key), f)?;
                        f.write_char(':')?;
                        next = Some(member.value);
                    }
                    None => {
                        f.write_char('}')?;
                        stack.pop();
                    }
                },
            }
        }
    }
}

/// A number as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Number<'doc> {
    lexeme: &'doc str,
    kind: NumberKind,
}

impl<'doc> Number<'doc> {
    /// The validated source text, e.g. `"-12.5e3"`.
    #[must_use]
    pub fn lexeme(&self) -> &'doc str {
        self.lexeme
    }

    /// Integer or float, as written.
    #[must_use]
    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    /// Returns `true` if the lexeme has no fraction or exponent.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.kind == NumberKind::Integer
    }

    /// Nearest `f64`. Magnitudes beyond `f64` become infinities.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        // The lexeme is a valid JSON number, which `f64::from_str` accepts.
        self.lexeme.parse().unwrap_or(f64::NAN)
    }

    /// The exact value, if the lexeme is an integer that fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.lexeme.parse().ok()
        } else {
            None
        }
    }

    /// The exact value, if the lexeme is a non-negative integer that fits in
    /// `u64`.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        if self.is_integer() {
            self.lexeme.parse().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for Number<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexeme)
    }
}

/// Kind tag of a value, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// A number.
    Number,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

/// A borrowed handle to one value of a [`Document`].
#[derive(Clone, Copy)]
pub struct ValueRef<'doc> {
    doc: &'doc Document,
    index: ValueIndex,
}

impl<'doc> ValueRef<'doc> {
    /// Index of this value.
    #[must_use]
    pub fn index(&self) -> ValueIndex {
        self.index
    }

    /// The raw record.
    #[must_use]
    pub fn value(&self) -> Value {
        self.doc.record(self.index)
    }

    /// The value's kind.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self.value() {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Returns `true` if the value is `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind() == ValueKind::Null
    }

    /// The boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.value() {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// The number, if this is one.
    #[must_use]
    pub fn as_number(&self) -> Option<Number<'doc>> {
        match self.value() {
            Value::Number(n) => Some(self.doc.number(n)),
            _ => None,
        }
    }

    /// The string contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&'doc str> {
        match self.value() {
            Value::String(s) => Some(self.doc.text(s)),
            _ => None,
        }
    }

    /// The array, if this is one.
    #[must_use]
    pub fn as_array(&self) -> Option<ArrayView<'doc>> {
        match self.value() {
            Value::Array(array) => Some(ArrayView {
                doc: self.doc,
                elements: self.doc.elements(array),
            }),
            _ => None,
        }
    }

    /// The object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<ObjectView<'doc>> {
        match self.value() {
            Value::Object(object) => Some(ObjectView {
                doc: self.doc,
                members: self.doc.members(object),
            }),
            _ => None,
        }
    }

    /// Copies this value and everything below it into an [`OwnedValue`].
    #[must_use]
    pub fn to_owned_value(&self) -> OwnedValue {
        match self.value() {
            Value::Null => OwnedValue::Null,
            Value::Bool(b) => OwnedValue::Boolean(b),
            Value::Number(n) => {
                let n = self.doc.number(n);
                OwnedValue::Number(OwnedNumber::from_lexeme(n.lexeme(), n.kind()))
            }
            Value::String(s) => OwnedValue::String(self.doc.text(s).into()),
            Value::Array(array) => OwnedValue::Array(
                self.doc
                    .elements(array)
                    .iter()
                    .map(|&index| ValueRef { doc: self.doc, index }.to_owned_value())
                    .collect(),
            ),
            Value::Object(object) => OwnedValue::Object(
                self.doc
                    .members(object)
                    .iter()
                    .map(|m| {
                        let value = ValueRef {
                            doc: self.doc,
                            index: m.value,
                        };
                        (self.doc.text(m.key).into(), value.to_owned_value())
                    })
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(&b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(&self.doc.number(n).lexeme).finish(),
            Value::String(s) => f.debug_tuple("String").field(&self.doc.text(s)).finish(),
            Value::Array(_) => f
                .debug_list()
                .entries(self.as_array().into_iter().flat_map(|a| a.iter()))
                .finish(),
            Value::Object(_) => f
                .debug_map()
                .entries(self.as_object().into_iter().flat_map(|o| o.iter()))
                .finish(),
        }
    }
}

/// A borrowed array.
#[derive(Clone, Copy)]
pub struct ArrayView<'doc> {
    doc: &'doc Document,
    elements: &'doc [ValueIndex],
}

impl<'doc> ArrayView<'doc> {
    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` for `[]`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The `i`-th element.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<ValueRef<'doc>> {
        let doc = self.doc;
        self.elements.get(i).map(|&index| ValueRef { doc, index })
    }

    /// Elements in source order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = ValueRef<'doc>> + use<'doc> {
        let doc = self.doc;
        self.elements.iter().map(move |&index| ValueRef { doc, index })
    }
}

impl fmt::Debug for ArrayView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A borrowed object.
///
/// Members keep source order and duplicates. [`ObjectView::get`] resolves
/// duplicate keys to the **last** occurrence; use [`ObjectView::iter`] to see
/// every member.
#[derive(Clone, Copy)]
pub struct ObjectView<'doc> {
    doc: &'doc Document,
    members: &'doc [Member],
}

impl<'doc> ObjectView<'doc> {
    /// Number of members, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` for `{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Key of the `i`-th member.
    #[must_use]
    pub fn key(&self, i: usize) -> Option<&'doc str> {
        let doc = self.doc;
        self.members.get(i).map(|m| doc.text(m.key))
    }

    /// Value of the `i`-th member.
    #[must_use]
    pub fn value(&self, i: usize) -> Option<ValueRef<'doc>> {
        let doc = self.doc;
        self.members.get(i).map(|m| ValueRef {
            doc,
            index: m.value,
        })
    }

    /// The `i`-th member.
    #[must_use]
    pub fn entry(&self, i: usize) -> Option<(&'doc str, ValueRef<'doc>)> {
        Some((self.key(i)?, self.value(i)?))
    }

    /// Looks up `key`; the last member wins when a key repeats.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ValueRef<'doc>> {
        let doc = self.doc;
        self.members
            .iter()
            .rev()
            .find(|m| doc.text(m.key) == key)
            .map(|m| ValueRef {
                doc,
                index: m.value,
            })
    }

    /// Members in source order, duplicates included.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'doc str, ValueRef<'doc>)> + use<'doc> {
        let doc = self.doc;
        self.members.iter().map(move |m| {
            (
                doc.text(m.key),
                ValueRef {
                    doc,
                    index: m.value,
                },
            )
        })
    }
}

impl fmt::Debug for ObjectView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
