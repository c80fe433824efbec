//! The value store: an append-only table of tagged value records.
//!
//! Arrays and objects do not own their children. Each container records a
//! span into a flat element (or member) table, and every child is a
//! [`ValueIndex`]. Children are always committed before their container, so
//! every index points strictly backwards and the tree is acyclic by
//! construction.
//!
//! Builders for nested containers share one scratch stack per table: an inner
//! container's entries sit on top of its parent's and are moved into the flat
//! table when it finishes, which keeps each finished container's entries
//! contiguous.

use alloc::vec::Vec;

use crate::{arena::StringRef, error::InternalError, number::NumberRef};

/// Index of a value inside a [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValueIndex(u32);

impl ValueIndex {
    /// Position in the value table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index into the document's table of element lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArrayRef(u32);

/// Index into the document's table of member lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ObjectRef(u32);

/// One committed value record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Value {
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// A number, kept as its source lexeme.
    Number(NumberRef),
    /// A string, after escape processing.
    String(StringRef),
    /// An array; elements are in source order.
    Array(ArrayRef),
    /// An object; members are in source order, duplicates included.
    Object(ObjectRef),
}

/// The subset of [`Value`] that can be committed without a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scalar {
    Null,
    Bool(bool),
    Number(NumberRef),
    String(StringRef),
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Number(n) => Value::Number(n),
            Scalar::String(s) => Value::String(s),
        }
    }
}

/// One `(key, value)` pair of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Member {
    pub(crate) key: StringRef,
    pub(crate) value: ValueIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: u32,
    end: u32,
}

impl Span {
    fn range(self) -> core::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// The configured value limit was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TooManyValues;

// Table lengths never exceed the value count, which is capped at `u32::MAX`.
#[allow(clippy::cast_possible_truncation)]
fn table_index(len: usize) -> u32 {
    debug_assert!(u32::try_from(len).is_ok());
    len as u32
}

#[derive(Debug)]
pub(crate) struct ValueStore {
    values: Vec<Value>,
    elements: Vec<ValueIndex>,
    arrays: Vec<Span>,
    members: Vec<Member>,
    objects: Vec<Span>,

    element_scratch: Vec<ValueIndex>,
    member_scratch: Vec<Member>,
    /// Containers opened but not yet finished; each holds a reserved slot.
    open: usize,
    max_values: usize,
}

/// Accumulates the elements of one array until it closes.
#[derive(Debug)]
pub(crate) struct ArrayBuilder {
    scratch_start: usize,
}

/// Accumulates the members of one object until it closes.
#[derive(Debug)]
pub(crate) struct ObjectBuilder {
    scratch_start: usize,
    pending_key: Option<StringRef>,
}

impl ValueStore {
    pub(crate) fn new(max_values: usize) -> Self {
        Self {
            values: Vec::new(),
            elements: Vec::new(),
            arrays: Vec::new(),
            members: Vec::new(),
            objects: Vec::new(),
            element_scratch: Vec::new(),
            member_scratch: Vec::new(),
            open: 0,
            max_values,
        }
    }

    fn reserve_slot(&self) -> Result<(), TooManyValues> {
        if self.values.len() + self.open >= self.max_values {
            return Err(TooManyValues);
        }
        Ok(())
    }

    fn commit(&mut self, value: Value) -> ValueIndex {
        let index = ValueIndex(table_index(self.values.len()));
        self.values.push(value);
        index
    }

    pub(crate) fn put_scalar(&mut self, scalar: Scalar) -> Result<ValueIndex, TooManyValues> {
        self.reserve_slot()?;
        Ok(self.commit(scalar.into()))
    }

    pub(crate) fn begin_array(&mut self) -> Result<ArrayBuilder, TooManyValues> {
        self.reserve_slot()?;
        self.open += 1;
        Ok(ArrayBuilder {
            scratch_start: self.element_scratch.len(),
        })
    }

    pub(crate) fn begin_object(&mut self) -> Result<ObjectBuilder, TooManyValues> {
        self.reserve_slot()?;
        self.open += 1;
        Ok(ObjectBuilder {
            scratch_start: self.member_scratch.len(),
            pending_key: None,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn get(&self, index: ValueIndex) -> Option<Value> {
        self.values.get(index.index()).copied()
    }

    pub(crate) fn elements(&self, array: ArrayRef) -> &[ValueIndex] {
        self.arrays
            .get(array.0 as usize)
            .map_or(&[], |span| &self.elements[span.range()])
    }

    pub(crate) fn members(&self, object: ObjectRef) -> &[Member] {
        self.objects
            .get(object.0 as usize)
            .map_or(&[], |span| &self.members[span.range()])
    }

    /// Drops builder scratch space once parsing is complete.
    pub(crate) fn seal(&mut self) {
        debug_assert_eq!(self.open, 0);
        self.element_scratch = Vec::new();
        self.member_scratch = Vec::new();
    }
}

impl ArrayBuilder {
    pub(crate) fn push(&mut self, store: &mut ValueStore, value: ValueIndex) {
        debug_assert!(store.element_scratch.len() >= self.scratch_start);
        store.element_scratch.push(value);
    }

    pub(crate) fn finish(self, store: &mut ValueStore) -> ValueIndex {
        let start = table_index(store.elements.len());
        store
            .elements
            .extend(store.element_scratch.drain(self.scratch_start..));
        let span = Span {
            start,
            end: table_index(store.elements.len()),
        };
        let array = ArrayRef(table_index(store.arrays.len()));
        store.arrays.push(span);
        store.open -= 1;
        store.commit(Value::Array(array))
    }
}

impl ObjectBuilder {
    pub(crate) fn set_key(&mut self, key: StringRef) {
        debug_assert!(self.pending_key.is_none());
        self.pending_key = Some(key);
    }

    /// Pairs `value` with the key seen last.
    pub(crate) fn push(
        &mut self,
        store: &mut ValueStore,
        value: ValueIndex,
    ) -> Result<(), InternalError> {
        let key = self
            .pending_key
            .take()
            .ok_or(InternalError::BuilderMismatch)?;
        store.member_scratch.push(Member { key, value });
        Ok(())
    }

    pub(crate) fn finish(self, store: &mut ValueStore) -> Result<ValueIndex, InternalError> {
        if self.pending_key.is_some() {
            return Err(InternalError::BuilderMismatch);
        }
        let start = table_index(store.members.len());
        store
            .members
            .extend(store.member_scratch.drain(self.scratch_start..));
        let span = Span {
            start,
            end: table_index(store.members.len()),
        };
        let object = ObjectRef(table_index(store.objects.len()));
        store.objects.push(span);
        store.open -= 1;
        Ok(store.commit(Value::Object(object)))
    }
}
