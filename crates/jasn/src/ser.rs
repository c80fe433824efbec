//! `serde::Serialize` for parsed and owned trees.
//!
//! Objects serialize as maps in source order; repeated keys are emitted as
//! they appear and it is up to the serializer what to make of them. Numbers
//! go out as `u64` or `i64` when the lexeme is an integer that fits, and as
//! `f64` otherwise.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{
    document::{ArrayView, Number, ObjectView, ValueRef},
    number::NumberKind,
    value::{OwnedNumber, OwnedValue},
};

fn serialize_number<S: Serializer>(
    lexeme: &str,
    kind: NumberKind,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if kind == NumberKind::Integer {
        if let Ok(n) = lexeme.parse::<u64>() {
            return serializer.serialize_u64(n);
        }
        if let Ok(n) = lexeme.parse::<i64>() {
            return serializer.serialize_i64(n);
        }
    }
    serializer.serialize_f64(lexeme.parse().unwrap_or(f64::NAN))
}

impl Serialize for Number<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_number(self.lexeme(), self.kind(), serializer)
    }
}

impl Serialize for ValueRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(b) = self.as_bool() {
            serializer.serialize_bool(b)
        } else if let Some(n) = self.as_number() {
            n.serialize(serializer)
        } else if let Some(s) = self.as_str() {
            serializer.serialize_str(s)
        } else if let Some(array) = self.as_array() {
            array.serialize(serializer)
        } else if let Some(object) = self.as_object() {
            object.serialize(serializer)
        } else {
            serializer.serialize_unit()
        }
    }
}

impl Serialize for ArrayView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self.iter() {
            seq.serialize_element(&element)?;
        }
        seq.end()
    }
}

impl Serialize for ObjectView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

impl Serialize for OwnedNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_number(self.lexeme(), self.kind(), serializer)
    }
}

impl Serialize for OwnedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OwnedValue::Null => serializer.serialize_unit(),
            OwnedValue::Boolean(b) => serializer.serialize_bool(*b),
            OwnedValue::Number(n) => n.serialize(serializer),
            OwnedValue::String(s) => serializer.serialize_str(s),
            OwnedValue::Array(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            OwnedValue::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (key, value) in members {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
