// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Untyped value model.
//!
//! A [`Value`] is what the dispatch engine reads and writes. Every variant
//! maps to exactly one [`WireTag`], and composite variants carry the type
//! descriptors written in front of their payload.

use crate::array::cell_count;
use crate::descriptor::TypeDescriptor;
use crate::error::{CodecError, CodecResult};
use crate::record::ExtractedRecord;
use crate::tag::WireTag;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A decoded (or to-be-encoded) value of any wire shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Type(TypeDescriptor),
    String(String),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Array(ArrayValue),
    List(ListValue),
    Dictionary(DictionaryValue),
    Object(ObjectValue),
}

impl Value {
    /// Tag written in front of this value.
    pub fn tag(&self) -> WireTag {
        match self {
            Self::Null => WireTag::Null,
            Self::Type(_) => WireTag::TypeMarker,
            Self::String(_) => WireTag::String,
            Self::Byte(_) => WireTag::Byte,
            Self::Int16(_) => WireTag::Int16,
            Self::Int32(_) => WireTag::Int32,
            Self::Int64(_) => WireTag::Int64,
            Self::Single(_) => WireTag::Single,
            Self::Double(_) => WireTag::Double,
            Self::Array(_) => WireTag::Array,
            Self::List(_) => WireTag::List,
            Self::Dictionary(_) => WireTag::Dictionary,
            Self::Object(_) => WireTag::Object,
        }
    }

    /// Type descriptor of this value; `None` for null.
    pub fn descriptor(&self) -> Option<TypeDescriptor> {
        Some(match self {
            Self::Null => return None,
            Self::Type(_) => TypeDescriptor::Type,
            Self::String(_) => TypeDescriptor::String,
            Self::Byte(_) => TypeDescriptor::Byte,
            Self::Int16(_) => TypeDescriptor::Int16,
            Self::Int32(_) => TypeDescriptor::Int32,
            Self::Int64(_) => TypeDescriptor::Int64,
            Self::Single(_) => TypeDescriptor::Single,
            Self::Double(_) => TypeDescriptor::Double,
            Self::Array(a) => TypeDescriptor::array(a.element.clone()),
            Self::List(l) => TypeDescriptor::list(l.element.clone()),
            Self::Dictionary(d) => TypeDescriptor::dictionary(d.key.clone(), d.value.clone()),
            Self::Object(o) => TypeDescriptor::Object(o.type_name.clone()),
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short description used in mismatch errors.
    pub fn kind(&self) -> String {
        match self.descriptor() {
            Some(descriptor) => descriptor.to_string(),
            None => WireTag::Null.name().to_string(),
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&DictionaryValue> {
        match self {
            Self::Dictionary(d) => Some(d),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )+
    };
}

impl_from_scalar! {
    u8 => Byte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Single,
    f64 => Double,
}

/// Array of any rank with row-major cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    element: TypeDescriptor,
    dims: Vec<usize>,
    cells: Vec<Value>,
}

impl ArrayValue {
    /// Fails with `UnsupportedShape` unless the product of `dims` equals the
    /// cell count.
    pub fn new(element: TypeDescriptor, dims: Vec<usize>, cells: Vec<Value>) -> CodecResult<Self> {
        if dims.is_empty() {
            return Err(CodecError::UnsupportedShape("array of rank 0".into()));
        }
        if cell_count(&dims) != Some(cells.len()) {
            return Err(CodecError::UnsupportedShape(format!(
                "array dims {:?} do not match {} cells",
                dims,
                cells.len()
            )));
        }
        Ok(Self {
            element,
            dims,
            cells,
        })
    }

    pub fn element(&self) -> &TypeDescriptor {
        &self.element
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn into_parts(self) -> (TypeDescriptor, Vec<usize>, Vec<Value>) {
        (self.element, self.dims, self.cells)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    element: TypeDescriptor,
    items: Vec<Value>,
}

impl ListValue {
    pub fn new(element: TypeDescriptor, items: Vec<Value>) -> Self {
        Self { element, items }
    }

    pub fn element(&self) -> &TypeDescriptor {
        &self.element
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_parts(self) -> (TypeDescriptor, Vec<Value>) {
        (self.element, self.items)
    }
}

/// Dictionary with insertion-ordered entries and unique keys.
///
/// Keys are indexed by hash. Entries sharing a hash are chained through
/// `chain` and told apart by `PartialEq`.
#[derive(Debug, Clone)]
pub struct DictionaryValue {
    key: TypeDescriptor,
    value: TypeDescriptor,
    entries: Vec<(Value, Value)>,
    index: HashMap<u64, usize>,
    chain: Vec<Option<usize>>,
}

impl DictionaryValue {
    pub fn new(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::with_capacity(key, value, 0)
    }

    pub fn with_capacity(key: TypeDescriptor, value: TypeDescriptor, capacity: usize) -> Self {
        Self {
            key,
            value,
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            chain: Vec::with_capacity(capacity),
        }
    }

    /// Insert an entry. An equal key keeps its position and takes the new
    /// value; the previous value is returned.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        let hash = key_hash(&key);
        if let Some(i) = self.position(hash, &key) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        let i = self.entries.len();
        self.entries.push((key, value));
        self.chain.push(self.index.insert(hash, i));
        None
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key_hash(key), key).map(|i| &self.entries[i].1)
    }

    fn position(&self, hash: u64, key: &Value) -> Option<usize> {
        let mut next = self.index.get(&hash).copied();
        while let Some(i) = next {
            if self.entries[i].0 == *key {
                return Some(i);
            }
            next = self.chain[i];
        }
        None
    }

    pub fn key_descriptor(&self) -> &TypeDescriptor {
        &self.key
    }

    pub fn value_descriptor(&self) -> &TypeDescriptor {
        &self.value
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(Value, Value)> {
        self.entries
    }
}

impl PartialEq for DictionaryValue {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value && self.entries == other.entries
    }
}

fn key_hash(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_value(value, &mut hasher);
    hasher.finish()
}

/// Hash agreeing with `PartialEq`: floats hash by bit pattern, with negative
/// zero folded onto zero.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Null => {}
        Value::Type(descriptor) => descriptor.hash(state),
        Value::String(s) => s.hash(state),
        Value::Byte(v) => v.hash(state),
        Value::Int16(v) => v.hash(state),
        Value::Int32(v) => v.hash(state),
        Value::Int64(v) => v.hash(state),
        Value::Single(v) => (if *v == 0.0 { 0.0f32 } else { *v }).to_bits().hash(state),
        Value::Double(v) => (if *v == 0.0 { 0.0f64 } else { *v }).to_bits().hash(state),
        Value::Array(array) => {
            array.element.hash(state);
            array.dims.hash(state);
            array.cells.iter().for_each(|cell| hash_value(cell, state));
        }
        Value::List(list) => {
            list.element.hash(state);
            list.items.len().hash(state);
            list.items.iter().for_each(|item| hash_value(item, state));
        }
        Value::Dictionary(dict) => {
            dict.key.hash(state);
            dict.value.hash(state);
            dict.entries.len().hash(state);
            for (k, v) in &dict.entries {
                hash_value(k, state);
                hash_value(v, state);
            }
        }
        Value::Object(object) => {
            object.type_name.hash(state);
            object.record.len().hash(state);
            for (key, field) in object.record.iter() {
                key.hash(state);
                hash_value(field, state);
            }
        }
    }
}

/// An object instance: its wire type name plus the record its strategy
/// extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    type_name: Arc<str>,
    record: ExtractedRecord,
}

impl ObjectValue {
    pub fn new(type_name: impl Into<Arc<str>>, record: ExtractedRecord) -> Self {
        Self {
            type_name: type_name.into(),
            record,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn record(&self) -> &ExtractedRecord {
        &self.record
    }

    pub fn into_record(self) -> ExtractedRecord {
        self.record
    }
}
