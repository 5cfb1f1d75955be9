// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field-extraction strategies.
//!
//! A strategy turns an object instance into an [`ExtractedRecord`] and back.
//! For any one type, `reconstruct(extract(x))` must equal `x`: the number and
//! order of values produced by extraction is exactly what reconstruction
//! consumes.
//!
//! - [`NamedFieldStrategy`]: keys travel with the values (the default).
//! - [`PositionalStrategy`]: only value order travels.
//! - [`CustomStrategy`]: caller-supplied closures, positional.

mod custom;
mod named;
mod positional;

pub use custom::CustomStrategy;
pub use named::NamedFieldStrategy;
pub use positional::PositionalStrategy;

use crate::codec::Codec;
use crate::error::{CodecError, CodecResult};
use crate::record::{ExtractedRecord, KeyMode};
use crate::reflect::Reflection;
use crate::registry::TypeHandle;
use crate::value::Value;
use crate::wire::Wire;
use std::any::Any;

/// Converts objects of a type to records and back.
pub trait FieldStrategy: Send + Sync {
    /// Strategy name, for logs.
    fn name(&self) -> &'static str;

    /// Whether extracted keys are written on the wire.
    fn key_mode(&self) -> KeyMode;

    /// Produce the record of `object`, whose runtime type is `handle`.
    fn extract(
        &self,
        handle: &TypeHandle,
        object: &dyn Any,
        codec: &Codec,
    ) -> CodecResult<ExtractedRecord>;

    /// Build an instance of `handle` from a decoded record.
    fn reconstruct(
        &self,
        handle: &TypeHandle,
        record: ExtractedRecord,
        codec: &Codec,
    ) -> CodecResult<Box<dyn Any>>;
}

/// Declared metadata the reflective strategies rely on.
fn reflection_of(handle: &TypeHandle) -> CodecResult<&Reflection> {
    handle.reflection().ok_or_else(|| {
        CodecError::UnsupportedShape(format!(
            "{} has no declared constructors or fields",
            handle.name()
        ))
    })
}

/// Values handed to a constructor, consumed in order.
pub struct Arguments<'a> {
    type_name: &'a str,
    values: std::vec::IntoIter<Value>,
    consumed: usize,
    codec: &'a Codec,
}

impl<'a> Arguments<'a> {
    pub(crate) fn new(type_name: &'a str, values: Vec<Value>, codec: &'a Codec) -> Self {
        Self {
            type_name,
            values: values.into_iter(),
            consumed: 0,
            codec,
        }
    }

    /// Next argument converted to `V`.
    #[allow(clippy::should_implement_trait)]
    pub fn next<V: Wire>(&mut self) -> CodecResult<V> {
        let value = self.next_value()?;
        V::from_value(value, self.codec)
    }

    /// Next argument as an untyped value.
    pub fn next_value(&mut self) -> CodecResult<Value> {
        let value = self.values.next().ok_or_else(|| {
            CodecError::mismatch(
                self.type_name,
                format!("constructor wants more than {} values", self.consumed),
            )
        })?;
        self.consumed += 1;
        Ok(value)
    }

    /// Arguments not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    pub fn codec(&self) -> &Codec {
        self.codec
    }

    pub(crate) fn finish(&self) -> CodecResult<()> {
        match self.remaining() {
            0 => Ok(()),
            left => Err(CodecError::mismatch(
                self.type_name,
                format!("{} values left after {} consumed", left, self.consumed),
            )),
        }
    }
}

/// Positional record under construction, for custom extractors.
pub struct TupleWriter<'a> {
    record: ExtractedRecord,
    codec: &'a Codec,
}

impl<'a> TupleWriter<'a> {
    pub(crate) fn new(codec: &'a Codec) -> Self {
        Self {
            record: ExtractedRecord::new(),
            codec,
        }
    }

    /// Append a typed value.
    pub fn push<V: Wire>(&mut self, value: &V) -> CodecResult<()> {
        let value = value.to_value(self.codec)?;
        self.push_value(value);
        Ok(())
    }

    /// Append an untyped value.
    pub fn push_value(&mut self, value: Value) {
        let position = self.record.len();
        self.record.push(position, value);
    }

    pub fn codec(&self) -> &Codec {
        self.codec
    }

    pub(crate) fn finish(self) -> ExtractedRecord {
        self.record
    }
}
