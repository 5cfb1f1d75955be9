// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named-field strategy.

use super::{reflection_of, Arguments, FieldStrategy};
use crate::codec::Codec;
use crate::error::{CodecError, CodecResult};
use crate::record::{ExtractedRecord, FieldKey, KeyMode};
use crate::registry::TypeHandle;
use std::any::Any;

/// Extracts one `(name, value)` pair per parameter of the canonical
/// constructor, sorted by name. Reconstruction looks values up by name, so
/// the wire order does not matter.
#[derive(Debug, Default, Clone, Copy)]
pub struct NamedFieldStrategy;

impl FieldStrategy for NamedFieldStrategy {
    fn name(&self) -> &'static str {
        "named"
    }

    fn key_mode(&self) -> KeyMode {
        KeyMode::Named
    }

    fn extract(
        &self,
        handle: &TypeHandle,
        object: &dyn Any,
        codec: &Codec,
    ) -> CodecResult<ExtractedRecord> {
        let reflection = reflection_of(handle)?;
        let mut params: Vec<&String> = reflection.canonical().parameters().iter().collect();
        params.sort();

        let mut record = ExtractedRecord::with_capacity(params.len());
        for param in params {
            let value = reflection.read_field(param, object, codec)?;
            record.push(FieldKey::Named(param.clone()), value);
        }
        Ok(record)
    }

    fn reconstruct(
        &self,
        handle: &TypeHandle,
        mut record: ExtractedRecord,
        codec: &Codec,
    ) -> CodecResult<Box<dyn Any>> {
        let reflection = reflection_of(handle)?;
        let ctor = reflection.canonical();
        if record.len() != ctor.parameters().len() {
            return Err(CodecError::mismatch(
                handle.name(),
                format!(
                    "expected {} fields, got {}",
                    ctor.parameters().len(),
                    record.len()
                ),
            ));
        }

        let mut values = Vec::with_capacity(record.len());
        for param in ctor.parameters() {
            let value = record.take(param).ok_or_else(|| {
                CodecError::mismatch(handle.name(), format!("missing field '{}'", param))
            })?;
            values.push(value);
        }

        let mut args = Arguments::new(handle.name(), values, codec);
        ctor.invoke(&mut args)
    }
}
