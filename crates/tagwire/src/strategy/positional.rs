// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Positional (tuple) strategy.

use super::{reflection_of, Arguments, FieldStrategy};
use crate::codec::Codec;
use crate::error::{CodecError, CodecResult};
use crate::record::{ExtractedRecord, FieldKey, KeyMode};
use crate::registry::TypeHandle;
use std::any::Any;

/// Extracts values in canonical-constructor parameter order and never
/// transmits keys. Reconstruction passes values in the order received.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionalStrategy;

impl FieldStrategy for PositionalStrategy {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn key_mode(&self) -> KeyMode {
        KeyMode::Positional
    }

    fn extract(
        &self,
        handle: &TypeHandle,
        object: &dyn Any,
        codec: &Codec,
    ) -> CodecResult<ExtractedRecord> {
        let reflection = reflection_of(handle)?;
        let params = reflection.canonical().parameters();

        let mut record = ExtractedRecord::with_capacity(params.len());
        for (i, param) in params.iter().enumerate() {
            record.push(
                FieldKey::Position(i),
                reflection.read_field(param, object, codec)?,
            );
        }
        Ok(record)
    }

    fn reconstruct(
        &self,
        handle: &TypeHandle,
        record: ExtractedRecord,
        codec: &Codec,
    ) -> CodecResult<Box<dyn Any>> {
        let reflection = reflection_of(handle)?;
        let ctor = reflection.canonical();
        let expected = ctor.parameters().len();
        if record.len() != expected {
            return Err(CodecError::mismatch(
                handle.name(),
                format!("expected {} values, got {}", expected, record.len()),
            ));
        }

        let mut args = Arguments::new(handle.name(), record.into_values().collect(), codec);
        ctor.invoke(&mut args)
    }
}
