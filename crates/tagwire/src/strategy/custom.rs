// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Strategy built from caller-supplied closures.

use super::{Arguments, FieldStrategy, TupleWriter};
use crate::codec::Codec;
use crate::error::{CodecError, CodecResult};
use crate::record::{ExtractedRecord, KeyMode};
use crate::registry::TypeHandle;
use std::any::Any;
use std::fmt;

type ExtractFn<T> = Box<dyn Fn(&T, &mut TupleWriter<'_>) -> CodecResult<()> + Send + Sync>;
type ReconstructFn<T> = Box<dyn Fn(&mut Arguments<'_>) -> CodecResult<T> + Send + Sync>;

/// Positional strategy for `T` driven by an extract/reconstruct pair.
///
/// ```ignore
/// let strategy = CustomStrategy::new(
///     |p: &Point, out| { out.push(&p.x)?; out.push(&p.y) },
///     |args| Ok(Point::new(args.next()?, args.next()?)),
/// );
/// ```
pub struct CustomStrategy<T> {
    extract: ExtractFn<T>,
    reconstruct: ReconstructFn<T>,
}

impl<T: Any> CustomStrategy<T> {
    pub fn new<E, R>(extract: E, reconstruct: R) -> Self
    where
        E: Fn(&T, &mut TupleWriter<'_>) -> CodecResult<()> + Send + Sync + 'static,
        R: Fn(&mut Arguments<'_>) -> CodecResult<T> + Send + Sync + 'static,
    {
        Self {
            extract: Box::new(extract),
            reconstruct: Box::new(reconstruct),
        }
    }
}

impl<T> fmt::Debug for CustomStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomStrategy")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: Any> FieldStrategy for CustomStrategy<T> {
    fn name(&self) -> &'static str {
        "custom"
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
        let object = object
            .downcast_ref::<T>()
            .ok_or_else(|| CodecError::type_mismatch(std::any::type_name::<T>(), handle.name()))?;
        let mut writer = TupleWriter::new(codec);
        (self.extract)(object, &mut writer)?;
        Ok(writer.finish())
    }

    fn reconstruct(
        &self,
        handle: &TypeHandle,
        record: ExtractedRecord,
        codec: &Codec,
    ) -> CodecResult<Box<dyn Any>> {
        let mut args = Arguments::new(handle.name(), record.into_values().collect(), codec);
        let object = (self.reconstruct)(&mut args)?;
        args.finish()?;
        Ok(Box::new(object))
    }
}
