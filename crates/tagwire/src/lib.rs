// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # tagwire - self-describing tagged binary codec
//!
//! Serializes arbitrary value graphs without per-type wire code. Every value
//! is written as a one-byte tag followed by its payload; composite values
//! also carry a recursive type descriptor, so a decoder can rebuild the
//! shape of the graph without knowing the types in advance.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tagwire::{Codec, ReflectionBuilder};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//! tagwire::wire_object!(Point);
//!
//! fn main() -> tagwire::CodecResult<()> {
//!     let codec = Codec::new();
//!     codec.register::<Point, _, _>(
//!         |p, out| { out.push(&p.x)?; out.push(&p.y) },
//!         |args| Ok(Point { x: args.next()?, y: args.next()? }),
//!     )?;
//!
//!     let bytes = codec.to_bytes(&vec![Point { x: 3, y: 4 }])?;
//!     let points: Vec<Point> = codec.from_bytes(&bytes)?;
//!     assert_eq!(points, vec![Point { x: 3, y: 4 }]);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +----------------------------------------------------------------+
//! |  Typed layer       Wire impls, wire_object!, Codec facade       |
//! +----------------------------------------------------------------+
//! |  Strategies        named | positional | custom                  |
//! |  Registries        serializer registry, type registry, cache    |
//! +----------------------------------------------------------------+
//! |  Dispatch engine   tag -> descriptor -> payload, recursive      |
//! +----------------------------------------------------------------+
//! |  Wire primitives   tags, descriptors, little-endian scalars     |
//! +----------------------------------------------------------------+
//! ```
//!
//! ## Shapes
//!
//! | Rust type | Tag |
//! |-----------|-----|
//! | `u8`, `i16`, `i32`, `i64` | Byte, Int16, Int32, Int64 |
//! | `f32`, `f64` | Single, Double |
//! | `String` | String (ASCII) |
//! | `[T; N]`, [`NdArray<T>`] | Array (any rank, row-major) |
//! | `Vec<T>`, `VecDeque<T>` | List |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | Dictionary |
//! | `Option<T>` | Null or the shape of `T` |
//! | [`TypeDescriptor`] | TypeMarker |
//! | declared types (`wire_object!`) | Object |

pub mod array;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod record;
pub mod reflect;
pub mod registry;
pub mod strategy;
mod stream;
pub mod tag;
pub mod value;
pub mod wire;

pub use array::NdArray;
pub use codec::{Codec, CodecBuilder};
pub use config::{CodecConfig, ConfigError, DefaultStrategy, StringPolicy};
pub use descriptor::{read_descriptor, write_descriptor, TypeDescriptor};
pub use error::{CodecError, CodecResult};
pub use record::{ExtractedRecord, FieldKey, KeyMode};
pub use reflect::{Constructor, Reflection, ReflectionBuilder};
pub use registry::{
    InMemoryTypeRegistry, SerializerRegistry, TypeHandle, TypeNameCache, TypeRegistry,
};
pub use strategy::{
    Arguments, CustomStrategy, FieldStrategy, NamedFieldStrategy, PositionalStrategy, TupleWriter,
};
pub use tag::WireTag;
pub use value::{ArrayValue, DictionaryValue, ListValue, ObjectValue, Value};
pub use wire::Wire;

use std::any::Any;
use std::io::{Read, Write};

/// Encode `value` with the process-wide codec.
pub fn serialize<T: Wire, W: Write + ?Sized>(sink: &mut W, value: &T) -> CodecResult<()> {
    Codec::global().serialize(sink, value)
}

/// Decode one `T` with the process-wide codec.
pub fn deserialize<T: Wire, R: Read + ?Sized>(source: &mut R) -> CodecResult<T> {
    Codec::global().deserialize(source)
}

/// Encode an untyped value with the process-wide codec.
pub fn serialize_value<W: Write + ?Sized>(sink: &mut W, value: &Value) -> CodecResult<()> {
    Codec::global().serialize_value(sink, value)
}

/// Decode one value of unknown type with the process-wide codec.
pub fn deserialize_value<R: Read + ?Sized>(source: &mut R) -> CodecResult<Value> {
    Codec::global().deserialize_value(source)
}

/// Bind a custom strategy to `T` on the process-wide codec.
pub fn register<T, E, R>(extract: E, reconstruct: R) -> CodecResult<()>
where
    T: Any,
    E: Fn(&T, &mut TupleWriter<'_>) -> CodecResult<()> + Send + Sync + 'static,
    R: Fn(&mut Arguments<'_>) -> CodecResult<T> + Send + Sync + 'static,
{
    Codec::global().register(extract, reconstruct)
}

/// Declare `T` on the process-wide codec.
pub fn declare<T: Any>(builder: ReflectionBuilder<T>) -> CodecResult<TypeHandle> {
    Codec::global().declare(builder)
}
