// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch engine: the recursive tagged encode/decode of [`Value`] graphs.
//!
//! ```text
//! Value               := Tag Payload
//! Payload(Null)       := -
//! Payload(TypeMarker) := TypeDescriptor
//! Payload(Array)      := TypeDescriptor Int32(rank) Int32[rank] Value*   (row-major)
//! Payload(List)       := TypeDescriptor Int32(count) Value*
//! Payload(Dictionary) := TypeDescriptor Int32(count) (Value Value)*
//! Payload(Object)     := TypeDescriptor Byte(count) (Name? Value)*
//! Payload(String)     := Int32(length) ASCII
//! Payload(scalar)     := fixed-width little-endian
//! ```
//!
//! Composite payloads start with the full descriptor of the value's type,
//! so the composite tag appears twice in a row.

use crate::array::cell_count;
use crate::codec::Codec;
use crate::descriptor::{read_descriptor_within, write_descriptor_within, TypeDescriptor};
use crate::error::{CodecError, CodecResult};
use crate::record::{ExtractedRecord, FieldKey, KeyMode};
use crate::registry::TypeHandle;
use crate::stream::{
    read_ascii, read_count, read_name, read_tag, write_ascii, write_count, write_name, write_tag,
};
use crate::tag::WireTag;
use crate::value::{ArrayValue, DictionaryValue, ListValue, ObjectValue, Value};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Most fields an object can carry: the count is a single byte.
pub const MAX_OBJECT_FIELDS: usize = u8::MAX as usize;

/// Upper bound on capacity reserved from an untrusted count.
const MAX_PREALLOC: usize = 1024;

/// Encode `value` onto `sink`.
pub(crate) fn encode<W: Write + ?Sized>(
    codec: &Codec,
    sink: &mut W,
    value: &Value,
) -> CodecResult<()> {
    Encoder { codec, sink }.encode_value(value, 0)
}

/// Decode one value from `source`.
pub(crate) fn decode<R: Read + ?Sized>(codec: &Codec, source: &mut R) -> CodecResult<Value> {
    Decoder { codec, source }.decode_value(0)
}

struct Encoder<'a, W: Write + ?Sized> {
    codec: &'a Codec,
    sink: &'a mut W,
}

impl<'a, W: Write + ?Sized> Encoder<'a, W> {
    fn encode_value(&mut self, value: &Value, depth: usize) -> CodecResult<()> {
        if depth >= self.codec.config().max_depth {
            return Err(CodecError::UnsupportedShape(format!(
                "value nested deeper than {}",
                self.codec.config().max_depth
            )));
        }

        write_tag(self.sink, value.tag())?;
        match value {
            Value::Null => {}
            Value::Type(descriptor) => self.write_descriptor(descriptor)?,
            Value::String(s) => write_ascii(self.sink, s, self.codec.config().string_policy)?,
            Value::Byte(v) => self.sink.write_u8(*v)?,
            Value::Int16(v) => self.sink.write_i16::<LittleEndian>(*v)?,
            Value::Int32(v) => self.sink.write_i32::<LittleEndian>(*v)?,
            Value::Int64(v) => self.sink.write_i64::<LittleEndian>(*v)?,
            Value::Single(v) => self.sink.write_f32::<LittleEndian>(*v)?,
            Value::Double(v) => self.sink.write_f64::<LittleEndian>(*v)?,
            Value::Array(array) => self.encode_array(array, depth)?,
            Value::List(list) => self.encode_list(list, depth)?,
            Value::Dictionary(dict) => self.encode_dictionary(dict, depth)?,
            Value::Object(object) => self.encode_object(object, depth)?,
        }
        Ok(())
    }

    /// Descriptors share the value nesting limit.
    fn write_descriptor(&mut self, descriptor: &TypeDescriptor) -> CodecResult<()> {
        write_descriptor_within(self.sink, descriptor, self.codec.config().max_depth)
    }

    fn encode_array(&mut self, array: &ArrayValue, depth: usize) -> CodecResult<()> {
        self.write_descriptor(&TypeDescriptor::array(array.element().clone()))?;
        write_count(self.sink, array.dims().len())?;
        for &dim in array.dims() {
            write_count(self.sink, dim)?;
        }
        for cell in array.cells() {
            self.encode_value(cell, depth + 1)?;
        }
        Ok(())
    }

    fn encode_list(&mut self, list: &ListValue, depth: usize) -> CodecResult<()> {
        self.write_descriptor(&TypeDescriptor::list(list.element().clone()))?;
        write_count(self.sink, list.len())?;
        for item in list.items() {
            self.encode_value(item, depth + 1)?;
        }
        Ok(())
    }

    fn encode_dictionary(&mut self, dict: &DictionaryValue, depth: usize) -> CodecResult<()> {
        let descriptor = TypeDescriptor::dictionary(
            dict.key_descriptor().clone(),
            dict.value_descriptor().clone(),
        );
        self.write_descriptor(&descriptor)?;
        write_count(self.sink, dict.len())?;
        for (key, value) in dict.entries() {
            self.encode_value(key, depth + 1)?;
            self.encode_value(value, depth + 1)?;
        }
        Ok(())
    }

    fn encode_object(&mut self, object: &ObjectValue, depth: usize) -> CodecResult<()> {
        let handle = self.codec.resolve_name(object.type_name()).map_err(|e| match e {
            CodecError::UnresolvedType { name } => {
                CodecError::UnsupportedShape(format!("object type '{}' is not registered", name))
            }
            other => other,
        })?;
        let strategy = self.codec.serializers().resolve(handle.type_id());
        let record = object.record();

        if record.len() > MAX_OBJECT_FIELDS {
            return Err(CodecError::FieldCountOverflow {
                type_name: handle.name().to_string(),
                count: record.len(),
                max: MAX_OBJECT_FIELDS,
            });
        }
        log::trace!(
            "[engine] encode {} ({} fields, {})",
            handle.name(),
            record.len(),
            strategy.name()
        );

        self.write_descriptor(&TypeDescriptor::Object(handle.shared_name().clone()))?;
        self.sink.write_u8(record.len() as u8)?;
        let mode = strategy.key_mode();
        for (key, value) in record.iter() {
            if key.mode() != mode {
                return Err(CodecError::mismatch(
                    handle.name(),
                    format!("{:?} key under a {} strategy", key, strategy.name()),
                ));
            }
            if let FieldKey::Named(name) = key {
                write_name(self.sink, name)?;
            }
            self.encode_value(value, depth + 1)?;
        }
        Ok(())
    }
}

struct Decoder<'a, R: Read + ?Sized> {
    codec: &'a Codec,
    source: &'a mut R,
}

impl<'a, R: Read + ?Sized> Decoder<'a, R> {
    fn decode_value(&mut self, depth: usize) -> CodecResult<Value> {
        if depth >= self.codec.config().max_depth {
            return Err(CodecError::malformed(format!(
                "value nested deeper than {}",
                self.codec.config().max_depth
            )));
        }

        let tag = read_tag(self.source)?;
        Ok(match tag {
            WireTag::Null => Value::Null,
            WireTag::TypeMarker => Value::Type(self.read_resolved_descriptor()?),
            WireTag::String => {
                Value::String(read_ascii(self.source, self.codec.config().string_policy)?)
            }
            WireTag::Byte => Value::Byte(self.source.read_u8()?),
            WireTag::Int16 => Value::Int16(self.source.read_i16::<LittleEndian>()?),
            WireTag::Int32 => Value::Int32(self.source.read_i32::<LittleEndian>()?),
            WireTag::Int64 => Value::Int64(self.source.read_i64::<LittleEndian>()?),
            WireTag::Single => Value::Single(self.source.read_f32::<LittleEndian>()?),
            WireTag::Double => Value::Double(self.source.read_f64::<LittleEndian>()?),
            WireTag::Array => self.decode_array(depth)?,
            WireTag::List => self.decode_list(depth)?,
            WireTag::Dictionary => self.decode_dictionary(depth)?,
            WireTag::Object => self.decode_object(depth)?,
        })
    }

    fn read_descriptor(&mut self) -> CodecResult<TypeDescriptor> {
        read_descriptor_within(self.source, self.codec.config().max_depth)
    }

    /// Read a descriptor and resolve every object name it mentions.
    fn read_resolved_descriptor(&mut self) -> CodecResult<TypeDescriptor> {
        let descriptor = self.read_descriptor()?;
        for name in descriptor.object_names() {
            self.codec.resolve_name(name)?;
        }
        Ok(descriptor)
    }

    /// Read the descriptor following a composite tag; its own tag must repeat
    /// the value tag.
    fn read_composite_descriptor(&mut self, tag: WireTag) -> CodecResult<TypeDescriptor> {
        let descriptor = self.read_resolved_descriptor()?;
        if descriptor.tag() != tag {
            return Err(CodecError::malformed(format!(
                "{} value carries a {} descriptor",
                tag, descriptor
            )));
        }
        Ok(descriptor)
    }

    fn decode_array(&mut self, depth: usize) -> CodecResult<Value> {
        let descriptor = self.read_composite_descriptor(WireTag::Array)?;
        let element = element_of(descriptor)?;

        let rank = read_count(self.source, "array rank")?;
        if rank == 0 {
            return Err(CodecError::malformed("array of rank 0"));
        }
        let mut dims = Vec::with_capacity(rank.min(MAX_PREALLOC));
        for _ in 0..rank {
            dims.push(read_count(self.source, "array dimension")?);
        }
        let total = cell_count(&dims)
            .ok_or_else(|| CodecError::malformed(format!("array dims {:?} overflow", dims)))?;

        let mut cells = Vec::with_capacity(total.min(MAX_PREALLOC));
        for _ in 0..total {
            cells.push(self.decode_value(depth + 1)?);
        }
        Ok(Value::Array(ArrayValue::new(element, dims, cells)?))
    }

    fn decode_list(&mut self, depth: usize) -> CodecResult<Value> {
        let descriptor = self.read_composite_descriptor(WireTag::List)?;
        let element = element_of(descriptor)?;

        let count = read_count(self.source, "list count")?;
        let mut items = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            items.push(self.decode_value(depth + 1)?);
        }
        Ok(Value::List(ListValue::new(element, items)))
    }

    fn decode_dictionary(&mut self, depth: usize) -> CodecResult<Value> {
        let (key, value) = match self.read_composite_descriptor(WireTag::Dictionary)? {
            TypeDescriptor::Dictionary(key, value) => (*key, *value),
            other => {
                return Err(CodecError::malformed(format!(
                    "expected dictionary, got {}",
                    other
                )))
            }
        };

        let count = read_count(self.source, "dictionary count")?;
        let mut dict = DictionaryValue::with_capacity(key, value, count.min(MAX_PREALLOC));
        for _ in 0..count {
            let k = self.decode_value(depth + 1)?;
            let v = self.decode_value(depth + 1)?;
            dict.insert(k, v);
        }
        Ok(Value::Dictionary(dict))
    }

    fn decode_object(&mut self, depth: usize) -> CodecResult<Value> {
        let name = match self.read_descriptor()? {
            TypeDescriptor::Object(name) => name,
            other => {
                return Err(CodecError::malformed(format!(
                    "object value carries a {} descriptor",
                    other
                )))
            }
        };
        let handle = self.codec.resolve_name(&name)?;
        self.decode_fields(&handle, depth)
    }

    fn decode_fields(&mut self, handle: &TypeHandle, depth: usize) -> CodecResult<Value> {
        let strategy = self.codec.serializers().resolve(handle.type_id());
        let count = usize::from(self.source.read_u8()?);
        log::trace!(
            "[engine] decode {} ({} fields, {})",
            handle.name(),
            count,
            strategy.name()
        );

        let mut record = ExtractedRecord::with_capacity(count);
        for i in 0..count {
            let key = match strategy.key_mode() {
                KeyMode::Named => FieldKey::Named(read_name(self.source)?),
                KeyMode::Positional => FieldKey::Position(i),
            };
            let value = self.decode_value(depth + 1)?;
            record.push(key, value);
        }
        Ok(Value::Object(ObjectValue::new(
            handle.shared_name().clone(),
            record,
        )))
    }
}

fn element_of(descriptor: TypeDescriptor) -> CodecResult<TypeDescriptor> {
    match descriptor {
        TypeDescriptor::Array(element) | TypeDescriptor::List(element) => Ok(*element),
        other => Err(CodecError::malformed(format!("{} has no element type", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CodecConfig, StringPolicy};
    use crate::strategy::PositionalStrategy;
    use std::io::Cursor;
    use std::sync::Arc;

    struct Gauge;

    fn codec_with_gauge() -> Codec {
        let codec = Codec::new();
        codec
            .register_strategy_as::<Gauge>("demo.Gauge", Arc::new(PositionalStrategy))
            .expect("register");
        codec
    }

    fn roundtrip(codec: &Codec, value: &Value) -> Value {
        let mut buf = Vec::new();
        encode(codec, &mut buf, value).expect("encode");
        let mut cursor = Cursor::new(buf);
        let decoded = decode(codec, &mut cursor).expect("decode");
        assert_eq!(cursor.position() as usize, cursor.get_ref().len());
        decoded
    }

    #[test]
    fn test_scalars_little_endian() {
        let codec = Codec::new();
        let mut buf = Vec::new();
        encode(&codec, &mut buf, &Value::Int32(0x0102_0304)).expect("encode");
        assert_eq!(buf, vec![7, 0x04, 0x03, 0x02, 0x01]);

        let mut buf = Vec::new();
        encode(&codec, &mut buf, &Value::Int16(-2)).expect("encode");
        assert_eq!(buf, vec![6, 0xfe, 0xff]);

        for value in [
            Value::Null,
            Value::Byte(0xff),
            Value::Int64(i64::MIN),
            Value::Single(1.5),
            Value::Double(-0.25),
            Value::from("tagged"),
            Value::Type(TypeDescriptor::list(TypeDescriptor::Int64)),
        ] {
            assert_eq!(roundtrip(&codec, &value), value);
        }
    }

    #[test]
    fn test_list_repeats_composite_tag() {
        let codec = Codec::new();
        let list = Value::List(ListValue::new(
            TypeDescriptor::Byte,
            vec![Value::Byte(1), Value::Byte(2)],
        ));
        let mut buf = Vec::new();
        encode(&codec, &mut buf, &list).expect("encode");
        assert_eq!(buf, vec![9, 9, 5, 2, 0, 0, 0, 5, 1, 5, 2]);
        assert_eq!(roundtrip(&codec, &list), list);
    }

    #[test]
    fn test_descriptor_tag_must_match_value_tag() {
        let codec = Codec::new();
        // List tag followed by an array descriptor.
        let bytes = vec![9, 3, 7, 0, 0, 0, 0];
        assert!(matches!(
            decode(&codec, &mut Cursor::new(bytes)),
            Err(CodecError::MalformedStream(_))
        ));
    }

    #[test]
    fn test_positional_object_writes_no_keys() {
        let codec = codec_with_gauge();
        let mut record = ExtractedRecord::new();
        record.push(0usize, Value::Int32(3));
        let object = Value::Object(ObjectValue::new("demo.Gauge", record));

        let mut buf = Vec::new();
        encode(&codec, &mut buf, &object).expect("encode");
        let mut expected = vec![13, 13, 10];
        expected.extend_from_slice(b"demo.Gauge");
        expected.extend_from_slice(&[1, 7, 3, 0, 0, 0]);
        assert_eq!(buf, expected);
        assert_eq!(roundtrip(&codec, &object), object);
    }

    #[test]
    fn test_key_mode_mismatch_rejected() {
        let codec = codec_with_gauge();
        let mut record = ExtractedRecord::new();
        record.push("x", Value::Int32(3));
        let object = Value::Object(ObjectValue::new("demo.Gauge", record));
        assert!(matches!(
            encode(&codec, &mut Vec::new(), &object),
            Err(CodecError::StrategyMismatch { .. })
        ));
    }

    #[test]
    fn test_field_count_overflow() {
        let codec = codec_with_gauge();
        let record: ExtractedRecord = (0..=MAX_OBJECT_FIELDS)
            .map(|i| (FieldKey::Position(i), Value::Byte(0)))
            .collect();
        let object = Value::Object(ObjectValue::new("demo.Gauge", record));
        let mut buf = Vec::new();
        assert!(matches!(
            encode(&codec, &mut buf, &object),
            Err(CodecError::FieldCountOverflow { count: 256, max: 255, .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let codec = Codec::with_config(CodecConfig::default().max_depth(2)).expect("config");
        let inner = Value::List(ListValue::new(TypeDescriptor::Int32, vec![Value::Int32(1)]));
        let outer = Value::List(ListValue::new(
            TypeDescriptor::list(TypeDescriptor::Int32),
            vec![inner.clone()],
        ));

        assert_eq!(roundtrip(&codec, &inner), inner);
        assert!(matches!(
            encode(&codec, &mut Vec::new(), &outer),
            Err(CodecError::UnsupportedShape(_))
        ));

        let mut buf = Vec::new();
        encode(&Codec::new(), &mut buf, &outer).expect("encode");
        assert!(matches!(
            decode(&codec, &mut Cursor::new(buf)),
            Err(CodecError::MalformedStream(_))
        ));
    }

    #[test]
    fn test_descriptor_nesting_follows_max_depth() {
        let element = (1..70).fold(TypeDescriptor::Int32, |inner, _| TypeDescriptor::list(inner));
        let value = Value::List(ListValue::new(element, vec![]));

        let codec = Codec::new();
        assert_eq!(roundtrip(&codec, &value), value);
        let marker = Value::Type(value.descriptor().expect("typed"));
        assert_eq!(roundtrip(&codec, &marker), marker);

        let shallow = Codec::with_config(CodecConfig::default().max_depth(32)).expect("config");
        assert!(matches!(
            encode(&shallow, &mut Vec::new(), &value),
            Err(CodecError::UnsupportedShape(_))
        ));
        let mut buf = Vec::new();
        encode(&codec, &mut buf, &value).expect("encode");
        assert!(matches!(
            decode(&shallow, &mut Cursor::new(buf)),
            Err(CodecError::MalformedStream(_))
        ));
    }

    #[test]
    fn test_unregistered_object_is_unsupported_on_encode() {
        let codec = Codec::new();
        let ghost = Value::Object(ObjectValue::new("demo.Ghost", ExtractedRecord::new()));
        assert!(matches!(
            encode(&codec, &mut Vec::new(), &ghost),
            Err(CodecError::UnsupportedShape(_))
        ));
        assert!(codec.type_names().is_empty());
    }

    #[test]
    fn test_string_policy_applies_to_payloads() {
        let codec = Codec::with_config(CodecConfig::default().string_policy(StringPolicy::Replace))
            .expect("config");
        let decoded = roundtrip(&codec, &Value::from("na\u{ef}ve"));
        assert_eq!(decoded, Value::from("na?ve"));

        assert!(matches!(
            encode(&Codec::new(), &mut Vec::new(), &Value::from("na\u{ef}ve")),
            Err(CodecError::NonAsciiString(_))
        ));
    }

    #[test]
    fn test_huge_count_does_not_preallocate() {
        let codec = Codec::new();
        let mut bytes = vec![9, 9, 5];
        bytes.extend_from_slice(&i32::MAX.to_le_bytes());
        assert!(matches!(
            decode(&codec, &mut Cursor::new(bytes)),
            Err(CodecError::MalformedStream(_))
        ));
    }
}
