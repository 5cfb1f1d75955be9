// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed layer: mapping Rust types onto wire shapes.
//!
//! Each supported type has exactly one [`Wire`] impl and therefore exactly
//! one tag. Object types opt in with [`wire_object!`](crate::wire_object)
//! and are routed through the codec's strategy registry.

use crate::array::NdArray;
use crate::codec::Codec;
use crate::descriptor::TypeDescriptor;
use crate::error::{CodecError, CodecResult};
use crate::value::{ArrayValue, DictionaryValue, ListValue, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;

/// A Rust type with a wire shape.
pub trait Wire: Sized + 'static {
    /// Descriptor written for values of this type.
    fn descriptor(codec: &Codec) -> CodecResult<TypeDescriptor>;

    fn to_value(&self, codec: &Codec) -> CodecResult<Value>;

    /// Rebuild from a decoded value; a shape other than this type's is a
    /// `TypeMismatch`.
    fn from_value(value: Value, codec: &Codec) -> CodecResult<Self>;
}

fn mismatch(expected: &TypeDescriptor, found: &Value) -> CodecError {
    CodecError::type_mismatch(expected.to_string(), found.kind())
}

/// Element or key descriptor carried by a decoded container must match
/// the one this type would write.
fn check_descriptor(expected: &TypeDescriptor, found: &TypeDescriptor) -> CodecResult<()> {
    if expected != found {
        return Err(CodecError::type_mismatch(
            expected.to_string(),
            found.to_string(),
        ));
    }
    Ok(())
}

macro_rules! wire_scalar {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Wire for $ty {
                fn descriptor(_codec: &Codec) -> CodecResult<TypeDescriptor> {
                    Ok(TypeDescriptor::$variant)
                }

                fn to_value(&self, _codec: &Codec) -> CodecResult<Value> {
                    Ok(Value::$variant(*self))
                }

                fn from_value(value: Value, _codec: &Codec) -> CodecResult<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch(&TypeDescriptor::$variant, &other)),
                    }
                }
            }
        )+
    };
}

wire_scalar! {
    u8 => Byte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Single,
    f64 => Double,
}

impl Wire for String {
    fn descriptor(_codec: &Codec) -> CodecResult<TypeDescriptor> {
        Ok(TypeDescriptor::String)
    }

    fn to_value(&self, _codec: &Codec) -> CodecResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: Value, _codec: &Codec) -> CodecResult<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch(&TypeDescriptor::String, &other)),
        }
    }
}

impl Wire for TypeDescriptor {
    fn descriptor(_codec: &Codec) -> CodecResult<TypeDescriptor> {
        Ok(TypeDescriptor::Type)
    }

    fn to_value(&self, _codec: &Codec) -> CodecResult<Value> {
        Ok(Value::Type(self.clone()))
    }

    fn from_value(value: Value, _codec: &Codec) -> CodecResult<Self> {
        match value {
            Value::Type(descriptor) => Ok(descriptor),
            other => Err(mismatch(&TypeDescriptor::Type, &other)),
        }
    }
}

/// `None` is written as a bare null tag.
impl<T: Wire> Wire for Option<T> {
    fn descriptor(codec: &Codec) -> CodecResult<TypeDescriptor> {
        T::descriptor(codec)
    }

    fn to_value(&self, codec: &Codec) -> CodecResult<Value> {
        match self {
            Some(v) => v.to_value(codec),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: Value, codec: &Codec) -> CodecResult<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::from_value(value, codec).map(Some)
    }
}

fn list_to_value<'a, T: Wire>(
    items: impl ExactSizeIterator<Item = &'a T>,
    codec: &Codec,
) -> CodecResult<Value> {
    let element = T::descriptor(codec)?;
    let items = items
        .map(|item| item.to_value(codec))
        .collect::<CodecResult<Vec<_>>>()?;
    Ok(Value::List(ListValue::new(element, items)))
}

fn list_from_value<T: Wire>(value: Value, codec: &Codec) -> CodecResult<Vec<T>> {
    let expected = T::descriptor(codec)?;
    match value {
        Value::List(list) => {
            let (element, items) = list.into_parts();
            check_descriptor(&expected, &element)?;
            items
                .into_iter()
                .map(|item| T::from_value(item, codec))
                .collect()
        }
        other => Err(mismatch(&TypeDescriptor::list(expected), &other)),
    }
}

impl<T: Wire> Wire for Vec<T> {
    fn descriptor(codec: &Codec) -> CodecResult<TypeDescriptor> {
        Ok(TypeDescriptor::list(T::descriptor(codec)?))
    }

    fn to_value(&self, codec: &Codec) -> CodecResult<Value> {
        list_to_value(self.iter(), codec)
    }

    fn from_value(value: Value, codec: &Codec) -> CodecResult<Self> {
        list_from_value(value, codec)
    }
}

impl<T: Wire> Wire for VecDeque<T> {
    fn descriptor(codec: &Codec) -> CodecResult<TypeDescriptor> {
        Ok(TypeDescriptor::list(T::descriptor(codec)?))
    }

    fn to_value(&self, codec: &Codec) -> CodecResult<Value> {
        list_to_value(self.iter(), codec)
    }

    fn from_value(value: Value, codec: &Codec) -> CodecResult<Self> {
        list_from_value(value, codec).map(VecDeque::from)
    }
}

fn dictionary_to_value<'a, K: Wire, V: Wire>(
    entries: impl ExactSizeIterator<Item = (&'a K, &'a V)>,
    codec: &Codec,
) -> CodecResult<Value> {
    let mut dict =
        DictionaryValue::with_capacity(K::descriptor(codec)?, V::descriptor(codec)?, entries.len());
    for (key, value) in entries {
        dict.insert(key.to_value(codec)?, value.to_value(codec)?);
    }
    Ok(Value::Dictionary(dict))
}

/// Decoded entries in wire order; callers insert them so the last value for
/// a key wins.
fn dictionary_entries<K: Wire, V: Wire>(
    value: Value,
    codec: &Codec,
) -> CodecResult<Vec<(K, V)>> {
    let key = K::descriptor(codec)?;
    let val = V::descriptor(codec)?;
    match value {
        Value::Dictionary(dict) => {
            check_descriptor(&key, dict.key_descriptor())?;
            check_descriptor(&val, dict.value_descriptor())?;
            dict.into_entries()
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k, codec)?, V::from_value(v, codec)?)))
                .collect()
        }
        other => Err(mismatch(&TypeDescriptor::dictionary(key, val), &other)),
    }
}

impl<K: Wire + Eq + Hash, V: Wire> Wire for HashMap<K, V> {
    fn descriptor(codec: &Codec) -> CodecResult<TypeDescriptor> {
        Ok(TypeDescriptor::dictionary(
            K::descriptor(codec)?,
            V::descriptor(codec)?,
        ))
    }

    fn to_value(&self, codec: &Codec) -> CodecResult<Value> {
        dictionary_to_value(self.iter(), codec)
    }

    fn from_value(value: Value, codec: &Codec) -> CodecResult<Self> {
        Ok(dictionary_entries(value, codec)?.into_iter().collect())
    }
}

impl<K: Wire + Ord, V: Wire> Wire for BTreeMap<K, V> {
    fn descriptor(codec: &Codec) -> CodecResult<TypeDescriptor> {
        Ok(TypeDescriptor::dictionary(
            K::descriptor(codec)?,
            V::descriptor(codec)?,
        ))
    }

    fn to_value(&self, codec: &Codec) -> CodecResult<Value> {
        dictionary_to_value(self.iter(), codec)
    }

    fn from_value(value: Value, codec: &Codec) -> CodecResult<Self> {
        Ok(dictionary_entries(value, codec)?.into_iter().collect())
    }
}

fn array_parts<T: Wire>(value: Value, codec: &Codec) -> CodecResult<(Vec<usize>, Vec<T>)> {
    let expected = T::descriptor(codec)?;
    match value {
        Value::Array(array) => {
            let (element, dims, cells) = array.into_parts();
            check_descriptor(&expected, &element)?;
            let cells = cells
                .into_iter()
                .map(|cell| T::from_value(cell, codec))
                .collect::<CodecResult<Vec<_>>>()?;
            Ok((dims, cells))
        }
        other => Err(mismatch(&TypeDescriptor::array(expected), &other)),
    }
}

fn array_to_value<T: Wire>(dims: Vec<usize>, cells: &[T], codec: &Codec) -> CodecResult<Value> {
    let cells = cells
        .iter()
        .map(|cell| cell.to_value(codec))
        .collect::<CodecResult<Vec<_>>>()?;
    Ok(Value::Array(ArrayValue::new(
        T::descriptor(codec)?,
        dims,
        cells,
    )?))
}

/// Fixed-size arrays are rank-1 wire arrays.
impl<T: Wire, const N: usize> Wire for [T; N] {
    fn descriptor(codec: &Codec) -> CodecResult<TypeDescriptor> {
        Ok(TypeDescriptor::array(T::descriptor(codec)?))
    }

    fn to_value(&self, codec: &Codec) -> CodecResult<Value> {
        array_to_value(vec![N], self, codec)
    }

    fn from_value(value: Value, codec: &Codec) -> CodecResult<Self> {
        let (dims, cells) = array_parts::<T>(value, codec)?;
        if dims != [N] {
            return Err(CodecError::type_mismatch(
                format!("array of dims [{}]", N),
                format!("array of dims {:?}", dims),
            ));
        }
        cells.try_into().map_err(|cells: Vec<T>| {
            CodecError::type_mismatch(format!("{} cells", N), format!("{} cells", cells.len()))
        })
    }
}

impl<T: Wire> Wire for NdArray<T> {
    fn descriptor(codec: &Codec) -> CodecResult<TypeDescriptor> {
        Ok(TypeDescriptor::array(T::descriptor(codec)?))
    }

    fn to_value(&self, codec: &Codec) -> CodecResult<Value> {
        array_to_value(self.dims().to_vec(), self.cells(), codec)
    }

    fn from_value(value: Value, codec: &Codec) -> CodecResult<Self> {
        let (dims, cells) = array_parts::<T>(value, codec)?;
        NdArray::new(dims, cells)
    }
}

/// Implement [`Wire`] for declared object types.
///
/// The type must be declared on the codec (or registered with a custom
/// strategy) before use.
///
/// ```ignore
/// struct Point { x: i32, y: i32 }
/// tagwire::wire_object!(Point);
/// ```
#[macro_export]
macro_rules! wire_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Wire for $ty {
                fn descriptor(
                    codec: &$crate::Codec,
                ) -> $crate::CodecResult<$crate::TypeDescriptor> {
                    codec.object_descriptor::<Self>()
                }

                fn to_value(&self, codec: &$crate::Codec) -> $crate::CodecResult<$crate::Value> {
                    codec.object_to_value(self)
                }

                fn from_value(
                    value: $crate::Value,
                    codec: &$crate::Codec,
                ) -> $crate::CodecResult<Self> {
                    codec.object_from_value::<Self>(value)
                }
            }
        )+
    };
}
