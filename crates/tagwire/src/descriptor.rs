// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the recursive structural description of a type that
//! precedes every composite value on the wire.
//!
//! ```text
//! TypeDescriptor := Tag
//!     Array | List  => TypeDescriptor(element)
//!     Dictionary    => TypeDescriptor(key) TypeDescriptor(value)
//!     Object        => Name(type name)
//!     otherwise     => (nothing)
//! ```
//!
//! Reading a descriptor never resolves object names; that is left to the
//! type registry so the written name and the type answering to it are
//! decoupled.

use crate::error::{CodecError, CodecResult};
use crate::stream::{read_name, read_tag, write_name, write_tag};
use crate::tag::WireTag;
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

/// Nesting limit of [`write_descriptor`] and [`read_descriptor`]. A codec
/// applies its configured `max_depth` instead.
pub const MAX_DESCRIPTOR_DEPTH: usize = 64;

/// Structural description of a runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// The type of a type descriptor value.
    Type,
    String,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    /// Array of any rank.
    Array(Box<TypeDescriptor>),
    List(Box<TypeDescriptor>),
    Dictionary(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// Object type, by wire name.
    Object(Arc<str>),
}

impl TypeDescriptor {
    pub fn array(element: TypeDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn list(element: TypeDescriptor) -> Self {
        Self::List(Box::new(element))
    }

    pub fn dictionary(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Dictionary(Box::new(key), Box::new(value))
    }

    pub fn object(name: impl Into<Arc<str>>) -> Self {
        Self::Object(name.into())
    }

    /// Tag written in front of this descriptor.
    pub fn tag(&self) -> WireTag {
        match self {
            Self::Type => WireTag::TypeMarker,
            Self::String => WireTag::String,
            Self::Byte => WireTag::Byte,
            Self::Int16 => WireTag::Int16,
            Self::Int32 => WireTag::Int32,
            Self::Int64 => WireTag::Int64,
            Self::Single => WireTag::Single,
            Self::Double => WireTag::Double,
            Self::Array(_) => WireTag::Array,
            Self::List(_) => WireTag::List,
            Self::Dictionary(_, _) => WireTag::Dictionary,
            Self::Object(_) => WireTag::Object,
        }
    }

    /// Element type of an array or list.
    pub fn element(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::Array(element) | Self::List(element) => Some(element),
            _ => None,
        }
    }

    /// Wire name of an object type.
    pub fn object_name(&self) -> Option<&Arc<str>> {
        match self {
            Self::Object(name) => Some(name),
            _ => None,
        }
    }

    /// Every object name referenced anywhere in this descriptor.
    pub fn object_names(&self) -> Vec<&Arc<str>> {
        let mut names = Vec::new();
        self.collect_object_names(&mut names);
        names
    }

    /// Levels of nesting, counting this one.
    pub fn depth(&self) -> usize {
        match self {
            Self::Array(element) | Self::List(element) => 1 + element.depth(),
            Self::Dictionary(key, value) => 1 + key.depth().max(value.depth()),
            _ => 1,
        }
    }

    fn collect_object_names<'a>(&'a self, out: &mut Vec<&'a Arc<str>>) {
        match self {
            Self::Array(element) | Self::List(element) => element.collect_object_names(out),
            Self::Dictionary(key, value) => {
                key.collect_object_names(out);
                value.collect_object_names(out);
            }
            Self::Object(name) => out.push(name),
            _ => {}
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(element) => write!(f, "array<{}>", element),
            Self::List(element) => write!(f, "list<{}>", element),
            Self::Dictionary(key, value) => write!(f, "dictionary<{}, {}>", key, value),
            Self::Object(name) => write!(f, "object<{}>", name),
            other => f.write_str(other.tag().name()),
        }
    }
}

/// Write `descriptor` to the sink.
pub fn write_descriptor<W: Write + ?Sized>(
    sink: &mut W,
    descriptor: &TypeDescriptor,
) -> CodecResult<()> {
    write_descriptor_within(sink, descriptor, MAX_DESCRIPTOR_DEPTH)
}

/// Write `descriptor`, refusing trees nested deeper than `limit`.
pub(crate) fn write_descriptor_within<W: Write + ?Sized>(
    sink: &mut W,
    descriptor: &TypeDescriptor,
    limit: usize,
) -> CodecResult<()> {
    if descriptor.depth() > limit {
        return Err(CodecError::UnsupportedShape(format!(
            "type descriptor nested deeper than {}",
            limit
        )));
    }
    write_descriptor_tree(sink, descriptor)
}

fn write_descriptor_tree<W: Write + ?Sized>(
    sink: &mut W,
    descriptor: &TypeDescriptor,
) -> CodecResult<()> {
    write_tag(sink, descriptor.tag())?;
    match descriptor {
        TypeDescriptor::Array(element) | TypeDescriptor::List(element) => {
            write_descriptor_tree(sink, element)
        }
        TypeDescriptor::Dictionary(key, value) => {
            write_descriptor_tree(sink, key)?;
            write_descriptor_tree(sink, value)
        }
        TypeDescriptor::Object(name) => write_name(sink, name),
        _ => Ok(()),
    }
}

/// Read a descriptor tree from the source. Object names are returned raw.
pub fn read_descriptor<R: Read + ?Sized>(source: &mut R) -> CodecResult<TypeDescriptor> {
    read_descriptor_within(source, MAX_DESCRIPTOR_DEPTH)
}

/// Read a descriptor tree nested at most `limit` levels deep.
pub(crate) fn read_descriptor_within<R: Read + ?Sized>(
    source: &mut R,
    limit: usize,
) -> CodecResult<TypeDescriptor> {
    read_descriptor_at(source, 0, limit)
}

fn read_descriptor_at<R: Read + ?Sized>(
    source: &mut R,
    depth: usize,
    limit: usize,
) -> CodecResult<TypeDescriptor> {
    if depth >= limit {
        return Err(CodecError::malformed(format!(
            "type descriptor nested deeper than {}",
            limit
        )));
    }
    let nested = depth + 1;
    Ok(match read_tag(source)? {
        WireTag::Null => return Err(CodecError::malformed("null is not a type")),
        WireTag::TypeMarker => TypeDescriptor::Type,
        WireTag::String => TypeDescriptor::String,
        WireTag::Byte => TypeDescriptor::Byte,
        WireTag::Int16 => TypeDescriptor::Int16,
        WireTag::Int32 => TypeDescriptor::Int32,
        WireTag::Int64 => TypeDescriptor::Int64,
        WireTag::Single => TypeDescriptor::Single,
        WireTag::Double => TypeDescriptor::Double,
        WireTag::Array => TypeDescriptor::array(read_descriptor_at(source, nested, limit)?),
        WireTag::List => TypeDescriptor::list(read_descriptor_at(source, nested, limit)?),
        WireTag::Dictionary => {
            let key = read_descriptor_at(source, nested, limit)?;
            let value = read_descriptor_at(source, nested, limit)?;
            TypeDescriptor::dictionary(key, value)
        }
        WireTag::Object => TypeDescriptor::object(read_name(source)?),
    })
}
