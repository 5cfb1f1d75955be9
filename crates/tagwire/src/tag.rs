// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire tags: the one-byte discriminator in front of every encoded value.

use crate::error::CodecError;
use std::fmt;

/// Shape of the value that follows on the wire.
///
/// Byte `0` is reserved ("unknown") and never written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireTag {
    Null = 1,
    TypeMarker = 2,
    Array = 3,
    String = 4,
    Byte = 5,
    Int16 = 6,
    Int32 = 7,
    Int64 = 8,
    List = 9,
    Double = 10,
    Single = 11,
    Dictionary = 12,
    Object = 13,
}

impl WireTag {
    /// Raw tag byte.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::TypeMarker => "type",
            Self::Array => "array",
            Self::String => "string",
            Self::Byte => "byte",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::List => "list",
            Self::Double => "double",
            Self::Single => "single",
            Self::Dictionary => "dictionary",
            Self::Object => "object",
        }
    }
}

impl TryFrom<u8> for WireTag {
    type Error = CodecError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            1 => Self::Null,
            2 => Self::TypeMarker,
            3 => Self::Array,
            4 => Self::String,
            5 => Self::Byte,
            6 => Self::Int16,
            7 => Self::Int32,
            8 => Self::Int64,
            9 => Self::List,
            10 => Self::Double,
            11 => Self::Single,
            12 => Self::Dictionary,
            13 => Self::Object,
            other => {
                return Err(CodecError::malformed(format!(
                    "invalid wire tag 0x{:02x}",
                    other
                )))
            }
        })
    }
}

impl fmt::Display for WireTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
