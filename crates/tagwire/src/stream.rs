// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Low-level reads and writes on the byte sink/source.
//!
//! All multi-byte numbers are little-endian. Two string encodings coexist:
//!
//! ```text
//! String payload : Int32 byte length | ASCII bytes
//! Name / key     : 7-bit varint byte length | UTF-8 bytes
//! ```

use crate::config::StringPolicy;
use crate::error::{CodecError, CodecResult};
use crate::tag::WireTag;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Longest 7-bit varint accepted for a 32-bit length.
const MAX_VARINT_BYTES: usize = 5;

pub(crate) fn write_tag<W: Write + ?Sized>(w: &mut W, tag: WireTag) -> CodecResult<()> {
    w.write_u8(tag.as_u8())?;
    Ok(())
}

pub(crate) fn read_tag<R: Read + ?Sized>(r: &mut R) -> CodecResult<WireTag> {
    WireTag::try_from(r.read_u8()?)
}

/// Write a count or length as Int32.
pub(crate) fn write_count<W: Write + ?Sized>(w: &mut W, count: usize) -> CodecResult<()> {
    let count = i32::try_from(count).map_err(|_| {
        CodecError::UnsupportedShape(format!("length {} does not fit in Int32", count))
    })?;
    w.write_i32::<LittleEndian>(count)?;
    Ok(())
}

/// Read an Int32 count or length; negative values are malformed.
pub(crate) fn read_count<R: Read + ?Sized>(r: &mut R, what: &str) -> CodecResult<usize> {
    let raw = r.read_i32::<LittleEndian>()?;
    usize::try_from(raw).map_err(|_| CodecError::malformed(format!("negative {}: {}", what, raw)))
}

/// Write a name or field key (7-bit varint length + UTF-8).
pub(crate) fn write_name<W: Write + ?Sized>(w: &mut W, name: &str) -> CodecResult<()> {
    let bytes = name.as_bytes();
    let mut len = u32::try_from(bytes.len())
        .map_err(|_| CodecError::UnsupportedShape(format!("name of {} bytes", bytes.len())))?;
    while len >= 0x80 {
        w.write_u8((len as u8) | 0x80)?;
        len >>= 7;
    }
    w.write_u8(len as u8)?;
    w.write_all(bytes)?;
    Ok(())
}

pub(crate) fn read_name<R: Read + ?Sized>(r: &mut R) -> CodecResult<String> {
    let mut len: u32 = 0;
    let mut shift = 0;
    for i in 0..MAX_VARINT_BYTES {
        let byte = r.read_u8()?;
        len |= u32::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        if i + 1 == MAX_VARINT_BYTES {
            return Err(CodecError::malformed("name length varint too long"));
        }
        shift += 7;
    }
    let bytes = read_exact_vec(r, len as usize)?;
    String::from_utf8(bytes).map_err(|e| CodecError::malformed(format!("name is not UTF-8: {}", e)))
}

/// Write a string payload (Int32 byte length + ASCII bytes).
pub(crate) fn write_ascii<W: Write + ?Sized>(
    w: &mut W,
    s: &str,
    policy: StringPolicy,
) -> CodecResult<()> {
    if s.is_ascii() {
        write_count(w, s.len())?;
        w.write_all(s.as_bytes())?;
        return Ok(());
    }
    match policy {
        StringPolicy::Strict => Err(CodecError::NonAsciiString(s.to_string())),
        StringPolicy::Replace => {
            let bytes: Vec<u8> = s
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect();
            write_count(w, bytes.len())?;
            w.write_all(&bytes)?;
            Ok(())
        }
    }
}

pub(crate) fn read_ascii<R: Read + ?Sized>(r: &mut R, policy: StringPolicy) -> CodecResult<String> {
    let len = read_count(r, "string length")?;
    let mut bytes = read_exact_vec(r, len)?;
    if !bytes.is_ascii() {
        match policy {
            StringPolicy::Strict => {
                return Err(CodecError::malformed("string payload is not ASCII"));
            }
            StringPolicy::Replace => {
                for b in bytes.iter_mut().filter(|b| !b.is_ascii()) {
                    *b = b'?';
                }
            }
        }
    }
    // ASCII is valid UTF-8.
    String::from_utf8(bytes).map_err(|e| CodecError::malformed(e.to_string()))
}

/// Read exactly `len` bytes without trusting `len` for the allocation.
fn read_exact_vec<R: Read + ?Sized>(r: &mut R, len: usize) -> CodecResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let read = r.take(len as u64).read_to_end(&mut bytes)?;
    if read != len {
        return Err(CodecError::malformed(format!(
            "expected {} bytes, stream ended after {}",
            len, read
        )));
    }
    Ok(bytes)
}
