// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec error types.
//!
//! Every failure aborts the whole encode/decode call: there is no
//! partial-result mode and nothing is retried.

use std::io;
use thiserror::Error;

/// Errors raised while encoding or decoding a value graph.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value's runtime type has no wire shape (undeclared object type,
    /// missing constructor metadata, nesting too deep).
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),

    /// An object type name has no match in the type registry.
    #[error("unresolved type: {name}")]
    UnresolvedType { name: String },

    /// Tag byte out of range, truncated input, or inconsistent lengths.
    #[error("malformed stream: {0}")]
    MalformedStream(String),

    /// An object extracted more fields than the one-byte field count holds.
    #[error("object {type_name} has {count} fields (max {max})")]
    FieldCountOverflow {
        type_name: String,
        count: usize,
        max: usize,
    },

    /// Extract/reconstruct disagree on the number, order or keys of values.
    #[error("strategy mismatch for {type_name}: {reason}")]
    StrategyMismatch { type_name: String, reason: String },

    /// A decoded value does not have the shape the caller asked for.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// String payloads are ASCII only under the strict string policy.
    #[error("string is not ASCII: {0:?}")]
    NonAsciiString(String),

    /// Sink or source failure other than running out of bytes.
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedStream(reason.into())
    }

    pub(crate) fn mismatch(type_name: &str, reason: impl Into<String>) -> Self {
        Self::StrategyMismatch {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::MalformedStream("unexpected end of stream".into())
        } else {
            Self::Io(e)
        }
    }
}

/// Result alias used throughout the crate.
pub type CodecResult<T> = Result<T, CodecError>;
