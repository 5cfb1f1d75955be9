// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registries shared by every encode/decode call of a codec.

mod cache;
mod serializer;
mod types;

pub use cache::TypeNameCache;
pub use serializer::SerializerRegistry;
pub use types::{InMemoryTypeRegistry, TypeHandle, TypeRegistry};
