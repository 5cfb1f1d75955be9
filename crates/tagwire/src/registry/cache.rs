// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type name cache in front of the type registry.

use super::types::{TypeHandle, TypeRegistry};
use crate::error::{CodecError, CodecResult};
use dashmap::DashMap;
use std::sync::Arc;

/// Memoized name -> handle lookups.
///
/// Starts empty and fills lazily on first use of each name. Once a name is
/// cached its handle is never replaced, even if the registry later changes.
#[derive(Default)]
pub struct TypeNameCache {
    entries: DashMap<Arc<str>, TypeHandle>,
}

impl TypeNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name`, consulting `registry` on a miss.
    pub fn resolve(&self, name: &str, registry: &dyn TypeRegistry) -> CodecResult<TypeHandle> {
        if let Some(hit) = self.entries.get(name) {
            return Ok(hit.value().clone());
        }

        let handle = registry
            .get_by_name(name)
            .ok_or_else(|| CodecError::UnresolvedType {
                name: name.to_string(),
            })?;
        log::debug!("[cache] miss for '{}' -> {}", name, handle.rust_name());

        // A racing resolver may have inserted first; keep whichever landed.
        let cached = self
            .entries
            .entry(Arc::from(name))
            .or_insert(handle)
            .value()
            .clone();
        Ok(cached)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
