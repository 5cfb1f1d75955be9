// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: maps wire names to runtime types.

use crate::error::{CodecError, CodecResult};
use crate::reflect::Reflection;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A resolved runtime type.
#[derive(Clone)]
pub struct TypeHandle {
    name: Arc<str>,
    type_id: TypeId,
    rust_name: &'static str,
    reflection: Option<Arc<Reflection>>,
}

impl TypeHandle {
    /// Handle for `T` under wire name `name`, without reflection metadata.
    pub fn of<T: Any>(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            rust_name: std::any::type_name::<T>(),
            reflection: None,
        }
    }

    #[must_use]
    pub fn with_reflection(mut self, reflection: Reflection) -> Self {
        self.reflection = Some(Arc::new(reflection));
        self
    }

    /// Wire name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    pub fn reflection(&self) -> Option<&Reflection> {
        self.reflection.as_deref()
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("name", &self.name)
            .field("rust_name", &self.rust_name)
            .field("reflection", &self.reflection.is_some())
            .finish()
    }
}

/// Source of truth for wire name ⇄ runtime type.
pub trait TypeRegistry: Send + Sync {
    /// Look up a type by wire name. `None` if unknown.
    fn get_by_name(&self, name: &str) -> Option<TypeHandle>;

    /// Look up a type by runtime identity. `None` if unknown.
    fn get_by_id(&self, type_id: TypeId) -> Option<TypeHandle>;

    /// Register `handle`. Re-registering a type replaces its handle; binding
    /// a name already taken by another type is an error.
    fn register(&self, handle: TypeHandle) -> CodecResult<()>;
}

#[derive(Default)]
struct Maps {
    by_name: HashMap<Arc<str>, TypeId>,
    by_id: HashMap<TypeId, TypeHandle>,
}

/// [`HashMap`]-backed [`TypeRegistry`] behind a read/write lock.
#[derive(Default)]
pub struct InMemoryTypeRegistry {
    maps: RwLock<Maps>,
}

impl InMemoryTypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.read().by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeRegistry for InMemoryTypeRegistry {
    fn get_by_name(&self, name: &str) -> Option<TypeHandle> {
        let maps = self.maps.read();
        let type_id = maps.by_name.get(name)?;
        maps.by_id.get(type_id).cloned()
    }

    fn get_by_id(&self, type_id: TypeId) -> Option<TypeHandle> {
        self.maps.read().by_id.get(&type_id).cloned()
    }

    fn register(&self, handle: TypeHandle) -> CodecResult<()> {
        let mut guard = self.maps.write();
        let maps = &mut *guard;

        if let Some(owner) = maps.by_name.get(handle.name()) {
            if *owner != handle.type_id() {
                return Err(CodecError::UnsupportedShape(format!(
                    "type name '{}' already bound to another type",
                    handle.name()
                )));
            }
        }

        // A type moving to a new name gives up its old one.
        if let Some(previous) = maps.by_id.get(&handle.type_id()) {
            if previous.name() != handle.name() {
                let old = previous.shared_name().clone();
                maps.by_name.remove(&old);
            }
        }

        log::debug!(
            "[registry] type '{}' -> {}",
            handle.name(),
            handle.rust_name()
        );
        maps.by_name
            .insert(handle.shared_name().clone(), handle.type_id());
        maps.by_id.insert(handle.type_id(), handle);
        Ok(())
    }
}
