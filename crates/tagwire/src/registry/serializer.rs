// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer registry: runtime type -> field strategy.

use crate::strategy::FieldStrategy;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Strategy bindings with a fallback for unbound types.
///
/// Bindings are never removed; registering a type again replaces its
/// strategy.
pub struct SerializerRegistry {
    bindings: RwLock<HashMap<TypeId, Arc<dyn FieldStrategy>>>,
    default: Arc<dyn FieldStrategy>,
}

impl SerializerRegistry {
    pub fn new(default: Arc<dyn FieldStrategy>) -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
            default,
        }
    }

    /// Bind `strategy` to `type_id`, returning the strategy it replaces.
    pub fn register(
        &self,
        type_id: TypeId,
        type_name: &str,
        strategy: Arc<dyn FieldStrategy>,
    ) -> Option<Arc<dyn FieldStrategy>> {
        let name = strategy.name();
        let previous = self.bindings.write().insert(type_id, strategy);
        match &previous {
            Some(old) => log::warn!(
                "[registry] {} strategy for {} replaced by {}",
                old.name(),
                type_name,
                name
            ),
            None => log::debug!("[registry] {} strategy bound to {}", name, type_name),
        }
        previous
    }

    /// Strategy bound to `type_id`, or the default.
    pub fn resolve(&self, type_id: TypeId) -> Arc<dyn FieldStrategy> {
        self.bindings
            .read()
            .get(&type_id)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default))
    }

    pub fn is_bound(&self, type_id: TypeId) -> bool {
        self.bindings.read().contains_key(&type_id)
    }

    pub fn default_strategy(&self) -> &Arc<dyn FieldStrategy> {
        &self.default
    }
}
