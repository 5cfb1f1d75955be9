// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Extracted records: the ordered `(key, value)` sequence a field strategy
//! produces for one object instance.

use crate::value::Value;

/// Key of one extracted field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    /// Field or parameter name, written on the wire.
    Named(String),
    /// Implicit position; nothing is written for the key.
    Position(usize),
}

impl FieldKey {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Position(_) => None,
        }
    }

    pub fn mode(&self) -> KeyMode {
        match self {
            Self::Named(_) => KeyMode::Named,
            Self::Position(_) => KeyMode::Positional,
        }
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<usize> for FieldKey {
    fn from(index: usize) -> Self {
        Self::Position(index)
    }
}

/// Whether a strategy writes keys or relies on order alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Named,
    Positional,
}

/// Ordered field values of one object instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedRecord {
    fields: Vec<(FieldKey, Value)>,
}

impl ExtractedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, key: impl Into<FieldKey>, value: Value) {
        self.fields.push((key.into(), value));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value stored under a named key.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key.name() == Some(name))
            .map(|(_, value)| value)
    }

    /// Remove and return the value stored under a named key.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let index = self
            .fields
            .iter()
            .position(|(key, _)| key.name() == Some(name))?;
        Some(self.fields.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FieldKey, Value)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.fields.iter().map(|(key, _)| key)
    }

    /// Values in record order, keys dropped.
    pub fn into_values(self) -> impl Iterator<Item = Value> {
        self.fields.into_iter().map(|(_, value)| value)
    }
}

impl IntoIterator for ExtractedRecord {
    type Item = (FieldKey, Value);
    type IntoIter = std::vec::IntoIter<(FieldKey, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl FromIterator<(FieldKey, Value)> for ExtractedRecord {
    fn from_iter<I: IntoIterator<Item = (FieldKey, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
