// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared type metadata: constructors and backing fields.
//!
//! Rust has no runtime reflection, so object types declare what the
//! named-field and positional strategies need: one or more constructors
//! (parameter names + a builder closure) and a reader per backing field.
//!
//! ```ignore
//! let point = ReflectionBuilder::<Point>::new()
//!     .field("x", |p| &p.x)
//!     .field("y", |p| &p.y)
//!     .constructor(&["x", "y"], |args| Ok(Point { x: args.next()?, y: args.next()? }));
//! codec.declare_as("demo.Point", point)?;
//! ```

use crate::codec::Codec;
use crate::error::{CodecError, CodecResult};
use crate::strategy::Arguments;
use crate::value::Value;
use crate::wire::Wire;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type FieldReader = Arc<dyn Fn(&dyn Any, &Codec) -> CodecResult<Value> + Send + Sync>;
type ConstructorFn = Arc<dyn Fn(&mut Arguments<'_>) -> CodecResult<Box<dyn Any>> + Send + Sync>;

/// A declared constructor.
#[derive(Clone)]
pub struct Constructor {
    parameters: Vec<String>,
    invoke: ConstructorFn,
}

impl Constructor {
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Run the constructor. Every argument must be consumed.
    pub(crate) fn invoke(&self, args: &mut Arguments<'_>) -> CodecResult<Box<dyn Any>> {
        let object = (self.invoke)(args)?;
        args.finish()?;
        Ok(object)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.parameters)
            .finish()
    }
}

#[derive(Clone)]
struct FieldInfo {
    name: String,
    read: FieldReader,
}

/// Constructors and field readers declared for one type.
#[derive(Clone)]
pub struct Reflection {
    rust_name: &'static str,
    constructors: Vec<Constructor>,
    fields: Vec<FieldInfo>,
    canonical: usize,
}

impl Reflection {
    /// The constructor with the most parameters; the first declared wins a
    /// tie.
    pub fn canonical(&self) -> &Constructor {
        &self.constructors[self.canonical]
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Read the backing field `name` of `object`.
    pub fn read_field(&self, name: &str, object: &dyn Any, codec: &Codec) -> CodecResult<Value> {
        let field = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| {
                CodecError::UnsupportedShape(format!(
                    "{} has no field backing parameter '{}'",
                    self.rust_name, name
                ))
            })?;
        (field.read)(object, codec)
    }
}

impl fmt::Debug for Reflection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflection")
            .field("type", &self.rust_name)
            .field("constructors", &self.constructors)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for a [`Reflection`] of `T`.
pub struct ReflectionBuilder<T> {
    constructors: Vec<Constructor>,
    fields: Vec<FieldInfo>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> Default for ReflectionBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any> ReflectionBuilder<T> {
    pub fn new() -> Self {
        Self {
            constructors: Vec::new(),
            fields: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare a backing field.
    pub fn field<F, G>(mut self, name: &str, getter: G) -> Self
    where
        F: Wire,
        G: Fn(&T) -> &F + Send + Sync + 'static,
    {
        let read: FieldReader =
            Arc::new(move |object: &dyn Any, codec: &Codec| -> CodecResult<Value> {
                let object = object.downcast_ref::<T>().ok_or_else(|| {
                    CodecError::type_mismatch(std::any::type_name::<T>(), "another type")
                })?;
                getter(object).to_value(codec)
            });
        self.fields.push(FieldInfo {
            name: name.to_string(),
            read,
        });
        self
    }

    /// Declare a constructor taking `parameters` in order.
    pub fn constructor<C>(mut self, parameters: &[&str], build: C) -> Self
    where
        C: Fn(&mut Arguments<'_>) -> CodecResult<T> + Send + Sync + 'static,
    {
        let invoke: ConstructorFn =
            Arc::new(move |args: &mut Arguments<'_>| -> CodecResult<Box<dyn Any>> {
                Ok(Box::new(build(args)?))
            });
        self.constructors.push(Constructor {
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            invoke,
        });
        self
    }

    /// Validate and freeze the declaration.
    pub fn build(self) -> CodecResult<Reflection> {
        let rust_name = std::any::type_name::<T>();

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(CodecError::UnsupportedShape(format!(
                    "{} declares field '{}' twice",
                    rust_name, field.name
                )));
            }
        }

        let mut canonical: Option<usize> = None;
        for (i, ctor) in self.constructors.iter().enumerate() {
            let best = canonical.map(|c| self.constructors[c].parameters.len());
            if best.map_or(true, |n| ctor.parameters.len() > n) {
                canonical = Some(i);
            }
        }
        let canonical = canonical.ok_or_else(|| {
            CodecError::UnsupportedShape(format!("{} declares no constructor", rust_name))
        })?;

        for param in &self.constructors[canonical].parameters {
            if !seen.contains(param.as_str()) {
                return Err(CodecError::UnsupportedShape(format!(
                    "{} has no field backing parameter '{}'",
                    rust_name, param
                )));
            }
        }

        Ok(Reflection {
            rust_name,
            constructors: self.constructors,
            fields: self.fields,
            canonical,
        })
    }
}
