// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The codec: registries, type name cache and configuration behind one
//! handle.
//!
//! A [`Codec`] is `Send + Sync`; share it by reference (or through
//! [`Codec::global`]) across any number of concurrent encode/decode calls.
//!
//! # Example
//!
//! ```ignore
//! use tagwire::{Codec, ReflectionBuilder};
//!
//! struct Point { x: i32, y: i32 }
//! tagwire::wire_object!(Point);
//!
//! let codec = Codec::new();
//! codec.declare_as(
//!     "demo.Point",
//!     ReflectionBuilder::<Point>::new()
//!         .field("x", |p| &p.x)
//!         .field("y", |p| &p.y)
//!         .constructor(&["x", "y"], |args| Ok(Point { x: args.next()?, y: args.next()? })),
//! )?;
//!
//! let bytes = codec.to_bytes(&Point { x: 3, y: 4 })?;
//! let point: Point = codec.from_bytes(&bytes)?;
//! ```

use crate::config::{CodecConfig, ConfigError, DefaultStrategy};
use crate::descriptor::TypeDescriptor;
use crate::engine;
use crate::error::{CodecError, CodecResult};
use crate::reflect::ReflectionBuilder;
use crate::registry::{
    InMemoryTypeRegistry, SerializerRegistry, TypeHandle, TypeNameCache, TypeRegistry,
};
use crate::strategy::{
    Arguments, CustomStrategy, FieldStrategy, NamedFieldStrategy, PositionalStrategy, TupleWriter,
};
use crate::value::{ObjectValue, Value};
use crate::wire::Wire;
use std::any::{Any, TypeId};
use std::io::{Cursor, Read, Write};
use std::sync::{Arc, OnceLock};

static GLOBAL_CODEC: OnceLock<Codec> = OnceLock::new();

/// Encoder/decoder for tagged value graphs.
pub struct Codec {
    config: CodecConfig,
    types: Arc<dyn TypeRegistry>,
    serializers: SerializerRegistry,
    names: TypeNameCache,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec {
    /// Codec with default configuration and an in-memory type registry.
    pub fn new() -> Self {
        Self::assemble(
            CodecConfig::default(),
            Arc::new(InMemoryTypeRegistry::new()),
        )
    }

    pub fn with_config(config: CodecConfig) -> Result<Self, ConfigError> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> CodecBuilder {
        CodecBuilder::default()
    }

    /// Process-wide codec, created with defaults on first use.
    pub fn global() -> &'static Codec {
        GLOBAL_CODEC.get_or_init(Codec::new)
    }

    /// Install the process-wide codec. Returns `false` if it already exists.
    pub fn init_global(config: CodecConfig) -> Result<bool, ConfigError> {
        let codec = Self::with_config(config)?;
        Ok(GLOBAL_CODEC.set(codec).is_ok())
    }

    fn assemble(config: CodecConfig, types: Arc<dyn TypeRegistry>) -> Self {
        let default: Arc<dyn FieldStrategy> = match config.default_strategy {
            DefaultStrategy::Named => Arc::new(NamedFieldStrategy),
            DefaultStrategy::Positional => Arc::new(PositionalStrategy),
        };
        log::debug!(
            "[codec] created (default strategy {}, strings {:?}, max depth {})",
            default.name(),
            config.string_policy,
            config.max_depth
        );
        Self {
            config,
            types,
            serializers: SerializerRegistry::new(default),
            names: TypeNameCache::new(),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn type_registry(&self) -> &dyn TypeRegistry {
        self.types.as_ref()
    }

    pub fn serializers(&self) -> &SerializerRegistry {
        &self.serializers
    }

    pub fn type_names(&self) -> &TypeNameCache {
        &self.names
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Declare constructors and fields of `T` under its Rust type name.
    pub fn declare<T: Any>(&self, builder: ReflectionBuilder<T>) -> CodecResult<TypeHandle> {
        self.declare_as(std::any::type_name::<T>(), builder)
    }

    /// Declare constructors and fields of `T` under wire name `name`.
    ///
    /// Declare a type before its name is first decoded: cached names keep
    /// the handle they were first resolved to.
    pub fn declare_as<T: Any>(
        &self,
        name: &str,
        builder: ReflectionBuilder<T>,
    ) -> CodecResult<TypeHandle> {
        let handle = TypeHandle::of::<T>(name).with_reflection(builder.build()?);
        self.types.register(handle.clone())?;
        Ok(handle)
    }

    /// Bind a custom extract/reconstruct pair to `T`.
    pub fn register<T, E, R>(&self, extract: E, reconstruct: R) -> CodecResult<()>
    where
        T: Any,
        E: Fn(&T, &mut TupleWriter<'_>) -> CodecResult<()> + Send + Sync + 'static,
        R: Fn(&mut Arguments<'_>) -> CodecResult<T> + Send + Sync + 'static,
    {
        self.register_strategy::<T>(Arc::new(CustomStrategy::new(extract, reconstruct)))
    }

    /// Bind a custom extract/reconstruct pair to `T` under wire name `name`.
    pub fn register_as<T, E, R>(&self, name: &str, extract: E, reconstruct: R) -> CodecResult<()>
    where
        T: Any,
        E: Fn(&T, &mut TupleWriter<'_>) -> CodecResult<()> + Send + Sync + 'static,
        R: Fn(&mut Arguments<'_>) -> CodecResult<T> + Send + Sync + 'static,
    {
        self.register_strategy_as::<T>(name, Arc::new(CustomStrategy::new(extract, reconstruct)))
    }

    /// Bind `strategy` to `T`. Registers `T` under its Rust type name unless
    /// the type is already known.
    pub fn register_strategy<T: Any>(&self, strategy: Arc<dyn FieldStrategy>) -> CodecResult<()> {
        let handle = match self.types.get_by_id(TypeId::of::<T>()) {
            Some(handle) => handle,
            None => {
                let handle = TypeHandle::of::<T>(std::any::type_name::<T>());
                self.types.register(handle.clone())?;
                handle
            }
        };
        self.serializers
            .register(TypeId::of::<T>(), handle.name(), strategy);
        Ok(())
    }

    /// Bind `strategy` to `T` under wire name `name`, keeping any declared
    /// reflection.
    pub fn register_strategy_as<T: Any>(
        &self,
        name: &str,
        strategy: Arc<dyn FieldStrategy>,
    ) -> CodecResult<()> {
        let mut handle = TypeHandle::of::<T>(name);
        if let Some(reflection) = self
            .types
            .get_by_id(TypeId::of::<T>())
            .and_then(|known| known.reflection().cloned())
        {
            handle = handle.with_reflection(reflection);
        }
        self.types.register(handle)?;
        self.serializers.register(TypeId::of::<T>(), name, strategy);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Type lookup
    // ------------------------------------------------------------------

    /// Handle of a declared or registered object type.
    pub fn handle_of<T: Any>(&self) -> CodecResult<TypeHandle> {
        self.types.get_by_id(TypeId::of::<T>()).ok_or_else(|| {
            CodecError::UnsupportedShape(format!(
                "{} is not a declared object type",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Resolve a wire type name through the type name cache.
    pub fn resolve_name(&self, name: &str) -> CodecResult<TypeHandle> {
        self.names.resolve(name, self.types.as_ref())
    }

    // ------------------------------------------------------------------
    // Object plumbing for `wire_object!`
    // ------------------------------------------------------------------

    #[doc(hidden)]
    pub fn object_descriptor<T: Any>(&self) -> CodecResult<TypeDescriptor> {
        Ok(TypeDescriptor::Object(self.handle_of::<T>()?.shared_name().clone()))
    }

    #[doc(hidden)]
    pub fn object_to_value<T: Any>(&self, object: &T) -> CodecResult<Value> {
        let handle = self.handle_of::<T>()?;
        let strategy = self.serializers.resolve(handle.type_id());
        let record = strategy.extract(&handle, object, self)?;
        Ok(Value::Object(ObjectValue::new(
            handle.shared_name().clone(),
            record,
        )))
    }

    #[doc(hidden)]
    pub fn object_from_value<T: Any>(&self, value: Value) -> CodecResult<T> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(CodecError::type_mismatch(
                    std::any::type_name::<T>(),
                    other.kind(),
                ))
            }
        };
        let handle = self.resolve_name(object.type_name())?;
        if handle.type_id() != TypeId::of::<T>() {
            return Err(CodecError::type_mismatch(
                std::any::type_name::<T>(),
                handle.rust_name(),
            ));
        }

        let strategy = self.serializers.resolve(handle.type_id());
        let boxed = strategy.reconstruct(&handle, object.into_record(), self)?;
        boxed.downcast::<T>().map(|b| *b).map_err(|_| {
            CodecError::mismatch(
                handle.name(),
                format!("{} strategy built another type", strategy.name()),
            )
        })
    }

    // ------------------------------------------------------------------
    // Encode / decode
    // ------------------------------------------------------------------

    pub fn to_value<T: Wire>(&self, value: &T) -> CodecResult<Value> {
        value.to_value(self)
    }

    pub fn from_value<T: Wire>(&self, value: Value) -> CodecResult<T> {
        T::from_value(value, self)
    }

    /// Encode `value` onto `sink`.
    pub fn serialize<T: Wire, W: Write + ?Sized>(
        &self,
        sink: &mut W,
        value: &T,
    ) -> CodecResult<()> {
        let value = value.to_value(self)?;
        self.serialize_value(sink, &value)
    }

    /// Decode one `T` from `source`.
    pub fn deserialize<T: Wire, R: Read + ?Sized>(&self, source: &mut R) -> CodecResult<T> {
        let value = self.deserialize_value(source)?;
        T::from_value(value, self)
    }

    pub fn serialize_value<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        value: &Value,
    ) -> CodecResult<()> {
        engine::encode(self, sink, value)
    }

    /// Decode one value without knowing its type in advance.
    pub fn deserialize_value<R: Read + ?Sized>(&self, source: &mut R) -> CodecResult<Value> {
        engine::decode(self, source)
    }

    pub fn to_bytes<T: Wire>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.serialize(&mut buf, value)?;
        Ok(buf)
    }

    /// Decode exactly one `T` from `bytes`; leftover bytes are malformed.
    pub fn from_bytes<T: Wire>(&self, bytes: &[u8]) -> CodecResult<T> {
        let mut cursor = Cursor::new(bytes);
        let value = self.deserialize_value(&mut cursor)?;
        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            return Err(CodecError::malformed(format!(
                "{} trailing bytes after value",
                bytes.len() - consumed
            )));
        }
        T::from_value(value, self)
    }
}

/// Builder for [`Codec`].
#[derive(Default)]
pub struct CodecBuilder {
    config: CodecConfig,
    types: Option<Arc<dyn TypeRegistry>>,
}

impl CodecBuilder {
    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an external type registry instead of a fresh in-memory one.
    pub fn type_registry(mut self, types: Arc<dyn TypeRegistry>) -> Self {
        self.types = Some(types);
        self
    }

    pub fn build(self) -> Result<Codec, ConfigError> {
        self.config.validate()?;
        let types = self
            .types
            .unwrap_or_else(|| Arc::new(InMemoryTypeRegistry::new()));
        Ok(Codec::assemble(self.config, types))
    }
}
