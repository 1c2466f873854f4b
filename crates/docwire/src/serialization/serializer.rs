//! Serializer traits.
//!
//! [`SerializerOf`] is the typed trait implementors write. Every
//! `SerializerOf` is also a [`BsonSerializer`], the object-safe form the
//! registry stores. [`TypedSerializer`] turns a registry entry back into a
//! typed handle.

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::context::{DeserializationContext, SerializationContext};
use super::type_key::TypeKey;
use crate::error::BsonError;

/// Extra information passed to a serialize call.
#[derive(Debug, Clone, Default)]
pub struct SerializationArgs {
    /// Declared type of the member being written, when known.
    pub nominal_type: Option<TypeKey>,
}

/// Extra information passed to a deserialize call.
#[derive(Debug, Clone, Default)]
pub struct DeserializationArgs {
    pub nominal_type: Option<TypeKey>,
}

/// Object-safe serializer stored by the registry.
pub trait BsonSerializer: Send + Sync + 'static {
    /// The type this serializer reads and writes.
    fn value_type(&self) -> TypeKey;

    /// Writes `value`, which must be a [`BsonSerializer::value_type`].
    fn serialize_dyn(
        &self,
        ctx: &mut SerializationContext<'_>,
        args: &SerializationArgs,
        value: &dyn Any,
    ) -> Result<(), BsonError>;

    fn deserialize_dyn(
        &self,
        ctx: &mut DeserializationContext<'_>,
        args: &DeserializationArgs,
    ) -> Result<Box<dyn Any + Send>, BsonError>;

    fn as_any(&self) -> &dyn Any;

    /// `true` when `other` is interchangeable with `self`.
    fn equivalent(&self, other: &dyn BsonSerializer) -> bool;
}

/// A serializer for one Rust type.
pub trait SerializerOf: Send + Sync + 'static {
    type Value: Any + Send;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        args: &SerializationArgs,
        value: &Self::Value,
    ) -> Result<(), BsonError>;

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        args: &DeserializationArgs,
    ) -> Result<Self::Value, BsonError>;

    /// Whether two instances of this serializer behave identically.
    fn same_configuration(&self, _other: &Self) -> bool {
        true
    }
}

impl<S: SerializerOf> BsonSerializer for S {
    fn value_type(&self) -> TypeKey {
        TypeKey::of::<S::Value>()
    }

    fn serialize_dyn(
        &self,
        ctx: &mut SerializationContext<'_>,
        args: &SerializationArgs,
        value: &dyn Any,
    ) -> Result<(), BsonError> {
        let value = value
            .downcast_ref::<S::Value>()
            .ok_or_else(|| BsonError::TypeMismatch {
                expected: type_name::<S::Value>().to_owned(),
            })?;
        self.serialize(ctx, args, value)
    }

    fn deserialize_dyn(
        &self,
        ctx: &mut DeserializationContext<'_>,
        args: &DeserializationArgs,
    ) -> Result<Box<dyn Any + Send>, BsonError> {
        Ok(Box::new(self.deserialize(ctx, args)?))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equivalent(&self, other: &dyn BsonSerializer) -> bool {
        other
            .as_any()
            .downcast_ref::<S>()
            .is_some_and(|other| self.same_configuration(other))
    }
}

/// Typed view of a registry entry.
pub struct TypedSerializer<T> {
    inner: Arc<dyn BsonSerializer>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send> TypedSerializer<T> {
    /// Fails with [`BsonError::TypeMismatch`] unless `inner` handles `T`.
    pub fn new(inner: Arc<dyn BsonSerializer>) -> Result<Self, BsonError> {
        if !inner.value_type().is::<T>() {
            return Err(BsonError::TypeMismatch {
                expected: type_name::<T>().to_owned(),
            });
        }
        Ok(Self {
            inner,
            _marker: PhantomData,
        })
    }

    pub fn inner(&self) -> &Arc<dyn BsonSerializer> {
        &self.inner
    }

    pub fn serialize(&self, ctx: &mut SerializationContext<'_>, value: &T) -> Result<(), BsonError> {
        self.inner
            .serialize_dyn(ctx, &SerializationArgs::default(), value)
    }

    pub fn serialize_with_args(
        &self,
        ctx: &mut SerializationContext<'_>,
        args: &SerializationArgs,
        value: &T,
    ) -> Result<(), BsonError> {
        self.inner.serialize_dyn(ctx, args, value)
    }

    pub fn deserialize(&self, ctx: &mut DeserializationContext<'_>) -> Result<T, BsonError> {
        self.deserialize_with_args(ctx, &DeserializationArgs::default())
    }

    pub fn deserialize_with_args(
        &self,
        ctx: &mut DeserializationContext<'_>,
        args: &DeserializationArgs,
    ) -> Result<T, BsonError> {
        self.inner
            .deserialize_dyn(ctx, args)?
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| BsonError::TypeMismatch {
                expected: type_name::<T>().to_owned(),
            })
    }
}

impl<T> Clone for TypedSerializer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedSerializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSerializer")
            .field("value_type", &self.inner.value_type())
            .finish()
    }
}
