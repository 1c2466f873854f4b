//! Type to serializer resolution.

use std::any::Any;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use super::provider::BsonSerializationProvider;
use super::providers::{BsonValueSerializationProvider, PrimitiveSerializationProvider};
use super::serializer::{BsonSerializer, TypedSerializer};
use super::type_key::TypeKey;
use crate::error::BsonError;
use crate::value::is_value_model_type;

/// Caches one serializer per type and falls back to a stack of providers.
///
/// Safe to share across threads. Concurrent first-time lookups of one type
/// may each run the providers, but only one result is published and every
/// caller receives that one.
pub struct BsonSerializerRegistry {
    cache: DashMap<TypeKey, Arc<dyn BsonSerializer>>,
    providers: RwLock<Vec<Arc<dyn BsonSerializationProvider>>>,
}

impl BsonSerializerRegistry {
    /// An empty registry with no providers.
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
            providers: RwLock::new(Vec::new()),
        }
    }

    /// A registry that resolves primitives and value-model types.
    pub fn with_default_providers() -> Self {
        let registry = Self::new();
        registry.register_serialization_provider(Arc::new(PrimitiveSerializationProvider));
        registry.register_serialization_provider(Arc::new(BsonValueSerializationProvider));
        registry
    }

    /// Returns the serializer for `key`, creating and caching it on first use.
    pub fn get_serializer(&self, key: &TypeKey) -> Result<Arc<dyn BsonSerializer>, BsonError> {
        ensure_closed(key)?;
        if let Some(cached) = self.cache.get(key).map(|e| Arc::clone(e.value())) {
            tracing::trace!(type_key = %key, "serializer cache hit");
            return Ok(cached);
        }
        // Providers run outside any lock so they can resolve nested types.
        let created = self.create_serializer(key)?;
        let published = Arc::clone(self.cache.entry(key.clone()).or_insert(created).value());
        Ok(published)
    }

    /// Typed form of [`Self::get_serializer`].
    pub fn lookup<T: Any + Send>(&self) -> Result<TypedSerializer<T>, BsonError> {
        TypedSerializer::new(self.get_serializer(&TypeKey::of::<T>())?)
    }

    /// Registers `serializer` for `key`. Fails if one is already present.
    pub fn register_serializer(
        &self,
        key: TypeKey,
        serializer: Arc<dyn BsonSerializer>,
    ) -> Result<(), BsonError> {
        ensure_registrable(&key, serializer.as_ref())?;
        match self.cache.entry(key) {
            Entry::Occupied(e) => Err(BsonError::AlreadyRegistered(e.key().to_string())),
            Entry::Vacant(e) => {
                tracing::debug!(type_key = %e.key(), "registered serializer");
                e.insert(serializer);
                Ok(())
            }
        }
    }

    /// Like [`Self::register_serializer`], but returns `Ok(false)` when an
    /// equivalent serializer is already registered.
    pub fn try_register_serializer(
        &self,
        key: TypeKey,
        serializer: Arc<dyn BsonSerializer>,
    ) -> Result<bool, BsonError> {
        ensure_registrable(&key, serializer.as_ref())?;
        match self.cache.entry(key) {
            Entry::Occupied(e) => {
                let existing = e.get();
                if Arc::ptr_eq(existing, &serializer) || existing.equivalent(serializer.as_ref()) {
                    Ok(false)
                } else {
                    Err(BsonError::ConflictingRegistration(e.key().to_string()))
                }
            }
            Entry::Vacant(e) => {
                tracing::debug!(type_key = %e.key(), "registered serializer");
                e.insert(serializer);
                Ok(true)
            }
        }
    }

    /// Pushes a provider. The last provider pushed is consulted first.
    pub fn register_serialization_provider(&self, provider: Arc<dyn BsonSerializationProvider>) {
        let mut providers = self.providers.write();
        providers.push(provider);
        tracing::debug!(providers = providers.len(), "registered serialization provider");
    }

    fn create_serializer(&self, key: &TypeKey) -> Result<Arc<dyn BsonSerializer>, BsonError> {
        let providers = self.providers.read().clone();
        for provider in providers.iter().rev() {
            let found = match provider.as_registry_aware() {
                Some(aware) => aware.get_serializer_with_registry(key, self)?,
                None => provider.get_serializer(key),
            };
            if let Some(serializer) = found {
                tracing::debug!(type_key = %key, "provider created serializer");
                return Ok(serializer);
            }
        }
        Err(BsonError::NoSerializerFound(key.to_string()))
    }
}

impl Default for BsonSerializerRegistry {
    fn default() -> Self {
        Self::with_default_providers()
    }
}

fn ensure_closed(key: &TypeKey) -> Result<(), BsonError> {
    if key.is_open() {
        return Err(BsonError::InvalidShape(format!(
            "generic type {key} has unassigned type parameters"
        )));
    }
    Ok(())
}

fn ensure_registrable(key: &TypeKey, serializer: &dyn BsonSerializer) -> Result<(), BsonError> {
    if is_value_model_type(key) {
        return Err(BsonError::ReservedType(key.to_string()));
    }
    ensure_closed(key)?;
    if matches!(key, TypeKey::Concrete { .. }) && serializer.value_type() != *key {
        return Err(BsonError::TypeMismatch {
            expected: key.to_string(),
        });
    }
    Ok(())
}
