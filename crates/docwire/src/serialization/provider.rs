//! Fallback strategies consulted on a registry cache miss.

use std::sync::Arc;

use super::registry::BsonSerializerRegistry;
use super::serializer::BsonSerializer;
use super::type_key::TypeKey;
use crate::error::BsonError;

/// Produces serializers for types the registry has not seen yet.
pub trait BsonSerializationProvider: Send + Sync {
    /// Returns `None` to let the next provider try.
    fn get_serializer(&self, key: &TypeKey) -> Option<Arc<dyn BsonSerializer>>;

    /// Advertises [`RegistryAwareSerializationProvider`]. The registry calls
    /// the registry-aware method instead of [`Self::get_serializer`] when
    /// this returns `Some`.
    fn as_registry_aware(&self) -> Option<&dyn RegistryAwareSerializationProvider> {
        None
    }
}

/// A provider that resolves nested serializers through the registry, for
/// example the element serializer of a container type.
pub trait RegistryAwareSerializationProvider: BsonSerializationProvider {
    fn get_serializer_with_registry(
        &self,
        key: &TypeKey,
        registry: &BsonSerializerRegistry,
    ) -> Result<Option<Arc<dyn BsonSerializer>>, BsonError>;
}
