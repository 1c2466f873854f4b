//! Built-in serialization providers.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use uuid::Uuid;

use super::provider::{BsonSerializationProvider, RegistryAwareSerializationProvider};
use super::registry::BsonSerializerRegistry;
use super::serializer::BsonSerializer;
use super::serializers::{
    BTreeMapSerializer, BooleanSerializer, BsonArraySerializer, BsonBinaryDataSerializer,
    BsonDocumentSerializer, BsonNullSerializer, BsonTimestampSerializer, BsonValueSerializer,
    DictionaryRepresentation, DoubleSerializer, GuidSerializer, Int32Serializer, Int64Serializer,
    ObjectIdSerializer, StringSerializer, VecSerializer,
};
use super::type_key::TypeKey;
use crate::error::BsonError;
use crate::guid::GuidRepresentation;
use crate::value::{BsonArray, BsonBinaryData, BsonDocument, BsonNull, BsonTimestamp, BsonValue, ObjectId};

/// Serializers for the value-model types.
#[derive(Debug, Clone, Copy, Default)]
pub struct BsonValueSerializationProvider;

impl BsonSerializationProvider for BsonValueSerializationProvider {
    fn get_serializer(&self, key: &TypeKey) -> Option<Arc<dyn BsonSerializer>> {
        let id = key.type_id()?;
        let serializer: Arc<dyn BsonSerializer> = if id == TypeId::of::<BsonValue>() {
            Arc::new(BsonValueSerializer)
        } else if id == TypeId::of::<BsonDocument>() {
            Arc::new(BsonDocumentSerializer)
        } else if id == TypeId::of::<BsonArray>() {
            Arc::new(BsonArraySerializer)
        } else if id == TypeId::of::<BsonBinaryData>() {
            Arc::new(BsonBinaryDataSerializer)
        } else if id == TypeId::of::<BsonNull>() {
            Arc::new(BsonNullSerializer)
        } else if id == TypeId::of::<BsonTimestamp>() {
            Arc::new(BsonTimestampSerializer)
        } else {
            return None;
        };
        Some(serializer)
    }
}

/// Serializers for Rust scalars, [`ObjectId`] and [`Uuid`].
///
/// `Uuid` is written in the standard representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveSerializationProvider;

impl BsonSerializationProvider for PrimitiveSerializationProvider {
    fn get_serializer(&self, key: &TypeKey) -> Option<Arc<dyn BsonSerializer>> {
        let id = key.type_id()?;
        let serializer: Arc<dyn BsonSerializer> = if id == TypeId::of::<f64>() {
            Arc::new(DoubleSerializer)
        } else if id == TypeId::of::<i32>() {
            Arc::new(Int32Serializer)
        } else if id == TypeId::of::<i64>() {
            Arc::new(Int64Serializer)
        } else if id == TypeId::of::<String>() {
            Arc::new(StringSerializer)
        } else if id == TypeId::of::<bool>() {
            Arc::new(BooleanSerializer)
        } else if id == TypeId::of::<ObjectId>() {
            Arc::new(ObjectIdSerializer)
        } else if id == TypeId::of::<Uuid>() {
            Arc::new(GuidSerializer::new(GuidRepresentation::Standard))
        } else {
            return None;
        };
        Some(serializer)
    }
}

type Factory = Box<
    dyn Fn(&BsonSerializerRegistry) -> Result<Arc<dyn BsonSerializer>, BsonError> + Send + Sync,
>;

/// Builds container serializers whose element serializers come from the
/// registry.
///
/// Container types are opted in one at a time with [`Self::with_vec_of`] and
/// [`Self::with_map_of`].
#[derive(Default)]
pub struct CollectionSerializationProvider {
    factories: HashMap<TypeId, Factory>,
}

impl CollectionSerializationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles `Vec<T>`.
    pub fn with_vec_of<T: Any + Send>(mut self) -> Self {
        self.factories.insert(
            TypeId::of::<Vec<T>>(),
            Box::new(|registry| {
                let element = registry.lookup::<T>()?;
                Ok(Arc::new(VecSerializer::new(element)) as Arc<dyn BsonSerializer>)
            }),
        );
        self
    }

    /// Handles `BTreeMap<String, V>` in `representation`.
    pub fn with_map_of<V: Any + Send>(mut self, representation: DictionaryRepresentation) -> Self {
        self.factories.insert(
            TypeId::of::<BTreeMap<String, V>>(),
            Box::new(move |registry| {
                let value = registry.lookup::<V>()?;
                Ok(Arc::new(BTreeMapSerializer::new(value, representation))
                    as Arc<dyn BsonSerializer>)
            }),
        );
        self
    }
}

impl BsonSerializationProvider for CollectionSerializationProvider {
    fn get_serializer(&self, _key: &TypeKey) -> Option<Arc<dyn BsonSerializer>> {
        None
    }

    fn as_registry_aware(&self) -> Option<&dyn RegistryAwareSerializationProvider> {
        Some(self)
    }
}

impl RegistryAwareSerializationProvider for CollectionSerializationProvider {
    fn get_serializer_with_registry(
        &self,
        key: &TypeKey,
        registry: &BsonSerializerRegistry,
    ) -> Result<Option<Arc<dyn BsonSerializer>>, BsonError> {
        let Some(factory) = key.type_id().and_then(|id| self.factories.get(&id)) else {
            return Ok(None);
        };
        factory(registry).map(Some)
    }
}
