//! Serializer registry, providers and the built-in serializers.

pub mod context;
pub mod id_generators;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod serializer;
pub mod serializers;
pub mod type_key;

use std::any::Any;
use std::sync::Arc;

use crate::error::BsonError;
use crate::io::{BsonBinaryReader, BsonBinaryReaderSettings, BsonBinaryWriter, BsonBinaryWriterSettings};

pub use context::{
    DeserializationContext, DeserializationContextBuilder, SerializationContext,
    SerializationContextBuilder,
};
pub use id_generators::{IdGenerator, ObjectIdGenerator, StringObjectIdGenerator, ZeroIdChecker};
pub use provider::{BsonSerializationProvider, RegistryAwareSerializationProvider};
pub use providers::{
    BsonValueSerializationProvider, CollectionSerializationProvider, PrimitiveSerializationProvider,
};
pub use registry::BsonSerializerRegistry;
pub use serializer::{
    BsonSerializer, DeserializationArgs, SerializationArgs, SerializerOf, TypedSerializer,
};
pub use type_key::TypeKey;

/// Encodes `value` as a top-level binary document with the registry's
/// serializer for `T`.
///
/// `T` must serialize as a document.
pub fn to_vec<T: Any + Send>(
    registry: &BsonSerializerRegistry,
    settings: &Arc<BsonBinaryWriterSettings>,
    value: &T,
) -> Result<Vec<u8>, BsonError> {
    let serializer = registry.lookup::<T>()?;
    let mut writer = BsonBinaryWriter::new(settings);
    serializer.serialize(&mut SerializationContext::new(&mut writer), value)?;
    writer.finish()
}

/// Decodes a top-level binary document into `T`. The document must span
/// all of `bytes`.
pub fn from_slice<T: Any + Send>(
    registry: &BsonSerializerRegistry,
    settings: &Arc<BsonBinaryReaderSettings>,
    bytes: &[u8],
) -> Result<T, BsonError> {
    let serializer = registry.lookup::<T>()?;
    let mut reader = BsonBinaryReader::new(bytes, settings);
    let value = serializer.deserialize(&mut DeserializationContext::new(&mut reader))?;
    if !reader.is_done() {
        return Err(BsonError::InvalidShape(
            "value did not consume the whole document".into(),
        ));
    }
    if reader.remaining() != 0 {
        return Err(BsonError::InvalidShape(format!(
            "{} trailing bytes after the document",
            reader.remaining()
        )));
    }
    Ok(value)
}
