//! Built-in serializers.

pub mod binary_data;
pub mod bson_value;
pub mod collections;
pub mod double;
pub mod dynamic_document;
pub mod guid;
pub mod null;
pub mod primitives;

pub use binary_data::BsonBinaryDataSerializer;
pub use bson_value::{
    BsonArraySerializer, BsonDocumentSerializer, BsonTimestampSerializer, BsonValueSerializer,
};
pub use collections::{
    BTreeMapSerializer, DictionaryRepresentation, DictionarySerializer, VecSerializer,
};
pub use double::DoubleSerializer;
pub use dynamic_document::{
    DynamicContextHooks, DynamicDocument, DynamicDocumentSerializer, ExpandoDocument,
    NoContextHooks,
};
pub use guid::GuidSerializer;
pub use null::BsonNullSerializer;
pub use primitives::{
    BooleanSerializer, Int32Serializer, Int64Serializer, ObjectIdSerializer, StringSerializer,
};

use crate::error::BsonError;
use crate::types::BsonType;

use super::context::DeserializationContext;

/// Fails with [`BsonError::UnexpectedWireType`] unless the reader is
/// positioned on a value of type `expected`.
pub(crate) fn expect_wire_type(
    ctx: &mut DeserializationContext<'_>,
    target: &str,
    expected: BsonType,
) -> Result<(), BsonError> {
    match ctx.reader().current_bson_type() {
        Some(found) if found == expected => Ok(()),
        Some(found) => Err(BsonError::UnexpectedWireType {
            target: target.to_owned(),
            found,
        }),
        None => Err(BsonError::InvalidState {
            operation: "deserialize",
            state: "no current type",
        }),
    }
}
