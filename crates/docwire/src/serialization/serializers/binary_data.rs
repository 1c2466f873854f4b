use crate::error::BsonError;
use crate::guid::{self, GuidRepresentation};
use crate::serialization::context::{DeserializationContext, SerializationContext};
use crate::serialization::serializer::{DeserializationArgs, SerializationArgs, SerializerOf};
use crate::types::BsonType;
use crate::value::BsonBinaryData;

use super::expect_wire_type;

/// Writes a binary value, converting embedded GUIDs to the writer's
/// representation in legacy mode.
pub fn write_binary_data(
    ctx: &mut SerializationContext<'_>,
    value: &BsonBinaryData,
) -> Result<(), BsonError> {
    let settings = ctx.writer().settings();
    let mode = settings.guid_representation_mode();
    let target = settings.effective_guid_representation();
    if !mode.is_legacy() || !value.subtype().is_uuid() || target == GuidRepresentation::Unspecified
    {
        return ctx.writer().write_binary_data(value);
    }
    let source = value.guid_representation(mode)?;
    if source == GuidRepresentation::Unspecified {
        return Err(BsonError::UnspecifiedRepresentation);
    }
    if source == target {
        return ctx.writer().write_binary_data(value);
    }
    let guid = guid::from_bytes(value.bytes(), source)?;
    let converted = BsonBinaryData::from_guid(guid, target, mode)?;
    ctx.writer().write_binary_data(&converted)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BsonBinaryDataSerializer;

impl SerializerOf for BsonBinaryDataSerializer {
    type Value = BsonBinaryData;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &BsonBinaryData,
    ) -> Result<(), BsonError> {
        write_binary_data(ctx, value)
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<BsonBinaryData, BsonError> {
        expect_wire_type(ctx, "BsonBinaryData", BsonType::Binary)?;
        ctx.reader().read_binary_data()
    }
}
