use crate::error::BsonError;
use crate::serialization::context::{DeserializationContext, SerializationContext};
use crate::serialization::serializer::{DeserializationArgs, SerializationArgs, SerializerOf};
use crate::types::BsonType;
use crate::value::BsonNull;

use super::expect_wire_type;

#[derive(Debug, Clone, Copy, Default)]
pub struct BsonNullSerializer;

impl SerializerOf for BsonNullSerializer {
    type Value = BsonNull;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        _value: &BsonNull,
    ) -> Result<(), BsonError> {
        ctx.writer().write_null()
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<BsonNull, BsonError> {
        expect_wire_type(ctx, "BsonNull", BsonType::Null)?;
        ctx.reader().read_null()?;
        Ok(BsonNull)
    }
}
