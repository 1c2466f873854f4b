use crate::error::BsonError;
use crate::serialization::context::{DeserializationContext, SerializationContext};
use crate::serialization::serializer::{DeserializationArgs, SerializationArgs, SerializerOf};
use crate::types::BsonType;

use super::expect_wire_type;

/// Writes `f64` as a wire Double.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleSerializer;

impl SerializerOf for DoubleSerializer {
    type Value = f64;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &f64,
    ) -> Result<(), BsonError> {
        ctx.writer().write_double(*value)
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<f64, BsonError> {
        expect_wire_type(ctx, "f64", BsonType::Double)?;
        ctx.reader().read_double()
    }
}
