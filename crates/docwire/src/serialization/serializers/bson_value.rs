//! Serializers for the value model itself.

use std::collections::HashSet;

use crate::error::BsonError;
use crate::serialization::context::{DeserializationContext, SerializationContext};
use crate::serialization::serializer::{DeserializationArgs, SerializationArgs, SerializerOf};
use crate::types::BsonType;
use crate::value::{BsonArray, BsonDocument, BsonTimestamp, BsonValue};

use super::binary_data::write_binary_data;
use super::expect_wire_type;

/// Writes any [`BsonValue`]. Containers are written through a context one
/// level deeper.
pub fn write_value(ctx: &mut SerializationContext<'_>, value: &BsonValue) -> Result<(), BsonError> {
    match value {
        BsonValue::Double(v) => ctx.writer().write_double(*v),
        BsonValue::String(s) => ctx.writer().write_string(s),
        BsonValue::Document(d) => write_document(&mut ctx.nested()?, d),
        BsonValue::Array(a) => write_array(&mut ctx.nested()?, a),
        BsonValue::Binary(b) => write_binary_data(ctx, b),
        BsonValue::Undefined => ctx.writer().write_undefined(),
        BsonValue::ObjectId(id) => ctx.writer().write_object_id(*id),
        BsonValue::Boolean(v) => ctx.writer().write_boolean(*v),
        BsonValue::DateTime(ms) => ctx.writer().write_date_time(*ms),
        BsonValue::Null => ctx.writer().write_null(),
        BsonValue::RegularExpression { pattern, options } => {
            ctx.writer().write_regular_expression(pattern, options)
        }
        BsonValue::JavaScript(code) => ctx.writer().write_javascript(code),
        BsonValue::Symbol(s) => ctx.writer().write_symbol(s),
        BsonValue::Int32(v) => ctx.writer().write_int32(*v),
        BsonValue::Timestamp(ts) => ctx.writer().write_timestamp(*ts),
        BsonValue::Int64(v) => ctx.writer().write_int64(*v),
        BsonValue::Decimal128(bytes) => ctx.writer().write_decimal128(*bytes),
        BsonValue::MinKey => ctx.writer().write_min_key(),
        BsonValue::MaxKey => ctx.writer().write_max_key(),
    }
}

pub fn write_document(
    ctx: &mut SerializationContext<'_>,
    document: &BsonDocument,
) -> Result<(), BsonError> {
    ctx.writer().write_start_document()?;
    for (name, value) in document.iter() {
        ctx.writer().write_name(name)?;
        write_value(ctx, value)?;
    }
    ctx.writer().write_end_document()
}

pub fn write_array(ctx: &mut SerializationContext<'_>, array: &[BsonValue]) -> Result<(), BsonError> {
    ctx.writer().write_start_array()?;
    for value in array {
        write_value(ctx, value)?;
    }
    ctx.writer().write_end_array()
}

/// Reads the value whose type was just read.
pub fn read_value(ctx: &mut DeserializationContext<'_>) -> Result<BsonValue, BsonError> {
    let Some(ty) = ctx.reader().current_bson_type() else {
        return Err(BsonError::InvalidState {
            operation: "read_value",
            state: "no current type",
        });
    };
    let reader = ctx.reader();
    Ok(match ty {
        BsonType::Double => BsonValue::Double(reader.read_double()?),
        BsonType::String => BsonValue::String(reader.read_string()?),
        BsonType::Document => BsonValue::Document(read_document(&mut ctx.nested()?)?),
        BsonType::Array => BsonValue::Array(read_array(&mut ctx.nested()?)?),
        BsonType::Binary => BsonValue::Binary(reader.read_binary_data()?),
        BsonType::Undefined => {
            reader.read_undefined()?;
            BsonValue::Undefined
        }
        BsonType::ObjectId => BsonValue::ObjectId(reader.read_object_id()?),
        BsonType::Boolean => BsonValue::Boolean(reader.read_boolean()?),
        BsonType::DateTime => BsonValue::DateTime(reader.read_date_time()?),
        BsonType::Null => {
            reader.read_null()?;
            BsonValue::Null
        }
        BsonType::RegularExpression => {
            let (pattern, options) = reader.read_regular_expression()?;
            BsonValue::RegularExpression { pattern, options }
        }
        BsonType::JavaScript => BsonValue::JavaScript(reader.read_javascript()?),
        BsonType::Symbol => BsonValue::Symbol(reader.read_symbol()?),
        BsonType::Int32 => BsonValue::Int32(reader.read_int32()?),
        BsonType::Timestamp => BsonValue::Timestamp(reader.read_timestamp()?),
        BsonType::Int64 => BsonValue::Int64(reader.read_int64()?),
        BsonType::Decimal128 => BsonValue::Decimal128(reader.read_decimal128()?),
        BsonType::MinKey => {
            reader.read_min_key()?;
            BsonValue::MinKey
        }
        BsonType::MaxKey => {
            reader.read_max_key()?;
            BsonValue::MaxKey
        }
        BsonType::EndOfDocument => {
            return Err(BsonError::InvalidState {
                operation: "read_value",
                state: "EndOfDocument",
            })
        }
    })
}

/// Reads a whole document, rejecting repeated names unless the context
/// allows them.
pub fn read_document(ctx: &mut DeserializationContext<'_>) -> Result<BsonDocument, BsonError> {
    ctx.reader().read_start_document()?;
    let check_duplicates = !ctx.allow_duplicate_element_names();
    let mut seen = HashSet::new();
    let mut document = BsonDocument::new();
    while ctx.reader().read_bson_type()? != BsonType::EndOfDocument {
        let name = ctx.reader().read_name()?;
        if check_duplicates && !seen.insert(name.clone()) {
            return Err(BsonError::InvalidShape(format!(
                "duplicate element name '{name}'"
            )));
        }
        let value = read_value(ctx)?;
        document.push(name, value);
    }
    ctx.reader().read_end_document()?;
    Ok(document)
}

pub fn read_array(ctx: &mut DeserializationContext<'_>) -> Result<BsonArray, BsonError> {
    ctx.reader().read_start_array()?;
    let mut array = BsonArray::new();
    while ctx.reader().read_bson_type()? != BsonType::EndOfDocument {
        array.push(read_value(ctx)?);
    }
    ctx.reader().read_end_array()?;
    Ok(array)
}

/// Serializer for any [`BsonValue`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BsonValueSerializer;

impl SerializerOf for BsonValueSerializer {
    type Value = BsonValue;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &BsonValue,
    ) -> Result<(), BsonError> {
        write_value(ctx, value)
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<BsonValue, BsonError> {
        read_value(ctx)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BsonDocumentSerializer;

impl SerializerOf for BsonDocumentSerializer {
    type Value = BsonDocument;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &BsonDocument,
    ) -> Result<(), BsonError> {
        write_document(ctx, value)
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<BsonDocument, BsonError> {
        expect_wire_type(ctx, "BsonDocument", BsonType::Document)?;
        read_document(ctx)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BsonArraySerializer;

impl SerializerOf for BsonArraySerializer {
    type Value = BsonArray;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &BsonArray,
    ) -> Result<(), BsonError> {
        write_array(ctx, value)
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<BsonArray, BsonError> {
        expect_wire_type(ctx, "BsonArray", BsonType::Array)?;
        read_array(ctx)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BsonTimestampSerializer;

impl SerializerOf for BsonTimestampSerializer {
    type Value = BsonTimestamp;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &BsonTimestamp,
    ) -> Result<(), BsonError> {
        ctx.writer().write_timestamp(*value)
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<BsonTimestamp, BsonError> {
        expect_wire_type(ctx, "BsonTimestamp", BsonType::Timestamp)?;
        ctx.reader().read_timestamp()
    }
}
