//! Serializers for Rust scalars with a single matching wire type.

use crate::error::BsonError;
use crate::serialization::context::{DeserializationContext, SerializationContext};
use crate::serialization::serializer::{DeserializationArgs, SerializationArgs, SerializerOf};
use crate::types::BsonType;
use crate::value::ObjectId;

use super::expect_wire_type;

macro_rules! scalar_serializer {
    ($(#[$doc:meta])* $name:ident, $value:ty, $wire:ident, |$w:ident, $v:ident| $write:expr, |$r:ident| $read:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl SerializerOf for $name {
            type Value = $value;

            fn serialize(
                &self,
                ctx: &mut SerializationContext<'_>,
                _args: &SerializationArgs,
                $v: &$value,
            ) -> Result<(), BsonError> {
                let $w = ctx.writer();
                $write
            }

            fn deserialize(
                &self,
                ctx: &mut DeserializationContext<'_>,
                _args: &DeserializationArgs,
            ) -> Result<$value, BsonError> {
                expect_wire_type(ctx, stringify!($value), BsonType::$wire)?;
                let $r = ctx.reader();
                $read
            }
        }
    };
}

scalar_serializer!(Int32Serializer, i32, Int32, |w, v| w.write_int32(*v), |r| r.read_int32());
scalar_serializer!(Int64Serializer, i64, Int64, |w, v| w.write_int64(*v), |r| r.read_int64());
scalar_serializer!(
    StringSerializer,
    String,
    String,
    |w, v| w.write_string(v),
    |r| r.read_string()
);
scalar_serializer!(
    BooleanSerializer,
    bool,
    Boolean,
    |w, v| w.write_boolean(*v),
    |r| r.read_boolean()
);
scalar_serializer!(
    /// Writes [`ObjectId`] as a wire ObjectId.
    ObjectIdSerializer,
    ObjectId,
    ObjectId,
    |w, v| w.write_object_id(*v),
    |r| r.read_object_id()
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{BsonBinaryReader, BsonBinaryWriter, BsonReader, BsonWriter};

    #[test]
    fn wrong_wire_type_names_the_target() {
        let mut w = BsonBinaryWriter::with_default_settings();
        w.write_start_document().unwrap();
        w.write_name("x").unwrap();
        w.write_string("seven").unwrap();
        w.write_end_document().unwrap();
        let bytes = w.finish().unwrap();

        let mut r = BsonBinaryReader::with_default_settings(&bytes);
        r.read_start_document().unwrap();
        r.read_bson_type().unwrap();
        r.read_name().unwrap();
        let mut ctx = DeserializationContext::new(&mut r);
        assert_eq!(
            Int32Serializer.deserialize(&mut ctx, &DeserializationArgs::default()),
            Err(BsonError::UnexpectedWireType {
                target: "i32".into(),
                found: BsonType::String,
            })
        );
    }
}
