use uuid::Uuid;

use crate::error::BsonError;
use crate::guid::GuidRepresentation;
use crate::serialization::context::{DeserializationContext, SerializationContext};
use crate::serialization::serializer::{DeserializationArgs, SerializationArgs, SerializerOf};
use crate::types::BsonType;
use crate::value::BsonBinaryData;

use super::expect_wire_type;

/// Writes [`Uuid`] as a binary value in a fixed representation.
///
/// With [`GuidRepresentation::Unspecified`] the representation comes from
/// the reader or writer settings in legacy mode; modern mode then fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuidSerializer {
    representation: GuidRepresentation,
}

impl GuidSerializer {
    pub const fn new(representation: GuidRepresentation) -> Self {
        Self { representation }
    }

    pub fn representation(&self) -> GuidRepresentation {
        self.representation
    }
}

impl SerializerOf for GuidSerializer {
    type Value = Uuid;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &Uuid,
    ) -> Result<(), BsonError> {
        let settings = ctx.writer().settings();
        let mode = settings.guid_representation_mode();
        let representation = match self.representation {
            GuidRepresentation::Unspecified if mode.is_legacy() => {
                settings.effective_guid_representation()
            }
            other => other,
        };
        let data = BsonBinaryData::from_guid(*value, representation, mode)?;
        ctx.writer().write_binary_data(&data)
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<Uuid, BsonError> {
        expect_wire_type(ctx, "Uuid", BsonType::Binary)?;
        let mode = ctx.reader().settings().guid_representation_mode();
        let data = ctx.reader().read_binary_data()?;
        match self.representation {
            GuidRepresentation::Unspecified if mode.is_legacy() => data.to_guid_default(mode),
            representation => data.to_guid(representation),
        }
    }

    fn same_configuration(&self, other: &Self) -> bool {
        self == other
    }
}
