//! Pure conversions between [`Uuid`] and its representation-specific bytes.

use uuid::Uuid;

use super::GuidRepresentation;
use crate::error::BsonError;
use crate::types::BinarySubtype;

/// Encodes `guid` in the byte order of `representation`.
pub fn to_bytes(guid: Uuid, representation: GuidRepresentation) -> Result<[u8; 16], BsonError> {
    let standard = *guid.as_bytes();
    match representation {
        GuidRepresentation::Unspecified => Err(BsonError::UnspecifiedRepresentation),
        GuidRepresentation::Standard | GuidRepresentation::PythonLegacy => Ok(standard),
        GuidRepresentation::CSharpLegacy => Ok(guid.to_bytes_le()),
        GuidRepresentation::JavaLegacy => Ok(reverse_halves(standard)),
    }
}

/// Decodes 16 bytes laid out in `representation` order.
pub fn from_bytes(bytes: &[u8], representation: GuidRepresentation) -> Result<Uuid, BsonError> {
    let bytes: [u8; 16] = bytes.try_into().map_err(|_| {
        BsonError::InvalidShape(format!(
            "a GUID needs exactly 16 bytes, not {}",
            bytes.len()
        ))
    })?;
    match representation {
        GuidRepresentation::Unspecified => Err(BsonError::UnspecifiedRepresentation),
        GuidRepresentation::Standard | GuidRepresentation::PythonLegacy => {
            Ok(Uuid::from_bytes(bytes))
        }
        GuidRepresentation::CSharpLegacy => Ok(Uuid::from_bytes_le(bytes)),
        GuidRepresentation::JavaLegacy => Ok(Uuid::from_bytes(reverse_halves(bytes))),
    }
}

/// Binary subtype that stores values of `representation`.
pub fn subtype_for(representation: GuidRepresentation) -> Result<BinarySubtype, BsonError> {
    match representation {
        GuidRepresentation::Unspecified => Err(BsonError::UnspecifiedRepresentation),
        GuidRepresentation::Standard => Ok(BinarySubtype::UuidStandard),
        GuidRepresentation::CSharpLegacy
        | GuidRepresentation::JavaLegacy
        | GuidRepresentation::PythonLegacy => Ok(BinarySubtype::UuidLegacy),
    }
}

// Java drivers wrote the most and least significant longs little-endian.
fn reverse_halves(mut bytes: [u8; 16]) -> [u8; 16] {
    bytes[0..8].reverse();
    bytes[8..16].reverse();
    bytes
}
