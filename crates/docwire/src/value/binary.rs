//! Binary values, including embedded GUIDs.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use uuid::Uuid;

use crate::error::BsonError;
use crate::guid::{self, GuidRepresentation, GuidRepresentationMode};
use crate::types::{BinarySubtype, BsonType};

/// A binary payload with its subtype.
///
/// In legacy GUID mode a value with a GUID subtype also remembers which
/// [`GuidRepresentation`] produced its bytes. That tag never takes part in
/// equality, ordering or hashing: two values with the same subtype and
/// bytes are equal whatever their tags.
#[derive(Debug, Clone)]
pub struct BsonBinaryData {
    bytes: Vec<u8>,
    subtype: BinarySubtype,
    guid_representation: GuidRepresentation,
}

impl BsonBinaryData {
    /// Creates a value with the generic [`BinarySubtype::Binary`] subtype.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            subtype: BinarySubtype::Binary,
            guid_representation: GuidRepresentation::Unspecified,
        }
    }

    /// Creates a value with an explicit subtype.
    ///
    /// GUID subtypes require exactly 16 bytes. A `UuidStandard` value is
    /// tagged [`GuidRepresentation::Standard`]; other values are untagged.
    ///
    /// The standard subtype admits only one byte layout, so the tag is
    /// implied by the subtype. This lets legacy-mode writers re-encode such
    /// values without an explicit [`Self::with_guid_representation`]. Use
    /// that constructor to tag `UuidLegacy` bytes.
    pub fn with_subtype(
        bytes: impl Into<Vec<u8>>,
        subtype: BinarySubtype,
    ) -> Result<Self, BsonError> {
        let bytes = bytes.into();
        if subtype.is_uuid() && bytes.len() != 16 {
            return Err(BsonError::InvalidShape(format!(
                "length must be 16, not {}, when subtype is {subtype}",
                bytes.len()
            )));
        }
        let guid_representation = if subtype == BinarySubtype::UuidStandard {
            GuidRepresentation::Standard
        } else {
            GuidRepresentation::Unspecified
        };
        Ok(Self {
            bytes,
            subtype,
            guid_representation,
        })
    }

    /// Creates a value tagged with the representation of its GUID bytes.
    ///
    /// Only available in legacy mode. For GUID subtypes the representation
    /// must belong to the subtype (`Standard` with `UuidStandard`, the legacy
    /// layouts or `Unspecified` with `UuidLegacy`); other subtypes only
    /// accept `Unspecified`.
    pub fn with_guid_representation(
        bytes: impl Into<Vec<u8>>,
        subtype: BinarySubtype,
        representation: GuidRepresentation,
        mode: GuidRepresentationMode,
    ) -> Result<Self, BsonError> {
        if !mode.is_legacy() {
            return Err(BsonError::LegacyModeOnly(
                "BsonBinaryData::with_guid_representation",
            ));
        }
        let mut value = Self::with_subtype(bytes, subtype)?;
        if subtype.is_uuid() {
            let expected = match representation {
                GuidRepresentation::Standard => BinarySubtype::UuidStandard,
                _ => BinarySubtype::UuidLegacy,
            };
            if subtype != expected {
                return Err(BsonError::RepresentationMismatch {
                    representation,
                    expected,
                    actual: subtype,
                });
            }
        } else if representation != GuidRepresentation::Unspecified {
            return Err(BsonError::InvalidShape(format!(
                "GUID representation must be Unspecified, not {representation}, when subtype is {subtype}"
            )));
        }
        value.guid_representation = representation;
        Ok(value)
    }

    /// Encodes `guid` using `representation`.
    ///
    /// The representation is remembered only in legacy mode.
    pub fn from_guid(
        guid: Uuid,
        representation: GuidRepresentation,
        mode: GuidRepresentationMode,
    ) -> Result<Self, BsonError> {
        let bytes = guid::to_bytes(guid, representation)?;
        let subtype = guid::subtype_for(representation)?;
        Ok(Self {
            bytes: bytes.to_vec(),
            subtype,
            guid_representation: if mode.is_legacy() {
                representation
            } else {
                GuidRepresentation::Unspecified
            },
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn subtype(&self) -> BinarySubtype {
        self.subtype
    }

    pub fn bson_type(&self) -> BsonType {
        BsonType::Binary
    }

    /// The representation tag recorded in legacy mode.
    pub fn guid_representation(
        &self,
        mode: GuidRepresentationMode,
    ) -> Result<GuidRepresentation, BsonError> {
        if !mode.is_legacy() {
            return Err(BsonError::LegacyModeOnly(
                "BsonBinaryData::guid_representation",
            ));
        }
        Ok(self.guid_representation)
    }

    /// Decodes the embedded GUID using an explicit representation.
    ///
    /// The representation must belong to the value's subtype in either mode;
    /// reading standard bytes with a legacy layout (or the reverse) fails
    /// with [`BsonError::RepresentationMismatch`].
    pub fn to_guid(&self, representation: GuidRepresentation) -> Result<Uuid, BsonError> {
        if !self.subtype.is_uuid() {
            return Err(BsonError::WrongSubtype(self.subtype));
        }
        if representation == GuidRepresentation::Unspecified {
            return Err(BsonError::UnspecifiedRepresentation);
        }
        let expected = guid::subtype_for(representation)?;
        if self.subtype != expected {
            return Err(BsonError::RepresentationMismatch {
                representation,
                expected,
                actual: self.subtype,
            });
        }
        guid::from_bytes(&self.bytes, representation)
    }

    /// Decodes the embedded GUID without naming a representation.
    ///
    /// Legacy mode uses the recorded tag; modern mode requires the standard
    /// subtype.
    pub fn to_guid_default(&self, mode: GuidRepresentationMode) -> Result<Uuid, BsonError> {
        match mode {
            GuidRepresentationMode::Legacy => self.to_guid(self.guid_representation),
            GuidRepresentationMode::Modern => {
                if self.subtype != BinarySubtype::UuidStandard {
                    return Err(BsonError::WrongSubtype(self.subtype));
                }
                guid::from_bytes(&self.bytes, GuidRepresentation::Standard)
            }
        }
    }
}

impl From<Vec<u8>> for BsonBinaryData {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for BsonBinaryData {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl PartialEq for BsonBinaryData {
    fn eq(&self, other: &Self) -> bool {
        self.subtype == other.subtype && self.bytes == other.bytes
    }
}

impl Eq for BsonBinaryData {}

impl Hash for BsonBinaryData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        BsonType::Binary.hash(state);
        for b in &self.bytes {
            state.write_u8(*b);
        }
        self.subtype.to_u8().hash(state);
    }
}

impl PartialOrd for BsonBinaryData {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BsonBinaryData {
    fn cmp(&self, other: &Self) -> Ordering {
        // Slice ordering is byte-wise with shorter-is-less on a common prefix.
        self.subtype
            .cmp(&other.subtype)
            .then_with(|| self.bytes.as_slice().cmp(other.bytes.as_slice()))
    }
}

impl fmt::Display for BsonBinaryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:0x{}", self.subtype, hex::encode(&self.bytes))
    }
}
