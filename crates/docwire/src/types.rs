//! Wire discriminants: BSON element types and binary subtypes.
//!
//! Both enumerations are part of the wire contract. Adding a member is a
//! breaking change for every codec.

use std::fmt;

/// BSON element type, as written in front of every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BsonType {
    EndOfDocument = 0x00,
    Double = 0x01,
    String = 0x02,
    Document = 0x03,
    Array = 0x04,
    Binary = 0x05,
    Undefined = 0x06,
    ObjectId = 0x07,
    Boolean = 0x08,
    DateTime = 0x09,
    Null = 0x0a,
    RegularExpression = 0x0b,
    JavaScript = 0x0d,
    Symbol = 0x0e,
    Int32 = 0x10,
    Timestamp = 0x11,
    Int64 = 0x12,
    Decimal128 = 0x13,
    MaxKey = 0x7f,
    MinKey = 0xff,
}

impl BsonType {
    /// Decodes a type byte. Returns `None` for bytes that have no member.
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0x00 => Self::EndOfDocument,
            0x01 => Self::Double,
            0x02 => Self::String,
            0x03 => Self::Document,
            0x04 => Self::Array,
            0x05 => Self::Binary,
            0x06 => Self::Undefined,
            0x07 => Self::ObjectId,
            0x08 => Self::Boolean,
            0x09 => Self::DateTime,
            0x0a => Self::Null,
            0x0b => Self::RegularExpression,
            0x0d => Self::JavaScript,
            0x0e => Self::Symbol,
            0x10 => Self::Int32,
            0x11 => Self::Timestamp,
            0x12 => Self::Int64,
            0x13 => Self::Decimal128,
            0x7f => Self::MaxKey,
            0xff => Self::MinKey,
            _ => return None,
        })
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for BsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Subtype byte carried by every binary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinarySubtype {
    Binary,
    Function,
    /// Deprecated generic binary with an inner length prefix.
    OldBinary,
    UuidLegacy,
    UuidStandard,
    Md5,
    Encrypted,
    Column,
    Sensitive,
    /// Unassigned subtypes 0x09..=0x7f.
    Reserved(u8),
    /// User-defined subtypes 0x80..=0xff.
    UserDefined(u8),
}

impl BinarySubtype {
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            0x00 => Self::Binary,
            0x01 => Self::Function,
            0x02 => Self::OldBinary,
            0x03 => Self::UuidLegacy,
            0x04 => Self::UuidStandard,
            0x05 => Self::Md5,
            0x06 => Self::Encrypted,
            0x07 => Self::Column,
            0x08 => Self::Sensitive,
            0x80..=0xff => Self::UserDefined(byte),
            _ => Self::Reserved(byte),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Binary => 0x00,
            Self::Function => 0x01,
            Self::OldBinary => 0x02,
            Self::UuidLegacy => 0x03,
            Self::UuidStandard => 0x04,
            Self::Md5 => 0x05,
            Self::Encrypted => 0x06,
            Self::Column => 0x07,
            Self::Sensitive => 0x08,
            Self::Reserved(b) | Self::UserDefined(b) => b,
        }
    }

    /// `true` for the two subtypes that embed a 16-byte GUID.
    pub fn is_uuid(self) -> bool {
        matches!(self, Self::UuidLegacy | Self::UuidStandard)
    }
}

impl From<u8> for BinarySubtype {
    fn from(byte: u8) -> Self {
        Self::from_u8(byte)
    }
}

impl From<BinarySubtype> for u8 {
    fn from(subtype: BinarySubtype) -> Self {
        subtype.to_u8()
    }
}

impl PartialOrd for BinarySubtype {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BinarySubtype {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_u8().cmp(&other.to_u8())
    }
}

impl fmt::Display for BinarySubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserved(b) => write!(f, "Reserved(0x{b:02x})"),
            Self::UserDefined(b) => write!(f, "UserDefined(0x{b:02x})"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}
