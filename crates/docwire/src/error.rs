//! Error type shared by every docwire component.

use docwire_buffers::BufferError;
use thiserror::Error;

use crate::guid::GuidRepresentation;
use crate::types::{BinarySubtype, BsonType};

/// Failures raised by the value model, settings, IO and serialization layers.
///
/// Every variant is a local, deterministic failure: retrying the same call
/// with the same inputs fails the same way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BsonError {
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    #[error("{0} is frozen")]
    FrozenMutation(&'static str),
    #[error("there is already a serializer registered for type {0}")]
    AlreadyRegistered(String),
    #[error("there is already a different serializer registered for type {0}")]
    ConflictingRegistration(String),
    #[error("a serializer cannot be registered for type {0} because it is a BSON value type")]
    ReservedType(String),
    #[error("no serializer found for type {0}")]
    NoSerializerFound(String),
    #[error("subtype must be UuidStandard or UuidLegacy, not {0}")]
    WrongSubtype(BinarySubtype),
    #[error("GUID representation cannot be Unspecified")]
    UnspecifiedRepresentation,
    #[error("GUID representation {representation} is only valid with subtype {expected}, not with subtype {actual}")]
    RepresentationMismatch {
        representation: GuidRepresentation,
        expected: BinarySubtype,
        actual: BinarySubtype,
    },
    #[error("cannot deserialize a {target} from BSON type {found}")]
    UnexpectedWireType { target: String, found: BsonType },
    #[error("id of type {0} cannot be the default value (all zeros)")]
    IdZeroValueOnly(&'static str),
    #[error("{0} can only be used when the GUID representation mode is legacy")]
    LegacyModeOnly(&'static str),
    #[error("maximum serialization depth of {0} exceeded (does the value have a circular reference?)")]
    MaxDepthExceeded(usize),
    #[error("document size {size} is larger than the maximum of {max}")]
    DocumentTooLarge { size: usize, max: usize },
    #[error("{operation} cannot be called when the state is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    #[error("invalid BSON type byte 0x{0:02x}")]
    InvalidWireType(u8),
    #[error("serializer value type mismatch: expected {expected}")]
    TypeMismatch { expected: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
}
