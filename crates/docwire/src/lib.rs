//! BSON value model, GUID compatibility layer and serializer registry.
//!
//! - [`value`] holds the in-memory model: [`BsonValue`], [`BsonDocument`],
//!   [`BsonBinaryData`] and friends, with a total ordering across types.
//! - [`guid`] converts 128-bit GUIDs between their historical byte layouts.
//! - [`io`] has the binary reader and writer plus their freezable settings.
//! - [`serialization`] maps Rust types to serializers through
//!   [`BsonSerializerRegistry`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use docwire::io::{BsonBinaryReaderSettings, BsonBinaryWriterSettings};
//! use docwire::serialization::{from_slice, to_vec};
//! use docwire::{BsonDocument, BsonSerializerRegistry, BsonValue};
//!
//! let registry = BsonSerializerRegistry::with_default_providers();
//! let doc: BsonDocument = [("a", BsonValue::Int32(1))].into_iter().collect();
//!
//! let bytes = to_vec(&registry, &Arc::new(BsonBinaryWriterSettings::new()), &doc).unwrap();
//! assert_eq!(bytes, [12, 0, 0, 0, 0x10, b'a', 0, 1, 0, 0, 0, 0]);
//!
//! let back: BsonDocument =
//!     from_slice(&registry, &Arc::new(BsonBinaryReaderSettings::new()), &bytes).unwrap();
//! assert_eq!(back, doc);
//! ```

pub mod defaults;
pub mod error;
pub mod guid;
pub mod io;
pub mod serialization;
pub mod types;
pub mod value;

pub use defaults::BsonDefaults;
pub use error::BsonError;
pub use guid::{GuidRepresentation, GuidRepresentationMode};
pub use serialization::{BsonSerializerRegistry, TypeKey};
pub use types::{BinarySubtype, BsonType};
pub use value::{
    BsonArray, BsonBinaryData, BsonDocument, BsonNull, BsonTimestamp, BsonValue, ObjectId,
};
