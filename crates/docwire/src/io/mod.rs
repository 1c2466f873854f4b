//! Readers, writers and their freezable settings.
//!
//! Every reader or writer holds an `Arc` of frozen settings. Passing
//! unfrozen settings to a constructor freezes a private copy; passing frozen
//! settings shares them.

pub mod binary_reader;
pub mod binary_writer;
pub mod reader;
pub mod reader_settings;
pub mod settings;
pub mod writer;
pub mod writer_settings;

pub use binary_reader::BsonBinaryReader;
pub use binary_writer::BsonBinaryWriter;
pub use reader::BsonReader;
pub use reader_settings::{BsonBinaryReaderSettings, BsonReaderSettings, JsonReaderSettings};
pub use settings::Freezable;
pub use writer::BsonWriter;
pub use writer_settings::{BsonBinaryWriterSettings, BsonWriterSettings};
