//! The writer abstraction serializers write through.

use crate::error::BsonError;
use crate::value::{BsonBinaryData, BsonTimestamp, ObjectId};

use super::writer_settings::BsonWriterSettings;

/// Sink for a stream of BSON elements.
///
/// Inside a document every value is preceded by [`BsonWriter::write_name`].
/// Inside an array names are generated by the writer.
pub trait BsonWriter {
    fn settings(&self) -> &BsonWriterSettings;

    fn write_start_document(&mut self) -> Result<(), BsonError>;
    fn write_end_document(&mut self) -> Result<(), BsonError>;
    fn write_start_array(&mut self) -> Result<(), BsonError>;
    fn write_end_array(&mut self) -> Result<(), BsonError>;
    fn write_name(&mut self, name: &str) -> Result<(), BsonError>;

    fn write_double(&mut self, value: f64) -> Result<(), BsonError>;
    fn write_string(&mut self, value: &str) -> Result<(), BsonError>;
    fn write_binary_data(&mut self, value: &BsonBinaryData) -> Result<(), BsonError>;
    fn write_undefined(&mut self) -> Result<(), BsonError>;
    fn write_object_id(&mut self, value: ObjectId) -> Result<(), BsonError>;
    fn write_boolean(&mut self, value: bool) -> Result<(), BsonError>;
    fn write_date_time(&mut self, millis: i64) -> Result<(), BsonError>;
    fn write_null(&mut self) -> Result<(), BsonError>;
    fn write_regular_expression(&mut self, pattern: &str, options: &str)
        -> Result<(), BsonError>;
    fn write_javascript(&mut self, code: &str) -> Result<(), BsonError>;
    fn write_symbol(&mut self, value: &str) -> Result<(), BsonError>;
    fn write_int32(&mut self, value: i32) -> Result<(), BsonError>;
    fn write_timestamp(&mut self, value: BsonTimestamp) -> Result<(), BsonError>;
    fn write_int64(&mut self, value: i64) -> Result<(), BsonError>;
    fn write_decimal128(&mut self, bytes: [u8; 16]) -> Result<(), BsonError>;
    fn write_min_key(&mut self) -> Result<(), BsonError>;
    fn write_max_key(&mut self) -> Result<(), BsonError>;
}
