//! The reader abstraction serializers read through.

use crate::error::BsonError;
use crate::types::BsonType;
use crate::value::{BsonBinaryData, BsonTimestamp, ObjectId};

use super::reader_settings::BsonReaderSettings;

/// Source of a stream of BSON elements.
///
/// Inside a document the caller reads a type with
/// [`BsonReader::read_bson_type`], then the name, then the value.
/// Inside an array the name is consumed by `read_bson_type`.
/// [`BsonType::EndOfDocument`] signals the end of the current container.
pub trait BsonReader {
    fn settings(&self) -> &BsonReaderSettings;

    /// Type of the value about to be read.
    fn current_bson_type(&self) -> Option<BsonType>;

    fn read_bson_type(&mut self) -> Result<BsonType, BsonError>;
    fn read_name(&mut self) -> Result<String, BsonError>;

    fn read_start_document(&mut self) -> Result<(), BsonError>;
    fn read_end_document(&mut self) -> Result<(), BsonError>;
    fn read_start_array(&mut self) -> Result<(), BsonError>;
    fn read_end_array(&mut self) -> Result<(), BsonError>;

    fn read_double(&mut self) -> Result<f64, BsonError>;
    fn read_string(&mut self) -> Result<String, BsonError>;
    fn read_binary_data(&mut self) -> Result<BsonBinaryData, BsonError>;
    fn read_undefined(&mut self) -> Result<(), BsonError>;
    fn read_object_id(&mut self) -> Result<ObjectId, BsonError>;
    fn read_boolean(&mut self) -> Result<bool, BsonError>;
    fn read_date_time(&mut self) -> Result<i64, BsonError>;
    fn read_null(&mut self) -> Result<(), BsonError>;
    fn read_regular_expression(&mut self) -> Result<(String, String), BsonError>;
    fn read_javascript(&mut self) -> Result<String, BsonError>;
    fn read_symbol(&mut self) -> Result<String, BsonError>;
    fn read_int32(&mut self) -> Result<i32, BsonError>;
    fn read_timestamp(&mut self) -> Result<BsonTimestamp, BsonError>;
    fn read_int64(&mut self) -> Result<i64, BsonError>;
    fn read_decimal128(&mut self) -> Result<[u8; 16], BsonError>;
    fn read_min_key(&mut self) -> Result<(), BsonError>;
    fn read_max_key(&mut self) -> Result<(), BsonError>;
}
