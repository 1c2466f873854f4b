//! Binary BSON reader over a borrowed byte slice.

use std::sync::Arc;

use docwire_buffers::Reader;

use crate::error::BsonError;
use crate::guid::GuidRepresentation;
use crate::types::{BinarySubtype, BsonType};
use crate::value::{BsonBinaryData, BsonTimestamp, ObjectId};

use super::reader::BsonReader;
use super::reader_settings::{BsonBinaryReaderSettings, BsonReaderSettings};
use super::settings::Freezable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Document,
    Array,
}

#[derive(Debug)]
struct Frame {
    kind: ContainerKind,
    /// Offset one past the container's terminating NUL.
    end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Type,
    Name,
    Value,
    EndOfDocument,
    EndOfArray,
    Done,
}

impl State {
    fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::Type => "Type",
            Self::Name => "Name",
            Self::Value => "Value",
            Self::EndOfDocument => "EndOfDocument",
            Self::EndOfArray => "EndOfArray",
            Self::Done => "Done",
        }
    }
}

/// Reads one top-level document.
pub struct BsonBinaryReader<'a> {
    input: Reader<'a>,
    settings: Arc<BsonBinaryReaderSettings>,
    stack: Vec<Frame>,
    state: State,
    current_type: Option<BsonType>,
}

impl<'a> BsonBinaryReader<'a> {
    /// Creates a reader that keeps a frozen copy of `settings`.
    pub fn new(bytes: &'a [u8], settings: &Arc<BsonBinaryReaderSettings>) -> Self {
        Self {
            input: Reader::new(bytes),
            settings: Freezable::frozen_copy(settings),
            stack: Vec::new(),
            state: State::Initial,
            current_type: None,
        }
    }

    pub fn with_default_settings(bytes: &'a [u8]) -> Self {
        Self::new(bytes, &BsonBinaryReaderSettings::new().into_frozen())
    }

    pub fn binary_settings(&self) -> &Arc<BsonBinaryReaderSettings> {
        &self.settings
    }

    /// `true` once the top-level document has been fully read.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.size()
    }

    fn invalid(&self, operation: &'static str) -> BsonError {
        BsonError::InvalidState {
            operation,
            state: self.state.as_str(),
        }
    }

    /// Checks that a value of type `ty` is next.
    fn expect_value(&self, operation: &'static str, ty: BsonType) -> Result<(), BsonError> {
        if self.state != State::Value {
            return Err(self.invalid(operation));
        }
        match self.current_type {
            Some(found) if found == ty => Ok(()),
            Some(found) => Err(BsonError::UnexpectedWireType {
                target: ty.to_string(),
                found,
            }),
            None => Err(self.invalid(operation)),
        }
    }

    fn value_done(&mut self) {
        self.state = State::Type;
    }

    fn read_size(&mut self) -> Result<usize, BsonError> {
        let size = self.input.i32()?;
        usize::try_from(size)
            .map_err(|_| BsonError::InvalidShape(format!("negative size {size}")))
    }

    fn push(&mut self, kind: ContainerKind) -> Result<(), BsonError> {
        let depth = self.settings.base().max_serialization_depth();
        if self.stack.len() >= depth {
            return Err(BsonError::MaxDepthExceeded(depth));
        }
        let start = self.input.x;
        let size = self.read_size()?;
        let max = self.settings.max_document_size();
        if size > max {
            return Err(BsonError::DocumentTooLarge { size, max });
        }
        if size < 5 || size - 4 > self.input.size() {
            return Err(BsonError::InvalidShape(format!(
                "container size {size} does not fit the input"
            )));
        }
        self.stack.push(Frame {
            kind,
            end: start + size,
        });
        self.state = State::Type;
        Ok(())
    }

    fn pop(&mut self, operation: &'static str, state: State) -> Result<(), BsonError> {
        if self.state != state {
            return Err(self.invalid(operation));
        }
        let Some(frame) = self.stack.pop() else {
            return Err(self.invalid(operation));
        };
        if self.input.x != frame.end {
            return Err(BsonError::InvalidShape(format!(
                "container ended at {} but its size says {}",
                self.input.x, frame.end
            )));
        }
        self.current_type = None;
        if self.stack.is_empty() {
            self.state = State::Done;
        } else {
            self.value_done();
        }
        Ok(())
    }

    fn read_length_prefixed(&mut self) -> Result<String, BsonError> {
        let len = self.read_size()?;
        if len == 0 {
            return Err(BsonError::InvalidShape("string length must include the NUL".into()));
        }
        let s = self.input.utf8(len - 1)?.to_owned();
        if self.input.u8()? != 0 {
            return Err(BsonError::InvalidShape("string is not NUL-terminated".into()));
        }
        Ok(s)
    }

    fn tag_guid(&self, bytes: Vec<u8>, subtype: BinarySubtype) -> Result<BsonBinaryData, BsonError> {
        let base = self.settings.base();
        let mode = base.guid_representation_mode();
        if !mode.is_legacy() || !subtype.is_uuid() {
            return BsonBinaryData::with_subtype(bytes, subtype);
        }
        let representation = match subtype {
            BinarySubtype::UuidStandard => GuidRepresentation::Standard,
            _ => {
                let configured = base.effective_guid_representation();
                if configured.is_legacy() {
                    configured
                } else {
                    GuidRepresentation::Unspecified
                }
            }
        };
        BsonBinaryData::with_guid_representation(bytes, subtype, representation, mode)
    }
}

impl BsonReader for BsonBinaryReader<'_> {
    fn settings(&self) -> &BsonReaderSettings {
        self.settings.base()
    }

    fn current_bson_type(&self) -> Option<BsonType> {
        match self.state {
            State::Initial => Some(BsonType::Document),
            _ => self.current_type,
        }
    }

    fn read_bson_type(&mut self) -> Result<BsonType, BsonError> {
        if self.state != State::Type {
            return Err(self.invalid("read_bson_type"));
        }
        let byte = self.input.u8()?;
        let ty = BsonType::from_u8(byte).ok_or(BsonError::InvalidWireType(byte))?;
        self.current_type = Some(ty);
        let in_array = matches!(
            self.stack.last(),
            Some(Frame {
                kind: ContainerKind::Array,
                ..
            })
        );
        self.state = match (ty, in_array) {
            (BsonType::EndOfDocument, true) => State::EndOfArray,
            (BsonType::EndOfDocument, false) => State::EndOfDocument,
            (_, true) => {
                self.input.cstring()?;
                State::Value
            }
            (_, false) => State::Name,
        };
        Ok(ty)
    }

    fn read_name(&mut self) -> Result<String, BsonError> {
        if self.state != State::Name {
            return Err(self.invalid("read_name"));
        }
        let name = self.input.cstring()?.to_owned();
        self.state = State::Value;
        Ok(name)
    }

    fn read_start_document(&mut self) -> Result<(), BsonError> {
        if self.state != State::Initial {
            self.expect_value("read_start_document", BsonType::Document)?;
        }
        self.push(ContainerKind::Document)
    }

    fn read_end_document(&mut self) -> Result<(), BsonError> {
        self.pop("read_end_document", State::EndOfDocument)
    }

    fn read_start_array(&mut self) -> Result<(), BsonError> {
        self.expect_value("read_start_array", BsonType::Array)?;
        self.push(ContainerKind::Array)
    }

    fn read_end_array(&mut self) -> Result<(), BsonError> {
        self.pop("read_end_array", State::EndOfArray)
    }

    fn read_double(&mut self) -> Result<f64, BsonError> {
        self.expect_value("read_double", BsonType::Double)?;
        let v = self.input.f64()?;
        self.value_done();
        Ok(v)
    }

    fn read_string(&mut self) -> Result<String, BsonError> {
        self.expect_value("read_string", BsonType::String)?;
        let s = self.read_length_prefixed()?;
        self.value_done();
        Ok(s)
    }

    fn read_binary_data(&mut self) -> Result<BsonBinaryData, BsonError> {
        self.expect_value("read_binary_data", BsonType::Binary)?;
        let mut len = self.read_size()?;
        let mut subtype = BinarySubtype::from_u8(self.input.u8()?);
        if subtype == BinarySubtype::OldBinary {
            let inner = self.read_size()?;
            if inner + 4 != len {
                return Err(BsonError::InvalidShape(format!(
                    "OldBinary inner length {inner} does not match outer length {len}"
                )));
            }
            len = inner;
            if self.settings.fix_old_binary_subtype_on_input() {
                subtype = BinarySubtype::Binary;
            }
        }
        let bytes = self.input.buf(len)?.to_vec();
        let value = self.tag_guid(bytes, subtype)?;
        self.value_done();
        Ok(value)
    }

    fn read_undefined(&mut self) -> Result<(), BsonError> {
        self.expect_value("read_undefined", BsonType::Undefined)?;
        self.value_done();
        Ok(())
    }

    fn read_object_id(&mut self) -> Result<ObjectId, BsonError> {
        self.expect_value("read_object_id", BsonType::ObjectId)?;
        let id = ObjectId::from_bytes(self.input.bytes::<12>()?);
        self.value_done();
        Ok(id)
    }

    fn read_boolean(&mut self) -> Result<bool, BsonError> {
        self.expect_value("read_boolean", BsonType::Boolean)?;
        let v = match self.input.u8()? {
            0 => false,
            1 => true,
            other => {
                return Err(BsonError::InvalidShape(format!(
                    "boolean byte must be 0 or 1, not {other}"
                )))
            }
        };
        self.value_done();
        Ok(v)
    }

    fn read_date_time(&mut self) -> Result<i64, BsonError> {
        self.expect_value("read_date_time", BsonType::DateTime)?;
        let v = self.input.i64()?;
        self.value_done();
        Ok(v)
    }

    fn read_null(&mut self) -> Result<(), BsonError> {
        self.expect_value("read_null", BsonType::Null)?;
        self.value_done();
        Ok(())
    }

    fn read_regular_expression(&mut self) -> Result<(String, String), BsonError> {
        self.expect_value("read_regular_expression", BsonType::RegularExpression)?;
        let pattern = self.input.cstring()?.to_owned();
        let options = self.input.cstring()?.to_owned();
        self.value_done();
        Ok((pattern, options))
    }

    fn read_javascript(&mut self) -> Result<String, BsonError> {
        self.expect_value("read_javascript", BsonType::JavaScript)?;
        let code = self.read_length_prefixed()?;
        self.value_done();
        Ok(code)
    }

    fn read_symbol(&mut self) -> Result<String, BsonError> {
        self.expect_value("read_symbol", BsonType::Symbol)?;
        let s = self.read_length_prefixed()?;
        self.value_done();
        Ok(s)
    }

    fn read_int32(&mut self) -> Result<i32, BsonError> {
        self.expect_value("read_int32", BsonType::Int32)?;
        let v = self.input.i32()?;
        self.value_done();
        Ok(v)
    }

    fn read_timestamp(&mut self) -> Result<BsonTimestamp, BsonError> {
        self.expect_value("read_timestamp", BsonType::Timestamp)?;
        let v = BsonTimestamp::from_u64(self.input.u64()?);
        self.value_done();
        Ok(v)
    }

    fn read_int64(&mut self) -> Result<i64, BsonError> {
        self.expect_value("read_int64", BsonType::Int64)?;
        let v = self.input.i64()?;
        self.value_done();
        Ok(v)
    }

    fn read_decimal128(&mut self) -> Result<[u8; 16], BsonError> {
        self.expect_value("read_decimal128", BsonType::Decimal128)?;
        let v = self.input.bytes::<16>()?;
        self.value_done();
        Ok(v)
    }

    fn read_min_key(&mut self) -> Result<(), BsonError> {
        self.expect_value("read_min_key", BsonType::MinKey)?;
        self.value_done();
        Ok(())
    }

    fn read_max_key(&mut self) -> Result<(), BsonError> {
        self.expect_value("read_max_key", BsonType::MaxKey)?;
        self.value_done();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::BsonDefaults;
    use crate::guid::GuidRepresentationMode;

    #[test]
    fn truncated_input_fails_the_size_check() {
        let bytes = fixed_doc();
        let mut r = BsonBinaryReader::with_default_settings(&bytes[..20]);
        assert_eq!(r.current_bson_type(), Some(BsonType::Document));
        assert!(matches!(
            r.read_start_document(),
            Err(BsonError::InvalidShape(_))
        ));
    }

    #[test]
    fn walks_document_and_array() {
        let bytes = fixed_doc();
        let mut r = BsonBinaryReader::with_default_settings(&bytes);
        r.read_start_document().unwrap();
        assert_eq!(r.read_bson_type().unwrap(), BsonType::Int32);
        assert_eq!(r.read_name().unwrap(), "a");
        assert_eq!(r.read_int32().unwrap(), 1);
        assert_eq!(r.read_bson_type().unwrap(), BsonType::Array);
        assert_eq!(r.read_name().unwrap(), "b");
        r.read_start_array().unwrap();
        assert_eq!(r.read_bson_type().unwrap(), BsonType::Boolean);
        assert!(r.read_boolean().unwrap());
        assert_eq!(r.read_bson_type().unwrap(), BsonType::EndOfDocument);
        r.read_end_array().unwrap();
        assert_eq!(r.read_bson_type().unwrap(), BsonType::EndOfDocument);
        r.read_end_document().unwrap();
        assert!(r.is_done());
    }

    // { "a": 1, "b": [true] }
    fn fixed_doc() -> Vec<u8> {
        let mut bytes = vec![24, 0, 0, 0, 0x10, b'a', 0, 1, 0, 0, 0, 0x04, b'b', 0];
        bytes.extend_from_slice(&[9, 0, 0, 0, 0x08, b'0', 0, 1, 0]);
        bytes.push(0);
        bytes
    }

    #[test]
    fn wrong_type_is_reported() {
        let bytes = fixed_doc();
        let mut r = BsonBinaryReader::with_default_settings(&bytes);
        r.read_start_document().unwrap();
        r.read_bson_type().unwrap();
        r.read_name().unwrap();
        assert_eq!(
            r.read_string(),
            Err(BsonError::UnexpectedWireType {
                target: "String".into(),
                found: BsonType::Int32,
            })
        );
    }

    #[test]
    fn unknown_type_byte() {
        let bytes = [8, 0, 0, 0, 0x0c, b'a', 0, 0];
        let mut r = BsonBinaryReader::with_default_settings(&bytes);
        r.read_start_document().unwrap();
        assert_eq!(r.read_bson_type(), Err(BsonError::InvalidWireType(0x0c)));
    }

    #[test]
    fn depth_limit() {
        // { "a": { "a": {} } }
        let bytes = [
            21, 0, 0, 0, 0x03, b'a', 0, 13, 0, 0, 0, 0x03, b'a', 0, 5, 0, 0, 0, 0, 0, 0,
        ];
        let mut settings = BsonBinaryReaderSettings::with_defaults(&BsonDefaults::DEFAULT);
        settings.base_mut().set_max_serialization_depth(2).unwrap();
        let mut r = BsonBinaryReader::new(&bytes, &Arc::new(settings));
        r.read_start_document().unwrap();
        r.read_bson_type().unwrap();
        r.read_name().unwrap();
        r.read_start_document().unwrap();
        r.read_bson_type().unwrap();
        r.read_name().unwrap();
        assert_eq!(r.read_start_document(), Err(BsonError::MaxDepthExceeded(2)));
    }

    #[test]
    fn remaining_counts_unread_bytes() {
        let mut bytes = fixed_doc();
        bytes.extend_from_slice(&[1, 2, 3]);
        let mut r = BsonBinaryReader::with_default_settings(&bytes);
        assert_eq!(r.remaining(), 27);
        r.read_start_document().unwrap();
        assert_eq!(r.remaining(), 23);
    }

    #[test]
    fn legacy_subtype_is_tagged_with_reader_representation() {
        let mut bytes = vec![0, 0, 0, 0, 0x05, b'g', 0, 16, 0, 0, 0, 0x03];
        bytes.extend_from_slice(&[0xab; 16]);
        bytes.push(0);
        let len = bytes.len() as u8;
        bytes[0] = len;

        let mut settings = BsonBinaryReaderSettings::with_defaults(&BsonDefaults::DEFAULT);
        settings
            .base_mut()
            .set_guid_representation(GuidRepresentation::JavaLegacy)
            .unwrap();
        let mut r = BsonBinaryReader::new(&bytes, &Arc::new(settings));
        r.read_start_document().unwrap();
        r.read_bson_type().unwrap();
        r.read_name().unwrap();
        let value = r.read_binary_data().unwrap();
        assert_eq!(
            value.guid_representation(GuidRepresentationMode::Legacy),
            Ok(GuidRepresentation::JavaLegacy)
        );
    }
}
