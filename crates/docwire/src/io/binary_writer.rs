//! Binary BSON writer over a growable buffer.

use std::sync::Arc;

use docwire_buffers::{BufferError, Writer};

use crate::error::BsonError;
use crate::types::{BinarySubtype, BsonType};
use crate::value::{BsonBinaryData, BsonTimestamp, ObjectId};

use super::settings::Freezable;
use super::writer::BsonWriter;
use super::writer_settings::{BsonBinaryWriterSettings, BsonWriterSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Document,
    Array,
}

#[derive(Debug)]
struct Frame {
    kind: ContainerKind,
    /// Offset of the reserved size slot.
    start: usize,
    /// Next generated element name inside an array.
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Name,
    Value,
    Done,
}

impl State {
    fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::Name => "Name",
            Self::Value => "Value",
            Self::Done => "Done",
        }
    }
}

/// OldBinary repeats the payload length inside the value, so the outer
/// length counts four more bytes.
fn old_binary_outer_length(len: i32) -> Result<i32, BsonError> {
    len.checked_add(4).ok_or_else(|| {
        BsonError::InvalidShape(format!("OldBinary payload of {len} bytes is too long"))
    })
}

/// Writes one top-level document.
///
/// ```
/// use docwire::io::{BsonBinaryWriter, BsonWriter};
///
/// let mut writer = BsonBinaryWriter::with_default_settings();
/// writer.write_start_document().unwrap();
/// writer.write_name("a").unwrap();
/// writer.write_int32(1).unwrap();
/// writer.write_end_document().unwrap();
/// assert_eq!(
///     writer.finish().unwrap(),
///     [12, 0, 0, 0, 0x10, b'a', 0, 1, 0, 0, 0, 0]
/// );
/// ```
pub struct BsonBinaryWriter {
    out: Writer,
    settings: Arc<BsonBinaryWriterSettings>,
    stack: Vec<Frame>,
    state: State,
    name: Option<String>,
}

impl BsonBinaryWriter {
    /// Creates a writer that keeps a frozen copy of `settings`.
    pub fn new(settings: &Arc<BsonBinaryWriterSettings>) -> Self {
        Self {
            out: Writer::new(),
            settings: Freezable::frozen_copy(settings),
            stack: Vec::new(),
            state: State::Initial,
            name: None,
        }
    }

    pub fn with_default_settings() -> Self {
        Self::new(&BsonBinaryWriterSettings::new().into_frozen())
    }

    pub fn binary_settings(&self) -> &Arc<BsonBinaryWriterSettings> {
        &self.settings
    }

    /// Returns the encoded document. The top-level document must be closed.
    pub fn finish(self) -> Result<Vec<u8>, BsonError> {
        if self.state != State::Done {
            return Err(BsonError::InvalidState {
                operation: "finish",
                state: self.state.as_str(),
            });
        }
        let mut out = self.out;
        Ok(out.flush())
    }

    fn invalid(&self, operation: &'static str) -> BsonError {
        BsonError::InvalidState {
            operation,
            state: self.state.as_str(),
        }
    }

    /// Writes the element header for a value of type `ty`.
    fn begin_value(&mut self, operation: &'static str, ty: BsonType) -> Result<(), BsonError> {
        match (self.state, self.stack.last_mut()) {
            (State::Value, Some(frame)) if frame.kind == ContainerKind::Document => {
                let name = self.name.take().unwrap_or_default();
                self.out.u8(ty.to_u8());
                self.out.cstring(&name)?;
            }
            (State::Name, Some(frame)) if frame.kind == ContainerKind::Array => {
                let index = frame.index;
                frame.index += 1;
                self.out.u8(ty.to_u8());
                self.out.cstring(&index.to_string())?;
            }
            (state, _) => {
                return Err(BsonError::InvalidState {
                    operation,
                    state: state.as_str(),
                })
            }
        }
        self.state = State::Name;
        Ok(())
    }

    fn push(&mut self, kind: ContainerKind) -> Result<(), BsonError> {
        let max = self.settings.base().max_serialization_depth();
        if self.stack.len() >= max {
            return Err(BsonError::MaxDepthExceeded(max));
        }
        let start = self.out.reserve_i32();
        self.stack.push(Frame {
            kind,
            start,
            index: 0,
        });
        self.state = State::Name;
        Ok(())
    }

    fn pop(&mut self, operation: &'static str, kind: ContainerKind) -> Result<(), BsonError> {
        match self.stack.last() {
            Some(frame) if frame.kind == kind && self.state == State::Name => {}
            _ => return Err(self.invalid(operation)),
        }
        let Some(frame) = self.stack.pop() else {
            return Err(self.invalid(operation));
        };
        self.out.u8(0);
        let size = self.out.len() - frame.start;
        let max = self.settings.max_document_size();
        if size > max {
            return Err(BsonError::DocumentTooLarge { size, max });
        }
        let size = i32::try_from(size).map_err(|_| BsonError::DocumentTooLarge { size, max })?;
        self.out.patch_i32(frame.start, size);
        self.state = if self.stack.is_empty() {
            State::Done
        } else {
            State::Name
        };
        Ok(())
    }
}

impl BsonWriter for BsonBinaryWriter {
    fn settings(&self) -> &BsonWriterSettings {
        self.settings.base()
    }

    fn write_start_document(&mut self) -> Result<(), BsonError> {
        if self.state != State::Initial {
            self.begin_value("write_start_document", BsonType::Document)?;
        }
        self.push(ContainerKind::Document)
    }

    fn write_end_document(&mut self) -> Result<(), BsonError> {
        self.pop("write_end_document", ContainerKind::Document)
    }

    fn write_start_array(&mut self) -> Result<(), BsonError> {
        self.begin_value("write_start_array", BsonType::Array)?;
        self.push(ContainerKind::Array)
    }

    fn write_end_array(&mut self) -> Result<(), BsonError> {
        self.pop("write_end_array", ContainerKind::Array)
    }

    fn write_name(&mut self, name: &str) -> Result<(), BsonError> {
        match (self.state, self.stack.last()) {
            (State::Name, Some(frame)) if frame.kind == ContainerKind::Document => {
                if name.as_bytes().contains(&0) {
                    return Err(BufferError::InteriorNul.into());
                }
                self.name = Some(name.to_owned());
                self.state = State::Value;
                Ok(())
            }
            _ => Err(self.invalid("write_name")),
        }
    }

    fn write_double(&mut self, value: f64) -> Result<(), BsonError> {
        self.begin_value("write_double", BsonType::Double)?;
        self.out.f64(value);
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<(), BsonError> {
        self.begin_value("write_string", BsonType::String)?;
        self.out.length_prefixed_str(value)?;
        Ok(())
    }

    fn write_binary_data(&mut self, value: &BsonBinaryData) -> Result<(), BsonError> {
        self.begin_value("write_binary_data", BsonType::Binary)?;
        let bytes = value.bytes();
        let len = i32::try_from(bytes.len()).map_err(|_| BsonError::DocumentTooLarge {
            size: bytes.len(),
            max: self.settings.max_document_size(),
        })?;
        let mut subtype = value.subtype();
        if subtype == BinarySubtype::OldBinary && self.settings.fix_old_binary_subtype_on_output()
        {
            subtype = BinarySubtype::Binary;
        }
        if subtype == BinarySubtype::OldBinary {
            self.out.i32(old_binary_outer_length(len)?);
            self.out.u8(subtype.to_u8());
            self.out.i32(len);
        } else {
            self.out.i32(len);
            self.out.u8(subtype.to_u8());
        }
        self.out.buf(bytes);
        Ok(())
    }

    fn write_undefined(&mut self) -> Result<(), BsonError> {
        self.begin_value("write_undefined", BsonType::Undefined)
    }

    fn write_object_id(&mut self, value: ObjectId) -> Result<(), BsonError> {
        self.begin_value("write_object_id", BsonType::ObjectId)?;
        self.out.buf(&value.bytes());
        Ok(())
    }

    fn write_boolean(&mut self, value: bool) -> Result<(), BsonError> {
        self.begin_value("write_boolean", BsonType::Boolean)?;
        self.out.u8(u8::from(value));
        Ok(())
    }

    fn write_date_time(&mut self, millis: i64) -> Result<(), BsonError> {
        self.begin_value("write_date_time", BsonType::DateTime)?;
        self.out.i64(millis);
        Ok(())
    }

    fn write_null(&mut self) -> Result<(), BsonError> {
        self.begin_value("write_null", BsonType::Null)
    }

    fn write_regular_expression(
        &mut self,
        pattern: &str,
        options: &str,
    ) -> Result<(), BsonError> {
        self.begin_value("write_regular_expression", BsonType::RegularExpression)?;
        self.out.cstring(pattern)?;
        // Options are stored sorted.
        let mut options: Vec<char> = options.chars().collect();
        options.sort_unstable();
        self.out.cstring(&options.into_iter().collect::<String>())?;
        Ok(())
    }

    fn write_javascript(&mut self, code: &str) -> Result<(), BsonError> {
        self.begin_value("write_javascript", BsonType::JavaScript)?;
        self.out.length_prefixed_str(code)?;
        Ok(())
    }

    fn write_symbol(&mut self, value: &str) -> Result<(), BsonError> {
        self.begin_value("write_symbol", BsonType::Symbol)?;
        self.out.length_prefixed_str(value)?;
        Ok(())
    }

    fn write_int32(&mut self, value: i32) -> Result<(), BsonError> {
        self.begin_value("write_int32", BsonType::Int32)?;
        self.out.i32(value);
        Ok(())
    }

    fn write_timestamp(&mut self, value: BsonTimestamp) -> Result<(), BsonError> {
        self.begin_value("write_timestamp", BsonType::Timestamp)?;
        self.out.u64(value.to_u64());
        Ok(())
    }

    fn write_int64(&mut self, value: i64) -> Result<(), BsonError> {
        self.begin_value("write_int64", BsonType::Int64)?;
        self.out.i64(value);
        Ok(())
    }

    fn write_decimal128(&mut self, bytes: [u8; 16]) -> Result<(), BsonError> {
        self.begin_value("write_decimal128", BsonType::Decimal128)?;
        self.out.buf(&bytes);
        Ok(())
    }

    fn write_min_key(&mut self) -> Result<(), BsonError> {
        self.begin_value("write_min_key", BsonType::MinKey)
    }

    fn write_max_key(&mut self) -> Result<(), BsonError> {
        self.begin_value("write_max_key", BsonType::MaxKey)
    }
}
