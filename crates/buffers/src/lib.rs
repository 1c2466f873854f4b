//! Little-endian binary buffer utilities for docwire.
//!
//! BSON stores every integer and float little-endian and every name as a
//! NUL-terminated C string, so the [`Reader`] and [`Writer`] here speak
//! exactly that dialect. All reads are bounds-checked and report
//! [`BufferError`] instead of panicking.
//!
//! # Example
//!
//! ```
//! use docwire_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.i32(-2);
//! writer.cstring("hello").unwrap();
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! assert_eq!(reader.i32().unwrap(), -2);
//! assert_eq!(reader.cstring().unwrap(), "hello");
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer { needed: usize, remaining: usize },
    /// Invalid UTF-8 sequence.
    InvalidUtf8,
    /// A C string was not terminated before the end of the buffer.
    UnterminatedCString,
    /// A C string to be written contains an interior NUL byte.
    InteriorNul,
    /// A length does not fit the 32-bit size field of the format.
    Overflow(usize),
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer { needed, remaining } => write!(
                f,
                "end of buffer: needed {needed} bytes, {remaining} remaining"
            ),
            BufferError::InvalidUtf8 => write!(f, "invalid UTF-8 sequence"),
            BufferError::UnterminatedCString => write!(f, "unterminated C string"),
            BufferError::InteriorNul => write!(f, "C string contains an interior NUL byte"),
            BufferError::Overflow(len) => write!(f, "length {len} overflows a 32-bit size field"),
        }
    }
}

impl std::error::Error for BufferError {}
