//! Auto-growing little-endian writer.

use crate::BufferError;

/// A binary buffer writer backed by a growable `Vec<u8>`.
///
/// Length-prefixed structures are written by reserving a 32-bit slot with
/// [`Writer::reserve_i32`] and filling it later with [`Writer::patch_i32`].
#[derive(Debug, Default, Clone)]
pub struct Writer {
    /// The bytes written so far.
    pub uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    /// Returns `true` when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    /// Writes a signed 32-bit integer (little-endian).
    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a signed 64-bit integer (little-endian).
    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a 64-bit floating point number (little-endian).
    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes raw bytes.
    pub fn buf(&mut self, bytes: &[u8]) {
        self.uint8.extend_from_slice(bytes);
    }

    /// Writes UTF-8 bytes without a terminator.
    pub fn utf8(&mut self, s: &str) {
        self.uint8.extend_from_slice(s.as_bytes());
    }

    /// Writes a NUL-terminated string.
    pub fn cstring(&mut self, s: &str) -> Result<(), BufferError> {
        if s.as_bytes().contains(&0) {
            return Err(BufferError::InteriorNul);
        }
        self.utf8(s);
        self.u8(0);
        Ok(())
    }

    /// Writes a 32-bit length prefix, the UTF-8 bytes and a NUL terminator.
    pub fn length_prefixed_str(&mut self, s: &str) -> Result<(), BufferError> {
        let len = i32::try_from(s.len() + 1).map_err(|_| BufferError::Overflow(s.len()))?;
        self.i32(len);
        self.utf8(s);
        self.u8(0);
        Ok(())
    }

    /// Reserves a 32-bit slot and returns its position.
    pub fn reserve_i32(&mut self) -> usize {
        let pos = self.uint8.len();
        self.i32(0);
        pos
    }

    /// Overwrites a previously reserved 32-bit slot.
    pub fn patch_i32(&mut self, pos: usize, val: i32) {
        self.uint8[pos..pos + 4].copy_from_slice(&val.to_le_bytes());
    }

    /// Takes the written bytes, leaving the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }
}
