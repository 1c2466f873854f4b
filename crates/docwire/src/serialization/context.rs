//! Per-call state handed to serializers.

use crate::error::BsonError;
use crate::io::{BsonReader, BsonWriter};

/// Options a context hook may change on a child serialization context.
#[derive(Debug, Clone, Default)]
pub struct SerializationContextBuilder {
    max_depth: Option<usize>,
}

impl SerializationContextBuilder {
    pub fn max_depth(&mut self, max_depth: Option<usize>) -> &mut Self {
        self.max_depth = max_depth;
        self
    }
}

/// A writer plus the nesting depth of the value being written.
pub struct SerializationContext<'w> {
    writer: &'w mut dyn BsonWriter,
    depth: usize,
    max_depth: Option<usize>,
}

impl<'w> SerializationContext<'w> {
    pub fn new(writer: &'w mut dyn BsonWriter) -> Self {
        Self {
            writer,
            depth: 0,
            max_depth: None,
        }
    }

    /// Creates a root context configured by `configure`.
    pub fn build(
        writer: &'w mut dyn BsonWriter,
        configure: impl FnOnce(&mut SerializationContextBuilder),
    ) -> Self {
        let mut builder = SerializationContextBuilder::default();
        configure(&mut builder);
        Self {
            writer,
            depth: 0,
            max_depth: builder.max_depth,
        }
    }

    pub fn writer(&mut self) -> &mut dyn BsonWriter {
        &mut *self.writer
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Derives a context one level deeper.
    ///
    /// The child starts with this context's options; `configure` may change
    /// them. Fails with [`BsonError::MaxDepthExceeded`] past the child's
    /// maximum depth.
    pub fn with(
        &mut self,
        configure: impl FnOnce(&mut SerializationContextBuilder),
    ) -> Result<SerializationContext<'_>, BsonError> {
        let mut builder = SerializationContextBuilder {
            max_depth: self.max_depth,
        };
        configure(&mut builder);
        let depth = self.depth + 1;
        if let Some(max) = builder.max_depth {
            if depth > max {
                return Err(BsonError::MaxDepthExceeded(max));
            }
        }
        Ok(SerializationContext {
            writer: &mut *self.writer,
            depth,
            max_depth: builder.max_depth,
        })
    }

    /// [`Self::with`] without changes.
    pub fn nested(&mut self) -> Result<SerializationContext<'_>, BsonError> {
        self.with(|_| {})
    }
}

/// Options a context hook may change on a child deserialization context.
#[derive(Debug, Clone, Default)]
pub struct DeserializationContextBuilder {
    max_depth: Option<usize>,
    allow_duplicate_element_names: bool,
}

impl DeserializationContextBuilder {
    pub fn max_depth(&mut self, max_depth: Option<usize>) -> &mut Self {
        self.max_depth = max_depth;
        self
    }

    pub fn allow_duplicate_element_names(&mut self, allow: bool) -> &mut Self {
        self.allow_duplicate_element_names = allow;
        self
    }
}

/// A reader plus the nesting depth of the value being read.
pub struct DeserializationContext<'r> {
    reader: &'r mut dyn BsonReader,
    depth: usize,
    max_depth: Option<usize>,
    allow_duplicate_element_names: bool,
}

impl<'r> DeserializationContext<'r> {
    pub fn new(reader: &'r mut dyn BsonReader) -> Self {
        Self {
            reader,
            depth: 0,
            max_depth: None,
            allow_duplicate_element_names: false,
        }
    }

    pub fn build(
        reader: &'r mut dyn BsonReader,
        configure: impl FnOnce(&mut DeserializationContextBuilder),
    ) -> Self {
        let mut builder = DeserializationContextBuilder::default();
        configure(&mut builder);
        Self {
            reader,
            depth: 0,
            max_depth: builder.max_depth,
            allow_duplicate_element_names: builder.allow_duplicate_element_names,
        }
    }

    pub fn reader(&mut self) -> &mut dyn BsonReader {
        &mut *self.reader
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn allow_duplicate_element_names(&self) -> bool {
        self.allow_duplicate_element_names
    }

    pub fn with(
        &mut self,
        configure: impl FnOnce(&mut DeserializationContextBuilder),
    ) -> Result<DeserializationContext<'_>, BsonError> {
        let mut builder = DeserializationContextBuilder {
            max_depth: self.max_depth,
            allow_duplicate_element_names: self.allow_duplicate_element_names,
        };
        configure(&mut builder);
        let depth = self.depth + 1;
        if let Some(max) = builder.max_depth {
            if depth > max {
                return Err(BsonError::MaxDepthExceeded(max));
            }
        }
        Ok(DeserializationContext {
            reader: &mut *self.reader,
            depth,
            max_depth: builder.max_depth,
            allow_duplicate_element_names: builder.allow_duplicate_element_names,
        })
    }

    pub fn nested(&mut self) -> Result<DeserializationContext<'_>, BsonError> {
        self.with(|_| {})
    }
}
