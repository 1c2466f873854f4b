//! Container serializers that delegate elements to registry serializers.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BsonError;
use crate::serialization::context::{DeserializationContext, SerializationContext};
use crate::serialization::serializer::{
    BsonSerializer, DeserializationArgs, SerializationArgs, SerializerOf, TypedSerializer,
};
use crate::serialization::type_key::TypeKey;
use crate::types::BsonType;

use super::expect_wire_type;

/// `Vec<T>` as a wire array.
pub struct VecSerializer<T> {
    element: TypedSerializer<T>,
}

impl<T: Any + Send> VecSerializer<T> {
    pub fn new(element: TypedSerializer<T>) -> Self {
        Self { element }
    }

    pub fn element_serializer(&self) -> &TypedSerializer<T> {
        &self.element
    }
}

impl<T: Any + Send> SerializerOf for VecSerializer<T> {
    type Value = Vec<T>;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &Vec<T>,
    ) -> Result<(), BsonError> {
        let mut ctx = ctx.nested()?;
        ctx.writer().write_start_array()?;
        for item in value {
            self.element.serialize(&mut ctx, item)?;
        }
        ctx.writer().write_end_array()
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<Vec<T>, BsonError> {
        expect_wire_type(ctx, std::any::type_name::<Vec<T>>(), BsonType::Array)?;
        let mut ctx = ctx.nested()?;
        ctx.reader().read_start_array()?;
        let mut items = Vec::new();
        while ctx.reader().read_bson_type()? != BsonType::EndOfDocument {
            items.push(self.element.deserialize(&mut ctx)?);
        }
        ctx.reader().read_end_array()?;
        Ok(items)
    }

    fn same_configuration(&self, other: &Self) -> bool {
        Arc::ptr_eq(self.element.inner(), other.element.inner())
    }
}

/// Wire layout of a string-keyed map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DictionaryRepresentation {
    /// `{ key: value, ... }`
    #[default]
    Document,
    /// `[[key, value], ...]`
    ArrayOfArrays,
    /// `[{ k: key, v: value }, ...]`
    ArrayOfDocuments,
}

/// Introspection for map serializers.
pub trait DictionarySerializer {
    fn dictionary_representation(&self) -> DictionaryRepresentation;
    fn key_type(&self) -> TypeKey;
    fn value_serializer(&self) -> &Arc<dyn BsonSerializer>;
}

/// `BTreeMap<String, V>` in a configurable [`DictionaryRepresentation`].
///
/// Deserialization accepts every representation whatever the configured one.
pub struct BTreeMapSerializer<V> {
    value: TypedSerializer<V>,
    representation: DictionaryRepresentation,
}

impl<V: Any + Send> BTreeMapSerializer<V> {
    pub fn new(value: TypedSerializer<V>, representation: DictionaryRepresentation) -> Self {
        Self {
            value,
            representation,
        }
    }

    fn read_entry_array(
        &self,
        ctx: &mut DeserializationContext<'_>,
    ) -> Result<(String, V), BsonError> {
        let mut ctx = ctx.nested()?;
        ctx.reader().read_start_array()?;
        if ctx.reader().read_bson_type()? != BsonType::String {
            return Err(BsonError::InvalidShape(
                "dictionary entry array must start with a string key".into(),
            ));
        }
        let key = ctx.reader().read_string()?;
        if ctx.reader().read_bson_type()? == BsonType::EndOfDocument {
            return Err(BsonError::InvalidShape(format!(
                "dictionary entry '{key}' has no value"
            )));
        }
        let value = self.value.deserialize(&mut ctx)?;
        if ctx.reader().read_bson_type()? != BsonType::EndOfDocument {
            return Err(BsonError::InvalidShape(format!(
                "dictionary entry '{key}' has more than two elements"
            )));
        }
        ctx.reader().read_end_array()?;
        Ok((key, value))
    }

    fn read_entry_document(
        &self,
        ctx: &mut DeserializationContext<'_>,
    ) -> Result<(String, V), BsonError> {
        let mut ctx = ctx.nested()?;
        ctx.reader().read_start_document()?;
        let mut key = None;
        let mut value = None;
        while ctx.reader().read_bson_type()? != BsonType::EndOfDocument {
            match ctx.reader().read_name()?.as_str() {
                "k" => {
                    expect_wire_type(&mut ctx, "dictionary key", BsonType::String)?;
                    key = Some(ctx.reader().read_string()?);
                }
                "v" => value = Some(self.value.deserialize(&mut ctx)?),
                other => {
                    return Err(BsonError::InvalidShape(format!(
                        "unexpected element '{other}' in dictionary entry"
                    )))
                }
            }
        }
        ctx.reader().read_end_document()?;
        match (key, value) {
            (Some(k), Some(v)) => Ok((k, v)),
            _ => Err(BsonError::InvalidShape(
                "dictionary entry document needs both 'k' and 'v'".into(),
            )),
        }
    }
}

impl<V: Any + Send> SerializerOf for BTreeMapSerializer<V> {
    type Value = BTreeMap<String, V>;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &BTreeMap<String, V>,
    ) -> Result<(), BsonError> {
        let mut ctx = ctx.nested()?;
        match self.representation {
            DictionaryRepresentation::Document => {
                ctx.writer().write_start_document()?;
                for (k, v) in value {
                    ctx.writer().write_name(k)?;
                    self.value.serialize(&mut ctx, v)?;
                }
                ctx.writer().write_end_document()
            }
            DictionaryRepresentation::ArrayOfArrays => {
                ctx.writer().write_start_array()?;
                for (k, v) in value {
                    let mut entry = ctx.nested()?;
                    entry.writer().write_start_array()?;
                    entry.writer().write_string(k)?;
                    self.value.serialize(&mut entry, v)?;
                    entry.writer().write_end_array()?;
                }
                ctx.writer().write_end_array()
            }
            DictionaryRepresentation::ArrayOfDocuments => {
                ctx.writer().write_start_array()?;
                for (k, v) in value {
                    let mut entry = ctx.nested()?;
                    entry.writer().write_start_document()?;
                    entry.writer().write_name("k")?;
                    entry.writer().write_string(k)?;
                    entry.writer().write_name("v")?;
                    self.value.serialize(&mut entry, v)?;
                    entry.writer().write_end_document()?;
                }
                ctx.writer().write_end_array()
            }
        }
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<BTreeMap<String, V>, BsonError> {
        let mut map = BTreeMap::new();
        match ctx.reader().current_bson_type() {
            Some(BsonType::Document) => {
                let mut ctx = ctx.nested()?;
                ctx.reader().read_start_document()?;
                while ctx.reader().read_bson_type()? != BsonType::EndOfDocument {
                    let key = ctx.reader().read_name()?;
                    let value = self.value.deserialize(&mut ctx)?;
                    map.insert(key, value);
                }
                ctx.reader().read_end_document()?;
            }
            Some(BsonType::Array) => {
                let mut ctx = ctx.nested()?;
                ctx.reader().read_start_array()?;
                loop {
                    let (key, value) = match ctx.reader().read_bson_type()? {
                        BsonType::EndOfDocument => break,
                        BsonType::Array => self.read_entry_array(&mut ctx)?,
                        BsonType::Document => self.read_entry_document(&mut ctx)?,
                        found => {
                            return Err(BsonError::UnexpectedWireType {
                                target: "dictionary entry".into(),
                                found,
                            })
                        }
                    };
                    map.insert(key, value);
                }
                ctx.reader().read_end_array()?;
            }
            _ => {
                let target = std::any::type_name::<BTreeMap<String, V>>();
                expect_wire_type(ctx, target, BsonType::Document)?;
            }
        }
        Ok(map)
    }

    fn same_configuration(&self, other: &Self) -> bool {
        self.representation == other.representation
            && Arc::ptr_eq(self.value.inner(), other.value.inner())
    }
}

impl<V: Any + Send> DictionarySerializer for BTreeMapSerializer<V> {
    fn dictionary_representation(&self) -> DictionaryRepresentation {
        self.representation
    }

    fn key_type(&self) -> TypeKey {
        TypeKey::of::<String>()
    }

    fn value_serializer(&self) -> &Arc<dyn BsonSerializer> {
        self.value.inner()
    }
}
