//! Documents whose members are only known at run time.

use std::any::type_name;
use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::error::BsonError;
use crate::serialization::context::{
    DeserializationContext, DeserializationContextBuilder, SerializationContext,
    SerializationContextBuilder,
};
use crate::serialization::registry::BsonSerializerRegistry;
use crate::serialization::serializer::{
    DeserializationArgs, SerializationArgs, SerializerOf, TypedSerializer,
};
use crate::types::BsonType;
use crate::value::BsonValue;

/// A target with named members that can be enumerated, read and set.
///
/// `Default` creates the empty target a deserialized document is read into.
pub trait DynamicDocument: Default + Send + 'static {
    fn member_names(&self) -> Vec<String>;

    /// `None` skips the member on output.
    fn try_get_member(&self, name: &str) -> Option<BsonValue>;

    fn set_member(&mut self, name: String, value: BsonValue);
}

/// Adjusts the child context each member value is written or read through.
pub trait DynamicContextHooks: Send + Sync + 'static {
    fn configure_serialization_context(&self, _builder: &mut SerializationContextBuilder) {}

    fn configure_deserialization_context(&self, _builder: &mut DeserializationContextBuilder) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoContextHooks;

impl DynamicContextHooks for NoContextHooks {}

/// Serializes `Option<D>`: `None` as Null, otherwise a document of members.
pub struct DynamicDocumentSerializer<D, H = NoContextHooks> {
    value_serializer: TypedSerializer<BsonValue>,
    hooks: H,
    _marker: PhantomData<fn() -> D>,
}

impl<D: DynamicDocument> DynamicDocumentSerializer<D> {
    pub fn new(registry: &BsonSerializerRegistry) -> Result<Self, BsonError> {
        Self::with_hooks(registry, NoContextHooks)
    }
}

impl<D: DynamicDocument, H: DynamicContextHooks> DynamicDocumentSerializer<D, H> {
    /// Resolves the member value serializer from `registry`.
    pub fn with_hooks(registry: &BsonSerializerRegistry, hooks: H) -> Result<Self, BsonError> {
        Ok(Self {
            value_serializer: registry.lookup::<BsonValue>()?,
            hooks,
            _marker: PhantomData,
        })
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }
}

impl<D: DynamicDocument, H: DynamicContextHooks> SerializerOf for DynamicDocumentSerializer<D, H> {
    type Value = Option<D>;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &Option<D>,
    ) -> Result<(), BsonError> {
        let Some(document) = value else {
            return ctx.writer().write_null();
        };
        ctx.writer().write_start_document()?;
        for name in document.member_names() {
            let Some(member) = document.try_get_member(&name) else {
                continue;
            };
            ctx.writer().write_name(&name)?;
            let mut child = ctx.with(|b| self.hooks.configure_serialization_context(b))?;
            self.value_serializer.serialize(&mut child, &member)?;
        }
        ctx.writer().write_end_document()
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<Option<D>, BsonError> {
        match ctx.reader().current_bson_type() {
            Some(BsonType::Null) => {
                ctx.reader().read_null()?;
                Ok(None)
            }
            Some(BsonType::Document) => {
                let mut document = D::default();
                ctx.reader().read_start_document()?;
                while ctx.reader().read_bson_type()? != BsonType::EndOfDocument {
                    let name = ctx.reader().read_name()?;
                    let mut child =
                        ctx.with(|b| self.hooks.configure_deserialization_context(b))?;
                    let value = self.value_serializer.deserialize(&mut child)?;
                    document.set_member(name, value);
                }
                ctx.reader().read_end_document()?;
                Ok(Some(document))
            }
            Some(found) => Err(BsonError::UnexpectedWireType {
                target: type_name::<D>().to_owned(),
                found,
            }),
            None => Err(BsonError::InvalidState {
                operation: "deserialize",
                state: "no current type",
            }),
        }
    }
}

/// Insertion-ordered bag of members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandoDocument {
    members: IndexMap<String, BsonValue>,
}

impl ExpandoDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&BsonValue> {
        self.members.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<BsonValue>) -> Option<BsonValue> {
        self.members.insert(name.into(), value.into())
    }

    /// Removes `name` and keeps the order of the remaining members.
    pub fn remove(&mut self, name: &str) -> Option<BsonValue> {
        self.members.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BsonValue)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl DynamicDocument for ExpandoDocument {
    fn member_names(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }

    fn try_get_member(&self, name: &str) -> Option<BsonValue> {
        self.members.get(name).cloned()
    }

    fn set_member(&mut self, name: String, value: BsonValue) {
        self.members.insert(name, value);
    }
}

impl<K: Into<String>, V: Into<BsonValue>> FromIterator<(K, V)> for ExpandoDocument {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            members: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
