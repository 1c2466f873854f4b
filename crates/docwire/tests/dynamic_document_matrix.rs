//! Dynamic document codec: null handling, member round-trips and hooks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use docwire::io::{BsonBinaryReader, BsonBinaryWriter, BsonReader, BsonWriter};
use docwire::serialization::serializers::{
    DynamicContextHooks, DynamicDocument, DynamicDocumentSerializer, ExpandoDocument,
};
use docwire::serialization::{
    DeserializationArgs, DeserializationContext, DeserializationContextBuilder,
    SerializationArgs, SerializationContext, SerializationContextBuilder, SerializerOf,
};
use docwire::{BsonDocument, BsonError, BsonSerializerRegistry, BsonType, BsonValue};

fn write_field<S: SerializerOf>(serializer: &S, value: &S::Value) -> Result<Vec<u8>, BsonError> {
    let mut w = BsonBinaryWriter::with_default_settings();
    w.write_start_document()?;
    w.write_name("d")?;
    serializer.serialize(
        &mut SerializationContext::new(&mut w),
        &SerializationArgs::default(),
        value,
    )?;
    w.write_end_document()?;
    w.finish()
}

fn read_field<S: SerializerOf>(serializer: &S, bytes: &[u8]) -> Result<S::Value, BsonError> {
    let mut r = BsonBinaryReader::with_default_settings(bytes);
    r.read_start_document()?;
    r.read_bson_type()?;
    r.read_name()?;
    serializer.deserialize(
        &mut DeserializationContext::new(&mut r),
        &DeserializationArgs::default(),
    )
}

fn field_bytes(value: BsonValue) -> Vec<u8> {
    let mut doc = BsonDocument::new();
    doc.push("d", value);
    let registry = BsonSerializerRegistry::with_default_providers();
    docwire::serialization::to_vec(
        &registry,
        &Arc::new(docwire::io::BsonBinaryWriterSettings::new()),
        &doc,
    )
    .unwrap()
}

/// Hides members whose name starts with `_`.
#[derive(Default, Debug, PartialEq)]
struct Record {
    fields: Vec<(String, BsonValue)>,
}

impl DynamicDocument for Record {
    fn member_names(&self) -> Vec<String> {
        self.fields.iter().map(|(k, _)| k.clone()).collect()
    }

    fn try_get_member(&self, name: &str) -> Option<BsonValue> {
        if name.starts_with('_') {
            return None;
        }
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_member(&mut self, name: String, value: BsonValue) {
        self.fields.push((name, value));
    }
}

#[derive(Default)]
struct CountingHooks {
    serialize: AtomicUsize,
    deserialize: AtomicUsize,
}

impl DynamicContextHooks for CountingHooks {
    fn configure_serialization_context(&self, builder: &mut SerializationContextBuilder) {
        self.serialize.fetch_add(1, Ordering::SeqCst);
        builder.max_depth(Some(2));
    }

    fn configure_deserialization_context(&self, builder: &mut DeserializationContextBuilder) {
        self.deserialize.fetch_add(1, Ordering::SeqCst);
        builder.allow_duplicate_element_names(true);
    }
}

#[test]
fn null_roundtrips_as_none() {
    let registry = BsonSerializerRegistry::with_default_providers();
    let serializer = DynamicDocumentSerializer::<ExpandoDocument>::new(&registry).unwrap();
    let bytes = write_field(&serializer, &None).unwrap();
    assert_eq!(bytes, field_bytes(BsonValue::Null));
    assert_eq!(read_field(&serializer, &bytes).unwrap(), None);
}

#[test]
fn skipped_members_are_not_written() {
    let registry = BsonSerializerRegistry::with_default_providers();
    let serializer = DynamicDocumentSerializer::<Record>::new(&registry).unwrap();
    let record = Record {
        fields: vec![
            ("name".into(), BsonValue::from("ada")),
            ("_secret".into(), BsonValue::Int32(1)),
            ("tags".into(), BsonValue::Array(vec![BsonValue::from("x")])),
        ],
    };
    let bytes = write_field(&serializer, &Some(record)).unwrap();
    let back = read_field(&serializer, &bytes).unwrap().unwrap();
    assert_eq!(
        back.member_names(),
        vec!["name".to_owned(), "tags".to_owned()]
    );
    assert_eq!(back.try_get_member("name"), Some(BsonValue::from("ada")));
}

#[test]
fn other_wire_types_are_rejected() {
    let registry = BsonSerializerRegistry::with_default_providers();
    let serializer = DynamicDocumentSerializer::<ExpandoDocument>::new(&registry).unwrap();
    let bytes = field_bytes(BsonValue::Int32(5));
    let err = read_field(&serializer, &bytes).unwrap_err();
    assert!(matches!(
        err,
        BsonError::UnexpectedWireType {
            found: BsonType::Int32,
            ..
        }
    ));
}

#[test]
fn hooks_configure_each_member_context() {
    let registry = BsonSerializerRegistry::with_default_providers();
    let serializer =
        DynamicDocumentSerializer::<ExpandoDocument, _>::with_hooks(&registry, CountingHooks::default())
            .unwrap();
    let doc: ExpandoDocument = [("a", BsonValue::Int32(1)), ("b", BsonValue::Boolean(true))]
        .into_iter()
        .collect();
    let bytes = write_field(&serializer, &Some(doc.clone())).unwrap();
    assert_eq!(serializer.hooks().serialize.load(Ordering::SeqCst), 2);

    assert_eq!(read_field(&serializer, &bytes).unwrap(), Some(doc));
    assert_eq!(serializer.hooks().deserialize.load(Ordering::SeqCst), 2);
}

#[test]
fn hook_depth_limit_applies_to_member_values() {
    let registry = BsonSerializerRegistry::with_default_providers();
    let serializer =
        DynamicDocumentSerializer::<ExpandoDocument, _>::with_hooks(&registry, CountingHooks::default())
            .unwrap();

    let mut deep = BsonValue::Int32(0);
    for _ in 0..3 {
        deep = BsonValue::Array(vec![deep]);
    }
    let mut doc = ExpandoDocument::new();
    doc.insert("deep", deep);
    assert_eq!(
        write_field(&serializer, &Some(doc)).err(),
        Some(BsonError::MaxDepthExceeded(2))
    );
}

#[test]
fn hook_allows_duplicate_names_in_member_documents() {
    let mut inner = BsonDocument::new();
    inner.push("x", 1);
    inner.push("x", 2);
    let bytes = field_bytes(BsonValue::Document(
        [("sub", BsonValue::Document(inner))].into_iter().collect(),
    ));

    let registry = BsonSerializerRegistry::with_default_providers();
    let strict = DynamicDocumentSerializer::<ExpandoDocument>::new(&registry).unwrap();
    assert!(read_field(&strict, &bytes).is_err());

    let relaxed =
        DynamicDocumentSerializer::<ExpandoDocument, _>::with_hooks(&registry, CountingHooks::default())
            .unwrap();
    let doc = read_field(&relaxed, &bytes).unwrap().unwrap();
    assert_eq!(doc.get("sub").and_then(BsonValue::as_document).map(BsonDocument::len), Some(2));
}

#[test]
fn null_member_is_kept() {
    let registry = BsonSerializerRegistry::with_default_providers();
    let plain = DynamicDocumentSerializer::<ExpandoDocument>::new(&registry).unwrap();
    let hooked =
        DynamicDocumentSerializer::<ExpandoDocument, _>::with_hooks(&registry, CountingHooks::default())
            .unwrap();
    let doc: ExpandoDocument = [("a", BsonValue::Int32(1)), ("b", BsonValue::Null)]
        .into_iter()
        .collect();
    let expected = field_bytes(BsonValue::Document(
        [("a", BsonValue::Int32(1)), ("b", BsonValue::Null)]
            .into_iter()
            .collect(),
    ));

    for bytes in [
        write_field(&plain, &Some(doc.clone())).unwrap(),
        write_field(&hooked, &Some(doc.clone())).unwrap(),
    ] {
        assert_eq!(bytes, expected);
        let back = read_field(&hooked, &bytes).unwrap().unwrap();
        assert_eq!(back.get("b"), Some(&BsonValue::Null));
        assert_eq!(back.member_names(), vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(read_field(&plain, &bytes).unwrap(), Some(doc.clone()));
    }
    assert_eq!(hooked.hooks().serialize.load(Ordering::SeqCst), 2);
}
