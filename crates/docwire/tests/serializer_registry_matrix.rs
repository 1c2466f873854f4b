//! Registry lookup, registration rules, provider order and concurrency.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use docwire::io::{BsonBinaryReader, BsonBinaryWriter, BsonReader, BsonWriter};
use docwire::serialization::serializers::{DictionaryRepresentation, Int32Serializer};
use docwire::serialization::{
    BsonSerializationProvider, BsonSerializer, CollectionSerializationProvider,
    DeserializationArgs, DeserializationContext, SerializationArgs, SerializationContext,
    SerializerOf, TypedSerializer,
};
use docwire::{BsonDocument, BsonError, BsonSerializerRegistry, BsonType, BsonValue, TypeKey};

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

/// `{ x, y }`
#[derive(Default)]
struct PointSerializer;

impl SerializerOf for PointSerializer {
    type Value = Point;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &Point,
    ) -> Result<(), BsonError> {
        let w = ctx.writer();
        w.write_start_document()?;
        w.write_name("x")?;
        w.write_int32(value.x)?;
        w.write_name("y")?;
        w.write_int32(value.y)?;
        w.write_end_document()
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<Point, BsonError> {
        let r = ctx.reader();
        r.read_start_document()?;
        let mut point = Point { x: 0, y: 0 };
        while r.read_bson_type()? != BsonType::EndOfDocument {
            match r.read_name()?.as_str() {
                "x" => point.x = r.read_int32()?,
                _ => point.y = r.read_int32()?,
            }
        }
        r.read_end_document()?;
        Ok(point)
    }
}

/// `[x, y]`
struct PointAsArraySerializer;

impl SerializerOf for PointAsArraySerializer {
    type Value = Point;

    fn serialize(
        &self,
        ctx: &mut SerializationContext<'_>,
        _args: &SerializationArgs,
        value: &Point,
    ) -> Result<(), BsonError> {
        let w = ctx.writer();
        w.write_start_array()?;
        w.write_int32(value.x)?;
        w.write_int32(value.y)?;
        w.write_end_array()
    }

    fn deserialize(
        &self,
        ctx: &mut DeserializationContext<'_>,
        _args: &DeserializationArgs,
    ) -> Result<Point, BsonError> {
        let r = ctx.reader();
        r.read_start_array()?;
        r.read_bson_type()?;
        let x = r.read_int32()?;
        r.read_bson_type()?;
        let y = r.read_int32()?;
        r.read_bson_type()?;
        r.read_end_array()?;
        Ok(Point { x, y })
    }
}

struct PointProvider {
    calls: AtomicUsize,
    as_array: bool,
}

impl PointProvider {
    fn new(as_array: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            as_array,
        }
    }
}

impl BsonSerializationProvider for PointProvider {
    fn get_serializer(&self, key: &TypeKey) -> Option<Arc<dyn BsonSerializer>> {
        if !key.is::<Point>() {
            return None;
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(if self.as_array {
            Arc::new(PointAsArraySerializer)
        } else {
            Arc::new(PointSerializer)
        })
    }
}

fn encode_field<T: std::any::Any + Send>(serializer: &TypedSerializer<T>, value: &T) -> Vec<u8> {
    let mut w = BsonBinaryWriter::with_default_settings();
    w.write_start_document().unwrap();
    w.write_name("v").unwrap();
    serializer
        .serialize(&mut SerializationContext::new(&mut w), value)
        .unwrap();
    w.write_end_document().unwrap();
    w.finish().unwrap()
}

fn decode_field<T: std::any::Any + Send>(serializer: &TypedSerializer<T>, bytes: &[u8]) -> T {
    let mut r = BsonBinaryReader::with_default_settings(bytes);
    r.read_start_document().unwrap();
    r.read_bson_type().unwrap();
    r.read_name().unwrap();
    let value = serializer
        .deserialize(&mut DeserializationContext::new(&mut r))
        .unwrap();
    assert_eq!(r.read_bson_type().unwrap(), BsonType::EndOfDocument);
    r.read_end_document().unwrap();
    value
}

fn as_document(bytes: &[u8]) -> BsonDocument {
    let registry = BsonSerializerRegistry::with_default_providers();
    let serializer = registry.lookup::<BsonDocument>().unwrap();
    let mut r = BsonBinaryReader::with_default_settings(bytes);
    serializer
        .deserialize(&mut DeserializationContext::new(&mut r))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[test]
fn registered_serializer_is_returned() {
    let registry = BsonSerializerRegistry::new();
    let serializer: Arc<dyn BsonSerializer> = Arc::new(PointSerializer);
    registry
        .register_serializer(TypeKey::of::<Point>(), Arc::clone(&serializer))
        .unwrap();
    let found = registry.get_serializer(&TypeKey::of::<Point>()).unwrap();
    assert!(Arc::ptr_eq(&found, &serializer));
}

#[test]
fn second_registration_fails() {
    let registry = BsonSerializerRegistry::new();
    registry
        .register_serializer(TypeKey::of::<Point>(), Arc::new(PointSerializer))
        .unwrap();
    assert!(matches!(
        registry.register_serializer(TypeKey::of::<Point>(), Arc::new(PointSerializer)),
        Err(BsonError::AlreadyRegistered(_))
    ));
}

#[test]
fn value_model_types_are_reserved() {
    let registry = BsonSerializerRegistry::new();
    let err = registry
        .register_serializer(
            TypeKey::of::<BsonDocument>(),
            Arc::new(docwire::serialization::serializers::BsonDocumentSerializer),
        )
        .unwrap_err();
    assert!(matches!(err, BsonError::ReservedType(_)));
    assert!(matches!(
        registry.try_register_serializer(
            TypeKey::of::<BsonValue>(),
            Arc::new(docwire::serialization::serializers::BsonValueSerializer),
        ),
        Err(BsonError::ReservedType(_))
    ));
}

#[test]
fn try_register_outcomes() {
    let registry = BsonSerializerRegistry::new();
    let first: Arc<dyn BsonSerializer> = Arc::new(PointSerializer);
    assert_eq!(
        registry.try_register_serializer(TypeKey::of::<Point>(), Arc::clone(&first)),
        Ok(true)
    );
    assert_eq!(
        registry.try_register_serializer(TypeKey::of::<Point>(), first),
        Ok(false)
    );
    assert_eq!(
        registry.try_register_serializer(TypeKey::of::<Point>(), Arc::new(PointSerializer)),
        Ok(false)
    );
    assert!(matches!(
        registry.try_register_serializer(TypeKey::of::<Point>(), Arc::new(PointAsArraySerializer)),
        Err(BsonError::ConflictingRegistration(_))
    ));
}

#[test]
fn registration_key_must_match_value_type() {
    let registry = BsonSerializerRegistry::new();
    assert!(matches!(
        registry.register_serializer(TypeKey::of::<Point>(), Arc::new(Int32Serializer)),
        Err(BsonError::TypeMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[test]
fn unknown_type_is_not_found() {
    let registry = BsonSerializerRegistry::with_default_providers();
    assert!(matches!(
        registry.get_serializer(&TypeKey::of::<Point>()),
        Err(BsonError::NoSerializerFound(_))
    ));
}

#[test]
fn open_generic_keys_are_rejected() {
    let registry = BsonSerializerRegistry::with_default_providers();
    let open = TypeKey::generic("Vec", vec![TypeKey::parameter("T")]);
    assert!(matches!(
        registry.get_serializer(&open),
        Err(BsonError::InvalidShape(_))
    ));
    assert!(matches!(
        registry.get_serializer(&TypeKey::generic("Vec", vec![])),
        Err(BsonError::InvalidShape(_))
    ));
    assert!(matches!(
        registry.register_serializer(open, Arc::new(PointSerializer)),
        Err(BsonError::InvalidShape(_))
    ));
}

#[test]
fn last_registered_provider_wins() {
    let registry = BsonSerializerRegistry::new();
    let doc = Arc::new(PointProvider::new(false));
    let arr = Arc::new(PointProvider::new(true));
    registry.register_serialization_provider(doc.clone());
    registry.register_serialization_provider(arr.clone());

    let serializer = registry.lookup::<Point>().unwrap();
    assert!(serializer
        .inner()
        .as_any()
        .downcast_ref::<PointAsArraySerializer>()
        .is_some());
    assert_eq!(doc.calls.load(Ordering::SeqCst), 0);
    assert_eq!(arr.calls.load(Ordering::SeqCst), 1);

    registry.lookup::<Point>().unwrap();
    assert_eq!(arr.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn explicit_registration_beats_providers() {
    let registry = BsonSerializerRegistry::new();
    let provider = Arc::new(PointProvider::new(true));
    registry.register_serialization_provider(provider.clone());
    registry
        .register_serializer(TypeKey::of::<Point>(), Arc::new(PointSerializer))
        .unwrap();
    let serializer = registry.lookup::<Point>().unwrap();
    let bytes = encode_field(&serializer, &Point { x: 1, y: 2 });
    assert_eq!(
        as_document(&bytes).get("v").and_then(BsonValue::as_document).map(|d| d.len()),
        Some(2)
    );
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn concurrent_first_lookups_agree() {
    let registry = BsonSerializerRegistry::new();
    registry.register_serialization_provider(Arc::new(PointProvider::new(false)));
    let found: Vec<Arc<dyn BsonSerializer>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| registry.get_serializer(&TypeKey::of::<Point>()).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for serializer in &found[1..] {
        assert!(Arc::ptr_eq(serializer, &found[0]));
    }
    let cached = registry.get_serializer(&TypeKey::of::<Point>()).unwrap();
    assert!(Arc::ptr_eq(&cached, &found[0]));
}

// ---------------------------------------------------------------------------
// Registry-aware collection provider
// ---------------------------------------------------------------------------

fn collection_registry(representation: DictionaryRepresentation) -> BsonSerializerRegistry {
    let registry = BsonSerializerRegistry::with_default_providers();
    registry
        .register_serializer(TypeKey::of::<Point>(), Arc::new(PointSerializer))
        .unwrap();
    registry.register_serialization_provider(Arc::new(
        CollectionSerializationProvider::new()
            .with_vec_of::<Point>()
            .with_vec_of::<Vec<i32>>()
            .with_vec_of::<i32>()
            .with_map_of::<i64>(representation),
    ));
    registry
}

#[test]
fn vec_elements_resolve_through_the_registry() {
    let registry = collection_registry(DictionaryRepresentation::Document);
    let serializer = registry.lookup::<Vec<Point>>().unwrap();
    let points = vec![Point { x: 1, y: 2 }, Point { x: -3, y: 4 }];
    let bytes = encode_field(&serializer, &points);
    assert_eq!(decode_field(&serializer, &bytes), points);

    let nested = registry.lookup::<Vec<Vec<i32>>>().unwrap();
    let value = vec![vec![1, 2], vec![], vec![3]];
    assert_eq!(decode_field(&nested, &encode_field(&nested, &value)), value);
}

#[test]
fn vec_of_unknown_element_is_not_found() {
    let registry = BsonSerializerRegistry::with_default_providers();
    registry.register_serialization_provider(Arc::new(
        CollectionSerializationProvider::new().with_vec_of::<std::time::Duration>(),
    ));
    assert!(matches!(
        registry.lookup::<Vec<std::time::Duration>>(),
        Err(BsonError::NoSerializerFound(_))
    ));
}

#[test]
fn maps_in_every_representation() {
    let map: BTreeMap<String, i64> = [("a".to_owned(), 1), ("b".to_owned(), -2)].into();
    for representation in [
        DictionaryRepresentation::Document,
        DictionaryRepresentation::ArrayOfArrays,
        DictionaryRepresentation::ArrayOfDocuments,
    ] {
        let registry = collection_registry(representation);
        let serializer = registry.lookup::<BTreeMap<String, i64>>().unwrap();
        let bytes = encode_field(&serializer, &map);
        assert_eq!(decode_field(&serializer, &bytes), map, "{representation:?}");

        let wire = as_document(&bytes);
        let expected_type = match representation {
            DictionaryRepresentation::Document => BsonType::Document,
            _ => BsonType::Array,
        };
        assert_eq!(wire.get("v").map(BsonValue::bson_type), Some(expected_type));
    }
}

#[test]
fn array_of_documents_uses_k_and_v() {
    let registry = collection_registry(DictionaryRepresentation::ArrayOfDocuments);
    let serializer = registry.lookup::<BTreeMap<String, i64>>().unwrap();
    let map: BTreeMap<String, i64> = [("key".to_owned(), 9)].into();
    let wire = as_document(&encode_field(&serializer, &map));
    let entry = wire.get("v").and_then(BsonValue::as_array).unwrap()[0].clone();
    let entry = entry.as_document().unwrap();
    assert_eq!(entry.get("k"), Some(&BsonValue::from("key")));
    assert_eq!(entry.get("v"), Some(&BsonValue::Int64(9)));
}
