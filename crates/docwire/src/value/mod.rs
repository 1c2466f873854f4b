//! The typed value model.
//!
//! [`BsonValue`] is a closed union over the wire types. Every variant owns its
//! payload; there is no shared mutable state inside a value. Values are
//! totally ordered across variants (see [`compare`]), and equality and
//! hashing agree with that order.

pub mod binary;
pub mod compare;
pub mod document;
pub mod object_id;

use std::any::TypeId;
use std::fmt;

pub use binary::BsonBinaryData;
pub use document::BsonDocument;
pub use object_id::ObjectId;

use crate::serialization::TypeKey;
use crate::types::BsonType;

/// Array payload.
pub type BsonArray = Vec<BsonValue>;

/// Unit marker for the null value, used where a serializer needs a concrete
/// Rust type for wire null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BsonNull;

/// Replication timestamp: seconds plus an ordinal within the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BsonTimestamp {
    pub time: u32,
    pub increment: u32,
}

impl BsonTimestamp {
    pub fn new(time: u32, increment: u32) -> Self {
        Self { time, increment }
    }

    /// Packed 64-bit wire form: time in the high half.
    pub fn to_u64(self) -> u64 {
        (u64::from(self.time) << 32) | u64::from(self.increment)
    }

    pub fn from_u64(value: u64) -> Self {
        Self {
            time: (value >> 32) as u32,
            increment: value as u32,
        }
    }
}

/// Any value that can appear in a document.
#[derive(Debug, Clone)]
pub enum BsonValue {
    Double(f64),
    String(String),
    Document(BsonDocument),
    Array(BsonArray),
    Binary(BsonBinaryData),
    Undefined,
    ObjectId(ObjectId),
    Boolean(bool),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    Null,
    RegularExpression { pattern: String, options: String },
    JavaScript(String),
    Symbol(String),
    Int32(i32),
    Timestamp(BsonTimestamp),
    Int64(i64),
    /// IEEE 754-2008 decimal, kept as its 16 little-endian wire bytes.
    Decimal128([u8; 16]),
    MinKey,
    MaxKey,
}

impl BsonValue {
    pub fn bson_type(&self) -> BsonType {
        match self {
            Self::Double(_) => BsonType::Double,
            Self::String(_) => BsonType::String,
            Self::Document(_) => BsonType::Document,
            Self::Array(_) => BsonType::Array,
            Self::Binary(_) => BsonType::Binary,
            Self::Undefined => BsonType::Undefined,
            Self::ObjectId(_) => BsonType::ObjectId,
            Self::Boolean(_) => BsonType::Boolean,
            Self::DateTime(_) => BsonType::DateTime,
            Self::Null => BsonType::Null,
            Self::RegularExpression { .. } => BsonType::RegularExpression,
            Self::JavaScript(_) => BsonType::JavaScript,
            Self::Symbol(_) => BsonType::Symbol,
            Self::Int32(_) => BsonType::Int32,
            Self::Timestamp(_) => BsonType::Timestamp,
            Self::Int64(_) => BsonType::Int64,
            Self::Decimal128(_) => BsonType::Decimal128,
            Self::MinKey => BsonType::MinKey,
            Self::MaxKey => BsonType::MaxKey,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&BsonDocument> {
        match self {
            Self::Document(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&BsonArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&BsonBinaryData> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Self::ObjectId(id) => Some(*id),
            _ => None,
        }
    }
}

/// `true` when `key` names one of the value-model types, which only the
/// built-in providers may serialize.
pub fn is_value_model_type(key: &TypeKey) -> bool {
    let TypeKey::Concrete { id, .. } = key else {
        return false;
    };
    [
        TypeId::of::<BsonValue>(),
        TypeId::of::<BsonDocument>(),
        TypeId::of::<BsonArray>(),
        TypeId::of::<BsonBinaryData>(),
        TypeId::of::<BsonNull>(),
        TypeId::of::<BsonTimestamp>(),
    ]
    .contains(id)
}

macro_rules! impl_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for BsonValue {
                fn from(v: $t) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    f64 => Double,
    i32 => Int32,
    i64 => Int64,
    bool => Boolean,
    String => String,
    &str => String,
    BsonDocument => Document,
    BsonArray => Array,
    BsonBinaryData => Binary,
    ObjectId => ObjectId,
    BsonTimestamp => Timestamp,
}

impl From<BsonNull> for BsonValue {
    fn from(_: BsonNull) -> Self {
        Self::Null
    }
}

impl<T: Into<BsonValue>> From<Option<T>> for BsonValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for BsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Double(v) => write!(f, "{v:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Document(d) => write!(f, "{d}"),
            Self::Array(a) => {
                f.write_str("[")?;
                for (i, v) in a.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Self::Binary(b) => write!(f, "{b}"),
            Self::Undefined => f.write_str("undefined"),
            Self::ObjectId(id) => write!(f, "ObjectId(\"{id}\")"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::DateTime(ms) => write!(f, "DateTime({ms})"),
            Self::Null => f.write_str("null"),
            Self::RegularExpression { pattern, options } => write!(f, "/{pattern}/{options}"),
            Self::JavaScript(code) => write!(f, "JavaScript({code:?})"),
            Self::Symbol(s) => write!(f, "Symbol({s:?})"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Timestamp(ts) => write!(f, "Timestamp({}, {})", ts.time, ts.increment),
            Self::Int64(v) => write!(f, "NumberLong({v})"),
            Self::Decimal128(bytes) => write!(f, "Decimal128(0x{})", hex::encode(bytes)),
            Self::MinKey => f.write_str("MinKey"),
            Self::MaxKey => f.write_str("MaxKey"),
        }
    }
}
