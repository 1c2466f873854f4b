//! Runtime type identity used as the registry key.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Names the type a serializer handles.
///
/// Concrete keys wrap a [`TypeId`] and are the only keys the registry
/// resolves. Generic and parameter keys describe open generic shapes such
/// as `Vec<T>`; asking the registry for one fails with
/// [`BsonError::InvalidShape`](crate::BsonError::InvalidShape).
#[derive(Debug, Clone)]
pub enum TypeKey {
    Concrete { id: TypeId, name: &'static str },
    Generic { name: &'static str, args: Vec<TypeKey> },
    Parameter(&'static str),
}

impl TypeKey {
    pub fn of<T: Any + ?Sized>() -> Self {
        Self::Concrete {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn generic(name: &'static str, args: Vec<TypeKey>) -> Self {
        Self::Generic { name, args }
    }

    pub fn parameter(name: &'static str) -> Self {
        Self::Parameter(name)
    }

    /// `true` when the key still has unresolved type parameters.
    pub fn is_open(&self) -> bool {
        match self {
            Self::Concrete { .. } => false,
            Self::Parameter(_) => true,
            Self::Generic { args, .. } => args.is_empty() || args.iter().any(Self::is_open),
        }
    }

    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Self::Concrete { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.type_id() == Some(TypeId::of::<T>())
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Concrete { id: a, .. }, Self::Concrete { id: b, .. }) => a == b,
            (
                Self::Generic { name: a, args: x },
                Self::Generic { name: b, args: y },
            ) => a == b && x == y,
            (Self::Parameter(a), Self::Parameter(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Concrete { id, .. } => {
                state.write_u8(0);
                id.hash(state);
            }
            Self::Generic { name, args } => {
                state.write_u8(1);
                name.hash(state);
                args.hash(state);
            }
            Self::Parameter(name) => {
                state.write_u8(2);
                name.hash(state);
            }
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete { name, .. } => f.write_str(name),
            Self::Parameter(name) => f.write_str(name),
            Self::Generic { name, args } => {
                write!(f, "{name}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}
