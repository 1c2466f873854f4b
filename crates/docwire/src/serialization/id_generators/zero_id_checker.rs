use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;

use super::IdGenerator;
use crate::error::BsonError;

/// Rejects ids equal to `T::default()` without ever generating one.
///
/// For id types such as `i64` where the default value cannot be told apart
/// from "not assigned", the caller must always supply an id.
pub struct ZeroIdChecker<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> ZeroIdChecker<T> {
    pub const INSTANCE: Self = Self::new();

    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for ZeroIdChecker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ZeroIdChecker<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ZeroIdChecker<T> {}

impl<T> fmt::Debug for ZeroIdChecker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZeroIdChecker<{}>", type_name::<T>())
    }
}

impl<T: Any + Default + PartialEq> IdGenerator for ZeroIdChecker<T> {
    fn generate_id(
        &self,
        _container: Option<&dyn Any>,
        _document: &dyn Any,
    ) -> Result<Box<dyn Any + Send>, BsonError> {
        Err(BsonError::IdZeroValueOnly(type_name::<T>()))
    }

    fn is_empty(&self, id: Option<&dyn Any>) -> bool {
        match id {
            None => true,
            Some(id) => id.downcast_ref::<T>().is_some_and(|id| *id == T::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_value_is_empty() {
        let checker = ZeroIdChecker::<i64>::INSTANCE;
        assert!(checker.is_empty(None));
        assert!(checker.is_empty(Some(&0i64)));
        assert!(!checker.is_empty(Some(&7i64)));
        assert!(!checker.is_empty(Some(&0i32)));
        assert_eq!(
            checker.generate_id(None, &()).err(),
            Some(BsonError::IdZeroValueOnly("i64"))
        );
    }
}
