use std::any::Any;

use super::IdGenerator;
use crate::error::BsonError;
use crate::value::ObjectId;

/// Generates ids for `String` id members as the hex form of a new
/// [`ObjectId`]. The empty string counts as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringObjectIdGenerator;

impl StringObjectIdGenerator {
    pub const INSTANCE: Self = Self;
}

impl IdGenerator for StringObjectIdGenerator {
    fn generate_id(
        &self,
        _container: Option<&dyn Any>,
        _document: &dyn Any,
    ) -> Result<Box<dyn Any + Send>, BsonError> {
        Ok(Box::new(ObjectId::generate_new_id().to_hex()))
    }

    fn is_empty(&self, id: Option<&dyn Any>) -> bool {
        match id {
            None => true,
            Some(id) => id.downcast_ref::<String>().is_some_and(String::is_empty),
        }
    }
}
