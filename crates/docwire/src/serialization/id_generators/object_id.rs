use std::any::Any;

use super::IdGenerator;
use crate::error::BsonError;
use crate::value::ObjectId;

/// Generates [`ObjectId`] ids. The all-zero id counts as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdGenerator;

impl ObjectIdGenerator {
    pub const INSTANCE: Self = Self;
}

impl IdGenerator for ObjectIdGenerator {
    fn generate_id(
        &self,
        _container: Option<&dyn Any>,
        _document: &dyn Any,
    ) -> Result<Box<dyn Any + Send>, BsonError> {
        Ok(Box::new(ObjectId::generate_new_id()))
    }

    fn is_empty(&self, id: Option<&dyn Any>) -> bool {
        match id {
            None => true,
            Some(id) => id.downcast_ref::<ObjectId>() == Some(&ObjectId::ZERO),
        }
    }
}
