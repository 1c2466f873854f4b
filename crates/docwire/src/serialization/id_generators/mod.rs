//! Id generation for documents stored without an id.

mod object_id;
mod string_object_id;
mod zero_id_checker;

use std::any::Any;

use crate::error::BsonError;

pub use object_id::ObjectIdGenerator;
pub use string_object_id::StringObjectIdGenerator;
pub use zero_id_checker::ZeroIdChecker;

/// Creates ids and recognises ids that still need one.
///
/// Ids travel as `dyn Any` because a generator is chosen per id member
/// type at run time. An id of an unexpected type is never empty.
pub trait IdGenerator: Send + Sync {
    /// A fresh id for `document`, which is stored in `container` when known.
    fn generate_id(
        &self,
        container: Option<&dyn Any>,
        document: &dyn Any,
    ) -> Result<Box<dyn Any + Send>, BsonError>;

    /// `true` when `id` is missing or holds the "no id yet" value.
    fn is_empty(&self, id: Option<&dyn Any>) -> bool;
}
