//! Freeze/clone contract shared by every settings kind.

use std::sync::Arc;

/// Settings that are mutable until frozen and read-only afterwards.
///
/// Setters on an implementor check [`Freezable::is_frozen`] before anything
/// else and fail with [`BsonError::FrozenMutation`](crate::BsonError::FrozenMutation).
/// Once frozen, an instance can be shared through an [`Arc`] by any number
/// of readers or writers.
pub trait Freezable: Send + Sync + Sized + 'static {
    /// Type name reported in frozen-mutation errors.
    const NAME: &'static str;

    fn is_frozen(&self) -> bool;

    /// Sets the frozen flag. Idempotent.
    fn freeze(&mut self) -> &mut Self;

    /// Returns a new, unfrozen instance with the same option values.
    ///
    /// Options that only exist in legacy GUID mode are copied only when the
    /// instance is in legacy mode.
    fn clone_unfrozen(&self) -> Self;

    /// Returns `this` when it is already frozen, otherwise a frozen clone.
    fn frozen_copy(this: &Arc<Self>) -> Arc<Self> {
        if this.is_frozen() {
            Arc::clone(this)
        } else {
            let mut copy = this.clone_unfrozen();
            copy.freeze();
            Arc::new(copy)
        }
    }

    /// Freezes `self` and moves it behind an [`Arc`].
    fn into_frozen(mut self) -> Arc<Self> {
        self.freeze();
        Arc::new(self)
    }
}
