use crate::ApplyError;

/// A named group of optional settings for one policy area.
///
/// Implementations hold one `Option` per recognised setting plus, usually, a
/// [`DisableFlag`](crate::DisableFlag). `apply` must:
///
/// - call `target.disable()` (or its equivalent) and nothing else when the
///   section is disabled, whatever else was set;
/// - otherwise forward every set option to the matching target setter and
///   leave unset options alone.
///
/// Setting options on a disabled section is not an error; they are dropped.
pub trait Section<T: ?Sized> {
    /// Forward this section's settings onto `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::InvalidValue`] when the target rejects a value.
    /// Options forwarded before the failing one stay applied.
    fn apply(&self, target: &mut T) -> Result<(), ApplyError>;
}

impl<T: ?Sized, S: Section<T> + ?Sized> Section<T> for &S {
    fn apply(&self, target: &mut T) -> Result<(), ApplyError> {
        (**self).apply(target)
    }
}

impl<T: ?Sized, S: Section<T> + ?Sized> Section<T> for Box<S> {
    fn apply(&self, target: &mut T) -> Result<(), ApplyError> {
        (**self).apply(target)
    }
}
