use crate::Reflect;

/// An owning pointer to exactly one value, e.g. `Box<T>`.
pub trait Pointer: Reflect {
    fn pointee(&self) -> &dyn Reflect;

    fn pointee_mut(&mut self) -> &mut dyn Reflect;
}

/// A value that may be absent, e.g. `Option<T>`.
///
/// # Examples
///
/// ```
/// use vc_reflect::ops::Optional;
///
/// let mut value: Option<i32> = None;
/// Optional::get_or_insert_default(&mut value);
/// assert_eq!(value, Some(0));
///
/// Optional::set_none(&mut value);
/// assert!(Optional::get(&value).is_none());
/// ```
pub trait Optional: Reflect {
    fn get(&self) -> Option<&dyn Reflect>;

    fn get_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Returns the held value, storing a default one first when absent.
    fn get_or_insert_default(&mut self) -> &mut dyn Reflect;

    fn set_none(&mut self);
}
