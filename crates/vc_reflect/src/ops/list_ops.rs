use alloc::vec::Vec;

use crate::Reflect;

/// A growable, ordered sequence, e.g. `Vec<T>`.
pub trait List: Reflect {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Appends a default item and returns it.
    fn push_default(&mut self) -> &mut dyn Reflect;

    fn clear(&mut self);

    /// The contents as bytes, if the list is a `Vec<u8>`.
    fn as_bytes(&self) -> Option<&[u8]> {
        None
    }

    /// Replaces the contents with `bytes` if the list is a `Vec<u8>`.
    ///
    /// Gives the bytes back otherwise.
    fn set_bytes(&mut self, bytes: Vec<u8>) -> Result<(), Vec<u8>> {
        Err(bytes)
    }
}
