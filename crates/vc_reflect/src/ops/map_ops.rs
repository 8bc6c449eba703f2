use alloc::vec::Vec;

use crate::Reflect;

/// A key-value map.
///
/// Every key type is readable through [`entries`](Map::entries); lookup and
/// insertion by name only work when the key type is `String`.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    /// All entries in the map's iteration order.
    fn entries(&self) -> Vec<(&dyn Reflect, &dyn Reflect)>;

    /// Returns the value under `key`, or `None` when absent or keys are not `String`.
    fn get(&self, key: &str) -> Option<&dyn Reflect>;

    /// Returns the value under `key`, inserting a default one first when absent.
    ///
    /// Returns `None` when the key type is not `String`.
    fn get_or_insert_default(&mut self, key: &str) -> Option<&mut dyn Reflect>;

    fn clear(&mut self);
}
