use crate::Reflect;

/// A struct with named fields.
///
/// Usually implemented by `#[derive(Reflect)]`. Field indices follow declaration
/// order and match [`StructInfo`](crate::info::StructInfo).
pub trait Struct: Reflect {
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn field_len(&self) -> usize;
}
