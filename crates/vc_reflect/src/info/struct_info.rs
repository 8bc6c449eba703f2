use alloc::boxed::Box;

use vc_utils::hash::HashMap;

use crate::info::{Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// NamedField

/// A named field of a struct.
///
/// - `embedded`: the field is an anonymous member whose own fields are promoted
///   into the outer struct during field resolution.
/// - `exported`: the field is visible to codecs. Derived impls mark non-`pub`
///   fields as not exported.
#[derive(Debug, Clone)]
pub struct NamedField {
    name: &'static str,
    ty: Type,
    type_info: fn() -> &'static TypeInfo,
    embedded: bool,
    exported: bool,
}

impl NamedField {
    /// Creates an exported, non-embedded field of type `T`.
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty: Type::of::<T>(),
            type_info: T::type_info,
            embedded: false,
            exported: true,
        }
    }

    #[inline]
    pub const fn with_embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    #[inline]
    pub const fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Type information of the field type.
    ///
    /// Resolved on call, so a field may mention the struct that owns it.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline(always)]
    pub const fn is_embedded(&self) -> bool {
        self.embedded
    }

    #[inline(always)]
    pub const fn is_exported(&self) -> bool {
        self.exported
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Type information for a struct with named fields.
///
/// # Examples
///
/// ```
/// use vc_reflect::info::{NamedField, StructInfo};
///
/// struct Pair;
/// let info = StructInfo::new::<Pair>(&[
///     NamedField::new::<i32>("left"),
///     NamedField::new::<i32>("right").with_exported(false),
/// ]);
///
/// assert_eq!(info.index_of("right"), Some(1));
/// assert!(!info.field_at(1).unwrap().is_exported());
/// ```
#[derive(Debug, Clone)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    indices: HashMap<&'static str, usize>,
}

impl StructInfo {
    pub fn new<T: 'static>(fields: &[NamedField]) -> Self {
        let indices = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name, index))
            .collect();
        Self {
            ty: Type::of::<T>(),
            fields: fields.into(),
            indices,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.index_of(name).map(|index| &self.fields[index])
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Fields in declaration order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, NamedField> {
        self.fields.iter()
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}
