use crate::info::{ScalarKind, Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// ScalarInfo

/// Type information for a scalar type such as `u8` or `String`.
#[derive(Debug, Clone)]
pub struct ScalarInfo {
    ty: Type,
    kind: ScalarKind,
}

impl ScalarInfo {
    #[inline]
    pub fn new<T: 'static>(kind: ScalarKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline(always)]
    pub const fn scalar_kind(&self) -> ScalarKind {
        self.kind
    }
}

// -----------------------------------------------------------------------------
// PointerInfo

/// Type information for an owning pointer, e.g. `Box<T>`.
#[derive(Debug, Clone)]
pub struct PointerInfo {
    ty: Type,
    pointee: fn() -> &'static TypeInfo,
}

impl PointerInfo {
    /// Describes pointer type `T` pointing at `P`.
    #[inline]
    pub fn new<T: 'static, P: Typed>() -> Self {
        Self {
            ty: Type::of::<T>(),
            pointee: P::type_info,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn pointee_info(&self) -> &'static TypeInfo {
        (self.pointee)()
    }
}

// -----------------------------------------------------------------------------
// OptionalInfo

/// Type information for `Option<T>`.
#[derive(Debug, Clone)]
pub struct OptionalInfo {
    ty: Type,
    some: fn() -> &'static TypeInfo,
}

impl OptionalInfo {
    #[inline]
    pub fn new<T: 'static, S: Typed>() -> Self {
        Self {
            ty: Type::of::<T>(),
            some: S::type_info,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Type information of the value held by `Some`.
    #[inline]
    pub fn some_info(&self) -> &'static TypeInfo {
        (self.some)()
    }
}

// -----------------------------------------------------------------------------
// DynamicInfo

/// Type information for a self-describing value.
///
/// The shape of such a value is only known at runtime, see [`Value`](crate::Value).
#[derive(Debug, Clone)]
pub struct DynamicInfo {
    ty: Type,
}

impl DynamicInfo {
    #[inline]
    pub fn new<T: 'static>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}

// -----------------------------------------------------------------------------
// ListInfo

/// Type information for a growable sequence, e.g. `Vec<T>`.
#[derive(Debug, Clone)]
pub struct ListInfo {
    ty: Type,
    item: fn() -> &'static TypeInfo,
}

impl ListInfo {
    #[inline]
    pub fn new<T: 'static, I: Typed>() -> Self {
        Self {
            ty: Type::of::<T>(),
            item: I::type_info,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }
}

// -----------------------------------------------------------------------------
// ArrayInfo

/// Type information for a fixed-size array `[T; N]`.
#[derive(Debug, Clone)]
pub struct ArrayInfo {
    ty: Type,
    item: fn() -> &'static TypeInfo,
    len: usize,
}

impl ArrayInfo {
    #[inline]
    pub fn new<T: 'static, I: Typed>(len: usize) -> Self {
        Self {
            ty: Type::of::<T>(),
            item: I::type_info,
            len,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// Type information for a key-value map.
///
/// Any key type can be described; codecs decide which keys they accept.
#[derive(Debug, Clone)]
pub struct MapInfo {
    ty: Type,
    key: fn() -> &'static TypeInfo,
    value: fn() -> &'static TypeInfo,
}

impl MapInfo {
    #[inline]
    pub fn new<T: 'static, K: Typed, V: Typed>() -> Self {
        Self {
            ty: Type::of::<T>(),
            key: K::type_info,
            value: V::type_info,
        }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key)()
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value)()
    }
}

// -----------------------------------------------------------------------------
// OpaqueInfo

/// Type information for a type without visible structure, e.g. `()`.
#[derive(Debug, Clone)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    #[inline]
    pub fn new<T: 'static>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}
