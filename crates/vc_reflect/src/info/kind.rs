use core::fmt;

// -----------------------------------------------------------------------------
// ReflectKind

/// The shape of a reflected type.
///
/// Each kind has a matching view in [`ReflectRef`](crate::ops::ReflectRef)
/// and a matching info in [`TypeInfo`](crate::info::TypeInfo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Scalar,
    Pointer,
    Optional,
    Dynamic,
    List,
    Array,
    Map,
    Struct,
    Opaque,
}

impl ReflectKind {
    /// Returns `true` for kinds that contain other types.
    ///
    /// Composite kinds may be self-referential, scalar and opaque kinds never are.
    #[inline]
    pub const fn is_composite(self) -> bool {
        !matches!(self, Self::Scalar | Self::Opaque)
    }
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.pad("Scalar"),
            Self::Pointer => f.pad("Pointer"),
            Self::Optional => f.pad("Optional"),
            Self::Dynamic => f.pad("Dynamic"),
            Self::List => f.pad("List"),
            Self::Array => f.pad("Array"),
            Self::Map => f.pad("Map"),
            Self::Struct => f.pad("Struct"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// ScalarKind

/// The primitive types the scalar view understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Char,
    String,
}

impl ScalarKind {
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Isize
        )
    }

    #[inline]
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize
        )
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// The Rust spelling of the type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "String",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::{ReflectKind, ScalarKind};

    #[test]
    fn composite_kinds() {
        assert!(!ReflectKind::Scalar.is_composite());
        assert!(!ReflectKind::Opaque.is_composite());
        assert!(ReflectKind::Pointer.is_composite());
        assert!(ReflectKind::Struct.is_composite());
        assert!(ReflectKind::Dynamic.is_composite());
    }

    #[test]
    fn scalar_classes() {
        assert!(ScalarKind::Isize.is_signed());
        assert!(ScalarKind::U8.is_unsigned());
        assert!(ScalarKind::F32.is_float());
        assert!(!ScalarKind::Char.is_signed());
    }
}
