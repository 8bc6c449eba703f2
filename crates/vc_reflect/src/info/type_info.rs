use core::any::TypeId;
use core::{error, fmt};

use crate::info::{ArrayInfo, ListInfo, MapInfo, StructInfo};
use crate::info::{DynamicInfo, OpaqueInfo, OptionalInfo, PointerInfo, ScalarInfo};
use crate::info::{ReflectKind, Type};

/// Error returned when a [`TypeInfo`] is not of the expected [`ReflectKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

impl fmt::Display for ReflectKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reflect kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for ReflectKindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static description of a type's shape.
///
/// Obtained through [`Typed::type_info`](crate::info::Typed::type_info) when the
/// type is known, or [`Reflect::reflect_type_info`](crate::Reflect::reflect_type_info)
/// from a `dyn Reflect`. Both return the same `&'static` reference, so
/// descriptors can be compared by [`TypeInfo::type_id`] or by address.
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Scalar(ScalarInfo),
    Pointer(PointerInfo),
    Optional(OptionalInfo),
    Dynamic(DynamicInfo),
    List(ListInfo),
    Array(ArrayInfo),
    Map(MapInfo),
    Struct(StructInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Returns the inner [`", stringify!($info), "`], or a kind error.")]
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_scalar: Scalar => ScalarInfo);
    impl_cast_method!(as_pointer: Pointer => PointerInfo);
    impl_cast_method!(as_optional: Optional => OptionalInfo);
    impl_cast_method!(as_dynamic: Dynamic => DynamicInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_struct: Struct => StructInfo);
    impl_cast_method!(as_opaque: Opaque => OpaqueInfo);

    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Scalar(_) => ReflectKind::Scalar,
            Self::Pointer(_) => ReflectKind::Pointer,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::List(_) => ReflectKind::List,
            Self::Array(_) => ReflectKind::Array,
            Self::Map(_) => ReflectKind::Map,
            Self::Struct(_) => ReflectKind::Struct,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    pub const fn ty(&self) -> &Type {
        match self {
            Self::Scalar(info) => info.ty(),
            Self::Pointer(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.ty().is::<T>()
    }

    /// For pointers and optionals, the info of the type they wrap.
    pub fn indirect_info(&self) -> Option<&'static TypeInfo> {
        match self {
            Self::Pointer(info) => Some(info.pointee_info()),
            Self::Optional(info) => Some(info.some_info()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::info::{ReflectKind, ScalarKind, Typed};

    #[test]
    fn kinds_of_builtins() {
        assert_eq!(i32::type_info().kind(), ReflectKind::Scalar);
        assert_eq!(Box::<u8>::type_info().kind(), ReflectKind::Pointer);
        assert_eq!(Option::<u8>::type_info().kind(), ReflectKind::Optional);
        assert_eq!(Vec::<u8>::type_info().kind(), ReflectKind::List);
        assert_eq!(<[u8; 3]>::type_info().kind(), ReflectKind::Array);
        assert_eq!(<()>::type_info().kind(), ReflectKind::Opaque);
    }

    #[test]
    fn cast_reports_kind_mismatch() {
        let err = String::type_info().as_struct().unwrap_err();
        assert_eq!(err.expected, ReflectKind::Struct);
        assert_eq!(err.received, ReflectKind::Scalar);
        assert_eq!(
            String::type_info().as_scalar().unwrap().scalar_kind(),
            ScalarKind::String
        );
    }

    #[test]
    fn generic_infos_are_distinct_and_stable() {
        let a = Vec::<i32>::type_info();
        let b = Vec::<String>::type_info();
        assert!(!core::ptr::eq(a, b));
        assert!(core::ptr::eq(a, Vec::<i32>::type_info()));
        assert!(a.as_list().unwrap().item_info().is::<i32>());
        assert!(Option::<Box<u8>>::type_info().indirect_info().unwrap().is::<Box<u8>>());
    }
}
