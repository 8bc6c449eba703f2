use crate::Reflect;
use crate::Value;
use crate::info::ReflectKind;
use crate::ops::{Array, List, Map, Optional, Pointer, Scalar, Struct};

/// An immutable, kind-specific view of a reflected value.
pub enum ReflectRef<'a> {
    Scalar(&'a dyn Scalar),
    Pointer(&'a dyn Pointer),
    Optional(&'a dyn Optional),
    Dynamic(&'a Value),
    List(&'a dyn List),
    Array(&'a dyn Array),
    Map(&'a dyn Map),
    Struct(&'a dyn Struct),
    Opaque(&'a dyn Reflect),
}

/// A mutable, kind-specific view of a reflected value.
pub enum ReflectMut<'a> {
    Scalar(&'a mut dyn Scalar),
    Pointer(&'a mut dyn Pointer),
    Optional(&'a mut dyn Optional),
    Dynamic(&'a mut Value),
    List(&'a mut dyn List),
    Array(&'a mut dyn Array),
    Map(&'a mut dyn Map),
    Struct(&'a mut dyn Struct),
    Opaque(&'a mut dyn Reflect),
}

macro_rules! impl_kind {
    ($name:ident) => {
        impl $name<'_> {
            pub fn kind(&self) -> ReflectKind {
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
        }
    };
}

impl_kind!(ReflectRef);
impl_kind!(ReflectMut);

impl<'a> ReflectRef<'a> {
    /// Returns the viewed value as a plain `dyn Reflect`.
    pub fn into_reflect(self) -> &'a dyn Reflect {
        match self {
            Self::Scalar(v) => v,
            Self::Pointer(v) => v,
            Self::Optional(v) => v,
            Self::Dynamic(v) => v,
            Self::List(v) => v,
            Self::Array(v) => v,
            Self::Map(v) => v,
            Self::Struct(v) => v,
            Self::Opaque(v) => v,
        }
    }
}

impl<'a> ReflectMut<'a> {
    /// Returns the viewed value as a plain `dyn Reflect`.
    pub fn into_reflect(self) -> &'a mut dyn Reflect {
        match self {
            Self::Scalar(v) => v,
            Self::Pointer(v) => v,
            Self::Optional(v) => v,
            Self::Dynamic(v) => v,
            Self::List(v) => v,
            Self::Array(v) => v,
            Self::Map(v) => v,
            Self::Struct(v) => v,
            Self::Opaque(v) => v,
        }
    }
}
