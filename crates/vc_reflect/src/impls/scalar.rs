use alloc::string::{String, ToString};

use crate::Reflect;
use crate::info::{NonGenericTypeInfoCell, ScalarInfo, ScalarKind, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef, Scalar, ScalarError, ScalarRef};
use crate::reflection::impl_reflect_cast;

macro_rules! impl_scalar_reflect {
    ($ty:ty => $kind:ident) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<$ty>(ScalarKind::$kind)))
            }
        }

        impl Reflect for $ty {
            #[inline]
            fn reflect_type_info(&self) -> &'static TypeInfo {
                <Self as Typed>::type_info()
            }

            impl_reflect_cast!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Scalar(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Scalar(self)
            }
        }
    };
}

macro_rules! impl_integer {
    ($($ty:ty => $kind:ident as $wide:ident($via:ty)),* $(,)?) => {$(
        impl Scalar for $ty {
            #[inline]
            fn scalar_kind(&self) -> ScalarKind {
                ScalarKind::$kind
            }

            #[inline]
            fn scalar_ref(&self) -> ScalarRef<'_> {
                ScalarRef::$wide(*self as $via)
            }

            fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError> {
                let converted = match value {
                    ScalarRef::Int(v) => <$ty>::try_from(v).ok(),
                    ScalarRef::Uint(v) => <$ty>::try_from(v).ok(),
                    other => return Err(ScalarError::mismatch(other, ScalarKind::$kind)),
                };
                *self = converted.ok_or_else(|| ScalarError::out_of_range(value, ScalarKind::$kind))?;
                Ok(())
            }
        }

        impl_scalar_reflect!($ty => $kind);
    )*};
}

impl_integer!(
    i8 => I8 as Int(i64),
    i16 => I16 as Int(i64),
    i32 => I32 as Int(i64),
    i64 => I64 as Int(i64),
    isize => Isize as Int(i64),
    u8 => U8 as Uint(u64),
    u16 => U16 as Uint(u64),
    u32 => U32 as Uint(u64),
    u64 => U64 as Uint(u64),
    usize => Usize as Uint(u64),
);

impl Scalar for f64 {
    #[inline]
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::F64
    }

    #[inline]
    fn scalar_ref(&self) -> ScalarRef<'_> {
        ScalarRef::Float(*self)
    }

    fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError> {
        *self = match value {
            ScalarRef::Float(v) => v,
            ScalarRef::Int(v) => v as f64,
            ScalarRef::Uint(v) => v as f64,
            other => return Err(ScalarError::mismatch(other, ScalarKind::F64)),
        };
        Ok(())
    }
}

impl Scalar for f32 {
    #[inline]
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::F32
    }

    #[inline]
    fn scalar_ref(&self) -> ScalarRef<'_> {
        ScalarRef::Float(f64::from(*self))
    }

    fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError> {
        let wide = match value {
            ScalarRef::Float(v) => v,
            ScalarRef::Int(v) => v as f64,
            ScalarRef::Uint(v) => v as f64,
            other => return Err(ScalarError::mismatch(other, ScalarKind::F32)),
        };
        let narrow = wide as f32;
        if wide.is_finite() && narrow.is_infinite() {
            return Err(ScalarError::out_of_range(value, ScalarKind::F32));
        }
        *self = narrow;
        Ok(())
    }
}

impl Scalar for bool {
    #[inline]
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::Bool
    }

    #[inline]
    fn scalar_ref(&self) -> ScalarRef<'_> {
        ScalarRef::Bool(*self)
    }

    fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError> {
        match value {
            ScalarRef::Bool(v) => {
                *self = v;
                Ok(())
            }
            other => Err(ScalarError::mismatch(other, ScalarKind::Bool)),
        }
    }
}

impl Scalar for char {
    #[inline]
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::Char
    }

    #[inline]
    fn scalar_ref(&self) -> ScalarRef<'_> {
        ScalarRef::Char(*self)
    }

    fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError> {
        *self = match value {
            ScalarRef::Char(c) => c,
            ScalarRef::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => return Err(ScalarError::out_of_range(value, ScalarKind::Char)),
                }
            }
            other => return Err(ScalarError::mismatch(other, ScalarKind::Char)),
        };
        Ok(())
    }
}

impl Scalar for String {
    #[inline]
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::String
    }

    #[inline]
    fn scalar_ref(&self) -> ScalarRef<'_> {
        ScalarRef::Str(self)
    }

    fn set_scalar(&mut self, value: ScalarRef<'_>) -> Result<(), ScalarError> {
        match value {
            ScalarRef::Str(s) => {
                self.clear();
                self.push_str(s);
            }
            ScalarRef::Char(c) => *self = c.to_string(),
            other => return Err(ScalarError::mismatch(other, ScalarKind::String)),
        }
        Ok(())
    }
}

impl_scalar_reflect!(f32 => F32);
impl_scalar_reflect!(f64 => F64);
impl_scalar_reflect!(bool => Bool);
impl_scalar_reflect!(char => Char);
impl_scalar_reflect!(String => String);

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use crate::Reflect;
    use crate::info::ScalarKind;
    use crate::ops::{ReflectMut, Scalar, ScalarError, ScalarRef};

    #[test]
    fn integer_widths_are_range_checked() {
        let mut x = 0_i8;
        x.set_scalar(ScalarRef::Int(-128)).unwrap();
        assert_eq!(x, -128);
        assert!(matches!(
            x.set_scalar(ScalarRef::Int(128)),
            Err(ScalarError::OutOfRange { target: ScalarKind::I8, .. })
        ));
        assert_eq!(x, -128);

        let mut y = 0_u64;
        y.set_scalar(ScalarRef::Uint(u64::MAX)).unwrap();
        assert_eq!(y, u64::MAX);
        assert!(y.set_scalar(ScalarRef::Int(-1)).is_err());
    }

    #[test]
    fn floats_accept_integers_but_not_the_reverse() {
        let mut f = 0.0_f64;
        f.set_scalar(ScalarRef::Int(-2)).unwrap();
        assert_eq!(f, -2.0);

        let mut i = 0_i32;
        let err = i.set_scalar(ScalarRef::Float(1.5)).unwrap_err();
        assert_eq!(
            err,
            ScalarError::Mismatch {
                found: "float",
                target: ScalarKind::I32
            }
        );
    }

    #[test]
    fn f32_rejects_overflow() {
        let mut f = 0.0_f32;
        assert!(f.set_scalar(ScalarRef::Float(1e300)).is_err());
        f.set_scalar(ScalarRef::Float(0.25)).unwrap();
        assert_eq!(f, 0.25);
    }

    #[test]
    fn string_and_char_through_view() {
        let mut s = String::from("old");
        let ReflectMut::Scalar(scalar) = s.reflect_mut() else {
            panic!("String is a scalar");
        };
        scalar.set_scalar(ScalarRef::Str("new")).unwrap();
        assert_eq!(s, "new");

        let mut c = 'a';
        c.set_scalar(ScalarRef::Str("z")).unwrap();
        assert_eq!(c, 'z');
        assert!(c.set_scalar(ScalarRef::Str("zz")).is_err());
    }
}
