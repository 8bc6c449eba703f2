use alloc::string::String;
use core::any::Any;

use vc_reflect::Reflect;
use vc_reflect::info::{NonGenericTypeInfoCell, OpaqueInfo, TypeInfo, Typed};
use vc_reflect::ops::{ReflectMut, ReflectRef};

/// Pre-rendered text.
///
/// Encoding writes the text verbatim, so it must already be valid in the
/// output format. Decoding stores the source text of the value, including
/// the quotes and escapes of a string.
///
/// ```
/// use vc_codec::{Json, RawText};
/// use vc_reflect::derive::Reflect;
///
/// #[derive(Reflect, Default)]
/// struct Envelope {
///     pub kind: String,
///     pub body: RawText,
/// }
///
/// let json = Json::new();
/// let env: Envelope = json.from_str(r#"{"kind": "point", "body": {"x": 1,  "y": 2}}"#).unwrap();
/// assert_eq!(env.body.0, r#"{"x": 1,  "y": 2}"#);
/// assert_eq!(json.to_string(&env).unwrap(), r#"{"kind":"point","body":{"x": 1,  "y": 2}}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawText(pub String);

impl RawText {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RawText {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Typed for RawText {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<RawText>()))
    }
}

impl Reflect for RawText {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }

    #[inline]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect {
        self
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Opaque(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }
}
