use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

/// Identity of a runtime type.
///
/// Equality and hashing use only the [`TypeId`]; the path is carried for messages.
///
/// # Examples
///
/// ```
/// use vc_reflect::info::Type;
///
/// let ty = Type::of::<Vec<String>>();
/// assert!(ty.is::<Vec<String>>());
/// assert_eq!(ty.ident(), "Vec");
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    /// Returns the `Type` of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: core::any::type_name::<T>(),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The full type path, as reported by [`core::any::type_name`].
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// The last path segment without generic arguments.
    pub fn ident(&self) -> &'static str {
        let path = self.path;
        let head = match path.find('<') {
            Some(index) => &path[..index],
            None => path,
        };
        head.rsplit("::").next().unwrap_or(head)
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::Type;

    #[test]
    fn ident_strips_module_and_generics() {
        assert_eq!(Type::of::<i32>().ident(), "i32");
        assert_eq!(Type::of::<String>().ident(), "String");
        assert_eq!(
            Type::of::<Vec<String>>().ident(),
            "Vec"
        );
    }

    #[test]
    fn equality_ignores_path() {
        assert_eq!(Type::of::<u8>(), Type::of::<u8>());
        assert_ne!(Type::of::<u8>(), Type::of::<i8>());
    }
}
