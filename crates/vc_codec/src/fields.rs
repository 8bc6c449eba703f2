//! Struct field resolution.
//!
//! The visible fields of a struct are collected breadth first: the struct's
//! own exported fields, then the exported fields of its embedded members, and
//! so on. A name found at a shallower depth hides every deeper field with the
//! same name. Within one depth the first field in declaration order wins.
//! Non-exported fields are never visible.
//!
//! Incoming keys match a field name exactly when possible. Otherwise the
//! shallowest field equal to the key ignoring case is used, and among fields
//! at one depth the first declared.
//!
//! An embedded member is promoted only if it is a struct or a `Box` of one;
//! any other embedded field is an ordinary field.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::any::TypeId;
use core::ops::Index;

use vc_reflect::Reflect;
use vc_reflect::info::{StructInfo, TypeInfo};
use vc_reflect::ops::{ReflectMut, ReflectRef};
use vc_utils::hash::{HashMap, HashSet};

// -----------------------------------------------------------------------------
// ResolvedField

/// A field visible on a struct, possibly promoted from an embedded member.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    name: &'static str,
    /// Field indices from the outer struct down to the field.
    path: Box<[usize]>,
    info: &'static TypeInfo,
}

impl ResolvedField {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Zero for the struct's own fields.
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// The field inside `value`, which must be of the resolved struct type.
    pub fn get<'a>(&self, value: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        let mut current = value;
        for &index in self.path.iter() {
            let ReflectRef::Struct(view) = deref(current).reflect_ref() else {
                return None;
            };
            current = view.field_at(index)?;
        }
        Some(current)
    }

    /// The field inside `value`, which must be of the resolved struct type.
    pub fn get_mut<'a>(&self, value: &'a mut dyn Reflect) -> Option<&'a mut dyn Reflect> {
        let mut current = value;
        for &index in self.path.iter() {
            let ReflectMut::Struct(view) = deref_mut(current).reflect_mut() else {
                return None;
            };
            current = view.field_at_mut(index)?;
        }
        Some(current)
    }
}

fn deref(value: &dyn Reflect) -> &dyn Reflect {
    match value.reflect_ref() {
        ReflectRef::Pointer(pointer) => deref(pointer.pointee()),
        _ => value,
    }
}

fn deref_mut(value: &mut dyn Reflect) -> &mut dyn Reflect {
    match value.reflect_mut() {
        ReflectMut::Pointer(pointer) => deref_mut(pointer.pointee_mut()),
        other => other.into_reflect(),
    }
}

// -----------------------------------------------------------------------------
// FieldSet

/// The visible fields of a struct, in declaration order.
///
/// # Examples
///
/// ```
/// use vc_codec::FieldSet;
/// use vc_reflect::derive::Reflect;
/// use vc_reflect::info::Typed;
///
/// #[derive(Reflect, Default)]
/// struct Meta {
///     pub id: u64,
///     pub name: String,
/// }
///
/// #[derive(Reflect, Default)]
/// struct Item {
///     pub name: String,
///     #[reflect(embed)]
///     pub meta: Meta,
///     secret: u8,
/// }
///
/// let fields = FieldSet::resolve(Item::type_info().as_struct().unwrap());
/// let names: Vec<_> = fields.iter().map(|f| f.name()).collect();
/// assert_eq!(names, ["name", "id"]);
///
/// assert_eq!(fields.lookup("ID").unwrap().path(), [1, 0]);
/// assert!(fields.lookup("secret").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct FieldSet {
    fields: Vec<ResolvedField>,
    exact: HashMap<&'static str, usize>,
    /// Indices into `fields` ordered by depth, then declaration order.
    shallow_first: Box<[usize]>,
}

impl FieldSet {
    /// Resolves the visible fields of `info`.
    pub fn resolve(info: &'static StructInfo) -> Self {
        let mut fields: Vec<ResolvedField> = Vec::new();
        let mut claimed: HashSet<&'static str> = HashSet::default();
        let mut visited: HashSet<TypeId> = HashSet::default();
        let mut queue: VecDeque<(&'static StructInfo, Vec<usize>)> = VecDeque::new();

        visited.insert(info.ty().id());
        queue.push_back((info, Vec::new()));

        while let Some((current, prefix)) = queue.pop_front() {
            for (index, field) in current.iter().enumerate() {
                if !field.is_exported() {
                    continue;
                }
                let mut path = prefix.clone();
                path.push(index);

                if field.is_embedded()
                    && let Some(inner) = promoted(field.type_info())
                {
                    if visited.insert(inner.ty().id()) {
                        queue.push_back((inner, path));
                    }
                    continue;
                }

                if claimed.insert(field.name()) {
                    fields.push(ResolvedField {
                        name: field.name(),
                        path: path.into_boxed_slice(),
                        info: field.type_info(),
                    });
                }
            }
        }

        fields.sort_by(|a, b| a.path.cmp(&b.path));
        let exact = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name, index))
            .collect();
        let mut shallow_first: Vec<usize> = (0..fields.len()).collect();
        shallow_first.sort_by(|&a, &b| {
            let (a, b) = (&fields[a], &fields[b]);
            a.depth().cmp(&b.depth()).then_with(|| a.path.cmp(&b.path))
        });
        Self {
            fields,
            exact,
            shallow_first: shallow_first.into_boxed_slice(),
        }
    }

    /// Finds the field for an incoming key.
    ///
    /// An exact match is preferred. Otherwise the shallowest field whose name
    /// equals `key` ignoring case, ties going to the first declared.
    pub fn lookup(&self, key: &str) -> Option<&ResolvedField> {
        self.position(key).map(|index| &self.fields[index])
    }

    /// The index of the field [`lookup`](Self::lookup) finds.
    pub fn position(&self, key: &str) -> Option<usize> {
        if let Some(&index) = self.exact.get(key) {
            return Some(index);
        }
        self.shallow_first
            .iter()
            .copied()
            .find(|&index| eq_ignore_case(self.fields[index].name, key))
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&ResolvedField> {
        self.fields.get(index)
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, ResolvedField> {
        self.fields.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Index<usize> for FieldSet {
    type Output = ResolvedField;

    #[inline]
    fn index(&self, index: usize) -> &ResolvedField {
        &self.fields[index]
    }
}

/// The struct whose fields an embedded member of type `info` contributes.
fn promoted(info: &'static TypeInfo) -> Option<&'static StructInfo> {
    match info {
        TypeInfo::Struct(inner) => Some(inner),
        TypeInfo::Pointer(pointer) => pointer.pointee_info().as_struct().ok(),
        _ => None,
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use vc_reflect::derive::Reflect;
    use vc_reflect::info::Typed;

    use super::FieldSet;

    #[derive(Reflect, Default)]
    struct Deep {
        pub name: String,
        pub depth: u8,
    }

    #[derive(Reflect, Default)]
    struct Middle {
        pub name: String,
        pub level: u8,
        #[reflect(embed)]
        pub deep: Deep,
    }

    #[allow(non_snake_case)]
    #[derive(Reflect, Default)]
    struct Outer {
        #[reflect(embed)]
        pub middle: Box<Middle>,
        pub level: i64,
        pub Title: String,
        pub title: String,
        hidden: u8,
    }

    fn resolve<T: Typed>() -> FieldSet {
        FieldSet::resolve(T::type_info().as_struct().unwrap())
    }

    #[test]
    fn shallow_names_mask_deeper_ones() {
        let fields = resolve::<Outer>();
        let found: Vec<_> = fields.iter().map(|f| (f.name(), f.depth())).collect();

        assert_eq!(
            found,
            [("name", 1), ("depth", 2), ("level", 0), ("Title", 0), ("title", 0)]
        );
        assert!(fields.lookup("level").unwrap().type_info().is::<i64>());
        assert!(fields.lookup("hidden").is_none());
    }

    #[test]
    fn case_insensitive_lookup_prefers_exact_then_first() {
        let fields = resolve::<Outer>();
        assert_eq!(fields.lookup("title").unwrap().name(), "title");
        assert_eq!(fields.lookup("Title").unwrap().name(), "Title");
        assert_eq!(fields.lookup("TITLE").unwrap().name(), "Title");
        assert_eq!(fields.lookup("DePtH").unwrap().path(), [0, 2, 1].as_slice());
    }

    #[test]
    fn navigation_through_embedded_pointers() {
        let mut outer = Outer::default();
        let fields = resolve::<Outer>();
        let depth = fields.lookup("depth").unwrap();

        *depth
            .get_mut(&mut outer)
            .unwrap()
            .downcast_mut::<u8>()
            .unwrap() = 7;
        assert_eq!(outer.middle.deep.depth, 7);

        let read = depth.get(&outer).unwrap();
        assert_eq!(read.downcast_ref::<u8>(), Some(&7));
        assert_eq!(outer.hidden, 0);
    }

    #[derive(Reflect, Default)]
    struct Base {
        pub depth: u8,
    }

    #[allow(non_snake_case)]
    #[derive(Reflect, Default)]
    struct Shadowed {
        #[reflect(embed)]
        pub base: Base,
        pub DEPTH: u8,
    }

    #[test]
    fn case_insensitive_lookup_prefers_shallow_fields() {
        let fields = resolve::<Shadowed>();
        let names: Vec<_> = fields.iter().map(|f| (f.name(), f.depth())).collect();
        assert_eq!(names, [("depth", 1), ("DEPTH", 0)]);

        assert_eq!(fields.lookup("depth").unwrap().depth(), 1);
        let found = fields.lookup("Depth").unwrap();
        assert_eq!(found.name(), "DEPTH");
        assert_eq!(found.depth(), 0);
    }
}
