use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use std::sync::LazyLock;

use vc_utils::SnapshotMap;

use crate::access::{cmp_ignore_case, strip_name, to_camel_case, to_pascal_case, to_snake_case};
use crate::config::TextCase;
use crate::info::{MemberInfo, StructInfo, TypeInfo, TypeKind};

// -----------------------------------------------------------------------------
// MemberAccessor

/// A member of a struct with its precomputed written names.
#[derive(Debug)]
pub struct MemberAccessor {
    member: &'static MemberInfo,
    camel: Box<str>,
    pascal: Box<str>,
    snake: Box<str>,
    is_enum: bool,
}

impl MemberAccessor {
    fn new(member: &'static MemberInfo) -> Self {
        let name = member.name();
        Self {
            member,
            camel: to_camel_case(name).into_boxed_str(),
            pascal: to_pascal_case(name).into_boxed_str(),
            snake: to_snake_case(name).into_boxed_str(),
            is_enum: (member.type_info())().kind() == TypeKind::Enum,
        }
    }

    /// The declared or renamed name of the member.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.member.name()
    }

    /// The name written under `case`. Renamed members keep their name.
    pub fn cased_name(&self, case: TextCase) -> &str {
        if self.member.fixed_name() {
            return self.member.name();
        }
        match case {
            TextCase::Default => self.member.name(),
            TextCase::PascalCase => &self.pascal,
            TextCase::CamelCase => &self.camel,
            TextCase::SnakeCase => &self.snake,
        }
    }

    #[inline]
    pub fn member(&self) -> &'static MemberInfo {
        self.member
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.member.type_info())()
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        self.is_enum
    }

    #[inline]
    pub fn get<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        self.member.get(instance)
    }

    #[inline]
    pub fn set(&self, instance: &mut dyn Any, value: Box<dyn Any>) -> bool {
        self.member.set(instance, value)
    }

    /// Returns `true` if `value` equals the default of the member type.
    #[inline]
    pub fn is_default(&self, value: &dyn Any) -> bool {
        self.type_info().is_default_value(value)
    }

    #[inline]
    pub fn should_serialize(&self, instance: &dyn Any) -> bool {
        self.member.should_serialize(instance)
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

static DESCRIPTORS: LazyLock<SnapshotMap<TypeId, Arc<TypeDescriptor>>> =
    LazyLock::new(SnapshotMap::new);

/// The accessor table of one struct type.
#[derive(Debug)]
pub struct TypeDescriptor {
    info: &'static StructInfo,
    /// Sorted by name, ignoring case.
    accessors: Box<[MemberAccessor]>,
    /// Accessor indexes in declaration order.
    declared: Box<[usize]>,
    camel: Box<[usize]>,
    pascal: Box<[usize]>,
    snake: Box<[usize]>,
    stripped: Box<[(Box<str>, usize)]>,
}

impl TypeDescriptor {
    /// Returns the cached descriptor of a struct type, building it on first
    /// use. Other kinds have no descriptor.
    pub fn of(info: &'static TypeInfo) -> Option<Arc<TypeDescriptor>> {
        let info = info.as_struct().ok()?;
        Some(Self::of_struct(info))
    }

    /// Returns the cached descriptor of `info`.
    pub fn of_struct(info: &'static StructInfo) -> Arc<TypeDescriptor> {
        DESCRIPTORS.get_or_insert_with(info.type_id(), || Arc::new(Self::build(info)))
    }

    /// Returns `true` if the descriptor of `type_id` was built.
    pub fn is_cached(type_id: TypeId) -> bool {
        DESCRIPTORS.contains_key(&type_id)
    }

    fn build(info: &'static StructInfo) -> Self {
        let mut order: Vec<usize> = (0..info.members().len()).collect();
        order.sort_by(|a, b| cmp_ignore_case(info.members()[*a].name(), info.members()[*b].name()));

        let accessors: Box<[MemberAccessor]> = order
            .iter()
            .map(|index| MemberAccessor::new(&info.members()[*index]))
            .collect();

        let mut declared: Vec<usize> = (0..order.len()).collect();
        declared.sort_by_key(|sorted| order[*sorted]);

        let index_by = |case: TextCase| -> Box<[usize]> {
            let mut index: Vec<usize> = (0..accessors.len()).collect();
            index.sort_by(|a, b| {
                cmp_ignore_case(accessors[*a].cased_name(case), accessors[*b].cased_name(case))
            });
            index.into_boxed_slice()
        };
        let camel = index_by(TextCase::CamelCase);
        let pascal = index_by(TextCase::PascalCase);
        let snake = index_by(TextCase::SnakeCase);

        let mut stripped: Vec<(Box<str>, usize)> = accessors
            .iter()
            .enumerate()
            .map(|(index, a)| (strip_name(a.name()).into_boxed_str(), index))
            .collect();
        stripped.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            info,
            accessors,
            declared: declared.into_boxed_slice(),
            camel,
            pascal,
            snake,
            stripped: stripped.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn info(&self) -> &'static StructInfo {
        self.info
    }

    /// The accessors sorted by name, ignoring case.
    #[inline]
    pub fn accessors(&self) -> &[MemberAccessor] {
        &self.accessors
    }

    /// The accessors in declaration order, the order members are written.
    pub fn declared(&self) -> impl Iterator<Item = &MemberAccessor> {
        self.declared.iter().map(|index| &self.accessors[*index])
    }

    /// Finds the member a key refers to.
    ///
    /// `lenient` enables the match with `-` and `_` removed.
    #[inline]
    pub fn find_accessor(
        &self,
        name: &str,
        lenient: bool,
        case: TextCase,
    ) -> Option<&MemberAccessor> {
        self.find_index(name, lenient, case)
            .map(|index| &self.accessors[index])
    }

    /// Like [`find_accessor`](Self::find_accessor), returning the position
    /// in [`accessors`](Self::accessors).
    pub fn find_index(&self, name: &str, lenient: bool, case: TextCase) -> Option<usize> {
        if let Ok(index) = self
            .accessors
            .binary_search_by(|a| cmp_ignore_case(a.name(), name))
        {
            return Some(index);
        }

        let cased = match case {
            TextCase::Default => None,
            TextCase::PascalCase => Some((&self.pascal, TextCase::PascalCase)),
            TextCase::CamelCase => Some((&self.camel, TextCase::CamelCase)),
            TextCase::SnakeCase => Some((&self.snake, TextCase::SnakeCase)),
        };
        if let Some((index, case)) = cased
            && let Ok(found) = index.binary_search_by(|i| {
                cmp_ignore_case(self.accessors[*i].cased_name(case), name)
            })
        {
            return Some(index[found]);
        }

        if lenient {
            let stripped = strip_name(name);
            if let Ok(found) = self
                .stripped
                .binary_search_by(|(key, _)| (**key).cmp(stripped.as_str()))
            {
                return Some(self.stripped[found].1);
            }
        }

        None
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::TypeDescriptor;
    use crate::config::TextCase;
    use crate::derive::Typed;
    use crate::info::Typed as _;

    #[derive(Typed, Default)]
    struct Sample {
        zeta: i32,
        #[jsv(rename = "FooBar")]
        foo_bar: bool,
        alpha_beta: u8,
    }

    #[test]
    fn accessors_sorted_and_declared() {
        let desc = TypeDescriptor::of(Sample::type_info()).unwrap();
        let sorted: Vec<_> = desc.accessors().iter().map(|a| a.name()).collect();
        assert_eq!(sorted, ["alpha_beta", "FooBar", "zeta"]);
        let declared: Vec<_> = desc.declared().map(|a| a.name()).collect();
        assert_eq!(declared, ["zeta", "FooBar", "alpha_beta"]);
        assert!(TypeDescriptor::is_cached(core::any::TypeId::of::<Sample>()));
    }

    #[test]
    fn lenient_lookup() {
        let desc = TypeDescriptor::of(Sample::type_info()).unwrap();
        let find = |name: &str, lenient| {
            desc.find_accessor(name, lenient, TextCase::Default)
                .map(|a| a.name())
        };

        assert_eq!(find("foobar", false), Some("FooBar"));
        assert_eq!(find("foo_bar", false), None);
        assert_eq!(find("foo_bar", true), Some("FooBar"));
        assert_eq!(find("FOO-BAR", true), Some("FooBar"));
        assert_eq!(find("ZETA", false), Some("zeta"));
        assert_eq!(find("missing", true), None);
    }

    #[test]
    fn cased_lookup() {
        let desc = TypeDescriptor::of(Sample::type_info()).unwrap();
        let alpha = desc
            .find_accessor("alphaBeta", false, TextCase::CamelCase)
            .unwrap();
        assert_eq!(alpha.name(), "alpha_beta");
        assert_eq!(alpha.cased_name(TextCase::PascalCase), "AlphaBeta");
        assert!(
            desc.find_accessor("alphaBeta", false, TextCase::Default)
                .is_none()
        );

        let foo = desc.find_accessor("FooBar", false, TextCase::SnakeCase).unwrap();
        assert_eq!(foo.cased_name(TextCase::SnakeCase), "FooBar");
    }
}
