//! Text identifiers: typed key shapes and the singular/plural contract.
//!
//! Every producer defines its own identifier type. Keys carry the Rust type
//! identity of that type, so two packages using `1` as an identifier never
//! collide in a merged [`TextMap`](crate::i18n::TextMap).

use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::fmt;

/// The value part of a key.
///
/// Identifiers are integers, strings or structs made of those. The closed set
/// of shapes is what makes a value usable as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    Int(i64),
    Uint(u64),
    Str(Cow<'static, str>),
    /// Fields of a struct-shaped identifier, in declaration order.
    Struct(Vec<Shape>),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Int(v) => write!(f, "{}", v),
            Shape::Uint(v) => write!(f, "{}", v),
            Shape::Str(s) => f.write_str(s),
            Shape::Struct(fields) => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", field)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A fully qualified key: the identifier's type plus its shape.
///
/// Ordering is by type name, then shape, then type identity, which gives
/// producer groups a stable iteration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextKey {
    type_name: &'static str,
    shape: Shape,
    type_id: TypeId,
}

impl TextKey {
    /// Build a key for a value of type `T`.
    pub fn of<T: ?Sized + 'static>(shape: Shape) -> Self {
        Self {
            type_name: type_name::<T>(),
            shape,
            type_id: TypeId::of::<T>(),
        }
    }

    /// The value part of the key.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Name of the identifier type the key belongs to.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for TextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name, self.shape)
    }
}

/// Anything that can act as a map key: text identifiers and pack ids.
pub trait Keyed: Send + Sync + 'static {
    /// The value of this key.
    fn shape(&self) -> Shape;

    /// The fully qualified key, tagged with the implementing type.
    fn text_key(&self) -> TextKey {
        TextKey::of::<Self>(self.shape())
    }
}

/// Identifier of one text resource.
///
/// `single` and `plural` return the two members of the singular/plural pair.
/// Both are idempotent: `x.plural().plural() == x.plural()`.
pub trait TextId: Keyed + fmt::Display {
    fn single(&self) -> Self
    where
        Self: Sized;

    fn plural(&self) -> Self
    where
        Self: Sized;
}

macro_rules! keyed_int {
    ($variant:ident, $wide:ty, $($t:ty),+) => {
        $(
            impl Keyed for $t {
                fn shape(&self) -> Shape {
                    Shape::$variant(*self as $wide)
                }
            }
        )+
    };
}

keyed_int!(Int, i64, i8, i16, i32, i64, isize);
keyed_int!(Uint, u64, u8, u16, u32, u64, usize);

impl Keyed for &'static str {
    fn shape(&self) -> Shape {
        Shape::Str(Cow::Borrowed(*self))
    }
}

impl Keyed for String {
    fn shape(&self) -> Shape {
        Shape::Str(Cow::Owned(self.clone()))
    }
}

/// Singular member of an integer identifier pair (`abs(id)`).
///
/// Zero is its own dual: `int_single(0) == int_plural(0) == 0`, so an
/// identifier with value zero cannot have distinct singular and plural texts.
pub fn int_single(id: i64) -> i64 {
    id.saturating_abs()
}

/// Plural member of an integer identifier pair (`-abs(id)`).
pub fn int_plural(id: i64) -> i64 {
    -id.saturating_abs()
}

/// Pick the singular identifier when `count == 1`, the plural otherwise.
pub fn by_count<T: TextId>(id: &T, count: i64) -> T {
    if count != 1 {
        id.plural()
    } else {
        id.single()
    }
}

/// Render an integer code tagged with the module that defines `T`.
///
/// `level` walks up the module path: for `my_crate::errors::Code`, level 0
/// gives `errors-00001` and level 1 gives `my_crate-00001`.
pub fn coded_string<T: ?Sized + 'static>(code: i64, level: usize) -> String {
    let full = type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);

    let mut modules: Vec<&str> = path.split("::").collect();
    modules.pop();

    let keep = modules.len().saturating_sub(level);
    let name = modules[..keep].last().copied().unwrap_or(path);

    format!("{}-{:05}", name, code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct MsgId(i64);

    impl Keyed for MsgId {
        fn shape(&self) -> Shape {
            Shape::Int(self.0)
        }
    }

    impl TextId for MsgId {
        fn single(&self) -> Self {
            MsgId(int_single(self.0))
        }

        fn plural(&self) -> Self {
            MsgId(int_plural(self.0))
        }
    }

    impl fmt::Display for MsgId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    #[derive(Debug, Clone, Copy)]
    struct OtherId(i64);

    impl Keyed for OtherId {
        fn shape(&self) -> Shape {
            Shape::Int(self.0)
        }
    }

    struct CarId;

    // ==================== Integer Duality Tests ====================

    #[test]
    fn test_int_single() {
        assert_eq!(int_single(1), 1);
        assert_eq!(int_single(int_single(1)), 1);
        assert_eq!(int_single(int_plural(1)), 1);
    }

    #[test]
    fn test_int_plural() {
        assert_eq!(int_plural(1), -1);
        assert_eq!(int_plural(int_plural(1)), -1);
        assert_eq!(int_plural(int_single(1)), -1);
    }

    #[test]
    fn test_zero_is_its_own_dual() {
        // Singular and plural of zero share one key, so only one text can be stored
        let zero = MsgId(0);
        assert_eq!(zero.single(), zero.plural());
        assert_eq!(zero.single().text_key(), zero.plural().text_key());
    }

    #[test]
    fn test_int_extremes_do_not_overflow() {
        assert_eq!(int_single(i64::MIN), i64::MAX);
        assert_eq!(int_plural(i64::MIN), -i64::MAX);
    }

    // ==================== by_count Tests ====================

    #[test]
    fn test_by_count_zero_is_plural() {
        assert_eq!(by_count(&MsgId(1), 0), MsgId(-1));
    }

    #[test]
    fn test_by_count_one_is_single() {
        assert_eq!(by_count(&MsgId(-1), 1), MsgId(1));
    }

    #[test]
    fn test_by_count_two_is_plural() {
        assert_eq!(by_count(&MsgId(1), 2), MsgId(-1));
    }

    // ==================== Key Tests ====================

    #[test]
    fn test_keys_distinguish_types() {
        assert_ne!(MsgId(3).text_key(), OtherId(3).text_key());
        assert_eq!(MsgId(3).text_key(), MsgId(3).text_key());
    }

    #[test]
    fn test_key_through_trait_object_keeps_type() {
        let id = MsgId(5);
        let dynamic: &dyn TextId = &id;
        assert_eq!(dynamic.text_key(), id.text_key());
    }

    #[test]
    fn test_primitive_shapes() {
        assert_eq!(7i32.shape(), Shape::Int(7));
        assert_eq!(7u8.shape(), Shape::Uint(7));
        assert_eq!("car".shape(), Shape::Str(Cow::Borrowed("car")));
        assert_eq!(String::from("car").shape(), "car".shape());
    }

    #[test]
    fn test_shape_display() {
        let shape = Shape::Struct(vec![Shape::Int(-2), Shape::Str("x".into())]);
        assert_eq!(shape.to_string(), "{-2, x}");
    }

    #[test]
    fn test_key_display_includes_type() {
        let key = MsgId(4).text_key();
        assert!(key.to_string().ends_with("MsgId(4)"));
        assert_eq!(key.shape(), &Shape::Int(4));
    }

    // ==================== coded_string Tests ====================

    #[test]
    fn test_coded_string_levels() {
        assert_eq!(coded_string::<CarId>(1, 0), "tests-00001");
        assert_eq!(coded_string::<CarId>(1, 1), "text_id-00001");
        assert_eq!(coded_string::<CarId>(1, 2), "i18n-00001");
    }

    #[test]
    fn test_coded_string_without_module_path() {
        assert_eq!(coded_string::<i32>(12, 0), "i32-00012");
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_duality_is_symmetric(x in any::<i64>()) {
            let id = MsgId(x);
            prop_assert_eq!(id.single().plural(), id.plural());
            prop_assert_eq!(id.plural().single(), id.single());
            prop_assert_eq!(id.plural().plural(), id.plural());
            prop_assert_eq!(id.single().single(), id.single());
        }
    }
}
