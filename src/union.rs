//! Values with several alternative lexical encodings.
//!
//! A union keeps one `Option` slot per alternative. Parsing tries the
//! alternatives in declaration order and fills the first whose lexical space
//! accepts the token; a token no alternative accepts leaves every slot empty.
//! Rendering writes the single populated slot. More than one populated slot
//! can only come from direct construction and is reported by `validate`.

use crate::codec::scalar::Scalar;
use crate::enumeration::{EnumValue, SchemaEnum};
use regex::Regex;
use std::fmt;

/// One alternative of a union
pub trait UnionAlternative: Sized {
    /// `None` when the token is outside this alternative's lexical space
    fn parse_alternative(token: &str) -> Option<Self>;
    fn render_alternative(&self) -> String;
}

macro_rules! scalar_alternatives {
    ($($ty:ty),* $(,)?) => {
        $(
            impl UnionAlternative for $ty {
                fn parse_alternative(token: &str) -> Option<Self> {
                    <$ty as Scalar>::parse_scalar(token)
                }

                fn render_alternative(&self) -> String {
                    Scalar::render_scalar(self)
                }
            }
        )*
    };
}

scalar_alternatives!(String, bool, i32, i64, u8, u32, u64, f64);

impl<E: SchemaEnum> UnionAlternative for EnumValue<E> {
    fn parse_alternative(token: &str) -> Option<Self> {
        E::from_token(token).map(EnumValue::new)
    }

    fn render_alternative(&self) -> String {
        self.encode().unwrap_or_default().to_owned()
    }
}

/// Parse `token` as `A`, first requiring a full match of `pattern` if the
/// alternative declares one
pub fn parse_alternative<A: UnionAlternative>(token: &str, pattern: Option<&Regex>) -> Option<A> {
    if let Some(pattern) = pattern {
        if !pattern.is_match(token) {
            return None;
        }
    }
    A::parse_alternative(token)
}

/// Common face of every type declared with [`union_value!`](crate::union_value)
pub trait UnionValue: Default + Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Schema type name, e.g. `ST_OnOff`
    const NAME: &'static str;

    fn parse(token: &str) -> Self;

    /// Number of populated alternatives
    fn populated(&self) -> usize;

    /// Render the populated alternative; empty unless exactly one is populated
    fn render(&self) -> String;

    fn is_empty(&self) -> bool {
        self.populated() == 0
    }

    fn validate(&self) -> Result<(), String> {
        match self.populated() {
            0 | 1 => Ok(()),
            n => Err(format!(
                "{} has {} alternatives populated, at most one is allowed",
                Self::NAME,
                n
            )),
        }
    }
}

/// Declare a union of alternative encodings.
///
/// Each slot names its Rust type and may add a regular expression the token
/// has to match in full before the type's own conversion is tried.
///
/// ```rust,ignore
/// union_value! {
///     pub struct StHexColor("ST_HexColor") {
///         auto: EnumValue<StHexColorAuto>,
///         rgb: String = "[0-9A-Fa-f]{6}",
///     }
/// }
/// ```
#[macro_export]
macro_rules! union_value {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($schema:literal) {
            $( $(#[$slot_meta:meta])* $slot:ident : $ty:ty $(= $pattern:literal)? ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $( $(#[$slot_meta])* pub $slot: Option<$ty>, )+
        }

        impl $name {
            $(
                pub fn $slot(value: $ty) -> Self {
                    Self {
                        $slot: Some(value),
                        ..Self::default()
                    }
                }
            )+
        }

        impl $crate::union::UnionValue for $name {
            const NAME: &'static str = $schema;

            fn parse(token: &str) -> Self {
                $(
                    let pattern: Option<&$crate::__private::regex::Regex> =
                        $crate::union_value!(@pattern $($pattern)?);
                    if let Some(value) = $crate::union::parse_alternative::<$ty>(token, pattern) {
                        return Self::$slot(value);
                    }
                )+
                Self::default()
            }

            fn populated(&self) -> usize {
                0 $( + usize::from(self.$slot.is_some()) )+
            }

            fn render(&self) -> String {
                if self.populated() != 1 {
                    return String::new();
                }
                $(
                    if let Some(value) = &self.$slot {
                        return $crate::union::UnionAlternative::render_alternative(value);
                    }
                )+
                String::new()
            }
        }
    };
    (@pattern) => {
        None
    };
    (@pattern $pattern:literal) => {{
        static PATTERN: $crate::__private::once_cell::sync::Lazy<$crate::__private::regex::Regex> =
            $crate::__private::once_cell::sync::Lazy::new(|| {
                $crate::__private::regex::Regex::new(concat!("^(?:", $pattern, ")$"))
                    .expect("union alternative pattern is a valid regex")
            });
        Some(&*PATTERN)
    }};
}
