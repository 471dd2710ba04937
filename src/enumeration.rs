//! Closed token sets mapped to small integer codes.
//!
//! Every schema enumeration is declared with [`schema_enum!`](crate::schema_enum),
//! which numbers the named values from 1. Fields hold an [`EnumValue`], whose
//! code 0 is the reserved "unset" state: it is what an unrecognised token
//! decodes to and it is never written out.

use std::fmt;
use std::marker::PhantomData;

/// A closed set of schema tokens
pub trait SchemaEnum: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Schema type name, e.g. `ST_Jc`
    const NAME: &'static str;

    fn code(self) -> u8;
    fn from_code(code: u8) -> Option<Self>;
    fn token(self) -> &'static str;
    fn from_token(token: &str) -> Option<Self>;
}

/// Declare a schema enumeration.
///
/// ```rust,ignore
/// schema_enum! {
///     /// Horizontal alignment
///     pub enum StJc("ST_Jc") {
///         Start = "start",
///         Center = "center",
///         End = "end",
///     }
/// }
/// ```
#[macro_export]
macro_rules! schema_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($schema:literal) {
            $(#[$first_meta:meta])*
            $first:ident = $first_token:literal
            $(, $(#[$variant_meta:meta])* $variant:ident = $token:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::strum::EnumIter,
            ::strum::EnumString,
            ::strum::IntoStaticStr,
            ::strum::Display,
        )]
        #[repr(u8)]
        $vis enum $name {
            $(#[$first_meta])*
            #[strum(serialize = $first_token)]
            $first = 1,
            $(
                $(#[$variant_meta])*
                #[strum(serialize = $token)]
                $variant,
            )*
        }

        impl $crate::enumeration::SchemaEnum for $name {
            const NAME: &'static str = $schema;

            fn code(self) -> u8 {
                self as u8
            }

            fn from_code(code: u8) -> Option<Self> {
                <Self as ::strum::IntoEnumIterator>::iter().find(|value| *value as u8 == code)
            }

            fn token(self) -> &'static str {
                self.into()
            }

            fn from_token(token: &str) -> Option<Self> {
                token.parse().ok()
            }
        }
    };
}

/// Enumeration field value: a named value or unset
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue<E> {
    code: u8,
    _marker: PhantomData<fn() -> E>,
}

impl<E: SchemaEnum> EnumValue<E> {
    pub const UNSET_CODE: u8 = 0;

    pub const fn unset() -> Self {
        Self {
            code: Self::UNSET_CODE,
            _marker: PhantomData,
        }
    }

    pub fn new(value: E) -> Self {
        Self::from_code(value.code())
    }

    /// Wrap a raw code without checking it belongs to the set
    pub const fn from_code(code: u8) -> Self {
        Self {
            code,
            _marker: PhantomData,
        }
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn get(&self) -> Option<E> {
        E::from_code(self.code)
    }

    pub fn is_set(&self) -> bool {
        self.code != Self::UNSET_CODE
    }

    /// Unrecognised tokens decode to unset
    pub fn decode(token: &str) -> Self {
        E::from_token(token).map(Self::new).unwrap_or_else(Self::unset)
    }

    /// Token to write, `None` when unset so the attribute is left out
    pub fn encode(&self) -> Option<&'static str> {
        self.get().map(E::token)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.code == Self::UNSET_CODE || E::from_code(self.code).is_some() {
            Ok(())
        } else {
            Err(format!("code {} is not a member of {}", self.code, E::NAME))
        }
    }
}

impl<E: SchemaEnum> Default for EnumValue<E> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<E: SchemaEnum> From<E> for EnumValue<E> {
    fn from(value: E) -> Self {
        Self::new(value)
    }
}

impl<E: SchemaEnum> fmt::Debug for EnumValue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_set(), self.get()) {
            (false, _) => write!(f, "{}::<unset>", E::NAME),
            (true, Some(value)) => write!(f, "{}::{:?}", E::NAME, value),
            (true, None) => write!(f, "{}::<invalid {}>", E::NAME, self.code),
        }
    }
}
