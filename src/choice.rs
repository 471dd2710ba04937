//! "One of N" child elements as sum types.
//!
//! A choice group is an enum with one variant per branch element, so a field
//! of type `Option<C>` holds at most one branch by construction. When a
//! document carries several branches of the same group, each one decoded
//! replaces the previous and the last wins.

use crate::codec::{Decoder, Encoder};
use crate::error::CodecError;
use crate::validation::{ValidationError, ValidationPath};
use crate::xml::{StartTag, StaticName};
use std::fmt::Debug;

/// Common face of every type declared with [`choice_group!`](crate::choice_group)
pub trait ChoiceGroup: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Schema group name, e.g. `EG_TextAutofit`
    const NAME: &'static str;

    /// Branch element names in declaration order
    fn branches() -> &'static [StaticName];

    /// Element name of the populated branch
    fn branch(&self) -> StaticName;

    /// Decode the branch opened by `start`; `None` if it names no branch
    fn decode_branch(start: StartTag, decoder: &mut Decoder<'_>) -> Result<Option<Self>, CodecError>;

    fn encode_branch(&self, encoder: &mut Encoder<'_>) -> Result<(), CodecError>;

    /// Validate the populated branch; `path` already names it
    fn validate_branch(&self, path: &mut ValidationPath) -> Result<(), ValidationError>;
}

/// Declare a choice group.
///
/// ```rust,ignore
/// choice_group! {
///     pub enum EgTextAutofit("EG_TextAutofit") {
///         NoAutofit(a("noAutofit") => CtEmpty),
///         NormAutofit(a("normAutofit") => CtTextNormalAutofit),
///         SpAutoFit(a("spAutoFit") => CtEmpty),
///     }
/// }
/// ```
#[macro_export]
macro_rules! choice_group {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($schema:literal) {
            $( $(#[$variant_meta:meta])* $variant:ident($element:expr => $ty:ty) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant($ty), )+
        }

        impl $crate::choice::ChoiceGroup for $name {
            const NAME: &'static str = $schema;

            fn branches() -> &'static [$crate::xml::StaticName] {
                static BRANCHES: &[$crate::xml::StaticName] = &[$($element),+];
                BRANCHES
            }

            fn branch(&self) -> $crate::xml::StaticName {
                match self {
                    $( Self::$variant(_) => $element, )+
                }
            }

            fn decode_branch(
                start: $crate::xml::StartTag,
                decoder: &mut $crate::codec::Decoder<'_>,
            ) -> Result<Option<Self>, $crate::error::CodecError> {
                $(
                    if $element.matches(&start.name) {
                        return decoder.decode_element::<$ty>(start).map(|value| Some(Self::$variant(value)));
                    }
                )+
                Ok(None)
            }

            fn encode_branch(
                &self,
                encoder: &mut $crate::codec::Encoder<'_>,
            ) -> Result<(), $crate::error::CodecError> {
                match self {
                    $( Self::$variant(value) => encoder.encode_element($element, value), )+
                }
            }

            fn validate_branch(
                &self,
                path: &mut $crate::validation::ValidationPath,
            ) -> Result<(), $crate::validation::ValidationError> {
                match self {
                    $( Self::$variant(value) => $crate::codec::Aggregate::validate_at(value, path), )+
                }
            }
        }
    };
}
