//! Open content: elements a schema type does not name statically.

use super::Aggregate;
use super::decode::Decoder;
use super::encode::Encoder;
use super::raw::RawElement;
use crate::error::CodecError;
use crate::validation::{ValidationError, ValidationPath};
use crate::xml::{QName, StartTag};
use std::any::Any;
use std::fmt;

/// Object-safe face of [`Aggregate`], used for registry-constructed content
pub trait DynAggregate: fmt::Debug + Send + Sync {
    /// Schema type name of the concrete aggregate
    fn type_name(&self) -> &'static str;
    fn decode_dyn(&mut self, start: StartTag, decoder: &mut Decoder<'_>) -> Result<(), CodecError>;
    fn encode_dyn(&self, name: &QName, encoder: &mut Encoder<'_>) -> Result<(), CodecError>;
    fn validate_dyn(&self, path: &mut ValidationPath) -> Result<(), ValidationError>;
    fn clone_box(&self) -> Box<dyn DynAggregate>;
    fn eq_dyn(&self, other: &dyn DynAggregate) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Aggregate> DynAggregate for T {
    fn type_name(&self) -> &'static str {
        T::schema().name()
    }

    fn decode_dyn(&mut self, start: StartTag, decoder: &mut Decoder<'_>) -> Result<(), CodecError> {
        decoder.decode_into(self, start)
    }

    fn encode_dyn(&self, name: &QName, encoder: &mut Encoder<'_>) -> Result<(), CodecError> {
        encoder.encode_element(name.clone(), self)
    }

    fn validate_dyn(&self, path: &mut ValidationPath) -> Result<(), ValidationError> {
        self.validate_at(path)
    }

    fn clone_box(&self) -> Box<dyn DynAggregate> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn DynAggregate) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn DynAggregate {
    pub fn downcast_ref<T: Aggregate>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Aggregate>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

impl Clone for Box<dyn DynAggregate> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl PartialEq for dyn DynAggregate {
    fn eq(&self, other: &Self) -> bool {
        self.eq_dyn(other)
    }
}

/// What an open-content slot does with elements the registry cannot resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    /// Discard the subtree and record a diagnostic
    Skip,
    /// Keep the subtree verbatim and write it back out
    Preserve,
}

/// Handling of one open-content slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenContent {
    /// Try the element registry first
    pub resolve: bool,
    pub unresolved: Unresolved,
}

impl OpenContent {
    /// Registry-resolved content, unknown elements skipped
    pub const fn resolved() -> Self {
        Self {
            resolve: true,
            unresolved: Unresolved::Skip,
        }
    }

    /// Extension-list style content, kept verbatim and never interpreted
    pub const fn preserved() -> Self {
        Self {
            resolve: false,
            unresolved: Unresolved::Preserve,
        }
    }

    pub const fn preserve_unresolved(mut self) -> Self {
        self.unresolved = Unresolved::Preserve;
        self
    }
}

/// One element held by an open-content slot
#[derive(Debug, Clone, PartialEq)]
pub enum AnyElement {
    /// Constructed through the element registry and owned here
    Typed {
        name: QName,
        value: Box<dyn DynAggregate>,
    },
    Raw(RawElement),
}

impl AnyElement {
    pub fn typed<T: Aggregate>(name: impl Into<QName>, value: T) -> Self {
        AnyElement::Typed {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn name(&self) -> &QName {
        match self {
            AnyElement::Typed { name, .. } => name,
            AnyElement::Raw(raw) => &raw.name,
        }
    }

    pub fn downcast_ref<T: Aggregate>(&self) -> Option<&T> {
        match self {
            AnyElement::Typed { value, .. } => value.downcast_ref(),
            AnyElement::Raw(_) => None,
        }
    }
}

/// Ordered contents of an open-content slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnyContent {
    elements: Vec<AnyElement>,
}

impl AnyContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: AnyElement) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnyElement> {
        self.elements.iter()
    }

    /// Typed members of the given aggregate type
    pub fn typed<T: Aggregate>(&self) -> impl Iterator<Item = &T> {
        self.elements.iter().filter_map(AnyElement::downcast_ref::<T>)
    }

    pub fn raw(&self) -> impl Iterator<Item = &RawElement> {
        self.elements.iter().filter_map(|element| match element {
            AnyElement::Raw(raw) => Some(raw),
            AnyElement::Typed { .. } => None,
        })
    }

    pub(crate) fn encode(&self, encoder: &mut Encoder<'_>) -> Result<(), CodecError> {
        self.elements.iter().try_for_each(|element| match element {
            AnyElement::Typed { name, value } => value.encode_dyn(name, encoder),
            AnyElement::Raw(raw) => raw.write(encoder),
        })
    }

    /// Typed members are validated, preserved raw content is not
    pub(crate) fn validate_at(&self, path: &mut ValidationPath) -> Result<(), ValidationError> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                AnyElement::Typed { name, value } => Some((name, value)),
                AnyElement::Raw(_) => None,
            })
            .try_for_each(|(name, value)| path.scoped(name.local.clone(), |path| value.validate_dyn(path)))
    }
}

impl From<Vec<AnyElement>> for AnyContent {
    fn from(elements: Vec<AnyElement>) -> Self {
        Self { elements }
    }
}
