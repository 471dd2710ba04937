//! Per-type descriptor tables.
//!
//! A [`Schema`] lists the attributes, children, text and open content of one
//! schema type in document order. Each descriptor carries the closures that
//! decode, encode and validate its field, so the decode and encode loops stay
//! generic over every aggregate.

use super::Aggregate;
use super::any::{AnyContent, OpenContent};
use super::decode::{Decoder, DiagnosticKind};
use super::encode::Encoder;
use super::scalar::Scalar;
use crate::choice::ChoiceGroup;
use crate::enumeration::{EnumValue, SchemaEnum};
use crate::error::CodecError;
use crate::union::UnionValue;
use crate::validation::{Facet, ValidationError, ValidationPath};
use crate::xml::names::NameIndex;
use crate::xml::{StartTag, StaticName};
use ahash::AHashMap;

/// Field accessor pair used by the descriptor tables.
///
/// Built with [`lens!`](crate::lens) from a field name.
pub struct Lens<T, F> {
    pub get: fn(&T) -> &F,
    pub get_mut: fn(&mut T) -> &mut F,
}

impl<T, F> Clone for Lens<T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, F> Copy for Lens<T, F> {}

/// `lens!(field)` expands to the accessor pair for `field`
#[macro_export]
macro_rules! lens {
    ($field:ident) => {
        $crate::codec::Lens {
            get: |value| &value.$field,
            get_mut: |value| &mut value.$field,
        }
    };
}

/// Implement [`Aggregate`] from a builder expression.
///
/// ```rust,ignore
/// aggregate!(CtMergeCell, "CT_MergeCell", |schema| schema
///     .required_attribute(attr("ref"), lens!(reference))
///     .facet(Facet::Pattern(&CELL_RANGE)));
/// ```
#[macro_export]
macro_rules! aggregate {
    ($ty:ty, $name:literal, |$builder:ident| $body:expr) => {
        impl $crate::codec::Aggregate for $ty {
            fn schema() -> &'static $crate::codec::Schema<Self> {
                static SCHEMA: $crate::__private::once_cell::sync::Lazy<$crate::codec::Schema<$ty>> =
                    $crate::__private::once_cell::sync::Lazy::new(|| {
                        let $builder = $crate::codec::Schema::<$ty>::builder($name);
                        ($body).build()
                    });
                &SCHEMA
            }
        }
    };
}

type DecodeAttribute<T> =
    Box<dyn Fn(&mut T, &str, &mut Decoder<'_>) -> Result<(), CodecError> + Send + Sync>;
type EncodeValue<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;
type CheckValue<T> = Box<dyn Fn(&T) -> Result<(), String> + Send + Sync>;
type DecodeChild<T> =
    Box<dyn Fn(&mut T, StartTag, &mut Decoder<'_>) -> Result<(), CodecError> + Send + Sync>;
type EncodeChild<T> = Box<dyn Fn(&T, &mut Encoder<'_>) -> Result<(), CodecError> + Send + Sync>;
type ValidateChild<T> =
    Box<dyn Fn(&T, &mut ValidationPath) -> Result<(), ValidationError> + Send + Sync>;
type DecodeText<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CodecError> + Send + Sync>;

pub(crate) struct AttributeField<T> {
    pub(crate) name: StaticName,
    pub(crate) decode: DecodeAttribute<T>,
    pub(crate) encode: EncodeValue<T>,
    check: CheckValue<T>,
    facets: Vec<Facet>,
}

impl<T> AttributeField<T> {
    fn new(
        name: StaticName,
        decode: impl Fn(&mut T, &str, &mut Decoder<'_>) -> Result<(), CodecError>
        + Send
        + Sync
        + 'static,
        encode: impl Fn(&T) -> Option<String> + Send + Sync + 'static,
        check: impl Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            decode: Box::new(decode),
            encode: Box::new(encode),
            check: Box::new(check),
            facets: Vec::new(),
        }
    }

    pub(crate) fn validate(&self, value: &T) -> Result<(), String> {
        (self.check)(value)?;
        if let Some(encoded) = (self.encode)(value) {
            for facet in &self.facets {
                facet.check(&encoded)?;
            }
        }
        Ok(())
    }
}

pub(crate) struct ChildField<T> {
    /// Element names routed to this field; empty for open content
    pub(crate) names: Vec<StaticName>,
    pub(crate) decode: DecodeChild<T>,
    pub(crate) encode: EncodeChild<T>,
    pub(crate) validate: ValidateChild<T>,
}

impl<T> ChildField<T> {
    fn new(
        names: Vec<StaticName>,
        decode: impl Fn(&mut T, StartTag, &mut Decoder<'_>) -> Result<(), CodecError>
        + Send
        + Sync
        + 'static,
        encode: impl Fn(&T, &mut Encoder<'_>) -> Result<(), CodecError> + Send + Sync + 'static,
        validate: impl Fn(&T, &mut ValidationPath) -> Result<(), ValidationError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            names,
            decode: Box::new(decode),
            encode: Box::new(encode),
            validate: Box::new(validate),
        }
    }
}

pub(crate) struct TextField<T> {
    pub(crate) decode: DecodeText<T>,
    pub(crate) encode: Box<dyn Fn(&T) -> String + Send + Sync>,
    facets: Vec<Facet>,
}

impl<T> TextField<T> {
    pub(crate) fn validate(&self, value: &T) -> Result<(), String> {
        let encoded = (self.encode)(value);
        for facet in &self.facets {
            facet.check(&encoded)?;
        }
        Ok(())
    }
}

/// Descriptor table of one schema type
pub struct Schema<T> {
    name: &'static str,
    pub(crate) attributes: Vec<AttributeField<T>>,
    attribute_index: NameIndex<usize>,
    pub(crate) children: Vec<ChildField<T>>,
    child_index: NameIndex<usize>,
    pub(crate) open: Option<usize>,
    pub(crate) text: Option<TextField<T>>,
}

impl<T: Aggregate> Schema<T> {
    pub fn builder(name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            schema: Schema {
                name,
                attributes: Vec::new(),
                attribute_index: NameIndex::default(),
                children: Vec::new(),
                child_index: NameIndex::default(),
                open: None,
                text: None,
            },
            facet_target: None,
        }
    }
}

impl<T> Schema<T> {
    /// Schema type name, e.g. `CT_Row`
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = StaticName> + '_ {
        self.attributes.iter().map(|attribute| attribute.name)
    }

    /// Child element names in document order, choice branches included
    pub fn child_names(&self) -> impl Iterator<Item = StaticName> + '_ {
        self.children.iter().flat_map(|child| child.names.iter().copied())
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn has_open_content(&self) -> bool {
        self.open.is_some()
    }

    pub(crate) fn attribute(&self, name: &crate::xml::QName) -> Option<&AttributeField<T>> {
        self.attribute_index
            .lookup(name)
            .map(|&index| &self.attributes[index])
    }

    pub(crate) fn child(&self, name: &crate::xml::QName) -> Option<&ChildField<T>> {
        self.child_index.lookup(name).map(|&index| &self.children[index])
    }
}

enum FacetTarget {
    Attribute(usize),
    Text,
}

/// Builder for a [`Schema`]; descriptors are added in document order
pub struct SchemaBuilder<T> {
    schema: Schema<T>,
    facet_target: Option<FacetTarget>,
}

impl<T: Aggregate> SchemaBuilder<T> {
    fn push_attribute(mut self, field: AttributeField<T>) -> Self {
        let index = self.schema.attributes.len();
        let previous = self.schema.attribute_index.insert(field.name, index);
        debug_assert!(
            previous.is_none(),
            "{}: attribute {} declared twice",
            self.schema.name,
            field.name
        );
        self.schema.attributes.push(field);
        self.facet_target = Some(FacetTarget::Attribute(index));
        self
    }

    fn push_child(mut self, field: ChildField<T>) -> Self {
        let index = self.schema.children.len();
        for name in &field.names {
            let previous = self.schema.child_index.insert(*name, index);
            debug_assert!(
                previous.is_none(),
                "{}: child {} declared twice",
                self.schema.name,
                name
            );
        }
        self.schema.children.push(field);
        self.facet_target = None;
        self
    }

    /// Mandatory scalar attribute; absent means the default, always written
    pub fn required_attribute<S: Scalar>(self, name: StaticName, lens: Lens<T, S>) -> Self {
        let Lens { get, get_mut } = lens;
        self.push_attribute(AttributeField::new(
            name,
            move |value, raw, _| {
                *get_mut(value) = S::parse_scalar(raw)
                    .ok_or_else(|| CodecError::invalid_scalar(name.local, raw, S::KIND))?;
                Ok(())
            },
            move |value| Some(get(value).render_scalar()),
            |_| Ok(()),
        ))
    }

    pub fn optional_attribute<S: Scalar>(self, name: StaticName, lens: Lens<T, Option<S>>) -> Self {
        let Lens { get, get_mut } = lens;
        self.push_attribute(AttributeField::new(
            name,
            move |value, raw, _| {
                let parsed = S::parse_scalar(raw)
                    .ok_or_else(|| CodecError::invalid_scalar(name.local, raw, S::KIND))?;
                *get_mut(value) = Some(parsed);
                Ok(())
            },
            move |value| get(value).as_ref().map(Scalar::render_scalar),
            |_| Ok(()),
        ))
    }

    /// Whitespace-separated list attribute; an empty list is not written
    pub fn list_attribute<S: Scalar>(self, name: StaticName, lens: Lens<T, Vec<S>>) -> Self {
        let Lens { get, get_mut } = lens;
        self.push_attribute(AttributeField::new(
            name,
            move |value, raw, _| {
                let items = raw
                    .split_ascii_whitespace()
                    .map(|item| {
                        S::parse_scalar(item)
                            .ok_or_else(|| CodecError::invalid_scalar(name.local, item, S::KIND))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                *get_mut(value) = items;
                Ok(())
            },
            move |value| {
                let items = get(value);
                (!items.is_empty()).then(|| {
                    items
                        .iter()
                        .map(Scalar::render_scalar)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
            },
            |_| Ok(()),
        ))
    }

    /// Enumeration attribute; unknown tokens decode to unset with a diagnostic
    pub fn enum_attribute<E: SchemaEnum>(self, name: StaticName, lens: Lens<T, EnumValue<E>>) -> Self {
        let Lens { get, get_mut } = lens;
        self.push_attribute(AttributeField::new(
            name,
            move |value, raw, decoder| {
                let decoded = EnumValue::<E>::decode(raw);
                *get_mut(value) = decoded;
                if !decoded.is_set() {
                    decoder.report(
                        DiagnosticKind::UnknownEnumToken,
                        None,
                        format!("{}=\"{}\" is not a member of {}", name.local, raw, E::NAME),
                    )?;
                }
                Ok(())
            },
            move |value| get(value).encode().map(str::to_owned),
            move |value| get(value).validate(),
        ))
    }

    /// Union attribute; a token no alternative accepts leaves the field absent
    pub fn union_attribute<U: UnionValue>(self, name: StaticName, lens: Lens<T, Option<U>>) -> Self {
        let Lens { get, get_mut } = lens;
        self.push_attribute(AttributeField::new(
            name,
            move |value, raw, decoder| {
                let parsed = U::parse(raw);
                if parsed.is_empty() {
                    *get_mut(value) = None;
                    decoder.report(
                        DiagnosticKind::UnmatchedUnion,
                        None,
                        format!("{}=\"{}\" matches no alternative of {}", name.local, raw, U::NAME),
                    )?;
                } else {
                    *get_mut(value) = Some(parsed);
                }
                Ok(())
            },
            move |value| {
                get(value)
                    .as_ref()
                    .map(UnionValue::render)
                    .filter(|rendered| !rendered.is_empty())
            },
            move |value| get(value).as_ref().map_or(Ok(()), UnionValue::validate),
        ))
    }

    /// Mandatory nested aggregate, constructed eagerly
    pub fn child<C: Aggregate>(self, name: StaticName, lens: Lens<T, C>) -> Self {
        let Lens { get, get_mut } = lens;
        self.push_child(ChildField::new(
            vec![name],
            move |value, start, decoder| {
                *get_mut(value) = decoder.decode_element(start)?;
                Ok(())
            },
            move |value, encoder| encoder.encode_element(name, get(value)),
            move |value, path| path.scoped(name.local, |path| get(value).validate_at(path)),
        ))
    }

    pub fn optional_child<C: Aggregate>(self, name: StaticName, lens: Lens<T, Option<C>>) -> Self {
        let Lens { get, get_mut } = lens;
        self.push_child(ChildField::new(
            vec![name],
            move |value, start, decoder| {
                *get_mut(value) = Some(decoder.decode_element(start)?);
                Ok(())
            },
            move |value, encoder| match get(value) {
                Some(child) => encoder.encode_element(name, child),
                None => Ok(()),
            },
            move |value, path| match get(value) {
                Some(child) => path.scoped(name.local, |path| child.validate_at(path)),
                None => Ok(()),
            },
        ))
    }

    /// Repeated nested aggregate, kept in document order
    pub fn children<C: Aggregate>(self, name: StaticName, lens: Lens<T, Vec<C>>) -> Self {
        let Lens { get, get_mut } = lens;
        self.push_child(ChildField::new(
            vec![name],
            move |value, start, decoder| {
                let child = decoder.decode_element(start)?;
                get_mut(value).push(child);
                Ok(())
            },
            move |value, encoder| {
                get(value)
                    .iter()
                    .try_for_each(|child| encoder.encode_element(name, child))
            },
            move |value, path| {
                get(value).iter().enumerate().try_for_each(|(index, child)| {
                    path.scoped(format!("{}[{}]", name.local, index), |path| {
                        child.validate_at(path)
                    })
                })
            },
        ))
    }

    /// Single choice group; a later branch replaces an earlier one
    pub fn choice<C: ChoiceGroup>(self, lens: Lens<T, Option<C>>) -> Self {
        let Lens { get, get_mut } = lens;
        self.push_child(ChildField::new(
            C::branches().to_vec(),
            move |value, start, decoder| {
                if let Some(branch) = C::decode_branch(start, decoder)? {
                    *get_mut(value) = Some(branch);
                }
                Ok(())
            },
            move |value, encoder| match get(value) {
                Some(branch) => branch.encode_branch(encoder),
                None => Ok(()),
            },
            move |value, path| match get(value) {
                Some(branch) => path.scoped(branch.branch().local, |path| branch.validate_branch(path)),
                None => Ok(()),
            },
        ))
    }

    /// Repeated choice group keeping the interleaved order of its branches
    pub fn choices<C: ChoiceGroup>(self, lens: Lens<T, Vec<C>>) -> Self {
        let Lens { get, get_mut } = lens;
        self.push_child(ChildField::new(
            C::branches().to_vec(),
            move |value, start, decoder| {
                if let Some(branch) = C::decode_branch(start, decoder)? {
                    get_mut(value).push(branch);
                }
                Ok(())
            },
            move |value, encoder| {
                get(value)
                    .iter()
                    .try_for_each(|branch| branch.encode_branch(encoder))
            },
            move |value, path| {
                // indexed per branch element, so `[sp, pic, sp]` yields sp[0], pic[0], sp[1]
                let mut seen: AHashMap<StaticName, usize> = AHashMap::new();
                get(value).iter().try_for_each(|branch| {
                    let name = branch.branch();
                    let index = seen.entry(name).or_insert(0);
                    let segment = format!("{}[{}]", name.local, index);
                    *index += 1;
                    path.scoped(segment, |path| branch.validate_branch(path))
                })
            },
        ))
    }

    /// Character content of a text-leaf aggregate
    pub fn text<S: Scalar>(mut self, lens: Lens<T, S>) -> Self {
        let Lens { get, get_mut } = lens;
        let type_name = self.schema.name;
        self.schema.text = Some(TextField {
            decode: Box::new(move |value, text| {
                // empty content keeps the default rather than failing conversion
                if text.is_empty() {
                    return Ok(());
                }
                *get_mut(value) = S::parse_scalar(text)
                    .ok_or_else(|| CodecError::invalid_scalar(type_name, text, S::KIND))?;
                Ok(())
            }),
            encode: Box::new(move |value| get(value).render_scalar()),
            facets: Vec::new(),
        });
        self.facet_target = Some(FacetTarget::Text);
        self
    }

    /// Slot for elements the schema does not name statically
    pub fn open_content(self, lens: Lens<T, AnyContent>, policy: OpenContent) -> Self {
        let Lens { get, get_mut } = lens;
        let index = self.schema.children.len();
        let mut builder = self.push_child(ChildField::new(
            Vec::new(),
            move |value, start, decoder| decoder.decode_open(get_mut(value), start, policy),
            move |value, encoder| get(value).encode(encoder),
            move |value, path| get(value).validate_at(path),
        ));
        builder.schema.open = Some(index);
        builder
    }

    /// Constrain the most recently added attribute or text field
    pub fn facet(mut self, facet: Facet) -> Self {
        match self.facet_target {
            Some(FacetTarget::Attribute(index)) => self.schema.attributes[index].facets.push(facet),
            Some(FacetTarget::Text) => {
                if let Some(text) = self.schema.text.as_mut() {
                    text.facets.push(facet);
                }
            }
            None => debug_assert!(
                false,
                "{}: facet added without a preceding attribute or text field",
                self.schema.name
            ),
        }
        self
    }

    pub fn build(self) -> Schema<T> {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::namespaces::{attr, x};
    use once_cell::sync::Lazy;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct CtGauge {
        idx: u32,
        label: Option<String>,
        items: Vec<CtGauge>,
    }

    impl Aggregate for CtGauge {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: Lazy<Schema<CtGauge>> = Lazy::new(|| {
                Schema::<CtGauge>::builder("CT_Gauge")
                    .required_attribute(attr("idx"), crate::lens!(idx))
                    .facet(Facet::MaxInclusive(10.0))
                    .optional_attribute(attr("label"), crate::lens!(label))
                    .children(x("item"), crate::lens!(items))
                    .build()
            });
            &SCHEMA
        }
    }

    #[test]
    fn builder_records_document_order() {
        let schema = CtGauge::schema();
        assert_eq!(schema.name(), "CT_Gauge");
        let attributes = schema.attribute_names().map(|n| n.local).collect::<Vec<_>>();
        assert_eq!(attributes, ["idx", "label"]);
        assert_eq!(schema.child_names().collect::<Vec<_>>(), [x("item")]);
        assert!(!schema.has_text());
        assert!(!schema.has_open_content());
    }

    #[test]
    fn facets_apply_to_encoded_value() {
        let schema = CtGauge::schema();
        let mut gauge = CtGauge {
            idx: 11,
            ..Default::default()
        };
        let idx = &schema.attributes[0];
        assert!(idx.validate(&gauge).is_err());
        gauge.idx = 10;
        assert!(idx.validate(&gauge).is_ok());
    }
}
