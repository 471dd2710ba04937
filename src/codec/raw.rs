//! Verbatim subtrees kept for re-emission.

use super::decode::{Decoder, expect_end};
use super::encode::Encoder;
use crate::error::CodecError;
use crate::xml::{Attribute, Binding, QName, StartTag, Token};

/// An element nobody interprets, kept exactly as decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub bindings: Vec<Binding>,
    pub children: Vec<RawNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode {
    Element(RawElement),
    Text(String),
}

impl RawElement {
    pub fn new(name: impl Into<QName>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            bindings: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of an attribute by local name and namespace
    pub fn attribute(&self, name: crate::xml::StaticName) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| name.matches(&attribute.name))
            .map(|attribute| attribute.value.as_str())
    }

    /// Concatenated character data of this element and its descendants
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                RawNode::Text(chunk) => out.push_str(chunk),
                RawNode::Element(element) => element.collect_text(out),
            }
        }
    }

    pub(crate) fn read(start: StartTag, decoder: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let StartTag {
            name,
            attributes,
            bindings,
        } = start;
        let mut children = Vec::new();

        loop {
            match decoder.next_within(&name)? {
                Token::Start(child) => children.push(RawNode::Element(decoder.read_raw(child)?)),
                Token::Text(chunk) => match children.last_mut() {
                    Some(RawNode::Text(text)) => text.push_str(&chunk),
                    _ => children.push(RawNode::Text(chunk)),
                },
                Token::End(end) => {
                    expect_end(&name, &end)?;
                    break;
                }
            }
        }

        Ok(Self {
            name,
            attributes,
            bindings,
            children,
        })
    }

    pub(crate) fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), CodecError> {
        let tag = StartTag {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            bindings: self.bindings.clone(),
        };
        encoder.sink().start(tag)?;
        for child in &self.children {
            match child {
                RawNode::Element(element) => element.write(encoder)?,
                RawNode::Text(text) => encoder.sink().text(text)?,
            }
        }
        encoder.sink().end(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodeOptions;
    use crate::registry::ElementRegistry;
    use crate::xml::{TokenBuffer, XmlReader};

    #[test]
    fn raw_subtree_survives_round_trip() {
        let xml = r#"<ext uri="{X}"><x14:id xmlns:x14="urn:x14">7<b/>8</x14:id></ext>"#;
        let mut reader = XmlReader::from_str(xml);
        let registry = ElementRegistry::empty();
        let mut decoder = Decoder::new(&mut reader, &registry, DecodeOptions::default());
        let Token::Start(start) = decoder.next_within(&QName::unqualified("ext")).unwrap() else {
            panic!("expected start tag");
        };
        let raw = decoder.read_raw(start).unwrap();

        assert_eq!(raw.attribute(crate::xml::namespaces::attr("uri")), Some("{X}"));
        assert_eq!(raw.text(), "78");
        let RawNode::Element(inner) = &raw.children[0] else {
            panic!("expected element child");
        };
        assert_eq!(inner.name, QName::qualified("urn:x14", "id"));
        assert_eq!(inner.bindings[0].prefix, "x14");

        let mut buffer = TokenBuffer::new();
        raw.write(&mut Encoder::new(&mut buffer)).unwrap();
        assert_eq!(buffer.len(), 8);
    }
}
