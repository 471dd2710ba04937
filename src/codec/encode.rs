//! The encode walk: attributes, children and text in document order.

use super::Aggregate;
use crate::error::CodecError;
use crate::xml::{Binding, QName, StartTag, TokenSink};

/// Writes aggregates to a token sink
pub struct Encoder<'a> {
    sink: &'a mut dyn TokenSink,
}

impl<'a> Encoder<'a> {
    pub fn new(sink: &'a mut dyn TokenSink) -> Self {
        Self { sink }
    }

    /// Emit `value` as an element called `name`
    pub fn encode_element<C: Aggregate>(
        &mut self,
        name: impl Into<QName>,
        value: &C,
    ) -> Result<(), CodecError> {
        self.encode_with_bindings(name.into(), value, Vec::new())
    }

    pub(crate) fn encode_with_bindings<C: Aggregate>(
        &mut self,
        name: QName,
        value: &C,
        bindings: Vec<Binding>,
    ) -> Result<(), CodecError> {
        let schema = C::schema();

        let mut tag = StartTag::new(name.clone());
        tag.bindings = bindings;
        for attribute in &schema.attributes {
            if let Some(encoded) = (attribute.encode)(value) {
                tag.push_attribute(attribute.name, encoded);
            }
        }
        self.sink.start(tag)?;

        for child in &schema.children {
            (child.encode)(value, self)?;
        }
        if let Some(text) = &schema.text {
            self.sink.text(&(text.encode)(value))?;
        }

        self.sink.end(&name)
    }

    pub(crate) fn sink(&mut self) -> &mut dyn TokenSink {
        &mut *self.sink
    }
}
