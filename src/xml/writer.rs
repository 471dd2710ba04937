use super::names::QName;
use super::namespaces::{self, canonical_prefix};
use super::{Binding, StartTag, TokenSink};
use crate::error::CodecError;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

struct Scope {
    name: QName,
    qualified: String,
    bindings: Vec<Binding>,
}

/// Push writer turning tokens into XML text.
///
/// Prefixes are assigned here: the canonical prefix of a known namespace, or
/// a generated `nsN` prefix otherwise. A namespace is declared on the first
/// element that needs it unless an enclosing element already bound it.
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    /// Start tag held back until we know whether the element has content
    pending: Option<BytesStart<'static>>,
    open: Vec<Scope>,
    generated: usize,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::from_writer(Writer::new(inner))
    }

    pub fn with_indent(inner: W, indent: usize) -> Self {
        Self::from_writer(Writer::new_with_indent(inner, b' ', indent))
    }

    fn from_writer(writer: Writer<W>) -> Self {
        Self {
            writer,
            pending: None,
            open: Vec::new(),
            generated: 0,
        }
    }

    /// Write the `<?xml ...?>` declaration Office applications emit
    pub fn write_declaration(&mut self) -> Result<(), CodecError> {
        self.writer.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some("UTF-8"),
            Some("yes"),
        )))?;
        Ok(())
    }

    /// Flush any held start tag and hand back the underlying writer
    pub fn finish(mut self) -> Result<W, CodecError> {
        self.flush_pending()?;
        Ok(self.writer.into_inner())
    }

    fn flush_pending(&mut self) -> Result<(), CodecError> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }

    /// Namespace currently bound to `prefix`, innermost scope first
    fn bound_uri(&self, prefix: &str) -> Option<&str> {
        self.open
            .iter()
            .rev()
            .flat_map(|scope| scope.bindings.iter().rev())
            .find(|binding| binding.prefix == prefix)
            .map(|binding| binding.uri.as_str())
    }

    /// A prefix usable for `uri`; attributes cannot use the default namespace
    fn bound_prefix(&self, uri: &str, attribute: bool) -> Option<String> {
        self.open
            .iter()
            .rev()
            .flat_map(|scope| scope.bindings.iter().rev())
            .filter(|binding| binding.uri == uri)
            .filter(|binding| !(attribute && binding.prefix.is_empty()))
            .find(|binding| self.bound_uri(&binding.prefix) == Some(uri))
            .map(|binding| binding.prefix.clone())
    }

    fn declare(&mut self, prefix: String, uri: &str) {
        if let Some(scope) = self.open.last_mut() {
            scope.bindings.push(Binding::new(prefix, uri));
        }
    }

    fn qualify(&mut self, name: &QName, attribute: bool) -> String {
        let Some(uri) = name.namespace() else {
            if !attribute && self.bound_uri("").is_some_and(|uri| !uri.is_empty()) {
                self.declare(String::new(), "");
            }
            return name.local.clone();
        };

        if uri == namespaces::XML {
            return format!("xml:{}", name.local);
        }

        let prefix = match self.bound_prefix(uri, attribute) {
            Some(prefix) => prefix,
            None => {
                let prefix = match canonical_prefix(uri) {
                    Some(prefix) if self.bound_uri(prefix).is_none() => prefix.to_owned(),
                    _ => loop {
                        let candidate = format!("ns{}", self.generated);
                        self.generated += 1;
                        if self.bound_uri(&candidate).is_none() {
                            break candidate;
                        }
                    },
                };
                self.declare(prefix.clone(), uri);
                prefix
            }
        };

        if prefix.is_empty() {
            name.local.clone()
        } else {
            format!("{}:{}", prefix, name.local)
        }
    }
}

impl<W: Write> TokenSink for XmlWriter<W> {
    fn start(&mut self, tag: StartTag) -> Result<(), CodecError> {
        self.flush_pending()?;

        self.open.push(Scope {
            name: tag.name.clone(),
            qualified: String::new(),
            bindings: tag.bindings,
        });

        let qualified = self.qualify(&tag.name, false);
        let attributes = tag
            .attributes
            .iter()
            .map(|attr| (self.qualify(&attr.name, true), attr.value.as_str()))
            .collect::<Vec<_>>();

        let mut start = BytesStart::new(qualified.clone());
        if let Some(scope) = self.open.last_mut() {
            scope.qualified = qualified;
            for binding in &scope.bindings {
                let key = if binding.prefix.is_empty() {
                    "xmlns".to_owned()
                } else {
                    format!("xmlns:{}", binding.prefix)
                };
                start.push_attribute((key.as_str(), binding.uri.as_str()));
            }
        }
        for (key, value) in &attributes {
            start.push_attribute((key.as_str(), *value));
        }

        self.pending = Some(start);
        Ok(())
    }

    fn end(&mut self, name: &QName) -> Result<(), CodecError> {
        let scope = self.open.pop().ok_or_else(|| CodecError::MismatchedEnd {
            expected: String::new(),
            found: name.to_string(),
        })?;
        if &scope.name != name {
            return Err(CodecError::MismatchedEnd {
                expected: scope.name.to_string(),
                found: name.to_string(),
            });
        }

        match self.pending.take() {
            Some(start) => self.writer.write_event(Event::Empty(start))?,
            None => self
                .writer
                .write_event(Event::End(BytesEnd::new(scope.qualified)))?,
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), CodecError> {
        if text.is_empty() {
            return Ok(());
        }
        self.flush_pending()?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }
}
