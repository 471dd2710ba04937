use super::names::QName;
use super::namespaces;
use super::{Attribute, Binding, StartTag, Token, TokenSource};
use crate::error::CodecError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::io::BufRead;

/// Namespace-aware pull reader over raw part bytes
pub struct XmlReader<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    /// End tag owed for a self-closing element already reported as a start
    pending_end: Option<QName>,
}

impl<R: BufRead> XmlReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: NsReader::from_reader(inner),
            buf: Vec::new(),
            pending_end: None,
        }
    }
}

impl<'a> XmlReader<&'a [u8]> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &'a str) -> Self {
        Self::new(xml.as_bytes())
    }
}

impl<R: BufRead> TokenSource for XmlReader<R> {
    fn next_token(&mut self) -> Result<Option<Token>, CodecError> {
        if let Some(name) = self.pending_end.take() {
            return Ok(Some(Token::End(name)));
        }

        loop {
            self.buf.clear();
            let (resolved, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
            let namespace = resolve_namespace(resolved)?;

            match event {
                Event::Start(start) => {
                    let tag = start_tag(&self.reader, namespace, &start)?;
                    return Ok(Some(Token::Start(tag)));
                }
                Event::Empty(start) => {
                    let tag = start_tag(&self.reader, namespace, &start)?;
                    self.pending_end = Some(tag.name.clone());
                    return Ok(Some(Token::Start(tag)));
                }
                Event::End(end) => {
                    let local = std::str::from_utf8(end.local_name().as_ref())?.to_owned();
                    return Ok(Some(Token::End(QName { namespace, local })));
                }
                Event::Text(text) => {
                    return Ok(Some(Token::Text(text.unescape()?.into_owned())));
                }
                Event::CData(data) => {
                    let text = std::str::from_utf8(&data)?.to_owned();
                    return Ok(Some(Token::Text(text)));
                }
                Event::Eof => return Ok(None),
                // declaration, comments, processing instructions, doctype
                _ => continue,
            }
        }
    }
}

fn start_tag<R: BufRead>(
    reader: &NsReader<R>,
    namespace: Option<String>,
    start: &BytesStart<'_>,
) -> Result<StartTag, CodecError> {
    let local = std::str::from_utf8(start.local_name().as_ref())?.to_owned();
    let mut tag = StartTag::new(QName { namespace, local });

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            let prefix = key.get(6..).unwrap_or_default();
            tag.bindings.push(Binding::new(
                std::str::from_utf8(prefix)?,
                attr.unescape_value()?.into_owned(),
            ));
            continue;
        }

        let (resolved, local) = reader.resolve_attribute(attr.key);
        let namespace = resolve_namespace(resolved)?;
        tag.attributes.push(Attribute {
            name: QName {
                namespace,
                local: std::str::from_utf8(local.as_ref())?.to_owned(),
            },
            value: attr.unescape_value()?.into_owned(),
        });
    }

    Ok(tag)
}

fn resolve_namespace(resolved: ResolveResult<'_>) -> Result<Option<String>, CodecError> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(std::str::from_utf8(uri)?.to_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) if prefix == b"xml" => Ok(Some(namespaces::XML.to_owned())),
        ResolveResult::Unknown(prefix) => Err(CodecError::UnboundPrefix {
            prefix: String::from_utf8_lossy(&prefix).into_owned(),
        }),
    }
}
