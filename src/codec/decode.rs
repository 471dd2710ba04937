//! The decode loop and its leniency bookkeeping.

use super::Aggregate;
use super::any::{AnyContent, AnyElement, OpenContent, Unresolved};
use super::raw::RawElement;
use super::schema::Schema;
use crate::error::CodecError;
use crate::registry::ElementRegistry;
use crate::xml::namespaces::MARKUP_COMPATIBILITY;
use crate::xml::{QName, StartTag, Token, TokenSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;
use tracing::debug;

/// Default limit on element nesting during decode
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// How leniency situations are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Record a diagnostic and keep going
    #[default]
    Lenient,
    /// Fail on the first diagnostic
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub strictness: Strictness,
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::Lenient,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// What kind of input was tolerated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Child element the schema does not name; the subtree was skipped
    UnknownElement,
    /// Attribute the schema does not name; it was dropped
    UnknownAttribute,
    /// Enumeration token outside the closed set; the field is unset
    UnknownEnumToken,
    /// Union token no alternative accepts; the field is absent
    UnmatchedUnion,
    /// Open content with no registry entry; the subtree was skipped
    UnresolvedElement,
}

/// A tolerated leniency situation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Element path, e.g. `worksheet/sheetData/row/c`
    pub path: String,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.path, self.detail)
    }
}

/// Decode state shared by every aggregate of one part
pub struct Decoder<'a> {
    source: &'a mut dyn TokenSource,
    registry: &'a ElementRegistry,
    options: DecodeOptions,
    diagnostics: Vec<Diagnostic>,
    /// Local names of the open elements
    path: Vec<String>,
}

impl<'a> Decoder<'a> {
    pub fn new(
        source: &'a mut dyn TokenSource,
        registry: &'a ElementRegistry,
        options: DecodeOptions,
    ) -> Self {
        Self {
            source,
            registry,
            options,
            diagnostics: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn registry(&self) -> &ElementRegistry {
        self.registry
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Decode the element opened by `start` into a fresh aggregate
    pub fn decode_element<C: Aggregate>(&mut self, start: StartTag) -> Result<C, CodecError> {
        let mut value = C::default();
        self.decode_into(&mut value, start)?;
        Ok(value)
    }

    /// Decode the element opened by `start` over an existing aggregate
    pub fn decode_into<C: Aggregate>(&mut self, value: &mut C, start: StartTag) -> Result<(), CodecError> {
        self.enter(&start.name)?;
        let result = decode_body(C::schema(), value, start, self);
        self.path.pop();
        result
    }

    fn enter(&mut self, name: &QName) -> Result<(), CodecError> {
        if self.path.len() >= self.options.max_depth {
            return Err(CodecError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        self.path.push(name.local.clone());
        Ok(())
    }

    /// Record a leniency situation, or fail on it in strict mode.
    /// `leaf` extends the current element path.
    pub(crate) fn report(
        &mut self,
        kind: DiagnosticKind,
        leaf: Option<&str>,
        detail: String,
    ) -> Result<(), CodecError> {
        let mut path = self.path.join("/");
        if let Some(leaf) = leaf {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(leaf);
        }
        let diagnostic = Diagnostic { kind, path, detail };
        debug!(
            kind = %diagnostic.kind,
            path = %diagnostic.path,
            detail = %diagnostic.detail,
            "tolerated unexpected content"
        );
        match self.options.strictness {
            Strictness::Strict => Err(CodecError::Strict(diagnostic)),
            Strictness::Lenient => {
                self.diagnostics.push(diagnostic);
                Ok(())
            }
        }
    }

    /// Next token inside the element `open`; running out is a truncation
    pub(crate) fn next_within(&mut self, open: &QName) -> Result<Token, CodecError> {
        self.source
            .next_token()?
            .ok_or_else(|| CodecError::UnexpectedEof {
                element: open.to_string(),
            })
    }

    /// Discard the rest of the element `name`, whose start tag was consumed
    pub(crate) fn skip(&mut self, name: &QName) -> Result<(), CodecError> {
        let mut depth = 0usize;
        loop {
            match self.next_within(name)? {
                Token::Start(_) => depth += 1,
                Token::End(end) if depth == 0 => return expect_end(name, &end),
                Token::End(_) => depth -= 1,
                Token::Text(_) => {}
            }
        }
    }

    pub(crate) fn read_raw(&mut self, start: StartTag) -> Result<RawElement, CodecError> {
        self.enter(&start.name)?;
        let result = RawElement::read(start, self);
        self.path.pop();
        result
    }

    pub(crate) fn decode_open(
        &mut self,
        content: &mut AnyContent,
        start: StartTag,
        policy: OpenContent,
    ) -> Result<(), CodecError> {
        if policy.resolve {
            if let Some(construct) = self.registry.resolve(start.name.namespace(), &start.name.local) {
                let name = start.name.clone();
                let mut value = construct();
                value.decode_dyn(start, self)?;
                content.push(AnyElement::Typed { name, value });
                return Ok(());
            }
        }

        match policy.unresolved {
            Unresolved::Preserve => {
                let raw = self.read_raw(start)?;
                content.push(AnyElement::Raw(raw));
                Ok(())
            }
            Unresolved::Skip => {
                self.report(
                    DiagnosticKind::UnresolvedElement,
                    Some(&start.name.local),
                    format!("no registered type for {}", start.name),
                )?;
                self.skip(&start.name)
            }
        }
    }
}

pub(crate) fn expect_end(open: &QName, end: &QName) -> Result<(), CodecError> {
    if open == end {
        Ok(())
    } else {
        Err(CodecError::MismatchedEnd {
            expected: open.to_string(),
            found: end.to_string(),
        })
    }
}

/// Attributes from the markup-compatibility namespace steer consumers and
/// are not part of any schema type
fn is_compatibility_attribute(name: &QName) -> bool {
    name.namespace() == Some(MARKUP_COMPATIBILITY)
}

fn decode_body<T: Aggregate>(
    schema: &Schema<T>,
    value: &mut T,
    start: StartTag,
    decoder: &mut Decoder<'_>,
) -> Result<(), CodecError> {
    let StartTag {
        name, attributes, ..
    } = start;

    for attribute in &attributes {
        match schema.attribute(&attribute.name) {
            Some(field) => (field.decode)(value, &attribute.value, decoder)?,
            None if is_compatibility_attribute(&attribute.name) => {}
            None => decoder.report(
                DiagnosticKind::UnknownAttribute,
                None,
                format!("attribute {}", attribute.name),
            )?,
        }
    }

    let mut text = schema.text.as_ref().map(|_| String::new());
    loop {
        match decoder.next_within(&name)? {
            Token::Start(child) => {
                if let Some(field) = schema.child(&child.name) {
                    (field.decode)(value, child, decoder)?;
                } else if let Some(open) = schema.open {
                    (schema.children[open].decode)(value, child, decoder)?;
                } else {
                    decoder.report(
                        DiagnosticKind::UnknownElement,
                        Some(&child.name.local),
                        format!("element {}", child.name),
                    )?;
                    decoder.skip(&child.name)?;
                }
            }
            Token::End(end) => {
                expect_end(&name, &end)?;
                break;
            }
            Token::Text(chunk) => {
                if let Some(text) = text.as_mut() {
                    text.push_str(&chunk);
                }
            }
        }
    }

    if let (Some(field), Some(text)) = (schema.text.as_ref(), text) {
        (field.decode)(value, &text)?;
    }
    Ok(())
}
