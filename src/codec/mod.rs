//! Aggregate codec: descriptor-driven decode, encode and validate.
//!
//! Every schema type implements [`Aggregate`] by returning its [`Schema`], a
//! descriptor table built once per type. One generic decode loop and one
//! encode walk serve all of them.
//!
//! Decoding is lenient by default: unknown elements and attributes,
//! unrecognised enumeration tokens and union tokens no alternative accepts
//! are tolerated and returned as [`Diagnostic`]s next to the value. Callers
//! that want to reject such input use [`Strictness::Strict`] or
//! [`Decoded::into_strict`].
//!
//! ```rust,ignore
//! use ooxml_model::codec::{self, DecodeContext, EncodeOptions};
//! use ooxml_model::parts::spreadsheet::CtWorksheet;
//!
//! let decoded = codec::from_str::<CtWorksheet>(xml, &DecodeContext::standard())?;
//! for diagnostic in &decoded.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! decoded.value.validate()?;
//! let xml = codec::to_string(&decoded.value, &EncodeOptions::default())?;
//! ```

pub mod any;
pub mod decode;
pub mod encode;
pub mod raw;
pub mod scalar;
pub mod schema;

pub use any::{AnyContent, AnyElement, DynAggregate, OpenContent, Unresolved};
pub use decode::{
    DEFAULT_MAX_DEPTH, DecodeOptions, Decoder, Diagnostic, DiagnosticKind, Strictness,
};
pub use encode::Encoder;
pub use raw::{RawElement, RawNode};
pub use scalar::Scalar;
pub use schema::{Lens, Schema, SchemaBuilder};

use crate::error::CodecError;
use crate::registry::ElementRegistry;
use crate::validation::{ValidationError, ValidationPath};
use crate::xml::{
    Binding, PartFamily, StaticName, Token, TokenSink, TokenSource, XmlReader, XmlWriter,
};
use std::fmt;
use std::io::{BufRead, Write};
use tracing::{debug, trace};

// =============================================================================
// AGGREGATE CONTRACT
// =============================================================================

/// A schema type with a descriptor table
pub trait Aggregate: Default + Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    fn schema() -> &'static Schema<Self>;

    /// Validate recursively; the reported path starts at the schema type name
    fn validate(&self) -> Result<(), ValidationError> {
        let mut path = ValidationPath::new(Self::schema().name());
        self.validate_at(&mut path)
    }

    /// Validate with `path` naming this aggregate
    fn validate_at(&self, path: &mut ValidationPath) -> Result<(), ValidationError> {
        crate::validation::validate_schema(Self::schema(), self, path)
    }
}

/// Root aggregate of a document part
pub trait PartRoot: Aggregate {
    const ROOT: StaticName;
    const FAMILY: PartFamily;
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Registry and options for one decode call
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'r> {
    pub registry: &'r ElementRegistry,
    pub options: DecodeOptions,
}

impl<'r> DecodeContext<'r> {
    pub fn new(registry: &'r ElementRegistry) -> Self {
        Self {
            registry,
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn strict(mut self) -> Self {
        self.options.strictness = Strictness::Strict;
        self
    }
}

impl DecodeContext<'static> {
    /// Lenient decoding against the standard registry
    pub fn standard() -> Self {
        Self::new(ElementRegistry::standard())
    }
}

impl Default for DecodeContext<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Write `<?xml version="1.0" encoding="UTF-8" standalone="yes"?>`
    pub xml_declaration: bool,
    /// Spaces per nesting level; `None` writes everything on one line
    pub indent: Option<usize>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            indent: None,
        }
    }
}

/// A decoded value with the leniency situations met along the way
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Decoded<T> {
    /// No diagnostics were recorded
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Reject after the fact: the first diagnostic becomes an error
    pub fn into_strict(self) -> Result<T, CodecError> {
        match self.diagnostics.into_iter().next() {
            Some(diagnostic) => Err(CodecError::Strict(diagnostic)),
            None => Ok(self.value),
        }
    }
}

// =============================================================================
// DECODE ENTRY POINTS
// =============================================================================

pub fn from_str<T: PartRoot>(xml: &str, context: &DecodeContext<'_>) -> Result<Decoded<T>, CodecError> {
    from_reader(xml.as_bytes(), context)
}

pub fn from_reader<T: PartRoot, R: BufRead>(
    reader: R,
    context: &DecodeContext<'_>,
) -> Result<Decoded<T>, CodecError> {
    let mut source = XmlReader::new(reader);
    from_tokens(&mut source, context)
}

pub fn from_tokens<T: PartRoot>(
    source: &mut dyn TokenSource,
    context: &DecodeContext<'_>,
) -> Result<Decoded<T>, CodecError> {
    decode_root(T::ROOT, source, context)
}

/// Decode a non-root aggregate whose element is called `name`
pub fn from_str_as<T: Aggregate>(
    name: StaticName,
    xml: &str,
    context: &DecodeContext<'_>,
) -> Result<Decoded<T>, CodecError> {
    let mut source = XmlReader::from_str(xml);
    decode_root(name, &mut source, context)
}

pub fn from_tokens_as<T: Aggregate>(
    name: StaticName,
    source: &mut dyn TokenSource,
    context: &DecodeContext<'_>,
) -> Result<Decoded<T>, CodecError> {
    decode_root(name, source, context)
}

fn decode_root<T: Aggregate>(
    name: StaticName,
    source: &mut dyn TokenSource,
    context: &DecodeContext<'_>,
) -> Result<Decoded<T>, CodecError> {
    let _span = tracing::debug_span!("decode", root = %name.local, schema = T::schema().name()).entered();

    let start = loop {
        match source.next_token()? {
            Some(Token::Start(tag)) => break tag,
            // whitespace or stray text before the root
            Some(Token::Text(_)) => continue,
            Some(Token::End(end)) => {
                return Err(CodecError::MismatchedEnd {
                    expected: name.to_string(),
                    found: end.to_string(),
                });
            }
            None => return Err(CodecError::EmptyDocument),
        }
    };
    if !name.matches(&start.name) {
        return Err(CodecError::UnexpectedRoot {
            expected: name.to_string(),
            found: start.name.to_string(),
        });
    }

    let mut decoder = Decoder::new(source, context.registry, context.options);
    let value = decoder.decode_element::<T>(start)?;
    let diagnostics = decoder.into_diagnostics();
    debug!(diagnostics = diagnostics.len(), "decoded part");

    Ok(Decoded { value, diagnostics })
}

// =============================================================================
// ENCODE ENTRY POINTS
// =============================================================================

pub fn to_string<T: PartRoot>(value: &T, options: &EncodeOptions) -> Result<String, CodecError> {
    let bytes = to_writer(value, Vec::new(), options)?;
    String::from_utf8(bytes).map_err(|err| CodecError::Utf8(err.utf8_error()))
}

/// Write the part to `writer` and hand it back
pub fn to_writer<T: PartRoot, W: Write>(
    value: &T,
    writer: W,
    options: &EncodeOptions,
) -> Result<W, CodecError> {
    encode_document(T::ROOT, root_bindings::<T>(), value, writer, options)
}

pub fn to_tokens<T: PartRoot>(value: &T, sink: &mut dyn TokenSink) -> Result<(), CodecError> {
    Encoder::new(sink).encode_with_bindings(T::ROOT.to_qname(), value, root_bindings::<T>())
}

/// Encode a non-root aggregate under the element name `name`
pub fn to_string_as<T: Aggregate>(
    name: StaticName,
    value: &T,
    options: &EncodeOptions,
) -> Result<String, CodecError> {
    let bytes = encode_document(name, Vec::new(), value, Vec::new(), options)?;
    String::from_utf8(bytes).map_err(|err| CodecError::Utf8(err.utf8_error()))
}

pub fn to_tokens_as<T: Aggregate>(
    name: StaticName,
    value: &T,
    sink: &mut dyn TokenSink,
) -> Result<(), CodecError> {
    Encoder::new(sink).encode_element(name, value)
}

fn root_bindings<T: PartRoot>() -> Vec<Binding> {
    T::FAMILY
        .bindings()
        .iter()
        .map(|(prefix, uri)| Binding::new(*prefix, *uri))
        .collect()
}

fn encode_document<T: Aggregate, W: Write>(
    name: StaticName,
    bindings: Vec<Binding>,
    value: &T,
    writer: W,
    options: &EncodeOptions,
) -> Result<W, CodecError> {
    trace!(root = %name.local, schema = T::schema().name(), "encoding part");

    let mut xml = match options.indent {
        Some(indent) if indent > 0 => XmlWriter::with_indent(writer, indent),
        _ => XmlWriter::new(writer),
    };
    if options.xml_declaration {
        xml.write_declaration()?;
    }
    Encoder::new(&mut xml).encode_with_bindings(name.to_qname(), value, bindings)?;
    xml.finish()
}
