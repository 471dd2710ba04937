//! Token-stream layer between raw part bytes and the aggregate codec.
//!
//! The codec only sees [`Token`]s: start tags with resolved names and
//! unescaped attribute values, end tags, and character data. Where the tokens
//! come from is behind [`TokenSource`]; where they go is behind [`TokenSink`].

pub mod names;
pub mod namespaces;
pub mod reader;
pub mod writer;

pub use names::{QName, StaticName};
pub use namespaces::PartFamily;
pub use reader::XmlReader;
pub use writer::XmlWriter;

use crate::error::CodecError;
use std::collections::VecDeque;

/// A single attribute of a start tag, value already unescaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// A namespace declaration carried by a start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Empty for the default namespace
    pub prefix: String,
    pub uri: String,
}

impl Binding {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    /// Declarations made on this element; on decode these are informational
    /// because names arrive already resolved
    pub bindings: Vec<Binding>,
}

impl StartTag {
    pub fn new(name: impl Into<QName>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            bindings: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<QName>, value: impl Into<String>) -> Self {
        self.push_attribute(name, value);
        self
    }

    pub fn with_binding(mut self, prefix: &str, uri: &str) -> Self {
        self.bindings.push(Binding::new(prefix, uri));
        self
    }

    pub fn push_attribute(&mut self, name: impl Into<QName>, value: impl Into<String>) {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Value of the attribute with the given name, if present
    pub fn attribute(&self, name: StaticName) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| name.matches(&attr.name))
            .map(|attr| attr.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Start(StartTag),
    End(QName),
    Text(String),
}

/// Pull side of the token stream
pub trait TokenSource {
    /// Next token, or `None` once the input is exhausted
    fn next_token(&mut self) -> Result<Option<Token>, CodecError>;
}

/// Push side of the token stream
pub trait TokenSink {
    fn start(&mut self, tag: StartTag) -> Result<(), CodecError>;
    fn end(&mut self, name: &QName) -> Result<(), CodecError>;
    fn text(&mut self, text: &str) -> Result<(), CodecError>;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Result<Option<Token>, CodecError> {
        (**self).next_token()
    }
}

/// In-memory token stream usable as both source and sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBuffer {
    tokens: VecDeque<Token>,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens.into()
    }
}

impl From<Vec<Token>> for TokenBuffer {
    fn from(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }
}

impl FromIterator<Token> for TokenBuffer {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl TokenSource for TokenBuffer {
    fn next_token(&mut self) -> Result<Option<Token>, CodecError> {
        Ok(self.tokens.pop_front())
    }
}

impl TokenSink for TokenBuffer {
    fn start(&mut self, tag: StartTag) -> Result<(), CodecError> {
        self.tokens.push_back(Token::Start(tag));
        Ok(())
    }

    fn end(&mut self, name: &QName) -> Result<(), CodecError> {
        self.tokens.push_back(Token::End(name.clone()));
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), CodecError> {
        self.tokens.push_back(Token::Text(text.to_owned()));
        Ok(())
    }
}
