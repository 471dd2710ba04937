//! Error handling for the document codec
//!
//! Two severities exist:
//! - Structural and type errors ([`CodecError`]) abort the current decode call
//!   and are returned to the caller unchanged.
//! - Leniency situations (unknown content, unrecognised enumeration tokens,
//!   unmatched union tokens) are never errors by themselves; they are reported
//!   as [`Diagnostic`]s and only become [`CodecError::Strict`] when the caller
//!   opted into strict decoding.
//!
//! Validation failures are a separate type, see [`crate::validation::ValidationError`].

use crate::codec::Diagnostic;
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Stable numeric codes for codec failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    /// The tokenizer rejected the input
    MalformedXml = 1001,
    /// The token stream ended inside an element
    Truncated = 1002,
    /// An end tag did not close the element that was open
    MismatchedEnd = 1003,
    /// The part's root element was not the expected one
    UnexpectedRoot = 1004,
    /// The input contained no element at all
    EmptyDocument = 1005,
    /// A prefix was used without a namespace declaration
    UnboundPrefix = 1006,
    /// Elements were nested deeper than the configured limit
    DepthExceeded = 1007,
    /// A scalar attribute or text value failed type conversion
    InvalidScalar = 2001,
    /// Text was not valid UTF-8
    InvalidUtf8 = 2002,
    /// A leniency situation was rejected because strict decoding was requested
    StrictViolation = 3001,
    /// The underlying reader or writer failed
    Io = 4001,
}

impl ErrorCode {
    /// Get the integer code
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            ErrorCode::MalformedXml
            | ErrorCode::Truncated
            | ErrorCode::MismatchedEnd
            | ErrorCode::UnexpectedRoot
            | ErrorCode::EmptyDocument
            | ErrorCode::UnboundPrefix
            | ErrorCode::DepthExceeded => "structural",
            ErrorCode::InvalidScalar | ErrorCode::InvalidUtf8 => "type",
            ErrorCode::StrictViolation => "leniency",
            ErrorCode::Io => "io",
        }
    }

    /// Whether the caller has to give up on the part.
    ///
    /// Strict violations are the only codes a caller can recover from by
    /// decoding again leniently.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ErrorCode::StrictViolation)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

// =============================================================================
// CODEC ERROR
// =============================================================================

/// Failure of a decode or encode call
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8 in document: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("token stream ended before </{element}>")]
    UnexpectedEof { element: String },

    #[error("expected </{expected}> but found </{found}>")]
    MismatchedEnd { expected: String, found: String },

    #[error("expected root element <{expected}> but found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("document contains no root element")]
    EmptyDocument,

    #[error("prefix '{prefix}' is not bound to a namespace")]
    UnboundPrefix { prefix: String },

    #[error("element nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error("value '{value}' of '{name}' is not a valid {expected}")]
    InvalidScalar {
        name: String,
        value: String,
        expected: &'static str,
    },

    #[error("strict decoding rejected {0}")]
    Strict(Diagnostic),
}

impl CodecError {
    /// Map this error to its stable code
    pub fn code(&self) -> ErrorCode {
        match self {
            CodecError::Xml(_) => ErrorCode::MalformedXml,
            CodecError::Io(_) => ErrorCode::Io,
            CodecError::Utf8(_) => ErrorCode::InvalidUtf8,
            CodecError::UnexpectedEof { .. } => ErrorCode::Truncated,
            CodecError::MismatchedEnd { .. } => ErrorCode::MismatchedEnd,
            CodecError::UnexpectedRoot { .. } => ErrorCode::UnexpectedRoot,
            CodecError::EmptyDocument => ErrorCode::EmptyDocument,
            CodecError::UnboundPrefix { .. } => ErrorCode::UnboundPrefix,
            CodecError::DepthExceeded { .. } => ErrorCode::DepthExceeded,
            CodecError::InvalidScalar { .. } => ErrorCode::InvalidScalar,
            CodecError::Strict(_) => ErrorCode::StrictViolation,
        }
    }

    pub(crate) fn invalid_scalar(
        name: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        CodecError::InvalidScalar {
            name: name.into(),
            value: value.into(),
            expected,
        }
    }
}

// =============================================================================
// CONTEXT HELPERS
// =============================================================================

/// Extension trait for callers that work at the package level and want the
/// part name carried along with a codec failure
pub trait ResultExt<T> {
    /// Add the name of the part being processed
    fn with_part(self, part_name: &str) -> anyhow::Result<T>;
}

impl<T> ResultExt<T> for Result<T, CodecError> {
    fn with_part(self, part_name: &str) -> anyhow::Result<T> {
        self.with_context(|| format!("failed to process part '{}'", part_name))
    }
}
