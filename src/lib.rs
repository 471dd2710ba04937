//! Schema-bound object model and XML codec for Office Open XML parts.
//!
//! Every schema type is an [`Aggregate`](codec::Aggregate): a plain Rust
//! struct with a descriptor table that drives one generic decode loop, one
//! encode walk and one validation pass. The building blocks are
//! [enumerations](enumeration), [union values](union),
//! [choice groups](choice) and the [element registry](registry) used for
//! open content.

pub mod choice;
pub mod codec;
pub mod config;
pub mod enumeration;
pub mod error;
pub mod logging;
pub mod parts;
pub mod registry;
pub mod union;
pub mod validation;
pub mod xml;

pub use codec::{
    Aggregate, DecodeContext, DecodeOptions, Decoded, Diagnostic, DiagnosticKind, EncodeOptions,
    PartRoot, Strictness,
};
pub use config::CodecConfig;
pub use enumeration::{EnumValue, SchemaEnum};
pub use error::{CodecError, ErrorCode, ResultExt};
pub use logging::{LoggingConfig, init_logging};
pub use registry::{ElementRegistry, RegistryBuilder, RegistryError};
pub use union::UnionValue;
pub use validation::{ValidationError, ValidationPath};
pub use xml::{PartFamily, QName, StaticName};

/// Re-exports used by the declaration macros
#[doc(hidden)]
pub mod __private {
    pub use once_cell;
    pub use regex;
}
