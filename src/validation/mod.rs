//! Recursive validation of decoded aggregates.
//!
//! Validation is a separate pass, never part of decoding: a document whose
//! values are out of range still decodes, and only fails here. The walk is
//! depth first in document order and stops at the first failure, which is
//! reported with the path of the offending value:
//!
//! - the path starts at the schema type name of the validated aggregate,
//! - attribute and child segments are XML local names,
//! - members of repeated fields carry their index, `row[2]`,
//! - choice branches are named by the branch element; in a repeated choice
//!   the index counts that branch only, so the second `sp` is `sp[1]`,
//! - text content failures are reported at the element's own path.
//!
//! Checked here: facets of attributes and text, enumeration membership,
//! union exclusivity, and typed open content. Preserved raw content is not
//! interpreted and therefore not checked.

pub mod facets;
pub mod path;

pub use facets::{
    CELL_RANGE, CELL_REF, EXCEL_MAX_COLUMNS, EXCEL_MAX_ROWS, Facet, HEX_RGB,
    MAX_SHEET_NAME_LENGTH, MAX_SLIDE_EXTENT_EMU, MIN_SLIDE_EXTENT_EMU,
};
pub use path::ValidationPath;

use crate::codec::{Aggregate, Schema};
use serde::Serialize;
use thiserror::Error;

/// First invariant violation found in an aggregate tree
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{path}: {message}")]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

/// Validate `value` with the path rooted at its schema type name
pub fn validate<T: Aggregate>(value: &T) -> Result<(), ValidationError> {
    value.validate()
}

pub(crate) fn validate_schema<T>(
    schema: &Schema<T>,
    value: &T,
    path: &mut ValidationPath,
) -> Result<(), ValidationError> {
    for attribute in &schema.attributes {
        attribute
            .validate(value)
            .map_err(|message| path.error_at(attribute.name.local, message))?;
    }
    if let Some(text) = &schema.text {
        text.validate(value).map_err(|message| path.error(message))?;
    }
    for child in &schema.children {
        (child.validate)(value, path)?;
    }
    Ok(())
}
