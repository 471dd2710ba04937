//! Aggregates reused across part families.

use crate::aggregate;
use crate::codec::{AnyContent, OpenContent};
use crate::lens;
use crate::xml::namespaces::r;

/// Element with no attributes and no content, used as a flag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtEmpty;

aggregate!(CtEmpty, "CT_Empty", |schema| schema);

/// Reference to a related part through its relationship id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtRelId {
    pub id: String,
}

impl CtRelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

aggregate!(CtRelId, "CT_RelId", |schema| schema.required_attribute(r("id"), lens!(id)));

/// `extLst`: vendor extensions, kept verbatim and written back unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtExtensionList {
    pub extensions: AnyContent,
}

aggregate!(CtExtensionList, "CT_ExtensionList", |schema| schema
    .open_content(lens!(extensions), OpenContent::preserved()));
