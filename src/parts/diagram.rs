//! DrawingML diagrams (SmartArt) as referenced from a graphic frame.

use crate::aggregate;
use crate::lens;
use crate::xml::namespaces::r;

/// The four parts that make up a diagram, by relationship id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtRelIds {
    /// Data model part
    pub data: String,
    /// Layout definition part
    pub layout: String,
    /// Quick style part
    pub style: String,
    /// Color transform part
    pub colors: String,
}

aggregate!(CtRelIds, "CT_RelIds", |schema| schema
    .required_attribute(r("dm"), lens!(data))
    .required_attribute(r("lo"), lens!(layout))
    .required_attribute(r("qs"), lens!(style))
    .required_attribute(r("cs"), lens!(colors)));

impl CtRelIds {
    pub fn ids(&self) -> [&str; 4] {
        [&self.data, &self.layout, &self.style, &self.colors]
    }
}
