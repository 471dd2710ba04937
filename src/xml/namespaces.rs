//! Target namespaces of the document-part families and their prefixes.
//!
//! Every family has a fixed set of prefix bindings declared on the root start
//! tag of its parts. Prefixes are only bookkeeping for the writer; decoding
//! always compares namespace URIs.

use super::names::StaticName;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

pub const WORDPROCESSING: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const SPREADSHEET: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub const PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const CHART: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
pub const DIAGRAM: &str = "http://schemas.openxmlformats.org/drawingml/2006/diagram";
pub const MATH: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";
pub const SHARED_TYPES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/sharedTypes";
pub const RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const MARKUP_COMPATIBILITY: &str =
    "http://schemas.openxmlformats.org/markup-compatibility/2006";
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Canonical prefix for every namespace the codec knows about
const CANONICAL_PREFIXES: &[(&str, &str)] = &[
    ("w", WORDPROCESSING),
    ("x", SPREADSHEET),
    ("p", PRESENTATION),
    ("a", DRAWING),
    ("c", CHART),
    ("dgm", DIAGRAM),
    ("m", MATH),
    ("s", SHARED_TYPES),
    ("r", RELATIONSHIPS),
    ("mc", MARKUP_COMPATIBILITY),
    ("xml", XML),
];

/// Canonical prefix of a known namespace URI
pub fn canonical_prefix(uri: &str) -> Option<&'static str> {
    CANONICAL_PREFIXES
        .iter()
        .find(|(_, known)| *known == uri)
        .map(|(prefix, _)| *prefix)
}

/// Document-part families, one target namespace each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartFamily {
    WordProcessing,
    Spreadsheet,
    Presentation,
    Drawing,
    Chart,
    Diagram,
    Math,
    SharedTypes,
}

impl PartFamily {
    /// Target namespace of the family
    pub fn namespace(&self) -> &'static str {
        match self {
            PartFamily::WordProcessing => WORDPROCESSING,
            PartFamily::Spreadsheet => SPREADSHEET,
            PartFamily::Presentation => PRESENTATION,
            PartFamily::Drawing => DRAWING,
            PartFamily::Chart => CHART,
            PartFamily::Diagram => DIAGRAM,
            PartFamily::Math => MATH,
            PartFamily::SharedTypes => SHARED_TYPES,
        }
    }

    /// `(prefix, uri)` pairs declared on the root element of a part.
    /// An empty prefix binds the default namespace.
    pub fn bindings(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            PartFamily::WordProcessing => &[
                ("w", WORDPROCESSING),
                ("r", RELATIONSHIPS),
                ("m", MATH),
                ("mc", MARKUP_COMPATIBILITY),
            ],
            PartFamily::Spreadsheet => &[
                ("", SPREADSHEET),
                ("r", RELATIONSHIPS),
                ("mc", MARKUP_COMPATIBILITY),
            ],
            PartFamily::Presentation => &[
                ("a", DRAWING),
                ("r", RELATIONSHIPS),
                ("p", PRESENTATION),
            ],
            PartFamily::Drawing => &[("a", DRAWING), ("r", RELATIONSHIPS)],
            PartFamily::Chart => &[("c", CHART), ("a", DRAWING), ("r", RELATIONSHIPS)],
            PartFamily::Diagram => &[("dgm", DIAGRAM), ("a", DRAWING), ("r", RELATIONSHIPS)],
            PartFamily::Math => &[("m", MATH)],
            PartFamily::SharedTypes => &[("s", SHARED_TYPES)],
        }
    }
}

// Name constructors used by the descriptor tables.

pub const fn w(local: &'static str) -> StaticName {
    StaticName::new(WORDPROCESSING, local)
}

pub const fn x(local: &'static str) -> StaticName {
    StaticName::new(SPREADSHEET, local)
}

pub const fn p(local: &'static str) -> StaticName {
    StaticName::new(PRESENTATION, local)
}

pub const fn a(local: &'static str) -> StaticName {
    StaticName::new(DRAWING, local)
}

pub const fn c(local: &'static str) -> StaticName {
    StaticName::new(CHART, local)
}

pub const fn dgm(local: &'static str) -> StaticName {
    StaticName::new(DIAGRAM, local)
}

pub const fn m(local: &'static str) -> StaticName {
    StaticName::new(MATH, local)
}

pub const fn r(local: &'static str) -> StaticName {
    StaticName::new(RELATIONSHIPS, local)
}

pub const fn xml(local: &'static str) -> StaticName {
    StaticName::new(XML, local)
}

/// An attribute outside any namespace
pub const fn attr(local: &'static str) -> StaticName {
    StaticName::unqualified(local)
}
