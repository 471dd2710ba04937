//! WordprocessingML main document part.
//!
//! Covers the block structure (paragraphs, tables, section properties), run
//! content and the common paragraph and run properties. Every attribute is
//! qualified with the `w` namespace.

use super::math::{CtOMath, CtOMathPara};
use super::shared::CtEmpty;
use super::simple_types::{
    StHexColor, StHpsMeasure, StOnOff, StSignedTwipsMeasure, StTwipsMeasure, StXmlSpace,
};
use crate::codec::PartRoot;
use crate::enumeration::EnumValue;
use crate::union::UnionValue;
use crate::validation::Facet;
use crate::xml::namespaces::{m, r, w, xml};
use crate::xml::{PartFamily, StaticName};
use crate::{aggregate, choice_group, lens, schema_enum};
use once_cell::sync::Lazy;
use regex::Regex;

/// `ST_LongHexNumber`, revision session ids
static LONG_HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{8}$").expect("long hex pattern"));

schema_enum! {
    /// Horizontal alignment
    pub enum StJc("ST_Jc") {
        Start = "start",
        Center = "center",
        End = "end",
        Both = "both",
        Left = "left",
        Right = "right",
        Distribute = "distribute",
    }
}

schema_enum! {
    pub enum StUnderline("ST_Underline") {
        Single = "single",
        Words = "words",
        Double = "double",
        Thick = "thick",
        Dotted = "dotted",
        Dash = "dash",
        Wave = "wave",
        NoLine = "none",
    }
}

schema_enum! {
    pub enum StBrType("ST_BrType") {
        Page = "page",
        Column = "column",
        TextWrapping = "textWrapping",
    }
}

schema_enum! {
    pub enum StPageOrientation("ST_PageOrientation") {
        Portrait = "portrait",
        Landscape = "landscape",
    }
}

// ============================================================================
// Property elements
// ============================================================================

/// Toggle property; an element without `w:val` means on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtOnOff {
    pub val: Option<StOnOff>,
}

aggregate!(CtOnOff, "CT_OnOff", |schema| schema.union_attribute(w("val"), lens!(val)));

impl CtOnOff {
    pub fn on() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.val.as_ref().map_or(true, |val| val.value().unwrap_or(false))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtString {
    pub val: String,
}

aggregate!(CtString, "CT_String", |schema| schema.required_attribute(w("val"), lens!(val)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtJc {
    pub val: EnumValue<StJc>,
}

aggregate!(CtJc, "CT_Jc", |schema| schema.enum_attribute(w("val"), lens!(val)));

/// Paragraph spacing in twips
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSpacing {
    pub before: Option<StTwipsMeasure>,
    pub after: Option<StTwipsMeasure>,
    pub line: Option<StSignedTwipsMeasure>,
}

aggregate!(CtSpacing, "CT_Spacing", |schema| schema
    .union_attribute(w("before"), lens!(before))
    .union_attribute(w("after"), lens!(after))
    .union_attribute(w("line"), lens!(line)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPPr {
    pub style: Option<CtString>,
    pub spacing: Option<CtSpacing>,
    pub jc: Option<CtJc>,
}

aggregate!(CtPPr, "CT_PPr", |schema| schema
    .optional_child(w("pStyle"), lens!(style))
    .optional_child(w("spacing"), lens!(spacing))
    .optional_child(w("jc"), lens!(jc)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtColor {
    pub val: Option<StHexColor>,
}

aggregate!(CtColor, "CT_Color", |schema| schema.union_attribute(w("val"), lens!(val)));

/// Font size in half-points
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtHpsMeasure {
    pub val: Option<StHpsMeasure>,
}

aggregate!(CtHpsMeasure, "CT_HpsMeasure", |schema| schema.union_attribute(w("val"), lens!(val)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtUnderline {
    pub val: EnumValue<StUnderline>,
    pub color: Option<StHexColor>,
}

aggregate!(CtUnderline, "CT_Underline", |schema| schema
    .enum_attribute(w("val"), lens!(val))
    .union_attribute(w("color"), lens!(color)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtRPr {
    pub bold: Option<CtOnOff>,
    pub italic: Option<CtOnOff>,
    pub color: Option<CtColor>,
    pub size: Option<CtHpsMeasure>,
    pub underline: Option<CtUnderline>,
}

aggregate!(CtRPr, "CT_RPr", |schema| schema
    .optional_child(w("b"), lens!(bold))
    .optional_child(w("i"), lens!(italic))
    .optional_child(w("color"), lens!(color))
    .optional_child(w("sz"), lens!(size))
    .optional_child(w("u"), lens!(underline)));

// ============================================================================
// Runs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtText {
    pub space: EnumValue<StXmlSpace>,
    pub text: String,
}

aggregate!(CtText, "CT_Text", |schema| schema
    .enum_attribute(xml("space"), lens!(space))
    .text(lens!(text)));

impl CtText {
    /// Text run content, marked `xml:space="preserve"` when it has outer
    /// whitespace
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let space = if text.trim() != text {
            StXmlSpace::Preserve.into()
        } else {
            EnumValue::unset()
        };
        Self { space, text }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtBr {
    pub break_type: EnumValue<StBrType>,
}

aggregate!(CtBr, "CT_Br", |schema| schema.enum_attribute(w("type"), lens!(break_type)));

choice_group! {
    pub enum EgRunContent("EG_RunInnerContent") {
        Text(w("t") => CtText),
        Break(w("br") => CtBr),
        Tab(w("tab") => CtEmpty),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtR {
    pub rpr: Option<CtRPr>,
    pub content: Vec<EgRunContent>,
}

aggregate!(CtR, "CT_R", |schema| schema
    .optional_child(w("rPr"), lens!(rpr))
    .choices(lens!(content)));

impl CtR {
    /// Run with a single text element
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            rpr: None,
            content: vec![EgRunContent::Text(CtText::new(text))],
        }
    }

    /// Text of the run; tabs and breaks become `\t` and `\n`
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            match item {
                EgRunContent::Text(text) => out.push_str(&text.text),
                EgRunContent::Break(_) => out.push('\n'),
                EgRunContent::Tab(_) => out.push('\t'),
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtHyperlink {
    /// Relationship id of an external target
    pub id: Option<String>,
    /// Bookmark name of an internal target
    pub anchor: Option<String>,
    pub runs: Vec<CtR>,
}

aggregate!(CtHyperlink, "CT_Hyperlink", |schema| schema
    .optional_attribute(r("id"), lens!(id))
    .optional_attribute(w("anchor"), lens!(anchor))
    .children(w("r"), lens!(runs)));

choice_group! {
    pub enum EgParagraphContent("EG_PContent") {
        Run(w("r") => CtR),
        Hyperlink(w("hyperlink") => CtHyperlink),
        Math(m("oMath") => CtOMath),
        MathPara(m("oMathPara") => CtOMathPara),
    }
}

// ============================================================================
// Blocks
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtP {
    pub rsid_r: Option<String>,
    pub ppr: Option<CtPPr>,
    pub content: Vec<EgParagraphContent>,
}

aggregate!(CtP, "CT_P", |schema| schema
    .optional_attribute(w("rsidR"), lens!(rsid_r))
    .facet(Facet::Pattern(&LONG_HEX))
    .optional_child(w("pPr"), lens!(ppr))
    .choices(lens!(content)));

impl CtP {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![EgParagraphContent::Run(CtR::text(text))],
            ..Self::default()
        }
    }

    /// Concatenated text of the runs, hyperlinks included
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            match item {
                EgParagraphContent::Run(run) => out.push_str(&run.plain_text()),
                EgParagraphContent::Hyperlink(link) => {
                    link.runs.iter().for_each(|run| out.push_str(&run.plain_text()))
                }
                EgParagraphContent::Math(_) | EgParagraphContent::MathPara(_) => {}
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTblGridCol {
    pub width: Option<StTwipsMeasure>,
}

aggregate!(CtTblGridCol, "CT_TblGridCol", |schema| schema.union_attribute(w("w"), lens!(width)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTblGrid {
    pub cols: Vec<CtTblGridCol>,
}

aggregate!(CtTblGrid, "CT_TblGrid", |schema| schema.children(w("gridCol"), lens!(cols)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTc {
    pub blocks: Vec<EgBlockContent>,
}

aggregate!(CtTc, "CT_Tc", |schema| schema.choices(lens!(blocks)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtRow {
    pub rsid_r: Option<String>,
    pub cells: Vec<CtTc>,
}

aggregate!(CtRow, "CT_Row", |schema| schema
    .optional_attribute(w("rsidR"), lens!(rsid_r))
    .facet(Facet::Pattern(&LONG_HEX))
    .children(w("tc"), lens!(cells)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTbl {
    pub grid: Option<CtTblGrid>,
    pub rows: Vec<CtRow>,
}

aggregate!(CtTbl, "CT_Tbl", |schema| schema
    .optional_child(w("tblGrid"), lens!(grid))
    .children(w("tr"), lens!(rows)));

choice_group! {
    pub enum EgBlockContent("EG_BlockLevelElts") {
        Paragraph(w("p") => CtP),
        Table(w("tbl") => CtTbl),
    }
}

// ============================================================================
// Sections and document
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPageSz {
    pub width: Option<StTwipsMeasure>,
    pub height: Option<StTwipsMeasure>,
    pub orient: EnumValue<StPageOrientation>,
}

aggregate!(CtPageSz, "CT_PageSz", |schema| schema
    .union_attribute(w("w"), lens!(width))
    .union_attribute(w("h"), lens!(height))
    .enum_attribute(w("orient"), lens!(orient)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPageMar {
    pub top: Option<StSignedTwipsMeasure>,
    pub right: Option<StTwipsMeasure>,
    pub bottom: Option<StSignedTwipsMeasure>,
    pub left: Option<StTwipsMeasure>,
}

aggregate!(CtPageMar, "CT_PageMar", |schema| schema
    .union_attribute(w("top"), lens!(top))
    .union_attribute(w("right"), lens!(right))
    .union_attribute(w("bottom"), lens!(bottom))
    .union_attribute(w("left"), lens!(left)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSectPr {
    pub page_size: Option<CtPageSz>,
    pub page_margins: Option<CtPageMar>,
}

aggregate!(CtSectPr, "CT_SectPr", |schema| schema
    .optional_child(w("pgSz"), lens!(page_size))
    .optional_child(w("pgMar"), lens!(page_margins)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtBody {
    pub blocks: Vec<EgBlockContent>,
    pub sect_pr: Option<CtSectPr>,
}

aggregate!(CtBody, "CT_Body", |schema| schema
    .choices(lens!(blocks))
    .optional_child(w("sectPr"), lens!(sect_pr)));

impl CtBody {
    /// Top-level paragraphs, tables skipped
    pub fn paragraphs(&self) -> impl Iterator<Item = &CtP> {
        self.blocks.iter().filter_map(|block| match block {
            EgBlockContent::Paragraph(paragraph) => Some(paragraph),
            EgBlockContent::Table(_) => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtDocument {
    pub body: Option<CtBody>,
}

aggregate!(CtDocument, "CT_Document", |schema| schema.optional_child(w("body"), lens!(body)));

impl PartRoot for CtDocument {
    const ROOT: StaticName = w("document");
    const FAMILY: PartFamily = PartFamily::WordProcessing;
}

impl CtDocument {
    /// Document with one paragraph per line of `text`
    pub fn from_paragraphs<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let blocks = lines
            .into_iter()
            .map(|line| EgBlockContent::Paragraph(CtP::with_text(line)))
            .collect();
        Self {
            body: Some(CtBody {
                blocks,
                sect_pr: None,
            }),
        }
    }
}

/// Effective bold of a run: `w:b` present and not switched off
pub fn is_bold(run: &CtR) -> bool {
    run.rpr
        .as_ref()
        .and_then(|rpr| rpr.bold.as_ref())
        .is_some_and(CtOnOff::is_on)
}

/// Font size in points if given in half-points
pub fn font_size_points(run: &CtR) -> Option<f64> {
    let size = run.rpr.as_ref()?.size.as_ref()?.val.as_ref()?;
    if size.populated() != 1 {
        return None;
    }
    size.half_points.map(|half_points| half_points as f64 / 2.0)
}
