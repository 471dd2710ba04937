//! SpreadsheetML: workbook, worksheet and pivot cache definition parts.
//!
//! Attributes in this family are unqualified except for relationship ids.
//! Parts are written with SpreadsheetML as the default namespace.

use super::shared::{CtEmpty, CtExtensionList};
use crate::codec::PartRoot;
use crate::enumeration::EnumValue;
use crate::validation::{CELL_RANGE, CELL_REF, EXCEL_MAX_COLUMNS, EXCEL_MAX_ROWS, Facet, MAX_SHEET_NAME_LENGTH};
use crate::xml::namespaces::{attr, r, x};
use crate::xml::{PartFamily, StaticName};
use crate::{aggregate, choice_group, lens, schema_enum};

// ============================================================================
// Enumerations
// ============================================================================

schema_enum! {
    pub enum StSheetState("ST_SheetState") {
        Visible = "visible",
        Hidden = "hidden",
        VeryHidden = "veryHidden",
    }
}

schema_enum! {
    /// Data type of a cell value
    pub enum StCellType("ST_CellType") {
        Boolean = "b",
        Date = "d",
        Error = "e",
        InlineString = "inlineStr",
        Number = "n",
        SharedString = "s",
        FormulaString = "str",
    }
}

schema_enum! {
    pub enum StCellFormulaType("ST_CellFormulaType") {
        Normal = "normal",
        Array = "array",
        DataTable = "dataTable",
        Shared = "shared",
    }
}

// ============================================================================
// Workbook
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtWorkbookPr {
    pub date1904: Option<bool>,
    pub code_name: Option<String>,
}

aggregate!(CtWorkbookPr, "CT_WorkbookPr", |schema| schema
    .optional_attribute(attr("date1904"), lens!(date1904))
    .optional_attribute(attr("codeName"), lens!(code_name)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSheet {
    pub name: String,
    pub sheet_id: u32,
    pub state: EnumValue<StSheetState>,
    /// Relationship id of the worksheet part
    pub id: String,
}

aggregate!(CtSheet, "CT_Sheet", |schema| schema
    .required_attribute(attr("name"), lens!(name))
    .facet(Facet::MinLength(1))
    .facet(Facet::MaxLength(MAX_SHEET_NAME_LENGTH))
    .required_attribute(attr("sheetId"), lens!(sheet_id))
    .facet(Facet::MinInclusive(1.0))
    .enum_attribute(attr("state"), lens!(state))
    .required_attribute(r("id"), lens!(id)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSheets {
    pub sheets: Vec<CtSheet>,
}

aggregate!(CtSheets, "CT_Sheets", |schema| schema.children(x("sheet"), lens!(sheets)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtWorkbook {
    pub workbook_pr: Option<CtWorkbookPr>,
    pub sheets: CtSheets,
    pub ext_lst: Option<CtExtensionList>,
}

aggregate!(CtWorkbook, "CT_Workbook", |schema| schema
    .optional_child(x("workbookPr"), lens!(workbook_pr))
    .child(x("sheets"), lens!(sheets))
    .optional_child(x("extLst"), lens!(ext_lst)));

impl PartRoot for CtWorkbook {
    const ROOT: StaticName = x("workbook");
    const FAMILY: PartFamily = PartFamily::Spreadsheet;
}

impl CtWorkbook {
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.sheets.iter().map(|sheet| sheet.name.as_str())
    }

    pub fn sheet(&self, name: &str) -> Option<&CtSheet> {
        self.sheets.sheets.iter().find(|sheet| sheet.name == name)
    }
}

// ============================================================================
// Worksheet
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSheetDimension {
    pub reference: String,
}

aggregate!(CtSheetDimension, "CT_SheetDimension", |schema| schema
    .required_attribute(attr("ref"), lens!(reference))
    .facet(Facet::Pattern(&CELL_RANGE)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtCol {
    pub min: u32,
    pub max: u32,
    pub width: Option<f64>,
    pub custom_width: Option<bool>,
    pub hidden: Option<bool>,
}

aggregate!(CtCol, "CT_Col", |schema| schema
    .required_attribute(attr("min"), lens!(min))
    .facet(Facet::range(1.0, EXCEL_MAX_COLUMNS as f64))
    .required_attribute(attr("max"), lens!(max))
    .facet(Facet::range(1.0, EXCEL_MAX_COLUMNS as f64))
    .optional_attribute(attr("width"), lens!(width))
    .facet(Facet::range(0.0, 255.0))
    .optional_attribute(attr("customWidth"), lens!(custom_width))
    .optional_attribute(attr("hidden"), lens!(hidden)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtCols {
    pub cols: Vec<CtCol>,
}

aggregate!(CtCols, "CT_Cols", |schema| schema.children(x("col"), lens!(cols)));

/// Formula of a cell; shared formulas carry the group index `si`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtCellFormula {
    pub formula_type: EnumValue<StCellFormulaType>,
    pub reference: Option<String>,
    pub shared_index: Option<u32>,
    pub text: String,
}

aggregate!(CtCellFormula, "CT_CellFormula", |schema| schema
    .enum_attribute(attr("t"), lens!(formula_type))
    .optional_attribute(attr("ref"), lens!(reference))
    .facet(Facet::Pattern(&CELL_RANGE))
    .optional_attribute(attr("si"), lens!(shared_index))
    .text(lens!(text)));

/// Escaped string content, used for `v` and rich text `t`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtXstring {
    pub text: String,
}

impl CtXstring {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

aggregate!(CtXstring, "ST_Xstring", |schema| schema.text(lens!(text)));

/// Run of rich text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtRElt {
    pub text: CtXstring,
}

aggregate!(CtRElt, "CT_RElt", |schema| schema.child(x("t"), lens!(text)));

/// Rich text: either plain `t` or a sequence of runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtRst {
    pub text: Option<CtXstring>,
    pub runs: Vec<CtRElt>,
}

aggregate!(CtRst, "CT_Rst", |schema| schema
    .optional_child(x("t"), lens!(text))
    .children(x("r"), lens!(runs)));

impl CtRst {
    /// Plain text with all runs concatenated
    pub fn plain_text(&self) -> String {
        let mut text = self.text.as_ref().map(|t| t.text.clone()).unwrap_or_default();
        for run in &self.runs {
            text.push_str(&run.text.text);
        }
        text
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtCell {
    pub reference: Option<String>,
    pub style: Option<u32>,
    pub cell_type: EnumValue<StCellType>,
    pub formula: Option<CtCellFormula>,
    pub value: Option<CtXstring>,
    pub inline: Option<CtRst>,
}

aggregate!(CtCell, "CT_Cell", |schema| schema
    .optional_attribute(attr("r"), lens!(reference))
    .facet(Facet::Pattern(&CELL_REF))
    .optional_attribute(attr("s"), lens!(style))
    .enum_attribute(attr("t"), lens!(cell_type))
    .optional_child(x("f"), lens!(formula))
    .optional_child(x("v"), lens!(value))
    .optional_child(x("is"), lens!(inline)));

impl CtCell {
    /// Cell holding a plain number
    pub fn number(reference: impl Into<String>, value: f64) -> Self {
        Self {
            reference: Some(reference.into()),
            value: Some(CtXstring::new(crate::codec::Scalar::render_scalar(&value))),
            ..Self::default()
        }
    }

    /// Cell holding an inline string
    pub fn inline_string(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            cell_type: StCellType::InlineString.into(),
            inline: Some(CtRst {
                text: Some(CtXstring::new(text)),
                runs: Vec::new(),
            }),
            ..Self::default()
        }
    }

    /// Raw text of the `v` element
    pub fn raw_value(&self) -> Option<&str> {
        self.value.as_ref().map(|value| value.text.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtRow {
    pub index: Option<u32>,
    /// Optimisation hint such as `1:5`, one entry per block of cells
    pub spans: Vec<String>,
    pub height: Option<f64>,
    pub custom_height: Option<bool>,
    pub hidden: Option<bool>,
    pub cells: Vec<CtCell>,
}

aggregate!(CtRow, "CT_Row", |schema| schema
    .optional_attribute(attr("r"), lens!(index))
    .facet(Facet::range(1.0, EXCEL_MAX_ROWS as f64))
    .list_attribute(attr("spans"), lens!(spans))
    .optional_attribute(attr("ht"), lens!(height))
    .facet(Facet::range(0.0, 409.0))
    .optional_attribute(attr("customHeight"), lens!(custom_height))
    .optional_attribute(attr("hidden"), lens!(hidden))
    .children(x("c"), lens!(cells)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSheetData {
    pub rows: Vec<CtRow>,
}

aggregate!(CtSheetData, "CT_SheetData", |schema| schema.children(x("row"), lens!(rows)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtMergeCell {
    pub reference: String,
}

aggregate!(CtMergeCell, "CT_MergeCell", |schema| schema
    .required_attribute(attr("ref"), lens!(reference))
    .facet(Facet::Pattern(&CELL_RANGE)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtMergeCells {
    pub count: Option<u32>,
    pub cells: Vec<CtMergeCell>,
}

aggregate!(CtMergeCells, "CT_MergeCells", |schema| schema
    .optional_attribute(attr("count"), lens!(count))
    .children(x("mergeCell"), lens!(cells)));

/// Page margins in inches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPageMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub header: f64,
    pub footer: f64,
}

aggregate!(CtPageMargins, "CT_PageMargins", |schema| schema
    .required_attribute(attr("left"), lens!(left))
    .facet(Facet::MinInclusive(0.0))
    .required_attribute(attr("right"), lens!(right))
    .facet(Facet::MinInclusive(0.0))
    .required_attribute(attr("top"), lens!(top))
    .facet(Facet::MinInclusive(0.0))
    .required_attribute(attr("bottom"), lens!(bottom))
    .facet(Facet::MinInclusive(0.0))
    .required_attribute(attr("header"), lens!(header))
    .facet(Facet::MinInclusive(0.0))
    .required_attribute(attr("footer"), lens!(footer))
    .facet(Facet::MinInclusive(0.0)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtWorksheet {
    pub dimension: Option<CtSheetDimension>,
    pub cols: Vec<CtCols>,
    pub sheet_data: CtSheetData,
    pub merge_cells: Option<CtMergeCells>,
    pub page_margins: Option<CtPageMargins>,
    pub ext_lst: Option<CtExtensionList>,
}

aggregate!(CtWorksheet, "CT_Worksheet", |schema| schema
    .optional_child(x("dimension"), lens!(dimension))
    .children(x("cols"), lens!(cols))
    .child(x("sheetData"), lens!(sheet_data))
    .optional_child(x("mergeCells"), lens!(merge_cells))
    .optional_child(x("pageMargins"), lens!(page_margins))
    .optional_child(x("extLst"), lens!(ext_lst)));

impl PartRoot for CtWorksheet {
    const ROOT: StaticName = x("worksheet");
    const FAMILY: PartFamily = PartFamily::Spreadsheet;
}

impl CtWorksheet {
    /// Cell with the given `A1` reference
    pub fn cell(&self, reference: &str) -> Option<&CtCell> {
        self.cells()
            .find(|cell| cell.reference.as_deref() == Some(reference))
    }

    /// Every cell in row order
    pub fn cells(&self) -> impl Iterator<Item = &CtCell> {
        self.sheet_data.rows.iter().flat_map(|row| row.cells.iter())
    }
}

// ============================================================================
// Pivot cache definition
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtNumber {
    pub value: f64,
}

aggregate!(CtNumber, "CT_Number", |schema| schema.required_attribute(attr("v"), lens!(value)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtBoolean {
    pub value: bool,
}

aggregate!(CtBoolean, "CT_Boolean", |schema| schema.required_attribute(attr("v"), lens!(value)));

/// Error value such as `#DIV/0!`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtError {
    pub value: String,
}

aggregate!(CtError, "CT_Error", |schema| schema.required_attribute(attr("v"), lens!(value)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtString {
    pub value: String,
}

aggregate!(CtString, "CT_String", |schema| schema.required_attribute(attr("v"), lens!(value)));

/// Date as an `xsd:dateTime` lexical value, kept as written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtDateTime {
    pub value: String,
}

aggregate!(CtDateTime, "CT_DateTime", |schema| schema.required_attribute(attr("v"), lens!(value)));

choice_group! {
    /// One shared item of a cache field
    pub enum EgSharedItem("EG_SharedItems") {
        Missing(x("m") => CtEmpty),
        Number(x("n") => CtNumber),
        Boolean(x("b") => CtBoolean),
        Error(x("e") => CtError),
        String(x("s") => CtString),
        DateTime(x("d") => CtDateTime),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSharedItems {
    pub contains_blank: Option<bool>,
    pub count: Option<u32>,
    pub items: Vec<EgSharedItem>,
}

aggregate!(CtSharedItems, "CT_SharedItems", |schema| schema
    .optional_attribute(attr("containsBlank"), lens!(contains_blank))
    .optional_attribute(attr("count"), lens!(count))
    .choices(lens!(items)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtCacheField {
    pub name: String,
    pub num_fmt_id: Option<u32>,
    pub shared_items: Option<CtSharedItems>,
}

aggregate!(CtCacheField, "CT_CacheField", |schema| schema
    .required_attribute(attr("name"), lens!(name))
    .optional_attribute(attr("numFmtId"), lens!(num_fmt_id))
    .optional_child(x("sharedItems"), lens!(shared_items)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtCacheFields {
    pub count: Option<u32>,
    pub fields: Vec<CtCacheField>,
}

aggregate!(CtCacheFields, "CT_CacheFields", |schema| schema
    .optional_attribute(attr("count"), lens!(count))
    .children(x("cacheField"), lens!(fields)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPivotCacheDefinition {
    /// Relationship id of the cache records part
    pub id: Option<String>,
    pub record_count: Option<u32>,
    pub refresh_on_load: Option<bool>,
    pub cache_fields: CtCacheFields,
    pub ext_lst: Option<CtExtensionList>,
}

aggregate!(CtPivotCacheDefinition, "CT_PivotCacheDefinition", |schema| schema
    .optional_attribute(r("id"), lens!(id))
    .optional_attribute(attr("recordCount"), lens!(record_count))
    .optional_attribute(attr("refreshOnLoad"), lens!(refresh_on_load))
    .child(x("cacheFields"), lens!(cache_fields))
    .optional_child(x("extLst"), lens!(ext_lst)));

impl PartRoot for CtPivotCacheDefinition {
    const ROOT: StaticName = x("pivotCacheDefinition");
    const FAMILY: PartFamily = PartFamily::Spreadsheet;
}
