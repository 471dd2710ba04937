//! DrawingML: graphic frames, text bodies and shape geometry.
//!
//! `graphicData` is the extension point of DrawingML: its content depends on
//! the `uri` attribute (a chart reference, a diagram, a picture). The slot
//! resolves known elements through the element registry and keeps the rest
//! verbatim so the frame survives a round trip.

use super::shared::{CtEmpty, CtExtensionList};
use super::simple_types::{StAdjCoordinate, StTextFontScalePercentOrPercentString};
use crate::codec::{AnyContent, OpenContent};
use crate::enumeration::EnumValue;
use crate::validation::Facet;
use crate::xml::namespaces::{a, attr};
use crate::{aggregate, choice_group, lens, schema_enum};

/// `uri` of graphic data holding a chart reference
pub const CHART_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";

/// `uri` of graphic data holding a diagram
pub const DIAGRAM_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/diagram";

schema_enum! {
    pub enum StTextWrappingType("ST_TextWrappingType") {
        NoWrap = "none",
        Square = "square",
    }
}

schema_enum! {
    pub enum StTextAnchoringType("ST_TextAnchoringType") {
        Top = "t",
        Center = "ctr",
        Bottom = "b",
        Justified = "just",
        Distributed = "dist",
    }
}

schema_enum! {
    pub enum StTextAlignType("ST_TextAlignType") {
        Left = "l",
        Center = "ctr",
        Right = "r",
        Justified = "just",
        JustifiedLow = "justLow",
        Distributed = "dist",
        ThaiDistributed = "thaiDist",
    }
}

// ============================================================================
// Graphic frames
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtGraphicalObjectData {
    pub uri: String,
    pub content: AnyContent,
}

aggregate!(CtGraphicalObjectData, "CT_GraphicalObjectData", |schema| schema
    .required_attribute(attr("uri"), lens!(uri))
    .facet(Facet::MinLength(1))
    .open_content(lens!(content), OpenContent::resolved().preserve_unresolved()));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtGraphicalObject {
    pub data: CtGraphicalObjectData,
}

aggregate!(CtGraphicalObject, "CT_GraphicalObject", |schema| schema
    .child(a("graphicData"), lens!(data)));

// ============================================================================
// Geometry
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPoint2D {
    pub x: i64,
    pub y: i64,
}

aggregate!(CtPoint2D, "CT_Point2D", |schema| schema
    .required_attribute(attr("x"), lens!(x))
    .required_attribute(attr("y"), lens!(y)));

/// Extent in EMU
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPositiveSize2D {
    pub cx: i64,
    pub cy: i64,
}

aggregate!(CtPositiveSize2D, "CT_PositiveSize2D", |schema| schema
    .required_attribute(attr("cx"), lens!(cx))
    .facet(Facet::MinInclusive(0.0))
    .required_attribute(attr("cy"), lens!(cy))
    .facet(Facet::MinInclusive(0.0)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTransform2D {
    /// Rotation in 60000ths of a degree
    pub rotation: Option<i32>,
    pub offset: Option<CtPoint2D>,
    pub extent: Option<CtPositiveSize2D>,
}

aggregate!(CtTransform2D, "CT_Transform2D", |schema| schema
    .optional_attribute(attr("rot"), lens!(rotation))
    .optional_child(a("off"), lens!(offset))
    .optional_child(a("ext"), lens!(extent)));

/// Path point whose coordinates may name shape guides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtAdjPoint2D {
    pub x: Option<StAdjCoordinate>,
    pub y: Option<StAdjCoordinate>,
}

aggregate!(CtAdjPoint2D, "CT_AdjPoint2D", |schema| schema
    .union_attribute(attr("x"), lens!(x))
    .union_attribute(attr("y"), lens!(y)));

impl CtAdjPoint2D {
    pub fn emu(x: i64, y: i64) -> Self {
        Self {
            x: Some(StAdjCoordinate::emu(x)),
            y: Some(StAdjCoordinate::emu(y)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPath2DMoveTo {
    pub point: CtAdjPoint2D,
}

aggregate!(CtPath2DMoveTo, "CT_Path2DMoveTo", |schema| schema.child(a("pt"), lens!(point)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPath2DLineTo {
    pub point: CtAdjPoint2D,
}

aggregate!(CtPath2DLineTo, "CT_Path2DLineTo", |schema| schema.child(a("pt"), lens!(point)));

choice_group! {
    pub enum EgPathCommand("EG_Path2DCommands") {
        MoveTo(a("moveTo") => CtPath2DMoveTo),
        LineTo(a("lnTo") => CtPath2DLineTo),
        Close(a("close") => CtEmpty),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPath2D {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub commands: Vec<EgPathCommand>,
}

aggregate!(CtPath2D, "CT_Path2D", |schema| schema
    .optional_attribute(attr("w"), lens!(width))
    .facet(Facet::MinInclusive(0.0))
    .optional_attribute(attr("h"), lens!(height))
    .facet(Facet::MinInclusive(0.0))
    .choices(lens!(commands)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPath2DList {
    pub paths: Vec<CtPath2D>,
}

aggregate!(CtPath2DList, "CT_Path2DList", |schema| schema.children(a("path"), lens!(paths)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtCustomGeometry2D {
    pub paths: CtPath2DList,
}

aggregate!(CtCustomGeometry2D, "CT_CustomGeometry2D", |schema| schema
    .child(a("pathLst"), lens!(paths)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtShapeProperties {
    pub transform: Option<CtTransform2D>,
    pub custom_geometry: Option<CtCustomGeometry2D>,
    pub ext_lst: Option<CtExtensionList>,
}

aggregate!(CtShapeProperties, "CT_ShapeProperties", |schema| schema
    .optional_child(a("xfrm"), lens!(transform))
    .optional_child(a("custGeom"), lens!(custom_geometry))
    .optional_child(a("extLst"), lens!(ext_lst)));

// ============================================================================
// Text
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTextNormalAutofit {
    pub font_scale: Option<StTextFontScalePercentOrPercentString>,
}

aggregate!(CtTextNormalAutofit, "CT_TextNormalAutofit", |schema| schema
    .union_attribute(attr("fontScale"), lens!(font_scale)));

choice_group! {
    /// How text that overflows its shape is handled
    pub enum EgTextAutofit("EG_TextAutofit") {
        NoAutofit(a("noAutofit") => CtEmpty),
        Normal(a("normAutofit") => CtTextNormalAutofit),
        ShapeAutofit(a("spAutoFit") => CtEmpty),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTextBodyProperties {
    pub rotation: Option<i32>,
    pub wrap: EnumValue<StTextWrappingType>,
    pub left_inset: Option<i64>,
    pub top_inset: Option<i64>,
    pub right_inset: Option<i64>,
    pub bottom_inset: Option<i64>,
    pub anchor: EnumValue<StTextAnchoringType>,
    pub autofit: Option<EgTextAutofit>,
    pub ext_lst: Option<CtExtensionList>,
}

aggregate!(CtTextBodyProperties, "CT_TextBodyProperties", |schema| schema
    .optional_attribute(attr("rot"), lens!(rotation))
    .enum_attribute(attr("wrap"), lens!(wrap))
    .optional_attribute(attr("lIns"), lens!(left_inset))
    .optional_attribute(attr("tIns"), lens!(top_inset))
    .optional_attribute(attr("rIns"), lens!(right_inset))
    .optional_attribute(attr("bIns"), lens!(bottom_inset))
    .enum_attribute(attr("anchor"), lens!(anchor))
    .choice(lens!(autofit))
    .optional_child(a("extLst"), lens!(ext_lst)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTextParagraphProperties {
    pub level: Option<i32>,
    pub align: EnumValue<StTextAlignType>,
}

aggregate!(CtTextParagraphProperties, "CT_TextParagraphProperties", |schema| schema
    .optional_attribute(attr("lvl"), lens!(level))
    .facet(Facet::range(0.0, 8.0))
    .enum_attribute(attr("algn"), lens!(align)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTextCharacterProperties {
    pub lang: Option<String>,
    /// Size in hundredths of a point
    pub size: Option<i32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
}

aggregate!(CtTextCharacterProperties, "CT_TextCharacterProperties", |schema| schema
    .optional_attribute(attr("lang"), lens!(lang))
    .optional_attribute(attr("sz"), lens!(size))
    .facet(Facet::range(100.0, 400_000.0))
    .optional_attribute(attr("b"), lens!(bold))
    .optional_attribute(attr("i"), lens!(italic)));

/// Text of a run, `xsd:string` content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTextString {
    pub text: String,
}

aggregate!(CtTextString, "xsd:string", |schema| schema.text(lens!(text)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtRegularTextRun {
    pub rpr: Option<CtTextCharacterProperties>,
    pub text: CtTextString,
}

aggregate!(CtRegularTextRun, "CT_RegularTextRun", |schema| schema
    .optional_child(a("rPr"), lens!(rpr))
    .child(a("t"), lens!(text)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTextLineBreak {
    pub rpr: Option<CtTextCharacterProperties>,
}

aggregate!(CtTextLineBreak, "CT_TextLineBreak", |schema| schema
    .optional_child(a("rPr"), lens!(rpr)));

choice_group! {
    pub enum EgTextRun("EG_TextRun") {
        Run(a("r") => CtRegularTextRun),
        Break(a("br") => CtTextLineBreak),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTextParagraph {
    pub ppr: Option<CtTextParagraphProperties>,
    pub runs: Vec<EgTextRun>,
    pub end_rpr: Option<CtTextCharacterProperties>,
}

aggregate!(CtTextParagraph, "CT_TextParagraph", |schema| schema
    .optional_child(a("pPr"), lens!(ppr))
    .choices(lens!(runs))
    .optional_child(a("endParaRPr"), lens!(end_rpr)));

impl CtTextParagraph {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![EgTextRun::Run(CtRegularTextRun {
                rpr: None,
                text: CtTextString { text: text.into() },
            })],
            ..Self::default()
        }
    }

    pub fn plain_text(&self) -> String {
        self.runs
            .iter()
            .map(|run| match run {
                EgTextRun::Run(run) => run.text.text.as_str(),
                EgTextRun::Break(_) => "\n",
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtTextBody {
    pub body_pr: CtTextBodyProperties,
    pub paragraphs: Vec<CtTextParagraph>,
}

aggregate!(CtTextBody, "CT_TextBody", |schema| schema
    .child(a("bodyPr"), lens!(body_pr))
    .children(a("p"), lens!(paragraphs)));

impl CtTextBody {
    /// Paragraph texts joined by newlines
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(CtTextParagraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{self, Aggregate, DecodeContext, EncodeOptions};
    use crate::union::UnionValue;
    use crate::xml::namespaces::DRAWING;

    fn decode<T: Aggregate>(name: &'static str, body: &str) -> T {
        let xml = format!(r#"<a:{name} xmlns:a="{DRAWING}">{body}</a:{name}>"#);
        codec::from_str_as::<T>(a(name), &xml, &DecodeContext::standard())
            .unwrap()
            .into_strict()
            .unwrap()
    }

    #[test]
    fn autofit_choice_keeps_last_branch() {
        let body: CtTextBody = decode(
            "txBody",
            r#"<a:bodyPr wrap="square" anchor="ctr"><a:spAutoFit/><a:normAutofit fontScale="62.5%"/></a:bodyPr>
               <a:p><a:r><a:t>One</a:t></a:r><a:br/><a:r><a:t>Two</a:t></a:r></a:p>"#,
        );
        assert_eq!(body.body_pr.wrap.get(), Some(StTextWrappingType::Square));
        assert_eq!(body.body_pr.anchor.get(), Some(StTextAnchoringType::Center));
        let Some(EgTextAutofit::Normal(normal)) = &body.body_pr.autofit else {
            panic!("expected normAutofit");
        };
        assert_eq!(normal.font_scale.as_ref().unwrap().render(), "62.5%");
        assert_eq!(body.plain_text(), "One\nTwo");
    }

    #[test]
    fn path_commands_keep_document_order() {
        let path: CtPath2D = decode(
            "path",
            r#"<a:moveTo><a:pt x="0" y="0"/></a:moveTo><a:lnTo><a:pt x="w" y="hd2"/></a:lnTo>
               <a:lnTo><a:pt x="1in" y="0"/></a:lnTo><a:close/>"#,
        );
        assert_eq!(path.commands.len(), 4);
        let EgPathCommand::LineTo(line) = &path.commands[1] else {
            panic!("expected lnTo");
        };
        assert_eq!(line.point.x.as_ref().and_then(|x| x.guide.as_deref()), Some("w"));
        assert!(matches!(path.commands[3], EgPathCommand::Close(_)));
    }

    #[test]
    fn invalid_path_command_point_is_located() {
        let path = CtPath2D {
            commands: vec![
                EgPathCommand::MoveTo(CtPath2DMoveTo {
                    point: CtAdjPoint2D::emu(0, 0),
                }),
                EgPathCommand::LineTo(CtPath2DLineTo {
                    point: CtAdjPoint2D {
                        x: Some(StAdjCoordinate {
                            emu: Some(5),
                            guide: Some("w".into()),
                            ..Default::default()
                        }),
                        y: None,
                    },
                }),
            ],
            ..CtPath2D::default()
        };
        let err = path.validate().unwrap_err();
        assert_eq!(err.path, "CT_Path2D/lnTo[0]/pt/x");
    }

    #[test]
    fn text_body_round_trips() {
        let body = CtTextBody {
            body_pr: CtTextBodyProperties {
                wrap: StTextWrappingType::NoWrap.into(),
                autofit: Some(EgTextAutofit::NoAutofit(CtEmpty)),
                ..Default::default()
            },
            paragraphs: vec![CtTextParagraph::with_text("Title")],
        };
        let xml = codec::to_string_as(a("txBody"), &body, &EncodeOptions::default()).unwrap();
        assert!(xml.contains(r#"<a:bodyPr wrap="none"><a:noAutofit/></a:bodyPr>"#));
        let again: CtTextBody = codec::from_str_as(a("txBody"), &xml, &DecodeContext::standard())
            .unwrap()
            .value;
        assert_eq!(again, body);
    }
}
