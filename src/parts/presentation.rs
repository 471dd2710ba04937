//! PresentationML: presentation part and slides.

use super::drawing::{CtGraphicalObject, CtPositiveSize2D, CtShapeProperties, CtTextBody, CtTransform2D};
use super::shared::CtExtensionList;
use crate::codec::PartRoot;
use crate::enumeration::EnumValue;
use crate::validation::{Facet, MAX_SLIDE_EXTENT_EMU, MIN_SLIDE_EXTENT_EMU};
use crate::xml::namespaces::{a, attr, p, r};
use crate::xml::{PartFamily, StaticName};
use crate::{aggregate, choice_group, lens, schema_enum};

/// Slide ids start above the range reserved for masters and layouts
pub const MIN_SLIDE_ID: u32 = 256;
pub const MAX_SLIDE_ID: u32 = 2_147_483_647;

schema_enum! {
    pub enum StSlideSizeType("ST_SlideSizeType") {
        Screen4x3 = "screen4x3",
        Letter = "letter",
        A4 = "A4",
        Mm35 = "35mm",
        Overhead = "overhead",
        Banner = "banner",
        Custom = "custom",
        Screen16x9 = "screen16x9",
        Screen16x10 = "screen16x10",
        Widescreen = "widescreen",
    }
}

// ============================================================================
// Presentation part
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSlideIdListEntry {
    pub id: u32,
    /// Relationship id of the slide part
    pub rel_id: String,
}

aggregate!(CtSlideIdListEntry, "CT_SlideIdListEntry", |schema| schema
    .required_attribute(attr("id"), lens!(id))
    .facet(Facet::range(MIN_SLIDE_ID as f64, MAX_SLIDE_ID as f64))
    .required_attribute(r("id"), lens!(rel_id)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSlideIdList {
    pub slides: Vec<CtSlideIdListEntry>,
}

aggregate!(CtSlideIdList, "CT_SlideIdList", |schema| schema.children(p("sldId"), lens!(slides)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSlideSize {
    pub cx: i32,
    pub cy: i32,
    pub size_type: EnumValue<StSlideSizeType>,
}

aggregate!(CtSlideSize, "CT_SlideSize", |schema| schema
    .required_attribute(attr("cx"), lens!(cx))
    .facet(Facet::range(MIN_SLIDE_EXTENT_EMU as f64, MAX_SLIDE_EXTENT_EMU as f64))
    .required_attribute(attr("cy"), lens!(cy))
    .facet(Facet::range(MIN_SLIDE_EXTENT_EMU as f64, MAX_SLIDE_EXTENT_EMU as f64))
    .enum_attribute(attr("type"), lens!(size_type)));

impl CtSlideSize {
    /// 13.333 x 7.5 inch widescreen slide
    pub fn widescreen() -> Self {
        Self {
            cx: 12_192_000,
            cy: 6_858_000,
            size_type: EnumValue::unset(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPresentation {
    pub save_subset_fonts: Option<bool>,
    pub slide_ids: Option<CtSlideIdList>,
    pub slide_size: Option<CtSlideSize>,
    pub notes_size: CtPositiveSize2D,
    pub ext_lst: Option<CtExtensionList>,
}

aggregate!(CtPresentation, "CT_Presentation", |schema| schema
    .optional_attribute(attr("saveSubsetFonts"), lens!(save_subset_fonts))
    .optional_child(p("sldIdLst"), lens!(slide_ids))
    .optional_child(p("sldSz"), lens!(slide_size))
    .child(p("notesSz"), lens!(notes_size))
    .optional_child(p("extLst"), lens!(ext_lst)));

impl PartRoot for CtPresentation {
    const ROOT: StaticName = p("presentation");
    const FAMILY: PartFamily = PartFamily::Presentation;
}

impl CtPresentation {
    /// Relationship ids of the slides in presentation order
    pub fn slide_rel_ids(&self) -> impl Iterator<Item = &str> {
        self.slide_ids
            .iter()
            .flat_map(|list| list.slides.iter())
            .map(|entry| entry.rel_id.as_str())
    }
}

// ============================================================================
// Slides
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtNonVisualDrawingProps {
    pub id: u32,
    pub name: String,
    pub descr: Option<String>,
    pub hidden: Option<bool>,
}

aggregate!(CtNonVisualDrawingProps, "CT_NonVisualDrawingProps", |schema| schema
    .required_attribute(attr("id"), lens!(id))
    .required_attribute(attr("name"), lens!(name))
    .optional_attribute(attr("descr"), lens!(descr))
    .optional_attribute(attr("hidden"), lens!(hidden)));

/// Non-visual properties shared by every shape kind (`nvSpPr`,
/// `nvGrpSpPr`, `nvGraphicFramePr`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtNonVisualProps {
    pub drawing: CtNonVisualDrawingProps,
}

aggregate!(CtNonVisualProps, "CT_ShapeNonVisual", |schema| schema
    .child(p("cNvPr"), lens!(drawing)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtShape {
    pub non_visual: CtNonVisualProps,
    pub properties: CtShapeProperties,
    pub text_body: Option<CtTextBody>,
}

aggregate!(CtShape, "CT_Shape", |schema| schema
    .child(p("nvSpPr"), lens!(non_visual))
    .child(p("spPr"), lens!(properties))
    .optional_child(p("txBody"), lens!(text_body)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtGroupShapeProperties {
    pub transform: Option<CtTransform2D>,
}

aggregate!(CtGroupShapeProperties, "CT_GroupShapeProperties", |schema| schema
    .optional_child(a("xfrm"), lens!(transform)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtGraphicalObjectFrame {
    pub non_visual: CtNonVisualProps,
    pub transform: CtTransform2D,
    pub graphic: CtGraphicalObject,
}

aggregate!(CtGraphicalObjectFrame, "CT_GraphicalObjectFrame", |schema| schema
    .child(p("nvGraphicFramePr"), lens!(non_visual))
    .child(p("xfrm"), lens!(transform))
    .child(a("graphic"), lens!(graphic)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtGroupShape {
    pub non_visual: CtNonVisualProps,
    pub properties: CtGroupShapeProperties,
    pub shapes: Vec<EgShape>,
}

aggregate!(CtGroupShape, "CT_GroupShape", |schema| schema
    .child(p("nvGrpSpPr"), lens!(non_visual))
    .child(p("grpSpPr"), lens!(properties))
    .choices(lens!(shapes)));

choice_group! {
    pub enum EgShape("EG_ShapeTree") {
        Shape(p("sp") => CtShape),
        Group(p("grpSp") => CtGroupShape),
        GraphicFrame(p("graphicFrame") => CtGraphicalObjectFrame),
    }
}

impl EgShape {
    pub fn name(&self) -> &str {
        match self {
            EgShape::Shape(shape) => &shape.non_visual.drawing.name,
            EgShape::Group(group) => &group.non_visual.drawing.name,
            EgShape::GraphicFrame(frame) => &frame.non_visual.drawing.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtCommonSlideData {
    pub name: Option<String>,
    pub shape_tree: CtGroupShape,
}

aggregate!(CtCommonSlideData, "CT_CommonSlideData", |schema| schema
    .optional_attribute(attr("name"), lens!(name))
    .child(p("spTree"), lens!(shape_tree)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSlide {
    pub show: Option<bool>,
    pub common: CtCommonSlideData,
    pub ext_lst: Option<CtExtensionList>,
}

aggregate!(CtSlide, "CT_Slide", |schema| schema
    .optional_attribute(attr("show"), lens!(show))
    .child(p("cSld"), lens!(common))
    .optional_child(p("extLst"), lens!(ext_lst)));

impl PartRoot for CtSlide {
    const ROOT: StaticName = p("sld");
    const FAMILY: PartFamily = PartFamily::Presentation;
}

impl CtSlide {
    /// Shapes of the slide tree, groups flattened depth first
    pub fn shapes(&self) -> Vec<&EgShape> {
        fn walk<'a>(shapes: &'a [EgShape], out: &mut Vec<&'a EgShape>) {
            for shape in shapes {
                out.push(shape);
                if let EgShape::Group(group) = shape {
                    walk(&group.shapes, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.common.shape_tree.shapes, &mut out);
        out
    }
}
