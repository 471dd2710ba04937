//! Office Math: equations embedded in paragraphs.
//!
//! Math content is recursive: fractions and scripts hold arguments that hold
//! further math elements. Attributes use the `m` namespace.

use super::simple_types::StXmlSpace;
use crate::enumeration::EnumValue;
use crate::xml::namespaces::{m, xml};
use crate::{aggregate, choice_group, lens, schema_enum};

schema_enum! {
    pub enum StJc("ST_Jc") {
        Left = "left",
        Right = "right",
        Center = "center",
        CenterGroup = "centerGroup",
    }
}

schema_enum! {
    /// Fraction layout
    pub enum StFType("ST_FType") {
        Bar = "bar",
        Skewed = "skw",
        Linear = "lin",
        NoBar = "noBar",
    }
}

schema_enum! {
    pub enum StStyle("ST_Style") {
        Plain = "p",
        Bold = "b",
        Italic = "i",
        BoldItalic = "bi",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtOMathJc {
    pub val: EnumValue<StJc>,
}

aggregate!(CtOMathJc, "CT_OMathJc", |schema| schema.enum_attribute(m("val"), lens!(val)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtOMathParaPr {
    pub jc: Option<CtOMathJc>,
}

aggregate!(CtOMathParaPr, "CT_OMathParaPr", |schema| schema.optional_child(m("jc"), lens!(jc)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtStyle {
    pub val: EnumValue<StStyle>,
}

aggregate!(CtStyle, "CT_Style", |schema| schema.enum_attribute(m("val"), lens!(val)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtMathRPr {
    pub style: Option<CtStyle>,
}

aggregate!(CtMathRPr, "CT_RPR", |schema| schema.optional_child(m("sty"), lens!(style)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtMathText {
    pub space: EnumValue<StXmlSpace>,
    pub text: String,
}

aggregate!(CtMathText, "CT_Text", |schema| schema
    .enum_attribute(xml("space"), lens!(space))
    .text(lens!(text)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtMathR {
    pub rpr: Option<CtMathRPr>,
    pub text: Option<CtMathText>,
}

aggregate!(CtMathR, "CT_R", |schema| schema
    .optional_child(m("rPr"), lens!(rpr))
    .optional_child(m("t"), lens!(text)));

impl CtMathR {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            rpr: None,
            text: Some(CtMathText {
                space: EnumValue::unset(),
                text: text.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtFType {
    pub val: EnumValue<StFType>,
}

aggregate!(CtFType, "CT_FType", |schema| schema.enum_attribute(m("val"), lens!(val)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtFPr {
    pub fraction_type: Option<CtFType>,
}

aggregate!(CtFPr, "CT_FPr", |schema| schema.optional_child(m("type"), lens!(fraction_type)));

/// Argument slot of a math structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtOMathArg {
    pub elements: Vec<EgOMathElement>,
}

aggregate!(CtOMathArg, "CT_OMathArg", |schema| schema.choices(lens!(elements)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtFraction {
    pub pr: Option<CtFPr>,
    pub numerator: CtOMathArg,
    pub denominator: CtOMathArg,
}

aggregate!(CtFraction, "CT_F", |schema| schema
    .optional_child(m("fPr"), lens!(pr))
    .child(m("num"), lens!(numerator))
    .child(m("den"), lens!(denominator)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtSSup {
    pub base: CtOMathArg,
    pub superscript: CtOMathArg,
}

aggregate!(CtSSup, "CT_SSup", |schema| schema
    .child(m("e"), lens!(base))
    .child(m("sup"), lens!(superscript)));

choice_group! {
    pub enum EgOMathElement("EG_OMathElements") {
        Run(m("r") => CtMathR),
        Fraction(m("f") => CtFraction),
        Superscript(m("sSup") => CtSSup),
    }
}

/// Linear text form, `(a)/(b)` for fractions and `a^(b)` for superscripts
fn linear_text(elements: &[EgOMathElement], out: &mut String) {
    for element in elements {
        match element {
            EgOMathElement::Run(run) => {
                if let Some(text) = &run.text {
                    out.push_str(&text.text);
                }
            }
            EgOMathElement::Fraction(fraction) => {
                out.push('(');
                linear_text(&fraction.numerator.elements, out);
                out.push_str(")/(");
                linear_text(&fraction.denominator.elements, out);
                out.push(')');
            }
            EgOMathElement::Superscript(script) => {
                linear_text(&script.base.elements, out);
                out.push_str("^(");
                linear_text(&script.superscript.elements, out);
                out.push(')');
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtOMath {
    pub elements: Vec<EgOMathElement>,
}

aggregate!(CtOMath, "CT_OMath", |schema| schema.choices(lens!(elements)));

impl CtOMath {
    pub fn linear_text(&self) -> String {
        let mut out = String::new();
        linear_text(&self.elements, &mut out);
        out
    }
}

/// Display equation block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtOMathPara {
    pub pr: Option<CtOMathParaPr>,
    pub equations: Vec<CtOMath>,
}

aggregate!(CtOMathPara, "CT_OMathPara", |schema| schema
    .optional_child(m("oMathParaPr"), lens!(pr))
    .children(m("oMath"), lens!(equations)));
