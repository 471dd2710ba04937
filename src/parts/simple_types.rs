//! Simple types shared by several part families.
//!
//! Units: twips are 1/20 pt, half-points 1/2 pt, EMU 1/914400 inch. The
//! universal measure alternative carries its unit suffix in the string.

use crate::enumeration::EnumValue;
use crate::union::UnionValue;
use crate::{schema_enum, union_value};

schema_enum! {
    /// Token spelling of an on/off value
    pub enum StOnOffToken("ST_OnOff1") {
        On = "on",
        Off = "off",
    }
}

union_value! {
    /// Boolean written either as an XSD boolean or as `on`/`off`
    pub struct StOnOff("ST_OnOff") {
        boolean: bool,
        token: EnumValue<StOnOffToken>,
    }
}

impl StOnOff {
    /// Effective value, `None` when nothing (or too much) is populated
    pub fn value(&self) -> Option<bool> {
        if self.populated() != 1 {
            return None;
        }
        match (self.boolean, self.token.and_then(|token| token.get())) {
            (Some(value), _) => Some(value),
            (None, Some(token)) => Some(token == StOnOffToken::On),
            (None, None) => None,
        }
    }
}

schema_enum! {
    pub enum StHexColorAuto("ST_HexColorAuto") {
        Auto = "auto",
    }
}

union_value! {
    /// `auto` or an RGB triplet such as `1F497D`
    pub struct StHexColor("ST_HexColor") {
        auto: EnumValue<StHexColorAuto>,
        rgb: String = "[0-9A-Fa-f]{6}",
    }
}

union_value! {
    /// Non-negative length in twips or with a unit suffix
    pub struct StTwipsMeasure("ST_TwipsMeasure") {
        twips: u64,
        measure: String = r"[0-9]+(\.[0-9]+)?(mm|cm|in|pt|pc|pi)",
    }
}

union_value! {
    /// Signed length in twips or with a unit suffix
    pub struct StSignedTwipsMeasure("ST_SignedTwipsMeasure") {
        twips: i64,
        measure: String = r"-?[0-9]+(\.[0-9]+)?(mm|cm|in|pt|pc|pi)",
    }
}

union_value! {
    /// Font size in half-points or with a unit suffix
    pub struct StHpsMeasure("ST_HpsMeasure") {
        half_points: u64,
        measure: String = r"[0-9]+(\.[0-9]+)?(mm|cm|in|pt|pc|pi)",
    }
}

union_value! {
    /// Plain integer or a percentage with a `%` suffix
    pub struct StDecimalNumberOrPercent("ST_DecimalNumberOrPercent") {
        number: i64,
        percent: String = r"-?[0-9]+(\.[0-9]+)?%",
    }
}

union_value! {
    /// Font scale as `62.5%` or in thousandths of a percent (`62500`)
    pub struct StTextFontScalePercentOrPercentString("ST_TextFontScalePercentOrPercentString") {
        percent: String = r"[0-9]+(\.[0-9]+)?%",
        thousandths: u32,
    }
}

union_value! {
    /// Shape coordinate in EMU, a universal measure, or a guide name
    pub struct StAdjCoordinate("ST_AdjCoordinate") {
        emu: i64,
        measure: String = r"-?[0-9]+(\.[0-9]+)?(mm|cm|in|pt|pc|pi)",
        guide: String = r"[A-Za-z_][A-Za-z0-9_]*",
    }
}

schema_enum! {
    /// Whitespace handling of text content
    pub enum StXmlSpace("ST_Space") {
        Default = "default",
        Preserve = "preserve",
    }
}
