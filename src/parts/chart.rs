//! DrawingML charts: the chart space part and the chart reference.
//!
//! Only the frame of a chart is modelled. Plot area content (series, axes,
//! the chart types themselves) is kept verbatim so a decoded chart writes
//! back unchanged.

use super::shared::CtExtensionList;
use crate::codec::{AnyContent, OpenContent, PartRoot};
use crate::enumeration::EnumValue;
use crate::xml::namespaces::{attr, c};
use crate::xml::{PartFamily, StaticName};
use crate::{aggregate, lens, schema_enum};

pub use super::shared::CtRelId as CtChartReference;

schema_enum! {
    pub enum StLegendPos("ST_LegendPos") {
        Bottom = "b",
        TopRight = "tr",
        Left = "l",
        Right = "r",
        Top = "t",
    }
}

/// Boolean property element; a missing `val` means true
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtBoolean {
    pub val: Option<bool>,
}

aggregate!(CtBoolean, "CT_Boolean", |schema| schema.optional_attribute(attr("val"), lens!(val)));

impl CtBoolean {
    pub fn new(val: bool) -> Self {
        Self { val: Some(val) }
    }

    pub fn value(&self) -> bool {
        self.val.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtLegendPos {
    pub val: EnumValue<StLegendPos>,
}

aggregate!(CtLegendPos, "CT_LegendPos", |schema| schema.enum_attribute(attr("val"), lens!(val)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtLegend {
    pub position: Option<CtLegendPos>,
    pub overlay: Option<CtBoolean>,
    pub ext_lst: Option<CtExtensionList>,
}

aggregate!(CtLegend, "CT_Legend", |schema| schema
    .optional_child(c("legendPos"), lens!(position))
    .optional_child(c("overlay"), lens!(overlay))
    .optional_child(c("extLst"), lens!(ext_lst)));

/// Plot area: layout, chart groups and axes, all preserved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtPlotArea {
    pub content: AnyContent,
}

aggregate!(CtPlotArea, "CT_PlotArea", |schema| schema
    .open_content(lens!(content), OpenContent::preserved()));

impl CtPlotArea {
    /// Local names of the chart groups, e.g. `barChart`
    pub fn chart_kinds(&self) -> impl Iterator<Item = &str> {
        self.content
            .raw()
            .map(|element| element.name.local.as_str())
            .filter(|local| local.ends_with("Chart"))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtChart {
    pub auto_title_deleted: Option<CtBoolean>,
    pub plot_area: CtPlotArea,
    pub legend: Option<CtLegend>,
    pub plot_visible_only: Option<CtBoolean>,
    pub ext_lst: Option<CtExtensionList>,
}

aggregate!(CtChart, "CT_Chart", |schema| schema
    .optional_child(c("autoTitleDeleted"), lens!(auto_title_deleted))
    .child(c("plotArea"), lens!(plot_area))
    .optional_child(c("legend"), lens!(legend))
    .optional_child(c("plotVisOnly"), lens!(plot_visible_only))
    .optional_child(c("extLst"), lens!(ext_lst)));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CtChartSpace {
    pub date1904: Option<CtBoolean>,
    pub rounded_corners: Option<CtBoolean>,
    pub chart: CtChart,
    pub ext_lst: Option<CtExtensionList>,
}

aggregate!(CtChartSpace, "CT_ChartSpace", |schema| schema
    .optional_child(c("date1904"), lens!(date1904))
    .optional_child(c("roundedCorners"), lens!(rounded_corners))
    .child(c("chart"), lens!(chart))
    .optional_child(c("extLst"), lens!(ext_lst)));

impl PartRoot for CtChartSpace {
    const ROOT: StaticName = c("chartSpace");
    const FAMILY: PartFamily = PartFamily::Chart;
}
