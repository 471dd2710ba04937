//! Schema aggregates of the document-part families.
//!
//! Each module declares its types against the generic codec with
//! [`aggregate!`](crate::aggregate), [`schema_enum!`](crate::schema_enum),
//! [`union_value!`](crate::union_value) and
//! [`choice_group!`](crate::choice_group). [`register_standard`] lists the
//! elements that may appear as open content, which is what
//! [`ElementRegistry::standard`](crate::registry::ElementRegistry::standard)
//! is built from.

pub mod chart;
pub mod diagram;
pub mod drawing;
pub mod math;
pub mod presentation;
pub mod shared;
pub mod simple_types;
pub mod spreadsheet;
pub mod wordprocessing;

use crate::codec::PartRoot;
use crate::register_elements;
use crate::registry::RegistryBuilder;
use crate::xml::namespaces::{a, c, dgm, m};

/// Register every part root and every element that can be resolved inside
/// an open-content slot
pub fn register_standard(builder: RegistryBuilder) -> RegistryBuilder {
    let builder = register_roots(builder);
    register_elements!(
        builder,
        a("graphic") => drawing::CtGraphicalObject,
        c("chart") => chart::CtChartReference,
        dgm("relIds") => diagram::CtRelIds,
        m("oMath") => math::CtOMath,
        m("oMathPara") => math::CtOMathPara,
    )
}

fn register_roots(builder: RegistryBuilder) -> RegistryBuilder {
    fn root<T: PartRoot>(builder: RegistryBuilder) -> RegistryBuilder {
        builder.register::<T>(T::ROOT)
    }

    let builder = root::<wordprocessing::CtDocument>(builder);
    let builder = root::<spreadsheet::CtWorkbook>(builder);
    let builder = root::<spreadsheet::CtWorksheet>(builder);
    let builder = root::<spreadsheet::CtPivotCacheDefinition>(builder);
    let builder = root::<presentation::CtPresentation>(builder);
    let builder = root::<presentation::CtSlide>(builder);
    root::<chart::CtChartSpace>(builder)
}

#[cfg(test)]
mod tests {
    use super::chart::CtChartReference;
    use super::diagram::CtRelIds;
    use super::drawing::{CHART_URI, CtGraphicalObject};
    use crate::codec::{self, AnyElement, DecodeContext, DiagnosticKind, EncodeOptions};
    use crate::registry::ElementRegistry;
    use crate::xml::namespaces::{CHART, DIAGRAM, DRAWING, RELATIONSHIPS, a, c};

    fn graphic(data: &str) -> String {
        format!(
            r#"<a:graphic xmlns:a="{DRAWING}" xmlns:c="{CHART}" xmlns:dgm="{DIAGRAM}" xmlns:r="{RELATIONSHIPS}"><a:graphicData uri="{CHART_URI}">{data}</a:graphicData></a:graphic>"#
        )
    }

    #[test]
    fn standard_registry_is_built_once_and_complete() {
        let registry = ElementRegistry::standard();
        assert!(std::ptr::eq(registry, ElementRegistry::standard()));
        assert_eq!(registry.type_name(Some(CHART), "chart"), Some("CT_RelId"));
        assert_eq!(registry.type_name(Some(DIAGRAM), "relIds"), Some("CT_RelIds"));
        assert_eq!(registry.type_name(Some(CHART), "chartSpace"), Some("CT_ChartSpace"));
        assert!(registry.contains(a("graphic")));
        assert_eq!(registry.len(), 12);
    }

    #[test]
    fn graphic_data_resolves_registered_content() {
        let xml = graphic(r#"<c:chart r:id="rId5"/>"#);
        let graphic = codec::from_str_as::<CtGraphicalObject>(a("graphic"), &xml, &DecodeContext::standard())
            .unwrap()
            .into_strict()
            .unwrap();
        let charts: Vec<_> = graphic.data.content.typed::<CtChartReference>().collect();
        assert_eq!(charts, [&CtChartReference::new("rId5")]);
    }

    #[test]
    fn injected_registry_changes_resolution() {
        let xml = graphic(r#"<c:chart r:id="rId5"/>"#);
        let registry = ElementRegistry::builder()
            .register::<CtRelIds>(c("chart"))
            .build()
            .unwrap();
        let graphic = codec::from_str_as::<CtGraphicalObject>(a("graphic"), &xml, &DecodeContext::new(&registry))
            .unwrap()
            .value;
        let element = graphic.data.content.iter().next().unwrap();
        assert_eq!(element.downcast_ref::<CtRelIds>(), Some(&CtRelIds::default()));

        let empty = ElementRegistry::empty();
        let graphic = codec::from_str_as::<CtGraphicalObject>(a("graphic"), &xml, &DecodeContext::new(&empty))
            .unwrap();
        assert!(graphic.is_clean());
        assert!(matches!(graphic.value.data.content.iter().next(), Some(AnyElement::Raw(_))));
    }

    #[test]
    fn unregistered_graphic_content_round_trips_verbatim() {
        let picture = r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:nvPicPr><pic:cNvPr id="0" name="image.png"/></pic:nvPicPr></pic:pic>"#;
        let xml = graphic(picture);
        let decoded = codec::from_str_as::<CtGraphicalObject>(a("graphic"), &xml, &DecodeContext::standard()).unwrap();
        assert_eq!(decoded.count(DiagnosticKind::UnresolvedElement), 0);

        let options = EncodeOptions {
            xml_declaration: false,
            indent: None,
        };
        let encoded = codec::to_string_as(a("graphic"), &decoded.value, &options).unwrap();
        assert!(encoded.contains(picture), "{encoded}");
    }
}
