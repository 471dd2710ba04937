mod support;

use anyhow::Result;
use ooxml_model::codec::{self, AnyElement, DecodeContext, DiagnosticKind};
use ooxml_model::parts::chart::CtChartReference;
use ooxml_model::parts::drawing::CtGraphicalObject;
use ooxml_model::parts::register_standard;
use ooxml_model::validation::Facet;
use ooxml_model::xml::StaticName;
use ooxml_model::xml::namespaces::{CHART, DRAWING, RELATIONSHIPS, a, c};
use ooxml_model::{Aggregate, ElementRegistry, RegistryError, aggregate, lens};
use support::compact;

const PICTURE: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const PIC: StaticName = StaticName::new(PICTURE, "pic");

/// Just enough of a picture to name it
#[derive(Debug, Clone, Default, PartialEq)]
struct CtPicture {
    name: String,
}

aggregate!(CtPicture, "CT_Picture", |schema| schema
    .required_attribute(StaticName::unqualified("name"), lens!(name))
    .facet(Facet::MinLength(1)));

fn graphic(uri: &str, data: &str) -> String {
    format!(
        r#"<a:graphic xmlns:a="{DRAWING}" xmlns:c="{CHART}" xmlns:r="{RELATIONSHIPS}" xmlns:pic="{PICTURE}"><a:graphicData uri="{uri}">{data}</a:graphicData></a:graphic>"#
    )
}

fn decode_graphic(xml: &str, registry: &ElementRegistry) -> Result<codec::Decoded<CtGraphicalObject>> {
    Ok(codec::from_str_as::<CtGraphicalObject>(
        a("graphic"),
        xml,
        &DecodeContext::new(registry),
    )?)
}

#[test]
fn extended_registry_resolves_additional_elements() -> Result<()> {
    let registry = register_standard(ElementRegistry::builder())
        .register::<CtPicture>(PIC)
        .build()?;
    assert_eq!(registry.len(), ElementRegistry::standard().len() + 1);
    assert_eq!(registry.type_name(Some(PICTURE), "pic"), Some("CT_Picture"));

    let xml = graphic(PICTURE, r#"<pic:pic name="logo.png"/><c:chart r:id="rId4"/>"#);
    let decoded = decode_graphic(&xml, &registry)?;
    assert!(decoded.is_clean(), "{:?}", decoded.diagnostics);

    let content = &decoded.value.data.content;
    assert_eq!(
        content.typed::<CtPicture>().collect::<Vec<_>>(),
        [&CtPicture {
            name: "logo.png".into()
        }]
    );
    assert_eq!(
        content.typed::<CtChartReference>().collect::<Vec<_>>(),
        [&CtChartReference::new("rId4")]
    );

    let encoded = codec::to_string_as(a("graphic"), &decoded.value, &compact())?;
    assert!(
        encoded.contains(&format!(r#"<ns0:pic xmlns:ns0="{PICTURE}" name="logo.png"/>"#)),
        "{encoded}"
    );
    Ok(())
}

#[test]
fn standard_registry_keeps_unknown_picture_raw() -> Result<()> {
    let xml = graphic(PICTURE, r#"<pic:pic name="logo.png"/>"#);
    let decoded = decode_graphic(&xml, ElementRegistry::standard())?;
    assert_eq!(decoded.count(DiagnosticKind::UnresolvedElement), 0);

    let raw: Vec<_> = decoded.value.data.content.raw().collect();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].attribute(StaticName::unqualified("name")), Some("logo.png"));
    Ok(())
}

#[test]
fn typed_open_content_is_validated_with_its_element_name() -> Result<()> {
    let registry = ElementRegistry::builder().register::<CtPicture>(PIC).build()?;
    let xml = graphic(PICTURE, r#"<pic:pic name=""/>"#);
    let graphic = decode_graphic(&xml, &registry)?.into_strict()?;

    let err = graphic.validate().unwrap_err();
    assert_eq!(err.path, "CT_GraphicalObject/graphicData/pic/name");
    Ok(())
}

#[test]
fn registrations_are_per_registry() -> Result<()> {
    let xml = graphic(PICTURE, r#"<c:chart r:id="rId4"/>"#);

    let empty = ElementRegistry::empty();
    let decoded = decode_graphic(&xml, &empty)?;
    assert!(matches!(
        decoded.value.data.content.iter().next(),
        Some(AnyElement::Raw(_))
    ));

    let standard = decode_graphic(&xml, ElementRegistry::standard())?;
    assert!(matches!(
        standard.value.data.content.iter().next(),
        Some(AnyElement::Typed { .. })
    ));
    assert!(!empty.contains(c("chart")));
    assert!(ElementRegistry::standard().contains(c("chart")));
    Ok(())
}

#[test]
fn duplicate_registration_is_rejected() {
    let err = ElementRegistry::builder()
        .register::<CtPicture>(PIC)
        .register::<CtChartReference>(PIC)
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::Duplicate {
            name: PIC.to_string(),
            first: "CT_Picture",
            second: "CT_RelId",
        }
    );

    let standard_twice = register_standard(register_standard(ElementRegistry::builder())).build();
    assert!(standard_twice.is_err());
}

#[test]
fn registry_lists_names_in_registration_order() -> Result<()> {
    let registry = ElementRegistry::builder()
        .register::<CtChartReference>(c("chart"))
        .register::<CtPicture>(PIC)
        .build()?;
    assert_eq!(registry.names().collect::<Vec<_>>(), [c("chart"), PIC]);
    Ok(())
}
