//! Decode, validate and re-encode one realistic part per family.

mod support;

use anyhow::Result;
use ooxml_model::codec::{self, AnyElement, EncodeOptions};
use ooxml_model::xml::namespaces::CHART;
use ooxml_model::parts::chart::{CtChartReference, CtChartSpace, StLegendPos};
use ooxml_model::parts::presentation::{CtPresentation, CtSlide, EgShape};
use ooxml_model::parts::spreadsheet::{
    CtPivotCacheDefinition, CtWorkbook, CtWorksheet, EgSharedItem, StCellFormulaType, StCellType,
    StSheetState,
};
use ooxml_model::parts::wordprocessing::{
    CtDocument, EgBlockContent, EgParagraphContent, StJc, font_size_points, is_bold,
};
use ooxml_model::{Aggregate, EnumValue};
use support::{assert_round_trip, compact, decode_fixture, reencode};

#[test]
fn document_round_trips() -> Result<()> {
    let document = decode_fixture::<CtDocument>("document.xml")?;
    document.validate()?;

    let body = document.body.as_ref().expect("body");
    let paragraphs: Vec<_> = body.paragraphs().map(|p| p.plain_text()).collect();
    assert_eq!(
        paragraphs,
        ["Quarterly report", "Revenue grew sharply, see appendix\t.\n", ""]
    );

    let heading = body.paragraphs().next().expect("heading");
    let jc = heading.ppr.as_ref().and_then(|ppr| ppr.jc.as_ref());
    assert_eq!(jc.and_then(|jc| jc.val.get()), Some(StJc::Center));
    let EgParagraphContent::Run(run) = &heading.content[0] else {
        panic!("heading starts with a run");
    };
    assert!(is_bold(run));
    assert_eq!(font_size_points(run), Some(16.0));

    let equation = body
        .paragraphs()
        .flat_map(|p| &p.content)
        .find_map(|content| match content {
            EgParagraphContent::Math(math) => Some(math.linear_text()),
            _ => None,
        });
    assert_eq!(equation.as_deref(), Some("(a)/(b^(2))"));

    assert!(matches!(body.blocks.last(), Some(EgBlockContent::Table(_))));

    let xml = assert_round_trip(&document)?;
    assert!(xml.contains(r#"<w:t xml:space="preserve">Revenue grew </w:t>"#), "{xml}");
    assert!(!xml.contains("mc:Ignorable"), "{xml}");
    Ok(())
}

#[test]
fn workbook_round_trips_with_extension_list() -> Result<()> {
    let workbook = decode_fixture::<CtWorkbook>("workbook.xml")?;
    workbook.validate()?;
    assert_eq!(workbook.sheet_names().collect::<Vec<_>>(), ["Summary", "Data", "Lookup"]);
    assert_eq!(
        workbook.sheet("Lookup").map(|sheet| sheet.state),
        Some(EnumValue::new(StSheetState::VeryHidden))
    );

    let xml = assert_round_trip(&workbook)?;
    assert!(xml.contains(r#"<x15:workbookPr chartTrackingRefBase="1"/>"#), "{xml}");
    Ok(())
}

#[test]
fn worksheet_round_trips_compact_and_indented() -> Result<()> {
    let sheet = decode_fixture::<CtWorksheet>("sheet1.xml")?;
    sheet.validate()?;

    assert_eq!(sheet.cells().count(), 9);
    let b3 = sheet.cell("B3").expect("B3");
    let formula = b3.formula.as_ref().expect("shared formula");
    assert_eq!(formula.formula_type.get(), Some(StCellFormulaType::Shared));
    assert_eq!(formula.reference.as_deref(), Some("B3:C3"));
    assert_eq!(b3.raw_value(), Some("1250.5"));
    let a3 = sheet.cell("A3").expect("A3");
    assert_eq!(a3.cell_type.get(), Some(StCellType::InlineString));
    assert_eq!(a3.inline.as_ref().map(|is| is.plain_text()).as_deref(), Some("Total"));
    assert_eq!(sheet.sheet_data.rows[1].height, Some(20.25));

    assert_round_trip(&sheet)?;

    let indented = EncodeOptions {
        xml_declaration: true,
        indent: Some(2),
    };
    let (again, xml) = reencode(&sheet, &indented)?;
    assert!(xml.starts_with("<?xml"), "{xml}");
    assert!(xml.contains("\n  <sheetData>"), "{xml}");
    assert_eq!(again, sheet);
    Ok(())
}

#[test]
fn pivot_cache_keeps_shared_item_order() -> Result<()> {
    let cache = decode_fixture::<CtPivotCacheDefinition>("pivotCacheDefinition1.xml")?;
    cache.validate()?;
    assert_eq!(cache.id.as_deref(), Some("rId1"));

    let region = &cache.cache_fields.fields[0];
    let items = &region.shared_items.as_ref().expect("items").items;
    assert!(matches!(
        items.as_slice(),
        [
            EgSharedItem::String(_),
            EgSharedItem::String(_),
            EgSharedItem::Missing(_),
            EgSharedItem::Error(_)
        ]
    ));

    let xml = assert_round_trip(&cache)?;
    assert!(xml.contains(r##"<s v="North"/><s v="South"/><m/><e v="#N/A"/>"##), "{xml}");
    Ok(())
}

#[test]
fn presentation_round_trips() -> Result<()> {
    let presentation = decode_fixture::<CtPresentation>("presentation.xml")?;
    presentation.validate()?;
    assert_eq!(
        presentation.slide_rel_ids().collect::<Vec<_>>(),
        ["rId2", "rId3", "rId4"]
    );
    assert_round_trip(&presentation)?;
    Ok(())
}

#[test]
fn slide_resolves_chart_reference_in_graphic_frame() -> Result<()> {
    let slide = decode_fixture::<CtSlide>("slide1.xml")?;
    slide.validate()?;

    let shapes = slide.shapes();
    let names: Vec<_> = shapes.iter().map(|shape| shape.name()).collect();
    assert_eq!(names, ["Title 1", "Chart 2"]);

    let EgShape::GraphicFrame(frame) = shapes[1] else {
        panic!("second shape is a graphic frame");
    };
    let content: Vec<_> = frame.graphic.data.content.iter().collect();
    assert_eq!(content.len(), 1);
    assert!(matches!(content[0], AnyElement::Typed { .. }));
    assert_eq!(
        content[0].downcast_ref::<CtChartReference>(),
        Some(&CtChartReference::new("rId2"))
    );

    let xml = assert_round_trip(&slide)?;
    assert!(xml.contains(&format!(r#"<c:chart xmlns:c="{CHART}" r:id="rId2"/>"#)), "{xml}");
    Ok(())
}

#[test]
fn chart_space_round_trips_plot_area_verbatim() -> Result<()> {
    let chart = decode_fixture::<CtChartSpace>("chart1.xml")?;
    chart.validate()?;
    assert_eq!(
        chart.chart.plot_area.chart_kinds().collect::<Vec<_>>(),
        ["barChart", "lineChart"]
    );
    let legend = chart.chart.legend.as_ref().expect("legend");
    assert_eq!(
        legend.position.as_ref().and_then(|pos| pos.val.get()),
        Some(StLegendPos::Bottom)
    );

    let xml = assert_round_trip(&chart)?;
    assert!(xml.contains(r#"<c:ser><c:idx val="0"/><c:order val="0"/><c:tx><c:v>North</c:v></c:tx></c:ser>"#));
    Ok(())
}

#[test]
fn built_documents_encode_without_declaration() -> Result<()> {
    let document = CtDocument::from_paragraphs(["first", " padded "]);
    let xml = codec::to_string(&document, &compact())?;
    assert!(xml.starts_with("<w:document "), "{xml}");
    assert!(xml.contains(r#"<w:t xml:space="preserve"> padded </w:t>"#), "{xml}");
    assert_round_trip(&document)?;
    Ok(())
}
