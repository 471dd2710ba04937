//! Behaviour of the generic codec against small hand-declared schema types.

mod support;

use anyhow::Result;
use assert_matches::assert_matches;
use ooxml_model::codec::{
    self, AnyContent, DecodeContext, DecodeOptions, DiagnosticKind, OpenContent, Strictness,
};
use ooxml_model::error::{CodecError, ErrorCode};
use ooxml_model::parts::drawing::CtTextNormalAutofit;
use ooxml_model::parts::shared::CtRelId;
use ooxml_model::validation::Facet;
use ooxml_model::xml::namespaces::{CHART, DRAWING, RELATIONSHIPS, a};
use ooxml_model::xml::{QName, StartTag, StaticName, Token, TokenBuffer};
use ooxml_model::{Aggregate, ElementRegistry, aggregate, choice_group, lens};
use support::compact;

const ROOT: StaticName = StaticName::unqualified("Root");
const ITEM: StaticName = StaticName::unqualified("item");
const NODE: StaticName = StaticName::unqualified("node");
const HOLDER: StaticName = StaticName::unqualified("h");

#[derive(Debug, Clone, Default, PartialEq)]
struct CtEntry {
    value: i32,
}

aggregate!(CtEntry, "CT_Entry", |schema| schema
    .required_attribute(StaticName::unqualified("Value"), lens!(value))
    .facet(Facet::MaxInclusive(100.0)));

#[derive(Debug, Clone, Default, PartialEq)]
struct CtRoot {
    children: Vec<CtEntry>,
}

aggregate!(CtRoot, "Root", |schema| schema
    .children(StaticName::unqualified("Children"), lens!(children)));

#[derive(Debug, Clone, Default, PartialEq)]
struct CtFlag {
    val: Option<bool>,
}

aggregate!(CtFlag, "CT_Flag", |schema| schema
    .optional_attribute(StaticName::unqualified("val"), lens!(val)));

#[derive(Debug, Clone, Default, PartialEq)]
struct CtItem {
    idx: i32,
    flag: Option<CtFlag>,
}

aggregate!(CtItem, "CT_Item", |schema| schema
    .required_attribute(StaticName::unqualified("idx"), lens!(idx))
    .optional_child(StaticName::unqualified("flag"), lens!(flag)));

#[derive(Debug, Clone, Default, PartialEq)]
struct CtCircle {
    radius: f64,
}

aggregate!(CtCircle, "CT_Circle", |schema| schema
    .required_attribute(StaticName::unqualified("r"), lens!(radius)));

#[derive(Debug, Clone, Default, PartialEq)]
struct CtSquare {
    side: f64,
}

aggregate!(CtSquare, "CT_Square", |schema| schema
    .required_attribute(StaticName::unqualified("side"), lens!(side))
    .facet(Facet::MinInclusive(0.0)));

choice_group! {
    enum EgOutline("EG_Outline") {
        Circle(StaticName::unqualified("circle") => CtCircle),
        Square(StaticName::unqualified("square") => CtSquare),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct CtFigure {
    outline: Option<EgOutline>,
}

aggregate!(CtFigure, "CT_Figure", |schema| schema.choice(lens!(outline)));

#[derive(Debug, Clone, Default, PartialEq)]
struct CtCanvas {
    outlines: Vec<EgOutline>,
}

aggregate!(CtCanvas, "CT_Canvas", |schema| schema.choices(lens!(outlines)));

#[derive(Debug, Clone, Default, PartialEq)]
struct CtNode {
    nodes: Vec<CtNode>,
}

aggregate!(CtNode, "CT_Node", |schema| schema.children(NODE, lens!(nodes)));

#[derive(Debug, Clone, Default, PartialEq)]
struct CtHolder {
    content: AnyContent,
}

aggregate!(CtHolder, "CT_Holder", |schema| schema
    .open_content(lens!(content), OpenContent::resolved()));

fn decode_item(xml: &str) -> Result<codec::Decoded<CtItem>, CodecError> {
    codec::from_str_as::<CtItem>(ITEM, xml, &DecodeContext::standard())
}

// =============================================================================
// Validation paths
// =============================================================================

#[test]
fn validation_reports_path_to_offending_attribute() {
    let root = CtRoot {
        children: vec![
            CtEntry { value: 1 },
            CtEntry { value: 50 },
            CtEntry { value: 101 },
        ],
    };
    let err = root.validate().unwrap_err();
    assert_eq!(err.path, "Root/Children[2]/Value");
    assert!(err.message.contains("100"), "{}", err.message);
}

#[test]
fn validation_stops_at_first_violation() {
    let root = CtRoot {
        children: vec![CtEntry { value: 500 }, CtEntry { value: 600 }],
    };
    assert_eq!(root.validate().unwrap_err().path, "Root/Children[0]/Value");
}

#[test]
fn decoded_values_are_not_validated_implicitly() -> Result<()> {
    let xml = r#"<Root><Children Value="7"/><Children Value="900"/></Root>"#;
    let decoded = codec::from_str_as::<CtRoot>(ROOT, xml, &DecodeContext::standard())?;
    assert!(decoded.is_clean());
    assert_eq!(decoded.value.children[1].value, 900);
    assert_eq!(decoded.value.validate().unwrap_err().path, "Root/Children[1]/Value");
    Ok(())
}

// =============================================================================
// Attributes and optional children
// =============================================================================

#[test]
fn absent_optional_child_is_not_written() -> Result<()> {
    let decoded = decode_item(r#"<item idx="5"/>"#)?;
    assert!(decoded.is_clean());
    assert_eq!(decoded.value, CtItem { idx: 5, flag: None });
    decoded.value.validate()?;

    let xml = codec::to_string_as(ITEM, &decoded.value, &compact())?;
    assert_eq!(xml, r#"<item idx="5"/>"#);
    Ok(())
}

#[test]
fn present_optional_child_round_trips() -> Result<()> {
    let decoded = decode_item(r#"<item idx="2"><flag val="true"/></item>"#)?;
    let item = decoded.into_strict()?;
    assert_eq!(item.flag, Some(CtFlag { val: Some(true) }));

    let xml = codec::to_string_as(ITEM, &item, &compact())?;
    assert_eq!(xml, r#"<item idx="2"><flag val="1"/></item>"#);
    Ok(())
}

#[test]
fn repeated_optional_child_keeps_the_last() -> Result<()> {
    let item = decode_item(r#"<item idx="5"><flag val="0"/><flag val="1"/></item>"#)?.into_strict()?;
    assert_eq!(item.flag, Some(CtFlag { val: Some(true) }));
    Ok(())
}

#[test]
fn missing_required_attribute_keeps_default_and_is_written() -> Result<()> {
    let item = decode_item("<item/>")?.into_strict()?;
    assert_eq!(item.idx, 0);
    assert_eq!(codec::to_string_as(ITEM, &item, &compact())?, r#"<item idx="0"/>"#);
    Ok(())
}

#[test]
fn unconvertible_scalar_is_an_error() {
    let err = decode_item(r#"<item idx="five"/>"#).unwrap_err();
    assert_matches!(err, CodecError::InvalidScalar { ref name, ref value, .. } if name == "idx" && value == "five");
    assert_eq!(err.code(), ErrorCode::InvalidScalar);
}

#[test]
fn repeated_choice_members_are_indexed_per_branch() {
    let canvas = CtCanvas {
        outlines: vec![
            EgOutline::Square(CtSquare { side: 1.0 }),
            EgOutline::Circle(CtCircle { radius: 2.0 }),
            EgOutline::Square(CtSquare { side: -1.0 }),
        ],
    };
    assert_eq!(canvas.validate().unwrap_err().path, "CT_Canvas/square[1]/side");
}

// =============================================================================
// Leniency
// =============================================================================

#[test]
fn unknown_elements_and_attributes_are_skipped() -> Result<()> {
    let xml = r#"<item idx="3" extra="x"><mystery a="1"><deeper>text</deeper></mystery><flag/></item>"#;
    let decoded = decode_item(xml)?;

    assert_eq!(decoded.value.idx, 3);
    assert_eq!(decoded.value.flag, Some(CtFlag::default()));
    assert_eq!(decoded.count(DiagnosticKind::UnknownAttribute), 1);
    assert_eq!(decoded.count(DiagnosticKind::UnknownElement), 1);

    let element = decoded
        .diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::UnknownElement)
        .expect("unknown element diagnostic");
    assert_eq!(element.path, "item/mystery");
    Ok(())
}

#[test]
fn unknown_element_between_known_siblings_is_dropped() -> Result<()> {
    let xml = r#"<Root><Children Value="1"/><Bogus><Children Value="99"/></Bogus><Children Value="2"/></Root>"#;
    let decoded = codec::from_str_as::<CtRoot>(ROOT, xml, &DecodeContext::standard())?;
    assert_eq!(
        decoded.value.children,
        [CtEntry { value: 1 }, CtEntry { value: 2 }]
    );
    assert_eq!(decoded.diagnostics.len(), 1);
    assert_eq!(decoded.diagnostics[0].path, "Root/Bogus");
    Ok(())
}

#[test]
fn unresolved_open_content_is_dropped_and_reported() -> Result<()> {
    let xml = format!(
        r#"<h xmlns:c="{CHART}" xmlns:r="{RELATIONSHIPS}"><x a="1"><deep>text</deep></x><c:chart r:id="rId1"/><z/></h>"#
    );
    let decoded = codec::from_str_as::<CtHolder>(HOLDER, &xml, &DecodeContext::standard())?;

    assert_eq!(decoded.value.content.len(), 1);
    assert_eq!(
        decoded.value.content.typed::<CtRelId>().collect::<Vec<_>>(),
        [&CtRelId::new("rId1")]
    );
    assert_eq!(decoded.count(DiagnosticKind::UnresolvedElement), 2);
    let paths: Vec<_> = decoded.diagnostics.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, ["h/x", "h/z"]);

    let encoded = codec::to_string_as(HOLDER, &decoded.value, &compact())?;
    assert!(encoded.contains(r#"r:id="rId1""#), "{encoded}");
    assert!(!encoded.contains("<x") && !encoded.contains("deep") && !encoded.contains("<z"), "{encoded}");

    let empty = ElementRegistry::empty();
    let holder = codec::from_str_as::<CtHolder>(HOLDER, &xml, &DecodeContext::new(&empty))?;
    assert_eq!(holder.count(DiagnosticKind::UnresolvedElement), 3);
    assert!(holder.value.content.is_empty());
    assert_eq!(codec::to_string_as(HOLDER, &holder.value, &compact())?, "<h/>");
    Ok(())
}

#[test]
fn unmatched_union_attribute_is_left_absent() -> Result<()> {
    let xml = format!(r#"<a:normAutofit xmlns:a="{DRAWING}" fontScale="lots"/>"#);
    let decoded = codec::from_str_as::<CtTextNormalAutofit>(
        a("normAutofit"),
        &xml,
        &DecodeContext::standard(),
    )?;
    assert_eq!(decoded.value.font_scale, None);
    assert_eq!(decoded.count(DiagnosticKind::UnmatchedUnion), 1);
    assert_eq!(decoded.diagnostics[0].path, "normAutofit");

    let encoded = codec::to_string_as(a("normAutofit"), &decoded.value, &compact())?;
    assert!(!encoded.contains("fontScale"), "{encoded}");
    assert_matches!(decoded.into_strict(), Err(CodecError::Strict(_)));
    Ok(())
}

#[test]
fn strict_decoding_fails_on_first_leniency() {
    let context = DecodeContext::standard().strict();
    let err = codec::from_str_as::<CtItem>(ITEM, r#"<item idx="1"><mystery/></item>"#, &context)
        .unwrap_err();
    let CodecError::Strict(diagnostic) = &err else {
        panic!("expected a strict violation, got {err:?}");
    };
    assert_eq!(diagnostic.kind, DiagnosticKind::UnknownElement);
    assert_eq!(err.code(), ErrorCode::StrictViolation);
    assert!(!err.code().is_fatal());
}

#[test]
fn lenient_result_can_be_made_strict_afterwards() -> Result<()> {
    let decoded = decode_item(r#"<item idx="1" other="2"/>"#)?;
    assert!(!decoded.is_clean());
    assert_matches!(decoded.into_strict(), Err(CodecError::Strict(_)));
    Ok(())
}

#[test]
fn compatibility_attributes_are_ignored_silently() -> Result<()> {
    let xml = r#"<item xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" mc:Ignorable="w14" idx="4"/>"#;
    let decoded = decode_item(xml)?;
    assert!(decoded.is_clean(), "{:?}", decoded.diagnostics);
    assert_eq!(decoded.value.idx, 4);
    Ok(())
}

// =============================================================================
// Choice groups
// =============================================================================

#[test]
fn later_choice_branch_replaces_earlier_one() -> Result<()> {
    let xml = r#"<figure><circle r="1.5"/><square side="2"/></figure>"#;
    let figure = codec::from_str_as::<CtFigure>(
        StaticName::unqualified("figure"),
        xml,
        &DecodeContext::standard(),
    )?
    .into_strict()?;
    assert_eq!(figure.outline, Some(EgOutline::Square(CtSquare { side: 2.0 })));

    let encoded = codec::to_string_as(StaticName::unqualified("figure"), &figure, &compact())?;
    assert_eq!(encoded, r#"<figure><square side="2"/></figure>"#);
    Ok(())
}

// =============================================================================
// Structural errors
// =============================================================================

#[test]
fn truncated_token_stream_is_rejected() {
    let mut tokens = TokenBuffer::from(vec![
        Token::Start(StartTag::new(ITEM).with_attribute(StaticName::unqualified("idx"), "1")),
        Token::Start(StartTag::new(StaticName::unqualified("flag"))),
    ]);
    let err = codec::from_tokens_as::<CtItem>(ITEM, &mut tokens, &DecodeContext::standard())
        .unwrap_err();
    assert_matches!(err, CodecError::UnexpectedEof { ref element } if element == "flag");
    assert_eq!(err.code(), ErrorCode::Truncated);
}

#[test]
fn mismatched_end_token_is_rejected() {
    let mut tokens = TokenBuffer::from(vec![
        Token::Start(StartTag::new(ITEM)),
        Token::End(QName::unqualified("other")),
    ]);
    let err = codec::from_tokens_as::<CtItem>(ITEM, &mut tokens, &DecodeContext::standard())
        .unwrap_err();
    assert_matches!(err, CodecError::MismatchedEnd { .. });
}

#[test]
fn empty_input_has_no_root() {
    for xml in ["", "   ", "<?xml version=\"1.0\"?>\n<!-- nothing -->"] {
        let err = decode_item(xml).unwrap_err();
        assert_matches!(err, CodecError::EmptyDocument);
    }
}

#[test]
fn unexpected_root_is_rejected() {
    let err = decode_item(r#"<other idx="1"/>"#).unwrap_err();
    assert_matches!(err, CodecError::UnexpectedRoot { ref expected, ref found } if expected == "item" && found == "other");
}

#[test]
fn nesting_beyond_limit_is_rejected() -> Result<()> {
    let xml = "<node><node><node/></node></node>";
    let options = DecodeOptions {
        strictness: Strictness::Lenient,
        max_depth: 2,
    };
    let context = DecodeContext::new(ElementRegistry::standard()).with_options(options);
    let err = codec::from_str_as::<CtNode>(NODE, xml, &context).unwrap_err();
    assert_matches!(err, CodecError::DepthExceeded { limit: 2 });

    let relaxed = context.with_options(DecodeOptions {
        max_depth: 3,
        ..options
    });
    let node = codec::from_str_as::<CtNode>(NODE, xml, &relaxed)?.into_strict()?;
    assert_eq!(node.nodes[0].nodes.len(), 1);
    Ok(())
}

#[test]
fn malformed_xml_surfaces_tokenizer_error() {
    let err = decode_item(r#"<item idx="1"><flag></item>"#).unwrap_err();
    assert!(err.code().is_fatal());
    assert_matches!(err.code(), ErrorCode::MalformedXml | ErrorCode::MismatchedEnd);
}

// =============================================================================
// Token streams
// =============================================================================

#[test]
fn token_round_trip_matches_text_round_trip() -> Result<()> {
    let item = CtItem {
        idx: 9,
        flag: Some(CtFlag { val: Some(false) }),
    };
    let mut tokens = TokenBuffer::new();
    codec::to_tokens_as(ITEM, &item, &mut tokens)?;
    assert_eq!(tokens.len(), 4);

    let decoded = codec::from_tokens_as::<CtItem>(ITEM, &mut tokens, &DecodeContext::standard())?;
    assert_eq!(decoded.into_strict()?, item);
    Ok(())
}
