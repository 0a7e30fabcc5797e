//! Schema.org conversion.

mod common;

use common::{chisoc_record, init_tracing, record_with, CHISOC_MAP, CHISOC_PI};
use marc_crosswalk::{CreatorType, MappingTable, SchemaOrg, SchemaValue};
use serde_json::{json, Value};

#[test]
fn test_fixture_document() {
    init_tracing();
    let schema = SchemaOrg::from_record(&chisoc_record()).unwrap();
    let doc = schema.to_value();

    assert_eq!(doc["@context"], "https://schema.org");
    assert_eq!(doc["@type"], "Map");
    assert_eq!(
        doc["creator"],
        json!({"@type": "Person", "name": "Mayer, Harold M."})
    );
    assert_eq!(doc["name"], "Chicago : social areas.");
    assert_eq!(doc["url"], CHISOC_PI);
    assert_eq!(doc["mapType"], "Thematic maps");
    assert_eq!(doc["inLanguage"], "eng");
    assert_eq!(doc["height"], "28 x 22 cm");
    assert!(doc.get("genre").is_none());
    assert!(doc.get("identifier").is_none());
}

#[test]
fn test_single_rule_joins_subject_subdivisions() {
    let schema = SchemaOrg::from_record(&chisoc_record()).unwrap();
    assert_eq!(
        schema.get("about"),
        Some(&SchemaValue::Text("G4104.C6E25 1943 .M3 Chicago Illinois".into()))
    );
}

#[test]
fn test_multiple_values_become_sorted_list() {
    let record = record_with(&[
        ("700", &[('a', "Wright, John K.")]),
        ("710", &[('a', "American Geographical Society")]),
    ]);
    let schema = SchemaOrg::from_record(&record).unwrap();
    assert_eq!(
        schema.to_value()["contributor"],
        json!(["American Geographical Society", "Wright, John K."])
    );
}

#[test]
fn test_organization_creator() {
    let record = record_with(&[("110", &[('a', "Chicago Plan Commission")])]);
    let schema = SchemaOrg::from_record(&record).unwrap();
    assert_eq!(schema.creators().len(), 1);
    assert_eq!(schema.creators()[0].creator_type, CreatorType::Organization);
}

#[test]
fn test_statement_of_responsibility_fallback() {
    let record = record_with(&[("245", &[('a', "Chicago"), ('c', "by the Census Bureau")])]);
    let schema = SchemaOrg::from_record(&record).unwrap();
    assert_eq!(schema.creators()[0].name, "by the Census Bureau");
    assert_eq!(schema.creators()[0].creator_type, CreatorType::Organization);
}

#[test]
fn test_no_creator_is_omitted() {
    let record = record_with(&[("245", &[('a', "Chicago")])]);
    let doc = SchemaOrg::from_record(&record).unwrap().to_value();
    assert!(doc.get("creator").is_none());
}

#[test]
fn test_json_string_is_four_space_indented() {
    let json = SchemaOrg::from_marcxml(CHISOC_MAP)
        .unwrap()
        .to_json_string()
        .unwrap();
    assert!(json.starts_with("{\n    \"@context\": \"https://schema.org\",\n    \"@type\": \"Map\","));
    let parsed: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["name"], "Chicago : social areas.");
}

#[test]
fn test_key_order_is_context_type_creator_then_table() {
    let doc = SchemaOrg::from_record(&chisoc_record()).unwrap().to_value();
    let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
    assert_eq!(&keys[..3], &["@context", "@type", "creator"]);
    let about = keys.iter().position(|k| k == "about").unwrap();
    let width = keys.iter().position(|k| k == "width").unwrap();
    assert!(about < width);
}

#[test]
fn test_custom_table() {
    let table = MappingTable::from_json(
        "titles",
        r#"[{"element": "headline", "repeatable_target": false,
             "fields": [["245", "a", ".", "."]], "strip": "[ :]*$"}]"#,
    )
    .unwrap();
    let schema = SchemaOrg::from_record_with_table(&chisoc_record(), &table).unwrap();
    assert_eq!(schema.properties().len(), 1);
    assert_eq!(schema.get("headline").and_then(SchemaValue::as_text), Some("Chicago"));
}
