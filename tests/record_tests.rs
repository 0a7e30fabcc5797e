//! Parsing the fixture and querying fields.

mod common;

use common::{chisoc_record, CHISOC_MAP};
use marc_crosswalk::marcxml::parse_collection;
use marc_crosswalk::{FieldQuery, MarcError, Record};

#[test]
fn test_fixture_structure() {
    let record = chisoc_record();
    assert_eq!(record.leader(), Some("01421cem a2200361Ii 4500"));
    assert_eq!(record.control_field("001"), Some("11329735"));
    assert_eq!(record.fields_by_tag("650").count(), 2);
    assert_eq!(parse_collection(CHISOC_MAP).unwrap().len(), 1);
}

#[test]
fn test_only_lcgft_genre_headings_survive() {
    let record = chisoc_record();
    assert_eq!(
        record.extract("655", "[a]", ".", ".").unwrap(),
        vec!["Thematic maps."]
    );
}

#[test]
fn test_extract_in_document_order() {
    let record = chisoc_record();
    assert_eq!(
        record.extract("650", "[ax]", ".", ".").unwrap(),
        vec!["Sociology", "Chicago", "Sociology", "Illinois"]
    );
    assert_eq!(
        record.extract("050", "[a-z]", ".", "4").unwrap(),
        vec!["G4104.C6E25 1943", ".M3"]
    );
    assert!(record.extract("050", "[a-z]", ".", "0").unwrap().is_empty());
}

#[test]
fn test_control_fields_ignore_subfield_pattern() {
    let record = chisoc_record();
    assert_eq!(record.extract("001", "z", ".", ".").unwrap(), vec!["11329735"]);
}

#[test]
fn test_indicator_patterns_are_prefix_matches() {
    let record = chisoc_record();
    let query = FieldQuery::new("264", "[abc]", "[ 1]", "1").unwrap();
    assert_eq!(
        record.get_marc_field(&query),
        vec!["Chicago", "University of Chicago", "1943"]
    );
}

#[test]
fn test_invalid_pattern_is_a_configuration_error() {
    assert!(matches!(
        chisoc_record().extract("245", "[a", ".", "."),
        Err(MarcError::ConfigurationError(_))
    ));
}

#[test]
fn test_multiple_records() {
    let xml = r#"<marc:collection xmlns:marc="http://www.loc.gov/MARC21/slim">
      <marc:record><marc:controlfield tag="001">a</marc:controlfield></marc:record>
      <marc:record><marc:controlfield tag="001">b</marc:controlfield></marc:record>
    </marc:collection>"#;
    let records = Record::collection_from_marcxml(xml).unwrap();
    let ids: Vec<_> = records.iter().filter_map(|r| r.control_field("001")).collect();
    assert_eq!(ids, vec!["a", "b"]);
}
