//! Common test helpers and fixtures shared across the test suite.

#![allow(dead_code)]

use marc_crosswalk::{Field, Record};

/// A single-record collection describing a 1943 social-areas map of Chicago.
pub const CHISOC_MAP: &str = include_str!("../data/chisoc_map.xml");

/// Persistent identifier carried in the fixture's 856 $u.
pub const CHISOC_PI: &str = "http://pi.lib.uchicago.edu/1001/maps/chisoc/G4104-C6E625-1943-M3";

/// Route library logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// The fixture record, parsed.
pub fn chisoc_record() -> Record {
    Record::from_marcxml(CHISOC_MAP).expect("fixture parses")
}

/// Wrap bare `<datafield>` markup in a MARCXML record.
pub fn marcxml(datafields: &str) -> String {
    format!(r#"<record xmlns="http://www.loc.gov/MARC21/slim">{datafields}</record>"#)
}

/// A record with one field per `(tag, subfields)` pair, blank indicators.
pub fn record_with(fields: &[(&str, &[(char, &str)])]) -> Record {
    fields
        .iter()
        .fold(Record::builder(), |builder, (tag, subfields)| {
            let field = subfields
                .iter()
                .fold(Field::new(*tag, ' ', ' '), |field, (code, value)| {
                    field.with_subfield(*code, *value)
                });
            builder.field(field)
        })
        .build()
}
