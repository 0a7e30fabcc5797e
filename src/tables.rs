//! Built-in mapping tables.
//!
//! Two tables ship with the crate: Dublin Core (feeding the XML emitter and,
//! through it, EDM) and Schema.org. Both are compiled once on first use and
//! shared read-only by every conversion.
//!
//! The Dublin Core crosswalk differs from the Library of Congress
//! `MARC21slim2SRWDC.xsl` stylesheet in places: it is tuned for cartographic
//! material, so geographic and form subdivisions (`650 $v`, `651 $v`) feed
//! `dc:type`, and a bare "Maps" form term is dropped.

use lazy_static::lazy_static;

use crate::error::{MarcError, Result};
use crate::mapping::{MappingTable, QueryDef, Repeatability, RuleDef};

use Repeatability::{JoinedRepeat, Single, SubfieldRepeat};

/// Trailing periods and spaces.
const TRAILING_PUNCTUATION: &str = "[. ]*$";

/// A bare "Maps" form term, or trailing punctuation.
const MAPS_FORM_TERM: &str = "^Maps[. ]*$|[. ]*$";

/// Standard number fields 020-029, all subfields, followed by any extra queries.
macro_rules! standard_numbers {
    ($($extra:expr),* $(,)?) => {
        &[
            ("020", "[a-z]", ".", "."),
            ("021", "[a-z]", ".", "."),
            ("022", "[a-z]", ".", "."),
            ("023", "[a-z]", ".", "."),
            ("024", "[a-z]", ".", "."),
            ("025", "[a-z]", ".", "."),
            ("026", "[a-z]", ".", "."),
            ("027", "[a-z]", ".", "."),
            ("028", "[a-z]", ".", "."),
            ("029", "[a-z]", ".", "."),
            $($extra,)*
        ]
    };
}

const STANDARD_NUMBERS: &[QueryDef] = standard_numbers!();

const DC_IDENTIFIERS: &[QueryDef] = standard_numbers!(("856", "u", ".", "."));

const TITLES: &[QueryDef] = &[
    ("130", "[a-z]", ".", "."),
    ("240", "[a-z]", ".", "."),
    ("245", "[ab]", ".", "."),
];

const fn rule(
    element: &'static str,
    repeatability: Repeatability,
    fields: &'static [QueryDef],
    cleanup: Option<&'static str>,
) -> RuleDef {
    RuleDef {
        element,
        repeatability,
        fields,
        cleanup,
    }
}

/// Dublin Core rules. Element names use `DC.` / `DCTERMS.` prefixes.
pub const DUBLIN_CORE_RULES: &[RuleDef] = &[
    rule("DC.rights.access", Single, &[("506", "[a-z]", ".", ".")], None),
    rule(
        "DC.contributor",
        JoinedRepeat,
        &[("700", "a", ".", "."), ("710", "a", ".", ".")],
        None,
    ),
    rule(
        "DC.creator",
        JoinedRepeat,
        &[
            ("100", "[a-z]", ".", "."),
            ("110", "[a-z]", ".", "."),
            ("111", "[a-z]", ".", "."),
            ("533", "c", ".", "."),
        ],
        None,
    ),
    rule("DC.date", JoinedRepeat, &[("533", "d", ".", ".")], None),
    rule(
        "DC.description",
        Single,
        &[("500", "[a-z]", ".", "."), ("538", "[a-z]", ".", ".")],
        None,
    ),
    rule("DC.format", JoinedRepeat, &[("255", "[ab]", ".", ".")], None),
    rule("DC.relation.hasFormat", JoinedRepeat, &[("533", "a", ".", ".")], None),
    rule("DC.identifier", JoinedRepeat, DC_IDENTIFIERS, None),
    rule(
        "DC.relation.isPartOf",
        JoinedRepeat,
        &[
            ("533", "f", ".", "."),
            ("700", "t", ".", "."),
            ("830", "[a-z]", ".", "."),
        ],
        None,
    ),
    rule("DC.language", SubfieldRepeat, &[("041", "[a-z]", ".", ".")], None),
    rule("DC.medium", SubfieldRepeat, &[("338", "[a-z]", ".", ".")], None),
    rule(
        "DC.coverage.location",
        JoinedRepeat,
        &[("264", "a", "1", "."), ("533", "b", ".", ".")],
        None,
    ),
    rule("DC.coverage.periodOfTime", JoinedRepeat, &[("650", "y", ".", ".")], None),
    rule(
        "DC.publisher",
        JoinedRepeat,
        &[("260", "b", ".", "."), ("264", "b", "1", ".")],
        None,
    ),
    rule("DC.relation", JoinedRepeat, &[("730", "a", ".", ".")], None),
    rule(
        "DC.subject",
        JoinedRepeat,
        &[("050", "[a-z]", ".", ".")],
        Some(TRAILING_PUNCTUATION),
    ),
    rule(
        "DC.subject",
        SubfieldRepeat,
        &[("650", "[ax]", ".", ".")],
        Some(TRAILING_PUNCTUATION),
    ),
    rule("DC.title", JoinedRepeat, TITLES, None),
    rule(
        "DC.type",
        JoinedRepeat,
        &[
            ("336", "[a-z]", ".", "."),
            ("650", "v", ".", "."),
            ("651", "v", ".", "."),
        ],
        Some(MAPS_FORM_TERM),
    ),
    rule("DCTERMS.alternative", JoinedRepeat, &[("246", "[a-z]", ".", ".")], None),
    rule("DCTERMS.dateCopyrighted", JoinedRepeat, &[("264", "c", "4", ".")], None),
    rule("DCTERMS.extent", JoinedRepeat, &[("300", "[ac]", ".", ".")], None),
    rule(
        "DCTERMS.issued",
        JoinedRepeat,
        &[("260", "c", ".", "."), ("264", "c", "1", ".")],
        None,
    ),
    rule(
        "DCTERMS.location",
        JoinedRepeat,
        &[
            ("260", "a", ".", "."),
            ("264", "a", "1", "."),
            ("533", "b", ".", "."),
        ],
        None,
    ),
];

/// Schema.org rules. `creator` is computed separately.
pub const SCHEMA_ORG_RULES: &[RuleDef] = &[
    rule(
        "about",
        Single,
        &[("050", "[a-z]", ".", "."), ("650", "x", ".", ".")],
        Some(TRAILING_PUNCTUATION),
    ),
    rule("alternativeName", Single, &[("246", "[a-z]", ".", ".")], None),
    rule(
        "contentLocation",
        Single,
        &[
            ("043", "[a-z]", ".", "."),
            ("052", "[a-z]", ".", "."),
            ("651", "a", ".", "."),
        ],
        None,
    ),
    rule(
        "contributor",
        JoinedRepeat,
        &[("700", "a", ".", "."), ("710", "a", ".", ".")],
        None,
    ),
    rule("copyrightYear", JoinedRepeat, &[("264", "c", "4", ".")], None),
    rule("dateCreated", JoinedRepeat, &[("533", "d", ".", ".")], None),
    rule("datePublished", JoinedRepeat, &[("264", "c", "1", ".")], None),
    rule(
        "description",
        Single,
        &[("500", "[a-z]", ".", "."), ("538", "[a-z]", ".", ".")],
        None,
    ),
    rule("encoding", JoinedRepeat, &[("533", "a", ".", ".")], None),
    rule("height", JoinedRepeat, &[("300", "c", ".", ".")], None),
    rule(
        "genre",
        JoinedRepeat,
        &[("650", "v", ".", "."), ("651", "v", ".", ".")],
        Some(MAPS_FORM_TERM),
    ),
    rule("identifier", JoinedRepeat, STANDARD_NUMBERS, None),
    rule("inLanguage", JoinedRepeat, &[("041", "[a-z]", ".", ".")], None),
    rule("isAccessibleForFree", Single, &[("506", "[a-z]", ".", ".")], None),
    rule(
        "isPartOf",
        JoinedRepeat,
        &[
            ("490", "[a-z]", ".", "."),
            ("533", "f", ".", "."),
            ("700", "[at]", ".", "."),
            ("830", "[a-z]", ".", "."),
        ],
        None,
    ),
    rule(
        "locationCreated",
        JoinedRepeat,
        &[("264", "a", "1", "."), ("533", "b", ".", ".")],
        None,
    ),
    rule(
        "mapType",
        SubfieldRepeat,
        &[("655", "a", ".", ".")],
        Some(TRAILING_PUNCTUATION),
    ),
    rule("name", JoinedRepeat, TITLES, None),
    rule("publisher", JoinedRepeat, &[("264", "b", "1", ".")], None),
    rule("spatialCoverage", Single, &[("255", "[a-z]", ".", ".")], None),
    rule("temporalCoverage", JoinedRepeat, &[("650", "y", ".", ".")], None),
    rule("url", JoinedRepeat, &[("856", "u", ".", ".")], None),
    rule("width", JoinedRepeat, &[("300", "c", ".", ".")], None),
];

lazy_static! {
    static ref DUBLIN_CORE: std::result::Result<MappingTable, String> =
        MappingTable::from_defs("dublin_core", DUBLIN_CORE_RULES).map_err(|e| e.to_string());
    static ref SCHEMA_ORG: std::result::Result<MappingTable, String> =
        MappingTable::from_defs("schema_org", SCHEMA_ORG_RULES).map_err(|e| e.to_string());
}

/// The shared Dublin Core table.
///
/// # Errors
///
/// Returns [`MarcError::ConfigurationError`] if the built-in rules fail to compile.
pub fn dublin_core() -> Result<&'static MappingTable> {
    DUBLIN_CORE
        .as_ref()
        .map_err(|e| MarcError::ConfigurationError(e.clone()))
}

/// The shared Schema.org table.
///
/// # Errors
///
/// Returns [`MarcError::ConfigurationError`] if the built-in rules fail to compile.
pub fn schema_org() -> Result<&'static MappingTable> {
    SCHEMA_ORG
        .as_ref()
        .map_err(|e| MarcError::ConfigurationError(e.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_compile() {
        assert_eq!(dublin_core().unwrap().len(), DUBLIN_CORE_RULES.len());
        assert_eq!(schema_org().unwrap().len(), SCHEMA_ORG_RULES.len());
    }

    #[test]
    fn test_tables_are_shared() {
        let a = dublin_core().unwrap();
        let b = dublin_core().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_dublin_core_subject_has_two_rules() {
        let table = dublin_core().unwrap();
        let subjects: Vec<_> = table
            .rules()
            .iter()
            .filter(|r| r.element() == "DC.subject")
            .map(|r| r.repeatability())
            .collect();
        assert_eq!(subjects, vec![JoinedRepeat, SubfieldRepeat]);
    }

    #[test]
    fn test_dc_identifiers_extend_standard_numbers() {
        assert_eq!(&DC_IDENTIFIERS[..STANDARD_NUMBERS.len()], STANDARD_NUMBERS);
        assert_eq!(DC_IDENTIFIERS.last(), Some(&("856", "u", ".", ".")));
    }

    #[test]
    fn test_element_prefixes() {
        for rule in DUBLIN_CORE_RULES {
            assert!(rule.element.starts_with("DC.") || rule.element.starts_with("DCTERMS."));
        }
    }
}
