//! Dublin Core emission of MARC records.
//!
//! Records are run through the built-in Dublin Core mapping table (see
//! [`crate::tables::DUBLIN_CORE_RULES`]) and every surviving value becomes one
//! element. Rule names prefixed `DC.` land in the DCMI elements namespace,
//! `DCTERMS.` names in the DCMI terms namespace. Qualified element names keep
//! their dots (`DC.rights.access` becomes `dc:rights.access`).
//!
//! # API Patterns
//!
//! - **Element list**: [`record_to_dublin_core()`] returns a [`DublinCore`] for
//!   programmatic access through [`DublinCore::values`] and typed accessors
//! - **Direct XML**: [`record_to_dublin_core_xml()`] converts to XML in one call
//!
//! # Examples
//!
//! ```ignore
//! use marc_crosswalk::{dublin_core, Field, Record};
//!
//! let record = Record::builder()
//!     .field(Field::new("245", '1', '0').with_subfield('a', "Title"))
//!     .build();
//!
//! let dc = dublin_core::record_to_dublin_core(&record)?;
//! assert_eq!(dc.titles(), vec!["Title"]);
//! println!("{}", dc.to_xml());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt::{self, Write};

use quick_xml::escape::escape;
use serde::Serialize;

use crate::aggregate::{aggregate, Aggregation};
use crate::error::{MarcError, Result};
use crate::record::Record;
use crate::tables;

/// DCMI elements namespace.
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// DCMI terms namespace.
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";

/// The namespace an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DcNamespace {
    /// `dc:`, the DCMI Metadata Element Set
    Elements,
    /// `dcterms:`, the DCMI Metadata Terms
    Terms,
}

impl DcNamespace {
    /// Conventional prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            DcNamespace::Elements => "dc",
            DcNamespace::Terms => "dcterms",
        }
    }

    /// Namespace URI.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            DcNamespace::Elements => DC_NS,
            DcNamespace::Terms => DCTERMS_NS,
        }
    }

    /// Split a rule element name like `DC.rights.access` into namespace and local name.
    #[must_use]
    pub fn split(element: &str) -> (Self, &str) {
        if let Some(local) = element.strip_prefix("DCTERMS.") {
            (DcNamespace::Terms, local)
        } else if let Some(local) = element.strip_prefix("DC.") {
            (DcNamespace::Elements, local)
        } else {
            (DcNamespace::Elements, element)
        }
    }
}

/// One emitted Dublin Core element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DcElement {
    /// Namespace
    pub namespace: DcNamespace,
    /// Local name, possibly dotted (`coverage.location`)
    pub name: String,
    /// Text content
    pub value: String,
}

impl DcElement {
    /// Prefixed name, e.g. `dc:title`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace.prefix(), self.name)
    }
}

/// Emitted Dublin Core metadata for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DublinCore {
    elements: Vec<DcElement>,
}

/// Convert a record to Dublin Core using the built-in table.
///
/// # Errors
///
/// Returns [`MarcError::ConfigurationError`] if the built-in table is invalid.
pub fn record_to_dublin_core(record: &Record) -> Result<DublinCore> {
    DublinCore::from_record(record)
}

/// Convert a record directly to Dublin Core XML.
///
/// # Errors
///
/// Returns [`MarcError::ConfigurationError`] if the built-in table is invalid.
pub fn record_to_dublin_core_xml(record: &Record) -> Result<String> {
    Ok(record_to_dublin_core(record)?.to_xml())
}

/// Parse MARCXML and convert it to Dublin Core XML.
///
/// # Errors
///
/// Returns [`MarcError::ParseError`] for malformed input.
pub fn marcxml_to_dublin_core_xml(xml: &str) -> Result<String> {
    record_to_dublin_core_xml(&Record::from_marcxml(xml)?)
}

impl DublinCore {
    /// Convert a record using the built-in table.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if the built-in table is invalid.
    pub fn from_record(record: &Record) -> Result<Self> {
        let table = tables::dublin_core()?;
        Ok(Self::from_aggregation(&aggregate(table, record)))
    }

    /// Parse MARCXML and convert it.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ParseError`] for malformed input.
    pub fn from_marcxml(xml: &str) -> Result<Self> {
        Self::from_record(&Record::from_marcxml(xml)?)
    }

    /// Emit one element per aggregated value, in table order.
    #[must_use]
    pub fn from_aggregation(aggregation: &Aggregation) -> Self {
        let elements = aggregation
            .entries()
            .iter()
            .flat_map(|entry| {
                let (namespace, name) = DcNamespace::split(&entry.element);
                entry.value.values().map(move |value| DcElement {
                    namespace,
                    name: name.to_string(),
                    value: value.to_string(),
                })
            })
            .collect();
        DublinCore { elements }
    }

    /// All elements in emission order.
    #[must_use]
    pub fn elements(&self) -> &[DcElement] {
        &self.elements
    }

    /// Values of one element in emission order.
    pub fn find<'a>(
        &'a self,
        namespace: DcNamespace,
        name: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.elements
            .iter()
            .filter(move |e| e.namespace == namespace && e.name == name)
            .map(|e| e.value.as_str())
    }

    /// Sorted values of a `dc:` element.
    ///
    /// `name` uses underscores where the element name has dots, so
    /// `rights_access` reads `dc:rights.access`. Unknown elements give an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::AttributeLookup`] if `name` is not an identifier.
    pub fn values(&self, name: &str) -> Result<Vec<String>> {
        self.lookup(DcNamespace::Elements, name)
    }

    /// Sorted values of a `dcterms:` element, named as in [`values`](Self::values).
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::AttributeLookup`] if `name` is not an identifier.
    pub fn terms_values(&self, name: &str) -> Result<Vec<String>> {
        self.lookup(DcNamespace::Terms, name)
    }

    /// Sorted `dc:title` values.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.sorted(DcNamespace::Elements, "title")
    }

    /// Sorted `dc:description` values.
    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.sorted(DcNamespace::Elements, "description")
    }

    /// Sorted `dc:identifier` values.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        self.sorted(DcNamespace::Elements, "identifier")
    }

    /// Sorted `dc:creator` values.
    #[must_use]
    pub fn creators(&self) -> Vec<String> {
        self.sorted(DcNamespace::Elements, "creator")
    }

    /// Sorted `dc:date` values.
    #[must_use]
    pub fn dates(&self) -> Vec<String> {
        self.sorted(DcNamespace::Elements, "date")
    }

    /// Sorted `dc:subject` values.
    #[must_use]
    pub fn subjects(&self) -> Vec<String> {
        self.sorted(DcNamespace::Elements, "subject")
    }

    fn lookup(&self, namespace: DcNamespace, name: &str) -> Result<Vec<String>> {
        if !is_identifier(name) {
            return Err(MarcError::AttributeLookup(name.to_string()));
        }
        Ok(self.sorted(namespace, &name.replace('_', ".")))
    }

    fn sorted(&self, namespace: DcNamespace, name: &str) -> Vec<String> {
        let mut values: Vec<String> = self.find(namespace, name).map(str::to_string).collect();
        values.sort();
        values
    }

    /// Number of emitted elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize as an indented `<metadata>` document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        write!(
            xml,
            "<metadata xmlns:dc=\"{DC_NS}\" xmlns:dcterms=\"{DCTERMS_NS}\""
        )
        .ok();
        if self.elements.is_empty() {
            xml.push_str(" />\n");
            return xml;
        }
        xml.push_str(">\n");
        for element in &self.elements {
            let tag = element.qualified_name();
            writeln!(xml, "  <{tag}>{}</{tag}>", escape(element.value.as_str())).ok();
        }
        xml.push_str("</metadata>\n");
        xml
    }
}

impl fmt::Display for DublinCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    fn convert(record: &Record) -> DublinCore {
        record_to_dublin_core(record).expect("Failed to convert")
    }

    #[test]
    fn test_title_extraction() {
        let record = Record::builder()
            .field(
                Field::new("245", '1', '0')
                    .with_subfield('a', "Main Title")
                    .with_subfield('b', "Subtitle")
                    .with_subfield('c', "Statement of responsibility"),
            )
            .build();

        assert_eq!(convert(&record).titles(), vec!["Main Title Subtitle"]);
    }

    #[test]
    fn test_subjects_are_siblings() {
        let record = Record::builder()
            .field(Field::new("650", ' ', '0').with_subfield('x', "Chicago"))
            .field(Field::new("650", ' ', '0').with_subfield('x', "Illinois"))
            .build();

        let dc = convert(&record);
        let subjects: Vec<_> = dc.find(DcNamespace::Elements, "subject").collect();
        assert_eq!(subjects, vec!["Chicago", "Illinois"]);
    }

    #[test]
    fn test_call_number_subject_is_cleaned() {
        let record = Record::builder()
            .field(
                Field::new("050", ' ', '0')
                    .with_subfield('a', "G4104.C6P3 1943")
                    .with_subfield('b', ".M21."),
            )
            .build();

        assert_eq!(convert(&record).subjects(), vec!["G4104.C6P3 1943 .M21"]);
    }

    #[test]
    fn test_description_is_single_joined_value() {
        let record = Record::builder()
            .field(Field::new("500", ' ', ' ').with_subfield('a', "\"Figure 2.\""))
            .field(Field::new("538", ' ', ' ').with_subfield('a', "Master and use copy."))
            .build();

        assert_eq!(
            convert(&record).descriptions(),
            vec!["\"Figure 2.\" Master and use copy."]
        );
    }

    #[test]
    fn test_dcterms_namespace() {
        let record = Record::builder()
            .field(Field::new("264", '4', ' ').with_subfield('c', "©1943"))
            .build();

        let dc = convert(&record);
        assert_eq!(dc.terms_values("dateCopyrighted").unwrap(), vec!["©1943"]);
        assert!(dc.to_xml().contains("<dcterms:dateCopyrighted>©1943</dcterms:dateCopyrighted>"));
    }

    #[test]
    fn test_accessor_translates_underscores() {
        let record = Record::builder()
            .field(Field::new("506", ' ', ' ').with_subfield('a', "Unrestricted online access"))
            .build();

        let dc = convert(&record);
        assert_eq!(dc.values("rights_access").unwrap(), vec!["Unrestricted online access"]);
    }

    #[test]
    fn test_accessor_unknown_and_invalid_names() {
        let dc = DublinCore::default();
        assert!(dc.values("nonexistent").unwrap().is_empty());
        assert!(matches!(dc.values("1title"), Err(MarcError::AttributeLookup(_))));
        assert!(matches!(dc.values("dc:title"), Err(MarcError::AttributeLookup(_))));
        assert!(matches!(dc.values(""), Err(MarcError::AttributeLookup(_))));
    }

    #[test]
    fn test_dublin_core_to_xml() {
        let record = Record::builder()
            .field(Field::new("245", '1', '0').with_subfield('a', "Test"))
            .build();

        let xml = convert(&record).to_xml();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\""));
        assert!(xml.contains("  <dc:title>Test</dc:title>\n"));
    }

    #[test]
    fn test_xml_escaping() {
        let record = Record::builder()
            .field(
                Field::new("245", '1', '0').with_subfield('a', "Title with <brackets> & ampersand"),
            )
            .build();

        let xml = convert(&record).to_xml();
        assert!(xml.contains("&lt;"));
        assert!(xml.contains("&gt;"));
        assert!(xml.contains("&amp;"));
    }

    #[test]
    fn test_empty_record() {
        let dc = convert(&Record::default());
        assert!(dc.is_empty());
        assert!(dc.to_xml().contains("<metadata xmlns:dc="));
        assert!(dc.to_xml().trim_end().ends_with("/>"));
    }

    #[test]
    fn test_language_each_subfield() {
        let record = Record::builder()
            .field(
                Field::new("041", '0', ' ')
                    .with_subfield('a', "eng")
                    .with_subfield('a', "fre")
                    .with_subfield('a', "eng"),
            )
            .build();

        assert_eq!(convert(&record).values("language").unwrap(), vec!["eng", "fre"]);
    }
}
