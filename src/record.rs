//! In-memory view of a single MARC bibliographic record.
//!
//! A [`Record`] keeps its control fields and data fields in document order,
//! which is the order field queries report matches in. Records are built
//! either from MARCXML (see [`Record::from_marcxml`]) or programmatically
//! with a [`RecordBuilder`].
//!
//! Every construction path runs the genre/form heading filter: a `655` field
//! whose `$2` vocabulary source is present and is not `lcgft` is dropped. The
//! record is immutable afterwards.
//!
//! # Examples
//!
//! ```
//! use marc_crosswalk::{Field, Record};
//!
//! let record = Record::builder()
//!     .control_field("001", "12345")
//!     .field(Field::new("245", '1', '0').with_subfield('a', "Census tracts of Chicago"))
//!     .build();
//!
//! assert_eq!(record.control_field("001"), Some("12345"));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Tag of the genre/form index term field.
pub const GENRE_FORM_TAG: &str = "655";

/// Subfield code carrying the source vocabulary of a heading.
pub const VOCABULARY_SOURCE_CODE: char = '2';

/// The only genre/form vocabulary kept at construction time.
pub const GENRE_AUTHORITY_CODE: &str = "lcgft";

/// A MARC record: optional leader plus control and data fields in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    /// Leader text, when the source carried one
    leader: Option<String>,
    /// Control and data fields in the order they appeared
    children: Vec<RecordChild>,
}

/// One child of a record, either a control field or a data field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordChild {
    /// A control field (001-009): tag plus unstructured text
    Control(ControlField),
    /// A data field (010+): tag, two indicators, subfields
    Data(Field),
}

/// A control field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlField {
    /// Field tag, `None` when the source element had no `tag` attribute
    pub tag: Option<String>,
    /// Field text
    pub value: String,
}

/// A data field with indicators and subfields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field tag, `None` when the source element had no `tag` attribute
    pub tag: Option<String>,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Subfields in source order
    pub subfields: Vec<Subfield>,
}

/// A subfield: a one-character code and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code
    pub code: char,
    /// Subfield text
    pub value: String,
}

impl ControlField {
    /// Create a new control field.
    #[must_use]
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        ControlField {
            tag: Some(tag.into()),
            value: value.into(),
        }
    }
}

impl Field {
    /// Create a new data field with no subfields.
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        Field {
            tag: Some(tag.into()),
            indicator1,
            indicator2,
            subfields: Vec::new(),
        }
    }

    /// Append a subfield.
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield {
            code,
            value: value.into(),
        });
    }

    /// Append a subfield, builder style.
    #[must_use]
    pub fn with_subfield(mut self, code: char, value: impl Into<String>) -> Self {
        self.add_subfield(code, value);
        self
    }

    /// First subfield with the given code.
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.value.as_str())
    }

    /// Whether this field carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }

    /// A `655` whose vocabulary source is present and not the accepted authority.
    fn is_unauthorized_genre(&self) -> bool {
        self.has_tag(GENRE_FORM_TAG)
            && self
                .subfields
                .iter()
                .any(|s| s.code == VOCABULARY_SOURCE_CODE && s.value != GENRE_AUTHORITY_CODE)
    }
}

impl RecordChild {
    /// Tag of the child, if it has one.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            RecordChild::Control(cf) => cf.tag.as_deref(),
            RecordChild::Data(field) => field.tag.as_deref(),
        }
    }
}

impl Record {
    /// Build a record from its parts, applying the genre/form filter.
    pub(crate) fn from_parts(leader: Option<String>, mut children: Vec<RecordChild>) -> Self {
        retain_authorized_genres(&mut children);
        Record { leader, children }
    }

    /// Parse the first record of a MARCXML document.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ParseError`](crate::MarcError::ParseError) if the
    /// input is not well-formed XML or contains no `record` element.
    pub fn from_marcxml(xml: &str) -> Result<Self> {
        crate::marcxml::parse_record(xml)
    }

    /// Parse every record of a MARCXML `<collection>`.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ParseError`](crate::MarcError::ParseError) if the
    /// input is not well-formed XML.
    pub fn collection_from_marcxml(xml: &str) -> Result<Vec<Self>> {
        crate::marcxml::parse_collection(xml)
    }

    /// Start building a record programmatically.
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Leader text, if present.
    #[must_use]
    pub fn leader(&self) -> Option<&str> {
        self.leader.as_deref()
    }

    /// All children in document order.
    #[must_use]
    pub fn children(&self) -> &[RecordChild] {
        &self.children
    }

    /// Data fields in document order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.children.iter().filter_map(|child| match child {
            RecordChild::Data(field) => Some(field),
            RecordChild::Control(_) => None,
        })
    }

    /// Data fields with the given tag, in document order.
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields().filter(move |f| f.has_tag(tag))
    }

    /// Text of the first control field with the given tag.
    #[must_use]
    pub fn control_field(&self, tag: &str) -> Option<&str> {
        self.children.iter().find_map(|child| match child {
            RecordChild::Control(cf) if cf.tag.as_deref() == Some(tag) => Some(cf.value.as_str()),
            _ => None,
        })
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the record has no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Drop `655` fields sourced from a vocabulary other than the accepted one.
///
/// Returns the number of removed fields. Applying it twice is a no-op.
fn retain_authorized_genres(children: &mut Vec<RecordChild>) -> usize {
    let before = children.len();
    children.retain(|child| match child {
        RecordChild::Data(field) => !field.is_unauthorized_genre(),
        RecordChild::Control(_) => true,
    });
    let removed = before - children.len();
    if removed > 0 {
        debug!(removed, "dropped genre/form headings outside {GENRE_AUTHORITY_CODE}");
    }
    removed
}

/// Builder for [`Record`].
#[derive(Debug, Default)]
pub struct RecordBuilder {
    leader: Option<String>,
    children: Vec<RecordChild>,
}

impl RecordBuilder {
    /// Set the leader text.
    #[must_use]
    pub fn leader(mut self, leader: impl Into<String>) -> Self {
        self.leader = Some(leader.into());
        self
    }

    /// Append a control field.
    #[must_use]
    pub fn control_field(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.children
            .push(RecordChild::Control(ControlField::new(tag, value)));
        self
    }

    /// Append a data field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.children.push(RecordChild::Data(field));
        self
    }

    /// Finish the record. The genre/form filter runs here.
    #[must_use]
    pub fn build(self) -> Record {
        Record::from_parts(self.leader, self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genre(term: &str, source: Option<&str>) -> Field {
        let mut field = Field::new("655", ' ', '7').with_subfield('a', term);
        if let Some(source) = source {
            field.add_subfield('2', source);
        }
        field
    }

    #[test]
    fn test_genre_filter_keeps_only_lcgft() {
        let record = Record::builder()
            .field(genre("Thematic maps.", Some("lcgft")))
            .field(genre("Historical maps.", Some("fast")))
            .build();

        let kept: Vec<_> = record.fields_by_tag("655").collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].get_subfield('a'), Some("Thematic maps."));
    }

    #[test]
    fn test_genre_filter_keeps_unsourced_headings() {
        let record = Record::builder().field(genre("Maps.", None)).build();
        assert_eq!(record.fields_by_tag("655").count(), 1);
    }

    #[test]
    fn test_genre_filter_ignores_other_tags() {
        let field = Field::new("650", ' ', '7')
            .with_subfield('a', "Ethnology")
            .with_subfield('2', "fast");
        let record = Record::builder().field(field).build();
        assert_eq!(record.fields_by_tag("650").count(), 1);
    }

    #[test]
    fn test_genre_filter_is_idempotent() {
        let record = Record::builder()
            .field(genre("Thematic maps.", Some("lcgft")))
            .field(genre("Historical maps.", Some("fast")))
            .build();

        let mut children = record.children().to_vec();
        assert_eq!(retain_authorized_genres(&mut children), 0);
        assert_eq!(children, record.children());
    }

    #[test]
    fn test_control_field_lookup() {
        let record = Record::builder()
            .leader("01234cem a2200289 a 4500")
            .control_field("001", "1234")
            .control_field("003", "OLE")
            .build();

        assert_eq!(record.leader(), Some("01234cem a2200289 a 4500"));
        assert_eq!(record.control_field("003"), Some("OLE"));
        assert_eq!(record.control_field("005"), None);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_document_order_preserved() {
        let record = Record::builder()
            .field(Field::new("650", ' ', '0').with_subfield('a', "First"))
            .control_field("001", "x")
            .field(Field::new("650", ' ', '0').with_subfield('a', "Second"))
            .build();

        let tags: Vec<_> = record.children().iter().map(RecordChild::tag).collect();
        assert_eq!(tags, vec![Some("650"), Some("001"), Some("650")]);
    }
}
