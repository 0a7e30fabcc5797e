//! MARCXML deserialization into [`Record`] views.
//!
//! Input follows the Library of Congress MARCXML schema
//! (<https://www.loc.gov/standards/marcxml/>): `tag`, `ind1`, `ind2` and `code`
//! are XML attributes, records usually sit inside a `<collection>` wrapper.
//!
//! Elements are matched by local name, so default-namespace
//! (`<record xmlns="...">`), prefixed (`<marc:record>`) and namespace-less
//! documents all parse the same way. Unlike a serde mapping, the reader keeps
//! control fields and data fields interleaved in document order.
//!
//! # Examples
//!
//! ```ignore
//! use marc_crosswalk::marcxml;
//!
//! let xml = r#"<collection xmlns="http://www.loc.gov/MARC21/slim">
//!   <record><controlfield tag="003">OLE</controlfield></record>
//! </collection>"#;
//! let record = marcxml::parse_record(xml)?;
//! assert_eq!(record.control_field("003"), Some("OLE"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};

use crate::error::{MarcError, Result};
use crate::record::{ControlField, Field, Record, RecordChild, Subfield};

/// The MARCXML namespace URI.
pub const MARCXML_NS: &str = "http://www.loc.gov/MARC21/slim";

/// Parse the first `record` of a MARCXML document.
///
/// The whole document is read, so malformed XML after the first record is
/// still reported.
///
/// # Errors
///
/// Returns [`MarcError::ParseError`] if the XML is not well-formed, a subfield
/// lacks its `code`, or no `record` element exists.
pub fn parse_record(xml: &str) -> Result<Record> {
    parse_collection(xml)?
        .into_iter()
        .next()
        .ok_or_else(|| MarcError::ParseError("No record element found".to_string()))
}

/// Parse every `record` of a MARCXML document in document order.
///
/// A document without records yields an empty vector.
///
/// # Errors
///
/// Returns [`MarcError::ParseError`] if the XML is not well-formed or a
/// subfield lacks its `code`.
pub fn parse_collection(xml: &str) -> Result<Vec<Record>> {
    let mut reader = Reader::from_str(xml);
    let mut state = ParseState::default();
    let mut depth: usize = 0;

    loop {
        let event = reader.read_event().map_err(|e| {
            MarcError::ParseError(format!(
                "Failed to parse MARCXML at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(ref e) => {
                depth += 1;
                state.start_element(e)?;
            },
            Event::Empty(ref e) => {
                state.start_element(e)?;
                state.end_element(e.local_name().as_ref());
            },
            Event::End(ref e) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    MarcError::ParseError("Unexpected closing tag".to_string())
                })?;
                state.end_element(e.local_name().as_ref());
            },
            Event::Text(ref t) => {
                if let Some(text) = state.text.as_mut() {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| MarcError::ParseError(format!("Invalid text content: {e}")))?;
                    text.push_str(&unescaped);
                }
            },
            Event::CData(ref c) => {
                if let Some(text) = state.text.as_mut() {
                    let raw = std::str::from_utf8(c).map_err(|e| {
                        MarcError::ParseError(format!("Invalid CDATA content: {e}"))
                    })?;
                    text.push_str(raw);
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    if depth != 0 {
        return Err(MarcError::ParseError(format!(
            "Unexpected end of input with {depth} unclosed element(s)"
        )));
    }

    debug!(records = state.records.len(), "parsed MARCXML document");
    Ok(state.records)
}

/// A record under construction.
#[derive(Debug, Default)]
struct PartialRecord {
    leader: Option<String>,
    children: Vec<RecordChild>,
}

#[derive(Debug, Default)]
struct ParseState {
    records: Vec<Record>,
    record: Option<PartialRecord>,
    control: Option<ControlField>,
    field: Option<Field>,
    subfield_code: Option<char>,
    in_leader: bool,
    /// Text accumulator, `Some` while inside a leaf element we keep
    text: Option<String>,
}

impl ParseState {
    fn start_element(&mut self, e: &BytesStart<'_>) -> Result<()> {
        match e.local_name().as_ref() {
            b"record" => {
                if self.record.is_none() {
                    self.record = Some(PartialRecord::default());
                }
            },
            b"leader" if self.record.is_some() => {
                self.in_leader = true;
                self.text = Some(String::new());
            },
            b"controlfield" if self.record.is_some() => {
                self.control = Some(ControlField {
                    tag: attribute(e, b"tag")?,
                    value: String::new(),
                });
                self.text = Some(String::new());
            },
            b"datafield" if self.record.is_some() => {
                self.field = Some(Field {
                    tag: attribute(e, b"tag")?,
                    indicator1: indicator(e, b"ind1")?,
                    indicator2: indicator(e, b"ind2")?,
                    subfields: Vec::new(),
                });
            },
            b"subfield" if self.field.is_some() => {
                let code = attribute(e, b"code")?
                    .and_then(|code| code.chars().next())
                    .ok_or_else(|| MarcError::ParseError("Missing subfield code".to_string()))?;
                self.subfield_code = Some(code);
                self.text = Some(String::new());
            },
            _ => {},
        }
        Ok(())
    }

    fn end_element(&mut self, local_name: &[u8]) {
        match local_name {
            b"leader" if self.in_leader => {
                self.in_leader = false;
                if let Some(record) = self.record.as_mut() {
                    record.leader = self.text.take();
                }
            },
            b"controlfield" => {
                if let (Some(mut control), Some(record)) = (self.control.take(), self.record.as_mut())
                {
                    control.value = self.text.take().unwrap_or_default();
                    record.children.push(RecordChild::Control(control));
                }
            },
            b"subfield" => {
                if let (Some(code), Some(field)) = (self.subfield_code.take(), self.field.as_mut()) {
                    field.subfields.push(Subfield {
                        code,
                        value: self.text.take().unwrap_or_default(),
                    });
                }
            },
            b"datafield" => {
                if let (Some(field), Some(record)) = (self.field.take(), self.record.as_mut()) {
                    record.children.push(RecordChild::Data(field));
                }
            },
            b"record" => {
                if let Some(partial) = self.record.take() {
                    trace!(fields = partial.children.len(), "finished record");
                    self.records
                        .push(Record::from_parts(partial.leader, partial.children));
                }
            },
            _ => {},
        }
    }
}

/// Unescaped value of the attribute with the given local name.
fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr =
            attr.map_err(|err| MarcError::ParseError(format!("Malformed attribute: {err}")))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|err| MarcError::ParseError(format!("Invalid attribute value: {err}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Indicator attribute as a character, blank when missing or empty.
fn indicator(e: &BytesStart<'_>, name: &[u8]) -> Result<char> {
    Ok(attribute(e, name)?
        .and_then(|value| value.chars().next())
        .unwrap_or(' '))
}
