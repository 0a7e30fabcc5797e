//! Schema.org JSON-LD emission of MARC records.
//!
//! The output is a `Map` object: `@context`, `@type`, a computed `creator`,
//! then every element of the Schema.org mapping table in table order. An
//! element with exactly one surviving value is a bare string; two or more
//! values become a sorted list.
//!
//! # Examples
//!
//! ```ignore
//! use marc_crosswalk::schema_org::SchemaOrg;
//!
//! let schema = SchemaOrg::from_marcxml(&xml)?;
//! println!("{}", schema.to_json_string()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::aggregate::{aggregate, AggregatedValue, Aggregation};
use crate::error::{MarcError, Result};
use crate::field_query::FieldQuery;
use crate::mapping::MappingTable;
use crate::record::Record;
use crate::tables;

/// JSON-LD context of every document.
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Schema.org type of every document.
pub const SCHEMA_TYPE: &str = "Map";

/// Main entry fields, in order of preference.
const MAIN_ENTRY_TAGS: [&str; 3] = ["100", "110", "111"];

/// Kind of agent named as creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CreatorType {
    /// A personal main entry (100) is present
    Person,
    /// Anything else, including the statement-of-responsibility fallback
    Organization,
}

/// A `creator` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Creator {
    /// `@type`
    #[serde(rename = "@type")]
    pub creator_type: CreatorType,
    /// Display name
    pub name: String,
}

/// A property value: bare string or sorted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SchemaValue {
    /// Exactly one value
    Text(String),
    /// Two or more values, sorted
    List(Vec<String>),
}

impl SchemaValue {
    fn from_aggregated(value: &AggregatedValue) -> Self {
        match value {
            AggregatedValue::Single(text) => SchemaValue::Text(text.clone()),
            AggregatedValue::Set(values) if values.len() == 1 => {
                SchemaValue::Text(values.iter().next().cloned().unwrap_or_default())
            },
            AggregatedValue::Set(values) => SchemaValue::List(values.iter().cloned().collect()),
        }
    }

    /// The value as a string, if it is a single one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SchemaValue::Text(text) => Some(text),
            SchemaValue::List(_) => None,
        }
    }
}

/// Schema.org metadata for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaOrg {
    creators: Vec<Creator>,
    properties: IndexMap<String, SchemaValue>,
}

struct CreatorQueries {
    main_entries: Vec<FieldQuery>,
    responsibility: FieldQuery,
}

impl CreatorQueries {
    fn compile() -> Result<Self> {
        Ok(CreatorQueries {
            main_entries: MAIN_ENTRY_TAGS
                .iter()
                .map(|tag| FieldQuery::subfields(tag, "[a-z]"))
                .collect::<Result<Vec<_>>>()?,
            responsibility: FieldQuery::subfields("245", "c")?,
        })
    }
}

lazy_static! {
    static ref CREATOR_QUERIES: std::result::Result<CreatorQueries, String> =
        CreatorQueries::compile().map_err(|e| e.to_string());
}

/// Resolve creators from the main entry fields, falling back to `245 $c`.
///
/// Every creator gets the same type: `Person` when a personal main entry is
/// present, `Organization` otherwise.
///
/// # Errors
///
/// Returns [`MarcError::ConfigurationError`] if the creator queries fail to compile.
pub fn creators(record: &Record) -> Result<Vec<Creator>> {
    let queries = CREATOR_QUERIES
        .as_ref()
        .map_err(|e| MarcError::ConfigurationError(e.clone()))?;

    let creator_type = match queries.main_entries.first() {
        Some(personal) if !record.get_marc_field(personal).is_empty() => CreatorType::Person,
        _ => CreatorType::Organization,
    };

    let mut names: Vec<String> = queries
        .main_entries
        .iter()
        .map(|q| record.get_marc_field(q).join(" "))
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        let fallback = record.get_marc_field(&queries.responsibility).join(" ");
        if !fallback.is_empty() {
            names.push(fallback);
        }
    }

    Ok(names
        .into_iter()
        .map(|name| Creator { creator_type, name })
        .collect())
}

impl SchemaOrg {
    /// Convert a record with the built-in table.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if the built-in table is invalid.
    pub fn from_record(record: &Record) -> Result<Self> {
        Self::from_record_with_table(record, tables::schema_org()?)
    }

    /// Convert a record with a custom table.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if the creator queries are invalid.
    pub fn from_record_with_table(record: &Record, table: &MappingTable) -> Result<Self> {
        let creators = creators(record)?;
        Ok(Self::from_parts(creators, &aggregate(table, record)))
    }

    /// Parse MARCXML and convert it.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ParseError`] for malformed input.
    pub fn from_marcxml(xml: &str) -> Result<Self> {
        Self::from_record(&Record::from_marcxml(xml)?)
    }

    fn from_parts(creators: Vec<Creator>, aggregation: &Aggregation) -> Self {
        let mut properties = IndexMap::new();
        for entry in aggregation {
            properties.insert(
                entry.element.clone(),
                SchemaValue::from_aggregated(&entry.value),
            );
        }
        SchemaOrg {
            creators,
            properties,
        }
    }

    /// Resolved creators.
    #[must_use]
    pub fn creators(&self) -> &[Creator] {
        &self.creators
    }

    /// A mapped property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaValue> {
        self.properties.get(name)
    }

    /// Mapped properties in table order.
    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, SchemaValue> {
        &self.properties
    }

    /// The JSON-LD document.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("@context".to_string(), Value::from(SCHEMA_CONTEXT));
        doc.insert("@type".to_string(), Value::from(SCHEMA_TYPE));
        match self.creators.as_slice() {
            [] => {},
            [single] => {
                doc.insert("creator".to_string(), json!(single));
            },
            many => {
                doc.insert("creator".to_string(), json!(many));
            },
        }
        for (name, value) in &self.properties {
            doc.insert(name.clone(), json!(value));
        }
        Value::Object(doc)
    }

    /// Pretty-printed JSON-LD with four-space indentation; non-ASCII text is kept as is.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::IoError`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.to_value()
            .serialize(&mut serializer)
            .map_err(io::Error::from)?;
        let json =
            String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(json)
    }
}

impl Serialize for SchemaOrg {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
