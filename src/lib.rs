#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # marc-crosswalk
//!
//! Declarative crosswalks from MARCXML bibliographic records to Dublin Core,
//! Schema.org, the Europeana Data Model and social-card metadata.
//!
//! ## Quick Start
//!
//! ```
//! use marc_crosswalk::{DublinCore, SchemaOrg};
//!
//! let xml = r#"<record xmlns="http://www.loc.gov/MARC21/slim">
//!   <datafield tag="100" ind1="1" ind2=" "><subfield code="a">Mayer, Harold M.</subfield></datafield>
//!   <datafield tag="245" ind1="1" ind2="0"><subfield code="a">Chicago</subfield></datafield>
//! </record>"#;
//!
//! let dc = DublinCore::from_marcxml(xml).unwrap();
//! assert_eq!(dc.titles(), vec!["Chicago"]);
//! assert_eq!(dc.values("creator").unwrap(), vec!["Mayer, Harold M."]);
//!
//! let schema = SchemaOrg::from_marcxml(xml).unwrap();
//! assert_eq!(schema.creators()[0].name, "Mayer, Harold M.");
//! ```
//!
//! ## Modules
//!
//! - [`record`]: in-memory MARC record and its builder
//! - [`marcxml`]: MARCXML parsing
//! - [`field_query`]: tag, indicator and subfield pattern matching
//! - [`mapping`]: mapping rules and tables
//! - [`tables`]: the built-in Dublin Core and Schema.org tables
//! - [`aggregate`]: rule evaluation and value aggregation
//! - [`dublin_core`]: Dublin Core XML and element accessors
//! - [`schema_org`]: Schema.org JSON-LD
//! - [`edm`]: Europeana Data Model graphs
//! - [`social`]: Open Graph and Twitter Card fragments
//! - [`batch`]: parallel conversion of whole collections
//! - [`error`]: error type and result alias

pub mod aggregate;
pub mod batch;
pub mod dublin_core;
pub mod edm;
pub mod error;
pub mod field_query;
pub mod mapping;
pub mod marcxml;
/// Core MARC record structures (`Record`, `Field`, `Subfield`)
pub mod record;
pub mod schema_org;
pub mod social;
pub mod tables;

pub use aggregate::{aggregate, AggregatedElement, AggregatedValue, Aggregation};
pub use batch::{convert_collection, BatchConfig, Target};
pub use dublin_core::{
    marcxml_to_dublin_core_xml, record_to_dublin_core, record_to_dublin_core_xml, DcElement,
    DcNamespace, DublinCore,
};
pub use edm::{EdmBuilder, EdmConfig, EdmGraph, WebResourceMetadata};
pub use error::{MarcError, Result};
pub use field_query::FieldQuery;
pub use mapping::{MappingRule, MappingTable, Repeatability, RuleDefinition};
pub use record::{ControlField, Field, Record, RecordBuilder, RecordChild, Subfield};
pub use schema_org::{Creator, CreatorType, SchemaOrg, SchemaValue};
pub use social::{OpenGraph, TwitterCard};
