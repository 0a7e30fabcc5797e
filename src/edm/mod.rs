//! Europeana Data Model (EDM) output for map records.
//!
//! A record's Dublin Core view is turned into five linked resources: an
//! `ore:Aggregation`, the `edm:ProvidedCHO` it aggregates, an `ore:Proxy` for
//! the source MARCXML, an `ore:ResourceMap` and an `edm:WebResource` for the
//! scanned image. URIs are minted under an ARK base from the record's
//! persistent identifier.
//!
//! # Quick Start
//!
//! ```
//! use marc_crosswalk::edm::{marcxml_to_edm, EdmConfig};
//!
//! let xml = r#"<record xmlns="http://www.loc.gov/MARC21/slim">
//!   <datafield tag="856" ind1="4" ind2="1">
//!     <subfield code="u">http://pi.lib.uchicago.edu/1001/maps/chisoc/1</subfield>
//!   </datafield>
//! </record>"#;
//! let turtle = marcxml_to_edm(xml, &EdmConfig::default()).unwrap();
//! assert!(turtle.contains("ore:Aggregation"));
//! ```
//!
//! To accumulate several records, or to rebuild a record and keep its
//! creation date, hold an [`EdmGraph`] and call [`EdmBuilder::build_into`]
//! repeatedly.
//!
//! # Modules
//!
//! - `builder`: resource assembly
//! - `config`: URI minting and literal configuration
//! - `namespaces`: namespace IRIs and output prefixes
//! - `rdf`: graph model and serialization

mod builder;
mod config;
mod namespaces;
mod rdf;

pub use builder::{EdmBuilder, EdmSubjects};
pub use config::{EdmConfig, RdfFormat, WebResourceMetadata};
pub use namespaces::{DC, DCTERMS, EDM, ERC, ORE, PREFIXES, RDF, XSD};
pub use rdf::{EdmGraph, RdfNode, RdfTriple};

use tracing::debug;

use crate::dublin_core::DublinCore;
use crate::error::Result;
use crate::record::Record;

/// Builds a fresh graph for one record.
///
/// # Errors
///
/// Returns [`MarcError::MissingIdentifier`](crate::MarcError::MissingIdentifier)
/// if the record has no identifier, or an RDF error if a URI is invalid.
pub fn record_to_edm_graph(record: &Record, config: &EdmConfig) -> Result<EdmGraph> {
    let dc = DublinCore::from_record(record)?;
    let mut graph = EdmGraph::new();
    EdmBuilder::new(&dc, config.clone()).build_into(&mut graph)?;
    Ok(graph)
}

/// Converts one record to EDM, serialized in `config.output_format`.
///
/// Turtle and RDF/XML output declare `config.base_uri` as the document base.
///
/// # Errors
///
/// See [`record_to_edm_graph`].
pub fn record_to_edm(record: &Record, config: &EdmConfig) -> Result<String> {
    let graph = record_to_edm_graph(record, config)?;
    debug!(format = %config.output_format, triples = graph.len(), "serializing EDM");
    graph.serialize_with_base(config.output_format, Some(&config.base_uri))
}

/// Parses MARCXML and converts the first record to EDM.
///
/// # Errors
///
/// Returns [`MarcError::ParseError`](crate::MarcError::ParseError) for
/// malformed input, otherwise see [`record_to_edm_graph`].
pub fn marcxml_to_edm(xml: &str, config: &EdmConfig) -> Result<String> {
    record_to_edm(&Record::from_marcxml(xml)?, config)
}
