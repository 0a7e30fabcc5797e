//! Namespace IRIs used when assembling EDM graphs.
//!
//! Class and property IRIs are built by concatenating a namespace with a local
//! name, e.g. `format!("{}Aggregation", ORE)`.

/// RDF syntax namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// XML Schema datatypes namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Dublin Core elements namespace.
pub const DC: &str = "http://purl.org/dc/elements/1.1/";

/// DCMI terms namespace.
pub const DCTERMS: &str = "http://purl.org/dc/terms/";

/// Europeana Data Model namespace.
pub const EDM: &str = "http://www.europeana.eu/schemas/edm/";

/// Electronic Resource Citation (kernel metadata) namespace.
pub const ERC: &str = "http://purl.org/kernel/elements/1.1/";

/// OAI Object Reuse and Exchange namespace.
pub const ORE: &str = "http://www.openarchives.org/ore/terms/";

/// Prefixes bound in serialized output.
pub const PREFIXES: &[(&str, &str)] = &[
    ("dc", DC),
    ("dcterms", DCTERMS),
    ("edm", EDM),
    ("erc", ERC),
    ("ore", ORE),
];

/// `rdf:type`.
#[must_use]
pub fn rdf_type() -> String {
    format!("{RDF}type")
}

/// `xsd:dateTime`.
#[must_use]
pub fn xsd_date_time() -> String {
    format!("{XSD}dateTime")
}

/// Full IRI for `local` in namespace `ns`.
#[must_use]
pub fn term(ns: &str, local: &str) -> String {
    format!("{ns}{local}")
}
