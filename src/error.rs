//! Error types for crosswalk operations.
//!
//! This module provides the [`MarcError`] type for all library operations
//! and the [`Result`] convenience type.
//!
//! A field query that matches nothing is not an error: misses propagate as
//! empty collections and the affected elements are simply left out of the
//! emitted output.

use thiserror::Error;

/// Error type for all crosswalk operations.
#[derive(Error, Debug)]
pub enum MarcError {
    /// The input is not well-formed MARCXML or has no `record` element.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A mapping table or field query is invalid.
    ///
    /// This indicates a programming error in the table definition, never a
    /// problem with the input record.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An element accessor was called with a name that is not an identifier.
    #[error("Invalid element name: {0:?}")]
    AttributeLookup(String),

    /// The record has no Dublin Core identifier to derive linked-data URIs from.
    #[error("Record has no identifier: {0}")]
    MissingIdentifier(String),

    /// An IRI or literal could not be represented in RDF.
    #[error("RDF error: {0}")]
    RdfError(String),

    /// A social-card template failed to render.
    #[error("Render error: {0}")]
    RenderError(String),

    /// IO error from the underlying destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;
