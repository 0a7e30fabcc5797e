//! Configuration for EDM assembly.
//!
//! [`EdmConfig`] carries the base URI, the identifier prefix stripped to form
//! short ids, and every literal the builder writes that does not come from the
//! record. The defaults describe the University of Chicago map collection.
//! [`WebResourceMetadata`] is the image description a caller may hand to the
//! builder; the crate never reads image files itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MarcError, Result};

/// Output format for RDF serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdfFormat {
    /// RDF/XML format
    RdfXml,
    /// JSON-LD format
    JsonLd,
    /// Turtle format
    #[default]
    Turtle,
    /// N-Triples format
    NTriples,
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RdfXml => write!(f, "RDF/XML"),
            Self::JsonLd => write!(f, "JSON-LD"),
            Self::Turtle => write!(f, "Turtle"),
            Self::NTriples => write!(f, "N-Triples"),
        }
    }
}

/// Configuration for EDM assembly.
///
/// Every field has a default, so a partial JSON document is enough to
/// override one value:
///
/// ```
/// use marc_crosswalk::edm::EdmConfig;
///
/// let config = EdmConfig::from_json(r#"{"provider": "Example Library"}"#).unwrap();
/// assert_eq!(config.provider, "Example Library");
/// assert_eq!(config.data_provider, "University of Chicago Library");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdmConfig {
    // === URI minting ===
    /// Base URI that resource paths are resolved against.
    pub base_uri: String,

    /// Prefix removed from the record identifier to form the short id.
    pub identifier_prefix: String,

    /// Path prefix shared by the CHO, proxy and web resource subjects.
    pub collection_path: String,

    // === Literals ===
    /// `edm:provider` on the aggregation.
    pub provider: String,

    /// `edm:dataProvider` on the aggregation.
    pub data_provider: String,

    /// `edm:rights` on the aggregation, written as a URI.
    pub rights: String,

    /// `edm:object` on the aggregation.
    pub object_placeholder: String,

    /// `dcterms:isPartOf` on the CHO.
    pub collection: String,

    /// `edm:currentLocation` on the CHO.
    pub current_location: String,

    /// `edm:type` on the CHO.
    pub edm_type: String,

    /// `dcterms:creator` on the resource map, written as a URI.
    pub resource_map_creator: String,

    /// `dc:format` on the proxy.
    pub proxy_format: String,

    /// `dc:format` on the web resource when no metadata supplies one.
    pub web_resource_format: String,

    // === Output ===
    /// Serialization format used by [`record_to_edm`](super::record_to_edm).
    pub output_format: RdfFormat,
}

impl Default for EdmConfig {
    fn default() -> Self {
        Self {
            base_uri: "http://ark.lib.uchicago.edu/ark:/61001/".into(),
            identifier_prefix: "http://pi.lib.uchicago.edu/1001".into(),
            collection_path: "/digital_collections/IIIF_Files".into(),
            provider: "University of Chicago Library".into(),
            data_provider: "University of Chicago Library".into(),
            rights: "https://rightsstatements.org/page/InC/1.0/?language=en".into(),
            object_placeholder: "IIIF URL for highest quality image of map".into(),
            collection: "pi-for-the-collection-in-wagtail".into(),
            current_location: "Map Collection Reading Room (Room 370)".into(),
            edm_type: "IMAGE".into(),
            resource_map_creator: "http://library.uchicago.edu/".into(),
            proxy_format: "application/xml".into(),
            web_resource_format: "image/tiff".into(),
            output_format: RdfFormat::default(),
        }
    }
}

impl EdmConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from JSON; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| MarcError::ConfigurationError(format!("Invalid EDM config: {e}")))
    }

    /// Sets the base URI for generated resources.
    #[must_use]
    pub fn with_base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = uri.into();
        self
    }

    /// Sets the identifier prefix stripped to form short ids.
    #[must_use]
    pub fn with_identifier_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.identifier_prefix = prefix.into();
        self
    }

    /// Sets the output format.
    #[must_use]
    pub const fn with_output_format(mut self, format: RdfFormat) -> Self {
        self.output_format = format;
        self
    }
}

/// Technical metadata for the image behind a web resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResourceMetadata {
    /// File name
    pub name: String,
    /// Path as known to the caller
    pub path: String,
    /// MIME type, written as the web resource's `dc:format`
    pub mime_type: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Width in pixels
    #[serde(default)]
    pub width: u32,
    /// Height in pixels
    #[serde(default)]
    pub height: u32,
    /// Hex MD5 digest
    #[serde(default)]
    pub md5: Option<String>,
    /// Hex SHA-256 digest
    #[serde(default)]
    pub sha256: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EdmConfig::default();
        assert_eq!(config.base_uri, "http://ark.lib.uchicago.edu/ark:/61001/");
        assert_eq!(config.identifier_prefix, "http://pi.lib.uchicago.edu/1001");
        assert_eq!(config.edm_type, "IMAGE");
        assert_eq!(config.web_resource_format, "image/tiff");
        assert_eq!(config.output_format, RdfFormat::Turtle);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EdmConfig::new()
            .with_base_uri("http://example.org/")
            .with_identifier_prefix("http://example.org/pi")
            .with_output_format(RdfFormat::NTriples);

        assert_eq!(config.base_uri, "http://example.org/");
        assert_eq!(config.identifier_prefix, "http://example.org/pi");
        assert_eq!(config.output_format, RdfFormat::NTriples);
    }

    #[test]
    fn test_partial_json() {
        let config =
            EdmConfig::from_json(r#"{"edm_type": "TEXT", "output_format": "ntriples"}"#).unwrap();
        assert_eq!(config.edm_type, "TEXT");
        assert_eq!(config.output_format, RdfFormat::NTriples);
        assert_eq!(config.provider, EdmConfig::default().provider);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            EdmConfig::from_json("{"),
            Err(MarcError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_rdf_format_display() {
        assert_eq!(format!("{}", RdfFormat::RdfXml), "RDF/XML");
        assert_eq!(format!("{}", RdfFormat::Turtle), "Turtle");
        assert_eq!(format!("{}", RdfFormat::NTriples), "N-Triples");
    }

    #[test]
    fn test_web_resource_metadata_from_json() {
        let meta: WebResourceMetadata = serde_json::from_str(
            r#"{"name": "map.tif", "path": "/data/map.tif", "mime_type": "image/tiff",
                "size": 1024, "width": 800, "height": 600}"#,
        )
        .unwrap();
        assert_eq!(meta.width, 800);
        assert!(meta.md5.is_none());
    }
}
