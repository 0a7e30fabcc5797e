//! Assembly of EDM resources from a Dublin Core view.
//!
//! One build writes five resources into a caller-owned [`EdmGraph`]: the
//! aggregation, the provided cultural heritage object (CHO), a proxy for the
//! source MARCXML, a resource map describing the aggregation, and a web
//! resource for the image. All five URIs are minted from the record's first
//! identifier.
//!
//! Builds are repeatable against the same graph. Every property is set, so a
//! rebuild replaces the values an earlier build wrote instead of adding to
//! them. `dcterms:created` is written only when the aggregation or resource
//! map is new to the graph, while `dcterms:modified` is replaced on every
//! build.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use url::Url;

use crate::dublin_core::{DcNamespace, DublinCore};
use crate::error::{MarcError, Result};

use super::config::{EdmConfig, WebResourceMetadata};
use super::namespaces::{self, DC, DCTERMS, EDM, ERC, ORE};
use super::rdf::{EdmGraph, RdfNode};

use DcNamespace::{Elements, Terms};

/// CHO properties copied from Dublin Core, as
/// `(namespace, property, source namespace, source element)`.
const CHO_COPIES: &[(&str, &str, DcNamespace, &str)] = &[
    (DC, "coverage", Elements, "coverage"),
    (DC, "creator", Elements, "creator"),
    (DC, "date", Elements, "date"),
    (DC, "description", Elements, "description"),
    (DC, "extent", Elements, "extent"),
    (DC, "identifier", Elements, "identifier"),
    (DC, "language", Elements, "language"),
    (DC, "publisher", Elements, "publisher"),
    (DC, "rights", Elements, "rights"),
    (DC, "subject", Elements, "subject"),
    (DC, "title", Elements, "title"),
    (DC, "type", Elements, "type"),
    (DCTERMS, "spatial", Terms, "spatial"),
    (EDM, "date", Elements, "date"),
    (ERC, "what", Elements, "title"),
    (ERC, "when", Elements, "date"),
    (ERC, "who", Elements, "creator"),
];

/// The five subjects minted for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmSubjects {
    /// `ore:Aggregation`
    pub aggregation: RdfNode,
    /// `edm:ProvidedCHO`
    pub cho: RdfNode,
    /// `ore:Proxy` for the source MARCXML
    pub proxy: RdfNode,
    /// `ore:ResourceMap`
    pub resource_map: RdfNode,
    /// `edm:WebResource` for the image
    pub web_resource: RdfNode,
}

/// Builds EDM resources for one record.
///
/// ```
/// use marc_crosswalk::dublin_core::DublinCore;
/// use marc_crosswalk::edm::{EdmBuilder, EdmConfig, EdmGraph};
///
/// let xml = r#"<record xmlns="http://www.loc.gov/MARC21/slim">
///   <datafield tag="245" ind1="1" ind2="0"><subfield code="a">Chicago</subfield></datafield>
///   <datafield tag="856" ind1="4" ind2="1">
///     <subfield code="u">http://pi.lib.uchicago.edu/1001/maps/chisoc/1</subfield>
///   </datafield>
/// </record>"#;
/// let dc = DublinCore::from_marcxml(xml).unwrap();
/// let mut graph = EdmGraph::new();
/// let subjects = EdmBuilder::new(&dc, EdmConfig::default())
///     .build_into(&mut graph)
///     .unwrap();
/// assert_eq!(
///     subjects.cho.value(),
///     "http://ark.lib.uchicago.edu/digital_collections/IIIF_Files/maps/chisoc/1"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EdmBuilder<'a> {
    dc: &'a DublinCore,
    config: EdmConfig,
    web_resource: Option<WebResourceMetadata>,
}

impl<'a> EdmBuilder<'a> {
    /// Creates a builder over `dc`.
    #[must_use]
    pub fn new(dc: &'a DublinCore, config: EdmConfig) -> Self {
        Self {
            dc,
            config,
            web_resource: None,
        }
    }

    /// Attaches image metadata; its MIME type becomes the web resource format.
    #[must_use]
    pub fn with_web_resource(mut self, metadata: WebResourceMetadata) -> Self {
        self.web_resource = Some(metadata);
        self
    }

    /// The record identifier that URIs are minted from.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::MissingIdentifier`] if the record has none.
    pub fn identifier(&self) -> Result<String> {
        self.dc.identifiers().into_iter().next().ok_or_else(|| {
            MarcError::MissingIdentifier("no dc:identifier to mint EDM URIs from".into())
        })
    }

    /// The identifier with the configured prefix removed.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::MissingIdentifier`] if the record has none.
    pub fn short_id(&self) -> Result<String> {
        let identifier = self.identifier()?;
        Ok(identifier
            .strip_prefix(self.config.identifier_prefix.as_str())
            .unwrap_or(identifier.as_str())
            .to_string())
    }

    /// Mints the five subject URIs.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::MissingIdentifier`] if the record has no
    /// identifier, or [`MarcError::RdfError`] if a URI cannot be resolved.
    pub fn subjects(&self) -> Result<EdmSubjects> {
        let id = self.short_id()?;
        let base = Url::parse(&self.config.base_uri).map_err(|e| {
            MarcError::RdfError(format!("Invalid base URI {:?}: {e}", self.config.base_uri))
        })?;
        let path = &self.config.collection_path;
        let resolve = |relative: String| -> Result<RdfNode> {
            base.join(&relative)
                .map(|url| RdfNode::uri(url.as_str()))
                .map_err(|e| MarcError::RdfError(format!("Cannot resolve {relative:?}: {e}")))
        };
        Ok(EdmSubjects {
            aggregation: resolve(format!("/aggregation{path}{id}"))?,
            cho: resolve(format!("{path}{id}"))?,
            proxy: resolve(format!("{path}/{id}.mrc_or.xml"))?,
            resource_map: resolve(format!("/rem{path}{id}"))?,
            web_resource: resolve(format!("{path}/{id}.tif"))?,
        })
    }

    /// Builds into `graph`, stamping the current time.
    ///
    /// # Errors
    ///
    /// See [`build_at`](Self::build_at).
    pub fn build_into(&self, graph: &mut EdmGraph) -> Result<EdmSubjects> {
        self.build_at(graph, Utc::now())
    }

    /// Builds into `graph`, stamping `now` as the creation and modification time.
    ///
    /// Nothing is written if the subjects cannot be minted.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::MissingIdentifier`] if the record has no
    /// identifier, or [`MarcError::RdfError`] if a URI cannot be resolved.
    pub fn build_at(&self, graph: &mut EdmGraph, now: DateTime<Utc>) -> Result<EdmSubjects> {
        let subjects = self.subjects()?;
        let timestamp = RdfNode::typed_literal(
            now.to_rfc3339_opts(SecondsFormat::Secs, true),
            namespaces::xsd_date_time(),
        );

        let created = namespaces::term(DCTERMS, "created");
        let modified = namespaces::term(DCTERMS, "modified");
        for subject in [&subjects.resource_map, &subjects.aggregation] {
            if !graph.has_subject(subject) {
                graph.set(subject.clone(), created.clone(), timestamp.clone());
            }
            graph.set(subject.clone(), modified.clone(), timestamp.clone());
        }

        self.add_aggregation(graph, &subjects);
        self.add_cho(graph, &subjects);
        self.add_proxy(graph, &subjects);
        self.add_resource_map(graph, &subjects);
        self.add_web_resource(graph, &subjects);

        debug!(
            cho = subjects.cho.value(),
            triples = graph.len(),
            "built EDM resources"
        );
        Ok(subjects)
    }

    fn add_aggregation(&self, graph: &mut EdmGraph, s: &EdmSubjects) {
        let agg = &s.aggregation;
        let identifier = self.dc.identifiers().into_iter().next().unwrap_or_default();
        let config = &self.config;
        graph.set(agg.clone(), namespaces::rdf_type(), RdfNode::term(ORE, "Aggregation"));
        graph.set(agg.clone(), namespaces::term(EDM, "aggregatedCHO"), s.cho.clone());
        graph.set(
            agg.clone(),
            namespaces::term(EDM, "dataProvider"),
            RdfNode::literal(&config.data_provider),
        );
        graph.set(agg.clone(), namespaces::term(ORE, "isDescribedBy"), s.cho.clone());
        graph.set(
            agg.clone(),
            namespaces::term(EDM, "isShownAt"),
            RdfNode::literal(identifier),
        );
        graph.set(
            agg.clone(),
            namespaces::term(EDM, "object"),
            RdfNode::literal(&config.object_placeholder),
        );
        graph.set(
            agg.clone(),
            namespaces::term(EDM, "provider"),
            RdfNode::literal(&config.provider),
        );
        graph.set(agg.clone(), namespaces::term(EDM, "rights"), RdfNode::uri(&config.rights));
    }

    /// Copied properties take the first emitted value and replace whatever an
    /// earlier build wrote. A property the record no longer has is left alone.
    fn add_cho(&self, graph: &mut EdmGraph, s: &EdmSubjects) {
        let cho = &s.cho;
        let config = &self.config;
        graph.set(cho.clone(), namespaces::rdf_type(), RdfNode::term(EDM, "ProvidedCHO"));

        for &(ns, property, source_ns, source) in CHO_COPIES {
            if let Some(value) = self.dc.find(source_ns, source).next() {
                graph.set(cho.clone(), namespaces::term(ns, property), RdfNode::literal(value));
            }
        }

        graph.set(
            cho.clone(),
            namespaces::term(DCTERMS, "isPartOf"),
            RdfNode::literal(&config.collection),
        );
        graph.set(
            cho.clone(),
            namespaces::term(EDM, "currentLocation"),
            RdfNode::literal(&config.current_location),
        );
        graph.set(
            cho.clone(),
            namespaces::term(EDM, "type"),
            RdfNode::literal(&config.edm_type),
        );
        graph.set(cho.clone(), namespaces::term(ERC, "where"), cho.clone());
    }

    fn add_proxy(&self, graph: &mut EdmGraph, s: &EdmSubjects) {
        let proxy = &s.proxy;
        graph.set(proxy.clone(), namespaces::rdf_type(), RdfNode::term(ORE, "Proxy"));
        graph.set(
            proxy.clone(),
            namespaces::term(DC, "format"),
            RdfNode::literal(&self.config.proxy_format),
        );
        graph.set(proxy.clone(), namespaces::term(ORE, "proxyFor"), s.cho.clone());
        graph.set(proxy.clone(), namespaces::term(ORE, "proxyIn"), s.aggregation.clone());
    }

    fn add_resource_map(&self, graph: &mut EdmGraph, s: &EdmSubjects) {
        let rem = &s.resource_map;
        graph.set(
            rem.clone(),
            namespaces::term(DCTERMS, "creator"),
            RdfNode::uri(&self.config.resource_map_creator),
        );
        graph.set(rem.clone(), namespaces::rdf_type(), RdfNode::term(ORE, "ResourceMap"));
        graph.set(rem.clone(), namespaces::term(ORE, "describes"), s.aggregation.clone());
    }

    fn add_web_resource(&self, graph: &mut EdmGraph, s: &EdmSubjects) {
        let web = &s.web_resource;
        let format = self
            .web_resource
            .as_ref()
            .map(|m| m.mime_type.as_str())
            .filter(|mime| !mime.is_empty())
            .unwrap_or(self.config.web_resource_format.as_str());
        graph.set(web.clone(), namespaces::rdf_type(), RdfNode::term(EDM, "WebResource"));
        graph.set(web.clone(), namespaces::term(DC, "format"), RdfNode::literal(format));
    }
}
