//! RDF graph model and serialization for EDM.
//!
//! [`EdmGraph`] is a small owned triple store with set semantics: adding a
//! triple that is already present is a no-op, and [`EdmGraph::set`] replaces
//! every object of a subject/predicate pair. Triples are indexed by subject
//! and then predicate, so lookups during a build stay cheap as one graph
//! accumulates a whole collection. Parsing and serialization go through
//! oxrdfio.

use std::io::{Read, Write};

use indexmap::{IndexMap, IndexSet};
use oxrdf::{Literal, NamedNode, NamedOrBlankNode, Quad, Term, Triple};
use oxrdfio::{JsonLdProfileSet, RdfFormat as OxRdfFormat, RdfParser, RdfSerializer};
use tracing::trace;

use crate::error::{MarcError, Result};

use super::config::RdfFormat;
use super::namespaces;

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// A single RDF triple (subject, predicate, object).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfTriple {
    /// The subject of the triple.
    pub subject: RdfNode,
    /// The predicate (property) of the triple.
    pub predicate: String,
    /// The object of the triple.
    pub object: RdfNode,
}

impl RdfTriple {
    /// Creates a new RDF triple.
    #[must_use]
    pub fn new(subject: RdfNode, predicate: impl Into<String>, object: RdfNode) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// An RDF node (subject or object in a triple).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfNode {
    /// A named node (IRI/URI).
    Uri(String),
    /// A literal value with an optional datatype.
    Literal {
        /// The literal value.
        value: String,
        /// Datatype URI; `None` for plain strings.
        datatype: Option<String>,
    },
}

impl RdfNode {
    /// Creates a new URI node.
    #[must_use]
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    /// Creates a new plain literal.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
        }
    }

    /// Creates a new typed literal.
    #[must_use]
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
        }
    }

    /// Creates a URI node for `local` in namespace `ns`.
    #[must_use]
    pub fn term(ns: &str, local: &str) -> Self {
        Self::Uri(namespaces::term(ns, local))
    }

    /// The IRI of a URI node or the lexical value of a literal.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Uri(value) | Self::Literal { value, .. } => value,
        }
    }
}

/// Objects of one subject, grouped by predicate.
type PredicateObjects = IndexMap<String, IndexSet<RdfNode>>;

/// An RDF graph with set semantics, grouped by subject in insertion order.
#[derive(Debug, Clone, Default)]
pub struct EdmGraph {
    subjects: IndexMap<RdfNode, PredicateObjects>,
    len: usize,
}

impl EdmGraph {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple; returns false if it was already present.
    pub fn add_triple(&mut self, triple: RdfTriple) -> bool {
        self.add(triple.subject, triple.predicate, triple.object)
    }

    /// Adds a triple from components.
    pub fn add(&mut self, subject: RdfNode, predicate: impl Into<String>, object: RdfNode) -> bool {
        let inserted = self
            .subjects
            .entry(subject)
            .or_default()
            .entry(predicate.into())
            .or_default()
            .insert(object);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Replaces every `(subject, predicate, *)` triple with a single one.
    pub fn set(&mut self, subject: RdfNode, predicate: impl Into<String>, object: RdfNode) {
        let objects = self
            .subjects
            .entry(subject)
            .or_default()
            .entry(predicate.into())
            .or_default();
        let removed = objects.len();
        if removed == 1 && objects.contains(&object) {
            return;
        }
        if removed > 0 {
            trace!(removed, value = object.value(), "replacing objects");
        }
        objects.clear();
        objects.insert(object);
        self.len = self.len - removed + 1;
    }

    /// Removes every `(subject, predicate, *)` triple; returns how many went.
    pub fn remove(&mut self, subject: &RdfNode, predicate: &str) -> usize {
        let Some(predicates) = self.subjects.get_mut(subject) else {
            return 0;
        };
        let removed = predicates
            .shift_remove(predicate)
            .map_or(0, |objects| objects.len());
        if predicates.is_empty() {
            self.subjects.shift_remove(subject);
        }
        self.len -= removed;
        removed
    }

    /// Whether `subject` appears as the subject of any triple.
    #[must_use]
    pub fn has_subject(&self, subject: &RdfNode) -> bool {
        self.subjects.contains_key(subject)
    }

    /// Objects of `(subject, predicate, *)` in insertion order.
    #[must_use]
    pub fn objects<'a>(&'a self, subject: &RdfNode, predicate: &str) -> Vec<&'a RdfNode> {
        self.subjects
            .get(subject)
            .and_then(|predicates| predicates.get(predicate))
            .map(|objects| objects.iter().collect())
            .unwrap_or_default()
    }

    /// Whether the exact triple is present.
    #[must_use]
    pub fn contains(&self, subject: &RdfNode, predicate: &str, object: &RdfNode) -> bool {
        self.subjects
            .get(subject)
            .and_then(|predicates| predicates.get(predicate))
            .is_some_and(|objects| objects.contains(object))
    }

    /// Returns the number of triples in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns an iterator over the triples, grouped by subject.
    pub fn triples(&self) -> impl Iterator<Item = RdfTriple> + '_ {
        self.borrowed().map(|(subject, predicate, object)| {
            RdfTriple::new(subject.clone(), predicate, object.clone())
        })
    }

    fn borrowed(&self) -> impl Iterator<Item = (&RdfNode, &str, &RdfNode)> + '_ {
        self.subjects.iter().flat_map(|(subject, predicates)| {
            predicates.iter().flat_map(move |(predicate, objects)| {
                objects
                    .iter()
                    .map(move |object| (subject, predicate.as_str(), object))
            })
        })
    }

    /// Serializes the graph as Turtle with the EDM prefixes bound.
    ///
    /// # Errors
    ///
    /// Returns an error if a node cannot be represented in RDF.
    pub fn to_turtle(&self) -> Result<String> {
        self.serialize(RdfFormat::Turtle)
    }

    /// Serializes the graph to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self, format: RdfFormat) -> Result<String> {
        self.serialize_with_base(format, None)
    }

    /// Serializes the graph to a string, declaring `base` where the format
    /// supports it (Turtle and RDF/XML).
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not an IRI or serialization fails.
    pub fn serialize_with_base(&self, format: RdfFormat, base: Option<&str>) -> Result<String> {
        let mut output = Vec::new();
        self.serialize_to_writer(&mut output, format, base)?;
        String::from_utf8(output).map_err(|e| MarcError::RdfError(e.to_string()))
    }

    /// Serializes the graph to a writer in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize_to_writer<W: Write>(
        &self,
        writer: W,
        format: RdfFormat,
        base: Option<&str>,
    ) -> Result<()> {
        let mut serializer = RdfSerializer::from_format(to_oxrdf_format(format));
        if let Some(base) = base {
            serializer = serializer
                .with_base_iri(base)
                .map_err(|e| MarcError::RdfError(format!("Invalid base IRI <{base}>: {e}")))?;
        }
        for (prefix, iri) in namespaces::PREFIXES {
            serializer = serializer
                .with_prefix(*prefix, *iri)
                .map_err(|e| MarcError::RdfError(format!("Invalid prefix {prefix}: {e}")))?;
        }
        let mut serializer = serializer.for_writer(writer);

        for (subject, predicate, object) in self.borrowed() {
            let ox_triple = to_oxrdf_triple(subject, predicate, object)?;
            serializer
                .serialize_triple(&ox_triple)
                .map_err(|e| MarcError::RdfError(e.to_string()))?;
        }

        serializer
            .finish()
            .map_err(|e| MarcError::RdfError(e.to_string()))?;

        Ok(())
    }

    /// Parses a graph from a reader in the specified format.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ParseError`] if the input is not valid RDF or
    /// contains blank nodes.
    pub fn parse_from_reader<R: Read>(reader: R, format: RdfFormat) -> Result<Self> {
        let parser = RdfParser::from_format(to_oxrdf_format(format)).for_reader(reader);

        let mut graph = Self::new();

        for result in parser {
            let quad = result.map_err(|e| MarcError::ParseError(e.to_string()))?;
            graph.add_triple(from_oxrdf_quad(&quad)?);
        }

        Ok(graph)
    }

    /// Parses a graph from a string.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ParseError`] if the input is not valid RDF or
    /// contains blank nodes.
    pub fn parse(input: &str, format: RdfFormat) -> Result<Self> {
        Self::parse_from_reader(input.as_bytes(), format)
    }
}

fn to_oxrdf_format(format: RdfFormat) -> OxRdfFormat {
    match format {
        RdfFormat::RdfXml => OxRdfFormat::RdfXml,
        RdfFormat::JsonLd => OxRdfFormat::JsonLd {
            profile: JsonLdProfileSet::default(),
        },
        RdfFormat::Turtle => OxRdfFormat::Turtle,
        RdfFormat::NTriples => OxRdfFormat::NTriples,
    }
}

fn named_node(iri: &str) -> Result<NamedNode> {
    NamedNode::new(iri).map_err(|e| MarcError::RdfError(format!("Invalid IRI <{iri}>: {e}")))
}

fn to_oxrdf_triple(subject: &RdfNode, predicate: &str, object: &RdfNode) -> Result<Triple> {
    let subject = match subject {
        RdfNode::Uri(uri) => NamedOrBlankNode::NamedNode(named_node(uri)?),
        RdfNode::Literal { .. } => {
            return Err(MarcError::RdfError(
                "Literals cannot be triple subjects".into(),
            ));
        },
    };

    let predicate = named_node(predicate)?;

    let object = match object {
        RdfNode::Uri(uri) => Term::NamedNode(named_node(uri)?),
        RdfNode::Literal { value, datatype } => Term::Literal(match datatype {
            Some(dt) => Literal::new_typed_literal(value, named_node(dt)?),
            None => Literal::new_simple_literal(value),
        }),
    };

    Ok(Triple::new(subject, predicate, object))
}

/// Language tags are dropped; EDM output never carries them.
fn from_oxrdf_quad(quad: &Quad) -> Result<RdfTriple> {
    let subject = match &quad.subject {
        NamedOrBlankNode::NamedNode(n) => RdfNode::Uri(n.as_str().to_string()),
        _ => {
            return Err(MarcError::ParseError("Unsupported subject type".into()));
        },
    };

    let predicate = quad.predicate.as_str().to_string();

    let object = match &quad.object {
        Term::NamedNode(n) => RdfNode::Uri(n.as_str().to_string()),
        Term::Literal(lit) => {
            let datatype = lit.datatype().as_str();
            let plain = lit.language().is_some() || datatype == XSD_STRING;
            RdfNode::Literal {
                value: lit.value().to_string(),
                datatype: (!plain).then(|| datatype.to_string()),
            }
        },
        _ => {
            return Err(MarcError::ParseError("Unsupported object type".into()));
        },
    };

    Ok(RdfTriple::new(subject, predicate, object))
}
