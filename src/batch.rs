//! Whole-collection conversion.
//!
//! [`convert_collection`] parses a MARCXML `<collection>` once and converts
//! its records independently, in parallel on Rayon's work-stealing pool. Each
//! record gets its own result, so one bad record does not sink the batch
//! unless [`BatchConfig::fail_fast`] is set.
//!
//! [`edm_graph_for_collection`] instead folds every record into one shared
//! [`EdmGraph`], sequentially.
//!
//! # Examples
//!
//! ```
//! use marc_crosswalk::batch::{convert_collection, Target};
//!
//! let xml = r#"<collection xmlns="http://www.loc.gov/MARC21/slim">
//!   <record><datafield tag="245" ind1="1" ind2="0">
//!     <subfield code="a">Chicago</subfield>
//!   </datafield></record>
//!   <record><datafield tag="245" ind1="1" ind2="0">
//!     <subfield code="a">Evanston</subfield>
//!   </datafield></record>
//! </collection>"#;
//! let outputs = convert_collection(xml, Target::DublinCore).unwrap();
//! assert_eq!(outputs.len(), 2);
//! assert!(outputs[1].as_ref().unwrap().contains("<dc:title>Evanston</dc:title>"));
//! ```

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dublin_core::{record_to_dublin_core_xml, DublinCore};
use crate::edm::{self, EdmBuilder, EdmConfig, EdmGraph};
use crate::error::Result;
use crate::record::Record;
use crate::schema_org::SchemaOrg;
use crate::social::{OpenGraph, TwitterCard};
use crate::tables;

/// Output format of a batch conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Dublin Core `<metadata>` XML
    #[default]
    DublinCore,
    /// Schema.org JSON-LD
    SchemaOrg,
    /// EDM, serialized as configured in [`BatchConfig::edm`]
    Edm,
    /// Open Graph `<meta>` lines
    OpenGraph,
    /// Twitter Card `<meta>` lines
    TwitterCard,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DublinCore => write!(f, "Dublin Core"),
            Self::SchemaOrg => write!(f, "Schema.org"),
            Self::Edm => write!(f, "EDM"),
            Self::OpenGraph => write!(f, "Open Graph"),
            Self::TwitterCard => write!(f, "Twitter Card"),
        }
    }
}

/// Configuration for batch conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Output format.
    pub target: Target,

    /// Convert records on the Rayon pool. When false, records are converted
    /// in order on the calling thread.
    pub parallel: bool,

    /// Stop at the first failed record and return its error.
    ///
    /// When false (default), failures are reported per record.
    pub fail_fast: bool,

    /// EDM settings, used when `target` is [`Target::Edm`].
    pub edm: EdmConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            target: Target::default(),
            parallel: true,
            fail_fast: false,
            edm: EdmConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Creates a configuration for `target` with default settings.
    #[must_use]
    pub fn new(target: Target) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Enables or disables parallel conversion.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Enables fail-fast error handling.
    #[must_use]
    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Sets the EDM configuration.
    #[must_use]
    pub fn with_edm(mut self, edm: EdmConfig) -> Self {
        self.edm = edm;
        self
    }
}

/// Converts one record to `target`.
///
/// # Errors
///
/// Returns whatever the chosen emitter returns for this record.
pub fn convert_record(record: &Record, target: Target, edm_config: &EdmConfig) -> Result<String> {
    match target {
        Target::DublinCore => record_to_dublin_core_xml(record),
        Target::SchemaOrg => SchemaOrg::from_record(record)?.to_json_string(),
        Target::Edm => edm::record_to_edm(record, edm_config),
        Target::OpenGraph => OpenGraph::from(&DublinCore::from_record(record)?).render(),
        Target::TwitterCard => TwitterCard::from(&DublinCore::from_record(record)?).render(),
    }
}

/// Converts every record of a MARCXML collection with default settings.
///
/// # Errors
///
/// Returns [`MarcError::ParseError`](crate::MarcError::ParseError) if the
/// document is malformed. Per-record failures are returned in the vector.
pub fn convert_collection(xml: &str, target: Target) -> Result<Vec<Result<String>>> {
    convert_collection_with(xml, &BatchConfig::new(target))
}

/// Converts every record of a MARCXML collection.
///
/// # Errors
///
/// Returns [`MarcError::ParseError`](crate::MarcError::ParseError) if the
/// document is malformed, or the first record error when `fail_fast` is set.
pub fn convert_collection_with(xml: &str, config: &BatchConfig) -> Result<Vec<Result<String>>> {
    let records = Record::collection_from_marcxml(xml)?;
    convert_records(&records, config)
}

/// Converts already-parsed records, preserving their order.
///
/// # Errors
///
/// Returns a configuration error if a built-in mapping table is invalid, or
/// the first record error when `fail_fast` is set.
pub fn convert_records(records: &[Record], config: &BatchConfig) -> Result<Vec<Result<String>>> {
    // Compile the shared tables before fanning out.
    tables::dublin_core()?;
    tables::schema_org()?;

    let convert = |record: &Record| convert_record(record, config.target, &config.edm);
    let results: Vec<Result<String>> = if config.parallel {
        records.par_iter().map(convert).collect()
    } else {
        records.iter().map(convert).collect()
    };

    let failed = results.iter().filter(|r| r.is_err()).count();
    debug!(
        target_format = %config.target,
        records = results.len(),
        failed,
        "converted collection"
    );

    if config.fail_fast {
        return results.into_iter().map(|r| r.map(Ok)).collect();
    }
    Ok(results)
}

/// Builds one EDM graph holding every record of a collection.
///
/// Records without an identifier are skipped with a warning; any other error
/// aborts.
///
/// # Errors
///
/// Returns [`MarcError::ParseError`](crate::MarcError::ParseError) if the
/// document is malformed, or an RDF error if a URI cannot be minted.
pub fn edm_graph_for_collection(xml: &str, config: &EdmConfig) -> Result<EdmGraph> {
    let records = Record::collection_from_marcxml(xml)?;
    let mut graph = EdmGraph::new();
    for (index, record) in records.iter().enumerate() {
        let dc = DublinCore::from_record(record)?;
        match EdmBuilder::new(&dc, config.clone()).build_into(&mut graph) {
            Ok(_) => {},
            Err(crate::MarcError::MissingIdentifier(reason)) => {
                warn!(index, %reason, "skipping record without identifier");
            },
            Err(e) => return Err(e),
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarcError;

    const COLLECTION: &str = r#"<collection xmlns="http://www.loc.gov/MARC21/slim">
  <record>
    <datafield tag="245" ind1="1" ind2="0"><subfield code="a">Chicago</subfield></datafield>
    <datafield tag="856" ind1="4" ind2="1">
      <subfield code="u">http://pi.lib.uchicago.edu/1001/maps/chisoc/1</subfield>
    </datafield>
  </record>
  <record>
    <datafield tag="245" ind1="1" ind2="0"><subfield code="a">No identifier</subfield></datafield>
  </record>
  <record>
    <datafield tag="245" ind1="1" ind2="0"><subfield code="a">Evanston</subfield></datafield>
    <datafield tag="856" ind1="4" ind2="1">
      <subfield code="u">http://pi.lib.uchicago.edu/1001/maps/chisoc/3</subfield>
    </datafield>
  </record>
</collection>"#;

    #[test]
    fn test_parallel_matches_sequential() {
        for target in [Target::DublinCore, Target::SchemaOrg, Target::OpenGraph] {
            let parallel = convert_collection_with(COLLECTION, &BatchConfig::new(target)).unwrap();
            let sequential = convert_collection_with(
                COLLECTION,
                &BatchConfig::new(target).with_parallel(false),
            )
            .unwrap();
            let parallel: Vec<_> = parallel.into_iter().map(|r| r.unwrap()).collect();
            let sequential: Vec<_> = sequential.into_iter().map(|r| r.unwrap()).collect();
            assert_eq!(parallel, sequential);
        }
    }

    #[test]
    fn test_per_record_failures_do_not_abort() {
        let outputs = convert_collection(COLLECTION, Target::Edm).unwrap();
        assert_eq!(outputs.len(), 3);
        assert!(outputs[0].is_ok());
        assert!(matches!(outputs[1], Err(MarcError::MissingIdentifier(_))));
        assert!(outputs[2].as_ref().unwrap().contains("ore:Aggregation"));
    }

    #[test]
    fn test_fail_fast() {
        let config = BatchConfig::new(Target::Edm).with_fail_fast(true);
        assert!(matches!(
            convert_collection_with(COLLECTION, &config),
            Err(MarcError::MissingIdentifier(_))
        ));
    }

    #[test]
    fn test_malformed_collection() {
        assert!(matches!(
            convert_collection("<collection><record>", Target::DublinCore),
            Err(MarcError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_collection() {
        let xml = r#"<collection xmlns="http://www.loc.gov/MARC21/slim"/>"#;
        assert!(convert_collection(xml, Target::SchemaOrg).unwrap().is_empty());
    }

    #[test]
    fn test_edm_graph_for_collection_skips_unidentified() {
        let graph = edm_graph_for_collection(COLLECTION, &EdmConfig::default()).unwrap();
        let ttl = graph.to_turtle().unwrap();
        assert!(ttl.contains("IIIF_Files/maps/chisoc/1"));
        assert!(ttl.contains("IIIF_Files/maps/chisoc/3"));
        assert!(!ttl.contains("No identifier"));
    }

    #[test]
    fn test_batch_config_from_json() {
        let config: BatchConfig =
            serde_json::from_str(r#"{"target": "schema_org", "parallel": false}"#).unwrap();
        assert_eq!(config.target, Target::SchemaOrg);
        assert!(!config.parallel);
        assert!(!config.fail_fast);
    }
}
