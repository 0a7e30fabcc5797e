//! Declarative mapping rules and tables.
//!
//! A [`MappingRule`] names one target element, the [`FieldQuery`]s that feed
//! it, how repeated matches are aggregated ([`Repeatability`]) and an optional
//! cleanup pattern stripped from each candidate value. A [`MappingTable`] is an
//! ordered list of rules; the same element may appear in several rules.
//!
//! The built-in tables live in [`crate::tables`]. Custom tables can be loaded
//! from JSON with [`MappingTable::from_json`], which accepts the two-flag form
//! (`repeatable_target`, `repeatable_subfield`) and rejects the one invalid
//! combination at load time.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MarcError, Result};
use crate::field_query::FieldQuery;

/// How a rule aggregates its matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Repeatability {
    /// All matches of all queries are joined into one value.
    Single,
    /// Each query's matches are joined into one candidate; candidates are deduplicated.
    JoinedRepeat,
    /// Every matched subfield is its own candidate; candidates are deduplicated.
    SubfieldRepeat,
}

impl Repeatability {
    /// Convert the two-flag form used by flat rule definitions.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] when `repeatable_subfield` is
    /// set on a non-repeatable target.
    pub fn from_flags(repeatable_target: bool, repeatable_subfield: bool) -> Result<Self> {
        match (repeatable_target, repeatable_subfield) {
            (false, false) => Ok(Repeatability::Single),
            (true, false) => Ok(Repeatability::JoinedRepeat),
            (true, true) => Ok(Repeatability::SubfieldRepeat),
            (false, true) => Err(MarcError::ConfigurationError(
                "repeatable_subfield requires repeatable_target".to_string(),
            )),
        }
    }

    /// Whether the target element may carry more than one value.
    #[must_use]
    pub const fn is_repeatable(self) -> bool {
        !matches!(self, Repeatability::Single)
    }
}

/// One compiled mapping rule.
#[derive(Debug, Clone)]
pub struct MappingRule {
    element: String,
    repeatability: Repeatability,
    queries: Vec<FieldQuery>,
    cleanup: Option<Regex>,
}

impl MappingRule {
    /// Create a rule.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if the cleanup pattern is invalid.
    pub fn new(
        element: impl Into<String>,
        repeatability: Repeatability,
        queries: Vec<FieldQuery>,
        cleanup: Option<&str>,
    ) -> Result<Self> {
        let cleanup = cleanup
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    MarcError::ConfigurationError(format!("Invalid cleanup pattern {pattern:?}: {e}"))
                })
            })
            .transpose()?;
        Ok(MappingRule {
            element: element.into(),
            repeatability,
            queries,
            cleanup,
        })
    }

    /// Target element name.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Aggregation policy.
    #[must_use]
    pub fn repeatability(&self) -> Repeatability {
        self.repeatability
    }

    /// Field queries, evaluated in order.
    #[must_use]
    pub fn queries(&self) -> &[FieldQuery] {
        &self.queries
    }

    /// Strip every match of the cleanup pattern from `value`.
    #[must_use]
    pub fn clean(&self, value: &str) -> String {
        match &self.cleanup {
            Some(pattern) => pattern.replace_all(value, "").into_owned(),
            None => value.to_string(),
        }
    }
}

/// A `(tag, subfield, ind1, ind2)` pattern tuple as written in rule tables.
pub type QueryDef = (&'static str, &'static str, &'static str, &'static str);

/// A rule written as static data.
#[derive(Debug, Clone, Copy)]
pub struct RuleDef {
    /// Target element name
    pub element: &'static str,
    /// Aggregation policy
    pub repeatability: Repeatability,
    /// Source fields
    pub fields: &'static [QueryDef],
    /// Pattern stripped from each candidate value
    pub cleanup: Option<&'static str>,
}

/// A rule as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Target element name
    pub element: String,
    /// May the element appear more than once
    pub repeatable_target: bool,
    /// Does every subfield become its own value
    #[serde(default)]
    pub repeatable_subfield: bool,
    /// Source fields as `[tag, subfield, ind1, ind2]`
    pub fields: Vec<[String; 4]>,
    /// Pattern stripped from each candidate value
    #[serde(default)]
    pub strip: Option<String>,
}

/// An ordered, immutable list of mapping rules.
#[derive(Debug, Clone)]
pub struct MappingTable {
    name: String,
    rules: Vec<MappingRule>,
}

impl MappingTable {
    /// Create a table from compiled rules.
    #[must_use]
    pub fn new(name: impl Into<String>, rules: Vec<MappingRule>) -> Self {
        MappingTable {
            name: name.into(),
            rules,
        }
    }

    /// Compile a table from static rule data.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if any pattern is invalid.
    pub fn from_defs(name: &str, defs: &[RuleDef]) -> Result<Self> {
        let rules = defs
            .iter()
            .map(|def| {
                let queries = def
                    .fields
                    .iter()
                    .map(|&(tag, sf, ind1, ind2)| FieldQuery::new(tag, sf, ind1, ind2))
                    .collect::<Result<Vec<_>>>()?;
                MappingRule::new(def.element, def.repeatability, queries, def.cleanup)
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(table = name, rules = rules.len(), "compiled mapping table");
        Ok(Self::new(name, rules))
    }

    /// Compile a table from rule definitions.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if a rule sets
    /// `repeatable_subfield` without `repeatable_target`, or a pattern is invalid.
    pub fn from_definitions(name: &str, defs: &[RuleDefinition]) -> Result<Self> {
        let rules = defs
            .iter()
            .map(|def| {
                let repeatability =
                    Repeatability::from_flags(def.repeatable_target, def.repeatable_subfield)
                        .map_err(|e| {
                            MarcError::ConfigurationError(format!("rule {:?}: {e}", def.element))
                        })?;
                let queries = def
                    .fields
                    .iter()
                    .map(|[tag, sf, ind1, ind2]| FieldQuery::new(tag, sf, ind1, ind2))
                    .collect::<Result<Vec<_>>>()?;
                MappingRule::new(def.element.clone(), repeatability, queries, def.strip.as_deref())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(name, rules))
    }

    /// Load a table from a JSON array of [`RuleDefinition`]s.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if the JSON does not describe
    /// valid rules.
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let defs: Vec<RuleDefinition> = serde_json::from_str(json)
            .map_err(|e| MarcError::ConfigurationError(format!("Invalid rule JSON: {e}")))?;
        Self::from_definitions(name, &defs)
    }

    /// Table name, used in log output.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules in table order.
    #[must_use]
    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
