//! The aggregation engine.
//!
//! [`aggregate`] walks a [`MappingTable`] against a [`Record`] and produces one
//! [`AggregatedElement`] per rule that had at least one surviving value. The
//! policy per rule is:
//!
//! - [`Repeatability::Single`]: every match of every query is joined with a
//!   space, cleaned once, kept if non-empty.
//! - [`Repeatability::JoinedRepeat`]: each query's matches are joined into one
//!   candidate, cleaned, and kept in a deduplicated set.
//! - [`Repeatability::SubfieldRepeat`]: each match is cleaned on its own and
//!   kept in a deduplicated set.
//!
//! Sets are ordered, so multi-valued elements always come out sorted.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::trace;

use crate::mapping::{MappingRule, MappingTable, Repeatability};
use crate::record::Record;

/// Surviving values for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AggregatedValue {
    /// One joined value from a non-repeatable rule
    Single(String),
    /// Deduplicated, sorted values from a repeatable rule; never empty
    Set(BTreeSet<String>),
}

impl AggregatedValue {
    /// Values in emission order.
    pub fn values(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            AggregatedValue::Single(value) => Box::new(std::iter::once(value.as_str())),
            AggregatedValue::Set(values) => Box::new(values.iter().map(String::as_str)),
        }
    }

    /// First value in emission order.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.values().next()
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            AggregatedValue::Single(_) => 1,
            AggregatedValue::Set(values) => values.len(),
        }
    }

    /// Always false: empty results are never produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One target element and its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedElement {
    /// Target element name
    pub element: String,
    /// Surviving values
    pub value: AggregatedValue,
}

/// Output of one aggregation pass, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    entries: Vec<AggregatedElement>,
}

impl Aggregation {
    /// Entries in table order. An element fed by several rules appears once per rule.
    #[must_use]
    pub fn entries(&self) -> &[AggregatedElement] {
        &self.entries
    }

    /// The first entry for `element`.
    #[must_use]
    pub fn get(&self, element: &str) -> Option<&AggregatedValue> {
        self.entries
            .iter()
            .find(|e| e.element == element)
            .map(|e| &e.value)
    }

    /// Every value emitted for `element`, across all rules feeding it.
    #[must_use]
    pub fn values(&self, element: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.element == element)
            .flat_map(|e| e.value.values())
            .collect()
    }

    /// Whether any rule produced `element`.
    #[must_use]
    pub fn contains(&self, element: &str) -> bool {
        self.get(element).is_some()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing survived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Aggregation {
    type Item = &'a AggregatedElement;
    type IntoIter = std::slice::Iter<'a, AggregatedElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Run every rule of `table` against `record`.
#[must_use]
pub fn aggregate(table: &MappingTable, record: &Record) -> Aggregation {
    let entries: Vec<_> = table
        .rules()
        .iter()
        .filter_map(|rule| {
            aggregate_rule(rule, record).map(|value| AggregatedElement {
                element: rule.element().to_string(),
                value,
            })
        })
        .collect();
    trace!(
        table = table.name(),
        elements = entries.len(),
        "aggregated record"
    );
    Aggregation { entries }
}

/// Run a single rule. `None` when no non-empty value survives.
#[must_use]
pub fn aggregate_rule(rule: &MappingRule, record: &Record) -> Option<AggregatedValue> {
    match rule.repeatability() {
        Repeatability::Single => {
            let joined = rule
                .queries()
                .iter()
                .flat_map(|q| record.get_marc_field(q))
                .collect::<Vec<_>>()
                .join(" ");
            let cleaned = rule.clean(&joined);
            (!cleaned.is_empty()).then_some(AggregatedValue::Single(cleaned))
        },
        Repeatability::JoinedRepeat => {
            let values = rule
                .queries()
                .iter()
                .map(|q| rule.clean(&record.get_marc_field(q).join(" ")))
                .filter(|v| !v.is_empty())
                .collect::<BTreeSet<_>>();
            (!values.is_empty()).then_some(AggregatedValue::Set(values))
        },
        Repeatability::SubfieldRepeat => {
            let values = rule
                .queries()
                .iter()
                .flat_map(|q| record.get_marc_field(q))
                .map(|v| rule.clean(v))
                .filter(|v| !v.is_empty())
                .collect::<BTreeSet<_>>();
            (!values.is_empty()).then_some(AggregatedValue::Set(values))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_query::FieldQuery;
    use crate::record::Field;

    fn subject_record() -> Record {
        Record::builder()
            .field(
                Field::new("650", ' ', '0')
                    .with_subfield('a', "Railroads")
                    .with_subfield('x', "Chicago."),
            )
            .field(
                Field::new("650", ' ', '0')
                    .with_subfield('a', "Railroads")
                    .with_subfield('x', "Illinois"),
            )
            .build()
    }

    fn rule(repeatability: Repeatability, pattern: &str, cleanup: Option<&str>) -> MappingRule {
        let query = FieldQuery::subfields("650", pattern).unwrap();
        MappingRule::new("subject", repeatability, vec![query], cleanup).unwrap()
    }

    #[test]
    fn test_single_joins_everything() {
        let value = aggregate_rule(&rule(Repeatability::Single, "x", None), &subject_record());
        assert_eq!(value, Some(AggregatedValue::Single("Chicago. Illinois".to_string())));
    }

    #[test]
    fn test_joined_repeat_one_candidate_per_query() {
        let value = aggregate_rule(&rule(Repeatability::JoinedRepeat, "x", None), &subject_record())
            .unwrap();
        assert_eq!(value.values().collect::<Vec<_>>(), vec!["Chicago. Illinois"]);
    }

    #[test]
    fn test_subfield_repeat_deduplicates_and_sorts() {
        let value = aggregate_rule(
            &rule(Repeatability::SubfieldRepeat, "[ax]", Some("[. ]*$")),
            &subject_record(),
        )
        .unwrap();
        assert_eq!(
            value.values().collect::<Vec<_>>(),
            vec!["Chicago", "Illinois", "Railroads"]
        );
    }

    #[test]
    fn test_miss_is_omitted() {
        let record = subject_record();
        assert_eq!(aggregate_rule(&rule(Repeatability::Single, "y", None), &record), None);
        assert_eq!(aggregate_rule(&rule(Repeatability::JoinedRepeat, "y", None), &record), None);
        assert_eq!(aggregate_rule(&rule(Repeatability::SubfieldRepeat, "y", None), &record), None);
    }

    #[test]
    fn test_values_emptied_by_cleanup_are_dropped() {
        let record = Record::builder()
            .field(Field::new("650", ' ', '0').with_subfield('v', "Maps."))
            .build();
        let r = rule(Repeatability::SubfieldRepeat, "v", Some("^Maps[. ]*$|[. ]*$"));
        assert_eq!(aggregate_rule(&r, &record), None);
    }

    #[test]
    fn test_aggregate_keeps_table_order_and_duplicates() {
        let table = MappingTable::new(
            "test",
            vec![
                rule(Repeatability::JoinedRepeat, "a", None),
                rule(Repeatability::SubfieldRepeat, "x", Some("[. ]*$")),
                MappingRule::new(
                    "missing",
                    Repeatability::Single,
                    vec![FieldQuery::subfields("999", "a").unwrap()],
                    None,
                )
                .unwrap(),
            ],
        );
        let aggregation = aggregate(&table, &subject_record());
        assert_eq!(aggregation.len(), 2);
        assert!(!aggregation.contains("missing"));
        assert_eq!(
            aggregation.values("subject"),
            vec!["Railroads Railroads", "Chicago", "Illinois"]
        );
    }
}
