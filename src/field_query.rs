//! Field queries: the extraction primitive behind every crosswalk.
//!
//! A [`FieldQuery`] names a MARC tag literally and selects subfields and
//! indicators with regular expressions. The patterns are *prefix* matches:
//! they are anchored at the start of the code or indicator but not at the end,
//! so `[ab]` selects subfields `a` and `b`, and `.` accepts any indicator,
//! including blank.
//!
//! Control fields ignore the subfield and indicator patterns and yield their
//! whole text.
//!
//! # Examples
//!
//! ```ignore
//! use marc_crosswalk::{FieldQuery, Record};
//!
//! let query = FieldQuery::new("245", "[ab]", ".", ".")?;
//! for title_part in record.get_marc_field(&query) {
//!     println!("{title_part}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use regex::Regex;

use crate::error::{MarcError, Result};
use crate::record::{Field, Record, RecordChild};

/// A compiled `(tag, subfield, indicator 1, indicator 2)` query.
#[derive(Debug, Clone)]
pub struct FieldQuery {
    tag: String,
    subfield_source: String,
    subfield_pattern: Regex,
    indicator1: Regex,
    indicator2: Regex,
}

impl FieldQuery {
    /// Compile a query.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if any pattern is not a valid
    /// regular expression.
    pub fn new(tag: &str, subfield_pattern: &str, ind1: &str, ind2: &str) -> Result<Self> {
        Ok(FieldQuery {
            tag: tag.to_string(),
            subfield_source: subfield_pattern.to_string(),
            subfield_pattern: prefix_regex(subfield_pattern)?,
            indicator1: prefix_regex(ind1)?,
            indicator2: prefix_regex(ind2)?,
        })
    }

    /// A query accepting any indicators.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if the subfield pattern is invalid.
    pub fn subfields(tag: &str, subfield_pattern: &str) -> Result<Self> {
        Self::new(tag, subfield_pattern, ".", ".")
    }

    /// The literal tag this query selects.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether a data field's tag and indicators satisfy this query.
    #[must_use]
    pub fn matches_field(&self, field: &Field) -> bool {
        field.has_tag(&self.tag)
            && matches_char(&self.indicator1, field.indicator1)
            && matches_char(&self.indicator2, field.indicator2)
    }

    /// Whether a subfield code satisfies this query.
    #[must_use]
    pub fn matches_code(&self, code: char) -> bool {
        matches_char(&self.subfield_pattern, code)
    }

    /// Collect matching text from a record in document order.
    #[must_use]
    pub fn extract<'r>(&self, record: &'r Record) -> Vec<&'r str> {
        let mut results = Vec::new();
        for child in record.children() {
            if child.tag() != Some(self.tag.as_str()) {
                continue;
            }
            match child {
                RecordChild::Control(cf) => results.push(cf.value.as_str()),
                RecordChild::Data(field) => {
                    if !self.matches_field(field) {
                        continue;
                    }
                    results.extend(
                        field
                            .subfields
                            .iter()
                            .filter(|s| self.matches_code(s.code))
                            .map(|s| s.value.as_str()),
                    );
                },
            }
        }
        results
    }
}

impl fmt::Display for FieldQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ${} ind1={} ind2={}",
            self.tag,
            self.subfield_source,
            strip_anchor(self.indicator1.as_str()),
            strip_anchor(self.indicator2.as_str())
        )
    }
}

impl Record {
    /// Text of every subfield (or control field) matching `query`, in document order.
    #[must_use]
    pub fn get_marc_field(&self, query: &FieldQuery) -> Vec<&str> {
        query.extract(self)
    }

    /// Compile a one-off query and return owned matches.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ConfigurationError`] if any pattern is invalid.
    pub fn extract(&self, tag: &str, subfield: &str, ind1: &str, ind2: &str) -> Result<Vec<String>> {
        let query = FieldQuery::new(tag, subfield, ind1, ind2)?;
        Ok(query
            .extract(self)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

/// Compile `pattern` so that it only matches at the start of the input.
pub(crate) fn prefix_regex(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})"))
        .map_err(|e| MarcError::ConfigurationError(format!("Invalid pattern {pattern:?}: {e}")))
}

fn matches_char(pattern: &Regex, c: char) -> bool {
    let mut buf = [0u8; 4];
    pattern.is_match(c.encode_utf8(&mut buf))
}

fn strip_anchor(source: &str) -> &str {
    source
        .strip_prefix("^(?:")
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(source)
}
