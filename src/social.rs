//! Open Graph and Twitter Card `<meta>` fragments.
//!
//! Only the title and description come from the record (the first sorted
//! `dc:title` and `dc:description`, empty when absent). The remaining
//! properties are placeholders that a caller fills in before rendering.
//! Templates are registered under `.html` names, so every value is
//! HTML-escaped on output.

use lazy_static::lazy_static;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dublin_core::DublinCore;
use crate::error::{MarcError, Result};

const OPEN_GRAPH_TEMPLATE: &str = "open_graph.html";
const TWITTER_CARD_TEMPLATE: &str = "twitter_card.html";

const OPEN_GRAPH_SOURCE: &str = r#"<meta property="og:title" content="{{ title }}" >
<meta property="og:type" content="{{ og_type }}" >
<meta property="og:url" content="{{ url }}" >
<meta property="og:image" content="{{ image }}" >
<meta property="og:description" content="{{ description }}" >
<meta property="og:site_name" content="{{ site_name }}" >"#;

const TWITTER_CARD_SOURCE: &str = r#"<meta name="twitter:card" content="{{ card }}" >
<meta name="twitter:site" content="{{ site }}" >
<meta name="twitter:title" content="{{ title }}" >
<meta name="twitter:url" content="{{ url }}" >
<meta name="twitter:description" content="{{ description }}" >
<meta name="twitter:image" content="{{ image }}" >
<meta name="twitter:image:alt" content="{{ image_alt }}" >"#;

lazy_static! {
    static ref TEMPLATES: std::result::Result<Environment<'static>, String> =
        templates().map_err(|e| e.to_string());
}

fn templates() -> std::result::Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(OPEN_GRAPH_TEMPLATE, OPEN_GRAPH_SOURCE)?;
    env.add_template(TWITTER_CARD_TEMPLATE, TWITTER_CARD_SOURCE)?;
    Ok(env)
}

fn render<S: Serialize>(name: &str, card: &S) -> Result<String> {
    let env = TEMPLATES
        .as_ref()
        .map_err(|e| MarcError::RenderError(e.clone()))?;
    let html = env
        .get_template(name)
        .and_then(|template| template.render(card))
        .map_err(|e| MarcError::RenderError(format!("{name}: {e}")))?;
    trace!(template = name, bytes = html.len(), "rendered social card");
    Ok(html)
}

fn first(values: Vec<String>) -> String {
    values.into_iter().next().unwrap_or_default()
}

/// Open Graph properties for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraph {
    /// `og:title`
    pub title: String,
    /// `og:description`
    pub description: String,
    /// `og:type`
    pub og_type: String,
    /// `og:url`
    pub url: String,
    /// `og:image`
    pub image: String,
    /// `og:site_name`
    pub site_name: String,
}

impl From<&DublinCore> for OpenGraph {
    fn from(dc: &DublinCore) -> Self {
        Self {
            title: first(dc.titles()),
            description: first(dc.descriptions()),
            og_type: "website".into(),
            url: "url".into(),
            image: "image".into(),
            site_name: "site_name".into(),
        }
    }
}

impl OpenGraph {
    /// Parses MARCXML and takes the first record.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ParseError`] for malformed input.
    pub fn from_marcxml(xml: &str) -> Result<Self> {
        Ok(Self::from(&DublinCore::from_marcxml(xml)?))
    }

    /// Renders the `<meta property="og:...">` lines.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::RenderError`] if the template fails.
    pub fn render(&self) -> Result<String> {
        render(OPEN_GRAPH_TEMPLATE, self)
    }
}

/// Twitter Card properties for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterCard {
    /// `twitter:card`
    pub card: String,
    /// `twitter:site`
    pub site: String,
    /// `twitter:title`
    pub title: String,
    /// `twitter:url`
    pub url: String,
    /// `twitter:description`
    pub description: String,
    /// `twitter:image`
    pub image: String,
    /// `twitter:image:alt`
    pub image_alt: String,
}

impl From<&DublinCore> for TwitterCard {
    fn from(dc: &DublinCore) -> Self {
        Self {
            card: "card".into(),
            site: "site".into(),
            title: first(dc.titles()),
            url: "url".into(),
            description: first(dc.descriptions()),
            image: "image".into(),
            image_alt: "image_alt".into(),
        }
    }
}

impl TwitterCard {
    /// Parses MARCXML and takes the first record.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::ParseError`] for malformed input.
    pub fn from_marcxml(xml: &str) -> Result<Self> {
        Ok(Self::from(&DublinCore::from_marcxml(xml)?))
    }

    /// Renders the `<meta name="twitter:...">` lines.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::RenderError`] if the template fails.
    pub fn render(&self) -> Result<String> {
        render(TWITTER_CARD_TEMPLATE, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Field, Record};

    fn dc() -> DublinCore {
        let record = Record::builder()
            .field(
                Field::new("245", '1', '0')
                    .with_subfield('a', "Chicago :")
                    .with_subfield('b', "social areas"),
            )
            .field(Field::new("500", ' ', ' ').with_subfield('a', "Shows census tracts."))
            .build();
        DublinCore::from_record(&record).unwrap()
    }

    #[test]
    fn test_open_graph() {
        let html = OpenGraph::from(&dc()).render().unwrap();
        let lines: Vec<_> = html.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], r#"<meta property="og:title" content="Chicago : social areas" >"#);
        assert_eq!(lines[1], r#"<meta property="og:type" content="website" >"#);
        assert_eq!(
            lines[4],
            r#"<meta property="og:description" content="Shows census tracts." >"#
        );
    }

    #[test]
    fn test_twitter_card() {
        let html = TwitterCard::from(&dc()).render().unwrap();
        let lines: Vec<_> = html.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], r#"<meta name="twitter:card" content="card" >"#);
        assert_eq!(lines[2], r#"<meta name="twitter:title" content="Chicago : social areas" >"#);
        assert_eq!(lines[6], r#"<meta name="twitter:image:alt" content="image_alt" >"#);
    }

    #[test]
    fn test_missing_values_render_empty() {
        let card = OpenGraph::from(&DublinCore::default());
        assert!(card.title.is_empty());
        let html = card.render().unwrap();
        assert!(html.starts_with(r#"<meta property="og:title" content="" >"#));
    }

    #[test]
    fn test_values_are_escaped() {
        let mut card = TwitterCard::from(&dc());
        card.title = r#"Maps & "Plans" <1943>"#.into();
        let html = card.render().unwrap();
        assert!(html.contains("Maps &amp; &quot;Plans&quot; &lt;1943&gt;"));
        assert!(!html.contains("<1943>"));
    }
}
