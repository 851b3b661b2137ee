//! Wikipedia REST + action API client
//!
//! Two lookups per selected species: the REST summary endpoint (title keyed,
//! spaces become underscores) and a named page section fetched through the
//! action API in two steps (section list, then section HTML). Section HTML
//! is sanitized to plain text before display; citation markers, styles, and
//! template residue never reach the page.

use crate::types::EncyclopediaEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const SUMMARY_URL_BASE: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const ACTION_API_URL: &str = "https://en.wikipedia.org/w/api.php";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Wikipedia client errors
#[derive(Debug, Error)]
pub enum WikipediaError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// REST summary payload, reduced to the fields the page uses
#[derive(Debug, Clone, Deserialize)]
pub struct PageSummary {
    pub title: String,
    pub description: Option<String>,
    pub extract: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    pub timestamp: Option<String>,
    pub content_urls: Option<ContentUrls>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentUrls {
    pub desktop: Option<PageRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageRef {
    pub page: Option<String>,
}

impl From<PageSummary> for EncyclopediaEntry {
    fn from(summary: PageSummary) -> Self {
        EncyclopediaEntry {
            title: summary.title,
            description: summary.description,
            extract: summary.extract,
            thumbnail_url: summary.thumbnail.and_then(|t| t.source),
            page_url: summary.content_urls.and_then(|c| c.desktop).and_then(|d| d.page),
            last_revision_timestamp: summary.timestamp,
        }
    }
}

/// Section list from `action=parse&prop=sections`
#[derive(Debug, Clone, Default, Deserialize)]
struct SectionListResponse {
    #[serde(default)]
    parse: SectionListParse,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SectionListParse {
    #[serde(default)]
    sections: Vec<SectionEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SectionEntry {
    #[serde(default)]
    line: String,
    /// Section index; the action API serves it as a string
    #[serde(default)]
    index: String,
}

/// Section text from `action=parse&prop=text&section=N`
#[derive(Debug, Clone, Default, Deserialize)]
struct SectionTextResponse {
    #[serde(default)]
    parse: SectionTextParse,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SectionTextParse {
    #[serde(default)]
    text: SectionTextBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SectionTextBody {
    #[serde(rename = "*", default)]
    html: String,
}

/// Wikipedia API client
pub struct WikipediaClient {
    http_client: reqwest::Client,
}

impl WikipediaClient {
    pub fn new() -> Result<Self, WikipediaError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| WikipediaError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Fetch the page summary for a title; `Ok(None)` when no page exists
    pub async fn summary(&self, title: &str) -> Result<Option<EncyclopediaEntry>, WikipediaError> {
        let url = format!("{}/{}", SUMMARY_URL_BASE, title.replace(' ', "_"));
        debug!(title = %title, "Querying Wikipedia summary");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| WikipediaError::Network(e.to_string()))?;

        let status = response.status();
        if status == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WikipediaError::Api(status.as_u16(), error_text));
        }

        let summary: PageSummary = response
            .json()
            .await
            .map_err(|e| WikipediaError::Parse(e.to_string()))?;

        info!(title = %summary.title, "Retrieved Wikipedia summary");
        Ok(Some(summary.into()))
    }

    /// Fetch a named page section as sanitized plain text
    ///
    /// Section titles match case-insensitively. `Ok(None)` when the page has
    /// no section with that title.
    pub async fn section(
        &self,
        page: &str,
        section_title: &str,
    ) -> Result<Option<String>, WikipediaError> {
        let sections = self.fetch_section_list(page).await?;

        let index = sections
            .into_iter()
            .find(|s| s.line.eq_ignore_ascii_case(section_title))
            .map(|s| s.index)
            .filter(|index| !index.is_empty());
        let Some(index) = index else {
            debug!(page = %page, section = %section_title, "Section not present on page");
            return Ok(None);
        };

        let html = self.fetch_section_text(page, &index).await?;
        let clean = sanitize_html(&html);
        if clean.is_empty() {
            return Ok(None);
        }
        Ok(Some(clean))
    }

    async fn fetch_section_list(&self, page: &str) -> Result<Vec<SectionEntry>, WikipediaError> {
        let response = self
            .http_client
            .get(ACTION_API_URL)
            .query(&[
                ("action", "parse"),
                ("page", page),
                ("prop", "sections"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| WikipediaError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WikipediaError::Api(status.as_u16(), error_text));
        }

        let list: SectionListResponse = response
            .json()
            .await
            .map_err(|e| WikipediaError::Parse(e.to_string()))?;
        Ok(list.parse.sections)
    }

    async fn fetch_section_text(&self, page: &str, index: &str) -> Result<String, WikipediaError> {
        let response = self
            .http_client
            .get(ACTION_API_URL)
            .query(&[
                ("action", "parse"),
                ("page", page),
                ("prop", "text"),
                ("section", index),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| WikipediaError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WikipediaError::Api(status.as_u16(), error_text));
        }

        let text: SectionTextResponse = response
            .json()
            .await
            .map_err(|e| WikipediaError::Parse(e.to_string()))?;
        Ok(text.parse.text.html)
    }
}

static STYLE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static SUP_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<sup[^>]*>.*?</sup>").unwrap());
static ANCHOR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<a [^>]+>(.*?)</a>").unwrap());
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").unwrap());
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static CSS_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static BRACED_TEMPLATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{[^}]*\}").unwrap());

/// Strip section HTML down to displayable plain text
///
/// Removes styles, comments, superscript citation markers, collapses anchors
/// to their text, drops all remaining tags, bracketed citations, reference
/// backlink lines, and template residue.
pub fn sanitize_html(html: &str) -> String {
    let text = STYLE_BLOCK.replace_all(html, "");
    let text = HTML_COMMENT.replace_all(&text, "");
    let text = SUP_BLOCK.replace_all(&text, "");
    let text = ANCHOR_TAG.replace_all(&text, "$1");
    let text = ANY_TAG.replace_all(&text, "");
    let text = BRACKETED.replace_all(&text, "");
    let text = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('^'))
        .collect::<Vec<_>>()
        .join("\n");
    let text = CSS_COMMENT.replace_all(&text, "");
    let text = BRACED_TEMPLATE.replace_all(&text, "");
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

static TOXICITY_HIGHLIGHTS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)danger(ous)?").unwrap(),
            r#"<span style="color:#b30000; font-weight:bold;">${0}</span>"#,
        ),
        (
            Regex::new(r"(?i)toxic(ity)?").unwrap(),
            r#"<span style="color:#b30000; font-weight:bold;">${0}</span>"#,
        ),
        (
            Regex::new(r"(?i)poison(ous)?").unwrap(),
            r#"<span style="color:#b30000; font-weight:bold;">${0}</span>"#,
        ),
        (
            Regex::new(r"(?i)allergic").unwrap(),
            r#"<span style="color:#e67300; font-weight:bold;">${0}</span>"#,
        ),
        (
            Regex::new(r"(?i)anaphylaxis").unwrap(),
            r#"<span style="color:#e67300; font-weight:bold;">${0}</span>"#,
        ),
        (
            Regex::new(r"(?i)rash|blister|itch").unwrap(),
            r#"<span style="color:#e67300; font-weight:bold;">${0}</span>"#,
        ),
    ]
});

/// Wrap toxicity warning words in highlight markup for the detail panel
pub fn highlight_toxicity(text: &str) -> String {
    let mut highlighted = text.to_string();
    for (pattern, replacement) in TOXICITY_HIGHLIGHTS.iter() {
        highlighted = pattern.replace_all(&highlighted, *replacement).to_string();
    }
    highlighted
}
