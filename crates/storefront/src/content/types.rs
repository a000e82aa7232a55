//! Blog domain types and the raw content API payloads they come from.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

use super::format::{format_publication_date, reading_time_minutes};
use super::rich_text::{self, RichTextBlock};

// =============================================================================
// API payloads
// =============================================================================

/// Repository root (`GET {endpoint}`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRoot {
    pub refs: Vec<ApiRef>,
}

/// A content release reference.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRef {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

/// Search response (`GET {endpoint}/documents/search`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponse<T> {
    pub results: Vec<Document<T>>,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// A single content document.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Document<T> {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "deserialize_publication_date")]
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PostSummaryData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PostData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub banner: Banner,
    #[serde(default)]
    pub content: Vec<ContentGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Banner {
    #[serde(default)]
    pub url: Option<String>,
}

/// The API writes offsets without a colon (`2021-03-25T19:25:28+0000`), which
/// plain RFC 3339 parsing rejects.
fn deserialize_publication_date<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| parse_publication_date(&s).map_err(serde::de::Error::custom))
        .transpose()
}

pub(crate) fn parse_publication_date(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
}

// =============================================================================
// Domain types
// =============================================================================

/// A post as shown in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub uid: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub first_publication_date: Option<DateTime<FixedOffset>>,
}

impl PostSummary {
    /// Publication date as `dd MMM yyyy` (`25 mar 2021`).
    #[must_use]
    pub fn published_label(&self) -> Option<String> {
        self.first_publication_date
            .as_ref()
            .map(format_publication_date)
    }
}

impl From<Document<PostSummaryData>> for PostSummary {
    fn from(doc: Document<PostSummaryData>) -> Self {
        Self {
            uid: doc.uid,
            title: doc.data.title,
            subtitle: doc.data.subtitle,
            author: doc.data.author,
            first_publication_date: doc.first_publication_date,
        }
    }
}

/// One page of the post listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsPage {
    pub results: Vec<PostSummary>,
    /// Absolute URL of the following page, if any.
    pub next_page: Option<String>,
}

impl From<SearchResponse<PostSummaryData>> for PostsPage {
    fn from(response: SearchResponse<PostSummaryData>) -> Self {
        Self {
            results: response.results.into_iter().map(PostSummary::from).collect(),
            next_page: response.next_page.filter(|url| !url.is_empty()),
        }
    }
}

/// A section of a post: a heading followed by rich text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentGroup {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

/// A section rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    pub heading: String,
    pub body_html: String,
}

/// A full blog post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub uid: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner_url: Option<String>,
    pub content: Vec<ContentGroup>,
    pub first_publication_date: Option<DateTime<FixedOffset>>,
}

impl Post {
    /// Publication date as `dd MMM yyyy` (`25 mar 2021`).
    #[must_use]
    pub fn published_label(&self) -> Option<String> {
        self.first_publication_date
            .as_ref()
            .map(format_publication_date)
    }

    /// Estimated reading time over all headings and body text.
    #[must_use]
    pub fn reading_time_minutes(&self) -> u32 {
        let words: usize = self
            .content
            .iter()
            .map(|group| {
                group.heading.split_whitespace().count()
                    + rich_text::as_text(&group.body).split_whitespace().count()
            })
            .sum();
        reading_time_minutes(words)
    }

    /// Sections with their rich text rendered to HTML.
    #[must_use]
    pub fn rendered_sections(&self) -> Vec<RenderedSection> {
        self.content
            .iter()
            .map(|group| RenderedSection {
                heading: group.heading.clone(),
                body_html: rich_text::as_html(&group.body),
            })
            .collect()
    }
}

impl From<Document<PostData>> for Post {
    fn from(doc: Document<PostData>) -> Self {
        Self {
            uid: doc.uid,
            title: doc.data.title,
            subtitle: doc.data.subtitle,
            author: doc.data.author,
            banner_url: doc.data.banner.url,
            content: doc.data.content,
            first_publication_date: doc.first_publication_date,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_publication_date_without_colon() {
        let date = parse_publication_date("2021-03-25T19:25:28+0000").unwrap();
        assert_eq!(date.to_rfc3339(), "2021-03-25T19:25:28+00:00");
    }

    #[test]
    fn test_parse_publication_date_rfc3339() {
        assert!(parse_publication_date("2021-03-25T19:25:28-03:00").is_ok());
        assert!(parse_publication_date("25/03/2021").is_err());
    }

    #[test]
    fn test_search_response_to_page() {
        let json = r#"{
            "page": 1,
            "results": [{
                "uid": "como-utilizar-hooks",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "data": {"title": "Como utilizar Hooks", "subtitle": "Pensando em sincronização", "author": "Joseph Oliveira"}
            }],
            "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?page=2"
        }"#;

        let response: SearchResponse<PostSummaryData> = serde_json::from_str(json).unwrap();
        let page = PostsPage::from(response);

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].uid.as_deref(), Some("como-utilizar-hooks"));
        assert_eq!(page.results[0].published_label().as_deref(), Some("15 mar 2021"));
        assert!(page.next_page.is_some());
    }

    #[test]
    fn test_null_next_page_and_date() {
        let json = r#"{"results": [{"uid": null, "first_publication_date": null, "data": {"title": "Draft"}}], "next_page": null}"#;
        let response: SearchResponse<PostSummaryData> = serde_json::from_str(json).unwrap();
        let page = PostsPage::from(response);

        assert!(page.next_page.is_none());
        assert!(page.results[0].published_label().is_none());
        assert_eq!(page.results[0].author, "");
    }

    #[test]
    fn test_post_reading_time_counts_headings_and_body() {
        let body_words = vec!["word"; 399].join(" ");
        let post = Post {
            uid: Some("p".to_string()),
            title: "T".to_string(),
            subtitle: String::new(),
            author: String::new(),
            banner_url: None,
            content: vec![ContentGroup {
                heading: "Two words".to_string(),
                body: vec![RichTextBlock::paragraph(&body_words)],
            }],
            first_publication_date: None,
        };

        // 401 words at 200 wpm
        assert_eq!(post.reading_time_minutes(), 3);
    }

    #[test]
    fn test_post_rendered_sections() {
        let post = Post {
            uid: None,
            title: "T".to_string(),
            subtitle: String::new(),
            author: String::new(),
            banner_url: None,
            content: vec![ContentGroup {
                heading: "Intro".to_string(),
                body: vec![RichTextBlock::paragraph("Hello")],
            }],
            first_publication_date: None,
        };

        let sections = post.rendered_sections();
        assert_eq!(sections[0].heading, "Intro");
        assert_eq!(sections[0].body_html, "<p>Hello</p>");
    }
}
