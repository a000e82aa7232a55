//! Gallery API payloads.

use serde::{Deserialize, Serialize};

/// An image card in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCard {
    pub title: String,
    pub description: String,
    /// Hosted image URL.
    pub url: String,
    /// Creation timestamp (epoch microseconds, as stored by the backend).
    pub ts: i64,
    pub id: String,
}

/// One page of images (`GET /api/images?after=…`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImagePage {
    pub data: Vec<ImageCard>,
    /// Cursor of the following page; `None` or empty on the last page.
    #[serde(default)]
    pub after: Option<String>,
}

impl ImagePage {
    /// Cursor of the following page, ignoring empty cursors.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.after.as_deref().filter(|cursor| !cursor.is_empty())
    }
}

/// Body of `POST /api/images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewImage {
    pub title: String,
    pub description: String,
    pub url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cursor() {
        let page: ImagePage = serde_json::from_str(
            r#"{"data":[{"title":"Doge","description":"The best doge","url":"https://i.ibb.co/doge.png","ts":1620222828340000,"id":"294961059684418048"}],"after":"294961059684418048"}"#,
        )
        .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.next_cursor(), Some("294961059684418048"));
    }

    #[test]
    fn test_last_page_cursor() {
        let page: ImagePage = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(page.next_cursor().is_none());

        let page: ImagePage = serde_json::from_str(r#"{"data":[],"after":""}"#).unwrap();
        assert!(page.next_cursor().is_none());

        let page: ImagePage = serde_json::from_str(r#"{"data":[],"after":null}"#).unwrap();
        assert!(page.next_cursor().is_none());
    }
}
