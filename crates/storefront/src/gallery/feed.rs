//! Infinite-scroll accumulation of image pages.

use super::client::GalleryClient;
use super::types::{ImageCard, ImagePage};
use crate::http::ApiError;

/// Cursor state of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Cursor {
    /// Nothing fetched yet (or invalidated).
    #[default]
    Start,
    /// More pages after this cursor.
    After(String),
    /// Last page reached.
    Exhausted,
}

/// Images loaded so far, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageFeed {
    cards: Vec<ImageCard>,
    cursor: Cursor,
}

impl ImageFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every card of every loaded page, flattened.
    #[must_use]
    pub fn cards(&self) -> &[ImageCard] {
        &self.cards
    }

    /// Whether at least one page has been loaded since the last reset.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cursor != Cursor::Start
    }

    /// Whether another page can be fetched. True before the first fetch.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        !matches!(self.cursor, Cursor::Exhausted)
    }

    /// Append a page and advance the cursor.
    pub fn push_page(&mut self, page: ImagePage) {
        self.cursor = match page.next_cursor() {
            Some(after) => Cursor::After(after.to_string()),
            None => Cursor::Exhausted,
        };
        self.cards.extend(page.data);
    }

    /// Fetch and append the next page. Returns `false` without a request
    /// when the feed is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the feed is unchanged.
    pub async fn fetch_next_page(&mut self, client: &GalleryClient) -> Result<bool, ApiError> {
        let after = match &self.cursor {
            Cursor::Exhausted => return Ok(false),
            Cursor::Start => None,
            Cursor::After(after) => Some(after.as_str()),
        };
        let page = client.images_page(after).await?;
        self.push_page(page);
        Ok(true)
    }

    /// Drop everything loaded so the next fetch starts from the first page.
    pub fn invalidate(&mut self) {
        self.cards.clear();
        self.cursor = Cursor::Start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> ImageCard {
        ImageCard {
            title: format!("Image {id}"),
            description: String::new(),
            url: format!("https://img/{id}.png"),
            ts: 0,
            id: id.to_string(),
        }
    }

    #[test]
    fn test_pages_merge_in_order() {
        let mut feed = ImageFeed::new();
        assert!(feed.has_next_page());
        assert!(!feed.is_loaded());

        feed.push_page(ImagePage {
            data: vec![card("1"), card("2")],
            after: Some("2".to_string()),
        });
        assert!(feed.has_next_page());

        feed.push_page(ImagePage {
            data: vec![card("3")],
            after: None,
        });
        let ids: Vec<&str> = feed.cards().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(!feed.has_next_page());
        assert!(feed.is_loaded());
    }

    #[test]
    fn test_empty_cursor_ends_feed() {
        let mut feed = ImageFeed::new();
        feed.push_page(ImagePage {
            data: vec![card("1")],
            after: Some(String::new()),
        });
        assert!(!feed.has_next_page());
    }

    #[test]
    fn test_invalidate_resets_feed() {
        let mut feed = ImageFeed::new();
        feed.push_page(ImagePage {
            data: vec![card("1")],
            after: None,
        });
        feed.invalidate();
        assert!(feed.cards().is_empty());
        assert!(feed.has_next_page());
        assert!(!feed.is_loaded());
    }
}
