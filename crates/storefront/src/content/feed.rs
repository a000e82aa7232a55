//! "Load more" accumulation of listing pages.

use super::ContentError;
use super::client::ContentClient;
use super::types::{PostSummary, PostsPage};

/// Posts loaded so far plus the link to the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFeed {
    posts: Vec<PostSummary>,
    next_page: Option<String>,
}

impl PostFeed {
    /// Start a feed from its first page.
    #[must_use]
    pub fn new(first: PostsPage) -> Self {
        let mut feed = Self::default();
        feed.push_page(first);
        feed
    }

    /// Fetch the first page and start a feed from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn load(client: &ContentClient, page_size: u32) -> Result<Self, ContentError> {
        Ok(Self::new(client.posts_page(page_size).await?))
    }

    #[must_use]
    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Append a page: its posts go after the existing ones and its
    /// `next_page` replaces the current link.
    pub fn push_page(&mut self, page: PostsPage) {
        self.posts.extend(page.results);
        self.next_page = page.next_page;
    }

    /// Fetch and append the next page. Returns `false` without a request
    /// when there is no next page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the feed is unchanged.
    pub async fn load_more(&mut self, client: &ContentClient) -> Result<bool, ContentError> {
        let Some(next) = self.next_page.as_deref() else {
            return Ok(false);
        };
        let page = client.next_page(next).await?;
        self.push_page(page);
        Ok(true)
    }
}
