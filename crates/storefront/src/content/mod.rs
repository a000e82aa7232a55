//! Blog client over a headless content API.
//!
//! # Architecture
//!
//! - Posts live in a Prismic-style repository queried over REST
//! - Every search is pinned to the repository's master release ref
//! - Listing responses are cached for 30 minutes and post details for one
//!   hour via `moka`, so readers get statically served pages that are
//!   regenerated in the background of the next request after they go stale
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::content::{ContentClient, PostFeed};
//!
//! let client = ContentClient::new(config.require_content()?)?;
//! let mut feed = PostFeed::load(&client, 2).await?;
//! while feed.load_more(&client).await? {}
//!
//! let post = client.post_by_uid("como-utilizar-hooks").await?;
//! println!("{} min", post.reading_time_minutes());
//! ```

mod client;
mod feed;
pub mod format;
pub mod rich_text;
mod types;

pub use client::{ContentClient, DEFAULT_PAGE_SIZE};
pub use feed::PostFeed;
pub use rich_text::RichTextBlock;
pub use types::{ContentGroup, Post, PostSummary, PostsPage, RenderedSection};

use thiserror::Error;

use crate::http::ApiError;

/// Errors that can occur when reading blog content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The content API request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The repository did not advertise a master ref.
    #[error("Content repository has no master ref")]
    NoMasterRef,

    /// No post has the requested uid.
    #[error("Post not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_error_display() {
        assert_eq!(
            ContentError::NotFound("missing".to_string()).to_string(),
            "Post not found: missing"
        );
        assert_eq!(
            ContentError::from(ApiError::RateLimited(5)).to_string(),
            "Rate limited, retry after 5 seconds"
        );
    }
}
