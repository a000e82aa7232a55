//! Gallery API client.

use std::sync::Arc;

use tracing::{debug, instrument};
use url::Url;

use super::types::{ImagePage, NewImage};
use crate::config::GalleryConfig;
use crate::http::{self, ApiError};

/// Client for the image gallery API (`/api/images`).
#[derive(Clone)]
pub struct GalleryClient {
    inner: Arc<GalleryClientInner>,
}

struct GalleryClientInner {
    client: reqwest::Client,
    images_url: Url,
}

impl GalleryClient {
    /// Create a new gallery API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &GalleryConfig) -> Result<Self, ApiError> {
        Ok(Self {
            inner: Arc::new(GalleryClientInner {
                client: http::build_client(config.timeout)?,
                images_url: config.base_url.join("api/images")?,
            }),
        })
    }

    /// One page of images, starting after `after` (or from the beginning).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn images_page(&self, after: Option<&str>) -> Result<ImagePage, ApiError> {
        let mut url = self.inner.images_url.clone();
        if let Some(after) = after {
            url.query_pairs_mut().append_pair("after", after);
        }

        let page: ImagePage = http::get_json(&self.inner.client, url).await?;
        debug!(
            images = page.data.len(),
            has_next = page.next_cursor().is_some(),
            "Fetched image page"
        );
        Ok(page)
    }

    /// Register an already-hosted image.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, image), fields(title = %image.title))]
    pub async fn create_image(&self, image: &NewImage) -> Result<(), ApiError> {
        let url = self.inner.images_url.clone();
        let response = self
            .inner
            .client
            .post(url.clone())
            .json(image)
            .send()
            .await?;
        http::expect_success(url, response).await
    }
}
