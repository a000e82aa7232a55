//! Content API client.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use super::ContentError;
use super::types::{ApiRoot, Post, PostData, PostSummaryData, PostsPage, SearchResponse};
use crate::config::ContentConfig;
use crate::http::{self, ApiError};

/// Listing pages are revalidated every 30 minutes.
const LISTING_TTL: Duration = Duration::from_secs(30 * 60);
/// Post pages are revalidated every hour.
const POST_TTL: Duration = Duration::from_secs(60 * 60);

/// Fields requested for listing entries.
const LISTING_FIELDS: &str = "post.title,post.subtitle,post.author";

/// Default number of posts per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 2;

/// Client for the headless content API.
///
/// Responses are cached with stale-after semantics: a cached listing is
/// served for up to 30 minutes and a cached post for up to one hour before
/// the next request goes back to the API.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    client: reqwest::Client,
    endpoint: Url,
    access_token: Option<SecretString>,
    master_ref: Cache<(), String>,
    listings: Cache<String, PostsPage>,
    posts: Cache<String, Post>,
}

impl ContentClient {
    /// Create a new content API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ContentConfig) -> Result<Self, ContentError> {
        Ok(Self {
            inner: Arc::new(ContentClientInner {
                client: http::build_client(config.timeout)?,
                endpoint: config.endpoint.clone(),
                access_token: config.access_token.clone(),
                master_ref: Cache::builder().time_to_live(LISTING_TTL).build(),
                listings: Cache::builder()
                    .max_capacity(100)
                    .time_to_live(LISTING_TTL)
                    .build(),
                posts: Cache::builder()
                    .max_capacity(500)
                    .time_to_live(POST_TTL)
                    .build(),
            }),
        })
    }

    /// First page of the post listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn posts_page(&self, page_size: u32) -> Result<PostsPage, ContentError> {
        let master_ref = self.master_ref().await?;
        let url = self.search_url(
            &master_ref,
            r#"[[at(document.type,"post")]]"#,
            &[
                ("pageSize", page_size.to_string().as_str()),
                ("fetch", LISTING_FIELDS),
            ],
        )?;
        self.listing(url).await
    }

    /// Following page of the post listing, by the `next_page` URL of the
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the API request fails.
    #[instrument(skip(self))]
    pub async fn next_page(&self, next_page: &str) -> Result<PostsPage, ContentError> {
        let url = Url::parse(next_page).map_err(ApiError::from)?;
        self.listing(url).await
    }

    /// A full post by its uid.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NotFound` if no post has this uid, or an error
    /// if the API request fails.
    #[instrument(skip(self))]
    pub async fn post_by_uid(&self, uid: &str) -> Result<Post, ContentError> {
        if let Some(post) = self.inner.posts.get(uid).await {
            debug!("Cache hit for post");
            return Ok(post);
        }

        let master_ref = self.master_ref().await?;
        let predicate = format!(r#"[[at(my.post.uid,"{}")]]"#, uid.replace('"', "\\\""));
        let url = self.search_url(&master_ref, &predicate, &[("pageSize", "1")])?;

        let response: SearchResponse<PostData> = http::get_json(&self.inner.client, url).await?;
        let post = response
            .results
            .into_iter()
            .next()
            .map(Post::from)
            .ok_or_else(|| ContentError::NotFound(uid.to_string()))?;

        self.inner.posts.insert(uid.to_string(), post.clone()).await;
        Ok(post)
    }

    async fn listing(&self, url: Url) -> Result<PostsPage, ContentError> {
        let key = url.to_string();
        if let Some(page) = self.inner.listings.get(&key).await {
            debug!("Cache hit for listing");
            return Ok(page);
        }

        let response: SearchResponse<PostSummaryData> =
            http::get_json(&self.inner.client, url).await?;
        let page = PostsPage::from(response);
        debug!(
            posts = page.results.len(),
            has_more = page.next_page.is_some(),
            "Fetched listing page"
        );

        self.inner.listings.insert(key, page.clone()).await;
        Ok(page)
    }

    /// The master content release, required on every search.
    async fn master_ref(&self) -> Result<String, ContentError> {
        if let Some(reference) = self.inner.master_ref.get(&()).await {
            return Ok(reference);
        }

        let mut url = self.inner.endpoint.clone();
        self.append_token(&mut url);
        let root: ApiRoot = http::get_json(&self.inner.client, url).await?;

        let reference = root
            .refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(ContentError::NoMasterRef)?;

        self.inner.master_ref.insert((), reference.clone()).await;
        Ok(reference)
    }

    fn search_url(
        &self,
        master_ref: &str,
        predicate: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, ContentError> {
        let mut url = self
            .inner
            .endpoint
            .join("documents/search")
            .map_err(ApiError::from)?;
        url.query_pairs_mut()
            .append_pair("ref", master_ref)
            .append_pair("q", predicate)
            .extend_pairs(params);
        self.append_token(&mut url);
        Ok(url)
    }

    fn append_token(&self, url: &mut Url) {
        if let Some(token) = &self.inner.access_token {
            url.query_pairs_mut()
                .append_pair("access_token", token.expose_secret());
        }
    }
}
