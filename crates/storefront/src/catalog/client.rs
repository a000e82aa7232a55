//! `reqwest` implementation of [`CatalogSource`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use rocketshoes_core::{ProductDetails, ProductId, Stock};
use tracing::{debug, instrument};
use url::Url;

use super::CatalogSource;
use crate::config::CatalogConfig;
use crate::http::{self, ApiError};

/// Client for the catalog/stock API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, ProductDetails>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, ApiError> {
        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client: http::build_client(config.timeout)?,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        let url = self.url(&format!("stock/{id}"))?;
        let stock: Stock = http::get_json(&self.inner.client, url).await?;
        debug!(amount = stock.amount, "Fetched stock");
        Ok(stock)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<ProductDetails, ApiError> {
        if let Some(details) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(details);
        }

        let url = self.url(&format!("products/{id}"))?;
        let details: ProductDetails = http::get_json(&self.inner.client, url).await?;

        self.inner.products.insert(id, details.clone()).await;

        Ok(details)
    }
}
