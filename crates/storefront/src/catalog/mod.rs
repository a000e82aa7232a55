//! Catalog and stock API client.
//!
//! # Architecture
//!
//! - The remote API is the source of truth for stock - it is never cached
//! - Product details (title, price, image) are cached via `moka` (5 minute TTL)
//! - [`CatalogSource`] is the seam the cart store depends on, so the store can
//!   be driven by fakes in tests
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` → `{ id, amount }`
//! - `GET /products/{id}` → `{ id, title, price, image }`
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_storefront::catalog::{CatalogClient, CatalogSource};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let stock = client.stock(ProductId::new(1)).await?;
//! ```

mod client;

pub use client::CatalogClient;

use async_trait::async_trait;
use rocketshoes_core::{ProductDetails, ProductId, Stock};

use crate::http::ApiError;

/// Remote source of stock levels and product details.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the purchasable quantity for a product.
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError>;

    /// Fetch the catalog details for a product.
    async fn product(&self, id: ProductId) -> Result<ProductDetails, ApiError>;
}
