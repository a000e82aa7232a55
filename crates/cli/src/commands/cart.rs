//! Cart commands.
//!
//! The cart is persisted under `ROCKETSHOES_DATA_DIR`, so each invocation
//! picks up where the previous one left off.

use std::sync::Arc;

use rocketshoes_core::{Cart, ProductId};
use rocketshoes_storefront::ApiError;
use rocketshoes_storefront::cart::{CartError, CartStore, FileStorage, UpdateProductAmount};
use rocketshoes_storefront::catalog::CatalogClient;
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::notify::TracingNotifier;

/// Open the persisted cart backed by the configured catalog API.
pub fn open_store(config: &StorefrontConfig) -> Result<CartStore, ApiError> {
    let catalog = CatalogClient::new(&config.catalog)?;
    Ok(CartStore::load(
        Arc::new(catalog),
        Arc::new(FileStorage::new(config.data_dir.clone())),
        Arc::new(TracingNotifier),
    ))
}

pub async fn update(store: &CartStore, product_id: ProductId, amount: u32) -> Result<(), CartError> {
    store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await
}

/// Log every line with its subtotal, then the cart total.
pub fn print(cart: &Cart) {
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for product in cart.items() {
        tracing::info!(
            "#{} {} - {} x {} = {}",
            product.id,
            product.title,
            product.amount,
            product.price,
            product.subtotal()
        );
    }
    tracing::info!(
        "{} products, {} items, total {}",
        cart.len(),
        cart.item_count(),
        cart.total()
    );
}
