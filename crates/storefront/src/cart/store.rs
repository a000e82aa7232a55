//! The cart store.

use std::sync::Arc;

use rocketshoes_core::{Cart, Product, ProductDetails, ProductId, Stock};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::error::{CartError, Operation};
use super::storage::{CART_STORAGE_KEY, KeyValueStorage, StorageError};
use crate::catalog::CatalogSource;
use crate::http::ApiError;
use crate::notify::{Notice, Notifier};

/// Arguments of [`CartStore::update_product_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: u32,
}

/// Owns the cart and keeps it in sync with durable storage.
///
/// Every operation either commits (one storage write, one subscriber
/// notification) or is rejected (no write, no notification, a [`Notice`]
/// sent to the notifier). Overlapping operations are not serialized: each
/// one works from the cart as it was when the operation started, and the
/// last commit wins.
pub struct CartStore {
    catalog: Arc<dyn CatalogSource>,
    storage: Arc<dyn KeyValueStorage>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<Cart>,
}

impl CartStore {
    /// Create a store, loading the cart from durable storage.
    ///
    /// A missing slot yields an empty cart. An unreadable or corrupt slot is
    /// logged and also yields an empty cart; it is overwritten by the next
    /// successful operation.
    pub fn load(
        catalog: Arc<dyn CatalogSource>,
        storage: Arc<dyn KeyValueStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cart = load_cart(storage.as_ref());
        info!(products = cart.len(), "Cart loaded");

        let (state, _) = watch::channel(cart);

        Self {
            catalog,
            storage,
            notifier,
            state,
        }
    }

    /// Current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver observes the cart after every committed operation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Add one unit of a product.
    ///
    /// Increments the amount if the product is already in the cart, otherwise
    /// fetches its details and appends it with an amount of 1.
    ///
    /// # Errors
    ///
    /// - `CartError::FetchFailure` if the stock or product API fails
    /// - `CartError::StockExceeded` if one more unit is not in stock
    /// - `CartError::Storage` if the cart cannot be saved
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_add_product(product_id).await;
        self.finish(Operation::Add, result)
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// - `CartError::NotFound` if the product is not in the cart
    /// - `CartError::Storage` if the cart cannot be saved
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut next = self.cart();
        let result = match next.remove(product_id) {
            Some(_) => self.commit(next),
            None => Err(CartError::NotFound(product_id)),
        };
        self.finish(Operation::Remove, result)
    }

    /// Set the amount of a product already in the cart.
    ///
    /// # Errors
    ///
    /// - `CartError::InvalidAmount` if `amount` is zero
    /// - `CartError::NotFound` if the product is not in the cart
    /// - `CartError::FetchFailure` if the stock API fails
    /// - `CartError::StockExceeded` if `amount` is more than the stock
    /// - `CartError::Storage` if the cart cannot be saved
    #[instrument(skip(self), fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(
        &self,
        update: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let result = self.try_update_product_amount(update).await;
        self.finish(Operation::UpdateAmount, result)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut next = self.cart();
        let stock = self.fetch_stock(product_id).await?;

        if let Some(product) = next.get(product_id) {
            let requested = product.amount.saturating_add(1);
            check_stock(&stock, requested)?;
            next.set_amount(product_id, requested)?;
        } else {
            check_stock(&stock, 1)?;
            let details = self.fetch_details(product_id).await?;
            next.insert(Product::from_details(details, 1))?;
        }

        self.commit(next)
    }

    async fn try_update_product_amount(
        &self,
        UpdateProductAmount { product_id, amount }: UpdateProductAmount,
    ) -> Result<(), CartError> {
        if amount < 1 {
            return Err(CartError::InvalidAmount { product_id, amount });
        }

        let mut next = self.cart();
        if !next.contains(product_id) {
            return Err(CartError::NotFound(product_id));
        }

        let stock = self.fetch_stock(product_id).await?;
        check_stock(&stock, amount)?;

        next.set_amount(product_id, amount)?;
        self.commit(next)
    }

    async fn fetch_stock(&self, product_id: ProductId) -> Result<Stock, CartError> {
        self.catalog
            .stock(product_id)
            .await
            .map_err(|source| CartError::FetchFailure { product_id, source })
    }

    /// Product details for `product_id`, rejecting a payload for another product.
    async fn fetch_details(&self, product_id: ProductId) -> Result<ProductDetails, CartError> {
        let details = self
            .catalog
            .product(product_id)
            .await
            .map_err(|source| CartError::FetchFailure { product_id, source })?;

        if details.id != product_id {
            return Err(CartError::FetchFailure {
                product_id,
                source: ApiError::Unexpected(format!(
                    "details for product {} returned for product {product_id}",
                    details.id
                )),
            });
        }
        Ok(details)
    }

    /// Persist `next`, then publish it. Nothing changes if the write fails.
    fn commit(&self, next: Cart) -> Result<(), CartError> {
        let json = serde_json::to_string(&next).map_err(StorageError::from)?;
        self.storage.set(CART_STORAGE_KEY, &json)?;

        debug!(
            products = next.len(),
            items = next.item_count(),
            "Cart committed"
        );
        self.state.send_replace(next);
        Ok(())
    }

    /// Report a rejected operation to the notifier.
    fn finish(&self, operation: Operation, result: Result<(), CartError>) -> Result<(), CartError> {
        if let Err(err) = &result {
            warn!(?operation, error = %err, "Cart operation rejected");
            self.notifier.notify(Notice::error(err.user_message(operation)));
        }
        result
    }
}

fn check_stock(stock: &Stock, requested: u32) -> Result<(), CartError> {
    if !stock.covers(requested) {
        return Err(CartError::StockExceeded {
            product_id: stock.id,
            requested,
            available: stock.amount,
        });
    }
    Ok(())
}

fn load_cart(storage: &dyn KeyValueStorage) -> Cart {
    let raw = match storage.get(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart, starting empty");
            return Cart::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "Stored cart is corrupt, starting empty");
        Cart::new()
    })
}
