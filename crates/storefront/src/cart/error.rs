//! Cart operation errors.

use rocketshoes_core::{InvalidCart, ProductId};
use thiserror::Error;

use super::storage::StorageError;
use crate::http::ApiError;

/// The cart operation that failed, used to pick the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

/// Why a cart operation was rejected.
///
/// A rejected operation never mutates the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The stock or product API could not be reached or answered with an error.
    #[error("failed to fetch product {product_id}: {source}")]
    FetchFailure {
        product_id: ProductId,
        #[source]
        source: ApiError,
    },

    /// The requested quantity is larger than the available stock.
    #[error(
        "requested quantity exceeds stock for product {product_id} (requested {requested}, available {available})"
    )]
    StockExceeded {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    /// Quantities must stay positive; removal goes through `remove_product`.
    #[error("invalid amount {amount} for product {product_id}")]
    InvalidAmount { product_id: ProductId, amount: u32 },

    /// The change would break a cart invariant.
    #[error("cart rejected the change: {0}")]
    Rejected(#[from] InvalidCart),

    /// The durable cart slot could not be written.
    #[error("failed to save cart: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Short message suitable for a transient notification.
    #[must_use]
    pub const fn user_message(&self, operation: Operation) -> &'static str {
        match (self, operation) {
            (Self::StockExceeded { .. }, _) => "Requested quantity is out of stock",
            (Self::Storage(_), _) => "Could not save your cart",
            (_, Operation::Add) => "Error adding product",
            (_, Operation::Remove) => "Error removing product",
            (_, Operation::UpdateAmount) => "Error updating product quantity",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let id = ProductId::new(1);

        let exceeded = CartError::StockExceeded {
            product_id: id,
            requested: 3,
            available: 2,
        };
        assert_eq!(
            exceeded.user_message(Operation::Add),
            "Requested quantity is out of stock"
        );
        assert_eq!(
            exceeded.user_message(Operation::UpdateAmount),
            "Requested quantity is out of stock"
        );

        let fetch = CartError::FetchFailure {
            product_id: id,
            source: ApiError::RateLimited(1),
        };
        assert_eq!(fetch.user_message(Operation::Add), "Error adding product");
        assert_eq!(
            fetch.user_message(Operation::UpdateAmount),
            "Error updating product quantity"
        );

        assert_eq!(
            CartError::NotFound(id).user_message(Operation::Remove),
            "Error removing product"
        );
        assert_eq!(
            CartError::InvalidAmount {
                product_id: id,
                amount: 0
            }
            .user_message(Operation::UpdateAmount),
            "Error updating product quantity"
        );
    }

    #[test]
    fn test_error_display() {
        let err = CartError::StockExceeded {
            product_id: ProductId::new(4),
            requested: 3,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "requested quantity exceeds stock for product 4 (requested 3, available 2)"
        );
        assert_eq!(
            CartError::NotFound(ProductId::new(4)).to_string(),
            "product 4 is not in the cart"
        );
        assert_eq!(
            CartError::from(InvalidCart::Duplicate(ProductId::new(4))).to_string(),
            "cart rejected the change: product 4 is already in the cart"
        );
    }
}
