//! Catalog products, stock entries and cart line items.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;

/// Product details as reported by the catalog API (`GET /products/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
}

/// Remote-authoritative maximum purchasable quantity (`GET /stock/{id}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether `quantity` units can be purchased.
    #[must_use]
    pub const fn covers(&self, quantity: u32) -> bool {
        quantity <= self.amount
    }
}

/// A product held in the cart.
///
/// `amount` is the quantity in the cart and is at least 1 while the
/// product is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    pub amount: u32,
}

impl Product {
    /// Build a cart line from catalog details.
    #[must_use]
    pub fn from_details(details: ProductDetails, amount: u32) -> Self {
        Self {
            id: details.id,
            title: details.title,
            price: details.price,
            image: details.image,
            amount,
        }
    }

    /// Line subtotal (`price × amount`).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_details_deserialize_from_catalog_payload() {
        let details: ProductDetails = serde_json::from_str(
            r#"{"id":1,"title":"Tênis de Caminhada","price":179.9,"image":"https://img/1.jpg"}"#,
        )
        .unwrap();

        assert_eq!(details.id, ProductId::new(1));
        assert_eq!(details.price, Price::from_cents(17990));
    }

    #[test]
    fn test_from_details_sets_amount() {
        let details = ProductDetails {
            id: ProductId::new(5),
            title: "X".to_string(),
            price: Price::from(10),
            image: String::new(),
        };

        let product = Product::from_details(details, 1);
        assert_eq!(product.amount, 1);
        assert_eq!(product.title, "X");
    }

    #[test]
    fn test_subtotal() {
        let product = Product {
            id: ProductId::new(1),
            title: "X".to_string(),
            price: Price::from_cents(1990),
            image: String::new(),
            amount: 3,
        };
        assert_eq!(product.subtotal(), Price::from_cents(5970));
    }

    #[test]
    fn test_stock_covers() {
        let stock = Stock {
            id: ProductId::new(1),
            amount: 2,
        };
        assert!(stock.covers(2));
        assert!(!stock.covers(3));
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let result = serde_json::from_str::<Stock>(r#"{"id":1,"amount":-1}"#);
        assert!(result.is_err());
    }
}
