//! The cart: an ordered list of products, unique by id.
//!
//! [`Cart`] enforces the structural invariants (no duplicate ids, every
//! amount at least 1). Stock limits come from a remote source and are
//! checked by the store before it calls into here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::id::ProductId;
use crate::types::price::Price;
use crate::types::product::Product;

/// A structural cart invariant was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidCart {
    #[error("product {0} is already in the cart")]
    Duplicate(ProductId),
    #[error("product {0} is not in the cart")]
    Missing(ProductId),
    #[error("product {0} must have an amount of at least 1")]
    ZeroAmount(ProductId),
}

/// Ordered sequence of cart products.
///
/// Serializes as a plain JSON array, which is the format of the durable
/// storage slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Cart(Vec<Product>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a cart from stored items, checking the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCart` if two items share an id or any amount is zero.
    pub fn from_items(items: Vec<Product>) -> Result<Self, InvalidCart> {
        let mut cart = Self(Vec::with_capacity(items.len()));
        for item in items {
            cart.insert(item)?;
        }
        Ok(cart)
    }

    /// Cart items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.0
    }

    /// Find a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.0.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of units across all products.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.0.iter().map(|p| u64::from(p.amount)).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.0.iter().map(Product::subtotal).sum()
    }

    /// Append a product to the end of the cart.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCart::Duplicate` if the id is already present, or
    /// `InvalidCart::ZeroAmount` if the amount is zero.
    pub fn insert(&mut self, product: Product) -> Result<(), InvalidCart> {
        if product.amount == 0 {
            return Err(InvalidCart::ZeroAmount(product.id));
        }
        if self.contains(product.id) {
            return Err(InvalidCart::Duplicate(product.id));
        }
        self.0.push(product);
        Ok(())
    }

    /// Replace the amount of a product, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCart::Missing` if the product is not in the cart, or
    /// `InvalidCart::ZeroAmount` if `amount` is zero.
    pub fn set_amount(&mut self, id: ProductId, amount: u32) -> Result<(), InvalidCart> {
        if amount == 0 {
            return Err(InvalidCart::ZeroAmount(id));
        }
        let product = self
            .0
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(InvalidCart::Missing(id))?;
        product.amount = amount;
        Ok(())
    }

    /// Remove a product, returning it if it was present.
    pub fn remove(&mut self, id: ProductId) -> Option<Product> {
        let index = self.0.iter().position(|p| p.id == id)?;
        Some(self.0.remove(index))
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<Product>::deserialize(deserializer)?;
        Self::from_items(items).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, amount: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from(10),
            image: format!("https://img/{id}.jpg"),
            amount,
        }
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut cart = Cart::new();
        cart.insert(product(1, 1)).unwrap();

        let err = cart.insert(product(1, 3)).unwrap_err();
        assert_eq!(err, InvalidCart::Duplicate(ProductId::new(1)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].amount, 1);
    }

    #[test]
    fn test_insert_rejects_zero_amount() {
        let mut cart = Cart::new();
        let err = cart.insert(product(1, 0)).unwrap_err();
        assert_eq!(err, InvalidCart::ZeroAmount(ProductId::new(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_amount_keeps_order() {
        let mut cart = Cart::from_items(vec![product(1, 1), product(2, 1), product(3, 1)]).unwrap();
        cart.set_amount(ProductId::new(2), 4).unwrap();

        let ids: Vec<i32> = cart.items().iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 4);
    }

    #[test]
    fn test_set_amount_missing_and_zero() {
        let mut cart = Cart::from_items(vec![product(1, 2)]).unwrap();

        assert_eq!(
            cart.set_amount(ProductId::new(9), 1),
            Err(InvalidCart::Missing(ProductId::new(9)))
        );
        assert_eq!(
            cart.set_amount(ProductId::new(1), 0),
            Err(InvalidCart::ZeroAmount(ProductId::new(1)))
        );
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::from_items(vec![product(1, 1), product(2, 1)]).unwrap();

        assert_eq!(cart.remove(ProductId::new(1)).unwrap().id, ProductId::new(1));
        assert!(cart.remove(ProductId::new(1)).is_none());
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_totals() {
        let cart = Cart::from_items(vec![product(1, 2), product(2, 3)]).unwrap();
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.total(), Price::from(50));
    }

    #[test]
    fn test_json_round_trip_preserves_order_and_values() {
        let cart = Cart::from_items(vec![product(3, 1), product(1, 2)]).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ids() {
        let json = r#"[
            {"id":1,"title":"A","price":10,"image":"a","amount":1},
            {"id":1,"title":"A","price":10,"image":"a","amount":2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(json).is_err());
    }
}
