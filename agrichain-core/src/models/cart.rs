//! Session shopping cart — the only entity that owns behavior.
//!
//! Transitions: add_item (merge by product id; zero quantity removes the
//! line), remove_item, update_quantity (clamped at 0; zero removes the
//! line), clear, apply_discount. Line quantities are always at least 1;
//! totals are derived, and the discount is clamped so the grand total
//! never goes negative.

use serde::{Deserialize, Serialize};

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub unit: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The cart snapshot: ordered lines, derived item count, flat discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub discount: f64,
}

impl Cart {
    /// Add `quantity` of a product, merging into an existing line by product
    /// id. Line quantities never drop below 1: adding zero removes any
    /// existing line for the product instead.
    pub fn add_item(&mut self, item: CartItem, quantity: u32) {
        if quantity == 0 {
            self.remove_item(&item.product_id);
            return;
        }
        match self
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            Some(line) => line.quantity += quantity,
            None => self.items.push(CartItem { quantity, ..item }),
        }
        self.total_items = self.items.iter().map(|line| line.quantity).sum();
    }

    /// Drop a line entirely. The item count is recomputed from the
    /// remaining lines, so a snapshot that was persisted with a stale
    /// `total_items` cannot underflow it.
    pub fn remove_item(&mut self, product_id: &str) {
        if let Some(pos) = self
            .items
            .iter()
            .position(|line| line.product_id == product_id)
        {
            self.items.remove(pos);
        }
        self.total_items = self.items.iter().map(|line| line.quantity).sum();
    }

    /// Set a line's quantity to `max(0, requested)`; zero removes the line.
    /// Requests against an unknown product id are ignored.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        let clamped = quantity.max(0) as u32;
        if clamped == 0 {
            self.remove_item(product_id);
        } else if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = clamped;
        }
        self.total_items = self.items.iter().map(|line| line.quantity).sum();
    }

    /// Reset to an empty cart.
    pub fn clear(&mut self) {
        *self = Cart::default();
    }

    /// Set a flat discount amount. Negative requests clamp to zero.
    pub fn apply_discount(&mut self, amount: f64) {
        self.discount = amount.max(0.0);
    }

    /// Sum of price × quantity across lines, before discount.
    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .map(|line| line.price * f64::from(line.quantity))
            .sum()
    }

    /// Subtotal minus discount, floored at 0.
    pub fn total(&self) -> f64 {
        (self.subtotal() - self.discount).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64) -> CartItem {
        CartItem {
            product_id: id.to_string(),
            name: format!("item {id}"),
            price,
            unit: "kg".to_string(),
            quantity: 0,
            image: None,
        }
    }

    #[test]
    fn add_merges_by_product_id() {
        let mut cart = Cart::default();
        cart.add_item(item("p1", 40.0), 2);
        cart.add_item(item("p1", 40.0), 3);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.total_items, 5);
        assert!((cart.subtotal() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn add_zero_quantity_removes_existing_line() {
        let mut cart = Cart::default();
        cart.add_item(item("p1", 40.0), 2);
        cart.add_item(item("p1", 40.0), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.total_items, 0);
    }

    #[test]
    fn remove_recomputes_count_from_stale_snapshot() {
        // A snapshot persisted with an inconsistent total_items must not
        // underflow when a line is removed.
        let mut cart = Cart {
            items: vec![CartItem {
                quantity: 5,
                ..item("p1", 10.0)
            }],
            total_items: 0,
            discount: 0.0,
        };
        cart.remove_item("p1");
        assert!(cart.is_empty());
        assert_eq!(cart.total_items, 0);
    }

    #[test]
    fn add_then_remove_restores_prior_count() {
        let mut cart = Cart::default();
        cart.add_item(item("p1", 10.0), 2);
        let before = cart.total_items;
        cart.add_item(item("p2", 5.0), 4);
        cart.remove_item("p2");
        assert_eq!(cart.total_items, before);
    }

    #[test]
    fn update_quantity_zero_removes_line() {
        let mut cart = Cart::default();
        cart.add_item(item("p1", 10.0), 2);
        cart.update_quantity("p1", 0);
        assert!(cart.is_empty());
        assert_eq!(cart.total_items, 0);
    }

    #[test]
    fn negative_quantity_clamps_to_removal() {
        let mut cart = Cart::default();
        cart.add_item(item("p1", 10.0), 2);
        cart.update_quantity("p1", -5);
        assert!(cart.is_empty());
    }

    #[test]
    fn discount_never_drives_total_negative() {
        let mut cart = Cart::default();
        cart.add_item(item("p1", 100.0), 3);
        cart.apply_discount(500.0);
        assert!((cart.total() - 0.0).abs() < 1e-9);
        assert!((cart.subtotal() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn total_is_idempotent_without_mutation() {
        let mut cart = Cart::default();
        cart.add_item(item("p1", 7.5), 4);
        cart.apply_discount(10.0);
        assert_eq!(cart.total().to_bits(), cart.total().to_bits());
    }
}
