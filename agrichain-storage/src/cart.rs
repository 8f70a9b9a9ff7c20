//! Cart persistence.
//!
//! The cart is client-session state, not an API collection: operations are
//! synchronous and skip the latency/fault gate, like a local reducer over
//! a stored snapshot. Each mutation loads the snapshot, applies the transition
//! from `agrichain_core::models::Cart`, and writes the snapshot back under
//! the session cart key in one read-modify-write.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use agrichain_core::errors::AgriResult;
use agrichain_core::models::{Cart, CartItem, Product};

use crate::keys;
use crate::kv::KvStore;

pub struct CartStore {
    kv: Arc<KvStore>,
}

impl CartStore {
    pub(crate) fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    /// Current snapshot. A missing or corrupt snapshot reads as an empty
    /// cart rather than an error.
    pub fn load(&self) -> AgriResult<Cart> {
        let cart = match self.kv.get(keys::CART)? {
            Some(doc) => serde_json::from_value(doc).unwrap_or_default(),
            None => Cart::default(),
        };
        Ok(cart)
    }

    pub fn save(&self, cart: &Cart) -> AgriResult<()> {
        self.kv.set(keys::CART, &serde_json::to_value(cart)?)
    }

    /// Add `quantity` of a product, merging by product id. Adding zero
    /// removes any existing line for the product.
    pub fn add_product(&self, product: &Product, quantity: u32) -> AgriResult<Cart> {
        let item = CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            unit: product.unit.clone(),
            quantity: 0,
            image: product.image.clone(),
        };
        self.mutate(|cart| cart.add_item(item, quantity))
    }

    pub fn remove_item(&self, product_id: &str) -> AgriResult<Cart> {
        self.mutate(|cart| cart.remove_item(product_id))
    }

    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> AgriResult<Cart> {
        self.mutate(|cart| cart.update_quantity(product_id, quantity))
    }

    pub fn apply_discount(&self, amount: f64) -> AgriResult<Cart> {
        self.mutate(|cart| cart.apply_discount(amount))
    }

    pub fn clear(&self) -> AgriResult<Cart> {
        self.mutate(Cart::clear)
    }

    fn mutate(&self, f: impl FnOnce(&mut Cart)) -> AgriResult<Cart> {
        let cart = self.kv.modify(keys::CART, |doc| {
            let mut cart: Cart = doc
                .and_then(|v: Value| serde_json::from_value(v).ok())
                .unwrap_or_default();
            f(&mut cart);
            Ok((serde_json::to_value(&cart)?, cart))
        })?;
        debug!(items = cart.items.len(), total_items = cart.total_items, "cart updated");
        Ok(cart)
    }
}
