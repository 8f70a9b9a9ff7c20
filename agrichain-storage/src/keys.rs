//! Well-known storage keys.
//!
//! One serialized JSON document per collection, plus session-scoped keys for
//! the cart, the current-user pointer, and per-farmer derived collections.

pub const PRODUCTS: &str = "agrichain-products";
pub const FARMERS: &str = "agrichain-farmers";
pub const TRACES: &str = "agrichain-traces";
pub const TRANSACTIONS: &str = "agrichain-transactions";
pub const SCHEMES: &str = "agrichain-schemes";

pub const CART: &str = "agrichain-cart";
pub const CURRENT_USER: &str = "agrichain-user";

/// Every seeded collection key, in healing order.
pub const COLLECTIONS: [&str; 5] = [PRODUCTS, FARMERS, TRACES, TRANSACTIONS, SCHEMES];

/// Scheme claims filed by one farmer.
pub fn farmer_claims(farmer_id: &str) -> String {
    format!("agrichain-claims-{farmer_id}")
}

/// Product ids posted locally by one farmer.
pub fn farmer_products(farmer_id: &str) -> String {
    format!("agrichain-farmer-products-{farmer_id}")
}
