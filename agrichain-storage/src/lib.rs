//! # agrichain-storage
//!
//! Persistence layer for the AgriChain data layer: a SQLite-backed
//! key-value document store (one JSON document per collection key),
//! seed fixtures with self-healing, entity repositories, dashboard stats,
//! cross-collection search, the session cart, and the `MarketEngine`
//! facade that wires it all together.

pub mod cart;
pub mod engine;
pub mod gate;
pub mod keys;
pub mod kv;
pub mod repos;
pub mod search;
pub mod seeds;
pub mod session;
pub mod stats;

pub use engine::MarketEngine;
pub use kv::KvStore;
