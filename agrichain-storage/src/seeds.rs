//! Bundled seed fixtures and the self-healing pass.
//!
//! The fixture files ship in mixed physical shapes — some collections as
//! bare arrays, some wrapped in `{collection: [...]}`, traces nested under
//! a `products` map. The canonical on-disk schema is one shape per
//! collection: a bare JSON array for list collections and a plain object
//! map keyed by product id for traces. The fixtures keep the legacy shapes
//! on purpose; this module normalizes them once at the seed boundary, so
//! repositories only ever see the canonical form.

use serde_json::{Map, Value};
use tracing::{info, warn};

use agrichain_core::errors::AgriResult;

use crate::keys;
use crate::kv::KvStore;

const PRODUCTS_FIXTURE: &str = include_str!("../fixtures/products.json");
const FARMERS_FIXTURE: &str = include_str!("../fixtures/farmers.json");
const TRACES_FIXTURE: &str = include_str!("../fixtures/traces.json");
const TRANSACTIONS_FIXTURE: &str = include_str!("../fixtures/transactions.json");
const SCHEMES_FIXTURE: &str = include_str!("../fixtures/schemes.json");

/// The canonical seed document for a collection key. Unknown keys seed as an
/// empty array.
pub fn seed_document(key: &str) -> Value {
    let raw = match key {
        keys::PRODUCTS => PRODUCTS_FIXTURE,
        keys::FARMERS => FARMERS_FIXTURE,
        keys::TRACES => TRACES_FIXTURE,
        keys::TRANSACTIONS => TRANSACTIONS_FIXTURE,
        keys::SCHEMES => SCHEMES_FIXTURE,
        _ => return Value::Array(Vec::new()),
    };
    let doc = serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(key, error = %e, "bundled fixture failed to parse");
        Value::Null
    });
    normalize(key, doc)
}

/// Normalize a document to the collection's canonical shape, accepting both
/// the canonical form and the legacy wrapper forms.
pub fn normalize(key: &str, doc: Value) -> Value {
    if key == keys::TRACES {
        Value::Object(normalize_trace_map(doc))
    } else {
        Value::Array(normalize_list(key, doc))
    }
}

/// Is `doc` already in the canonical shape for `key`?
pub fn is_canonical(key: &str, doc: &Value) -> bool {
    if key == keys::TRACES {
        // Canonical trace map has no legacy `products` wrapper level.
        matches!(doc, Value::Object(map)
            if map.values().all(|v| v.is_object()) && !map.contains_key("products"))
    } else {
        doc.is_array()
    }
}

/// Verify every known collection key exists in canonical shape, rewriting
/// any missing, unparseable, or legacy-shaped key from its fixture.
/// Idempotent; runs at engine open, before any repository operation.
pub fn heal(kv: &KvStore) -> AgriResult<()> {
    for key in keys::COLLECTIONS {
        match kv.get(key)? {
            Some(doc) if is_canonical(key, &doc) => {}
            Some(doc) => {
                info!(key, "normalizing legacy document shape");
                kv.set(key, &normalize(key, doc))?;
            }
            None => {
                info!(key, "collection missing or corrupt, seeding from fixture");
                kv.set(key, &seed_document(key))?;
            }
        }
    }
    Ok(())
}

/// Drop every collection key and reseed from fixtures.
pub fn reset(kv: &KvStore) -> AgriResult<()> {
    for key in keys::COLLECTIONS {
        kv.remove(key)?;
    }
    heal(kv)
}

fn normalize_list(key: &str, doc: Value) -> Vec<Value> {
    match doc {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            // Legacy `{collection: [...]}` wrapper.
            match map.remove(wrapper_field(key)) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

fn normalize_trace_map(doc: Value) -> Map<String, Value> {
    match doc {
        // Legacy fixture nests the map under a `products` key.
        Value::Object(mut map) => match map.remove("products") {
            Some(Value::Object(inner)) => inner,
            Some(other) => {
                map.insert("products".to_string(), other);
                map
            }
            None => map,
        },
        // Legacy array-of-traces form.
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| {
                let id = item.get("product_id")?.as_str()?.to_string();
                Some((id, item))
            })
            .collect(),
        _ => Map::new(),
    }
}

fn wrapper_field(key: &str) -> &'static str {
    match key {
        keys::PRODUCTS => "products",
        keys::FARMERS => "farmers",
        keys::TRANSACTIONS => "transactions",
        keys::SCHEMES => "schemes",
        _ => "items",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrapped_fixture_normalizes_to_bare_array() {
        let doc = seed_document(keys::PRODUCTS);
        assert!(doc.is_array());
        assert!(!doc.as_array().unwrap().is_empty());
    }

    #[test]
    fn bare_fixture_stays_bare() {
        let doc = seed_document(keys::TRANSACTIONS);
        assert!(doc.is_array());
    }

    #[test]
    fn trace_fixture_unwraps_products_level() {
        let doc = seed_document(keys::TRACES);
        let map = doc.as_object().unwrap();
        assert!(map.contains_key("prod-001"));
        assert!(!map.contains_key("products"));
    }

    #[test]
    fn trace_array_form_keys_by_product_id() {
        let doc = normalize(
            keys::TRACES,
            json!([{"product_id": "p9", "timeline": []}]),
        );
        assert!(doc.as_object().unwrap().contains_key("p9"));
    }

    #[test]
    fn heal_is_idempotent() {
        let kv = KvStore::open_in_memory().unwrap();
        heal(&kv).unwrap();
        let first = kv.get(keys::PRODUCTS).unwrap();
        heal(&kv).unwrap();
        assert_eq!(first, kv.get(keys::PRODUCTS).unwrap());
    }

    #[test]
    fn heal_rewrites_legacy_shape() {
        let kv = KvStore::open_in_memory().unwrap();
        kv.set(keys::FARMERS, &json!({"farmers": [{"farmer_id": "F9"}]}))
            .unwrap();
        heal(&kv).unwrap();
        let doc = kv.get(keys::FARMERS).unwrap().unwrap();
        assert_eq!(doc, json!([{"farmer_id": "F9"}]));
    }
}
