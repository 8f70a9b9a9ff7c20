//! Entity repositories over the key-value document store.
//!
//! Each repository reads its whole collection document, filters/sorts in
//! memory, and writes the canonical bare-array document back. Reads that
//! find the key missing or malformed reseed from the fixture before
//! returning (self-healing). Mutations run inside `KvStore::modify`, which
//! holds the connection lock across the whole read-modify-write cycle.

pub mod farmers;
pub mod products;
pub mod schemes;
pub mod traces;
pub mod transactions;

pub use farmers::{FarmerFilter, FarmerRepo};
pub use products::{ProductFilter, ProductRepo};
pub use schemes::{SchemeFilter, SchemeRepo};
pub use traces::TraceRepo;
pub use transactions::{TransactionFilter, TransactionRepo};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use agrichain_core::errors::AgriResult;

use crate::kv::KvStore;
use crate::seeds;

/// Load a collection as typed records, reseeding from the fixture when the
/// stored document is missing or not an array.
pub(crate) fn load_items<T: DeserializeOwned>(kv: &KvStore, key: &str) -> AgriResult<Vec<T>> {
    let doc = match kv.get(key)? {
        Some(doc) if doc.is_array() => doc,
        _ => {
            warn!(key, "collection missing or malformed, reseeding");
            let seed = seeds::seed_document(key);
            kv.set(key, &seed)?;
            seed
        }
    };
    Ok(serde_json::from_value(doc)?)
}

/// Read-modify-write a collection as typed records under one lock. The
/// closure's error aborts the write. A missing or malformed document is
/// replaced by the fixture seed before the closure runs.
pub(crate) fn modify_items<T, R>(
    kv: &KvStore,
    key: &str,
    f: impl FnOnce(&mut Vec<T>) -> AgriResult<R>,
) -> AgriResult<R>
where
    T: Serialize + DeserializeOwned,
{
    kv.modify(key, |doc| {
        let doc = match doc {
            Some(doc) if doc.is_array() => doc,
            _ => seeds::seed_document(key),
        };
        let mut items: Vec<T> = serde_json::from_value(doc)?;
        let out = f(&mut items)?;
        Ok((serde_json::to_value(&items)?, out))
    })
}

/// Case-insensitive substring match, the free-text search primitive.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Same, over a list of strings (tags, specializations).
pub(crate) fn any_contains_ci(haystacks: &[String], needle: &str) -> bool {
    haystacks.iter().any(|h| contains_ci(h, needle))
}

/// Reseed-tolerant trace-map load (object keyed by product id).
pub(crate) fn load_trace_map(kv: &KvStore, key: &str) -> AgriResult<serde_json::Map<String, Value>> {
    let doc = match kv.get(key)? {
        Some(doc) if doc.is_object() => doc,
        _ => {
            warn!(key, "trace map missing or malformed, reseeding");
            let seed = seeds::seed_document(key);
            kv.set(key, &seed)?;
            seed
        }
    };
    match doc {
        Value::Object(map) => Ok(map),
        _ => Ok(serde_json::Map::new()),
    }
}
