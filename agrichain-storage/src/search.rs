//! Cross-collection free-text search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use agrichain_core::envelope::ApiResponse;
use agrichain_core::errors::AgriResult;
use agrichain_core::models::{Farmer, Product, Scheme};
use agrichain_core::policy::OpClass;

use crate::gate::Gate;
use crate::keys;
use crate::kv::KvStore;
use crate::repos::{any_contains_ci, contains_ci, load_items};

/// Per-collection result caps.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub products: usize,
    pub farmers: usize,
    pub schemes: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            products: 5,
            farmers: 5,
            schemes: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub products: Vec<Product>,
    pub farmers: Vec<Farmer>,
    pub schemes: Vec<Scheme>,
    pub query: String,
    pub total_results: usize,
}

pub struct SearchService {
    kv: Arc<KvStore>,
    gate: Gate,
}

impl SearchService {
    pub(crate) fn new(kv: Arc<KvStore>, gate: Gate) -> Self {
        Self { kv, gate }
    }

    /// Case-insensitive substring search across products, farmers, and
    /// schemes, each capped independently.
    pub async fn search_all(
        &self,
        query: &str,
        limits: SearchLimits,
    ) -> AgriResult<ApiResponse<SearchResults>> {
        self.gate.admit(OpClass::Aggregate).await?;

        let products: Vec<Product> = load_items(&self.kv, keys::PRODUCTS)?;
        let products: Vec<Product> = products
            .into_iter()
            .filter(|p| {
                contains_ci(&p.name, query)
                    || contains_ci(&p.description, query)
                    || contains_ci(&p.variety, query)
            })
            .take(limits.products)
            .collect();

        let farmers: Vec<Farmer> = load_items(&self.kv, keys::FARMERS)?;
        let farmers: Vec<Farmer> = farmers
            .into_iter()
            .filter(|f| {
                contains_ci(&f.name, query)
                    || contains_ci(&f.location.district, query)
                    || any_contains_ci(&f.specializations, query)
            })
            .take(limits.farmers)
            .collect();

        let schemes: Vec<Scheme> = load_items(&self.kv, keys::SCHEMES)?;
        let schemes: Vec<Scheme> = schemes
            .into_iter()
            .filter(|s| {
                contains_ci(&s.title, query)
                    || contains_ci(&s.description, query)
                    || any_contains_ci(&s.tags, query)
            })
            .take(limits.schemes)
            .collect();

        let total_results = products.len() + farmers.len() + schemes.len();
        Ok(ApiResponse::ok(SearchResults {
            products,
            farmers,
            schemes,
            query: query.to_string(),
            total_results,
        }))
    }
}
