//! Product repository: list/get/create/update/delete over the products
//! collection.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use agrichain_core::envelope::{paginate, ApiResponse, PageRequest};
use agrichain_core::errors::{AgriError, AgriResult};
use agrichain_core::ids::{ids_match, new_id};
use agrichain_core::models::{NewProduct, Product, ProductPatch, ProductStatus};
use agrichain_core::policy::OpClass;

use crate::gate::Gate;
use crate::keys;
use crate::kv::KvStore;
use crate::repos::{contains_ci, load_items, modify_items};

const DEFAULT_LIMIT: u32 = 10;

/// Conjunctive list filters. `search` is a case-insensitive substring match
/// over name, description, and variety.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub farmer_id: Option<String>,
    pub search: Option<String>,
    /// Only active listings with stock remaining.
    pub available_only: bool,
}

impl ProductFilter {
    fn matches(&self, p: &Product) -> bool {
        if let Some(category) = &self.category {
            if !contains_ci(&p.category, category) {
                return false;
            }
        }
        if let Some(farmer_id) = &self.farmer_id {
            if &p.farmer_id != farmer_id {
                return false;
            }
        }
        if let Some(term) = &self.search {
            if !contains_ci(&p.name, term)
                && !contains_ci(&p.description, term)
                && !contains_ci(&p.variety, term)
            {
                return false;
            }
        }
        if self.available_only && !p.is_available() {
            return false;
        }
        true
    }
}

pub struct ProductRepo {
    kv: Arc<KvStore>,
    gate: Gate,
}

impl ProductRepo {
    pub(crate) fn new(kv: Arc<KvStore>, gate: Gate) -> Self {
        Self { kv, gate }
    }

    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> AgriResult<ApiResponse<Vec<Product>>> {
        self.gate.admit(OpClass::Read).await?;
        let items: Vec<Product> = load_items(&self.kv, keys::PRODUCTS)?;
        let filtered: Vec<Product> = items.into_iter().filter(|p| filter.matches(p)).collect();
        let (data, info) = paginate(filtered, page.page_or_first(), page.limit_or(DEFAULT_LIMIT));
        Ok(ApiResponse::paged(data, info))
    }

    pub async fn get_by_id(&self, id: &str) -> AgriResult<ApiResponse<Product>> {
        self.gate.admit(OpClass::Read).await?;
        let items: Vec<Product> = load_items(&self.kv, keys::PRODUCTS)?;
        items
            .into_iter()
            .find(|p| ids_match(&p.id, id))
            .map(ApiResponse::ok)
            .ok_or_else(|| AgriError::not_found("product", id))
    }

    pub async fn create(&self, input: NewProduct) -> AgriResult<ApiResponse<Product>> {
        self.gate.admit(OpClass::Write).await?;
        let now = Utc::now();
        let product = Product {
            id: new_id("prod"),
            name: input.name,
            category: input.category,
            description: input.description,
            variety: input.variety,
            price: input.price,
            unit: input.unit,
            quantity: input.quantity,
            farmer_id: input.farmer_id,
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
            image: input.image,
            certifications: input.certifications,
        };
        let created = modify_items(&self.kv, keys::PRODUCTS, |items: &mut Vec<Product>| {
            items.push(product.clone());
            Ok(product.clone())
        })?;
        info!(id = %created.id, "product created");
        Ok(ApiResponse::with_message(
            created,
            "Product created successfully",
        ))
    }

    pub async fn update(&self, id: &str, patch: ProductPatch) -> AgriResult<ApiResponse<Product>> {
        self.gate.admit(OpClass::Write).await?;
        let updated = modify_items(&self.kv, keys::PRODUCTS, |items: &mut Vec<Product>| {
            let product = items
                .iter_mut()
                .find(|p| ids_match(&p.id, id))
                .ok_or_else(|| AgriError::not_found("product", id))?;
            product.apply(patch);
            product.updated_at = Utc::now();
            Ok(product.clone())
        })?;
        Ok(ApiResponse::with_message(
            updated,
            "Product updated successfully",
        ))
    }

    pub async fn delete(&self, id: &str) -> AgriResult<ApiResponse<Product>> {
        self.gate.admit(OpClass::Write).await?;
        let removed = modify_items(&self.kv, keys::PRODUCTS, |items: &mut Vec<Product>| {
            let pos = items
                .iter()
                .position(|p| ids_match(&p.id, id))
                .ok_or_else(|| AgriError::not_found("product", id))?;
            Ok(items.remove(pos))
        })?;
        info!(id = %removed.id, "product deleted");
        Ok(ApiResponse::with_message(
            removed,
            "Product deleted successfully",
        ))
    }
}
