//! Product listing records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A marketplace product listing, owned by a farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub variety: String,
    /// Currency-agnostic decimal unit price.
    pub price: f64,
    /// Weight/volume/piece unit label (e.g. "kg", "litre", "dozen").
    pub unit: String,
    /// Quantity available. Zero drops the product from available listings.
    pub quantity: u32,
    pub farmer_id: String,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Sold,
    Expired,
}

/// Input for creating a product. Id, timestamps, and status are assigned by
/// the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub description: String,
    pub variety: String,
    pub price: f64,
    pub unit: String,
    pub quantity: u32,
    pub farmer_id: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Partial update. Only present fields are merged over the stored record;
/// `updated_at` is restamped by the repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub variety: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub quantity: Option<u32>,
    pub status: Option<ProductStatus>,
    pub image: Option<String>,
    pub certifications: Option<Vec<String>>,
}

impl Product {
    /// Merge a patch over this record. Does not touch timestamps.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.variety {
            self.variety = v;
        }
        if let Some(v) = patch.price {
            self.price = v;
        }
        if let Some(v) = patch.unit {
            self.unit = v;
        }
        if let Some(v) = patch.quantity {
            self.quantity = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.image {
            self.image = Some(v);
        }
        if let Some(v) = patch.certifications {
            self.certifications = v;
        }
    }

    /// Listed as purchasable: active status with stock remaining.
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Active && self.quantity > 0
    }
}
