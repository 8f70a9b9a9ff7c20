//! Session-scoped state: the current-user pointer and per-farmer derived
//! collections (scheme claims, locally-posted product ids). These are keyed
//! by farmer id and live outside the seeded collections, so they are never
//! healed from fixtures — missing just means empty.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use agrichain_core::errors::AgriResult;
use agrichain_core::ids::new_id;
use agrichain_core::models::UserRef;

use crate::keys;
use crate::kv::KvStore;

/// A scheme claim filed by one farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeClaim {
    pub claim_id: String,
    pub scheme_id: String,
    pub status: ClaimStatus,
    pub filed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    Submitted,
    Approved,
    Rejected,
}

pub struct SessionStore {
    kv: Arc<KvStore>,
}

impl SessionStore {
    pub(crate) fn new(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    // ─── Current user ────────────────────────────────────────────────────

    pub fn current_user(&self) -> AgriResult<Option<UserRef>> {
        Ok(self
            .kv
            .get(keys::CURRENT_USER)?
            .and_then(|doc| serde_json::from_value(doc).ok()))
    }

    pub fn set_current_user(&self, user: &UserRef) -> AgriResult<()> {
        info!(id = %user.id, "current user set");
        self.kv.set(keys::CURRENT_USER, &serde_json::to_value(user)?)
    }

    pub fn clear_current_user(&self) -> AgriResult<()> {
        self.kv.remove(keys::CURRENT_USER)
    }

    // ─── Per-farmer derived collections ──────────────────────────────────

    /// Claims filed by one farmer, oldest first. Missing key = no claims.
    pub fn claims_for(&self, farmer_id: &str) -> AgriResult<Vec<SchemeClaim>> {
        self.list(&keys::farmer_claims(farmer_id))
    }

    /// File a claim against a scheme for one farmer.
    pub fn record_claim(&self, farmer_id: &str, scheme_id: &str) -> AgriResult<SchemeClaim> {
        let claim = SchemeClaim {
            claim_id: new_id("claim"),
            scheme_id: scheme_id.to_string(),
            status: ClaimStatus::Submitted,
            filed_at: Utc::now(),
        };
        self.append(&keys::farmer_claims(farmer_id), &claim)?;
        info!(farmer_id, scheme_id, claim_id = %claim.claim_id, "scheme claim filed");
        Ok(claim)
    }

    /// Product ids this farmer has posted from this session.
    pub fn posted_products_for(&self, farmer_id: &str) -> AgriResult<Vec<String>> {
        self.list(&keys::farmer_products(farmer_id))
    }

    pub fn record_posted_product(&self, farmer_id: &str, product_id: &str) -> AgriResult<()> {
        self.append(&keys::farmer_products(farmer_id), &product_id.to_string())
    }

    fn list<T: serde::de::DeserializeOwned>(&self, key: &str) -> AgriResult<Vec<T>> {
        Ok(self
            .kv
            .get(key)?
            .and_then(|doc| serde_json::from_value(doc).ok())
            .unwrap_or_default())
    }

    fn append<T: Serialize + serde::de::DeserializeOwned>(
        &self,
        key: &str,
        value: &T,
    ) -> AgriResult<()> {
        let encoded = serde_json::to_value(value)?;
        self.kv.modify(key, |doc| {
            let mut items = match doc {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            items.push(encoded);
            Ok((Value::Array(items), ()))
        })
    }
}
