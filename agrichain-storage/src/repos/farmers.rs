//! Farmer repository.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use agrichain_core::envelope::{paginate, ApiResponse, PageRequest};
use agrichain_core::errors::{AgriError, AgriResult};
use agrichain_core::ids::{ids_match, new_id};
use agrichain_core::models::{Farmer, FarmerPatch, NewFarmer, VerificationStatus};
use agrichain_core::policy::OpClass;

use crate::gate::Gate;
use crate::keys;
use crate::kv::KvStore;
use crate::repos::{any_contains_ci, contains_ci, load_items, modify_items};

const DEFAULT_LIMIT: u32 = 10;

/// Conjunctive list filters. `search` matches name, district, and
/// specializations.
#[derive(Debug, Clone, Default)]
pub struct FarmerFilter {
    /// Exact state match, case-insensitive.
    pub state: Option<String>,
    pub verified: Option<VerificationStatus>,
    pub search: Option<String>,
}

impl FarmerFilter {
    fn matches(&self, f: &Farmer) -> bool {
        if let Some(state) = &self.state {
            if !f.location.state.eq_ignore_ascii_case(state) {
                return false;
            }
        }
        if let Some(status) = self.verified {
            if f.verification_status != status {
                return false;
            }
        }
        if let Some(term) = &self.search {
            if !contains_ci(&f.name, term)
                && !contains_ci(&f.location.district, term)
                && !any_contains_ci(&f.specializations, term)
            {
                return false;
            }
        }
        true
    }
}

pub struct FarmerRepo {
    kv: Arc<KvStore>,
    gate: Gate,
}

impl FarmerRepo {
    pub(crate) fn new(kv: Arc<KvStore>, gate: Gate) -> Self {
        Self { kv, gate }
    }

    pub async fn list(
        &self,
        filter: &FarmerFilter,
        page: PageRequest,
    ) -> AgriResult<ApiResponse<Vec<Farmer>>> {
        self.gate.admit(OpClass::Read).await?;
        let items: Vec<Farmer> = load_items(&self.kv, keys::FARMERS)?;
        let filtered: Vec<Farmer> = items.into_iter().filter(|f| filter.matches(f)).collect();
        let (data, info) = paginate(filtered, page.page_or_first(), page.limit_or(DEFAULT_LIMIT));
        Ok(ApiResponse::paged(data, info))
    }

    pub async fn get_by_id(&self, farmer_id: &str) -> AgriResult<ApiResponse<Farmer>> {
        self.gate.admit(OpClass::Read).await?;
        let items: Vec<Farmer> = load_items(&self.kv, keys::FARMERS)?;
        items
            .into_iter()
            .find(|f| ids_match(&f.farmer_id, farmer_id))
            .map(ApiResponse::ok)
            .ok_or_else(|| AgriError::not_found("farmer", farmer_id))
    }

    /// Register a farmer. Verification starts pending; the id is assigned
    /// here rather than at sign-up.
    pub async fn create(&self, input: NewFarmer) -> AgriResult<ApiResponse<Farmer>> {
        self.gate.admit(OpClass::Write).await?;
        let now = Utc::now();
        let farmer = Farmer {
            farmer_id: new_id("farmer"),
            name: input.name,
            contact: input.contact,
            location: input.location,
            verification_status: VerificationStatus::Pending,
            specializations: input.specializations,
            created_at: now,
            updated_at: now,
        };
        let created = modify_items(&self.kv, keys::FARMERS, |items: &mut Vec<Farmer>| {
            items.push(farmer.clone());
            Ok(farmer.clone())
        })?;
        info!(farmer_id = %created.farmer_id, "farmer registered");
        Ok(ApiResponse::with_message(
            created,
            "Farmer registered successfully",
        ))
    }

    pub async fn update(
        &self,
        farmer_id: &str,
        patch: FarmerPatch,
    ) -> AgriResult<ApiResponse<Farmer>> {
        self.gate.admit(OpClass::Write).await?;
        let updated = modify_items(&self.kv, keys::FARMERS, |items: &mut Vec<Farmer>| {
            let farmer = items
                .iter_mut()
                .find(|f| ids_match(&f.farmer_id, farmer_id))
                .ok_or_else(|| AgriError::not_found("farmer", farmer_id))?;
            farmer.apply(patch);
            farmer.updated_at = Utc::now();
            Ok(farmer.clone())
        })?;
        Ok(ApiResponse::with_message(
            updated,
            "Farmer profile updated successfully",
        ))
    }

    pub async fn delete(&self, farmer_id: &str) -> AgriResult<ApiResponse<Farmer>> {
        self.gate.admit(OpClass::Write).await?;
        let removed = modify_items(&self.kv, keys::FARMERS, |items: &mut Vec<Farmer>| {
            let pos = items
                .iter()
                .position(|f| ids_match(&f.farmer_id, farmer_id))
                .ok_or_else(|| AgriError::not_found("farmer", farmer_id))?;
            Ok(items.remove(pos))
        })?;
        info!(farmer_id = %removed.farmer_id, "farmer removed");
        Ok(ApiResponse::with_message(
            removed,
            "Farmer removed successfully",
        ))
    }
}
