//! Scheme repository.

use std::sync::Arc;

use tracing::info;

use agrichain_core::envelope::{paginate, ApiResponse, PageRequest};
use agrichain_core::errors::{AgriError, AgriResult};
use agrichain_core::ids::{ids_match, new_id};
use agrichain_core::models::{NewScheme, Scheme, SchemePatch, SchemeStatus};
use agrichain_core::policy::OpClass;

use crate::gate::Gate;
use crate::keys;
use crate::kv::KvStore;
use crate::repos::{any_contains_ci, contains_ci, load_items, modify_items};

const DEFAULT_LIMIT: u32 = 10;

/// Conjunctive list filters. `search` matches title, description, and tags.
#[derive(Debug, Clone, Default)]
pub struct SchemeFilter {
    /// Exact category match, case-insensitive.
    pub category: Option<String>,
    pub status: Option<SchemeStatus>,
    pub search: Option<String>,
}

impl SchemeFilter {
    fn matches(&self, s: &Scheme) -> bool {
        if let Some(category) = &self.category {
            if !s.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if s.status != status {
                return false;
            }
        }
        if let Some(term) = &self.search {
            if !contains_ci(&s.title, term)
                && !contains_ci(&s.description, term)
                && !any_contains_ci(&s.tags, term)
            {
                return false;
            }
        }
        true
    }
}

pub struct SchemeRepo {
    kv: Arc<KvStore>,
    gate: Gate,
}

impl SchemeRepo {
    pub(crate) fn new(kv: Arc<KvStore>, gate: Gate) -> Self {
        Self { kv, gate }
    }

    pub async fn list(
        &self,
        filter: &SchemeFilter,
        page: PageRequest,
    ) -> AgriResult<ApiResponse<Vec<Scheme>>> {
        self.gate.admit(OpClass::Read).await?;
        let items: Vec<Scheme> = load_items(&self.kv, keys::SCHEMES)?;
        let filtered: Vec<Scheme> = items.into_iter().filter(|s| filter.matches(s)).collect();
        let (data, info) = paginate(filtered, page.page_or_first(), page.limit_or(DEFAULT_LIMIT));
        Ok(ApiResponse::paged(data, info))
    }

    pub async fn get_by_id(&self, id: &str) -> AgriResult<ApiResponse<Scheme>> {
        self.gate.admit(OpClass::Read).await?;
        let items: Vec<Scheme> = load_items(&self.kv, keys::SCHEMES)?;
        items
            .into_iter()
            .find(|s| ids_match(&s.id, id))
            .map(ApiResponse::ok)
            .ok_or_else(|| AgriError::not_found("scheme", id))
    }

    pub async fn create(&self, input: NewScheme) -> AgriResult<ApiResponse<Scheme>> {
        self.gate.admit(OpClass::Write).await?;
        let scheme = Scheme {
            id: new_id("sch"),
            title: input.title,
            description: input.description,
            category: input.category,
            eligibility: input.eligibility,
            benefit_amount: input.benefit_amount,
            deadline: input.deadline,
            tags: input.tags,
            status: SchemeStatus::Active,
        };
        let created = modify_items(&self.kv, keys::SCHEMES, |items: &mut Vec<Scheme>| {
            items.push(scheme.clone());
            Ok(scheme.clone())
        })?;
        info!(id = %created.id, "scheme published");
        Ok(ApiResponse::with_message(
            created,
            "Scheme created successfully",
        ))
    }

    pub async fn update(&self, id: &str, patch: SchemePatch) -> AgriResult<ApiResponse<Scheme>> {
        self.gate.admit(OpClass::Write).await?;
        let updated = modify_items(&self.kv, keys::SCHEMES, |items: &mut Vec<Scheme>| {
            let scheme = items
                .iter_mut()
                .find(|s| ids_match(&s.id, id))
                .ok_or_else(|| AgriError::not_found("scheme", id))?;
            scheme.apply(patch);
            Ok(scheme.clone())
        })?;
        Ok(ApiResponse::with_message(
            updated,
            "Scheme updated successfully",
        ))
    }

    pub async fn delete(&self, id: &str) -> AgriResult<ApiResponse<Scheme>> {
        self.gate.admit(OpClass::Write).await?;
        let removed = modify_items(&self.kv, keys::SCHEMES, |items: &mut Vec<Scheme>| {
            let pos = items
                .iter()
                .position(|s| ids_match(&s.id, id))
                .ok_or_else(|| AgriError::not_found("scheme", id))?;
            Ok(items.remove(pos))
        })?;
        Ok(ApiResponse::with_message(
            removed,
            "Scheme deleted successfully",
        ))
    }
}
