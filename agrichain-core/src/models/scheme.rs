//! Government/benefit scheme records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A subsidy or benefit scheme farmers can claim against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Eligibility tier label, e.g. "smallholder", "all".
    pub eligibility: String,
    pub benefit_amount: f64,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: SchemeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemeStatus {
    #[default]
    Active,
    Closed,
}

/// Input for publishing a scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheme {
    pub title: String,
    pub description: String,
    pub category: String,
    pub eligibility: String,
    pub benefit_amount: f64,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub eligibility: Option<String>,
    pub benefit_amount: Option<f64>,
    pub deadline: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
    pub status: Option<SchemeStatus>,
}

impl Scheme {
    /// Merge a patch over this record.
    pub fn apply(&mut self, patch: SchemePatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.eligibility {
            self.eligibility = v;
        }
        if let Some(v) = patch.benefit_amount {
            self.benefit_amount = v;
        }
        if let Some(v) = patch.deadline {
            self.deadline = v;
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
    }
}
