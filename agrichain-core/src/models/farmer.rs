//! Farmer profile records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered farmer. `farmer_id` is assigned at verification time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farmer {
    pub farmer_id: String,
    pub name: String,
    pub contact: FarmerContact,
    pub location: Location,
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub specializations: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FarmerContact {
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub district: String,
    pub state: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

/// Input for registering a farmer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFarmer {
    pub name: String,
    #[serde(default)]
    pub contact: FarmerContact,
    pub location: Location,
    #[serde(default)]
    pub specializations: Vec<String>,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmerPatch {
    pub name: Option<String>,
    pub contact: Option<FarmerContact>,
    pub location: Option<Location>,
    pub verification_status: Option<VerificationStatus>,
    pub specializations: Option<Vec<String>>,
}

impl Farmer {
    /// Merge a patch over this record. Does not touch timestamps.
    pub fn apply(&mut self, patch: FarmerPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.contact {
            self.contact = v;
        }
        if let Some(v) = patch.location {
            self.location = v;
        }
        if let Some(v) = patch.verification_status {
            self.verification_status = v;
        }
        if let Some(v) = patch.specializations {
            self.specializations = v;
        }
    }
}
