//! Purchase transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A purchase of a product from a farmer by a buyer.
/// Logically references an existing Product and Farmer at creation time;
/// the data layer does not enforce the foreign keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub farmer_id: String,
    pub buyer_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub amount: f64,
    pub status: TxStatus,
    pub transaction_date: DateTime<Utc>,
    /// Opaque ledger reference; no cryptographic meaning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// Input for recording a transaction. Id, date, ledger hash, and timestamps
/// are assigned by the repository; status defaults to pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub farmer_id: String,
    pub buyer_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub amount: f64,
    #[serde(default)]
    pub status: Option<TxStatus>,
}

/// Partial update (status transitions, mostly).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionPatch {
    pub quantity: Option<u32>,
    pub amount: Option<f64>,
    pub status: Option<TxStatus>,
}

impl Transaction {
    /// Merge a patch over this record.
    pub fn apply(&mut self, patch: TransactionPatch) {
        if let Some(v) = patch.quantity {
            self.quantity = v;
        }
        if let Some(v) = patch.amount {
            self.amount = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
    }

    /// Calendar-month bucket key (`YYYY-MM`) for monthly rollups.
    pub fn month_key(&self) -> String {
        self.transaction_date.format("%Y-%m").to_string()
    }
}
