//! Supply-chain trace timelines, keyed by product id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The full supply-chain trace for one product: an ordered timeline of
/// steps from farm to shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub timeline: Vec<TraceStep>,
    pub updated_at: DateTime<Utc>,
}

/// One step of a trace timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_id: String,
    /// Stage label, e.g. "harvest", "transport", "retail".
    pub stage: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<LedgerRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

/// Simulated distributed-ledger reference attached to a trace step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRef {
    pub hash: String,
    pub block_number: u64,
    pub confirmations: u32,
}

/// Input for appending a step. Step id, timestamp, and ledger hash are
/// assigned by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTraceStep {
    pub stage: String,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub status: StepStatus,
}
