//! Trace repository — the keyed-lookup variant.
//!
//! Traces live in one document: a plain object map from product id to the
//! full timeline. No pagination; `get` and `append_step` only.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use agrichain_core::envelope::ApiResponse;
use agrichain_core::errors::{AgriError, AgriResult};
use agrichain_core::ids::{ids_match, ledger_hash, new_id};
use agrichain_core::models::{LedgerRef, NewTraceStep, Trace, TraceStep};
use agrichain_core::policy::OpClass;

use crate::gate::Gate;
use crate::keys;
use crate::kv::KvStore;
use crate::repos::load_trace_map;
use crate::seeds;

pub struct TraceRepo {
    kv: Arc<KvStore>,
    gate: Gate,
}

impl TraceRepo {
    pub(crate) fn new(kv: Arc<KvStore>, gate: Gate) -> Self {
        Self { kv, gate }
    }

    /// Full timeline for a product, or NotFound.
    pub async fn get(&self, product_id: &str) -> AgriResult<ApiResponse<Trace>> {
        self.gate.admit(OpClass::Read).await?;
        let map = load_trace_map(&self.kv, keys::TRACES)?;
        let entry = map
            .iter()
            .find(|(key, _)| ids_match(key, product_id))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| AgriError::not_found("trace", product_id))?;
        let trace: Trace = serde_json::from_value(entry)?;
        Ok(ApiResponse::ok(trace))
    }

    /// Append a step stamped with a fresh step id, the current timestamp,
    /// and a synthetic ledger reference, then persist the map.
    pub async fn append_step(
        &self,
        product_id: &str,
        input: NewTraceStep,
    ) -> AgriResult<ApiResponse<Trace>> {
        self.gate.admit(OpClass::Write).await?;
        let updated = self.kv.modify(keys::TRACES, |doc| {
            let doc = match doc {
                Some(doc) if doc.is_object() => doc,
                _ => seeds::seed_document(keys::TRACES),
            };
            let Value::Object(mut map) = doc else {
                return Err(AgriError::storage("trace document is not an object"));
            };
            let key = map
                .keys()
                .find(|key| ids_match(key, product_id))
                .cloned()
                .ok_or_else(|| AgriError::not_found("trace", product_id))?;
            let mut trace: Trace = serde_json::from_value(map[&key].clone())?;

            let now = Utc::now();
            trace.timeline.push(TraceStep {
                step_id: new_id("step"),
                stage: input.stage,
                title: input.title,
                description: input.description,
                location: input.location,
                timestamp: now,
                status: input.status,
                blockchain: Some(LedgerRef {
                    hash: ledger_hash(),
                    block_number: now.timestamp() as u64,
                    confirmations: 0,
                }),
            });
            trace.updated_at = now;

            map.insert(key, serde_json::to_value(&trace)?);
            Ok((Value::Object(map), trace))
        })?;
        info!(product_id, steps = updated.timeline.len(), "trace step appended");
        Ok(ApiResponse::with_message(
            updated,
            "Trace step added successfully",
        ))
    }
}
