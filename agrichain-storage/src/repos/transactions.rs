//! Transaction repository. Lists are sorted newest-first by transaction
//! date before pagination; the default page size is 20.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use agrichain_core::envelope::{paginate, ApiResponse, PageRequest};
use agrichain_core::errors::{AgriError, AgriResult};
use agrichain_core::ids::{ids_match, ledger_hash, new_id};
use agrichain_core::models::{NewTransaction, Transaction, TransactionPatch, TxStatus};
use agrichain_core::policy::OpClass;

use crate::gate::Gate;
use crate::keys;
use crate::kv::KvStore;
use crate::repos::{load_items, modify_items};

const DEFAULT_LIMIT: u32 = 20;

/// Conjunctive equality filters.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub farmer_id: Option<String>,
    pub buyer_id: Option<String>,
    pub product_id: Option<String>,
    pub status: Option<TxStatus>,
}

impl TransactionFilter {
    fn matches(&self, t: &Transaction) -> bool {
        if let Some(farmer_id) = &self.farmer_id {
            if &t.farmer_id != farmer_id {
                return false;
            }
        }
        if let Some(buyer_id) = &self.buyer_id {
            if &t.buyer_id != buyer_id {
                return false;
            }
        }
        if let Some(product_id) = &self.product_id {
            if &t.product_id != product_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if t.status != status {
                return false;
            }
        }
        true
    }
}

pub struct TransactionRepo {
    kv: Arc<KvStore>,
    gate: Gate,
}

impl TransactionRepo {
    pub(crate) fn new(kv: Arc<KvStore>, gate: Gate) -> Self {
        Self { kv, gate }
    }

    pub async fn list(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> AgriResult<ApiResponse<Vec<Transaction>>> {
        self.gate.admit(OpClass::Read).await?;
        let items: Vec<Transaction> = load_items(&self.kv, keys::TRANSACTIONS)?;
        let mut filtered: Vec<Transaction> =
            items.into_iter().filter(|t| filter.matches(t)).collect();
        filtered.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        let (data, info) = paginate(filtered, page.page_or_first(), page.limit_or(DEFAULT_LIMIT));
        Ok(ApiResponse::paged(data, info))
    }

    pub async fn get_by_id(&self, id: &str) -> AgriResult<ApiResponse<Transaction>> {
        self.gate.admit(OpClass::Read).await?;
        let items: Vec<Transaction> = load_items(&self.kv, keys::TRANSACTIONS)?;
        items
            .into_iter()
            .find(|t| ids_match(&t.transaction_id, id))
            .map(ApiResponse::ok)
            .ok_or_else(|| AgriError::not_found("transaction", id))
    }

    pub async fn create(&self, input: NewTransaction) -> AgriResult<ApiResponse<Transaction>> {
        self.gate.admit(OpClass::Write).await?;
        let tx = build_transaction(input);
        let created = modify_items(&self.kv, keys::TRANSACTIONS, |items: &mut Vec<Transaction>| {
            items.push(tx.clone());
            Ok(tx.clone())
        })?;
        info!(transaction_id = %created.transaction_id, amount = created.amount, "transaction recorded");
        Ok(ApiResponse::with_message(
            created,
            "Transaction created successfully",
        ))
    }

    pub async fn update(
        &self,
        id: &str,
        patch: TransactionPatch,
    ) -> AgriResult<ApiResponse<Transaction>> {
        self.gate.admit(OpClass::Write).await?;
        let updated = modify_items(&self.kv, keys::TRANSACTIONS, |items: &mut Vec<Transaction>| {
            let tx = items
                .iter_mut()
                .find(|t| ids_match(&t.transaction_id, id))
                .ok_or_else(|| AgriError::not_found("transaction", id))?;
            tx.apply(patch);
            Ok(tx.clone())
        })?;
        Ok(ApiResponse::with_message(
            updated,
            "Transaction updated successfully",
        ))
    }

    pub async fn delete(&self, id: &str) -> AgriResult<ApiResponse<Transaction>> {
        self.gate.admit(OpClass::Write).await?;
        let removed = modify_items(&self.kv, keys::TRANSACTIONS, |items: &mut Vec<Transaction>| {
            let pos = items
                .iter()
                .position(|t| ids_match(&t.transaction_id, id))
                .ok_or_else(|| AgriError::not_found("transaction", id))?;
            Ok(items.remove(pos))
        })?;
        Ok(ApiResponse::with_message(
            removed,
            "Transaction deleted successfully",
        ))
    }
}

/// Stamp id, date, ledger hash, and default status onto the input.
pub(crate) fn build_transaction(input: NewTransaction) -> Transaction {
    let now = Utc::now();
    Transaction {
        transaction_id: new_id("tx"),
        farmer_id: input.farmer_id,
        buyer_id: input.buyer_id,
        product_id: input.product_id,
        quantity: input.quantity,
        amount: input.amount,
        status: input.status.unwrap_or_default(),
        transaction_date: now,
        blockchain_hash: Some(ledger_hash()),
        created_at: now,
    }
}
