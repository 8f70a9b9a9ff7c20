//! Dashboard stats aggregation.
//!
//! Pure read-side scans over the Products and Transactions collections —
//! no caching, no incremental materialization. Every call rescans; the
//! collections are demo-scale.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use agrichain_core::envelope::ApiResponse;
use agrichain_core::errors::AgriResult;
use agrichain_core::models::{Product, Role, Transaction, TxStatus};
use agrichain_core::policy::OpClass;

use crate::gate::Gate;
use crate::keys;
use crate::kv::KvStore;
use crate::repos::{load_items, load_trace_map};

/// How many recent orders a consumer dashboard shows.
const RECENT_ORDERS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DashboardStats {
    Farmer(FarmerStats),
    Consumer(ConsumerStats),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerStats {
    pub total_products: usize,
    pub total_orders: usize,
    pub pending_orders: usize,
    /// Sum of amounts over completed transactions only.
    pub total_revenue: f64,
    /// One entry per calendar month with activity, ascending by month.
    pub monthly_stats: Vec<MonthlyStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStat {
    /// `YYYY-MM`.
    pub month: String,
    pub revenue: f64,
    pub orders: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerStats {
    pub total_purchases: usize,
    /// Sum of amounts over completed transactions only.
    pub total_spent: f64,
    /// Most recent orders, newest first.
    pub recent_orders: Vec<Transaction>,
}

/// Per-collection record counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataStats {
    pub products: usize,
    pub farmers: usize,
    pub traces: usize,
    pub transactions: usize,
    pub schemes: usize,
    pub last_updated: chrono::DateTime<Utc>,
}

pub struct StatsService {
    kv: Arc<KvStore>,
    gate: Gate,
}

impl StatsService {
    pub(crate) fn new(kv: Arc<KvStore>, gate: Gate) -> Self {
        Self { kv, gate }
    }

    /// Dashboard summary for one actor.
    pub async fn dashboard_stats(
        &self,
        actor_id: &str,
        role: Role,
    ) -> AgriResult<ApiResponse<DashboardStats>> {
        self.gate.admit(OpClass::Aggregate).await?;
        let stats = match role {
            Role::Farmer => DashboardStats::Farmer(self.farmer_stats(actor_id)?),
            Role::Consumer => DashboardStats::Consumer(self.consumer_stats(actor_id)?),
        };
        Ok(ApiResponse::ok(stats))
    }

    fn farmer_stats(&self, farmer_id: &str) -> AgriResult<FarmerStats> {
        let products: Vec<Product> = load_items(&self.kv, keys::PRODUCTS)?;
        let total_products = products.iter().filter(|p| p.farmer_id == farmer_id).count();

        let transactions: Vec<Transaction> = load_items(&self.kv, keys::TRANSACTIONS)?;
        let mine: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.farmer_id == farmer_id)
            .collect();

        let total_revenue = mine
            .iter()
            .filter(|t| t.status == TxStatus::Completed)
            .map(|t| t.amount)
            .sum();
        let pending_orders = mine
            .iter()
            .filter(|t| t.status == TxStatus::Pending)
            .count();

        // All transactions count toward the monthly rollup regardless of
        // status; only completed ones count toward revenue totals.
        let mut monthly: BTreeMap<String, MonthlyStat> = BTreeMap::new();
        for t in &mine {
            let entry = monthly
                .entry(t.month_key())
                .or_insert_with(|| MonthlyStat {
                    month: t.month_key(),
                    revenue: 0.0,
                    orders: 0,
                });
            entry.revenue += t.amount;
            entry.orders += 1;
        }

        Ok(FarmerStats {
            total_products,
            total_orders: mine.len(),
            pending_orders,
            total_revenue,
            monthly_stats: monthly.into_values().collect(),
        })
    }

    fn consumer_stats(&self, buyer_id: &str) -> AgriResult<ConsumerStats> {
        let transactions: Vec<Transaction> = load_items(&self.kv, keys::TRANSACTIONS)?;
        let mut mine: Vec<Transaction> = transactions
            .into_iter()
            .filter(|t| t.buyer_id == buyer_id)
            .collect();
        mine.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));

        let total_spent = mine
            .iter()
            .filter(|t| t.status == TxStatus::Completed)
            .map(|t| t.amount)
            .sum();
        let total_purchases = mine.len();
        mine.truncate(RECENT_ORDERS);

        Ok(ConsumerStats {
            total_purchases,
            total_spent,
            recent_orders: mine,
        })
    }

    /// Record counts across every collection.
    pub async fn data_stats(&self) -> AgriResult<ApiResponse<DataStats>> {
        self.gate.admit(OpClass::Read).await?;
        let products: Vec<serde_json::Value> = load_items(&self.kv, keys::PRODUCTS)?;
        let farmers: Vec<serde_json::Value> = load_items(&self.kv, keys::FARMERS)?;
        let transactions: Vec<serde_json::Value> = load_items(&self.kv, keys::TRANSACTIONS)?;
        let schemes: Vec<serde_json::Value> = load_items(&self.kv, keys::SCHEMES)?;
        let traces = load_trace_map(&self.kv, keys::TRACES)?;
        Ok(ApiResponse::ok(DataStats {
            products: products.len(),
            farmers: farmers.len(),
            traces: traces.len(),
            transactions: transactions.len(),
            schemes: schemes.len(),
            last_updated: Utc::now(),
        }))
    }
}
