//! `MarketEngine` — the data-layer facade.
//!
//! Owns the `KvStore` and the latency/fault gate, runs the self-healing
//! pass at open, and hands out repository handles. Explicit initialization
//! with the store handle threaded through constructors — no module-level
//! globals. This is the single owner of the store; nothing outside this
//! crate should touch a raw document.

use std::sync::Arc;

use tracing::info;

use agrichain_core::config::EngineConfig;
use agrichain_core::envelope::ApiResponse;
use agrichain_core::errors::{AgriError, AgriResult};
use agrichain_core::models::{NewTransaction, Product, Transaction};
use agrichain_core::policy::{
    FaultPolicy, LatencyPolicy, NoFaults, NoLatency, OpClass, SimulatedFaults, SimulatedLatency,
};

use crate::cart::CartStore;
use crate::gate::Gate;
use crate::keys;
use crate::kv::KvStore;
use crate::repos::{
    load_items, modify_items, transactions::build_transaction, FarmerRepo, ProductRepo,
    SchemeRepo, TraceRepo, TransactionRepo,
};
use crate::search::SearchService;
use crate::seeds;
use crate::session::SessionStore;
use crate::stats::StatsService;

pub struct MarketEngine {
    kv: Arc<KvStore>,
    gate: Gate,
}

impl MarketEngine {
    /// Open the engine per config: file-backed or in-memory store, healing
    /// pass, and policies built from the latency/fault settings.
    pub fn open(config: &EngineConfig) -> AgriResult<Self> {
        let kv = match &config.db_path {
            Some(path) => KvStore::open(path)?,
            None => KvStore::open_in_memory()?,
        };
        let latency: Arc<dyn LatencyPolicy> = if config.latency.enabled {
            Arc::new(SimulatedLatency {
                read_ms: config.latency.read_ms,
                write_ms: config.latency.write_ms,
                aggregate_ms: config.latency.aggregate_ms,
            })
        } else {
            Arc::new(NoLatency)
        };
        let faults: Arc<dyn FaultPolicy> = if config.faults.enabled {
            Arc::new(SimulatedFaults {
                probability: config.faults.probability,
            })
        } else {
            Arc::new(NoFaults)
        };
        Self::with_policies(kv, latency, faults)
    }

    /// In-memory engine with latency and faults disabled (tests, demos).
    pub fn open_in_memory() -> AgriResult<Self> {
        Self::open(&EngineConfig::quiet())
    }

    /// Custom policy injection over an already-opened store.
    pub fn with_policies(
        kv: KvStore,
        latency: Arc<dyn LatencyPolicy>,
        faults: Arc<dyn FaultPolicy>,
    ) -> AgriResult<Self> {
        let kv = Arc::new(kv);
        seeds::heal(&kv)?;
        info!(path = ?kv.path(), "market engine opened");
        Ok(Self {
            gate: Gate::new(latency, faults),
            kv,
        })
    }

    /// Raw document access — for maintenance and tests.
    /// Prefer the repository handles where possible.
    pub fn store(&self) -> &KvStore {
        &self.kv
    }

    // ─── Repository handles ──────────────────────────────────────────────

    pub fn products(&self) -> ProductRepo {
        ProductRepo::new(Arc::clone(&self.kv), self.gate.clone())
    }

    pub fn farmers(&self) -> FarmerRepo {
        FarmerRepo::new(Arc::clone(&self.kv), self.gate.clone())
    }

    pub fn transactions(&self) -> TransactionRepo {
        TransactionRepo::new(Arc::clone(&self.kv), self.gate.clone())
    }

    pub fn schemes(&self) -> SchemeRepo {
        SchemeRepo::new(Arc::clone(&self.kv), self.gate.clone())
    }

    pub fn traces(&self) -> TraceRepo {
        TraceRepo::new(Arc::clone(&self.kv), self.gate.clone())
    }

    pub fn stats(&self) -> StatsService {
        StatsService::new(Arc::clone(&self.kv), self.gate.clone())
    }

    pub fn search(&self) -> SearchService {
        SearchService::new(Arc::clone(&self.kv), self.gate.clone())
    }

    pub fn cart(&self) -> CartStore {
        CartStore::new(Arc::clone(&self.kv))
    }

    pub fn session(&self) -> SessionStore {
        SessionStore::new(Arc::clone(&self.kv))
    }

    // ─── Cross-collection operations ─────────────────────────────────────

    /// Turn the cart into one pending transaction per line and clear it.
    /// Fails on an empty cart; fails NotFound if a line's product no longer
    /// exists (the farmer id comes from the product record).
    pub async fn checkout(&self, buyer_id: &str) -> AgriResult<ApiResponse<Vec<Transaction>>> {
        self.gate.admit(OpClass::Write).await?;

        let cart = self.cart().load()?;
        if cart.is_empty() {
            return Err(AgriError::InvalidInput("cart is empty".to_string()));
        }

        let products: Vec<Product> = load_items(&self.kv, keys::PRODUCTS)?;
        let mut created = Vec::with_capacity(cart.items.len());
        for line in &cart.items {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| AgriError::not_found("product", line.product_id.clone()))?;
            created.push(build_transaction(NewTransaction {
                farmer_id: product.farmer_id.clone(),
                buyer_id: buyer_id.to_string(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                amount: line.price * f64::from(line.quantity),
                status: None,
            }));
        }

        let txs = created.clone();
        modify_items(&self.kv, keys::TRANSACTIONS, move |items: &mut Vec<Transaction>| {
            items.extend(txs);
            Ok(())
        })?;
        self.cart().clear()?;

        info!(buyer_id, orders = created.len(), "checkout completed");
        Ok(ApiResponse::with_message(
            created,
            "Order placed successfully",
        ))
    }

    /// Drop every collection key and reseed from fixtures.
    pub async fn reset_all(&self) -> AgriResult<ApiResponse<()>> {
        self.gate.admit(OpClass::Write).await?;
        seeds::reset(&self.kv)?;
        info!("all collections cleared and reseeded");
        Ok(ApiResponse::with_message(
            (),
            "All data cleared and reinitialized",
        ))
    }
}
