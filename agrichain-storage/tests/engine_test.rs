//! Engine-level flows: checkout, reset, and policy plumbing.

use std::sync::Arc;

use agrichain_core::envelope::PageRequest;
use agrichain_core::errors::AgriError;
use agrichain_core::models::TxStatus;
use agrichain_core::policy::{NoLatency, SimulatedFaults};
use agrichain_storage::repos::TransactionFilter;
use agrichain_storage::{keys, KvStore, MarketEngine};

// ═══════════════════════════════════════════════════════════════════════════════
// Checkout
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn checkout_creates_one_pending_transaction_per_line() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let rice = engine.products().get_by_id("prod-001").await.unwrap().data;
    let turmeric = engine.products().get_by_id("prod-005").await.unwrap().data;
    engine.cart().add_product(&rice, 2).unwrap();
    engine.cart().add_product(&turmeric, 1).unwrap();

    let created = engine.checkout("C009").await.unwrap().data;

    assert_eq!(created.len(), 2);
    for tx in &created {
        assert_eq!(tx.status, TxStatus::Pending);
        assert_eq!(tx.buyer_id, "C009");
        assert!(tx.blockchain_hash.is_some());
    }
    let rice_tx = created.iter().find(|t| t.product_id == "prod-001").unwrap();
    assert_eq!(rice_tx.farmer_id, "F001");
    assert!((rice_tx.amount - 170.0).abs() < f64::EPSILON);
    let turmeric_tx = created.iter().find(|t| t.product_id == "prod-005").unwrap();
    assert_eq!(turmeric_tx.farmer_id, "F003");
    assert!((turmeric_tx.amount - 240.0).abs() < f64::EPSILON);

    // Orders are persisted and the cart is emptied.
    let page = engine
        .transactions()
        .list(&TransactionFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.unwrap().total, 8);
    assert!(engine.cart().load().unwrap().is_empty());
}

#[tokio::test]
async fn checkout_with_empty_cart_is_rejected() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let err = engine.checkout("C009").await.unwrap_err();
    assert!(matches!(err, AgriError::InvalidInput(_)));
}

#[tokio::test]
async fn checkout_fails_when_a_line_product_is_gone() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let rice = engine.products().get_by_id("prod-001").await.unwrap().data;
    engine.cart().add_product(&rice, 1).unwrap();
    engine.products().delete("prod-001").await.unwrap();

    let err = engine.checkout("C009").await.unwrap_err();
    assert!(matches!(err, AgriError::NotFound { entity: "product", .. }));

    // No partial order: the transaction log is untouched and the cart kept.
    let page = engine
        .transactions()
        .list(&TransactionFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.pagination.unwrap().total, 6);
    assert!(!engine.cart().load().unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// Reset
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn reset_all_restores_fixture_counts() {
    let engine = MarketEngine::open_in_memory().unwrap();
    engine.products().delete("prod-001").await.unwrap();
    engine.products().delete("prod-002").await.unwrap();

    engine.reset_all().await.unwrap();

    let stats = engine.stats().data_stats().await.unwrap().data;
    assert_eq!(stats.products, 6);
    assert_eq!(stats.farmers, 3);
    assert_eq!(stats.transactions, 6);
    assert_eq!(stats.schemes, 4);
    assert_eq!(stats.traces, 2);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Policy plumbing
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn certain_faults_fail_every_gated_operation() {
    let engine = MarketEngine::with_policies(
        KvStore::open_in_memory().unwrap(),
        Arc::new(NoLatency),
        Arc::new(SimulatedFaults { probability: 1.0 }),
    )
    .unwrap();

    let err = engine.products().get_by_id("prod-001").await.unwrap_err();
    assert!(matches!(err, AgriError::Network));
    let err = engine
        .transactions()
        .list(&TransactionFilter::default(), PageRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AgriError::Network));
    let err = engine.checkout("C009").await.unwrap_err();
    assert!(matches!(err, AgriError::Network));

    // Injected faults never mutate data: the store still holds the seed.
    let doc = engine.store().get(keys::PRODUCTS).unwrap().unwrap();
    assert_eq!(doc.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn zero_probability_never_fails() {
    let engine = MarketEngine::with_policies(
        KvStore::open_in_memory().unwrap(),
        Arc::new(NoLatency),
        Arc::new(SimulatedFaults { probability: 0.0 }),
    )
    .unwrap();
    for _ in 0..50 {
        engine.products().get_by_id("prod-001").await.unwrap();
    }
}
