//! List queries: filter conjunction, pagination math, transaction ordering,
//! and the cross-collection search caps.

use agrichain_core::envelope::{paginate, PageRequest};
use agrichain_core::models::{NewProduct, TxStatus, VerificationStatus};
use agrichain_storage::repos::{FarmerFilter, ProductFilter, TransactionFilter};
use agrichain_storage::search::SearchLimits;
use agrichain_storage::MarketEngine;
use proptest::prelude::*;

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn filler_product(n: usize) -> NewProduct {
    NewProduct {
        name: format!("Filler {n}"),
        category: "Filler".to_string(),
        description: String::new(),
        variety: String::new(),
        price: 10.0,
        unit: "kg".to_string(),
        quantity: 1,
        farmer_id: "F001".to_string(),
        image: None,
        certifications: vec![],
    }
}

/// Seed fixtures hold 6 products; top up to `total`.
async fn engine_with_products(total: usize) -> MarketEngine {
    let engine = MarketEngine::open_in_memory().unwrap();
    let products = engine.products();
    for n in 6..total {
        products.create(filler_product(n)).await.unwrap();
    }
    engine
}

// ═══════════════════════════════════════════════════════════════════════════════
// Filters are conjunctive
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn product_filters_combine_with_and() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let page = engine
        .products()
        .list(
            &ProductFilter {
                category: Some("Grains".to_string()),
                farmer_id: Some("F003".to_string()),
                ..ProductFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    // Two seeded grain products, but only one belongs to F003.
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, "prod-006");
}

#[tokio::test]
async fn available_only_excludes_sold_out_listings() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let page = engine
        .products()
        .list(
            &ProductFilter {
                available_only: true,
                ..ProductFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    // prod-003 is sold with zero stock.
    assert_eq!(page.data.len(), 5);
    assert!(page.data.iter().all(|p| p.id != "prod-003"));
}

#[tokio::test]
async fn product_search_is_case_insensitive_substring() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let page = engine
        .products()
        .list(
            &ProductFilter {
                search: Some("BASMATI".to_string()),
                ..ProductFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, "prod-001");
}

#[tokio::test]
async fn farmer_filter_by_state_and_verification() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let farmers = engine.farmers();

    let verified = farmers
        .list(
            &FarmerFilter {
                verified: Some(VerificationStatus::Verified),
                ..FarmerFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(verified.data.len(), 2);

    let in_state = farmers
        .list(
            &FarmerFilter {
                state: Some("meghalaya".to_string()),
                ..FarmerFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(in_state.data.len(), 1);
    assert_eq!(in_state.data[0].farmer_id, "F003");
}

#[tokio::test]
async fn transaction_filter_by_status() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let page = engine
        .transactions()
        .list(
            &TransactionFilter {
                farmer_id: Some("F001".to_string()),
                status: Some(TxStatus::Pending),
                ..TransactionFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.data.len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn twelve_items_at_limit_five_paginate_as_5_5_2() {
    let engine = engine_with_products(12).await;
    let products = engine.products();

    let first = products
        .list(&ProductFilter::default(), PageRequest::new(1, 5))
        .await
        .unwrap();
    let info = first.pagination.unwrap();
    assert_eq!(first.data.len(), 5);
    assert_eq!(info.total, 12);
    assert_eq!(info.total_pages, 3);
    assert!(info.has_next);
    assert!(!info.has_prev);

    let last = products
        .list(&ProductFilter::default(), PageRequest::new(3, 5))
        .await
        .unwrap();
    let info = last.pagination.unwrap();
    assert_eq!(last.data.len(), 2);
    assert!(!info.has_next);
    assert!(info.has_prev);
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let page = engine
        .products()
        .list(&ProductFilter::default(), PageRequest::new(9, 5))
        .await
        .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.unwrap().total, 6);
}

#[tokio::test]
async fn default_limit_is_ten_for_products() {
    let engine = engine_with_products(14).await;
    let page = engine
        .products()
        .list(&ProductFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.data.len(), 10);
    assert_eq!(page.pagination.unwrap().limit, 10);
}

proptest! {
    /// Walking every page in order reproduces the input exactly, and every
    /// page except possibly the last is full.
    #[test]
    fn pages_tile_the_collection(total in 0usize..200, limit in 1u32..20) {
        let items: Vec<usize> = (0..total).collect();
        let mut walked = Vec::new();
        let mut page = 1u32;
        loop {
            let (chunk, info) = paginate(items.clone(), page, limit);
            prop_assert_eq!(info.total, total);
            prop_assert!(chunk.len() <= limit as usize);
            if info.has_next {
                prop_assert_eq!(chunk.len(), limit as usize);
            }
            let done = !info.has_next;
            walked.extend(chunk);
            if done {
                break;
            }
            page += 1;
        }
        prop_assert_eq!(walked, items);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Transaction ordering
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn transactions_list_newest_first() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let page = engine
        .transactions()
        .list(&TransactionFilter::default(), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.data.len(), 6);
    assert_eq!(page.data[0].transaction_id, "tx-1006");
    assert!(page
        .data
        .windows(2)
        .all(|w| w[0].transaction_date >= w[1].transaction_date));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Cross-collection search
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn search_all_spans_three_collections() {
    let engine = MarketEngine::open_in_memory().unwrap();
    let results = engine
        .search()
        .search_all("organic", SearchLimits::default())
        .await
        .unwrap()
        .data;

    // "organic" hits product descriptions and a scheme title; no farmer.
    assert!(!results.products.is_empty());
    assert!(results.farmers.is_empty());
    assert_eq!(results.schemes.len(), 1);
    assert_eq!(
        results.total_results,
        results.products.len() + results.farmers.len() + results.schemes.len()
    );
}

#[tokio::test]
async fn search_all_caps_each_collection() {
    let engine = engine_with_products(20).await;
    let results = engine
        .search()
        .search_all(
            "filler",
            SearchLimits {
                products: 3,
                farmers: 3,
                schemes: 3,
            },
        )
        .await
        .unwrap()
        .data;
    assert_eq!(results.products.len(), 3);
    assert_eq!(results.total_results, 3);
}
