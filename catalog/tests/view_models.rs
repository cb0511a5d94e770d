//! Integration tests for the list, picker and detail view models

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use catalog::views::{ProductDetailViewModel, ProductListViewModel, ProductPickerViewModel};
use catalog::{ApiConfig, ProductService};
use catalog_core::{CatalogError, CategoryId, ProductId, SupplierId};
use catalog_testing::helpers::{TIMEOUT, is_silent, next_within};
use catalog_testing::{MockHttpClient, StaticCategorySource, fixtures};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn service_over(http: MockHttpClient) -> Arc<ProductService> {
    catalog_testing::helpers::init_tracing();
    Arc::new(ProductService::new(
        Arc::new(http),
        Arc::new(StaticCategorySource::new(fixtures::categories())),
        ApiConfig::default(),
    ))
}

fn sample_service() -> Arc<ProductService> {
    service_over(fixtures::catalog_client())
}

fn failing_service() -> Arc<ProductService> {
    service_over(MockHttpClient::new().with_error(
        "products/",
        CatalogError::Backend {
            status: 500,
            message: "boom".to_string(),
        },
    ))
}

// ============================================================================
// List
// ============================================================================

#[tokio::test]
async fn test_list_filters_by_category() {
    let list = ProductListViewModel::new(sample_service());
    assert_eq!(list.page_title(), "Product List");

    let mut products = list.products();
    let all = next_within(&mut products, TIMEOUT).await.unwrap();
    assert_eq!(all.len(), 5);

    list.select_category(CategoryId::new(3));
    let toolbox = next_within(&mut products, TIMEOUT).await.unwrap();
    let names: Vec<&str> = toolbox.iter().map(|p| p.product_name.as_str()).collect();
    assert_eq!(names, vec!["Hammer", "Saw"]);

    list.select_category(CategoryId::ALL);
    assert_eq!(next_within(&mut products, TIMEOUT).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_shows_added_placeholder() {
    let list = ProductListViewModel::new(sample_service());
    let mut products = list.products();
    next_within(&mut products, TIMEOUT).await.unwrap();

    list.add_product();
    let updated = next_within(&mut products, TIMEOUT).await.unwrap();

    assert_eq!(updated.len(), 6);
    assert_eq!(updated[5].id, ProductId::new(42));
}

#[tokio::test]
async fn test_list_failure_empties_list_and_records_message() {
    let list = ProductListViewModel::new(failing_service());
    let mut products = list.products();

    assert_eq!(next_within(&mut products, TIMEOUT).await, Some(Vec::new()));
    assert_eq!(next_within(&mut products, TIMEOUT).await, None);
    assert_eq!(
        list.error_message().as_deref(),
        Some("Backend returned code 500: boom")
    );

    let mut messages = list.error_messages();
    assert_eq!(
        next_within(&mut messages, TIMEOUT).await.as_deref(),
        Some("Backend returned code 500: boom")
    );
}

#[tokio::test]
async fn test_list_passes_categories_through() {
    let list = ProductListViewModel::new(sample_service());
    let mut categories = list.categories();

    let received = next_within(&mut categories, TIMEOUT).await.unwrap().unwrap();
    assert_eq!(received, fixtures::categories());
}

// ============================================================================
// Picker
// ============================================================================

#[tokio::test]
async fn test_picker_selection_flows_to_service() {
    let service = sample_service();
    let picker = ProductPickerViewModel::new(Arc::clone(&service));
    assert_eq!(picker.page_title(), "Products");

    let products = next_within(&mut picker.products(), TIMEOUT).await.unwrap();
    assert_eq!(products.len(), 5);

    let mut selected = picker.selected_product();
    assert_eq!(next_within(&mut selected, TIMEOUT).await, Some(Ok(None)));

    picker.select_product(ProductId::new(10));
    let product = next_within(&mut selected, TIMEOUT).await.unwrap().unwrap().unwrap();
    assert_eq!(product.product_name, "Video Game Controller");
    assert_eq!(service.selected_product_id(), ProductId::new(10));
}

#[tokio::test]
async fn test_picker_failure_ends_without_fallback() {
    let picker = ProductPickerViewModel::new(failing_service());
    let mut products = picker.products();

    assert_eq!(next_within(&mut products, TIMEOUT).await, None);
    assert!(picker.error_message().is_some());
}

// ============================================================================
// Detail
// ============================================================================

#[tokio::test]
async fn test_detail_title_follows_selection() {
    let service = sample_service();
    let detail = ProductDetailViewModel::new(Arc::clone(&service));
    let mut titles = detail.page_title();

    assert_eq!(next_within(&mut titles, TIMEOUT).await.as_deref(), Some("Product Detail"));

    service.select_product(ProductId::new(5));
    assert_eq!(
        next_within(&mut titles, TIMEOUT).await.as_deref(),
        Some("Product Detail for: Hammer")
    );
}

#[tokio::test]
async fn test_detail_view_waits_for_a_product() {
    let service = sample_service();
    let detail = ProductDetailViewModel::new(Arc::clone(&service));
    let mut views = detail.view_model();

    assert!(is_silent(&mut views, Duration::from_millis(50)).await);

    service.select_product(ProductId::new(5));
    let initial = next_within(&mut views, TIMEOUT).await.unwrap();
    assert_eq!(initial.product.id, ProductId::new(5));
    assert_eq!(initial.page_title, "Product Detail for: Hammer");
    assert!(initial.suppliers.is_empty());

    next_within(&mut views, TIMEOUT).await.unwrap();
    let complete = next_within(&mut views, TIMEOUT).await.unwrap();
    let ids: HashSet<SupplierId> = complete.suppliers.iter().map(|s| s.id).collect();
    assert_eq!(ids, HashSet::from([SupplierId::new(5), SupplierId::new(6)]));
}

#[tokio::test]
async fn test_detail_view_resets_suppliers_on_new_selection() {
    let service = sample_service();
    let detail = ProductDetailViewModel::new(Arc::clone(&service));
    let mut views = detail.view_model();

    service.select_product(ProductId::new(1));
    for _ in 0..3 {
        next_within(&mut views, TIMEOUT).await.unwrap();
    }

    service.select_product(ProductId::new(8));
    let restarted = next_within(&mut views, TIMEOUT).await.unwrap();
    assert_eq!(restarted.product.product_name, "Saw");
    assert!(restarted.suppliers.is_empty());
}

#[tokio::test]
async fn test_detail_failure_records_message_and_ends() {
    let detail = ProductDetailViewModel::new(failing_service());
    let mut messages = detail.error_messages();
    let mut product = detail.product();

    assert_eq!(next_within(&mut product, TIMEOUT).await, None);
    assert_eq!(
        detail.error_message().as_deref(),
        Some("Backend returned code 500: boom")
    );
    assert_eq!(
        next_within(&mut messages, TIMEOUT).await.as_deref(),
        Some("Backend returned code 500: boom")
    );
    assert_eq!(detail.supplier_error_message(), None);
}

#[tokio::test]
async fn test_supplier_failure_is_recorded_separately() {
    let http = fixtures::catalog_client().with_error(
        &fixtures::supplier_path(SupplierId::new(5)),
        CatalogError::Network("connection reset".to_string()),
    );
    let service = service_over(http);
    let detail = ProductDetailViewModel::new(Arc::clone(&service));
    let mut suppliers = detail.product_suppliers();
    let mut product = detail.product();

    service.select_product(ProductId::new(5));
    while next_within(&mut suppliers, TIMEOUT).await.is_some() {}

    assert_eq!(
        detail.supplier_error_message().as_deref(),
        Some("An error occurred: connection reset")
    );
    assert_eq!(
        next_within(&mut detail.supplier_error_messages(), TIMEOUT).await.as_deref(),
        Some("An error occurred: connection reset")
    );
    assert_eq!(detail.error_message(), None);

    let mut last = None;
    while let Some(selected) = next_within(&mut product, Duration::from_millis(50)).await {
        last = selected;
    }
    assert_eq!(last.unwrap().id, ProductId::new(5));
}
